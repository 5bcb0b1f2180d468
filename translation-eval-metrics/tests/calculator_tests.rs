use approx::assert_relative_eq;
use proptest::prelude::*;
use rstest::rstest;
use translation_eval_core::{CoreError, MetricCalculator, MetricId, TextPair};
use translation_eval_metrics::calculators::{
    BleuCalculator, ChrfCalculator, ErrorRateCalculator, ErrorUnit, JaccardCalculator,
    LengthRatioCalculator, MeteorCalculator, MAX_ERROR_RATE,
};
use translation_eval_metrics::edit_distance::levenshtein;
use translation_eval_metrics::tokenizer::word_tokens;

// ===== Edit Distance Tests =====

#[rstest]
#[case("kitten", "sitting", 3)]
#[case("flaw", "lawn", 2)]
#[case("", "abc", 3)]
#[case("same", "same", 0)]
#[case("привет", "привед", 1)]
fn test_levenshtein_chars(#[case] a: &str, #[case] b: &str, #[case] expected: usize) {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    assert_eq!(levenshtein(&a, &b), expected);
}

#[test]
fn test_levenshtein_words() {
    let a = word_tokens("the cat sat on the mat");
    let b = word_tokens("the cat sat on a mat");
    assert_eq!(levenshtein(&a, &b), 1);
}

// ===== CER / WER Tests =====

#[test]
fn test_cer_classic_example() {
    // 3 edits over a 6 character reference
    assert_relative_eq!(ErrorRateCalculator::cer().calculate_rate("kitten", "sitting"), 50.0);
}

#[test]
fn test_cer_is_case_sensitive() {
    assert_relative_eq!(
        ErrorRateCalculator::cer().calculate_rate("Kitten", "kitten"),
        16.67,
        epsilon = 0.001
    );
}

#[test]
fn test_wer_ignores_case_and_punctuation() {
    let wer = ErrorRateCalculator::wer();
    assert_eq!(wer.calculate_rate("The cat, sat.", "the cat sat"), 0.0);
    assert_relative_eq!(wer.calculate_rate("the cat sat", "the cat sit"), 33.33, epsilon = 0.001);
}

#[rstest]
#[case(ErrorUnit::Character, "")]
#[case(ErrorUnit::Character, "anything at all")]
#[case(ErrorUnit::Word, "")]
#[case(ErrorUnit::Word, "anything at all")]
fn test_error_rate_empty_reference_is_zero(#[case] unit: ErrorUnit, #[case] candidate: &str) {
    let calculator = ErrorRateCalculator::new(unit);
    assert_eq!(calculator.calculate_rate("", candidate), 0.0);
}

#[test]
fn test_error_rate_empty_candidate_is_full_error() {
    assert_eq!(ErrorRateCalculator::cer().calculate_rate("abc", ""), 100.0);
    assert_eq!(ErrorRateCalculator::wer().calculate_rate("one two", ""), 100.0);
}

#[test]
fn test_error_rate_is_capped() {
    assert_eq!(ErrorRateCalculator::cer().calculate_rate("a", "abcdef"), MAX_ERROR_RATE);
    assert_eq!(
        ErrorRateCalculator::wer().calculate_rate("one", "one two three four"),
        MAX_ERROR_RATE
    );
}

#[test]
fn test_error_rate_trait_metric_matches_unit() {
    let pair = TextPair::new("kitten", "sitting");

    let cer = ErrorRateCalculator::cer().calculate(&pair).unwrap();
    assert_eq!(cer.metric, MetricId::Cer);
    assert_eq!(cer.metadata["unit"], "character");

    let wer = ErrorRateCalculator::wer().calculate(&pair).unwrap();
    assert_eq!(wer.metric, MetricId::Wer);
    assert_eq!(wer.score, 100.0);

    let missing = ErrorRateCalculator::wer().calculate(&TextPair::without_reference("x"));
    assert!(matches!(missing, Err(CoreError::MissingReference(MetricId::Wer))));
}

// ===== Jaccard Tests =====

#[rstest]
#[case("the cat sat", "the cat sat", 100.0)]
#[case("the cat sat", "Sat, the CAT!", 100.0)]
#[case("cat dog", "fish bird", 0.0)]
#[case("the cat", "the dog", 33.33)]
#[case("", "", 100.0)]
#[case("", "something", 0.0)]
fn test_jaccard_cases(#[case] reference: &str, #[case] candidate: &str, #[case] expected: f64) {
    let score = JaccardCalculator::new().calculate_jaccard(reference, candidate);
    assert_relative_eq!(score, expected, epsilon = 0.001);
}

#[test]
fn test_jaccard_formats_like_export() {
    let calculator = JaccardCalculator::new();
    assert_eq!(format!("{:.2}", calculator.calculate_jaccard("a b", "c d")), "0.00");
    assert_eq!(format!("{:.2}", calculator.calculate_jaccard("", "")), "100.00");
}

// ===== Length Ratio Tests =====

#[test]
fn test_length_ratio_self_is_hundred() {
    let ratio = LengthRatioCalculator::new().calculate_ratio("Hello world", "Hello world");
    assert_eq!(format!("{:.2}", ratio), "100.00");
}

#[rstest]
#[case("abcd", "ab", 50.0)]
#[case("ab", "abcd", 200.0)]
#[case("", "anything", 100.0)]
#[case("äöü", "abc", 100.0)]
#[case("abc", "", 0.0)]
fn test_length_ratio_cases(#[case] reference: &str, #[case] candidate: &str, #[case] expected: f64) {
    let ratio = LengthRatioCalculator::new().calculate_ratio(reference, candidate);
    assert_relative_eq!(ratio, expected, epsilon = 0.001);
}

#[test]
fn test_length_ratio_trait_metadata() {
    let output = LengthRatioCalculator::new()
        .calculate(&TextPair::new("abcd", "ab"))
        .unwrap();
    assert_eq!(output.metric, MetricId::LengthRatio);
    assert_eq!(output.metadata["reference_chars"], 4);
    assert_eq!(output.metadata["candidate_chars"], 2);
}

// ===== Property-based Tests =====

proptest! {
    #[test]
    fn test_levenshtein_identity(a in "\\PC{0,40}") {
        let chars: Vec<char> = a.chars().collect();
        prop_assert_eq!(levenshtein(&chars, &chars), 0);
    }

    #[test]
    fn test_levenshtein_upper_bound(a in "\\PC{0,30}", b in "\\PC{0,30}") {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();
        prop_assert!(levenshtein(&a, &b) <= a.len() + b.len());
        prop_assert!(levenshtein(&a, &b) >= a.len().abs_diff(b.len()));
    }

    #[test]
    fn test_levenshtein_symmetric(a in "[a-c]{0,12}", b in "[a-c]{0,12}") {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();
        prop_assert_eq!(levenshtein(&a, &b), levenshtein(&b, &a));
    }

    #[test]
    fn test_scores_stay_in_bounds(reference in "[a-e ]{0,40}", candidate in "[a-e ]{0,40}") {
        let (bleu, _) = BleuCalculator::default().calculate_bleu(&reference, &candidate);
        let chrf = ChrfCalculator::default().calculate_chrf(&reference, &candidate);
        let meteor = MeteorCalculator::default().calculate_meteor(&reference, &candidate);
        let jaccard = JaccardCalculator::new().calculate_jaccard(&reference, &candidate);
        let cer = ErrorRateCalculator::cer().calculate_rate(&reference, &candidate);
        let wer = ErrorRateCalculator::wer().calculate_rate(&reference, &candidate);

        for score in [bleu, chrf, meteor, jaccard] {
            prop_assert!((0.0..=100.0).contains(&score), "score {} out of range", score);
        }
        for rate in [cer, wer] {
            prop_assert!((0.0..=MAX_ERROR_RATE).contains(&rate), "rate {} out of range", rate);
        }
    }

    #[test]
    fn test_identical_text_scores_near_hundred(words in proptest::collection::vec("[a-z]{1,8}", 4..12)) {
        let text = words.join(" ");
        let (bleu, _) = BleuCalculator::default().calculate_bleu(&text, &text);
        let chrf = ChrfCalculator::default().calculate_chrf(&text, &text);
        let meteor = MeteorCalculator::default().calculate_meteor(&text, &text);
        let jaccard = JaccardCalculator::new().calculate_jaccard(&text, &text);

        prop_assert!((bleu - 100.0).abs() < 0.01);
        prop_assert!((chrf - 100.0).abs() < 0.01);
        // One chunk over at least four matches: penalty at most 0.5 / 64.
        prop_assert!(meteor >= 99.2);
        prop_assert!((jaccard - 100.0).abs() < 0.01);
        prop_assert_eq!(ErrorRateCalculator::cer().calculate_rate(&text, &text), 0.0);
    }
}
