use approx::assert_relative_eq;
use pretty_assertions::assert_eq;
use rstest::rstest;
use translation_eval_core::{CoreError, MetricCalculator, MetricId, TextPair};
use translation_eval_metrics::calculators::{
    CopyRateCalculator, NumberPreservation, NumberPreservationCalculator, RepetitionCalculator,
    TextStats,
};

// ===== Repetition Tests =====

#[test]
fn test_repetition_detects_repeated_trigrams() {
    // Windows: "the cat the", "cat the cat", then both again.
    let ratio = RepetitionCalculator::default().calculate_repetition("the cat the cat the cat");
    assert_relative_eq!(ratio, 50.0);
}

#[rstest]
#[case("one two three four five six seven")]
#[case("a b c d e")]
#[case("")]
fn test_repetition_zero_cases(#[case] text: &str) {
    assert_eq!(RepetitionCalculator::default().calculate_repetition(text), 0.0);
}

#[test]
fn test_repetition_window_size() {
    let text = "go go go go";
    // Bigram windows: "go go" x3, two of them repeats.
    assert_relative_eq!(
        RepetitionCalculator::new(2).calculate_repetition(text),
        66.67,
        epsilon = 0.001
    );
    // Four tokens are fewer than two trigram windows.
    assert_eq!(RepetitionCalculator::new(3).calculate_repetition(text), 0.0);
}

#[test]
fn test_repetition_trait_takes_plain_text() {
    let output = RepetitionCalculator::default()
        .calculate("the cat the cat the cat")
        .unwrap();
    assert_eq!(output.metric, MetricId::Repetition);
    assert_eq!(output.metadata["ngram"], 3);
}

// ===== Number Preservation Tests =====

#[test]
fn test_number_preservation_normalises_decimal_comma() {
    let result = NumberPreservationCalculator::new()
        .calculate_preservation("I have 5 apples and 3.5 kg", "I have 5 apples and 3,5 kg");

    assert_eq!(
        result,
        NumberPreservation {
            preserved: 100.0,
            missing: 0,
            extra: 0,
        }
    );
}

#[rstest]
#[case("5 apples and 10 pears", "5 Äpfel", 50.0, 1, 0)]
#[case("5 and 5", "5", 50.0, 1, 0)]
#[case("1 2 3", "1", 33.3, 2, 0)]
#[case("1 2", "2 1 7 8", 100.0, 0, 2)]
#[case("no numbers here", "1 and 2", 100.0, 0, 2)]
#[case("no numbers here", "none either", 100.0, 0, 0)]
#[case("price 12,50", "price 12.50", 100.0, 0, 0)]
fn test_number_preservation_cases(
    #[case] source: &str,
    #[case] candidate: &str,
    #[case] preserved: f64,
    #[case] missing: usize,
    #[case] extra: usize,
) {
    let result = NumberPreservationCalculator::new().calculate_preservation(source, candidate);
    assert_relative_eq!(result.preserved, preserved, epsilon = 0.001);
    assert_eq!(result.missing, missing);
    assert_eq!(result.extra, extra);
}

#[test]
fn test_extract_numbers() {
    assert_eq!(
        NumberPreservationCalculator::extract_numbers("v2 costs 3,99 or 4.5 (x10)"),
        vec!["2", "3.99", "4.5", "10"]
    );
}

#[test]
fn test_number_preservation_trait_reads_source_from_pair() {
    let pair = TextPair::new("Room 101", "Zimmer 101");
    let result = NumberPreservationCalculator::new().calculate(&pair).unwrap();
    assert_eq!(result.preserved, 100.0);

    let missing = NumberPreservationCalculator::new().calculate(&TextPair::without_reference("1"));
    assert!(matches!(
        missing,
        Err(CoreError::MissingReference(MetricId::NumberPreservation))
    ));
}

// ===== Copy Rate Tests =====

#[rstest]
#[case("Hello world program", "Hello world program", 100.0)]
#[case("Hello world program", "Hallo Welt program", 33.33)]
#[case("Hello world program", "a is program", 100.0)]
#[case("Hello world program", "", 0.0)]
#[case("Hello world program", "a b c", 0.0)]
#[case("", "brand new words", 0.0)]
fn test_copy_rate_cases(#[case] source: &str, #[case] candidate: &str, #[case] expected: f64) {
    let rate = CopyRateCalculator::default().calculate_copy_rate(source, candidate);
    assert_relative_eq!(rate, expected, epsilon = 0.001);
}

#[test]
fn test_copy_rate_counts_candidate_tokens_not_types() {
    // "data" appears twice and is copied both times: 2 of 3 tokens.
    let rate = CopyRateCalculator::default().calculate_copy_rate("data", "data neue data");
    assert_relative_eq!(rate, 66.67, epsilon = 0.001);
}

#[test]
fn test_copy_rate_trait_output() {
    let output = CopyRateCalculator::default()
        .calculate(&TextPair::new("Hello world program", "Hallo Welt program"))
        .unwrap();
    assert_eq!(output.metric, MetricId::CopyRate);
    assert_eq!(output.metadata["min_token_chars"], 3);
}

// ===== Text Statistics Tests =====

#[test]
fn test_text_stats() {
    let stats = TextStats::from_text("Hello world. How are you?");
    assert_eq!(
        stats,
        TextStats {
            char_count: 25,
            char_count_no_space: 21,
            word_count: 5,
            sentence_count: 2,
        }
    );
}

#[rstest]
#[case("no punctuation", 1)]
#[case("Wait... what?!", 2)]
#[case("你好。再见！", 2)]
#[case("", 1)]
fn test_sentence_count(#[case] text: &str, #[case] expected: usize) {
    assert_eq!(TextStats::from_text(text).sentence_count, expected);
}
