use pretty_assertions::assert_eq;
use serde_json::json;
use translation_eval_core::domain::*;

// ===== MetricId Serialization Tests =====

#[test]
fn test_metric_id_serializes_to_wire_key() {
    let pairs = vec![
        (MetricId::Bleu, "bleu"),
        (MetricId::ChrF, "chrF"),
        (MetricId::LengthRatio, "lengthRatio"),
        (MetricId::BertScore, "bertScore"),
        (MetricId::CometQe, "cometQE"),
        (MetricId::LlmScore, "score"),
        (MetricId::NumberPreservation, "numberPres"),
        (MetricId::CopyRate, "copyRate"),
    ];

    for (metric, expected) in pairs {
        assert_eq!(serde_json::to_value(metric).unwrap(), json!(expected));
    }
}

// ===== MetricValue Serialization Tests =====

#[test]
fn test_metric_value_serializes_sentinels() {
    assert_eq!(serde_json::to_value(MetricValue::Value(42.5)).unwrap(), json!(42.5));
    assert_eq!(serde_json::to_value(MetricValue::Unavailable).unwrap(), json!("N/A"));
    assert_eq!(
        serde_json::to_value(MetricValue::Errored("timeout".to_string())).unwrap(),
        json!("Error")
    );
}

#[test]
fn test_metric_value_deserializes_numbers_strings_and_null() {
    let values: Vec<MetricValue> =
        serde_json::from_value(json!([87.5, "91.23", "N/A", "Error", null, "oops"])).unwrap();

    assert_eq!(
        values,
        vec![
            MetricValue::Value(87.5),
            MetricValue::Value(91.23),
            MetricValue::Unavailable,
            MetricValue::Errored("Error".to_string()),
            MetricValue::Unavailable,
            MetricValue::Unavailable,
        ]
    );
}

#[test]
fn test_metric_set_serializes_as_keyed_object() {
    let mut metrics = MetricSet::new();
    metrics.insert(MetricId::Bleu, MetricValue::Value(55.0));
    metrics.insert(MetricId::Comet, MetricValue::Unavailable);

    let value = serde_json::to_value(&metrics).unwrap();
    assert_eq!(value, json!({ "bleu": 55.0, "comet": "N/A" }));

    let back: MetricSet = serde_json::from_value(value).unwrap();
    assert_eq!(back, metrics);
}

// ===== Record Serialization Tests =====

#[test]
fn test_evaluation_record_accepts_export_shape() {
    let record: EvaluationRecord = serde_json::from_value(json!({
        "model": "gpt-4o",
        "metrics": {
            "bleu": "45.12",
            "chrF": 61.0,
            "bertScore": "N/A",
            "score": "8.5"
        },
        "time": 1830,
        "cost": "0.42"
    }))
    .unwrap();

    assert_eq!(record.model, "gpt-4o");
    assert_eq!(record.metric(MetricId::Bleu), MetricValue::Value(45.12));
    assert_eq!(record.metric(MetricId::ChrF), MetricValue::Value(61.0));
    assert_eq!(record.metric(MetricId::BertScore), MetricValue::Unavailable);
    assert_eq!(record.metric(MetricId::LlmScore), MetricValue::Value(8.5));
    assert_eq!(record.time_ms, MetricValue::Value(1830.0));
    assert_eq!(record.cost_cents, MetricValue::Value(0.42));
}

#[test]
fn test_evaluation_record_missing_optional_fields() {
    let record: EvaluationRecord = serde_json::from_value(json!({ "model": "m" })).unwrap();
    assert!(record.metrics.is_empty());
    assert_eq!(record.time_ms, MetricValue::Unavailable);
    assert_eq!(record.cost_cents, MetricValue::Unavailable);
}

#[test]
fn test_evaluation_record_ignores_untracked_metrics() {
    let records: Vec<EvaluationRecord> = serde_json::from_str(
        r#"[{"model":"m","metrics":{"bleu":"40.00","bleurt":"0.5","rouge":1.0}}]"#,
    )
    .unwrap();

    let mut expected = MetricSet::new();
    expected.insert(MetricId::Bleu, MetricValue::Value(40.0));
    assert_eq!(records[0].metrics, expected);
}

#[test]
fn test_metric_set_rejects_unknown_key() {
    let result: Result<MetricSet, _> = serde_json::from_value(json!({ "rouge": 1.0 }));
    assert!(result.is_err());
}

#[test]
fn test_translation_sample_accepts_ingestion_shape() {
    let sample: TranslationSample = serde_json::from_value(json!({
        "original": "Hello",
        "translation": null
    }))
    .unwrap();
    assert_eq!(sample.source, "Hello");
    assert!(!sample.has_reference());

    let sample: TranslationSample = serde_json::from_value(json!({ "original": "Hello" })).unwrap();
    assert_eq!(sample.reference, None);
}

#[test]
fn test_external_scores_accept_camel_case() {
    let scores: ExternalScores = serde_json::from_value(json!({
        "bertScore": { "precision": "90.10", "recall": "89.00", "f1": "89.55" },
        "comet": "0.8512",
        "cometQE": "Error",
        "llm": { "score": 8, "fluency": 9, "adequacy": "N/A", "feedback": "Good" }
    }))
    .unwrap();

    assert_eq!(scores.bert_f1(), MetricValue::Value(89.55));
    assert_eq!(scores.comet, MetricValue::Value(0.8512));
    assert!(matches!(scores.comet_qe, MetricValue::Errored(_)));

    let judgement = scores.llm.unwrap();
    assert_eq!(judgement.overall, MetricValue::Value(8.0));
    assert_eq!(judgement.adequacy, MetricValue::Unavailable);
    assert_eq!(judgement.feedback, "Good");
}
