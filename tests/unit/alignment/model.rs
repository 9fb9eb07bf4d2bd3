use super::*;

const GENTLE_SAMPLE: &str = r#"{
  "transcript": "Hello there",
  "words": [
    {
      "alignedWord": "hello",
      "case": "success",
      "end": 0.62,
      "endOffset": 5,
      "phones": [
        {"duration": 0.09, "phone": "hh_B"},
        {"duration": 0.05, "phone": "ah_I"},
        {"duration": 0.08, "phone": "l_I"},
        {"duration": 0.12, "phone": "ow_E"}
      ],
      "start": 0.28,
      "startOffset": 0,
      "word": "Hello"
    },
    {
      "case": "not-found-in-audio",
      "endOffset": 11,
      "startOffset": 6,
      "word": "there"
    }
  ]
}"#;

#[test]
fn parses_gentle_output_and_ignores_unknown_fields() {
    let a = Alignment::from_json_str(GENTLE_SAMPLE).unwrap();
    assert_eq!(a.transcript.as_deref(), Some("Hello there"));
    assert_eq!(a.words.len(), 2);

    let hello = &a.words[0];
    assert_eq!(hello.word, "Hello");
    assert_eq!(hello.start, Some(0.28));
    assert_eq!(hello.end, Some(0.62));
    assert_eq!(hello.phones.len(), 4);
    assert!(!hello.is_not_found_in_audio());
    assert!((hello.phones_duration() - 0.34).abs() < 1e-9);

    let there = &a.words[1];
    assert_eq!(there.start, None);
    assert!(there.phones.is_empty());
    assert!(there.is_not_found_in_audio());
}

#[test]
fn base_symbol_strips_position_tag() {
    let p = AlignedPhone {
        phone: "ah_I".to_string(),
        duration: 0.1,
    };
    assert_eq!(p.base_symbol(), "ah");

    let bare = AlignedPhone {
        phone: "sil".to_string(),
        duration: 0.1,
    };
    assert_eq!(bare.base_symbol(), "sil");
}

#[test]
fn malformed_json_is_a_serde_error() {
    let err = Alignment::from_json_str("{\"words\": [").unwrap_err();
    assert!(matches!(err, StickcastError::Serde(_)));
}
