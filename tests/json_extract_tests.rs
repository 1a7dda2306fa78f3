use quizzify::json_utils::{parse_cleaned, parse_question, strip_code_fences};
use quizzify::question::RawQuestion;
use serde_json::Value;

const BARE: &str = r#"{
    "question": "What gas do plants absorb?",
    "choices": [
        {"key": "A", "value": "Oxygen"},
        {"key": "B", "value": "Carbon dioxide"},
        {"key": "C", "value": "Nitrogen"},
        {"key": "D", "value": "Helium"}
    ],
    "answer": "B",
    "explanation": "Plants take in carbon dioxide for photosynthesis."
}"#;

#[test]
fn fenced_and_bare_parse_the_same() {
    let fenced = format!("```json\n{}\n```", BARE);
    let from_fenced: Value = parse_cleaned(&fenced).unwrap();
    let from_bare: Value = serde_json::from_str(BARE).unwrap();
    assert_eq!(from_fenced, from_bare);

    assert_eq!(parse_question(&fenced).unwrap(), parse_question(BARE).unwrap());
}

#[test]
fn strips_every_fence_marker() {
    assert_eq!(strip_code_fences("```json{\"a\":1}```"), "{\"a\":1}");
    assert_eq!(strip_code_fences("  ```\n{}\n```  "), "{}");
    assert_eq!(strip_code_fences("no fences"), "no fences");
}

#[test]
fn other_languages_keep_their_tag() {
    // Only the json tag is removed; the bare fence around it goes too.
    assert_eq!(strip_code_fences("```python\nx\n```"), "python\nx");
}

#[test]
fn parses_a_full_question() {
    let raw = parse_question(BARE).unwrap();
    let question = raw.into_question().unwrap();
    assert_eq!(question.question, "What gas do plants absorb?");
    assert_eq!(question.choices.len(), 4);
    assert_eq!(question.choice("b").unwrap().value, "Carbon dioxide");
    assert!(question.is_correct(" b "));
    assert!(question.is_well_formed());
    assert_eq!(question.choices[1].to_string(), "B) Carbon dioxide");
}

#[test]
fn missing_fields_decode_with_defaults() {
    let raw: RawQuestion = parse_question(r#"{"answer": "A"}"#).unwrap();
    assert_eq!(raw.question, None);
    assert!(raw.choices.is_empty());
    assert!(raw.into_question().is_none());
}

#[test]
fn malformed_text_is_an_error() {
    assert!(parse_question("Sure! Here is your question: ...").is_err());
    assert!(parse_question("```json\n{\"question\": \"unterminated\n```").is_err());
    assert!(parse_question("").is_err());
}
