
use quizzify::clients::{MockClient, MockResponse, MockVoid};
use quizzify::config::{GeneratorConfig, ValidationMode, DEFAULT_TOPIC};
use quizzify::error::{AIError, QuizError};
use quizzify::generator::{AttemptOutcome, RejectReason};
use quizzify::interceptors::FileInterceptor;
use quizzify::question::RawQuestion;
use quizzify::retrieval::PassageStore;
use quizzify::QuizGenerator;
use std::sync::Arc;
use std::time::Duration;
use test_utils::{fenced, question_json, scripted_generator, FailingRetriever, StaticRetriever};

#[test]
fn rejects_more_than_ten_questions() {
    let result = QuizGenerator::new(Some("Rust"), 11, None);
    assert!(matches!(result, Err(QuizError::Configuration(_))));

    let generator = QuizGenerator::new(Some("Rust"), 10, None).unwrap();
    assert_eq!(generator.num_questions(), 10);
}

#[test]
fn blank_topic_defaults_to_general_knowledge() {
    for topic in [None, Some(""), Some("   ")] {
        let generator = QuizGenerator::new(topic, 1, None).unwrap();
        assert_eq!(generator.topic(), DEFAULT_TOPIC);
    }
    let generator = QuizGenerator::new(Some("Volcanoes"), 1, None).unwrap();
    assert_eq!(generator.topic(), "Volcanoes");
}

#[tokio::test]
async fn generate_one_requires_client_and_retriever() {
    let retriever = StaticRetriever::new(&["x"]);
    let no_client = QuizGenerator::new(Some("t"), 1, Some(Box::new(retriever))).unwrap();
    assert!(matches!(no_client.generate_one().await, Err(QuizError::NotInitialized(_))));

    let no_retriever = QuizGenerator::new(Some("t"), 1, None).unwrap().with_client(MockVoid);
    assert!(matches!(no_retriever.generate_one().await, Err(QuizError::NotInitialized(_))));
}

#[tokio::test]
async fn generate_quiz_aborts_only_when_not_initialized() {
    let mut generator = QuizGenerator::new(Some("t"), 3, None).unwrap().with_client(MockVoid);
    assert!(matches!(generator.generate_quiz().await, Err(QuizError::NotInitialized(_))));
}

#[tokio::test]
async fn empty_retrieval_is_no_context() {
    let generator = QuizGenerator::new(Some("t"), 1, Some(Box::new(StaticRetriever::new(&[]))))
        .unwrap()
        .with_client(MockVoid);
    assert!(matches!(generator.generate_one().await, Err(QuizError::NoContext(_))));

    let failing = QuizGenerator::new(Some("t"), 1, Some(Box::new(FailingRetriever)))
        .unwrap()
        .with_client(MockVoid);
    assert!(matches!(failing.generate_one().await, Err(QuizError::NoContext(_))));
}

#[tokio::test]
async fn prompt_carries_topic_and_space_joined_context() {
    let responses = vec![MockResponse::text("raw reply")];
    let (generator, handle) = scripted_generator(1, responses, GeneratorConfig::default());

    let raw = generator.generate_one().await.unwrap();
    assert_eq!(raw, "raw reply");

    let prompts = handle.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0]
        .starts_with("You are a subject matter expert on the topic: Photosynthesis\n"));
    assert!(prompts[0].contains("Context: Plants make sugar. Light drives photosynthesis.\n"));
}

#[tokio::test]
async fn raw_reply_is_returned_unmodified() {
    let reply = fenced(&question_json("Q1"));
    let responses = vec![MockResponse::Text(reply.clone())];
    let (generator, _handle) = scripted_generator(1, responses, GeneratorConfig::default());
    assert_eq!(generator.generate_one().await.unwrap(), reply);
}

#[tokio::test]
async fn client_errors_become_generation_errors() {
    let responses = vec![MockResponse::Error("boom".into())];
    let (generator, _handle) = scripted_generator(1, responses, GeneratorConfig::default());
    match generator.generate_one().await {
        Err(QuizError::Generation(AIError::Mock(msg))) => assert_eq!(msg, "boom"),
        other => panic!("expected generation error, got {:?}", other),
    }
}

#[tokio::test]
async fn slow_client_times_out() {
    let config = GeneratorConfig::default().with_timeout(Duration::from_millis(20));
    let (generator, _handle) = scripted_generator(
        1,
        vec![MockResponse::Delayed(Duration::from_secs(5), question_json("late"))],
        config,
    );
    assert!(matches!(
        generator.generate_one().await,
        Err(QuizError::Generation(AIError::Timeout(_)))
    ));
}

#[tokio::test]
async fn makes_exactly_count_attempts_whatever_the_outcome() {
    let responses = vec![
        MockResponse::Text(question_json("Q1")),
        MockResponse::text("definitely not json"),
        MockResponse::Text(question_json("Q1")),
        MockResponse::Error("provider down".into()),
        MockResponse::Text(fenced(&question_json("Q2"))),
        MockResponse::text(r#"{"choices": [], "answer": "A"}"#),
    ];
    let (mut generator, handle) = scripted_generator(6, responses, GeneratorConfig::default());

    let report = generator.generate_quiz_report().await.unwrap();
    assert_eq!(handle.call_count(), 6);
    assert_eq!(report.attempts(), 6);
    assert_eq!(report.accepted(), 2);

    let texts: Vec<&str> = report.bank.iter().map(|q| q.question.as_str()).collect();
    assert_eq!(texts, vec!["Q1", "Q2"]);

    assert!(matches!(report.outcomes[0], AttemptOutcome::Accepted));
    assert!(matches!(report.outcomes[1], AttemptOutcome::Unparseable(_)));
    assert!(matches!(report.outcomes[2], AttemptOutcome::Rejected(RejectReason::Duplicate)));
    assert!(matches!(report.outcomes[3], AttemptOutcome::Failed(QuizError::Generation(_))));
    assert!(matches!(report.outcomes[4], AttemptOutcome::Accepted));
    assert!(matches!(report.outcomes[5], AttemptOutcome::Rejected(RejectReason::MissingQuestion)));
}

#[tokio::test]
async fn all_failures_yield_an_empty_bank() {
    let responses = vec![MockResponse::text("nope"), MockResponse::text("```json\n{oops\n```")];
    let (mut generator, handle) = scripted_generator(2, responses, GeneratorConfig::default());

    let bank = generator.generate_quiz().await.unwrap();
    assert!(bank.is_empty());
    assert_eq!(handle.call_count(), 2);
}

#[tokio::test]
async fn zero_questions_makes_no_calls() {
    let (mut generator, handle) = scripted_generator(0, vec![], GeneratorConfig::default());
    let bank = generator.generate_quiz().await.unwrap();
    assert!(bank.is_empty());
    assert_eq!(handle.call_count(), 0);
}

#[tokio::test]
async fn each_round_starts_from_an_empty_bank() {
    let responses = vec![
        MockResponse::Text(question_json("Q1")),
        MockResponse::Text(question_json("Q1")),
    ];
    let (mut generator, _handle) = scripted_generator(1, responses, GeneratorConfig::default());

    assert_eq!(generator.generate_quiz().await.unwrap().len(), 1);
    let second = generator.generate_quiz().await.unwrap();
    assert_eq!(second.len(), 1);
    assert_eq!(second[0].question, "Q1");
}

#[test]
fn validate_rejects_duplicate_and_missing_question() {
    let (mut generator, _handle) = scripted_generator(1, vec![], GeneratorConfig::default());
    assert!(generator.process_response(&question_json("Q1")).is_accepted());

    let duplicate: RawQuestion = serde_json::from_str(&question_json("Q1")).unwrap();
    assert!(!generator.validate(&duplicate));
    assert!(matches!(
        generator.process_response(&question_json("Q1")),
        AttemptOutcome::Rejected(RejectReason::Duplicate)
    ));
    assert_eq!(generator.question_bank().len(), 1);

    let different_case: RawQuestion = serde_json::from_str(&question_json("q1")).unwrap();
    assert!(generator.validate(&different_case));

    assert!(!generator.validate(&RawQuestion::default()));
}

#[test]
fn lenient_mode_accepts_odd_choice_sets() {
    let (mut generator, _handle) = scripted_generator(1, vec![], GeneratorConfig::default());
    let odd = r#"{"question": "Odd", "choices": [{"key": "X", "value": "only"}], "answer": "Z"}"#;
    assert!(generator.process_response(odd).is_accepted());
}

#[test]
fn strict_mode_requires_abcd_and_a_matching_answer() {
    let config = GeneratorConfig::default().with_validation(ValidationMode::Strict);
    let (mut generator, _handle) = scripted_generator(1, vec![], config);

    let odd = r#"{"question": "Odd", "choices": [{"key": "X", "value": "only"}], "answer": "Z"}"#;
    assert!(matches!(
        generator.process_response(odd),
        AttemptOutcome::Rejected(RejectReason::Malformed)
    ));

    let bad_answer = question_json("Bad answer").replace("\"answer\":\"B\"", "\"answer\":\"E\"");
    assert!(matches!(
        generator.process_response(&bad_answer),
        AttemptOutcome::Rejected(RejectReason::Malformed)
    ));

    let no_answer = question_json("No answer").replace("\"answer\":\"B\"", "\"answer\":\"\"");
    assert!(matches!(
        generator.process_response(&no_answer),
        AttemptOutcome::Rejected(RejectReason::Malformed)
    ));

    assert!(generator.process_response(&question_json("Good")).is_accepted());
    let labelled = question_json("Labelled").replace("\"answer\":\"B\"", "\"answer\":\"B)\"");
    assert!(generator.process_response(&labelled).is_accepted());
    assert_eq!(generator.question_bank().len(), 2);
}

#[tokio::test]
async fn interceptor_receives_prompt_and_reply() {
    let dir = tempfile::tempdir().unwrap();
    let (client, _handle) =
        MockClient::with_responses(vec![MockResponse::Text(question_json("Saved"))]);
    let retriever = StaticRetriever::new(&["ctx"]);
    let mut generator = QuizGenerator::new(Some("Rust"), 1, Some(Box::new(retriever)))
        .unwrap()
        .with_client(client)
        .with_interceptor(Arc::new(FileInterceptor::new(dir.path().to_path_buf())));

    let bank = generator.generate_quiz().await.unwrap();
    assert_eq!(bank.len(), 1);

    let files: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(files.len(), 1);
    let content = std::fs::read_to_string(files[0].as_ref().unwrap().path()).unwrap();
    assert!(content.contains("# Prompt"));
    assert!(content.contains("topic: Rust"));
    assert!(content.contains("\"question\":\"Saved\""));
}

#[tokio::test]
async fn default_topic_still_draws_on_unrelated_documents() {
    let mut store = PassageStore::new();
    store.add("The mitochondria is the powerhouse of the cell.");
    let (client, handle) =
        MockClient::with_responses(vec![MockResponse::Text(question_json("Cells"))]);
    let mut generator = QuizGenerator::new(None, 1, Some(Box::new(store)))
        .unwrap()
        .with_client(client);

    let bank = generator.generate_quiz().await.unwrap();
    assert_eq!(bank.len(), 1);
    assert_eq!(handle.call_count(), 1);
    assert!(handle.prompts()[0].contains("powerhouse of the cell"));
}
