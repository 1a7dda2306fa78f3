use quizzify::clients::{
    ClaudeClient, ClaudeConfig, ClientType, DeepSeekClient, DeepSeekConfig, FlexibleClient,
    MockResponse, MockVoid,
};
use quizzify::core::LowLevelClient;
use quizzify::error::{AIError, ClaudeError, DeepSeekError};
use std::str::FromStr;

#[test]
fn client_type_parsing() {
    assert!(matches!(ClientType::from_str("claude"), Ok(ClientType::Claude)));
    assert!(matches!(ClientType::from_str("CLAUDE"), Ok(ClientType::Claude)));
    assert!(matches!(ClientType::from_str("deepseek"), Ok(ClientType::DeepSeek)));
    assert!(matches!(ClientType::from_str("mock"), Ok(ClientType::Mock)));
    assert!(ClientType::from_str("invalid").is_err());
}

#[tokio::test]
async fn mock_serves_replies_in_order_then_errors() {
    let (client, handle) = FlexibleClient::mock_with_responses(vec![
        MockResponse::text("first"),
        MockResponse::Error("second failed".into()),
    ]);

    assert_eq!(client.ask_raw("p1".into()).await.unwrap(), "first");
    assert!(matches!(client.ask_raw("p2".into()).await, Err(AIError::Mock(_))));
    assert!(matches!(client.ask_raw("p3".into()).await, Err(AIError::Mock(_))));

    assert_eq!(handle.call_count(), 3);
    assert_eq!(handle.prompts(), vec!["p1", "p2", "p3"]);
}

#[tokio::test]
async fn clones_share_the_script() {
    let (client, handle) = FlexibleClient::mock();
    let copy = client.clone_box();
    handle.add_response(MockResponse::text("shared"));

    assert_eq!(copy.ask_raw("p".into()).await.unwrap(), "shared");
    assert_eq!(handle.call_count(), 1);
}

#[tokio::test]
async fn swap_replaces_the_inner_client() {
    let (client, _handle) = FlexibleClient::mock();
    client.swap(Box::new(MockVoid));
    assert_eq!(client.ask_raw("p".into()).await.unwrap(), "{}");
}

#[tokio::test]
async fn claude_without_a_key_fails_before_any_request() {
    let client = ClaudeClient::with_api_key(String::new());
    assert!(matches!(
        client.ask_raw("p".into()).await,
        Err(AIError::Claude(ClaudeError::Authentication))
    ));

    let config = ClaudeConfig {
        api_key: String::new(),
        ..ClaudeConfig::default()
    }
    .with_model("claude-3-5-sonnet-latest");
    let client = ClaudeClient::new(config);
    assert_eq!(client.config().model, "claude-3-5-sonnet-latest");
    assert_eq!(client.config().max_tokens, 400);
}

#[tokio::test]
async fn deepseek_without_a_key_fails_before_any_request() {
    let config = DeepSeekConfig {
        api_key: String::new(),
        ..DeepSeekConfig::default()
    }
    .with_model("deepseek-reasoner");
    let client = DeepSeekClient::new(config);
    assert_eq!(client.config().model, "deepseek-reasoner");
    assert!(matches!(
        client.ask_raw("p".into()).await,
        Err(AIError::DeepSeek(DeepSeekError::Authentication))
    ));
}
