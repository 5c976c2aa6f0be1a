//! Mock Provider Tests
//!
//! Verifies the `Provider` trait can be mocked and consumed through a
//! trait object, the way the orchestrator consumes it.

use async_trait::async_trait;
use campusbuddy_provider::{
    ChatParams, ChatResponse, Message, Provider, ProviderError, ToolCall,
};
use mockall::mock;
use serde_json::json;

mock! {
    pub Provider {}

    #[async_trait]
    impl Provider for Provider {
        async fn chat(&self, params: ChatParams) -> Result<ChatResponse, ProviderError>;
        fn default_model(&self) -> String;
        fn is_configured(&self) -> bool;
    }
}

#[tokio::test]
async fn mock_chat_returns_final_text() {
    let mut mock = MockProvider::new();

    mock.expect_chat()
        .times(1)
        .returning(|_| Ok(ChatResponse::text("Your next class is at 9am.")));

    let response = mock.chat(ChatParams::default()).await.unwrap();

    assert_eq!(
        response.content,
        Some("Your next class is at 9am.".to_string())
    );
    assert!(!response.has_tool_calls());
}

#[tokio::test]
async fn mock_chat_returns_tool_requests() {
    let mut mock = MockProvider::new();

    mock.expect_chat()
        .times(1)
        .withf(|params| params.messages.len() == 1 && params.messages[0].role == "user")
        .returning(|_| {
            Ok(ChatResponse::tool_requests(vec![ToolCall {
                id: "call_1".to_string(),
                name: "get_profile".to_string(),
                arguments: json!({}),
            }]))
        });

    let params = ChatParams {
        messages: vec![Message::user("What's my WAM?")],
        ..ChatParams::default()
    };

    let response = mock.chat(params).await.unwrap();

    assert!(response.has_tool_calls());
    assert_eq!(response.tool_calls[0].name, "get_profile");
}

#[tokio::test]
async fn mock_chat_upstream_failures() {
    let mut mock = MockProvider::new();

    mock.expect_chat()
        .times(1)
        .returning(|_| Err(ProviderError::RateLimited));
    assert!(matches!(
        mock.chat(ChatParams::default()).await,
        Err(ProviderError::RateLimited)
    ));

    let mut mock = MockProvider::new();
    mock.expect_chat()
        .times(1)
        .returning(|_| Err(ProviderError::Api("upstream down".to_string())));
    match mock.chat(ChatParams::default()).await {
        Err(ProviderError::Api(msg)) => assert_eq!(msg, "upstream down"),
        other => panic!("expected Api error, got {:?}", other),
    }
}

// A consumer holding the provider as a trait object, like the orchestrator.
struct ProviderConsumer {
    provider: Box<dyn Provider>,
}

impl ProviderConsumer {
    async fn send(&self, message: &str) -> Result<String, ProviderError> {
        let params = ChatParams {
            model: "test-model".to_string(),
            messages: vec![Message::user(message)],
            ..ChatParams::default()
        };

        let response = self.provider.chat(params).await?;
        Ok(response.content.unwrap_or_default())
    }
}

#[tokio::test]
async fn mock_provider_behind_trait_object() {
    let mut mock = MockProvider::new();

    mock.expect_chat()
        .times(1)
        .returning(|_| Ok(ChatResponse::text("Done.")));

    let consumer = ProviderConsumer {
        provider: Box::new(mock),
    };

    let result = consumer.send("hello").await.unwrap();
    assert_eq!(result, "Done.");
}
