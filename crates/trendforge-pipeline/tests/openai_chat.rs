//! Integration tests for `OpenAiChatModel` using wiremock HTTP mocks.

use trendforge_core::TrendBundle;
use trendforge_pipeline::{
    LanguageModel, LlmError, OpenAiChatModel, Pipeline, PipelineSettings, PromptSet,
};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn model(server: &MockServer) -> OpenAiChatModel {
    OpenAiChatModel::with_base_url("sk-test", 30, &format!("{}/v1", server.uri()))
        .expect("client construction should not fail")
        .with_model("gpt-4o-mini")
        .with_temperature(0.2)
}

fn completion(content: &str) -> serde_json::Value {
    serde_json::json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    })
}

#[tokio::test]
async fn complete_sends_prompt_as_user_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("Authorization", "Bearer sk-test"))
        .and(body_partial_json(serde_json::json!({
            "model": "gpt-4o-mini",
            "messages": [{ "role": "user", "content": "Summarize these trends" }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("Bread is trending.")))
        .expect(1)
        .mount(&server)
        .await;

    let text = model(&server)
        .complete("Summarize these trends")
        .await
        .expect("completion should parse");
    assert_eq!(text, "Bread is trending.");
}

#[tokio::test]
async fn non_success_status_keeps_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
        .mount(&server)
        .await;

    match model(&server).complete("hi").await {
        Err(LlmError::Status { status, body }) => {
            assert_eq!(status, 429);
            assert_eq!(body, "quota exceeded");
        }
        other => panic!("expected Status error, got {other:?}"),
    }
}

#[tokio::test]
async fn error_payload_is_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "error": { "message": "model overloaded", "type": "server_error" }
        })))
        .mount(&server)
        .await;

    let err = model(&server).complete("hi").await.unwrap_err();
    assert!(matches!(err, LlmError::Api(ref msg) if msg == "model overloaded"), "got {err:?}");
}

#[tokio::test]
async fn no_choices_is_empty_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "choices": [] })))
        .mount(&server)
        .await;

    let err = model(&server).complete("hi").await.unwrap_err();
    assert!(matches!(err, LlmError::EmptyResponse), "got {err:?}");
}

#[tokio::test]
async fn garbage_body_is_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    let err = model(&server).complete("hi").await.unwrap_err();
    assert!(matches!(err, LlmError::Deserialize { .. }), "got {err:?}");
}

#[tokio::test]
async fn full_pipeline_over_http_makes_four_calls() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(completion("1. Same answer every time")),
        )
        .expect(4)
        .mount(&server)
        .await;

    let pipeline = Pipeline::new(model(&server), PromptSet::default(), PipelineSettings::default());
    let trends = TrendBundle {
        reddit_text: "Reddit trends unavailable.".to_string(),
        google_text: "- sourdough".to_string(),
        youtube_text: "YouTube trends unavailable.".to_string(),
    };

    let result = pipeline
        .run_with_trends(&trends, "Home baking")
        .await
        .expect("pipeline should succeed");

    assert_eq!(result.trend_summary, "1. Same answer every time");
    assert_eq!(result.content_plan, vec!["Same answer every time"]);
    assert_eq!(result.optimized_titles, vec!["Same answer every time"]);
    assert_eq!(result.thumbnail_ideas, vec!["Same answer every time"]);
}
