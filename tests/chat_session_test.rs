//! End-to-end turn against the full tool registry: a question about
//! the page triggers a snapshot, the snapshot payload feeds the next
//! completion, and the final answer lands in the transcript.
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{Value, json};

use webpilot::chat::{ChatRole, ChatSession};
use webpilot::relay::{Relay, RelayResponse};
use webpilot::tools::page_tools;

struct FakePageService {
    response: RelayResponse,
    sent: Mutex<Vec<(String, Value)>>,
}

impl FakePageService {
    fn new(response: RelayResponse) -> Self {
        Self {
            response,
            sent: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl Relay for FakePageService {
    async fn send(&self, action: &str, params: Value) -> RelayResponse {
        self.sent
            .lock()
            .unwrap()
            .push((action.to_string(), params));
        self.response.clone()
    }
}

const SNAPSHOT_TOOL_CALL_RESPONSE: &str = r#"{
    "id": "chatcmpl-1",
    "object": "chat.completion",
    "created": 1694268190,
    "model": "gpt-5-mini",
    "choices": [{
        "index": 0,
        "message": {
            "role": "assistant",
            "content": null,
            "tool_calls": [{
                "id": "call_snapshot_1",
                "type": "function",
                "function": {
                    "name": "take_snapshot",
                    "arguments": "{\"verbose\": false}"
                }
            }]
        },
        "finish_reason": "tool_calls"
    }]
}"#;

const FINAL_ANSWER_RESPONSE: &str = r#"{
    "id": "chatcmpl-2",
    "object": "chat.completion",
    "created": 1694268191,
    "model": "gpt-5-mini",
    "choices": [{
        "index": 0,
        "message": {
            "role": "assistant",
            "content": "There are 7 links on this page."
        },
        "finish_reason": "stop"
    }]
}"#;

#[tokio::test]
async fn test_question_about_the_page_snapshots_then_answers() {
    let mut server = mockito::Server::new_async().await;

    let first = server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(SNAPSHOT_TOOL_CALL_RESPONSE)
        .create();

    // The follow-up request must carry the snapshot payload as the
    // tool outcome, correlated to the call id
    let second = server
        .mock("POST", "/v1/chat/completions")
        .match_body(mockito::Matcher::Regex(
            r#""role":"tool","content":"\{\\"linksCount\\":7\}","tool_call_id":"call_snapshot_1""#
                .to_string(),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(FINAL_ANSWER_RESPONSE)
        .create();

    let page = Arc::new(FakePageService::new(RelayResponse::Success(
        json!({"linksCount": 7}),
    )));

    let mut session = ChatSession::builder(&server.url(), "test-key", "gpt-5-mini")
        .system_prompt("You are a helpful assistant.")
        .tools(page_tools(page.clone()))
        .build();

    session
        .submit_user_turn("How many links are on this page?")
        .await;

    first.assert();
    second.assert();

    // The snapshot request reached the page service
    let sent = page.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, "take_snapshot");
    assert_eq!(sent[0].1, json!({"verbose": false}));
    drop(sent);

    // Transcript: question, snapshot progress entry, final answer
    let messages = session.messages();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[0].role, ChatRole::User);
    assert_eq!(messages[0].content, "How many links are on this page?");
    assert_eq!(messages[1].role, ChatRole::ToolResult);
    assert_eq!(messages[1].tool_name.as_deref(), Some("take_snapshot"));
    assert_eq!(messages[1].tool_args, Some(json!({"verbose": false})));
    assert_eq!(messages[2].role, ChatRole::Assistant);
    assert_eq!(messages[2].content, "There are 7 links on this page.");

    assert!(session.error().is_none());
    assert!(!session.is_loading());
}

#[tokio::test]
async fn test_unreachable_page_service_surfaces_as_a_tool_outcome() {
    let mut server = mockito::Server::new_async().await;

    let _first = server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(SNAPSHOT_TOOL_CALL_RESPONSE)
        .create();

    let second = server
        .mock("POST", "/v1/chat/completions")
        .match_body(mockito::Matcher::Regex(
            r#""role":"tool","content":"\{\\"error\\":\\"Page service unreachable: connection refused\\"\}""#
                .to_string(),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(FINAL_ANSWER_RESPONSE)
        .create();

    let page = Arc::new(FakePageService::new(RelayResponse::Failure(
        "Page service unreachable: connection refused".to_string(),
    )));

    let mut session = ChatSession::builder(&server.url(), "test-key", "gpt-5-mini")
        .tools(page_tools(page))
        .build();

    session
        .submit_user_turn("How many links are on this page?")
        .await;

    second.assert();
    // The relay failure never aborts the turn
    assert!(session.error().is_none());
    assert_eq!(
        session.messages().last().unwrap().content,
        "There are 7 links on this page."
    );
}
