use std::time::Duration;

use anyhow::{Error, Result};
use async_trait::async_trait;
use erased_serde;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub enum Role {
    #[serde(rename = "system")]
    System,
    #[serde(rename = "assistant")]
    Assistant,
    #[serde(rename = "user")]
    User,
    #[serde(rename = "tool")]
    Tool,
}

// Object {
//     "content": Null,
//     "refusal": Null,
//     "role": String("assistant"),
//     "tool_calls": Array [
//         Object {
//             "function": Object {
//                 "arguments": String("{\"selector\":\"#submit\"}"),
//                 "name": String("click")
//             },
//             "id": String("call_KCg5V0N5E7hHHrUwdefHBfgL"),
//             "type": String("function")
//         }
//     ]
// }
#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct FunctionCallFn {
    pub arguments: String,
    pub name: String,
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct FunctionCall {
    pub function: FunctionCallFn,
    pub id: String,
    pub r#type: String,
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct Message {
    role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    refusal: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<FunctionCall>>,
}

impl Message {
    pub fn new(role: Role, content: &str) -> Self {
        Message {
            role,
            refusal: None,
            content: Some(content.to_string()),
            tool_call_id: None,
            tool_calls: None,
        }
    }

    /// The assistant message that requested one or more tool
    /// calls. Any text content that arrived alongside the calls is
    /// preserved so the next round sees it.
    pub fn new_tool_call_request(content: Option<&str>, tool_calls: Vec<FunctionCall>) -> Self {
        Message {
            role: Role::Assistant,
            refusal: None,
            content: content.map(|c| c.to_string()),
            tool_call_id: None,
            tool_calls: Some(tool_calls),
        }
    }

    pub fn new_tool_call_response(content: &str, tool_call_id: &str) -> Self {
        Message {
            role: Role::Tool,
            refusal: None,
            content: Some(content.to_string()),
            tool_call_id: Some(tool_call_id.to_string()),
            tool_calls: None,
        }
    }

    pub fn role(&self) -> &Role {
        &self.role
    }
}

#[derive(Serialize)]
pub struct Property {
    pub r#type: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub r#enum: Option<Vec<String>>,
}

#[derive(Serialize)]
pub struct Parameters<Props: Serialize> {
    pub r#type: String,
    pub properties: Props,
    pub required: Vec<String>,
    #[serde(rename = "additionalProperties")]
    pub additional_properties: bool,
}

#[derive(Serialize)]
pub struct Function<Props: Serialize> {
    pub name: String,
    pub description: String,
    pub parameters: Parameters<Props>,
    pub strict: bool,
}

#[derive(Serialize)]
pub enum ToolType {
    #[serde(rename = "function")]
    Function,
}

// In order to pass around a collection of tool structs that can be
// dynamically dispatched using this trait, the trait object needs to
// implement `Serialize` but `serde` is not object safe so it will
// cause a compile error. Instead, we need to use `erased_serde` which
// _is_ object safe and can be used along with dynamic dispatch such
// that the calls to `serde_json` won't complain.
#[async_trait]
pub trait ToolCall: erased_serde::Serialize {
    /// Invoke the tool with the raw JSON-encoded arguments from the
    /// model. Implementations decode and validate the arguments
    /// before doing anything else.
    async fn call(&self, args: &str) -> Result<String, Error>;
    fn function_name(&self) -> String;
    /// Human readable, shown in the transcript while the tool runs.
    fn description(&self) -> String;
}
erased_serde::serialize_trait_object!(ToolCall);

pub type BoxedToolCall = Box<dyn ToolCall + Send + Sync + 'static>;

pub async fn completion(
    messages: &Vec<Message>,
    tools: Option<&[BoxedToolCall]>,
    api_hostname: &str,
    api_key: &str,
    model: &str,
) -> Result<Value, Error> {
    let mut payload = json!({
        "model": model,
        "messages": messages,
    });
    if let Some(tools) = tools {
        payload["tools"] = json!(tools);
        payload["tool_choice"] = json!("auto");
    }
    let url = format!("{}/v1/chat/completions", api_hostname.trim_end_matches("/"));
    let response = reqwest::Client::new()
        .post(url)
        .bearer_auth(api_key)
        .header("Content-Type", "application/json")
        .header("X-Title", "webpilot")
        .timeout(Duration::from_secs(60 * 10))
        .json(&payload)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_string(&Role::System).unwrap(), r#""system""#);
        assert_eq!(
            serde_json::to_string(&Role::Assistant).unwrap(),
            r#""assistant""#
        );
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), r#""user""#);
        assert_eq!(serde_json::to_string(&Role::Tool).unwrap(), r#""tool""#);
    }

    #[test]
    fn test_message_new() {
        let msg = Message::new(Role::User, "How many links are on this page?");
        assert_eq!(
            serde_json::to_string(&msg).unwrap(),
            r#"{"role":"user","content":"How many links are on this page?"}"#
        );
    }

    #[test]
    fn test_message_new_tool_call_request() {
        let tool_calls = vec![FunctionCall {
            function: FunctionCallFn {
                arguments: r#"{"verbose":false}"#.to_string(),
                name: "take_snapshot".to_string(),
            },
            id: "call_test123".to_string(),
            r#type: "function".to_string(),
        }];

        let msg = Message::new_tool_call_request(None, tool_calls);
        assert_eq!(
            serde_json::to_string(&msg).unwrap(),
            r#"{"role":"assistant","tool_calls":[{"function":{"arguments":"{\"verbose\":false}","name":"take_snapshot"},"id":"call_test123","type":"function"}]}"#
        );
    }

    #[test]
    fn test_message_new_tool_call_request_with_content() {
        let tool_calls = vec![FunctionCall {
            function: FunctionCallFn {
                arguments: "{}".to_string(),
                name: "take_snapshot".to_string(),
            },
            id: "call_test456".to_string(),
            r#type: "function".to_string(),
        }];

        let msg = Message::new_tool_call_request(Some("Let me check the page."), tool_calls);
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "assistant");
        assert_eq!(json["content"], "Let me check the page.");
        assert!(json["tool_calls"].is_array());
    }

    #[test]
    fn test_message_new_tool_call_response() {
        let msg = Message::new_tool_call_response("Clicked element", "call_test123");
        assert_eq!(
            serde_json::to_string(&msg).unwrap(),
            r#"{"role":"tool","content":"Clicked element","tool_call_id":"call_test123"}"#
        );
    }

    #[test]
    fn test_property_serialization() {
        let prop = Property {
            r#type: "string".to_string(),
            description: "CSS selector of the element".to_string(),
            r#enum: None,
        };
        assert_eq!(
            serde_json::to_string(&prop).unwrap(),
            r#"{"type":"string","description":"CSS selector of the element"}"#
        );
    }

    #[test]
    fn test_property_with_enum_serialization() {
        let prop = Property {
            r#type: "string".to_string(),
            description: "The kind of navigation".to_string(),
            r#enum: Some(vec![
                "url".to_string(),
                "back".to_string(),
                "forward".to_string(),
                "reload".to_string(),
            ]),
        };
        let json = serde_json::to_value(&prop).unwrap();
        assert_eq!(json["enum"].as_array().unwrap().len(), 4);
        assert_eq!(json["enum"][0], "url");
    }

    #[test]
    fn test_parameters_serialization() {
        let props =
            serde_json::json!({"selector": {"type": "string", "description": "CSS selector"}});
        let params = Parameters {
            r#type: "object".to_string(),
            properties: props,
            required: vec!["selector".to_string()],
            additional_properties: false,
        };
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json["type"], "object");
        assert_eq!(json["required"].as_array().unwrap()[0], "selector");
        assert_eq!(json["additionalProperties"], false);
    }

    #[test]
    fn test_function_serialization() {
        let props =
            serde_json::json!({"selector": {"type": "string", "description": "CSS selector"}});
        let params = Parameters {
            r#type: "object".to_string(),
            properties: props,
            required: vec!["selector".to_string()],
            additional_properties: false,
        };
        let func = Function {
            name: "click".to_string(),
            description: "Click an element matching a CSS selector".to_string(),
            parameters: params,
            strict: true,
        };
        let json = serde_json::to_value(&func).unwrap();
        assert_eq!(json["name"], "click");
        assert_eq!(
            json["description"],
            "Click an element matching a CSS selector"
        );
    }

    #[tokio::test]
    async fn test_completion_basic() {
        let mut server = mockito::Server::new_async().await;

        let response_body = r#"{
            "id": "chatcmpl-123",
            "object": "chat.completion",
            "created": 1694268190,
            "model": "gpt-5-mini",
            "choices": [{
                "index": 0,
                "message": {
                    "role": "assistant",
                    "content": "Hello!"
                },
                "finish_reason": "stop"
            }]
        }"#;

        let mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(response_body)
            .create();

        let messages = vec![Message::new(Role::User, "Hi")];
        let result = completion(
            &messages,
            None,
            server.url().as_str(),
            "test-key",
            "gpt-5-mini",
        )
        .await;

        mock.assert();
        assert!(result.is_ok());

        let json = result.unwrap();
        assert_eq!(json["choices"][0]["message"]["content"], "Hello!");
    }

    #[tokio::test]
    async fn test_completion_with_tools_sets_tool_choice() {
        let mut server = mockito::Server::new_async().await;

        let response_body = r#"{
            "id": "chatcmpl-123",
            "object": "chat.completion",
            "created": 1694268190,
            "model": "gpt-5-mini",
            "choices": [{
                "index": 0,
                "message": {
                    "role": "assistant",
                    "tool_calls": [{
                        "id": "call_abc123",
                        "type": "function",
                        "function": {
                            "name": "take_snapshot",
                            "arguments": "{\"verbose\":false}"
                        }
                    }]
                },
                "finish_reason": "tool_calls"
            }]
        }"#;

        let mock = server
            .mock("POST", "/v1/chat/completions")
            .match_body(mockito::Matcher::PartialJsonString(
                r#"{"tool_choice": "auto"}"#.to_string(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(response_body)
            .create();

        #[derive(serde::Serialize)]
        struct MockTool;
        #[async_trait]
        impl ToolCall for MockTool {
            async fn call(&self, _args: &str) -> Result<String, Error> {
                Ok("mock result".to_string())
            }
            fn function_name(&self) -> String {
                "take_snapshot".to_string()
            }
            fn description(&self) -> String {
                "Take a snapshot of the page".to_string()
            }
        }

        let messages = vec![Message::new(Role::User, "What's on this page?")];
        let tools = vec![Box::new(MockTool) as BoxedToolCall];

        let result = completion(
            &messages,
            Some(&tools),
            server.url().as_str(),
            "test-key",
            "gpt-5-mini",
        )
        .await;

        mock.assert();
        assert!(result.is_ok());

        let json = result.unwrap();
        assert!(json["choices"][0]["message"]["tool_calls"].is_array());
    }

    #[tokio::test]
    async fn test_completion_error_status() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(401)
            .with_body(r#"{"error": {"message": "Invalid API key"}}"#)
            .create();

        let messages = vec![Message::new(Role::User, "Hi")];
        let result = completion(
            &messages,
            None,
            server.url().as_str(),
            "bad-key",
            "gpt-5-mini",
        )
        .await;

        mock.assert();
        assert!(result.is_err());
    }
}
