use anyhow::{Result, anyhow, bail};
use serde_json::Value;

use super::models::{ChatMessage, ChatRole, Transcript};
use crate::openai::{FunctionCall, FunctionCallFn, Message, Role, completion};
use crate::tools::ToolRegistry;

/// Shown when the endpoint finishes a turn with no text content.
const NO_ANSWER_FALLBACK: &str = "I wasn't able to come up with an answer.";

/// Called with the tool name whenever the model requests a tool that
/// isn't registered. Unknown calls are otherwise dropped silently.
pub type UnknownToolHook = Box<dyn Fn(&str) + Send + Sync>;

/// Drives a chat with an LLM that can run page automation tools,
/// one user turn at a time.
///
/// The session exclusively owns the UI-observable state: the
/// transcript of displayable messages, the loading flag, and an
/// ephemeral error slot. A turn alternates between the chat
/// completion endpoint and locally registered tools until the model
/// stops requesting tool calls, bounded by `max_tool_rounds`.
///
/// Session configuration is fixed at construction; changing the
/// credential or model means building a new session. Only one turn
/// may be in flight at a time and the loading flag is the guard —
/// callers disable new submissions while it is set.
///
/// Use `ChatSession::builder()` to construct a valid `ChatSession`.
pub struct ChatSession {
    api_hostname: String,
    api_key: String,
    model: String,
    system_prompt: String,
    tools: ToolRegistry,
    max_tool_rounds: usize,
    on_unknown_tool: Option<UnknownToolHook>,
    transcript: Transcript,
    error: Option<String>,
    loading: bool,
}

impl ChatSession {
    pub fn builder(api_hostname: &str, api_key: &str, model: &str) -> ChatSessionBuilder {
        ChatSessionBuilder::new(api_hostname, api_key, model)
    }

    pub fn messages(&self) -> &[ChatMessage] {
        self.transcript.messages()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Reset the session: empties the transcript and clears any
    /// previous error. Idempotent.
    pub fn clear_messages(&mut self) {
        self.transcript.clear();
        self.error = None;
    }

    /// Run one user turn from input text to a final assistant answer,
    /// executing any tool calls the model requests along the way.
    ///
    /// Empty input and a missing credential are no-ops. Outcomes are
    /// observed through the session state rather than a return value:
    /// new messages land in the transcript, a turn-fatal failure
    /// lands in the error slot, and the loading flag is cleared
    /// either way. A failed turn keeps whatever was appended before
    /// the failure as prior context for a retry.
    pub async fn submit_user_turn(&mut self, text: &str) {
        let text = text.trim();
        if text.is_empty() || self.api_key.is_empty() {
            return;
        }

        self.error = None;
        self.loading = true;
        self.transcript.push(ChatMessage::new_user(text));

        if let Err(e) = self.run_turn().await {
            tracing::error!("Chat turn failed: {}. Root cause: {}", e, e.root_cause());
            self.error = Some(e.to_string());
        }

        self.loading = false;
    }

    /// The transcript view sent to the remote endpoint: the fixed
    /// system instruction followed by user/assistant messages only.
    /// Tool-result entries are display-only and are not replayed —
    /// tool outputs influence the round that produced them, nothing
    /// later.
    fn wire_context(&self) -> Vec<Message> {
        let mut context = vec![Message::new(Role::System, &self.system_prompt)];
        for m in self.transcript.iter() {
            match m.role {
                ChatRole::User => context.push(Message::new(Role::User, &m.content)),
                ChatRole::Assistant => context.push(Message::new(Role::Assistant, &m.content)),
                ChatRole::ToolResult => {}
            }
        }
        context
    }

    async fn run_turn(&mut self) -> Result<()> {
        let base_context = self.wire_context();
        let tools = if self.tools.is_empty() {
            None
        } else {
            Some(self.tools.entries())
        };

        let mut resp = completion(
            &base_context,
            tools,
            &self.api_hostname,
            &self.api_key,
            &self.model,
        )
        .await?;

        let mut rounds = 0;

        // Tool calls need to be handled for the chat to proceed
        let final_message = loop {
            let message = response_message(&resp)?;
            let tool_calls = match message["tool_calls"].as_array() {
                Some(calls) if !calls.is_empty() => calls.clone(),
                _ => break message,
            };

            rounds += 1;
            if rounds > self.max_tool_rounds {
                bail!(
                    "Reached the maximum number of tool rounds ({})",
                    self.max_tool_rounds
                );
            }

            // Text arriving alongside tool calls is partial reasoning;
            // surface it before the tool results come back
            let content = message["content"].as_str().map(str::to_string);
            if let Some(text) = content.as_deref() {
                if !text.is_empty() {
                    self.transcript.push(ChatMessage::new_assistant(text));
                }
            }

            // Execute the calls sequentially, in the order received,
            // so outcomes stay correlated to call ids and tool-result
            // messages keep their insertion order
            let mut executed: Vec<FunctionCall> = Vec::new();
            let mut outcomes: Vec<Message> = Vec::new();
            for tool_call in tool_calls.iter() {
                let tool_call_id = tool_call["id"]
                    .as_str()
                    .ok_or(anyhow!("Tool call missing ID: {}", tool_call))?;
                let tool_call_function = &tool_call["function"];
                let tool_call_args = tool_call_function["arguments"]
                    .as_str()
                    .ok_or(anyhow!("Tool call missing arguments: {}", tool_call))?;
                let tool_call_name = tool_call_function["name"]
                    .as_str()
                    .ok_or(anyhow!("Tool call missing name: {}", tool_call))?;

                tracing::debug!(
                    "\nTool call: {}\nargs: {}",
                    &tool_call_name,
                    &tool_call_args
                );

                // Unknown tools are dropped without a tool-result
                // message; the endpoint is only ever given known tool
                // names so this path means the model hallucinated one
                let Some(tool) = self.tools.find(tool_call_name) else {
                    tracing::debug!("Skipping unknown tool: {}", tool_call_name);
                    if let Some(hook) = &self.on_unknown_tool {
                        hook(tool_call_name);
                    }
                    continue;
                };

                let outcome = match serde_json::from_str::<Value>(tool_call_args) {
                    Ok(parsed_args) => {
                        // The tool-result message goes in before the
                        // tool runs so the transcript shows progress
                        self.transcript.push(ChatMessage::new_tool_result(
                            &tool.description(),
                            tool_call_name,
                            parsed_args,
                        ));

                        match tool.call(tool_call_args).await {
                            Ok(result) => result,
                            Err(e) => format!("Error: {}", e),
                        }
                    }
                    Err(e) => format!("Error: invalid tool arguments: {}", e),
                };

                executed.push(FunctionCall {
                    function: FunctionCallFn {
                        arguments: tool_call_args.to_string(),
                        name: tool_call_name.to_string(),
                    },
                    id: tool_call_id.to_string(),
                    r#type: String::from("function"),
                });
                outcomes.push(Message::new_tool_call_response(&outcome, tool_call_id));
            }

            // Provide the results of the tool calls back to the chat.
            // Only this round's request/outcome pair rides along; the
            // base context stays fixed for the whole turn.
            let mut next_context = base_context.clone();
            if executed.is_empty() {
                if let Some(text) = content.as_deref() {
                    if !text.is_empty() {
                        next_context.push(Message::new(Role::Assistant, text));
                    }
                }
            } else {
                next_context.push(Message::new_tool_call_request(content.as_deref(), executed));
                next_context.extend(outcomes);
            }

            resp = completion(
                &next_context,
                tools,
                &self.api_hostname,
                &self.api_key,
                &self.model,
            )
            .await?;
        };

        let final_content = match final_message["content"].as_str() {
            Some(text) if !text.is_empty() => text.to_string(),
            _ => NO_ANSWER_FALLBACK.to_string(),
        };
        self.transcript.push(ChatMessage::new_assistant(&final_content));

        Ok(())
    }
}

/// Pull the assistant message out of a completion response. A 200
/// response without `choices[0].message` is malformed and aborts the
/// turn rather than reading as an empty answer.
fn response_message(resp: &Value) -> Result<Value> {
    let message = &resp["choices"][0]["message"];
    if !message.is_object() {
        bail!("Malformed completion response: missing choices[0].message");
    }
    Ok(message.clone())
}

pub struct ChatSessionBuilder {
    api_hostname: String,
    api_key: String,
    model: String,
    system_prompt: String,
    tools: ToolRegistry,
    max_tool_rounds: usize,
    on_unknown_tool: Option<UnknownToolHook>,
}

impl ChatSessionBuilder {
    pub fn new(api_hostname: &str, api_key: &str, model: &str) -> Self {
        Self {
            api_hostname: api_hostname.to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            system_prompt: String::from("You are a helpful assistant."),
            tools: ToolRegistry::new(),
            max_tool_rounds: 8,
            on_unknown_tool: None,
        }
    }

    pub fn system_prompt(mut self, prompt: &str) -> Self {
        self.system_prompt = prompt.to_string();
        self
    }

    pub fn tools(mut self, tools: ToolRegistry) -> Self {
        self.tools = tools;
        self
    }

    pub fn max_tool_rounds(mut self, rounds: usize) -> Self {
        self.max_tool_rounds = rounds;
        self
    }

    pub fn on_unknown_tool(mut self, hook: UnknownToolHook) -> Self {
        self.on_unknown_tool = Some(hook);
        self
    }

    pub fn build(self) -> ChatSession {
        ChatSession {
            api_hostname: self.api_hostname,
            api_key: self.api_key,
            model: self.model,
            system_prompt: self.system_prompt,
            tools: self.tools,
            max_tool_rounds: self.max_tool_rounds,
            on_unknown_tool: self.on_unknown_tool,
            transcript: Transcript::new(),
            error: None,
            loading: false,
        }
    }
}
