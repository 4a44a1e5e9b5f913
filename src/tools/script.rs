use std::sync::Arc;

use anyhow::{Context, Error, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::openai::{Function, Parameters, Property, ToolCall, ToolType};
use crate::relay::{Relay, RelayResponse};

#[derive(Serialize)]
pub struct EvaluateScriptProps {
    pub function: Property,
    pub args: Property,
}

#[derive(Deserialize)]
pub struct EvaluateScriptArgs {
    pub function: String,
    pub args: Option<Vec<Value>>,
}

#[derive(Serialize)]
pub struct EvaluateScriptTool {
    pub r#type: ToolType,
    pub function: Function<EvaluateScriptProps>,
    #[serde(skip)]
    relay: Arc<dyn Relay>,
}

#[async_trait]
impl ToolCall for EvaluateScriptTool {
    async fn call(&self, args: &str) -> Result<String, Error> {
        let fn_args: EvaluateScriptArgs =
            serde_json::from_str(args).context("Invalid arguments for evaluate_script")?;

        let resp = self
            .relay
            .send(
                "evaluate_script",
                json!({
                    "function": fn_args.function,
                    "args": fn_args.args.unwrap_or_default(),
                }),
            )
            .await;

        // The page reports `{result, success: true}` or
        // `{error, success: false}`; either way the model gets the
        // whole payload
        match resp {
            RelayResponse::Success(payload) => Ok(payload.to_string()),
            RelayResponse::Failure(e) => Ok(json!({"error": e}).to_string()),
        }
    }

    fn function_name(&self) -> String {
        self.function.name.clone()
    }

    fn description(&self) -> String {
        self.function.description.clone()
    }
}

impl EvaluateScriptTool {
    pub fn new(relay: Arc<dyn Relay>) -> Self {
        let function = Function {
            name: String::from("evaluate_script"),
            description: String::from(
                "Run a JavaScript function in the page and return the result as JSON",
            ),
            parameters: Parameters {
                r#type: String::from("object"),
                properties: EvaluateScriptProps {
                    function: Property {
                        r#type: String::from("string"),
                        description: String::from(
                            "JavaScript function to execute. For example: \
                             \"() => { return document.title }\" or \
                             \"(selector) => { return document.querySelector(selector)?.innerText }\"",
                        ),
                        r#enum: None,
                    },
                    args: Property {
                        r#type: String::from("array"),
                        description: String::from("Arguments to pass into the function"),
                        r#enum: None,
                    },
                },
                required: vec![String::from("function")],
                additional_properties: false,
            },
            strict: true,
        };

        Self {
            r#type: ToolType::Function,
            function,
            relay,
        }
    }
}
