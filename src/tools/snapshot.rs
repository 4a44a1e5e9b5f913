use std::sync::Arc;

use anyhow::{Context, Error, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::openai::{Function, Parameters, Property, ToolCall, ToolType};
use crate::relay::{Relay, RelayResponse};

#[derive(Serialize)]
pub struct SnapshotProps {
    pub verbose: Property,
}

#[derive(Deserialize)]
pub struct SnapshotArgs {
    pub verbose: Option<bool>,
}

#[derive(Serialize)]
pub struct SnapshotTool {
    pub r#type: ToolType,
    pub function: Function<SnapshotProps>,
    #[serde(skip)]
    relay: Arc<dyn Relay>,
}

#[async_trait]
impl ToolCall for SnapshotTool {
    async fn call(&self, args: &str) -> Result<String, Error> {
        let fn_args: SnapshotArgs =
            serde_json::from_str(args).context("Invalid arguments for take_snapshot")?;

        let resp = self
            .relay
            .send(
                "take_snapshot",
                json!({"verbose": fn_args.verbose.unwrap_or(false)}),
            )
            .await;

        // The snapshot payload goes back to the model verbatim so it
        // can reason over counts, headings, and links
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

impl SnapshotTool {
    pub fn new(relay: Arc<dyn Relay>) -> Self {
        let function = Function {
            name: String::from("take_snapshot"),
            description: String::from(
                "Take a text snapshot of the current page (title, URL, element counts, main \
                 links). Use this first to understand the page structure.",
            ),
            parameters: Parameters {
                r#type: String::from("object"),
                properties: SnapshotProps {
                    verbose: Property {
                        r#type: String::from("boolean"),
                        description: String::from(
                            "Include extra detail such as meta description and body text \
                             (default: false).",
                        ),
                        r#enum: None,
                    },
                },
                required: vec![],
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
