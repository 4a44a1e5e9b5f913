use std::sync::Arc;

use anyhow::{Context, Error, Result, bail};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::openai::{Function, Parameters, Property, ToolCall, ToolType};
use crate::relay::Relay;
use crate::tools::action_outcome;

#[derive(Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum NavigateKind {
    Url,
    Back,
    Forward,
    Reload,
}

#[derive(Serialize)]
pub struct NavigatePageProps {
    pub r#type: Property,
    pub url: Property,
}

#[derive(Deserialize)]
pub struct NavigatePageArgs {
    pub r#type: NavigateKind,
    pub url: Option<String>,
}

#[derive(Serialize)]
pub struct NavigatePageTool {
    pub r#type: ToolType,
    pub function: Function<NavigatePageProps>,
    #[serde(skip)]
    relay: Arc<dyn Relay>,
}

#[async_trait]
impl ToolCall for NavigatePageTool {
    async fn call(&self, args: &str) -> Result<String, Error> {
        let fn_args: NavigatePageArgs =
            serde_json::from_str(args).context("Invalid arguments for navigate_page")?;

        if fn_args.r#type == NavigateKind::Url && fn_args.url.is_none() {
            bail!("The 'url' argument is required when type is 'url'");
        }

        let resp = self
            .relay
            .send(
                "navigate_page",
                json!({
                    "type": fn_args.r#type,
                    "url": fn_args.url,
                }),
            )
            .await;

        Ok(action_outcome(
            resp,
            "Navigated successfully",
            "Unable to navigate",
        ))
    }

    fn function_name(&self) -> String {
        self.function.name.clone()
    }

    fn description(&self) -> String {
        self.function.description.clone()
    }
}

impl NavigatePageTool {
    pub fn new(relay: Arc<dyn Relay>) -> Self {
        let function = Function {
            name: String::from("navigate_page"),
            description: String::from("Navigate the page (new URL, back, forward, reload)"),
            parameters: Parameters {
                r#type: String::from("object"),
                properties: NavigatePageProps {
                    r#type: Property {
                        r#type: String::from("string"),
                        description: String::from("The kind of navigation"),
                        r#enum: Some(vec![
                            String::from("url"),
                            String::from("back"),
                            String::from("forward"),
                            String::from("reload"),
                        ]),
                    },
                    url: Property {
                        r#type: String::from("string"),
                        description: String::from(
                            "Destination URL (only used when type=\"url\")",
                        ),
                        r#enum: None,
                    },
                },
                required: vec![String::from("type")],
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
