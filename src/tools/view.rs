//! Viewport tools: scrolling the page and highlighting elements.
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
pub enum ScrollDirection {
    Up,
    Down,
    Top,
    Bottom,
    #[serde(rename = "to-element")]
    ToElement,
}

#[derive(Serialize)]
pub struct ScrollPageProps {
    pub direction: Property,
    pub selector: Property,
}

#[derive(Deserialize)]
pub struct ScrollPageArgs {
    pub direction: ScrollDirection,
    pub selector: Option<String>,
}

#[derive(Serialize)]
pub struct ScrollPageTool {
    pub r#type: ToolType,
    pub function: Function<ScrollPageProps>,
    #[serde(skip)]
    relay: Arc<dyn Relay>,
}

#[async_trait]
impl ToolCall for ScrollPageTool {
    async fn call(&self, args: &str) -> Result<String, Error> {
        let fn_args: ScrollPageArgs =
            serde_json::from_str(args).context("Invalid arguments for scroll_page")?;

        if fn_args.direction == ScrollDirection::ToElement && fn_args.selector.is_none() {
            bail!("The 'selector' argument is required when direction is 'to-element'");
        }

        let resp = self
            .relay
            .send(
                "scroll",
                json!({
                    "direction": fn_args.direction,
                    "selector": fn_args.selector,
                }),
            )
            .await;

        Ok(action_outcome(resp, "Scrolled", "Unable to scroll"))
    }

    fn function_name(&self) -> String {
        self.function.name.clone()
    }

    fn description(&self) -> String {
        self.function.description.clone()
    }
}

impl ScrollPageTool {
    pub fn new(relay: Arc<dyn Relay>) -> Self {
        let function = Function {
            name: String::from("scroll_page"),
            description: String::from(
                "Scroll the page (up, down, top, bottom, or to an element)",
            ),
            parameters: Parameters {
                r#type: String::from("object"),
                properties: ScrollPageProps {
                    direction: Property {
                        r#type: String::from("string"),
                        description: String::from("The scroll direction"),
                        r#enum: Some(vec![
                            String::from("up"),
                            String::from("down"),
                            String::from("top"),
                            String::from("bottom"),
                            String::from("to-element"),
                        ]),
                    },
                    selector: Property {
                        r#type: String::from("string"),
                        description: String::from(
                            "CSS selector (only used when direction=\"to-element\")",
                        ),
                        r#enum: None,
                    },
                },
                required: vec![String::from("direction")],
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

#[derive(Serialize)]
pub struct HighlightProps {
    pub selector: Property,
    pub color: Property,
}

#[derive(Deserialize)]
pub struct HighlightArgs {
    pub selector: String,
    pub color: Option<String>,
}

#[derive(Serialize)]
pub struct HighlightTool {
    pub r#type: ToolType,
    pub function: Function<HighlightProps>,
    #[serde(skip)]
    relay: Arc<dyn Relay>,
}

#[async_trait]
impl ToolCall for HighlightTool {
    async fn call(&self, args: &str) -> Result<String, Error> {
        let fn_args: HighlightArgs =
            serde_json::from_str(args).context("Invalid arguments for highlight_element")?;

        let resp = self
            .relay
            .send(
                "highlight",
                json!({
                    "selector": fn_args.selector,
                    "color": fn_args.color.unwrap_or_else(|| String::from("red")),
                }),
            )
            .await;

        Ok(action_outcome(
            resp,
            "Highlighted element",
            "Element not found",
        ))
    }

    fn function_name(&self) -> String {
        self.function.name.clone()
    }

    fn description(&self) -> String {
        self.function.description.clone()
    }
}

impl HighlightTool {
    pub fn new(relay: Arc<dyn Relay>) -> Self {
        let function = Function {
            name: String::from("highlight_element"),
            description: String::from("Highlight an element so it is easy to spot"),
            parameters: Parameters {
                r#type: String::from("object"),
                properties: HighlightProps {
                    selector: Property {
                        r#type: String::from("string"),
                        description: String::from("CSS selector of the element"),
                        r#enum: None,
                    },
                    color: Property {
                        r#type: String::from("string"),
                        description: String::from("Highlight color (default: \"red\")"),
                        r#enum: None,
                    },
                },
                required: vec![String::from("selector")],
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
