//! Input automation tools: clicking, filling, hovering, and key
//! presses against the live page.
use std::sync::Arc;

use anyhow::{Context, Error, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::openai::{Function, Parameters, Property, ToolCall, ToolType};
use crate::relay::Relay;
use crate::tools::action_outcome;

#[derive(Serialize)]
pub struct ClickProps {
    pub selector: Property,
    #[serde(rename = "dblClick")]
    pub dbl_click: Property,
}

#[derive(Deserialize)]
pub struct ClickArgs {
    pub selector: String,
    #[serde(rename = "dblClick")]
    pub dbl_click: Option<bool>,
}

#[derive(Serialize)]
pub struct ClickTool {
    pub r#type: ToolType,
    pub function: Function<ClickProps>,
    #[serde(skip)]
    relay: Arc<dyn Relay>,
}

#[async_trait]
impl ToolCall for ClickTool {
    async fn call(&self, args: &str) -> Result<String, Error> {
        let fn_args: ClickArgs =
            serde_json::from_str(args).context("Invalid arguments for click")?;

        let resp = self
            .relay
            .send(
                "click",
                json!({
                    "selector": fn_args.selector,
                    "dblClick": fn_args.dbl_click.unwrap_or(false),
                }),
            )
            .await;

        Ok(action_outcome(resp, "Clicked element", "Element not found"))
    }

    fn function_name(&self) -> String {
        self.function.name.clone()
    }

    fn description(&self) -> String {
        self.function.description.clone()
    }
}

impl ClickTool {
    pub fn new(relay: Arc<dyn Relay>) -> Self {
        let function = Function {
            name: String::from("click"),
            description: String::from("Click an element matching a CSS selector"),
            parameters: Parameters {
                r#type: String::from("object"),
                properties: ClickProps {
                    selector: Property {
                        r#type: String::from("string"),
                        description: String::from("CSS selector of the element to click"),
                        r#enum: None,
                    },
                    dbl_click: Property {
                        r#type: String::from("boolean"),
                        description: String::from(
                            "Double click instead of single click (default: false)",
                        ),
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

#[derive(Serialize)]
pub struct FillProps {
    pub selector: Property,
    pub value: Property,
}

#[derive(Deserialize)]
pub struct FillArgs {
    pub selector: String,
    pub value: String,
}

#[derive(Serialize)]
pub struct FillTool {
    pub r#type: ToolType,
    pub function: Function<FillProps>,
    #[serde(skip)]
    relay: Arc<dyn Relay>,
}

#[async_trait]
impl ToolCall for FillTool {
    async fn call(&self, args: &str) -> Result<String, Error> {
        let fn_args: FillArgs = serde_json::from_str(args).context("Invalid arguments for fill")?;

        let resp = self
            .relay
            .send(
                "fill",
                json!({
                    "selector": fn_args.selector,
                    "value": fn_args.value,
                }),
            )
            .await;

        Ok(action_outcome(
            resp,
            "Filled value into element",
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

impl FillTool {
    pub fn new(relay: Arc<dyn Relay>) -> Self {
        let function = Function {
            name: String::from("fill"),
            description: String::from("Fill text into an input, textarea, or select option"),
            parameters: Parameters {
                r#type: String::from("object"),
                properties: FillProps {
                    selector: Property {
                        r#type: String::from("string"),
                        description: String::from("CSS selector of the input/textarea/select"),
                        r#enum: None,
                    },
                    value: Property {
                        r#type: String::from("string"),
                        description: String::from("The value to fill in"),
                        r#enum: None,
                    },
                },
                required: vec![String::from("selector"), String::from("value")],
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
pub struct HoverProps {
    pub selector: Property,
}

#[derive(Deserialize)]
pub struct HoverArgs {
    pub selector: String,
}

#[derive(Serialize)]
pub struct HoverTool {
    pub r#type: ToolType,
    pub function: Function<HoverProps>,
    #[serde(skip)]
    relay: Arc<dyn Relay>,
}

#[async_trait]
impl ToolCall for HoverTool {
    async fn call(&self, args: &str) -> Result<String, Error> {
        let fn_args: HoverArgs =
            serde_json::from_str(args).context("Invalid arguments for hover")?;

        let resp = self
            .relay
            .send("hover", json!({"selector": fn_args.selector}))
            .await;

        Ok(action_outcome(
            resp,
            "Hovered over element",
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

impl HoverTool {
    pub fn new(relay: Arc<dyn Relay>) -> Self {
        let function = Function {
            name: String::from("hover"),
            description: String::from("Hover the mouse over an element"),
            parameters: Parameters {
                r#type: String::from("object"),
                properties: HoverProps {
                    selector: Property {
                        r#type: String::from("string"),
                        description: String::from("CSS selector of the element"),
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

#[derive(Serialize)]
pub struct PressKeyProps {
    pub key: Property,
}

#[derive(Deserialize)]
pub struct PressKeyArgs {
    pub key: String,
}

#[derive(Serialize)]
pub struct PressKeyTool {
    pub r#type: ToolType,
    pub function: Function<PressKeyProps>,
    #[serde(skip)]
    relay: Arc<dyn Relay>,
}

#[async_trait]
impl ToolCall for PressKeyTool {
    async fn call(&self, args: &str) -> Result<String, Error> {
        let fn_args: PressKeyArgs =
            serde_json::from_str(args).context("Invalid arguments for press_key")?;

        let resp = self
            .relay
            .send("press_key", json!({"key": fn_args.key}))
            .await;

        Ok(action_outcome(
            resp,
            &format!("Pressed key: {}", fn_args.key),
            "Unable to press key",
        ))
    }

    fn function_name(&self) -> String {
        self.function.name.clone()
    }

    fn description(&self) -> String {
        self.function.description.clone()
    }
}

impl PressKeyTool {
    pub fn new(relay: Arc<dyn Relay>) -> Self {
        let function = Function {
            name: String::from("press_key"),
            description: String::from("Press a key or keyboard shortcut"),
            parameters: Parameters {
                r#type: String::from("object"),
                properties: PressKeyProps {
                    key: Property {
                        r#type: String::from("string"),
                        description: String::from(
                            "The key or key combination. For example: \"Enter\", \"Control+A\", \
                             \"Control+Shift+R\"",
                        ),
                        r#enum: None,
                    },
                },
                required: vec![String::from("key")],
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
