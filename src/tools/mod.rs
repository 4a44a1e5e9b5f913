use std::sync::Arc;

use crate::relay::{Relay, RelayResponse};

pub mod registry;
pub use registry::ToolRegistry;

pub mod snapshot;
pub use snapshot::SnapshotTool;

pub mod script;
pub use script::EvaluateScriptTool;

pub mod input;
pub use input::{ClickTool, FillTool, HoverTool, PressKeyTool};

pub mod navigation;
pub use navigation::NavigatePageTool;

pub mod view;
pub use view::{HighlightTool, ScrollPageTool};

/// Build the full set of page automation tools backed by the given
/// relay. Mirrors the actions the page automation service understands.
pub fn page_tools(relay: Arc<dyn Relay>) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry
        .register(Box::new(SnapshotTool::new(relay.clone())))
        .expect("Tool names must be unique");
    registry
        .register(Box::new(EvaluateScriptTool::new(relay.clone())))
        .expect("Tool names must be unique");
    registry
        .register(Box::new(ClickTool::new(relay.clone())))
        .expect("Tool names must be unique");
    registry
        .register(Box::new(FillTool::new(relay.clone())))
        .expect("Tool names must be unique");
    registry
        .register(Box::new(HoverTool::new(relay.clone())))
        .expect("Tool names must be unique");
    registry
        .register(Box::new(PressKeyTool::new(relay.clone())))
        .expect("Tool names must be unique");
    registry
        .register(Box::new(NavigatePageTool::new(relay.clone())))
        .expect("Tool names must be unique");
    registry
        .register(Box::new(ScrollPageTool::new(relay.clone())))
        .expect("Tool names must be unique");
    registry
        .register(Box::new(HighlightTool::new(relay)))
        .expect("Tool names must be unique");
    registry
}

/// Translate the relay's `{success, error}` outcome shape into the
/// string the model sees. A page-reported failure becomes its error
/// text so the model can react to it on the next round.
pub(crate) fn action_outcome(resp: RelayResponse, success_msg: &str, fallback_err: &str) -> String {
    match resp {
        RelayResponse::Success(payload) => {
            if payload["success"].as_bool().unwrap_or(false) {
                success_msg.to_string()
            } else {
                payload["error"]
                    .as_str()
                    .map(str::to_string)
                    .unwrap_or_else(|| fallback_err.to_string())
            }
        }
        RelayResponse::Failure(e) => e,
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use async_trait::async_trait;
    use serde_json::Value;
    use std::sync::Mutex;

    /// Relay double that records every send and replays a canned
    /// response.
    pub struct StubRelay {
        pub response: RelayResponse,
        pub sent: Mutex<Vec<(String, Value)>>,
    }

    impl StubRelay {
        pub fn success(payload: Value) -> Self {
            Self {
                response: RelayResponse::Success(payload),
                sent: Mutex::new(Vec::new()),
            }
        }

        pub fn failure(error: &str) -> Self {
            Self {
                response: RelayResponse::Failure(error.to_string()),
                sent: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Relay for StubRelay {
        async fn send(&self, action: &str, params: Value) -> RelayResponse {
            self.sent
                .lock()
                .unwrap()
                .push((action.to_string(), params));
            self.response.clone()
        }
    }
}
