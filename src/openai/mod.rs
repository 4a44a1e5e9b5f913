pub mod core;

pub use core::{
    BoxedToolCall, Function, FunctionCall, FunctionCallFn, Message, Parameters, Property, Role,
    ToolCall, ToolType, completion,
};
