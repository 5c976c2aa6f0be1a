//! CampusBuddy assistant core
//!
//! The bounded conversation loop between the chat model and the campus
//! data tools, plus the mode-based tool visibility policy.

use thiserror::Error;

pub mod context;
pub mod mode;
pub mod orchestrator;
pub mod tools;

pub use context::PromptBuilder;
pub use mode::{Caller, ChatMode, ExecutionContext};
pub use orchestrator::{ChatAgent, ChatReply, ChatRequest, ReplyStatus};
pub use tools::{register_campus_tools, Tool, ToolError, ToolRegistry};

/// Run-level failures. Tool-level failures never surface here; they are
/// converted to structured tool-turn content and the loop continues.
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("model call failed: {0}")]
    Provider(String),

    #[error("conversation loop exceeded")]
    LoopExceeded,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AgentError>;
