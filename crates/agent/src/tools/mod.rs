//! Campus data tools
//!
//! Each tool is a named, schema-described read operation the model may
//! request during a conversation turn. The registry owns the catalog and
//! enforces the mode visibility table on both listing and dispatch.

pub mod events;
pub mod materials;
pub mod modules;
pub mod student;

pub use events::CampusEventsTool;
pub use materials::{ListMaterialsTool, ReadMaterialTool, SearchMaterialsTool};
pub use modules::ModuleInfoTool;
pub use student::{
    EnrolledModulesTool, PaymentsTool, ProfileTool, ScheduleTool, PAYMENT_GUIDE,
};

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

use campusbuddy_store::{CampusStore, StoreError};

use crate::mode::{ChatMode, ExecutionContext};

/// Tool-level failures. All of these become structured `{"error": ...}`
/// tool-turn content; none aborts the run.
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("caller is not signed in")]
    NotSignedIn,

    #[error("Unknown tool")]
    UnknownTool,

    #[error("data access failed: {0}")]
    Store(#[from] StoreError),
}

type BoxedTool = Box<dyn Tool + Send + Sync>;

#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn parameters(&self) -> Value;
    async fn execute(&self, ctx: &ExecutionContext, args: Value) -> Result<Value, ToolError>;
}

pub fn to_descriptor(tool: &dyn Tool) -> campusbuddy_provider::Tool {
    campusbuddy_provider::Tool::new(tool.name(), tool.description(), tool.parameters())
}

/// The caller's student id, required by the caller-data tools
pub(crate) fn require_student<'a>(ctx: &'a ExecutionContext) -> Result<&'a str, ToolError> {
    ctx.caller.student_id().ok_or(ToolError::NotSignedIn)
}

pub(crate) fn invalid_args(e: serde_json::Error) -> ToolError {
    ToolError::InvalidArguments(e.to_string())
}

/// Name-to-handler catalog built at startup
pub struct ToolRegistry {
    tools: HashMap<String, BoxedTool>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    pub fn register<T: Tool + 'static>(&mut self, tool: T) {
        let name = tool.name().to_string();
        self.tools.insert(name, Box::new(tool));
    }

    pub fn get(&self, name: &str) -> Option<&(dyn Tool + Send + Sync)> {
        self.tools.get(name).map(|t| t.as_ref())
    }

    pub fn has(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn names(&self) -> Vec<String> {
        self.tools.keys().cloned().collect()
    }

    /// Descriptors for the full catalog
    pub fn definitions(&self) -> Vec<campusbuddy_provider::Tool> {
        self.tools
            .values()
            .map(|t| to_descriptor(t.as_ref()))
            .collect()
    }

    /// Descriptors visible in `mode`, in visibility-table order
    pub fn definitions_for(&self, mode: &ChatMode) -> Vec<campusbuddy_provider::Tool> {
        mode.visible_tool_names()
            .iter()
            .filter_map(|name| self.get(name))
            .map(|t| to_descriptor(t))
            .collect()
    }

    /// Dispatch one invocation. A name that is unregistered, or not
    /// visible in the context's mode, is the single fallback branch:
    /// `UnknownTool`. Out-of-mode tools are thereby structurally
    /// unreachable, not merely hidden from the descriptor list.
    pub async fn execute(
        &self,
        ctx: &ExecutionContext,
        name: &str,
        args: Value,
    ) -> Result<Value, ToolError> {
        if !ctx.mode.allows(name) {
            return Err(ToolError::UnknownTool);
        }
        let tool = self.tools.get(name).ok_or(ToolError::UnknownTool)?;
        tool.execute(ctx, args).await
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Register the full campus tool catalog against a store
pub fn register_campus_tools(registry: &mut ToolRegistry, store: Arc<dyn CampusStore>) {
    registry.register(ProfileTool::new(store.clone()));
    registry.register(EnrolledModulesTool::new(store.clone()));
    registry.register(ScheduleTool::new(store.clone()));
    registry.register(ModuleInfoTool::new(store.clone()));
    registry.register(PaymentsTool::new(store.clone()));
    registry.register(CampusEventsTool::new(store.clone()));
    registry.register(ListMaterialsTool::new(store.clone()));
    registry.register(ReadMaterialTool::new(store.clone()));
    registry.register(SearchMaterialsTool::new(store));
}
