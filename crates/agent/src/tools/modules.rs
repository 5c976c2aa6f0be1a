//! Module information lookup

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use campusbuddy_provider::{object_schema, Param};
use campusbuddy_store::CampusStore;

use super::{invalid_args, Tool, ToolError};
use crate::mode::ExecutionContext;

/// Recent announcements included in a module-info result
const MAX_ANNOUNCEMENTS: usize = 3;

#[derive(Deserialize)]
struct ModuleInfoArgs {
    module_code: Option<String>,
}

/// Module metadata, recent announcements, and the assignment list
pub struct ModuleInfoTool {
    store: Arc<dyn CampusStore>,
}

impl ModuleInfoTool {
    pub fn new(store: Arc<dyn CampusStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for ModuleInfoTool {
    fn name(&self) -> &str {
        "get_module_info"
    }
    fn description(&self) -> &str {
        "Details for one module: metadata, the latest announcements, and all assignments."
    }
    fn parameters(&self) -> Value {
        object_schema(&[Param::required(
            "module_code",
            "string",
            "Module code, e.g. COMP1511",
        )])
    }

    async fn execute(&self, _ctx: &ExecutionContext, args: Value) -> Result<Value, ToolError> {
        let args: ModuleInfoArgs = serde_json::from_value(args).map_err(invalid_args)?;
        let code = args.module_code.ok_or_else(|| {
            ToolError::InvalidArguments("module_code is required".to_string())
        })?;

        let module = self
            .store
            .module(&code)
            .await?
            .ok_or_else(|| ToolError::NotFound(format!("module {}", code)))?;

        let mut announcements = self.store.announcements(&code).await?;
        announcements.sort_by(|a, b| b.posted_at.cmp(&a.posted_at));
        announcements.truncate(MAX_ANNOUNCEMENTS);

        let announcements: Vec<_> = announcements
            .into_iter()
            .map(|a| {
                json!({
                    "title": a.title,
                    "body": a.body,
                    "posted_at": a.posted_at,
                })
            })
            .collect();

        let assignments: Vec<_> = self
            .store
            .assignments(&code)
            .await?
            .into_iter()
            .map(|a| {
                json!({
                    "title": a.title,
                    "due_date": a.due_date,
                    "weight_percent": a.weight_percent,
                })
            })
            .collect();

        Ok(json!({
            "module": {
                "code": module.code,
                "name": module.name,
                "credits": module.credits,
                "description": module.description,
                "coordinator": module.coordinator,
            },
            "announcements": announcements,
            "assignments": assignments,
        }))
    }
}
