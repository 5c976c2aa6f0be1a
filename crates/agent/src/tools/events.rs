//! Public campus events lookup

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{json, Value};
use std::sync::Arc;

use campusbuddy_provider::object_schema;
use campusbuddy_store::CampusStore;

use super::{Tool, ToolError};
use crate::mode::ExecutionContext;

/// Upcoming events returned per call
const MAX_EVENTS: usize = 5;

/// Upcoming public events; the only tool guests can reach
pub struct CampusEventsTool {
    store: Arc<dyn CampusStore>,
}

impl CampusEventsTool {
    pub fn new(store: Arc<dyn CampusStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for CampusEventsTool {
    fn name(&self) -> &str {
        "get_public_events"
    }
    fn description(&self) -> &str {
        "The next few public campus events, soonest first."
    }
    fn parameters(&self) -> Value {
        object_schema(&[])
    }

    async fn execute(&self, _ctx: &ExecutionContext, _args: Value) -> Result<Value, ToolError> {
        let now = Utc::now();

        let mut events: Vec<_> = self
            .store
            .campus_events()
            .await?
            .into_iter()
            .filter(|e| e.starts_at >= now)
            .collect();
        events.sort_by_key(|e| e.starts_at);
        events.truncate(MAX_EVENTS);

        if events.is_empty() {
            return Ok(json!({ "message": "no upcoming events" }));
        }

        let events: Vec<_> = events
            .into_iter()
            .map(|e| {
                json!({
                    "title": e.title,
                    "description": e.description,
                    "starts_at": e.starts_at,
                    "location": e.location,
                })
            })
            .collect();

        Ok(json!({ "events": events }))
    }
}
