//! Tools over the caller's own records

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::debug;

use campusbuddy_provider::{object_schema, Param};
use campusbuddy_store::CampusStore;

use super::{invalid_args, require_student, Tool, ToolError};
use crate::mode::ExecutionContext;

/// Attached to every payments result, outstanding or not.
pub const PAYMENT_GUIDE: &str = "Payments can be made through the student portal \
under Finance > Make a Payment, at any campus service kiosk, or by bank transfer \
quoting your student id as the reference. Allow two business days for processing.";

/// Caller profile projection, secrets excluded
pub struct ProfileTool {
    store: Arc<dyn CampusStore>,
}

impl ProfileTool {
    pub fn new(store: Arc<dyn CampusStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for ProfileTool {
    fn name(&self) -> &str {
        "get_profile"
    }
    fn description(&self) -> &str {
        "Look up the caller's student profile: name, program, school, year, and WAM."
    }
    fn parameters(&self) -> Value {
        object_schema(&[])
    }

    async fn execute(&self, ctx: &ExecutionContext, _args: Value) -> Result<Value, ToolError> {
        let id = require_student(ctx)?;
        let student = self
            .store
            .student(id)
            .await?
            .ok_or_else(|| ToolError::NotFound(format!("student {}", id)))?;

        // Projection only; password_hash stays behind the store boundary.
        Ok(json!({
            "id": student.id,
            "name": student.name,
            "email": student.email,
            "school": student.school,
            "program": student.program,
            "year": student.year,
            "wam": student.wam,
        }))
    }
}

/// Active enrollments resolved to module summaries
pub struct EnrolledModulesTool {
    store: Arc<dyn CampusStore>,
}

impl EnrolledModulesTool {
    pub fn new(store: Arc<dyn CampusStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for EnrolledModulesTool {
    fn name(&self) -> &str {
        "get_enrolled_modules"
    }
    fn description(&self) -> &str {
        "List the modules the caller is actively enrolled in, with codes and credit values."
    }
    fn parameters(&self) -> Value {
        object_schema(&[])
    }

    async fn execute(&self, ctx: &ExecutionContext, _args: Value) -> Result<Value, ToolError> {
        let id = require_student(ctx)?;
        let enrollments = self.store.active_enrollments(id).await?;

        if enrollments.is_empty() {
            return Ok(json!({ "message": "no active enrollments" }));
        }

        let mut modules = Vec::new();
        for enrollment in &enrollments {
            if let Some(module) = self.store.module(&enrollment.module_code).await? {
                modules.push(json!({
                    "code": module.code,
                    "name": module.name,
                    "credits": module.credits,
                }));
            }
        }

        Ok(json!({ "modules": modules }))
    }
}

#[derive(Deserialize)]
struct ScheduleArgs {
    start_date: Option<String>,
    end_date: Option<String>,
}

/// Calendar events for the caller's modules inside a date range
pub struct ScheduleTool {
    store: Arc<dyn CampusStore>,
}

impl ScheduleTool {
    pub fn new(store: Arc<dyn CampusStore>) -> Self {
        Self { store }
    }

    fn parse_date(value: &str) -> Result<NaiveDate, ToolError> {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
            ToolError::InvalidArguments(format!("invalid date '{}', expected YYYY-MM-DD", value))
        })
    }
}

#[async_trait]
impl Tool for ScheduleTool {
    fn name(&self) -> &str {
        "get_schedule"
    }
    fn description(&self) -> &str {
        "The caller's class schedule between two dates (inclusive). \
         Resolve relative dates to concrete YYYY-MM-DD values first."
    }
    fn parameters(&self) -> Value {
        object_schema(&[
            Param::required("start_date", "string", "Range start, YYYY-MM-DD"),
            Param::required("end_date", "string", "Range end, YYYY-MM-DD"),
        ])
    }

    async fn execute(&self, ctx: &ExecutionContext, args: Value) -> Result<Value, ToolError> {
        let id = require_student(ctx)?;
        let args: ScheduleArgs = serde_json::from_value(args).map_err(invalid_args)?;

        // Both dates are mandatory; never guess a default range.
        let (Some(start), Some(end)) = (args.start_date, args.end_date) else {
            return Err(ToolError::InvalidArguments(
                "start_date and end_date are both required".to_string(),
            ));
        };
        let start = Self::parse_date(&start)?;
        let end = Self::parse_date(&end)?;

        let codes: Vec<String> = self
            .store
            .active_enrollments(id)
            .await?
            .into_iter()
            .map(|e| e.module_code)
            .collect();

        let mut events: Vec<_> = self
            .store
            .schedule_events(&codes)
            .await?
            .into_iter()
            .filter(|e| e.date >= start && e.date <= end)
            .collect();
        events.sort_by(|a, b| (a.date, a.start_time).cmp(&(b.date, b.start_time)));

        debug!(trace = %ctx.trace_id, count = events.len(), "schedule lookup");

        if events.is_empty() {
            return Ok(json!({ "message": "no events in this range" }));
        }

        Ok(json!({ "events": events }))
    }
}

/// Outstanding payments plus the static payment guide
pub struct PaymentsTool {
    store: Arc<dyn CampusStore>,
}

impl PaymentsTool {
    pub fn new(store: Arc<dyn CampusStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for PaymentsTool {
    fn name(&self) -> &str {
        "get_payments"
    }
    fn description(&self) -> &str {
        "The caller's unpaid payment records, soonest due first, with payment instructions."
    }
    fn parameters(&self) -> Value {
        object_schema(&[])
    }

    async fn execute(&self, ctx: &ExecutionContext, _args: Value) -> Result<Value, ToolError> {
        let id = require_student(ctx)?;

        let mut outstanding: Vec<_> = self
            .store
            .payments(id)
            .await?
            .into_iter()
            .filter(|p| p.status != "paid")
            .collect();
        outstanding.sort_by_key(|p| p.due_date);

        let outstanding: Vec<_> = outstanding
            .into_iter()
            .map(|p| {
                json!({
                    "description": p.description,
                    "amount": p.amount,
                    "due_date": p.due_date,
                    "status": p.status,
                })
            })
            .collect();

        // The guide is attached whether or not anything is outstanding.
        Ok(json!({
            "outstanding": outstanding,
            "payment_guide": PAYMENT_GUIDE,
        }))
    }
}
