//! Course material tools: listing, reading, and text search

use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::debug;

use campusbuddy_provider::{object_schema, Param};
use campusbuddy_store::{CampusStore, Material};

use super::{invalid_args, Tool, ToolError};
use crate::mode::ExecutionContext;

/// Characters of context on each side of a search hit
const SNIPPET_RADIUS: usize = 200;

/// Matches returned per search, in first-found order
const MAX_MATCHES: usize = 3;

fn require_field(value: Option<String>, name: &str) -> Result<String, ToolError> {
    value.ok_or_else(|| ToolError::InvalidArguments(format!("{} is required", name)))
}

fn filter_category(materials: Vec<Material>, category: Option<&str>) -> Vec<Material> {
    match category {
        Some(category) => materials
            .into_iter()
            .filter(|m| m.category == category)
            .collect(),
        None => materials,
    }
}

/// Case-insensitive position of `needle` in `haystack`
fn find_ci(haystack: &str, needle: &str) -> Option<usize> {
    haystack.to_lowercase().find(&needle.to_lowercase())
}

fn floor_char_boundary(s: &str, mut i: usize) -> usize {
    while i > 0 && !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

fn ceil_char_boundary(s: &str, mut i: usize) -> usize {
    while i < s.len() && !s.is_char_boundary(i) {
        i += 1;
    }
    i
}

/// Snippet of `text` centered on the match at byte `pos`, with internal
/// whitespace collapsed to single spaces.
fn snippet_around(text: &str, pos: usize, match_len: usize) -> String {
    let start = floor_char_boundary(text, pos.saturating_sub(SNIPPET_RADIUS));
    let end = ceil_char_boundary(text, (pos + SNIPPET_RADIUS + match_len).min(text.len()));
    let window = &text[start..end];

    let whitespace = Regex::new(r"\s+").unwrap();
    whitespace.replace_all(window, " ").trim().to_string()
}

#[derive(Deserialize)]
struct ListArgs {
    module_code: Option<String>,
    category: Option<String>,
}

/// Material entries for a module
pub struct ListMaterialsTool {
    store: Arc<dyn CampusStore>,
}

impl ListMaterialsTool {
    pub fn new(store: Arc<dyn CampusStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for ListMaterialsTool {
    fn name(&self) -> &str {
        "list_materials"
    }
    fn description(&self) -> &str {
        "List the uploaded materials for a module, optionally filtered by category."
    }
    fn parameters(&self) -> Value {
        object_schema(&[
            Param::required("module_code", "string", "Module code, e.g. COMP1511"),
            Param::optional("category", "string", "Category filter, e.g. notes, slides"),
        ])
    }

    async fn execute(&self, _ctx: &ExecutionContext, args: Value) -> Result<Value, ToolError> {
        let args: ListArgs = serde_json::from_value(args).map_err(invalid_args)?;
        let code = require_field(args.module_code, "module_code")?;

        let materials = filter_category(
            self.store.materials(&code).await?,
            args.category.as_deref(),
        );

        let entries: Vec<_> = materials
            .into_iter()
            .map(|m| {
                json!({
                    "title": m.title,
                    "category": m.category,
                    "uploaded_at": m.uploaded_at,
                })
            })
            .collect();

        Ok(json!({ "materials": entries }))
    }
}

#[derive(Deserialize)]
struct ReadArgs {
    module_code: Option<String>,
    title: Option<String>,
}

/// Full extracted text of one material, by exact title
pub struct ReadMaterialTool {
    store: Arc<dyn CampusStore>,
}

impl ReadMaterialTool {
    pub fn new(store: Arc<dyn CampusStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for ReadMaterialTool {
    fn name(&self) -> &str {
        "read_material"
    }
    fn description(&self) -> &str {
        "Read the full extracted text of one material, identified by its exact title."
    }
    fn parameters(&self) -> Value {
        object_schema(&[
            Param::required("module_code", "string", "Module code, e.g. COMP1511"),
            Param::required("title", "string", "Exact material title"),
        ])
    }

    async fn execute(&self, _ctx: &ExecutionContext, args: Value) -> Result<Value, ToolError> {
        let args: ReadArgs = serde_json::from_value(args).map_err(invalid_args)?;
        let code = require_field(args.module_code, "module_code")?;
        let title = require_field(args.title, "title")?;

        let material = self
            .store
            .materials(&code)
            .await?
            .into_iter()
            .find(|m| m.title == title)
            .ok_or_else(|| ToolError::NotFound(format!("material '{}' in {}", title, code)))?;

        Ok(json!({
            "title": material.title,
            "category": material.category,
            "text": material.text,
        }))
    }
}

#[derive(Deserialize)]
struct SearchArgs {
    module_code: Option<String>,
    query: Option<String>,
    category: Option<String>,
}

/// Substring search across a module's extracted material text
pub struct SearchMaterialsTool {
    store: Arc<dyn CampusStore>,
}

impl SearchMaterialsTool {
    pub fn new(store: Arc<dyn CampusStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for SearchMaterialsTool {
    fn name(&self) -> &str {
        "search_materials"
    }
    fn description(&self) -> &str {
        "Search a module's materials for a phrase; returns a short snippet around each hit."
    }
    fn parameters(&self) -> Value {
        object_schema(&[
            Param::required("module_code", "string", "Module code, e.g. COMP1511"),
            Param::required("query", "string", "Text to search for"),
            Param::optional("category", "string", "Category filter, e.g. notes, slides"),
        ])
    }

    async fn execute(&self, ctx: &ExecutionContext, args: Value) -> Result<Value, ToolError> {
        let args: SearchArgs = serde_json::from_value(args).map_err(invalid_args)?;
        let code = require_field(args.module_code, "module_code")?;
        let query = require_field(args.query, "query")?;
        if query.trim().is_empty() {
            return Err(ToolError::InvalidArguments(
                "query must not be empty".to_string(),
            ));
        }

        let materials = filter_category(
            self.store.materials(&code).await?,
            args.category.as_deref(),
        );

        // First-found order, not relevance order.
        let mut matches = Vec::new();
        for material in &materials {
            if let Some(pos) = find_ci(&material.text, &query) {
                matches.push(json!({
                    "title": material.title,
                    "snippet": snippet_around(&material.text, pos, query.len()),
                }));
                if matches.len() == MAX_MATCHES {
                    break;
                }
            }
        }

        debug!(trace = %ctx.trace_id, query = %query, hits = matches.len(), "material search");

        if matches.is_empty() {
            return Ok(json!({ "message": "no matches" }));
        }

        Ok(json!({ "matches": matches }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snippet_covers_radius_around_match() {
        let text = format!("{}needle{}", "a".repeat(300), "b".repeat(300));
        let pos = find_ci(&text, "NEEDLE").unwrap();
        assert_eq!(pos, 300);

        let snippet = snippet_around(&text, pos, "needle".len());
        // 200 chars before + the match + 200 chars after.
        assert_eq!(snippet.len(), 200 + 6 + 200);
        assert!(snippet.starts_with('a'));
        assert!(snippet.contains("needle"));
        assert!(snippet.ends_with('b'));
    }

    #[test]
    fn snippet_clamps_at_text_edges() {
        let snippet = snippet_around("needle at the start", 0, "needle".len());
        assert_eq!(snippet, "needle at the start");
    }

    #[test]
    fn snippet_collapses_whitespace() {
        let text = "intro\n\n  linked   lists\t\tare chains of nodes";
        let pos = find_ci(text, "linked").unwrap();
        let snippet = snippet_around(text, pos, "linked".len());
        assert_eq!(snippet, "intro linked lists are chains of nodes");
    }

    #[test]
    fn find_ci_is_case_insensitive() {
        assert_eq!(find_ci("The Mid-Term Exam", "mid-term"), Some(4));
        assert_eq!(find_ci("nothing here", "exam"), None);
    }
}
