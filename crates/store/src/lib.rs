//! Campus data access
//!
//! Read-only lookups over the university's document collections. The
//! production system keeps these in a document database; behind the
//! [`CampusStore`] trait this crate serves them from JSON collection
//! files loaded into memory, which is all the assistant core needs.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Data access errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid document: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// A student account. `password_hash` never leaves the store layer as
/// part of a profile projection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentRecord {
    pub id: String,
    pub name: String,
    pub email: String,
    pub school: String,
    pub program: String,
    pub year: u8,
    pub wam: f64,
    #[serde(default)]
    pub password_hash: String,
}

/// Enrollment status values are free-form in the source data; only
/// "active" enrollments count towards schedules and module lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enrollment {
    pub student_id: String,
    pub module_code: String,
    pub status: String,
}

impl Enrollment {
    pub fn is_active(&self) -> bool {
        self.status == "active"
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Module {
    pub code: String,
    pub name: String,
    pub credits: u8,
    pub description: String,
    #[serde(default)]
    pub coordinator: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Announcement {
    pub module_code: String,
    pub title: String,
    pub body: String,
    pub posted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    pub module_code: String,
    pub title: String,
    pub due_date: NaiveDate,
    pub weight_percent: u8,
}

/// One timetabled class occurrence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleEvent {
    pub module_code: String,
    pub title: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub location: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub student_id: String,
    pub description: String,
    pub amount: f64,
    pub due_date: NaiveDate,
    pub status: String,
}

/// A public campus event, visible to guests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampusEvent {
    pub title: String,
    pub description: String,
    pub starts_at: DateTime<Utc>,
    pub location: String,
}

/// An uploaded course material with its extracted text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Material {
    pub module_code: String,
    pub title: String,
    pub category: String,
    pub uploaded_at: NaiveDate,
    pub text: String,
}

/// Read-only lookups the tool executor runs against. The external
/// document database sits behind this seam in production.
#[async_trait]
pub trait CampusStore: Send + Sync {
    async fn student(&self, id: &str) -> Result<Option<StudentRecord>>;
    async fn active_enrollments(&self, student_id: &str) -> Result<Vec<Enrollment>>;
    async fn module(&self, code: &str) -> Result<Option<Module>>;
    async fn announcements(&self, module_code: &str) -> Result<Vec<Announcement>>;
    async fn assignments(&self, module_code: &str) -> Result<Vec<Assignment>>;
    async fn schedule_events(&self, module_codes: &[String]) -> Result<Vec<ScheduleEvent>>;
    async fn payments(&self, student_id: &str) -> Result<Vec<PaymentRecord>>;
    async fn campus_events(&self) -> Result<Vec<CampusEvent>>;
    async fn materials(&self, module_code: &str) -> Result<Vec<Material>>;
}

/// In-memory store backed by a directory of JSON collection files
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub students: Vec<StudentRecord>,
    pub enrollments: Vec<Enrollment>,
    pub modules: Vec<Module>,
    pub announcements: Vec<Announcement>,
    pub assignments: Vec<Assignment>,
    pub schedule: Vec<ScheduleEvent>,
    pub payments: Vec<PaymentRecord>,
    pub events: Vec<CampusEvent>,
    pub materials: Vec<Material>,
}

/// Collection file names under the data directory
const COLLECTIONS: &[&str] = &[
    "students.json",
    "enrollments.json",
    "modules.json",
    "announcements.json",
    "assignments.json",
    "schedule.json",
    "payments.json",
    "events.json",
    "materials.json",
];

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every collection from `dir`. A missing file loads as an empty
    /// collection; a malformed one is an error.
    pub async fn load_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let store = Self {
            students: load_collection(dir.join("students.json")).await?,
            enrollments: load_collection(dir.join("enrollments.json")).await?,
            modules: load_collection(dir.join("modules.json")).await?,
            announcements: load_collection(dir.join("announcements.json")).await?,
            assignments: load_collection(dir.join("assignments.json")).await?,
            schedule: load_collection(dir.join("schedule.json")).await?,
            payments: load_collection(dir.join("payments.json")).await?,
            events: load_collection(dir.join("events.json")).await?,
            materials: load_collection(dir.join("materials.json")).await?,
        };

        info!(
            "loaded campus data from {:?}: {} students, {} modules, {} materials",
            dir,
            store.students.len(),
            store.modules.len(),
            store.materials.len()
        );
        Ok(store)
    }

    /// Names of the collection files `load_dir` reads.
    pub fn collection_files() -> &'static [&'static str] {
        COLLECTIONS
    }
}

async fn load_collection<T: DeserializeOwned>(path: PathBuf) -> Result<Vec<T>> {
    if !path.exists() {
        debug!("collection {:?} absent, loading empty", path);
        return Ok(Vec::new());
    }
    let content = tokio::fs::read_to_string(&path).await?;
    Ok(serde_json::from_str(&content)?)
}

#[async_trait]
impl CampusStore for MemoryStore {
    async fn student(&self, id: &str) -> Result<Option<StudentRecord>> {
        Ok(self.students.iter().find(|s| s.id == id).cloned())
    }

    async fn active_enrollments(&self, student_id: &str) -> Result<Vec<Enrollment>> {
        Ok(self
            .enrollments
            .iter()
            .filter(|e| e.student_id == student_id && e.is_active())
            .cloned()
            .collect())
    }

    async fn module(&self, code: &str) -> Result<Option<Module>> {
        Ok(self.modules.iter().find(|m| m.code == code).cloned())
    }

    async fn announcements(&self, module_code: &str) -> Result<Vec<Announcement>> {
        Ok(self
            .announcements
            .iter()
            .filter(|a| a.module_code == module_code)
            .cloned()
            .collect())
    }

    async fn assignments(&self, module_code: &str) -> Result<Vec<Assignment>> {
        Ok(self
            .assignments
            .iter()
            .filter(|a| a.module_code == module_code)
            .cloned()
            .collect())
    }

    async fn schedule_events(&self, module_codes: &[String]) -> Result<Vec<ScheduleEvent>> {
        Ok(self
            .schedule
            .iter()
            .filter(|e| module_codes.contains(&e.module_code))
            .cloned()
            .collect())
    }

    async fn payments(&self, student_id: &str) -> Result<Vec<PaymentRecord>> {
        Ok(self
            .payments
            .iter()
            .filter(|p| p.student_id == student_id)
            .cloned()
            .collect())
    }

    async fn campus_events(&self) -> Result<Vec<CampusEvent>> {
        Ok(self.events.clone())
    }

    async fn materials(&self, module_code: &str) -> Result<Vec<Material>> {
        Ok(self
            .materials
            .iter()
            .filter(|m| m.module_code == module_code)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_store() -> MemoryStore {
        MemoryStore {
            students: vec![StudentRecord {
                id: "s1000001".to_string(),
                name: "Mei Tanaka".to_string(),
                email: "mei@uni.example.edu".to_string(),
                school: "Engineering".to_string(),
                program: "Software Engineering".to_string(),
                year: 2,
                wam: 3.8,
                password_hash: "argon2$...".to_string(),
            }],
            enrollments: vec![
                Enrollment {
                    student_id: "s1000001".to_string(),
                    module_code: "COMP1511".to_string(),
                    status: "active".to_string(),
                },
                Enrollment {
                    student_id: "s1000001".to_string(),
                    module_code: "MATH1081".to_string(),
                    status: "dropped".to_string(),
                },
            ],
            modules: vec![Module {
                code: "COMP1511".to_string(),
                name: "Programming Fundamentals".to_string(),
                credits: 6,
                description: "Introductory programming".to_string(),
                coordinator: None,
            }],
            ..MemoryStore::default()
        }
    }

    #[tokio::test]
    async fn student_lookup() {
        let store = sample_store();
        let found = store.student("s1000001").await.unwrap();
        assert_eq!(found.unwrap().name, "Mei Tanaka");

        let missing = store.student("s9999999").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn active_enrollments_excludes_dropped() {
        let store = sample_store();
        let active = store.active_enrollments("s1000001").await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].module_code, "COMP1511");
    }

    #[tokio::test]
    async fn module_lookup() {
        let store = sample_store();
        assert!(store.module("COMP1511").await.unwrap().is_some());
        assert!(store.module("COMP9999").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn schedule_events_filters_by_module_codes() {
        let mut store = sample_store();
        store.schedule = vec![
            ScheduleEvent {
                module_code: "COMP1511".to_string(),
                title: "Lecture".to_string(),
                date: NaiveDate::from_ymd_opt(2026, 2, 2).unwrap(),
                start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
                end_time: NaiveTime::from_hms_opt(11, 0, 0).unwrap(),
                location: "CLB 7".to_string(),
            },
            ScheduleEvent {
                module_code: "MATH1081".to_string(),
                title: "Tutorial".to_string(),
                date: NaiveDate::from_ymd_opt(2026, 2, 2).unwrap(),
                start_time: NaiveTime::from_hms_opt(13, 0, 0).unwrap(),
                end_time: NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
                location: "Quad 1001".to_string(),
            },
        ];

        let events = store
            .schedule_events(&["COMP1511".to_string()])
            .await
            .unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].location, "CLB 7");
    }
}
