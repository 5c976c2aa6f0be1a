//! Shared fixtures: a populated campus store and a scripted provider
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, NaiveTime, TimeZone, Utc};

use campusbuddy_provider::{
    ChatParams, ChatResponse, Provider, ProviderError, ToolCall,
};
use campusbuddy_store::{
    Announcement, Assignment, CampusEvent, Enrollment, Material, MemoryStore, Module,
    PaymentRecord, ScheduleEvent, StudentRecord,
};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

/// A store with one student enrolled in two modules, plus materials,
/// payments, and events.
pub fn sample_store() -> MemoryStore {
    MemoryStore {
        students: vec![StudentRecord {
            id: "s1000001".to_string(),
            name: "Mei Tanaka".to_string(),
            email: "mei@uni.example.edu".to_string(),
            school: "Engineering".to_string(),
            program: "Software Engineering".to_string(),
            year: 2,
            wam: 3.8,
            password_hash: "argon2$secret".to_string(),
        }],
        enrollments: vec![
            Enrollment {
                student_id: "s1000001".to_string(),
                module_code: "COMP1511".to_string(),
                status: "active".to_string(),
            },
            Enrollment {
                student_id: "s1000001".to_string(),
                module_code: "COMP2521".to_string(),
                status: "active".to_string(),
            },
            Enrollment {
                student_id: "s1000001".to_string(),
                module_code: "MATH1081".to_string(),
                status: "dropped".to_string(),
            },
        ],
        modules: vec![
            Module {
                code: "COMP1511".to_string(),
                name: "Programming Fundamentals".to_string(),
                credits: 6,
                description: "Introductory programming in C".to_string(),
                coordinator: Some("Dr. Reyes".to_string()),
            },
            Module {
                code: "COMP2521".to_string(),
                name: "Data Structures and Algorithms".to_string(),
                credits: 6,
                description: "Core data structures".to_string(),
                coordinator: None,
            },
        ],
        announcements: vec![
            Announcement {
                module_code: "COMP1511".to_string(),
                title: "Week 1 lab released".to_string(),
                body: "See the labs page.".to_string(),
                posted_at: Utc.with_ymd_and_hms(2026, 1, 10, 9, 0, 0).unwrap(),
            },
            Announcement {
                module_code: "COMP1511".to_string(),
                title: "Assignment 1 out".to_string(),
                body: "Due week 5.".to_string(),
                posted_at: Utc.with_ymd_and_hms(2026, 1, 20, 9, 0, 0).unwrap(),
            },
            Announcement {
                module_code: "COMP1511".to_string(),
                title: "Lecture recording fixed".to_string(),
                body: "Re-uploaded.".to_string(),
                posted_at: Utc.with_ymd_and_hms(2026, 1, 15, 9, 0, 0).unwrap(),
            },
            Announcement {
                module_code: "COMP1511".to_string(),
                title: "Welcome".to_string(),
                body: "Welcome to COMP1511.".to_string(),
                posted_at: Utc.with_ymd_and_hms(2026, 1, 5, 9, 0, 0).unwrap(),
            },
        ],
        assignments: vec![Assignment {
            module_code: "COMP1511".to_string(),
            title: "Assignment 1".to_string(),
            due_date: date(2026, 3, 6),
            weight_percent: 15,
        }],
        schedule: vec![
            ScheduleEvent {
                module_code: "COMP2521".to_string(),
                title: "Tutorial".to_string(),
                date: date(2026, 2, 2),
                start_time: time(13, 0),
                end_time: time(14, 0),
                location: "Quad 1001".to_string(),
            },
            ScheduleEvent {
                module_code: "COMP1511".to_string(),
                title: "Lecture".to_string(),
                date: date(2026, 2, 2),
                start_time: time(9, 0),
                end_time: time(11, 0),
                location: "CLB 7".to_string(),
            },
            ScheduleEvent {
                module_code: "COMP1511".to_string(),
                title: "Lab".to_string(),
                date: date(2026, 2, 4),
                start_time: time(15, 0),
                end_time: time(17, 0),
                location: "J17 Lab 2".to_string(),
            },
        ],
        payments: vec![
            PaymentRecord {
                student_id: "s1000001".to_string(),
                description: "Term 1 tuition".to_string(),
                amount: 4200.0,
                due_date: date(2026, 2, 28),
                status: "due".to_string(),
            },
            PaymentRecord {
                student_id: "s1000001".to_string(),
                description: "Gym membership".to_string(),
                amount: 99.0,
                due_date: date(2026, 1, 31),
                status: "overdue".to_string(),
            },
            PaymentRecord {
                student_id: "s1000001".to_string(),
                description: "Library fine".to_string(),
                amount: 12.5,
                due_date: date(2026, 1, 10),
                status: "paid".to_string(),
            },
        ],
        events: vec![
            CampusEvent {
                title: "Open Day".to_string(),
                description: "Campus-wide open day".to_string(),
                starts_at: Utc::now() + Duration::days(7),
                location: "Main Quad".to_string(),
            },
            CampusEvent {
                title: "Orientation Week".to_string(),
                description: "Welcome activities".to_string(),
                starts_at: Utc::now() + Duration::days(2),
                location: "Roundhouse".to_string(),
            },
            CampusEvent {
                title: "Last Year's Gala".to_string(),
                description: "Already happened".to_string(),
                starts_at: Utc::now() - Duration::days(30),
                location: "Great Hall".to_string(),
            },
        ],
        materials: vec![
            Material {
                module_code: "COMP1511".to_string(),
                title: "Week 1 Notes".to_string(),
                category: "notes".to_string(),
                uploaded_at: date(2026, 1, 12),
                text: "Variables hold values. Pointers hold addresses. A linked list \
                       is a chain of nodes where each node points to the next."
                    .to_string(),
            },
            Material {
                module_code: "COMP1511".to_string(),
                title: "Week 2 Slides".to_string(),
                category: "slides".to_string(),
                uploaded_at: date(2026, 1, 19),
                text: "Arrays are contiguous. Linked lists trade locality for \
                       cheap insertion."
                    .to_string(),
            },
        ],
    }
}

/// Provider that replays a queue of canned responses and records the
/// params of every call it receives.
pub struct ScriptedProvider {
    responses: Mutex<VecDeque<Result<ChatResponse, ProviderError>>>,
    pub calls: Arc<Mutex<Vec<ChatParams>>>,
}

impl ScriptedProvider {
    pub fn new(responses: Vec<Result<ChatResponse, ProviderError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A provider that requests the same tool call forever.
    pub fn always_requesting(name: &str, arguments: serde_json::Value) -> Self {
        let call = ToolCall {
            id: "call_loop".to_string(),
            name: name.to_string(),
            arguments,
        };
        let responses = (0..10)
            .map(|_| Ok(ChatResponse::tool_requests(vec![call.clone()])))
            .collect();
        Self::new(responses)
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    async fn chat(&self, params: ChatParams) -> Result<ChatResponse, ProviderError> {
        self.calls.lock().unwrap().push(params);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(ChatResponse::text("script exhausted")))
    }

    fn default_model(&self) -> String {
        "scripted/test".to_string()
    }

    fn is_configured(&self) -> bool {
        true
    }
}
