//! CampusBuddy command implementations

use anyhow::{bail, Context, Result};
use std::io::Write;
use std::sync::Arc;
use tracing::info;

use campusbuddy_agent::{Caller, ChatAgent, ChatMode, ChatRequest};
use campusbuddy_config::{self as config, Config};
use campusbuddy_provider::OpenRouterProvider;
use campusbuddy_session::SessionManager;
use campusbuddy_store::{CampusStore, MemoryStore};

/// Build an agent from config: provider, campus data, sessions
async fn build_agent(config: &Config) -> Result<ChatAgent<OpenRouterProvider>> {
    let api_key = config
        .api_key()
        .context("No API key configured. Set one in ~/.campusbuddy/config.json")?;
    let provider = OpenRouterProvider::new(api_key, config.api_base(), Some(config.default_model()));

    let store = MemoryStore::load_dir(config::campus_data_dir())
        .await
        .context("Failed to load campus data; run 'buddy init' first")?;
    let store: Arc<dyn CampusStore> = Arc::new(store);

    Ok(ChatAgent::with_config(
        provider,
        store,
        config,
        config::sessions_dir(),
    ))
}

/// Resolve the caller identity for a mode tag
fn resolve_caller(user: Option<String>, mode: &ChatMode) -> Result<Caller> {
    match (user, mode) {
        (Some(id), _) => Ok(Caller::Student(id)),
        (None, ChatMode::Guest) => Ok(Caller::Guest),
        (None, _) => bail!("--user is required unless --mode guest"),
    }
}

fn print_reply(reply: &campusbuddy_agent::ChatReply) {
    // Aborted runs already carry the user-safe generic wording.
    println!("\n{}\n", reply.content);
}

/// Ask one question
pub async fn ask_command(
    message: String,
    user: Option<String>,
    mode: String,
    session: String,
) -> Result<()> {
    let config = Config::load().await?;
    let agent = build_agent(&config).await?;

    let mode = ChatMode::from_tag(&mode);
    let caller = resolve_caller(user, &mode)?;

    let reply = agent
        .process_message(ChatRequest::new(caller, mode, session, message))
        .await;
    print_reply(&reply);

    Ok(())
}

/// Interactive chat loop
pub async fn chat_command(user: Option<String>, mode: String, session: String) -> Result<()> {
    let config = Config::load().await?;
    let agent = build_agent(&config).await?;

    let mode = ChatMode::from_tag(&mode);
    let caller = resolve_caller(user, &mode)?;

    println!("CampusBuddy ({} mode, type 'exit' to quit)", mode.as_str());
    println!("----------------------------------------");

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;

        let input = input.trim();
        if input.is_empty() {
            continue;
        }
        if input == "exit" || input == "quit" {
            break;
        }

        let reply = agent
            .process_message(ChatRequest::new(
                caller.clone(),
                mode,
                session.clone(),
                input,
            ))
            .await;
        print_reply(&reply);
    }

    Ok(())
}

/// Initialize config, directories, and sample campus data
pub async fn init_command() -> Result<()> {
    println!("Initializing CampusBuddy...");

    let _config = config::init().await?;

    let data_dir = config::campus_data_dir();
    create_sample(&data_dir, "students.json", SAMPLE_STUDENTS).await?;
    create_sample(&data_dir, "enrollments.json", SAMPLE_ENROLLMENTS).await?;
    create_sample(&data_dir, "modules.json", SAMPLE_MODULES).await?;
    create_sample(&data_dir, "announcements.json", SAMPLE_ANNOUNCEMENTS).await?;
    create_sample(&data_dir, "assignments.json", SAMPLE_ASSIGNMENTS).await?;
    create_sample(&data_dir, "schedule.json", SAMPLE_SCHEDULE).await?;
    create_sample(&data_dir, "payments.json", SAMPLE_PAYMENTS).await?;
    create_sample(&data_dir, "events.json", SAMPLE_EVENTS).await?;
    create_sample(&data_dir, "materials.json", SAMPLE_MATERIALS).await?;

    println!("\nCampusBuddy initialized");
    println!("\nNext steps:");
    println!("  1. Add your API key to ~/.campusbuddy/config.json");
    println!("     Get one at: https://openrouter.ai/keys");
    println!("  2. Ask a question: buddy ask --user s1000001 \"What's my schedule this week?\"");

    Ok(())
}

async fn create_sample(dir: &std::path::Path, filename: &str, content: &str) -> Result<()> {
    let path = dir.join(filename);
    if !path.exists() {
        tokio::fs::write(&path, content).await?;
        info!("created {}", path.display());
    }
    Ok(())
}

/// Show configuration and data status
pub async fn status_command() -> Result<()> {
    let config_path = config::config_path();
    let data_dir = config::campus_data_dir();

    println!("CampusBuddy Status");
    println!("------------------");

    println!(
        "Config:   {} {}",
        config_path.display(),
        if config_path.exists() { "[OK]" } else { "[Missing]" }
    );
    println!(
        "Data:     {} {}",
        data_dir.display(),
        if data_dir.exists() { "[OK]" } else { "[Missing]" }
    );

    if config_path.exists() {
        let config = Config::load().await?;
        println!("Model:    {}", config.default_model());
        println!(
            "API Key:  {}",
            if config.has_api_key() { "[Set]" } else { "[Missing]" }
        );
        println!("Turn cap: {}", config.max_turns());
        println!(
            "Guest:    {} messages per {}h window",
            config.guest.max_messages, config.guest.window_hours
        );
    }

    if data_dir.exists() {
        let store = MemoryStore::load_dir(&data_dir).await?;
        println!(
            "Records:  {} students, {} modules, {} materials, {} events",
            store.students.len(),
            store.modules.len(),
            store.materials.len(),
            store.events.len()
        );
    }

    Ok(())
}

/// List stored conversations
pub async fn sessions_list_command() -> Result<()> {
    let manager = SessionManager::new(config::sessions_dir());
    let keys = manager.list().await;

    if keys.is_empty() {
        println!("No stored conversations");
    } else {
        println!("Stored conversations:");
        for key in keys {
            println!("  {}", key);
        }
    }

    Ok(())
}

/// Delete a stored conversation
pub async fn sessions_clear_command(key: String) -> Result<()> {
    let mut manager = SessionManager::new(config::sessions_dir());

    if manager.delete(&key).await? {
        println!("Deleted {}", key);
    } else {
        println!("No conversation named {}", key);
    }

    Ok(())
}

// Sample campus data written by `buddy init`

const SAMPLE_STUDENTS: &str = r#"[
  {
    "id": "s1000001",
    "name": "Mei Tanaka",
    "email": "mei@uni.example.edu",
    "school": "Engineering",
    "program": "Software Engineering",
    "year": 2,
    "wam": 3.8,
    "password_hash": ""
  }
]
"#;

const SAMPLE_ENROLLMENTS: &str = r#"[
  { "student_id": "s1000001", "module_code": "COMP1511", "status": "active" },
  { "student_id": "s1000001", "module_code": "COMP2521", "status": "active" }
]
"#;

const SAMPLE_MODULES: &str = r#"[
  {
    "code": "COMP1511",
    "name": "Programming Fundamentals",
    "credits": 6,
    "description": "Introductory programming in C",
    "coordinator": "Dr. Reyes"
  },
  {
    "code": "COMP2521",
    "name": "Data Structures and Algorithms",
    "credits": 6,
    "description": "Core data structures and algorithm analysis"
  }
]
"#;

const SAMPLE_ANNOUNCEMENTS: &str = r#"[
  {
    "module_code": "COMP1511",
    "title": "Welcome to COMP1511",
    "body": "Lectures start Monday week 1. See the course outline for details.",
    "posted_at": "2026-08-03T09:00:00Z"
  }
]
"#;

const SAMPLE_ASSIGNMENTS: &str = r#"[
  {
    "module_code": "COMP1511",
    "title": "Assignment 1",
    "due_date": "2026-09-18",
    "weight_percent": 15
  }
]
"#;

const SAMPLE_SCHEDULE: &str = r#"[
  {
    "module_code": "COMP1511",
    "title": "Lecture",
    "date": "2026-08-10",
    "start_time": "09:00:00",
    "end_time": "11:00:00",
    "location": "CLB 7"
  },
  {
    "module_code": "COMP2521",
    "title": "Tutorial",
    "date": "2026-08-10",
    "start_time": "13:00:00",
    "end_time": "14:00:00",
    "location": "Quad 1001"
  }
]
"#;

const SAMPLE_PAYMENTS: &str = r#"[
  {
    "student_id": "s1000001",
    "description": "Term 3 tuition",
    "amount": 4200.0,
    "due_date": "2026-08-28",
    "status": "due"
  }
]
"#;

const SAMPLE_EVENTS: &str = r#"[
  {
    "title": "Open Day",
    "description": "Campus-wide open day with faculty tours",
    "starts_at": "2026-09-05T09:00:00Z",
    "location": "Main Quad"
  },
  {
    "title": "Careers Fair",
    "description": "Employers on campus, bring your resume",
    "starts_at": "2026-08-20T10:00:00Z",
    "location": "Roundhouse"
  }
]
"#;

const SAMPLE_MATERIALS: &str = r#"[
  {
    "module_code": "COMP1511",
    "title": "Week 1 Notes",
    "category": "notes",
    "uploaded_at": "2026-08-03",
    "text": "Variables hold values. Pointers hold addresses. A linked list is a chain of nodes where each node points to the next."
  }
]
"#;
