//! Tests for loading campus data from a JSON collection directory

use campusbuddy_store::{CampusStore, MemoryStore};
use serde_json::json;
use tempfile::TempDir;

async fn write(dir: &TempDir, name: &str, value: serde_json::Value) {
    let path = dir.path().join(name);
    tokio::fs::write(path, serde_json::to_string_pretty(&value).unwrap())
        .await
        .unwrap();
}

#[tokio::test]
async fn load_dir_round_trips_collections() {
    let dir = TempDir::new().unwrap();

    write(
        &dir,
        "students.json",
        json!([{
            "id": "s1000001",
            "name": "Mei Tanaka",
            "email": "mei@uni.example.edu",
            "school": "Engineering",
            "program": "Software Engineering",
            "year": 2,
            "wam": 3.8,
            "password_hash": "argon2$x"
        }]),
    )
    .await;

    write(
        &dir,
        "modules.json",
        json!([{
            "code": "COMP1511",
            "name": "Programming Fundamentals",
            "credits": 6,
            "description": "Introductory programming"
        }]),
    )
    .await;

    write(
        &dir,
        "materials.json",
        json!([{
            "module_code": "COMP1511",
            "title": "Week 1 Notes",
            "category": "notes",
            "uploaded_at": "2026-01-12",
            "text": "Pointers are addresses."
        }]),
    )
    .await;

    let store = MemoryStore::load_dir(dir.path()).await.unwrap();

    let student = store.student("s1000001").await.unwrap().unwrap();
    assert_eq!(student.wam, 3.8);

    let module = store.module("COMP1511").await.unwrap().unwrap();
    assert_eq!(module.credits, 6);
    assert!(module.coordinator.is_none());

    let materials = store.materials("COMP1511").await.unwrap();
    assert_eq!(materials.len(), 1);
    assert_eq!(materials[0].category, "notes");
}

#[tokio::test]
async fn missing_collection_files_load_as_empty() {
    let dir = TempDir::new().unwrap();

    let store = MemoryStore::load_dir(dir.path()).await.unwrap();

    assert!(store.students.is_empty());
    assert!(store.campus_events().await.unwrap().is_empty());
    assert!(store.materials("COMP1511").await.unwrap().is_empty());
}

#[tokio::test]
async fn malformed_collection_is_an_error() {
    let dir = TempDir::new().unwrap();
    tokio::fs::write(dir.path().join("students.json"), "not json")
        .await
        .unwrap();

    assert!(MemoryStore::load_dir(dir.path()).await.is_err());
}
