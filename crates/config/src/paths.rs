//! Filesystem path conventions

use std::path::PathBuf;

/// Root data directory (~/.campusbuddy)
pub fn data_dir() -> PathBuf {
    dirs::home_dir()
        .expect("failed to locate home directory")
        .join(".campusbuddy")
}

/// Config file location
pub fn config_path() -> PathBuf {
    data_dir().join("config.json")
}

/// Campus document collections (students, modules, materials, ...)
pub fn campus_data_dir() -> PathBuf {
    data_dir().join("data")
}

/// Conversation session storage
pub fn sessions_dir() -> PathBuf {
    data_dir().join("sessions")
}

/// Ensure directory exists
pub async fn ensure_dir(path: &PathBuf) -> std::io::Result<()> {
    tokio::fs::create_dir_all(path).await
}
