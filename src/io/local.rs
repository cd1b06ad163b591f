use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use tempfile::NamedTempFile;

use crate::io::log::{self, LogCategory};
use crate::io::paths::DataPaths;
use crate::model::{SubTask, Task, TaskStatus, TaskType, User};

/// Error type for files under the data directory
#[derive(Debug, thiserror::Error)]
pub enum LocalError {
    #[error("could not read {path}: {source}")]
    ReadError { path: PathBuf, source: io::Error },
    #[error("could not write {path}: {source}")]
    WriteError { path: PathBuf, source: io::Error },
    #[error("could not serialize {what}: {source}")]
    SerializeError {
        what: &'static str,
        source: serde_json::Error,
    },
}

/// Result of reading the board document
#[derive(Debug)]
pub struct LocalTasks {
    pub tasks: Vec<Task>,
    /// True when the built-in starter tasks were substituted
    pub seeded: bool,
    /// Set when an unreadable file was set aside for the seed
    pub recovered: Option<String>,
}

/// Starter tasks for a brand-new board
pub fn seed_tasks() -> Vec<Task> {
    let now = Utc::now();
    vec![
        Task {
            id: "task-1".to_string(),
            title: "Create project plan".to_string(),
            description: "Outline the project scope and timeline".to_string(),
            status: TaskStatus::Backlog,
            task_type: TaskType::Task,
            assignee: "User".to_string(),
            created_at: now,
            updated_at: now,
            subtasks: vec![
                SubTask {
                    id: "subtask-1".to_string(),
                    title: "Define objectives".to_string(),
                    completed: true,
                },
                SubTask::new("subtask-2".to_string(), "Identify stakeholders".to_string()),
            ],
        },
        Task {
            id: "task-2".to_string(),
            title: "Fix login button".to_string(),
            description: "The login button doesn't work on mobile devices".to_string(),
            status: TaskStatus::InProgress,
            task_type: TaskType::Bug,
            assignee: "Developer".to_string(),
            created_at: now,
            updated_at: now,
            subtasks: Vec::new(),
        },
    ]
}

/// Read tasks.json. A missing file means a fresh board and yields the
/// seed; an unreadable one is copied into the sync log, then replaced
/// by the seed so the app keeps working.
pub fn read_tasks(paths: &DataPaths) -> LocalTasks {
    let path = paths.tasks_file();
    if !path.exists() {
        return LocalTasks {
            tasks: seed_tasks(),
            seeded: true,
            recovered: None,
        };
    }
    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) => {
            let message = format!("could not read {}: {}", path.display(), e);
            log::append(paths, LogCategory::Local, &message);
            return LocalTasks {
                tasks: seed_tasks(),
                seeded: true,
                recovered: Some(message),
            };
        }
    };
    match serde_json::from_str::<Vec<Task>>(&text) {
        Ok(tasks) => LocalTasks {
            tasks,
            seeded: false,
            recovered: None,
        },
        Err(e) => {
            let message = format!("could not parse {}: {}", path.display(), e);
            log::append_with_body(paths, LogCategory::Local, &message, &text);
            LocalTasks {
                tasks: seed_tasks(),
                seeded: true,
                recovered: Some(message),
            }
        }
    }
}

/// Write tasks.json atomically
pub fn write_tasks(paths: &DataPaths, tasks: &[Task]) -> Result<(), LocalError> {
    paths.ensure_root().map_err(|e| LocalError::WriteError {
        path: paths.root().to_path_buf(),
        source: e,
    })?;
    let json =
        serde_json::to_string_pretty(tasks).map_err(|e| LocalError::SerializeError {
            what: "tasks",
            source: e,
        })?;
    let path = paths.tasks_file();
    atomic_write(&path, json.as_bytes())
        .map_err(|e| LocalError::WriteError { path, source: e })
}

/// Read the saved session. Missing or corrupt files read as signed out.
pub fn read_session(paths: &DataPaths) -> Option<User> {
    let text = fs::read_to_string(paths.session_file()).ok()?;
    serde_json::from_str(&text).ok()
}

/// Persist the signed-in user
pub fn write_session(paths: &DataPaths, user: &User) -> Result<(), LocalError> {
    paths.ensure_root().map_err(|e| LocalError::WriteError {
        path: paths.root().to_path_buf(),
        source: e,
    })?;
    let json = serde_json::to_string_pretty(user).map_err(|e| LocalError::SerializeError {
        what: "session",
        source: e,
    })?;
    let path = paths.session_file();
    atomic_write(&path, json.as_bytes())
        .map_err(|e| LocalError::WriteError { path, source: e })
}

/// Remove the saved session. Already-gone counts as success.
pub fn clear_session(paths: &DataPaths) -> Result<(), LocalError> {
    let path = paths.session_file();
    match fs::remove_file(&path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(LocalError::WriteError { path, source: e }),
    }
}

/// Write `content` to `path` atomically using a temp file + rename.
pub(crate) fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
