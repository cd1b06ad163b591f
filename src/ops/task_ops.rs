use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Duration, Utc};

use crate::io::store::{SaveReport, TaskStore};
use crate::model::{Task, TaskDraft, TaskPatch, TaskStatus};

/// Error type for task operations
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error("task not found: {0}")]
    NotFound(String),
    #[error("task {task_id} has no subtask #{index}")]
    NoSuchSubtask { task_id: String, index: usize },
}

// ---------------------------------------------------------------------------
// Ids and timestamps
// ---------------------------------------------------------------------------

static ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Opaque id: wall-clock nanos plus a process-wide counter, both hex
pub fn generate_id() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let seq = ID_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{:x}{:02x}", nanos, seq)
}

fn unique_id(tasks: &[Task]) -> String {
    loop {
        let id = generate_id();
        if !tasks.iter().any(|t| t.id == id) {
            return id;
        }
    }
}

/// An update time strictly after `prev`, even against a stalled or
/// rewound clock.
fn bumped_timestamp(prev: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > prev {
        now
    } else {
        prev + Duration::milliseconds(1)
    }
}

// ---------------------------------------------------------------------------
// Create / edit / remove
// ---------------------------------------------------------------------------

/// Create a task from the draft and save. Both timestamps get the same
/// instant; the id is fresh within the collection.
pub fn create_task(
    store: &TaskStore,
    tasks: &[Task],
    draft: TaskDraft,
) -> (Vec<Task>, Task, SaveReport) {
    let now = Utc::now();
    let task = Task {
        id: unique_id(tasks),
        title: draft.title,
        description: draft.description,
        status: draft.status,
        task_type: draft.task_type,
        assignee: draft.assignee,
        created_at: now,
        updated_at: now,
        subtasks: draft.subtasks,
    };
    let (updated, report) = store.add_task(tasks, task.clone());
    (updated, task, report)
}

/// Overlay the patch onto the task and save. `updated_at` moves strictly
/// forward on every edit.
pub fn edit_task(
    store: &TaskStore,
    tasks: &[Task],
    task_id: &str,
    patch: TaskPatch,
) -> Result<(Vec<Task>, Task, SaveReport), TaskError> {
    let current = tasks
        .iter()
        .find(|t| t.id == task_id)
        .ok_or_else(|| TaskError::NotFound(task_id.to_string()))?;
    let mut updated_task = current.clone();
    patch.apply(&mut updated_task);
    updated_task.updated_at = bumped_timestamp(current.updated_at);
    let (updated, report) = store.update_task(tasks, updated_task.clone());
    Ok((updated, updated_task, report))
}

/// Move a task to another column; sugar over `edit_task`
pub fn update_task_status(
    store: &TaskStore,
    tasks: &[Task],
    task_id: &str,
    status: TaskStatus,
) -> Result<(Vec<Task>, Task, SaveReport), TaskError> {
    edit_task(
        store,
        tasks,
        task_id,
        TaskPatch {
            status: Some(status),
            ..TaskPatch::default()
        },
    )
}

/// Remove by id and save. Removing an absent id just saves the list
/// unchanged, so repeating a remove is harmless.
pub fn remove_task(store: &TaskStore, tasks: &[Task], task_id: &str) -> (Vec<Task>, SaveReport) {
    store.delete_task(tasks, task_id)
}

/// Flip one subtask's completed flag, by position
pub fn toggle_subtask(
    store: &TaskStore,
    tasks: &[Task],
    task_id: &str,
    index: usize,
) -> Result<(Vec<Task>, Task, SaveReport), TaskError> {
    let current = tasks
        .iter()
        .find(|t| t.id == task_id)
        .ok_or_else(|| TaskError::NotFound(task_id.to_string()))?;
    let mut subtasks = current.subtasks.clone();
    let subtask = subtasks
        .get_mut(index)
        .ok_or_else(|| TaskError::NoSuchSubtask {
            task_id: task_id.to_string(),
            index,
        })?;
    subtask.completed = !subtask.completed;
    edit_task(
        store,
        tasks,
        task_id,
        TaskPatch {
            subtasks: Some(subtasks),
            ..TaskPatch::default()
        },
    )
}
