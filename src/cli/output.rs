use indexmap::IndexMap;
use serde::Serialize;

use crate::model::{AuthState, Role, Task, TaskStatus, TaskType};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

// Task itself serializes in the stored document shape, so listings emit the
// model directly. Compound outputs get their own structs here.

#[derive(Serialize)]
pub struct SessionJson<'a> {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    pub can_manage_tasks: bool,
}

#[derive(Serialize)]
pub struct ColumnJson<'a> {
    pub status: TaskStatus,
    pub label: &'static str,
    pub count: usize,
    pub tasks: Vec<&'a Task>,
}

#[derive(Serialize)]
pub struct RemoteSettingsJson<'a> {
    pub mode: &'static str,
    pub enabled: bool,
    pub api_key_set: bool,
    pub url: &'a str,
    pub timeout_secs: u64,
}

#[derive(Serialize)]
pub struct SyncRunJson<'a> {
    pub mode: &'static str,
    pub origin: &'static str,
    pub task_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advisory: Option<&'a str>,
}

#[derive(Serialize)]
pub struct SyncLogJson {
    pub entries: Vec<String>,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn session_to_json(auth: &AuthState) -> SessionJson<'_> {
    SessionJson {
        authenticated: auth.is_authenticated,
        username: auth.user.as_ref().map(|u| u.username.as_str()),
        role: auth.user.as_ref().map(|u| u.role),
        can_manage_tasks: crate::auth::can_manage_tasks(auth),
    }
}

pub fn board_to_json<'a>(columns: &IndexMap<TaskStatus, Vec<&'a Task>>) -> Vec<ColumnJson<'a>> {
    columns
        .iter()
        .map(|(status, tasks)| ColumnJson {
            status: *status,
            label: status.label(),
            count: tasks.len(),
            tasks: tasks.clone(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

/// Format a single task as a one-line summary
pub fn format_task_line(task: &Task) -> String {
    let mut line = format!(
        "{} {} {} ({})",
        task.status.symbol(),
        task.id,
        task.title,
        task.task_type.as_str()
    );
    if !task.assignee.is_empty() {
        line.push_str(&format!(" @{}", task.assignee));
    }
    if let Some((done, total)) = task.subtask_progress() {
        line.push_str(&format!(" [{}/{}]", done, total));
    }
    line
}

/// Format detailed task view
pub fn format_task_detail(task: &Task) -> Vec<String> {
    let mut lines = Vec::new();

    // Header
    lines.push(format!("{} {} {}", task.status.symbol(), task.id, task.title));
    lines.push(format!("type: {}", task.task_type.as_str()));
    lines.push(format!(
        "status: {} ({})",
        task.status.as_str(),
        task.status.label()
    ));
    lines.push(format!("assignee: {}", task.assignee_label()));
    lines.push(format!(
        "created: {}",
        task.created_at.format("%Y-%m-%d %H:%M")
    ));
    lines.push(format!(
        "updated: {}",
        task.updated_at.format("%Y-%m-%d %H:%M")
    ));

    if !task.description.is_empty() {
        lines.push(String::new());
        lines.push("description:".to_string());
        for line in task.description.lines() {
            lines.push(format!("  {}", line));
        }
    }

    if !task.subtasks.is_empty() {
        lines.push(String::new());
        lines.push("subtasks:".to_string());
        for (i, sub) in task.subtasks.iter().enumerate() {
            let mark = if sub.completed { "[x]" } else { "[ ]" };
            lines.push(format!("  {}. {} {}", i + 1, mark, sub.title));
        }
    }

    lines
}

/// Format a board column header
pub fn format_column_header(status: TaskStatus, count: usize) -> String {
    format!("== {} ({}) ==", status.label(), count)
}

/// Format the whole board, column by column
pub fn format_board(columns: &IndexMap<TaskStatus, Vec<&Task>>) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, (status, tasks)) in columns.iter().enumerate() {
        if i > 0 {
            lines.push(String::new());
        }
        lines.push(format_column_header(*status, tasks.len()));
        for task in tasks {
            lines.push(format!("  {}", format_task_line(task)));
        }
    }
    lines
}

/// Parse a status argument into TaskStatus
pub fn parse_status_arg(s: &str) -> Result<TaskStatus, String> {
    TaskStatus::parse(s).ok_or_else(|| {
        format!(
            "unknown status '{}' (expected: backlog, inprogress, ready-to-check, done)",
            s
        )
    })
}

/// Parse a type argument into TaskType
pub fn parse_type_arg(s: &str) -> Result<TaskType, String> {
    TaskType::parse(s).ok_or_else(|| {
        format!(
            "unknown type '{}' (expected: feature, bug, task, improvement)",
            s
        )
    })
}
