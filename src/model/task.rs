use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Workflow stage of a task, one board column each
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    #[default]
    #[serde(rename = "backlog")]
    Backlog,
    #[serde(rename = "inprogress")]
    InProgress,
    #[serde(rename = "ready-to-check")]
    ReadyToCheck,
    #[serde(rename = "done")]
    Done,
}

impl TaskStatus {
    /// Column order on the board
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::Backlog,
        TaskStatus::InProgress,
        TaskStatus::ReadyToCheck,
        TaskStatus::Done,
    ];

    /// The spelling used in stored documents and on the command line
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Backlog => "backlog",
            TaskStatus::InProgress => "inprogress",
            TaskStatus::ReadyToCheck => "ready-to-check",
            TaskStatus::Done => "done",
        }
    }

    /// Column heading
    pub fn label(self) -> &'static str {
        match self {
            TaskStatus::Backlog => "Backlog",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::ReadyToCheck => "Ready to Check",
            TaskStatus::Done => "Done",
        }
    }

    /// Checkbox-style marker used in line output
    pub fn symbol(self) -> &'static str {
        match self {
            TaskStatus::Backlog => "[ ]",
            TaskStatus::InProgress => "[>]",
            TaskStatus::ReadyToCheck => "[?]",
            TaskStatus::Done => "[x]",
        }
    }

    /// Parse a status name; accepts the stored spelling plus common aliases
    pub fn parse(s: &str) -> Option<TaskStatus> {
        match s.trim().to_lowercase().as_str() {
            "backlog" => Some(TaskStatus::Backlog),
            "inprogress" | "in-progress" => Some(TaskStatus::InProgress),
            "ready-to-check" | "ready" => Some(TaskStatus::ReadyToCheck),
            "done" => Some(TaskStatus::Done),
            _ => None,
        }
    }

    /// Next column to the right, if any
    pub fn next(self) -> Option<TaskStatus> {
        let idx = Self::ALL.iter().position(|s| *s == self)?;
        Self::ALL.get(idx + 1).copied()
    }

    /// Previous column to the left, if any
    pub fn prev(self) -> Option<TaskStatus> {
        let idx = Self::ALL.iter().position(|s| *s == self)?;
        idx.checked_sub(1).map(|i| Self::ALL[i])
    }
}

/// Category of work a task represents
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskType {
    Feature,
    Bug,
    #[default]
    Task,
    Improvement,
}

impl TaskType {
    pub const ALL: [TaskType; 4] = [
        TaskType::Feature,
        TaskType::Bug,
        TaskType::Task,
        TaskType::Improvement,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TaskType::Feature => "feature",
            TaskType::Bug => "bug",
            TaskType::Task => "task",
            TaskType::Improvement => "improvement",
        }
    }

    /// Badge text shown on cards
    pub fn label(self) -> &'static str {
        match self {
            TaskType::Feature => "Feature",
            TaskType::Bug => "Bug",
            TaskType::Task => "Task",
            TaskType::Improvement => "Improvement",
        }
    }

    pub fn parse(s: &str) -> Option<TaskType> {
        match s.trim().to_lowercase().as_str() {
            "feature" => Some(TaskType::Feature),
            "bug" => Some(TaskType::Bug),
            "task" => Some(TaskType::Task),
            "improvement" => Some(TaskType::Improvement),
            _ => None,
        }
    }
}

/// A single checklist item under a task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubTask {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
}

impl SubTask {
    pub fn new(id: String, title: String) -> Self {
        SubTask {
            id,
            title,
            completed: false,
        }
    }
}

/// A task as stored in the board document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub status: TaskStatus,
    #[serde(rename = "type")]
    pub task_type: TaskType,
    #[serde(default)]
    pub assignee: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub subtasks: Vec<SubTask>,
}

impl Task {
    pub fn is_done(&self) -> bool {
        self.status == TaskStatus::Done
    }

    /// Assignee for display; empty means unassigned
    pub fn assignee_label(&self) -> &str {
        let trimmed = self.assignee.trim();
        if trimmed.is_empty() { "Unassigned" } else { trimmed }
    }

    /// (completed, total) over subtasks, or None when there are none
    pub fn subtask_progress(&self) -> Option<(usize, usize)> {
        if self.subtasks.is_empty() {
            return None;
        }
        let done = self.subtasks.iter().filter(|s| s.completed).count();
        Some((done, self.subtasks.len()))
    }
}

/// Fields supplied when creating a task; id and timestamps are stamped on insert
#[derive(Debug, Clone, Default)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub task_type: TaskType,
    pub assignee: String,
    pub subtasks: Vec<SubTask>,
}

/// A partial update; unset fields keep their current value
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub task_type: Option<TaskType>,
    pub assignee: Option<String>,
    pub subtasks: Option<Vec<SubTask>>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.task_type.is_none()
            && self.assignee.is_none()
            && self.subtasks.is_none()
    }

    /// Overlay the set fields onto `task`; timestamps are the caller's job
    pub fn apply(self, task: &mut Task) {
        if let Some(title) = self.title {
            task.title = title;
        }
        if let Some(description) = self.description {
            task.description = description;
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(task_type) = self.task_type {
            task.task_type = task_type;
        }
        if let Some(assignee) = self.assignee {
            task.assignee = assignee;
        }
        if let Some(subtasks) = self.subtasks {
            task.subtasks = subtasks;
        }
    }
}
