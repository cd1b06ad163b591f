use indexmap::IndexMap;
use regex::Regex;

use crate::model::{Task, TaskStatus};

/// Tasks in one column, document order preserved
pub fn tasks_by_status<'a>(tasks: &'a [Task], status: TaskStatus) -> Vec<&'a Task> {
    tasks.iter().filter(|t| t.status == status).collect()
}

/// Everything that is not done
pub fn active_tasks<'a>(tasks: &'a [Task]) -> Vec<&'a Task> {
    tasks.iter().filter(|t| !t.is_done()).collect()
}

/// Done tasks only
pub fn completed_tasks<'a>(tasks: &'a [Task]) -> Vec<&'a Task> {
    tasks.iter().filter(|t| t.is_done()).collect()
}

/// All four columns in board order, empty ones included
pub fn board_columns<'a>(tasks: &'a [Task]) -> IndexMap<TaskStatus, Vec<&'a Task>> {
    let mut columns: IndexMap<TaskStatus, Vec<&Task>> = IndexMap::new();
    for status in TaskStatus::ALL {
        columns.insert(status, Vec::new());
    }
    for task in tasks {
        if let Some(column) = columns.get_mut(&task.status) {
            column.push(task);
        }
    }
    columns
}

/// Column sizes in board order
pub fn status_counts(tasks: &[Task]) -> IndexMap<TaskStatus, usize> {
    board_columns(tasks)
        .into_iter()
        .map(|(status, column)| (status, column.len()))
        .collect()
}

/// Compile a case-insensitive matcher, treating the pattern as literal
/// text when it is not valid regex. Empty patterns match nothing.
pub fn filter_matcher(pattern: &str) -> Option<Regex> {
    if pattern.is_empty() {
        return None;
    }
    Regex::new(&format!("(?i){}", pattern))
        .or_else(|_| Regex::new(&format!("(?i){}", regex::escape(pattern))))
        .ok()
}

/// True when the title, description or assignee matches
pub fn task_matches(task: &Task, re: &Regex) -> bool {
    re.is_match(&task.title) || re.is_match(&task.description) || re.is_match(&task.assignee)
}

/// Tasks kept by the matcher, document order preserved
pub fn filter_tasks<'a>(tasks: &'a [Task], re: &Regex) -> Vec<&'a Task> {
    tasks.iter().filter(|t| task_matches(t, re)).collect()
}
