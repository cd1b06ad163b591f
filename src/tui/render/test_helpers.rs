use chrono::{TimeZone, Utc};
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;
use tempfile::TempDir;

use crate::io::paths::DataPaths;
use crate::model::{AuthState, Config, Role, SubTask, Task, TaskStatus, TaskType, User};
use crate::tui::app::{App, View};

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

fn fixed_task(
    id: &str,
    title: &str,
    status: TaskStatus,
    task_type: TaskType,
    assignee: &str,
) -> Task {
    let stamp = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
    Task {
        id: id.to_string(),
        title: title.to_string(),
        description: String::new(),
        status,
        task_type,
        assignee: assignee.to_string(),
        created_at: stamp,
        updated_at: stamp,
        subtasks: Vec::new(),
    }
}

/// A small board that exercises every column plus assignees and subtasks.
pub fn sample_tasks() -> Vec<Task> {
    let mut design = fixed_task(
        "t1",
        "Design login page",
        TaskStatus::Backlog,
        TaskType::Feature,
        "ana",
    );
    let mut done_sub = SubTask::new("s1".to_string(), "sketch layout".to_string());
    done_sub.completed = true;
    design.subtasks = vec![
        done_sub,
        SubTask::new("s2".to_string(), "review with team".to_string()),
    ];

    vec![
        design,
        fixed_task(
            "t2",
            "Fix save crash",
            TaskStatus::InProgress,
            TaskType::Bug,
            "sam",
        ),
        fixed_task(
            "t3",
            "Update docs",
            TaskStatus::ReadyToCheck,
            TaskType::Task,
            "",
        ),
        fixed_task(
            "t4",
            "Ship beta",
            TaskStatus::Done,
            TaskType::Improvement,
            "ana",
        ),
    ]
}

/// Build an App seeded with the given tasks, signed in as admin, in List view.
pub fn app_with_tasks(tmp: &TempDir, tasks: Vec<Task>) -> App {
    let mut app = App::new(DataPaths::at(tmp.path()), &Config::default());
    app.watcher = None;
    app.tasks = tasks;
    app.auth = AuthState::signed_in(User {
        id: "1".to_string(),
        username: "otabek".to_string(),
        role: Role::Admin,
    });
    app.view = View::List;
    app.clamp_cursors();
    app
}
