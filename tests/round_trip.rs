use chrono::{DateTime, Utc};
use plank::auth;
use plank::io::paths::DataPaths;
use plank::io::store::{DataOrigin, TaskStore};
use plank::model::{Config, SubTask, Task, TaskDraft, TaskPatch, TaskStatus, TaskType};
use plank::ops::task_ops;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn board_dir() -> (TempDir, DataPaths) {
    let dir = TempDir::new().unwrap();
    let paths = DataPaths::at(dir.path());
    (dir, paths)
}

/// Helper: a fresh store on the same directory, standing in for an app restart
fn reopen(paths: &DataPaths) -> TaskStore {
    TaskStore::local_only(paths.clone())
}

fn ts(s: &str) -> DateTime<Utc> {
    s.parse().unwrap()
}

/// A board that leans on everything the document format can hold: all four
/// statuses, unicode titles, multi-line descriptions, mixed subtask states,
/// and the empty-string spellings of "no description" and "unassigned".
fn rich_board() -> Vec<Task> {
    vec![
        Task {
            id: "t-accents".to_string(),
            title: "Naïve date handling in filters".to_string(),
            description: "Dates before 1970 underflow.\n\nSeen on the café demo board.".to_string(),
            status: TaskStatus::Backlog,
            task_type: TaskType::Bug,
            assignee: "Ana".to_string(),
            created_at: ts("2024-03-01T10:00:00Z"),
            updated_at: ts("2024-03-01T10:00:00Z"),
            subtasks: vec![
                SubTask {
                    id: "s-1".to_string(),
                    title: "Reproduce with a 1969 date".to_string(),
                    completed: true,
                },
                SubTask::new("s-2".to_string(), "Clamp or reject".to_string()),
            ],
        },
        Task {
            id: "t-cjk".to_string(),
            title: "Localize 日本語 landing page".to_string(),
            description: "Copy lives in the shared doc".to_string(),
            status: TaskStatus::InProgress,
            task_type: TaskType::Feature,
            assignee: "Sam".to_string(),
            created_at: ts("2024-03-02T09:00:00Z"),
            updated_at: ts("2024-03-04T16:45:00Z"),
            subtasks: Vec::new(),
        },
        Task {
            id: "t-emoji".to_string(),
            title: "Fix 🎉 emoji clipping in card titles".to_string(),
            description: String::new(),
            status: TaskStatus::ReadyToCheck,
            task_type: TaskType::Improvement,
            assignee: String::new(),
            created_at: ts("2024-03-03T08:30:00Z"),
            updated_at: ts("2024-03-05T11:00:00Z"),
            subtasks: Vec::new(),
        },
        Task {
            id: "t-done".to_string(),
            title: "Write release notes".to_string(),
            description: "v0.2 highlights".to_string(),
            status: TaskStatus::Done,
            task_type: TaskType::Task,
            assignee: "Ana".to_string(),
            created_at: ts("2024-02-20T12:00:00Z"),
            updated_at: ts("2024-02-28T17:20:00Z"),
            subtasks: vec![
                SubTask {
                    id: "s-3".to_string(),
                    title: "Draft".to_string(),
                    completed: true,
                },
                SubTask {
                    id: "s-4".to_string(),
                    title: "Review".to_string(),
                    completed: true,
                },
            ],
        },
    ]
}

// ============================================================================
// Document round-trip tests
// ============================================================================

#[test]
fn round_trip_rich_board() {
    let (_dir, paths) = board_dir();
    let tasks = rich_board();

    let report = reopen(&paths).save_tasks(&tasks);
    assert!(report.is_clean());

    let outcome = reopen(&paths).fetch_tasks();
    assert_eq!(outcome.origin, DataOrigin::LocalFile);
    assert!(outcome.advisory.is_none());
    assert_eq!(outcome.tasks, tasks);
}

/// The core property: loading a document and saving it back must reproduce
/// the file byte for byte. Anything less means every app run churns the
/// board file (and the mirror) without a real change behind it.
#[test]
fn round_trip_rewrite_is_byte_stable() {
    let (_dir, paths) = board_dir();
    reopen(&paths).save_tasks(&rich_board());
    let first = fs::read_to_string(paths.tasks_file()).unwrap();

    let loaded = reopen(&paths).fetch_tasks().tasks;
    reopen(&paths).save_tasks(&loaded);
    let second = fs::read_to_string(paths.tasks_file()).unwrap();

    assert_eq!(second, first, "re-saving a loaded board changed the file");
}

#[test]
fn round_trip_empty_board() {
    let (_dir, paths) = board_dir();
    reopen(&paths).save_tasks(&[]);

    let outcome = reopen(&paths).fetch_tasks();
    assert_eq!(outcome.origin, DataOrigin::LocalFile);
    assert!(outcome.tasks.is_empty(), "an empty board must stay empty, not reseed");
}

// ============================================================================
// Document shape on disk
// ============================================================================

/// The stored document keeps the web app's field spellings, so a board
/// written here stays readable by the other clients of the same document.
#[test]
fn document_shape_matches_web_clients() {
    let (_dir, paths) = board_dir();
    reopen(&paths).save_tasks(&rich_board());

    let text = fs::read_to_string(paths.tasks_file()).unwrap();
    assert!(text.starts_with('['), "document root must be a task array");
    assert!(text.contains("\n    \"id\""), "document should be pretty-printed");

    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    let first = &value.as_array().unwrap()[0];
    assert_eq!(first["id"], "t-accents");
    assert_eq!(first["type"], "bug");
    assert_eq!(first["status"], "backlog");
    assert_eq!(first["createdAt"], "2024-03-01T10:00:00Z");
    assert_eq!(first["updatedAt"], "2024-03-01T10:00:00Z");
    assert_eq!(first["subtasks"][0]["completed"], true);
    assert!(first.get("task_type").is_none(), "snake_case keys must not appear");
    assert!(first.get("created_at").is_none(), "snake_case keys must not appear");
}

#[test]
fn web_client_document_loads() {
    let (_dir, paths) = board_dir();
    paths.ensure_root().unwrap();
    // Fractional-second timestamps and omitted optional fields, the way
    // browser clients write them
    fs::write(
        paths.tasks_file(),
        r#"[
  {
    "id": "web-1",
    "title": "Imported from the browser",
    "status": "ready-to-check",
    "type": "feature",
    "createdAt": "2024-01-15T08:00:00.000Z",
    "updatedAt": "2024-01-16T12:30:00.000Z"
  }
]"#,
    )
    .unwrap();

    let outcome = reopen(&paths).fetch_tasks();
    assert_eq!(outcome.origin, DataOrigin::LocalFile);
    assert_eq!(outcome.tasks.len(), 1);
    let task = &outcome.tasks[0];
    assert_eq!(task.status, TaskStatus::ReadyToCheck);
    assert_eq!(task.task_type, TaskType::Feature);
    assert_eq!(task.description, "");
    assert_eq!(task.assignee_label(), "Unassigned");
    assert!(task.subtasks.is_empty());
    assert_eq!(task.created_at, ts("2024-01-15T08:00:00Z"));

    // Saving it back and reloading keeps the task intact
    reopen(&paths).save_tasks(&outcome.tasks);
    let again = reopen(&paths).fetch_tasks();
    assert_eq!(again.tasks, outcome.tasks);
}

// ============================================================================
// Edits across restarts
// ============================================================================

#[test]
fn edits_survive_restarts() {
    let (_dir, paths) = board_dir();

    let draft = TaskDraft {
        title: "Prototype board layout".to_string(),
        task_type: TaskType::Feature,
        assignee: "Ana".to_string(),
        ..TaskDraft::default()
    };
    let (_, created, report) = task_ops::create_task(&reopen(&paths), &[], draft);
    assert!(report.is_clean());

    // Second run: load from disk and rename
    let store = reopen(&paths);
    let tasks = store.fetch_tasks().tasks;
    let patch = TaskPatch {
        title: Some("Prototype board and list layouts".to_string()),
        ..TaskPatch::default()
    };
    task_ops::edit_task(&store, &tasks, &created.id, patch).unwrap();

    // Third run sees the rename with history intact
    let tasks = reopen(&paths).fetch_tasks().tasks;
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].title, "Prototype board and list layouts");
    assert_eq!(tasks[0].created_at, created.created_at);
    assert!(tasks[0].updated_at > created.updated_at);
}

#[test]
fn updated_at_moves_forward_across_restarts() {
    let (_dir, paths) = board_dir();
    let draft = TaskDraft {
        title: "Busy task".to_string(),
        ..TaskDraft::default()
    };
    let (_, created, _) = task_ops::create_task(&reopen(&paths), &[], draft);

    let mut last = created.updated_at;
    for status in [
        TaskStatus::InProgress,
        TaskStatus::ReadyToCheck,
        TaskStatus::Done,
    ] {
        let store = reopen(&paths);
        let tasks = store.fetch_tasks().tasks;
        let (_, moved, _) =
            task_ops::update_task_status(&store, &tasks, &created.id, status).unwrap();
        assert!(
            moved.updated_at > last,
            "updated_at must move strictly forward on every edit"
        );
        last = moved.updated_at;
    }

    let tasks = reopen(&paths).fetch_tasks().tasks;
    assert_eq!(tasks[0].status, TaskStatus::Done);
    assert_eq!(tasks[0].updated_at, last);
}

#[test]
fn removal_survives_restart() {
    let (_dir, paths) = board_dir();
    let store = reopen(&paths);
    let (tasks, first, _) = task_ops::create_task(
        &store,
        &[],
        TaskDraft {
            title: "Keep me".to_string(),
            ..TaskDraft::default()
        },
    );
    let (tasks, second, _) = task_ops::create_task(
        &store,
        &tasks,
        TaskDraft {
            title: "Drop me".to_string(),
            ..TaskDraft::default()
        },
    );
    assert_eq!(tasks.len(), 2);

    let store = reopen(&paths);
    let tasks = store.fetch_tasks().tasks;
    task_ops::remove_task(&store, &tasks, &second.id);

    let tasks = reopen(&paths).fetch_tasks().tasks;
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].id, first.id);
}

// ============================================================================
// Session and board files stay independent
// ============================================================================

#[test]
fn session_changes_never_touch_the_board() {
    let (_dir, paths) = board_dir();
    reopen(&paths).save_tasks(&rich_board());
    let before = fs::read_to_string(paths.tasks_file()).unwrap();

    auth::login(&paths, "casey").unwrap();
    assert!(paths.session_file().exists());
    auth::logout(&paths).unwrap();
    assert!(!paths.session_file().exists());

    let after = fs::read_to_string(paths.tasks_file()).unwrap();
    assert_eq!(after, before, "login and logout must leave the board file alone");
}

#[test]
fn board_saves_leave_the_session_alone() {
    let (_dir, paths) = board_dir();
    auth::login(&paths, "otabek").unwrap();

    reopen(&paths).save_tasks(&rich_board());
    reopen(&paths).save_tasks(&[]);

    let auth = auth::auth_state(&paths);
    assert!(auth.is_authenticated);
    assert_eq!(auth.username(), Some("otabek"));
}

// ============================================================================
// Config template round-trip
// ============================================================================

#[test]
fn config_template_round_trips() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("src/templates/config.toml");
    let source = fs::read_to_string(&path).unwrap();

    // Parse with the toml crate
    let config: Config = toml::from_str(&source).unwrap();
    assert!(!config.sync.enabled, "the shipped template must default to local-only");

    // Parse with toml_edit and re-serialize
    let doc: toml_edit::DocumentMut = source.parse().unwrap();
    let output = doc.to_string();

    assert_eq!(output, source, "config template round-trip failed");
}
