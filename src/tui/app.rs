use std::io;
use std::path::Path;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use indexmap::IndexMap;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use regex::Regex;

use crate::auth;
use crate::io::config_io;
use crate::io::paths::DataPaths;
use crate::io::remote::RemoteClient;
use crate::io::store::{SaveReport, StorageMode, TaskStore, reconcile};
use crate::io::sync::{SyncEvent, SyncJob, SyncWorker};
use crate::io::watcher::{DataWatcher, FileEvent};
use crate::model::{AuthState, Config, SubTask, Task, TaskStatus, TaskType};
use crate::ops::views;

use super::input;
use super::render;
use super::theme::Theme;

/// Which view is currently displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Username prompt; shown until a session exists
    Login,
    /// Flat task list
    List,
    /// Status columns
    Board,
}

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    Filter,
    Form,
    Confirm,
    Move,
}

/// Which form field has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Description,
    Type,
    Status,
    Assignee,
    Subtasks,
}

impl FormField {
    pub const ORDER: [FormField; 6] = [
        FormField::Title,
        FormField::Description,
        FormField::Type,
        FormField::Status,
        FormField::Assignee,
        FormField::Subtasks,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FormField::Title => "Title",
            FormField::Description => "Description",
            FormField::Type => "Type",
            FormField::Status => "Status",
            FormField::Assignee => "Assignee",
            FormField::Subtasks => "Subtasks",
        }
    }

    pub fn next(self) -> FormField {
        let idx = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(idx + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> FormField {
        let idx = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(idx + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

/// State for the add/edit form modal
#[derive(Debug, Clone)]
pub struct FormState {
    /// None while creating a new task
    pub task_id: Option<String>,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub task_type: TaskType,
    pub assignee: String,
    pub subtasks: Vec<SubTask>,
    pub focus: FormField,
    pub subtask_cursor: usize,
    pub error: Option<String>,
}

impl FormState {
    pub fn blank() -> FormState {
        FormState {
            task_id: None,
            title: String::new(),
            description: String::new(),
            status: TaskStatus::Backlog,
            task_type: TaskType::Task,
            assignee: String::new(),
            subtasks: Vec::new(),
            focus: FormField::Title,
            subtask_cursor: 0,
            error: None,
        }
    }

    pub fn for_task(task: &Task) -> FormState {
        FormState {
            task_id: Some(task.id.clone()),
            title: task.title.clone(),
            description: task.description.clone(),
            status: task.status,
            task_type: task.task_type,
            assignee: task.assignee.clone(),
            subtasks: task.subtasks.clone(),
            focus: FormField::Title,
            subtask_cursor: 0,
            error: None,
        }
    }

    /// The text buffer under the focus, if the focused field is editable text
    pub fn focused_text_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            FormField::Title => Some(&mut self.title),
            FormField::Description => Some(&mut self.description),
            FormField::Assignee => Some(&mut self.assignee),
            FormField::Subtasks => self
                .subtasks
                .get_mut(self.subtask_cursor)
                .map(|s| &mut s.title),
            _ => None,
        }
    }
}

/// Pending delete confirmation
#[derive(Debug, Clone)]
pub struct ConfirmState {
    pub task_id: String,
    pub title: String,
}

/// A picked-up card being carried across columns
#[derive(Debug, Clone)]
pub struct MoveState {
    pub task_id: String,
    pub from: TaskStatus,
    pub to: TaskStatus,
}

/// Main application state
pub struct App {
    pub store: TaskStore,
    pub sync: Option<SyncWorker>,
    pub watcher: Option<DataWatcher>,
    pub tasks: Vec<Task>,
    pub auth: AuthState,
    pub storage_mode: StorageMode,
    pub view: View,
    pub mode: Mode,
    pub theme: Theme,
    pub show_key_hints: bool,
    pub should_quit: bool,
    pub show_help: bool,

    // List view
    pub list_cursor: usize,
    pub list_scroll: usize,
    pub show_completed: bool,

    // Board view
    pub board_col: usize,
    pub board_row: usize,

    // Filter
    pub filter_input: String,
    pub active_filter: Option<String>,

    // Login view
    pub login_input: String,
    pub login_error: Option<String>,

    // Modal state
    pub form: Option<FormState>,
    pub confirm: Option<ConfirmState>,
    pub moving: Option<MoveState>,

    // Transient feedback
    pub status_message: Option<String>,
    pub syncing: bool,
    pub sync_error: Option<String>,
}

impl App {
    pub fn new(paths: DataPaths, config: &Config) -> App {
        let sync = RemoteClient::from_config(&config.sync).map(SyncWorker::start);
        let storage_mode = if sync.is_some() {
            StorageMode::Mirrored
        } else {
            StorageMode::LocalOnly
        };
        // Root must exist before the watcher can attach
        let _ = paths.ensure_root();
        let watcher = DataWatcher::start(&paths).ok();
        let auth = auth::auth_state(&paths);
        let store = TaskStore::local_only(paths);
        let loaded = store.load_local();
        let theme = Theme::from_config(&config.ui);
        let view = if auth.is_authenticated {
            View::List
        } else {
            View::Login
        };

        App {
            store,
            sync,
            watcher,
            tasks: loaded.tasks,
            auth,
            storage_mode,
            view,
            mode: Mode::Navigate,
            theme,
            show_key_hints: config.ui.show_key_hints,
            should_quit: false,
            show_help: false,
            list_cursor: 0,
            list_scroll: 0,
            show_completed: false,
            board_col: 0,
            board_row: 0,
            filter_input: String::new(),
            active_filter: None,
            login_input: String::new(),
            login_error: None,
            form: None,
            confirm: None,
            moving: None,
            status_message: loaded.advisory,
            syncing: false,
            sync_error: None,
        }
    }

    pub fn is_admin(&self) -> bool {
        auth::can_manage_tasks(&self.auth)
    }

    /// The filter regex for the current input state.
    /// In Filter mode: compiles from the live input. Otherwise from the
    /// last applied filter.
    pub fn filter_regex(&self) -> Option<Regex> {
        let pattern = match self.mode {
            Mode::Filter if !self.filter_input.is_empty() => self.filter_input.as_str(),
            Mode::Filter => return None,
            _ => self.active_filter.as_deref()?,
        };
        views::filter_matcher(pattern)
    }

    /// Tasks shown in the list view, in document order
    pub fn visible_tasks(&self) -> Vec<&Task> {
        let matcher = self.filter_regex();
        self.tasks
            .iter()
            .filter(|t| {
                if !self.show_completed && t.is_done() {
                    return false;
                }
                if let Some(re) = &matcher
                    && !views::task_matches(t, re)
                {
                    return false;
                }
                true
            })
            .collect()
    }

    /// Board columns in status order. A card being carried shows up in its
    /// target column instead of its saved one.
    pub fn board(&self) -> IndexMap<TaskStatus, Vec<&Task>> {
        let matcher = self.filter_regex();
        let mut columns: IndexMap<TaskStatus, Vec<&Task>> = IndexMap::new();
        for status in TaskStatus::ALL {
            columns.insert(status, Vec::new());
        }
        for task in &self.tasks {
            if let Some(re) = &matcher
                && !views::task_matches(task, re)
            {
                continue;
            }
            let display_status = match &self.moving {
                Some(mv) if mv.task_id == task.id => mv.to,
                _ => task.status,
            };
            if let Some(bucket) = columns.get_mut(&display_status) {
                bucket.push(task);
            }
        }
        columns
    }

    pub fn column_len(&self, col: usize) -> usize {
        let columns = self.board();
        TaskStatus::ALL
            .get(col)
            .and_then(|status| columns.get(status))
            .map_or(0, |column| column.len())
    }

    /// The task under the cursor in the current view
    pub fn selected_task(&self) -> Option<&Task> {
        match self.view {
            View::Login => None,
            View::List => self.visible_tasks().get(self.list_cursor).copied(),
            View::Board => {
                let columns = self.board();
                let status = TaskStatus::ALL.get(self.board_col)?;
                let column = columns.get(status)?;
                column.get(self.board_row).copied()
            }
        }
    }

    pub fn clamp_cursors(&mut self) {
        let list_len = self.visible_tasks().len();
        self.list_cursor = if list_len == 0 {
            0
        } else {
            self.list_cursor.min(list_len - 1)
        };
        self.board_col = self.board_col.min(TaskStatus::ALL.len() - 1);
        let col_len = self.column_len(self.board_col);
        self.board_row = if col_len == 0 {
            0
        } else {
            self.board_row.min(col_len - 1)
        };
    }

    /// Take the result of a saving operation into the app state
    pub fn apply_saved(&mut self, tasks: Vec<Task>, report: &SaveReport) {
        self.tasks = tasks;
        if let Some(note) = report.advisory() {
            self.status_message = Some(note);
        }
        self.push_snapshot();
        self.clamp_cursors();
    }

    /// Queue a mirror update with the current tasks
    pub fn push_snapshot(&mut self) {
        if let Some(worker) = &self.sync {
            worker.submit(SyncJob::Push(self.tasks.clone()));
            self.syncing = true;
        }
    }

    /// Queue a mirror read
    pub fn request_fetch(&mut self) {
        if let Some(worker) = &self.sync {
            worker.submit(SyncJob::Fetch);
            self.syncing = true;
        }
    }

    /// Re-read the local file (another process wrote it)
    pub fn refresh_from_disk(&mut self) {
        let loaded = self.store.load_local();
        self.tasks = loaded.tasks;
        if let Some(note) = loaded.advisory {
            self.status_message = Some(note);
        }
        self.clamp_cursors();
    }

    /// Re-read the session file; a vanished session drops back to login
    pub fn refresh_session(&mut self) {
        self.auth = auth::auth_state(self.store.paths());
        if !self.auth.is_authenticated && self.view != View::Login {
            self.view = View::Login;
            self.mode = Mode::Navigate;
            self.form = None;
            self.confirm = None;
            self.moving = None;
        }
    }

    /// Drain watcher and sync-worker queues; called once per tick
    pub fn drain_background(&mut self) {
        let file_events: Vec<FileEvent> =
            self.watcher.as_ref().map(|w| w.poll()).unwrap_or_default();
        for event in file_events {
            match event {
                FileEvent::TasksChanged => self.refresh_from_disk(),
                FileEvent::SessionChanged => self.refresh_session(),
            }
        }

        let sync_events: Vec<SyncEvent> =
            self.sync.as_ref().map(|w| w.poll()).unwrap_or_default();
        for event in sync_events {
            self.apply_sync_event(event);
        }
    }

    fn apply_sync_event(&mut self, event: SyncEvent) {
        match event {
            SyncEvent::FetchDone(remote) => {
                self.syncing = false;
                self.sync_error = None;
                let merged = reconcile(std::mem::take(&mut self.tasks), remote);
                if merged.remote_won {
                    // Keep the local copy current with what the mirror holds
                    let report = self.store.save_tasks(&merged.tasks);
                    if let Some(note) = report.advisory() {
                        self.status_message = Some(note);
                    }
                }
                self.tasks = merged.tasks;
                if merged.push_local {
                    self.push_snapshot();
                }
                self.clamp_cursors();
            }
            SyncEvent::FetchFailed(message) => {
                self.syncing = false;
                self.sync_error = Some(message);
            }
            SyncEvent::PushDone => {
                self.syncing = false;
                self.sync_error = None;
            }
            SyncEvent::PushFailed(message) => {
                self.syncing = false;
                self.sync_error = Some(message);
            }
        }
    }
}

/// Run the TUI application
pub fn run(data_dir: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let paths = DataPaths::resolve(data_dir.map(Path::new));
    let config = config_io::load_config(&paths)?;

    let mut app = App::new(paths, &config);
    app.request_fetch();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    // Run event loop
    let result = run_event_loop(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            input::handle_key(app, key);
        }

        app.drain_background();

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::local;
    use crate::model::User;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn sample_task(id: &str, title: &str, status: TaskStatus) -> Task {
        let stamp = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        Task {
            id: id.to_string(),
            title: title.to_string(),
            description: String::new(),
            status,
            task_type: TaskType::Task,
            assignee: String::new(),
            created_at: stamp,
            updated_at: stamp,
            subtasks: Vec::new(),
        }
    }

    fn test_app(tmp: &TempDir) -> App {
        App::new(DataPaths::at(tmp.path()), &Config::default())
    }

    #[test]
    fn fresh_app_loads_seeded_board() {
        let tmp = TempDir::new().unwrap();
        let app = test_app(&tmp);
        assert_eq!(app.tasks.len(), 2);
        assert_eq!(app.storage_mode, StorageMode::LocalOnly);
        assert_eq!(app.view, View::Login);
    }

    #[test]
    fn visible_tasks_hides_done_until_toggled() {
        let tmp = TempDir::new().unwrap();
        let mut app = test_app(&tmp);
        app.tasks = vec![
            sample_task("a", "open", TaskStatus::Backlog),
            sample_task("b", "closed", TaskStatus::Done),
        ];

        assert_eq!(app.visible_tasks().len(), 1);
        app.show_completed = true;
        assert_eq!(app.visible_tasks().len(), 2);
    }

    #[test]
    fn board_shows_carried_card_in_target_column() {
        let tmp = TempDir::new().unwrap();
        let mut app = test_app(&tmp);
        app.tasks = vec![sample_task("a", "carry me", TaskStatus::Backlog)];
        app.moving = Some(MoveState {
            task_id: "a".to_string(),
            from: TaskStatus::Backlog,
            to: TaskStatus::InProgress,
        });

        let columns = app.board();
        assert!(columns[&TaskStatus::Backlog].is_empty());
        assert_eq!(columns[&TaskStatus::InProgress].len(), 1);
        assert_eq!(columns[&TaskStatus::InProgress][0].id, "a");
    }

    #[test]
    fn fetch_done_with_remote_data_replaces_and_persists() {
        let tmp = TempDir::new().unwrap();
        let mut app = test_app(&tmp);
        let remote = vec![sample_task("r1", "from mirror", TaskStatus::Backlog)];

        app.apply_sync_event(SyncEvent::FetchDone(remote));

        assert_eq!(app.tasks.len(), 1);
        assert_eq!(app.tasks[0].id, "r1");
        let on_disk = local::read_tasks(app.store.paths());
        assert_eq!(on_disk.tasks.len(), 1);
        assert_eq!(on_disk.tasks[0].id, "r1");
    }

    #[test]
    fn fetch_done_with_empty_remote_keeps_local_tasks() {
        let tmp = TempDir::new().unwrap();
        let mut app = test_app(&tmp);
        let before = app.tasks.clone();

        app.apply_sync_event(SyncEvent::FetchDone(Vec::new()));

        assert_eq!(app.tasks, before);
    }

    #[test]
    fn push_failure_sets_indicator_and_next_success_clears_it() {
        let tmp = TempDir::new().unwrap();
        let mut app = test_app(&tmp);

        app.apply_sync_event(SyncEvent::PushFailed("remote unreachable".into()));
        assert!(app.sync_error.is_some());

        app.apply_sync_event(SyncEvent::PushDone);
        assert!(app.sync_error.is_none());
    }

    #[test]
    fn vanished_session_drops_back_to_login() {
        let tmp = TempDir::new().unwrap();
        let mut app = test_app(&tmp);
        let paths = DataPaths::at(tmp.path());
        local::write_session(
            &paths,
            &User {
                id: "1".into(),
                username: "otabek".into(),
                role: crate::model::Role::Admin,
            },
        )
        .unwrap();
        app.refresh_session();
        app.view = View::Board;

        local::clear_session(&paths).unwrap();
        app.refresh_session();
        assert_eq!(app.view, View::Login);
        assert!(!app.auth.is_authenticated);
    }

    #[test]
    fn filter_regex_prefers_live_input_in_filter_mode() {
        let tmp = TempDir::new().unwrap();
        let mut app = test_app(&tmp);
        app.active_filter = Some("plan".to_string());
        app.mode = Mode::Filter;
        app.filter_input = "login".to_string();

        let re = app.filter_regex().unwrap();
        assert!(re.is_match("Fix login button"));
        assert!(!re.is_match("Create project plan"));
    }
}
