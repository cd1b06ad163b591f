use std::path::Path;

use crate::auth;
use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io;
use crate::io::log;
use crate::io::paths::DataPaths;
use crate::io::store::{SaveReport, StorageMode, TaskStore};
use crate::model::{AuthState, SubTask, Task, TaskDraft, TaskPatch, TaskStatus};
use crate::ops::{task_ops, views};

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let json = cli.json;
    let paths = DataPaths::resolve(cli.data_dir.as_deref().map(Path::new));

    match cli.command {
        None => {
            eprintln!("no subcommand given (run `pk` with no arguments for the TUI)");
            Ok(())
        }
        Some(cmd) => match cmd {
            // Session
            Commands::Login(args) => cmd_login(&paths, args, json),
            Commands::Logout => cmd_logout(&paths, json),
            Commands::Whoami => cmd_whoami(&paths, json),

            // Read commands
            Commands::List(args) => cmd_list(&paths, args, json),
            Commands::Board(args) => cmd_board(&paths, args, json),
            Commands::Show(args) => cmd_show(&paths, args, json),

            // Write commands
            Commands::Add(args) => cmd_add(&paths, args, json),
            Commands::Edit(args) => cmd_edit(&paths, args, json),
            Commands::Status(args) => cmd_status(&paths, args, json),
            Commands::Done(args) => cmd_done(&paths, args, json),
            Commands::Rm(args) => cmd_rm(&paths, args),

            // Sync and settings
            Commands::Sync(args) => cmd_sync(&paths, args, json),
            Commands::Remote(args) => cmd_remote(&paths, args, json),
        },
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn open_store(paths: &DataPaths) -> Result<TaskStore, Box<dyn std::error::Error>> {
    let config = config_io::load_config(paths)?;
    Ok(TaskStore::open(paths.clone(), &config.sync))
}

fn require_session(paths: &DataPaths) -> Result<AuthState, Box<dyn std::error::Error>> {
    let state = auth::auth_state(paths);
    if !state.is_authenticated {
        return Err("not signed in (try `pk login <username>`)".into());
    }
    Ok(state)
}

fn require_admin(paths: &DataPaths) -> Result<AuthState, Box<dyn std::error::Error>> {
    let state = require_session(paths)?;
    if !auth::can_manage_tasks(&state) {
        return Err("changing tasks needs the admin user".into());
    }
    Ok(state)
}

/// Run the full fetch dance, surfacing any advisory on stderr
fn fetch_tasks(store: &TaskStore) -> Vec<Task> {
    let outcome = store.fetch_tasks();
    if let Some(note) = &outcome.advisory {
        eprintln!("warning: {}", note);
    }
    outcome.tasks
}

fn report_save(report: &SaveReport) {
    if let Some(note) = report.advisory() {
        eprintln!("warning: {}", note);
    }
}

/// Resolve a task by exact id or unique id prefix
fn resolve_task<'a>(
    tasks: &'a [Task],
    query: &str,
) -> Result<&'a Task, Box<dyn std::error::Error>> {
    if let Some(task) = tasks.iter().find(|t| t.id == query) {
        return Ok(task);
    }
    let matches: Vec<&Task> = tasks.iter().filter(|t| t.id.starts_with(query)).collect();
    match matches.len() {
        0 => Err(format!("task not found: {}", query).into()),
        1 => Ok(matches[0]),
        n => Err(format!("'{}' matches {} tasks, give more of the id", query, n).into()),
    }
}

// ---------------------------------------------------------------------------
// Session handlers
// ---------------------------------------------------------------------------

fn cmd_login(
    paths: &DataPaths,
    args: LoginArgs,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let current = auth::auth_state(paths);
    if current.is_authenticated {
        // Signing in over a live session is a no-op
        if json {
            println!("{}", serde_json::to_string_pretty(&session_to_json(&current))?);
        } else if let Some(name) = current.username() {
            println!("already signed in as {} (run `pk logout` first)", name);
        }
        return Ok(());
    }

    let state = auth::login(paths, &args.username)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&session_to_json(&state))?);
    } else if let Some(user) = &state.user {
        println!("signed in as {} ({})", user.username, user.role.label());
    }
    Ok(())
}

fn cmd_logout(paths: &DataPaths, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let state = auth::logout(paths)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&session_to_json(&state))?);
    } else {
        println!("signed out");
    }
    Ok(())
}

fn cmd_whoami(paths: &DataPaths, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let state = auth::auth_state(paths);
    if json {
        println!("{}", serde_json::to_string_pretty(&session_to_json(&state))?);
    } else if let Some(user) = &state.user {
        println!("{} ({})", user.username, user.role.label());
    } else {
        println!("not signed in");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Read command handlers
// ---------------------------------------------------------------------------

fn cmd_list(
    paths: &DataPaths,
    args: ListArgs,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    require_session(paths)?;
    let store = open_store(paths)?;
    let tasks = fetch_tasks(&store);

    let status_filter = args
        .status
        .as_deref()
        .map(parse_status_arg)
        .transpose()
        .map_err(Box::<dyn std::error::Error>::from)?;
    let type_filter = args
        .task_type
        .as_deref()
        .map(parse_type_arg)
        .transpose()
        .map_err(Box::<dyn std::error::Error>::from)?;
    let matcher = args.filter.as_deref().and_then(views::filter_matcher);

    let selected: Vec<&Task> = tasks
        .iter()
        .filter(|t| {
            if let Some(sf) = status_filter
                && t.status != sf
            {
                return false;
            }
            if let Some(tf) = type_filter
                && t.task_type != tf
            {
                return false;
            }
            if let Some(a) = args.assignee.as_deref()
                && !t.assignee.eq_ignore_ascii_case(a)
            {
                return false;
            }
            if let Some(re) = &matcher
                && !views::task_matches(t, re)
            {
                return false;
            }
            // Done tasks stay hidden unless asked for
            if status_filter.is_none() {
                if args.completed && !t.is_done() {
                    return false;
                }
                if !args.completed && !args.all && t.is_done() {
                    return false;
                }
            }
            true
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&selected)?);
    } else if selected.is_empty() {
        println!("no tasks");
    } else {
        for task in &selected {
            println!("{}", format_task_line(task));
        }
    }
    Ok(())
}

fn cmd_board(
    paths: &DataPaths,
    args: BoardArgs,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    require_session(paths)?;
    let store = open_store(paths)?;
    let tasks = fetch_tasks(&store);

    let filtered: Vec<Task> = match args.filter.as_deref().and_then(views::filter_matcher) {
        Some(re) => tasks
            .iter()
            .filter(|t| views::task_matches(t, &re))
            .cloned()
            .collect(),
        None => tasks,
    };
    let columns = views::board_columns(&filtered);

    if json {
        println!("{}", serde_json::to_string_pretty(&board_to_json(&columns))?);
    } else {
        for line in format_board(&columns) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_show(
    paths: &DataPaths,
    args: ShowArgs,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    require_session(paths)?;
    let store = open_store(paths)?;
    let tasks = fetch_tasks(&store);
    let task = resolve_task(&tasks, &args.id)?;

    if json {
        println!("{}", serde_json::to_string_pretty(task)?);
    } else {
        for line in format_task_detail(task) {
            println!("{}", line);
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write command handlers
// ---------------------------------------------------------------------------

fn cmd_add(
    paths: &DataPaths,
    args: AddArgs,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    require_admin(paths)?;
    let store = open_store(paths)?;
    let tasks = fetch_tasks(&store);

    let status = parse_status_arg(&args.status).map_err(Box::<dyn std::error::Error>::from)?;
    let task_type = parse_type_arg(&args.task_type).map_err(Box::<dyn std::error::Error>::from)?;
    let subtasks: Vec<SubTask> = args
        .subtasks
        .into_iter()
        .map(|title| SubTask::new(task_ops::generate_id(), title))
        .collect();

    let draft = TaskDraft {
        title: args.title,
        description: args.description.unwrap_or_default(),
        status,
        task_type,
        assignee: args.assignee.unwrap_or_default(),
        subtasks,
    };
    let (_, task, report) = task_ops::create_task(&store, &tasks, draft);
    report_save(&report);

    if json {
        println!("{}", serde_json::to_string_pretty(&task)?);
    } else {
        println!("added {} {}", task.id, task.title);
    }
    Ok(())
}

fn cmd_edit(
    paths: &DataPaths,
    args: EditArgs,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    require_admin(paths)?;
    let store = open_store(paths)?;
    let tasks = fetch_tasks(&store);
    let task = resolve_task(&tasks, &args.id)?;
    let task_id = task.id.clone();

    let mut patch = TaskPatch {
        title: args.title,
        description: args.description,
        status: args
            .status
            .as_deref()
            .map(parse_status_arg)
            .transpose()
            .map_err(Box::<dyn std::error::Error>::from)?,
        task_type: args
            .task_type
            .as_deref()
            .map(parse_type_arg)
            .transpose()
            .map_err(Box::<dyn std::error::Error>::from)?,
        assignee: args.assignee,
        subtasks: None,
    };

    if !args.add_subtasks.is_empty()
        || !args.toggle_subtasks.is_empty()
        || !args.rm_subtasks.is_empty()
    {
        let mut subtasks = task.subtasks.clone();

        // Toggle and rm positions both refer to the list as currently shown;
        // toggles apply first, removals after (largest position first), then
        // new subtasks go on the end.
        for pos in &args.toggle_subtasks {
            let idx = pos
                .checked_sub(1)
                .filter(|i| *i < subtasks.len())
                .ok_or_else(|| format!("no subtask {} on {}", pos, task_id))?;
            subtasks[idx].completed = !subtasks[idx].completed;
        }

        let mut rm = args.rm_subtasks.clone();
        rm.sort_unstable();
        rm.dedup();
        for pos in rm.into_iter().rev() {
            let idx = pos
                .checked_sub(1)
                .filter(|i| *i < subtasks.len())
                .ok_or_else(|| format!("no subtask {} on {}", pos, task_id))?;
            subtasks.remove(idx);
        }

        for title in args.add_subtasks {
            subtasks.push(SubTask::new(task_ops::generate_id(), title));
        }
        patch.subtasks = Some(subtasks);
    }

    if patch.is_empty() {
        return Err("nothing to change (see `pk edit --help`)".into());
    }

    let (_, updated, report) = task_ops::edit_task(&store, &tasks, &task_id, patch)?;
    report_save(&report);

    if json {
        println!("{}", serde_json::to_string_pretty(&updated)?);
    } else {
        println!("updated {}", updated.id);
    }
    Ok(())
}

fn cmd_status(
    paths: &DataPaths,
    args: StatusArgs,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    require_admin(paths)?;
    let store = open_store(paths)?;
    let tasks = fetch_tasks(&store);
    let task = resolve_task(&tasks, &args.id)?;
    let task_id = task.id.clone();

    let status = parse_status_arg(&args.status).map_err(Box::<dyn std::error::Error>::from)?;
    let (_, updated, report) = task_ops::update_task_status(&store, &tasks, &task_id, status)?;
    report_save(&report);

    if json {
        println!("{}", serde_json::to_string_pretty(&updated)?);
    } else {
        println!("{} → {}", updated.id, status.as_str());
    }
    Ok(())
}

fn cmd_done(
    paths: &DataPaths,
    args: DoneArgs,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    require_admin(paths)?;
    let store = open_store(paths)?;
    let tasks = fetch_tasks(&store);
    let task = resolve_task(&tasks, &args.id)?;
    let task_id = task.id.clone();

    let (_, updated, report) =
        task_ops::update_task_status(&store, &tasks, &task_id, TaskStatus::Done)?;
    report_save(&report);

    if json {
        println!("{}", serde_json::to_string_pretty(&updated)?);
    } else {
        println!("{} → done", updated.id);
    }
    Ok(())
}

fn cmd_rm(paths: &DataPaths, args: RmArgs) -> Result<(), Box<dyn std::error::Error>> {
    require_admin(paths)?;
    let store = open_store(paths)?;
    let mut tasks = fetch_tasks(&store);

    for query in &args.ids {
        let resolved = match resolve_task(&tasks, query) {
            Ok(task) => Some(task.id.clone()),
            // Nothing matches: removal is idempotent, keep going
            Err(_) if !tasks.iter().any(|t| t.id.starts_with(query.as_str())) => None,
            Err(e) => return Err(e),
        };
        match resolved {
            Some(id) => {
                let (updated, report) = task_ops::remove_task(&store, &tasks, &id);
                tasks = updated;
                report_save(&report);
                println!("removed {}", id);
            }
            None => println!("nothing to remove for '{}'", query),
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Sync and remote settings
// ---------------------------------------------------------------------------

fn cmd_sync(
    paths: &DataPaths,
    args: SyncArgs,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    require_session(paths)?;

    if args.log {
        let text = log::read_all(paths).unwrap_or_default();
        if json {
            let entries: Vec<String> = text.lines().map(str::to_string).collect();
            println!("{}", serde_json::to_string_pretty(&SyncLogJson { entries })?);
        } else if text.is_empty() {
            println!("sync log is empty");
        } else {
            print!("{}", text);
        }
        return Ok(());
    }

    let store = open_store(paths)?;
    let outcome = store.fetch_tasks();
    let mode = store.mode();

    if json {
        let run = SyncRunJson {
            mode: mode.label(),
            origin: outcome.origin.label(),
            task_count: outcome.tasks.len(),
            advisory: outcome.advisory.as_deref(),
        };
        println!("{}", serde_json::to_string_pretty(&run)?);
    } else {
        match mode {
            StorageMode::LocalOnly => println!(
                "mirroring is off; {} tasks in the local file",
                outcome.tasks.len()
            ),
            // Only claim a clean sync when nothing went wrong; the
            // advisory on stderr carries the detail otherwise.
            StorageMode::Mirrored if outcome.advisory.is_none() => println!(
                "synced; {} tasks ({})",
                outcome.tasks.len(),
                outcome.origin.label()
            ),
            StorageMode::Mirrored => println!(
                "{} tasks ({})",
                outcome.tasks.len(),
                outcome.origin.label()
            ),
        }
        if let Some(note) = &outcome.advisory {
            eprintln!("warning: {}", note);
        }
    }
    Ok(())
}

fn cmd_remote(
    paths: &DataPaths,
    cmd: RemoteCmd,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    match cmd.action.unwrap_or(RemoteAction::Show) {
        RemoteAction::Show => {
            let config = config_io::load_config(paths)?;
            let mode = if config.sync.mirroring_enabled() {
                "synced"
            } else {
                "local"
            };
            if json {
                let settings = RemoteSettingsJson {
                    mode,
                    enabled: config.sync.enabled,
                    api_key_set: !config.sync.api_key.trim().is_empty(),
                    url: &config.sync.url,
                    timeout_secs: config.sync.timeout_secs,
                };
                println!("{}", serde_json::to_string_pretty(&settings)?);
            } else {
                println!("mode: {}", mode);
                println!("enabled: {}", config.sync.enabled);
                let key = if config.sync.api_key.trim().is_empty() {
                    "not set"
                } else {
                    "set"
                };
                println!("api_key: {}", key);
                println!("url: {}", config.sync.url);
                println!("timeout: {}s", config.sync.timeout_secs);
            }
            Ok(())
        }
        RemoteAction::On => {
            let (config, mut doc) = config_io::read_config_doc(paths)?;
            config_io::set_sync_enabled(&mut doc, true);
            config_io::write_config_doc(paths, &doc)?;
            println!("mirroring on");
            if config.sync.api_key.trim().is_empty() {
                eprintln!("note: no document key set (run `pk remote key <KEY>`)");
            }
            Ok(())
        }
        RemoteAction::Off => {
            let (_, mut doc) = config_io::read_config_doc(paths)?;
            config_io::set_sync_enabled(&mut doc, false);
            config_io::write_config_doc(paths, &doc)?;
            println!("mirroring off");
            Ok(())
        }
        RemoteAction::Key(args) => {
            let (_, mut doc) = config_io::read_config_doc(paths)?;
            config_io::set_api_key(&mut doc, &args.key);
            if let Some(secret) = &args.secret {
                config_io::set_secret(&mut doc, secret);
            }
            config_io::write_config_doc(paths, &doc)?;
            println!("document key set");
            Ok(())
        }
    }
}
