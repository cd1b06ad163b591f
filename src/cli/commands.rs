use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "pk", about = concat!("[#] plank v", env!("CARGO_PKG_VERSION"), " - your board, local first"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Run against a different data directory
    #[arg(short = 'C', long = "data-dir", global = true)]
    pub data_dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in and start a session
    Login(LoginArgs),
    /// End the current session
    Logout,
    /// Show the current session
    Whoami,
    /// List tasks (active ones by default)
    List(ListArgs),
    /// Show the board grouped by status column
    Board(BoardArgs),
    /// Show task details
    Show(ShowArgs),
    /// Add a task to the backlog
    Add(AddArgs),
    /// Edit task fields and subtasks
    Edit(EditArgs),
    /// Change task status
    Status(StatusArgs),
    /// Mark a task done (shortcut for status <ID> done)
    Done(DoneArgs),
    /// Remove tasks
    Rm(RmArgs),
    /// Reconcile with the remote document now
    Sync(SyncArgs),
    /// View or change remote mirroring settings
    Remote(RemoteCmd),
}

// ---------------------------------------------------------------------------
// Session args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct LoginArgs {
    /// Username to sign in as
    pub username: String,
}

// ---------------------------------------------------------------------------
// Read command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ListArgs {
    /// Filter by status (backlog, inprogress, ready-to-check, done)
    #[arg(long)]
    pub status: Option<String>,
    /// Filter by type (feature, bug, task, improvement)
    #[arg(long = "type")]
    pub task_type: Option<String>,
    /// Filter by assignee (case-insensitive)
    #[arg(long)]
    pub assignee: Option<String>,
    /// Filter title/description/assignee by regex
    #[arg(long)]
    pub filter: Option<String>,
    /// Show only completed tasks
    #[arg(long)]
    pub completed: bool,
    /// Include completed tasks
    #[arg(long)]
    pub all: bool,
}

#[derive(Args)]
pub struct BoardArgs {
    /// Filter title/description/assignee by regex
    #[arg(long)]
    pub filter: Option<String>,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Task ID (or unique prefix) to show
    pub id: String,
}

// ---------------------------------------------------------------------------
// Write command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct AddArgs {
    /// Task title
    pub title: String,
    /// Longer description
    #[arg(long)]
    pub description: Option<String>,
    /// Task type (feature, bug, task, improvement)
    #[arg(long = "type", default_value = "task")]
    pub task_type: String,
    /// Starting status (default: backlog)
    #[arg(long, default_value = "backlog")]
    pub status: String,
    /// Assignee name
    #[arg(long)]
    pub assignee: Option<String>,
    /// Subtask title (repeatable)
    #[arg(long = "subtask")]
    pub subtasks: Vec<String>,
}

#[derive(Args)]
pub struct EditArgs {
    /// Task ID (or unique prefix)
    pub id: String,
    /// New title
    #[arg(long)]
    pub title: Option<String>,
    /// New description
    #[arg(long)]
    pub description: Option<String>,
    /// New type (feature, bug, task, improvement)
    #[arg(long = "type")]
    pub task_type: Option<String>,
    /// New status (backlog, inprogress, ready-to-check, done)
    #[arg(long)]
    pub status: Option<String>,
    /// New assignee (empty string clears it)
    #[arg(long)]
    pub assignee: Option<String>,
    /// Append a subtask (repeatable)
    #[arg(long = "add-subtask")]
    pub add_subtasks: Vec<String>,
    /// Toggle a subtask by position, 1-based (repeatable)
    #[arg(long = "toggle-subtask", value_name = "N")]
    pub toggle_subtasks: Vec<usize>,
    /// Remove a subtask by position, 1-based (repeatable)
    #[arg(long = "rm-subtask", value_name = "N")]
    pub rm_subtasks: Vec<usize>,
}

#[derive(Args)]
pub struct StatusArgs {
    /// Task ID (or unique prefix)
    pub id: String,
    /// New status (backlog, inprogress, ready-to-check, done)
    pub status: String,
}

#[derive(Args)]
pub struct DoneArgs {
    /// Task ID (or unique prefix)
    pub id: String,
}

#[derive(Args)]
pub struct RmArgs {
    /// Task IDs to remove
    #[arg(required = true)]
    pub ids: Vec<String>,
}

// ---------------------------------------------------------------------------
// Sync and remote settings
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct SyncArgs {
    /// Print the sync log instead of syncing
    #[arg(long)]
    pub log: bool,
}

#[derive(Args)]
pub struct RemoteCmd {
    #[command(subcommand)]
    pub action: Option<RemoteAction>,
}

#[derive(Subcommand)]
pub enum RemoteAction {
    /// Show the effective remote settings (default)
    Show,
    /// Turn remote mirroring on
    On,
    /// Turn remote mirroring off
    Off,
    /// Set the remote document key
    Key(RemoteKeyArgs),
}

#[derive(Args)]
pub struct RemoteKeyArgs {
    /// Document key for the JSON storage endpoint
    pub key: String,
    /// Update secret, if the endpoint requires one for writes
    #[arg(long)]
    pub secret: Option<String>,
}
