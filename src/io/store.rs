use chrono::{DateTime, Duration, Utc};

use crate::io::local::{self, LocalError};
use crate::io::log::{self, LogCategory};
use crate::io::paths::DataPaths;
use crate::io::remote::{RemoteClient, RemoteError};
use crate::model::{SyncConfig, Task};

/// Done tasks untouched for this long are dropped from pushed documents.
/// They stay in the local file; only the mirror forgets them.
pub const DONE_RETENTION_DAYS: i64 = 30;

/// Whether a remote mirror is configured
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageMode {
    LocalOnly,
    Mirrored,
}

impl StorageMode {
    pub fn label(self) -> &'static str {
        match self {
            StorageMode::LocalOnly => "local",
            StorageMode::Mirrored => "synced",
        }
    }
}

/// Where the returned task list came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataOrigin {
    LocalFile,
    Seeded,
    Remote,
}

impl DataOrigin {
    pub fn label(self) -> &'static str {
        match self {
            DataOrigin::LocalFile => "local",
            DataOrigin::Seeded => "seed",
            DataOrigin::Remote => "remote",
        }
    }
}

/// Result of a fetch. Fetch never fails; trouble shows up as an advisory.
#[derive(Debug)]
pub struct FetchOutcome {
    pub tasks: Vec<Task>,
    pub origin: DataOrigin,
    pub advisory: Option<String>,
}

/// What happened on the remote side of a save
#[derive(Debug)]
pub enum RemoteOutcome {
    /// No mirror configured
    Skipped,
    Synced,
    Failed(RemoteError),
}

/// Result of a save. The local file is the floor: its outcome is reported
/// separately from the mirror's.
#[derive(Debug)]
pub struct SaveReport {
    pub local_error: Option<LocalError>,
    pub remote: RemoteOutcome,
}

impl SaveReport {
    pub fn is_clean(&self) -> bool {
        self.local_error.is_none() && !matches!(self.remote, RemoteOutcome::Failed(_))
    }

    /// One-line banner text for anything that went wrong
    pub fn advisory(&self) -> Option<String> {
        if let Some(e) = &self.local_error {
            return Some(format!("local save failed: {}", e));
        }
        if let RemoteOutcome::Failed(e) = &self.remote {
            return Some(format!("saved locally; sync failed: {}", e));
        }
        None
    }
}

/// Two-tier task storage: the local file always, a remote mirror when
/// configured. All reads and writes to the board go through here.
pub struct TaskStore {
    paths: DataPaths,
    remote: Option<RemoteClient>,
}

impl TaskStore {
    pub fn open(paths: DataPaths, sync: &SyncConfig) -> TaskStore {
        let remote = RemoteClient::from_config(sync);
        TaskStore { paths, remote }
    }

    /// A store that never talks to the network
    pub fn local_only(paths: DataPaths) -> TaskStore {
        TaskStore {
            paths,
            remote: None,
        }
    }

    pub fn mode(&self) -> StorageMode {
        if self.remote.is_some() {
            StorageMode::Mirrored
        } else {
            StorageMode::LocalOnly
        }
    }

    pub fn paths(&self) -> &DataPaths {
        &self.paths
    }

    /// Read the local file only, seeding a fresh board
    pub fn load_local(&self) -> FetchOutcome {
        let loaded = local::read_tasks(&self.paths);
        let origin = if loaded.seeded {
            DataOrigin::Seeded
        } else {
            DataOrigin::LocalFile
        };
        FetchOutcome {
            tasks: loaded.tasks,
            origin,
            advisory: loaded.recovered,
        }
    }

    /// The full fetch dance: local first, then consult the mirror.
    /// A non-empty mirror wins and refreshes the local copy; an empty
    /// mirror gets the local tasks pushed up; an unreachable mirror is
    /// an advisory, never an error.
    pub fn fetch_tasks(&self) -> FetchOutcome {
        let local = self.load_local();
        let Some(client) = &self.remote else {
            return local;
        };
        match client.fetch_document() {
            Ok(remote_tasks) => {
                let merged = reconcile(local.tasks, remote_tasks);
                if merged.remote_won {
                    let advisory = local::write_tasks(&self.paths, &merged.tasks)
                        .err()
                        .map(|e| {
                            let message = format!("could not refresh local copy: {}", e);
                            log::append(&self.paths, LogCategory::Local, &message);
                            message
                        });
                    FetchOutcome {
                        tasks: merged.tasks,
                        origin: DataOrigin::Remote,
                        advisory,
                    }
                } else if merged.push_local {
                    let report = self.save_tasks(&merged.tasks);
                    FetchOutcome {
                        tasks: merged.tasks,
                        origin: local.origin,
                        advisory: report.advisory().or(local.advisory),
                    }
                } else {
                    FetchOutcome {
                        tasks: merged.tasks,
                        origin: local.origin,
                        advisory: local.advisory,
                    }
                }
            }
            Err(e) => {
                log::append(&self.paths, LogCategory::Fetch, &e.to_string());
                FetchOutcome {
                    tasks: local.tasks,
                    origin: local.origin,
                    advisory: Some(format!("sync fetch failed: {}", e)),
                }
            }
        }
    }

    /// Save everywhere: the local file first, then the mirror with old
    /// done tasks filtered out of the pushed document.
    pub fn save_tasks(&self, tasks: &[Task]) -> SaveReport {
        let local_error = local::write_tasks(&self.paths, tasks).err();
        if let Some(e) = &local_error {
            log::append(&self.paths, LogCategory::Local, &e.to_string());
        }
        let remote = match &self.remote {
            None => RemoteOutcome::Skipped,
            Some(client) => {
                let payload = retention_filter(tasks, Utc::now());
                match client.put_document(&payload) {
                    Ok(()) => RemoteOutcome::Synced,
                    Err(e) => {
                        log::append(&self.paths, LogCategory::Push, &e.to_string());
                        RemoteOutcome::Failed(e)
                    }
                }
            }
        };
        SaveReport {
            local_error,
            remote,
        }
    }

    /// Append a task and save
    pub fn add_task(&self, tasks: &[Task], task: Task) -> (Vec<Task>, SaveReport) {
        let mut updated = tasks.to_vec();
        updated.push(task);
        let report = self.save_tasks(&updated);
        (updated, report)
    }

    /// Replace the task with the same id and save
    pub fn update_task(&self, tasks: &[Task], updated_task: Task) -> (Vec<Task>, SaveReport) {
        let updated: Vec<Task> = tasks
            .iter()
            .map(|t| {
                if t.id == updated_task.id {
                    updated_task.clone()
                } else {
                    t.clone()
                }
            })
            .collect();
        let report = self.save_tasks(&updated);
        (updated, report)
    }

    /// Drop the task with the given id, if present, and save
    pub fn delete_task(&self, tasks: &[Task], task_id: &str) -> (Vec<Task>, SaveReport) {
        let updated: Vec<Task> = tasks
            .iter()
            .filter(|t| t.id != task_id)
            .cloned()
            .collect();
        let report = self.save_tasks(&updated);
        (updated, report)
    }
}

/// Outcome of merging local and remote copies
#[derive(Debug)]
pub struct Reconciled {
    pub tasks: Vec<Task>,
    /// The mirror had data; it replaces the local copy
    pub remote_won: bool,
    /// The mirror was empty while we had tasks; push ours up
    pub push_local: bool,
}

/// The whole-document merge rule: a non-empty remote copy wins outright,
/// an empty one is treated as a blank mirror waiting for our data.
pub fn reconcile(local: Vec<Task>, remote: Vec<Task>) -> Reconciled {
    if !remote.is_empty() {
        Reconciled {
            tasks: remote,
            remote_won: true,
            push_local: false,
        }
    } else if !local.is_empty() {
        Reconciled {
            tasks: local,
            remote_won: false,
            push_local: true,
        }
    } else {
        Reconciled {
            tasks: local,
            remote_won: false,
            push_local: false,
        }
    }
}

/// Drop done tasks whose last update is older than the retention window.
/// Applies to pushed documents only; local files keep everything.
pub fn retention_filter(tasks: &[Task], now: DateTime<Utc>) -> Vec<Task> {
    let cutoff = now - Duration::days(DONE_RETENTION_DAYS);
    tasks
        .iter()
        .filter(|t| !t.is_done() || t.updated_at > cutoff)
        .cloned()
        .collect()
}
