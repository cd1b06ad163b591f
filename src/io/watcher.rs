use std::path::PathBuf;
use std::sync::mpsc;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use crate::io::paths::DataPaths;

/// Events sent from the file watcher to the TUI event loop.
#[derive(Debug)]
pub enum FileEvent {
    /// The board document changed on disk (another process saved)
    TasksChanged,
    /// The session file changed on disk (login or logout elsewhere)
    SessionChanged,
}

/// Watches the data directory so the TUI picks up edits made by the CLI
/// or another instance against the same files.
pub struct DataWatcher {
    _watcher: RecommendedWatcher,
    rx: mpsc::Receiver<FileEvent>,
}

impl DataWatcher {
    /// Start watching. `poll()` should be called each tick.
    pub fn start(paths: &DataPaths) -> Result<Self, notify::Error> {
        let (tx, rx) = mpsc::channel();
        let tasks_file = paths.tasks_file();
        let session_file = paths.session_file();

        let mut watcher = RecommendedWatcher::new(
            move |result: Result<Event, notify::Error>| {
                let event = match result {
                    Ok(e) => e,
                    Err(_) => return,
                };

                match event.kind {
                    EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_) => {}
                    _ => return,
                }

                for path in &event.paths {
                    if paths_match(path, &tasks_file) {
                        let _ = tx.send(FileEvent::TasksChanged);
                    } else if paths_match(path, &session_file) {
                        let _ = tx.send(FileEvent::SessionChanged);
                    }
                }
            },
            Config::default(),
        )?;

        watcher.watch(paths.root(), RecursiveMode::NonRecursive)?;
        Ok(DataWatcher {
            _watcher: watcher,
            rx,
        })
    }

    /// Non-blocking poll for pending file events.
    pub fn poll(&self) -> Vec<FileEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            events.push(event);
        }
        events
    }
}

/// Watch backends report paths with varying prefixes; compare by file name
/// within the watched directory.
fn paths_match(seen: &PathBuf, tracked: &PathBuf) -> bool {
    seen.file_name().is_some() && seen.file_name() == tracked.file_name()
}
