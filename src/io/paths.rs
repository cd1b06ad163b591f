use std::path::{Path, PathBuf};

/// Environment variable that relocates the whole data directory
pub const HOME_ENV: &str = "PLANK_HOME";

/// Locations of everything the board keeps on disk
#[derive(Debug, Clone)]
pub struct DataPaths {
    root: PathBuf,
}

impl DataPaths {
    /// Resolve the data directory: explicit override, then $PLANK_HOME,
    /// then $XDG_DATA_HOME/plank, then ~/.local/share/plank. A relative
    /// `.plank` is the last resort when no home directory is known.
    pub fn resolve(override_dir: Option<&Path>) -> DataPaths {
        if let Some(dir) = override_dir {
            return DataPaths {
                root: dir.to_path_buf(),
            };
        }
        if let Ok(home) = std::env::var(HOME_ENV)
            && !home.is_empty()
        {
            return DataPaths {
                root: PathBuf::from(home),
            };
        }
        if let Ok(xdg) = std::env::var("XDG_DATA_HOME")
            && !xdg.is_empty()
        {
            return DataPaths {
                root: PathBuf::from(xdg).join("plank"),
            };
        }
        match home_dir() {
            Some(home) => DataPaths {
                root: home.join(".local").join("share").join("plank"),
            },
            None => DataPaths {
                root: PathBuf::from(".plank"),
            },
        }
    }

    /// Use a specific directory without consulting the environment
    pub fn at(root: impl Into<PathBuf>) -> DataPaths {
        DataPaths { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The board document
    pub fn tasks_file(&self) -> PathBuf {
        self.root.join("tasks.json")
    }

    /// The signed-in user
    pub fn session_file(&self) -> PathBuf {
        self.root.join("session.json")
    }

    pub fn config_file(&self) -> PathBuf {
        self.root.join("config.toml")
    }

    /// Advisory log for sync trouble and recovered data
    pub fn sync_log_file(&self) -> PathBuf {
        self.root.join("sync.log")
    }

    pub fn ensure_root(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.root)
    }
}

fn home_dir() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .filter(|h| !h.is_empty())
        .map(PathBuf::from)
}
