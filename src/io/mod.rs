pub mod config_io;
pub mod local;
pub mod log;
pub mod paths;
pub mod remote;
pub mod store;
pub mod sync;
pub mod watcher;
