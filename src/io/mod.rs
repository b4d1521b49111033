pub mod atomic;
pub mod board_io;
pub mod config_io;
pub mod paths;
pub mod signal;
pub mod watcher;
