use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "memfs", version, about = "In-memory file system shell")]
pub struct CliArgs {
    /// Snapshot to restore before the first command
    #[arg(long, env = "MEMFS_LOAD")]
    pub load: Option<PathBuf>,

    /// Write a snapshot here when the shell exits
    #[arg(long, env = "MEMFS_SAVE_ON_EXIT")]
    pub save_on_exit: Option<PathBuf>,

    /// Prompt shown before each command (interactive sessions only)
    #[arg(long, default_value = "$ ")]
    pub prompt: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn", env = "MEMFS_LOG_LEVEL")]
    pub log_level: String,
}
