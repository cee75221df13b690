pub mod command;
pub mod config;
pub mod error;
pub mod fs;
pub mod path;
pub mod shell;
pub mod snapshot;
pub mod tree;

pub use error::FsError;
pub use fs::FileSystem;
pub use shell::{Outcome, Shell};
pub use snapshot::SnapshotNode;
