use thiserror::Error;

#[derive(Debug, Error)]
pub enum FsError {
    #[error("{what} not found: {path}")]
    NotFound { what: &'static str, path: String },
    #[error("File already exists: {0}")]
    AlreadyExists(String),
    #[error("Invalid target: {0}")]
    InvalidTarget(String),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Invalid command: {0}")]
    InvalidCommand(String),
    #[error("Corrupt snapshot: {0}")]
    CorruptSnapshot(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FsError {
    pub fn directory_not_found(path: &str) -> Self {
        Self::NotFound {
            what: "Directory",
            path: path.to_string(),
        }
    }

    pub fn file_not_found(path: &str) -> Self {
        Self::NotFound {
            what: "File",
            path: path.to_string(),
        }
    }

    pub fn node_not_found(path: &str) -> Self {
        Self::NotFound {
            what: "File or directory",
            path: path.to_string(),
        }
    }

    pub fn invalid_source_or_destination(src: &str, dest: &str) -> Self {
        Self::InvalidTarget(format!("invalid source or destination: {} -> {}", src, dest))
    }

    /// Machine-readable code for this error variant.
    pub fn code(&self) -> &str {
        match self {
            Self::NotFound { .. } => "FS_NOT_FOUND",
            Self::AlreadyExists(_) => "FS_ALREADY_EXISTS",
            Self::InvalidTarget(_) => "FS_INVALID_TARGET",
            Self::InvalidArgument(_) => "FS_INVALID_ARGUMENT",
            Self::InvalidCommand(_) => "FS_INVALID_COMMAND",
            Self::CorruptSnapshot(_) => "FS_CORRUPT_SNAPSHOT",
            Self::Io(_) => "FS_IO_ERROR",
            Self::Json(_) => "FS_JSON_ERROR",
        }
    }
}
