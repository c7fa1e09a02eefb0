use std::fmt;
use world_core::transform::TransformError;

/// The two stores a run talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Backend {
    Relational,
    Cache,
}

impl Backend {
    pub fn label(self) -> &'static str {
        match self {
            Backend::Relational => "SQLite",
            Backend::Cache => "KeyDB",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Fatal failures. Anything in here aborts the run.
///
/// Per-record encode/decode problems are not represented here; they are
/// [`world_core::types::RecordError`]s collected into batch reports.
#[derive(Debug, thiserror::Error)]
pub enum WarmError {
    #[error("cannot reach {backend}: {reason}")]
    Connectivity { backend: Backend, reason: String },
    #[error("relational query failed: {0}")]
    Query(#[from] rusqlite::Error),
    #[error("cache command failed: {0}")]
    CacheCommand(#[from] redis::RedisError),
    #[error(transparent)]
    Transform(#[from] TransformError),
    #[error("invalid configuration {key}: {reason}")]
    Config { key: String, reason: String },
}

impl WarmError {
    pub fn connectivity(backend: Backend, err: impl fmt::Display) -> Self {
        WarmError::Connectivity {
            backend,
            reason: err.to_string(),
        }
    }
}

pub type Result<T, E = WarmError> = std::result::Result<T, E>;
