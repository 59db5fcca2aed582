//! Per-component error enums. Each maps to a disposition in spec.md §7; the
//! HTTP edge (in `benchforge-server`) composes these into response bodies.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error("task directory not found: {0}")]
    MissingTaskDir(PathBuf),
    #[error("task symbol file not found: {0}")]
    MissingSymbol(PathBuf),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid denylist pattern: {0}")]
    Regex(#[from] regex::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("submission directory already exists: {0}")]
    AlreadyExists(PathBuf),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("failed to spawn compile script: {0}")]
    Spawn(#[from] std::io::Error),
}

/// The outcome of admission, per spec.md §4.B.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Accepted,
    RejectedCode,
    RejectedFlags,
}
