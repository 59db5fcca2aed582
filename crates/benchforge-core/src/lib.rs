//! benchforge-core
//!
//! Shared submission pipeline for the classroom performance-competition
//! service: task registry, admission gate, submission store, build-and-
//! measure runner, leaderboard projection, and identity/anonymization.

pub mod admission;
pub mod error;
pub mod identity;
pub mod leaderboard;
pub mod runner;
pub mod store;
pub mod task;
pub mod types;

pub use admission::admit;
pub use error::{Admission, RunnerError, StoreError, TaskError};
pub use leaderboard::Leaderboard;
pub use runner::{RunOutcome, RunRequest, Runner};
pub use store::{NewSubmission, SubmissionStore};
pub use task::load_task;
pub use types::{
    Author, LeaderboardEntry, LeaderboardRow, Submission, SubmissionId, SubmissionResult,
    SubmissionStatus, TaskSpec,
};
