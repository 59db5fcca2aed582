//! Shared application state and the submission pipeline lock.
//!
//! spec.md §5 requires that submit, load, and leaderboard mutation be
//! serialized. `Pipeline` is a single `tokio::sync::Mutex` guarding both the
//! monotonic submission-id counter and the whole build-and-measure sequence:
//! the handler holds the guard across admission, store writes, the external
//! compile script, and the leaderboard insert. Reads (`/leaderboard`,
//! `/view_submission`) never touch this lock — they go through the
//! `Leaderboard`'s own `RwLock` or read the append-only store directly.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::Mutex;

use benchforge_core::{Leaderboard, Runner, SubmissionId, SubmissionStore, TaskSpec};

pub struct Pipeline {
    counter: Mutex<u64>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self { counter: Mutex::new(0) }
    }

    /// Acquire the pipeline lock and assign the next submission id. The
    /// returned guard must be held for the duration of admission, the
    /// runner invocation, and the leaderboard insert.
    pub async fn acquire(&self) -> PipelineGuard<'_> {
        let mut counter = self.counter.lock().await;
        *counter += 1;
        let id = SubmissionId::new(*counter, &mut rand::thread_rng());
        PipelineGuard { _counter: counter, id }
    }
}

pub struct PipelineGuard<'a> {
    _counter: tokio::sync::MutexGuard<'a, u64>,
    pub id: SubmissionId,
}

#[derive(Clone)]
pub struct AppState {
    pub task: Arc<TaskSpec>,
    pub store: Arc<SubmissionStore>,
    pub runner: Arc<Runner>,
    pub leaderboard: Arc<Leaderboard>,
    pub pipeline: Arc<Pipeline>,
    pub public_mode: bool,
    pub templates_dir: PathBuf,
}
