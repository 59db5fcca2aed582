//! Build-and-measure runner: materializes a submission's files, invokes the
//! external compile/measure script, and classifies its exit code.
//!
//! The runner imposes no timeout or resource limit of its own (spec.md
//! §4.D) — its contract is strictly "spawn, wait, classify". Built on
//! `tokio::process::Command` so the blocking wait doesn't stall the whole
//! async runtime, generalizing the synchronous `std::process::Command`
//! invocations seen elsewhere in the corpus to an async-native server.

use std::path::{Path, PathBuf};

use crate::error::RunnerError;
use crate::store::{NewSubmission, SubmissionStore};
use crate::types::{Author, SubmissionId, SubmissionStatus};

/// Parameters for one build-and-measure invocation.
pub struct RunRequest<'a> {
    pub task: &'a str,
    pub user_id: &'a str,
    pub id: &'a SubmissionId,
    pub code: &'a str,
    pub flags: &'a str,
    pub symbol: &'a str,
    pub author: Author,
    pub client_ip: &'a str,
    pub benchmark_source: &'a Path,
}

/// The runner's classification of a completed run, ready for the leaderboard
/// to consume on `SubmissionStatus::Passed`.
pub struct RunOutcome {
    pub status: SubmissionStatus,
    pub best_time: f64,
    pub cycles_per_call: f64,
}

pub struct Runner {
    /// Absolute path to `runtime/compile.sh`.
    compile_script: PathBuf,
}

impl Runner {
    pub fn new(compile_script: impl Into<PathBuf>) -> Self {
        Self {
            compile_script: compile_script.into(),
        }
    }

    /// Prepare the submission directory, invoke the compile script, and
    /// persist its outputs. Returns the classified outcome.
    pub async fn run(
        &self,
        store: &SubmissionStore,
        req: &RunRequest<'_>,
    ) -> Result<RunOutcome, RunnerError> {
        let new_sub = NewSubmission {
            task: req.task,
            id: req.id,
            user_id: req.user_id,
            code: req.code,
            flags: req.flags,
            author: req.author,
            client_ip: req.client_ip,
            benchmark_source: req.benchmark_source,
        };
        let dir = store.accept(&new_sub).await?;

        tracing::info!(task = req.task, id = %req.id, "invoking compile script");
        let output = tokio::process::Command::new("/bin/bash")
            .arg(&self.compile_script)
            .arg(&dir)
            .arg(req.symbol)
            .output()
            .await?;

        let exit_code = output.status.code().unwrap_or(1).rem_euclid(256);
        let status = SubmissionStatus::from_exit_code(exit_code);
        tracing::info!(task = req.task, id = %req.id, exit_code, ?status, "compile script finished");

        let compiler_stderr = read_or_default(&dir.join("compile_stderr.log.html")).await;
        let input_code_html = read_or_default(&dir.join("submitted_code.highlight.html")).await;
        let benchmark_output = read_or_default(&dir.join("benchmark_output")).await;

        let (disassembly_html, disassembly_with_source_html, best_time, cycles_per_call) =
            if status.compile_successful() {
                let disasm = read_or_default(&dir.join("disassembly.html")).await;
                let disasm_src = read_or_default(&dir.join("disassembly_with_source.html")).await;
                let (time, cycles) = if status.correctness_passed() {
                    read_best_time(&dir.join("best_time.txt")).await
                } else {
                    (f64::INFINITY, f64::INFINITY)
                };
                (Some(disasm), Some(disasm_src), time, cycles)
            } else {
                (None, None, f64::INFINITY, f64::INFINITY)
            };

        let best_time_record = status
            .correctness_passed()
            .then_some((best_time, cycles_per_call));

        store
            .record_result(
                &dir,
                status,
                &compiler_stderr,
                &input_code_html,
                disassembly_html.as_deref(),
                disassembly_with_source_html.as_deref(),
                &benchmark_output,
                best_time_record,
            )
            .await?;

        Ok(RunOutcome {
            status,
            best_time,
            cycles_per_call,
        })
    }
}

async fn read_or_default(path: &Path) -> String {
    tokio::fs::read_to_string(path).await.unwrap_or_default()
}

async fn read_best_time(path: &Path) -> (f64, f64) {
    let text = match tokio::fs::read_to_string(path).await {
        Ok(t) => t,
        Err(_) => return (f64::INFINITY, f64::INFINITY),
    };
    let mut parts = text.split_whitespace();
    let time = parts.next().and_then(|s| s.parse().ok()).unwrap_or(f64::INFINITY);
    let cycles = parts.next().and_then(|s| s.parse().ok()).unwrap_or(f64::INFINITY);
    (time, cycles)
}
