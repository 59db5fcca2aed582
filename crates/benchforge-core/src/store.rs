//! Submission store: a directory-per-submission on-disk layout that *is* the
//! system of record (spec.md §4.C). Generalizes the teacher's content-addressed
//! object store (`ObjectStore`, keyed by hash) to id-addressing, keyed by
//! `(task, submission_id)` instead of a content hash.

use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;

use crate::error::StoreError;
use crate::types::{Author, Submission, SubmissionId, SubmissionResult, SubmissionStatus};

/// Root-relative file names written at accept time and by the runner.
mod files {
    pub const CODE: &str = "submitted_code.hpp";
    pub const FLAGS: &str = "flags.txt";
    pub const USER_ID: &str = "user_id";
    pub const AUTHOR: &str = "author";
    pub const IP: &str = "ip";
    pub const BENCHMARK: &str = "benchmark.cpp";
    pub const EXIT_CODE: &str = "exit_code";
    pub const COMPILE_STDERR: &str = "compile_stderr.log.html";
    pub const HIGHLIGHT: &str = "submitted_code.highlight.html";
    pub const DISASSEMBLY: &str = "disassembly.html";
    pub const DISASSEMBLY_WITH_SOURCE: &str = "disassembly_with_source.html";
    pub const BENCHMARK_OUTPUT: &str = "benchmark_output";
    pub const BEST_TIME: &str = "best_time.txt";
}

/// Fields to write on acceptance of a new submission, before the runner is
/// invoked.
pub struct NewSubmission<'a> {
    pub task: &'a str,
    pub id: &'a SubmissionId,
    pub user_id: &'a str,
    pub code: &'a str,
    pub flags: &'a str,
    pub author: Author,
    pub client_ip: &'a str,
    pub benchmark_source: &'a Path,
}

#[derive(Clone)]
pub struct SubmissionStore {
    root: PathBuf,
}

impl SubmissionStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn submission_dir(&self, task: &str, id: &SubmissionId) -> PathBuf {
        self.root.join(task).join(&id.0)
    }

    /// Create the submission directory and write the five accept-time input
    /// files plus a copy of the task's benchmark harness. Errors if the
    /// directory already exists — a collision is considered a bug (spec.md
    /// §3 invariants).
    pub async fn accept(&self, sub: &NewSubmission<'_>) -> Result<PathBuf, StoreError> {
        let dir = self.submission_dir(sub.task, sub.id);
        if dir.exists() {
            return Err(StoreError::AlreadyExists(dir));
        }
        tokio::fs::create_dir_all(&dir).await?;

        write_file(&dir, files::CODE, sub.code).await?;
        write_file(&dir, files::FLAGS, sub.flags).await?;
        write_file(&dir, files::USER_ID, sub.user_id).await?;
        write_file(&dir, files::AUTHOR, sub.author.as_str()).await?;
        write_file(&dir, files::IP, sub.client_ip).await?;

        let benchmark_contents = tokio::fs::read(sub.benchmark_source).await?;
        tokio::fs::write(dir.join(files::BENCHMARK), benchmark_contents).await?;

        Ok(dir)
    }

    /// Record the runner's classification. Writes `exit_code` always,
    /// `compile_stderr.log.html` if non-empty, the disassembly files only on
    /// compile success, and `best_time.txt` only on a full pass.
    pub async fn record_result(
        &self,
        dir: &Path,
        status: SubmissionStatus,
        compiler_stderr: &str,
        input_code_html: &str,
        disassembly_html: Option<&str>,
        disassembly_with_source_html: Option<&str>,
        benchmark_output: &str,
        best_time: Option<(f64, f64)>,
    ) -> Result<(), StoreError> {
        write_file(dir, files::EXIT_CODE, &status.code().to_string()).await?;
        write_file(dir, files::COMPILE_STDERR, compiler_stderr).await?;
        write_file(dir, files::HIGHLIGHT, input_code_html).await?;
        write_file(dir, files::BENCHMARK_OUTPUT, benchmark_output).await?;

        if let Some(html) = disassembly_html {
            write_file(dir, files::DISASSEMBLY, html).await?;
        }
        if let Some(html) = disassembly_with_source_html {
            write_file(dir, files::DISASSEMBLY_WITH_SOURCE, html).await?;
        }
        if let Some((time, cycles)) = best_time {
            write_file(dir, files::BEST_TIME, &format!("{time} {cycles}")).await?;
        }
        Ok(())
    }

    /// Load a submission from disk. Tolerant of missing files: each field
    /// takes its documented sentinel default. Returns `None` if the
    /// submission directory itself does not exist.
    pub async fn load(&self, task: &str, id: &SubmissionId) -> Option<Submission> {
        let dir = self.submission_dir(task, id);
        if !dir.is_dir() {
            return None;
        }

        let code = read_text(&dir, files::CODE).await.unwrap_or_default();
        let flags = read_text(&dir, files::FLAGS).await.unwrap_or_default();
        let user_id = read_text(&dir, files::USER_ID).await.unwrap_or_default();
        let author = read_text(&dir, files::AUTHOR)
            .await
            .and_then(|s| Author::parse(s.trim()))
            .unwrap_or(Author::Human);
        let client_ip = read_text(&dir, files::IP).await.unwrap_or_default();

        let result = load_result(&dir).await;

        Some(Submission {
            id: id.clone(),
            task: task.to_string(),
            user_id,
            code,
            flags,
            author,
            client_ip,
            result,
        })
    }

    /// Enumerate `(task, submission_id)` pairs for every submission
    /// directory under a given task, used by `rebuildFromStore`.
    pub async fn list_ids(&self, task: &str) -> std::io::Result<Vec<SubmissionId>> {
        let task_dir = self.root.join(task);
        if !task_dir.is_dir() {
            return Ok(Vec::new());
        }
        let mut ids = Vec::new();
        let mut entries = tokio::fs::read_dir(&task_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_dir() {
                if let Some(name) = entry.file_name().to_str() {
                    ids.push(SubmissionId(name.to_string()));
                }
            }
        }
        Ok(ids)
    }
}

async fn load_result(dir: &Path) -> Option<SubmissionResult> {
    let exit_code: i32 = read_text(dir, files::EXIT_CODE)
        .await?
        .trim()
        .parse()
        .ok()?;
    let status = SubmissionStatus::from_exit_code(exit_code);

    let compiler_stderr = read_text(dir, files::COMPILE_STDERR).await.unwrap_or_default();
    let input_code_html = read_text(dir, files::HIGHLIGHT).await.unwrap_or_default();
    let disassembly_html = read_text(dir, files::DISASSEMBLY).await.unwrap_or_default();
    let disassembly_with_source_html = read_text(dir, files::DISASSEMBLY_WITH_SOURCE)
        .await
        .unwrap_or_default();
    let benchmark_output = read_text(dir, files::BENCHMARK_OUTPUT).await.unwrap_or_default();

    let (best_time, cycles_per_call) = read_text(dir, files::BEST_TIME)
        .await
        .and_then(|s| parse_best_time(&s))
        .unwrap_or((f64::INFINITY, f64::INFINITY));

    Some(SubmissionResult {
        status,
        best_time,
        cycles_per_call,
        compiler_stderr,
        input_code_html,
        disassembly_html,
        disassembly_with_source_html,
        benchmark_output,
    })
}

fn parse_best_time(s: &str) -> Option<(f64, f64)> {
    let mut parts = s.split_whitespace();
    let time: f64 = parts.next()?.parse().ok()?;
    // Cycles-per-call is newer than the time field and may be absent.
    let cycles = parts
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(f64::INFINITY);
    Some((time, cycles))
}

async fn write_file(dir: &Path, name: &str, contents: &str) -> Result<(), StoreError> {
    let mut file = tokio::fs::File::create(dir.join(name)).await?;
    file.write_all(contents.as_bytes()).await?;
    Ok(())
}

async fn read_text(dir: &Path, name: &str) -> Option<String> {
    tokio::fs::read_to_string(dir.join(name)).await.ok()
}
