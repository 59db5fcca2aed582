//! Shared data model: tasks, submissions, results, and leaderboard entries.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A self-declared provenance tag for a submission, drawn from a closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Author {
    Human,
    ChatGPT,
    HumanTeam,
    HybridTeam,
    Teacher,
}

impl Author {
    /// Parse the closed set of author labels accepted on `/submit`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Human" => Some(Author::Human),
            "ChatGPT" => Some(Author::ChatGPT),
            "HumanTeam" => Some(Author::HumanTeam),
            "HybridTeam" => Some(Author::HybridTeam),
            "Teacher" => Some(Author::Teacher),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Author::Human => "Human",
            Author::ChatGPT => "ChatGPT",
            Author::HumanTeam => "HumanTeam",
            Author::HybridTeam => "HybridTeam",
            Author::Teacher => "Teacher",
        }
    }
}

/// The external script's exit-code contract (spec.md §4.D), mapped at the
/// runner boundary into a closed status enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmissionStatus {
    /// Exit code 0: benchmark ran, best time + cycles emitted.
    Passed,
    /// Exit code 1 (or any code outside {0, 1, 2}): compile failed.
    CompileFailed,
    /// Exit code 2: compiled but the correctness test failed.
    CorrectnessFailed,
}

impl SubmissionStatus {
    /// Classify a raw process exit code per the documented contract. Any
    /// code outside {0, 1, 2} is conservatively treated as status 1.
    pub fn from_exit_code(code: i32) -> Self {
        match code {
            0 => SubmissionStatus::Passed,
            2 => SubmissionStatus::CorrectnessFailed,
            _ => SubmissionStatus::CompileFailed,
        }
    }

    pub fn code(&self) -> i32 {
        match self {
            SubmissionStatus::Passed => 0,
            SubmissionStatus::CompileFailed => 1,
            SubmissionStatus::CorrectnessFailed => 2,
        }
    }

    pub fn compile_successful(&self) -> bool {
        !matches!(self, SubmissionStatus::CompileFailed)
    }

    pub fn correctness_passed(&self) -> bool {
        matches!(self, SubmissionStatus::Passed)
    }
}

/// Immutable, per-process configuration for one task, loaded once at startup
/// from `tasks/<name>/`.
#[derive(Debug, Clone)]
pub struct TaskSpec {
    pub name: String,
    /// Symbol whose disassembly the compile script extracts.
    pub symbol: String,
    /// Path to the benchmark harness shipped with the task.
    pub benchmark_path: PathBuf,
    /// Raw regex source for the task's own denylist (reference-blocking
    /// patterns), read from `bad_code.regex` if present.
    pub extra_denylist: Vec<String>,
    /// `extra_denylist`, compiled once at load time.
    pub compiled_extra_denylist: Vec<regex::Regex>,
    /// Numeric tolerance metadata for the task's correctness test.
    /// Descriptive only — the check itself runs in the external binary.
    pub max_error: f64,
}

/// A submission id of the form `NNNN-XXXX`: a monotonic per-process counter
/// followed by four hex digits of randomness.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubmissionId(pub String);

impl std::fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl SubmissionId {
    pub fn new(counter: u64, rng: &mut impl rand::Rng) -> Self {
        let suffix: u16 = rng.gen();
        SubmissionId(format!("{counter:04}-{suffix:04x}"))
    }
}

/// Derived from the external tool's outputs. Missing fields take the
/// documented sentinel defaults (empty string / `+inf`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionResult {
    pub status: SubmissionStatus,
    pub best_time: f64,
    pub cycles_per_call: f64,
    pub compiler_stderr: String,
    pub input_code_html: String,
    pub disassembly_html: String,
    pub disassembly_with_source_html: String,
    pub benchmark_output: String,
}

impl SubmissionResult {
    pub fn compile_successful(&self) -> bool {
        self.status.compile_successful()
    }

    pub fn correctness_passed(&self) -> bool {
        self.status.correctness_passed()
    }
}

/// One student attempt at a task: source text, flags, and provenance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub id: SubmissionId,
    pub task: String,
    pub user_id: String,
    pub code: String,
    pub flags: String,
    pub author: Author,
    pub client_ip: String,
    pub result: Option<SubmissionResult>,
}

/// A projection tuple produced at most once per successful submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub task: String,
    pub user_id: String,
    pub submission_id: SubmissionId,
    pub best_time: f64,
    #[serde(default = "default_cycles")]
    pub cycles_per_call: f64,
    #[serde(default = "default_author")]
    pub author: Author,
}

fn default_cycles() -> f64 {
    f64::INFINITY
}

fn default_author() -> Author {
    Author::Human
}

/// A row as rendered on the leaderboard page: an entry plus the UI
/// annotations driving per-user highlighting (spec.md §4.E).
#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardRow {
    pub entry: LeaderboardEntry,
    pub rank: usize,
    pub first_of_user: bool,
    pub user_rank: Option<usize>,
    pub linkable: bool,
}
