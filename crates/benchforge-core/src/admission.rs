//! Admission gate: a conservative lexical filter applied to every submission
//! before it reaches the compiler. Matching is performed on raw text with no
//! tokenization (spec.md §4.B) — false positives are an accepted cost.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::Admission;
use crate::types::TaskSpec;

/// Fixed word-boundary regex patterns banning process spawning, inline
/// assembly, main-symbol hijacking, memory primitives, concurrency, and
/// filesystem/stdio names. Compiled once at process startup.
static BASE_REGEX_DENYLIST: &[&str] = &[
    // process spawning
    "system", "execl", "execlp", "execle", "execv", "execvp", "execvpe", "fork",
    // inline assembly
    r"\basm",
    // main-symbol hijacking
    r"\bmain\b", "argv", "argc", r"\b_main\b", r"\bstart\b",
    // memory primitives
    "calloc", "malloc", "free", r"\bnew\b", r"\bmmap\b",
    // concurrency
    "pthread", "async", "launch", "thread",
    // filesystem and stdio
    "fstream", "fopen", "fputc", "filesystem", "directory_iterator", "dirent", "opendir",
    "readdir", "fread", "fwrite", "printf", "puts", "fputs", "putc", r"\bcout\b", r"\bcerr\b",
    r"\bcin\b",
];

/// Digraphs and the preprocessor marker. The `#` ban is total: no
/// preprocessor directives may appear in a submission.
static LITERAL_DENYLIST: &[&str] = &["<%", "%>", "<:", ":>", "%:", "%:%:", "#"];

/// Literal substrings that disqualify a compiler-flag string.
static FLAG_DENYLIST: &[&str] = &[";", "&&", "||", "|", "&", ".", "/", "<", ">"];

static COMPILED_BASE_DENYLIST: Lazy<Vec<Regex>> = Lazy::new(|| {
    BASE_REGEX_DENYLIST
        .iter()
        .map(|p| Regex::new(p).expect("static admission pattern must compile"))
        .collect()
});

/// Check submitted source text and compiler flags against the denylist.
pub fn admit(source: &str, flags: &str, task: &TaskSpec) -> Admission {
    if code_is_denylisted(source, task) {
        return Admission::RejectedCode;
    }
    if flags_are_denylisted(flags) {
        return Admission::RejectedFlags;
    }
    Admission::Accepted
}

fn code_is_denylisted(source: &str, task: &TaskSpec) -> bool {
    if COMPILED_BASE_DENYLIST.iter().any(|re| re.is_match(source)) {
        return true;
    }
    if LITERAL_DENYLIST.iter().any(|pat| source.contains(pat)) {
        return true;
    }
    task_denylist_matches(source, task)
}

fn task_denylist_matches(source: &str, task: &TaskSpec) -> bool {
    task.compiled_extra_denylist.iter().any(|re| re.is_match(source))
}

fn flags_are_denylisted(flags: &str) -> bool {
    FLAG_DENYLIST.iter().any(|pat| flags.contains(pat))
}
