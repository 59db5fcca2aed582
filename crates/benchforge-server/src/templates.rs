//! Template placeholder substitution (spec.md §6). Substitution is global,
//! first-past-the-post string replace — confirmed against
//! `original_source/server.cpp`'s `replace_all`, which is a literal
//! `std::string::replace` loop, not a templating-engine expansion. A
//! mustache-style crate would change these semantics, so this stays a plain
//! `str::replace` chain rather than reaching for one of the corpus's
//! templating crates.

/// Render the leaderboard page template.
pub fn render_leaderboard(template: &str, task: &str, rows_html: &str) -> String {
    template
        .replace("${TASK}", task)
        .replace("${LEADERBOARD_ROWS}", rows_html)
}

/// Fields substituted into the submission result page template.
pub struct SubmissionView<'a> {
    pub task: &'a str,
    pub user_id: &'a str,
    pub submission_id: &'a str,
    pub compiler_flags: &'a str,
    pub compile_status_html: &'a str,
    pub correctness_test_html: &'a str,
    pub benchmark_best_time: &'a str,
    pub benchmark_cycles_per_call: &'a str,
    pub ai_generated: &'a str,
    pub input_code: &'a str,
    pub compiler_output: &'a str,
    pub disassembly: &'a str,
    pub disassembly_with_source: &'a str,
    pub benchmark_output: &'a str,
}

pub fn render_submission(template: &str, view: &SubmissionView<'_>) -> String {
    template
        .replace("${TASK}", view.task)
        .replace("${USER_ID}", view.user_id)
        .replace("${SUBMISSION_ID}", view.submission_id)
        .replace("${COMPILER_FLAGS}", view.compiler_flags)
        .replace("${COMPILE_STATUS}", view.compile_status_html)
        .replace("${CORRECTNESS_TEST}", view.correctness_test_html)
        .replace("${BENCHMARK_BEST_TIME}", view.benchmark_best_time)
        .replace("${BENCHMARK_CYCLES_PER_CALL}", view.benchmark_cycles_per_call)
        .replace("${AI_GENERATED}", view.ai_generated)
        .replace("${INPUT_CODE}", view.input_code)
        .replace("${COMPILER_OUTPUT}", view.compiler_output)
        .replace("${DISASSEMBLY}", view.disassembly)
        .replace("${DISASSEMBLY_WITH_SOURCE}", view.disassembly_with_source)
        .replace("${BENCHMARK_OUTPUT}", view.benchmark_output)
}

pub fn status_badge(ok: bool) -> &'static str {
    if ok {
        "<span style='color:green;'>Success</span>"
    } else {
        "<span style='color:red;'>Failed</span>"
    }
}
