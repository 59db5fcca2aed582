//! `GET /view_submission?id=...` (spec.md §4.F).

use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::Html;
use serde::Deserialize;

use benchforge_core::SubmissionId;

use crate::cookie::read_user_id;
use crate::error::AppError;
use crate::state::AppState;
use crate::templates::{self, SubmissionView};

#[derive(Deserialize)]
pub struct ViewQuery {
    id: String,
}

pub async fn view_submission(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ViewQuery>,
) -> Result<Html<String>, AppError> {
    let id = SubmissionId(query.id);
    let submission = state
        .store
        .load(&state.task.name, &id)
        .await
        .ok_or(AppError::NotFound)?;

    if !state.public_mode {
        let requester = read_user_id(&headers);
        if requester.as_deref() != Some(submission.user_id.as_str()) {
            return Err(AppError::Forbidden);
        }
    }

    let result = submission.result.as_ref();
    let compile_ok = result.map(|r| r.compile_successful()).unwrap_or(false);
    let correctness_ok = result.map(|r| r.correctness_passed()).unwrap_or(false);
    let best_time = result.map(|r| r.best_time).unwrap_or(f64::INFINITY);
    let cycles = result.map(|r| r.cycles_per_call).unwrap_or(f64::INFINITY);

    let template = tokio::fs::read_to_string(state.templates_dir.join("submission_result.html"))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let view = SubmissionView {
        task: &submission.task,
        user_id: &submission.user_id,
        submission_id: &id.0,
        compiler_flags: &submission.flags,
        compile_status_html: templates::status_badge(compile_ok),
        correctness_test_html: templates::status_badge(correctness_ok),
        benchmark_best_time: &format!("{best_time}"),
        benchmark_cycles_per_call: &format!("{cycles}"),
        ai_generated: submission.author.as_str(),
        input_code: result.map(|r| r.input_code_html.as_str()).unwrap_or(""),
        compiler_output: result.map(|r| r.compiler_stderr.as_str()).unwrap_or(""),
        disassembly: result.map(|r| r.disassembly_html.as_str()).unwrap_or(""),
        disassembly_with_source: result
            .map(|r| r.disassembly_with_source_html.as_str())
            .unwrap_or(""),
        benchmark_output: result.map(|r| r.benchmark_output.as_str()).unwrap_or(""),
    };

    Ok(Html(templates::render_submission(&template, &view)))
}
