//! `POST /submit` (spec.md §4.F).

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, Form, State};
use axum::http::HeaderMap;
use axum::response::Redirect;
use serde::Deserialize;

use benchforge_core::{admit, Admission, Author, LeaderboardEntry, RunRequest};

use crate::cookie::read_user_id;
use crate::error::AppError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct SubmitForm {
    code: Option<String>,
    flags: Option<String>,
    author: Option<String>,
}

pub async fn submit(
    State(state): State<AppState>,
    headers: HeaderMap,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Form(form): Form<SubmitForm>,
) -> Result<Redirect, AppError> {
    let user_id = read_user_id(&headers).ok_or(AppError::BadRequest("Invalid form submission."))?;

    let (code, flags, author_str) = match (form.code, form.flags, form.author) {
        (Some(c), Some(f), Some(a)) => (c, f, a),
        _ => return Err(AppError::BadRequest("Invalid form submission.")),
    };
    let author = Author::parse(&author_str).ok_or(AppError::BadRequest("Invalid form submission."))?;

    match admit(&code, &flags, &state.task) {
        Admission::RejectedCode => return Err(AppError::RejectedCode),
        Admission::RejectedFlags => return Err(AppError::RejectedFlags),
        Admission::Accepted => {}
    }

    let guard = state.pipeline.acquire().await;
    let id = guard.id.clone();

    tracing::info!(task = %state.task.name, id = %id, user_id = %user_id, "submission accepted");

    let outcome = state
        .runner
        .run(
            &state.store,
            &RunRequest {
                task: &state.task.name,
                user_id: &user_id,
                id: &id,
                code: &code,
                flags: &flags,
                symbol: &state.task.symbol,
                author,
                client_ip: &addr.ip().to_string(),
                benchmark_source: &state.task.benchmark_path,
            },
        )
        .await?;

    if outcome.status.correctness_passed() {
        state
            .leaderboard
            .insert(LeaderboardEntry {
                task: state.task.name.clone(),
                user_id: user_id.clone(),
                submission_id: id.clone(),
                best_time: outcome.best_time,
                cycles_per_call: outcome.cycles_per_call,
                author,
            })
            .await;
    }

    Ok(Redirect::to(&format!("/view_submission?id={id}")))
}
