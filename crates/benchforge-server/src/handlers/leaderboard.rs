//! `GET /` and `GET /leaderboard` (spec.md §4.F).

use axum::extract::State;
use axum::http::{header, HeaderMap};
use axum::response::{Html, IntoResponse, Response};

use benchforge_core::identity;

use crate::cookie::{read_user_id, set_user_id_header};
use crate::state::AppState;
use crate::templates;

pub async fn leaderboard(State(state): State<AppState>, headers: HeaderMap) -> Result<Response, crate::error::AppError> {
    let (user_id, issue_cookie) = match read_user_id(&headers) {
        Some(id) => (id, false),
        None => (identity::generate_user_id(), true),
    };

    let rows = state
        .leaderboard
        .list_for_display(&state.task.name, &user_id, state.public_mode)
        .await;

    let rows_html = rows
        .iter()
        .map(|row| render_row(row, &state.task.name, &user_id))
        .collect::<String>();

    let template = tokio::fs::read_to_string(state.templates_dir.join("leaderboard.html"))
        .await
        .map_err(|e| crate::error::AppError::Internal(e.to_string()))?;
    let html = templates::render_leaderboard(&template, &state.task.name, &rows_html);

    let mut response = Html(html).into_response();
    if issue_cookie {
        response
            .headers_mut()
            .insert(header::SET_COOKIE, set_user_id_header(&user_id));
    }
    Ok(response)
}

fn render_row(row: &benchforge_core::LeaderboardRow, task: &str, viewer_user_id: &str) -> String {
    let name = identity::display_name(&row.entry.user_id, task);
    let (r, g, b) = identity::row_color(&row.entry.user_id, task);
    let id_cell = if row.linkable {
        format!(
            "<a href=\"/view_submission?id={id}\">{id}</a>",
            id = row.entry.submission_id
        )
    } else {
        "—".to_string()
    };
    let rank_cell = row
        .user_rank
        .map(|r| r.to_string())
        .unwrap_or_default();
    let is_viewer = row.entry.user_id == viewer_user_id;
    let row_class = if is_viewer { "own-row" } else { "" };

    format!(
        "<tr class=\"{row_class}\" style=\"background-color: rgb({r},{g},{b}); {highlight}\">\
<td>{rank}</td><td>{rank_cell}</td><td>{name}</td><td>{time:.6}</td><td>{cycles:.2}</td><td>{author}</td><td>{id_cell}</td>\
</tr>",
        highlight = if is_viewer { "outline: 2px solid #333;" } else { "" },
        rank = row.rank + 1,
        time = row.entry.best_time,
        cycles = row.entry.cycles_per_call,
        author = row.entry.author.as_str(),
    )
}
