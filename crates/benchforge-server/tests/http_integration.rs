//! Router-level integration tests exercising the end-to-end scenarios.
//!
//! Drives the real `Router` with `tower::ServiceExt::oneshot`, bypassing the
//! network — the same pattern used for the authoring HTTP surface elsewhere
//! in the corpus.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::ConnectInfo;
use http_body_util::BodyExt;
use hyper::{Request, StatusCode};
use tower::ServiceExt;

use benchforge_core::{Leaderboard, Runner, SubmissionStore, TaskSpec};
use benchforge_server::router::build_router;
use benchforge_server::{AppState, Pipeline};

const TEST_ADDR: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)), 9999);

fn write_templates(dir: &Path) {
    std::fs::write(
        dir.join("leaderboard.html"),
        "<h1>${TASK}</h1><table>${LEADERBOARD_ROWS}</table>",
    )
    .unwrap();
    std::fs::write(
        dir.join("submission_result.html"),
        "${TASK}/${USER_ID}/${SUBMISSION_ID}/${COMPILER_FLAGS}/${COMPILE_STATUS}/\
${CORRECTNESS_TEST}/${BENCHMARK_BEST_TIME}/${BENCHMARK_CYCLES_PER_CALL}/${AI_GENERATED}/\
${INPUT_CODE}/${COMPILER_OUTPUT}/${DISASSEMBLY}/${DISASSEMBLY_WITH_SOURCE}/${BENCHMARK_OUTPUT}",
    )
    .unwrap();
}

fn write_script(dir: &Path, body: &str) -> std::path::PathBuf {
    use std::io::Write;
    let path = dir.join("compile.sh");
    let mut f = std::fs::File::create(&path).unwrap();
    writeln!(f, "#!/bin/bash\n{body}").unwrap();
    path
}

fn test_state(tmp: &Path, compile_script_body: &str, public_mode: bool) -> AppState {
    let bench = tmp.join("benchmark.cpp");
    std::fs::write(&bench, "// harness").unwrap();

    let templates_dir = tmp.join("templates");
    std::fs::create_dir_all(&templates_dir).unwrap();
    write_templates(&templates_dir);

    let script = write_script(tmp, compile_script_body);

    let extra_denylist = vec![r"\batan\b".to_string(), "cmath".to_string()];
    let compiled_extra_denylist = extra_denylist
        .iter()
        .map(|p| regex::Regex::new(p).unwrap())
        .collect();
    let task = TaskSpec {
        name: "atan".to_string(),
        symbol: "student_atan".to_string(),
        benchmark_path: bench,
        extra_denylist,
        compiled_extra_denylist,
        max_error: 1e-6,
    };

    AppState {
        task: Arc::new(task),
        store: Arc::new(SubmissionStore::new(tmp.join("submissions"))),
        runner: Arc::new(Runner::new(script)),
        leaderboard: Arc::new(Leaderboard::new(tmp.join("leaderboard"))),
        pipeline: Arc::new(Pipeline::new()),
        public_mode,
        templates_dir,
    }
}

fn submit_request(body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/submit")
        .header("content-type", "application/x-www-form-urlencoded");
    if let Some(c) = cookie {
        builder = builder.header("cookie", format!("userId={c}"));
    }
    let mut req = builder.body(Body::from(body.to_string())).unwrap();
    req.extensions_mut().insert(ConnectInfo(TEST_ADDR));
    req
}

#[tokio::test]
async fn s1_accepted_submission_redirects_to_view_submission() {
    let tmp = tempfile::tempdir().unwrap();
    let state = test_state(tmp.path(), "dir=$1; echo '0.001 10.0' > \"$dir/best_time.txt\"; exit 0", true);
    let app = build_router(state);

    let body = "code=float+f%28float+x%2C+float+e%29%7Breturn+x%3B%7D&flags=-O2&author=Human";
    let response = app.oneshot(submit_request(body, Some("U1"))).await.unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let location = response.headers().get("location").unwrap().to_str().unwrap();
    assert!(location.starts_with("/view_submission?id="));
}

#[tokio::test]
async fn s2_denylisted_code_is_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    let state = test_state(tmp.path(), "exit 0", true);
    let app = build_router(state);

    let body = "code=void+f%28%29%7Bprintf%28%22hi%22%29%3B%7D&flags=-O2&author=Human";
    let response = app.oneshot(submit_request(body, Some("U1"))).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"Code does not comply with the rules!");
}

#[tokio::test]
async fn s3_denylisted_flags_are_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    let state = test_state(tmp.path(), "exit 0", true);
    let app = build_router(state);

    let body = "code=float+f%28float+x%29%7Breturn+x%3B%7D&flags=-O2+%3B+rm+-rf+%2F&author=Human";
    let response = app.oneshot(submit_request(body, Some("U1"))).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"Disallowed compiler flags.");
}

#[tokio::test]
async fn s4_invalid_author_is_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    let state = test_state(tmp.path(), "exit 0", true);
    let app = build_router(state);

    let body = "code=float+f%28float+x%29%7Breturn+x%3B%7D&flags=-O2&author=Alien";
    let response = app.oneshot(submit_request(body, Some("U1"))).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"Invalid form submission.");
}

#[tokio::test]
async fn submit_without_cookie_is_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    let state = test_state(tmp.path(), "exit 0", true);
    let app = build_router(state);

    let body = "code=float+f%28float+x%29%7Breturn+x%3B%7D&flags=-O2&author=Human";
    let response = app.oneshot(submit_request(body, None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn view_submission_enforces_ownership_unless_public() {
    let tmp = tempfile::tempdir().unwrap();
    let state = test_state(tmp.path(), "dir=$1; echo '0.001 10.0' > \"$dir/best_time.txt\"; exit 0", false);
    let app = build_router(state.clone());

    let body = "code=float+f%28float+x%2C+float+e%29%7Breturn+x%3B%7D&flags=-O2&author=Human";
    let response = app.clone().oneshot(submit_request(body, Some("U1"))).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let location = response.headers().get("location").unwrap().to_str().unwrap().to_string();

    let owner_req = Request::builder()
        .uri(&location)
        .header("cookie", "userId=U1")
        .body(Body::empty())
        .unwrap();
    let owner_response = app.clone().oneshot(owner_req).await.unwrap();
    assert_eq!(owner_response.status(), StatusCode::OK);

    let stranger_req = Request::builder()
        .uri(&location)
        .header("cookie", "userId=U2")
        .body(Body::empty())
        .unwrap();
    let stranger_response = app.oneshot(stranger_req).await.unwrap();
    assert_eq!(stranger_response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn view_submission_unknown_id_is_not_found() {
    let tmp = tempfile::tempdir().unwrap();
    let state = test_state(tmp.path(), "exit 0", true);
    let app = build_router(state);

    let req = Request::builder()
        .uri("/view_submission?id=9999-ffff")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn leaderboard_issues_cookie_on_first_visit() {
    let tmp = tempfile::tempdir().unwrap();
    let state = test_state(tmp.path(), "exit 0", true);
    let app = build_router(state);

    let req = Request::builder().uri("/leaderboard").body(Body::empty()).unwrap();
    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get("set-cookie").is_some());
}

#[tokio::test]
async fn s5_leaderboard_ranks_and_first_of_user_flags() {
    let tmp = tempfile::tempdir().unwrap();
    let state = test_state(tmp.path(), "exit 0", true);

    let submissions = [("U1", 1.0), ("U2", 1.5), ("U1", 2.0), ("U2", 3.0)];
    for (user, time) in submissions {
        state
            .leaderboard
            .insert(benchforge_core::LeaderboardEntry {
                task: "atan".to_string(),
                user_id: user.to_string(),
                submission_id: benchforge_core::SubmissionId(format!("{user}-{time}")),
                best_time: time,
                cycles_per_call: f64::INFINITY,
                author: benchforge_core::Author::Human,
            })
            .await;
    }

    let rows = state.leaderboard.list_for_display("atan", "U1", true).await;
    let user_ranks: Vec<_> = rows.iter().map(|r| r.user_rank).collect();
    assert_eq!(user_ranks, vec![Some(0), Some(1), None, None]);
}
