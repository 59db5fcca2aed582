//! benchforge-server
//!
//! Classroom performance-competition service: an admission gate, a
//! build-and-measure pipeline, and a leaderboard, served over HTTP (axum).

use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use benchforge_core::{load_task, Leaderboard, Runner, SubmissionStore};

use benchforge_server::router::build_router;
use benchforge_server::{AppState, Pipeline};

/// Classroom performance-competition service.
#[derive(Parser)]
#[command(name = "benchforge", about = "Classroom performance-competition service")]
struct Cli {
    /// Name of the task directory under `tasks/` to run this server for.
    task: String,

    /// Address to bind the HTTP server on.
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Port to bind the HTTP server on.
    #[arg(long, default_value_t = 5000)]
    port: u16,

    /// Enable public read mode: every leaderboard row is linkable and
    /// `/view_submission` is visible to anyone.
    #[arg(short = 'P', long)]
    public: bool,

    /// Force a leaderboard projection rebuild from the submission store at
    /// startup, ignoring any persisted projection records.
    #[arg(short = 'R', long = "regenerate-leaderboard")]
    regenerate_leaderboard: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "benchforge_server=info,tower_http=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let tasks_root = PathBuf::from("tasks");
    let task = match load_task(&tasks_root, &cli.task) {
        Ok(task) => task,
        Err(err) => {
            tracing::error!(task = %cli.task, error = %err, "failed to load task");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(task = %task.name, symbol = %task.symbol, "task loaded");

    let store = Arc::new(SubmissionStore::new(PathBuf::from("submissions").join(&task.name)));
    let leaderboard = Arc::new(Leaderboard::new(PathBuf::from("leaderboard").join(&task.name)));
    let runner = Arc::new(Runner::new(
        std::fs::canonicalize("runtime/compile.sh").unwrap_or_else(|_| PathBuf::from("runtime/compile.sh")),
    ));

    if cli.regenerate_leaderboard {
        tracing::info!("regenerating leaderboard from submission store");
        if let Err(err) = leaderboard.rebuild_from_store(&store, &task.name).await {
            tracing::error!(error = %err, "failed to rebuild leaderboard from store");
        }
    } else if let Err(err) = leaderboard.rebuild_from_projection(&task.name).await {
        tracing::warn!(error = %err, "failed to rebuild leaderboard from projection, falling back to store scan");
        if let Err(err) = leaderboard.rebuild_from_store(&store, &task.name).await {
            tracing::error!(error = %err, "failed to rebuild leaderboard from store");
        }
    }

    let state = AppState {
        task: Arc::new(task),
        store,
        runner,
        leaderboard,
        pipeline: Arc::new(Pipeline::new()),
        public_mode: cli.public,
        templates_dir: PathBuf::from("runtime/templates"),
    };

    let app = build_router(state);

    let addr: SocketAddr = match format!("{}:{}", cli.host, cli.port).parse() {
        Ok(addr) => addr,
        Err(err) => {
            tracing::error!(host = %cli.host, port = cli.port, error = %err, "invalid host/port");
            return ExitCode::FAILURE;
        }
    };

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!(%addr, error = %err, "failed to bind listener");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(%addr, task = %cli.task, public = cli.public, "server listening");

    let result = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await;

    if let Err(err) = result {
        tracing::error!(error = %err, "server exited with error");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
