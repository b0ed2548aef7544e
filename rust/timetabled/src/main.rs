mod db;
mod grid;
mod ipc;
mod locator;
mod model;
mod setup;
mod status;
mod store;
mod viewer;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const WORKSPACE_ENV: &str = "TIMETABLED_WORKSPACE";

fn main() {
    // stdout carries IPC responses, so logs go to stderr.
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), "timetabled starting");

    let mut state = ipc::AppState::default();
    if let Some(path) = std::env::var_os(WORKSPACE_ENV).map(PathBuf::from) {
        if let Err(e) = ipc::open_workspace(&mut state, &path) {
            error!(workspace = %path.display(), error = ?e, "failed to open workspace from environment");
        }
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(v) => v,
            Err(_) => break,
        };
        if line.trim().is_empty() {
            continue;
        }

        let resp = match serde_json::from_str::<ipc::Request>(&line) {
            Ok(req) => ipc::handle_request(&mut state, req),
            // Can't reply with an id.
            Err(e) => ipc::bad_json(e.to_string()),
        };
        let _ = writeln!(
            stdout,
            "{}",
            serde_json::to_string(&resp).unwrap_or_else(|_| "{\"ok\":false}".to_string())
        );
        let _ = stdout.flush();
    }

    info!("stdin closed, shutting down");
}
