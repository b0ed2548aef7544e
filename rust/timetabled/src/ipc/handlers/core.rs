use crate::db;
use crate::ipc::error::{err, ok};
use crate::ipc::handlers::viewer::view_json;
use crate::ipc::types::{AppState, Request};
use crate::setup;
use crate::viewer::Viewer;
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

fn handle_health(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(
        &req.id,
        json!({
            "version": env!("CARGO_PKG_VERSION"),
            "workspacePath": state.workspace.as_ref().map(|p| p.to_string_lossy().to_string())
        }),
    )
}

/// Open the workspace database and run the viewer's startup sequence.
pub fn open_workspace(state: &mut AppState, path: &Path) -> anyhow::Result<()> {
    let conn = db::open_db(path)?;
    // Unreadable settings must not keep the viewer from opening.
    let settings = match setup::load_viewer_settings(&conn) {
        Ok(s) => s,
        Err(e) => {
            warn!(error = %e, "viewer settings unreadable, using defaults");
            setup::ViewerSettings::default()
        }
    };

    let mut viewer = Viewer::new(settings);
    viewer.startup(&conn);
    info!(workspace = %path.display(), "workspace opened");

    state.workspace = Some(path.to_path_buf());
    state.db = Some(conn);
    state.viewer = Some(viewer);
    Ok(())
}

fn handle_workspace_select(state: &mut AppState, req: &Request) -> serde_json::Value {
    let p = req
        .params
        .get("path")
        .and_then(|v| v.as_str())
        .map(PathBuf::from);
    let Some(path) = p else {
        return err(&req.id, "bad_params", "missing params.path", None);
    };

    if let Err(e) = open_workspace(state, &path) {
        return err(&req.id, "db_open_failed", format!("{e:?}"), None);
    }
    let view = state.viewer.as_ref().map(view_json);
    ok(
        &req.id,
        json!({
            "workspacePath": path.to_string_lossy(),
            "view": view
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "health" => Some(handle_health(state, req)),
        "workspace.select" => Some(handle_workspace_select(state, req)),
        _ => None,
    }
}
