use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request};
use crate::setup;
use serde_json::json;

fn handle_setup_get(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(conn) = state.db.as_ref() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };
    let viewer = match setup::load_viewer_settings(conn) {
        Ok(v) => v,
        Err(e) => return err(&req.id, "db_query_failed", e.to_string(), None),
    };
    ok(&req.id, json!({ "viewer": viewer.to_json() }))
}

fn handle_setup_update(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(conn) = state.db.as_ref() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };
    let Some(section) = req.params.get("section").and_then(|v| v.as_str()) else {
        return err(&req.id, "bad_params", "missing section", None);
    };
    if section != "viewer" {
        return err(&req.id, "bad_params", "unknown section", None);
    }
    let Some(patch_obj) = req.params.get("patch").and_then(|v| v.as_object()) else {
        return err(&req.id, "bad_params", "patch must be an object", None);
    };

    let mut current = match setup::load_viewer_settings(conn) {
        Ok(v) => v,
        Err(e) => return err(&req.id, "db_query_failed", e.to_string(), None),
    };
    if let Err(msg) = current.merge_patch(patch_obj) {
        return err(&req.id, "bad_params", msg, None);
    }
    if let Err(e) = setup::save_viewer_settings(conn, &current) {
        return err(&req.id, "db_update_failed", e.to_string(), None);
    }
    // Takes effect from the next load; the grid on screen is left as is.
    if let Some(viewer) = state.viewer.as_mut() {
        viewer.set_settings(current);
    }
    ok(&req.id, json!({ "ok": true }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "setup.get" => Some(handle_setup_get(state, req)),
        "setup.update" => Some(handle_setup_update(state, req)),
        _ => None,
    }
}
