use crate::grid::{Cell, Grid};
use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request};
use crate::model::{Day, Student};
use crate::setup::ViewerSettings;
use crate::store::LoadedSnapshot;
use crate::viewer::{Trigger, Viewer};
use serde_json::{json, Value};

fn student_json(s: &Student) -> Value {
    json!({
        "id": s.id.to_string(),
        "name": s.name.to_string(),
        "spec": s.spec.to_string(),
        "section": s.section.to_string(),
    })
}

fn cell_json(day: Day, cell: &Cell, settings: &ViewerSettings) -> Value {
    match cell {
        Cell::Placeholder => json!({
            "day": day,
            "occupied": false,
            "course": null,
            "instructor": null,
            "time": null,
            "text": settings.placeholder_text,
            "background": null,
        }),
        Cell::Session(s) => json!({
            "day": day,
            "occupied": true,
            "course": s.course,
            "instructor": s.instructor,
            "time": s.time,
            "text": s.summary(),
            "background": settings.highlight_color,
        }),
    }
}

fn grid_json(grid: &Grid, settings: &ViewerSettings) -> Value {
    let mut rows: Vec<Value> = Vec::new();
    let mut cells: Vec<Value> = Vec::new();
    let mut current_slot = None;
    for (slot, day, cell) in grid.cells() {
        if current_slot != Some(slot) {
            if let Some(prev) = current_slot.replace(slot) {
                rows.push(row_json(prev.get(), std::mem::take(&mut cells), settings));
            }
        }
        cells.push(cell_json(day, cell, settings));
    }
    if let Some(last) = current_slot {
        rows.push(row_json(last.get(), cells, settings));
    }

    json!({
        "visible": grid.is_visible(),
        "columns": Day::ALL.iter().map(|d| d.name()).collect::<Vec<_>>(),
        "rows": rows,
        "occupiedCount": grid.occupied_count(),
    })
}

fn row_json(slot: u8, cells: Vec<Value>, settings: &ViewerSettings) -> Value {
    json!({
        "slot": slot,
        "label": settings.lecture_label(slot),
        "cells": cells,
    })
}

fn snapshot_json(loaded: &LoadedSnapshot) -> Value {
    json!({
        "students": loaded.snapshot.students.len(),
        "entries": loaded.snapshot.schedule.len(),
        "digest": loaded.digest,
        "loadedAt": loaded.loaded_at.to_rfc3339(),
    })
}

pub fn view_json(viewer: &Viewer) -> Value {
    json!({
        "status": viewer.status(),
        "student": viewer.student().map(student_json),
        "grid": grid_json(viewer.grid(), viewer.settings()),
        "snapshot": viewer.loaded().map(snapshot_json),
    })
}

fn handle_state(state: &mut AppState, req: &Request) -> Value {
    let Some(viewer) = state.viewer.as_ref() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };
    ok(&req.id, view_json(viewer))
}

fn handle_search(state: &mut AppState, req: &Request) -> Value {
    let (Some(conn), Some(viewer)) = (state.db.as_ref(), state.viewer.as_mut()) else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };
    // Blank input is a user-facing outcome, not a transport error.
    let input = match req.params.get("studentId") {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(_) => {
            return err(
                &req.id,
                "bad_params",
                "studentId must be a string or number",
                None,
            )
        }
    };
    let trigger = match req.params.get("trigger").and_then(|v| v.as_str()) {
        None => Trigger::Button,
        Some(raw) => match Trigger::parse(raw) {
            Some(t) => t,
            None => {
                return err(
                    &req.id,
                    "bad_params",
                    "trigger must be one of: button, enter",
                    None,
                )
            }
        },
    };

    viewer.search(conn, &input, trigger);
    ok(&req.id, view_json(viewer))
}

fn handle_help(state: &mut AppState, req: &Request) -> Value {
    let Some(viewer) = state.viewer.as_mut() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };
    viewer.help();
    ok(&req.id, view_json(viewer))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<Value> {
    match req.method.as_str() {
        "viewer.state" => Some(handle_state(state, req)),
        "viewer.search" => Some(handle_search(state, req)),
        "viewer.help" => Some(handle_help(state, req)),
        _ => None,
    }
}
