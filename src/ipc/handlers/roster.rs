use crate::calc;
use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{draft_view, student_view};
use crate::ipc::types::{AppState, Request};
use serde_json::json;

fn handle_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let query = req
        .params
        .get("query")
        .and_then(|v| v.as_str())
        .unwrap_or("");
    let matched: Vec<serde_json::Value> = calc::filter_roster(state.roster.students(), query)
        .into_iter()
        .map(student_view)
        .collect();
    ok(
        &req.id,
        json!({
            "students": matched,
            "total": state.roster.len(),
        }),
    )
}

fn handle_get(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(student_id) = req.params.get("studentId").and_then(|v| v.as_str()) else {
        return err(&req.id, "bad_params", "missing params.studentId", None);
    };
    match state.roster.get(student_id) {
        Some(student) => ok(&req.id, json!({ "student": student_view(student) })),
        None => err(
            &req.id,
            "not_found",
            "student not found",
            Some(json!({ "studentId": student_id })),
        ),
    }
}

fn handle_edit(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(student_id) = req.params.get("studentId").and_then(|v| v.as_str()) else {
        return err(&req.id, "bad_params", "missing params.studentId", None);
    };
    let Some(student) = state.roster.get(student_id) else {
        return err(
            &req.id,
            "not_found",
            "student not found",
            Some(json!({ "studentId": student_id })),
        );
    };
    state.draft.load(student);
    ok(&req.id, json!({ "draft": draft_view(&state.draft) }))
}

fn handle_delete(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(student_id) = req.params.get("studentId").and_then(|v| v.as_str()) else {
        return err(&req.id, "bad_params", "missing params.studentId", None);
    };
    if !state.roster.remove(student_id) {
        return err(
            &req.id,
            "not_found",
            "student not found",
            Some(json!({ "studentId": student_id })),
        );
    }
    // The deleted student may be the one under edit. Keep the typed text but
    // drop the marker so a later submit appends instead of chasing a ghost.
    if state.draft.editing.as_deref() == Some(student_id) {
        state.draft.editing = None;
    }
    tracing::debug!(id = %student_id, "student deleted");
    ok(&req.id, json!({ "deleted": true }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "roster.list" => Some(handle_list(state, req)),
        "roster.get" => Some(handle_get(state, req)),
        "roster.edit" => Some(handle_edit(state, req)),
        "roster.delete" => Some(handle_delete(state, req)),
        _ => None,
    }
}
