use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{draft_view, student_view};
use crate::ipc::types::{AppState, Request};
use crate::store::{self, StoreError, SubjectField};
use serde_json::json;

fn store_err(id: &str, e: StoreError) -> serde_json::Value {
    err(id, e.code(), e.to_string(), e.details())
}

fn handle_get(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(&req.id, json!({ "draft": draft_view(&state.draft) }))
}

fn handle_set_name(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(name) = req.params.get("name").and_then(|v| v.as_str()) else {
        return err(&req.id, "bad_params", "missing params.name", None);
    };
    state.draft.set_name(name);
    ok(&req.id, json!({ "draft": draft_view(&state.draft) }))
}

fn handle_set_subject_field(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(index) = req.params.get("index").and_then(|v| v.as_u64()) else {
        return err(&req.id, "bad_params", "missing params.index", None);
    };
    let field = match req.params.get("field").and_then(|v| v.as_str()) {
        Some(f) => match SubjectField::parse(f) {
            Some(field) => field,
            None => {
                return err(
                    &req.id,
                    "bad_params",
                    "field must be one of: subject, marks",
                    Some(json!({ "field": f })),
                )
            }
        },
        None => return err(&req.id, "bad_params", "missing params.field", None),
    };
    // Marks arrive as whatever the input widget holds; numbers are taken
    // verbatim as text.
    let value = match req.params.get("value") {
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(serde_json::Value::Number(n)) => n.to_string(),
        _ => return err(&req.id, "bad_params", "missing params.value", None),
    };

    match state.draft.set_subject_field(index as usize, field, &value) {
        Ok(()) => ok(&req.id, json!({ "draft": draft_view(&state.draft) })),
        Err(e) => store_err(&req.id, e),
    }
}

fn handle_add_subject_row(state: &mut AppState, req: &Request) -> serde_json::Value {
    state.draft.add_subject_row();
    ok(&req.id, json!({ "draft": draft_view(&state.draft) }))
}

fn handle_remove_subject_row(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(index) = req.params.get("index").and_then(|v| v.as_u64()) else {
        return err(&req.id, "bad_params", "missing params.index", None);
    };
    match state.draft.remove_subject_row(index as usize) {
        Ok(()) => ok(&req.id, json!({ "draft": draft_view(&state.draft) })),
        Err(e) => store_err(&req.id, e),
    }
}

fn handle_reset(state: &mut AppState, req: &Request) -> serde_json::Value {
    state.draft.reset();
    ok(&req.id, json!({ "draft": draft_view(&state.draft) }))
}

fn handle_submit(state: &mut AppState, req: &Request) -> serde_json::Value {
    match store::submit(&mut state.roster, &mut state.draft) {
        Ok(student) => {
            tracing::debug!(id = %student.id, name = %student.name, "draft committed");
            ok(&req.id, json!({ "student": student_view(&student) }))
        }
        Err(e) => store_err(&req.id, e),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "draft.get" => Some(handle_get(state, req)),
        "draft.setName" => Some(handle_set_name(state, req)),
        "draft.setSubjectField" => Some(handle_set_subject_field(state, req)),
        "draft.addSubjectRow" => Some(handle_add_subject_row(state, req)),
        "draft.removeSubjectRow" => Some(handle_remove_subject_row(state, req)),
        "draft.reset" => Some(handle_reset(state, req)),
        "draft.submit" => Some(handle_submit(state, req)),
        _ => None,
    }
}
