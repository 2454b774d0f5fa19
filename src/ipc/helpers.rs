use serde_json::json;

use crate::calc;
use crate::store::{Draft, Student};

/// Wire view of a committed student: the stored record plus its derived
/// aggregates, computed fresh for every response.
pub fn student_view(student: &Student) -> serde_json::Value {
    let summary = calc::summarize(student);
    json!({
        "id": student.id,
        "name": student.name,
        "subjects": student.subjects,
        "totalMarks": summary.total_marks,
        "averagePercentage": summary.average_percentage,
        "passed": summary.passed,
    })
}

pub fn draft_view(draft: &Draft) -> serde_json::Value {
    serde_json::to_value(draft).unwrap_or_else(|_| json!({}))
}
