use serde::Serialize;

use crate::store::Student;

/// A student passes when the average percentage reaches this mark.
pub const PASS_THRESHOLD: f64 = 35.0;

/// 2-decimal display rounding for averages.
pub fn round_off_2_decimals(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentSummary {
    pub total_marks: i64,
    pub average_percentage: f64,
    pub passed: bool,
}

pub fn total_marks(student: &Student) -> i64 {
    student.subjects.iter().map(|s| s.marks).sum()
}

/// Marks are out of 100, so the per-subject mean is already a percentage.
pub fn average_percentage(student: &Student) -> f64 {
    let n = student.subjects.len();
    if n == 0 {
        return 0.0;
    }
    total_marks(student) as f64 / n as f64
}

pub fn passed(student: &Student) -> bool {
    average_percentage(student) >= PASS_THRESHOLD
}

/// Derived per-student view, recomputed on demand; nothing is cached.
/// Pass/fail is decided on the raw average, the reported average is rounded
/// for display.
pub fn summarize(student: &Student) -> StudentSummary {
    let avg = average_percentage(student);
    StudentSummary {
        total_marks: total_marks(student),
        average_percentage: round_off_2_decimals(avg),
        passed: avg >= PASS_THRESHOLD,
    }
}

/// Case-insensitive substring filter over student names. The query is
/// lowered once; an empty query keeps the full roster in order.
pub fn filter_roster<'a>(students: &'a [Student], query: &str) -> Vec<&'a Student> {
    let q = query.to_lowercase();
    students
        .iter()
        .filter(|s| s.name.to_lowercase().contains(&q))
        .collect()
}
