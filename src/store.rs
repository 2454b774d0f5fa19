use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

pub const MARKS_MIN: i64 = 0;
pub const MARKS_MAX: i64 = 100;

/// A committed subject/marks pair. Marks are validated once, at submit;
/// downstream aggregation trusts the range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectScore {
    pub subject: String,
    pub marks: i64,
}

/// A committed roster entry. Ids are minted at submit time and are the only
/// addressing scheme for edit/delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    pub name: String,
    pub subjects: Vec<SubjectScore>,
}

/// One form row as typed. Marks stay raw text until submit so the draft can
/// hold whatever is currently in the input widget.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftSubject {
    pub subject: String,
    pub marks: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubjectField {
    Subject,
    Marks,
}

impl SubjectField {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "subject" => Some(SubjectField::Subject),
            "marks" => Some(SubjectField::Marks),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("subject row {row} out of range (draft has {len} rows)")]
    RowOutOfRange { row: usize, len: usize },
    #[error("student name is required")]
    NameRequired,
    #[error("at least one subject row is required")]
    SubjectsRequired,
    #[error("subject name is required in row {row}")]
    SubjectNameRequired { row: usize },
    #[error("marks in row {row} are not an integer")]
    MarksNotNumeric { row: usize, text: String },
    #[error("marks in row {row} must be between 0 and 100")]
    MarksOutOfRange { row: usize, value: i64 },
    #[error("student being edited no longer exists")]
    EditTargetMissing { id: String },
}

impl StoreError {
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::RowOutOfRange { .. } => "bad_params",
            StoreError::EditTargetMissing { .. } => "not_found",
            _ => "invalid_draft",
        }
    }

    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            StoreError::RowOutOfRange { row, len } => Some(json!({ "row": row, "rows": len })),
            StoreError::NameRequired | StoreError::SubjectsRequired => None,
            StoreError::SubjectNameRequired { row } => Some(json!({ "row": row })),
            StoreError::MarksNotNumeric { row, text } => {
                Some(json!({ "row": row, "text": text }))
            }
            StoreError::MarksOutOfRange { row, value } => {
                Some(json!({ "row": row, "value": value }))
            }
            StoreError::EditTargetMissing { id } => Some(json!({ "studentId": id })),
        }
    }
}

/// The in-progress form: name plus subject rows, and the id of the student
/// being edited (None means submit appends).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Draft {
    pub name: String,
    pub subjects: Vec<DraftSubject>,
    pub editing: Option<String>,
}

impl Default for Draft {
    fn default() -> Self {
        Self::new()
    }
}

impl Draft {
    /// A fresh draft always starts with one empty subject row.
    pub fn new() -> Self {
        Draft {
            name: String::new(),
            subjects: vec![DraftSubject::default()],
            editing: None,
        }
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_subject_field(
        &mut self,
        row: usize,
        field: SubjectField,
        value: &str,
    ) -> Result<(), StoreError> {
        let len = self.subjects.len();
        let slot = self
            .subjects
            .get_mut(row)
            .ok_or(StoreError::RowOutOfRange { row, len })?;
        match field {
            SubjectField::Subject => slot.subject = value.to_string(),
            SubjectField::Marks => slot.marks = value.to_string(),
        }
        Ok(())
    }

    pub fn add_subject_row(&mut self) {
        self.subjects.push(DraftSubject::default());
    }

    /// No last-row guard: the draft may transiently hold zero rows, and
    /// submit rejects it then.
    pub fn remove_subject_row(&mut self, row: usize) -> Result<(), StoreError> {
        let len = self.subjects.len();
        if row >= len {
            return Err(StoreError::RowOutOfRange { row, len });
        }
        self.subjects.remove(row);
        Ok(())
    }

    pub fn reset(&mut self) {
        *self = Draft::new();
    }

    /// Copy a committed student into the form by value. Marks are rendered
    /// back to text; later edits touch only the draft until submit.
    pub fn load(&mut self, student: &Student) {
        self.name = student.name.clone();
        self.subjects = student
            .subjects
            .iter()
            .map(|s| DraftSubject {
                subject: s.subject.clone(),
                marks: s.marks.to_string(),
            })
            .collect();
        self.editing = Some(student.id.clone());
    }

    /// The explicit rendition of the form's native `required`/`min`/`max`
    /// checks. First violation wins, matching how a form blocks on the first
    /// invalid field.
    pub fn validate(&self) -> Result<(String, Vec<SubjectScore>), StoreError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(StoreError::NameRequired);
        }
        if self.subjects.is_empty() {
            return Err(StoreError::SubjectsRequired);
        }
        let mut subjects = Vec::with_capacity(self.subjects.len());
        for (row, s) in self.subjects.iter().enumerate() {
            let subject = s.subject.trim();
            if subject.is_empty() {
                return Err(StoreError::SubjectNameRequired { row });
            }
            let marks: i64 =
                s.marks
                    .trim()
                    .parse()
                    .map_err(|_| StoreError::MarksNotNumeric {
                        row,
                        text: s.marks.clone(),
                    })?;
            if !(MARKS_MIN..=MARKS_MAX).contains(&marks) {
                return Err(StoreError::MarksOutOfRange { row, value: marks });
            }
            subjects.push(SubjectScore {
                subject: subject.to_string(),
                marks,
            });
        }
        Ok((name.to_string(), subjects))
    }
}

/// Ordered roster of committed students. Insertion order is significant and
/// survives deletes.
#[derive(Debug, Default)]
pub struct RosterStore {
    students: Vec<Student>,
}

impl RosterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn get(&self, id: &str) -> Option<&Student> {
        self.students.iter().find(|s| s.id == id)
    }

    pub fn append(&mut self, name: String, subjects: Vec<SubjectScore>) -> Student {
        let student = Student {
            id: Uuid::new_v4().to_string(),
            name,
            subjects,
        };
        self.students.push(student.clone());
        student
    }

    /// Wholesale replacement at the student's current position; the id is
    /// kept so callers holding it stay valid.
    pub fn replace(
        &mut self,
        id: &str,
        name: String,
        subjects: Vec<SubjectScore>,
    ) -> Option<Student> {
        let slot = self.students.iter_mut().find(|s| s.id == id)?;
        slot.name = name;
        slot.subjects = subjects;
        Some(slot.clone())
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.students.len();
        self.students.retain(|s| s.id != id);
        self.students.len() != before
    }
}

/// Commit the draft: replace the edited student in place, or append a new
/// one. The draft resets only on success; a rejected draft stays editable.
pub fn submit(roster: &mut RosterStore, draft: &mut Draft) -> Result<Student, StoreError> {
    let (name, subjects) = draft.validate()?;
    let committed = match draft.editing.clone() {
        Some(id) => roster
            .replace(&id, name, subjects)
            .ok_or(StoreError::EditTargetMissing { id })?,
        None => roster.append(name, subjects),
    };
    draft.reset();
    Ok(committed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_draft(name: &str, rows: &[(&str, &str)]) -> Draft {
        let mut d = Draft::new();
        d.set_name(name);
        d.subjects = rows
            .iter()
            .map(|(subject, marks)| DraftSubject {
                subject: subject.to_string(),
                marks: marks.to_string(),
            })
            .collect();
        d
    }

    #[test]
    fn fresh_draft_has_one_empty_row() {
        let d = Draft::new();
        assert_eq!(d.name, "");
        assert_eq!(d.subjects, vec![DraftSubject::default()]);
        assert_eq!(d.editing, None);
    }

    #[test]
    fn add_then_remove_last_row_round_trips() {
        let mut d = filled_draft("Ann", &[("Math", "80")]);
        let before = d.subjects.clone();
        d.add_subject_row();
        d.remove_subject_row(d.subjects.len() - 1).expect("in range");
        assert_eq!(d.subjects, before);
    }

    #[test]
    fn removing_the_only_row_is_allowed() {
        let mut d = Draft::new();
        d.remove_subject_row(0).expect("in range");
        assert!(d.subjects.is_empty());
        assert_eq!(d.validate(), Err(StoreError::NameRequired));
        d.set_name("Ann");
        assert_eq!(d.validate(), Err(StoreError::SubjectsRequired));
    }

    #[test]
    fn set_subject_field_out_of_range() {
        let mut d = Draft::new();
        let err = d
            .set_subject_field(3, SubjectField::Marks, "50")
            .expect_err("row 3 does not exist");
        assert_eq!(err, StoreError::RowOutOfRange { row: 3, len: 1 });
        assert_eq!(err.code(), "bad_params");
    }

    #[test]
    fn validate_rejects_non_numeric_and_out_of_range_marks() {
        let d = filled_draft("Ann", &[("Math", "eighty")]);
        let err = d.validate().expect_err("non-numeric marks");
        assert_eq!(
            err,
            StoreError::MarksNotNumeric {
                row: 0,
                text: "eighty".to_string()
            }
        );
        assert_eq!(err.code(), "invalid_draft");

        let d = filled_draft("Ann", &[("Math", "80"), ("Sci", "101")]);
        assert_eq!(
            d.validate().expect_err("out of range"),
            StoreError::MarksOutOfRange { row: 1, value: 101 }
        );

        let d = filled_draft("Ann", &[("Math", "-1")]);
        assert_eq!(
            d.validate().expect_err("out of range"),
            StoreError::MarksOutOfRange { row: 0, value: -1 }
        );
    }

    #[test]
    fn validate_requires_subject_names() {
        let d = filled_draft("Ann", &[("Math", "80"), ("  ", "60")]);
        assert_eq!(
            d.validate().expect_err("blank subject"),
            StoreError::SubjectNameRequired { row: 1 }
        );
    }

    #[test]
    fn submit_appends_and_resets_draft() {
        let mut roster = RosterStore::new();
        let mut d = filled_draft("Ann", &[("Math", "80"), ("Sci", "60")]);
        let student = submit(&mut roster, &mut d).expect("valid draft");

        assert_eq!(roster.len(), 1);
        assert_eq!(student.name, "Ann");
        assert_eq!(
            student.subjects,
            vec![
                SubjectScore {
                    subject: "Math".to_string(),
                    marks: 80
                },
                SubjectScore {
                    subject: "Sci".to_string(),
                    marks: 60
                },
            ]
        );
        assert_eq!(roster.students()[0], student);
        assert_eq!(d, Draft::new());
    }

    #[test]
    fn rejected_submit_leaves_draft_and_roster_untouched() {
        let mut roster = RosterStore::new();
        let mut d = filled_draft("Ann", &[("Math", "NaN")]);
        let before = d.clone();
        assert!(submit(&mut roster, &mut d).is_err());
        assert_eq!(d, before);
        assert!(roster.is_empty());
    }

    #[test]
    fn submit_in_edit_mode_replaces_in_place() {
        let mut roster = RosterStore::new();
        let mut d = filled_draft("Ann", &[("Math", "80")]);
        submit(&mut roster, &mut d).expect("seed ann");
        let mut d = filled_draft("Bo", &[("Art", "20")]);
        submit(&mut roster, &mut d).expect("seed bo");

        let ann_id = roster.students()[0].id.clone();
        let mut d = Draft::new();
        d.load(&roster.students()[0]);
        assert_eq!(d.editing.as_deref(), Some(ann_id.as_str()));
        assert_eq!(d.subjects[0].marks, "80");

        d.set_subject_field(0, SubjectField::Marks, "95")
            .expect("row 0 exists");
        let replaced = submit(&mut roster, &mut d).expect("valid edit");

        assert_eq!(roster.len(), 2);
        assert_eq!(replaced.id, ann_id);
        assert_eq!(roster.students()[0].subjects[0].marks, 95);
        assert_eq!(roster.students()[1].name, "Bo");
        assert_eq!(d.editing, None);
    }

    #[test]
    fn submit_after_edit_target_deleted_reports_not_found() {
        let mut roster = RosterStore::new();
        let mut d = filled_draft("Ann", &[("Math", "80")]);
        submit(&mut roster, &mut d).expect("seed ann");

        let ann_id = roster.students()[0].id.clone();
        let mut d = Draft::new();
        d.load(&roster.students()[0]);
        assert!(roster.remove(&ann_id));

        let err = submit(&mut roster, &mut d).expect_err("edit target gone");
        assert_eq!(err, StoreError::EditTargetMissing { id: ann_id });
        assert_eq!(err.code(), "not_found");
        // The typed draft is not lost.
        assert_eq!(d.name, "Ann");
    }

    #[test]
    fn remove_preserves_relative_order() {
        let mut roster = RosterStore::new();
        for name in ["Ann", "Bo", "Cid"] {
            let mut d = filled_draft(name, &[("Math", "50")]);
            submit(&mut roster, &mut d).expect("seed");
        }
        let bo_id = roster.students()[1].id.clone();
        assert!(roster.remove(&bo_id));
        assert!(!roster.remove(&bo_id));

        let names: Vec<&str> = roster.students().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Ann", "Cid"]);
    }

    #[test]
    fn marks_text_is_trimmed_before_parsing() {
        let d = filled_draft("Ann", &[("Math", " 80 ")]);
        let (_, subjects) = d.validate().expect("padded integer");
        assert_eq!(subjects[0].marks, 80);
    }
}
