use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const COLUMN_COUNT: usize = 15;

/// Worksheet header row, in column order.
pub const HEADERS: [&str; COLUMN_COUNT] = [
    "Question",
    "Answer",
    "Category",
    "Difficulty",
    "Type",
    "Author Name",
    "Option A",
    "Option B",
    "Option C",
    "Option D",
    "Correct Answer",
    "Context",
    "Troubleshoot Step",
    "Root Cause",
    "Things to Avoid",
];

pub const TYPE_HEADER: &str = HEADERS[4];

/// One positional row, exactly as appended to the store.
pub type QuestionRow = [String; COLUMN_COUNT];

/// A row as read back from the store, keyed by header name.
pub type StoredRow = BTreeMap<String, String>;

/// A normalized question submission. Fields unused by its kind stay empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub question: String,
    pub answer: String,
    pub category: String,
    pub difficulty: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub author_name: String,
    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
    pub option_d: String,
    pub correct_answer: String,
    pub context: String,
    pub troubleshoot_step: String,
    pub root_cause: String,
    pub things_to_avoid: String,
}

impl QuestionRecord {
    pub fn into_row(self) -> QuestionRow {
        [
            self.question,
            self.answer,
            self.category,
            self.difficulty,
            self.kind,
            self.author_name,
            self.option_a,
            self.option_b,
            self.option_c,
            self.option_d,
            self.correct_answer,
            self.context,
            self.troubleshoot_step,
            self.root_cause,
            self.things_to_avoid,
        ]
    }
}

/// Key a positional row by the canonical headers.
pub fn stored_row(row: &QuestionRow) -> StoredRow {
    HEADERS
        .iter()
        .zip(row.iter())
        .map(|(h, v)| (h.to_string(), v.clone()))
        .collect()
}
