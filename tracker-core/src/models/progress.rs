use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Progress {
    pub id: i64,
    pub task_id: i64,
    pub value: f64,
    pub note: String,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProgress {
    pub task_id: i64,
    pub value: f64,
    #[serde(default)]
    pub note: Option<String>,
}

impl NewProgress {
    /// The note as stored: absent notes become an empty string.
    pub fn note_or_default(&self) -> &str {
        self.note.as_deref().unwrap_or("")
    }
}
