use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub sub_category_id: i64,
    pub name: String,
    pub description: String,
    pub volume: f64,
    pub unit: String,
    pub hds: String,
    pub total: String,
    pub price: String,
    pub weight: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateTaskInput {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub volume: f64,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub hds: String,
    #[serde(default)]
    pub total: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub weight: f64,
}

/// The most recently updated progress row of a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatestProgress {
    pub value: f64,
    pub date: NaiveDate,
    pub note: String,
}

/// A task joined with its classification and latest progress.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskRow {
    #[serde(flatten)]
    pub task: Task,
    pub sub_category_name: String,
    pub category_id: i64,
    pub category_name: String,
    pub latest_progress: Option<LatestProgress>,
}

impl TaskRow {
    /// Latest progress value, or zero when nothing has been recorded yet.
    pub fn progress_value(&self) -> f64 {
        self.latest_progress.as_ref().map_or(0.0, |p| p.value)
    }
}
