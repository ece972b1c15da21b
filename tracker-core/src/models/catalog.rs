use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::CreateTaskInput;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubCategory {
    pub id: i64,
    pub category_id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A catalog fixture: categories holding sub-categories holding tasks.
///
/// The catalog is owned by whoever feeds the database; this shape is only
/// used to seed it in one go.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    pub categories: Vec<CatalogCategory>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogCategory {
    pub name: String,
    #[serde(default)]
    pub sub_categories: Vec<CatalogSubCategory>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogSubCategory {
    pub name: String,
    #[serde(default)]
    pub tasks: Vec<CatalogTask>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogTask {
    #[serde(flatten)]
    pub task: CreateTaskInput,
    /// Optional starting progress value recorded at import time.
    #[serde(default)]
    pub progress: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub categories: usize,
    pub sub_categories: usize,
    pub tasks: usize,
    pub progress: usize,
}
