use axum::{
    extract::{Path, RawQuery, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracker_core::models::{NewProgress, Progress, TaskPage, TaskRow};
use tracker_core::{group_tasks, DbError, TaskGroup};

use super::{decode_params, AppState};
use crate::blocking::with_db;
use crate::error::AppError;

/// A listing page with its tasks grouped by sub-category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskListing {
    pub total_count: u64,
    pub page: u32,
    pub page_size: u32,
    pub has_next_page: bool,
    pub groups: Vec<TaskGroup>,
}

impl From<TaskPage> for TaskListing {
    fn from(page: TaskPage) -> Self {
        Self {
            total_count: page.total_count,
            page: page.page,
            page_size: page.page_size,
            has_next_page: page.has_next_page,
            groups: group_tasks(page.tasks),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
    })
}

pub async fn list_tasks(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<Json<TaskListing>, AppError> {
    let params = decode_params(query.as_deref())?;
    let page = with_db(&state.db, move |db| db.list_tasks(&params)).await?;
    Ok(Json(page.into()))
}

pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<TaskRow>, AppError> {
    with_db(&state.db, move |db| db.get_task(id))
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("task {id}")))
}

pub async fn task_progress(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<Progress>>, AppError> {
    let history = with_db(&state.db, move |db| {
        if db.get_task(id)?.is_none() {
            return Err(DbError::NotFound(format!("task {id}")));
        }
        db.progress_history(id)
    })
    .await?;
    Ok(Json(history))
}

pub async fn record_progress(
    State(state): State<AppState>,
    Json(input): Json<NewProgress>,
) -> Result<(StatusCode, Json<Progress>), AppError> {
    let progress = state.debouncer.submit(input).await?;
    Ok((StatusCode::CREATED, Json(progress)))
}
