use axum::{
    extract::{RawQuery, State},
    response::{Html, Redirect},
    Form,
};
use serde::Deserialize;
use tracker_core::models::NewProgress;
use tracker_core::{group_tasks, ListParams};

use super::{decode_params, AppState};
use crate::blocking::with_db;
use crate::error::AppError;
use crate::view;

pub async fn index(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<Html<String>, AppError> {
    let params = decode_params(query.as_deref())?;
    let listing = params.clone();
    let mut page = with_db(&state.db, move |db| db.list_tasks(&listing)).await?;
    let groups = group_tasks(std::mem::take(&mut page.tasks));
    Ok(Html(view::render_index(&page, &groups, &params)))
}

/// Fields posted by a task's progress form.
///
/// Everything arrives as text; `search` and `page` carry the listing state
/// to return to.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ProgressForm {
    pub task_id: String,
    pub value: String,
    pub note: String,
    pub search: String,
    pub page: String,
}

impl ProgressForm {
    fn parse(&self) -> Result<(NewProgress, ListParams), AppError> {
        let task_id = self
            .task_id
            .trim()
            .parse::<i64>()
            .map_err(|_| AppError::Validation(format!("invalid task id {:?}", self.task_id)))?;

        let value = self.value.trim();
        if value.is_empty() {
            return Err(AppError::Validation("progress value is required".into()));
        }
        let value = value
            .parse::<f64>()
            .map_err(|_| AppError::Validation(format!("invalid progress value {:?}", value)))?;

        let note = Some(self.note.trim())
            .filter(|n| !n.is_empty())
            .map(str::to_string);

        let listing = ListParams::parse(self.search.clone(), Some(&self.page))?;

        Ok((
            NewProgress {
                task_id,
                value,
                note,
            },
            listing,
        ))
    }
}

/// Records progress and sends the browser back to the refreshed listing.
pub async fn submit_progress(
    State(state): State<AppState>,
    Form(form): Form<ProgressForm>,
) -> Result<Redirect, AppError> {
    let (input, params) = form.parse()?;
    let progress = state.debouncer.submit(input).await?;
    tracing::info!(
        task_id = progress.task_id,
        value = progress.value,
        "Progress submitted from form"
    );
    Ok(Redirect::to(&view::list_url(&params)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracker_core::ParamsError;

    fn form(task_id: &str, value: &str, note: &str) -> ProgressForm {
        ProgressForm {
            task_id: task_id.into(),
            value: value.into(),
            note: note.into(),
            ..Default::default()
        }
    }

    #[test]
    fn blank_note_becomes_none() {
        let (input, params) = form("5", "42", "   ").parse().unwrap();
        assert_eq!(
            input,
            NewProgress {
                task_id: 5,
                value: 42.0,
                note: None
            }
        );
        assert_eq!(params, ListParams::default());
    }

    #[test]
    fn keeps_listing_state() {
        let mut f = form("5", "42", "ok");
        f.search = "boeing".into();
        f.page = "1".into();
        let (input, params) = f.parse().unwrap();
        assert_eq!(input.note.as_deref(), Some("ok"));
        assert_eq!(params, ListParams::new("boeing", 1));
    }

    #[test]
    fn rejects_missing_or_bad_value() {
        assert!(matches!(form("5", "", "").parse(), Err(AppError::Validation(_))));
        assert!(matches!(form("5", "lots", "").parse(), Err(AppError::Validation(_))));
        assert!(matches!(form("x", "1", "").parse(), Err(AppError::Validation(_))));
    }

    #[test]
    fn page_uses_listing_codec() {
        let mut f = form("5", "42", "");
        f.page = "-1".into();
        let err = f.parse().unwrap_err();
        assert_eq!(
            err.to_string(),
            AppError::from(ParamsError::InvalidPage("-1".into())).to_string()
        );
    }
}
