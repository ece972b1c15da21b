use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{format_date, format_ts, get_date, get_ts, Database};
use crate::error::{DbError, Result};
use crate::models::*;

impl Database {
    /// Appends a progress row dated today.
    ///
    /// The value is not range checked; the newest row simply becomes the
    /// task's latest progress.
    pub fn insert_progress(&self, input: &NewProgress) -> Result<Progress> {
        self.insert_progress_at(input, Utc::now())
    }

    /// Appends a progress row as of `now`.
    pub fn insert_progress_at(&self, input: &NewProgress, now: DateTime<Utc>) -> Result<Progress> {
        if !input.value.is_finite() {
            return Err(DbError::Validation(format!(
                "progress value must be a number, got {}",
                input.value
            )));
        }

        self.with_conn(|conn| {
            let exists = conn
                .query_row("SELECT 1 FROM tasks WHERE id = ?1", [input.task_id], |_| Ok(()))
                .optional()?;
            if exists.is_none() {
                return Err(DbError::NotFound(format!("task {}", input.task_id)));
            }

            let progress =
                insert_progress_row(conn, input.task_id, input.value, input.note_or_default(), now)?;
            tracing::debug!(
                task_id = progress.task_id,
                value = progress.value,
                "Recorded progress"
            );
            Ok(progress)
        })
    }

    /// All progress rows of a task, newest first.
    pub fn progress_history(&self, task_id: i64) -> Result<Vec<Progress>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, task_id, value, note, date, created_at, updated_at
                 FROM progress
                 WHERE task_id = ?1
                 ORDER BY updated_at DESC, id DESC",
            )?;
            let rows = stmt.query_map([task_id], progress_from_row)?;
            Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
        })
    }
}

pub(super) fn insert_progress_row(
    conn: &Connection,
    task_id: i64,
    value: f64,
    note: &str,
    now: DateTime<Utc>,
) -> Result<Progress> {
    let date = now.date_naive();
    conn.execute(
        "INSERT INTO progress (task_id, value, note, date, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
        params![task_id, value, note, format_date(date), format_ts(now)],
    )?;

    Ok(Progress {
        id: conn.last_insert_rowid(),
        task_id,
        value,
        note: note.to_string(),
        date,
        created_at: now,
        updated_at: now,
    })
}

fn progress_from_row(row: &Row<'_>) -> rusqlite::Result<Progress> {
    Ok(Progress {
        id: row.get(0)?,
        task_id: row.get(1)?,
        value: row.get(2)?,
        note: row.get(3)?,
        date: get_date(row, 4)?,
        created_at: get_ts(row, 5)?,
        updated_at: get_ts(row, 6)?,
    })
}
