//! Annotated task listing: search, pagination and latest progress.

use rusqlite::{params, OptionalExtension, Row};

use super::{get_opt_date, get_ts, Database};
use crate::error::Result;
use crate::models::*;
use crate::params::ListParams;

/// Tasks joined with their sub-category, category and newest progress row.
///
/// Newest means greatest `updated_at`, then greatest `id`.
const TASK_SELECT: &str = r"
SELECT t.id, t.sub_category_id, t.name, t.description, t.volume, t.unit,
       t.hds, t.total, t.price, t.weight, t.created_at, t.updated_at,
       sc.name, c.id, c.name,
       lp.value, lp.date, lp.note
FROM tasks t
JOIN sub_categories sc ON sc.id = t.sub_category_id
JOIN categories c ON c.id = sc.category_id
LEFT JOIN progress lp ON lp.id = (
    SELECT p.id FROM progress p
    WHERE p.task_id = t.id
    ORDER BY p.updated_at DESC, p.id DESC
    LIMIT 1
)";

/// Substring match after Unicode case folding; an empty search matches all.
const SEARCH_FILTER: &str = "instr(casefold(t.name), casefold(?1)) > 0";

const LISTING_ORDER: &str = "c.name, sc.name, sc.id, t.name, t.id";

impl Database {
    /// One page of tasks whose name contains `params.search`.
    ///
    /// The match ignores case, including for non-ASCII letters. An empty
    /// search matches every task and a page past the end comes back empty.
    pub fn list_tasks(&self, params: &ListParams) -> Result<TaskPage> {
        let search = params.search.as_str();
        let limit = i64::from(PAGE_SIZE);
        let offset = i64::try_from(page_offset(params.page)).unwrap_or(i64::MAX);

        self.with_conn(|conn| {
            let total: i64 = conn.query_row(
                &format!(
                    "SELECT COUNT(*) FROM tasks t
                     JOIN sub_categories sc ON sc.id = t.sub_category_id
                     JOIN categories c ON c.id = sc.category_id
                     WHERE {SEARCH_FILTER}"
                ),
                params![search],
                |row| row.get(0),
            )?;

            let mut stmt = conn.prepare(&format!(
                "{TASK_SELECT} WHERE {SEARCH_FILTER} ORDER BY {LISTING_ORDER} LIMIT ?2 OFFSET ?3"
            ))?;
            let rows = stmt.query_map(params![search, limit, offset], task_row_from_row)?;
            let tasks = rows.collect::<rusqlite::Result<Vec<_>>>()?;

            let total_count = u64::try_from(total).unwrap_or(0);
            tracing::debug!(
                search = %params.search,
                page = params.page,
                total_count,
                returned = tasks.len(),
                "Listed tasks"
            );

            Ok(TaskPage {
                tasks,
                total_count,
                page: params.page,
                page_size: PAGE_SIZE,
                has_next_page: has_next_page(total_count, params.page),
            })
        })
    }

    pub fn get_task(&self, id: i64) -> Result<Option<TaskRow>> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    &format!("{TASK_SELECT} WHERE t.id = ?1"),
                    [id],
                    task_row_from_row,
                )
                .optional()?;
            Ok(row)
        })
    }
}

fn task_row_from_row(row: &Row<'_>) -> rusqlite::Result<TaskRow> {
    let task = Task {
        id: row.get(0)?,
        sub_category_id: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        volume: row.get(4)?,
        unit: row.get(5)?,
        hds: row.get(6)?,
        total: row.get(7)?,
        price: row.get(8)?,
        weight: row.get(9)?,
        created_at: get_ts(row, 10)?,
        updated_at: get_ts(row, 11)?,
    };

    let latest_progress = match (row.get::<_, Option<f64>>(15)?, get_opt_date(row, 16)?) {
        (Some(value), Some(date)) => Some(LatestProgress {
            value,
            date,
            note: row.get::<_, Option<String>>(17)?.unwrap_or_default(),
        }),
        _ => None,
    };

    Ok(TaskRow {
        task,
        sub_category_name: row.get(12)?,
        category_id: row.get(13)?,
        category_name: row.get(14)?,
        latest_progress,
    })
}
