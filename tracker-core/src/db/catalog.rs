//! Category, sub-category and task writes.
//!
//! The catalog is maintained outside the tracker; these writes exist to
//! seed a database from a fixture and to build test data.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{format_ts, get_ts, progress::insert_progress_row, Database};
use crate::error::{DbError, Result};
use crate::models::*;

impl Database {
    pub fn insert_category(&self, name: &str) -> Result<Category> {
        self.with_conn(|conn| insert_category_row(conn, name, Utc::now()))
    }

    pub fn insert_sub_category(&self, category_id: i64, name: &str) -> Result<SubCategory> {
        self.with_conn(|conn| insert_sub_category_row(conn, category_id, name, Utc::now()))
    }

    pub fn insert_task(&self, sub_category_id: i64, input: &CreateTaskInput) -> Result<Task> {
        self.with_conn(|conn| insert_task_row(conn, sub_category_id, input, Utc::now()))
    }

    pub fn list_categories(&self) -> Result<Vec<Category>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, name, created_at, updated_at FROM categories ORDER BY name, id",
            )?;
            let rows = stmt.query_map([], category_from_row)?;
            Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
        })
    }

    /// Loads a whole catalog fixture in a single transaction.
    pub fn import_catalog(&self, catalog: &Catalog) -> Result<ImportSummary> {
        self.with_conn(|conn| {
            let tx = conn.transaction()?;
            let now = Utc::now();
            let mut summary = ImportSummary::default();

            for category in &catalog.categories {
                let cat = insert_category_row(&tx, &category.name, now)?;
                summary.categories += 1;

                for sub in &category.sub_categories {
                    let sub_row = insert_sub_category_row(&tx, cat.id, &sub.name, now)?;
                    summary.sub_categories += 1;

                    for entry in &sub.tasks {
                        let task = insert_task_row(&tx, sub_row.id, &entry.task, now)?;
                        summary.tasks += 1;

                        if let Some(value) = entry.progress {
                            insert_progress_row(&tx, task.id, value, "", now)?;
                            summary.progress += 1;
                        }
                    }
                }
            }

            tx.commit()?;
            tracing::info!(
                categories = summary.categories,
                sub_categories = summary.sub_categories,
                tasks = summary.tasks,
                "Imported catalog"
            );
            Ok(summary)
        })
    }
}

fn require_name(name: &str, what: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(DbError::Validation(format!("{what} name must not be empty")));
    }
    Ok(())
}

fn insert_category_row(conn: &Connection, name: &str, now: DateTime<Utc>) -> Result<Category> {
    require_name(name, "category")?;
    conn.execute(
        "INSERT INTO categories (name, created_at, updated_at) VALUES (?1, ?2, ?2)",
        params![name, format_ts(now)],
    )?;

    Ok(Category {
        id: conn.last_insert_rowid(),
        name: name.to_string(),
        created_at: now,
        updated_at: now,
    })
}

fn insert_sub_category_row(
    conn: &Connection,
    category_id: i64,
    name: &str,
    now: DateTime<Utc>,
) -> Result<SubCategory> {
    require_name(name, "sub-category")?;
    let exists = conn
        .query_row("SELECT 1 FROM categories WHERE id = ?1", [category_id], |_| Ok(()))
        .optional()?;
    if exists.is_none() {
        return Err(DbError::NotFound(format!("category {category_id}")));
    }

    conn.execute(
        "INSERT INTO sub_categories (category_id, name, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?3)",
        params![category_id, name, format_ts(now)],
    )?;

    Ok(SubCategory {
        id: conn.last_insert_rowid(),
        category_id,
        name: name.to_string(),
        created_at: now,
        updated_at: now,
    })
}

fn insert_task_row(
    conn: &Connection,
    sub_category_id: i64,
    input: &CreateTaskInput,
    now: DateTime<Utc>,
) -> Result<Task> {
    require_name(&input.name, "task")?;
    let exists = conn
        .query_row(
            "SELECT 1 FROM sub_categories WHERE id = ?1",
            [sub_category_id],
            |_| Ok(()),
        )
        .optional()?;
    if exists.is_none() {
        return Err(DbError::NotFound(format!("sub-category {sub_category_id}")));
    }

    conn.execute(
        "INSERT INTO tasks (sub_category_id, name, description, volume, unit, hds, total, price, weight, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)",
        params![
            sub_category_id,
            input.name,
            input.description,
            input.volume,
            input.unit,
            input.hds,
            input.total,
            input.price,
            input.weight,
            format_ts(now),
        ],
    )?;

    Ok(Task {
        id: conn.last_insert_rowid(),
        sub_category_id,
        name: input.name.clone(),
        description: input.description.clone(),
        volume: input.volume,
        unit: input.unit.clone(),
        hds: input.hds.clone(),
        total: input.total.clone(),
        price: input.price.clone(),
        weight: input.weight,
        created_at: now,
        updated_at: now,
    })
}

fn category_from_row(row: &Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: row.get(0)?,
        name: row.get(1)?,
        created_at: get_ts(row, 2)?,
        updated_at: get_ts(row, 3)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_db() -> Database {
        let db = Database::open_memory().unwrap();
        db.migrate().unwrap();
        db
    }

    #[test]
    fn sub_category_requires_existing_category() {
        let db = setup_db();
        let err = db.insert_sub_category(42, "Wings").unwrap_err();
        assert!(matches!(err, DbError::NotFound(_)));
    }

    #[test]
    fn task_requires_a_name() {
        let db = setup_db();
        let cat = db.insert_category("Airframe").unwrap();
        let sub = db.insert_sub_category(cat.id, "Wings").unwrap();
        let err = db
            .insert_task(sub.id, &CreateTaskInput::default())
            .unwrap_err();
        assert!(matches!(err, DbError::Validation(_)));
    }

    #[test]
    fn import_loads_nested_fixture() {
        let db = setup_db();
        let catalog: Catalog = serde_json::from_value(serde_json::json!({
            "categories": [{
                "name": "Aircraft",
                "sub_categories": [{
                    "name": "Narrow body",
                    "tasks": [
                        { "name": "Boeing 737", "unit": "unit", "volume": 2, "progress": 40 },
                        { "name": "Airbus A320" }
                    ]
                }]
            }]
        }))
        .unwrap();

        let summary = db.import_catalog(&catalog).unwrap();
        assert_eq!(
            summary,
            ImportSummary {
                categories: 1,
                sub_categories: 1,
                tasks: 2,
                progress: 1,
            }
        );
        assert_eq!(db.list_categories().unwrap()[0].name, "Aircraft");
    }

    #[test]
    fn failed_import_leaves_nothing_behind() {
        let db = setup_db();
        let catalog: Catalog = serde_json::from_value(serde_json::json!({
            "categories": [
                { "name": "Aircraft" },
                { "name": "  " }
            ]
        }))
        .unwrap();

        assert!(db.import_catalog(&catalog).is_err());
        assert!(db.list_categories().unwrap().is_empty());
    }
}
