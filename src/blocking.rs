//! Runs SQLite work on the blocking pool instead of the runtime threads.

use tracker_core::{Database, DbError};

use crate::error::AppError;

/// Runs `f` against a clone of `db` via `spawn_blocking`.
pub async fn with_db<T, F>(db: &Database, f: F) -> Result<T, AppError>
where
    F: FnOnce(&Database) -> Result<T, DbError> + Send + 'static,
    T: Send + 'static,
{
    let db = db.clone();
    tokio::task::spawn_blocking(move || f(&db))
        .await
        .map_err(|e| AppError::BackendUnavailable(e.to_string()))?
        .map_err(AppError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracker_core::ListParams;

    fn setup_db() -> Database {
        let db = Database::open_memory().unwrap();
        db.migrate().unwrap();
        db
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn returns_query_results() {
        let db = setup_db();
        db.insert_category("Aircraft").unwrap();

        let page = with_db(&db, |db| db.list_tasks(&ListParams::default()))
            .await
            .unwrap();
        assert_eq!(page.total_count, 0);

        let categories = with_db(&db, |db| db.list_categories()).await.unwrap();
        assert_eq!(categories.len(), 1);
    }

    #[tokio::test]
    async fn maps_database_errors() {
        let db = setup_db();
        let err = with_db(&db, |db| db.insert_sub_category(77, "Wings"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref what) if what == "category 77"));
    }
}
