//! Core library for Tracker.
//!
//! This crate provides the domain models, SQLite storage, and the listing
//! logic (search, pagination, grouping) for Tracker, independent of any
//! transport layer (HTTP, MCP, etc.).
//!
//! # Usage
//!
//! ```no_run
//! use tracker_core::{group_tasks, Database, ListParams};
//!
//! let db = Database::open_default()?;
//! db.migrate()?;
//!
//! let page = db.list_tasks(&ListParams::new("boeing", 0))?;
//! for group in group_tasks(page.tasks) {
//!     println!("{} - {}", group.category_name, group.sub_category_name);
//! }
//! # Ok::<(), tracker_core::DbError>(())
//! ```

pub mod db;
pub mod error;
pub mod grouping;
pub mod models;
pub mod params;

// Re-export commonly used types at crate root
pub use db::Database;
pub use error::{DbError, Result};
pub use grouping::{group_tasks, TaskGroup};
pub use params::{ListParams, ParamsError};
