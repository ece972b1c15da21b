//! Tracker: daily progress updates for categorised tasks.
//!
//! The binary serves a searchable, paginated task listing grouped by
//! category and sub-category, records progress through a form or the JSON
//! API, and exposes the same operations to agents over MCP.

pub mod api;
pub mod blocking;
pub mod config;
pub mod debounce;
pub mod error;
pub mod mcp;
pub mod view;

pub use tracker_core::{db, models};
