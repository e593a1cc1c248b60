//! tally-core: task records, SQLite store, config, and snapshot cache.
//!
//! # Conventions
//!
//! - **Errors**: `anyhow::Result` at operation boundaries, typed errors
//!   (`thiserror`) where callers need to match.
//! - **Logging**: `tracing` macros (`info!`, `warn!`, `debug!`).

pub mod cache;
pub mod config;
pub mod error;
pub mod model;
pub mod store;

pub use cache::{DASHBOARD_CACHE_KEY, SnapshotCache};
pub use config::{DashboardConfig, TallyConfig, load_config, load_user_config};
pub use error::ErrorCode;
pub use model::{Comment, Status, StatusValue, Tag, TagEntry, Task};
pub use store::{NewTask, TaskNotFound, TaskPatch};
