//! fintrack-core
//!
//! Stores, aggregation services and the persistence port for fintrack.
//! Depends on fintrack-domain. No CLI, no terminal I/O; durable backends live in
//! their own crates and plug in through [`storage::KeyValueStore`].

pub mod budget_service;
pub mod cash_flow_service;
pub mod error;
pub mod format;
pub mod snapshot_service;
pub mod storage;
pub mod summary_service;
pub mod time;
pub mod transaction_service;

pub use budget_service::*;
pub use cash_flow_service::*;
pub use error::CoreError;
pub use format::*;
pub use snapshot_service::*;
pub use storage::{KeyValueStore, MemoryStore};
pub use summary_service::*;
pub use time::{Clock, FixedClock, SystemClock};
pub use transaction_service::*;
