//! fintrack-domain
//!
//! Pure domain models (Transaction, Budget, Category, Settings, Snapshot).
//! No I/O, no CLI, no storage. Only data types, validation and calendar helpers.

pub mod budget;
pub mod category;
pub mod common;
pub mod error;
pub mod settings;
pub mod snapshot;
pub mod transaction;

pub use budget::*;
pub use category::*;
pub use common::*;
pub use error::ValidationError;
pub use settings::*;
pub use snapshot::*;
pub use transaction::*;
