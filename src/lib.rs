#![doc(test(attr(deny(warnings))))]

//! fintrack keeps a personal ledger of income and expenses, checks spending
//! against category budgets and derives balances, breakdowns and cash-flow
//! series from it. The library drives the `fintrack` shell.

pub mod app;
pub mod auth;
pub mod cli;
pub mod errors;
pub mod utils;

pub use app::FinanceApp;
pub use errors::{CliError, FinError, Result};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("fintrack tracing initialized.");
    });
}
