#![doc(test(attr(deny(warnings))))]

//! Expense Tracker: a small single-user expense ledger with a validated
//! entry form, a category-filtered list, and a spending summary, driven
//! from an interactive shell.

pub mod cli;
pub mod config;
pub mod core;
pub mod currency;
pub mod domain;
pub mod errors;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Expense Tracker tracing initialized.");
    });
}
