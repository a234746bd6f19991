pub mod card;
pub mod commands;
pub mod core;
pub mod forms;
pub mod help;
pub mod io;
pub mod list;
pub mod output;
pub mod registry;
mod shell;
pub mod ui;

pub use shell::{run_cli, SCRIPT_ENV};
