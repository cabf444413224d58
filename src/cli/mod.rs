//! CLI module - argument parsing and subcommand runners

mod args;
pub mod target;
pub mod woe;

pub use args::{Cli, Commands};
