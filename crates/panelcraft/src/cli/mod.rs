//! Command-line interface for the panelcraft binary.

mod commands;
mod generate;

pub use commands::{Cli, Commands, GenerateArgs};
pub use generate::{list_genres, run_generate};
