//! Command-line argument definitions.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Turn a story idea into a narrated comic.
#[derive(Parser, Debug)]
#[command(name = "panelcraft", version, about, long_about = None)]
pub struct Cli {
    /// Settings file (defaults to ./panelcraft.toml when present)
    #[arg(short, long, global = true, env = "PANELCRAFT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Script, illustrate and optionally narrate a comic
    Generate(GenerateArgs),

    /// List the supported genres and their art styles
    Genres,
}

/// Arguments of `panelcraft generate`.
#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Story idea
    #[arg(short, long)]
    pub idea: String,

    /// Genre, e.g. `noir` or `sci-fi`
    #[arg(short, long)]
    pub genre: Option<String>,

    /// Number of panels (5-10)
    #[arg(short, long)]
    pub panels: Option<u8>,

    /// Use stand-in images instead of the image service
    #[arg(long)]
    pub placeholder: bool,

    /// Directory to download the finished comic into
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Play the comic as a narrated slideshow when done
    #[arg(long)]
    pub narrate: bool,

    /// Narration voice
    #[arg(long)]
    pub voice: Option<String>,
}
