//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Visual section editor: click, edit, and keep preview and source in sync
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path (default: vise.toml)
    #[arg(short = 'C', long, global = true, default_value = "vise.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Sections directory (overrides `[sections] dir`)
    #[arg(short, long, global = true, value_hint = clap::ValueHint::DirPath)]
    pub sections: Option<PathBuf>,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Render the preview and print the element tree
    #[command(visible_alias = "i")]
    Inspect {
        #[command(flatten)]
        args: InspectArgs,
    },

    /// Rewrite a property value in the section sources
    #[command(visible_alias = "p")]
    Patch {
        #[command(flatten)]
        args: PatchArgs,
    },

    /// Replay a scripted editing session
    Session {
        #[command(flatten)]
        args: SessionArgs,
    },

    /// Keep the preview in sync with section files edited on disk
    #[command(visible_alias = "w")]
    Watch,
}

/// Inspect command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct InspectArgs {
    /// Print the descriptor JSON of the element at this address (e.g. "0 > 1 > 0")
    #[arg(short, long)]
    pub address: Option<String>,

    /// Print the rendered preview markup instead of the tree
    #[arg(long)]
    pub html: bool,
}

/// Patch command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct PatchArgs {
    /// Property name (textContent or className)
    #[arg(short, long)]
    pub property: String,

    /// Value currently in the preview
    #[arg(short, long, allow_hyphen_values = true)]
    pub old: String,

    /// Replacement value
    #[arg(short, long, allow_hyphen_values = true)]
    pub new: String,

    /// Write the patched file back to disk
    #[arg(short, long)]
    pub write: bool,
}

/// Session command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct SessionArgs {
    /// Script of editing steps (JSON array)
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub script: PathBuf,

    /// Write patched files back to disk
    #[arg(short, long)]
    pub write: bool,

    /// Print every frame as raw JSON
    #[arg(long)]
    pub raw: bool,

    /// Print the preview markup once the script has run
    #[arg(long)]
    pub html: bool,
}
