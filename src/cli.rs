//! CLI definitions for Retouch.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Retouch CLI.
#[derive(Parser)]
#[command(name = "retouch")]
#[command(about = "Visual page editing engine")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml", global = true)]
    pub config: PathBuf,

    /// Storage root directory (overrides config)
    #[arg(long, global = true)]
    pub storage_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Apply an instruction to one element of an HTML file
    Edit {
        /// HTML file to edit
        file: PathBuf,

        /// Selector of the element to edit
        #[arg(short, long)]
        selector: String,

        /// Natural-language instruction
        #[arg(short, long)]
        instruction: String,

        /// Page URL the document models (scopes persisted edits)
        #[arg(long)]
        url: Option<String>,

        /// Write the result here instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Replay persisted mutations against an HTML file
    Replay {
        /// HTML file to replay against
        file: PathBuf,

        /// Page URL the document models (scopes persisted edits)
        #[arg(long)]
        url: Option<String>,

        /// Write the result here instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Manage the mediator credential
    Credential {
        #[command(subcommand)]
        action: CredentialAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum CredentialAction {
    /// Store the mediator API key
    Set {
        /// The API key
        key: String,
    },

    /// Show whether a credential is configured
    Show,
}
