//! Command-line definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "moodjournal")]
#[command(about = "Mood-tagged Markdown journal backed by SQLite", long_about = None)]
#[command(version)]
pub struct Cli {
    /// TOML configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Database file (overrides config and MOODJOURNAL_DB_PATH)
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Acting user id; trusted as-is
    #[arg(long, global = true, env = "MOODJOURNAL_USER", value_name = "UUID")]
    pub user: Option<String>,

    /// Print route responses as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create or migrate the database and install the default moods
    Init,

    /// Create a local user (or print the existing one's id)
    SeedUser {
        #[arg(long)]
        email: String,

        /// Stored verbatim; hashing belongs to the auth service
        #[arg(long, default_value = "")]
        password_hash: String,
    },

    /// List the mood catalog
    Moods,

    /// List your entries, most recently edited first
    List,

    /// Show one entry
    Show {
        id: String,

        /// Print the rendered HTML instead of the Markdown source
        #[arg(long)]
        html: bool,
    },

    /// Write a new entry
    New {
        /// Defaults to the current date and time
        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long)]
        body: String,

        /// Mood name; repeat for several
        #[arg(short, long = "mood")]
        moods: Vec<String>,
    },

    /// Replace an entry's title and body
    Edit {
        id: String,

        #[arg(short, long)]
        title: String,

        #[arg(short, long)]
        body: String,
    },

    /// Delete one of your entries
    Delete { id: String },

    /// Render Markdown the way entries are displayed
    Preview {
        #[arg(short, long)]
        body: String,
    },
}
