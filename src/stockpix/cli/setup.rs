use clap::{Parser, Subcommand};
use std::path::PathBuf;
use stockpix::model::PhotoSource;

#[derive(Parser, Debug)]
#[command(
    name = "stockpix",
    bin_name = "stockpix",
    version,
    disable_help_subcommand = true
)]
#[command(
    about = "Search Unsplash, Pexels and Pixabay and save photos into your notes",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Vault root (default: nearest folder with .stockpix or .obsidian, else cwd)
    #[arg(long, global = true, env = "STOCKPIX_VAULT", help_heading = "Options")]
    pub vault: Option<PathBuf>,

    /// Verbose output (debug logs on stderr)
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search every configured provider, or fetch the photo behind a URL
    Search {
        /// Search words or a photo URL
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,

        /// Only ask this provider
        #[arg(short, long)]
        provider: Option<PhotoSource>,
    },

    /// Page through results interactively and save from them
    Browse {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },

    /// Download one photo into the vault
    Save {
        /// Photo URL or id as listed by search (e.g. pexels-2014422)
        target: String,

        /// Query the photo was found with (used in the filename and details)
        #[arg(short, long, default_value = "")]
        query: String,

        /// Note that receives the details block (vault-relative)
        #[arg(short, long)]
        note: Option<PathBuf>,

        /// Insert before this line of the note (1-based); appends when omitted
        #[arg(short, long, requires = "note")]
        line: Option<usize>,
    },

    /// Get or set configuration values
    Config {
        /// Configuration key (unsplash-key, pexels-key, pixabay-key, save-folder,
        /// image-size, include-ai, default-provider)
        key: Option<String>,

        /// Value to set (empty clears an API key)
        value: Option<String>,
    },

    /// Create the .stockpix settings folder in the vault
    Init,
}
