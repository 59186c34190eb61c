use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "episodist")]
#[command(author, version, about = "Rename and tag TV episode files in bulk")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Number, rename and tag a batch of episode files
    Process(ProcessArgs),

    /// List the media files found in a directory
    Scan {
        /// Directory to scan
        #[arg(required = true)]
        dir: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the tags stored in a media file
    Inspect {
        /// File to inspect
        #[arg(required = true)]
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the accepted genre labels
    Genres,

    /// Check that required external tools are available
    CheckTools,

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}

#[derive(Args)]
pub struct ProcessArgs {
    /// A directory to scan, or episode files in broadcast order
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Show title
    #[arg(short, long)]
    pub title: String,

    /// Genre (see `episodist genres`)
    #[arg(short, long)]
    pub genre: String,

    /// Release year (defaults to naming.default_year)
    #[arg(short, long)]
    pub year: Option<u16>,

    /// Season number (defaults to naming.default_season)
    #[arg(short, long)]
    pub season: Option<u32>,

    /// First episode number (defaults to naming.default_episode)
    #[arg(short, long)]
    pub episode: Option<u32>,

    /// Episode number digits, 2 or 3 (defaults to naming.episode_padding)
    #[arg(long)]
    pub padding: Option<u8>,

    /// Leave file names as they are
    #[arg(long)]
    pub no_rename: bool,

    /// Leave container tags as they are
    #[arg(long)]
    pub no_metadata: bool,

    /// Show what would be done without executing
    #[arg(long)]
    pub dry_run: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}
