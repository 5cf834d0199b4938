use std::path::PathBuf;

use clap::Parser;

/// Start the remote processing job and follow its progress.
#[derive(Parser, Debug)]
#[command(name = "jobwatch")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Primary sample files (.jpg, .jpeg, .png, .xlsx)
    #[arg(long, num_args = 1.., value_name = "FILE")]
    pub primary: Vec<PathBuf>,

    /// Secondary sample files (.jpg, .jpeg, .png, .xlsx)
    #[arg(long, num_args = 1.., value_name = "FILE")]
    pub secondary: Vec<PathBuf>,

    /// Format workbook (single file)
    #[arg(long, value_name = "FILE")]
    pub format: Option<PathBuf>,

    /// Job endpoint, overrides the config file
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Path to the RON config file
    #[arg(long, default_value = "jobwatch.ron")]
    pub config: PathBuf,

    /// Continue without asking when input groups are empty
    #[arg(long, short = 'y')]
    pub assume_yes: bool,

    /// Write a JSON transcript of the run into this directory
    #[arg(long, value_name = "DIR")]
    pub transcript_dir: Option<PathBuf>,
}
