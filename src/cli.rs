use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Directory tree (or single file) to process
    #[arg(short, long, default_value = ".", global = true)]
    pub dir: PathBuf,

    /// Maximum recursion depth (0 means no recursion)
    #[arg(long, default_value = "50", global = true)]
    pub max_depth: usize,

    /// Additional exclude patterns (glob patterns like "*.tmp" or "target")
    #[arg(short = 'x', long, value_delimiter = ',', global = true)]
    pub exclude: Vec<String>,

    /// File with one exclude pattern per line, relative to the directory tree
    #[arg(long, global = true)]
    pub excludes_file: Option<PathBuf>,

    /// Write a JSON report to this file
    #[arg(short, long, global = true)]
    pub output: Option<String>,

    /// Increase logging verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Hide the progress bar
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the detected type of every file
    Describe,
    /// Classify the license header of every file
    List,
    /// Compare license headers against a reference license
    Check(LicenseFileArgs),
    /// Insert or replace license headers with a reference license
    Relicense {
        #[command(flatten)]
        license: LicenseFileArgs,

        /// Replace headers that already contain a license
        #[arg(short, long)]
        existing_only: bool,

        /// Add the license to files that have none
        #[arg(short, long)]
        new_only: bool,
    },
    /// Rewrite comment blocks in their canonical layout
    Reformat,
    /// Remove leading blank lines and trailing whitespace
    StripBlank,
    /// Order the head of Java files as package, license, imports
    JavaTop {
        /// Put the license block above the package line
        #[arg(short, long)]
        license_on_top: bool,
    },
    /// Move the XML declaration above the license comment
    XmlTop,
}

#[derive(Args, Debug)]
pub struct LicenseFileArgs {
    /// Reference license file, relative to the directory tree
    #[arg(short = 'f', long)]
    pub license_file: PathBuf,

    /// Comment syntax the license file is written in
    #[arg(short = 't', long, default_value = "text")]
    pub license_type: String,
}
