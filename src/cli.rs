//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

/// Copy the media files referenced by storefront CSV exports.
///
/// Mediadump reads a values export (one media path per row) and/or a content
/// export (HTML with `{{media url=...}}` directives) and downloads every
/// referenced file from the given domain into the output directory,
/// mirroring the remote paths.
#[derive(Parser, Debug)]
#[command(name = "mediadump")]
#[command(author, version, about)]
pub struct Args {
    /// CSV export whose first column holds media paths
    #[arg(short = 'v', long, value_name = "FILE")]
    pub values: Option<PathBuf>,

    /// CSV export whose first column holds content with media directives
    #[arg(short = 'c', long, value_name = "FILE")]
    pub content: Option<PathBuf>,

    /// Remote domain the media files are fetched from (https unless a scheme is given)
    #[arg(short = 'd', long, value_name = "HOST")]
    pub domain: Option<String>,

    /// Directory the remote paths are recreated under
    #[arg(short = 'o', long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Maximum concurrent downloads (1-1000) [default: 10]
    #[arg(short = 'p', long, value_parser = clap::value_parser!(u16).range(1..=1000))]
    pub parallel: Option<u16>,

    /// HTTP connect timeout in seconds (1-3600) [default: 30]
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..=3600))]
    pub connect_timeout: Option<u64>,

    /// Whole-request timeout in seconds (1-3600) [default: 300]
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..=3600))]
    pub timeout: Option<u64>,

    /// Exit 1 when some downloads failed and 2 when all of them failed
    #[arg(long)]
    pub strict_exit: bool,

    /// Increase log verbosity on stderr (repeat for more detail)
    #[arg(long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors on stderr
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Returns the default tracing filter for the verbosity flags.
    #[must_use]
    pub fn default_log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
