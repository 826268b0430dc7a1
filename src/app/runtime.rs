//! One mediadump run: settings, job set, engine, report.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use mediadump_core::download::{DownloadEngine, Fetcher, HttpClient, MediaFetcher, RemoteBase};
use mediadump_core::input::resolve_job_set;
use mediadump_core::report::Reporter;
use tracing::{debug, info};

use crate::ProcessExit;
use crate::app::config::{self, MissingArguments};
use crate::app::{exit_handler, terminal};
use crate::cli::Args;

pub(crate) async fn run_mediadump() -> Result<ProcessExit> {
    // Parse before tracing so --help works without logs
    let args = Args::parse();
    terminal::init_tracing(args.default_log_level(), terminal::is_no_color_requested());
    debug!(?args, "CLI arguments parsed");

    let file_config = config::load_default_file_config()?;
    let settings = match config::resolve_settings(&args, &file_config) {
        Ok(settings) => settings,
        Err(missing) => {
            print_usage(&missing);
            return Ok(ProcessExit::Usage);
        }
    };

    let remote = RemoteBase::parse(&settings.domain).context("Invalid domain")?;
    let engine = DownloadEngine::new(settings.parallel)?;
    let jobs = resolve_job_set(
        settings.values_file.as_deref(),
        settings.content_file.as_deref(),
    )
    .context("Failed to read input")?;

    info!(
        targets = jobs.len(),
        domain = %remote.origin(),
        output_dir = %settings.output_dir.display(),
        concurrency = engine.concurrency(),
        "Mediadump starting"
    );

    let client = HttpClient::with_timeouts(settings.connect_timeout_secs, settings.timeout_secs)
        .context("Failed to build HTTP client")?;
    let fetcher: Arc<dyn Fetcher> =
        Arc::new(MediaFetcher::new(client, remote, settings.output_dir.clone()));
    let reporter = Arc::new(Reporter::stdout());

    let stats = engine.run(jobs, fetcher, Arc::clone(&reporter)).await;
    reporter.summary(&stats);

    Ok(exit_handler::resolve_exit(
        settings.strict_exit,
        stats.completed(),
        stats.failed(),
    ))
}

fn print_usage(missing: &MissingArguments) {
    let mut command = Args::command();
    eprintln!("error: {missing}\n");
    eprintln!("{}", command.render_usage());
    eprintln!("\nFor more information, try '--help'.");
}
