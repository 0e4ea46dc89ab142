//! hatetracker CLI binary.

use std::process;

use anyhow::Context;
use clap::Parser;

use hatetracker::cli::{execute, Args};
use hatetracker::RunSummary;

fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level())
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match run(&args) {
        Ok(summary) => report(&summary),
        Err(e) => {
            eprintln!("Error: {e:#}");
            process::exit(1);
        }
    }
}

fn run(args: &Args) -> anyhow::Result<RunSummary> {
    execute(args).with_context(|| format!("failed to rank {}", args.input.display()))
}

fn report(summary: &RunSummary) {
    for failure in &summary.failures {
        eprintln!("skipped {failure}");
    }
    if summary.has_failures() {
        eprintln!(
            "{} of {} documents could not be read",
            summary.failures.len(),
            summary.documents
        );
    }
}
