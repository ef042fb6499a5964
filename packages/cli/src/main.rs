#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line entry point for the imhonet rating archiver.
//!
//! Crawls a user's rating listing for one subject, merges the results
//! with any previously collected file (backing it up first), and
//! renders the merged collection as a static HTML report.

use std::path::{Path, PathBuf};

use clap::Parser;
use imho_rates_cli_utils::IndicatifProgress;
use imho_rates_models::Subject;
use imho_rates_scraper::rates::RateStream;

#[derive(Parser)]
#[command(name = "imho_rates", about = "imhonet rating archiver")]
struct Cli {
    /// imhonet user identifier
    user_id: String,

    /// Rated subject section: films, books, games or serials
    subject: Subject,

    /// Skip crawling; only re-render the HTML report from the existing
    /// rates file
    #[arg(long = "html_only")]
    html_only: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = imho_rates_cli_utils::init_logger();
    let cli = Cli::parse();

    let output = PathBuf::from(imho_rates_store::output_filename(&cli.user_id, cli.subject));

    if cli.html_only {
        render_report(&output, cli.subject);
        return Ok(());
    }

    let existing = imho_rates_store::load(&output);
    if !existing.is_empty() {
        // Backup errors propagate; everything past this point
        // overwrites the file.
        let backup = imho_rates_store::backup(&output)?;
        log::info!("Previous rates backed up to {}", backup.display());
    }

    log::info!(
        "Collecting {} rates of user {} into {}",
        cli.subject,
        cli.user_id,
        output.display()
    );

    let progress = IndicatifProgress::records_bar(&multi, "Collecting rates");
    let mut stream = RateStream::new(&cli.user_id, cli.subject);
    match imho_rates_store::dump(&output, &existing, &mut stream, &progress).await {
        Ok(written) => progress.finish(format!("Collected {written} new rate(s)")),
        Err(e) => {
            progress.finish_and_clear();
            log::error!("Collecting rates failed: {e}");
        }
    }

    render_report(&output, cli.subject);

    Ok(())
}

fn render_report(path: &Path, subject: Subject) {
    match imho_rates_report::render(path, subject) {
        Ok(report) => log::info!("HTML report written to {}", report.display()),
        Err(e) => log::error!("Rendering HTML report failed: {e}"),
    }
}
