use std::path::PathBuf;
use std::process::exit;

use chrono::Utc;
use clap::Parser;
use tracing::{error, info};

use certwatch::config::Settings;
use certwatch::notify::{email, webhook};
use certwatch::timezone::DisplayZone;
use certwatch::{logging, report, scan_sites, Status};

/// Audits the TLS certificates of the configured sites and routes the
/// result to the console, email, and a webhook.
#[derive(Parser)]
#[command(name = "certwatch", version, about)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "certwatch.toml")]
    config: PathBuf,

    /// Print an example configuration file and exit
    #[arg(long)]
    example_config: bool,
}

fn main() {
    let cli = Cli::parse();

    if cli.example_config {
        println!("{}", Settings::example_toml());
        return;
    }

    let settings = match Settings::load(&cli.config) {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!(
                "failed to load configuration from {}: {}",
                cli.config.display(),
                err
            );
            exit(2);
        }
    };

    if let Err(err) = logging::initialize(&settings.logging) {
        eprintln!("failed to initialize logging: {}", err);
        exit(2);
    }

    info!("starting TLS certificate check");

    let zone = DisplayZone::resolve(&settings.display.timezone);
    let reports = scan_sites(&settings.sites, &settings.alert);
    let checked_at = Utc::now();

    let text_report = report::text::render(&reports, checked_at, &zone);
    println!("\n{}", text_report);

    if settings.email.enabled {
        let html_report = report::html::render(&reports, checked_at, &zone);
        match email::send_report(&settings.email, &text_report, &html_report) {
            Ok(()) => info!("report email sent"),
            Err(err) => error!(error = %err, "email delivery failed"),
        }
    } else {
        info!("email notifications disabled");
    }

    if let Err(err) = webhook::send_notification(&settings.webhook, &reports, &zone, Utc::now()) {
        error!(error = %err, "webhook dispatch failed");
    }

    info!("TLS certificate check finished");

    let has_issues = reports.iter().any(|report| report.status != Status::Ok);
    exit(if has_issues { 1 } else { 0 });
}
