mod aggregator;
mod config;
mod delivery;
mod models;
mod pipeline;
mod report;
mod sources;
mod utils;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::config::AppConfig;
use crate::pipeline::Pipeline;

#[derive(Parser)]
#[command(name = "ipo-digest", about = "IPO calendar digest for Telegram", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch both IPO calendars, build the digest and send it to every chat
    Send {
        /// Report as if today were this date (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<NaiveDate>,

        /// Print the digest instead of sending it
        #[arg(long)]
        dry_run: bool,
    },

    /// Show the report windows planned for a day (no network)
    Windows {
        /// Day to plan for (YYYY-MM-DD, default: today)
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "ipo_digest=info,warn",
        1 => "ipo_digest=debug,info",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false))
        .with(EnvFilter::new(filter))
        .init();

    match cli.command {
        Command::Send { date, dry_run } => {
            let config = AppConfig::load().context("Invalid configuration")?;
            let today = date.unwrap_or_else(|| Local::now().date_naive());

            let _t = utils::Timer::start(format!("IPO digest for {}", today));
            let pipeline = Pipeline::from_config(&config)?;
            let (digest, report) = pipeline.run(today, dry_run).await;

            info!(
                "{} windows, {} IPOs, {} sources unavailable",
                digest.windows, digest.ipos, digest.failed_sources
            );

            match report {
                None => println!("{}", delivery::truncate_message(&digest.text)),
                Some(report) => {
                    for (chat, e) in &report.failed {
                        warn!("Undelivered: {} ({})", chat, e);
                    }
                    if report.all_failed() {
                        error!("Digest could not be delivered to any destination");
                    }
                }
            }
        }

        Command::Windows { date } => {
            let today = date.unwrap_or_else(|| Local::now().date_naive());
            println!("─────────────────────────────────");
            println!("  Report windows for {}", utils::fmt_day(today));
            println!("─────────────────────────────────");
            for w in report::plan_for(today) {
                println!("  {:<36} {} → {}", w.title, w.start_date, w.end_date);
            }
            println!("─────────────────────────────────");
        }
    }

    Ok(())
}
