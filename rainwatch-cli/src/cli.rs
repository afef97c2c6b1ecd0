use anyhow::Context;
use chrono::Local;
use clap::{Parser, Subcommand};
use rainwatch_core::{Config, Notifier, OpenWeatherProvider, collect_outcomes, render_report};
use tracing::info;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "rainwatch", version, about = "Daily rain report for watched trip dates")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Build today's report and email it to the recipients.
    Send {
        /// Also print the report to stdout before sending.
        #[arg(long)]
        print: bool,
    },

    /// Build today's report and print it without sending anything.
    Preview,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = Config::load()?;

        match self.command {
            Command::Send { print } => {
                // Credentials are checked before any forecast request goes out.
                let credentials = config.mail_credentials()?.clone();

                let report = build_report(&config).await?;
                if print {
                    println!("{report}");
                }

                let notifier = Notifier::new(config.watchlist.mail.clone(), credentials);
                notifier.send(&report).await.context("Failed to email the weather report")?;
            }
            Command::Preview => {
                let report = build_report(&config).await?;
                println!("{report}");
            }
        }

        Ok(())
    }
}

async fn build_report(config: &Config) -> anyhow::Result<String> {
    let provider =
        OpenWeatherProvider::new(config.watchlist.provider.clone(), config.api_key.clone())
            .context("Failed to set up the forecast client")?;

    info!(locations = config.locations().len(), "Checking forecasts");
    let outcomes = collect_outcomes(&provider, config.locations()).await;

    let today = Local::now().date_naive();
    Ok(render_report(&config.watchlist.report.title, today, &outcomes))
}
