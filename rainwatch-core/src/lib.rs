//! Core library for the `rainwatch` daily rain report.
//!
//! This crate defines:
//! - The compiled-in watchlist and secrets from the environment
//! - The OpenWeather forecast client
//! - Rain-day classification and report rendering
//! - Email delivery
//!
//! It is used by `rainwatch-cli`.

pub mod classify;
pub mod config;
pub mod model;
pub mod notify;
pub mod pipeline;
pub mod provider;
pub mod report;

pub use classify::{PLAN_B_DAY_THRESHOLD, RAINY_INTERVAL_THRESHOLD, RainAnalysis, analyze_rain};
pub use config::{Config, MailCredentials, Watchlist};
pub use model::{Coordinates, Forecast, ForecastInterval, RainTally, WatchedLocation};
pub use notify::{Notifier, NotifyError};
pub use pipeline::collect_outcomes;
pub use provider::{FetchError, ForecastProvider, OpenWeatherProvider};
pub use report::{DayIcon, LocationOutcome, render_report};
