use std::fmt::Write as _;

use chrono::NaiveDate;

use crate::{
    classify::{PLAN_B_DAY_THRESHOLD, RAINY_INTERVAL_THRESHOLD, RainAnalysis},
    model::WatchedLocation,
    provider::FetchError,
};

const HEADER_ICON: &str = "\u{1F3D6}\u{FE0F}";
const LOCATION_ICON: &str = "\u{1F4CD}";
const ALL_CLEAR_LINE: &str = "\u{2705} Looks manageable. No immediate need to switch plans.";
const ERROR_ICON: &str = "\u{274C}";

fn plan_b_line() -> String {
    format!(
        "\u{26A0}\u{FE0F} {PLAN_B_DAY_THRESHOLD}+ days show high rain chance. Plan B might be necessary."
    )
}

/// Per-date symbol chosen from the rainy interval count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayIcon {
    Clear,
    Partial,
    Rain,
}

impl DayIcon {
    pub fn from_count(count: u32) -> Self {
        match count {
            0 => DayIcon::Clear,
            n if n >= RAINY_INTERVAL_THRESHOLD => DayIcon::Rain,
            _ => DayIcon::Partial,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            DayIcon::Clear => "\u{2600}\u{FE0F}",
            DayIcon::Partial => "\u{26C5}",
            DayIcon::Rain => "\u{2614}\u{FE0F}",
        }
    }
}

/// Result of fetching and classifying one location.
#[derive(Debug)]
pub struct LocationOutcome {
    pub location: WatchedLocation,
    pub result: Result<RainAnalysis, FetchError>,
}

/// Render the whole report as plain text.
pub fn render_report(title: &str, run_date: NaiveDate, outcomes: &[LocationOutcome]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{HEADER_ICON} {title} \u{2013} {}", run_date.format("%b %d"));
    out.push('\n');

    for outcome in outcomes {
        render_location(&mut out, outcome);
    }

    out
}

fn render_location(out: &mut String, outcome: &LocationOutcome) {
    let location = &outcome.location;
    let dates = location
        .dates
        .iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join(", ");

    let _ = writeln!(out, "\n{LOCATION_ICON} {} ({dates}):", location.name);

    match &outcome.result {
        Ok(analysis) => {
            for date in &location.dates {
                let blocks = analysis.tally.count(*date);
                let icon = DayIcon::from_count(blocks);
                let _ = writeln!(out, "- {date}: {} ({blocks} rainy blocks)", icon.symbol());
            }

            if analysis.needs_plan_b() {
                let _ = writeln!(out, "{}", plan_b_line());
            } else {
                let _ = writeln!(out, "{ALL_CLEAR_LINE}");
            }
        }
        Err(err) => {
            let _ = writeln!(
                out,
                "{ERROR_ICON} Forecast unavailable ({}): {}",
                err.kind(),
                err.summary()
            );
        }
    }
}
