//! Rain-day classification.
//!
//! A watched date is *rainy* once enough of its 3-hour intervals carry rain,
//! and a location needs a plan B once enough of its watched dates are rainy.

use chrono::NaiveDate;

use crate::model::{Forecast, RainTally};

/// Rain-bearing intervals needed before a date counts as rainy.
pub const RAINY_INTERVAL_THRESHOLD: u32 = 2;

/// Rainy dates needed before a location gets the plan B warning.
pub const PLAN_B_DAY_THRESHOLD: usize = 2;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RainAnalysis {
    /// Only watched dates with at least one rainy interval appear here.
    pub tally: RainTally,
    /// How many watched dates reached [`RAINY_INTERVAL_THRESHOLD`].
    pub rainy_days: usize,
}

impl RainAnalysis {
    pub fn needs_plan_b(&self) -> bool {
        self.rainy_days >= PLAN_B_DAY_THRESHOLD
    }
}

pub fn is_rainy(count: u32) -> bool {
    count >= RAINY_INTERVAL_THRESHOLD
}

/// Count rainy intervals on each watched date.
///
/// Intervals outside `dates` are ignored and watched dates missing from the
/// forecast simply stay at zero.
pub fn analyze_rain(forecast: &Forecast, dates: &[NaiveDate]) -> RainAnalysis {
    let mut tally = RainTally::default();

    for interval in &forecast.intervals {
        let date = interval.date();
        if dates.contains(&date) && interval.has_rain() {
            tally.record(date);
        }
    }

    let rainy_days = tally.iter().filter(|(_, count)| is_rainy(*count)).count();

    RainAnalysis { tally, rainy_days }
}
