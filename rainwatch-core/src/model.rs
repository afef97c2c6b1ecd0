use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// A named place and the trip dates we care about there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchedLocation {
    pub name: String,
    pub coordinates: Coordinates,
    /// Rendered in this order.
    pub dates: Vec<NaiveDate>,
}

/// One 3-hour forecast sample.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastInterval {
    pub timestamp: NaiveDateTime,
    /// Rain volume for the interval in mm, if the provider reported any.
    pub rain_3h_mm: Option<f64>,
}

impl ForecastInterval {
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    pub fn has_rain(&self) -> bool {
        self.rain_3h_mm.is_some_and(|mm| mm > 0.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Forecast {
    pub intervals: Vec<ForecastInterval>,
}

/// Number of rain-bearing intervals per calendar date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RainTally {
    counts: BTreeMap<NaiveDate, u32>,
}

impl RainTally {
    pub fn record(&mut self, date: NaiveDate) {
        *self.counts.entry(date).or_insert(0) += 1;
    }

    /// Dates never recorded count as zero.
    pub fn count(&self, date: NaiveDate) -> u32 {
        self.counts.get(&date).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, u32)> + '_ {
        self.counts.iter().map(|(date, count)| (*date, *count))
    }
}
