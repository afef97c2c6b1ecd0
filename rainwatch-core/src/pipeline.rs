use tracing::{info, warn};

use crate::{
    classify::analyze_rain,
    model::WatchedLocation,
    provider::ForecastProvider,
    report::LocationOutcome,
};

/// Fetch and classify each location in turn.
///
/// A failed fetch is recorded in that location's outcome; the loop always
/// reaches every location.
pub async fn collect_outcomes(
    provider: &dyn ForecastProvider,
    locations: &[WatchedLocation],
) -> Vec<LocationOutcome> {
    let mut outcomes = Vec::with_capacity(locations.len());

    for location in locations {
        let result = provider
            .fetch_forecast(&location.coordinates)
            .await
            .map(|forecast| analyze_rain(&forecast, &location.dates));

        match &result {
            Ok(analysis) => info!(
                location = %location.name,
                rainy_days = analysis.rainy_days,
                "Forecast analysed"
            ),
            Err(err) => warn!(
                location = %location.name,
                kind = err.kind(),
                error = %err,
                "Forecast unavailable"
            ),
        }

        outcomes.push(LocationOutcome { location: location.clone(), result });
    }

    outcomes
}
