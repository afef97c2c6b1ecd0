use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::{
    config::ProviderSettings,
    model::{Coordinates, Forecast, ForecastInterval},
};

use super::{FetchError, ForecastProvider};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = concat!("rainwatch/", env!("CARGO_PKG_VERSION"));
const DT_TXT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Client for the OpenWeather 5 day / 3 hour forecast endpoint.
#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    settings: ProviderSettings,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(settings: ProviderSettings, api_key: String) -> Result<Self, FetchError> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| FetchError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { api_key, settings, http })
    }

    fn forecast_url(&self) -> String {
        format!("{}/forecast", self.settings.base_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OwCode {
    Number(i64),
    Text(String),
}

impl OwCode {
    fn as_string(&self) -> String {
        match self {
            OwCode::Number(n) => n.to_string(),
            OwCode::Text(s) => s.clone(),
        }
    }

    fn is_ok(&self) -> bool {
        self.as_string() == "200"
    }
}

#[derive(Debug, Deserialize)]
struct OwRain {
    #[serde(rename = "3h")]
    three_hours: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: Option<i64>,
    dt_txt: Option<String>,
    rain: Option<OwRain>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    cod: Option<OwCode>,
    message: Option<serde_json::Value>,
    list: Option<Vec<OwForecastEntry>>,
}

#[derive(Debug, Deserialize)]
struct OwErrorBody {
    message: Option<serde_json::Value>,
}

#[async_trait]
impl ForecastProvider for OpenWeatherProvider {
    async fn fetch_forecast(&self, coordinates: &Coordinates) -> Result<Forecast, FetchError> {
        let url = self.forecast_url();
        debug!(url = %url, lat = coordinates.latitude, lon = coordinates.longitude, "Fetching forecast");

        let lat = coordinates.latitude.to_string();
        let lon = coordinates.longitude.to_string();

        let res = self
            .http
            .get(&url)
            .query(&[
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
                ("appid", self.api_key.as_str()),
                ("units", self.settings.units.as_str()),
            ])
            .send()
            .await
            .map_err(|e| FetchError::Transport(format!("failed to reach OpenWeather: {e}")))?;

        let status = res.status();
        let body = res.text().await.map_err(|e| {
            FetchError::Transport(format!("failed to read OpenWeather response body: {e}"))
        })?;

        if !status.is_success() {
            let message = serde_json::from_str::<OwErrorBody>(&body)
                .ok()
                .and_then(|b| b.message)
                .map(|m| message_text(&m))
                .unwrap_or_else(|| truncate_body(&body));

            return Err(FetchError::Provider { code: status.as_u16().to_string(), message });
        }

        parse_forecast(&body)
    }
}

/// Turn a forecast response body into intervals.
fn parse_forecast(body: &str) -> Result<Forecast, FetchError> {
    let parsed: OwForecastResponse = serde_json::from_str(body).map_err(|e| {
        FetchError::InvalidPayload(format!("{e} in body: {}", truncate_body(body)))
    })?;

    if let Some(cod) = parsed.cod.as_ref().filter(|c| !c.is_ok()) {
        return Err(FetchError::Provider {
            code: cod.as_string(),
            message: parsed.message.as_ref().map(message_text).unwrap_or_default(),
        });
    }

    let list = parsed
        .list
        .ok_or_else(|| FetchError::InvalidPayload("response has no 'list' field".to_string()))?;

    if list.is_empty() {
        return Err(FetchError::InvalidPayload(
            "OpenWeather forecast response contained no data".to_string(),
        ));
    }

    let intervals = list
        .into_iter()
        .map(|entry| {
            Ok(ForecastInterval {
                timestamp: entry_timestamp(&entry)?,
                rain_3h_mm: entry.rain.and_then(|r| r.three_hours),
            })
        })
        .collect::<Result<Vec<_>, FetchError>>()?;

    Ok(Forecast { intervals })
}

fn entry_timestamp(entry: &OwForecastEntry) -> Result<NaiveDateTime, FetchError> {
    if let Some(txt) = &entry.dt_txt {
        return NaiveDateTime::parse_from_str(txt, DT_TXT_FORMAT)
            .map_err(|e| FetchError::InvalidPayload(format!("bad dt_txt '{txt}': {e}")));
    }

    entry
        .dt
        .and_then(|ts| DateTime::from_timestamp(ts, 0))
        .map(|dt| dt.naive_utc())
        .ok_or_else(|| FetchError::InvalidPayload("forecast entry has no timestamp".to_string()))
}

fn message_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}
