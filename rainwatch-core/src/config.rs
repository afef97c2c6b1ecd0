use anyhow::{Context, Result, anyhow, bail};
use serde::{Deserialize, Serialize};

use crate::model::WatchedLocation;

/// Watchlist compiled into the binary.
const EMBEDDED_WATCHLIST: &str = include_str!("../watchlist.toml");

pub const API_KEY_VAR: &str = "OPENWEATHER_API_KEY";
pub const EMAIL_ADDRESS_VAR: &str = "EMAIL_ADDRESS";
pub const EMAIL_PASSWORD_VAR: &str = "EMAIL_PASSWORD";

/// Forecast endpoint settings (without the API key).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSettings {
    pub base_url: String,
    pub units: String,
}

/// Mail relay and addressing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailSettings {
    pub host: String,
    pub port: u16,
    pub subject: String,
    pub recipients: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSettings {
    pub title: String,
}

/// Static part of the configuration.
///
/// Example TOML:
/// [[locations]]
/// name = "Phuket"
/// coordinates = { latitude = 8.0, longitude = 98.2934 }
/// dates = ["2025-05-21"]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Watchlist {
    pub provider: ProviderSettings,
    pub mail: MailSettings,
    pub report: ReportSettings,
    pub locations: Vec<WatchedLocation>,
}

impl Watchlist {
    /// Parse the watchlist baked into the binary.
    pub fn embedded() -> Result<Self> {
        Self::from_toml(EMBEDDED_WATCHLIST).context("Failed to load embedded watchlist")
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let watchlist: Watchlist =
            toml::from_str(contents).context("Failed to parse watchlist TOML")?;
        watchlist.validate()?;
        Ok(watchlist)
    }

    fn validate(&self) -> Result<()> {
        if self.locations.is_empty() {
            bail!("Watchlist has no locations");
        }
        if self.mail.recipients.is_empty() {
            bail!("Watchlist has no mail recipients");
        }

        for location in &self.locations {
            if location.name.trim().is_empty() {
                bail!("Watchlist contains a location without a name");
            }
            if !location.coordinates.is_valid() {
                bail!(
                    "Invalid coordinates for '{}': latitude must be -90 to 90, longitude must be -180 to 180",
                    location.name
                );
            }
            if location.dates.is_empty() {
                bail!("Location '{}' has no watched dates", location.name);
            }
        }

        Ok(())
    }
}

/// SMTP login, sourced from the environment.
#[derive(Clone)]
pub struct MailCredentials {
    pub address: String,
    pub password: String,
}

impl std::fmt::Debug for MailCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailCredentials")
            .field("address", &self.address)
            .field("password", &"***")
            .finish()
    }
}

/// Everything a run needs. Built once in `main` and passed down by reference.
#[derive(Debug, Clone)]
pub struct Config {
    pub watchlist: Watchlist,
    pub api_key: String,
    mail_credentials: Option<MailCredentials>,
}

impl Config {
    /// Load the embedded watchlist and secrets from the process environment.
    pub fn load() -> Result<Self> {
        Self::from_lookup(Watchlist::embedded()?, |name| std::env::var(name).ok())
    }

    /// Build from a watchlist and an environment lookup.
    pub fn from_lookup<F>(watchlist: Watchlist, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let api_key = non_empty(API_KEY_VAR).ok_or_else(|| {
            anyhow!(
                "No OpenWeather API key configured.\n\
                 Hint: export {API_KEY_VAR}=<your key>."
            )
        })?;

        let mail_credentials = match (non_empty(EMAIL_ADDRESS_VAR), non_empty(EMAIL_PASSWORD_VAR)) {
            (Some(address), Some(password)) => Some(MailCredentials { address, password }),
            _ => None,
        };

        Ok(Self { watchlist, api_key, mail_credentials })
    }

    /// Credentials for the mail relay; only required when the report is sent.
    pub fn mail_credentials(&self) -> Result<&MailCredentials> {
        self.mail_credentials.as_ref().ok_or_else(|| {
            anyhow!(
                "No mail credentials configured.\n\
                 Hint: export {EMAIL_ADDRESS_VAR} and {EMAIL_PASSWORD_VAR}."
            )
        })
    }

    pub fn locations(&self) -> &[WatchedLocation] {
        &self.watchlist.locations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Coordinates;
    use chrono::NaiveDate;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |name: &str| map.get(name).cloned()
    }

    const MINIMAL: &str = r#"
        [provider]
        base_url = "http://localhost"
        units = "metric"

        [mail]
        host = "smtp.example.com"
        port = 465
        subject = "Rain"
        recipients = ["a@example.com"]

        [report]
        title = "Test"

        [[locations]]
        name = "Krabi"
        coordinates = { latitude = 8.0863, longitude = 98.9063 }
        dates = ["2025-05-25"]
    "#;

    #[test]
    fn embedded_watchlist_parses() {
        let watchlist = Watchlist::embedded().expect("embedded watchlist must be valid");

        let names: Vec<_> = watchlist.locations.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Phuket", "Krabi"]);
        assert_eq!(watchlist.locations[0].dates.len(), 4);
        assert_eq!(
            watchlist.locations[1].dates[0],
            NaiveDate::from_ymd_opt(2025, 5, 25).unwrap()
        );
        assert_eq!(watchlist.mail.port, 465);
        assert_eq!(watchlist.mail.recipients.len(), 2);
    }

    #[test]
    fn coordinates_parse_from_inline_table() {
        let watchlist = Watchlist::from_toml(MINIMAL).unwrap();
        assert_eq!(
            watchlist.locations[0].coordinates,
            Coordinates { latitude: 8.0863, longitude: 98.9063 }
        );
    }

    #[test]
    fn rejects_flat_coordinates() {
        let flat = MINIMAL.replace(
            "coordinates = { latitude = 8.0863, longitude = 98.9063 }",
            "latitude = 8.0863\n        longitude = 98.9063",
        );
        assert!(Watchlist::from_toml(&flat).is_err());
    }

    #[test]
    fn rejects_out_of_range_coordinates() {
        let bad = MINIMAL.replace("latitude = 8.0863", "latitude = 95.0");
        let err = Watchlist::from_toml(&bad).unwrap_err();
        assert!(err.to_string().contains("Invalid coordinates for 'Krabi'"));
    }

    #[test]
    fn rejects_location_without_dates() {
        let bad = MINIMAL.replace(r#"dates = ["2025-05-25"]"#, "dates = []");
        let err = Watchlist::from_toml(&bad).unwrap_err();
        assert!(err.to_string().contains("has no watched dates"));
    }

    #[test]
    fn rejects_empty_recipients() {
        let bad = MINIMAL.replace(r#"recipients = ["a@example.com"]"#, "recipients = []");
        let err = Watchlist::from_toml(&bad).unwrap_err();
        assert!(err.to_string().contains("no mail recipients"));
    }

    #[test]
    fn api_key_is_required() {
        let watchlist = Watchlist::from_toml(MINIMAL).unwrap();
        let err = Config::from_lookup(watchlist, env(&[])).unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("No OpenWeather API key configured"));
        assert!(msg.contains(API_KEY_VAR));
    }

    #[test]
    fn mail_credentials_are_optional_until_requested() {
        let watchlist = Watchlist::from_toml(MINIMAL).unwrap();
        let cfg = Config::from_lookup(watchlist, env(&[(API_KEY_VAR, "KEY")])).unwrap();

        assert_eq!(cfg.api_key, "KEY");
        let err = cfg.mail_credentials().unwrap_err();
        assert!(err.to_string().contains(EMAIL_PASSWORD_VAR));
    }

    #[test]
    fn blank_variables_count_as_missing() {
        let watchlist = Watchlist::from_toml(MINIMAL).unwrap();
        let cfg = Config::from_lookup(
            watchlist,
            env(&[(API_KEY_VAR, "KEY"), (EMAIL_ADDRESS_VAR, "me@example.com"), (EMAIL_PASSWORD_VAR, " ")]),
        )
        .unwrap();

        assert!(cfg.mail_credentials().is_err());
    }

    #[test]
    fn full_environment_yields_credentials() {
        let watchlist = Watchlist::from_toml(MINIMAL).unwrap();
        let cfg = Config::from_lookup(
            watchlist,
            env(&[
                (API_KEY_VAR, "KEY"),
                (EMAIL_ADDRESS_VAR, "me@example.com"),
                (EMAIL_PASSWORD_VAR, "secret"),
            ]),
        )
        .unwrap();

        let creds = cfg.mail_credentials().expect("credentials must exist");
        assert_eq!(creds.address, "me@example.com");
        assert!(!format!("{creds:?}").contains("secret"));
        assert_eq!(cfg.locations().len(), 1);
    }
}
