//! Open-Meteo forecast client

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use super::WeatherClient;
use crate::error::{Result, WeatherError};
use crate::knowledge::Coordinate;

pub const DEFAULT_ENDPOINT: &str = "https://api.open-meteo.com/v1/forecast";

/// Request policy for the forecast call
#[derive(Clone, Debug)]
pub struct WeatherConfig {
    /// Forecast endpoint, without query string
    pub endpoint: String,

    /// Whole-request deadline; `None` disables it
    pub timeout: Option<Duration>,

    /// Extra attempts after a transient failure
    pub max_retries: u32,

    /// Delay before the first retry, doubled for each further one
    pub retry_backoff: Duration,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.into(),
            timeout: Some(Duration::from_secs(10)),
            max_retries: 1,
            retry_backoff: Duration::from_millis(250),
        }
    }
}

impl WeatherConfig {
    /// Read overrides from `OPEN_METEO_URL`, `WEATHER_TIMEOUT_SECS` (0 turns
    /// the timeout off), `WEATHER_MAX_RETRIES` and `WEATHER_RETRY_BACKOFF_MS`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let endpoint = lookup("OPEN_METEO_URL")
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or(defaults.endpoint);

        let timeout = match parse_var::<u64>(&lookup, "WEATHER_TIMEOUT_SECS")? {
            Some(0) => None,
            Some(secs) => Some(Duration::from_secs(secs)),
            None => defaults.timeout,
        };
        let max_retries =
            parse_var(&lookup, "WEATHER_MAX_RETRIES")?.unwrap_or(defaults.max_retries);
        let retry_backoff = parse_var(&lookup, "WEATHER_RETRY_BACKOFF_MS")?
            .map_or(defaults.retry_backoff, Duration::from_millis);

        Ok(Self {
            endpoint,
            timeout,
            max_retries,
            retry_backoff,
        })
    }

    /// Forecast URL asking only for the current 2 m temperature
    pub fn forecast_url(&self, at: Coordinate) -> String {
        format!(
            "{}?latitude={:.6}&longitude={:.6}&current=temperature_2m",
            self.endpoint, at.latitude, at.longitude
        )
    }

    fn backoff_for(&self, attempt: u32) -> Duration {
        self.retry_backoff
            .saturating_mul(2u32.saturating_pow(attempt))
    }
}

/// An unset variable is `None`; a set but unparseable one is an error
fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>> {
    lookup(key)
        .map(|raw| {
            raw.trim().parse().map_err(|_| {
                WeatherError::Config(format!(
                    "{key} must be a non-negative whole number, got '{raw}'"
                ))
            })
        })
        .transpose()
}

#[derive(Debug, Deserialize)]
struct MeteoResponse {
    current: CurrentConditions,
}

#[derive(Debug, Deserialize)]
struct CurrentConditions {
    temperature_2m: f64,
}

/// Client for `api.open-meteo.com`
pub struct OpenMeteoClient {
    http: reqwest::Client,
    config: WeatherConfig,
}

impl OpenMeteoClient {
    pub fn new(config: WeatherConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| WeatherError::Config(e.to_string()))?;

        Ok(Self { http, config })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(WeatherConfig::from_env()?)
    }

    pub const fn config(&self) -> &WeatherConfig {
        &self.config
    }

    async fn fetch_once(&self, url: &str) -> Result<f64> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(WeatherError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(WeatherError::Status(status));
        }

        let body = response.bytes().await.map_err(WeatherError::Body)?;
        let parsed: MeteoResponse = serde_json::from_slice(&body)?;

        Ok(parsed.current.temperature_2m)
    }
}

#[async_trait]
impl WeatherClient for OpenMeteoClient {
    async fn current_temperature(&self, at: Coordinate) -> Result<f64> {
        let url = self.config.forecast_url(at);
        let mut attempt = 0;

        loop {
            match self.fetch_once(&url).await {
                Err(e) if e.is_transient() && attempt < self.config.max_retries => {
                    let delay = self.config.backoff_for(attempt);
                    tracing::warn!(
                        attempt = attempt + 1,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %e,
                        "Retrying weather request"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                outcome => return outcome,
            }
        }
    }

    fn name(&self) -> &str {
        "Open-Meteo"
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn from_vars(vars: &[(&str, &str)]) -> Result<WeatherConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        WeatherConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_env_defaults() {
        let config = from_vars(&[]).unwrap();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.timeout, Some(Duration::from_secs(10)));
        assert_eq!(config.max_retries, 1);
        assert_eq!(config.retry_backoff, Duration::from_millis(250));
    }

    #[test]
    fn test_env_overrides() {
        let config = from_vars(&[
            ("OPEN_METEO_URL", "http://127.0.0.1:9000/v1/forecast/"),
            ("WEATHER_TIMEOUT_SECS", "3"),
            ("WEATHER_MAX_RETRIES", " 4 "),
            ("WEATHER_RETRY_BACKOFF_MS", "50"),
        ])
        .unwrap();

        assert_eq!(config.endpoint, "http://127.0.0.1:9000/v1/forecast");
        assert_eq!(config.timeout, Some(Duration::from_secs(3)));
        assert_eq!(config.max_retries, 4);
        assert_eq!(config.retry_backoff, Duration::from_millis(50));
        assert!(
            config
                .forecast_url(Coordinate::new(1.0, 2.0))
                .starts_with("http://127.0.0.1:9000/v1/forecast?latitude=")
        );
    }

    #[test]
    fn test_zero_timeout_disables_deadline() {
        let config = from_vars(&[("WEATHER_TIMEOUT_SECS", "0")]).unwrap();
        assert!(config.timeout.is_none());
    }

    #[test]
    fn test_rejects_unparseable_values() {
        for (key, raw) in [
            ("WEATHER_TIMEOUT_SECS", "ten"),
            ("WEATHER_MAX_RETRIES", "-1"),
            ("WEATHER_RETRY_BACKOFF_MS", "1.5"),
        ] {
            let err = from_vars(&[(key, raw)]).unwrap_err();
            assert!(matches!(err, WeatherError::Config(_)), "{key}={raw}");
            assert!(err.to_string().contains(key));
        }
    }

    #[test]
    fn test_forecast_url() {
        let config = WeatherConfig::default();
        assert_eq!(
            config.forecast_url(Coordinate::new(48.85, 2.35)),
            "https://api.open-meteo.com/v1/forecast?latitude=48.850000&longitude=2.350000&current=temperature_2m"
        );
    }

    #[test]
    fn test_negative_longitude_in_url() {
        let url = WeatherConfig::default().forecast_url(Coordinate::new(45.42, -75.69));
        assert!(url.contains("longitude=-75.690000"));
    }

    #[test]
    fn test_backoff_doubles() {
        let config = WeatherConfig {
            retry_backoff: Duration::from_millis(100),
            ..Default::default()
        };
        assert_eq!(config.backoff_for(0), Duration::from_millis(100));
        assert_eq!(config.backoff_for(2), Duration::from_millis(400));
    }

    #[test]
    fn test_default_policy_is_bounded() {
        let config = WeatherConfig::default();
        assert_eq!(config.timeout, Some(Duration::from_secs(10)));
        assert_eq!(config.max_retries, 1);
    }
}
