//! Weather Integration
//!
//! The temperature tool talks to forecast services through [`WeatherClient`].

mod open_meteo;

pub use open_meteo::{DEFAULT_ENDPOINT, OpenMeteoClient, WeatherConfig};

use async_trait::async_trait;

use crate::error::Result;
use crate::knowledge::Coordinate;

/// Weather client trait (Strategy pattern)
///
/// Implementations must not hold shared mutable state; the temperature tool
/// may call them concurrently.
#[async_trait]
pub trait WeatherClient: Send + Sync {
    /// Current air temperature at 2 m, in degrees Celsius
    async fn current_temperature(&self, at: Coordinate) -> Result<f64>;

    /// Service name
    fn name(&self) -> &str;
}
