//! Capital Temperature Tool
//!
//! Resolves a city through the coordinate table and asks the weather client
//! for the current temperature. Every failure comes back as a normal result
//! with a message; nothing here returns an error to the registry.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use agent_core::{ParameterSchema, ToolResult, ToolSchema, TypedTool};

use crate::knowledge::WorldFacts;
use crate::weather::WeatherClient;

pub const NAME: &str = "get_temperature_for_capital";

#[derive(Debug, Deserialize)]
pub struct TemperatureArgs {
    /// The capital city to get the temperature of
    pub city: String,
}

pub struct TemperatureTool {
    facts: Arc<WorldFacts>,
    weather: Arc<dyn WeatherClient>,
}

impl TemperatureTool {
    pub fn new(facts: Arc<WorldFacts>, weather: Arc<dyn WeatherClient>) -> Self {
        Self { facts, weather }
    }

    pub async fn temperature_for(&self, city: &str) -> ToolResult {
        let Some(&coordinate) = self.facts.coordinates.get(city) else {
            return ToolResult::not_found(
                NAME,
                format!("Sorry, I don't have coordinates for {city}."),
            );
        };

        match self.weather.current_temperature(coordinate).await {
            Ok(celsius) => ToolResult::found(
                NAME,
                format!("The current temperature in {city} is {celsius:.1}°C."),
            ),
            Err(e) => {
                tracing::warn!(city, client = self.weather.name(), error = %e, "Weather lookup failed");
                ToolResult::failure(NAME, e.to_string())
            }
        }
    }
}

#[async_trait]
impl TypedTool for TemperatureTool {
    type Args = TemperatureArgs;

    fn definition(&self) -> ToolSchema {
        ToolSchema {
            name: NAME.into(),
            description: "Retrieves the current temperature for a given capital city.".into(),
            parameters: vec![ParameterSchema::required_string(
                "city",
                "The capital city to get the temperature of.",
            )],
            category: Some("weather".into()),
            has_side_effects: false,
        }
    }

    async fn run(&self, args: TemperatureArgs) -> ToolResult {
        self.temperature_for(&args.city).await
    }
}
