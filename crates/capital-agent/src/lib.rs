//! # capital-agent
//!
//! Tools for an agent that answers questions about a handful of countries:
//! capital city, population, the list of known countries, and the current
//! temperature in a capital.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  get_capital_city ─────────┐                                 │
//! │  get_population_country ───┼──▶ WorldFacts (read-only)        │
//! │  get_list_of_countries ────┤                                 │
//! │  get_temperature_for_capital ┴──▶ WeatherClient ──▶ Open-Meteo │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Lookups never fail: a miss is an apology string in the tool result.

pub mod error;
pub mod knowledge;
pub mod svckit;
pub mod weather;

use std::sync::Arc;

use agent_core::{AgentConfig, ToolRegistry};

pub use error::{Result, WeatherError};
pub use knowledge::{Coordinate, KnowledgeTable, WorldFacts, normalize_key};

/// Re-export tools for easy registration
pub mod tools {
    pub use crate::svckit::{
        CapitalLookupTool, CountryListTool, PopulationLookupTool, TemperatureTool,
    };
}

use tools::{CapitalLookupTool, CountryListTool, PopulationLookupTool, TemperatureTool};
use weather::WeatherClient;

pub const AGENT_NAME: &str = "capital_agent";

pub const AGENT_DESCRIPTION: &str =
    "Answers user questions about the capital city, population, and current temperature of a given country/city.";

/// Instruction for the capital agent
pub const CAPITAL_AGENT_PROMPT: &str = "You are an agent that provides the capital city, population, and current temperature of a country. Use the available tools to find the information.";

/// Register the four tools, in the order they are advertised to the model
pub fn build_registry(
    facts: Arc<WorldFacts>,
    weather: Arc<dyn WeatherClient>,
) -> agent_core::Result<ToolRegistry> {
    let mut registry = ToolRegistry::new();

    registry.register(CapitalLookupTool::new(Arc::clone(&facts)))?;
    registry.register(PopulationLookupTool::new(Arc::clone(&facts)))?;
    registry.register(CountryListTool::new(Arc::clone(&facts)))?;
    registry.register(TemperatureTool::new(facts, weather))?;

    Ok(registry)
}

/// Agent configuration with the capital agent's identity
pub fn agent_config() -> AgentConfig {
    AgentConfig {
        name: AGENT_NAME.into(),
        description: AGENT_DESCRIPTION.into(),
        instruction: CAPITAL_AGENT_PROMPT.into(),
        ..Default::default()
    }
}
