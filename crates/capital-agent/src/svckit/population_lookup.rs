//! Population Lookup Tool

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use agent_core::{ParameterSchema, ToolResult, ToolSchema, TypedTool};

use crate::knowledge::WorldFacts;

pub const NAME: &str = "get_population_country";

#[derive(Debug, Deserialize)]
pub struct PopulationArgs {
    /// The country to get the population of
    pub country: String,
}

pub struct PopulationLookupTool {
    facts: Arc<WorldFacts>,
}

impl PopulationLookupTool {
    pub const fn new(facts: Arc<WorldFacts>) -> Self {
        Self { facts }
    }

    pub fn lookup(&self, country: &str) -> ToolResult {
        match self.facts.populations.get(country) {
            Some(population) => ToolResult::found(NAME, population.as_str()),
            None => ToolResult::not_found(
                NAME,
                format!("Sorry, I don't know the population number of {country}."),
            ),
        }
    }
}

#[async_trait]
impl TypedTool for PopulationLookupTool {
    type Args = PopulationArgs;

    fn definition(&self) -> ToolSchema {
        ToolSchema {
            name: NAME.into(),
            description: "Retrieves the population number for a given country.".into(),
            parameters: vec![ParameterSchema::required_string(
                "country",
                "The country to get the population of.",
            )],
            category: Some("geography".into()),
            has_side_effects: false,
        }
    }

    async fn run(&self, args: PopulationArgs) -> ToolResult {
        self.lookup(&args.country)
    }
}
