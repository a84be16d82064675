//! Country List Tool

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use agent_core::{NoArgs, ToolResult, ToolSchema, TypedTool};

use crate::knowledge::WorldFacts;

pub const NAME: &str = "get_list_of_countries";

/// Lists the countries the other tools can answer for
pub struct CountryListTool {
    facts: Arc<WorldFacts>,
}

impl CountryListTool {
    pub const fn new(facts: Arc<WorldFacts>) -> Self {
        Self { facts }
    }

    pub fn list(&self) -> ToolResult {
        let countries = self.facts.countries();
        let data = Value::Array(countries.iter().cloned().map(Value::String).collect());

        ToolResult::found(NAME, countries.join(", ")).with_data(data)
    }
}

#[async_trait]
impl TypedTool for CountryListTool {
    type Args = NoArgs;

    fn definition(&self) -> ToolSchema {
        ToolSchema {
            name: NAME.into(),
            description: "Retrieves the list of countries for which we can provide the capital, population, and temperature.".into(),
            parameters: Vec::new(),
            category: Some("geography".into()),
            has_side_effects: false,
        }
    }

    async fn run(&self, _args: NoArgs) -> ToolResult {
        self.list()
    }
}
