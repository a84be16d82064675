//! Capital City Lookup Tool

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use agent_core::{ParameterSchema, ToolResult, ToolSchema, TypedTool};

use crate::knowledge::WorldFacts;

pub const NAME: &str = "get_capital_city";

#[derive(Debug, Deserialize)]
pub struct CapitalArgs {
    /// The country to get the capital of
    pub country: String,
}

/// Tool answering "what is the capital of X"
pub struct CapitalLookupTool {
    facts: Arc<WorldFacts>,
}

impl CapitalLookupTool {
    pub const fn new(facts: Arc<WorldFacts>) -> Self {
        Self { facts }
    }

    pub fn lookup(&self, country: &str) -> ToolResult {
        match self.facts.capitals.get(country) {
            Some(capital) => ToolResult::found(NAME, capital.as_str()),
            None => ToolResult::not_found(
                NAME,
                format!("Sorry, I don't know the capital of {country}."),
            ),
        }
    }
}

#[async_trait]
impl TypedTool for CapitalLookupTool {
    type Args = CapitalArgs;

    fn definition(&self) -> ToolSchema {
        ToolSchema {
            name: NAME.into(),
            description: "Retrieves the capital city for a given country.".into(),
            parameters: vec![ParameterSchema::required_string(
                "country",
                "The country to get the capital of.",
            )],
            category: Some("geography".into()),
            has_side_effects: false,
        }
    }

    async fn run(&self, args: CapitalArgs) -> ToolResult {
        self.lookup(&args.country)
    }
}

#[cfg(test)]
mod tests {
    use agent_core::ResultStatus;

    use super::*;

    fn tool() -> CapitalLookupTool {
        CapitalLookupTool::new(Arc::new(WorldFacts::builtin()))
    }

    #[test]
    fn test_known_countries_any_casing() {
        let tool = tool();
        let cases = [
            ("france", "Paris"),
            ("JAPAN", "Tokyo"),
            ("  Canada  ", "Ottawa"),
            ("PorTugal", "Lisbon"),
        ];

        for (input, expected) in cases {
            let result = tool.lookup(input);
            assert_eq!(result.result, expected, "input {input:?}");
            assert_eq!(result.status, ResultStatus::Found);
        }
    }

    #[test]
    fn test_unknown_country_echoes_original_input() {
        let result = tool().lookup("  Atlantis");

        assert_eq!(result.result, "Sorry, I don't know the capital of   Atlantis.");
        assert_eq!(result.status, ResultStatus::NotFound);
    }

    #[test]
    fn test_lookup_is_idempotent() {
        let tool = tool();
        assert_eq!(tool.lookup("Japan").result, tool.lookup("Japan").result);
        assert_eq!(tool.lookup("Mars").result, tool.lookup("Mars").result);
    }
}
