//! Service Kit - Agent Tools
//!
//! Domain tools implementing `agent_core::TypedTool` over the shared
//! [`WorldFacts`](crate::knowledge::WorldFacts) tables.

mod capital_lookup;
mod country_list;
mod population_lookup;
mod temperature;

pub use capital_lookup::{CapitalArgs, CapitalLookupTool};
pub use country_list::CountryListTool;
pub use population_lookup::{PopulationArgs, PopulationLookupTool};
pub use temperature::{TemperatureArgs, TemperatureTool};
