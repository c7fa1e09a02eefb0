//! Data types - the relational world entities and the flattened cache value.

mod city;
mod continent;
mod country;
mod flat_record;

pub use city::City;
pub use continent::{Continent, UnknownContinent};
pub use country::{Country, Language};
pub use flat_record::{FlatRecord, LanguageRecord, RecordError};
