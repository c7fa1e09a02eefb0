//! Country and its spoken-language associations, as read from the relational store.

use super::Continent;

/// A language spoken in exactly one country.
#[derive(Debug, Clone, PartialEq)]
pub struct Language {
    pub country_code: String,
    pub language: String,
    pub official: bool,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Country {
    pub code: String,
    pub code_two: String,
    pub name: String,
    pub continent: Continent,
    pub region: String,
    pub surface_area: f64,
    pub population: i64,
    /// May be empty; order carries no meaning.
    pub languages: Vec<Language>,
}
