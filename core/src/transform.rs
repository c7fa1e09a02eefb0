//! Flattening of the relational city/country/language graph into cache records.
//!
//! Everything here is pure: inputs are borrowed, outputs are owned copies, so a
//! record stays valid after the relational transaction that produced its inputs
//! has ended.

use crate::types::{City, Country, FlatRecord, Language, LanguageRecord};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransformError {
    #[error("city {city_id} references unknown country '{country_code}'")]
    UnknownCountry { city_id: i32, country_code: String },
}

fn language_record(language: &Language) -> LanguageRecord {
    LanguageRecord {
        language: language.language.clone(),
        official: language.official,
        percentage: language.percentage,
    }
}

/// Builds the cache record for one city and the country it belongs to.
pub fn flatten(city: &City, country: &Country) -> FlatRecord {
    let mut languages: Vec<LanguageRecord> = country.languages.iter().map(language_record).collect();
    languages.sort_by(|a, b| a.language.cmp(&b.language));

    FlatRecord {
        id: city.id,
        name: city.name.clone(),
        population: city.population,
        district: city.district.clone(),
        country_code: country.code.clone(),
        code_two: country.code_two.clone(),
        country_name: country.name.clone(),
        continent: country.continent,
        region: country.region.clone(),
        surface_area: country.surface_area,
        country_population: country.population,
        languages,
    }
}

/// Flattens every city, in input order.
///
/// Fails on the first city whose country code is not among `countries`.
pub fn flatten_all(cities: &[City], countries: &[Country]) -> Result<Vec<FlatRecord>, TransformError> {
    let by_code: HashMap<&str, &Country> = countries.iter().map(|c| (c.code.as_str(), c)).collect();

    cities
        .iter()
        .map(|city| {
            by_code
                .get(city.country_code.as_str())
                .map(|country| flatten(city, country))
                .ok_or_else(|| TransformError::UnknownCountry {
                    city_id: city.id,
                    country_code: city.country_code.clone(),
                })
        })
        .collect()
}
