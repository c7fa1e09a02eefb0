//! The denormalized cache value: one city with its country and languages inlined.
//!
//! Records are stored as JSON with stable camelCase field names, e.g.
//!
//! ```text
//! {"id":1,"name":"Kabul","population":1780000,"district":"Kabol",
//!  "countryCode":"AFG","codeTwo":"AF","countryName":"Afghanistan",
//!  "continent":"Asia","region":"Southern and Central Asia",
//!  "surfaceArea":652090.0,"countryPopulation":22720000,
//!  "languages":[{"language":"Pashto","official":true,"percentage":52.4}]}
//! ```

use super::Continent;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LanguageRecord {
    pub language: String,
    pub official: bool,
    pub percentage: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FlatRecord {
    pub id: i32,
    pub name: String,
    pub population: i32,
    pub district: String,
    pub country_code: String,
    pub code_two: String,
    pub country_name: String,
    pub continent: Continent,
    pub region: String,
    pub surface_area: f64,
    pub country_population: i64,
    /// Sorted by language name; empty when the country has none.
    pub languages: Vec<LanguageRecord>,
}

/// A single record could not be encoded or decoded.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("record {id}: field '{field}' is not a finite number")]
    NonFinite { id: i32, field: String },
    #[error("malformed record: {0}")]
    Json(#[from] serde_json::Error),
}

impl FlatRecord {
    /// Cache key: the decimal id.
    pub fn key(&self) -> String {
        self.id.to_string()
    }

    /// JSON text for the cache.
    ///
    /// JSON has no NaN or infinity, so those are rejected instead of being
    /// silently written as `null` (which would not decode back).
    pub fn encode(&self) -> Result<String, RecordError> {
        self.check_finite()?;
        Ok(serde_json::to_string(self)?)
    }

    pub fn decode(text: &str) -> Result<Self, RecordError> {
        Ok(serde_json::from_str(text)?)
    }

    fn check_finite(&self) -> Result<(), RecordError> {
        if !self.surface_area.is_finite() {
            return Err(RecordError::NonFinite {
                id: self.id,
                field: "surfaceArea".to_string(),
            });
        }
        if let Some(lang) = self.languages.iter().find(|l| !l.percentage.is_finite()) {
            return Err(RecordError::NonFinite {
                id: self.id,
                field: format!("languages[{}].percentage", lang.language),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kabul() -> FlatRecord {
        FlatRecord {
            id: 1,
            name: "Kabul".to_string(),
            population: 1_780_000,
            district: "Kabol".to_string(),
            country_code: "AFG".to_string(),
            code_two: "AF".to_string(),
            country_name: "Afghanistan".to_string(),
            continent: Continent::Asia,
            region: "Southern and Central Asia".to_string(),
            surface_area: 652_090.0,
            country_population: 22_720_000,
            languages: vec![
                LanguageRecord {
                    language: "Dari".to_string(),
                    official: true,
                    percentage: 32.1,
                },
                LanguageRecord {
                    language: "Pashto".to_string(),
                    official: true,
                    percentage: 52.4,
                },
            ],
        }
    }

    #[test]
    fn encodes_stable_field_names() {
        let json: serde_json::Value = serde_json::from_str(&kabul().encode().unwrap()).unwrap();
        let obj = json.as_object().unwrap();
        let mut keys: Vec<&str> = obj.keys().map(String::as_str).collect();
        keys.sort();
        assert_eq!(
            keys,
            vec![
                "codeTwo",
                "continent",
                "countryCode",
                "countryName",
                "countryPopulation",
                "district",
                "id",
                "languages",
                "name",
                "population",
                "region",
                "surfaceArea",
            ]
        );
        assert_eq!(obj["languages"][1]["language"], "Pashto");
        assert_eq!(obj["languages"][1]["official"], true);
        assert_eq!(obj["continent"], "Asia");
    }

    #[test]
    fn decode_restores_every_field() {
        let record = kabul();
        let decoded = FlatRecord::decode(&record.encode().unwrap()).unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn empty_languages_encode_as_empty_array() {
        let mut record = kabul();
        record.languages.clear();
        let text = record.encode().unwrap();
        assert!(text.contains("\"languages\":[]"), "got {text}");
        assert!(FlatRecord::decode(&text).unwrap().languages.is_empty());
    }

    #[test]
    fn non_finite_surface_area_is_rejected() {
        let mut record = kabul();
        record.surface_area = f64::NAN;
        match record.encode() {
            Err(RecordError::NonFinite { id, field }) => {
                assert_eq!(id, 1);
                assert_eq!(field, "surfaceArea");
            }
            other => panic!("expected NonFinite, got {other:?}"),
        }
    }

    #[test]
    fn non_finite_percentage_is_rejected() {
        let mut record = kabul();
        record.languages[0].percentage = f64::INFINITY;
        assert!(matches!(
            record.encode(),
            Err(RecordError::NonFinite { .. })
        ));
    }

    #[test]
    fn decode_rejects_missing_fields() {
        let err = FlatRecord::decode(r#"{"id":1,"name":"Kabul"}"#).unwrap_err();
        assert!(matches!(err, RecordError::Json(_)));
    }

    #[test]
    fn key_is_decimal_id() {
        let mut record = kabul();
        record.id = 2545;
        assert_eq!(record.key(), "2545");
    }
}
