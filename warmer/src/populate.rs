//! Synthetic world data for seeding an empty database and for tests.
//!
//! Uses a fixed seed so every run produces the same world.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use world_core::types::{City, Continent, Country, Language};

const SEED: u64 = 0x57_0E1D_CAFE_2024;

const LANGUAGES: [&str; 16] = [
    "Arabic", "Bengali", "Dutch", "English", "French", "German", "Hindi", "Italian", "Japanese",
    "Korean", "Portuguese", "Russian", "Spanish", "Swahili", "Turkish", "Urdu",
];

const REGIONS: [&str; 8] = [
    "Caribbean",
    "Eastern Asia",
    "Eastern Europe",
    "Middle East",
    "Nordic Countries",
    "Polynesia",
    "Southern and Central Asia",
    "Western Africa",
];

/// Size of the generated world.
#[derive(Debug, Clone, Copy)]
pub struct WorldParams {
    pub countries: usize,
    pub cities: usize,
    pub max_languages: usize,
    /// Every n-th country gets no languages at all (0 disables).
    pub languageless_every: usize,
}

impl WorldParams {
    /// Roughly the shape of the classic `world` sample database.
    pub fn standard() -> Self {
        Self {
            countries: 239,
            cities: 4079,
            max_languages: 6,
            languageless_every: 30,
        }
    }

    pub fn small() -> Self {
        Self {
            countries: 12,
            cities: 1200,
            max_languages: 4,
            languageless_every: 5,
        }
    }
}

pub struct WorldData {
    pub countries: Vec<Country>,
    pub cities: Vec<City>,
}

/// Three-letter code for the n-th country: `AAA`, `AAB`, ...
fn country_code(n: usize) -> String {
    let letter = |i: usize| char::from(b'A' + (i % 26) as u8);
    [letter(n / 676), letter(n / 26), letter(n)].iter().collect()
}

fn languages_for(rng: &mut StdRng, code: &str, count: usize) -> Vec<Language> {
    let mut remaining = 100.0_f64;
    LANGUAGES
        .choose_multiple(rng, count)
        .enumerate()
        .map(|(i, name)| {
            let share = if i + 1 == count {
                remaining
            } else {
                (remaining * rng.gen_range(0.3..0.8) * 10.0).round() / 10.0
            };
            remaining = ((remaining - share) * 10.0).round() / 10.0;
            Language {
                country_code: code.to_string(),
                language: name.to_string(),
                official: i == 0,
                percentage: share,
            }
        })
        .collect()
}

/// Generate a deterministic world. City ids start at 1 and are contiguous.
pub fn generate_synthetic(params: &WorldParams) -> WorldData {
    let mut rng = StdRng::seed_from_u64(SEED);

    let countries: Vec<Country> = (0..params.countries)
        .map(|n| {
            let code = country_code(n);
            let language_count = if params.languageless_every != 0 && n % params.languageless_every == 0 {
                0
            } else {
                rng.gen_range(1..=params.max_languages.clamp(1, LANGUAGES.len()))
            };
            Country {
                code_two: code[..2].to_string(),
                name: format!("Country {code}"),
                continent: Continent::ALL[rng.gen_range(0..Continent::ALL.len())],
                region: REGIONS[rng.gen_range(0..REGIONS.len())].to_string(),
                surface_area: f64::from(rng.gen_range(20..17_075_400_u32)),
                population: rng.gen_range(0..1_300_000_000),
                languages: languages_for(&mut rng, &code, language_count),
                code,
            }
        })
        .collect();

    let cities: Vec<City> = if countries.is_empty() {
        Vec::new()
    } else {
        (1..=params.cities)
            .map(|id| City {
                id: id as i32,
                name: format!("city_{id:04}"),
                population: rng.gen_range(1_000..10_500_000),
                district: format!("District {}", rng.gen_range(1..40)),
                country_code: countries[rng.gen_range(0..countries.len())].code.clone(),
            })
            .collect()
    };

    WorldData { countries, cities }
}
