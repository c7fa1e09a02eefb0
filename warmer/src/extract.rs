//! Batched extraction of the whole world database into memory.

use crate::error::Result;
use crate::repository::WorldRepository;
use std::num::NonZeroUsize;
use std::time::Instant;
use world_core::types::{City, Country};

/// Everything read by one extraction.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub countries: Vec<Country>,
    pub cities: Vec<City>,
    /// Number of `get_city_page` calls made.
    pub pages: usize,
}

/// The `(offset, expected_len)` windows needed to cover `total` rows.
///
/// Offsets are `0, page_size, 2 * page_size, ...`; only the last window may be
/// short.
pub fn page_windows(total: usize, page_size: NonZeroUsize) -> impl Iterator<Item = (usize, usize)> {
    let size = page_size.get();
    (0..total)
        .step_by(size)
        .map(move |offset| (offset, size.min(total - offset)))
}

/// Reads all countries (languages included) and all cities, page by page,
/// inside one read transaction so every page sees the same snapshot.
pub fn extract_all(repo: &mut WorldRepository, page_size: NonZeroUsize) -> Result<Extraction> {
    let started = Instant::now();
    let session = repo.read_session()?;

    let countries = session.get_all_countries()?;
    log::info!("Loaded {} countries", countries.len());

    let total = session.get_total_city_count()?;
    log::info!("Extracting {total} cities in pages of {page_size}");

    let mut cities: Vec<City> = Vec::with_capacity(total);
    let mut pages = 0;
    for (offset, expected) in page_windows(total, page_size) {
        let page = session.get_city_page(offset, page_size.get())?;
        pages += 1;
        log::debug!("Page at offset {offset}: {} cities", page.len());
        if page.len() != expected {
            log::warn!(
                "Page at offset {offset} returned {} cities, expected {expected}",
                page.len()
            );
        }
        cities.extend(page);
    }

    session.finish()?;
    log::info!(
        "Extracted {} cities in {pages} pages ({:.2?})",
        cities.len(),
        started.elapsed()
    );

    Ok(Extraction {
        countries,
        cities,
        pages,
    })
}
