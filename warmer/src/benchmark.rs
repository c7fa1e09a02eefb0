//! Single-pass point-lookup timing against both stores.
//!
//! Each pass walks the same id list in order (duplicates included) and times
//! the whole walk, connection or transaction setup included. There is no
//! warm-up and no averaging.

use crate::error::{Backend, Result};
use crate::keydb::{CacheClient, KeyValueStore};
use crate::repository::WorldRepository;
use std::hint::black_box;
use std::time::{Duration, Instant};
use world_core::types::FlatRecord;

/// Timing and counters for one pass over the id list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassResult {
    pub backend: Backend,
    pub elapsed: Duration,
    pub lookups: usize,
    pub hits: usize,
    /// Ids with no row / no key. Not an error.
    pub misses: usize,
    /// Cache values that did not decode. Always zero for the relational pass.
    pub decode_failures: usize,
}

impl PassResult {
    pub fn new(backend: Backend) -> Self {
        Self {
            backend,
            elapsed: Duration::ZERO,
            lookups: 0,
            hits: 0,
            misses: 0,
            decode_failures: 0,
        }
    }

    pub fn elapsed_ms(&self) -> u128 {
        self.elapsed.as_millis()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchmarkOutcome {
    pub cache: PassResult,
    pub relational: PassResult,
}

impl BenchmarkOutcome {
    /// How many times faster the cache pass was, if both took measurable time.
    pub fn speedup(&self) -> Option<f64> {
        let cache = self.cache.elapsed.as_secs_f64();
        let relational = self.relational.elapsed.as_secs_f64();
        (cache > 0.0 && relational > 0.0).then(|| relational / cache)
    }
}

/// Look up each city by id, then its country's languages, in one transaction.
pub fn relational_pass(repo: &mut WorldRepository, ids: &[i32]) -> Result<PassResult> {
    let mut result = PassResult::new(Backend::Relational);
    let started = Instant::now();

    let session = repo.read_session()?;
    for &id in ids {
        result.lookups += 1;
        match session.get_city_by_id(id)? {
            Some((city, country)) => {
                let languages = session.get_languages(&country.code)?;
                black_box((city, country, languages));
                result.hits += 1;
            }
            None => {
                log::debug!("{}: no city with id {id}", Backend::Relational);
                result.misses += 1;
            }
        }
    }
    session.finish()?;

    result.elapsed = started.elapsed();
    Ok(result)
}

/// Fetch and decode each id's cache entry over one connection.
pub fn cache_pass<C: CacheClient>(client: &C, ids: &[i32]) -> Result<PassResult> {
    let mut result = PassResult::new(Backend::Cache);
    let started = Instant::now();

    let mut con = client.connect()?;
    for &id in ids {
        result.lookups += 1;
        let Some(text) = con.get(&id.to_string())? else {
            log::debug!("{}: no entry for id {id}", Backend::Cache);
            result.misses += 1;
            continue;
        };
        match FlatRecord::decode(&text) {
            Ok(record) => {
                black_box(record);
                result.hits += 1;
            }
            Err(err) => {
                log::warn!("{}: entry for id {id} did not decode: {err}", Backend::Cache);
                result.decode_failures += 1;
            }
        }
    }
    drop(con);

    result.elapsed = started.elapsed();
    Ok(result)
}

/// Run the cache pass, then the relational pass, over the same ids.
pub fn run<C: CacheClient>(
    repo: &mut WorldRepository,
    client: &C,
    ids: &[i32],
) -> Result<BenchmarkOutcome> {
    log::info!("Benchmarking {} lookups per backend", ids.len());
    let cache = cache_pass(client, ids)?;
    let relational = relational_pass(repo, ids)?;
    Ok(BenchmarkOutcome { cache, relational })
}
