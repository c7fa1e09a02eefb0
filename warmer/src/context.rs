//! The long-lived handles for one run, passed explicitly to each stage.

use crate::benchmark::{self, BenchmarkOutcome};
use crate::cache_writer::{self, WriteReport};
use crate::config::WarmerConfig;
use crate::error::{Result, WarmError};
use crate::extract;
use crate::keydb::{self, CacheClient};
use crate::repository::WorldRepository;
use std::num::NonZeroUsize;
use world_core::transform;

pub struct WarmerContext<C: CacheClient> {
    pub repository: WorldRepository,
    pub cache: C,
    pub page_size: NonZeroUsize,
}

impl WarmerContext<redis::Client> {
    /// Open the database and the cache client named by `config`.
    pub fn connect(config: &WarmerConfig) -> Result<Self> {
        let repository = WorldRepository::open(&config.db_path)?;
        log::info!("Opened world database {}", config.db_path.display());
        let cache = keydb::open_client(&config.cache_url())?;
        Ok(Self {
            repository,
            cache,
            page_size: config.page_size,
        })
    }
}

impl<C: CacheClient> WarmerContext<C> {
    pub fn new(repository: WorldRepository, cache: C, page_size: NonZeroUsize) -> Self {
        Self {
            repository,
            cache,
            page_size,
        }
    }

    /// Extract, flatten and write every city into the cache.
    pub fn warm(&mut self) -> Result<WriteReport> {
        let extraction = extract::extract_all(&mut self.repository, self.page_size)?;
        let records = transform::flatten_all(&extraction.cities, &extraction.countries)?;
        drop(extraction);
        cache_writer::write_all(&self.cache, &records)
    }

    pub fn benchmark(&mut self, ids: &[i32]) -> Result<BenchmarkOutcome> {
        benchmark::run(&mut self.repository, &self.cache, ids)
    }

    /// Close the database after a failed stage and return that stage's error.
    ///
    /// A close failure is logged, not returned.
    pub fn abort(self, err: WarmError) -> WarmError {
        if let Err(close_err) = self.shutdown() {
            log::error!("Failed to close world database: {close_err}");
        }
        err
    }

    /// Close the relational connection. The cache client has nothing to close.
    pub fn shutdown(self) -> Result<()> {
        self.repository.close()?;
        log::info!("Shut down");
        Ok(())
    }
}
