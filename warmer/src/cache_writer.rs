//! Population of the cache from flattened records.

use crate::error::Result;
use crate::keydb::{CacheClient, KeyValueStore};
use std::time::{Duration, Instant};
use world_core::types::FlatRecord;

/// A record that was skipped because it could not be encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFailure {
    pub id: i32,
    pub reason: String,
}

/// Outcome of one population batch.
#[derive(Debug, Clone, Default)]
pub struct WriteReport {
    pub written: usize,
    pub failures: Vec<RecordFailure>,
    pub elapsed: Duration,
}

impl WriteReport {
    pub fn attempted(&self) -> usize {
        self.written + self.failures.len()
    }
}

/// Write each record under its decimal id over a single connection.
///
/// A record that fails to encode is logged and skipped; a failing cache
/// command aborts the batch. The connection is dropped on both paths.
pub fn write_all<C: CacheClient>(client: &C, records: &[FlatRecord]) -> Result<WriteReport> {
    let started = Instant::now();
    let mut con = client.connect()?;
    let mut report = WriteReport::default();

    for record in records {
        let value = match record.encode() {
            Ok(value) => value,
            Err(err) => {
                log::warn!("Skipping city {}: {err}", record.id);
                report.failures.push(RecordFailure {
                    id: record.id,
                    reason: err.to_string(),
                });
                continue;
            }
        };
        con.set(&record.key(), &value)?;
        report.written += 1;
    }

    report.elapsed = started.elapsed();
    log::info!(
        "Wrote {} of {} records to cache ({} skipped, {:.2?})",
        report.written,
        report.attempted(),
        report.failures.len(),
        report.elapsed
    );
    Ok(report)
}
