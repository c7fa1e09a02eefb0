//! Report module: prints the timing comparison.

use crate::benchmark::{BenchmarkOutcome, PassResult};
use crate::cache_writer::WriteReport;
use std::fmt::Write;

/// `"{backend}:\t{ms} ms"`, the line printed per pass.
pub fn timing_line(result: &PassResult) -> String {
    format!("{}:\t{} ms", result.backend, result.elapsed_ms())
}

fn detail_line(result: &PassResult) -> String {
    format!(
        "  {:8} {:>6} lookups {:>6} hits {:>6} misses {:>6} undecodable  ({:.3?})",
        result.backend.label(),
        result.lookups,
        result.hits,
        result.misses,
        result.decode_failures,
        result.elapsed,
    )
}

/// Full report text: the two timing lines first, then the details.
pub fn format_report(write: &WriteReport, outcome: &BenchmarkOutcome) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", timing_line(&outcome.cache));
    let _ = writeln!(out, "{}", timing_line(&outcome.relational));
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "  Cache warm-up: {} written, {} skipped ({:.2?})",
        write.written,
        write.failures.len(),
        write.elapsed
    );
    for failure in &write.failures {
        let _ = writeln!(out, "    skipped {}: {}", failure.id, failure.reason);
    }
    let _ = writeln!(out, "{}", detail_line(&outcome.cache));
    let _ = writeln!(out, "{}", detail_line(&outcome.relational));
    if let Some(speedup) = outcome.speedup() {
        let _ = writeln!(out, "  Cache speedup: {speedup:.1}x");
    }
    out
}

pub fn print_report(write: &WriteReport, outcome: &BenchmarkOutcome) {
    print!("{}", format_report(write, outcome));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache_writer::RecordFailure;
    use crate::error::Backend;
    use std::time::Duration;

    fn outcome() -> BenchmarkOutcome {
        let mut cache = PassResult::new(Backend::Cache);
        cache.elapsed = Duration::from_millis(12);
        cache.lookups = 9;
        cache.hits = 8;
        cache.misses = 1;
        let mut relational = PassResult::new(Backend::Relational);
        relational.elapsed = Duration::from_millis(48);
        relational.lookups = 9;
        relational.hits = 8;
        relational.misses = 1;
        BenchmarkOutcome { cache, relational }
    }

    #[test]
    fn timing_lines_come_first_and_are_labeled() {
        let report = format_report(&WriteReport::default(), &outcome());
        let mut lines = report.lines();
        assert_eq!(lines.next(), Some("KeyDB:\t12 ms"));
        assert_eq!(lines.next(), Some("SQLite:\t48 ms"));
        assert!(report.contains("Cache speedup: 4.0x"));
    }

    #[test]
    fn skipped_records_are_listed() {
        let write = WriteReport {
            written: 3,
            failures: vec![RecordFailure {
                id: 17,
                reason: "record 17: field 'surfaceArea' is not a finite number".to_string(),
            }],
            elapsed: Duration::from_millis(3),
        };
        let report = format_report(&write, &outcome());
        assert!(report.contains("3 written, 1 skipped"));
        assert!(report.contains("skipped 17: record 17"));
    }
}
