//! Integration tests: extraction, warm-up and benchmark against an in-memory
//! SQLite world and an in-memory cache.

use rusqlite::Connection;
use std::num::NonZeroUsize;
use warmer::benchmark;
use warmer::cache_writer::write_all;
use warmer::config::DEFAULT_BENCH_IDS;
use warmer::context::WarmerContext;
use warmer::extract::extract_all;
use warmer::keydb::memory::MemoryCache;
use warmer::populate::{generate_synthetic, WorldParams};
use warmer::repository::WorldRepository;
use warmer::schema::{configure_connection, create_tables, populate};
use warmer::{Backend, WarmError};
use world_core::transform::{flatten_all, TransformError};
use world_core::types::FlatRecord;

fn page(n: usize) -> NonZeroUsize {
    NonZeroUsize::new(n).unwrap()
}

fn seeded_repository(params: &WorldParams) -> WorldRepository {
    let mut conn = Connection::open_in_memory().expect("open");
    configure_connection(&conn).expect("configure");
    create_tables(&conn).expect("create_tables");
    let world = generate_synthetic(params);
    populate(&mut conn, &world.countries, &world.cities).expect("populate");
    WorldRepository::from_connection(conn)
}

/// A world whose city ids cover the default benchmark list except 3458.
fn benchmark_world() -> WorldParams {
    WorldParams {
        countries: 20,
        cities: 3000,
        max_languages: 5,
        languageless_every: 4,
    }
}

// ── Extraction ──────────────────────────────────────────────────────

#[test]
fn twelve_hundred_cities_extract_in_three_pages() {
    let mut repo = seeded_repository(&WorldParams::small());
    let extraction = extract_all(&mut repo, page(500)).unwrap();

    assert_eq!(extraction.pages, 3);
    assert_eq!(extraction.cities.len(), 1200);
    let ids: Vec<i32> = extraction.cities.iter().map(|c| c.id).collect();
    let expected: Vec<i32> = (1..=1200).collect();
    assert_eq!(ids, expected, "pages must cover every city once, in id order");
}

#[test]
fn extraction_is_complete_for_any_page_size() {
    let mut repo = seeded_repository(&WorldParams::small());
    for size in [1, 7, 499, 500, 1199, 1200, 1201] {
        let extraction = extract_all(&mut repo, page(size)).unwrap();
        assert_eq!(extraction.cities.len(), 1200, "page size {size}");
        assert_eq!(extraction.pages, 1200_usize.div_ceil(size), "page size {size}");
        let mut ids: Vec<i32> = extraction.cities.iter().map(|c| c.id).collect();
        ids.dedup();
        assert_eq!(ids.len(), 1200, "page size {size} produced duplicates");
    }
}

#[test]
fn extraction_loads_all_countries_with_languages() {
    let params = WorldParams::small();
    let world = generate_synthetic(&params);
    let mut repo = seeded_repository(&params);
    let extraction = extract_all(&mut repo, page(500)).unwrap();

    assert_eq!(extraction.countries.len(), world.countries.len());
    for original in &world.countries {
        let loaded = extraction
            .countries
            .iter()
            .find(|c| c.code == original.code)
            .unwrap();
        assert_eq!(loaded.languages.len(), original.languages.len(), "{}", original.code);
    }
}

#[test]
fn failed_extraction_releases_the_read_session() {
    let mut repo = seeded_repository(&WorldParams::small());
    repo.connection()
        .execute("UPDATE city SET population = 'many' WHERE id = 1100", [])
        .unwrap();

    // Countries and the first two pages load before the third page fails.
    assert!(matches!(extract_all(&mut repo, page(500)), Err(WarmError::Query(_))));
    assert!(repo.connection().is_autocommit(), "read transaction left open");

    repo.connection()
        .execute("UPDATE city SET population = 1100 WHERE id = 1100", [])
        .unwrap();
    let session = repo.read_session().unwrap();
    assert_eq!(session.get_total_city_count().unwrap(), 1200);
    session.finish().unwrap();
    assert_eq!(extract_all(&mut repo, page(500)).unwrap().cities.len(), 1200);
}

// ── Transform fidelity ──────────────────────────────────────────────

#[test]
fn cached_record_decodes_to_transform_output() {
    let mut repo = seeded_repository(&WorldParams::small());
    let extraction = extract_all(&mut repo, page(500)).unwrap();
    let records = flatten_all(&extraction.cities, &extraction.countries).unwrap();

    let cache = MemoryCache::default();
    let report = write_all(&cache, &records).unwrap();
    assert_eq!(report.written, records.len());
    assert!(report.failures.is_empty());

    for record in &records {
        let decoded = FlatRecord::decode(&cache.value(&record.key()).unwrap()).unwrap();
        assert_eq!(&decoded, record);
    }
}

#[test]
fn country_without_languages_serializes_empty_list() {
    let params = WorldParams::small();
    let world = generate_synthetic(&params);
    let silent = &world.countries[0];
    assert!(silent.languages.is_empty());
    let city = world
        .cities
        .iter()
        .find(|c| c.country_code == silent.code)
        .expect("some city in the language-less country");

    let repo = seeded_repository(&params);
    let mut context = WarmerContext::new(repo, MemoryCache::default(), page(500));
    context.warm().unwrap();

    let text = context.cache.value(&city.id.to_string()).unwrap();
    assert!(text.contains("\"languages\":[]"), "got {text}");
}

#[test]
fn orphan_city_aborts_the_warm_up() {
    let mut repo = seeded_repository(&WorldParams::small());
    repo.connection()
        .execute_batch(
            "PRAGMA foreign_keys = OFF;
             INSERT INTO city VALUES (5000, 'Nowhere', 'ZZZ', 'None', 1);",
        )
        .unwrap();

    let mut context = WarmerContext::new(repo, MemoryCache::default(), page(500));
    let cache = context.cache.clone();
    let err = match context.warm() {
        Ok(report) => panic!("expected unknown country, wrote {}", report.written),
        Err(err) => context.abort(err),
    };
    match err {
        WarmError::Transform(TransformError::UnknownCountry { city_id, country_code }) => {
            assert_eq!(city_id, 5000);
            assert_eq!(country_code, "ZZZ");
        }
        other => panic!("expected unknown country, got {other:?}"),
    }
    assert!(cache.is_empty());
}

// ── Overwrite idempotence ───────────────────────────────────────────

#[test]
fn rewriting_an_id_keeps_only_the_latest_value() {
    let mut repo = seeded_repository(&WorldParams::small());
    let extraction = extract_all(&mut repo, page(500)).unwrap();
    let records = flatten_all(&extraction.cities, &extraction.countries).unwrap();

    let cache = MemoryCache::default();
    write_all(&cache, &records[..1]).unwrap();

    let mut replacement = records[1].clone();
    replacement.id = records[0].id;
    write_all(&cache, &[replacement.clone()]).unwrap();

    assert_eq!(cache.len(), 1);
    let stored = FlatRecord::decode(&cache.value(&records[0].key()).unwrap()).unwrap();
    assert_eq!(stored, replacement);
}

// ── Benchmark ───────────────────────────────────────────────────────

#[test]
fn every_relational_id_is_a_cache_hit_after_warm_up() {
    let repo = seeded_repository(&WorldParams::small());
    let mut context = WarmerContext::new(repo, MemoryCache::default(), page(500));
    context.warm().unwrap();

    let ids: Vec<i32> = vec![1, 600, 1200, 1201, 0, -3];
    let outcome = context.benchmark(&ids).unwrap();

    assert_eq!(outcome.cache.hits, 3);
    assert_eq!(outcome.relational.hits, 3);
    assert_eq!(outcome.cache.misses, 3);
    assert_eq!(outcome.relational.misses, 3);
}

#[test]
fn one_unwritten_id_is_a_single_miss() {
    let repo = seeded_repository(&WorldParams::standard());
    let mut context = WarmerContext::new(repo, MemoryCache::default(), page(500));
    context.warm().unwrap();
    context.cache.remove("2545");

    let outcome = context.benchmark(&DEFAULT_BENCH_IDS).unwrap();

    assert_eq!(outcome.cache.lookups, 9);
    assert_eq!(outcome.cache.misses, 1);
    assert_eq!(outcome.cache.hits, 8);
    assert_eq!(outcome.cache.decode_failures, 0);
    assert_eq!(outcome.relational.hits, 9);
    assert_eq!(outcome.relational.misses, 0);
}

#[test]
fn id_missing_from_database_is_absent_in_both() {
    let repo = seeded_repository(&benchmark_world());
    let mut context = WarmerContext::new(repo, MemoryCache::default(), page(500));
    context.warm().unwrap();

    // 3458 is beyond the 3000 seeded cities.
    let outcome = context.benchmark(&DEFAULT_BENCH_IDS).unwrap();

    assert_eq!(outcome.cache.misses, 1);
    assert_eq!(outcome.relational.misses, 1);
    assert_eq!(outcome.cache.hits, 8);
    assert_eq!(outcome.relational.hits, 8);
}

#[test]
fn both_backends_report_a_measurement() {
    let repo = seeded_repository(&benchmark_world());
    let mut context = WarmerContext::new(repo, MemoryCache::default(), page(500));
    let written = context.warm().unwrap();
    let outcome = context.benchmark(&DEFAULT_BENCH_IDS).unwrap();

    assert_eq!(outcome.cache.backend, Backend::Cache);
    assert_eq!(outcome.relational.backend, Backend::Relational);
    assert_eq!(outcome.cache.lookups, outcome.relational.lookups);

    let report = warmer::report::format_report(&written, &outcome);
    let lines: Vec<&str> = report.lines().take(2).collect();
    assert!(lines[0].starts_with("KeyDB:\t") && lines[0].ends_with(" ms"));
    assert!(lines[1].starts_with("SQLite:\t") && lines[1].ends_with(" ms"));

    context.shutdown().unwrap();
}

#[test]
fn duplicate_ids_are_looked_up_each_time() {
    let mut repo = seeded_repository(&WorldParams::small());
    let result = benchmark::relational_pass(&mut repo, &[10, 10, 10]).unwrap();
    assert_eq!(result.lookups, 3);
    assert_eq!(result.hits, 3);
}
