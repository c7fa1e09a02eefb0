//! Relational schema for the world database and bulk insertion of its rows.
//!
//! Three tables, mirroring the classic `world` sample database:
//! - `country`          — one row per country, keyed by the three-letter code
//! - `country_language` — zero or more rows per country
//! - `city`             — one row per city, referencing exactly one country

use crate::error::Result;
use rusqlite::{params, Connection, Transaction};
use world_core::types::{City, Country};

/// Per-connection pragmas for reading. Nothing here is persisted in the
/// database file.
pub fn configure_read_connection(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "PRAGMA cache_size = -65536;
         PRAGMA temp_store = MEMORY;",
    )?;
    Ok(())
}

/// Configure the connection that creates and fills the database.
///
/// Switches the file to WAL, which sticks to the database after close.
pub fn configure_connection(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "PRAGMA foreign_keys = ON;
         PRAGMA journal_mode = WAL;",
    )?;
    configure_read_connection(conn)
}

/// Create all tables and indexes (no-op for tables that already exist).
pub fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS country (
            code            TEXT PRIMARY KEY NOT NULL,
            code_2          TEXT NOT NULL,
            name            TEXT NOT NULL,
            continent       TEXT NOT NULL,
            region          TEXT NOT NULL,
            surface_area    REAL NOT NULL,
            population      INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS country_language (
            country_code    TEXT NOT NULL REFERENCES country(code),
            language        TEXT NOT NULL,
            is_official     INTEGER NOT NULL,
            percentage      REAL NOT NULL,
            PRIMARY KEY (country_code, language)
        );

        CREATE TABLE IF NOT EXISTS city (
            id              INTEGER PRIMARY KEY NOT NULL,
            name            TEXT NOT NULL,
            country_code    TEXT NOT NULL REFERENCES country(code),
            district        TEXT NOT NULL,
            population      INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_city_country ON city(country_code);",
    )?;
    Ok(())
}

/// Row count of `city`, or zero when the table does not exist yet.
pub fn existing_city_count(conn: &Connection) -> Result<i64> {
    let has_table: bool = conn.query_row(
        "SELECT EXISTS (SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'city')",
        [],
        |r| r.get(0),
    )?;
    if !has_table {
        return Ok(0);
    }
    Ok(conn.query_row("SELECT COUNT(*) FROM city", [], |r| r.get(0))?)
}

/// Remove every row (children first).
pub fn clear_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "DELETE FROM city;
         DELETE FROM country_language;
         DELETE FROM country;",
    )?;
    Ok(())
}

/// Bulk-insert countries (with their languages) and cities in one transaction.
pub fn populate(conn: &mut Connection, countries: &[Country], cities: &[City]) -> Result<()> {
    let tx = conn.transaction()?;
    insert_rows(&tx, countries, cities)?;
    tx.commit()?;
    Ok(())
}

/// Delete every row and insert the new world in the same transaction.
///
/// If any insert fails the old rows are kept.
pub fn replace(conn: &mut Connection, countries: &[Country], cities: &[City]) -> Result<()> {
    let tx = conn.transaction()?;
    clear_tables(&tx)?;
    insert_rows(&tx, countries, cities)?;
    tx.commit()?;
    Ok(())
}

fn insert_rows(tx: &Transaction<'_>, countries: &[Country], cities: &[City]) -> Result<()> {
    let mut country_stmt = tx.prepare(
        "INSERT INTO country (code, code_2, name, continent, region, surface_area, population)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )?;
    let mut language_stmt = tx.prepare(
        "INSERT INTO country_language (country_code, language, is_official, percentage)
         VALUES (?1, ?2, ?3, ?4)",
    )?;
    let mut city_stmt = tx.prepare(
        "INSERT INTO city (id, name, country_code, district, population)
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )?;

    for country in countries {
        country_stmt.execute(params![
            country.code,
            country.code_two,
            country.name,
            country.continent.as_str(),
            country.region,
            country.surface_area,
            country.population,
        ])?;
        for lang in &country.languages {
            language_stmt.execute(params![
                country.code,
                lang.language,
                lang.official,
                lang.percentage,
            ])?;
        }
    }

    for city in cities {
        city_stmt.execute(params![
            city.id,
            city.name,
            city.country_code,
            city.district,
            city.population,
        ])?;
    }
    Ok(())
}
