//! Read access to the relational world database.
//!
//! [`WorldRepository`] owns the single SQLite connection for the process.
//! All reads go through a [`ReadSession`], a transaction scoped to one
//! operation: it is committed by [`ReadSession::finish`] and rolled back on
//! drop along any other path (early return, `?`, panic).

use crate::error::{Backend, Result, WarmError};
use crate::schema;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};
use std::path::Path;
use world_core::types::{City, Continent, Country, Language};

const COUNTRY_COLUMNS: &str =
    "c.code, c.code_2, c.name, c.continent, c.region, c.surface_area, c.population";

pub struct WorldRepository {
    conn: Connection,
}

impl WorldRepository {
    /// Open the database file read-only. It must already exist.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY | rusqlite::OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| WarmError::connectivity(Backend::Relational, format!("{}: {e}", path.display())))?;
        schema::configure_read_connection(&conn)?;
        Ok(Self { conn })
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Begin a read transaction.
    pub fn read_session(&mut self) -> Result<ReadSession<'_>> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Deferred)?;
        Ok(ReadSession { tx })
    }

    /// Close the connection, reporting any error instead of swallowing it in `Drop`.
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_conn, err)| close_error(err))
    }
}

fn close_error(err: rusqlite::Error) -> WarmError {
    WarmError::connectivity(Backend::Relational, format!("close failed: {err}"))
}

pub struct ReadSession<'conn> {
    tx: Transaction<'conn>,
}

impl ReadSession<'_> {
    /// Every country with its languages, fetched in one joined query.
    ///
    /// Countries without languages are kept (LEFT JOIN) with an empty list.
    pub fn get_all_countries(&self) -> Result<Vec<Country>> {
        let mut stmt = self.tx.prepare_cached(&format!(
            "SELECT {COUNTRY_COLUMNS}, l.language, l.is_official, l.percentage
             FROM country c
             LEFT JOIN country_language l ON l.country_code = c.code
             ORDER BY c.code, l.language"
        ))?;

        let mut countries: Vec<Country> = Vec::new();
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            let code: String = row.get(0)?;
            let is_new = countries.last().map_or(true, |c| c.code != code);
            if is_new {
                countries.push(country_from_row(row)?);
            }
            let language: Option<String> = row.get(7)?;
            if let (Some(language), Some(country)) = (language, countries.last_mut()) {
                country.languages.push(Language {
                    country_code: code,
                    language,
                    official: row.get(8)?,
                    percentage: row.get(9)?,
                });
            }
        }
        Ok(countries)
    }

    pub fn get_total_city_count(&self) -> Result<usize> {
        let count: i64 = self
            .tx
            .prepare_cached("SELECT COUNT(*) FROM city")?
            .query_row([], |r| r.get(0))?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    /// Up to `limit` cities ordered by id, skipping the first `offset`.
    pub fn get_city_page(&self, offset: usize, limit: usize) -> Result<Vec<City>> {
        let mut stmt = self.tx.prepare_cached(
            "SELECT id, name, population, district, country_code
             FROM city
             ORDER BY id
             LIMIT ?1 OFFSET ?2",
        )?;
        let cities = stmt
            .query_map(params![to_sql_int(limit), to_sql_int(offset)], city_from_row)?
            .collect::<rusqlite::Result<Vec<City>>>()?;
        Ok(cities)
    }

    /// A city joined to its country, or `None` if the id does not exist.
    ///
    /// The returned country has no languages; see [`Self::get_languages`].
    pub fn get_city_by_id(&self, id: i32) -> Result<Option<(City, Country)>> {
        let mut stmt = self.tx.prepare_cached(&format!(
            "SELECT {COUNTRY_COLUMNS}, t.id, t.name, t.population, t.district, t.country_code
             FROM city t
             JOIN country c ON c.code = t.country_code
             WHERE t.id = ?1"
        ))?;
        let found = stmt
            .query_row([id], |row| {
                let country = country_from_row(row)?;
                let city = City {
                    id: row.get(7)?,
                    name: row.get(8)?,
                    population: row.get(9)?,
                    district: row.get(10)?,
                    country_code: row.get(11)?,
                };
                Ok((city, country))
            })
            .optional()?;
        Ok(found)
    }

    pub fn get_languages(&self, country_code: &str) -> Result<Vec<Language>> {
        let mut stmt = self.tx.prepare_cached(
            "SELECT country_code, language, is_official, percentage
             FROM country_language
             WHERE country_code = ?1
             ORDER BY language",
        )?;
        let languages = stmt
            .query_map([country_code], |row| {
                Ok(Language {
                    country_code: row.get(0)?,
                    language: row.get(1)?,
                    official: row.get(2)?,
                    percentage: row.get(3)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<Language>>>()?;
        Ok(languages)
    }

    /// Commit the (read-only) transaction.
    pub fn finish(self) -> Result<()> {
        self.tx.commit()?;
        Ok(())
    }
}

fn to_sql_int(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

fn city_from_row(row: &Row<'_>) -> rusqlite::Result<City> {
    Ok(City {
        id: row.get(0)?,
        name: row.get(1)?,
        population: row.get(2)?,
        district: row.get(3)?,
        country_code: row.get(4)?,
    })
}

/// Reads the seven country columns at the start of `row`.
fn country_from_row(row: &Row<'_>) -> rusqlite::Result<Country> {
    let continent: String = row.get(3)?;
    let continent: Continent = continent
        .parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e)))?;
    Ok(Country {
        code: row.get(0)?,
        code_two: row.get(1)?,
        name: row.get(2)?,
        continent,
        region: row.get(4)?,
        surface_area: row.get(5)?,
        population: row.get(6)?,
        languages: Vec::new(),
    })
}
