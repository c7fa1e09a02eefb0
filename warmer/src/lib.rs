//! World cache warmer
//!
//! Copies the relational `world` database (countries, their languages and
//! cities) into a Redis/KeyDB cache as one flat JSON record per city, then
//! times the same point lookups against both stores.
//!
//! Run the warm-up and benchmark: `cargo run --release --bin warm-cache`
//! Seed an empty database: `cargo run --bin seed-world`

pub mod benchmark;
pub mod cache_writer;
pub mod config;
pub mod context;
pub mod error;
pub mod extract;
pub mod keydb;
pub mod populate;
pub mod report;
pub mod repository;
pub mod schema;

pub use error::{Backend, Result, WarmError};
