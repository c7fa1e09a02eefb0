//! Seeding tool: create the world schema and fill it with synthetic data.
//!
//! Usage:
//!   cargo run -p warmer --bin seed-world [-- [--force] [--skip-if-seeded]]
//!
//! Writes to `WORLD_DB_PATH` (default `world.sqlite3`), creating the file if
//! needed. If cities already exist, `--force` is required to replace them.
//! Use `--skip-if-seeded` to exit successfully when data is already present.

use anyhow::{bail, Context};
use rusqlite::Connection;
use std::env;
use std::process;
use std::time::Instant;
use warmer::config::WarmerConfig;
use warmer::populate::{generate_synthetic, WorldParams};
use warmer::schema;

#[derive(Debug, Default)]
struct Args {
    force: bool,
    skip_if_seeded: bool,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut args = Args::default();
    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--force" => args.force = true,
            "--skip-if-seeded" => args.skip_if_seeded = true,
            other => bail!(
                "Unknown argument: {other}\nUsage: seed-world [--force] [--skip-if-seeded]"
            ),
        }
    }
    Ok(args)
}

fn run(config: &WarmerConfig, args: &Args) -> anyhow::Result<()> {
    let path = &config.db_path;
    let mut conn =
        Connection::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    schema::configure_connection(&conn)?;
    schema::create_tables(&conn).context("Failed to create tables")?;

    let existing = schema::existing_city_count(&conn)?;
    if existing > 0 {
        if args.skip_if_seeded {
            log::info!("{} already holds {existing} cities. Skipping.", path.display());
            return Ok(());
        }
        if !args.force {
            bail!(
                "{} already holds {existing} cities. Use --force to overwrite.",
                path.display()
            );
        }
        log::warn!("Replacing {existing} existing cities");
    }

    let started = Instant::now();
    let world = generate_synthetic(&WorldParams::standard());
    let inserted = if existing > 0 {
        schema::replace(&mut conn, &world.countries, &world.cities)
    } else {
        schema::populate(&mut conn, &world.countries, &world.cities)
    };
    inserted.context("Failed to insert rows")?;
    log::info!(
        "Seeded {} with {} countries and {} cities ({:.2?})",
        path.display(),
        world.countries.len(),
        world.cities.len(),
        started.elapsed()
    );

    conn.close()
        .map_err(|(_, e)| e)
        .context("Failed to close database")?;
    Ok(())
}

fn main() {
    let config = WarmerConfig::from_env().unwrap_or_else(|e| {
        eprintln!("{e}");
        process::exit(1);
    });
    world_core::initialize_logger(config.log_level, config.log_file.as_deref()).unwrap_or_else(|e| {
        eprintln!("Failed to initialize logger: {}. Exiting.", e);
        process::exit(1);
    });

    let result = parse_args().and_then(|args| run(&config, &args));
    if let Err(e) = result {
        log::error!("{e:#}");
        process::exit(1);
    }
}
