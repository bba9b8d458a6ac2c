//! Resets the database named by `DATABASE_URL` and loads seed data into it:
//! the built-in test fixture, or the four JSON files in the directory given
//! as the first argument.

#[macro_use]
extern crate error_chain;

use nc_news::db::seed::{seed, SeedData};
use nc_news::db::{self, Result};
use std::env;
use tracing_subscriber::EnvFilter;

quick_main!(run);

fn run() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let data = match env::args().nth(1) {
        Some(dir) => SeedData::load_dir(dir)?,
        None => SeedData::test()?,
    };
    let pool = db::init_pool()?;
    let mut conn = pool.get()?;
    seed(&mut conn, &data)
}
