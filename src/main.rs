use nc_news::db;
use tracing_subscriber::EnvFilter;

#[rocket::main]
async fn main() -> Result<(), rocket::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let pool = db::init_pool().expect("Failed to create database pool");
    {
        let mut conn = pool.get().expect("Failed to get a database connection");
        db::migrate(&mut conn).expect("Failed to apply the database schema");
    }

    nc_news::build(pool).launch().await?;
    Ok(())
}
