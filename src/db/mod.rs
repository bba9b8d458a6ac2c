use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, CustomizeConnection};
use diesel::result::Error as DieselError;
use diesel::sqlite::SqliteConnection;
use dotenv::dotenv;
use rocket::http::Status;
use rocket::outcome::{try_outcome, Outcome};
use rocket::request::{self, FromRequest};
use rocket::{Request, State};
use std::env;
use std::ops::{Deref, DerefMut};
use tracing::{info, warn};

pub mod schema;
pub mod seed;

static SCHEMA: &str = include_str!("../../db/schema.sql");

const DEFAULT_POOL_SIZE: u32 = 10;

// An alias to the type for a pool of Diesel SQLite connections.
pub type Pool = r2d2::Pool<ConnectionManager<SqliteConnection>>;

pub struct DbConnection(pub r2d2::PooledConnection<ConnectionManager<SqliteConnection>>);

error_chain! {
    foreign_links {
        Var(::std::env::VarError);
        ParseInt(::std::num::ParseIntError);
        Io(::std::io::Error);
        Json(::serde_json::Error);
        R2D2(r2d2::Error);
        Diesel(DieselError);
    }
}

/// Applied to every connection the pool hands out. SQLite only enforces
/// `REFERENCES` clauses when `foreign_keys` is switched on per connection.
#[derive(Debug, Clone, Copy)]
struct ConnectionOptions;

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for ConnectionOptions {
    fn on_acquire(
        &self,
        conn: &mut SqliteConnection,
    ) -> ::std::result::Result<(), diesel::r2d2::Error> {
        conn.batch_execute("PRAGMA foreign_keys = ON; PRAGMA busy_timeout = 5000;")
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// Attempts to retrieve a single connection from the managed database pool. If
/// no pool is currently managed, fails with an `InternalServerError` status. If
/// no connections are available, fails with a `ServiceUnavailable` status.
#[rocket::async_trait]
impl<'r> FromRequest<'r> for DbConnection {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> request::Outcome<DbConnection, ()> {
        let pool = try_outcome!(request.guard::<&State<Pool>>().await);
        match pool.get() {
            Ok(conn) => Outcome::Success(DbConnection(conn)),
            Err(e) => {
                warn!("no database connection available: {}", e);
                Outcome::Error((Status::ServiceUnavailable, ()))
            }
        }
    }
}

// For the convenience of using a &mut DbConnection as a &mut SqliteConnection.
impl Deref for DbConnection {
    type Target = SqliteConnection;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for DbConnection {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

/// Builds the pool from `DATABASE_URL` (and optionally `DATABASE_POOL_SIZE`),
/// reading a `.env` file first if there is one.
pub fn init_pool() -> Result<Pool> {
    dotenv().ok();
    let database_url = env::var("DATABASE_URL")?;
    let pool_size = match env::var("DATABASE_POOL_SIZE") {
        Ok(size) => size.parse::<u32>()?,
        Err(_) => DEFAULT_POOL_SIZE,
    };
    init_pool_with(&database_url, pool_size)
}

pub fn init_pool_with(database_url: &str, pool_size: u32) -> Result<Pool> {
    info!("opening {} with {} pooled connections", database_url, pool_size);
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    let pool = Pool::builder()
        .max_size(pool_size)
        .connection_customizer(Box::new(ConnectionOptions))
        .build(manager)?;
    Ok(pool)
}

/// Creates any missing table. Existing rows are left alone.
pub fn migrate(conn: &mut SqliteConnection) -> Result<()> {
    conn.batch_execute(SCHEMA)?;
    Ok(())
}
