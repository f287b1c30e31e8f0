use std::env;

use common::{
    database::{postgres::Postgres, Database},
    error::NdResult,
};
use sqlx::{postgres::PgConnectOptions, PgPool};

/// Return database connect options built from the `ND_*` environment variables
/// # Errors
/// This function will return an error if any of the required environment variables is not set or
/// the port value is not a valid integer
pub fn db_options() -> NdResult<PgConnectOptions> {
    let port = env::var("ND_PORT")?.parse()?;
    let options = PgConnectOptions::new()
        .host(&env::var("ND_HOST")?)
        .port(port)
        .database(&env::var("ND_DB")?)
        .username(&env::var("ND_USER")?)
        .password(&env::var("ND_PASSWORD")?);
    Ok(options)
}

/// Create a new connection pool against the database described by the `ND_*` environment
/// variables
/// # Errors
/// This function will return an error if the connect options cannot be built or the pool cannot
/// establish its connections
pub async fn create_db_pool() -> NdResult<PgPool> {
    Postgres::create_pool(db_options()?, 4, 1).await
}
