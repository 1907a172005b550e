use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

mod carousel;
mod category;
mod order;
mod product;
mod user;

pub use carousel::CarouselRepo;
pub use category::CategoryRepo;
pub use order::OrderRepo;
pub use product::ProductRepo;
pub use user::UserRepo;

/// Open a pool with foreign keys enforced; the file is created when missing.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await
}

pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
