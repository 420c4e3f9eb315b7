// storage/mod.rs
// SQLite persistence: connection pool, migrations and resolved locations

pub mod locations;
pub mod migrations;
pub mod pool;
pub mod test_helpers;

pub use locations::{count_locations, fetch_location, upsert_location, SqliteLocationUpdater};
pub use migrations::run_migrations;
pub use pool::init_db_pool_with_path;
