use migration::Migrator;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;

/// Fresh in-memory SQLite with every migration applied.
///
/// The pool is pinned to one connection: each SQLite `:memory:` connection
/// is its own database, so a second pooled connection would see no tables.
/// Concurrent callers therefore queue on that connection, which is what the
/// race tests for first-bind and attendance inserts rely on.
pub async fn setup_test_db() -> DatabaseConnection {
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1).min_connections(1).sqlx_logging(false);

    let db = Database::connect(opts)
        .await
        .expect("Failed to connect to in-memory db");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}
