use chrono::{SecondsFormat, Utc};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::params;

pub type DbPool = Pool<SqliteConnectionManager>;

pub const MIGRATIONS: &str = include_str!("schema.sql");

pub fn init_pool(database_url: &str) -> DbPool {
    let manager = SqliteConnectionManager::file(database_url).with_init(|conn| {
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
        Ok(())
    });
    Pool::builder()
        .max_size(8)
        .build(manager)
        .expect("Failed to create DB pool")
}

pub fn run_migrations(pool: &DbPool) {
    let conn = pool.get().expect("Failed to get DB connection for migrations");
    conn.execute_batch(MIGRATIONS)
        .expect("Failed to run migrations");
    log::info!("Database migrations complete");
}

/// Current UTC time as a fixed-width RFC 3339 string (microseconds, Z suffix).
/// Fixed width keeps lexicographic order identical to chronological order.
pub fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Create the bootstrap admin account if no admin exists yet.
pub fn seed_admin(pool: &DbPool, email: &str, password_hash: &str) {
    let conn = pool.get().expect("Failed to get DB connection for seeding");

    let admin_count: i64 = conn
        .query_row("SELECT COUNT(*) FROM users WHERE role = 'admin'", [], |row| {
            row.get(0)
        })
        .unwrap_or(0);
    if admin_count > 0 {
        log::info!("Admin account already present, skipping seed");
        return;
    }

    let ts = now();
    conn.execute(
        "INSERT INTO users (email, password_hash, role, created_at, updated_at) \
         VALUES (?1, ?2, 'admin', ?3, ?3)",
        params![email, password_hash, ts],
    )
    .expect("Failed to seed admin account");
    log::info!("Seeded admin account {email}");
}
