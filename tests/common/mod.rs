//! Shared test infrastructure for model layer tests.
//!
//! `setup_test_db()` creates a temporary SQLite database with the full
//! schema applied. The TempDir must be kept alive for the Connection to
//! remain valid.

use rusqlite::{Connection, params};
use tempfile::TempDir;

use formsub::db::{self, MIGRATIONS};
use formsub::models::role::Role;

pub fn setup_test_db() -> (TempDir, Connection) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = dir.path().join("test.db");
    let conn = Connection::open(&db_path).expect("Failed to open test DB");

    conn.execute_batch("PRAGMA foreign_keys=ON; PRAGMA journal_mode=WAL;")
        .expect("Failed to set pragmas");

    conn.execute_batch(MIGRATIONS)
        .expect("Failed to run migrations");

    (dir, conn)
}

/// Insert a user directly with a placeholder hash; most tests only need
/// the id and role, not a verifiable password.
#[allow(dead_code)]
pub fn insert_user(conn: &Connection, email: &str, role: Role) -> i64 {
    let ts = db::now();
    conn.execute(
        "INSERT INTO users (email, password_hash, role, created_at, updated_at) \
         VALUES (?1, 'x', ?2, ?3, ?3)",
        params![email, role.as_str(), ts],
    )
    .expect("Failed to insert test user");
    conn.last_insert_rowid()
}
