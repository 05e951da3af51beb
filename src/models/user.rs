use rusqlite::{Connection, params};
use serde::{Deserialize, Serialize};

use crate::db;
use crate::models::role::Role;

/// Internal user record for authentication — includes the password hash.
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: String,
    pub updated_at: String,
}

/// Safe version for API responses — no password hash.
#[derive(Debug, Clone, Serialize)]
pub struct UserView {
    pub id: i64,
    pub email: String,
    pub role: Role,
    pub created_at: String,
    pub updated_at: String,
}

impl From<User> for UserView {
    fn from(u: User) -> Self {
        UserView {
            id: u.id,
            email: u.email,
            role: u.role,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RegisterInput {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Admin update: either attribute may be omitted to keep its value.
#[derive(Debug, Deserialize)]
pub struct UpdateUserInput {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
}

const SELECT_USER: &str = "\
    SELECT id, email, password_hash, role, created_at, updated_at \
    FROM users";

fn row_to_user(row: &rusqlite::Row) -> rusqlite::Result<User> {
    let role_raw: String = row.get("role")?;
    Ok(User {
        id: row.get("id")?,
        email: row.get("email")?,
        password_hash: row.get("password_hash")?,
        role: Role::parse(&role_raw).unwrap_or(Role::User),
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

/// Create a new account with the default `user` role.
pub fn create(conn: &Connection, email: &str, password_hash: &str) -> rusqlite::Result<User> {
    let ts = db::now();
    conn.execute(
        "INSERT INTO users (email, password_hash, role, created_at, updated_at) \
         VALUES (?1, ?2, 'user', ?3, ?3)",
        params![email, password_hash, ts],
    )?;
    let id = conn.last_insert_rowid();
    find_by_id(conn, id)?.ok_or(rusqlite::Error::QueryReturnedNoRows)
}

pub fn find_by_id(conn: &Connection, id: i64) -> rusqlite::Result<Option<User>> {
    let sql = format!("{SELECT_USER} WHERE id = ?1");
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query_map(params![id], row_to_user)?;
    match rows.next() {
        Some(row) => Ok(Some(row?)),
        None => Ok(None),
    }
}

/// Find user by email for authentication.
pub fn find_by_email(conn: &Connection, email: &str) -> rusqlite::Result<Option<User>> {
    let sql = format!("{SELECT_USER} WHERE email = ?1");
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query_map(params![email], row_to_user)?;
    match rows.next() {
        Some(row) => Ok(Some(row?)),
        None => Ok(None),
    }
}

pub fn find_all(conn: &Connection) -> rusqlite::Result<Vec<User>> {
    let sql = format!("{SELECT_USER} ORDER BY id");
    let mut stmt = conn.prepare(&sql)?;
    let users = stmt
        .query_map([], row_to_user)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(users)
}

/// Partial update of email and/or role. Refreshes updated_at.
pub fn update(
    conn: &Connection,
    id: i64,
    input: &UpdateUserInput,
) -> rusqlite::Result<Option<User>> {
    let Some(existing) = find_by_id(conn, id)? else {
        return Ok(None);
    };

    let email = input.email.as_deref().unwrap_or(&existing.email);
    let role = input.role.unwrap_or(existing.role);

    conn.execute(
        "UPDATE users SET email = ?1, role = ?2, updated_at = ?3 WHERE id = ?4",
        params![email, role.as_str(), db::now(), id],
    )?;
    find_by_id(conn, id)
}

pub fn delete(conn: &Connection, id: i64) -> rusqlite::Result<bool> {
    let affected = conn.execute("DELETE FROM users WHERE id = ?1", params![id])?;
    Ok(affected > 0)
}
