use rusqlite::{Connection, params};
use serde_json::{Map, Value};

use crate::db;
use super::types::*;

const SELECT_SUBSCRIPTION: &str = "\
    SELECT id, form_id, user_id, status, data, submitted_at, updated_at \
    FROM subscriptions";

fn row_to_subscription(row: &rusqlite::Row) -> rusqlite::Result<Subscription> {
    let status_raw: String = row.get("status")?;
    let data_raw: String = row.get("data")?;
    Ok(Subscription {
        id: row.get("id")?,
        form_id: row.get("form_id")?,
        user_id: row.get("user_id")?,
        status: SubscriptionStatus::parse(&status_raw).unwrap_or(SubscriptionStatus::Pending),
        data: serde_json::from_str(&data_raw).unwrap_or_default(),
        submitted_at: row.get("submitted_at")?,
        updated_at: row.get("updated_at")?,
    })
}

/// Insert a new submission in `pending` state. The payload is stored
/// exactly as validated, as one JSON text column.
pub fn create(
    conn: &Connection,
    form_id: i64,
    user_id: i64,
    data: &Map<String, Value>,
) -> rusqlite::Result<Subscription> {
    let ts = db::now();
    conn.execute(
        "INSERT INTO subscriptions (form_id, user_id, status, data, submitted_at, updated_at) \
         VALUES (?1, ?2, 'pending', ?3, ?4, ?4)",
        params![form_id, user_id, Value::Object(data.clone()).to_string(), ts],
    )?;
    let id = conn.last_insert_rowid();
    find_by_id(conn, id)?.ok_or(rusqlite::Error::QueryReturnedNoRows)
}

pub fn find_by_id(conn: &Connection, id: i64) -> rusqlite::Result<Option<Subscription>> {
    let sql = format!("{SELECT_SUBSCRIPTION} WHERE id = ?1");
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query_map(params![id], row_to_subscription)?;
    match rows.next() {
        Some(row) => Ok(Some(row?)),
        None => Ok(None),
    }
}

/// Ownership-checked read: only returns the row when it belongs to the user.
pub fn find_by_id_for_user(
    conn: &Connection,
    id: i64,
    user_id: i64,
) -> rusqlite::Result<Option<Subscription>> {
    let sql = format!("{SELECT_SUBSCRIPTION} WHERE id = ?1 AND user_id = ?2");
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query_map(params![id, user_id], row_to_subscription)?;
    match rows.next() {
        Some(row) => Ok(Some(row?)),
        None => Ok(None),
    }
}

pub fn find_for_user(conn: &Connection, user_id: i64) -> rusqlite::Result<Vec<Subscription>> {
    let sql = format!("{SELECT_SUBSCRIPTION} WHERE user_id = ?1 ORDER BY id");
    let mut stmt = conn.prepare(&sql)?;
    let subs = stmt
        .query_map(params![user_id], row_to_subscription)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(subs)
}

/// Review listing with optional form/user/status filters, ANDed together.
pub fn find_filtered(
    conn: &Connection,
    filter: &SubscriptionFilter,
) -> rusqlite::Result<Vec<Subscription>> {
    let mut clauses: Vec<String> = Vec::new();
    let mut sql_params: Vec<rusqlite::types::Value> = Vec::new();

    if let Some(form_id) = filter.form_id {
        sql_params.push(rusqlite::types::Value::Integer(form_id));
        clauses.push(format!("form_id = ?{}", sql_params.len()));
    }
    if let Some(user_id) = filter.user_id {
        sql_params.push(rusqlite::types::Value::Integer(user_id));
        clauses.push(format!("user_id = ?{}", sql_params.len()));
    }
    if let Some(status) = filter.status {
        sql_params.push(rusqlite::types::Value::Text(status.as_str().to_string()));
        clauses.push(format!("status = ?{}", sql_params.len()));
    }

    let sql = if clauses.is_empty() {
        format!("{SELECT_SUBSCRIPTION} ORDER BY id")
    } else {
        format!("{SELECT_SUBSCRIPTION} WHERE {} ORDER BY id", clauses.join(" AND "))
    };

    let mut stmt = conn.prepare(&sql)?;
    let subs = stmt
        .query_map(rusqlite::params_from_iter(sql_params.iter()), row_to_subscription)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(subs)
}

/// Write the new status and refresh updated_at. `data` and `submitted_at`
/// are never touched. Returns None for an unknown id.
pub fn update_status(
    conn: &Connection,
    id: i64,
    new_status: SubscriptionStatus,
) -> rusqlite::Result<Option<Subscription>> {
    let affected = conn.execute(
        "UPDATE subscriptions SET status = ?1, updated_at = ?2 WHERE id = ?3",
        params![new_status.as_str(), db::now(), id],
    )?;
    if affected == 0 {
        return Ok(None);
    }
    find_by_id(conn, id)
}
