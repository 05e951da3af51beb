use rusqlite::{Connection, params};

use crate::db;
use super::types::*;

const SELECT_FORM: &str = "\
    SELECT id, name, description, created_by_user_id, is_active, \
           created_at, updated_at \
    FROM forms";

const SELECT_FIELD: &str = "\
    SELECT id, form_id, field_name, field_type, is_required, \"order\", \
           options, placeholder, created_at, updated_at \
    FROM form_fields";

fn row_to_form(row: &rusqlite::Row) -> rusqlite::Result<Form> {
    Ok(Form {
        id: row.get("id")?,
        name: row.get("name")?,
        description: row.get("description")?,
        created_by_user_id: row.get("created_by_user_id")?,
        is_active: row.get("is_active")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn row_to_field(row: &rusqlite::Row) -> rusqlite::Result<FormField> {
    let type_raw: String = row.get("field_type")?;
    let options_raw: Option<String> = row.get("options")?;
    Ok(FormField {
        id: row.get("id")?,
        form_id: row.get("form_id")?,
        field_name: row.get("field_name")?,
        field_type: FieldType::parse(&type_raw).unwrap_or(FieldType::Text),
        is_required: row.get("is_required")?,
        order: row.get("order")?,
        options: options_raw.and_then(|raw| serde_json::from_str(&raw).ok()),
        placeholder: row.get("placeholder")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn options_to_sql(options: Option<&[FieldOption]>) -> Option<String> {
    options.map(|opts| {
        serde_json::to_string(opts).unwrap_or_else(|_| "[]".to_string())
    })
}

// --- forms ------------------------------------------------------------------

pub fn create(
    conn: &Connection,
    name: &str,
    description: Option<&str>,
    is_active: bool,
    created_by_user_id: i64,
) -> rusqlite::Result<Form> {
    let ts = db::now();
    conn.execute(
        "INSERT INTO forms (name, description, created_by_user_id, is_active, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
        params![name, description, created_by_user_id, is_active, ts],
    )?;
    let id = conn.last_insert_rowid();
    find_by_id(conn, id)?.ok_or(rusqlite::Error::QueryReturnedNoRows)
}

pub fn find_all(conn: &Connection) -> rusqlite::Result<Vec<Form>> {
    let sql = format!("{SELECT_FORM} ORDER BY id");
    let mut stmt = conn.prepare(&sql)?;
    let forms = stmt
        .query_map([], row_to_form)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(forms)
}

/// Active forms only: the submittable set shown to ordinary users.
pub fn find_available(conn: &Connection) -> rusqlite::Result<Vec<Form>> {
    let sql = format!("{SELECT_FORM} WHERE is_active = 1 ORDER BY id");
    let mut stmt = conn.prepare(&sql)?;
    let forms = stmt
        .query_map([], row_to_form)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(forms)
}

pub fn find_by_id(conn: &Connection, id: i64) -> rusqlite::Result<Option<Form>> {
    let sql = format!("{SELECT_FORM} WHERE id = ?1");
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query_map(params![id], row_to_form)?;
    match rows.next() {
        Some(row) => Ok(Some(row?)),
        None => Ok(None),
    }
}

/// Form plus its fields, ordered ascending by "order" with id tiebreak.
pub fn find_with_fields(conn: &Connection, id: i64) -> rusqlite::Result<Option<FormWithFields>> {
    let Some(form) = find_by_id(conn, id)? else {
        return Ok(None);
    };
    let sql = format!("{SELECT_FIELD} WHERE form_id = ?1 ORDER BY \"order\", id");
    let mut stmt = conn.prepare(&sql)?;
    let fields = stmt
        .query_map(params![id], row_to_field)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Some(FormWithFields { form, fields }))
}

/// Partial update; absent fields keep their value, explicit null clears
/// the description. Refreshes updated_at.
pub fn update(conn: &Connection, id: i64, input: &UpdateFormInput) -> rusqlite::Result<Option<Form>> {
    let Some(existing) = find_by_id(conn, id)? else {
        return Ok(None);
    };

    let name = input.name.as_deref().unwrap_or(&existing.name);
    let description = match &input.description {
        Some(value) => value.as_deref(),
        None => existing.description.as_deref(),
    };
    let is_active = input.is_active.unwrap_or(existing.is_active);

    conn.execute(
        "UPDATE forms SET name = ?1, description = ?2, is_active = ?3, updated_at = ?4 WHERE id = ?5",
        params![name, description, is_active, db::now(), id],
    )?;
    find_by_id(conn, id)
}

/// Delete a form; fields cascade. Returns false when the id is unknown.
/// A form with existing subscriptions is blocked by the FK and surfaces
/// as a database error.
pub fn delete(conn: &Connection, id: i64) -> rusqlite::Result<bool> {
    let affected = conn.execute("DELETE FROM forms WHERE id = ?1", params![id])?;
    Ok(affected > 0)
}

// --- fields -----------------------------------------------------------------

pub fn create_field(
    conn: &Connection,
    form_id: i64,
    input: &CreateFieldInput,
) -> rusqlite::Result<FormField> {
    let ts = db::now();
    conn.execute(
        "INSERT INTO form_fields (form_id, field_name, field_type, is_required, \"order\", options, placeholder, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)",
        params![
            form_id,
            input.field_name,
            input.field_type.as_str(),
            input.is_required,
            input.order,
            options_to_sql(input.options.as_deref()),
            input.placeholder,
            ts,
        ],
    )?;
    let id = conn.last_insert_rowid();
    find_field_by_id(conn, id)?.ok_or(rusqlite::Error::QueryReturnedNoRows)
}

pub fn find_field_by_id(conn: &Connection, id: i64) -> rusqlite::Result<Option<FormField>> {
    let sql = format!("{SELECT_FIELD} WHERE id = ?1");
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query_map(params![id], row_to_field)?;
    match rows.next() {
        Some(row) => Ok(Some(row?)),
        None => Ok(None),
    }
}

/// Merge the partial input over the stored field and write the result.
/// Any attribute may change, type and options included.
pub fn update_field(
    conn: &Connection,
    existing: &FormField,
    input: &UpdateFieldInput,
) -> rusqlite::Result<FormField> {
    let field_name = input.field_name.as_deref().unwrap_or(&existing.field_name);
    let field_type = input.field_type.unwrap_or(existing.field_type);
    let is_required = input.is_required.unwrap_or(existing.is_required);
    let order = input.order.unwrap_or(existing.order);
    let options = match &input.options {
        Some(value) => value.as_deref(),
        None => existing.options.as_deref(),
    };
    let placeholder = match &input.placeholder {
        Some(value) => value.as_deref(),
        None => existing.placeholder.as_deref(),
    };

    conn.execute(
        "UPDATE form_fields SET field_name = ?1, field_type = ?2, is_required = ?3, \
         \"order\" = ?4, options = ?5, placeholder = ?6, updated_at = ?7 WHERE id = ?8",
        params![
            field_name,
            field_type.as_str(),
            is_required,
            order,
            options_to_sql(options),
            placeholder,
            db::now(),
            existing.id,
        ],
    )?;
    find_field_by_id(conn, existing.id)?.ok_or(rusqlite::Error::QueryReturnedNoRows)
}

pub fn delete_field(conn: &Connection, id: i64) -> rusqlite::Result<bool> {
    let affected = conn.execute("DELETE FROM form_fields WHERE id = ?1", params![id])?;
    Ok(affected > 0)
}
