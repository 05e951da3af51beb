use actix_session::Session;
use actix_web::{HttpResponse, web};

use crate::auth::session::require_form_manager;
use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::form::types::validate_field_definition;
use crate::models::form::{CreateFieldInput, UpdateFieldInput, queries};

/// POST /api/forms/{form_id}/fields - Add a field to a form
/// (manager/admin). The definition is structure-checked before the insert.
pub async fn create(
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<i64>,
    body: web::Json<CreateFieldInput>,
) -> Result<HttpResponse, AppError> {
    require_form_manager(&session)?;

    let form_id = path.into_inner();
    let conn = pool.get()?;
    queries::find_by_id(&conn, form_id)?.ok_or(AppError::NotFound)?;

    validate_field_definition(&body.field_name, body.field_type, body.options.as_deref())?;

    let field = queries::create_field(&conn, form_id, &body)?;
    Ok(HttpResponse::Created().json(field))
}

/// PUT /api/fields/{id} - Partial update of any field attribute, type and
/// options included (manager/admin). The merged definition is
/// structure-checked before the write.
pub async fn update(
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<i64>,
    body: web::Json<UpdateFieldInput>,
) -> Result<HttpResponse, AppError> {
    require_form_manager(&session)?;

    let conn = pool.get()?;
    let existing = queries::find_field_by_id(&conn, path.into_inner())?.ok_or(AppError::NotFound)?;

    let merged_name = body.field_name.as_deref().unwrap_or(&existing.field_name);
    let merged_type = body.field_type.unwrap_or(existing.field_type);
    let merged_options = match &body.options {
        Some(value) => value.as_deref(),
        None => existing.options.as_deref(),
    };
    validate_field_definition(merged_name, merged_type, merged_options)?;

    let updated = queries::update_field(&conn, &existing, &body)?;
    Ok(HttpResponse::Ok().json(updated))
}

/// DELETE /api/fields/{id} (manager/admin). Fields are deletable
/// independently of their form.
pub async fn delete(
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    require_form_manager(&session)?;
    let conn = pool.get()?;
    if !queries::delete_field(&conn, path.into_inner())? {
        return Err(AppError::NotFound);
    }
    Ok(HttpResponse::NoContent().finish())
}
