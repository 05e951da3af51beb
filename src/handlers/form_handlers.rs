use actix_session::Session;
use actix_web::{HttpResponse, web};

use crate::auth::session::{current_actor, require_form_manager};
use crate::auth::validate;
use crate::db::DbPool;
use crate::errors::{ApiErrorResponse, AppError};
use crate::models::form::{CreateFormInput, UpdateFormInput, queries};

/// POST /api/forms - Create a form, active by default (manager/admin).
pub async fn create(
    pool: web::Data<DbPool>,
    session: Session,
    body: web::Json<CreateFormInput>,
) -> Result<HttpResponse, AppError> {
    let actor = require_form_manager(&session)?;

    if let Some(problem) = validate::validate_required(&body.name, "Name", 200) {
        return Ok(HttpResponse::BadRequest().json(ApiErrorResponse {
            error: "Validation failed".to_string(),
            details: Some(problem),
        }));
    }

    let conn = pool.get()?;
    let form = queries::create(
        &conn,
        &body.name,
        body.description.as_deref(),
        body.is_active.unwrap_or(true),
        actor.user_id,
    )?;
    log::info!("Form '{}' created by user {}", form.name, actor.user_id);

    Ok(HttpResponse::Created().json(form))
}

/// GET /api/forms - All forms, active or not (manager/admin).
pub async fn list(pool: web::Data<DbPool>, session: Session) -> Result<HttpResponse, AppError> {
    require_form_manager(&session)?;
    let conn = pool.get()?;
    Ok(HttpResponse::Ok().json(queries::find_all(&conn)?))
}

/// GET /api/forms/available - The submittable set: active forms only.
pub async fn available(
    pool: web::Data<DbPool>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    current_actor(&session)?;
    let conn = pool.get()?;
    Ok(HttpResponse::Ok().json(queries::find_available(&conn)?))
}

/// GET /api/forms/{id} - Form with its ordered field list.
pub async fn read(
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    current_actor(&session)?;
    let conn = pool.get()?;
    let form = queries::find_with_fields(&conn, path.into_inner())?.ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Ok().json(form))
}

/// PUT /api/forms/{id} - Partial update of name/description/is_active
/// (manager/admin).
pub async fn update(
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<i64>,
    body: web::Json<UpdateFormInput>,
) -> Result<HttpResponse, AppError> {
    require_form_manager(&session)?;

    if let Some(name) = &body.name {
        if let Some(problem) = validate::validate_required(name, "Name", 200) {
            return Ok(HttpResponse::BadRequest().json(ApiErrorResponse {
                error: "Validation failed".to_string(),
                details: Some(problem),
            }));
        }
    }

    let conn = pool.get()?;
    let updated = queries::update(&conn, path.into_inner(), &body)?.ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Ok().json(updated))
}

/// DELETE /api/forms/{id} (manager/admin). Fields cascade; a form with
/// subscriptions is blocked by the FK.
pub async fn delete(
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    require_form_manager(&session)?;
    let conn = pool.get()?;
    if !queries::delete(&conn, path.into_inner())? {
        return Err(AppError::NotFound);
    }
    Ok(HttpResponse::NoContent().finish())
}
