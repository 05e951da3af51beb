use actix_session::Session;
use actix_web::{HttpResponse, web};

use crate::auth::session::require_admin;
use crate::auth::validate;
use crate::db::DbPool;
use crate::errors::{ApiErrorResponse, AppError};
use crate::models::user::{self, UpdateUserInput, UserView};

/// GET /api/users - List all accounts (admin).
pub async fn list(pool: web::Data<DbPool>, session: Session) -> Result<HttpResponse, AppError> {
    require_admin(&session)?;
    let conn = pool.get()?;
    let users: Vec<UserView> = user::find_all(&conn)?
        .into_iter()
        .map(UserView::from)
        .collect();
    Ok(HttpResponse::Ok().json(users))
}

/// GET /api/users/{id} (admin).
pub async fn read(
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    require_admin(&session)?;
    let conn = pool.get()?;
    let u = user::find_by_id(&conn, path.into_inner())?.ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Ok().json(UserView::from(u)))
}

/// PUT /api/users/{id} - Update email and/or role (admin).
pub async fn update(
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<i64>,
    body: web::Json<UpdateUserInput>,
) -> Result<HttpResponse, AppError> {
    require_admin(&session)?;

    if let Some(email) = &body.email {
        if let Some(problem) = validate::validate_email(email) {
            return Ok(HttpResponse::BadRequest().json(ApiErrorResponse {
                error: "Validation failed".to_string(),
                details: Some(problem),
            }));
        }
    }

    let conn = pool.get()?;
    let updated = user::update(&conn, path.into_inner(), &body)?.ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Ok().json(UserView::from(updated)))
}

/// DELETE /api/users/{id} (admin).
pub async fn delete(
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    require_admin(&session)?;
    let conn = pool.get()?;
    if !user::delete(&conn, path.into_inner())? {
        return Err(AppError::NotFound);
    }
    Ok(HttpResponse::NoContent().finish())
}
