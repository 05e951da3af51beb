use actix_session::Session;
use actix_web::{HttpResponse, web};

use crate::auth::session::{current_actor, log_in};
use crate::auth::{password, validate};
use crate::db::DbPool;
use crate::errors::{ApiErrorResponse, AppError};
use crate::models::user::{self, LoginInput, RegisterInput, UserView};

/// POST /api/auth/register - Create an account with the default `user` role
/// and establish a session.
pub async fn register(
    pool: web::Data<DbPool>,
    session: Session,
    body: web::Json<RegisterInput>,
) -> Result<HttpResponse, AppError> {
    let mut errors = Vec::new();
    errors.extend(validate::validate_email(&body.email));
    errors.extend(validate::validate_password(&body.password));
    if !errors.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiErrorResponse {
            error: "Validation failed".to_string(),
            details: Some(errors.join("; ")),
        }));
    }

    let conn = pool.get()?;

    if user::find_by_email(&conn, &body.email)?.is_some() {
        return Ok(HttpResponse::BadRequest().json(ApiErrorResponse {
            error: "User with this email already exists".to_string(),
            details: None,
        }));
    }

    let hashed = password::hash_password(&body.password)
        .map_err(|_| AppError::Hash("Password hash failed".to_string()))?;
    let created = user::create(&conn, &body.email, &hashed)?;

    log_in(&session, created.id, created.role);
    log::info!("Registered user {}", created.email);

    Ok(HttpResponse::Created().json(UserView::from(created)))
}

/// POST /api/auth/login - Verify credentials and establish a session.
pub async fn login(
    pool: web::Data<DbPool>,
    session: Session,
    body: web::Json<LoginInput>,
) -> Result<HttpResponse, AppError> {
    let conn = pool.get()?;

    let found = user::find_by_email(&conn, &body.email)?;
    match found {
        Some(u) if password::verify_password(&body.password, &u.password_hash) == Ok(true) => {
            log_in(&session, u.id, u.role);
            Ok(HttpResponse::Ok().json(UserView::from(u)))
        }
        // Same answer for unknown email and wrong password
        _ => Ok(HttpResponse::Unauthorized().json(ApiErrorResponse {
            error: "Invalid credentials".to_string(),
            details: None,
        })),
    }
}

/// POST /api/auth/logout
pub async fn logout(session: Session) -> Result<HttpResponse, AppError> {
    session.purge();
    Ok(HttpResponse::NoContent().finish())
}

/// GET /api/auth/me - The logged-in user, sans password hash.
pub async fn me(pool: web::Data<DbPool>, session: Session) -> Result<HttpResponse, AppError> {
    let actor = current_actor(&session)?;
    let conn = pool.get()?;
    let u = user::find_by_id(&conn, actor.user_id)?.ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Ok().json(UserView::from(u)))
}
