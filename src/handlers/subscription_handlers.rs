use actix_session::Session;
use actix_web::{HttpResponse, web};
use std::collections::HashMap;

use crate::auth::session::{current_actor, require_reviewer};
use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::form;
use crate::models::form::validate::validate_submission;
use crate::models::subscription::{
    StatusInput, SubmitInput, SubscriptionFilter, SubscriptionStatus, lifecycle, queries,
};

/// POST /api/subscriptions - Submit a payload against an active form.
/// The payload is validated against the form's field set and stored
/// unchanged in `pending` state.
pub async fn submit(
    pool: web::Data<DbPool>,
    session: Session,
    body: web::Json<SubmitInput>,
) -> Result<HttpResponse, AppError> {
    let actor = current_actor(&session)?;
    let conn = pool.get()?;

    let definition = form::queries::find_with_fields(&conn, body.form_id)?.ok_or(AppError::NotFound)?;
    if !definition.is_submittable() {
        return Err(AppError::BadRequest("Form is not active".to_string()));
    }

    validate_submission(&definition, &body.data)?;

    let subscription = queries::create(&conn, body.form_id, actor.user_id, &body.data)?;
    log::info!(
        "Subscription {} created against form {} by user {}",
        subscription.id,
        body.form_id,
        actor.user_id
    );
    Ok(HttpResponse::Created().json(subscription))
}

/// GET /api/subscriptions - Review listing with optional form_id, user_id,
/// and status filters (manager/admin).
pub async fn list(
    pool: web::Data<DbPool>,
    session: Session,
    query: web::Query<HashMap<String, String>>,
) -> Result<HttpResponse, AppError> {
    require_reviewer(&session)?;

    let status = match query.get("status") {
        Some(raw) => Some(
            SubscriptionStatus::parse(raw)
                .ok_or_else(|| AppError::BadRequest(format!("Unknown status '{raw}'")))?,
        ),
        None => None,
    };
    let filter = SubscriptionFilter {
        form_id: query.get("form_id").and_then(|s| s.parse().ok()),
        user_id: query.get("user_id").and_then(|s| s.parse().ok()),
        status,
    };

    let conn = pool.get()?;
    Ok(HttpResponse::Ok().json(queries::find_filtered(&conn, &filter)?))
}

/// GET /api/subscriptions/{id} (manager/admin).
pub async fn read(
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    require_reviewer(&session)?;
    let conn = pool.get()?;
    let sub = queries::find_by_id(&conn, path.into_inner())?.ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Ok().json(sub))
}

/// PUT /api/subscriptions/{id}/status - Drive a status transition.
/// Role authorization happens inside the lifecycle, not here.
pub async fn update_status(
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<i64>,
    body: web::Json<StatusInput>,
) -> Result<HttpResponse, AppError> {
    let actor = current_actor(&session)?;
    let conn = pool.get()?;
    let updated = lifecycle::set_status(&conn, path.into_inner(), body.status, &actor)?;
    log::info!(
        "Subscription {} set to {} by user {}",
        updated.id,
        updated.status.as_str(),
        actor.user_id
    );
    Ok(HttpResponse::Ok().json(updated))
}

/// GET /api/subscriptions/mine - The caller's own submissions.
pub async fn mine(pool: web::Data<DbPool>, session: Session) -> Result<HttpResponse, AppError> {
    let actor = current_actor(&session)?;
    let conn = pool.get()?;
    Ok(HttpResponse::Ok().json(queries::find_for_user(&conn, actor.user_id)?))
}

/// GET /api/subscriptions/mine/{id} - Ownership-checked single read;
/// other users' subscriptions answer 404, not 403.
pub async fn mine_read(
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let actor = current_actor(&session)?;
    let conn = pool.get()?;
    let sub = queries::find_by_id_for_user(&conn, path.into_inner(), actor.user_id)?
        .ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Ok().json(sub))
}
