pub mod auth_handlers;
pub mod field_handlers;
pub mod form_handlers;
pub mod subscription_handlers;
pub mod user_handlers;

use actix_web::{
    Error, HttpResponse,
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    middleware::Next,
    web,
};

use crate::auth;

/// CSRF protection for API mutation endpoints.
///
/// Rejects POST/PUT/DELETE requests that don't have Content-Type:
/// application/json. Browsers cannot send cross-origin JSON with cookies
/// via simple form POST, so the Content-Type check acts as a CSRF guard
/// without requiring tokens. GET requests are exempt (read-only).
pub async fn require_json_content_type(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let method = req.method().clone();

    if method == actix_web::http::Method::POST
        || method == actix_web::http::Method::PUT
        || method == actix_web::http::Method::DELETE
    {
        let content_type = req
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");

        if !content_type.starts_with("application/json") {
            let body = serde_json::json!({
                "error": "Content-Type must be application/json for mutation requests"
            });
            let response = HttpResponse::BadRequest().json(body);
            return Ok(req.into_response(response).map_into_right_body());
        }
    }

    next.call(req).await.map(|res| res.map_into_left_body())
}

/// Configure the /api route table.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .wrap(actix_web::middleware::from_fn(require_json_content_type))
            // Public routes
            .route("/auth/register", web::post().to(auth_handlers::register))
            .route("/auth/login", web::post().to(auth_handlers::login))
            // Protected routes
            .service(
                web::scope("")
                    .wrap(actix_web::middleware::from_fn(auth::middleware::require_auth))
                    .route("/auth/logout", web::post().to(auth_handlers::logout))
                    .route("/auth/me", web::get().to(auth_handlers::me))
                    // User administration
                    .route("/users", web::get().to(user_handlers::list))
                    .route("/users/{id}", web::get().to(user_handlers::read))
                    .route("/users/{id}", web::put().to(user_handlers::update))
                    .route("/users/{id}", web::delete().to(user_handlers::delete))
                    // Forms — /forms/available BEFORE /forms/{id} to avoid routing conflict
                    .route("/forms", web::post().to(form_handlers::create))
                    .route("/forms", web::get().to(form_handlers::list))
                    .route("/forms/available", web::get().to(form_handlers::available))
                    .route("/forms/{id}", web::get().to(form_handlers::read))
                    .route("/forms/{id}", web::put().to(form_handlers::update))
                    .route("/forms/{id}", web::delete().to(form_handlers::delete))
                    // Fields
                    .route("/forms/{form_id}/fields", web::post().to(field_handlers::create))
                    .route("/fields/{id}", web::put().to(field_handlers::update))
                    .route("/fields/{id}", web::delete().to(field_handlers::delete))
                    // Subscriptions — /mine BEFORE /{id}
                    .route("/subscriptions", web::post().to(subscription_handlers::submit))
                    .route("/subscriptions", web::get().to(subscription_handlers::list))
                    .route("/subscriptions/mine", web::get().to(subscription_handlers::mine))
                    .route("/subscriptions/mine/{id}", web::get().to(subscription_handlers::mine_read))
                    .route("/subscriptions/{id}", web::get().to(subscription_handlers::read))
                    .route("/subscriptions/{id}/status", web::put().to(subscription_handlers::update_status)),
            ),
    );
}
