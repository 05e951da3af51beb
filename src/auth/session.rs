use actix_session::Session;

use crate::errors::AppError;
use crate::models::role::{Actor, Role};

pub fn get_user_id(session: &Session) -> Option<i64> {
    session.get::<i64>("user_id").unwrap_or(None)
}

/// Store the logged-in identity. The role is captured at login time; a
/// role change by an admin takes effect on the next login.
pub fn log_in(session: &Session, user_id: i64, role: Role) {
    let _ = session.insert("user_id", user_id);
    let _ = session.insert("role", role.as_str());
}

/// Resolve the actor context from the session.
pub fn current_actor(session: &Session) -> Result<Actor, AppError> {
    let user_id = get_user_id(session)
        .ok_or_else(|| AppError::Session("Not logged in".to_string()))?;
    let role_raw = session
        .get::<String>("role")
        .unwrap_or(None)
        .ok_or_else(|| AppError::Session("No role in session".to_string()))?;
    let role = Role::parse(&role_raw)
        .ok_or_else(|| AppError::Session(format!("Unknown role in session: {role_raw}")))?;
    Ok(Actor { user_id, role })
}

/// Actor with form authoring rights (manager or admin).
pub fn require_form_manager(session: &Session) -> Result<Actor, AppError> {
    let actor = current_actor(session)?;
    if actor.role.can_manage_forms() {
        Ok(actor)
    } else {
        Err(AppError::Forbidden("form.manage".to_string()))
    }
}

/// Actor with subscription review rights (manager or admin).
pub fn require_reviewer(session: &Session) -> Result<Actor, AppError> {
    let actor = current_actor(session)?;
    if actor.role.can_review() {
        Ok(actor)
    } else {
        Err(AppError::Forbidden("subscription.review".to_string()))
    }
}

/// Actor with account administration rights (admin).
pub fn require_admin(session: &Session) -> Result<Actor, AppError> {
    let actor = current_actor(session)?;
    if actor.role.can_manage_users() {
        Ok(actor)
    } else {
        Err(AppError::Forbidden("user.manage".to_string()))
    }
}
