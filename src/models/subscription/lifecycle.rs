use rusqlite::Connection;

use crate::errors::AppError;
use crate::models::role::Actor;
use super::queries;
use super::types::{Subscription, SubscriptionStatus};

/// Drive a status transition on behalf of a reviewing actor.
///
/// Any reviewer may move a subscription to any status, including out of a
/// terminal one or onto the same status; that permissive behavior is kept
/// on purpose. The write refreshes `updated_at` only.
pub fn set_status(
    conn: &Connection,
    subscription_id: i64,
    new_status: SubscriptionStatus,
    actor: &Actor,
) -> Result<Subscription, AppError> {
    if !actor.role.can_review() {
        return Err(AppError::Forbidden("subscription.review".to_string()));
    }
    let updated = queries::update_status(conn, subscription_id, new_status)?
        .ok_or(AppError::NotFound)?;
    Ok(updated)
}
