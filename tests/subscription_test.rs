//! Subscription tests — creation, filtered listing, ownership reads, and
//! the status lifecycle with its role gate.

mod common;

use serde_json::{Map, Value, json};
use std::thread;
use std::time::Duration;

use common::*;
use formsub::errors::AppError;
use formsub::models::form::queries as form_queries;
use formsub::models::role::{Actor, Role};
use formsub::models::subscription::{
    SubscriptionFilter, SubscriptionStatus, lifecycle, queries,
};

fn data(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => panic!("data fixture must be a JSON object"),
    }
}

fn setup_form(conn: &rusqlite::Connection) -> (i64, i64) {
    let author = insert_user(conn, "author@example.com", Role::Manager);
    let form = form_queries::create(conn, "Signup", None, true, author).expect("create form");
    (form.id, author)
}

#[test]
fn test_create_starts_pending() {
    let (_dir, conn) = setup_test_db();
    let (form_id, _) = setup_form(&conn);
    let submitter = insert_user(&conn, "user@example.com", Role::User);

    let sub = queries::create(&conn, form_id, submitter, &data(json!({"name": "ada"})))
        .expect("create subscription");

    assert!(sub.id > 0);
    assert_eq!(sub.status, SubscriptionStatus::Pending);
    assert_eq!(sub.data.get("name"), Some(&json!("ada")));
    assert_eq!(sub.submitted_at, sub.updated_at);
}

#[test]
fn test_find_filtered_combinations() {
    let (_dir, conn) = setup_test_db();
    let (form_a, author) = setup_form(&conn);
    let form_b = form_queries::create(&conn, "Other", None, true, author)
        .expect("create form")
        .id;
    let alice = insert_user(&conn, "alice@example.com", Role::User);
    let bob = insert_user(&conn, "bob@example.com", Role::User);

    let s1 = queries::create(&conn, form_a, alice, &data(json!({}))).expect("s1");
    let s2 = queries::create(&conn, form_a, bob, &data(json!({}))).expect("s2");
    let s3 = queries::create(&conn, form_b, alice, &data(json!({}))).expect("s3");

    let reviewer = Actor {
        user_id: author,
        role: Role::Manager,
    };
    lifecycle::set_status(&conn, s2.id, SubscriptionStatus::Approved, &reviewer).expect("approve");

    // No filter: everything
    let all = queries::find_filtered(&conn, &SubscriptionFilter::default()).expect("all");
    assert_eq!(all.len(), 3);

    // By form
    let by_form = queries::find_filtered(
        &conn,
        &SubscriptionFilter {
            form_id: Some(form_a),
            ..Default::default()
        },
    )
    .expect("by form");
    assert_eq!(by_form.len(), 2);

    // By user
    let by_user = queries::find_filtered(
        &conn,
        &SubscriptionFilter {
            user_id: Some(alice),
            ..Default::default()
        },
    )
    .expect("by user");
    assert_eq!(by_user.iter().map(|s| s.id).collect::<Vec<_>>(), [s1.id, s3.id]);

    // Combined form + status
    let approved_on_a = queries::find_filtered(
        &conn,
        &SubscriptionFilter {
            form_id: Some(form_a),
            status: Some(SubscriptionStatus::Approved),
            ..Default::default()
        },
    )
    .expect("combined");
    assert_eq!(approved_on_a.len(), 1);
    assert_eq!(approved_on_a[0].id, s2.id);
}

#[test]
fn test_ownership_read() {
    let (_dir, conn) = setup_test_db();
    let (form_id, _) = setup_form(&conn);
    let alice = insert_user(&conn, "alice@example.com", Role::User);
    let bob = insert_user(&conn, "bob@example.com", Role::User);

    let sub = queries::create(&conn, form_id, alice, &data(json!({}))).expect("create");

    let own = queries::find_by_id_for_user(&conn, sub.id, alice).expect("query");
    assert!(own.is_some());

    let foreign = queries::find_by_id_for_user(&conn, sub.id, bob).expect("query");
    assert!(foreign.is_none(), "other users' subscriptions stay invisible");
}

#[test]
fn test_manager_approves_pending() {
    let (_dir, conn) = setup_test_db();
    let (form_id, _) = setup_form(&conn);
    let submitter = insert_user(&conn, "user@example.com", Role::User);
    let manager = insert_user(&conn, "manager@example.com", Role::Manager);

    let sub = queries::create(&conn, form_id, submitter, &data(json!({"name": "ada"})))
        .expect("create");

    // Timestamps are microsecond-resolution strings
    thread::sleep(Duration::from_millis(2));

    let actor = Actor {
        user_id: manager,
        role: Role::Manager,
    };
    let updated = lifecycle::set_status(&conn, sub.id, SubscriptionStatus::Approved, &actor)
        .expect("approve");

    assert_eq!(updated.status, SubscriptionStatus::Approved);
    assert!(
        updated.updated_at > sub.updated_at,
        "updated_at must be refreshed"
    );
    assert_eq!(updated.submitted_at, sub.submitted_at);
    assert_eq!(updated.data, sub.data);
}

#[test]
fn test_user_role_cannot_transition() {
    let (_dir, conn) = setup_test_db();
    let (form_id, _) = setup_form(&conn);
    let submitter = insert_user(&conn, "user@example.com", Role::User);

    let sub = queries::create(&conn, form_id, submitter, &data(json!({}))).expect("create");

    let actor = Actor {
        user_id: submitter,
        role: Role::User,
    };
    let err = lifecycle::set_status(&conn, sub.id, SubscriptionStatus::Approved, &actor)
        .expect_err("user role must be rejected");
    assert!(matches!(err, AppError::Forbidden(_)));

    // Status unchanged
    let reread = queries::find_by_id(&conn, sub.id).expect("query").expect("exists");
    assert_eq!(reread.status, SubscriptionStatus::Pending);
    assert_eq!(reread.updated_at, sub.updated_at);
}

#[test]
fn test_admin_can_transition() {
    let (_dir, conn) = setup_test_db();
    let (form_id, _) = setup_form(&conn);
    let submitter = insert_user(&conn, "user@example.com", Role::User);
    let admin = insert_user(&conn, "admin@example.com", Role::Admin);

    let sub = queries::create(&conn, form_id, submitter, &data(json!({}))).expect("create");

    let actor = Actor {
        user_id: admin,
        role: Role::Admin,
    };
    let updated = lifecycle::set_status(&conn, sub.id, SubscriptionStatus::Cancelled, &actor)
        .expect("cancel");
    assert_eq!(updated.status, SubscriptionStatus::Cancelled);
}

#[test]
fn test_terminal_states_stay_permissive() {
    // The original imposes no transition table; moving out of a terminal
    // state (or onto the same state) is allowed and kept that way.
    let (_dir, conn) = setup_test_db();
    let (form_id, _) = setup_form(&conn);
    let submitter = insert_user(&conn, "user@example.com", Role::User);
    let manager = insert_user(&conn, "manager@example.com", Role::Manager);

    let sub = queries::create(&conn, form_id, submitter, &data(json!({}))).expect("create");
    let actor = Actor {
        user_id: manager,
        role: Role::Manager,
    };

    lifecycle::set_status(&conn, sub.id, SubscriptionStatus::Rejected, &actor).expect("reject");
    let reopened = lifecycle::set_status(&conn, sub.id, SubscriptionStatus::Pending, &actor)
        .expect("terminal state is not locked");
    assert_eq!(reopened.status, SubscriptionStatus::Pending);

    let same = lifecycle::set_status(&conn, sub.id, SubscriptionStatus::Pending, &actor)
        .expect("self-transition is not rejected");
    assert_eq!(same.status, SubscriptionStatus::Pending);
}

#[test]
fn test_set_status_unknown_id() {
    let (_dir, conn) = setup_test_db();
    let manager = insert_user(&conn, "manager@example.com", Role::Manager);

    let actor = Actor {
        user_id: manager,
        role: Role::Manager,
    };
    let err = lifecycle::set_status(&conn, 999_999, SubscriptionStatus::Approved, &actor)
        .expect_err("unknown id must fail");
    assert!(matches!(err, AppError::NotFound));
}

#[test]
fn test_form_with_subscriptions_blocks_deletion() {
    let (_dir, conn) = setup_test_db();
    let (form_id, _) = setup_form(&conn);
    let submitter = insert_user(&conn, "user@example.com", Role::User);
    queries::create(&conn, form_id, submitter, &data(json!({}))).expect("create");

    let result = form_queries::delete(&conn, form_id);
    assert!(result.is_err(), "subscription FK must block form deletion");
}
