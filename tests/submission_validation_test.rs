//! Payload validation tests — the per-type rules, required handling,
//! fail-fast ordering, and pass-through of unknown keys. The validator is
//! pure, so these tests build definitions in memory.

use serde_json::{Map, Value, json};

use formsub::models::form::validate::{PayloadError, validate_submission};
use formsub::models::form::{FieldOption, FieldType, Form, FormField, FormWithFields};

fn field(
    name: &str,
    field_type: FieldType,
    is_required: bool,
    order: i64,
    options: Option<Vec<(&str, &str)>>,
) -> FormField {
    FormField {
        id: order,
        form_id: 1,
        field_name: name.to_string(),
        field_type,
        is_required,
        order,
        options: options.map(|opts| {
            opts.into_iter()
                .map(|(value, label)| FieldOption {
                    value: value.to_string(),
                    label: label.to_string(),
                })
                .collect()
        }),
        placeholder: None,
        created_at: "2024-01-01T00:00:00.000000Z".to_string(),
        updated_at: "2024-01-01T00:00:00.000000Z".to_string(),
    }
}

fn definition(fields: Vec<FormField>) -> FormWithFields {
    FormWithFields {
        form: Form {
            id: 1,
            name: "Test form".to_string(),
            description: None,
            created_by_user_id: 1,
            is_active: true,
            created_at: "2024-01-01T00:00:00.000000Z".to_string(),
            updated_at: "2024-01-01T00:00:00.000000Z".to_string(),
        },
        fields,
    }
}

fn payload(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => panic!("payload fixture must be a JSON object"),
    }
}

#[test]
fn test_select_accepts_known_option() {
    let form = definition(vec![field(
        "country",
        FieldType::Select,
        true,
        1,
        Some(vec![("us", "United States"), ("ca", "Canada")]),
    )]);
    let data = payload(json!({"country": "us"}));

    validate_submission(&form, &data).expect("known option value must validate");
    // Accepted payload is stored unchanged
    assert_eq!(data.get("country"), Some(&json!("us")));
}

#[test]
fn test_select_rejects_unknown_option() {
    let form = definition(vec![field(
        "country",
        FieldType::Select,
        true,
        1,
        Some(vec![("us", "United States"), ("ca", "Canada")]),
    )]);
    let data = payload(json!({"country": "fr"}));

    let err = validate_submission(&form, &data).expect_err("unknown option must fail");
    assert_eq!(err, PayloadError::InvalidOptionValue("country".to_string()));
}

#[test]
fn test_required_field_missing() {
    let form = definition(vec![field("age", FieldType::Number, true, 1, None)]);
    let data = payload(json!({}));

    let err = validate_submission(&form, &data).expect_err("missing required must fail");
    assert_eq!(err, PayloadError::RequiredFieldMissing("age".to_string()));
}

#[test]
fn test_empty_values_count_as_absent() {
    let form = definition(vec![
        field("name", FieldType::Text, true, 1, None),
        field(
            "tags",
            FieldType::Checkbox,
            true,
            2,
            Some(vec![("a", "A"), ("b", "B")]),
        ),
    ]);

    let err = validate_submission(&form, &payload(json!({"name": "", "tags": ["a"]})))
        .expect_err("empty string is absent");
    assert_eq!(err, PayloadError::RequiredFieldMissing("name".to_string()));

    let err = validate_submission(&form, &payload(json!({"name": "x", "tags": []})))
        .expect_err("empty list is absent");
    assert_eq!(err, PayloadError::RequiredFieldMissing("tags".to_string()));

    let err = validate_submission(&form, &payload(json!({"name": null, "tags": ["a"]})))
        .expect_err("null is absent");
    assert_eq!(err, PayloadError::RequiredFieldMissing("name".to_string()));
}

#[test]
fn test_optional_absent_field_skips_type_check() {
    let form = definition(vec![field("age", FieldType::Number, false, 1, None)]);
    validate_submission(&form, &payload(json!({}))).expect("absent optional field is fine");
}

#[test]
fn test_number_accepts_json_number_and_numeric_string() {
    let form = definition(vec![field("age", FieldType::Number, true, 1, None)]);

    validate_submission(&form, &payload(json!({"age": 42}))).expect("integer");
    validate_submission(&form, &payload(json!({"age": 4.5}))).expect("float");
    validate_submission(&form, &payload(json!({"age": "42"}))).expect("numeric string");

    let err = validate_submission(&form, &payload(json!({"age": "not a number"})))
        .expect_err("non-numeric string must fail");
    assert!(matches!(err, PayloadError::InvalidFieldValue { .. }));

    let err = validate_submission(&form, &payload(json!({"age": true})))
        .expect_err("boolean must fail");
    assert!(matches!(err, PayloadError::InvalidFieldValue { .. }));
}

#[test]
fn test_date_requires_calendar_date() {
    let form = definition(vec![field("born", FieldType::Date, true, 1, None)]);

    validate_submission(&form, &payload(json!({"born": "1990-07-15"}))).expect("valid date");

    for bad in ["15/07/1990", "1990-13-01", "1990-02-30", "yesterday"] {
        let err = validate_submission(&form, &payload(json!({ "born": bad })))
            .expect_err("bad date must fail");
        assert!(matches!(err, PayloadError::InvalidFieldValue { .. }), "{bad}");
    }
}

#[test]
fn test_text_accepts_any_string_rejects_non_string() {
    let form = definition(vec![field("bio", FieldType::Textarea, true, 1, None)]);

    validate_submission(&form, &payload(json!({"bio": "anything at all \u{1F980}"})))
        .expect("any string");

    let err = validate_submission(&form, &payload(json!({"bio": 12})))
        .expect_err("non-string must fail");
    assert!(matches!(err, PayloadError::InvalidFieldValue { .. }));
}

#[test]
fn test_checkbox_membership_and_duplicates() {
    let form = definition(vec![field(
        "toppings",
        FieldType::Checkbox,
        false,
        1,
        Some(vec![("ham", "Ham"), ("olives", "Olives")]),
    )]);

    validate_submission(&form, &payload(json!({"toppings": ["ham", "olives"]}))).expect("subset");
    // Duplicate selections are allowed; only membership is checked
    validate_submission(&form, &payload(json!({"toppings": ["ham", "ham"]}))).expect("dupes");

    let err = validate_submission(&form, &payload(json!({"toppings": ["ham", "pineapple"]})))
        .expect_err("unknown member must fail");
    assert_eq!(err, PayloadError::InvalidOptionValue("toppings".to_string()));

    let err = validate_submission(&form, &payload(json!({"toppings": "ham"})))
        .expect_err("bare string must fail");
    assert_eq!(err, PayloadError::InvalidOptionValue("toppings".to_string()));
}

#[test]
fn test_fail_fast_reports_first_field_in_order() {
    // "b" has the lower order, so its violation must win even though "a"
    // is also invalid and sits earlier in the stored sequence.
    let form = definition(vec![
        field("a", FieldType::Number, true, 10, None),
        field("b", FieldType::Number, true, 1, None),
    ]);
    let err = validate_submission(&form, &payload(json!({})))
        .expect_err("both missing, first in order wins");
    assert_eq!(err, PayloadError::RequiredFieldMissing("b".to_string()));
}

#[test]
fn test_unknown_keys_pass_through() {
    let form = definition(vec![field("name", FieldType::Text, true, 1, None)]);
    let data = payload(json!({"name": "ada", "stray": {"nested": true}}));

    validate_submission(&form, &data).expect("unknown keys are not an error");
    assert!(data.contains_key("stray"));
}

#[test]
fn test_validation_is_idempotent() {
    let form = definition(vec![
        field("name", FieldType::Text, true, 1, None),
        field(
            "country",
            FieldType::Select,
            true,
            2,
            Some(vec![("us", "United States"), ("ca", "Canada")]),
        ),
    ]);
    let data = payload(json!({"name": "ada", "country": "ca"}));

    // Accepted output is the payload unchanged, so it validates again
    validate_submission(&form, &data).expect("first pass");
    validate_submission(&form, &data).expect("second pass");
}
