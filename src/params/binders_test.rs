//! Tests for parameter binders

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde_json::{Value, json};

use super::*;

fn args(value: Value) -> Arguments {
    match value {
        Value::Object(map) => map,
        other => panic!("test arguments must be an object, got {other}"),
    }
}

#[derive(Debug, Default, PartialEq)]
struct Assignees {
    user_ids: Vec<i64>,
    company_ids: Vec<i64>,
}

#[test]
fn test_absent_optional_keeps_default() {
    let mut name = String::from("unchanged");
    let mut limit: u32 = 0;
    let mut search: Option<String> = None;

    bind_group(
        &args(json!({})),
        [
            optional_param(&mut name, "name"),
            optional_numeric_param(&mut limit, "limit"),
            optional_pointer_param(&mut search, "search-term"),
        ],
    )
    .unwrap();

    assert_eq!(name, "unchanged");
    assert_eq!(limit, 0);
    assert_eq!(search, None);
}

#[test]
fn test_null_is_treated_as_absent() {
    let mut search: Option<String> = None;
    bind_group(
        &args(json!({"search-term": null})),
        [optional_pointer_param(&mut search, "search-term")],
    )
    .unwrap();
    assert_eq!(search, None);
}

#[test]
fn test_present_values_are_assigned() {
    let mut name = String::new();
    let mut id: i64 = 0;
    let mut billable: Option<bool> = None;
    let mut progress: Option<u8> = None;

    bind_group(
        &args(json!({"name": "Website", "id": 42, "billable": true, "progress": 80})),
        [
            required_param(&mut name, "name"),
            required_numeric_param(&mut id, "id"),
            optional_pointer_param(&mut billable, "billable"),
            optional_numeric_pointer_param(&mut progress, "progress"),
        ],
    )
    .unwrap();

    assert_eq!(name, "Website");
    assert_eq!(id, 42);
    assert_eq!(billable, Some(true));
    assert_eq!(progress, Some(80));
}

#[test]
fn test_wrong_type_names_the_field() {
    let mut name = String::new();
    let err = bind_group(&args(json!({"name": 7})), [required_param(&mut name, "name")])
        .unwrap_err();

    assert_eq!(err.fields(), vec!["name"]);
    assert_eq!(err.to_string(), r#"field "name": expected string, got number"#);
}

#[test]
fn test_every_missing_required_field_is_reported() {
    let mut name = String::new();
    let mut project_id: i64 = 0;
    let mut tag: Option<String> = None;

    let err = bind_group(
        &args(json!({"tag": 3})),
        [
            required_param(&mut name, "name"),
            required_numeric_param(&mut project_id, "project-id"),
            optional_pointer_param(&mut tag, "tag"),
        ],
    )
    .unwrap_err();

    assert_eq!(err.fields(), vec!["name", "project-id", "tag"]);
    assert_eq!(
        err.to_string(),
        r#"field "name": is required; field "project-id": is required; field "tag": expected string, got number"#
    );
}

#[test]
fn test_numeric_range_is_checked() {
    let mut progress: Option<u8> = None;
    let err = bind_group(
        &args(json!({"progress": 300})),
        [optional_numeric_pointer_param(&mut progress, "progress")],
    )
    .unwrap_err();
    assert_eq!(
        err.errors[0].reason,
        "value 300 is out of range [0, 255]"
    );

    let mut page: u32 = 0;
    let err = bind_group(&args(json!({"page": -1})), [optional_numeric_param(&mut page, "page")])
        .unwrap_err();
    assert!(err.errors[0].reason.contains("out of range"));
}

#[test]
fn test_integral_float_is_accepted_fraction_is_not() {
    let mut id: i64 = 0;
    bind_group(&args(json!({"id": 12.0})), [required_numeric_param(&mut id, "id")]).unwrap();
    assert_eq!(id, 12);

    let err = bind_group(&args(json!({"id": 1.5})), [required_numeric_param(&mut id, "id")])
        .unwrap_err();
    assert_eq!(err.errors[0].reason, "expected an integer, got 1.5");
}

#[test]
fn test_float_param() {
    let mut rate: Option<f64> = None;
    bind_group(
        &args(json!({"rate": 2.5})),
        [optional_numeric_pointer_param(&mut rate, "rate")],
    )
    .unwrap();
    assert_eq!(rate, Some(2.5));
}

#[test]
fn test_numeric_list_reports_bad_element() {
    let mut tag_ids: Vec<i64> = Vec::new();
    let err = bind_group(
        &args(json!({"tag-ids": [1, 2, "3"]})),
        [optional_numeric_list_param(&mut tag_ids, "tag-ids")],
    )
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        r#"field "tag-ids": element 2: expected number, got string"#
    );

    bind_group(
        &args(json!({"tag-ids": [1, 2, 3]})),
        [optional_numeric_list_param(&mut tag_ids, "tag-ids")],
    )
    .unwrap();
    assert_eq!(tag_ids, vec![1, 2, 3]);
}

#[test]
fn test_list_pointer_distinguishes_empty_from_absent() {
    let mut absent: Option<Vec<i64>> = None;
    let mut empty: Option<Vec<i64>> = None;
    bind_group(
        &args(json!({"b": []})),
        [
            optional_numeric_list_pointer_param(&mut absent, "a"),
            optional_numeric_list_pointer_param(&mut empty, "b"),
        ],
    )
    .unwrap();
    assert_eq!(absent, None);
    assert_eq!(empty, Some(vec![]));
}

#[test]
fn test_list_rejects_non_array() {
    let mut names: Vec<String> = Vec::new();
    let err = bind_group(
        &args(json!({"names": "a,b"})),
        [optional_list_param(&mut names, "names")],
    )
    .unwrap_err();
    assert_eq!(err.errors[0].reason, "expected array, got string");
}

#[test]
fn test_restrict_rejects_unknown_value() {
    const PRIORITIES: &[&str] = &["low", "medium", "high"];
    let mut priority: Option<String> = None;

    let err = bind_group(
        &args(json!({"priority": "urgent"})),
        [optional_pointer_param(&mut priority, "priority").restrict(PRIORITIES)],
    )
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        r#"field "priority": must be one of [low, medium, high], got "urgent""#
    );
    assert_eq!(priority, None);

    bind_group(
        &args(json!({"priority": "high"})),
        [optional_pointer_param(&mut priority, "priority").restrict(PRIORITIES)],
    )
    .unwrap();
    assert_eq!(priority.as_deref(), Some("high"));
}

#[test]
fn test_restrict_checks_list_elements() {
    const KINDS: &[&str] = &["task", "project"];
    let mut kinds: Vec<String> = Vec::new();
    let err = bind_group(
        &args(json!({"kinds": ["task", "invoice"]})),
        [optional_list_param(&mut kinds, "kinds").restrict(KINDS)],
    )
    .unwrap_err();
    assert!(err.errors[0].reason.contains(r#"got "invoice""#));
}

#[test]
fn test_at_least_rejects_smaller_numbers() {
    let mut size: Option<u32> = None;

    let err = bind_group(
        &args(json!({"page-size": 0})),
        [optional_numeric_pointer_param(&mut size, "page-size").at_least(1)],
    )
    .unwrap_err();
    assert_eq!(err.to_string(), r#"field "page-size": must be at least 1"#);
    assert_eq!(size, None);

    let err = bind_group(
        &args(json!({"page-size": -3})),
        [optional_numeric_pointer_param(&mut size, "page-size").at_least(1)],
    )
    .unwrap_err();
    assert_eq!(err.errors[0].reason, "must be at least 1");

    bind_group(
        &args(json!({"page-size": 1})),
        [optional_numeric_pointer_param(&mut size, "page-size").at_least(1)],
    )
    .unwrap();
    assert_eq!(size, Some(1));
}

#[test]
fn test_dates_and_times() {
    let mut date = NaiveDate::default();
    let mut due: Option<NaiveDate> = None;
    let mut time = NaiveTime::default();
    let mut since: Option<DateTime<Utc>> = None;

    bind_group(
        &args(json!({
            "date": "2024-02-29",
            "due-date": "2024-03-01",
            "time": "09:30:00",
            "start-date": "2024-01-01T10:00:00+02:00",
        })),
        [
            required_date_param(&mut date, "date"),
            optional_date_pointer_param(&mut due, "due-date"),
            required_time_only_param(&mut time, "time"),
            optional_time_param(&mut since, "start-date"),
        ],
    )
    .unwrap();

    assert_eq!(date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    assert_eq!(due, NaiveDate::from_ymd_opt(2024, 3, 1));
    assert_eq!(time, NaiveTime::from_hms_opt(9, 30, 0).unwrap());
    assert_eq!(
        since.unwrap().to_rfc3339(),
        "2024-01-01T08:00:00+00:00"
    );
}

#[test]
fn test_malformed_dates_are_rejected() {
    let mut date = NaiveDate::default();
    let mut time: Option<NaiveTime> = None;
    let mut since: Option<DateTime<Utc>> = None;

    let err = bind_group(
        &args(json!({"date": "02/29/2024", "time": "9am", "since": "yesterday"})),
        [
            required_date_param(&mut date, "date"),
            optional_time_only_pointer_param(&mut time, "time"),
            optional_time_param(&mut since, "since"),
        ],
    )
    .unwrap_err();

    assert_eq!(err.fields(), vec!["date", "time", "since"]);
    assert!(err.errors[0].reason.contains("YYYY-MM-DD"));
    assert!(err.errors[1].reason.contains("HH:MM:SS"));
    assert!(err.errors[2].reason.contains("RFC 3339"));
}

#[test]
fn test_nested_object_errors_are_prefixed() {
    let mut assignees: Option<Assignees> = None;
    let err = bind_group(
        &args(json!({"assignees": {"user-ids": [1], "company-ids": "x"}})),
        [optional_object_param(
            &mut assignees,
            "assignees",
            |inner, dst: &mut Assignees| {
                bind_group(
                    inner,
                    [
                        optional_numeric_list_param(&mut dst.user_ids, "user-ids"),
                        optional_numeric_list_param(&mut dst.company_ids, "company-ids"),
                    ],
                )
            },
        )],
    )
    .unwrap_err();

    assert_eq!(err.fields(), vec!["assignees.company-ids"]);
    assert_eq!(assignees, None);
}

#[test]
fn test_nested_object_is_bound() {
    let mut assignees: Option<Assignees> = None;
    bind_group(
        &args(json!({"assignees": {"user-ids": [1, 2]}})),
        [optional_object_param(
            &mut assignees,
            "assignees",
            |inner, dst: &mut Assignees| {
                bind_group(
                    inner,
                    [optional_numeric_list_param(&mut dst.user_ids, "user-ids")],
                )
            },
        )],
    )
    .unwrap();

    assert_eq!(
        assignees,
        Some(Assignees {
            user_ids: vec![1, 2],
            company_ids: vec![],
        })
    );
}

#[test]
fn test_required_object_rejects_scalar() {
    let mut assignees = Assignees::default();
    let err = bind_group(
        &args(json!({"assignees": 5})),
        [required_object_param(
            &mut assignees,
            "assignees",
            |inner, dst: &mut Assignees| {
                bind_group(
                    inner,
                    [optional_numeric_list_param(&mut dst.user_ids, "user-ids")],
                )
            },
        )],
    )
    .unwrap_err();
    assert_eq!(err.to_string(), r#"field "assignees": expected object, got number"#);
}
