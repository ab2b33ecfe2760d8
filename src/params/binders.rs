use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde_json::Value;

use super::{Arguments, BindError, Binder, Failure, Numeric, Scalar, type_name};

fn scalar<T: Scalar>(value: &Value) -> Result<T, String> {
    T::from_value(value)
        .ok_or_else(|| format!("expected {}, got {}", T::EXPECTED, type_name(value)))
}

fn numeric<N: Numeric>(value: &Value) -> Result<N, String> {
    match value {
        Value::Number(number) => N::from_number(number),
        other => Err(format!("expected number, got {}", type_name(other))),
    }
}

fn list<T>(value: &Value, element: impl Fn(&Value) -> Result<T, String>) -> Result<Vec<T>, String> {
    let items = value
        .as_array()
        .ok_or_else(|| format!("expected array, got {}", type_name(value)))?;
    items
        .iter()
        .enumerate()
        .map(|(i, item)| element(item).map_err(|reason| format!("element {i}: {reason}")))
        .collect()
}

fn date(value: &Value) -> Result<NaiveDate, String> {
    let text: String = scalar(value)?;
    NaiveDate::parse_from_str(&text, "%Y-%m-%d")
        .map_err(|_| format!("expected a date in YYYY-MM-DD format, got \"{text}\""))
}

fn time_only(value: &Value) -> Result<NaiveTime, String> {
    let text: String = scalar(value)?;
    NaiveTime::parse_from_str(&text, "%H:%M:%S")
        .map_err(|_| format!("expected a time in HH:MM:SS format, got \"{text}\""))
}

fn instant(value: &Value) -> Result<DateTime<Utc>, String> {
    let text: String = scalar(value)?;
    DateTime::parse_from_rfc3339(&text)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|_| format!("expected an RFC 3339 date-time, got \"{text}\""))
}

fn object(value: &Value) -> Result<&Arguments, String> {
    value
        .as_object()
        .ok_or_else(|| format!("expected object, got {}", type_name(value)))
}

pub fn required_param<'a, T: Scalar>(dst: &'a mut T, key: &'static str) -> Binder<'a> {
    Binder::new(key, true, move |value| {
        *dst = scalar(value)?;
        Ok(())
    })
}

pub fn optional_param<'a, T: Scalar>(dst: &'a mut T, key: &'static str) -> Binder<'a> {
    Binder::new(key, false, move |value| {
        *dst = scalar(value)?;
        Ok(())
    })
}

pub fn optional_pointer_param<'a, T: Scalar>(
    dst: &'a mut Option<T>,
    key: &'static str,
) -> Binder<'a> {
    Binder::new(key, false, move |value| {
        *dst = Some(scalar(value)?);
        Ok(())
    })
}

pub fn required_numeric_param<'a, N: Numeric>(dst: &'a mut N, key: &'static str) -> Binder<'a> {
    Binder::new(key, true, move |value| {
        *dst = numeric(value)?;
        Ok(())
    })
}

pub fn optional_numeric_param<'a, N: Numeric>(dst: &'a mut N, key: &'static str) -> Binder<'a> {
    Binder::new(key, false, move |value| {
        *dst = numeric(value)?;
        Ok(())
    })
}

pub fn optional_numeric_pointer_param<'a, N: Numeric>(
    dst: &'a mut Option<N>,
    key: &'static str,
) -> Binder<'a> {
    Binder::new(key, false, move |value| {
        *dst = Some(numeric(value)?);
        Ok(())
    })
}

pub fn optional_list_param<'a, T: Scalar>(dst: &'a mut Vec<T>, key: &'static str) -> Binder<'a> {
    Binder::new(key, false, move |value| {
        *dst = list(value, scalar)?;
        Ok(())
    })
}

pub fn optional_numeric_list_param<'a, N: Numeric>(
    dst: &'a mut Vec<N>,
    key: &'static str,
) -> Binder<'a> {
    Binder::new(key, false, move |value| {
        *dst = list(value, numeric)?;
        Ok(())
    })
}

/// Like [`optional_numeric_list_param`], but keeps "absent" apart from "empty"
/// so updates can clear a list.
pub fn optional_numeric_list_pointer_param<'a, N: Numeric>(
    dst: &'a mut Option<Vec<N>>,
    key: &'static str,
) -> Binder<'a> {
    Binder::new(key, false, move |value| {
        *dst = Some(list(value, numeric)?);
        Ok(())
    })
}

pub fn required_date_param<'a>(dst: &'a mut NaiveDate, key: &'static str) -> Binder<'a> {
    Binder::new(key, true, move |value| {
        *dst = date(value)?;
        Ok(())
    })
}

pub fn optional_date_pointer_param<'a>(
    dst: &'a mut Option<NaiveDate>,
    key: &'static str,
) -> Binder<'a> {
    Binder::new(key, false, move |value| {
        *dst = Some(date(value)?);
        Ok(())
    })
}

pub fn required_time_only_param<'a>(dst: &'a mut NaiveTime, key: &'static str) -> Binder<'a> {
    Binder::new(key, true, move |value| {
        *dst = time_only(value)?;
        Ok(())
    })
}

pub fn optional_time_only_pointer_param<'a>(
    dst: &'a mut Option<NaiveTime>,
    key: &'static str,
) -> Binder<'a> {
    Binder::new(key, false, move |value| {
        *dst = Some(time_only(value)?);
        Ok(())
    })
}

pub fn optional_time_param<'a>(
    dst: &'a mut Option<DateTime<Utc>>,
    key: &'static str,
) -> Binder<'a> {
    Binder::new(key, false, move |value| {
        *dst = Some(instant(value)?);
        Ok(())
    })
}

/// Bind a nested object with its own group of binders. Inner failures are
/// reported as `outer.inner`.
pub fn required_object_param<'a, T, F>(dst: &'a mut T, key: &'static str, bind: F) -> Binder<'a>
where
    F: FnOnce(&Arguments, &mut T) -> Result<(), BindError> + 'a,
{
    Binder::new(key, true, move |value| {
        bind(object(value)?, dst).map_err(Failure::Nested)
    })
}

/// Absent object leaves `dst` unset and runs none of the inner binders.
pub fn optional_object_param<'a, T, F>(
    dst: &'a mut Option<T>,
    key: &'static str,
    bind: F,
) -> Binder<'a>
where
    T: Default,
    F: FnOnce(&Arguments, &mut T) -> Result<(), BindError> + 'a,
{
    Binder::new(key, false, move |value| {
        let mut inner = T::default();
        bind(object(value)?, &mut inner).map_err(Failure::Nested)?;
        *dst = Some(inner);
        Ok(())
    })
}
