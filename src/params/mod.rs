//! Binding of loosely-typed tool arguments onto typed fields.
//!
//! MCP tool arguments arrive as a JSON object. [`bind_group`] applies a set
//! of [`Binder`]s to it, each owning a `&mut` to one destination field, and
//! reports every invalid field at once:
//!
//! ```ignore
//! let mut filters = Filters::default();
//! bind_group(args, [
//!     optional_pointer_param(&mut filters.search_term, "search-term"),
//!     optional_numeric_list_param(&mut filters.tag_ids, "tag-ids"),
//!     optional_pointer_param(&mut filters.priority, "priority").restrict(PRIORITIES),
//! ])?;
//! ```
//!
//! This is the only place that inspects argument types at runtime.

mod binders;

#[cfg(test)]
mod binders_test;

use std::fmt;

use miette::Diagnostic;
use serde_json::{Map, Number, Value};
use thiserror::Error;

pub use binders::*;

/// Tool arguments as received from the MCP runtime.
pub type Arguments = Map<String, Value>;

/// One invalid field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub reason: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "field \"{}\": {}", self.field, self.reason)
    }
}

/// Every field that failed to bind, in binder order.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq, Default)]
#[error("{}", join(.errors))]
#[diagnostic(code(teamwork_mcp::params::invalid))]
pub struct BindError {
    pub errors: Vec<FieldError>,
}

fn join(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<FieldError> for BindError {
    fn from(error: FieldError) -> Self {
        Self {
            errors: vec![error],
        }
    }
}

impl BindError {
    /// Names of the offending fields.
    pub fn fields(&self) -> Vec<&str> {
        self.errors.iter().map(|e| e.field.as_str()).collect()
    }
}

/// Symbolic JSON type name used in mismatch messages.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Non-numeric scalar destinations.
pub trait Scalar: Sized {
    const EXPECTED: &'static str;

    fn from_value(value: &Value) -> Option<Self>;
}

impl Scalar for String {
    const EXPECTED: &'static str = "string";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_str().map(str::to_string)
    }
}

impl Scalar for bool {
    const EXPECTED: &'static str = "boolean";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_bool()
    }
}

/// Numeric destinations, decoded from JSON numbers with a range check.
pub trait Numeric: Sized {
    fn from_number(number: &Number) -> Result<Self, String>;
}

macro_rules! integer {
    ($($t:ty),* $(,)?) => {$(
        impl Numeric for $t {
            fn from_number(number: &Number) -> Result<Self, String> {
                let whole = number
                    .as_i64()
                    .or_else(|| {
                        number
                            .as_f64()
                            .filter(|f| f.fract() == 0.0 && f.abs() < 9.0e15)
                            .map(|f| f as i64)
                    })
                    .ok_or_else(|| format!("expected an integer, got {number}"))?;
                <$t>::try_from(whole).map_err(|_| {
                    format!(
                        "value {number} is out of range [{}, {}]",
                        <$t>::MIN,
                        <$t>::MAX
                    )
                })
            }
        }
    )*};
}

integer!(i64, i32, u32, u16, u8);

impl Numeric for f64 {
    fn from_number(number: &Number) -> Result<Self, String> {
        number
            .as_f64()
            .ok_or_else(|| format!("expected a number, got {number}"))
    }
}

pub(crate) enum Failure {
    Invalid(String),
    Nested(BindError),
}

impl From<String> for Failure {
    fn from(reason: String) -> Self {
        Failure::Invalid(reason)
    }
}

type Assign<'a> = Box<dyn FnOnce(&Value) -> Result<(), Failure> + 'a>;

/// Writes one argument into one destination.
pub struct Binder<'a> {
    key: &'static str,
    required: bool,
    allowed: Option<&'static [&'static str]>,
    minimum: Option<i64>,
    assign: Assign<'a>,
}

impl fmt::Debug for Binder<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binder")
            .field("key", &self.key)
            .field("required", &self.required)
            .field("allowed", &self.allowed)
            .field("minimum", &self.minimum)
            .finish()
    }
}

impl<'a> Binder<'a> {
    pub(crate) fn new(
        key: &'static str,
        required: bool,
        assign: impl FnOnce(&Value) -> Result<(), Failure> + 'a,
    ) -> Self {
        Self {
            key,
            required,
            allowed: None,
            minimum: None,
            assign: Box::new(assign),
        }
    }

    /// Reject string values (or string list elements) outside `allowed`.
    pub fn restrict(mut self, allowed: &'static [&'static str]) -> Self {
        self.allowed = Some(allowed);
        self
    }

    /// Reject numbers below `minimum`.
    pub fn at_least(mut self, minimum: i64) -> Self {
        self.minimum = Some(minimum);
        self
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    fn bind(self, args: &Arguments, errors: &mut Vec<FieldError>) {
        let value = match args.get(self.key) {
            None | Some(Value::Null) => {
                if self.required {
                    errors.push(FieldError::new(self.key, "is required"));
                }
                return;
            }
            Some(value) => value,
        };

        if let Some(allowed) = self.allowed {
            if let Err(reason) = check_allowed(value, allowed) {
                errors.push(FieldError::new(self.key, reason));
                return;
            }
        }

        if let Some(minimum) = self.minimum {
            if value.as_f64().is_some_and(|n| n < minimum as f64) {
                errors.push(FieldError::new(self.key, format!("must be at least {minimum}")));
                return;
            }
        }

        match (self.assign)(value) {
            Ok(()) => {}
            Err(Failure::Invalid(reason)) => errors.push(FieldError::new(self.key, reason)),
            Err(Failure::Nested(inner)) => errors.extend(inner.errors.into_iter().map(|e| {
                FieldError::new(format!("{}.{}", self.key, e.field), e.reason)
            })),
        }
    }
}

fn check_allowed(value: &Value, allowed: &[&str]) -> Result<(), String> {
    let reject = |got: &str| {
        Err(format!(
            "must be one of [{}], got \"{got}\"",
            allowed.join(", ")
        ))
    };
    match value {
        Value::String(s) if !allowed.contains(&s.as_str()) => reject(s),
        Value::Array(items) => {
            match items
                .iter()
                .filter_map(Value::as_str)
                .find(|s| !allowed.contains(s))
            {
                Some(s) => reject(s),
                None => Ok(()),
            }
        }
        // type mismatches are reported by the binder itself
        _ => Ok(()),
    }
}

/// Apply every binder to `args`, collecting all failures into one error.
pub fn bind_group<'a>(
    args: &Arguments,
    binders: impl IntoIterator<Item = Binder<'a>>,
) -> Result<(), BindError> {
    let mut errors = Vec::new();
    for binder in binders {
        binder.bind(args, &mut errors);
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(BindError { errors })
    }
}
