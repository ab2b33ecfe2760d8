//! Serde adapters for the legacy (v1) wire encodings.
use chrono::NaiveDate;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Numeric identifier that legacy endpoints may send either as a JSON number
/// or as a string holding one (`"42"`). Always encoded as a number.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LegacyNumber(pub i64);

impl LegacyNumber {
    pub fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for LegacyNumber {
    fn from(value: i64) -> Self {
        LegacyNumber(value)
    }
}

impl From<LegacyNumber> for i64 {
    fn from(value: LegacyNumber) -> Self {
        value.0
    }
}

impl fmt::Display for LegacyNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl Serialize for LegacyNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.0)
    }
}

impl<'de> Deserialize<'de> for LegacyNumber {
    fn deserialize<D: Deserializer<'de>>(de: D) -> Result<Self, D::Error> {
        struct LegacyNumberVisitor;

        impl Visitor<'_> for LegacyNumberVisitor {
            type Value = LegacyNumber;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a number or a string containing a number")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(LegacyNumber(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                i64::try_from(v)
                    .map(LegacyNumber)
                    .map_err(|_| E::invalid_value(de::Unexpected::Unsigned(v), &self))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                v.trim()
                    .parse::<i64>()
                    .map(LegacyNumber)
                    .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
            }
        }

        de.deserialize_any(LegacyNumberVisitor)
    }
}

/// Serialize a list of ids the way legacy endpoints expect them: `"1,2,3"`.
///
/// Usage:
/// ```ignore
/// #[derive(Serialize)]
/// struct Payload {
///     #[serde(serialize_with = "crate::serde_utils::comma_separated")]
///     tag_ids: Vec<i64>,
/// }
/// ```
pub fn comma_separated<S>(values: &[i64], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let joined = values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",");
    serializer.serialize_str(&joined)
}

/// [`comma_separated`] for update fields that tell "leave alone" (`None`)
/// apart from "clear" (`Some(vec![])`, sent as `""`). Pair with
/// `skip_serializing_if = "Option::is_none"`.
pub fn optional_comma_separated<S>(
    values: &Option<Vec<i64>>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match values {
        Some(values) => comma_separated(values, serializer),
        None => serializer.serialize_none(),
    }
}

/// Inverse of [`comma_separated`]; also accepts a JSON array of numbers.
/// `null` decodes as no ids.
pub fn comma_separated_ids<'de, D>(de: D) -> Result<Vec<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Text(String),
        List(Vec<LegacyNumber>),
    }

    match Option::<Repr>::deserialize(de)? {
        None => Ok(Vec::new()),
        Some(Repr::List(ids)) => Ok(ids.into_iter().map(i64::from).collect()),
        Some(Repr::Text(text)) => text
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| s.parse::<i64>().map_err(de::Error::custom))
            .collect(),
    }
}

/// Decode `null` as the default value. Upstream sends `null` for some
/// empty lists, which `#[serde(default)]` alone does not cover.
pub fn null_as_default<'de, D, T>(de: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(de)?.unwrap_or_default())
}

/// Serialize an optional date the way legacy endpoints expect it:
/// `20230131`. Pair with `skip_serializing_if = "Option::is_none"`.
pub fn compact_date<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match date {
        Some(date) => serializer.serialize_str(&date.format("%Y%m%d").to_string()),
        None => serializer.serialize_none(),
    }
}
