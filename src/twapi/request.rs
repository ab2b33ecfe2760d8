//! Request construction and response envelope helpers shared by every entity.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderValue};
use reqwest::{Method, Request, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::error::{Error, Result};
use super::types::PageMeta;

/// Path prefix of the v3 REST API.
pub(crate) const V3: &str = "/projects/api/v3";

/// Join a path onto the configured server, keeping any path prefix the
/// server URL already carries.
pub(crate) fn endpoint(server: &Url, path: &str) -> Result<Url> {
    let base = server.as_str().trim_end_matches('/');
    Url::parse(&format!("{base}{path}"))
        .map_err(|e| Error::invalid(format!("invalid endpoint {path}: {e}")))
}

/// A body-less request accepting JSON.
pub(crate) fn new_request(method: Method, url: Url) -> Request {
    let mut request = Request::new(method, url);
    request
        .headers_mut()
        .insert(ACCEPT, HeaderValue::from_static("application/json"));
    request
}

/// A request whose body is `{"<key>": payload}`.
pub(crate) fn envelope_request<T: Serialize>(
    method: Method,
    url: Url,
    key: &str,
    payload: &T,
) -> Result<Request> {
    let inner = serde_json::to_value(payload)
        .map_err(|e| Error::invalid(format!("cannot encode {key} payload: {e}")))?;
    let mut envelope = Map::new();
    envelope.insert(key.to_string(), inner);
    let body = serde_json::to_vec(&Value::Object(envelope))
        .map_err(|e| Error::invalid(format!("cannot encode {key} payload: {e}")))?;

    let mut request = new_request(method, url);
    request
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    *request.body_mut() = Some(body.into());
    Ok(request)
}

/// Ordered query-string accumulator. Absent values are never written.
#[derive(Debug, Default)]
pub(crate) struct Query {
    pairs: Vec<(&'static str, String)>,
}

impl Query {
    pub(crate) fn string(&mut self, key: &'static str, value: Option<&str>) -> &mut Self {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            self.pairs.push((key, value.to_string()));
        }
        self
    }

    pub(crate) fn number<N: ToString>(&mut self, key: &'static str, value: Option<N>) -> &mut Self {
        if let Some(value) = value {
            self.pairs.push((key, value.to_string()));
        }
        self
    }

    pub(crate) fn flag(&mut self, key: &'static str, value: Option<bool>) -> &mut Self {
        if let Some(value) = value {
            self.pairs.push((key, value.to_string()));
        }
        self
    }

    /// Comma-separated list, e.g. `tagIds=1,2,3`.
    pub(crate) fn list<T: ToString>(&mut self, key: &'static str, values: &[T]) -> &mut Self {
        if !values.is_empty() {
            let joined = values
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(",");
            self.pairs.push((key, joined));
        }
        self
    }

    pub(crate) fn date(&mut self, key: &'static str, value: Option<NaiveDate>) -> &mut Self {
        if let Some(value) = value {
            self.pairs.push((key, value.format("%Y-%m-%d").to_string()));
        }
        self
    }

    pub(crate) fn datetime(&mut self, key: &'static str, value: Option<DateTime<Utc>>) -> &mut Self {
        if let Some(value) = value {
            self.pairs
                .push((key, value.to_rfc3339_opts(SecondsFormat::Secs, true)));
        }
        self
    }

    pub(crate) fn apply(&self, url: &mut Url) {
        if self.pairs.is_empty() {
            return;
        }
        url.query_pairs_mut()
            .extend_pairs(self.pairs.iter().map(|(k, v)| (*k, v.as_str())));
    }
}

/// GET `path` with the query applied.
pub(crate) fn get(server: &Url, path: &str, query: &Query) -> Result<Request> {
    let mut url = endpoint(server, path)?;
    query.apply(&mut url);
    Ok(new_request(Method::GET, url))
}

/// A body-less request to `path`, e.g. DELETE or a verb POST.
pub(crate) fn bare(method: Method, server: &Url, path: &str) -> Result<Request> {
    Ok(new_request(method, endpoint(server, path)?))
}

/// `{"<key>": payload}` sent to `path`.
pub(crate) fn write<T: Serialize>(
    method: Method,
    server: &Url,
    path: &str,
    key: &str,
    payload: &T,
) -> Result<Request> {
    envelope_request(method, endpoint(server, path)?, key, payload)
}

fn parse_root(body: &[u8]) -> Result<Map<String, Value>> {
    match serde_json::from_slice(body)? {
        Value::Object(root) => Ok(root),
        other => Err(Error::decode(format!(
            "expected a JSON object, got {}",
            crate::params::type_name(&other)
        ))),
    }
}

/// Unwrap `{"<key>": {...}}`.
pub(crate) fn decode_single<T: DeserializeOwned>(body: &[u8], key: &str) -> Result<T> {
    let mut root = parse_root(body)?;
    let inner = root
        .remove(key)
        .ok_or_else(|| Error::decode(format!("missing \"{key}\" envelope")))?;
    serde_json::from_value(inner).map_err(|e| Error::decode(format!("{key}: {e}")))
}

/// Unwrap `{"<key>": [...], "meta": {"page": {...}}}`.
pub(crate) fn decode_list<T: DeserializeOwned>(
    body: &[u8],
    key: &str,
) -> Result<(Vec<T>, Option<PageMeta>)> {
    let mut root = parse_root(body)?;
    let items = match root.remove(key) {
        Some(Value::Null) => Vec::new(),
        Some(items) => {
            serde_json::from_value(items).map_err(|e| Error::decode(format!("{key}: {e}")))?
        }
        None => return Err(Error::decode(format!("missing \"{key}\" envelope"))),
    };
    let meta = root
        .remove("meta")
        .and_then(|mut meta| meta.get_mut("page").map(Value::take))
        .map(serde_json::from_value::<PageMeta>)
        .transpose()
        .map_err(|e| Error::decode(format!("meta.page: {e}")))?;
    Ok((items, meta))
}
