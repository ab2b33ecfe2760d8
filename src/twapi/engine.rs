//! Executes [`Entity`] values against the Teamwork REST API.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderValue};
use reqwest::{Client, Request, Response, StatusCode, Url};
use serde::Serialize;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, Span, debug, debug_span};

use super::error::{Error, Result};
use super::types::PageMeta;

/// Upper bound for a successful response body.
pub const MAX_BODY_BYTES: usize = 8 * 1024 * 1024;
/// Error bodies are only mined for a message, so far less is kept.
const MAX_ERROR_BYTES: usize = 64 * 1024;

/// One remote operation: knows how to build its request and how to absorb
/// the response.
pub trait Entity: Send {
    /// Method, URL, `Accept`/`Content-Type` headers and body. No credentials.
    fn build_request(&self, server: &Url) -> Result<Request>;

    /// Populate response fields from a 2xx JSON body.
    fn decode_response(&mut self, _body: &[u8]) -> Result<()> {
        Ok(())
    }
}

/// An entity that decodes exactly one resource.
pub trait SingleResponse: Entity {
    type Output: Serialize;

    fn response(&self) -> &Self::Output;
}

/// An entity that decodes one page of resources.
pub trait ListResponse: Entity {
    type Item: Serialize;

    fn items(&self) -> &[Self::Item];

    fn meta(&self) -> Option<&PageMeta> {
        None
    }
}

/// Per-call option for [`Engine::execute`].
pub enum ExecuteOption {
    /// After a successful decode, look for a numeric `field` at the top level
    /// of the body or inside any of its object values, and hand it to `callback`.
    IdCallback {
        field: String,
        callback: Box<dyn FnOnce(i64) + Send>,
    },
    /// Run the whole call inside this span.
    Span(Span),
}

impl fmt::Debug for ExecuteOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecuteOption::IdCallback { field, .. } => {
                f.debug_struct("IdCallback").field("field", field).finish()
            }
            ExecuteOption::Span(span) => f.debug_tuple("Span").field(span).finish(),
        }
    }
}

pub fn with_id_callback(
    field: impl Into<String>,
    callback: impl FnOnce(i64) + Send + 'static,
) -> ExecuteOption {
    ExecuteOption::IdCallback {
        field: field.into(),
        callback: Box::new(callback),
    }
}

pub fn with_span(span: Span) -> ExecuteOption {
    ExecuteOption::Span(span)
}

/// Shared, cheaply clonable executor. The client and token are read-only
/// after construction, so one engine serves any number of concurrent calls.
#[derive(Clone)]
pub struct Engine {
    server: Url,
    token: Arc<str>,
    client: Client,
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("server", &self.server.as_str())
            .field("token", &"<redacted>")
            .finish()
    }
}

impl Engine {
    pub fn new(server: Url, token: impl Into<String>) -> Self {
        Self::with_client(server, token, Client::new())
    }

    /// Use a preconfigured client (pool sizes, timeouts, proxy).
    pub fn with_client(server: Url, token: impl Into<String>, client: Client) -> Self {
        Self {
            server,
            token: Arc::from(token.into()),
            client,
        }
    }

    pub fn server(&self) -> &Url {
        &self.server
    }

    /// Build, authenticate, send and decode `entity`, then run post-hooks in
    /// the order given. Cancelling `ct` aborts the in-flight request and
    /// yields [`Error::Cancelled`] without running any hook.
    pub async fn execute<E: Entity>(
        &self,
        ct: &CancellationToken,
        entity: &mut E,
        options: Vec<ExecuteOption>,
    ) -> Result<()> {
        let mut span = None;
        let mut hooks = Vec::new();
        for option in options {
            match option {
                ExecuteOption::Span(s) => span = Some(s),
                hook @ ExecuteOption::IdCallback { .. } => hooks.push(hook),
            }
        }
        let span = span.unwrap_or_else(|| debug_span!("twapi.request"));

        async move {
            let raw = tokio::select! {
                biased;
                _ = ct.cancelled() => {
                    debug!("request cancelled by caller");
                    return Err(Error::Cancelled);
                }
                raw = self.send(entity) => raw?,
            };

            for hook in hooks {
                if let ExecuteOption::IdCallback { field, callback } = hook {
                    match raw.as_deref().and_then(|body| find_id(body, &field)) {
                        Some(id) => callback(id),
                        None => debug!(field = %field, "no identifier in response"),
                    }
                }
            }
            Ok(())
        }
        .instrument(span)
        .await
    }

    /// Steps 1-7: returns the raw body when it was JSON and decoded.
    async fn send<E: Entity>(&self, entity: &mut E) -> Result<Option<Vec<u8>>> {
        let mut request = entity.build_request(&self.server)?;
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", self.token))
            .map_err(|_| Error::invalid("bearer token contains characters not allowed in a header"))?;
        auth.set_sensitive(true);
        request.headers_mut().insert(AUTHORIZATION, auth);

        debug!(method = %request.method(), url = %request.url(), "sending request");
        let started = Instant::now();
        let response = self
            .client
            .execute(request)
            .await
            .map_err(|source| Error::Transport { source })?;
        let status = response.status();
        debug!(
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "received response"
        );

        if status.is_client_error() || status.is_server_error() {
            let (body, _) = read_body(response, MAX_ERROR_BYTES).await?;
            return Err(upstream_error(status, &body));
        }

        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.contains("json"));
        let (body, truncated) = read_body(response, MAX_BODY_BYTES).await?;
        if truncated {
            return Err(Error::decode(format!(
                "response body exceeds {MAX_BODY_BYTES} bytes"
            )));
        }
        if !is_json {
            return Ok(None);
        }
        entity.decode_response(&body)?;
        Ok(Some(body))
    }
}

/// Read at most `limit` bytes; the flag reports whether more were available.
async fn read_body(mut response: Response, limit: usize) -> Result<(Vec<u8>, bool)> {
    let mut body = Vec::new();
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|source| Error::Transport { source })?
    {
        let room = limit - body.len();
        if chunk.len() > room {
            body.extend_from_slice(&chunk[..room]);
            return Ok((body, true));
        }
        body.extend_from_slice(&chunk);
    }
    Ok((body, false))
}

/// Classify a >= 400 response, mining `{"errors":[{"message"}]}` or
/// `{"message"}` for a readable message.
fn upstream_error(status: StatusCode, body: &[u8]) -> Error {
    let message = extract_message(body)
        .or_else(|| {
            let text = String::from_utf8_lossy(body).trim().to_string();
            (!text.is_empty()).then(|| text.chars().take(512).collect())
        })
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_string()
        });

    if status == StatusCode::NOT_FOUND {
        Error::NotFound { message }
    } else {
        Error::Upstream {
            status: status.as_u16(),
            message,
        }
    }
}

fn extract_message(body: &[u8]) -> Option<String> {
    let root: Value = serde_json::from_slice(body).ok()?;
    if let Some(errors) = root.get("errors").and_then(Value::as_array) {
        let messages: Vec<String> = errors
            .iter()
            .filter_map(|e| {
                e.get("message")
                    .or_else(|| e.get("detail"))
                    .and_then(Value::as_str)
                    .or_else(|| e.as_str())
            })
            .map(str::to_string)
            .collect();
        if !messages.is_empty() {
            return Some(messages.join("; "));
        }
    }
    root.get("message")
        .or_else(|| root.get("MESSAGE"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Best-effort id lookup at depth <= 2. Legacy endpoints send numeric
/// strings, so those count as numbers here.
pub(crate) fn find_id(body: &[u8], field: &str) -> Option<i64> {
    let root: Value = serde_json::from_slice(body).ok()?;
    let root = root.as_object()?;
    if let Some(id) = root.get(field).and_then(as_id) {
        return Some(id);
    }
    root.values()
        .filter_map(Value::as_object)
        .find_map(|inner| inner.get(field).and_then(as_id))
}

fn as_id(value: &Value) -> Option<i64> {
    let id = match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }?;
    (id > 0).then_some(id)
}
