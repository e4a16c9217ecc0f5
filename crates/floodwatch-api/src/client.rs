// Floodwatch HTTP client
//
// Wraps `reqwest::Client` with `/api/v1` URL construction and status
// mapping. Endpoint groups (system, nodes, alerts, logs) are implemented
// as inherent methods in separate files to keep this module focused on
// transport mechanics.

use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// FastAPI error body: `{"detail": "..."}`.
#[derive(serde::Deserialize)]
struct ErrorDetail {
    detail: Option<serde_json::Value>,
}

/// Raw HTTP client for the monitoring backend.
///
/// Cheap to clone: the underlying `reqwest::Client` is reference counted,
/// so each polling surface holds its own handle.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `base_url` is the API root including the version prefix, e.g.
    /// `http://127.0.0.1:8000/api/v1`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url))
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// The API base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Append path segments to the base URL.
    ///
    /// Segments are percent-encoded individually, so identifiers with
    /// slashes or spaces cannot escape their path position.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::InvalidBaseUrl {
                url: self.base_url.to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and decode the JSON body.
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", url);

        let resp = self.http.get(url).send().await.map_err(Error::Transport)?;

        Self::parse_json(resp).await
    }

    /// Send a POST request with no body and decode the JSON response.
    pub(crate) async fn post_empty<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("POST {}", url);

        let resp = self.http.post(url).send().await.map_err(Error::Transport)?;

        Self::parse_json(resp).await
    }

    /// Map non-2xx statuses onto [`Error`], then deserialize the body.
    async fn parse_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();
        let path = resp.url().path().to_owned();

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let message = error_message(&body);
            return Err(if status == reqwest::StatusCode::NOT_FOUND {
                Error::NotFound { path, message }
            } else {
                Error::Http {
                    status: status.as_u16(),
                    message,
                }
            });
        }

        let body = resp.text().await.map_err(Error::Transport)?;

        serde_json::from_str(&body).map_err(|e| {
            let preview = preview(&body);
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body: body.clone(),
            }
        })
    }
}

/// Pull a human-readable message out of an error body.
///
/// FastAPI reports `{"detail": "..."}` for handled errors and
/// `{"detail": [{...}]}` for validation failures; anything else is
/// previewed verbatim.
fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorDetail>(body) {
        Ok(ErrorDetail {
            detail: Some(serde_json::Value::String(detail)),
        }) => detail,
        Ok(ErrorDetail {
            detail: Some(other),
        }) => other.to_string(),
        _ if body.trim().is_empty() => "empty response body".into(),
        _ => preview(body).to_owned(),
    }
}

fn preview(body: &str) -> &str {
    let mut end = body.len().min(200);
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}
