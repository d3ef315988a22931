// Backend HTTP client
//
// Wraps `reqwest::Client` with base-URL path joining, filter query
// parameters, and status/JSON handling. Endpoint groups (exadata,
// licenses) are implemented as inherent methods in separate files to keep
// this module focused on transport mechanics.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Longest body excerpt carried into error messages.
const BODY_PREVIEW_LEN: usize = 200;

/// Query parameters attached to every list fetch.
///
/// Absent values are omitted from the query string entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ListQuery {
    #[serde(rename = "older-than", skip_serializing_if = "Option::is_none")]
    pub older_than: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Raw HTTP client for the inventory backend.
///
/// All methods return decoded payloads; HTTP status handling and body
/// decoding errors are mapped to [`Error`] before the caller sees them.
pub struct BackendClient {
    http: reqwest::Client,
    base_url: Url,
}

impl BackendClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `base_url` is the API root, e.g. `https://ercole.example.com/api`.
    /// Every endpoint path is appended to it as additional segments.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::with_client(http, base_url)
    }

    /// Create a client around a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Result<Self, Error> {
        if base_url.cannot_be_a_base() {
            return Err(Error::InvalidBaseUrl(base_url.to_string()));
        }
        Ok(Self { http, base_url })
    }

    /// The backend base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build an endpoint URL from a static `/`-separated path.
    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, Error> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        self.segments(&segments)
    }

    /// Build an endpoint URL by appending each item as one path segment.
    ///
    /// Segments are percent-encoded, so identifiers containing `/` or
    /// spaces cannot escape their position in the path.
    pub(crate) fn segments(&self, segments: &[&str]) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request with filter query parameters and decode the body.
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        url: Url,
        query: Option<&ListQuery>,
    ) -> Result<T, Error> {
        debug!("GET {}", url);

        let mut builder = self.http.get(url);
        if let Some(query) = query {
            builder = builder.query(query);
        }
        let resp = builder.send().await.map_err(Error::Transport)?;

        Self::parse_json(resp).await
    }

    /// Send a POST request with JSON body, discarding any response body.
    pub(crate) async fn post(&self, url: Url, body: &(impl Serialize + Sync)) -> Result<(), Error> {
        debug!("POST {}", url);

        let resp = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(Error::Transport)?;

        Self::check_status(resp).await.map(drop)
    }

    /// Map non-success statuses to [`Error`], passing successful responses on.
    async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, Error> {
        let status = resp.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(Error::Authentication {
                message: format!("backend refused the request (HTTP {})", status.as_u16()),
            });
        }

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Status {
                status: status.as_u16(),
                message: preview(&body).to_owned(),
            });
        }

        Ok(resp)
    }

    /// Decode a successful JSON body, keeping the raw text on failure.
    async fn parse_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let resp = Self::check_status(resp).await?;
        let body = resp.text().await.map_err(Error::Transport)?;

        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: format!("{e} (body preview: {:?})", preview(&body)),
            body,
        })
    }
}

/// First few hundred bytes of a body, cut on a char boundary.
fn preview(body: &str) -> &str {
    if body.len() <= BODY_PREVIEW_LEN {
        return body;
    }
    let mut end = BODY_PREVIEW_LEN;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> BackendClient {
        BackendClient::with_client(reqwest::Client::new(), Url::parse(base).unwrap()).unwrap()
    }

    #[test]
    fn endpoint_appends_segments_to_base_path() {
        let c = client("https://ercole.local/api");
        let url = c.endpoint("hosts/technologies/all").unwrap();
        assert_eq!(url.as_str(), "https://ercole.local/api/hosts/technologies/all");
    }

    #[test]
    fn endpoint_tolerates_trailing_slash() {
        let c = client("https://ercole.local/api/");
        let url = c.endpoint("exadata").unwrap();
        assert_eq!(url.as_str(), "https://ercole.local/api/exadata");
    }

    #[test]
    fn segments_encode_identifiers() {
        let c = client("https://ercole.local/api");
        let url = c
            .segments(&["exadata", "rack 1", "components", "h/1"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://ercole.local/api/exadata/rack%201/components/h%2F1"
        );
    }

    #[test]
    fn cannot_be_a_base_url_is_rejected() {
        let result = BackendClient::with_client(
            reqwest::Client::new(),
            Url::parse("mailto:ops@example.com").unwrap(),
        );
        assert!(matches!(result, Err(Error::InvalidBaseUrl(_))));
    }

    #[test]
    fn empty_query_serializes_to_nothing() {
        let encoded = serde_json::to_value(ListQuery::default()).unwrap();
        assert_eq!(encoded, serde_json::json!({}));
    }

    #[test]
    fn preview_cuts_on_char_boundary() {
        let body = "é".repeat(BODY_PREVIEW_LEN);
        let cut = preview(&body);
        assert!(cut.len() <= BODY_PREVIEW_LEN);
        assert!(body.starts_with(cut));
    }
}
