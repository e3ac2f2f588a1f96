//! Small HTTP client used by the source fetchers and the LLM providers.
//!
//! - Per-request options: auth, headers, query params, timeout, retry budget
//! - Retries network failures, 429 and 5xx with exponential backoff and `Retry-After`
//! - Never logs secrets: bearer tokens and secret-looking query params are redacted
//!
//! ```no_run
//! # async fn demo() -> Result<(), factwatch_http::HttpError> {
//! let client = factwatch_http::HttpClient::new("https://api.example.com")?;
//! let got: serde_json::Value = client
//!     .get_json("v1/items", factwatch_http::RequestOpts::default())
//!     .await?;
//! # Ok(()) }
//! ```

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE, RETRY_AFTER};
use reqwest::{Client, Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::time::Duration;
use thiserror::Error;
use tokio::time::sleep;

pub use reqwest::header;

const SNIPPET_MAX: usize = 500;
const SECRET_PARAMS: &[&str] = &[
    "access_token",
    "authorization",
    "auth",
    "key",
    "api_key",
    "apikey",
    "token",
    "secret",
    "client_secret",
    "bearer",
];

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("invalid URL: {0}")]
    Url(String),
    #[error("request build failed: {0}")]
    Build(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("decode error: {0}, body_snippet: {1}")]
    Decode(String, String),
    #[error("server returned error {status}: {message}")]
    Api { status: StatusCode, message: String },
}

impl HttpError {
    /// Status code for API errors, `None` for transport-level failures.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            HttpError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Authentication strategies understood by [`HttpClient`].
///
/// ```
/// use factwatch_http::Auth;
///
/// let auth = Auth::Bearer("token");
/// assert_eq!(auth.kind(), "bearer");
/// ```
#[derive(Clone, Debug)]
pub enum Auth<'a> {
    /// `Authorization: Bearer <token>`
    Bearer(&'a str),
    /// Custom header such as `X-Api-Key`.
    Header {
        name: HeaderName,
        value: HeaderValue,
    },
    None,
}

impl Auth<'_> {
    pub fn kind(&self) -> &'static str {
        match self {
            Auth::Bearer(_) => "bearer",
            Auth::Header { .. } => "header",
            Auth::None => "none",
        }
    }
}

/// Per-request tuning knobs.
///
/// ```
/// use factwatch_http::{Auth, RequestOpts};
/// use std::time::Duration;
///
/// let opts = RequestOpts {
///     timeout: Some(Duration::from_secs(30)),
///     retries: Some(0),
///     auth: Some(Auth::Bearer("demo")),
///     ..Default::default()
/// };
/// assert_eq!(opts.timeout.unwrap().as_secs(), 30);
/// assert!(!opts.allow_absolute);
/// ```
#[derive(Clone, Debug, Default)]
pub struct RequestOpts<'a> {
    pub timeout: Option<Duration>,
    pub retries: Option<usize>,
    pub auth: Option<Auth<'a>>,
    pub headers: Option<HeaderMap>,
    pub query: Option<Vec<(&'a str, Cow<'a, str>)>>,
    /// Treat `path` as a full URL when it parses as one.
    pub allow_absolute: bool,
}

#[derive(Clone)]
pub struct HttpClient {
    base: Url,
    inner: Client,
    pub default_timeout: Duration,
    pub max_retries: usize,
}

impl HttpClient {
    /// Build a client anchored at `base`. A trailing `/` is added so relative
    /// paths extend the base instead of replacing its last segment.
    ///
    /// ```
    /// use factwatch_http::{HttpClient, HttpError};
    /// use std::time::Duration;
    ///
    /// let client = HttpClient::new("https://api.example.com/v1")?;
    /// assert_eq!(client.base().as_str(), "https://api.example.com/v1/");
    /// assert_eq!(client.default_timeout, Duration::from_secs(15));
    /// assert_eq!(client.max_retries, 2);
    /// # Ok::<(), HttpError>(())
    /// ```
    pub fn new(base: &str) -> Result<Self, HttpError> {
        let normalized = if base.ends_with('/') {
            base.to_string()
        } else {
            format!("{base}/")
        };
        let base = Url::parse(&normalized).map_err(|e| HttpError::Url(e.to_string()))?;
        let inner = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .user_agent(concat!("factwatch/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| HttpError::Build(e.to_string()))?;
        Ok(Self {
            base,
            inner,
            default_timeout: Duration::from_secs(15),
            max_retries: 2,
        })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    pub fn with_timeout(mut self, dur: Duration) -> Self {
        self.default_timeout = dur;
        self
    }

    pub fn with_retries(mut self, n: usize) -> Self {
        self.max_retries = n;
        self
    }

    /// GET and decode a JSON body.
    pub async fn get_json<T>(&self, path: &str, opts: RequestOpts<'_>) -> Result<T, HttpError>
    where
        T: DeserializeOwned,
    {
        let bytes = self.execute(Method::GET, path, None, opts).await?;
        decode_json(&bytes)
    }

    /// GET a body as text (HTML pages, plain responses).
    pub async fn get_text(&self, path: &str, opts: RequestOpts<'_>) -> Result<String, HttpError> {
        let bytes = self.execute(Method::GET, path, None, opts).await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// POST a JSON body and decode a JSON response.
    pub async fn post_json<B, T>(
        &self,
        path: &str,
        body: &B,
        opts: RequestOpts<'_>,
    ) -> Result<T, HttpError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let payload = serde_json::to_vec(body).map_err(|e| HttpError::Build(e.to_string()))?;
        let bytes = self.execute(Method::POST, path, Some(payload), opts).await?;
        decode_json(&bytes)
    }

    fn resolve(&self, path: &str, allow_absolute: bool) -> Result<Url, HttpError> {
        if allow_absolute {
            if let Ok(abs) = Url::parse(path) {
                return Ok(abs);
            }
        }
        self.base
            .join(path.trim_start_matches('/'))
            .map_err(|e| HttpError::Url(e.to_string()))
    }

    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
        opts: RequestOpts<'_>,
    ) -> Result<Vec<u8>, HttpError> {
        let url = self.resolve(path, opts.allow_absolute)?;
        let max_retries = opts.retries.unwrap_or(self.max_retries);
        let timeout = opts.timeout.unwrap_or(self.default_timeout);
        let bearer = match &opts.auth {
            Some(Auth::Bearer(raw)) => Some(sanitize_api_key(raw)?),
            _ => None,
        };
        let auth_kind = opts.auth.as_ref().map(Auth::kind).unwrap_or("none");
        let redacted_query = redact_query(opts.query.as_deref().unwrap_or_default());

        let mut attempt = 0usize;
        loop {
            let mut rb = self
                .inner
                .request(method.clone(), url.clone())
                .timeout(timeout);
            if let Some(q) = &opts.query {
                let pairs: Vec<(&str, &str)> = q.iter().map(|(k, v)| (*k, v.as_ref())).collect();
                rb = rb.query(&pairs);
            }
            if let Some(hdrs) = &opts.headers {
                rb = rb.headers(hdrs.clone());
            }
            if let Some(bytes) = &body {
                rb = rb
                    .header(CONTENT_TYPE, "application/json")
                    .body(bytes.clone());
            }
            match (&opts.auth, &bearer) {
                (Some(Auth::Header { name, value }), _) => rb = rb.header(name, value),
                (_, Some(token)) => rb = rb.bearer_auth(token),
                _ => {}
            }

            tracing::debug!(
                attempt = attempt + 1,
                max_retries,
                method = %method,
                host_path = %format!("{}{}", url.host_str().unwrap_or("-"), url.path()),
                query = ?redacted_query,
                timeout_ms = timeout.as_millis() as u64,
                auth_kind,
                has_body = body.is_some(),
                "http.request.start"
            );

            let started = std::time::Instant::now();
            let sent = match rb.send().await {
                Ok(resp) => {
                    let status = resp.status();
                    let headers = resp.headers().clone();
                    resp.bytes().await.map(|b| (status, headers, b))
                }
                Err(err) => Err(err),
            };

            let (status, headers, bytes) = match sent {
                Ok(parts) => parts,
                Err(err) => {
                    let message = err.to_string();
                    if attempt < max_retries {
                        attempt += 1;
                        let delay = backoff(attempt);
                        tracing::warn!(
                            attempt,
                            max_retries,
                            backoff_ms = delay.as_millis() as u64,
                            %message,
                            "http.retrying.network"
                        );
                        sleep(delay).await;
                        continue;
                    }
                    tracing::warn!(attempt, %message, "http.network_error");
                    return Err(HttpError::Network(message));
                }
            };

            tracing::debug!(
                %status,
                duration_ms = started.elapsed().as_millis() as u64,
                body_len = bytes.len(),
                "http.response"
            );

            if status.is_success() {
                return Ok(bytes.to_vec());
            }

            let message = extract_error_message(&bytes);
            let retryable = status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error();
            if retryable && attempt < max_retries {
                attempt += 1;
                let delay = match retry_after_secs(&headers) {
                    Some(secs) => Duration::from_secs(secs),
                    None if status == StatusCode::TOO_MANY_REQUESTS => {
                        backoff(attempt).max(Duration::from_millis(1100))
                    }
                    None => backoff(attempt),
                };
                tracing::warn!(
                    %status,
                    attempt,
                    max_retries,
                    backoff_ms = delay.as_millis() as u64,
                    %message,
                    "http.retrying"
                );
                sleep(delay).await;
                continue;
            }

            tracing::warn!(%status, %message, body_snippet = %snip_body(&bytes), "http.error");
            return Err(HttpError::Api { status, message });
        }
    }
}

fn backoff(attempt: usize) -> Duration {
    let shift = attempt.saturating_sub(1).min(10) as u32;
    Duration::from_millis(200u64.saturating_mul(1 << shift))
}

fn decode_json<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, HttpError> {
    serde_json::from_slice::<T>(bytes).map_err(|e| {
        let snippet = snip_body(bytes);
        tracing::warn!(serde_err = %e, body_snippet = %snippet, "http.response.decode_error");
        HttpError::Decode(e.to_string(), snippet)
    })
}

fn redact_query(query: &[(&str, Cow<'_, str>)]) -> Vec<(String, String)> {
    query
        .iter()
        .map(|(k, v)| {
            let secret = SECRET_PARAMS.contains(&k.to_ascii_lowercase().as_str());
            (
                (*k).to_string(),
                if secret {
                    "<redacted>".to_string()
                } else {
                    v.to_string()
                },
            )
        })
        .collect()
}

/// Pull a human-readable message out of the error envelopes the providers use.
fn extract_error_message(body: &[u8]) -> String {
    // {"error":{"message":"..."}}
    #[derive(Deserialize)]
    struct Nested {
        error: NestedDetail,
    }
    #[derive(Deserialize)]
    struct NestedDetail {
        message: String,
    }

    // {"errors":[{"message"|"detail"|"title":"..."}]}
    #[derive(Deserialize)]
    struct ErrorList {
        errors: Vec<Flat>,
    }

    // {"message"|"detail"|"error":"..."}
    #[derive(Deserialize, Default)]
    struct Flat {
        #[serde(default)]
        message: String,
        #[serde(default)]
        detail: String,
        #[serde(default)]
        title: String,
        #[serde(default)]
        error: String,
    }

    fn first_non_empty(f: Flat) -> Option<String> {
        [f.message, f.detail, f.title, f.error]
            .into_iter()
            .find(|s| !s.is_empty())
    }

    if let Ok(n) = serde_json::from_slice::<Nested>(body) {
        return n.error.message;
    }
    if let Ok(list) = serde_json::from_slice::<ErrorList>(body) {
        if let Some(msg) = list.errors.into_iter().next().and_then(first_non_empty) {
            return msg;
        }
    }
    if let Ok(flat) = serde_json::from_slice::<Flat>(body) {
        if let Some(msg) = first_non_empty(flat) {
            return msg;
        }
    }
    snip_body(body)
}

fn retry_after_secs(h: &HeaderMap) -> Option<u64> {
    h.get(RETRY_AFTER)?.to_str().ok()?.trim().parse().ok()
}

fn snip_body(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    if text.chars().count() <= SNIPPET_MAX {
        return text.into_owned();
    }
    let mut snip: String = text.chars().take(SNIPPET_MAX).collect();
    snip.push_str("...");
    snip
}

/// Strip quotes and whitespace from a pasted key and make sure it fits in a header.
fn sanitize_api_key(raw: &str) -> Result<String, HttpError> {
    let mut key = raw
        .trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .to_string();
    key.retain(|ch| !ch.is_ascii_whitespace());

    if key.is_empty() {
        return Err(HttpError::Build("API key is empty".into()));
    }
    if !key.is_ascii() {
        return Err(HttpError::Build("API key contains non-ASCII bytes".into()));
    }
    if key.bytes().any(|b| b < 0x20 || b == 0x7F) {
        return Err(HttpError::Build("API key contains control characters".into()));
    }
    HeaderValue::from_str(&format!("Bearer {key}"))
        .map_err(|e| HttpError::Build(format!("invalid Authorization header: {e}")))?;
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_quotes_and_whitespace() {
        assert_eq!(sanitize_api_key(" \"sk-abc\n123\" ").unwrap(), "sk-abc123");
        assert!(sanitize_api_key("   ").is_err());
        assert!(sanitize_api_key("ключ").is_err());
    }

    #[test]
    fn error_message_envelopes() {
        assert_eq!(
            extract_error_message(br#"{"error":{"message":"bad key"}}"#),
            "bad key"
        );
        assert_eq!(
            extract_error_message(br#"{"errors":[{"title":"Unauthorized"}]}"#),
            "Unauthorized"
        );
        assert_eq!(extract_error_message(br#"{"detail":"slow down"}"#), "slow down");
        assert_eq!(extract_error_message(b"plain text"), "plain text");
    }

    #[test]
    fn secret_query_params_are_redacted() {
        let q = vec![("query", Cow::Borrowed("Харків")), ("api_key", Cow::Borrowed("s3cr3t"))];
        let red = redact_query(&q);
        assert_eq!(red[0].1, "Харків");
        assert_eq!(red[1].1, "<redacted>");
    }

    #[test]
    fn snippets_are_char_bounded() {
        let long = "ї".repeat(SNIPPET_MAX + 10);
        let snip = snip_body(long.as_bytes());
        assert!(snip.ends_with("..."));
        assert_eq!(snip.chars().count(), SNIPPET_MAX + 3);
    }

    #[test]
    fn relative_paths_extend_the_base() {
        let client = HttpClient::new("https://proxy.example.com/api/telegram").unwrap();
        let url = client.resolve("/search", false).unwrap();
        assert_eq!(url.as_str(), "https://proxy.example.com/api/telegram/search");

        let abs = client
            .resolve("https://other.example.com/x?q=1", true)
            .unwrap();
        assert_eq!(abs.host_str(), Some("other.example.com"));
    }

    #[test]
    fn backoff_doubles() {
        assert_eq!(backoff(1), Duration::from_millis(200));
        assert_eq!(backoff(2), Duration::from_millis(400));
        assert_eq!(backoff(3), Duration::from_millis(800));
    }
}
