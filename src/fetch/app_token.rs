use super::client::HttpClient;
use async_trait::async_trait;
use reqwest::header::HeaderValue;

/// An [`HttpClient`] wrapper that attaches a Socrata application token as
/// the `X-App-Token` header.
///
/// Tokenless requests still work but are throttled much more aggressively
/// by the data portal, so the CLI wraps its client whenever a token is
/// configured. A token that is not a valid header value is skipped rather
/// than failing the request.
pub struct AppToken<C> {
    inner: C,
    token: String,
}

impl<C> AppToken<C> {
    pub fn new(inner: C, token: String) -> Self {
        Self { inner, token }
    }
}

#[async_trait]
impl<C: HttpClient> HttpClient for AppToken<C> {
    async fn execute(&self, mut req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        if let Ok(value) = HeaderValue::from_str(&self.token) {
            req.headers_mut().insert("X-App-Token", value);
        }
        self.inner.execute(req).await
    }
}
