//! HTTP layer for retrieving the dataset export.

mod app_token;
mod basic;
mod client;

pub use app_token::AppToken;
pub use basic::BasicClient;
pub use client::HttpClient;

use anyhow::Result;

/// Fetches a URL as raw bytes through any [`HttpClient`].
///
/// Non-2xx responses are errors; the dataset endpoint never signals
/// partial results with error codes.
pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Vec<u8>> {
    let req = reqwest::Request::new(reqwest::Method::GET, url.parse()?);

    let resp = client.execute(req).await?.error_for_status()?;
    Ok(resp.bytes().await?.to_vec())
}
