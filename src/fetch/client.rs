use async_trait::async_trait;
use reqwest::{Request, Response};

/// Execution seam for HTTP requests, so header decorators and test doubles
/// can wrap the real client.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
