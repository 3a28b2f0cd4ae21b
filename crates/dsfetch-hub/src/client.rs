use std::time::Duration;

use reqwest::Client;

use crate::error::FetchError;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = concat!("dsfetch/", env!("CARGO_PKG_VERSION"));

/// Shared HTTP client for both hosts. No overall request timeout: dataset
/// archives can take arbitrarily long to stream.
pub fn create_http_client() -> Result<Client, FetchError> {
    Ok(Client::builder()
        .user_agent(USER_AGENT)
        .connect_timeout(CONNECT_TIMEOUT)
        .build()?)
}

/// Turns a non-success response into [`FetchError::Status`], keeping the body
/// for the diagnostic.
pub(crate) async fn check_status(
    response: reqwest::Response,
) -> Result<reqwest::Response, FetchError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let url = response.url().to_string();
    let body = response.text().await.unwrap_or_default();
    Err(FetchError::Status {
        url,
        status: status.as_u16(),
        body,
    })
}
