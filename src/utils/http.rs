use reqwest::Client;
use std::time::Duration;

const USER_AGENT: &str = concat!("moon-dash/", env!("CARGO_PKG_VERSION"));

/// Shared outbound client; `timeout` bounds every request end to end.
pub fn build_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
}
