//! Helpers for tests that talk to a local mock server.

use serde_json::json;

use crate::{fixtures, Result};

/// API key used by the test helpers.
pub const TEST_API_KEY: &str = "test_api_key";

/// Create a client pointed at a local mock server (e.g. wiremock's `uri()`).
///
/// `server_uri` is the server root; the standard endpoint path is appended.
#[cfg(feature = "client")]
pub fn test_client(server_uri: &str) -> Result<crate::Client> {
    crate::Client::new(crate::Config {
        api_key: Some(TEST_API_KEY.to_string()),
        base_url: Some(endpoint_url(server_uri)),
        ..Default::default()
    })
}

#[cfg(feature = "blocking")]
pub fn test_blocking_client(server_uri: &str) -> Result<crate::BlockingClient> {
    crate::BlockingClient::new(crate::BlockingConfig {
        api_key: Some(TEST_API_KEY.to_string()),
        base_url: Some(endpoint_url(server_uri)),
        ..Default::default()
    })
}

/// Full endpoint URL on the given server root.
pub fn endpoint_url(server_uri: &str) -> String {
    format!("{}{}", server_uri.trim_end_matches('/'), crate::ENDPOINT_PATH)
}

/// JSON body of a successful envelope, as the API would send it.
pub fn ok_body() -> serde_json::Value {
    serde_json::to_value(fixtures::ok_response()).unwrap_or_else(|_| json!({}))
}

/// JSON body of an error envelope.
pub fn error_body(message: &str, code: i64) -> serde_json::Value {
    json!({
        "status": "error",
        "error": message,
        "data": null,
        "code": code
    })
}
