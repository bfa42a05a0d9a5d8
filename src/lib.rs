//! Minimal Rust client for the Game Character Generator API.
//!
//! ```no_run
//! # async fn run() -> gamecharacter::Result<()> {
//! use gamecharacter::{Client, GameCharacterQuery};
//!
//! let client = Client::with_api_key("your-api-key")?;
//! let query = GameCharacterQuery::new().with_race("elf").with_class("mage");
//! let resp = client.execute(Some(&query)).await?;
//! let character = resp.into_data()?;
//! println!("{} the {}", character.name, character.class.name);
//! # Ok(())
//! # }
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(clippy::result_large_err)]

/// Default API host.
pub const DEFAULT_HOST: &str = "api.apiverve.com";

/// Path of the character generator endpoint on the API host.
pub const ENDPOINT_PATH: &str = "/v1/gamecharacter";

/// Default client identification header value.
pub(crate) const DEFAULT_CLIENT_HEADER: &str =
    concat!("gamecharacter-rust/", env!("CARGO_PKG_VERSION"));

/// Default connection timeout (5 seconds).
pub const DEFAULT_CONNECT_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(5);

/// Default request timeout (30 seconds).
pub const DEFAULT_REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

/// HTTP header name for request ID tracing.
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// HTTP header name for API key authentication.
pub const API_KEY_HEADER: &str = "x-api-key";

/// HTTP header name identifying this client library.
pub(crate) const CLIENT_HEADER: &str = "X-Client";

mod api_key;
#[cfg(feature = "client")]
mod client;
mod errors;
mod http;
#[cfg(feature = "mock")]
mod mock;
mod query;
mod telemetry;
#[cfg(feature = "mock")]
pub mod testing;
mod types;

pub use api_key::ApiKey;
pub use errors::{APIError, Error, Result, TransportError, TransportErrorKind, ValidationError};
pub use http::{ExecuteOptions, HeaderEntry, HeaderList};
#[cfg(feature = "mock")]
pub use mock::{fixtures, MockClient, MockConfig, RecordedCall};
pub use query::{Class, GameCharacterQuery, Race};
pub use telemetry::{HttpRequestMetrics, MetricsCallbacks, RequestContext};
pub use types::{
    Ability, AbilityScore, ClassInfo, GameCharacterData, GameCharacterResponse, RaceInfo, Stats,
    STATUS_ERROR, STATUS_OK,
};

#[cfg(feature = "client")]
pub use client::{Client, Config};

#[cfg(feature = "blocking")]
mod blocking;
#[cfg(feature = "blocking")]
pub use blocking::{BlockingClient, BlockingConfig};

/// Resolve the endpoint URL for the given transport flag and host.
///
/// `base_url` wins when set; it is taken as the full endpoint URL.
pub(crate) fn resolve_endpoint(
    base_url: Option<&str>,
    host: Option<&str>,
    secure: bool,
) -> Result<reqwest::Url> {
    let raw = match base_url.map(str::trim).filter(|s| !s.is_empty()) {
        Some(url) => url.trim_end_matches('/').to_string(),
        None => {
            let scheme = if secure { "https" } else { "http" };
            let host = host
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .unwrap_or(DEFAULT_HOST)
                .trim_end_matches('/');
            format!("{scheme}://{host}{ENDPOINT_PATH}")
        }
    };
    reqwest::Url::parse(&raw).map_err(|err| Error::Config(format!("invalid endpoint url: {err}")))
}

/// Hand a finished result to a completion callback, then return it unchanged.
pub(crate) fn deliver<T, F>(result: Result<T>, callback: F) -> Result<T>
where
    F: FnOnce(std::result::Result<&T, &Error>),
{
    callback(result.as_ref());
    result
}
