use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use reqwest::{
    blocking::{Client as HttpClient, RequestBuilder},
    header::{HeaderValue, ACCEPT},
    Url,
};

use crate::{
    api_key::ApiKey,
    deliver,
    errors::{Error, Result, TransportError, TransportErrorKind},
    http::{
        decode_envelope, header_pairs, parse_api_error_parts, request_id_from_headers,
        ExecuteOptions, HeaderList,
    },
    query::GameCharacterQuery,
    resolve_endpoint,
    telemetry::{HttpRequestMetrics, MetricsCallbacks, RequestContext, Telemetry},
    types::GameCharacterResponse,
    API_KEY_HEADER, CLIENT_HEADER, DEFAULT_CLIENT_HEADER, DEFAULT_CONNECT_TIMEOUT,
    DEFAULT_REQUEST_TIMEOUT, REQUEST_ID_HEADER,
};

#[derive(Clone, Debug, Default)]
pub struct BlockingConfig {
    pub api_key: Option<String>,
    /// Use `https` (default) or plain `http`.
    pub secure: Option<bool>,
    pub host: Option<String>,
    /// Full endpoint URL; takes precedence over `host` and `secure`.
    pub base_url: Option<String>,
    pub client_header: Option<String>,
    pub http_client: Option<HttpClient>,
    /// Override the connect timeout (defaults to 5s).
    pub connect_timeout: Option<Duration>,
    /// Override the request timeout (defaults to 30s).
    pub timeout: Option<Duration>,
    pub default_headers: Option<HeaderList>,
    pub metrics: Option<MetricsCallbacks>,
}

/// Synchronous counterpart of [`crate::Client`].
#[derive(Clone)]
pub struct BlockingClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    endpoint: Url,
    api_key: ApiKey,
    client_header: String,
    http: HttpClient,
    request_timeout: Duration,
    default_headers: Option<HeaderList>,
    telemetry: Telemetry,
}

impl BlockingClient {
    pub fn new(cfg: BlockingConfig) -> Result<Self> {
        let api_key = match cfg.api_key.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => ApiKey::parse(raw)?,
            _ => return Err(Error::Config("api key is required".to_string())),
        };
        let endpoint = resolve_endpoint(
            cfg.base_url.as_deref(),
            cfg.host.as_deref(),
            cfg.secure.unwrap_or(true),
        )?;

        let connect_timeout = cfg.connect_timeout.unwrap_or(DEFAULT_CONNECT_TIMEOUT);
        let request_timeout = cfg.timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT);

        let http = match cfg.http_client {
            Some(client) => client,
            None => HttpClient::builder()
                .connect_timeout(connect_timeout)
                .build()
                .map_err(|err| TransportError {
                    kind: TransportErrorKind::Connect,
                    message: "failed to build http client".to_string(),
                    source: Some(err),
                })?,
        };

        let client_header = cfg
            .client_header
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CLIENT_HEADER.to_string());

        Ok(Self {
            inner: Arc::new(ClientInner {
                endpoint,
                api_key,
                client_header,
                http,
                request_timeout,
                default_headers: cfg.default_headers,
                telemetry: Telemetry::new(cfg.metrics),
            }),
        })
    }

    pub fn with_api_key(api_key: impl Into<String>) -> Result<Self> {
        Self::new(BlockingConfig {
            api_key: Some(api_key.into()),
            ..Default::default()
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.inner.endpoint
    }

    pub fn is_secure(&self) -> bool {
        self.inner.endpoint.scheme() == "https"
    }

    pub fn execute(&self, query: Option<&GameCharacterQuery>) -> Result<GameCharacterResponse> {
        self.inner.send(query, ExecuteOptions::default())
    }

    pub fn execute_with_callback<F>(
        &self,
        query: Option<&GameCharacterQuery>,
        callback: F,
    ) -> Result<GameCharacterResponse>
    where
        F: FnOnce(std::result::Result<&GameCharacterResponse, &Error>),
    {
        deliver(self.inner.send(query, ExecuteOptions::default()), callback)
    }

    pub fn execute_with_options(
        &self,
        query: Option<&GameCharacterQuery>,
        options: ExecuteOptions,
    ) -> Result<GameCharacterResponse> {
        self.inner.send(query, options)
    }
}

impl ClientInner {
    fn request(&self, pairs: &[(String, String)], options: &ExecuteOptions) -> Result<RequestBuilder> {
        let mut builder = self.http.get(self.endpoint.clone());
        if !pairs.is_empty() {
            builder = builder.query(pairs);
        }
        builder = builder
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .header(CLIENT_HEADER, self.client_header.as_str())
            .header(API_KEY_HEADER, self.api_key.as_str());
        if let Some(req_id) = options.request_id.as_deref() {
            if !req_id.trim().is_empty() {
                builder = builder.header(REQUEST_ID_HEADER, req_id);
            }
        }
        if let Some(defaults) = &self.default_headers {
            for (name, value) in header_pairs(defaults)? {
                builder = builder.header(name, value);
            }
        }
        for (name, value) in header_pairs(&options.headers)? {
            builder = builder.header(name, value);
        }
        Ok(builder.timeout(options.timeout.unwrap_or(self.request_timeout)))
    }

    fn send(
        &self,
        query: Option<&GameCharacterQuery>,
        options: ExecuteOptions,
    ) -> Result<GameCharacterResponse> {
        let pairs = match query {
            Some(q) => {
                q.validate()?;
                q.to_query_pairs()
            }
            None => Vec::new(),
        };
        let builder = self.request(&pairs, &options)?;
        let ctx = RequestContext::new("GET", self.endpoint.as_str())
            .with_request_id(options.request_id.clone())
            .with_query(pairs);

        #[cfg(feature = "tracing")]
        let span = tracing::debug_span!("gamecharacter.http", method = "GET", url = %self.endpoint);
        #[cfg(feature = "tracing")]
        let _guard = span.enter();

        let start = Instant::now();
        let resp = match builder.send() {
            Ok(resp) => resp,
            Err(err) => {
                self.record(start, None, Some(err.to_string()), ctx);
                #[cfg(feature = "tracing")]
                tracing::warn!(error = %err, "transport error");
                return Err(TransportError::from_reqwest(err).into());
            }
        };

        let status = resp.status();
        let headers = resp.headers().clone();
        let ctx = ctx.with_request_id(request_id_from_headers(&headers));
        if !status.is_success() {
            self.record(start, Some(status.as_u16()), Some(format!("http {}", status.as_u16())), ctx);
            #[cfg(feature = "tracing")]
            tracing::warn!(status = %status, "request failed; returning error");
            let body = resp.text().unwrap_or_default();
            return Err(parse_api_error_parts(status, &headers, body));
        }

        let bytes = resp
            .bytes()
            .map_err(|err| Error::Transport(TransportError::from_reqwest(err)))?;
        self.record(start, Some(status.as_u16()), None, ctx);
        #[cfg(feature = "tracing")]
        tracing::debug!(
            status = %status,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "request completed"
        );
        decode_envelope(&bytes)
    }

    fn record(&self, start: Instant, status: Option<u16>, error: Option<String>, context: RequestContext) {
        if self.telemetry.http_enabled() {
            self.telemetry.record_http(HttpRequestMetrics {
                latency: start.elapsed(),
                status,
                error,
                context,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_api_key_is_rejected() {
        let err = BlockingClient::with_api_key("").err().expect("should fail");
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn host_override_keeps_endpoint_path() {
        let client = BlockingClient::new(BlockingConfig {
            api_key: Some("key".into()),
            host: Some("staging.example.com".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(
            client.endpoint().as_str(),
            "https://staging.example.com/v1/gamecharacter"
        );
    }
}
