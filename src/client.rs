use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use reqwest::{
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
pub struct Config {
    /// API key; required.
    pub api_key: Option<String>,
    /// Use `https` (default) or plain `http`.
    pub secure: Option<bool>,
    /// API host (defaults to `api.apiverve.com`).
    pub host: Option<String>,
    /// Full endpoint URL; takes precedence over `host` and `secure`.
    pub base_url: Option<String>,
    pub client_header: Option<String>,
    pub http_client: Option<reqwest::Client>,
    /// Override the connect timeout (defaults to 5s).
    pub connect_timeout: Option<Duration>,
    /// Override the request timeout (defaults to 30s).
    pub timeout: Option<Duration>,
    /// Default extra headers applied to all requests.
    pub default_headers: Option<HeaderList>,
    /// Optional metrics callbacks (HTTP latency and outcome).
    pub metrics: Option<MetricsCallbacks>,
}

/// Async client for the Game Character Generator API.
///
/// Cheap to clone; clones share the same connection pool and settings.
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    endpoint: Url,
    api_key: ApiKey,
    client_header: String,
    http: reqwest::Client,
    request_timeout: Duration,
    default_headers: Option<HeaderList>,
    telemetry: Telemetry,
}

impl Client {
    pub fn new(cfg: Config) -> Result<Self> {
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
            None => reqwest::Client::builder()
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

    /// Client with default settings and the given API key.
    pub fn with_api_key(api_key: impl Into<String>) -> Result<Self> {
        Self::new(Config {
            api_key: Some(api_key.into()),
            ..Default::default()
        })
    }

    /// The URL every request is sent to.
    pub fn endpoint(&self) -> &Url {
        &self.inner.endpoint
    }

    pub fn is_secure(&self) -> bool {
        self.inner.endpoint.scheme() == "https"
    }

    /// Generate a character. `None` lets the server pick everything.
    pub async fn execute(&self, query: Option<&GameCharacterQuery>) -> Result<GameCharacterResponse> {
        self.inner.send(query, ExecuteOptions::default()).await
    }

    /// Like [`Client::execute`], also handing the outcome to `callback`
    /// before returning it.
    pub async fn execute_with_callback<F>(
        &self,
        query: Option<&GameCharacterQuery>,
        callback: F,
    ) -> Result<GameCharacterResponse>
    where
        F: FnOnce(std::result::Result<&GameCharacterResponse, &Error>),
    {
        let result = self.inner.send(query, ExecuteOptions::default()).await;
        deliver(result, callback)
    }

    pub async fn execute_with_options(
        &self,
        query: Option<&GameCharacterQuery>,
        options: ExecuteOptions,
    ) -> Result<GameCharacterResponse> {
        self.inner.send(query, options).await
    }
}

impl ClientInner {
    fn request(
        &self,
        pairs: &[(String, String)],
        options: &ExecuteOptions,
    ) -> Result<reqwest::RequestBuilder> {
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

    async fn send(
        &self,
        query: Option<&GameCharacterQuery>,
        options: ExecuteOptions,
    ) -> Result<GameCharacterResponse> {
        #[cfg(feature = "tracing")]
        {
            use tracing::Instrument;
            let span = tracing::debug_span!(
                "gamecharacter.http",
                method = "GET",
                url = %self.endpoint
            );
            self.send_inner(query, options).instrument(span).await
        }
        #[cfg(not(feature = "tracing"))]
        {
            self.send_inner(query, options).await
        }
    }

    async fn send_inner(
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
        let start = Instant::now();

        let resp = match builder.send().await {
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
            let body = resp.text().await.unwrap_or_default();
            return Err(parse_api_error_parts(status, &headers, body));
        }

        let bytes = resp
            .bytes()
            .await
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
