use std::time::Duration;

use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue},
    StatusCode,
};

use crate::{
    errors::{APIError, Error, Result},
    types::GameCharacterResponse,
    REQUEST_ID_HEADER,
};

/// Per-call options for `execute_with_options`.
#[derive(Clone, Debug, Default)]
pub struct ExecuteOptions {
    pub request_id: Option<String>,
    pub headers: HeaderList,
    pub timeout: Option<Duration>,
}

impl ExecuteOptions {
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .push(HeaderEntry::new(key.into(), value.into()));
        self
    }

    /// Override the overall request timeout for this call.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Structured header list with validation.
#[derive(Clone, Debug, Default)]
pub struct HeaderList(Vec<HeaderEntry>);

impl HeaderList {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Add a header entry.
    ///
    /// # Panics
    /// Panics if the header key or value is empty or contains only whitespace.
    pub fn push(&mut self, entry: HeaderEntry) {
        assert!(
            entry.is_valid(),
            "Invalid header: key and value must be non-empty (got key={:?}, value={:?})",
            entry.key,
            entry.value
        );
        self.0.push(entry);
    }

    pub fn iter(&self) -> impl Iterator<Item = &HeaderEntry> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Clone, Debug)]
pub struct HeaderEntry {
    pub key: String,
    pub value: String,
}

impl HeaderEntry {
    pub fn new(key: String, value: String) -> Self {
        Self { key, value }
    }

    pub fn is_valid(&self) -> bool {
        !(self.key.trim().is_empty() || self.value.trim().is_empty())
    }
}

/// Convert a header list into typed pairs, skipping blank entries.
pub(crate) fn header_pairs(headers: &HeaderList) -> Result<Vec<(HeaderName, HeaderValue)>> {
    let mut out = Vec::new();
    for entry in headers.iter() {
        if !entry.is_valid() {
            continue;
        }
        let name = HeaderName::from_bytes(entry.key.trim().as_bytes())
            .map_err(|err| Error::Config(format!("invalid header name: {err}")))?;
        let val = HeaderValue::from_str(entry.value.trim())
            .map_err(|err| Error::Config(format!("invalid header value: {err}")))?;
        out.push((name, val));
    }
    Ok(out)
}

pub(crate) fn request_id_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Build an [`APIError`] from a non-success response.
///
/// The API answers failures with the usual envelope; when it does, the
/// envelope's `error` text is kept exactly as sent.
pub(crate) fn parse_api_error_parts(status: StatusCode, headers: &HeaderMap, body: String) -> Error {
    let request_id = request_id_from_headers(headers);
    let status_code = status.as_u16();
    let status_text = status
        .canonical_reason()
        .unwrap_or("request failed")
        .to_string();

    if body.trim().is_empty() {
        return APIError {
            status: status_code,
            code: None,
            message: status_text,
            api_status: None,
            request_id,
            raw_body: None,
        }
        .into();
    }

    if let Ok(envelope) = serde_json::from_str::<GameCharacterResponse>(&body) {
        return APIError {
            status: status_code,
            code: envelope.code,
            message: envelope.error.unwrap_or(status_text),
            api_status: Some(envelope.status),
            request_id,
            raw_body: Some(body),
        }
        .into();
    }

    APIError {
        status: status_code,
        code: None,
        message: body.clone(),
        api_status: None,
        request_id,
        raw_body: Some(body),
    }
    .into()
}

/// Decode a successful response body into the envelope.
pub(crate) fn decode_envelope(bytes: &[u8]) -> Result<GameCharacterResponse> {
    serde_json::from_slice(bytes).map_err(Error::Serialization)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(err: Error) -> APIError {
        match err {
            Error::Api(api) => api,
            other => panic!("expected api error, got {other:?}"),
        }
    }

    #[test]
    fn envelope_error_message_is_kept_verbatim() {
        let body = r#"{"status":"error","error":"  API key is invalid!  ","data":null,"code":401}"#;
        let err = api(parse_api_error_parts(
            StatusCode::UNAUTHORIZED,
            &HeaderMap::new(),
            body.to_string(),
        ));
        assert_eq!(err.status, 401);
        assert_eq!(err.code, Some(401));
        assert_eq!(err.message, "  API key is invalid!  ");
        assert_eq!(err.api_status.as_deref(), Some("error"));
    }

    #[test]
    fn empty_body_uses_reason_phrase() {
        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static("req_1"));
        let err = api(parse_api_error_parts(
            StatusCode::BAD_GATEWAY,
            &headers,
            String::new(),
        ));
        assert_eq!(err.message, "Bad Gateway");
        assert_eq!(err.request_id.as_deref(), Some("req_1"));
    }

    #[test]
    fn non_json_body_becomes_message() {
        let err = api(parse_api_error_parts(
            StatusCode::INTERNAL_SERVER_ERROR,
            &HeaderMap::new(),
            "upstream exploded".to_string(),
        ));
        assert_eq!(err.message, "upstream exploded");
        assert_eq!(err.raw_body.as_deref(), Some("upstream exploded"));
    }

    #[test]
    fn decode_envelope_reports_malformed_json() {
        assert!(matches!(
            decode_envelope(b"{not json"),
            Err(Error::Serialization(_))
        ));
    }

    #[test]
    fn header_pairs_rejects_invalid_names() {
        let mut list = HeaderList::new();
        list.push(HeaderEntry::new("bad header".into(), "v".into()));
        assert!(matches!(header_pairs(&list), Err(Error::Config(_))));
    }

    #[test]
    #[should_panic(expected = "Invalid header")]
    fn header_list_panics_on_empty_key() {
        let mut list = HeaderList::new();
        list.push(HeaderEntry::new("".to_string(), "value".to_string()));
    }

    #[test]
    fn execute_options_collects_headers() {
        let opts = ExecuteOptions::default()
            .with_header("X-Trace", "abc")
            .with_request_id("req_9");
        assert_eq!(opts.headers.iter().count(), 1);
        assert_eq!(opts.request_id.as_deref(), Some("req_9"));
    }
}
