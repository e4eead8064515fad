//! REST client for the Rayan API
//!
//! Every request carries the bearer token from the shared [`AuthSession`]
//! and, when configured, an `Accept-Language` header. Responses are
//! normalized into [`ClientResult`]: transport failures, non-2xx statuses,
//! `success: false` envelopes and malformed bodies each map to their own
//! [`ClientError`] variant.

use std::time::{Duration, Instant};

use http::{Method, StatusCode};
use reqwest::header::{ACCEPT_LANGUAGE, AUTHORIZATION};
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::auth::AuthSession;
use crate::config::{API_PREFIX, ClientConfig};
use crate::error::{ClientError, ClientResult, GENERIC_FAILURE};
use crate::payload::Payload;
use shared::Envelope;

/// Error body returned with non-2xx statuses
#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<ErrorMessage>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ErrorMessage {
    One(String),
    Many(Vec<String>),
}

impl ErrorMessage {
    fn into_text(self) -> String {
        match self {
            ErrorMessage::One(text) => text,
            ErrorMessage::Many(lines) => lines.join(", "),
        }
    }
}

/// HTTP client bound to one API host
#[derive(Debug, Clone)]
pub struct RestClient {
    client: Client,
    host: String,
    base_url: String,
    locale: Option<String>,
    session: AuthSession,
}

impl RestClient {
    pub fn new(config: &ClientConfig, session: AuthSession) -> ClientResult<Self> {
        let host = config.base_url.trim().trim_end_matches('/');
        if host.is_empty() {
            return Err(ClientError::Config("base URL is empty".to_string()));
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()?;
        Ok(Self {
            client,
            host: host.to_string(),
            base_url: format!("{host}/{API_PREFIX}"),
            locale: config.locale.clone(),
            session,
        })
    }

    /// API root, including the version prefix
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &AuthSession {
        &self.session
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Resolve an uploaded file path. Host-relative paths (`/uploads/..`)
    /// are served from the API host; anything else is returned as is.
    pub fn asset_url(&self, path: &str) -> String {
        if path.starts_with('/') && !path.starts_with("//") {
            format!("{}{}", self.host, path)
        } else {
            path.to_string()
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut req = self.client.request(method, self.url(path));
        if let Some(token) = self.session.current() {
            req = req.header(AUTHORIZATION, token.bearer());
        }
        if let Some(locale) = &self.locale {
            req = req.header(ACCEPT_LANGUAGE, locale.as_str());
        }
        req
    }

    /// Send and read the body; non-2xx becomes [`ClientError::Http`]
    async fn execute(
        &self,
        request: RequestBuilder,
        method: &Method,
        path: &str,
    ) -> ClientResult<(StatusCode, Vec<u8>)> {
        let started = Instant::now();
        let response = request.send().await.inspect_err(|e| {
            tracing::warn!(method = %method, path, error = %e, "API request failed to send");
        })?;
        let status = response.status();
        let body = response.bytes().await?.to_vec();
        let elapsed_ms = started.elapsed().as_millis() as u64;

        if status.is_success() {
            tracing::debug!(method = %method, path, status = status.as_u16(), elapsed_ms, "API request");
            return Ok((status, body));
        }

        let message = serde_json::from_slice::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.message)
            .map(ErrorMessage::into_text)
            .filter(|m| !m.trim().is_empty())
            .or_else(|| status.canonical_reason().map(str::to_string))
            .unwrap_or_else(|| GENERIC_FAILURE.to_string());

        if status == StatusCode::UNAUTHORIZED {
            tracing::warn!(path, "API rejected the session token");
        }
        tracing::warn!(method = %method, path, status = status.as_u16(), elapsed_ms, message = %message, "API request failed");
        Err(ClientError::Http { status, message })
    }

    fn decode_envelope<T: DeserializeOwned>(status: StatusCode, body: &[u8]) -> ClientResult<Envelope<T>> {
        if status == StatusCode::NO_CONTENT && body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Envelope {
                success: true,
                data: None,
                message: None,
            });
        }
        let envelope: Envelope<T> = serde_json::from_slice(body)
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;
        if !envelope.success {
            let message = envelope
                .message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| GENERIC_FAILURE.to_string());
            return Err(ClientError::Api { message });
        }
        Ok(envelope)
    }

    fn decode_raw<T: DeserializeOwned>(body: &[u8]) -> ClientResult<T> {
        let body: &[u8] = if body.iter().all(u8::is_ascii_whitespace) {
            b"null"
        } else {
            body
        };
        serde_json::from_slice(body).map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }

    /// GET an enveloped resource
    pub async fn get_envelope<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> ClientResult<Envelope<T>> {
        let req = self.request(Method::GET, path).query(query);
        let (status, body) = self.execute(req, &Method::GET, path).await?;
        Self::decode_envelope(status, &body)
    }

    /// Send a request with an optional body and decode the envelope
    pub async fn send_envelope<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        payload: Option<Payload>,
    ) -> ClientResult<Envelope<T>> {
        let mut req = self.request(method.clone(), path);
        if let Some(payload) = payload {
            req = payload.attach_to(req)?;
        }
        let (status, body) = self.execute(req, &method, path).await?;
        Self::decode_envelope(status, &body)
    }

    /// GET an endpoint that answers with a bare JSON body
    pub async fn get_raw<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> ClientResult<T> {
        let req = self.request(Method::GET, path).query(query);
        let (_, body) = self.execute(req, &Method::GET, path).await?;
        Self::decode_raw(&body)
    }

    /// Send to an endpoint that answers with a bare JSON body
    pub async fn send_raw<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        payload: Option<Payload>,
    ) -> ClientResult<T> {
        let mut req = self.request(method.clone(), path);
        if let Some(payload) = payload {
            req = payload.attach_to(req)?;
        }
        let (_, body) = self.execute(req, &method, path).await?;
        Self::decode_raw(&body)
    }

    /// GET an endpoint that answers with a text or HTML page
    pub async fn get_text(&self, path: &str) -> ClientResult<String> {
        let req = self.request(Method::GET, path);
        let (_, body) = self.execute(req, &Method::GET, path).await?;
        String::from_utf8(body).map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }

    pub async fn patch_raw<T: DeserializeOwned>(&self, path: &str, payload: Payload) -> ClientResult<T> {
        self.send_raw(Method::PATCH, path, Some(payload)).await
    }

    pub async fn put_raw<T: DeserializeOwned>(&self, path: &str, payload: Payload) -> ClientResult<T> {
        self.send_raw(Method::PUT, path, Some(payload)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> RestClient {
        RestClient::new(&ClientConfig::new("http://localhost:3800/"), AuthSession::new()).unwrap()
    }

    #[test]
    fn test_url_joins_prefix() {
        let client = client();
        assert_eq!(client.base_url(), "http://localhost:3800/api/v1");
        assert_eq!(client.url("banners"), "http://localhost:3800/api/v1/banners");
        assert_eq!(client.url("/coupons/3"), "http://localhost:3800/api/v1/coupons/3");
    }

    #[test]
    fn test_asset_url() {
        let client = client();
        assert_eq!(
            client.asset_url("/uploads/rice.png"),
            "http://localhost:3800/uploads/rice.png"
        );
        assert_eq!(client.asset_url("https://cdn/rice.png"), "https://cdn/rice.png");
        assert_eq!(client.asset_url("//cdn/rice.png"), "//cdn/rice.png");
        assert_eq!(client.asset_url(""), "");
    }

    #[test]
    fn test_empty_base_url_rejected() {
        let err = RestClient::new(&ClientConfig::new("  "), AuthSession::new()).unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
    }

    #[test]
    fn test_decode_envelope_failures() {
        let err = RestClient::decode_envelope::<i32>(StatusCode::OK, br#"{"success":false}"#).unwrap_err();
        assert!(matches!(err, ClientError::Api { ref message } if message == GENERIC_FAILURE));

        let err = RestClient::decode_envelope::<i32>(StatusCode::OK, b"<html>").unwrap_err();
        assert!(matches!(err, ClientError::InvalidResponse(_)));

        let err = RestClient::decode_envelope::<i32>(StatusCode::OK, b"").unwrap_err();
        assert!(matches!(err, ClientError::InvalidResponse(_)));

        let ok = RestClient::decode_envelope::<i32>(StatusCode::NO_CONTENT, b"").unwrap();
        assert!(ok.success);
        assert!(ok.data.is_none());
    }

    #[test]
    fn test_decode_raw() {
        let value: serde_json::Value = RestClient::decode_raw(b"").unwrap();
        assert!(value.is_null());
        let list: Vec<i32> = RestClient::decode_raw(b"[1,2]").unwrap();
        assert_eq!(list, vec![1, 2]);
    }
}
