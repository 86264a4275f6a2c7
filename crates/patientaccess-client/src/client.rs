//! HTTP client for the Patient Access API.
//!
//! # Design
//! - One `reqwest::Client` (and its connection pool) per [`Client`]; clones share it.
//! - Base URL and user agent are fixed at construction; calls never mutate them.
//! - Every call is a single attempt. Non-2xx answers become
//!   [`ClientError::BadStatusCode`] without reading the body.

use std::time::Duration;

use chrono::Utc;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderValue, USER_AGENT};
use reqwest::{Method, Request};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::error::{ClientError, ClientResult};
use crate::models::{AppointmentSlot, HierarchyResponse};
use crate::path::join_paths;
use crate::token::{AccessToken, AuthEnvelope, Credentials};

/// Production API root.
pub const DEFAULT_BASE_URL: &str = "https://api.patientaccess.com/api";
/// User agent sent when none is configured.
pub const DEFAULT_USER_AGENT: &str = concat!("patientaccess-rs/", env!("CARGO_PKG_VERSION"));
/// Sign-in endpoint, relative to the base URL.
pub const SIGNIN_PATH: &str = "/authorization/signin";
/// Appointment hierarchy endpoint, relative to the base URL.
pub const APPOINTMENT_HIERARCHY_PATH: &str = "/Appointment/properties/hierarchy";
/// Header carrying the patient identifier on patient-scoped calls.
pub const HEADER_PATIENT_ID: &str = "X-PatientId";

const JSON_CONTENT_TYPE: &str = "application/json";
const ACCEPT_ANY_JSON: &str = "application/json, text/plain, */*";

/// Client for the Patient Access API.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: Url,
    user_agent: String,
    user_agent_header: HeaderValue,
}

impl Client {
    /// Client against [`DEFAULT_BASE_URL`] with default settings.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::ClientBuild`] if the HTTP transport cannot be initialised.
    pub fn new() -> ClientResult<Self> {
        Self::builder().build()
    }

    /// Start configuring a client.
    #[must_use]
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// Base URL every request path is joined onto.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// User agent attached to every request.
    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Build a request for `path` with the standard JSON headers.
    ///
    /// No I/O happens here; the request is sent by the caller or by the
    /// endpoint helpers on this type.
    ///
    /// # Errors
    ///
    /// - [`ClientError::MalformedPath`] when `path` cannot be joined.
    /// - [`ClientError::Encoding`] when `body` fails to serialise.
    /// - [`ClientError::InvalidRequest`] when the transport rejects the request.
    pub fn new_request<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> ClientResult<Request>
    where
        B: Serialize + ?Sized,
    {
        self.request_builder(method, path, body)?
            .build()
            .map_err(|source| ClientError::InvalidRequest { source })
    }

    /// Build a patient-scoped request carrying a bearer token.
    ///
    /// Template for endpoints that need `Authorization` and `X-PatientId`.
    ///
    /// # Errors
    ///
    /// Same as [`Client::new_request`]; a token or patient id that is not a
    /// valid header value yields [`ClientError::InvalidRequest`].
    pub fn authorized_request(
        &self,
        method: Method,
        path: &str,
        token: &str,
        patient_id: &str,
    ) -> ClientResult<Request> {
        self.request_builder::<()>(method, path, None)?
            .bearer_auth(token)
            .header(HEADER_PATIENT_ID, patient_id)
            .build()
            .map_err(|source| ClientError::InvalidRequest { source })
    }

    /// Exchange a username/password pair for an access token.
    ///
    /// # Errors
    ///
    /// - [`ClientError::BadStatusCode`] on a non-2xx answer.
    /// - [`ClientError::BadCredentials`] when the envelope holds no token.
    /// - A decoding error (see [`ClientError::is_decoding`]) on unexpected JSON.
    /// - [`ClientError::Transport`] when the request cannot be completed.
    #[instrument(name = "patientaccess.sign_in", skip_all)]
    pub async fn sign_in(&self, username: &str, password: &str) -> ClientResult<AccessToken> {
        let credentials = Credentials { username, password };
        let request = self.new_request(Method::POST, SIGNIN_PATH, Some(&credentials))?;
        let envelope: AuthEnvelope = self.execute(request, "sign-in").await?;

        envelope.into_token(Utc::now()).inspect_err(|err| {
            if matches!(err, ClientError::BadCredentials) {
                warn!("sign-in accepted but no access token was issued");
            }
        })
    }

    /// Fetch the appointment slot types available to `patient_id`.
    ///
    /// Slots come back in server order; only id and name are kept.
    ///
    /// # Errors
    ///
    /// - [`ClientError::BadStatusCode`] on a non-2xx answer.
    /// - [`ClientError::Decoding`] on unexpected JSON.
    /// - [`ClientError::Transport`] when the request cannot be completed.
    #[instrument(name = "patientaccess.appointment_slots", skip_all)]
    pub async fn appointment_slots(
        &self,
        token: &str,
        patient_id: &str,
    ) -> ClientResult<Vec<AppointmentSlot>> {
        let request =
            self.authorized_request(Method::GET, APPOINTMENT_HIERARCHY_PATH, token, patient_id)?;
        let response: HierarchyResponse = self.execute(request, "appointment hierarchy").await?;
        let slots = response.into_slots();
        debug!(count = slots.len(), "decoded appointment slots");
        Ok(slots)
    }

    fn request_builder<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> ClientResult<reqwest::RequestBuilder>
    where
        B: Serialize + ?Sized,
    {
        let url = join_paths(&self.base_url, path)?;
        let mut builder = self
            .http
            .request(method, url)
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .header(ACCEPT, ACCEPT_ANY_JSON)
            .header(USER_AGENT, self.user_agent_header.clone());

        if let Some(body) = body {
            let payload =
                serde_json::to_vec(body).map_err(|source| ClientError::Encoding { source })?;
            builder = builder.body(payload);
        }

        Ok(builder)
    }

    async fn execute<T>(&self, request: Request, operation: &'static str) -> ClientResult<T>
    where
        T: DeserializeOwned,
    {
        debug!(method = %request.method(), url = %request.url(), operation, "sending request");

        let response = self
            .http
            .execute(request)
            .await
            .map_err(|source| ClientError::Transport { operation, source })?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, operation, "request rejected");
            return Err(ClientError::BadStatusCode { status });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|source| ClientError::Transport { operation, source })?;
        decode_first(&bytes, operation)
    }
}

/// Decode the first JSON value in `bytes`, ignoring anything after it.
fn decode_first<T>(bytes: &[u8], operation: &'static str) -> ClientResult<T>
where
    T: DeserializeOwned,
{
    let mut values = serde_json::Deserializer::from_slice(bytes).into_iter::<T>();
    values
        .next()
        .unwrap_or_else(|| serde_json::from_slice(bytes))
        .map_err(|source| ClientError::Decoding { operation, source })
}

/// Configuration for a [`Client`].
#[derive(Debug, Clone, Default)]
pub struct ClientBuilder {
    base_url: Option<String>,
    user_agent: Option<String>,
    timeout: Option<Duration>,
    http: Option<reqwest::Client>,
}

impl ClientBuilder {
    /// Override the API root (defaults to [`DEFAULT_BASE_URL`]).
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Override the user agent (defaults to [`DEFAULT_USER_AGENT`]).
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Total per-request timeout applied by the transport.
    ///
    /// Ignored when a pre-built transport is supplied via [`ClientBuilder::http_client`].
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Reuse an existing `reqwest::Client` and its connection pool.
    #[must_use]
    pub fn http_client(mut self, http: reqwest::Client) -> Self {
        self.http = Some(http);
        self
    }

    /// Validate the configuration and construct the client.
    ///
    /// # Errors
    ///
    /// - [`ClientError::InvalidBaseUrl`] when the base URL is not an absolute
    ///   URL that can carry a path.
    /// - [`ClientError::InvalidUserAgent`] when the user agent is not a valid header value.
    /// - [`ClientError::ClientBuild`] when the transport cannot be initialised.
    pub fn build(self) -> ClientResult<Client> {
        let raw_base = self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
        let base_url = parse_base_url(raw_base)?;

        let user_agent = self
            .user_agent
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());
        let user_agent_header =
            HeaderValue::from_str(&user_agent).map_err(|_| ClientError::InvalidUserAgent {
                value: user_agent.clone(),
            })?;

        let http = match self.http {
            Some(http) => http,
            None => {
                let mut builder = reqwest::Client::builder();
                if let Some(timeout) = self.timeout {
                    builder = builder.timeout(timeout);
                }
                builder
                    .build()
                    .map_err(|source| ClientError::ClientBuild { source })?
            }
        };

        Ok(Client {
            http,
            base_url,
            user_agent,
            user_agent_header,
        })
    }
}

fn parse_base_url(input: &str) -> ClientResult<Url> {
    let invalid = |reason: String| ClientError::InvalidBaseUrl {
        value: input.to_string(),
        reason,
    };

    let url = Url::parse(input).map_err(|err| invalid(err.to_string()))?;
    if url.cannot_be_a_base() || !url.has_host() {
        return Err(invalid("base URL must be hierarchical with a host".to_string()));
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use serde_json::{Value, json};

    fn client_for(base: &str) -> Result<Client> {
        Ok(Client::builder()
            .base_url(base)
            .user_agent("patientaccess-tests/1.0")
            .build()?)
    }

    fn header<'a>(request: &'a Request, name: &str) -> Option<&'a str> {
        request
            .headers()
            .get(name)
            .and_then(|value| value.to_str().ok())
    }

    #[test]
    fn defaults_target_production_api() -> Result<()> {
        let client = Client::new()?;
        assert_eq!(client.base_url().as_str(), DEFAULT_BASE_URL);
        assert_eq!(client.user_agent(), DEFAULT_USER_AGENT);
        Ok(())
    }

    #[test]
    fn new_request_sets_standard_headers() -> Result<()> {
        let client = client_for("https://t.co/api")?;
        let request = client.new_request::<()>(Method::GET, "slots", None)?;

        assert_eq!(request.method(), Method::GET);
        assert_eq!(request.url().as_str(), "https://t.co/api/slots");
        assert_eq!(header(&request, "content-type"), Some(JSON_CONTENT_TYPE));
        assert_eq!(header(&request, "accept"), Some(ACCEPT_ANY_JSON));
        assert_eq!(header(&request, "user-agent"), Some("patientaccess-tests/1.0"));
        assert!(request.body().is_none());
        Ok(())
    }

    #[test]
    fn new_request_encodes_json_body() -> Result<()> {
        let client = client_for("https://t.co/api")?;
        let payload = json!({"username": "roman", "password": "sikr3t"});
        let request = client.new_request(Method::POST, SIGNIN_PATH, Some(&payload))?;

        let bytes = request
            .body()
            .and_then(reqwest::Body::as_bytes)
            .ok_or_else(|| anyhow::anyhow!("expected buffered body"))?;
        let sent: Value = serde_json::from_slice(bytes)?;
        assert_eq!(sent, payload);
        assert_eq!(
            request.url().as_str(),
            "https://t.co/api/authorization/signin"
        );
        Ok(())
    }

    #[test]
    fn new_request_propagates_malformed_path() -> Result<()> {
        let client = client_for("https://t.co/api")?;
        let err = client
            .new_request::<()>(Method::GET, "bad%zz", None)
            .expect_err("path must be rejected");
        assert!(matches!(err, ClientError::MalformedPath { .. }));
        Ok(())
    }

    #[test]
    fn new_request_reports_encoding_failures() -> Result<()> {
        struct Unencodable;
        impl Serialize for Unencodable {
            fn serialize<S: serde::Serializer>(&self, _: S) -> Result<S::Ok, S::Error> {
                Err(<S::Error as serde::ser::Error>::custom("refused"))
            }
        }

        let client = client_for("https://t.co/api")?;
        let err = client
            .new_request(Method::POST, "x", Some(&Unencodable))
            .expect_err("encoding must fail");
        assert!(matches!(err, ClientError::Encoding { .. }));
        Ok(())
    }

    #[test]
    fn authorized_request_carries_bearer_and_patient() -> Result<()> {
        let client = client_for("https://t.co/api")?;
        let request = client.authorized_request(
            Method::GET,
            APPOINTMENT_HIERARCHY_PATH,
            "abc123",
            "patient-1",
        )?;
        assert_eq!(header(&request, "authorization"), Some("Bearer abc123"));
        assert_eq!(header(&request, HEADER_PATIENT_ID), Some("patient-1"));
        assert_eq!(
            request.url().as_str(),
            "https://t.co/api/Appointment/properties/hierarchy"
        );
        Ok(())
    }

    #[test]
    fn authorized_request_rejects_header_breaking_values() -> Result<()> {
        let client = client_for("https://t.co/api")?;
        let err = client
            .authorized_request(Method::GET, "x", "abc", "line\nbreak")
            .expect_err("header must be rejected");
        assert!(matches!(err, ClientError::InvalidRequest { .. }));
        Ok(())
    }

    #[test]
    fn builder_rejects_unusable_base_urls() {
        for base in ["not a url", "/relative/api", "mailto:someone@example.com"] {
            let err = Client::builder()
                .base_url(base)
                .build()
                .expect_err("base must be rejected");
            assert!(
                matches!(err, ClientError::InvalidBaseUrl { .. }),
                "unexpected error for {base}: {err:?}"
            );
        }
    }

    #[test]
    fn builder_rejects_invalid_user_agent() {
        let err = Client::builder()
            .user_agent("agent\r\ninjected")
            .build()
            .expect_err("agent must be rejected");
        assert!(matches!(err, ClientError::InvalidUserAgent { .. }));
    }

    #[test]
    fn non_ascii_user_agent_is_reported_verbatim() -> Result<()> {
        let client = Client::builder()
            .base_url("https://t.co/api")
            .user_agent("agent-ü/1.0")
            .build()?;
        assert_eq!(client.user_agent(), "agent-ü/1.0");

        let request = client.new_request::<()>(Method::GET, "slots", None)?;
        let sent = request
            .headers()
            .get(USER_AGENT)
            .map(HeaderValue::as_bytes);
        assert_eq!(sent, Some("agent-ü/1.0".as_bytes()));
        Ok(())
    }

    #[test]
    fn decode_first_ignores_trailing_bytes() -> Result<()> {
        let value: Value = decode_first(br#"{"accessToken": null}""#, "test")?;
        assert_eq!(value, json!({"accessToken": null}));
        Ok(())
    }

    #[test]
    fn decode_first_rejects_empty_and_garbage() {
        for body in [&b""[..], &b"   "[..], &b"<html>oops</html>"[..]] {
            let err = decode_first::<Value>(body, "test").expect_err("must fail");
            assert!(matches!(err, ClientError::Decoding { .. }));
        }
    }
}
