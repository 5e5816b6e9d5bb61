//! Vault HTTP client with logging integration.
//!
//! Every public operation performs exactly one request. Error translation
//! differs per operation:
//!
//! | Operation         | 404             | other 4xx/5xx          |
//! |-------------------|-----------------|------------------------|
//! | `seal`            | `Remote`        | `Remote`               |
//! | `get_secret`      | `NotFound(key)` | `Remote`               |
//! | `get_list`        | `NotFound(key)` | `Remote`               |
//! | everything else   | `Transport`     | `Transport`            |

use crate::{
    config::VaultConfig,
    error::{VaultError, VaultResult},
    response::{
        DeleteOutcome, ResponseEnvelope, SealRequest, SecretPayload, WriteRequest,
        decode_envelope, remote_error, sealed_flag,
    },
};
use reqwest::{
    Client, Method, RequestBuilder, Response, StatusCode,
    header::{ACCEPT, HeaderMap},
};
use rust_common::{HttpConfig, build_http_client};
use secrecy::ExposeSecret;
use std::fmt;
use tracing::{debug, instrument, warn};
use url::Url;

/// Header carrying the access token.
pub const TOKEN_HEADER: &str = "X-Vault-Token";

/// Vault client bound to one server and one token.
///
/// Immutable after construction; share it by reference across tasks.
pub struct VaultClient {
    base_url: String,
    base: Url,
    http: Client,
    headers: HeaderMap,
    list_method: Method,
}

impl fmt::Debug for VaultClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VaultClient")
            .field("base_url", &self.base_url)
            .field("token", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl VaultClient {
    /// Create a new Vault client with the default 2 second timeout.
    ///
    /// No request is made until an operation is called.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::InvalidConfig`] if `base_url` is not an absolute
    /// http(s) URL or the token is empty, and [`VaultError::Platform`] if the
    /// token is not a legal header value or the HTTP client cannot be built.
    pub fn new(access_token: impl Into<String>, base_url: impl Into<String>) -> VaultResult<Self> {
        Self::from_config(VaultConfig::new(access_token, base_url))
    }

    /// Create a new Vault client from a full configuration.
    ///
    /// # Errors
    ///
    /// See [`VaultClient::new`].
    pub fn from_config(config: VaultConfig) -> VaultResult<Self> {
        config.validate()?;

        let http_config = HttpConfig::default()
            .with_timeout(config.timeout)
            .with_connect_timeout(config.connect_timeout)
            .with_user_agent(config.user_agent.as_str())
            .with_default_header(TOKEN_HEADER, config.token.expose_secret(), true)?
            .with_default_header(ACCEPT.as_str(), "application/json", false)?;
        let http = build_http_client(&http_config)?;
        let base = Url::parse(config.base_url())
            .map_err(|e| VaultError::invalid_config(format!("addr {:?}: {e}", config.addr)))?;
        let list_method = Method::from_bytes(b"LIST")
            .map_err(|e| VaultError::invalid_config(format!("LIST method: {e}")))?;

        debug!(addr = %config.base_url(), "Vault client created");

        Ok(Self {
            base_url: config.base_url().to_string(),
            base,
            http,
            headers: http_config.default_headers,
            list_method,
        })
    }

    /// Server address this client talks to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Report whether the server is sealed.
    ///
    /// Only an explicit `"sealed": false` in the status body yields `false`.
    ///
    /// # Errors
    ///
    /// Transport errors and error statuses pass through as
    /// [`VaultError::Transport`]; a non-object body is [`VaultError::Parse`].
    #[instrument(skip(self))]
    pub async fn is_sealed(&self) -> VaultResult<bool> {
        let response = send(self.http.get(self.url(["sys", "seal-status"])?)).await?;
        let envelope = read_envelope(pass_through(response)?).await?;
        let sealed = sealed_flag(&envelope);

        debug!(sealed, "Seal status");
        Ok(sealed)
    }

    /// Seal the server. Returns `true` only on 204 No Content.
    ///
    /// # Errors
    ///
    /// Error statuses become [`VaultError::Remote`] with the server's error
    /// strings joined; a failure before any response is
    /// [`VaultError::Transport`].
    #[instrument(skip(self, key))]
    pub async fn seal(&self, key: &str, reset: bool) -> VaultResult<bool> {
        let request = self
            .http
            .put(self.url(["sys", "seal"])?)
            .json(&SealRequest::new(key, reset));
        let response = translate(send(request).await?, None).await?;

        Ok(response.status() == StatusCode::NO_CONTENT)
    }

    /// Submit an unseal key. Returns `true` only on 204 No Content.
    ///
    /// # Errors
    ///
    /// Transport errors and error statuses pass through unmodified as
    /// [`VaultError::Transport`].
    #[instrument(skip(self, key))]
    pub async fn unseal(&self, key: &str, reset: bool) -> VaultResult<bool> {
        let request = self
            .http
            .put(self.url(["sys", "unseal"])?)
            .json(&SealRequest::new(key, reset));
        let response = pass_through(send(request).await?)?;

        Ok(response.status() == StatusCode::NO_CONTENT)
    }

    /// Read a secret from the KV v2 engine, returning the whole envelope.
    ///
    /// # Errors
    ///
    /// 404 is [`VaultError::NotFound`] carrying `key`; other error statuses
    /// are [`VaultError::Remote`].
    #[instrument(skip(self))]
    pub async fn get_secret(&self, key: &str) -> VaultResult<SecretPayload> {
        let response = send(self.http.get(self.secret_url("data", key)?)).await?;
        read_envelope(translate(response, Some(key)).await?).await
    }

    /// Write `data` under `key`, sent as `{"data": data}`.
    ///
    /// # Errors
    ///
    /// Transport errors and error statuses pass through unmodified.
    #[instrument(skip(self, data), fields(entries = data.len()))]
    pub async fn set_secret(&self, key: &str, data: &SecretPayload) -> VaultResult<ResponseEnvelope> {
        let request = self
            .http
            .post(self.secret_url("data", key)?)
            .json(&WriteRequest { data });
        let response = pass_through(send(request).await?)?;
        read_envelope(response).await
    }

    /// Delete the latest version of a secret.
    ///
    /// # Errors
    ///
    /// Transport errors and error statuses pass through unmodified; a
    /// non-204 success whose body is not an object is [`VaultError::Parse`].
    #[instrument(skip(self))]
    pub async fn delete_secret(&self, key: &str) -> VaultResult<DeleteOutcome> {
        let response = send(self.http.delete(self.secret_url("data", key)?)).await?;
        let response = pass_through(response)?;

        if response.status() == StatusCode::NO_CONTENT {
            return Ok(DeleteOutcome::Deleted);
        }
        Ok(DeleteOutcome::Responded(read_envelope(response).await?))
    }

    /// List the entries under a metadata path with the `LIST` verb.
    ///
    /// # Errors
    ///
    /// 404 is [`VaultError::NotFound`] carrying `key`; other error statuses
    /// are [`VaultError::Remote`].
    #[instrument(skip(self))]
    pub async fn get_list(&self, key: &str) -> VaultResult<ResponseEnvelope> {
        let request = self
            .http
            .request(self.list_method.clone(), self.secret_url("metadata", key)?)
            .headers(self.headers.clone());
        let response = send(request).await?;
        read_envelope(translate(response, Some(key)).await?).await
    }

    /// Read a secret's metadata (versions, timestamps).
    ///
    /// # Errors
    ///
    /// Transport errors and error statuses pass through unmodified.
    #[instrument(skip(self))]
    pub async fn get_secret_meta(&self, key: &str) -> VaultResult<ResponseEnvelope> {
        let response = send(self.http.get(self.secret_url("metadata", key)?)).await?;
        read_envelope(pass_through(response)?).await
    }

    fn url<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> VaultResult<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| {
                VaultError::invalid_config(format!("addr {:?} cannot be a base", self.base_url))
            })?
            .pop_if_empty()
            .push("v1")
            .extend(segments);
        Ok(url)
    }

    /// Each `/`-separated part of `key` becomes one percent-encoded segment,
    /// so `#`, `?` and `%` stay inside the key.
    fn secret_url(&self, section: &str, key: &str) -> VaultResult<Url> {
        let parts = key.trim_start_matches('/').split('/');
        self.url(["secret", section].into_iter().chain(parts))
    }
}

async fn send(request: RequestBuilder) -> VaultResult<Response> {
    let response = request.send().await.map_err(|e| {
        warn!(error = %e, "Vault request failed");
        VaultError::Transport(e)
    })?;

    debug!(status = response.status().as_u16(), url = %response.url().path(), "Vault responded");
    Ok(response)
}

fn is_error_status(status: StatusCode) -> bool {
    status.is_client_error() || status.is_server_error()
}

/// Hand back error statuses as the untouched transport error.
fn pass_through(response: Response) -> VaultResult<Response> {
    response.error_for_status().map_err(|e| {
        warn!(status = ?e.status(), "Vault returned error status");
        VaultError::Transport(e)
    })
}

/// Map error statuses to `NotFound` (when a key is given) or `Remote`.
async fn translate(response: Response, key: Option<&str>) -> VaultResult<Response> {
    let status = response.status();
    if !is_error_status(status) {
        return Ok(response);
    }

    warn!(status = status.as_u16(), "Vault returned error status");

    if status == StatusCode::NOT_FOUND {
        if let Some(key) = key {
            return Err(VaultError::not_found(key));
        }
    }

    let body = response.bytes().await?;
    Err(remote_error(&body))
}

async fn read_envelope(response: Response) -> VaultResult<ResponseEnvelope> {
    let body = response.bytes().await?;
    decode_envelope(&body)
}
