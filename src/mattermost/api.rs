//! Type definitions and helpers for the Mattermost API.

use super::{
    auth::{to_auth_header_val, Session},
    error::MattermostError,
};
use serde::{de::DeserializeOwned, Deserialize};

/// Where the v4 API lives relative to the server's base URL.
pub const API_PREFIX: &str = "/api/v4";

/// A client bound to a single Mattermost server, holding a connection pool
/// internally as per [reqwest::Client].
///
/// The client is unauthenticated until [MattermostClient::login] succeeds,
/// after which every request carries the session token.
pub struct MattermostClient {
    base: String,
    http: reqwest::Client,
    pub(super) session: Option<Session>,
}

impl MattermostClient {
    /// `base` is the server URL without the `/api/v4` suffix.
    pub fn new(base: String) -> Self {
        MattermostClient {
            base: base.trim_end_matches('/').to_owned(),
            http: reqwest::Client::new(),
            session: None,
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    fn url<T: ToString>(&self, path: T) -> String {
        format!("{}{}{}", self.base, API_PREFIX, path.to_string())
    }

    /// Create a GET request to any API endpoint, handling authentication.
    pub(super) fn get<T: ToString>(&self, path: T) -> reqwest::RequestBuilder {
        self.authenticate(self.http.get(self.url(path)))
    }

    /// Create a POST request to any API endpoint, handling authentication.
    pub(super) fn post<T: ToString>(&self, path: T) -> reqwest::RequestBuilder {
        self.authenticate(self.http.post(self.url(path)))
    }

    fn authenticate(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.session {
            Some(s) => req.header(reqwest::header::AUTHORIZATION, to_auth_header_val(&s.token)),
            None => req,
        }
    }

    /// The logged in session, required by endpoints that act on behalf of
    /// the current user.
    pub(super) fn session(&self) -> Result<&Session, MattermostError> {
        self.session.as_ref().ok_or(MattermostError::NotLoggedIn)
    }
}

/// Mattermost's API signals failure with a non-2xx status and a common body.
///
/// ```json
/// {
///     "id": "api.user.login.invalid_credentials_email_username",
///     "message": "Enter a valid email or username and/or password.",
///     "status_code": 401
/// }
/// ```
#[derive(Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}

/// Decode a successful response body, or surface the API's own error message
/// otherwise.
pub async fn decode<T: DeserializeOwned>(res: reqwest::Response) -> Result<T, MattermostError> {
    let status = res.status();

    if status.is_success() {
        return Ok(res.json().await?);
    }

    // Not every failure (e.g. from a proxy in front of the server) carries a
    // JSON body.
    let message = match res.json::<ErrorResponse>().await {
        Ok(e) => e.message,
        Err(_) => status.canonical_reason().unwrap_or("unknown").to_owned(),
    };

    Err(MattermostError::APIResponseError {
        status: status.as_u16(),
        message,
    })
}

/// Read a header as an owned string, if present and valid.
pub fn header(res: &reqwest::Response, name: &str) -> Option<String> {
    res.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}
