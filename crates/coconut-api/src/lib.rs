// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod error;

pub use error::ApiError;

use anyhow::{Context, Result, bail};
use coconut_app::{
    AUTH_FAILURE_FALLBACK, Authenticator, FetchError, LoginCredentials, LoginError, OfferingPage,
    OfferingSource, SessionToken,
};
use reqwest::StatusCode;
use reqwest::blocking::{Client as HttpClient, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

pub const ACTIVE_OFFERINGS_PATH: &str = "/ipo/active";
pub const AUTHENTICATE_PATH: &str = "/authenticate";
pub const CURRENT_USER_PATH: &str = "/users/me";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CurrentUser {
    pub username: String,
}

#[derive(Debug, Clone)]
pub struct Client {
    base_url: String,
    timeout: Duration,
    http: HttpClient,
}

impl Client {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = base_url.trim().trim_end_matches('/').to_owned();
        if base_url.is_empty() {
            bail!("api.base_url must not be empty");
        }
        Url::parse(&base_url).with_context(|| format!("parse api.base_url {base_url:?}"))?;

        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .context("build HTTP client")?;

        Ok(Self {
            base_url,
            timeout,
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.endpoint(path)?;
        self.fetch(self.http.get(url.clone()), "GET", &url)
    }

    pub fn get_json_authorized<T: DeserializeOwned>(
        &self,
        path: &str,
        token: &SessionToken,
    ) -> Result<T, ApiError> {
        let url = self.endpoint(path)?;
        debug!(token = %token_fingerprint(token), "attaching bearer token");
        let request = self.http.get(url.clone()).bearer_auth(token.as_str());
        self.fetch(request, "GET", &url)
    }

    pub fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.endpoint(path)?;
        self.fetch(self.http.post(url.clone()).json(body), "POST", &url)
    }

    /// One page of currently open offerings.
    pub fn active_offerings(&self, page: u32) -> Result<OfferingPage, ApiError> {
        let mut url = self.endpoint(ACTIVE_OFFERINGS_PATH)?;
        url.query_pairs_mut().append_pair("page", &page.to_string());
        self.fetch(self.http.get(url.clone()), "GET", &url)
    }

    /// Exchanges credentials for a session token. Any non-2xx answer is an
    /// authentication failure carrying the server's message.
    pub fn authenticate(&self, id: &str, password: &str) -> Result<SessionToken, ApiError> {
        let url = self.endpoint(AUTHENTICATE_PATH)?;
        let request = self
            .http
            .post(url.clone())
            .json(&AuthenticateRequest { id, password });
        let response = self.send(request, "POST", &url)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            let message = server_message(&body).unwrap_or_else(|| AUTH_FAILURE_FALLBACK.to_owned());
            warn!(status = status.as_u16(), "authentication rejected");
            return Err(ApiError::AuthFailure(message));
        }

        let parsed: AuthenticateResponse = self.decode(response, &url)?;
        SessionToken::new(parsed.token).ok_or_else(|| ApiError::Decode {
            url: url.to_string(),
            message: "empty token".to_owned(),
        })
    }

    pub fn current_user(&self, token: &SessionToken) -> Result<CurrentUser, ApiError> {
        self.get_json_authorized(CURRENT_USER_PATH, token)
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        let raw = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        Url::parse(&raw).map_err(|error| ApiError::Transport {
            url: raw,
            message: error.to_string(),
        })
    }

    fn fetch<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        method: &str,
        url: &Url,
    ) -> Result<T, ApiError> {
        let response = self.send(request, method, url)?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            let error = clean_error_response(status, &body);
            warn!(%method, %url, %error, "request failed");
            return Err(error);
        }
        self.decode(response, url)
    }

    fn send(&self, request: RequestBuilder, method: &str, url: &Url) -> Result<Response, ApiError> {
        debug!(%method, %url, "sending request");
        let response = request
            .send()
            .map_err(|error| self.request_error(url, error))?;
        debug!(%method, %url, status = response.status().as_u16(), "received response");
        Ok(response)
    }

    fn decode<T: DeserializeOwned>(&self, response: Response, url: &Url) -> Result<T, ApiError> {
        response.json().map_err(|error| self.request_error(url, error))
    }

    fn request_error(&self, url: &Url, error: reqwest::Error) -> ApiError {
        let converted = if error.is_timeout() {
            ApiError::TimedOut {
                url: url.to_string(),
                timeout: self.timeout,
            }
        } else if error.is_decode() {
            ApiError::Decode {
                url: url.to_string(),
                message: error.to_string(),
            }
        } else {
            ApiError::Transport {
                url: url.to_string(),
                message: error.to_string(),
            }
        };
        warn!(%url, error = %converted, "request error");
        converted
    }
}

impl OfferingSource for Client {
    fn fetch_active(&self, page: u32) -> Result<OfferingPage, FetchError> {
        self.active_offerings(page).map_err(FetchError::from)
    }
}

impl Authenticator for Client {
    fn authenticate(&self, credentials: &LoginCredentials) -> Result<SessionToken, LoginError> {
        Ok(Client::authenticate(
            self,
            &credentials.id,
            &credentials.password,
        )?)
    }

    fn current_username(&self, token: &SessionToken) -> Result<String, LoginError> {
        Ok(self.current_user(token)?.username)
    }
}

/// Short stable identifier for a token, safe to write to logs.
pub fn token_fingerprint(token: &SessionToken) -> String {
    let digest = Sha256::digest(token.as_str().as_bytes());
    digest[..6].iter().map(|byte| format!("{byte:02x}")).collect()
}

fn server_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.message)
        .map(|message| message.trim().to_owned())
        .filter(|message| !message.is_empty())
}

fn clean_error_response(status: StatusCode, body: &str) -> ApiError {
    let message = if let Some(message) = server_message(body) {
        message
    } else if body.len() < 100 && !body.contains('{') && !body.trim().is_empty() {
        body.trim().to_owned()
    } else {
        status
            .canonical_reason()
            .unwrap_or("unexpected status")
            .to_owned()
    };
    ApiError::Status {
        status: status.as_u16(),
        message,
    }
}

#[derive(Debug, Serialize)]
struct AuthenticateRequest<'a> {
    id: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct AuthenticateResponse {
    token: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::{Client, clean_error_response, server_message, token_fingerprint};
    use crate::ApiError;
    use coconut_app::SessionToken;
    use reqwest::StatusCode;
    use std::time::Duration;

    #[test]
    fn new_trims_trailing_slash_and_rejects_empty() {
        let client =
            Client::new("http://localhost:8080/api/v1/", Duration::from_secs(1)).expect("client");
        assert_eq!(client.base_url(), "http://localhost:8080/api/v1");
        assert_eq!(client.timeout(), Duration::from_secs(1));

        let error = Client::new("  ", Duration::from_secs(1)).expect_err("empty base url");
        assert!(error.to_string().contains("api.base_url"));
        assert!(Client::new("not a url", Duration::from_secs(1)).is_err());
    }

    #[test]
    fn error_body_prefers_backend_message() {
        assert_eq!(
            clean_error_response(StatusCode::BAD_REQUEST, r#"{"message":"잘못된 요청"}"#),
            ApiError::Status {
                status: 400,
                message: "잘못된 요청".to_owned(),
            }
        );
        assert_eq!(
            clean_error_response(StatusCode::BAD_GATEWAY, "upstream down"),
            ApiError::Status {
                status: 502,
                message: "upstream down".to_owned(),
            }
        );
        assert_eq!(
            clean_error_response(StatusCode::INTERNAL_SERVER_ERROR, r#"{"trace":[]}"#),
            ApiError::Status {
                status: 500,
                message: "Internal Server Error".to_owned(),
            }
        );
        assert_eq!(server_message(r#"{"message":"  "}"#), None);
    }

    #[test]
    fn fingerprint_hides_token() {
        let token = SessionToken::new("secret-token-value").expect("token");
        let fingerprint = token_fingerprint(&token);
        assert_eq!(fingerprint.len(), 12);
        assert!(!fingerprint.contains("secret"));
        assert_eq!(fingerprint, token_fingerprint(&token));
    }
}
