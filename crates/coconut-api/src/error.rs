// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use coconut_app::{FetchError, LoginError};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("cannot reach {url} ({message})")]
    Transport { url: String, message: String },
    #[error("request to {url} timed out after {timeout:?}")]
    TimedOut { url: String, timeout: Duration },
    #[error("server error ({status}): {message}")]
    Status { status: u16, message: String },
    #[error("authentication rejected: {0}")]
    AuthFailure(String),
    #[error("decode response from {url}: {message}")]
    Decode { url: String, message: String },
}

impl ApiError {
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::TimedOut { .. })
    }
}

impl From<ApiError> for FetchError {
    fn from(error: ApiError) -> Self {
        match error {
            ApiError::TimedOut { .. } => Self::TimedOut,
            other => Self::Transport(other.to_string()),
        }
    }
}

impl From<ApiError> for LoginError {
    fn from(error: ApiError) -> Self {
        match error {
            ApiError::AuthFailure(message) => Self::Rejected(message),
            other => Self::Transport(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ApiError;
    use coconut_app::{
        FETCH_FAILED_MESSAGE, FETCH_TIMED_OUT_MESSAGE, FetchError, LOGIN_TRANSPORT_FAILURE,
        LoginError,
    };
    use std::time::Duration;

    #[test]
    fn timeouts_stay_distinct_for_the_listing() {
        let error = FetchError::from(ApiError::TimedOut {
            url: "http://127.0.0.1/ipo/active".to_owned(),
            timeout: Duration::from_secs(10),
        });
        assert_eq!(error, FetchError::TimedOut);
        assert_eq!(error.user_message(), FETCH_TIMED_OUT_MESSAGE);

        let error = FetchError::from(ApiError::Status {
            status: 500,
            message: "boom".to_owned(),
        });
        assert_eq!(error.user_message(), FETCH_FAILED_MESSAGE);
    }

    #[test]
    fn auth_failure_keeps_server_message() {
        let error = LoginError::from(ApiError::AuthFailure("잠긴 계정입니다.".to_owned()));
        assert_eq!(error.user_message(), "잠긴 계정입니다.");

        let error = LoginError::from(ApiError::Transport {
            url: "http://127.0.0.1:1".to_owned(),
            message: "connection refused".to_owned(),
        });
        assert_eq!(error.user_message(), LOGIN_TRANSPORT_FAILURE);
    }
}
