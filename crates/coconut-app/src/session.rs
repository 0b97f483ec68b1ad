// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use base64::Engine;
use serde::Deserialize;
use std::fmt;
use time::OffsetDateTime;

pub const SESSION_EXPIRED_MESSAGE: &str = "세션이 만료되었습니다. 다시 로그인해 주세요.";

/// Bearer token issued by the authentication backend.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    /// Returns `None` for a blank token.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The `exp` claim when the token is a JWT with a readable payload.
    pub fn expires_at(&self) -> Option<OffsetDateTime> {
        let payload = self.0.split('.').nth(1)?;
        let bytes = base64::engine::general_purpose::URL_SAFE_NO_PAD
            .decode(payload.trim_end_matches('='))
            .ok()?;
        let claims: JwtClaims = serde_json::from_slice(&bytes).ok()?;
        OffsetDateTime::from_unix_timestamp(claims.exp?).ok()
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(<redacted>)")
    }
}

#[derive(Debug, Deserialize)]
struct JwtClaims {
    exp: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Session {
    #[default]
    Absent,
    Present(SessionToken),
    Expired(SessionToken),
}

impl Session {
    pub fn from_token(token: Option<SessionToken>, now: OffsetDateTime) -> Self {
        let Some(token) = token else {
            return Self::Absent;
        };
        match token.expires_at() {
            Some(expires_at) if expires_at <= now => Self::Expired(token),
            _ => Self::Present(token),
        }
    }

    /// Downgrades a present token whose `exp` has passed. Returns whether
    /// the session changed.
    pub fn expire_at(&mut self, now: OffsetDateTime) -> bool {
        let Self::Present(token) = self else {
            return false;
        };
        if !token.expires_at().is_some_and(|expires_at| expires_at <= now) {
            return false;
        }
        let token = token.clone();
        *self = Self::Expired(token);
        true
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Present(_))
    }

    pub fn token(&self) -> Option<&SessionToken> {
        match self {
            Self::Present(token) => Some(token),
            Self::Absent | Self::Expired(_) => None,
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Self::Absent => "signed out",
            Self::Present(_) => "signed in",
            Self::Expired(_) => "session expired",
        }
    }
}

/// Persisted home of the single session token.
pub trait TokenStore {
    fn load(&self) -> Result<Option<SessionToken>>;
    fn save(&mut self, token: &SessionToken) -> Result<()>;
    fn clear(&mut self) -> Result<()>;
}
