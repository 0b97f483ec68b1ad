// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::session::SessionToken;
use anyhow::{Result, bail};
use std::fmt;
use tracing::warn;

pub const AUTH_FAILURE_FALLBACK: &str = "아이디 또는 비밀번호를 확인해주세요.";
pub const LOGIN_TRANSPORT_FAILURE: &str = "로그인 요청 중 오류가 발생했습니다.";

pub fn welcome_message(username: &str) -> String {
    format!("{username}님, 오셨군요! 환영합니다!")
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginError {
    #[error("{0}")]
    Rejected(String),
    #[error("login request failed: {0}")]
    Transport(String),
}

impl LoginError {
    /// Text for the blocking notification shown to the user.
    pub fn user_message(&self) -> &str {
        match self {
            Self::Rejected(message) if !message.is_empty() => message.as_str(),
            Self::Rejected(_) => AUTH_FAILURE_FALLBACK,
            Self::Transport(_) => LOGIN_TRANSPORT_FAILURE,
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    pub id: String,
    pub password: String,
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("id", &self.id)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// The backend calls behind the login form.
pub trait Authenticator {
    fn authenticate(&self, credentials: &LoginCredentials) -> Result<SessionToken, LoginError>;
    fn current_username(&self, token: &SessionToken) -> Result<String, LoginError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignIn {
    pub token: SessionToken,
    pub username: String,
}

/// Authenticates, then looks up the display name. A failed lookup falls back
/// to the login id rather than failing the login.
pub fn sign_in<A: Authenticator + ?Sized>(
    auth: &A,
    credentials: &LoginCredentials,
) -> Result<SignIn, LoginError> {
    let token = auth.authenticate(credentials)?;
    let username = match auth.current_username(&token) {
        Ok(username) => username,
        Err(error) => {
            warn!(%error, "current user lookup failed");
            credentials.id.clone()
        }
    };
    Ok(SignIn { token, username })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginField {
    #[default]
    Id,
    Password,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoginForm {
    pub id: String,
    pub password: String,
    pub focus: LoginField,
}

impl LoginForm {
    pub fn push_char(&mut self, ch: char) {
        self.focused_mut().push(ch);
    }

    pub fn pop_char(&mut self) {
        self.focused_mut().pop();
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            LoginField::Id => LoginField::Password,
            LoginField::Password => LoginField::Id,
        };
    }

    pub fn masked_password(&self) -> String {
        "*".repeat(self.password.chars().count())
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn validate(&self) -> Result<LoginCredentials> {
        let id = self.id.trim();
        if id.is_empty() {
            bail!("아이디를 입력하세요.");
        }
        if self.password.is_empty() {
            bail!("비밀번호를 입력하세요.");
        }
        Ok(LoginCredentials {
            id: id.to_owned(),
            password: self.password.clone(),
        })
    }

    fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            LoginField::Id => &mut self.id,
            LoginField::Password => &mut self.password,
        }
    }
}
