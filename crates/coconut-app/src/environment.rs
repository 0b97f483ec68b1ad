// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::listing::FallbackPolicy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Production,
    Local,
}

impl Environment {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "production" => Some(Self::Production),
            "local" => Some(Self::Local),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Production => "production",
            Self::Local => "local",
        }
    }

    pub const fn api_base_url(self) -> &'static str {
        match self {
            Self::Production => "https://www.wooricoconut.com/api/v1",
            Self::Local => "http://localhost:8080/api/v1",
        }
    }

    pub const fn oauth_authorize_url(self) -> &'static str {
        match self {
            Self::Production => "https://www.wooricoconut.com/oauth2/authorization/google",
            Self::Local => "http://localhost:8080/oauth2/authorization/google",
        }
    }

    /// Local builds keep the listing usable without a backend.
    pub const fn fallback_policy(self) -> FallbackPolicy {
        match self {
            Self::Production => FallbackPolicy::Empty,
            Self::Local => FallbackPolicy::SampleRecord,
        }
    }
}
