// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SandboxPermission {
    SameOrigin,
    Scripts,
    Popups,
    Forms,
}

impl SandboxPermission {
    pub const ALL: [Self; 4] = [Self::SameOrigin, Self::Scripts, Self::Popups, Self::Forms];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SameOrigin => "allow-same-origin",
            Self::Scripts => "allow-scripts",
            Self::Popups => "allow-popups",
            Self::Forms => "allow-forms",
        }
    }
}

/// The external monitoring dashboard and the sandbox it must be embedded in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitoringPanel {
    pub url: String,
    pub sandbox: Vec<SandboxPermission>,
}

impl MonitoringPanel {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            sandbox: SandboxPermission::ALL.to_vec(),
        }
    }

    pub fn sandbox_attribute(&self) -> String {
        self.sandbox
            .iter()
            .map(|permission| permission.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn is_configured(&self) -> bool {
        !self.url.trim().is_empty()
    }
}
