// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use coconut_app::Environment;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const APP_NAME: &str = "coconut";
const CONFIG_VERSION: i64 = 1;
const DEFAULT_TIMEOUT: &str = "10s";
const MAX_TIMEOUT: Duration = Duration::from_secs(10 * 60);
const DEFAULT_LOG_LEVEL: &str = "info";
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub api: Api,
    #[serde(default)]
    pub dashboard: Dashboard,
    #[serde(default)]
    pub session: SessionFile,
    #[serde(default)]
    pub log: Log,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Api {
    pub environment: Option<String>,
    pub base_url: Option<String>,
    pub timeout: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Dashboard {
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionFile {
    pub token_path: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Log {
    pub level: Option<String>,
    pub path: Option<String>,
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os("COCONUT_CONFIG_PATH") {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set COCONUT_CONFIG_PATH to the config file")
        })?;

        let app_dir = config_root.join(APP_NAME);
        fs::create_dir_all(&app_dir)
            .with_context(|| format!("create config directory {}", app_dir.display()))?;
        Ok(app_dir.join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self {
                version: CONFIG_VERSION,
                ..Self::default()
            });
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} is not versioned. Add `version = 1` and put values under [api], [dashboard], [session], and [log]",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        self.environment()
            .with_context(|| format!("invalid [api] section in {}", path.display()))?;

        if let Some(base_url) = &self.api.base_url
            && base_url.trim().is_empty()
        {
            bail!(
                "api.base_url in {} must not be empty; remove it to use the environment default",
                path.display()
            );
        }

        if let Some(timeout) = &self.api.timeout {
            let parsed = parse_duration(timeout)?;
            if parsed <= Duration::ZERO {
                bail!(
                    "api.timeout in {} must be positive, got {}",
                    path.display(),
                    timeout
                );
            }
            if parsed > MAX_TIMEOUT {
                bail!(
                    "api.timeout in {} must be at most 10m, got {}",
                    path.display(),
                    timeout
                );
            }
        }

        if let Some(level) = &self.log.level
            && !LOG_LEVELS.contains(&level.as_str())
        {
            bail!(
                "log.level in {} must be one of {}, got {:?}",
                path.display(),
                LOG_LEVELS.join(", "),
                level
            );
        }

        Ok(())
    }

    pub fn environment(&self) -> Result<Environment> {
        match self.api.environment.as_deref() {
            None => Ok(Environment::default()),
            Some(raw) => Environment::parse(raw).ok_or_else(|| {
                anyhow!("api.environment must be \"production\" or \"local\", got {raw:?}")
            }),
        }
    }

    /// Explicit `api.base_url` wins over the environment's default.
    pub fn api_base_url(&self, environment: Environment) -> &str {
        self.api
            .base_url
            .as_deref()
            .unwrap_or(environment.api_base_url())
            .trim_end_matches('/')
    }

    pub fn api_timeout(&self) -> Result<Duration> {
        parse_duration(self.api.timeout.as_deref().unwrap_or(DEFAULT_TIMEOUT))
    }

    pub fn dashboard_url(&self) -> &str {
        self.dashboard.url.as_deref().unwrap_or("")
    }

    pub fn token_path(&self) -> Result<PathBuf> {
        match &self.session.token_path {
            Some(path) => Ok(PathBuf::from(path)),
            None => Ok(data_dir()?.join("session.token")),
        }
    }

    pub fn log_path(&self) -> Result<PathBuf> {
        match &self.log.path {
            Some(path) => Ok(PathBuf::from(path)),
            None => Ok(data_dir()?.join("coconut.log")),
        }
    }

    /// `[log].level`, then `COCONUT_LOG`, then `info`.
    pub fn log_level(&self) -> String {
        if let Some(level) = &self.log.level {
            return level.clone();
        }
        env::var("COCONUT_LOG")
            .ok()
            .filter(|level| !level.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_owned())
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# coconut config\n# Place this file at: {}\n\nversion = 1\n\n[api]\n# \"production\" or \"local\"\nenvironment = \"production\"\n# Optional. Defaults to {} (production) or {} (local)\n# base_url = \"{}\"\ntimeout = \"{}\"\n\n[dashboard]\n# Monitoring dashboard shown on the monitoring screen\n# url = \"http://grafana.example/d/cluster\"\n\n[session]\n# Optional. Default is platform data dir (for example ~/.local/share/coconut/session.token)\n# token_path = \"/absolute/path/session.token\"\n\n[log]\nlevel = \"{}\"\n# path = \"/absolute/path/coconut.log\"\n",
            path.display(),
            Environment::Production.api_base_url(),
            Environment::Local.api_base_url(),
            Environment::Production.api_base_url(),
            DEFAULT_TIMEOUT,
            DEFAULT_LOG_LEVEL,
        )
    }
}

fn data_dir() -> Result<PathBuf> {
    let root = dirs::data_dir()
        .ok_or_else(|| anyhow!("cannot resolve data directory; set [session].token_path"))?;
    Ok(root.join(APP_NAME))
}

fn parse_duration(raw: &str) -> Result<Duration> {
    if let Some(value) = raw.strip_suffix("ms") {
        let millis: u64 = value
            .parse()
            .with_context(|| format!("invalid timeout duration {raw:?}"))?;
        return Ok(Duration::from_millis(millis));
    }
    if let Some(value) = raw.strip_suffix('s') {
        let secs: u64 = value
            .parse()
            .with_context(|| format!("invalid timeout duration {raw:?}"))?;
        return Ok(Duration::from_secs(secs));
    }
    if let Some(value) = raw.strip_suffix('m') {
        let mins: u64 = value
            .parse()
            .with_context(|| format!("invalid timeout duration {raw:?}"))?;
        let secs = mins
            .checked_mul(60)
            .ok_or_else(|| anyhow!("timeout duration {raw:?} is out of range"))?;
        return Ok(Duration::from_secs(secs));
    }

    bail!("invalid duration {raw:?}; use one of: <N>ms, <N>s, <N>m (for example 500ms or 10s)")
}
