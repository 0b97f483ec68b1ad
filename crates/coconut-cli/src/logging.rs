// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow};
use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

const CRATES: [&str; 4] = ["coconut", "coconut_api", "coconut_app", "coconut_tui"];

/// Routes `tracing` output to an append-only file. The terminal belongs to
/// the TUI, so nothing is written to stdout or stderr.
pub fn init(path: &Path, level: &str) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("create log directory {}", parent.display()))?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(level)?)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|error| anyhow!("install log subscriber: {error}"))
}

/// Our crates log at `level`; dependencies stay at `warn`.
fn directives(level: &str) -> String {
    let mut directives = vec!["warn".to_owned()];
    directives.extend(CRATES.iter().map(|krate| format!("{krate}={level}")));
    directives.join(",")
}

fn env_filter(level: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(directives(level))
        .with_context(|| format!("invalid log level {level:?}"))
}
