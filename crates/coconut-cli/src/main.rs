// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod logging;
mod runtime;
mod session_store;

use anyhow::{Context, Result};
use coconut_app::{AppState, Environment, SESSION_EXPIRED_MESSAGE, Session, TokenStore};
use config::Config;
use runtime::ApiRuntime;
use session_store::FileTokenStore;
use std::env;
use std::path::PathBuf;
use time::OffsetDateTime;
use tracing::info;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `coconut --print-example-config` to generate a template",
            options.config_path.display()
        )
    })?;

    let environment = if options.local {
        Environment::Local
    } else {
        config.environment()?
    };

    let base_url = config.api_base_url(environment).to_owned();
    let client = coconut_api::Client::new(&base_url, config.api_timeout()?).with_context(|| {
        format!(
            "invalid [api] config in {}; fix base_url/timeout values",
            options.config_path.display()
        )
    })?;

    let store = FileTokenStore::new(config.token_path()?);
    let stored_token = store.load()?;
    if options.check_only {
        return Ok(());
    }

    logging::init(&config.log_path()?, &config.log_level())?;
    info!(
        environment = environment.as_str(),
        %base_url,
        token_path = %store.path().display(),
        "starting coconut"
    );

    let session = Session::from_token(stored_token, OffsetDateTime::now_utc());
    let mut state = AppState {
        session,
        ..AppState::default()
    };
    if matches!(state.session, Session::Expired(_)) {
        info!("stored session token has expired");
        state.status_line = Some(SESSION_EXPIRED_MESSAGE.to_owned());
    }

    let mut runtime = ApiRuntime::new(client, store, environment, config.dashboard_url());
    coconut_tui::run_app(&mut state, &mut runtime)
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    print_config_path: bool,
    print_example: bool,
    local: bool,
    check_only: bool,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        print_config_path: false,
        print_example: false,
        local: false,
        check_only: false,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--local" => {
                options.local = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow::anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    Ok(options)
}

fn print_help() {
    println!("coconut - IPO subscription listings in the terminal");
    println!("  --config <path>          Use a specific config path");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-example-config   Print a config template");
    println!("  --local                  Talk to the local backend (localhost:8080)");
    println!("  --check                  Validate config + session file without starting the UI");
    println!("  --help                   Show this help");
}
