// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use coconut_api::Client;
use coconut_app::{
    Environment, FallbackPolicy, FetchError, FetchTicket, LoginCredentials, LoginError,
    MonitoringPanel, OfferingPage, OfferingSource, SessionToken, SignIn, TokenStore, sign_in,
};
use coconut_tui::InternalEvent;
use std::sync::mpsc::Sender;
use std::thread;
use tracing::{info, warn};

pub struct ApiRuntime<S: TokenStore> {
    client: Client,
    store: S,
    environment: Environment,
    dashboard_url: String,
}

impl<S: TokenStore> ApiRuntime<S> {
    pub fn new(
        client: Client,
        store: S,
        environment: Environment,
        dashboard_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            store,
            environment,
            dashboard_url: dashboard_url.into(),
        }
    }

    #[cfg(test)]
    fn store(&self) -> &S {
        &self.store
    }
}

impl<S: TokenStore> coconut_tui::AppRuntime for ApiRuntime<S> {
    fn fetch_offerings(&mut self, page: u32) -> Result<OfferingPage, FetchError> {
        self.client.fetch_active(page)
    }

    fn spawn_fetch(&mut self, ticket: FetchTicket, tx: Sender<InternalEvent>) -> Result<()> {
        let client = self.client.clone();
        thread::Builder::new()
            .name(format!("coconut-fetch-{}", ticket.epoch()))
            .spawn(move || {
                let result = client.fetch_active(ticket.page());
                if tx.send(InternalEvent::Fetched { ticket, result }).is_err() {
                    warn!(page = ticket.page(), "listing closed before fetch finished");
                }
            })
            .context("spawn fetch worker")?;
        Ok(())
    }

    fn sign_in(&mut self, credentials: &LoginCredentials) -> Result<SignIn, LoginError> {
        sign_in(&self.client, credentials)
    }

    fn spawn_sign_in(
        &mut self,
        attempt: u64,
        credentials: LoginCredentials,
        tx: Sender<InternalEvent>,
    ) -> Result<()> {
        let client = self.client.clone();
        thread::Builder::new()
            .name(format!("coconut-login-{attempt}"))
            .spawn(move || {
                let result = sign_in(&client, &credentials);
                if result.is_ok() {
                    info!(user = %credentials.id, "authenticated");
                }
                if tx.send(InternalEvent::LoggedIn { attempt, result }).is_err() {
                    warn!(attempt, "ui closed before login finished");
                }
            })
            .context("spawn login worker")?;
        Ok(())
    }

    fn store_token(&mut self, token: &SessionToken) -> Result<()> {
        self.store.save(token)
    }

    fn clear_token(&mut self) -> Result<()> {
        self.store.clear()
    }

    fn oauth_url(&self) -> String {
        self.environment.oauth_authorize_url().to_owned()
    }

    fn monitoring_panel(&self) -> MonitoringPanel {
        MonitoringPanel::new(self.dashboard_url.clone())
    }

    fn fallback_policy(&self) -> FallbackPolicy {
        self.environment.fallback_policy()
    }
}
