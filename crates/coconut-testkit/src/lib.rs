// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow};
use base64::Engine;
use coconut_app::{
    Authenticator, FetchError, LoginCredentials, LoginError, OfferingId, OfferingPage,
    OfferingSource, RawOffering, RawTimestamp, SessionToken, TokenStore,
};
use std::collections::VecDeque;
use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Mutex;
use time::{Date, Duration, Month, OffsetDateTime};
use tiny_http::{Header, Response, Server};

const COMPANY_STEMS: [&str; 14] = [
    "한빛", "새솔", "누리", "다온", "미르", "가온", "하람", "라온", "온새미", "푸름", "나래",
    "도담", "별하", "이룸",
];

const COMPANY_SUFFIXES: [&str; 8] = [
    "바이오",
    "테크",
    "로보틱스",
    "에너지",
    "소프트",
    "머티리얼즈",
    "헬스케어",
    "모빌리티",
];

const UNDERWRITERS: [&str; 8] = [
    "한국투자증권",
    "NH투자증권",
    "미래에셋증권",
    "KB증권",
    "삼성증권",
    "신한투자증권",
    "대신증권",
    "키움증권",
];

const CATEGORIES: [&str; 3] = ["코스닥시장", "유가증권시장", "코넥스시장"];

const REFERENCE_YEAR: i32 = 2024;

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }
}

/// Deterministic generator of plausible backend offering records.
#[derive(Debug, Clone)]
pub struct OfferingFaker {
    rng: DeterministicRng,
    next_id: i64,
}

impl OfferingFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
            next_id: 1,
        }
    }

    pub fn offering(&mut self) -> RawOffering {
        let id = OfferingId::new(self.next_id);
        self.next_id += 1;

        let start = reference_date() + Duration::days(self.int_range(0, 330));
        let end = start + Duration::days(self.int_range(1, 3));
        let refund = end + Duration::days(self.int_range(2, 5));

        RawOffering {
            category: Some(self.pick(&CATEGORIES).to_owned()),
            company_name: Some(format!(
                "(주){}{}",
                self.pick(&COMPANY_STEMS),
                self.pick(&COMPANY_SUFFIXES)
            )),
            lead_underwriter: Some(self.pick(&UNDERWRITERS).to_owned()),
            subscription_start_date: Some(iso_timestamp(start)),
            subscription_end_date: Some(iso_timestamp(end)),
            refund_date: Some(iso_timestamp(refund)),
            max_subscription_limit: Some(self.int_range(10, 500) * 100),
            final_offer_price: Some((self.int_range(20, 800) * 100) as f64),
            competition_rate: None,
            public_offering_volume: Some(self.int_range(100, 2_000) * 1_000),
            equal_distribution_volume: None,
            subscription_count: None,
            ..RawOffering::new(id)
        }
    }

    pub fn offerings(&mut self, count: usize) -> Vec<RawOffering> {
        (0..count).map(|_| self.offering()).collect()
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[self.rng.int_n(items.len())]
    }

    fn int_range(&mut self, min: i64, max: i64) -> i64 {
        if max <= min {
            return min;
        }
        let span = max - min + 1;
        min + (self.rng.next_u64() % (span as u64)) as i64
    }
}

/// The reference record used across normalization scenarios.
pub fn scenario_offering(id: i64) -> RawOffering {
    RawOffering {
        category: None,
        company_name: Some("(주)테스트기업".to_owned()),
        lead_underwriter: Some("한국투자증권".to_owned()),
        subscription_start_date: Some("2024-01-07".into()),
        subscription_end_date: Some("2024-01-08".into()),
        refund_date: Some("2024-01-12".into()),
        max_subscription_limit: Some(42_000),
        final_offer_price: Some(5_000.0),
        ..RawOffering::new(OfferingId::new(id))
    }
}

/// An `OfferingSource` that replays scripted results and records every
/// page it was asked for.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    script: Mutex<VecDeque<Result<OfferingPage, FetchError>>>,
    requests: Mutex<Vec<u32>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_page(&self, page: OfferingPage) -> &Self {
        self.push(Ok(page))
    }

    pub fn push_error(&self, error: FetchError) -> &Self {
        self.push(Err(error))
    }

    pub fn requested_pages(&self) -> Vec<u32> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    fn push(&self, result: Result<OfferingPage, FetchError>) -> &Self {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(result);
        }
        self
    }
}

impl OfferingSource for ScriptedSource {
    fn fetch_active(&self, page: u32) -> Result<OfferingPage, FetchError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(page);
        }
        self.script
            .lock()
            .map_err(|_| FetchError::Transport("scripted source poisoned".to_owned()))?
            .pop_front()
            .unwrap_or_else(|| Ok(OfferingPage::default()))
    }
}

/// An `Authenticator` with canned answers. Without a scripted result every
/// login succeeds with `issued-token`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedAuthenticator {
    pub result: Option<Result<SessionToken, LoginError>>,
    pub username: Option<String>,
}

impl ScriptedAuthenticator {
    pub fn with_username(username: &str) -> Self {
        Self {
            result: None,
            username: Some(username.to_owned()),
        }
    }

    pub fn rejecting(message: &str) -> Self {
        Self {
            result: Some(Err(LoginError::Rejected(message.to_owned()))),
            username: None,
        }
    }
}

impl Authenticator for ScriptedAuthenticator {
    fn authenticate(&self, _credentials: &LoginCredentials) -> Result<SessionToken, LoginError> {
        match &self.result {
            Some(result) => result.clone(),
            None => SessionToken::new("issued-token")
                .ok_or_else(|| LoginError::Transport("blank token".to_owned())),
        }
    }

    fn current_username(&self, _token: &SessionToken) -> Result<String, LoginError> {
        self.username
            .clone()
            .ok_or_else(|| LoginError::Transport("no user".to_owned()))
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStore {
    token: Option<SessionToken>,
    saves: usize,
}

impl MemoryTokenStore {
    pub fn with_token(token: SessionToken) -> Self {
        Self {
            token: Some(token),
            saves: 0,
        }
    }

    pub fn token(&self) -> Option<&SessionToken> {
        self.token.as_ref()
    }

    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<SessionToken>> {
        Ok(self.token.clone())
    }

    fn save(&mut self, token: &SessionToken) -> Result<()> {
        self.token = Some(token.clone());
        self.saves += 1;
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.token = None;
        Ok(())
    }
}

/// An unsigned JWT whose payload carries `sub` and `exp`.
pub fn jwt_with_exp(subject: &str, exp: i64) -> String {
    let engine = base64::engine::general_purpose::URL_SAFE_NO_PAD;
    let header = engine.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = engine.encode(serde_json::json!({ "sub": subject, "exp": exp }).to_string());
    format!("{header}.{payload}.signature")
}

pub fn fixture_now() -> OffsetDateTime {
    reference_date().midnight().assume_utc()
}

pub fn temp_token_path() -> Result<(tempfile::TempDir, PathBuf)> {
    let dir = tempfile::tempdir().context("create temp dir")?;
    let path = dir.path().join("session.token");
    Ok((dir, path))
}

pub fn start_mock_server() -> Result<(Server, String)> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let base_url = format!("http://{}/api/v1", server.server_addr());
    Ok((server, base_url))
}

pub fn json_response(status: u16, body: &str) -> Response<Cursor<Vec<u8>>> {
    Response::from_string(body)
        .with_status_code(status)
        .with_header(
            Header::from_bytes("Content-Type", "application/json")
                .expect("valid content type header"),
        )
}

/// Serializes records the way the paged endpoint answers.
pub fn paged_body(items: &[RawOffering], total_pages: u32) -> String {
    serde_json::json!({ "items": items, "totalPages": total_pages }).to_string()
}

fn reference_date() -> Date {
    Date::from_calendar_date(REFERENCE_YEAR, Month::January, 1).expect("valid calendar date")
}

fn iso_timestamp(date: Date) -> RawTimestamp {
    RawTimestamp::Text(format!("{date}T00:00:00"))
}
