// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use coconut_api::{ApiError, Client, token_fingerprint};
use coconut_app::{
    AUTH_FAILURE_FALLBACK, FetchError, OfferingSource, SessionToken, normalize_offerings,
};
use coconut_testkit::{
    OfferingFaker, json_response, jwt_with_exp, paged_body, scenario_offering, start_mock_server,
};
use std::io::{self, Read};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[test]
fn unreachable_backend_is_a_transport_error() {
    let client = Client::new("http://127.0.0.1:1/api/v1", Duration::from_millis(200))
        .expect("client should initialize");

    let error = client
        .active_offerings(1)
        .expect_err("fetch should fail for unreachable endpoint");
    assert!(
        matches!(error, ApiError::Transport { .. } | ApiError::TimedOut { .. }),
        "unexpected error {error:?}"
    );
    assert!(error.to_string().contains("127.0.0.1:1"));
}

#[test]
fn active_offerings_sends_page_query_and_reads_paged_body() -> Result<()> {
    let (server, base_url) = start_mock_server()?;
    let items = OfferingFaker::new(11).offerings(3);
    let body = paged_body(&items, 5);

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        assert_eq!(request.url(), "/api/v1/ipo/active?page=2");
        request
            .respond(json_response(200, &body))
            .expect("response should succeed");
    });

    let client = Client::new(&base_url, Duration::from_secs(1))?;
    let page = client.active_offerings(2)?;
    handle.join().expect("server thread should join");

    assert_eq!(page.items, items);
    assert_eq!(page.total_pages, Some(5));
    Ok(())
}

#[test]
fn bare_array_body_is_accepted_without_page_count() -> Result<()> {
    let (server, base_url) = start_mock_server()?;
    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        let body = serde_json::to_string(&vec![scenario_offering(7)]).expect("serialize");
        request
            .respond(json_response(200, &body))
            .expect("response should succeed");
    });

    let client = Client::new(&base_url, Duration::from_secs(1))?;
    let page = client.fetch_active(1).expect("page");
    handle.join().expect("server thread should join");

    assert_eq!(page.total_pages, None);
    let views = normalize_offerings(&page.items);
    assert_eq!(views.len(), 1);
    assert_eq!(views[0].company_name, "(주)테스트기업");
    Ok(())
}

#[test]
fn server_error_maps_to_status_and_fetch_failure() -> Result<()> {
    let (server, base_url) = start_mock_server()?;
    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        request
            .respond(json_response(500, r#"{"message":"database unavailable"}"#))
            .expect("response should succeed");
    });

    let client = Client::new(&base_url, Duration::from_secs(1))?;
    let error = client
        .active_offerings(1)
        .expect_err("500 should be an error");
    handle.join().expect("server thread should join");

    assert_eq!(
        error,
        ApiError::Status {
            status: 500,
            message: "database unavailable".to_owned(),
        }
    );
    assert!(matches!(FetchError::from(error), FetchError::Transport(_)));
    Ok(())
}

#[test]
fn malformed_body_is_a_decode_error() -> Result<()> {
    let (server, base_url) = start_mock_server()?;
    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        request
            .respond(json_response(200, r#"{"unexpected":true}"#))
            .expect("response should succeed");
    });

    let client = Client::new(&base_url, Duration::from_secs(1))?;
    let error = client
        .active_offerings(1)
        .expect_err("unknown shape should fail");
    handle.join().expect("server thread should join");

    assert!(matches!(error, ApiError::Decode { .. }), "got {error:?}");
    Ok(())
}

#[test]
fn slow_backend_times_out() -> Result<()> {
    let (server, base_url) = start_mock_server()?;
    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        thread::sleep(Duration::from_millis(600));
        let _ = request.respond(json_response(200, "[]"));
    });

    let client = Client::new(&base_url, Duration::from_millis(100))?;
    let error = client
        .active_offerings(1)
        .expect_err("slow backend should time out");
    handle.join().expect("server thread should join");

    assert!(error.is_timeout(), "got {error:?}");
    assert_eq!(FetchError::from(error), FetchError::TimedOut);
    Ok(())
}

#[test]
fn authenticate_posts_credentials_and_returns_token() -> Result<()> {
    let (server, base_url) = start_mock_server()?;
    let jwt = jwt_with_exp("kim", 1_900_000_000);
    let reply = format!(r#"{{"token":"{jwt}"}}"#);

    let handle = thread::spawn(move || {
        let mut request = server.recv().expect("request expected");
        assert_eq!(request.url(), "/api/v1/authenticate");
        assert_eq!(request.method().as_str(), "POST");
        let mut body = String::new();
        request
            .as_reader()
            .read_to_string(&mut body)
            .expect("read body");
        request
            .respond(json_response(200, &reply))
            .expect("response should succeed");
        body
    });

    let client = Client::new(&base_url, Duration::from_secs(1))?;
    let token = client.authenticate("kim", "s3cret")?;
    let body = handle.join().expect("server thread should join");

    assert_eq!(token.as_str(), jwt);
    let sent: serde_json::Value = serde_json::from_str(&body)?;
    assert_eq!(sent, serde_json::json!({ "id": "kim", "password": "s3cret" }));
    Ok(())
}

#[test]
fn rejected_login_uses_server_message_or_fallback() -> Result<()> {
    let (server, base_url) = start_mock_server()?;
    let handle = thread::spawn(move || {
        let first = server.recv().expect("request expected");
        first
            .respond(json_response(401, r#"{"message":"잠긴 계정입니다."}"#))
            .expect("response should succeed");
        let second = server.recv().expect("request expected");
        second
            .respond(json_response(403, ""))
            .expect("response should succeed");
    });

    let client = Client::new(&base_url, Duration::from_secs(1))?;
    let first = client
        .authenticate("kim", "wrong")
        .expect_err("401 should be rejected");
    let second = client
        .authenticate("kim", "wrong")
        .expect_err("403 should be rejected");
    handle.join().expect("server thread should join");

    assert_eq!(first, ApiError::AuthFailure("잠긴 계정입니다.".to_owned()));
    assert_eq!(second, ApiError::AuthFailure(AUTH_FAILURE_FALLBACK.to_owned()));
    Ok(())
}

#[test]
fn current_user_sends_bearer_token() -> Result<()> {
    let (server, base_url) = start_mock_server()?;
    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        assert_eq!(request.url(), "/api/v1/users/me");
        let authorization = request
            .headers()
            .iter()
            .find(|header| header.field.equiv("Authorization"))
            .map(|header| header.value.as_str().to_owned());
        request
            .respond(json_response(200, r#"{"username":"김코코"}"#))
            .expect("response should succeed");
        authorization
    });

    let client = Client::new(&base_url, Duration::from_secs(1))?;
    let token = SessionToken::new("abc.def.ghi").expect("token");
    let user = client.current_user(&token)?;
    let authorization = handle.join().expect("server thread should join");

    assert_eq!(user.username, "김코코");
    assert_eq!(authorization.as_deref(), Some("Bearer abc.def.ghi"));
    Ok(())
}

#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn text(&self) -> String {
        let bytes = self.0.lock().expect("log buffer").clone();
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().expect("log buffer").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn request_logging_traces_calls_without_leaking_credentials() -> Result<()> {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();

    let (server, base_url) = start_mock_server()?;
    let handle = thread::spawn(move || {
        let me = server.recv().expect("request expected");
        me.respond(json_response(200, r#"{"username":"김코코"}"#))
            .expect("response should succeed");
        let login = server.recv().expect("request expected");
        login
            .respond(json_response(401, r#"{"message":"잠긴 계정입니다."}"#))
            .expect("response should succeed");
    });

    let token = SessionToken::new("raw-secret-token").expect("token");
    tracing::subscriber::with_default(subscriber, || -> Result<()> {
        let client = Client::new(&base_url, Duration::from_secs(1))?;
        client.current_user(&token)?;
        let _ = client.authenticate("kim", "hunter2-password");

        let unreachable = Client::new("http://127.0.0.1:1/api/v1", Duration::from_millis(200))?;
        let _ = unreachable.active_offerings(1);
        Ok(())
    })?;
    handle.join().expect("server thread should join");

    let output = logs.text();
    assert!(output.contains("sending request"), "{output}");
    assert!(output.contains("received response"), "{output}");
    assert!(output.contains("request error"), "{output}");
    assert!(output.contains(&token_fingerprint(&token)), "{output}");
    assert!(!output.contains("raw-secret-token"), "{output}");
    assert!(!output.contains("hunter2-password"), "{output}");
    Ok(())
}
