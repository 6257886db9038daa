// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, anyhow};
use ledgerdesk_api::Client;
use ledgerdesk_app::{AmlCase, CaseStatus, FetchError, ScreenKind, ScreenRows};
use ledgerdesk_testkit::{PracticeFaker, rows_json};
use std::io::Read;
use std::thread;
use std::time::Duration;
use tiny_http::{Header, Method, Response, Server};

fn json_response(body: String, status: u16) -> Response<std::io::Cursor<Vec<u8>>> {
    Response::from_string(body)
        .with_status_code(status)
        .with_header(
            Header::from_bytes("Content-Type", "application/json")
                .expect("valid content type header"),
        )
}

fn serve_once(
    expected_url: &'static str,
    body: String,
    status: u16,
) -> Result<(String, thread::JoinHandle<()>)> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}", server.server_addr());
    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        assert_eq!(request.url(), expected_url);
        request
            .respond(json_response(body, status))
            .expect("response should succeed");
    });
    Ok((addr, handle))
}

#[test]
fn unreachable_api_reports_the_url() {
    let client = Client::new("http://127.0.0.1:1", Duration::from_millis(200))
        .expect("client should initialize");

    let error = client
        .fetch_screen(ScreenKind::AmlCases)
        .expect_err("fetch should fail for unreachable endpoint");
    match error {
        FetchError::Unreachable { url, .. } | FetchError::Timeout { url, .. } => {
            assert_eq!(url, "http://127.0.0.1:1/api/aml/cases");
        }
        other => panic!("expected transport failure, got {other:?}"),
    }
}

#[test]
fn fetch_screen_decodes_bare_array() -> Result<()> {
    let rows = PracticeFaker::new(7).rows(ScreenKind::AmlCases, 3);
    let (addr, handle) = serve_once("/api/aml/cases", rows_json(&rows)?, 200)?;

    let client = Client::new(&addr, Duration::from_secs(2))?;
    let fetched = client.fetch_screen(ScreenKind::AmlCases)?;
    assert_eq!(fetched, rows);

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn fetch_screen_decodes_data_envelope() -> Result<()> {
    let rows = PracticeFaker::new(8).rows(ScreenKind::Invoices, 2);
    let body = format!(r#"{{"data":{}}}"#, rows_json(&rows)?);
    let (addr, handle) = serve_once("/api/billing/invoices", body, 200)?;

    let client = Client::new(&addr, Duration::from_secs(2))?;
    assert_eq!(client.fetch_screen(ScreenKind::Invoices)?, rows);

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn empty_list_is_a_successful_fetch() -> Result<()> {
    let (addr, handle) = serve_once("/api/practice/tasks", "[]".to_owned(), 200)?;

    let client = Client::new(&addr, Duration::from_secs(2))?;
    let fetched = client.fetch_screen(ScreenKind::Tasks)?;
    assert_eq!(fetched, ScreenRows::Tasks(Vec::new()));

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn unknown_status_values_do_not_fail_the_fetch() -> Result<()> {
    let body = r#"[{
        "id": 1,
        "reference": "AML-0001",
        "clientName": "Harbour Lane Ltd",
        "caseType": "onboarding",
        "status": "sanctions_hold",
        "risk": "high",
        "openedOn": "2026-01-02"
    }]"#;
    let (addr, handle) = serve_once("/api/aml/cases", body.to_owned(), 200)?;

    let client = Client::new(&addr, Duration::from_secs(2))?;
    let endpoint = client.endpoint(ScreenKind::AmlCases);
    let cases: Vec<AmlCase> = client.fetch_list(&endpoint)?;
    assert_eq!(cases[0].status, CaseStatus::Unknown);

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn error_envelope_becomes_status_error() -> Result<()> {
    let body = r#"{"error":{"message":"maintenance window"}}"#.to_owned();
    let (addr, handle) = serve_once("/api/crm/clients", body, 503)?;

    let client = Client::new(&addr, Duration::from_secs(2))?;
    let error = client
        .fetch_screen(ScreenKind::Clients)
        .expect_err("503 should fail");
    assert_eq!(
        error,
        FetchError::Status {
            status: 503,
            message: "maintenance window".to_owned(),
        }
    );

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn malformed_body_is_a_decode_error() -> Result<()> {
    let (addr, handle) = serve_once(
        "/api/branding/templates",
        r#"{"templates":[]}"#.to_owned(),
        200,
    )?;

    let client = Client::new(&addr, Duration::from_secs(2))?;
    let error = client
        .fetch_screen(ScreenKind::Templates)
        .expect_err("unexpected shape should fail");
    match error {
        FetchError::Decode { url, .. } => assert!(url.ends_with("/api/branding/templates")),
        other => panic!("expected decode failure, got {other:?}"),
    }

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn quality_reviews_are_fetched_with_post_search() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}", server.server_addr());

    let handle = thread::spawn(move || {
        let mut request = server.recv().expect("request expected");
        assert_eq!(request.method(), &Method::Post);
        assert_eq!(request.url(), "/api/quality/reviews/search");
        let mut body = String::new();
        request
            .as_reader()
            .read_to_string(&mut body)
            .expect("read request body");
        assert_eq!(body, "{}");
        request
            .respond(json_response("[]".to_owned(), 200))
            .expect("response should succeed");
    });

    let client = Client::new(&addr, Duration::from_secs(2))?;
    assert!(client.fetch_screen(ScreenKind::QualityReviews)?.is_empty());

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn slow_server_times_out() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}", server.server_addr());

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        thread::sleep(Duration::from_millis(500));
        // The client has already given up; a failed write is expected.
        let _ = request.respond(json_response("[]".to_owned(), 200));
    });

    let client = Client::new(&addr, Duration::from_millis(100))?;
    let error = client
        .fetch_screen(ScreenKind::Clients)
        .expect_err("slow response should time out");
    match error {
        FetchError::Timeout { after, .. } => assert_eq!(after, Duration::from_millis(100)),
        other => panic!("expected timeout, got {other:?}"),
    }

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn path_override_is_used_for_requests() -> Result<()> {
    let (addr, handle) = serve_once("/v2/tasks", "[]".to_owned(), 200)?;

    let client =
        Client::new(&addr, Duration::from_secs(2))?.with_path(ScreenKind::Tasks, "/v2/tasks")?;
    assert!(client.fetch_screen(ScreenKind::Tasks)?.is_empty());

    handle.join().expect("server thread should join");
    Ok(())
}
