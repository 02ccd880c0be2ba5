//! Tests for the reqwest-backed HTTP client against a local mock server.

mod common;

use common::wait_until;
use mockito::Matcher;
use relaylog::console::CaptureConsole;
use relaylog::internal::Diagnostics;
use relaylog::net::{HttpClient, HttpError, HttpMethod, HttpRequest, ReqwestClient};
use serde_json::json;
use std::collections::BTreeMap;
use std::net::TcpListener;
use std::sync::Arc;

fn client(console: &CaptureConsole) -> ReqwestClient {
    ReqwestClient::new(Diagnostics::new(Arc::new(console.clone())).colors(false)).unwrap()
}

#[test]
fn send_posts_json_with_headers() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/ingest")
        .match_header("content-type", "application/json")
        .match_header("authorization", "Bearer t")
        .match_body(Matcher::Json(json!({"log": {"message": "hello"}})))
        .with_status(202)
        .expect(1)
        .create();

    let console = CaptureConsole::new();
    let request = HttpRequest::post_json(
        format!("{}/ingest", server.url()),
        json!({"log": {"message": "hello"}}),
    )
    .headers(&BTreeMap::from([(
        "authorization".to_string(),
        "Bearer t".to_string(),
    )]));
    client(&console).send(request).unwrap();

    assert!(wait_until(|| mock.matched()));
    mock.assert();
    assert!(console.lines().is_empty());
}

#[test]
fn send_delivers_a_burst_in_order() {
    let mut server = mockito::Server::new();
    let mock = server.mock("POST", "/burst").expect(50).create();

    let console = CaptureConsole::new();
    let client = client(&console);
    for n in 0..50 {
        client
            .send(HttpRequest::post_json(
                format!("{}/burst", server.url()),
                json!({"n": n}),
            ))
            .unwrap();
    }

    assert!(wait_until(|| mock.matched()));
    mock.assert();
}

#[test]
fn send_warns_on_error_status() {
    let mut server = mockito::Server::new();
    let _mock = server.mock("POST", "/down").with_status(500).create();

    let console = CaptureConsole::new();
    client(&console)
        .send(HttpRequest::post_json(
            format!("{}/down", server.url()),
            json!({}),
        ))
        .unwrap();

    assert!(wait_until(|| console.contains("returned status 500")));
}

#[test]
fn probe_returns_status() {
    let mut server = mockito::Server::new();
    let mock = server.mock("GET", "/health").with_status(204).create();

    let console = CaptureConsole::new();
    let status = client(&console)
        .probe(HttpRequest::new(
            HttpMethod::Get,
            format!("{}/health", server.url()),
        ))
        .unwrap();

    assert_eq!(status, 204);
    mock.assert();
}

#[test]
fn probe_unreachable_host_is_error() {
    let port = TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();

    let console = CaptureConsole::new();
    let result = client(&console).probe(HttpRequest::new(
        HttpMethod::Get,
        format!("http://127.0.0.1:{port}/health"),
    ));

    assert!(matches!(result, Err(HttpError::Request(_))));
}
