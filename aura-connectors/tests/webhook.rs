//! Webhook delivery against a local one-shot HTTP server

#![cfg(feature = "http")]

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use aura_connectors::{AsyncConnector, HttpError, NotificationSink, WebhookConfig, WebhookConnector, WebhookNotifier};
use serde_json::json;

fn serve(responses: Vec<&'static str>) -> (String, mpsc::Receiver<String>) {
    serve_after(Duration::ZERO, responses)
}

/// Serve `responses.len()` requests, answering each with the next status line
/// once `delay` has passed. Every request (head and body) is forwarded on the
/// returned channel.
fn serve_after(delay: Duration, responses: Vec<&'static str>) -> (String, mpsc::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}/hook", listener.local_addr().unwrap());
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        for status in responses {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];
            // read the head, then as much body as Content-Length announces
            loop {
                let n = stream.read(&mut chunk).unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
                let text = String::from_utf8_lossy(&buf).to_string();
                if let Some(head_end) = text.find("\r\n\r\n") {
                    let length = text[..head_end]
                        .lines()
                        .find_map(|l| {
                            let (name, value) = l.split_once(':')?;
                            name.eq_ignore_ascii_case("content-length").then(|| value.trim().parse::<usize>().ok())?
                        })
                        .unwrap_or(0);
                    if buf.len() >= head_end + 4 + length {
                        break;
                    }
                }
            }
            tx.send(String::from_utf8_lossy(&buf).to_string()).unwrap();
            thread::sleep(delay);
            let response = format!("HTTP/1.1 {}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n", status);
            stream.write_all(response.as_bytes()).unwrap();
        }
    });

    (url, rx)
}

fn config(url: &str) -> WebhookConfig {
    WebhookConfig::new(url)
        .backoff_base(Duration::from_millis(1))
        .timeout_secs(5)
}

#[tokio::test]
async fn delivers_json_with_auth() {
    let (url, requests) = serve(vec!["204 No Content"]);
    let connector = WebhookConnector::new(config(&url).bearer_token("secret")).unwrap();

    connector.deliver(&json!({"entity_id": "WK-7822"})).await.unwrap();

    let request = requests.recv().unwrap();
    assert!(request.starts_with("POST /hook"));
    assert!(request.contains("Authorization: Bearer secret"));
    assert!(request.ends_with(r#"{"entity_id":"WK-7822"}"#));
    let stats = connector.stats();
    assert_eq!(stats.messages_sent, 1);
    assert_eq!(stats.retries, 0);
}

#[tokio::test]
async fn retries_server_errors() {
    let (url, requests) = serve(vec!["503 Service Unavailable", "200 OK"]);
    let connector = WebhookConnector::new(config(&url).max_retries(2)).unwrap();

    connector.deliver(&json!({"n": 1})).await.unwrap();

    assert_eq!(requests.iter().take(2).count(), 2);
    let stats = connector.stats();
    assert_eq!(stats.messages_sent, 1);
    assert_eq!(stats.retries, 1);
    assert_eq!(stats.messages_failed, 0);
}

#[tokio::test]
async fn client_errors_are_not_retried() {
    let (url, _requests) = serve(vec!["400 Bad Request"]);
    let connector = WebhookConnector::new(config(&url).max_retries(3)).unwrap();

    let err = connector.deliver(&json!({})).await.unwrap_err();

    assert!(matches!(err, HttpError::ServerError { status: 400, .. }));
    let stats = connector.stats();
    assert_eq!(stats.retries, 0);
    assert_eq!(stats.messages_failed, 1);
    assert!(stats.last_error.unwrap().contains("400"));
}

#[tokio::test]
async fn notifier_delivers_in_background() {
    let (url, requests) = serve(vec!["200 OK"]);
    let notifier = WebhookNotifier::new(config(&url)).unwrap();

    notifier.notify(&json!({"kind": "machine"}));

    let request = tokio::task::spawn_blocking(move || requests.recv_timeout(Duration::from_secs(5)))
        .await
        .unwrap()
        .unwrap();
    assert!(request.ends_with(r#"{"kind":"machine"}"#));
}

#[tokio::test]
async fn slow_endpoint_leaves_runtime_free() {
    let (url, _requests) = serve_after(Duration::from_millis(300), vec!["200 OK"]);
    let connector = WebhookConnector::new(config(&url)).unwrap();

    // single-threaded runtime: the ticker only runs while delivery yields
    let ticker = tokio::spawn(async {
        for _ in 0..5 {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    });

    connector.deliver(&json!({"kind": "worker"})).await.unwrap();
    assert!(ticker.is_finished());
    assert_eq!(connector.stats().messages_sent, 1);
}
