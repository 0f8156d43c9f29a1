use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use subrelay::utils::http::{fetch_subscription, FetchError};

/// Serves one canned response per accepted connection and reports the raw
/// bytes each connection sent.
fn spawn_stub(responses: Vec<String>) -> (String, mpsc::Receiver<Vec<u8>>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub listener");
    let addr = listener.local_addr().expect("stub addr");
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        for response in responses {
            let Ok((mut stream, _)) = listener.accept() else {
                return;
            };
            // A TLS client will send a binary hello and wait, so reads are
            // bounded instead of running to EOF.
            let _ = stream.set_read_timeout(Some(Duration::from_millis(300)));

            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                match stream.read(&mut buf) {
                    Ok(0) => break,
                    Ok(n) => {
                        request.extend_from_slice(&buf[..n]);
                        if request.windows(4).any(|w| w == b"\r\n\r\n") {
                            break;
                        }
                    }
                    Err(_) => break,
                }
            }
            let _ = tx.send(request);
            let _ = stream.write_all(response.as_bytes());
        }
    });

    (format!("127.0.0.1:{}", addr.port()), rx)
}

fn ok_response(body: &str, user_info: Option<&str>) -> String {
    let mut headers = String::new();
    if let Some(info) = user_info {
        headers.push_str(&format!("Subscription-Userinfo: {}\r\n", info));
    }
    format!(
        "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\n{}Content-Length: {}\r\nConnection: close\r\n\r\n{}",
        headers,
        body.len(),
        body
    )
}

fn status_response(status_line: &str) -> String {
    format!(
        "HTTP/1.1 {}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        status_line
    )
}

#[actix_web::test]
async fn fetch_returns_body_and_userinfo() {
    let body = "vless://u@example.com:443#A\n";
    let info = "upload=1; download=2; total=3; expire=4";
    let (addr, rx) = spawn_stub(vec![ok_response(body, Some(info))]);

    let url = format!("http://{}/sub", addr);
    let (fetched, user_info) = fetch_subscription(&url).await.expect("fetch should succeed");

    assert_eq!(fetched, body);
    assert_eq!(user_info.as_deref(), Some(info));

    let request = rx
        .recv_timeout(Duration::from_secs(5))
        .expect("stub saw the request");
    let request = String::from_utf8_lossy(&request).to_ascii_lowercase();
    assert!(request.starts_with("get /sub http/1.1"));
    assert!(request.contains("user-agent: mozilla/5.0"));
}

#[actix_web::test]
async fn fetch_without_userinfo_header() {
    let (addr, _rx) = spawn_stub(vec![ok_response("payload", None)]);

    let url = format!("http://{}/", addr);
    let (fetched, user_info) = fetch_subscription(&url).await.expect("fetch should succeed");

    assert_eq!(fetched, "payload");
    assert!(user_info.is_none());
}

#[actix_web::test]
async fn fetch_does_not_retry_ordinary_errors() {
    let (addr, rx) = spawn_stub(vec![status_response("404 Not Found")]);

    let url = format!("http://{}/sub", addr);
    let err = fetch_subscription(&url).await.expect_err("fetch must fail");
    match err {
        FetchError::Status(status) => assert_eq!(status.as_u16(), 404),
        other => panic!("unexpected error: {:?}", other),
    }

    // exactly one request reached the stub
    assert!(rx.recv_timeout(Duration::from_secs(5)).is_ok());
    assert!(rx.recv_timeout(Duration::from_millis(300)).is_err());
}

#[actix_web::test]
async fn fetch_retries_once_over_https_after_plain_http_400() {
    // Both connections are answered in plain HTTP. The second one carries
    // the https retry, whose handshake then fails against a plaintext
    // server; the test only cares that exactly one retry arrives.
    let (addr, rx) = spawn_stub(vec![
        status_response("400 Bad Request"),
        status_response("400 Bad Request"),
    ]);

    let url = format!("http://{}/sub", addr);
    let result = fetch_subscription(&url).await;
    assert!(result.is_err());

    let first = rx
        .recv_timeout(Duration::from_secs(5))
        .expect("initial request");
    assert!(first.starts_with(b"GET /sub HTTP/1.1"));

    let second = rx
        .recv_timeout(Duration::from_secs(10))
        .expect("https retry must open a second connection");
    // a TLS hello, not a plaintext request line
    assert!(!second.starts_with(b"GET "));

    // and no third attempt
    assert!(rx.recv_timeout(Duration::from_millis(300)).is_err());
}
