use std::time::Duration;

use mockito::{Matcher, Server};
use openlist::{client::RequestOptions, Client, ErrorKind};
use serde_json::{json, Value};
use tokio::net::TcpListener;

fn client(url: &str) -> Client {
    Client::new(url, Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn status_classification() {
    let mut server = Server::new_async().await;
    let client = client(&server.url());

    let cases = [
        (400, ErrorKind::Validation),
        (401, ErrorKind::Authentication),
        (403, ErrorKind::Authorization),
        (404, ErrorKind::NotFound),
        (500, ErrorKind::Server),
        (502, ErrorKind::Server),
        (503, ErrorKind::Server),
        (409, ErrorKind::GenericApi),
    ];

    for (status, kind) in cases {
        let path = format!("/status/{status}");
        let mock = server
            .mock("GET", path.as_str())
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(json!({ "code": status, "message": format!("failed with {status}"), "data": null }).to_string())
            .create_async()
            .await;

        let err = client.get(&path, RequestOptions::new()).await.unwrap_err();

        assert_eq!(err.kind(), kind, "status {status}");
        assert_eq!(err.status_code(), Some(status as u16));
        assert_eq!(err.message(), format!("failed with {status}"));
        assert_eq!(err.raw_response().unwrap().status.as_u16(), status as u16);

        mock.assert_async().await;
    }
}

#[tokio::test]
async fn error_without_message_uses_status_text() {
    let mut server = Server::new_async().await;
    let client = client(&server.url());

    server
        .mock("GET", "/gateway")
        .with_status(502)
        .with_body("<html>Bad Gateway</html>")
        .create_async()
        .await;

    let err = client.get("/gateway", RequestOptions::new()).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Server);
    assert!(err.message().contains("502"), "{}", err.message());
    assert_eq!(err.raw_response().unwrap().text(), "<html>Bad Gateway</html>");
}

#[tokio::test]
async fn success_body_is_returned_unmodified() {
    let mut server = Server::new_async().await;
    let client = client(&server.url());

    let body = json!({
        "code": 500,
        "message": "the envelope code is not interpreted",
        "data": { "nested": [1, 2, { "x": null }], "unicode": "文件" }
    });

    for status in [200, 201] {
        let path = format!("/ok/{status}");
        server
            .mock("GET", path.as_str())
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create_async()
            .await;

        let value = client.get(&path, RequestOptions::new()).await.unwrap();
        assert_eq!(value, body);
    }
}

#[tokio::test]
async fn non_json_success_is_a_protocol_error() {
    let mut server = Server::new_async().await;
    let client = client(&server.url());

    server
        .mock("GET", "/html")
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body("<html></html>")
        .create_async()
        .await;

    let err = client.get("/html", RequestOptions::new()).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Protocol);
    assert_eq!(err.status_code(), Some(200));
    assert!(err.message().starts_with("invalid JSON in response body"));
}

#[tokio::test]
async fn credential_is_sent_verbatim() {
    let mut server = Server::new_async().await;
    let client = client(&server.url());

    let anonymous = server
        .mock("GET", "/api/me")
        .match_header("authorization", Matcher::Missing)
        .match_header("content-type", "application/json")
        .with_body(r#"{"code":200,"message":"success","data":null}"#)
        .create_async()
        .await;

    client.get("/api/me", RequestOptions::new()).await.unwrap();
    anonymous.assert_async().await;

    let token = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.e30.abc";
    client.set_credential(token);

    let authenticated = server
        .mock("GET", "/api/me")
        .match_header("authorization", token)
        .with_body(r#"{"code":200,"message":"success","data":null}"#)
        .create_async()
        .await;

    client.get("/api/me", RequestOptions::new()).await.unwrap();
    authenticated.assert_async().await;
}

#[tokio::test]
async fn echo_round_trip() {
    let mut server = Server::new_async().await;
    let client = client(&server.url());

    server
        .mock("POST", "/api/fs/mkdir")
        .match_body(Matcher::Json(json!({ "path": "/x" })))
        .with_body_from_request(|req| req.body().unwrap().clone())
        .create_async()
        .await;

    let sent = json!({ "path": "/x" });
    let received = client
        .post("/api/fs/mkdir", RequestOptions::new().json(&sent).unwrap())
        .await
        .unwrap();

    assert_eq!(received, sent);
}

#[tokio::test]
async fn query_parameters_are_strings() {
    let mut server = Server::new_async().await;
    let client = client(&server.url());

    let mock = server
        .mock("POST", "/api/admin/user/delete")
        .match_query(Matcher::UrlEncoded("id".into(), "42".into()))
        .with_body(r#"{"code":200,"message":"success","data":null}"#)
        .create_async()
        .await;

    client
        .post("/api/admin/user/delete", RequestOptions::new().query("id", 42))
        .await
        .unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn ping_is_idempotent() {
    let mut server = Server::new_async().await;
    let client = client(&server.url());

    let mock = server
        .mock("GET", "/ping")
        .with_body(r#""pong""#)
        .expect(2)
        .create_async()
        .await;

    let first: Value = client.get("/ping", RequestOptions::new()).await.unwrap();
    let second: Value = client.get("/ping", RequestOptions::new()).await.unwrap();

    assert_eq!(first, second);
    mock.assert_async().await;
}

#[tokio::test]
async fn timeout_is_a_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    // Accept connections, never answer.
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    let client = Client::new(format!("http://{addr}"), Duration::from_millis(200)).unwrap();
    let err = client.get("/ping", RequestOptions::new()).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Network);
    assert_eq!(err.status(), None);
    assert!(err.message().starts_with("request timed out"), "{}", err.message());
}

#[tokio::test]
async fn refused_connection_is_a_network_error() {
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };

    let client = Client::new(format!("http://{addr}"), Duration::from_secs(5)).unwrap();
    let err = client.get("/ping", RequestOptions::new()).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Network);
    assert_eq!(err.status(), None);
    assert!(err.raw_response().is_none());
}

#[tokio::test]
async fn clones_share_the_credential() {
    let mut server = Server::new_async().await;
    let a = client(&server.url());
    let b = a.clone();

    a.set_credential("shared");

    let mock = server
        .mock("GET", "/api/me")
        .match_header("authorization", "shared")
        .with_body(r#"{"code":200,"message":"success","data":null}"#)
        .create_async()
        .await;

    b.get("/api/me", RequestOptions::new()).await.unwrap();
    mock.assert_async().await;
}
