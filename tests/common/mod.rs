//! Shared helpers: a real server on an ephemeral port and a tiny HTTP/1 client.

use std::net::SocketAddr;

use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use http_body_util::{BodyExt, Empty};
use hyper::client::conn::http1::SendRequest;
use hyper_util::rt::TokioIo;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// A running instance of the app.
pub struct TestApp {
    pub addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    server: JoinHandle<Result<(), hola::Error>>,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let server = hola::Server::from_listener(listener);
        let addr = server.local_addr().unwrap();

        let (tx, rx) = oneshot::channel();
        let server = tokio::spawn(server.serve_with_shutdown(hola::app(), async {
            let _ = rx.await;
        }));

        Self { addr, shutdown: Some(tx), server }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.request("GET", uri).await
    }

    /// One request on a fresh connection.
    pub async fn request(&self, method: &str, uri: &str) -> TestResponse {
        let mut sender = self.connect().await;
        self.send(&mut sender, method, uri).await
    }

    /// Opens a keep-alive HTTP/1 connection that stays open for as long as
    /// the returned sender lives.
    pub async fn connect(&self) -> SendRequest<Empty<Bytes>> {
        let stream = TcpStream::connect(self.addr).await.unwrap();
        let (sender, conn) = hyper::client::conn::http1::handshake(TokioIo::new(stream))
            .await
            .unwrap();
        tokio::spawn(conn);
        sender
    }

    /// Sends one request over an existing connection.
    pub async fn send(
        &self,
        sender: &mut SendRequest<Empty<Bytes>>,
        method: &str,
        uri: &str,
    ) -> TestResponse {
        let req = http::Request::builder()
            .method(method)
            .uri(uri)
            .header("host", self.addr.to_string())
            .body(Empty::<Bytes>::new())
            .unwrap();
        let res = sender.send_request(req).await.unwrap();

        let status = res.status();
        let headers = res.headers().clone();
        let body = res.into_body().collect().await.unwrap().to_bytes();
        TestResponse {
            status,
            headers,
            body: String::from_utf8(body.to_vec()).unwrap(),
        }
    }

    /// Signals shutdown and waits for the server to drain and return.
    pub async fn stop(mut self) -> Result<(), hola::Error> {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        (&mut self.server).await.unwrap()
    }
}

pub const SECURITY_HEADERS: [(&str, &str); 9] = [
    ("content-security-policy", "default-src 'self'; frame-ancestors 'none'; form-action 'self'"),
    ("x-frame-options", "DENY"),
    ("x-content-type-options", "nosniff"),
    ("cross-origin-resource-policy", "same-origin"),
    ("permissions-policy", "geolocation=(), microphone=(), camera=()"),
    ("cache-control", "no-store, no-cache, must-revalidate, private"),
    ("pragma", "no-cache"),
    ("expires", "0"),
    ("server", "WebServer"),
];

pub fn assert_security_headers(headers: &HeaderMap) {
    for (name, value) in SECURITY_HEADERS {
        let all: Vec<_> = headers.get_all(name).iter().collect();
        assert_eq!(all.len(), 1, "expected exactly one `{name}` header");
        assert_eq!(all[0], value, "header `{name}`");
    }
}
