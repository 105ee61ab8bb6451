//! Minimal Alpaca server for exercising the client over real HTTP.

use axum::Router;
use axum::body::Body;
use axum::extract::Request;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use std::net::{Ipv4Addr, SocketAddr, TcpListener};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;

/// A request as seen by the mock server.
#[derive(Debug, Clone)]
pub(crate) struct RecordedRequest {
    pub(crate) method: String,
    pub(crate) path: String,
    pub(crate) query: String,
    pub(crate) body: String,
    pub(crate) headers: HeaderMap,
}

impl RecordedRequest {
    /// Arguments sent in the query string (`GET`) or the form body (`PUT`).
    pub(crate) fn params(&self) -> Vec<(String, String)> {
        let encoded = if self.method == "GET" {
            &self.query
        } else {
            &self.body
        };
        encoded
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
                (form_decode(name), form_decode(value))
            })
            .collect()
    }

    /// Value of an argument, matching the name case-insensitively like Alpaca servers do.
    pub(crate) fn param(&self, name: &str) -> Option<String> {
        self.params()
            .into_iter()
            .find(|(param_name, _)| param_name.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    }
}

fn form_decode(encoded: &str) -> String {
    let mut bytes = encoded.bytes();
    let mut decoded = Vec::with_capacity(encoded.len());
    while let Some(byte) = bytes.next() {
        decoded.push(match byte {
            b'+' => b' ',
            b'%' => {
                let hex = [bytes.next().unwrap_or(b'0'), bytes.next().unwrap_or(b'0')];
                std::str::from_utf8(&hex)
                    .ok()
                    .and_then(|hex| u8::from_str_radix(hex, 16).ok())
                    .expect("invalid percent-encoding")
            }
            other => other,
        });
    }
    String::from_utf8(decoded).expect("invalid UTF-8 in form data")
}

/// Canned response.
#[derive(Debug, Clone)]
pub(crate) struct MockReply {
    pub(crate) status: u16,
    pub(crate) content_type: &'static str,
    pub(crate) body: Vec<u8>,
}

impl MockReply {
    pub(crate) fn json(value: &serde_json::Value) -> Self {
        Self {
            status: 200,
            content_type: "application/json",
            body: value.to_string().into_bytes(),
        }
    }

    /// Successful JSON envelope echoing the request's transaction ID.
    pub(crate) fn value(request: &RecordedRequest, value: serde_json::Value) -> Self {
        let client_transaction_id = request
            .param("ClientTransactionID")
            .and_then(|id| id.parse::<u32>().ok());
        Self::json(&serde_json::json!({
            "Value": value,
            "ClientTransactionID": client_transaction_id,
            "ServerTransactionID": 1,
            "ErrorNumber": 0,
            "ErrorMessage": "",
        }))
    }

    pub(crate) fn image_bytes(body: Vec<u8>) -> Self {
        Self {
            status: 200,
            content_type: "application/imagebytes",
            body,
        }
    }

    pub(crate) fn status(status: u16, body: &str) -> Self {
        Self {
            status,
            content_type: "text/plain",
            body: body.as_bytes().to_vec(),
        }
    }
}

impl IntoResponse for MockReply {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).expect("invalid mock status");
        (status, [(header::CONTENT_TYPE, self.content_type)], Body::from(self.body)).into_response()
    }
}

type Handler = dyn Fn(&RecordedRequest) -> MockReply + Send + Sync;

/// Alpaca server on a random local port answering every request with `handler`.
///
/// Runs on its own thread with a current-thread tokio runtime until the test process exits.
#[derive(Debug, Clone)]
pub(crate) struct MockServer {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockServer {
    pub(crate) fn start(
        handler: impl Fn(&RecordedRequest) -> MockReply + Send + Sync + 'static,
    ) -> eyre::Result<Self> {
        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0))?;
        listener.set_nonblocking(true)?;
        let addr = listener.local_addr()?;

        let requests = Arc::new(Mutex::new(Vec::new()));
        let handler: Arc<Handler> = Arc::new(handler);

        let app = Router::new().fallback({
            let requests = Arc::clone(&requests);
            move |request: Request| {
                let requests = Arc::clone(&requests);
                let handler = Arc::clone(&handler);
                async move {
                    let (parts, body) = request.into_parts();
                    let body = axum::body::to_bytes(body, usize::MAX)
                        .await
                        .expect("couldn't read request body");
                    let recorded = RecordedRequest {
                        method: parts.method.to_string(),
                        path: parts.uri.path().to_owned(),
                        query: parts.uri.query().unwrap_or_default().to_owned(),
                        body: String::from_utf8_lossy(&body).into_owned(),
                        headers: parts.headers,
                    };
                    tracing::debug!(method = %recorded.method, path = %recorded.path, "Mock server request");
                    let reply = handler(&recorded);
                    requests
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .push(recorded);
                    reply
                }
            }
        });

        let _ = thread::spawn(move || {
            let result = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .and_then(|runtime| {
                    runtime.block_on(async {
                        let listener = tokio::net::TcpListener::from_std(listener)?;
                        axum::serve(listener, app).await
                    })
                });
            if let Err(err) = result {
                tracing::error!(%err, "Mock server stopped");
            }
        });

        Ok(Self { addr, requests })
    }

    pub(crate) fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Requests received so far, oldest first.
    pub(crate) fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
