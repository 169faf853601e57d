//! A local divide service for integration tests.
#![allow(clippy::unwrap_used, clippy::expect_used, dead_code)]

use std::net::{SocketAddr, TcpListener};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::oneshot;

#[derive(Debug, Deserialize)]
struct DivideRequest {
    numerator: f64,
    denominator: f64,
}

#[derive(Clone, Default)]
struct Hits(Arc<AtomicUsize>);

fn divide(request: &DivideRequest) -> Response {
    if request.denominator == 0.0 {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"detail": "Division by zero is not permitted."})),
        )
            .into_response();
    }
    Json(json!({"result": request.numerator / request.denominator})).into_response()
}

async fn divide_json(State(hits): State<Hits>, Json(request): Json<DivideRequest>) -> Response {
    hits.0.fetch_add(1, Ordering::SeqCst);
    divide(&request)
}

async fn divide_query(State(hits): State<Hits>, Query(request): Query<DivideRequest>) -> Response {
    hits.0.fetch_add(1, Ordering::SeqCst);
    divide(&request)
}

async fn plain_text(State(hits): State<Hits>) -> &'static str {
    hits.0.fetch_add(1, Ordering::SeqCst);
    "OK"
}

/// Serves `/divide` (POST JSON and GET query) and `/plain` on an ephemeral
/// port until dropped.
pub struct DivideService {
    addr: SocketAddr,
    hits: Hits,
    shutdown: Option<oneshot::Sender<()>>,
}

impl DivideService {
    pub fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.set_nonblocking(true).unwrap();
        let addr = listener.local_addr().unwrap();

        let hits = Hits::default();
        let router = Router::new()
            .route("/divide", post(divide_json).get(divide_query))
            .route("/plain", get(plain_text).post(plain_text))
            .with_state(hits.clone());

        let (shutdown, shutdown_rx) = oneshot::channel::<()>();
        std::thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::from_std(listener).unwrap();
                axum::serve(listener, router)
                    .with_graceful_shutdown(async {
                        let _ = shutdown_rx.await;
                    })
                    .await
                    .unwrap();
            });
        });

        Self {
            addr,
            hits,
            shutdown: Some(shutdown),
        }
    }

    /// Base URL, without the `/divide` path.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Full URL of the divide endpoint.
    pub fn endpoint(&self) -> String {
        format!("{}/divide", self.base_url())
    }

    /// Requests served so far.
    pub fn hits(&self) -> usize {
        self.hits.0.load(Ordering::SeqCst)
    }
}

impl Drop for DivideService {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
    }
}

/// A base URL nothing listens on.
pub fn unreachable_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}
