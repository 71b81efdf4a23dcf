//! A stand-in functron server that records requests and replies with a canned body.

use std::sync::{mpsc, Arc, Mutex};

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde_json::Value;
use tokio::net::TcpListener;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// A running mock server.
pub struct MockServer {
    /// URL to post invocations to
    pub url: String,

    /// Request bodies received so far
    pub requests: Arc<Mutex<Vec<Value>>>,
}

#[derive(Clone)]
struct MockState {
    status: StatusCode,
    body: String,
    requests: Arc<Mutex<Vec<Value>>>,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl MockServer {
    /// Starts a server on an ephemeral port in the current runtime.
    pub async fn start(status: StatusCode, body: impl Into<String>) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            status,
            body: body.into(),
            requests: requests.clone(),
        };

        let app = Router::new().route("/", post(handle)).with_state(state);
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            url: format!("http://{}/", addr),
            requests,
        }
    }

    /// Starts a server on its own thread and runtime, for use with blocking clients.
    pub fn start_detached(status: StatusCode, body: impl Into<String>) -> Self {
        let body = body.into();
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().unwrap();
            runtime.block_on(async move {
                tx.send(Self::start(status, body).await).unwrap();
                std::future::pending::<()>().await;
            });
        });

        rx.recv().unwrap()
    }

    /// The only request received so far.
    pub fn single_request(&self) -> Value {
        let requests = self.requests.lock().unwrap();
        assert_eq!(requests.len(), 1, "expected exactly one request");
        requests[0].clone()
    }

    /// Number of requests received so far.
    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

//--------------------------------------------------------------------------------------------------
// Functions: Handlers
//--------------------------------------------------------------------------------------------------

async fn handle(State(state): State<MockState>, Json(request): Json<Value>) -> (StatusCode, String) {
    state.requests.lock().unwrap().push(request);
    (state.status, state.body.clone())
}
