//! Shared helpers for tests.

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

/// Path the stand-in Telex endpoint listens on.
pub const FAKE_TELEX_PATH: &str = "/v1/webhooks/channel";

/// Start a stand-in Telex endpoint on an ephemeral port.
///
/// Every JSON body it receives is pushed to the returned channel and
/// answered with `status`. Returns the full webhook URL.
pub async fn fake_telex(status: StatusCode) -> (String, mpsc::UnboundedReceiver<Value>) {
    let (tx, rx) = mpsc::unbounded_channel();

    let app = Router::new()
        .route(
            FAKE_TELEX_PATH,
            post(
                move |State(tx): State<mpsc::UnboundedSender<Value>>, Json(body): Json<Value>| async move {
                    let _ = tx.send(body);
                    status
                },
            ),
        )
        .with_state(tx);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}{}", addr, FAKE_TELEX_PATH), rx)
}

/// A Telex URL nothing listens on.
pub const OFFLINE_TELEX_URL: &str = "http://127.0.0.1:1/v1/webhooks/offline";
