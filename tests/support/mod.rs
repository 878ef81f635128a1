// Shared bootstrapping for integration tests: one fake identity provider and
// one coach server, started once per test binary.
use axum::{http::StatusCode, routing::post, Json, Router};
use coach_server::Config;
use serde_json::{json, Value};
use std::{
    sync::{Arc, OnceLock},
    time::Duration,
};

static SERVER_URL: OnceLock<String> = OnceLock::new();
static SERVER_READY: OnceLock<()> = OnceLock::new();

// Bearer token accepted by the fake identity provider for `uid`.
pub fn token_for(uid: &str) -> String {
    format!("token-{uid}")
}

// Tokens of the form `token-<uid>` verify as `<uid>`; anything else is rejected.
async fn verify_token(Json(payload): Json<Value>) -> (StatusCode, Json<Value>) {
    let uid = payload["token"]
        .as_str()
        .and_then(|token| token.strip_prefix("token-"));
    match uid {
        Some(uid) if !uid.is_empty() => (StatusCode::OK, Json(json!({ "uid": uid }))),
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "invalid token" })),
        ),
    }
}

// Ensure both servers are running and return the coach server base URL.
pub fn ensure_server() -> &'static str {
    SERVER_READY.get_or_init(|| {
        let published_url = Arc::new(OnceLock::<String>::new());
        let published_url_thread = Arc::clone(&published_url);
        // A dedicated OS thread keeps the servers alive across `#[tokio::test]` runtimes.
        std::thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("test runtime");
            runtime.block_on(async move {
                let identity_listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                    .await
                    .expect("bind identity test port");
                let identity_addr = identity_listener.local_addr().expect("identity addr");
                let identity_app = Router::new().route("/auth/verify-token", post(verify_token));
                tokio::spawn(async move {
                    axum::serve(identity_listener, identity_app)
                        .await
                        .expect("identity server failed");
                });

                let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                    .await
                    .expect("bind ephemeral test port");
                let addr = listener.local_addr().expect("get local addr");

                let mut config = Config::default();
                config.http.bind_addr = addr;
                config.identity.base_url = format!("http://{identity_addr}");

                let _ = published_url_thread.set(format!("http://{addr}"));
                coach_server::run(listener, config)
                    .await
                    .expect("server failed");
            });
        });
        wait_for_server_url_and_readiness(published_url);
    });

    SERVER_URL
        .get()
        .expect("server url should be initialized")
        .as_str()
}

fn wait_for_server_url_and_readiness(published_url: Arc<OnceLock<String>>) {
    let base_url = loop {
        if let Some(url) = published_url.get() {
            break url.clone();
        }
        std::thread::sleep(Duration::from_millis(10));
    };

    let _ = SERVER_URL.set(base_url.clone());

    let addr = base_url
        .strip_prefix("http://")
        .expect("base url should use http://");

    for _ in 0..100 {
        if std::net::TcpStream::connect(addr).is_ok() {
            return;
        }
        std::thread::sleep(Duration::from_millis(20));
    }

    panic!("server did not become ready in time");
}
