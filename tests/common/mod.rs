//! Shared harness: an in-process backend stand-in on an ephemeral port.

use std::sync::Arc;

use axum::Router;
use brandsite::config::ApiConfig;
use brandsite::net::ApiClient;
use brandsite::session::SessionStore;

/// Serve `app` on `127.0.0.1:0` and return its base URL.
pub async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move { axum::serve(listener, app).await.expect("serve app") });
    format!("http://{addr}")
}

/// Client with every endpoint group pointed at `base`.
pub fn client(base: &str, session: Arc<dyn SessionStore>) -> ApiClient {
    ApiClient::new(ApiConfig::single_origin(base), session).expect("build client")
}
