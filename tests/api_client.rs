//! Request/response contract of `ApiClient` against a live local server.

mod common;

use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use brandsite::config::EndpointGroup;
use brandsite::net::error::ApiError;
use brandsite::net::{ApiCall, ApiClient};
use brandsite::session::MemorySession;
use serde_json::{Value, json};

async fn anonymous(app: Router) -> ApiClient {
    let base = common::serve(app).await;
    common::client(&base, Arc::new(MemorySession::new()))
}

async fn echo_auth(headers: HeaderMap) -> impl IntoResponse {
    match headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        Some(auth) => (StatusCode::OK, Json(json!({ "id": 7, "email": "ada@example.com", "name": auth }))),
        None => (StatusCode::UNAUTHORIZED, Json(json!({ "message": "Unauthorized" }))),
    }
}

// =============================================================
// Error contract
// =============================================================

#[tokio::test]
async fn error_body_message_is_surfaced_verbatim() {
    let app = Router::new()
        .route("/bad_reviews", get(|| async { (StatusCode::NOT_FOUND, Json(json!({ "message": "not found" }))) }));
    let api = anonymous(app).await;

    let err = api.bad_reviews().await.unwrap_err();
    assert_eq!(err.to_string(), "not found");
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.error_code(), "E_HTTP");
}

#[tokio::test]
async fn unparsable_error_body_reports_status() {
    let app = Router::new().route("/event", get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "<html>oops") }));
    let api = anonymous(app).await;

    let err = api.analytics().await.unwrap_err();
    assert_eq!(err.to_string(), "HTTP error! status: 500");
}

#[tokio::test]
async fn unreachable_backend_is_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);
    let api = common::client(&base, Arc::new(MemorySession::new()));

    let err = api.client_messages().await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)), "{err:?}");
    assert!(err.to_string().starts_with("An error occurred"), "{err}");
}

// =============================================================
// Headers
// =============================================================

#[tokio::test]
async fn bearer_token_attached_when_session_has_one() {
    let base = common::serve(Router::new().route("/auth/me", get(echo_auth))).await;
    let api = common::client(&base, Arc::new(MemorySession::with_token("abc123")));

    let user = api.current_user().await.unwrap();
    assert_eq!(user.name.as_deref(), Some("Bearer abc123"));
    assert_eq!(user.email.as_deref(), Some("ada@example.com"));
}

#[tokio::test]
async fn no_authorization_header_without_token() {
    let api = anonymous(Router::new().route("/auth/me", get(echo_auth))).await;

    let err = api.current_user().await.unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(err.to_string(), "Unauthorized");
}

#[tokio::test]
async fn caller_headers_and_json_content_type_reach_server() {
    let app = Router::new().route(
        "/echo",
        get(|headers: HeaderMap| async move {
            let read = |name: &str| headers.get(name).and_then(|v| v.to_str().ok()).map(str::to_owned);
            Json(json!({ "client": read("x-client"), "content_type": read("content-type") }))
        }),
    );
    let api = anonymous(app).await;

    let call = ApiCall::get(EndpointGroup::Auth, "/echo").headers(&[("x-client", "cli")][..]);
    let body: Value = api.request(call).await.unwrap();
    assert_eq!(body["client"], "cli");
    assert_eq!(body["content_type"], "application/json");
}

// =============================================================
// Success bodies
// =============================================================

#[tokio::test]
async fn empty_success_body_is_null() {
    let api = anonymous(Router::new().route("/ping", post(|| async { StatusCode::NO_CONTENT }))).await;

    let body: Value = api.request(ApiCall::post(EndpointGroup::Auth, "/ping")).await.unwrap();
    assert!(body.is_null());
}

#[tokio::test]
async fn client_messages_are_normalized() {
    let app = Router::new().route(
        "/client_message",
        get(|| async {
            (
                [(header::CONTENT_TYPE, "application/json")],
                r#"[{"id":1,"message":"a\\n\\n\\n\\nb"},{"id":2,"message":"plain"}]"#,
            )
        }),
    );
    let api = anonymous(app).await;

    let messages = api.client_messages().await.unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].message, "a\n\nb");
    assert_eq!(messages[1].message, "plain");
}

#[tokio::test]
async fn analytics_and_reviews_decode() {
    let app = Router::new()
        .route(
            "/event",
            get(|| async {
                Json(json!({
                    "unique_visits": 42,
                    "views_pr_page": { "/": 30, "/about": 12 },
                    "top_referers": [{ "ref": "google.com", "count": 9 }, { "ref": null, "count": 3 }]
                }))
            }),
        )
        .route(
            "/bad_reviews",
            get(|| async {
                Json(json!([
                    { "starts": 7, "message": "slow", "created_at": 1_700_000_000_000_i64 },
                    { "stars": "2", "message": "meh" }
                ]))
            }),
        );
    let api = anonymous(app).await;

    let analytics = api.analytics().await.unwrap();
    assert_eq!(analytics.unique_visits, 42);
    assert_eq!(analytics.views_pr_page["/about"], 12);
    assert_eq!(analytics.top_referers[1].label(), "direct");

    let reviews = api.bad_reviews().await.unwrap();
    assert_eq!(reviews[0].rating(), 5.0);
    assert_eq!(reviews[1].rating(), 2.0);
}

// =============================================================
// Checkout
// =============================================================

#[tokio::test]
async fn checkout_reads_json_field() {
    let app = Router::new().route(
        "/stripe/create-checkout-session",
        post(|| async { Json(json!({ "checkout_url": "https://pay.example/s1" })) }),
    );
    let api = anonymous(app).await;

    let session = api.create_checkout_session().await.unwrap();
    assert_eq!(session.url, "https://pay.example/s1");
}

#[tokio::test]
async fn checkout_reads_plain_text_url() {
    let app = Router::new().route(
        "/stripe/create-checkout-session",
        post(|| async { ([(header::CONTENT_TYPE, "text/plain")], "https://pay.example/s9") }),
    );
    let api = anonymous(app).await;

    let session = api.create_checkout_session().await.unwrap();
    assert_eq!(session.url, "https://pay.example/s9");
}

#[tokio::test]
async fn checkout_without_url_is_reported() {
    let app = Router::new().route("/stripe/create-checkout-session", post(|| async { Json(json!({})) }));
    let api = anonymous(app).await;

    let err = api.create_checkout_session().await.unwrap_err();
    assert!(matches!(err, ApiError::MissingCheckoutUrl { ref raw } if raw == "{}"), "{err:?}");
}
