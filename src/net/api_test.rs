use super::*;
use crate::session::MemorySession;

#[test]
fn endpoint_url_joins_with_single_slash() {
    assert_eq!(endpoint_url("https://x.example/api:abc", "/auth/me"), "https://x.example/api:abc/auth/me");
    assert_eq!(endpoint_url("https://x.example/api:abc/", "/auth/me"), "https://x.example/api:abc/auth/me");
    assert_eq!(endpoint_url("https://x.example/api:abc", "event"), "https://x.example/api:abc/event");
}

#[test]
fn call_builders_set_method_and_group() {
    let call = ApiCall::get(EndpointGroup::Reviews, BAD_REVIEWS_PATH);
    assert_eq!(call.method, Method::GET);
    assert_eq!(call.group, EndpointGroup::Reviews);
    assert!(call.body.is_none());

    let call = ApiCall::post(EndpointGroup::Auth, LOGIN_PATH)
        .json(&LoginCredentials { email: "a@b.co".into(), password: "pw".into() })
        .unwrap();
    assert_eq!(call.method, Method::POST);
    assert_eq!(call.body, Some(serde_json::json!({ "email": "a@b.co", "password": "pw" })));
}

#[test]
fn call_headers_accept_pairs() {
    let call = ApiCall::get(EndpointGroup::Auth, ME_PATH).headers(&[("x-trace", "1")][..]);
    assert!(matches!(call.headers, Some(HeaderSource::Pairs(ref p)) if p.len() == 1));
}

#[test]
fn empty_success_body_decodes_as_null() {
    let value: Value = decode_json("").unwrap();
    assert!(value.is_null());
    let value: Option<UserProfile> = decode_json("  ").unwrap();
    assert!(value.is_none());
}

#[test]
fn mismatched_body_is_decode_error() {
    let err = decode_json::<Vec<ClientMessage>>(r#"{"not":"a list"}"#).unwrap_err();
    assert_eq!(err.error_code(), "E_DECODE");
}

#[test]
fn store_token_ignores_missing_or_empty() {
    let session = Arc::new(MemorySession::new());
    let client = ApiClient::new(ApiConfig::single_origin("http://127.0.0.1:9"), session.clone()).unwrap();

    client.store_token(&AuthResponse { auth_token: Some(String::new()), user: None });
    assert!(!session.is_authenticated());

    client.store_token(&AuthResponse { auth_token: None, user: None });
    assert!(!session.is_authenticated());

    client.store_token(&AuthResponse { auth_token: Some("tok".into()), user: None });
    assert_eq!(session.get_token().as_deref(), Some("tok"));

    client.logout();
    assert!(!session.is_authenticated());
}
