use super::*;

const ALL_VARS: [&str; 8] = [
    "XANO_AUTH_URL",
    "XANO_MESSAGES_URL",
    "XANO_ANALYTICS_URL",
    "XANO_REVIEWS_URL",
    "XANO_CHECKOUT_URL",
    "XANO_CONTACT_URL",
    "XANO_REQUEST_TIMEOUT_SECS",
    "XANO_CONNECT_TIMEOUT_SECS",
];

// Env-mutating tests share process state, so they run under one lock.
static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

/// # Safety
/// Callers hold `ENV_LOCK`.
unsafe fn clear_xano_env() {
    for var in ALL_VARS {
        unsafe { std::env::remove_var(var) };
    }
}

#[test]
fn from_env_uses_defaults() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    unsafe { clear_xano_env() };

    let cfg = ApiConfig::from_env().unwrap();
    assert_eq!(cfg, ApiConfig::default());
    assert_eq!(cfg.base_url(EndpointGroup::Auth), DEFAULT_AUTH_URL);
    assert_eq!(cfg.base_url(EndpointGroup::Messages), DEFAULT_MESSAGES_URL);
    assert_eq!(cfg.base_url(EndpointGroup::Checkout), DEFAULT_AUTH_URL);
}

#[test]
fn from_env_secondary_groups_follow_auth_override() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    unsafe {
        clear_xano_env();
        std::env::set_var("XANO_AUTH_URL", "https://auth.example.test/api:v2/");
        std::env::set_var("XANO_REVIEWS_URL", "http://localhost:9000/reviews");
        std::env::set_var("XANO_REQUEST_TIMEOUT_SECS", "5");
        std::env::set_var("XANO_CONNECT_TIMEOUT_SECS", "nope");
    }

    let cfg = ApiConfig::from_env().unwrap();
    assert_eq!(cfg.auth_url, "https://auth.example.test/api:v2");
    assert_eq!(cfg.analytics_url, "https://auth.example.test/api:v2");
    assert_eq!(cfg.reviews_url, "http://localhost:9000/reviews");
    assert_eq!(cfg.messages_url, DEFAULT_MESSAGES_URL);
    assert_eq!(cfg.timeouts, HttpTimeouts { request_secs: 5, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS });

    unsafe { clear_xano_env() };
}

#[test]
fn from_env_rejects_non_http_url() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    unsafe {
        clear_xano_env();
        std::env::set_var("XANO_CONTACT_URL", "ftp://mail.example.test");
    }

    let err = ApiConfig::from_env().unwrap_err().to_string();
    assert!(err.contains("XANO_CONTACT_URL"), "{err}");
    assert!(err.contains("expected http:// or https://"), "{err}");

    unsafe { clear_xano_env() };
}

#[test]
fn single_origin_points_every_group_at_base() {
    let cfg = ApiConfig::single_origin("http://127.0.0.1:4000/");
    for group in [
        EndpointGroup::Auth,
        EndpointGroup::Messages,
        EndpointGroup::Analytics,
        EndpointGroup::Reviews,
        EndpointGroup::Checkout,
        EndpointGroup::Contact,
    ] {
        assert_eq!(cfg.base_url(group), "http://127.0.0.1:4000", "{}", group.as_str());
    }
}

#[test]
fn parse_base_url_trims_whitespace_and_slashes() {
    assert_eq!(parse_base_url("X", "  https://a.test//  ").unwrap(), "https://a.test");
    assert!(parse_base_url("X", "a.test").is_err());
}
