use super::*;
use crate::session::SESSION_TTL;

#[cfg(not(feature = "hydrate"))]
#[test]
fn native_build_reads_absent() {
    let store = CookieSession::new();
    store.set_token("abc", SESSION_TTL);
    assert_eq!(store.get_token(), None);
    assert!(!store.is_authenticated());
    store.remove_token();
    assert_eq!(store.get_token(), None);
}

#[test]
fn find_cookie_picks_matching_key() {
    let header = "theme=dark; xano_auth_token=tok123; other=1";
    assert_eq!(find_cookie(header, TOKEN_KEY).as_deref(), Some("tok123"));
}

#[test]
fn find_cookie_ignores_prefix_matches() {
    let header = "xano_auth_token_old=stale; xano_auth_token=fresh";
    assert_eq!(find_cookie(header, TOKEN_KEY).as_deref(), Some("fresh"));
}

#[test]
fn find_cookie_decodes_percent_encoding() {
    let header = "xano_auth_token=a%3Bb%20c";
    assert_eq!(find_cookie(header, TOKEN_KEY).as_deref(), Some("a;b c"));
}

#[test]
fn find_cookie_missing_or_empty_is_none() {
    assert_eq!(find_cookie("", TOKEN_KEY), None);
    assert_eq!(find_cookie("theme=dark", TOKEN_KEY), None);
    assert_eq!(find_cookie("xano_auth_token=", TOKEN_KEY), None);
}

#[test]
fn assignment_encodes_value_and_sets_max_age() {
    let cookie = cookie_assignment(TOKEN_KEY, "a;b c", SESSION_TTL);
    assert_eq!(cookie, "xano_auth_token=a%3Bb%20c; max-age=604800; path=/; SameSite=Lax");
}

#[test]
fn assignment_round_trips_through_find() {
    let cookie = cookie_assignment(TOKEN_KEY, "tok/with=chars", SESSION_TTL);
    let pair = cookie.split(';').next().unwrap_or_default();
    assert_eq!(find_cookie(pair, TOKEN_KEY).as_deref(), Some("tok/with=chars"));
}

#[test]
fn removal_expires_immediately() {
    assert_eq!(cookie_removal(TOKEN_KEY), "xano_auth_token=; max-age=0; path=/");
}
