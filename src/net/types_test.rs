use super::*;
use serde_json::json;

fn review(value: Value) -> BadReview {
    serde_json::from_value(value).unwrap()
}

// =============================================================================
// rating
// =============================================================================

#[test]
fn rating_reads_either_field_name() {
    assert_eq!(review(json!({ "starts": 2 })).rating(), 2.0);
    assert_eq!(review(json!({ "stars": 4 })).rating(), 4.0);
}

#[test]
fn rating_prefers_starts_over_stars() {
    assert_eq!(review(json!({ "starts": 1, "stars": 3 })).rating(), 1.0);
}

#[test]
fn rating_falls_through_non_numeric_candidate() {
    assert_eq!(review(json!({ "starts": "n/a", "stars": 3 })).rating(), 3.0);
}

#[test]
fn rating_is_clamped() {
    assert_eq!(review(json!({ "stars": 7 })).rating(), 5.0);
    assert_eq!(review(json!({ "stars": -3 })).rating(), 0.0);
    assert_eq!(review(json!({ "starts": 5.5 })).rating(), 5.0);
}

#[test]
fn rating_defaults_to_zero() {
    assert_eq!(review(json!({ "message": "meh" })).rating(), 0.0);
    assert_eq!(review(json!({ "stars": null })).rating(), 0.0);
    assert_eq!(review(json!({ "stars": "lots" })).rating(), 0.0);
    assert_eq!(review(json!({ "stars": [3] })).rating(), 0.0);
}

#[test]
fn rating_accepts_numeric_strings() {
    assert_eq!(review(json!({ "stars": " 3 " })).rating(), 3.0);
    assert_eq!(review(json!({ "stars": "9" })).rating(), 5.0);
}

#[test]
fn clamp_rating_handles_nan() {
    assert_eq!(clamp_rating(f64::NAN), 0.0);
    assert_eq!(clamp_rating(2.5), 2.5);
}

// =============================================================================
// wire shapes
// =============================================================================

#[test]
fn bad_review_full_shape() {
    let r = review(json!({ "starts": 1, "message": "Slow reply", "created_at": 1_700_000_000_000_i64 }));
    assert_eq!(r.message_text(), "Slow reply");
    assert_eq!(r.created_at, Some(Timestamp::Millis(1_700_000_000_000)));
}

#[test]
fn analytics_snapshot_parses_backend_shape() {
    let snap: AnalyticsSnapshot = serde_json::from_value(json!({
        "unique_visits": 42,
        "views_pr_page": { "/": 30, "/pricing": 12 },
        "top_referers": [ { "ref": "google.com", "count": 9 }, { "ref": null, "count": 4 } ]
    }))
    .unwrap();
    assert_eq!(snap.unique_visits, 42);
    assert_eq!(snap.views_pr_page.get("/pricing"), Some(&12));
    assert_eq!(snap.top_referers[0].label(), "google.com");
    assert_eq!(snap.top_referers[1].label(), "direct");
}

#[test]
fn analytics_snapshot_tolerates_missing_fields() {
    let snap: AnalyticsSnapshot = serde_json::from_value(json!({})).unwrap();
    assert_eq!(snap, AnalyticsSnapshot::default());
}

#[test]
fn auth_response_reads_camel_case_token() {
    let resp: AuthResponse = serde_json::from_value(json!({ "authToken": "t1", "user": { "id": 1 } })).unwrap();
    assert_eq!(resp.auth_token.as_deref(), Some("t1"));
    assert!(resp.user.is_some());

    let resp: AuthResponse = serde_json::from_value(json!({})).unwrap();
    assert_eq!(resp.auth_token, None);
}

#[test]
fn signup_credentials_omit_missing_name() {
    let creds = SignupCredentials { email: "a@b.co".into(), password: "pw".into(), name: None };
    assert_eq!(serde_json::to_value(&creds).unwrap(), json!({ "email": "a@b.co", "password": "pw" }));
}

#[test]
fn user_profile_keeps_unknown_fields() {
    let user: UserProfile =
        serde_json::from_value(json!({ "id": 7, "email": "a@b.co", "created_at": 1, "role": "admin" })).unwrap();
    assert_eq!(user.id, Some(RecordId::Number(7)));
    assert_eq!(user.extra.get("role"), Some(&json!("admin")));
}

#[test]
fn display_name_falls_back_through_email_to_user() {
    let mut user: UserProfile = serde_json::from_value(json!({ "name": "Ada", "email": "ada@x.io" })).unwrap();
    assert_eq!(user.display_name(), "Ada");
    user.name = Some("  ".into());
    assert_eq!(user.display_name(), "ada@x.io");
    user.email = None;
    assert_eq!(user.display_name(), "User");
}

#[test]
fn client_message_accepts_text_ids() {
    let msg: ClientMessage = serde_json::from_value(json!({ "id": "m-1", "message": "hi" })).unwrap();
    assert_eq!(msg.id.to_string(), "m-1");
}

// =============================================================================
// timestamps
// =============================================================================

#[test]
fn timestamp_millis_renders_rfc3339() {
    assert_eq!(Timestamp::Millis(0).display(), "1970-01-01T00:00:00Z");
    assert_eq!(Timestamp::Millis(1_700_000_000_000).display(), "2023-11-14T22:13:20Z");
}

#[test]
fn timestamp_text_passes_through_or_parses_digits() {
    assert_eq!(Timestamp::Text("yesterday".into()).display(), "yesterday");
    assert_eq!(Timestamp::Text("1000".into()).millis(), Some(1000));
}

// =============================================================================
// null tolerance
// =============================================================================

#[test]
fn analytics_snapshot_reads_null_fields_as_empty() {
    let snap: AnalyticsSnapshot = serde_json::from_value(json!({
        "unique_visits": null,
        "views_pr_page": null,
        "top_referers": null
    }))
    .unwrap();
    assert_eq!(snap, AnalyticsSnapshot::default());
}

#[test]
fn referrer_null_count_is_zero() {
    let referrer: Referrer = serde_json::from_value(json!({ "ref": "google.com", "count": null })).unwrap();
    assert_eq!(referrer.count, 0);
}

#[test]
fn null_message_text_keeps_the_rest_of_the_list() {
    let messages: Vec<ClientMessage> =
        serde_json::from_value(json!([{ "id": 1, "message": "hi" }, { "id": 2, "message": null }])).unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1].message, "");
}
