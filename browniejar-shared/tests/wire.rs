use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use browniejar_shared::api::{AuthResp, PointInsert, TaskStatusPatch, endpoints};
use browniejar_shared::domain::{PointId, PointKind, TaskKind, TaskStatus, UserId};
use browniejar_shared::jwt;
use serde_json::json;
use time::macros::datetime;

const BASE: &str = "https://jar.example.com";

#[test]
fn endpoint_urls() {
    assert_eq!(
        endpoints::sign_in(BASE),
        "https://jar.example.com/auth/v1/token?grant_type=password"
    );
    assert_eq!(
        endpoints::sign_up("https://jar.example.com/"),
        "https://jar.example.com/auth/v1/signup"
    );
    assert_eq!(
        endpoints::rpc(BASE, "get_profile_by_id"),
        "https://jar.example.com/rest/v1/rpc/get_profile_by_id"
    );
    assert_eq!(endpoints::tasks(BASE), "https://jar.example.com/rest/v1/tasks");
    assert_eq!(
        endpoints::task_by_id(BASE, "t1"),
        "https://jar.example.com/rest/v1/tasks?id=eq.t1"
    );
    assert_eq!(endpoints::points(BASE), "https://jar.example.com/rest/v1/brownie_points");
    assert_eq!(
        endpoints::points_for_user(BASE, "u1"),
        "https://jar.example.com/rest/v1/brownie_points?or=(from_user_id.eq.u1,to_user_id.eq.u1)&order=created_at.desc"
    );
    assert_eq!(
        endpoints::unredeemed_points(BASE, "u1"),
        "https://jar.example.com/rest/v1/brownie_points?to_user_id=eq.u1&redeemed=eq.false&order=created_at.asc"
    );
    assert_eq!(
        endpoints::points_by_ids(BASE, &[PointId::from("p1"), PointId::from("p2")]),
        "https://jar.example.com/rest/v1/brownie_points?id=in.(p1,p2)"
    );
    assert_eq!(
        endpoints::rewards_list(BASE),
        "https://jar.example.com/rest/v1/rewards?order=created_at.desc"
    );
    assert_eq!(
        endpoints::reward_by_id(BASE, "r9"),
        "https://jar.example.com/rest/v1/rewards?id=eq.r9"
    );
    assert_eq!(
        endpoints::points_history(BASE, "u1"),
        "https://jar.example.com/rest/v1/points_history?user_id=eq.u1&select=points,created_at&order=created_at.desc"
    );
}

#[test]
fn filter_values_are_percent_encoded() {
    assert_eq!(
        endpoints::task_by_id(BASE, "t 1"),
        "https://jar.example.com/rest/v1/tasks?id=eq.t%201"
    );
    // Every non-alphanumeric byte is escaped, uuid hyphens included.
    assert_eq!(
        endpoints::unredeemed_points(BASE, "u-1"),
        "https://jar.example.com/rest/v1/brownie_points?to_user_id=eq.u%2D1&redeemed=eq.false&order=created_at.asc"
    );
}

#[test]
fn enums_serialize_lowercase() {
    assert_eq!(serde_json::to_string(&TaskKind::Both).unwrap(), "\"both\"");
    assert_eq!(serde_json::to_string(&TaskStatus::Pending).unwrap(), "\"pending\"");
    assert_eq!(serde_json::to_string(&PointKind::Effort).unwrap(), "\"effort\"");

    let kind: TaskKind = serde_json::from_str("\"mental\"").unwrap();
    assert_eq!(kind, TaskKind::Mental);
    assert!(serde_json::from_str::<TaskKind>("\"weekly\"").is_err());
    assert!(serde_json::from_str::<TaskStatus>("\"archived\"").is_err());
}

#[test]
fn point_insert_carries_a_timestamp_only_when_pinned() {
    let base = PointInsert {
        from_user_id: UserId::from("u1"),
        to_user_id: UserId::from("u2"),
        kind: PointKind::Custom,
        message: "thanks".into(),
        points: 1,
        redeemed: false,
        created_at: None,
    };
    let v = serde_json::to_value(&base).unwrap();
    assert!(v.get("created_at").is_none(), "backend mints the timestamp");
    assert_eq!(v.get("kind").unwrap(), "custom");
    assert_eq!(v.get("from_user_id").unwrap(), "u1");

    let mut pinned = base.clone();
    pinned.created_at = Some(datetime!(2026-08-01 10:00 UTC));
    let v = serde_json::to_value(&pinned).unwrap();
    assert_eq!(v.get("created_at").unwrap(), "2026-08-01T10:00:00Z");
}

#[test]
fn task_patch_omits_an_absent_comment() {
    let v = serde_json::to_value(TaskStatusPatch {
        status: TaskStatus::Approved,
        comment: None,
    })
    .unwrap();
    assert_eq!(v, json!({"status": "approved"}));

    let v = serde_json::to_value(TaskStatusPatch {
        status: TaskStatus::Rejected,
        comment: Some("needs another pass"),
    })
    .unwrap();
    assert_eq!(v, json!({"status": "rejected", "comment": "needs another pass"}));
}

fn token_with(payload: serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let body = URL_SAFE_NO_PAD.encode(payload.to_string().as_bytes());
    format!("{header}.{body}.sig")
}

#[test]
fn access_tokens_decode_without_verification() {
    let token = token_with(json!({"sub": "u1", "email": "ada@example.com", "exp": 4102444800i64}));
    let claims = jwt::decode_unverified(&token).unwrap();
    assert_eq!(claims.sub, "u1");
    assert_eq!(claims.email.as_deref(), Some("ada@example.com"));
    assert!(!claims.is_expired(4102444799));
    assert!(claims.is_expired(4102444800), "the expiry instant counts as expired");

    let no_email = token_with(json!({"sub": "u2", "exp": 1}));
    let claims = jwt::decode_unverified(&no_email).unwrap();
    assert!(claims.email.is_none());

    assert!(jwt::decode_unverified("garbage").is_err());
    assert!(jwt::decode_unverified("a.!!!.c").is_err());
    let not_json = format!(
        "{}.{}.sig",
        URL_SAFE_NO_PAD.encode(b"{}"),
        URL_SAFE_NO_PAD.encode(b"hello")
    );
    assert!(jwt::decode_unverified(&not_json).is_err());
}

#[test]
fn auth_response_tolerates_a_missing_expiry() {
    let resp: AuthResp = serde_json::from_value(json!({
        "access_token": "tok",
        "user": {"id": "u1", "email": "ada@example.com"}
    }))
    .unwrap();
    assert_eq!(resp.access_token, "tok");
    assert_eq!(resp.user.id, "u1");
    assert!(resp.expires_in.is_none());
}
