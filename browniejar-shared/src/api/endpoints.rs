use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};

use super::{AUTH_PREFIX, REST_PREFIX};
use crate::domain::PointId;

fn base_join(base: &str, path: &str) -> String {
    let b = base.trim_end_matches('/');
    let p = path.trim_start_matches('/');
    format!("{}/{}", b, p)
}

fn enc(s: &str) -> String {
    utf8_percent_encode(s, NON_ALPHANUMERIC).to_string()
}

pub fn sign_in(base: &str) -> String {
    base_join(base, &format!("{}/token?grant_type=password", AUTH_PREFIX))
}

pub fn sign_up(base: &str) -> String {
    base_join(base, &format!("{}/signup", AUTH_PREFIX))
}

pub fn rpc(base: &str, func: &str) -> String {
    base_join(base, &format!("{}/rpc/{}", REST_PREFIX, func))
}

pub fn tasks(base: &str) -> String {
    base_join(base, &format!("{}/tasks", REST_PREFIX))
}

pub fn task_by_id(base: &str, task_id: &str) -> String {
    base_join(base, &format!("{}/tasks?id=eq.{}", REST_PREFIX, enc(task_id)))
}

pub fn points(base: &str) -> String {
    base_join(base, &format!("{}/brownie_points", REST_PREFIX))
}

/// Points sent or received by `user_id`, newest first.
pub fn points_for_user(base: &str, user_id: &str) -> String {
    let u = enc(user_id);
    base_join(
        base,
        &format!(
            "{}/brownie_points?or=(from_user_id.eq.{},to_user_id.eq.{})&order=created_at.desc",
            REST_PREFIX, u, u
        ),
    )
}

/// Unredeemed points received by `user_id`, oldest first (redemption order).
pub fn unredeemed_points(base: &str, user_id: &str) -> String {
    base_join(
        base,
        &format!(
            "{}/brownie_points?to_user_id=eq.{}&redeemed=eq.false&order=created_at.asc",
            REST_PREFIX,
            enc(user_id)
        ),
    )
}

pub fn points_by_ids(base: &str, ids: &[PointId]) -> String {
    let list = ids
        .iter()
        .map(|id| enc(&id.0))
        .collect::<Vec<_>>()
        .join(",");
    base_join(
        base,
        &format!("{}/brownie_points?id=in.({})", REST_PREFIX, list),
    )
}

pub fn rewards(base: &str) -> String {
    base_join(base, &format!("{}/rewards", REST_PREFIX))
}

pub fn rewards_list(base: &str) -> String {
    base_join(
        base,
        &format!("{}/rewards?order=created_at.desc", REST_PREFIX),
    )
}

pub fn reward_by_id(base: &str, reward_id: &str) -> String {
    base_join(
        base,
        &format!("{}/rewards?id=eq.{}", REST_PREFIX, enc(reward_id)),
    )
}

pub fn points_history(base: &str, user_id: &str) -> String {
    base_join(
        base,
        &format!(
            "{}/points_history?user_id=eq.{}&select=points,created_at&order=created_at.desc",
            REST_PREFIX,
            enc(user_id)
        ),
    )
}
