//! Minimal REST client helpers for the hosted data gateway.
//!
//! Two planes: `/auth/v1` (password grant, sign-up) and `/rest/v1`
//! (tables + RPC functions). Every call carries the project `apikey` header;
//! data-plane calls additionally carry the user's bearer token so the
//! backend's row-level security applies. Writes ask for
//! `Prefer: return=representation` and hand the mutated row(s) back, which is
//! what lets callers read their own writes without a settle delay.

use once_cell::sync::Lazy;
use std::time::Duration;

use super::endpoints as ep;
use super::*;
use crate::domain::{BrowniePoint, PointId, Profile, Reward, Task};

#[derive(Debug, thiserror::Error)]
pub enum RestError {
    #[error("http: {0}")]
    Http(String),
    #[error("status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("serde: {0}")]
    Serde(String),
}

static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(|| {
    reqwest::Client::builder()
        // Keep TCP connections alive at kernel level
        .tcp_keepalive(Some(Duration::from_secs(180)))
        // Enable and tune the connection pool
        .pool_max_idle_per_host(4)
        .pool_idle_timeout(Duration::from_secs(180))
        // Bound request duration
        .timeout(Duration::from_secs(60))
        .build()
        .expect("failed to build HTTP client")
});

fn mk_client() -> Result<reqwest::Client, RestError> {
    Ok(HTTP_CLIENT.clone())
}

async fn handle_json<T: for<'de> serde::Deserialize<'de>>(
    res: reqwest::Response,
) -> Result<T, RestError> {
    let status = res.status();
    if !status.is_success() {
        let body = res.text().await.unwrap_or_default();
        return Err(RestError::Status {
            status: status.as_u16(),
            body,
        });
    }
    res.json::<T>()
        .await
        .map_err(|e| RestError::Serde(e.to_string()))
}

async fn handle_empty(res: reqwest::Response) -> Result<(), RestError> {
    if res.status().is_success() {
        Ok(())
    } else {
        let status = res.status().as_u16();
        let body = res.text().await.unwrap_or_default();
        Err(RestError::Status { status, body })
    }
}

/// Representation responses come back as a one-element array.
fn single<T>(mut rows: Vec<T>) -> Result<T, RestError> {
    if rows.len() == 1 {
        Ok(rows.remove(0))
    } else {
        Err(RestError::Serde(format!(
            "expected exactly one returned row, got {}",
            rows.len()
        )))
    }
}

// Auth plane

pub async fn sign_in(base: &str, apikey: &str, req: &PasswordGrantReq) -> Result<AuthResp, RestError> {
    let client = mk_client()?;
    let url = ep::sign_in(base);
    let res = client
        .post(url)
        .header("apikey", apikey)
        .json(req)
        .send()
        .await
        .map_err(|e| RestError::Http(e.to_string()))?;
    handle_json(res).await
}

pub async fn sign_up(base: &str, apikey: &str, req: &SignUpReq) -> Result<AuthResp, RestError> {
    let client = mk_client()?;
    let url = ep::sign_up(base);
    let res = client
        .post(url)
        .header("apikey", apikey)
        .json(req)
        .send()
        .await
        .map_err(|e| RestError::Http(e.to_string()))?;
    handle_json(res).await
}

// Profile RPCs. They return a row object or JSON null, never an array.

pub async fn profile_by_id(
    base: &str,
    apikey: &str,
    bearer: &str,
    user_id: &str,
) -> Result<Option<Profile>, RestError> {
    let client = mk_client()?;
    let url = ep::rpc(base, "get_profile_by_id");
    let res = client
        .post(url)
        .header("apikey", apikey)
        .bearer_auth(bearer)
        .json(&ProfileByIdArgs { user_id })
        .send()
        .await
        .map_err(|e| RestError::Http(e.to_string()))?;
    handle_json(res).await
}

pub async fn profile_by_email(
    base: &str,
    apikey: &str,
    bearer: &str,
    email: &str,
) -> Result<Option<Profile>, RestError> {
    let client = mk_client()?;
    let url = ep::rpc(base, "get_profile_by_email");
    let res = client
        .post(url)
        .header("apikey", apikey)
        .bearer_auth(bearer)
        .json(&ProfileByEmailArgs { email })
        .send()
        .await
        .map_err(|e| RestError::Http(e.to_string()))?;
    handle_json(res).await
}

pub async fn create_profile(
    base: &str,
    apikey: &str,
    bearer: &str,
    args: &CreateProfileArgs<'_>,
) -> Result<(), RestError> {
    let client = mk_client()?;
    let url = ep::rpc(base, "create_new_profile");
    let res = client
        .post(url)
        .header("apikey", apikey)
        .bearer_auth(bearer)
        .json(args)
        .send()
        .await
        .map_err(|e| RestError::Http(e.to_string()))?;
    handle_empty(res).await
}

pub async fn update_partner(
    base: &str,
    apikey: &str,
    bearer: &str,
    user_id: &str,
    partner_id: Option<&str>,
) -> Result<(), RestError> {
    let client = mk_client()?;
    let url = ep::rpc(base, "update_user_partner");
    let res = client
        .post(url)
        .header("apikey", apikey)
        .bearer_auth(bearer)
        .json(&UpdatePartnerArgs {
            user_id,
            partner_id,
        })
        .send()
        .await
        .map_err(|e| RestError::Http(e.to_string()))?;
    handle_empty(res).await
}

// Tasks

pub async fn tasks_for_user(
    base: &str,
    apikey: &str,
    bearer: &str,
    user_id: &str,
) -> Result<Vec<Task>, RestError> {
    let client = mk_client()?;
    let url = ep::rpc(base, "get_tasks_for_user");
    let res = client
        .post(url)
        .header("apikey", apikey)
        .bearer_auth(bearer)
        .json(&TasksForUserArgs { user_id })
        .send()
        .await
        .map_err(|e| RestError::Http(e.to_string()))?;
    handle_json(res).await
}

pub async fn insert_task(
    base: &str,
    apikey: &str,
    bearer: &str,
    row: &TaskInsert,
) -> Result<Task, RestError> {
    let client = mk_client()?;
    let url = ep::tasks(base);
    let res = client
        .post(url)
        .header("apikey", apikey)
        .header("Prefer", "return=representation")
        .bearer_auth(bearer)
        .json(row)
        .send()
        .await
        .map_err(|e| RestError::Http(e.to_string()))?;
    single(handle_json(res).await?)
}

pub async fn update_task_status(
    base: &str,
    apikey: &str,
    bearer: &str,
    task_id: &str,
    patch: &TaskStatusPatch<'_>,
) -> Result<Task, RestError> {
    let client = mk_client()?;
    let url = ep::task_by_id(base, task_id);
    let res = client
        .patch(url)
        .header("apikey", apikey)
        .header("Prefer", "return=representation")
        .bearer_auth(bearer)
        .json(patch)
        .send()
        .await
        .map_err(|e| RestError::Http(e.to_string()))?;
    single(handle_json(res).await?)
}

pub async fn delete_task(
    base: &str,
    apikey: &str,
    bearer: &str,
    task_id: &str,
) -> Result<(), RestError> {
    let client = mk_client()?;
    let url = ep::task_by_id(base, task_id);
    let res = client
        .delete(url)
        .header("apikey", apikey)
        .bearer_auth(bearer)
        .send()
        .await
        .map_err(|e| RestError::Http(e.to_string()))?;
    handle_empty(res).await
}

// Brownie points

pub async fn points_for_user(
    base: &str,
    apikey: &str,
    bearer: &str,
    user_id: &str,
) -> Result<Vec<BrowniePoint>, RestError> {
    let client = mk_client()?;
    let url = ep::points_for_user(base, user_id);
    let res = client
        .get(url)
        .header("apikey", apikey)
        .bearer_auth(bearer)
        .send()
        .await
        .map_err(|e| RestError::Http(e.to_string()))?;
    handle_json(res).await
}

pub async fn unredeemed_points(
    base: &str,
    apikey: &str,
    bearer: &str,
    user_id: &str,
) -> Result<Vec<BrowniePoint>, RestError> {
    let client = mk_client()?;
    let url = ep::unredeemed_points(base, user_id);
    let res = client
        .get(url)
        .header("apikey", apikey)
        .bearer_auth(bearer)
        .send()
        .await
        .map_err(|e| RestError::Http(e.to_string()))?;
    handle_json(res).await
}

pub async fn insert_points(
    base: &str,
    apikey: &str,
    bearer: &str,
    rows: &[PointInsert],
) -> Result<Vec<BrowniePoint>, RestError> {
    let client = mk_client()?;
    let url = ep::points(base);
    let res = client
        .post(url)
        .header("apikey", apikey)
        .header("Prefer", "return=representation")
        .bearer_auth(bearer)
        .json(rows)
        .send()
        .await
        .map_err(|e| RestError::Http(e.to_string()))?;
    handle_json(res).await
}

pub async fn delete_points(
    base: &str,
    apikey: &str,
    bearer: &str,
    ids: &[PointId],
) -> Result<(), RestError> {
    let client = mk_client()?;
    let url = ep::points_by_ids(base, ids);
    let res = client
        .delete(url)
        .header("apikey", apikey)
        .bearer_auth(bearer)
        .send()
        .await
        .map_err(|e| RestError::Http(e.to_string()))?;
    handle_empty(res).await
}

// Rewards

pub async fn list_rewards(base: &str, apikey: &str, bearer: &str) -> Result<Vec<Reward>, RestError> {
    let client = mk_client()?;
    let url = ep::rewards_list(base);
    let res = client
        .get(url)
        .header("apikey", apikey)
        .bearer_auth(bearer)
        .send()
        .await
        .map_err(|e| RestError::Http(e.to_string()))?;
    handle_json(res).await
}

pub async fn insert_reward(
    base: &str,
    apikey: &str,
    bearer: &str,
    row: &RewardInsert,
) -> Result<Reward, RestError> {
    let client = mk_client()?;
    let url = ep::rewards(base);
    let res = client
        .post(url)
        .header("apikey", apikey)
        .header("Prefer", "return=representation")
        .bearer_auth(bearer)
        .json(row)
        .send()
        .await
        .map_err(|e| RestError::Http(e.to_string()))?;
    single(handle_json(res).await?)
}

pub async fn delete_reward(
    base: &str,
    apikey: &str,
    bearer: &str,
    reward_id: &str,
) -> Result<(), RestError> {
    let client = mk_client()?;
    let url = ep::reward_by_id(base, reward_id);
    let res = client
        .delete(url)
        .header("apikey", apikey)
        .bearer_auth(bearer)
        .send()
        .await
        .map_err(|e| RestError::Http(e.to_string()))?;
    handle_empty(res).await
}

// Points-history ledger

pub async fn points_history(
    base: &str,
    apikey: &str,
    bearer: &str,
    user_id: &str,
) -> Result<Vec<PointsHistoryRow>, RestError> {
    let client = mk_client()?;
    let url = ep::points_history(base, user_id);
    let res = client
        .get(url)
        .header("apikey", apikey)
        .bearer_auth(bearer)
        .send()
        .await
        .map_err(|e| RestError::Http(e.to_string()))?;
    handle_json(res).await
}
