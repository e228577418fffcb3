use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::domain::{PointKind, RewardStatus, TaskKind, TaskStatus, UserId};

pub mod endpoints;
#[cfg(feature = "rest-client")]
pub mod rest;

pub const AUTH_PREFIX: &str = "/auth/v1";
pub const REST_PREFIX: &str = "/rest/v1";

// Auth plane

#[derive(Debug, Serialize)]
pub struct PasswordGrantReq {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SignUpReq {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct AuthUser {
    pub id: String,
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct AuthResp {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
    pub user: AuthUser,
}

// RPC arguments (parameter names match the remote function signatures)

#[derive(Debug, Serialize)]
pub struct ProfileByIdArgs<'a> {
    pub user_id: &'a str,
}

#[derive(Debug, Serialize)]
pub struct ProfileByEmailArgs<'a> {
    pub email: &'a str,
}

#[derive(Debug, Serialize)]
pub struct TasksForUserArgs<'a> {
    pub user_id: &'a str,
}

#[derive(Debug, Serialize)]
pub struct UpdatePartnerArgs<'a> {
    pub user_id: &'a str,
    pub partner_id: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub struct CreateProfileArgs<'a> {
    pub user_id: &'a str,
    pub name: &'a str,
    pub email: &'a str,
}

// Table writes. Row ids and default timestamps are minted by the backend;
// `PointInsert.created_at` is only set when a remainder row must keep the
// consumed row's original age.

#[derive(Debug, Clone, Serialize)]
pub struct TaskInsert {
    pub title: String,
    pub kind: TaskKind,
    pub rating: i32,
    pub user_id: UserId,
    pub status: TaskStatus,
}

#[derive(Debug, Serialize)]
pub struct TaskStatusPatch<'a> {
    pub status: TaskStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<&'a str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PointInsert {
    pub from_user_id: UserId,
    pub to_user_id: UserId,
    pub kind: PointKind,
    pub message: String,
    pub points: i32,
    pub redeemed: bool,
    #[serde(with = "time::serde::rfc3339::option")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RewardInsert {
    pub title: String,
    pub description: String,
    pub points_cost: i32,
    pub image_icon: String,
    pub status: RewardStatus,
    pub created_by_id: UserId,
}

// Points-history ledger (read-only; maintained by the backend)

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointsHistoryRow {
    pub points: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}
