use async_trait::async_trait;
use browniejar_shared::api::rest::{self, RestError};
use browniejar_shared::api::{
    PointInsert, PointsHistoryRow, RewardInsert, TaskInsert, TaskStatusPatch,
};
use browniejar_shared::domain::{
    BrowniePoint, PointId, Profile, Reward, RewardId, Task, TaskId, UserId,
};

use super::Gateway;
use crate::config::ClientConfig;
use crate::session::Session;

/// Production [`Gateway`] delegating to the shared REST client.
pub struct RestGateway {
    base: String,
    apikey: String,
    bearer: String,
}

impl RestGateway {
    pub fn new(cfg: &ClientConfig, session: &Session) -> Self {
        Self {
            base: crate::config::normalize_service_url(&cfg.service_url),
            apikey: cfg.anon_key.clone(),
            bearer: session.token.clone(),
        }
    }
}

#[async_trait]
impl Gateway for RestGateway {
    async fn profile_by_id(&self, user_id: &UserId) -> Result<Option<Profile>, RestError> {
        rest::profile_by_id(&self.base, &self.apikey, &self.bearer, &user_id.0).await
    }

    async fn profile_by_email(&self, email: &str) -> Result<Option<Profile>, RestError> {
        rest::profile_by_email(&self.base, &self.apikey, &self.bearer, email).await
    }

    async fn set_partner(
        &self,
        user_id: &UserId,
        partner_id: Option<&UserId>,
    ) -> Result<(), RestError> {
        rest::update_partner(
            &self.base,
            &self.apikey,
            &self.bearer,
            &user_id.0,
            partner_id.map(|p| p.0.as_str()),
        )
        .await
    }

    async fn tasks_for_user(&self, user_id: &UserId) -> Result<Vec<Task>, RestError> {
        rest::tasks_for_user(&self.base, &self.apikey, &self.bearer, &user_id.0).await
    }

    async fn insert_task(&self, row: &TaskInsert) -> Result<Task, RestError> {
        rest::insert_task(&self.base, &self.apikey, &self.bearer, row).await
    }

    async fn update_task_status(
        &self,
        task_id: &TaskId,
        patch: &TaskStatusPatch<'_>,
    ) -> Result<Task, RestError> {
        rest::update_task_status(&self.base, &self.apikey, &self.bearer, &task_id.0, patch).await
    }

    async fn delete_task(&self, task_id: &TaskId) -> Result<(), RestError> {
        rest::delete_task(&self.base, &self.apikey, &self.bearer, &task_id.0).await
    }

    async fn points_for_user(&self, user_id: &UserId) -> Result<Vec<BrowniePoint>, RestError> {
        rest::points_for_user(&self.base, &self.apikey, &self.bearer, &user_id.0).await
    }

    async fn unredeemed_points(&self, user_id: &UserId) -> Result<Vec<BrowniePoint>, RestError> {
        rest::unredeemed_points(&self.base, &self.apikey, &self.bearer, &user_id.0).await
    }

    async fn insert_points(&self, rows: &[PointInsert]) -> Result<Vec<BrowniePoint>, RestError> {
        rest::insert_points(&self.base, &self.apikey, &self.bearer, rows).await
    }

    async fn delete_points(&self, ids: &[PointId]) -> Result<(), RestError> {
        rest::delete_points(&self.base, &self.apikey, &self.bearer, ids).await
    }

    async fn list_rewards(&self) -> Result<Vec<Reward>, RestError> {
        rest::list_rewards(&self.base, &self.apikey, &self.bearer).await
    }

    async fn insert_reward(&self, row: &RewardInsert) -> Result<Reward, RestError> {
        rest::insert_reward(&self.base, &self.apikey, &self.bearer, row).await
    }

    async fn delete_reward(&self, reward_id: &RewardId) -> Result<(), RestError> {
        rest::delete_reward(&self.base, &self.apikey, &self.bearer, &reward_id.0).await
    }

    async fn points_history(&self, user_id: &UserId) -> Result<Vec<PointsHistoryRow>, RestError> {
        rest::points_history(&self.base, &self.apikey, &self.bearer, &user_id.0).await
    }
}
