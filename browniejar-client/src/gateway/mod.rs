//! Seam between the engine and the remote data gateway.

use async_trait::async_trait;
use browniejar_shared::api::rest::RestError;
use browniejar_shared::api::{
    PointInsert, PointsHistoryRow, RewardInsert, TaskInsert, TaskStatusPatch,
};
use browniejar_shared::domain::{
    BrowniePoint, PointId, Profile, Reward, RewardId, Task, TaskId, UserId,
};

mod rest;
pub use rest::RestGateway;

/// Remote operations the engine consumes. Production talks to the hosted
/// backend; tests substitute an in-memory fake.
#[async_trait]
pub trait Gateway: Send + Sync {
    async fn profile_by_id(&self, user_id: &UserId) -> Result<Option<Profile>, RestError>;
    async fn profile_by_email(&self, email: &str) -> Result<Option<Profile>, RestError>;
    async fn set_partner(
        &self,
        user_id: &UserId,
        partner_id: Option<&UserId>,
    ) -> Result<(), RestError>;

    async fn tasks_for_user(&self, user_id: &UserId) -> Result<Vec<Task>, RestError>;
    async fn insert_task(&self, row: &TaskInsert) -> Result<Task, RestError>;
    async fn update_task_status(
        &self,
        task_id: &TaskId,
        patch: &TaskStatusPatch<'_>,
    ) -> Result<Task, RestError>;
    async fn delete_task(&self, task_id: &TaskId) -> Result<(), RestError>;

    async fn points_for_user(&self, user_id: &UserId) -> Result<Vec<BrowniePoint>, RestError>;
    async fn unredeemed_points(&self, user_id: &UserId) -> Result<Vec<BrowniePoint>, RestError>;
    async fn insert_points(&self, rows: &[PointInsert]) -> Result<Vec<BrowniePoint>, RestError>;
    async fn delete_points(&self, ids: &[PointId]) -> Result<(), RestError>;

    async fn list_rewards(&self) -> Result<Vec<Reward>, RestError>;
    async fn insert_reward(&self, row: &RewardInsert) -> Result<Reward, RestError>;
    async fn delete_reward(&self, reward_id: &RewardId) -> Result<(), RestError>;

    async fn points_history(&self, user_id: &UserId) -> Result<Vec<PointsHistoryRow>, RestError>;
}
