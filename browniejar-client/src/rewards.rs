//! Reward catalog operations.

use browniejar_shared::api::RewardInsert;
use browniejar_shared::domain::{Reward, RewardId, RewardStatus};
use tracing::info;

use crate::AppError;
use crate::state::App;

impl App {
    /// Add a reward to the shared catalog.
    pub async fn create_reward(
        &self,
        title: &str,
        description: &str,
        points_cost: i32,
        image_icon: &str,
    ) -> Result<Reward, AppError> {
        let session = self.require_session()?;
        let title = title.trim();
        if title.is_empty() {
            return Err(AppError::Validation("reward title must not be empty".into()));
        }
        if points_cost < 1 {
            return Err(AppError::Validation(
                "reward cost must be at least 1 point".into(),
            ));
        }

        let insert = RewardInsert {
            title: title.to_string(),
            description: description.to_string(),
            points_cost,
            image_icon: image_icon.to_string(),
            status: RewardStatus::Available,
            created_by_id: session.user_id.clone(),
        };
        let reward = self.gateway.insert_reward(&insert).await?;
        info!(reward = %reward.id, cost = points_cost, "reward created");
        self.refresh_after_mutation().await;
        Ok(reward)
    }

    /// Remove a reward from the catalog. Irreversible.
    pub async fn delete_reward(&self, reward_id: &RewardId) -> Result<(), AppError> {
        self.require_session()?;
        {
            let st = self.state.lock().expect("state lock poisoned");
            if !st.rewards.iter().any(|r| &r.id == reward_id) {
                return Err(AppError::NotFound(format!("reward {reward_id}")));
            }
        }
        self.gateway.delete_reward(reward_id).await?;
        info!(reward = %reward_id, "reward deleted");
        self.refresh_after_mutation().await;
        Ok(())
    }
}
