//! Redemption engine: FIFO consumption of unredeemed point rows.
//!
//! Consumption is delete + recreate, never an in-place decrement. A
//! partially consumed row is replaced by one-point rows carrying the
//! original metadata and timestamp, so the remainder keeps its place in
//! the queue.

use browniejar_shared::api::PointInsert;
use browniejar_shared::domain::{BrowniePoint, PointId, RewardId};
use tracing::info;

use crate::AppError;
use crate::state::App;

/// What a redemption will do to the point rows: delete these ids, then
/// insert these replacements.
#[derive(Debug, Clone)]
pub struct RedemptionPlan {
    pub delete_ids: Vec<PointId>,
    pub reinsert: Vec<PointInsert>,
}

/// Allocate `cost` points from `rows`, oldest first.
///
/// Rows are re-sorted by `created_at` locally; remote ordering is not
/// trusted. Fails with `InsufficientPoints` before planning any mutation.
pub fn plan_redemption(rows: &[BrowniePoint], cost: i32) -> Result<RedemptionPlan, AppError> {
    let available: i32 = rows.iter().map(|p| p.points).sum();
    if available < cost {
        return Err(AppError::InsufficientPoints {
            needed: cost,
            available,
        });
    }

    let mut ordered: Vec<&BrowniePoint> = rows.iter().collect();
    ordered.sort_by(|a, b| a.created_at.cmp(&b.created_at));

    let mut remaining = cost;
    let mut plan = RedemptionPlan {
        delete_ids: Vec::new(),
        reinsert: Vec::new(),
    };
    for row in ordered {
        if remaining == 0 {
            break;
        }
        plan.delete_ids.push(row.id.clone());
        if row.points <= remaining {
            remaining -= row.points;
            continue;
        }
        // Split row: the overshoot comes back as one-point rows with the
        // original timestamp, keeping its age for future FIFO ordering.
        let leftover = row.points - remaining;
        remaining = 0;
        for _ in 0..leftover {
            plan.reinsert.push(PointInsert {
                from_user_id: row.from_user_id.clone(),
                to_user_id: row.to_user_id.clone(),
                kind: row.kind,
                message: row.message.clone(),
                points: 1,
                redeemed: false,
                created_at: Some(row.created_at),
            });
        }
    }
    Ok(plan)
}

impl App {
    /// Redeem a reward for the session user, spending oldest points first.
    /// Deletions commit before insertions: a failed delete leaves the
    /// balance unchanged rather than over-credited.
    pub async fn redeem_reward(&self, reward_id: &RewardId) -> Result<(), AppError> {
        let session = self.require_session()?;
        let reward = {
            let st = self.state.lock().expect("state lock poisoned");
            st.rewards
                .iter()
                .find(|r| &r.id == reward_id)
                .cloned()
                .ok_or_else(|| AppError::NotFound(format!("reward {reward_id}")))?
        };

        let rows = self.gateway.unredeemed_points(&session.user_id).await?;
        let plan = plan_redemption(&rows, reward.points_cost)?;

        self.gateway.delete_points(&plan.delete_ids).await?;
        if !plan.reinsert.is_empty() {
            self.gateway.insert_points(&plan.reinsert).await?;
        }

        info!(reward = %reward.id, cost = reward.points_cost, "reward redeemed");
        self.refresh_after_mutation().await;
        Ok(())
    }
}
