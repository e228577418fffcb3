//! Manual point gifts between partners.

use browniejar_shared::api::PointInsert;
use browniejar_shared::api::rest::RestError;
use browniejar_shared::domain::{BrowniePoint, PointKind};
use tracing::info;

use crate::AppError;
use crate::state::App;

impl App {
    /// Gift points to the linked partner with a personal message.
    pub async fn gift_points(&self, points: i32, message: &str) -> Result<BrowniePoint, AppError> {
        let session = self.require_session()?;
        if points < 1 {
            return Err(AppError::Validation("gift at least one point".into()));
        }
        let message = message.trim();
        if message.is_empty() {
            return Err(AppError::Validation("a gift needs a message".into()));
        }
        let partner_id = self
            .snapshot()
            .current_user
            .and_then(|p| p.partner_id)
            .ok_or_else(|| AppError::Validation("link a partner before gifting points".into()))?;

        let row = PointInsert {
            from_user_id: session.user_id,
            to_user_id: partner_id,
            kind: PointKind::Custom,
            message: message.to_string(),
            points,
            redeemed: false,
            created_at: None,
        };
        let mut inserted = self.gateway.insert_points(std::slice::from_ref(&row)).await?;
        let point = inserted.pop().ok_or_else(|| {
            AppError::Remote(RestError::Serde("gateway returned no inserted row".into()))
        })?;
        info!(to = %point.to_user_id, points = point.points, "points gifted");
        self.refresh_after_mutation().await;
        Ok(point)
    }
}
