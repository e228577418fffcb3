//! Task lifecycle: submit, approve with point award, reject, delete.

use browniejar_shared::api::{PointInsert, TaskInsert, TaskStatusPatch};
use browniejar_shared::domain::{PointKind, Task, TaskId, TaskKind, TaskStatus};
use tracing::{info, warn};

use crate::state::App;
use crate::stats::points_for_rating;
use crate::AppError;

impl App {
    /// Submit a completed task for the partner to review.
    pub async fn submit_task(
        &self,
        title: &str,
        kind: TaskKind,
        rating: i32,
    ) -> Result<Task, AppError> {
        let session = self.require_session()?;
        let title = title.trim();
        if title.is_empty() {
            return Err(AppError::Validation("task title must not be empty".into()));
        }
        if !(1..=10).contains(&rating) {
            return Err(AppError::Validation("rating must be within 1..=10".into()));
        }
        if !self.snapshot().has_partner() {
            return Err(AppError::Validation(
                "link a partner before submitting tasks".into(),
            ));
        }

        let row = TaskInsert {
            title: title.to_string(),
            kind,
            rating,
            user_id: session.user_id,
            status: TaskStatus::Pending,
        };
        let task = self.gateway.insert_task(&row).await?;
        info!(task = %task.id, "task submitted");
        self.refresh_after_mutation().await;
        Ok(task)
    }

    /// Approve a pending task. Approving the partner's task awards points
    /// to its owner; approving one's own task stands but never mints
    /// points.
    pub async fn approve_task(&self, task_id: &TaskId) -> Result<(), AppError> {
        let session = self.require_session()?;
        let task = self.find_task(task_id)?;
        if task.status != TaskStatus::Pending {
            return Err(AppError::Validation(format!(
                "task {task_id} is not pending"
            )));
        }

        let approved = self
            .gateway
            .update_task_status(
                task_id,
                &TaskStatusPatch {
                    status: TaskStatus::Approved,
                    comment: None,
                },
            )
            .await?;

        if approved.user_id == session.user_id {
            info!(task = %task_id, "own task approved; no points awarded");
            self.refresh_after_mutation().await;
            return Ok(());
        }

        // Award off the row the gateway returned, not the local view.
        let points = points_for_rating(approved.rating);
        let award = PointInsert {
            from_user_id: session.user_id,
            to_user_id: approved.user_id.clone(),
            kind: PointKind::Effort,
            message: format!("Task approved: {}", approved.title),
            points,
            redeemed: false,
            created_at: None,
        };
        let award_res = self
            .gateway
            .insert_points(std::slice::from_ref(&award))
            .await;
        self.refresh_after_mutation().await;
        match award_res {
            Ok(_) => {
                info!(task = %task_id, points, "task approved");
                Ok(())
            }
            Err(e) => {
                // The approval is the primary effect and stays.
                warn!(error = %e, task = %task_id, "task approved but the point award failed");
                Err(e.into())
            }
        }
    }

    /// Reject the partner's pending task. A comment is mandatory so the
    /// owner knows what to fix.
    pub async fn reject_task(&self, task_id: &TaskId, comment: &str) -> Result<(), AppError> {
        let session = self.require_session()?;
        let comment = comment.trim();
        if comment.is_empty() {
            return Err(AppError::Validation(
                "a rejection comment is required".into(),
            ));
        }
        let task = self.find_task(task_id)?;
        if task.status != TaskStatus::Pending {
            return Err(AppError::Validation(format!(
                "task {task_id} is not pending"
            )));
        }
        if task.user_id == session.user_id {
            return Err(AppError::Validation("cannot reject your own task".into()));
        }

        self.gateway
            .update_task_status(
                task_id,
                &TaskStatusPatch {
                    status: TaskStatus::Rejected,
                    comment: Some(comment),
                },
            )
            .await?;
        info!(task = %task_id, "task rejected");
        self.refresh_after_mutation().await;
        Ok(())
    }

    /// Hard-delete a task. Ownership is enforced by the gateway's row-level
    /// security, not here, so tasks outside the snapshot window can be
    /// removed too.
    pub async fn delete_task(&self, task_id: &TaskId) -> Result<(), AppError> {
        self.require_session()?;
        self.gateway.delete_task(task_id).await?;
        info!(task = %task_id, "task deleted");
        self.refresh_after_mutation().await;
        Ok(())
    }

    fn find_task(&self, task_id: &TaskId) -> Result<Task, AppError> {
        let st = self.state.lock().expect("state lock poisoned");
        st.tasks
            .iter()
            .find(|t| &t.id == task_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("task {task_id}")))
    }
}
