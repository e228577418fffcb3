//! Pure derivations over fetched rows. No I/O; the orchestrator feeds
//! these and the snapshot carries the results.

use browniejar_shared::api::PointsHistoryRow;
use browniejar_shared::domain::{BrowniePoint, Task, TaskStatus, UserId};
use serde::Serialize;
use time::OffsetDateTime;

/// Weekly household summary shown next to the jar.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    /// Tasks owned by the user, any status.
    pub user_task_count: usize,
    pub partner_task_count: usize,
    /// Share of logged tasks owned by the user, in percent. 50 when
    /// nothing has been logged.
    pub user_contribution: u32,
    /// Tasks counting toward the mental load (`mental` or `both`).
    pub mental_tasks: usize,
    /// Tasks counting toward the physical load (`physical` or `both`).
    pub physical_tasks: usize,
    /// Rating sum over the user's approved tasks.
    pub user_points: i32,
    /// Rating sum over the partner's approved tasks.
    pub partner_points: i32,
    /// Ledger points earned at or after the cutoff.
    pub points_this_week: i32,
}

impl Default for Summary {
    fn default() -> Self {
        Self {
            user_task_count: 0,
            partner_task_count: 0,
            user_contribution: 50,
            mental_tasks: 0,
            physical_tasks: 0,
            user_points: 0,
            partner_points: 0,
            points_this_week: 0,
        }
    }
}

/// Brownie points minted when a task with the given self-rating is
/// approved. A designed reward curve; the boundaries are fixed.
pub fn points_for_rating(rating: i32) -> i32 {
    match rating {
        ..=3 => 1,
        ..=6 => 2,
        ..=8 => 3,
        _ => 4,
    }
}

/// Summarize the household's week from the user's point of view. `tasks`
/// is the already-filtered snapshot list; `cutoff` only bounds the ledger
/// sum.
pub fn summarize(
    tasks: &[Task],
    history: &[PointsHistoryRow],
    cutoff: OffsetDateTime,
    user_id: &UserId,
    partner_id: Option<&UserId>,
) -> Summary {
    if tasks.is_empty() && partner_id.is_none() {
        return Summary::default();
    }
    let mut s = Summary::default();
    for t in tasks {
        let mine = &t.user_id == user_id;
        let partners = partner_id.is_some_and(|p| &t.user_id == p);
        if !mine && !partners {
            continue;
        }
        if mine {
            s.user_task_count += 1;
        } else {
            s.partner_task_count += 1;
        }
        if t.kind.is_mental() {
            s.mental_tasks += 1;
        }
        if t.kind.is_physical() {
            s.physical_tasks += 1;
        }
        if t.status == TaskStatus::Approved {
            if mine {
                s.user_points += t.rating;
            } else {
                s.partner_points += t.rating;
            }
        }
    }
    let total = s.user_task_count + s.partner_task_count;
    if total > 0 {
        s.user_contribution = ((s.user_task_count * 100 + total / 2) / total) as u32;
    }
    s.points_this_week = history
        .iter()
        .filter(|r| r.created_at >= cutoff)
        .map(|r| r.points)
        .sum();
    s
}

/// Tasks worth keeping in the snapshot: everything pending, approvals
/// since `cutoff`, and the user's own rejected tasks (feedback persists
/// regardless of age).
pub fn relevant_tasks(all: &[Task], cutoff: OffsetDateTime, user_id: &UserId) -> Vec<Task> {
    all.iter()
        .filter(|t| match t.status {
            TaskStatus::Pending => true,
            TaskStatus::Approved => t.created_at >= cutoff,
            TaskStatus::Rejected => &t.user_id == user_id,
        })
        .cloned()
        .collect()
}

/// Partner submissions waiting for the user's review, newest first.
pub fn pending_for_review(tasks: &[Task], user_id: &UserId) -> Vec<Task> {
    let mut v: Vec<Task> = tasks
        .iter()
        .filter(|t| t.status == TaskStatus::Pending && &t.user_id != user_id)
        .cloned()
        .collect();
    v.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    v
}

/// The user's own submissions still waiting on the partner, newest first.
pub fn pending_own(tasks: &[Task], user_id: &UserId) -> Vec<Task> {
    let mut v: Vec<Task> = tasks
        .iter()
        .filter(|t| t.status == TaskStatus::Pending && &t.user_id == user_id)
        .cloned()
        .collect();
    v.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    v
}

/// The balance the redemption engine draws down: unredeemed points
/// addressed to the user.
pub fn available_points(points: &[BrowniePoint], user_id: &UserId) -> i32 {
    points
        .iter()
        .filter(|p| &p.to_user_id == user_id && !p.redeemed)
        .map(|p| p.points)
        .sum()
}

/// Lifetime earned points from the server-maintained ledger.
pub fn total_earned(history: &[PointsHistoryRow]) -> i32 {
    history.iter().map(|r| r.points).sum()
}
