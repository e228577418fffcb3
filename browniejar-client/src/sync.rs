//! Fetch orchestration: one sequential pass over the gateway with
//! re-entrancy and throttle guards.

use std::time::Duration;

use browniejar_shared::domain::now_utc;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::session::Session;
use crate::state::{App, Snapshot};
use crate::{AppError, stats};

/// Minimum spacing between refresh attempts. Calls landing inside the
/// window are dropped, never queued.
pub(crate) const REFRESH_THROTTLE: Duration = Duration::from_secs(5);
/// Approved tasks older than this fall out of the snapshot.
const APPROVED_KEEP_WINDOW: time::Duration = time::Duration::days(7);

impl App {
    /// Throttled full refresh, idempotent and safe to call repeatedly.
    /// Without a session it clears the snapshot and returns.
    pub async fn refresh(&self) -> Result<(), AppError> {
        let Some(session) = self.current_session() else {
            *self.state.lock().expect("state lock poisoned") = Snapshot::default();
            return Ok(());
        };
        {
            let mut g = self.sync_guard.lock().expect("sync guard lock poisoned");
            if g.refreshing {
                debug!("refresh already in flight; dropping this call");
                return Ok(());
            }
            if let Some(at) = g.last_attempt {
                if at.elapsed() < REFRESH_THROTTLE {
                    debug!("refresh throttled; dropping this call");
                    return Ok(());
                }
            }
            g.refreshing = true;
            g.last_attempt = Some(Instant::now());
        }
        self.guarded_fetch(&session).await
    }

    /// Post-mutation refresh: skips the throttle so a mutation's result is
    /// visible immediately, but still drops when another refresh runs.
    pub(crate) async fn refresh_now(&self) -> Result<(), AppError> {
        let Some(session) = self.current_session() else {
            *self.state.lock().expect("state lock poisoned") = Snapshot::default();
            return Ok(());
        };
        {
            let mut g = self.sync_guard.lock().expect("sync guard lock poisoned");
            if g.refreshing {
                debug!("refresh already in flight; dropping this call");
                return Ok(());
            }
            g.refreshing = true;
            g.last_attempt = Some(Instant::now());
        }
        self.guarded_fetch(&session).await
    }

    /// Mutators call this after a successful write; a refresh failure here
    /// must not turn the finished mutation into an error.
    pub(crate) async fn refresh_after_mutation(&self) {
        if let Err(e) = self.refresh_now().await {
            warn!(error = %e, "refresh after mutation failed; snapshot may lag");
        }
    }

    async fn guarded_fetch(&self, session: &Session) -> Result<(), AppError> {
        self.state.lock().expect("state lock poisoned").is_loading = true;
        let res = self.fetch_all(session).await;
        self.state.lock().expect("state lock poisoned").is_loading = false;
        self.sync_guard
            .lock()
            .expect("sync guard lock poisoned")
            .refreshing = false;
        res
    }

    async fn fetch_all(&self, session: &Session) -> Result<(), AppError> {
        let user_id = session.user_id.clone();

        // Identity failures abort the pass: rows must never be shaped
        // against a stale partner id.
        let me = self
            .gateway
            .profile_by_id(&user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("profile {user_id}")))?;
        let partner = match &me.partner_id {
            Some(pid) => Some(
                self.gateway
                    .profile_by_id(pid)
                    .await?
                    .ok_or_else(|| AppError::NotFound(format!("partner profile {pid}")))?,
            ),
            None => None,
        };

        let cutoff = now_utc() - APPROVED_KEEP_WINDOW;

        // Row fetches are isolated per resource: a bad fetch logs and the
        // previous rows survive.
        let tasks = match self.gateway.tasks_for_user(&user_id).await {
            Ok(rows) => Some(rows),
            Err(e) => {
                warn!(error = %e, "task fetch failed; keeping previous tasks");
                None
            }
        };
        let points = match self.gateway.points_for_user(&user_id).await {
            Ok(rows) => Some(rows),
            Err(e) => {
                warn!(error = %e, "points fetch failed; keeping previous points");
                None
            }
        };
        let rewards = match self.gateway.list_rewards().await {
            Ok(rows) => Some(rows),
            Err(e) => {
                warn!(error = %e, "reward fetch failed; keeping previous rewards");
                None
            }
        };
        let history = match self.gateway.points_history(&user_id).await {
            Ok(rows) => Some(rows),
            Err(e) => {
                warn!(error = %e, "ledger fetch failed; keeping previous history");
                None
            }
        };

        let mut st = self.state.lock().expect("state lock poisoned");
        st.current_user = Some(me);
        st.partner = partner;
        if let Some(rows) = tasks {
            st.tasks = stats::relevant_tasks(&rows, cutoff, &user_id);
        }
        if let Some(rows) = points {
            st.brownie_points = rows;
        }
        if let Some(rows) = rewards {
            st.rewards = rows;
        }
        if let Some(rows) = history {
            st.history = rows;
        }
        st.pending_tasks = stats::pending_for_review(&st.tasks, &user_id);
        st.my_pending_tasks = stats::pending_own(&st.tasks, &user_id);
        st.available_points = stats::available_points(&st.brownie_points, &user_id);
        st.total_points_earned = stats::total_earned(&st.history);
        let partner_id = st.partner.as_ref().map(|p| p.id.clone());
        st.summary = stats::summarize(&st.tasks, &st.history, cutoff, &user_id, partner_id.as_ref());
        debug!(
            tasks = st.tasks.len(),
            points = st.brownie_points.len(),
            rewards = st.rewards.len(),
            available = st.available_points,
            "snapshot rebuilt"
        );
        Ok(())
    }
}
