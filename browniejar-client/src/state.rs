//! Shared application state and the `App` handle that drives it.

use std::sync::{Arc, Mutex};

use browniejar_shared::api::PointsHistoryRow;
use browniejar_shared::domain::{BrowniePoint, Profile, Reward, Task};
use serde::Serialize;
use tokio::time::Instant;

use crate::AppError;
use crate::gateway::Gateway;
use crate::session::Session;
use crate::stats::Summary;

/// Refresh bookkeeping. The flag and timestamp pair is the engine's entire
/// concurrency-control surface.
#[derive(Debug, Default)]
pub(crate) struct SyncGuard {
    pub(crate) refreshing: bool,
    pub(crate) last_attempt: Option<Instant>,
}

/// One consistent view of the shared state, cheap to clone out.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Snapshot {
    pub current_user: Option<Profile>,
    pub partner: Option<Profile>,
    /// Pending tasks from both partners, approvals from the last seven
    /// days, and the user's own rejected tasks regardless of age.
    pub tasks: Vec<Task>,
    /// Partner submissions awaiting the user's review, newest first.
    pub pending_tasks: Vec<Task>,
    /// Own submissions the partner has not reviewed yet, newest first.
    pub my_pending_tasks: Vec<Task>,
    /// Points sent or received by the user.
    pub brownie_points: Vec<BrowniePoint>,
    pub rewards: Vec<Reward>,
    /// Server-maintained earned-points ledger, read-only here.
    pub history: Vec<PointsHistoryRow>,
    pub summary: Summary,
    /// Sum of unredeemed points addressed to the user.
    pub available_points: i32,
    /// Lifetime earned points from the ledger.
    pub total_points_earned: i32,
    pub is_loading: bool,
}

impl Snapshot {
    pub fn has_partner(&self) -> bool {
        self.current_user
            .as_ref()
            .is_some_and(|p| p.partner_id.is_some())
    }
}

/// Engine entry point: owns the gateway, the session and the state. Plain
/// dependency injection; nothing in here is a process-wide singleton.
pub struct App {
    pub(crate) gateway: Arc<dyn Gateway>,
    pub(crate) session: Mutex<Option<Session>>,
    pub(crate) state: Mutex<Snapshot>,
    pub(crate) sync_guard: Mutex<SyncGuard>,
}

impl App {
    pub fn new(gateway: Arc<dyn Gateway>, session: Session) -> Self {
        Self {
            gateway,
            session: Mutex::new(Some(session)),
            state: Mutex::new(Snapshot::default()),
            sync_guard: Mutex::new(SyncGuard::default()),
        }
    }

    /// Clone of the current state.
    pub fn snapshot(&self) -> Snapshot {
        self.state.lock().expect("state lock poisoned").clone()
    }

    /// Session if present and still valid. An expired session is dropped so
    /// every later call fails fast instead of hitting the gateway.
    pub(crate) fn current_session(&self) -> Option<Session> {
        let mut guard = self.session.lock().expect("session lock poisoned");
        if guard.as_ref().is_some_and(Session::is_expired) {
            *guard = None;
        }
        guard.clone()
    }

    pub(crate) fn require_session(&self) -> Result<Session, AppError> {
        self.current_session().ok_or(AppError::AuthRequired)
    }
}
