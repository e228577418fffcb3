//! Partner linking. A link is two mirrored `partner_id` writes; the
//! second write failing triggers a compensating clear of the first so a
//! half-link never persists silently.

use browniejar_shared::domain::Profile;
use tracing::{error, info, warn};

use crate::AppError;
use crate::state::App;

impl App {
    /// Link the session user with the profile registered under `email`.
    pub async fn link_partner(&self, email: &str) -> Result<Profile, AppError> {
        let session = self.require_session()?;
        let email = email.trim().to_lowercase();
        if email.is_empty() {
            return Err(AppError::Validation("partner email must not be empty".into()));
        }
        // Fail fast before any network traffic.
        if self.snapshot().has_partner() {
            return Err(AppError::Validation("already linked to a partner".into()));
        }

        let target = self
            .gateway
            .profile_by_email(&email)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("no profile with email {email}")))?;
        if target.id == session.user_id {
            return Err(AppError::Validation("cannot link to your own account".into()));
        }
        if target.partner_id.as_ref().is_some_and(|p| p != &session.user_id) {
            return Err(AppError::Validation(
                "that account is already linked to someone else".into(),
            ));
        }

        self.gateway
            .set_partner(&session.user_id, Some(&target.id))
            .await?;
        if let Err(e) = self.gateway.set_partner(&target.id, Some(&session.user_id)).await {
            warn!(partner = %target.id, error = %e, "partner-side link failed; compensating");
            if let Err(rb) = self.gateway.set_partner(&session.user_id, None).await {
                error!(error = %rb, "compensating clear failed; link is one-sided");
                return Err(AppError::PartialLink(format!(
                    "link to {email} failed and the rollback failed too: {rb}"
                )));
            }
            return Err(e.into());
        }

        info!(partner = %target.id, "partner linked");
        self.refresh_after_mutation().await;
        Ok(target)
    }

    /// Unlink from the current partner, clearing both sides.
    pub async fn unlink_partner(&self) -> Result<(), AppError> {
        let session = self.require_session()?;
        let partner_id = self
            .snapshot()
            .current_user
            .and_then(|p| p.partner_id)
            .ok_or_else(|| AppError::Validation("no partner linked".into()))?;

        self.gateway.set_partner(&session.user_id, None).await?;
        if let Err(e) = self.gateway.set_partner(&partner_id, None).await {
            error!(partner = %partner_id, error = %e, "partner-side unlink failed");
            return Err(AppError::PartialLink(format!(
                "your side is unlinked but {partner_id} still points at you: {e}"
            )));
        }

        info!(partner = %partner_id, "partner unlinked");
        self.refresh_after_mutation().await;
        Ok(())
    }
}
