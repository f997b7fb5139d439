use crate::ports::NotificationPermissions;
use crate::push::session::Session;
use crate::types::push::PermissionState;

use tracing::{debug, info};

/// Asks for notification permission at most once, and never again after a refusal.
#[derive(Debug, Clone)]
pub struct PermissionGate<P> {
    permissions: P,
}

impl<P: NotificationPermissions> PermissionGate<P> {
    pub fn new(permissions: P) -> Self {
        Self { permissions }
    }

    pub async fn request_permission<R>(&self, session: &Session<R>) -> bool {
        if !self.permissions.is_supported() {
            debug!("notifications are not supported");
            return false;
        }
        if session.permission_denied() {
            return false;
        }

        match self.permissions.current() {
            PermissionState::Granted => true,
            PermissionState::Denied => {
                session.record_denial();
                false
            }
            PermissionState::NotYetAsked => {
                let outcome = self.permissions.prompt().await;
                info!(?outcome, "notification permission prompt answered");
                if outcome == PermissionState::Denied {
                    session.record_denial();
                }
                outcome == PermissionState::Granted
            }
        }
    }
}
