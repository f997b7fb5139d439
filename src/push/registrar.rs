use crate::error::RegistrationError;
use crate::ports::WorkerContainer;
use crate::push::session::Session;

use tracing::{debug, error, info, warn};

/// Keeps at most one worker registration per session.
#[derive(Debug, Clone)]
pub struct WorkerRegistrar<C> {
    container: C,
    script_path: String,
}

impl<C: WorkerContainer> WorkerRegistrar<C> {
    pub fn new(container: C, script_path: impl Into<String>) -> Self {
        Self {
            container,
            script_path: script_path.into(),
        }
    }

    pub fn container(&self) -> &C {
        &self.container
    }

    pub async fn ensure_registered(
        &self,
        session: &Session<C::Registration>,
    ) -> Result<C::Registration, RegistrationError> {
        if !self.container.is_supported() {
            warn!("service workers are not supported; push features are unavailable");
            return Err(RegistrationError::Unsupported);
        }

        if let Some(registration) = session.registration() {
            debug!("service worker already registered");
            return Ok(registration);
        }

        match self.container.register(&self.script_path).await {
            Ok(registration) => {
                info!(script = %self.script_path, "service worker registered");
                session.store_registration(registration.clone());
                Ok(registration)
            }
            Err(err) => {
                error!(script = %self.script_path, "service worker registration failed: {err}");
                Err(RegistrationError::Rejected(err.to_string()))
            }
        }
    }
}
