use thiserror::Error;

/// Failure of the page-side push flows, as surfaced to the settings UI.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PushError {
    #[error("push notifications are not supported by this browser")]
    Unsupported,
    #[error("could not register the service worker: {0}")]
    RegistrationRejected(String),
    #[error("notification permission denied; allow notifications in the browser settings")]
    PermissionDenied,
    #[error(transparent)]
    KeyFetch(#[from] KeyFetchError),
    #[error("{0}")]
    PlatformSubscription(String),
    #[error("{0}")]
    ServerSync(String),
}

impl PushError {
    /// Whether re-invoking the same operation can succeed within this session.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, PushError::Unsupported | PushError::PermissionDenied)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    #[error("service workers are not supported")]
    Unsupported,
    #[error("{0}")]
    Rejected(String),
}

impl From<RegistrationError> for PushError {
    fn from(err: RegistrationError) -> Self {
        match err {
            RegistrationError::Unsupported => PushError::Unsupported,
            RegistrationError::Rejected(reason) => PushError::RegistrationRejected(reason),
        }
    }
}

/// The message is shown to the user as is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct KeyFetchError {
    message: String,
}

impl KeyFetchError {
    pub const FALLBACK_MESSAGE: &'static str =
        "could not obtain the VAPID public key from the server; contact the administrator";

    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn fallback() -> Self {
        Self::new(Self::FALLBACK_MESSAGE)
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyDecodeError {
    #[error("key is empty")]
    Empty,
    #[error("key is not valid base64url: {0}")]
    Malformed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkerError {
    #[error("could not display notification: {0}")]
    Display(String),
    #[error("could not reach window clients: {0}")]
    Clients(String),
}
