use serde::{Deserialize, Serialize};

/// Subscription as handed to the server: endpoint plus the two per-subscription
/// secrets, base64 encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushSubscriptionDescriptor {
    pub endpoint: String,
    pub keys: SubscriptionKeys,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionKeys {
    pub p256dh: String,
    pub auth: String,
}

/// Server-issued application key in its wire form (base64url).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VapidPublicKey(String);

impl VapidPublicKey {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for VapidPublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionState {
    Granted,
    Denied,
    NotYetAsked,
}

impl PermissionState {
    /// Maps the platform's permission strings; anything unknown counts as not asked.
    pub fn from_platform(value: &str) -> Self {
        match value {
            "granted" => PermissionState::Granted,
            "denied" => PermissionState::Denied,
            _ => PermissionState::NotYetAsked,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncryptionKey {
    P256dh,
    Auth,
}

/// Arguments for the platform push subscription primitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscribeOptions {
    pub user_visible_only: bool,
    pub application_server_key: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscriptionState {
    Idle,
    Registering,
    RequestingPermission,
    FetchingKey,
    Subscribing,
    SyncingServer,
    Subscribed,
    Unsubscribing,
    Failed(String),
}

impl std::fmt::Display for SubscriptionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubscriptionState::Idle => f.write_str("idle"),
            SubscriptionState::Registering => f.write_str("registering"),
            SubscriptionState::RequestingPermission => f.write_str("requesting-permission"),
            SubscriptionState::FetchingKey => f.write_str("fetching-key"),
            SubscriptionState::Subscribing => f.write_str("subscribing"),
            SubscriptionState::SyncingServer => f.write_str("syncing-server"),
            SubscriptionState::Subscribed => f.write_str("subscribed"),
            SubscriptionState::Unsubscribing => f.write_str("unsubscribing"),
            SubscriptionState::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}
