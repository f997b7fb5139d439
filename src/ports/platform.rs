use crate::types::push::{EncryptionKey, PermissionState, SubscribeOptions};

use std::fmt::Display;

/// The browser's background-worker facility.
pub trait WorkerContainer: Clone + 'static {
    type Registration: WorkerRegistration;
    type Error: Display + 'static;
    type Register<'a>: Future<Output = Result<Self::Registration, Self::Error>> + 'a
    where
        Self: 'a;

    fn is_supported(&self) -> bool;
    /// Whether the push subscription facility exists alongside the workers.
    fn supports_push(&self) -> bool;
    fn register<'a>(&'a self, script_path: &'a str) -> Self::Register<'a>;
}

/// A handle to one registered worker and its push manager.
pub trait WorkerRegistration: Clone + 'static {
    type Subscription: PlatformSubscription;
    type Error: Display + 'static;
    type Subscribe<'a>: Future<Output = Result<Self::Subscription, Self::Error>> + 'a
    where
        Self: 'a;
    type Lookup<'a>: Future<Output = Result<Option<Self::Subscription>, Self::Error>> + 'a
    where
        Self: 'a;

    fn subscribe(&self, options: SubscribeOptions) -> Self::Subscribe<'_>;
    fn subscription(&self) -> Self::Lookup<'_>;
}

pub trait PlatformSubscription: 'static {
    type Error: Display + 'static;
    type Unsubscribe<'a>: Future<Output = Result<bool, Self::Error>> + 'a
    where
        Self: 'a;

    fn endpoint(&self) -> String;
    fn key(&self, name: EncryptionKey) -> Option<Vec<u8>>;
    fn unsubscribe(&self) -> Self::Unsubscribe<'_>;
}

pub trait NotificationPermissions: Clone + 'static {
    type Prompt<'a>: Future<Output = PermissionState> + 'a
    where
        Self: 'a;

    fn is_supported(&self) -> bool;
    fn current(&self) -> PermissionState;
    fn prompt(&self) -> Self::Prompt<'_>;
}
