//! Push-notification enrollment for the WodBooker web client.
//!
//! The page side ([`push::SubscriptionManager`]) registers the service worker,
//! asks for notification permission, subscribes with the server's VAPID key
//! and reports the subscription to the server. The worker side
//! ([`worker::NotificationHandler`]) displays incoming pushes and handles
//! clicks. Platform and server access go through the traits in [`ports`];
//! [`adapters`] has the HTTP client and, on `wasm32`, the browser bindings.

pub mod adapters;
pub mod config;
pub mod error;
pub mod ports;
pub mod push;
pub mod types;
pub mod worker;

#[cfg(test)]
pub(crate) mod fakes;

pub use error::{KeyFetchError, PushError, RegistrationError, WorkerError};
pub use push::{Session, SubscriptionManager};
#[cfg(not(target_arch = "wasm32"))]
pub use push::vapid::{VapidKeyPair, generate_vapid_keys};
pub use types::push::{PushSubscriptionDescriptor, SubscriptionState, VapidPublicKey};
pub use worker::NotificationHandler;
