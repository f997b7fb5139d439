use crate::config::ClientConfig;
use crate::error::{KeyFetchError, PushError};
use crate::ports::{
    NotificationPermissions, PlatformSubscription, ServerApi, WorkerContainer, WorkerRegistration,
};
use crate::push::key_cache::KeyCache;
use crate::push::key_codec;
use crate::push::permission::PermissionGate;
use crate::push::registrar::WorkerRegistrar;
use crate::push::session::Session;
use crate::types::push::{
    EncryptionKey, PushSubscriptionDescriptor, SubscribeOptions, SubscriptionKeys,
    SubscriptionState,
};

use serde_json::json;
use std::cell::RefCell;
use tracing::{debug, error, info, warn};

/// Page-side push enrollment: registers the worker, asks for permission,
/// subscribes with the server key and keeps the server informed.
///
/// Overlapping calls are allowed. Every cached step is idempotent and the
/// session keeps whichever value was written last.
pub struct SubscriptionManager<C, P, A>
where
    C: WorkerContainer,
{
    registrar: WorkerRegistrar<C>,
    gate: PermissionGate<P>,
    keys: KeyCache<A>,
    api: A,
    subscribe_endpoint: String,
    unsubscribe_endpoint: String,
    session: Session<C::Registration>,
    state: RefCell<SubscriptionState>,
}

impl<C, P, A> SubscriptionManager<C, P, A>
where
    C: WorkerContainer,
    P: NotificationPermissions,
    A: ServerApi,
{
    pub fn new(container: C, permissions: P, api: A, config: &ClientConfig) -> Self {
        Self {
            registrar: WorkerRegistrar::new(container, config.worker_script.clone()),
            gate: PermissionGate::new(permissions),
            keys: KeyCache::new(api.clone(), config.key_endpoint.clone()),
            api,
            subscribe_endpoint: config.subscribe_endpoint.clone(),
            unsubscribe_endpoint: config.unsubscribe_endpoint.clone(),
            session: Session::new(),
            state: RefCell::new(SubscriptionState::Idle),
        }
    }

    pub fn state(&self) -> SubscriptionState {
        self.state.borrow().clone()
    }

    pub fn session(&self) -> &Session<C::Registration> {
        &self.session
    }

    /// Drops everything cached for the current page load.
    pub fn reload(&self) {
        self.session.reset();
        self.transition(SubscriptionState::Idle);
    }

    pub fn is_supported(&self) -> bool {
        let container = self.registrar.container();
        container.is_supported() && container.supports_push()
    }

    pub async fn request_permission(&self) -> bool {
        self.gate.request_permission(&self.session).await
    }

    /// Registers the worker early on page load when push is available.
    pub async fn initialize(&self) {
        if !self.is_supported() {
            debug!("push notifications not supported; skipping worker registration");
            return;
        }
        if let Err(err) = self.registrar.ensure_registered(&self.session).await {
            warn!("service worker registration on load failed: {err}");
        }
    }

    pub async fn subscribe(&self) -> Result<PushSubscriptionDescriptor, PushError> {
        info!("starting push subscription");
        match self.run_subscribe().await {
            Ok(descriptor) => {
                self.transition(SubscriptionState::Subscribed);
                info!(endpoint = %short_endpoint(&descriptor.endpoint), "subscribed to push notifications");
                Ok(descriptor)
            }
            Err(err) => {
                error!("push subscription failed: {err}");
                self.transition(SubscriptionState::Failed(err.to_string()));
                Err(err)
            }
        }
    }

    async fn run_subscribe(&self) -> Result<PushSubscriptionDescriptor, PushError> {
        self.transition(SubscriptionState::Registering);
        let registration = self.registrar.ensure_registered(&self.session).await?;

        self.transition(SubscriptionState::RequestingPermission);
        if !self.gate.request_permission(&self.session).await {
            return Err(PushError::PermissionDenied);
        }

        self.transition(SubscriptionState::FetchingKey);
        let key = self.keys.get_public_key(&self.session).await?;
        let application_server_key = key_codec::decode_public_key(key.as_str()).map_err(|err| {
            KeyFetchError::new(format!("the server sent an invalid VAPID public key ({err})"))
        })?;

        self.transition(SubscriptionState::Subscribing);
        let subscription = registration
            .subscribe(SubscribeOptions {
                user_visible_only: true,
                application_server_key,
            })
            .await
            .map_err(|err| PushError::PlatformSubscription(format!("push subscription failed: {err}")))?;
        let endpoint = subscription.endpoint();
        debug!(endpoint = %short_endpoint(&endpoint), "push subscription created");

        let (Some(p256dh), Some(auth)) = (
            subscription.key(EncryptionKey::P256dh),
            subscription.key(EncryptionKey::Auth),
        ) else {
            return Err(PushError::PlatformSubscription(
                "the push subscription did not provide its encryption keys".to_string(),
            ));
        };
        let descriptor = PushSubscriptionDescriptor {
            endpoint,
            keys: SubscriptionKeys {
                p256dh: key_codec::encode_secret(&p256dh),
                auth: key_codec::encode_secret(&auth),
            },
        };

        self.transition(SubscriptionState::SyncingServer);
        self.sync_server(&descriptor).await?;
        Ok(descriptor)
    }

    async fn sync_server(&self, descriptor: &PushSubscriptionDescriptor) -> Result<(), PushError> {
        let body = serde_json::to_value(descriptor)
            .map_err(|err| PushError::ServerSync(format!("could not encode subscription: {err}")))?;
        let response = self
            .api
            .post_json(&self.subscribe_endpoint, &body)
            .await
            .map_err(|err| PushError::ServerSync(format!("could not reach the server: {err}")))?;
        debug!(status = response.status, "server answered subscription");

        if response.is_success() {
            return Ok(());
        }
        Err(PushError::ServerSync(
            response
                .message(&["error"])
                .unwrap_or_else(|| format!("server error {}", response.status)),
        ))
    }

    /// Revokes the current subscription. The server is told afterwards on a
    /// best-effort basis; if that fails its record goes stale.
    ///
    /// Only a revocation error counts as failure. A platform answer of `false`
    /// still clears the server record.
    pub async fn unsubscribe(&self) -> bool {
        let Some(registration) = self.session.registration() else {
            debug!("no service worker registration; nothing to unsubscribe");
            return false;
        };

        let subscription = match registration.subscription().await {
            Ok(Some(subscription)) => subscription,
            Ok(None) => {
                debug!("no active push subscription");
                return false;
            }
            Err(err) => {
                error!("could not look up push subscription: {err}");
                return false;
            }
        };

        self.transition(SubscriptionState::Unsubscribing);
        let endpoint = subscription.endpoint();
        match subscription.unsubscribe().await {
            Ok(true) => {}
            // Already gone on the platform side; the server record still has to go.
            Ok(false) => {
                debug!(endpoint = %short_endpoint(&endpoint), "platform reported nothing to revoke");
            }
            Err(err) => {
                error!("revoking push subscription failed: {err}");
                self.transition(SubscriptionState::Failed(err.to_string()));
                return false;
            }
        }

        self.notify_server_unsubscribed(&endpoint).await;
        self.transition(SubscriptionState::Idle);
        info!(endpoint = %short_endpoint(&endpoint), "unsubscribed from push notifications");
        true
    }

    async fn notify_server_unsubscribed(&self, endpoint: &str) {
        let body = json!({ "endpoint": endpoint });
        match self.api.post_json(&self.unsubscribe_endpoint, &body).await {
            Ok(response) if response.is_success() => {}
            Ok(response) => {
                warn!(status = response.status, "server did not acknowledge unsubscribe; its record is now stale");
            }
            Err(err) => {
                warn!("could not notify server of unsubscribe; its record is now stale: {err}");
            }
        }
    }

    /// Status check for rendering. Registers the worker if needed and never fails.
    pub async fn is_subscribed(&self) -> bool {
        if !self.is_supported() {
            return false;
        }

        let registration = match self.registrar.ensure_registered(&self.session).await {
            Ok(registration) => registration,
            Err(err) => {
                warn!("cannot check push subscription without a service worker: {err}");
                return false;
            }
        };

        match registration.subscription().await {
            Ok(subscription) => subscription.is_some(),
            Err(err) => {
                error!("checking push subscription failed: {err}");
                false
            }
        }
    }

    fn transition(&self, next: SubscriptionState) {
        let previous = self.state.replace(next.clone());
        debug!(from = %previous, to = %next, "subscription state changed");
    }
}

fn short_endpoint(endpoint: &str) -> &str {
    match endpoint.char_indices().nth(50) {
        Some((index, _)) => &endpoint[..index],
        None => endpoint,
    }
}
