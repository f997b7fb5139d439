//! Browser bindings for the ports, and the functions the page script and the
//! service worker call into.
//!
//! Page:   `new PushNotifications(config?)` exposing `subscribe`, `unsubscribe`,
//!         `isSubscribed`, `isSupported`, `requestPermission` and `initialize`.
//! Worker: `handlePush(event, config?)` and `handleNotificationClick(event, config?)`.

use std::pin::Pin;
use std::rc::Rc;

use js_sys::{Array, Promise, Reflect, Uint8Array};
use serde::Serialize;
use tracing::warn;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{JsFuture, future_to_promise};
use web_sys::{
    Client, ClientQueryOptions, ClientType, Notification, NotificationEvent,
    NotificationPermission, PushEncryptionKeyName, PushEvent, PushSubscription,
    PushSubscriptionOptionsInit, ServiceWorkerGlobalScope, ServiceWorkerRegistration, Window,
    WindowClient,
};

use crate::adapters::HttpServerApi;
use crate::config::{ClientConfig, NotificationConfig};
use crate::ports;
use crate::push::SubscriptionManager;
use crate::types::notification::NotificationOptions;
use crate::types::push::{EncryptionKey, PermissionState, SubscribeOptions};
use crate::worker::NotificationHandler;

type LocalFut<'a, T> = Pin<Box<dyn Future<Output = Result<T, JsError>> + 'a>>;

/// A rejected promise or thrown exception, reduced to its message.
#[derive(Debug, Clone)]
pub struct JsError(String);

impl std::fmt::Display for JsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<JsValue> for JsError {
    fn from(value: JsValue) -> Self {
        if let Some(error) = value.dyn_ref::<js_sys::Error>() {
            return JsError(String::from(error.message()));
        }
        JsError(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

fn has_property(target: &JsValue, name: &str) -> bool {
    Reflect::has(target, &JsValue::from_str(name)).unwrap_or(false)
}

fn to_js_error(err: &impl std::fmt::Display) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}

#[derive(Debug, Clone)]
pub struct BrowserWorkerContainer {
    window: Window,
}

impl BrowserWorkerContainer {
    pub fn new(window: Window) -> Self {
        Self { window }
    }
}

impl ports::WorkerContainer for BrowserWorkerContainer {
    type Registration = BrowserRegistration;
    type Error = JsError;
    type Register<'a>
        = LocalFut<'a, BrowserRegistration>
    where
        Self: 'a;

    fn is_supported(&self) -> bool {
        has_property(&self.window.navigator(), "serviceWorker")
    }

    fn supports_push(&self) -> bool {
        has_property(&self.window, "PushManager")
    }

    fn register<'a>(&'a self, script_path: &'a str) -> Self::Register<'a> {
        Box::pin(async move {
            let promise = self.window.navigator().service_worker().register(script_path);
            let registration = JsFuture::from(promise).await?;
            Ok(BrowserRegistration(registration.unchecked_into()))
        })
    }
}

#[derive(Debug, Clone)]
pub struct BrowserRegistration(ServiceWorkerRegistration);

impl ports::WorkerRegistration for BrowserRegistration {
    type Subscription = BrowserSubscription;
    type Error = JsError;
    type Subscribe<'a>
        = LocalFut<'a, BrowserSubscription>
    where
        Self: 'a;
    type Lookup<'a>
        = LocalFut<'a, Option<BrowserSubscription>>
    where
        Self: 'a;

    fn subscribe(&self, options: SubscribeOptions) -> Self::Subscribe<'_> {
        Box::pin(async move {
            let init = PushSubscriptionOptionsInit::new();
            init.set_user_visible_only(options.user_visible_only);
            let key: JsValue = Uint8Array::from(options.application_server_key.as_slice()).into();
            init.set_application_server_key(Some(&key));
            let promise = self.0.push_manager()?.subscribe_with_options(&init)?;
            let subscription = JsFuture::from(promise).await?;
            Ok(BrowserSubscription(subscription.unchecked_into()))
        })
    }

    fn subscription(&self) -> Self::Lookup<'_> {
        Box::pin(async move {
            let promise = self.0.push_manager()?.get_subscription()?;
            let value = JsFuture::from(promise).await?;
            if value.is_null() || value.is_undefined() {
                return Ok(None);
            }
            Ok(Some(BrowserSubscription(value.unchecked_into())))
        })
    }
}

#[derive(Debug, Clone)]
pub struct BrowserSubscription(PushSubscription);

impl ports::PlatformSubscription for BrowserSubscription {
    type Error = JsError;
    type Unsubscribe<'a>
        = LocalFut<'a, bool>
    where
        Self: 'a;

    fn endpoint(&self) -> String {
        self.0.endpoint()
    }

    fn key(&self, name: EncryptionKey) -> Option<Vec<u8>> {
        let name = match name {
            EncryptionKey::P256dh => PushEncryptionKeyName::P256dh,
            EncryptionKey::Auth => PushEncryptionKeyName::Auth,
        };
        let buffer = self.0.get_key(name).ok().flatten()?;
        Some(Uint8Array::new(&buffer).to_vec())
    }

    fn unsubscribe(&self) -> Self::Unsubscribe<'_> {
        Box::pin(async move {
            let revoked = JsFuture::from(self.0.unsubscribe()?).await?;
            Ok(revoked.as_bool().unwrap_or(false))
        })
    }
}

#[derive(Debug, Clone)]
pub struct BrowserPermissions {
    window: Window,
}

impl BrowserPermissions {
    pub fn new(window: Window) -> Self {
        Self { window }
    }
}

impl ports::NotificationPermissions for BrowserPermissions {
    type Prompt<'a>
        = Pin<Box<dyn Future<Output = PermissionState> + 'a>>
    where
        Self: 'a;

    fn is_supported(&self) -> bool {
        has_property(&self.window, "Notification")
    }

    fn current(&self) -> PermissionState {
        match Notification::permission() {
            NotificationPermission::Granted => PermissionState::Granted,
            NotificationPermission::Denied => PermissionState::Denied,
            _ => PermissionState::NotYetAsked,
        }
    }

    fn prompt(&self) -> Self::Prompt<'_> {
        Box::pin(async move {
            let answer = match Notification::request_permission() {
                Ok(promise) => JsFuture::from(promise).await,
                Err(err) => Err(err),
            };
            match answer {
                Ok(value) => PermissionState::from_platform(&value.as_string().unwrap_or_default()),
                Err(err) => {
                    warn!("notification permission prompt failed: {}", JsError::from(err));
                    PermissionState::NotYetAsked
                }
            }
        })
    }
}

/// The service worker's global scope, serving as both notification surface
/// and window client list.
#[derive(Debug, Clone)]
pub struct BrowserWorkerScope {
    scope: ServiceWorkerGlobalScope,
}

impl BrowserWorkerScope {
    pub fn current() -> Self {
        Self {
            scope: js_sys::global().unchecked_into(),
        }
    }
}

impl ports::NotificationSurface for BrowserWorkerScope {
    type Error = JsError;
    type Show<'a>
        = LocalFut<'a, ()>
    where
        Self: 'a;

    fn show<'a>(&'a self, title: &'a str, options: &'a NotificationOptions) -> Self::Show<'a> {
        Box::pin(async move {
            let init = web_sys::NotificationOptions::new();
            init.set_body(&options.body);
            init.set_icon(&options.icon);
            init.set_badge(&options.badge);
            init.set_tag(&options.tag);
            init.set_require_interaction(options.require_interaction);
            let vibrate: Array = options.vibrate.iter().map(|ms| JsValue::from(*ms)).collect();
            init.set_vibrate(&vibrate);
            let data = options
                .data
                .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
                .map_err(|err| JsError(err.to_string()))?;
            init.set_data(&data);

            let promise = self
                .scope
                .registration()
                .show_notification_with_options(title, &init)?;
            JsFuture::from(promise).await?;
            Ok(())
        })
    }
}

impl ports::WindowClients for BrowserWorkerScope {
    type Client = BrowserWindow;
    type Error = JsError;
    type Match<'a>
        = LocalFut<'a, Vec<BrowserWindow>>
    where
        Self: 'a;
    type Open<'a>
        = LocalFut<'a, ()>
    where
        Self: 'a;

    fn windows(&self) -> Self::Match<'_> {
        Box::pin(async move {
            let query = ClientQueryOptions::new();
            query.set_type(ClientType::Window);
            query.set_include_uncontrolled(true);
            let list = JsFuture::from(self.scope.clients().match_all_with_options(&query)).await?;
            Ok(Array::from(&list)
                .iter()
                .map(|client| BrowserWindow(client.unchecked_into()))
                .collect())
        })
    }

    fn can_open_windows(&self) -> bool {
        has_property(&self.scope.clients(), "openWindow")
    }

    fn open_window<'a>(&'a self, url: &'a str) -> Self::Open<'a> {
        Box::pin(async move {
            JsFuture::from(self.scope.clients().open_window(url)).await?;
            Ok(())
        })
    }
}

#[derive(Debug, Clone)]
pub struct BrowserWindow(Client);

impl ports::WindowClient for BrowserWindow {
    type Error = JsError;
    type Focus<'a>
        = LocalFut<'a, ()>
    where
        Self: 'a;

    fn url(&self) -> String {
        self.0.url()
    }

    fn can_focus(&self) -> bool {
        self.0.dyn_ref::<WindowClient>().is_some()
    }

    fn focus(&self) -> Self::Focus<'_> {
        Box::pin(async move {
            let window: &WindowClient = self.0.unchecked_ref();
            JsFuture::from(window.focus()?).await?;
            Ok(())
        })
    }
}

impl ports::ActivatedNotification for Notification {
    fn close(&self) {
        Notification::close(self);
    }
}

type BrowserManager = SubscriptionManager<BrowserWorkerContainer, BrowserPermissions, HttpServerApi>;

#[wasm_bindgen]
pub struct PushNotifications {
    manager: Rc<BrowserManager>,
}

#[wasm_bindgen]
impl PushNotifications {
    /// `config` is an optional object with the `ClientConfig` fields.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<PushNotifications, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window available"))?;
        let config: ClientConfig = if config.is_undefined() || config.is_null() {
            ClientConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)?
        };
        let origin = window.location().origin()?;
        let api = HttpServerApi::new(&origin).map_err(|err| to_js_error(&err))?;
        let manager = SubscriptionManager::new(
            BrowserWorkerContainer::new(window.clone()),
            BrowserPermissions::new(window),
            api,
            &config,
        );
        Ok(Self {
            manager: Rc::new(manager),
        })
    }

    #[wasm_bindgen(js_name = isSupported)]
    pub fn is_supported(&self) -> bool {
        self.manager.is_supported()
    }

    /// Resolves to `{ endpoint, keys: { p256dh, auth } }`; rejects with an
    /// `Error` whose message can be shown to the user.
    pub fn subscribe(&self) -> Promise {
        let manager = Rc::clone(&self.manager);
        future_to_promise(async move {
            let descriptor = manager.subscribe().await.map_err(|err| to_js_error(&err))?;
            Ok(serde_wasm_bindgen::to_value(&descriptor)?)
        })
    }

    pub fn unsubscribe(&self) -> Promise {
        let manager = Rc::clone(&self.manager);
        future_to_promise(async move { Ok(JsValue::from_bool(manager.unsubscribe().await)) })
    }

    #[wasm_bindgen(js_name = isSubscribed)]
    pub fn is_subscribed(&self) -> Promise {
        let manager = Rc::clone(&self.manager);
        future_to_promise(async move { Ok(JsValue::from_bool(manager.is_subscribed().await)) })
    }

    #[wasm_bindgen(js_name = requestPermission)]
    pub fn request_permission(&self) -> Promise {
        let manager = Rc::clone(&self.manager);
        future_to_promise(async move { Ok(JsValue::from_bool(manager.request_permission().await)) })
    }

    pub fn initialize(&self) -> Promise {
        let manager = Rc::clone(&self.manager);
        future_to_promise(async move {
            manager.initialize().await;
            Ok(JsValue::UNDEFINED)
        })
    }
}

fn worker_handler(
    config: JsValue,
) -> Result<NotificationHandler<BrowserWorkerScope, BrowserWorkerScope>, JsValue> {
    let config: NotificationConfig = if config.is_undefined() || config.is_null() {
        NotificationConfig::default()
    } else {
        serde_wasm_bindgen::from_value(config)?
    };
    let scope = BrowserWorkerScope::current();
    Ok(NotificationHandler::new(scope.clone(), scope, config))
}

#[wasm_bindgen(js_name = handlePush)]
pub fn handle_push(event: PushEvent, config: JsValue) -> Result<(), JsValue> {
    let handler = worker_handler(config)?;
    let raw = event.data().map(|data| data.text());
    let promise = future_to_promise(async move {
        handler
            .on_push(raw.as_deref())
            .await
            .map_err(|err| to_js_error(&err))?;
        Ok(JsValue::UNDEFINED)
    });
    event.wait_until(&promise)
}

#[wasm_bindgen(js_name = handleNotificationClick)]
pub fn handle_notification_click(event: NotificationEvent, config: JsValue) -> Result<(), JsValue> {
    let handler = worker_handler(config)?;
    let notification = event.notification();
    let promise = future_to_promise(async move {
        handler
            .on_notification_click(&notification)
            .await
            .map_err(|err| to_js_error(&err))?;
        Ok(JsValue::UNDEFINED)
    });
    event.wait_until(&promise)
}
