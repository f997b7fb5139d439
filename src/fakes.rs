//! In-memory stand-ins for the platform, server and worker ports.

use crate::ports::{
    ActivatedNotification, NotificationPermissions, NotificationSurface, PlatformSubscription,
    ServerApi, WindowClient, WindowClients, WorkerContainer, WorkerRegistration,
};
use crate::types::api::ApiResponse;
use crate::types::notification::NotificationOptions;
use crate::types::push::{EncryptionKey, PermissionState, SubscribeOptions};

use serde_json::Value as JsonValue;
use std::cell::Cell;
use std::collections::{HashMap, VecDeque};
use std::future::{Ready, ready};
use std::pin::Pin;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct FakeError(pub(crate) String);

impl std::fmt::Display for FakeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone)]
pub(crate) struct FakeContainer {
    supported: bool,
    push_supported: bool,
    rejection: Option<String>,
    register_calls: Arc<Mutex<Vec<String>>>,
    registration: FakeRegistration,
}

impl Default for FakeContainer {
    fn default() -> Self {
        Self {
            supported: true,
            push_supported: true,
            rejection: None,
            register_calls: Arc::new(Mutex::new(Vec::new())),
            registration: FakeRegistration::default(),
        }
    }
}

impl FakeContainer {
    pub(crate) fn unsupported() -> Self {
        Self {
            supported: false,
            push_supported: false,
            ..Self::default()
        }
    }

    pub(crate) fn without_push() -> Self {
        Self {
            push_supported: false,
            ..Self::default()
        }
    }

    pub(crate) fn rejecting(reason: &str) -> Self {
        Self {
            rejection: Some(reason.to_string()),
            ..Self::default()
        }
    }

    pub(crate) fn register_calls(&self) -> Vec<String> {
        self.register_calls.lock().expect("register calls lock").clone()
    }

    pub(crate) fn registration(&self) -> FakeRegistration {
        self.registration.clone()
    }
}

impl WorkerContainer for FakeContainer {
    type Registration = FakeRegistration;
    type Error = FakeError;
    type Register<'a>
        = Ready<Result<FakeRegistration, FakeError>>
    where
        Self: 'a;

    fn is_supported(&self) -> bool {
        self.supported
    }

    fn supports_push(&self) -> bool {
        self.push_supported
    }

    fn register<'a>(&'a self, script_path: &'a str) -> Self::Register<'a> {
        self.register_calls
            .lock()
            .expect("register calls lock")
            .push(script_path.to_string());
        match &self.rejection {
            Some(reason) => ready(Err(FakeError(reason.clone()))),
            None => ready(Ok(self.registration.clone())),
        }
    }
}

#[derive(Default)]
struct PushState {
    issued: Option<FakeSubscription>,
    active: Option<FakeSubscription>,
    subscribe_calls: Vec<SubscribeOptions>,
    subscribe_rejection: Option<String>,
    lookup_failure: Option<String>,
}

#[derive(Clone, Default)]
pub(crate) struct FakeRegistration {
    state: Arc<Mutex<PushState>>,
}

impl FakeRegistration {
    /// The subscription the next `subscribe` call hands out.
    pub(crate) fn issue(&self, subscription: FakeSubscription) {
        self.state.lock().expect("push state lock").issued = Some(subscription);
    }

    pub(crate) fn reject_subscribe(&self, reason: &str) {
        self.state.lock().expect("push state lock").subscribe_rejection = Some(reason.to_string());
    }

    pub(crate) fn fail_lookups(&self, reason: &str) {
        self.state.lock().expect("push state lock").lookup_failure = Some(reason.to_string());
    }

    pub(crate) fn subscribe_calls(&self) -> Vec<SubscribeOptions> {
        self.state
            .lock()
            .expect("push state lock")
            .subscribe_calls
            .clone()
    }

    pub(crate) fn current(&self) -> Option<FakeSubscription> {
        self.state
            .lock()
            .expect("push state lock")
            .active
            .clone()
            .filter(|subscription| subscription.revocations() == 0)
    }

    pub(crate) fn id(&self) -> usize {
        Arc::as_ptr(&self.state) as usize
    }
}

impl WorkerRegistration for FakeRegistration {
    type Subscription = FakeSubscription;
    type Error = FakeError;
    type Subscribe<'a>
        = Ready<Result<FakeSubscription, FakeError>>
    where
        Self: 'a;
    type Lookup<'a>
        = Ready<Result<Option<FakeSubscription>, FakeError>>
    where
        Self: 'a;

    fn subscribe(&self, options: SubscribeOptions) -> Self::Subscribe<'_> {
        let mut state = self.state.lock().expect("push state lock");
        state.subscribe_calls.push(options);
        if let Some(reason) = &state.subscribe_rejection {
            return ready(Err(FakeError(reason.clone())));
        }
        match state.issued.clone() {
            Some(subscription) => {
                let fresh = subscription.renewed();
                state.active = Some(fresh.clone());
                ready(Ok(fresh))
            }
            None => ready(Err(FakeError("no subscription issued".to_string()))),
        }
    }

    fn subscription(&self) -> Self::Lookup<'_> {
        let lookup_failure = self
            .state
            .lock()
            .expect("push state lock")
            .lookup_failure
            .clone();
        match lookup_failure {
            Some(reason) => ready(Err(FakeError(reason))),
            None => ready(Ok(self.current())),
        }
    }
}

#[derive(Clone)]
pub(crate) struct FakeSubscription {
    endpoint: String,
    p256dh: Option<Vec<u8>>,
    auth: Option<Vec<u8>>,
    revocations: Arc<Mutex<usize>>,
    revocation_refused: bool,
}

impl FakeSubscription {
    pub(crate) fn new(endpoint: &str, p256dh: Option<Vec<u8>>, auth: Option<Vec<u8>>) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            p256dh,
            auth,
            revocations: Arc::new(Mutex::new(0)),
            revocation_refused: false,
        }
    }

    /// Revocation resolves to `false`, the way a browser reports a
    /// subscription that was already gone.
    pub(crate) fn refusing_revocation(self) -> Self {
        Self {
            revocation_refused: true,
            ..self
        }
    }

    fn renewed(&self) -> Self {
        Self {
            revocations: Arc::new(Mutex::new(0)),
            ..self.clone()
        }
    }

    pub(crate) fn revocations(&self) -> usize {
        *self.revocations.lock().expect("revocations lock")
    }
}

impl PlatformSubscription for FakeSubscription {
    type Error = FakeError;
    type Unsubscribe<'a>
        = Ready<Result<bool, FakeError>>
    where
        Self: 'a;

    fn endpoint(&self) -> String {
        self.endpoint.clone()
    }

    fn key(&self, name: EncryptionKey) -> Option<Vec<u8>> {
        match name {
            EncryptionKey::P256dh => self.p256dh.clone(),
            EncryptionKey::Auth => self.auth.clone(),
        }
    }

    fn unsubscribe(&self) -> Self::Unsubscribe<'_> {
        *self.revocations.lock().expect("revocations lock") += 1;
        ready(Ok(!self.revocation_refused))
    }
}

#[derive(Clone)]
pub(crate) struct FakePermissions {
    supported: bool,
    state: Arc<Mutex<PermissionState>>,
    answer: PermissionState,
    prompts: Arc<Mutex<usize>>,
}

impl FakePermissions {
    pub(crate) fn new(current: PermissionState, answer: PermissionState) -> Self {
        Self {
            supported: true,
            state: Arc::new(Mutex::new(current)),
            answer,
            prompts: Arc::new(Mutex::new(0)),
        }
    }

    pub(crate) fn unsupported() -> Self {
        Self {
            supported: false,
            ..Self::new(PermissionState::NotYetAsked, PermissionState::Granted)
        }
    }

    pub(crate) fn prompts(&self) -> usize {
        *self.prompts.lock().expect("prompts lock")
    }
}

impl NotificationPermissions for FakePermissions {
    type Prompt<'a>
        = Ready<PermissionState>
    where
        Self: 'a;

    fn is_supported(&self) -> bool {
        self.supported
    }

    fn current(&self) -> PermissionState {
        *self.state.lock().expect("permission state lock")
    }

    fn prompt(&self) -> Self::Prompt<'_> {
        *self.prompts.lock().expect("prompts lock") += 1;
        *self.state.lock().expect("permission state lock") = self.answer;
        ready(self.answer)
    }
}

type Canned = Result<ApiResponse, String>;

#[derive(Clone, Default)]
pub(crate) struct FakeServer {
    responses: Arc<Mutex<HashMap<String, Canned>>>,
    queued: Arc<Mutex<HashMap<String, VecDeque<Canned>>>>,
    calls: Arc<Mutex<Vec<(String, Option<JsonValue>)>>>,
}

impl FakeServer {
    pub(crate) fn set(&self, path: &str, response: Canned) {
        self.responses
            .lock()
            .expect("responses lock")
            .insert(path.to_string(), response);
    }

    pub(crate) fn respond(&self, path: &str, status: u16, body: JsonValue) {
        self.set(path, Ok(ApiResponse::new(status, Some(body))));
    }

    /// Answers the next request to `path` once, ahead of the standing response.
    pub(crate) fn respond_once(&self, path: &str, status: u16, body: JsonValue) {
        self.queued
            .lock()
            .expect("queued lock")
            .entry(path.to_string())
            .or_default()
            .push_back(Ok(ApiResponse::new(status, Some(body))));
    }

    pub(crate) fn respond_empty(&self, path: &str, status: u16) {
        self.set(path, Ok(ApiResponse::new(status, None)));
    }

    pub(crate) fn fail(&self, path: &str, reason: &str) {
        self.set(path, Err(reason.to_string()));
    }

    pub(crate) fn calls(&self) -> Vec<(String, Option<JsonValue>)> {
        self.calls.lock().expect("calls lock").clone()
    }

    fn answer(&self, path: &str, body: Option<JsonValue>) -> Ready<Result<ApiResponse, FakeError>> {
        self.calls
            .lock()
            .expect("calls lock")
            .push((path.to_string(), body));
        let queued = self
            .queued
            .lock()
            .expect("queued lock")
            .get_mut(path)
            .and_then(VecDeque::pop_front);
        let canned =
            queued.or_else(|| self.responses.lock().expect("responses lock").get(path).cloned());
        match canned {
            Some(Ok(response)) => ready(Ok(response)),
            Some(Err(reason)) => ready(Err(FakeError(reason))),
            None => ready(Ok(ApiResponse::new(404, None))),
        }
    }
}

impl ServerApi for FakeServer {
    type Error = FakeError;
    type Fut<'a>
        = Ready<Result<ApiResponse, FakeError>>
    where
        Self: 'a;

    fn get<'a>(&'a self, path: &'a str) -> Self::Fut<'a> {
        self.answer(path, None)
    }

    fn post_json<'a>(&'a self, path: &'a str, body: &'a JsonValue) -> Self::Fut<'a> {
        self.answer(path, Some(body.clone()))
    }
}

/// Suspends once before every answer so concurrent callers interleave.
#[derive(Clone, Default)]
pub(crate) struct YieldingServer {
    inner: FakeServer,
}

impl YieldingServer {
    pub(crate) fn new(inner: FakeServer) -> Self {
        Self { inner }
    }
}

impl ServerApi for YieldingServer {
    type Error = FakeError;
    type Fut<'a>
        = Pin<Box<dyn Future<Output = Result<ApiResponse, FakeError>> + 'a>>
    where
        Self: 'a;

    fn get<'a>(&'a self, path: &'a str) -> Self::Fut<'a> {
        Box::pin(async move {
            tokio::task::yield_now().await;
            self.inner.get(path).await
        })
    }

    fn post_json<'a>(&'a self, path: &'a str, body: &'a JsonValue) -> Self::Fut<'a> {
        Box::pin(async move {
            tokio::task::yield_now().await;
            self.inner.post_json(path, body).await
        })
    }
}

#[derive(Clone, Default)]
pub(crate) struct FakeSurface {
    shown: Arc<Mutex<Vec<(String, NotificationOptions)>>>,
    failure: Option<String>,
}

impl FakeSurface {
    pub(crate) fn failing(reason: &str) -> Self {
        Self {
            failure: Some(reason.to_string()),
            ..Self::default()
        }
    }

    pub(crate) fn shown(&self) -> Vec<(String, NotificationOptions)> {
        self.shown.lock().expect("shown lock").clone()
    }
}

impl NotificationSurface for FakeSurface {
    type Error = FakeError;
    type Show<'a>
        = Ready<Result<(), FakeError>>
    where
        Self: 'a;

    fn show<'a>(&'a self, title: &'a str, options: &'a NotificationOptions) -> Self::Show<'a> {
        if let Some(reason) = &self.failure {
            return ready(Err(FakeError(reason.clone())));
        }
        self.shown
            .lock()
            .expect("shown lock")
            .push((title.to_string(), options.clone()));
        ready(Ok(()))
    }
}

#[derive(Clone)]
pub(crate) struct FakeWindow {
    url: String,
    focusable: bool,
    focuses: Arc<Mutex<usize>>,
}

impl FakeWindow {
    pub(crate) fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            focusable: true,
            focuses: Arc::new(Mutex::new(0)),
        }
    }

    pub(crate) fn unfocusable(url: &str) -> Self {
        Self {
            focusable: false,
            ..Self::new(url)
        }
    }

    pub(crate) fn focuses(&self) -> usize {
        *self.focuses.lock().expect("focuses lock")
    }
}

impl WindowClient for FakeWindow {
    type Error = FakeError;
    type Focus<'a>
        = Ready<Result<(), FakeError>>
    where
        Self: 'a;

    fn url(&self) -> String {
        self.url.clone()
    }

    fn can_focus(&self) -> bool {
        self.focusable
    }

    fn focus(&self) -> Self::Focus<'_> {
        *self.focuses.lock().expect("focuses lock") += 1;
        ready(Ok(()))
    }
}

#[derive(Clone)]
pub(crate) struct FakeClients {
    windows: Vec<FakeWindow>,
    can_open: bool,
    opened: Arc<Mutex<Vec<String>>>,
}

impl FakeClients {
    pub(crate) fn new(windows: Vec<FakeWindow>) -> Self {
        Self {
            windows,
            can_open: true,
            opened: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub(crate) fn without_open_window(windows: Vec<FakeWindow>) -> Self {
        Self {
            can_open: false,
            ..Self::new(windows)
        }
    }

    pub(crate) fn opened(&self) -> Vec<String> {
        self.opened.lock().expect("opened lock").clone()
    }

    pub(crate) fn total_focuses(&self) -> usize {
        self.windows.iter().map(FakeWindow::focuses).sum()
    }
}

impl WindowClients for FakeClients {
    type Client = FakeWindow;
    type Error = FakeError;
    type Match<'a>
        = Ready<Result<Vec<FakeWindow>, FakeError>>
    where
        Self: 'a;
    type Open<'a>
        = Ready<Result<(), FakeError>>
    where
        Self: 'a;

    fn windows(&self) -> Self::Match<'_> {
        ready(Ok(self.windows.clone()))
    }

    fn can_open_windows(&self) -> bool {
        self.can_open
    }

    fn open_window<'a>(&'a self, url: &'a str) -> Self::Open<'a> {
        self.opened
            .lock()
            .expect("opened lock")
            .push(url.to_string());
        ready(Ok(()))
    }
}

#[derive(Default)]
pub(crate) struct FakeNotification {
    closed: Cell<bool>,
}

impl FakeNotification {
    pub(crate) fn is_closed(&self) -> bool {
        self.closed.get()
    }
}

impl ActivatedNotification for FakeNotification {
    fn close(&self) {
        self.closed.set(true);
    }
}
