//! Runs inside the service worker: turns push messages into notifications and
//! brings the app forward when one is clicked.

use crate::config::NotificationConfig;
use crate::error::WorkerError;
use crate::ports::{ActivatedNotification, NotificationSurface, WindowClient, WindowClients};
use crate::types::notification::{
    ClickOutcome, NotificationOptions, NotificationPayload, ResolvedNotification,
};

use serde_json::{Map, Value as JsonValue};
use tracing::{debug, info};
use url::Url;

#[derive(Debug, Clone)]
pub struct NotificationHandler<S, W> {
    surface: S,
    clients: W,
    config: NotificationConfig,
}

impl<S, W> NotificationHandler<S, W>
where
    S: NotificationSurface,
    W: WindowClients,
{
    pub fn new(surface: S, clients: W, config: NotificationConfig) -> Self {
        Self {
            surface,
            clients,
            config,
        }
    }

    pub fn config(&self) -> &NotificationConfig {
        &self.config
    }

    /// Shows a notification for the push message text, whatever shape it has.
    pub async fn on_push(&self, raw: Option<&str>) -> Result<ResolvedNotification, WorkerError> {
        let notification = resolve(parse_payload(raw, &self.config), &self.config);
        self.surface
            .show(&notification.title, &notification.options)
            .await
            .map_err(|err| WorkerError::Display(err.to_string()))?;
        info!(title = %notification.title, "notification displayed");
        Ok(notification)
    }

    /// Closes the notification, then focuses an open window at the root path
    /// or opens one.
    pub async fn on_notification_click<N: ActivatedNotification>(
        &self,
        notification: &N,
    ) -> Result<ClickOutcome, WorkerError> {
        notification.close();

        let windows = self
            .clients
            .windows()
            .await
            .map_err(|err| WorkerError::Clients(err.to_string()))?;
        let root = windows
            .iter()
            .find(|window| window.can_focus() && is_root_url(&window.url(), &self.config.root_path));
        if let Some(window) = root {
            window
                .focus()
                .await
                .map_err(|err| WorkerError::Clients(err.to_string()))?;
            debug!("focused existing window");
            return Ok(ClickOutcome::Focused);
        }

        if !self.clients.can_open_windows() {
            return Ok(ClickOutcome::Ignored);
        }
        self.clients
            .open_window(&self.config.root_path)
            .await
            .map_err(|err| WorkerError::Clients(err.to_string()))?;
        debug!(path = %self.config.root_path, "opened new window");
        Ok(ClickOutcome::Opened)
    }
}

/// Structured payloads are JSON objects; anything else is shown as plain text
/// under the default title.
pub fn parse_payload(raw: Option<&str>, config: &NotificationConfig) -> NotificationPayload {
    let Some(raw) = raw else {
        return NotificationPayload {
            title: config.default_title.clone(),
            body: config.default_body.clone(),
            data: JsonValue::Object(Map::new()),
        };
    };

    match serde_json::from_str::<JsonValue>(raw) {
        Ok(JsonValue::Object(fields)) => NotificationPayload {
            title: text_field(&fields, "title").unwrap_or_else(|| config.default_title.clone()),
            body: text_field(&fields, "body").unwrap_or_else(|| config.default_body.clone()),
            data: JsonValue::Object(fields),
        },
        _ => {
            debug!("push payload is not a JSON object; showing it as text");
            let body = if raw.is_empty() {
                config.default_body.clone()
            } else {
                raw.to_string()
            };
            let mut data = Map::new();
            data.insert("title".into(), config.default_title.clone().into());
            data.insert("body".into(), body.clone().into());
            NotificationPayload {
                title: config.default_title.clone(),
                body,
                data: JsonValue::Object(data),
            }
        }
    }
}

pub fn resolve(payload: NotificationPayload, config: &NotificationConfig) -> ResolvedNotification {
    ResolvedNotification {
        title: payload.title,
        options: NotificationOptions {
            body: payload.body,
            icon: config.icon.clone(),
            badge: config.badge.clone(),
            vibrate: config.vibrate.clone(),
            data: payload.data,
            tag: config.tag.clone(),
            require_interaction: false,
        },
    }
}

/// Scalars are shown as their text; empty strings, zero, `false` and
/// containers fall back to the default.
fn text_field(fields: &Map<String, JsonValue>, name: &str) -> Option<String> {
    match fields.get(name)? {
        JsonValue::String(text) if !text.is_empty() => Some(text.clone()),
        JsonValue::Number(number) if number.as_f64() != Some(0.0) => Some(number.to_string()),
        JsonValue::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}

/// Compares only the path; client URLs are usually absolute.
fn is_root_url(url: &str, root_path: &str) -> bool {
    Url::parse("http://localhost/")
        .and_then(|base| base.join(url))
        .map(|url| url.path() == root_path)
        .unwrap_or(false)
}
