use serde::Serialize;
use serde_json::Value as JsonValue;

/// Inbound push message after parsing. `data` keeps the whole payload so the
/// notification can hand it back on click.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationPayload {
    pub title: String,
    pub body: String,
    pub data: JsonValue,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationOptions {
    pub body: String,
    pub icon: String,
    pub badge: String,
    pub vibrate: Vec<u32>,
    pub data: JsonValue,
    pub tag: String,
    pub require_interaction: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedNotification {
    pub title: String,
    #[serde(flatten)]
    pub options: NotificationOptions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    Focused,
    Opened,
    Ignored,
}
