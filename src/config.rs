use serde::Deserialize;

/// Where the page finds the server endpoints and the worker script.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub key_endpoint: String,
    pub subscribe_endpoint: String,
    pub unsubscribe_endpoint: String,
    pub worker_script: String,
    pub notification: NotificationConfig,
}

/// Presentation of displayed notifications, read inside the worker.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    pub default_title: String,
    pub default_body: String,
    pub tag: String,
    pub icon: String,
    pub badge: String,
    pub vibrate: Vec<u32>,
    pub root_path: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            key_endpoint: "/api/push/vapid-public-key".to_string(),
            subscribe_endpoint: "/api/push/subscribe".to_string(),
            unsubscribe_endpoint: "/api/push/unsubscribe".to_string(),
            worker_script: "/static/sw.js".to_string(),
            notification: NotificationConfig::default(),
        }
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            default_title: "WodBooker".to_string(),
            default_body: "New notification".to_string(),
            tag: "wodbooker-notification".to_string(),
            icon: "/static/icon-192x192.png".to_string(),
            badge: "/static/badge-72x72.png".to_string(),
            vibrate: vec![200, 100, 200],
            root_path: "/".to_string(),
        }
    }
}

impl ClientConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }
}
