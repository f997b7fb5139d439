use serde::Deserialize;
use serde_json::Value as JsonValue;

/// What the push endpoints answered: the status and the JSON body, if it had one.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Option<JsonValue>,
}

impl ApiResponse {
    pub fn new(status: u16, body: Option<JsonValue>) -> Self {
        Self { status, body }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Returns the first non-empty string found under `fields`, in order.
    pub fn message(&self, fields: &[&str]) -> Option<String> {
        let body = self.body.as_ref()?;
        fields
            .iter()
            .filter_map(|field| body.get(*field).and_then(JsonValue::as_str))
            .map(str::trim)
            .find(|message| !message.is_empty())
            .map(str::to_string)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct PublicKeyBody {
    #[serde(rename = "publicKey")]
    pub(crate) public_key: Option<String>,
}
