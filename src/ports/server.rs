use crate::types::api::ApiResponse;

use serde_json::Value as JsonValue;

/// The server's push endpoints. Non-2xx answers are responses, not errors;
/// `Error` is for transport failures only.
pub trait ServerApi: Clone + 'static {
    type Error: std::fmt::Display + 'static;
    type Fut<'a>: Future<Output = Result<ApiResponse, Self::Error>> + 'a
    where
        Self: 'a;

    fn get<'a>(&'a self, path: &'a str) -> Self::Fut<'a>;
    fn post_json<'a>(&'a self, path: &'a str, body: &'a JsonValue) -> Self::Fut<'a>;
}
