use crate::error::KeyFetchError;
use crate::ports::ServerApi;
use crate::push::session::Session;
use crate::types::api::PublicKeyBody;
use crate::types::push::VapidPublicKey;

use serde::Deserialize;
use tracing::{debug, error, info};

/// Fetches the server's VAPID key and keeps it in the session.
#[derive(Debug, Clone)]
pub struct KeyCache<A> {
    api: A,
    endpoint: String,
}

impl<A: ServerApi> KeyCache<A> {
    pub fn new(api: A, endpoint: impl Into<String>) -> Self {
        Self {
            api,
            endpoint: endpoint.into(),
        }
    }

    pub async fn get_public_key<R>(
        &self,
        session: &Session<R>,
    ) -> Result<VapidPublicKey, KeyFetchError> {
        if let Some(key) = session.public_key() {
            debug!("using cached VAPID public key");
            return Ok(key);
        }

        let response = self.api.get(&self.endpoint).await.map_err(|err| {
            error!(endpoint = %self.endpoint, "VAPID public key request failed: {err}");
            KeyFetchError::fallback()
        })?;

        let public_key = if response.is_success() {
            response
                .body
                .as_ref()
                .and_then(|body| PublicKeyBody::deserialize(body).ok())
                .and_then(|body| body.public_key)
                .filter(|key| !key.trim().is_empty())
        } else {
            None
        };

        match public_key {
            Some(key) => {
                info!("VAPID public key obtained");
                let key = VapidPublicKey::new(key.trim());
                session.store_public_key(key.clone());
                Ok(key)
            }
            None => {
                let err = response
                    .message(&["message", "error"])
                    .map(KeyFetchError::new)
                    .unwrap_or_else(KeyFetchError::fallback);
                error!(status = response.status, "server did not provide a VAPID public key: {err}");
                Err(err)
            }
        }
    }
}
