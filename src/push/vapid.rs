use base64::{URL_SAFE_NO_PAD, encode_config};
use jwt_simple::prelude::ES256KeyPair;
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use thiserror::Error;

use crate::push::key_codec;

pub const DEFAULT_CLAIM_EMAIL: &str = "mailto:admin@example.com";

/// Server-side VAPID credentials, both halves base64url without padding.
#[derive(Debug, Clone)]
pub struct VapidKeyPair {
    pub public_key: String,
    pub private_key: String,
}

/// Random scalars outside the curve order are redrawn; hitting this many in a
/// row means the generator is broken.
const MAX_SCALAR_DRAWS: usize = 8;

#[derive(Debug, Error)]
pub enum VapidError {
    #[error("web-push rejected the private key: {0}")]
    Signer(#[from] web_push::WebPushError),
    #[error("derived public key is not an uncompressed P-256 point")]
    InvalidPublicKey,
    #[error("no usable P-256 scalar after {0} draws")]
    Entropy(usize),
}

impl VapidKeyPair {
    pub fn generate() -> Result<Self, VapidError> {
        Self::generate_with(&mut OsRng)
    }

    pub fn generate_with<R: RngCore + CryptoRng>(rng: &mut R) -> Result<Self, VapidError> {
        let signing_key = (0..MAX_SCALAR_DRAWS)
            .find_map(|_| {
                let mut scalar = [0u8; 32];
                rng.fill_bytes(&mut scalar);
                ES256KeyPair::from_bytes(&scalar).ok()
            })
            .ok_or(VapidError::Entropy(MAX_SCALAR_DRAWS))?;
        Self::from_private_key(&encode_config(signing_key.to_bytes(), URL_SAFE_NO_PAD))
    }

    /// Rebuilds the pair from a stored private key. The public half is
    /// derived by web-push's signer, so the result is a pair the sending
    /// side can load.
    pub fn from_private_key(private_key: &str) -> Result<Self, VapidError> {
        let private_key = private_key.trim();
        let public_bytes =
            web_push::VapidSignatureBuilder::from_base64_no_sub(private_key, URL_SAFE_NO_PAD)?
                .get_public_key();
        if !key_codec::is_uncompressed_p256_point(&public_bytes) {
            return Err(VapidError::InvalidPublicKey);
        }

        Ok(Self {
            public_key: key_codec::encode_public_key(&public_bytes),
            private_key: private_key.to_string(),
        })
    }
}

pub fn generate_vapid_keys() -> Result<VapidKeyPair, VapidError> {
    VapidKeyPair::generate()
}

/// Normalizes a contact address into the `mailto:` claim form.
pub fn claim_email(contact: Option<&str>) -> String {
    match contact.map(str::trim).filter(|contact| !contact.is_empty()) {
        Some(contact) if contact.starts_with("mailto:") || contact.starts_with("https:") => {
            contact.to_string()
        }
        Some(contact) => format!("mailto:{contact}"),
        None => DEFAULT_CLAIM_EMAIL.to_string(),
    }
}
