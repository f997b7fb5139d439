//! Conversions between the wire forms of push keys and the raw bytes the
//! platform push API works with.

use crate::error::KeyDecodeError;

use base64::{STANDARD, URL_SAFE_NO_PAD, decode_config, encode_config};

/// Length of an uncompressed SEC1 P-256 point.
pub const UNCOMPRESSED_P256_LEN: usize = 65;

/// Decodes a base64url application key (padded or not) into raw bytes.
pub fn decode_public_key(key: &str) -> Result<Vec<u8>, KeyDecodeError> {
    let key = key.trim();
    if key.is_empty() {
        return Err(KeyDecodeError::Empty);
    }

    let padding = (4 - key.len() % 4) % 4;
    let mut standard: String = key
        .chars()
        .map(|ch| match ch {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect();
    standard.extend(std::iter::repeat_n('=', padding));

    decode_config(&standard, STANDARD).map_err(|err| KeyDecodeError::Malformed(err.to_string()))
}

pub fn encode_public_key(bytes: &[u8]) -> String {
    encode_config(bytes, URL_SAFE_NO_PAD)
}

/// Subscription secrets travel to the server as padded standard base64.
pub fn encode_secret(bytes: &[u8]) -> String {
    encode_config(bytes, STANDARD)
}

pub fn is_uncompressed_p256_point(bytes: &[u8]) -> bool {
    bytes.len() == UNCOMPRESSED_P256_LEN && bytes[0] == 0x04
}
