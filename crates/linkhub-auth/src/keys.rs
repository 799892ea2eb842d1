//! HMAC keyring with key-id based rotation.

use std::collections::HashMap;
use std::fmt;

use jsonwebtoken::{DecodingKey, EncodingKey};

use linkhub_core::config::AuthConfig;
use linkhub_core::error::AppError;

/// Signing keys loaded once at startup.
///
/// New tokens are signed with the active key and carry its id in the JWT
/// `kid` header. Verification looks the key up by that id, so retired keys
/// can stay in the ring until tokens they signed have expired.
#[derive(Clone)]
pub struct SigningKeys {
    active_kid: String,
    encoding: EncodingKey,
    decoding: HashMap<String, DecodingKey>,
}

impl fmt::Debug for SigningKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKeys")
            .field("active_kid", &self.active_kid)
            .field("kids", &self.decoding.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl SigningKeys {
    /// Build the keyring from configuration.
    pub fn from_config(config: &AuthConfig) -> Result<Self, AppError> {
        let active = config.signing_keys.get(&config.active_key_id).ok_or_else(|| {
            AppError::configuration(format!(
                "Active signing key '{}' is not in the keyring",
                config.active_key_id
            ))
        })?;

        let decoding = config
            .signing_keys
            .iter()
            .map(|(kid, secret)| (kid.clone(), DecodingKey::from_secret(secret.as_bytes())))
            .collect();

        Ok(Self {
            active_kid: config.active_key_id.clone(),
            encoding: EncodingKey::from_secret(active.as_bytes()),
            decoding,
        })
    }

    /// Id of the key new tokens are signed with.
    pub fn active_kid(&self) -> &str {
        &self.active_kid
    }

    pub(crate) fn encoding_key(&self) -> &EncodingKey {
        &self.encoding
    }

    pub(crate) fn decoding_key(&self, kid: &str) -> Option<&DecodingKey> {
        self.decoding.get(kid)
    }
}
