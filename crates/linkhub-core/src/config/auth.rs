//! Session signing configuration.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Minimum accepted length of an HMAC signing secret, in bytes.
pub const MIN_SECRET_BYTES: usize = 32;

/// Session token and OAuth state signing configuration.
///
/// Secrets are never given defaults. They arrive through the config file
/// or `LINKHUB__AUTH__SIGNING_KEYS__<KID>` environment variables.
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Key id used to sign new tokens. Must exist in `signing_keys`.
    #[serde(default = "default_active_key_id")]
    pub active_key_id: String,
    /// Keyring of `kid -> HMAC secret`. Older keys stay here during rotation
    /// so tokens they signed still verify.
    #[serde(default, skip_serializing)]
    pub signing_keys: BTreeMap<String, String>,
    /// Session token lifetime in hours.
    #[serde(default = "default_session_ttl")]
    pub session_ttl_hours: u64,
    /// OAuth `state` parameter lifetime in minutes.
    #[serde(default = "default_state_ttl")]
    pub state_ttl_minutes: u64,
    /// Clock skew tolerance applied to `exp` and `nbf`, in seconds.
    #[serde(default)]
    pub leeway_seconds: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            active_key_id: default_active_key_id(),
            signing_keys: BTreeMap::new(),
            session_ttl_hours: default_session_ttl(),
            state_ttl_minutes: default_state_ttl(),
            leeway_seconds: 0,
        }
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("active_key_id", &self.active_key_id)
            .field("signing_keys", &self.signing_keys.keys().collect::<Vec<_>>())
            .field("session_ttl_hours", &self.session_ttl_hours)
            .field("state_ttl_minutes", &self.state_ttl_minutes)
            .field("leeway_seconds", &self.leeway_seconds)
            .finish()
    }
}

fn default_active_key_id() -> String {
    "primary".to_string()
}

fn default_session_ttl() -> u64 {
    24
}

fn default_state_ttl() -> u64 {
    10
}
