//! Social platform enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A third-party platform a user can sign in with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "social_platform", rename_all = "lowercase")]
pub enum Platform {
    /// Facebook / Instagram via the Graph API.
    Meta,
    /// TikTok.
    TikTok,
    /// Snapchat.
    Snapchat,
}

impl Platform {
    /// Every supported platform.
    pub const ALL: [Platform; 3] = [Self::Meta, Self::TikTok, Self::Snapchat];

    /// Lowercase slug used in routes, configuration keys and synthetic emails.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Meta => "meta",
            Self::TikTok => "tiktok",
            Self::Snapchat => "snapchat",
        }
    }

    /// Name shown to users.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Meta => "Meta",
            Self::TikTok => "TikTok",
            Self::Snapchat => "Snapchat",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Platform {
    type Err = linkhub_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "meta" | "facebook" => Ok(Self::Meta),
            "tiktok" => Ok(Self::TikTok),
            "snapchat" => Ok(Self::Snapchat),
            _ => Err(linkhub_core::AppError::not_found(format!(
                "Unknown platform: '{s}'. Expected one of: meta, tiktok, snapchat"
            ))),
        }
    }
}
