//! Registry of enabled platform adapters.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use linkhub_core::config::ProvidersConfig;
use linkhub_core::error::AppError;
use linkhub_core::result::AppResult;
use linkhub_entity::Platform;

use crate::adapter::ProviderAdapter;
use crate::http::build_client;
use crate::meta::MetaAdapter;
use crate::snapchat::SnapchatAdapter;
use crate::tiktok::TikTokAdapter;

/// Adapters keyed by platform, fixed after startup.
#[derive(Debug, Clone, Default)]
pub struct ProviderRegistry {
    adapters: HashMap<Platform, Arc<dyn ProviderAdapter>>,
}

impl ProviderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an adapter for every platform with a configuration section.
    pub fn from_config(config: &ProvidersConfig) -> AppResult<Self> {
        let http = build_client(Duration::from_secs(config.timeout_seconds))?;
        let mut registry = Self::new();

        if let Some(meta) = &config.meta {
            registry.register(Arc::new(MetaAdapter::new(meta, http.clone())?));
        }
        if let Some(tiktok) = &config.tiktok {
            registry.register(Arc::new(TikTokAdapter::new(tiktok, http.clone())?));
        }
        if let Some(snapchat) = &config.snapchat {
            registry.register(Arc::new(SnapchatAdapter::new(snapchat, http)?));
        }

        info!(platforms = ?registry.platforms(), "Provider adapters registered");
        Ok(registry)
    }

    /// Add or replace the adapter for its platform.
    pub fn register(&mut self, adapter: Arc<dyn ProviderAdapter>) {
        self.adapters.insert(adapter.platform(), adapter);
    }

    /// Adapter for `platform`, or `NotFound` when it is disabled.
    pub fn get(&self, platform: Platform) -> AppResult<Arc<dyn ProviderAdapter>> {
        self.adapters.get(&platform).cloned().ok_or_else(|| {
            AppError::not_found(format!("Platform '{platform}' is not enabled"))
        })
    }

    /// Enabled platforms, in declaration order.
    pub fn platforms(&self) -> Vec<Platform> {
        Platform::ALL
            .into_iter()
            .filter(|p| self.adapters.contains_key(p))
            .collect()
    }
}
