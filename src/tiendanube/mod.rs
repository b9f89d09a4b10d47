//! Tienda Nube API client: product listing and price updates.
//!
//! Implements [`TargetCatalog`](crate::sync::TargetCatalog).

mod products;

use reqwest::Client;

use crate::pacing::Pacer;

const USER_AGENT: &str = "ML-TN-Sync/1.0";

/// Tienda Nube API client for one store.
pub struct TiendaNubeApi {
    pub(crate) client: Client,
    pub(crate) api_key: String,
    pub(crate) base_url: String,
    pub(crate) pacer: Pacer,
}

impl TiendaNubeApi {
    /// Creates a client for the store `store_id` using its access token.
    pub fn new(api_key: String, store_id: &str) -> Self {
        log::info!("Creating Tienda Nube API client for store {store_id}");
        log::debug!("API key length: {}", api_key.len());
        Self {
            client: Client::new(),
            api_key,
            base_url: format!("https://api.tiendanube.com/v1/{store_id}"),
            pacer: Pacer::default(),
        }
    }

    pub fn with_pacer(mut self, pacer: Pacer) -> Self {
        self.pacer = pacer;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Tienda Nube expects `Authentication`, not `Authorization`.
    pub(crate) fn auth_header(&self) -> String {
        format!("bearer {}", self.api_key)
    }
}

#[cfg(test)]
#[path = "tests/mod.rs"]
mod tests;
