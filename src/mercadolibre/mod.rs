//! Mercado Libre API client: OAuth token refresh and seller item listing.
//!
//! Prices on Mercado Libre include the platform commission; this client only
//! reads them. It implements [`SourceCatalog`](crate::sync::SourceCatalog).

mod auth;
mod items;

use reqwest::Client;

use crate::pacing::Pacer;

pub use auth::TokenPair;

/// Mercado Libre API client for one seller account.
pub struct MercadoLibreApi {
    pub(crate) client: Client,
    pub(crate) base_url: String,
    pub(crate) user_id: String,
    pub(crate) access_token: Option<String>,
    pub(crate) pacer: Pacer,
}

impl MercadoLibreApi {
    /// Creates a client for the given seller. Call
    /// [`refresh_access_token`](Self::refresh_access_token) and
    /// [`with_access_token`](Self::with_access_token) before fetching.
    pub fn new(user_id: String) -> Self {
        log::info!("Creating Mercado Libre API client");
        Self {
            client: Client::new(),
            base_url: "https://api.mercadolibre.com".to_string(),
            user_id,
            access_token: None,
            pacer: Pacer::default(),
        }
    }

    pub fn with_pacer(mut self, pacer: Pacer) -> Self {
        self.pacer = pacer;
        self
    }

    pub fn with_access_token(mut self, access_token: String) -> Self {
        log::debug!("Access token length: {}", access_token.len());
        self.access_token = Some(access_token);
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[cfg(test)]
#[path = "tests/mod.rs"]
mod tests;
