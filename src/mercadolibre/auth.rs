//! OAuth refresh-token exchange.

use log::{debug, error, info};
use serde::Deserialize;

use crate::config::MercadoLibreCredentials;
use crate::error::{ensure_success, Result, SyncError};

use super::MercadoLibreApi;

/// Tokens returned by a refresh. Mercado Libre rotates the refresh token on
/// every exchange; the old one stops working.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

impl MercadoLibreApi {
    /// Exchanges the stored refresh token for a new token pair.
    ///
    /// The client is not modified; pass the access token to
    /// [`with_access_token`](Self::with_access_token) and persist the new
    /// refresh token.
    pub async fn refresh_access_token(
        &self,
        credentials: &MercadoLibreCredentials,
    ) -> Result<TokenPair> {
        info!("Refreshing Mercado Libre access token");
        let url = format!("{}/oauth/token", self.base_url);
        debug!("Token URL: {url}");

        let form = [
            ("grant_type", "refresh_token"),
            ("client_id", credentials.client_id.as_str()),
            ("client_secret", credentials.client_secret.as_str()),
            ("refresh_token", credentials.refresh_token.as_str()),
        ];

        self.pacer.wait().await;
        let result = async {
            let response = self
                .client
                .post(&url)
                .header("accept", "application/json")
                .form(&form)
                .send()
                .await?;
            let response = ensure_success(response).await?;
            Ok::<TokenPair, SyncError>(response.json::<TokenPair>().await?)
        }
        .await;

        match result {
            Ok(tokens) => {
                info!("Mercado Libre access token refreshed");
                Ok(tokens)
            }
            Err(e) => {
                error!("Failed to refresh Mercado Libre token: {e}");
                Err(SyncError::Authentication(e.to_string()))
            }
        }
    }
}
