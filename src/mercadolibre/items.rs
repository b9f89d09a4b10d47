//! Seller item search and item detail retrieval.

use async_trait::async_trait;
use log::{debug, error, info};
use serde::Deserialize;

use crate::error::{ensure_success, Result, SyncError};
use crate::models::{ListingStatus, PriceValue, SourceListing};
use crate::sync::SourceCatalog;

use super::MercadoLibreApi;

const PAGE_SIZE: u64 = 50;
/// Attribute holding the seller's own SKU
const SELLER_SKU_ATTRIBUTE: &str = "SELLER_SKU";

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    pub results: Vec<String>,
    #[serde(default)]
    pub paging: Paging,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Paging {
    #[serde(default)]
    pub total: u64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ItemResponse {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub price: Option<PriceValue>,
    #[serde(default)]
    pub currency_id: Option<String>,
    #[serde(default)]
    pub permalink: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub attributes: Vec<ItemAttribute>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ItemAttribute {
    pub id: String,
    #[serde(default)]
    pub value_name: Option<String>,
}

impl ItemResponse {
    fn into_listing(self) -> SourceListing {
        let sku = self
            .attributes
            .iter()
            .find(|attr| attr.id == SELLER_SKU_ATTRIBUTE)
            .and_then(|attr| attr.value_name.clone());

        SourceListing {
            id: self.id,
            title: self.title,
            price: self.price.unwrap_or(PriceValue::Number(0.0)),
            currency_id: self.currency_id.unwrap_or_default(),
            sku,
            status: ListingStatus::from(self.status.as_deref().unwrap_or("")),
            permalink: self.permalink.unwrap_or_default(),
        }
    }
}

impl MercadoLibreApi {
    fn bearer(&self) -> Result<String> {
        self.access_token
            .as_ref()
            .map(|token| format!("Bearer {token}"))
            .ok_or_else(|| {
                SyncError::Authentication("Mercado Libre access token not set".to_string())
            })
    }

    /// Collects the IDs of all active items of the seller, page by page.
    pub(crate) async fn search_item_ids(&self) -> Result<Vec<String>> {
        let url = format!("{}/users/{}/items/search", self.base_url, self.user_id);
        let auth = self.bearer()?;

        let mut ids = Vec::new();
        let mut offset = 0u64;
        loop {
            self.pacer.wait().await;
            debug!("Searching items: offset {offset}, limit {PAGE_SIZE}");

            let response = self
                .client
                .get(&url)
                .header("Authorization", &auth)
                .query(&[
                    ("status", "active".to_string()),
                    ("offset", offset.to_string()),
                    ("limit", PAGE_SIZE.to_string()),
                ])
                .send()
                .await?;
            let page: SearchResponse = ensure_success(response).await?.json().await?;

            if offset == 0 {
                info!("Mercado Libre reports {} items", page.paging.total);
            }
            let received = page.results.len();
            ids.extend(page.results);

            offset += PAGE_SIZE;
            if received == 0 || offset >= page.paging.total {
                break;
            }
        }

        Ok(ids)
    }

    /// Fetches one item and converts it into a [`SourceListing`].
    pub async fn fetch_item(&self, item_id: &str) -> Result<SourceListing> {
        let url = format!("{}/items/{}", self.base_url, item_id);
        let auth = self.bearer()?;

        self.pacer.wait().await;
        let response = self
            .client
            .get(&url)
            .header("Authorization", &auth)
            .send()
            .await?;
        let item: ItemResponse = ensure_success(response).await?.json().await?;
        Ok(item.into_listing())
    }
}

#[async_trait]
impl SourceCatalog for MercadoLibreApi {
    fn name(&self) -> &'static str {
        "Mercado Libre"
    }

    /// Searches all active items, then fetches each item's details.
    /// Items whose details cannot be fetched are logged and left out.
    async fn fetch_active_listings(&self) -> Result<Vec<SourceListing>> {
        let ids = self
            .search_item_ids()
            .await
            .map_err(|e| SyncError::fetch(self.name(), e))?;

        let total = ids.len();
        info!("Fetching details of {total} items...");

        let mut listings = Vec::with_capacity(total);
        for (i, id) in ids.iter().enumerate() {
            if (i + 1) % 10 == 0 {
                debug!("Progress: {}/{} items", i + 1, total);
            }
            match self.fetch_item(id).await {
                Ok(listing) => listings.push(listing),
                Err(e) => error!("Failed to fetch details of item {id}: {e}"),
            }
        }

        info!("Fetched details of {} items", listings.len());
        Ok(listings)
    }
}
