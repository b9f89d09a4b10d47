//! Product listing and product/variant price updates.

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::StatusCode;

use crate::error::{ensure_success, Result, SyncError};
use crate::models::TargetListing;
use crate::sync::TargetCatalog;

use super::{TiendaNubeApi, USER_AGENT};

const PAGE_SIZE: usize = 50;

impl TiendaNubeApi {
    /// Fetches all products, page by page.
    ///
    /// Stops at the first empty or short page. Tienda Nube answers 404 for a
    /// page past the last one, which also ends the listing.
    pub(crate) async fn fetch_products(&self) -> Result<Vec<TargetListing>> {
        let url = format!("{}/products", self.base_url);
        let mut products = Vec::new();
        let mut page = 1usize;

        loop {
            self.pacer.wait().await;
            debug!("Fetching products page {page}...");

            let response = self
                .client
                .get(&url)
                .header("Authentication", self.auth_header())
                .header("User-Agent", USER_AGENT)
                .query(&[("page", page), ("per_page", PAGE_SIZE)])
                .send()
                .await?;

            if page > 1 && response.status() == StatusCode::NOT_FOUND {
                debug!("Page {page} not found, end of catalog");
                break;
            }

            let batch: Vec<serde_json::Value> = ensure_success(response).await?.json().await?;
            let received = batch.len();
            products.extend(batch.into_iter().filter_map(parse_product));

            if received < PAGE_SIZE {
                break;
            }
            page += 1;
        }

        info!("Found {} products on Tienda Nube", products.len());
        Ok(products)
    }

    async fn put_price(&self, url: &str, price: f64) -> Result<()> {
        self.pacer.wait().await;
        debug!("PUT {url} price={price}");

        let response = self
            .client
            .put(url)
            .header("Authentication", self.auth_header())
            .header("User-Agent", USER_AGENT)
            .json(&serde_json::json!({ "price": price }))
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }
}

/// Converts one raw product, logging and dropping it if it does not parse.
fn parse_product(raw: serde_json::Value) -> Option<TargetListing> {
    let id = raw.get("id").cloned();
    match serde_json::from_value::<TargetListing>(raw) {
        Ok(product) => Some(product),
        Err(e) => {
            warn!(
                "Skipping product {} with unreadable data: {}",
                id.map_or_else(|| "?".to_string(), |v| v.to_string()),
                e
            );
            None
        }
    }
}

#[async_trait]
impl TargetCatalog for TiendaNubeApi {
    fn name(&self) -> &'static str {
        "Tienda Nube"
    }

    async fn fetch_listings(&self) -> Result<Vec<TargetListing>> {
        self.fetch_products()
            .await
            .map_err(|e| SyncError::fetch(self.name(), e))
    }

    async fn update_listing_price(&self, listing_id: u64, price: f64) -> Result<()> {
        let url = format!("{}/products/{}", self.base_url, listing_id);
        self.put_price(&url, price)
            .await
            .map_err(|e| SyncError::mutation(format!("product {listing_id}"), e))?;
        info!("Price of product {listing_id} set to {price}");
        Ok(())
    }

    async fn update_variant_price(&self, listing_id: u64, variant_id: u64, price: f64) -> Result<()> {
        let url = format!(
            "{}/products/{}/variants/{}",
            self.base_url, listing_id, variant_id
        );
        self.put_price(&url, price).await.map_err(|e| {
            SyncError::mutation(format!("variant {variant_id} of product {listing_id}"), e)
        })?;
        info!("Price of variant {variant_id} set to {price}");
        Ok(())
    }
}
