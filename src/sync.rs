//! Price sync pass: fetch both catalogs, match, compute and apply prices.
//!
//! The pass is strictly sequential. Per-item write failures are logged and
//! the pass moves on; only a failure to fetch either catalog aborts it.
//! Because unchanged prices are never written, running the pass again
//! after a partial failure is safe.

use async_trait::async_trait;
use log::{debug, error, info, warn};

use crate::allocator::VariantPriceAllocator;
use crate::error::{Result, SyncError};
use crate::matcher::{ProductMatcher, DEFAULT_NAME_LOCALE};
use crate::models::{MatchStrategy, SourceListing, SyncOutcome, TargetListing};
use crate::pricing::{
    net_price, price_changed, DEFAULT_COMMISSION_RATE, DEFAULT_ROUND_DIGITS, DEFAULT_TOLERANCE,
};

/// Catalog whose commission-inclusive prices drive the sync.
#[async_trait]
pub trait SourceCatalog: Send + Sync {
    /// Human-readable catalog name for logs
    fn name(&self) -> &'static str {
        "source"
    }

    /// All active listings, fully paginated. Errors are fatal for the pass.
    async fn fetch_active_listings(&self) -> Result<Vec<SourceListing>>;
}

/// Catalog whose prices are brought in line with the source.
#[async_trait]
pub trait TargetCatalog: Send + Sync {
    fn name(&self) -> &'static str {
        "target"
    }

    /// All listings, fully paginated. Errors are fatal for the pass.
    async fn fetch_listings(&self) -> Result<Vec<TargetListing>>;

    /// Sets the price of a listing without variants.
    async fn update_listing_price(&self, listing_id: u64, price: f64) -> Result<()>;

    /// Sets the price of a single variant.
    async fn update_variant_price(&self, listing_id: u64, variant_id: u64, price: f64) -> Result<()>;
}

/// Values the sync pass is parameterized by
#[derive(Debug, Clone, PartialEq)]
pub struct SyncSettings {
    pub commission_rate_percent: f64,
    pub match_strategy: MatchStrategy,
    pub price_round_digits: u32,
    pub min_price_diff_tolerance: f64,
    pub dry_run: bool,
    /// Locale preferred when matching by name
    pub name_locale: String,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            commission_rate_percent: DEFAULT_COMMISSION_RATE,
            match_strategy: MatchStrategy::BySku,
            price_round_digits: DEFAULT_ROUND_DIGITS,
            min_price_diff_tolerance: DEFAULT_TOLERANCE,
            dry_run: false,
            name_locale: DEFAULT_NAME_LOCALE.to_string(),
        }
    }
}

/// How a single source listing was resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ItemOutcome {
    Updated,
    Unchanged,
    Unmatched,
    /// Not counted: inactive, or every write failed
    Skipped,
}

/// Drives one full sync pass between a source and a target catalog.
pub struct SyncOrchestrator<S, T> {
    source: S,
    target: T,
    settings: SyncSettings,
    matcher: ProductMatcher,
    allocator: VariantPriceAllocator,
}

impl<S: SourceCatalog, T: TargetCatalog> SyncOrchestrator<S, T> {
    pub fn new(source: S, target: T, settings: SyncSettings) -> Self {
        let matcher = ProductMatcher::new(settings.match_strategy, settings.name_locale.clone());
        let allocator = VariantPriceAllocator::new(
            settings.price_round_digits,
            settings.min_price_diff_tolerance,
        );

        info!(
            "Sync initialized with {}% commission, matching {}",
            settings.commission_rate_percent, settings.match_strategy
        );
        if settings.dry_run {
            info!("DRY RUN enabled: no prices will be changed");
        }

        Self {
            source,
            target,
            settings,
            matcher,
            allocator,
        }
    }

    pub fn settings(&self) -> &SyncSettings {
        &self.settings
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    /// Runs one pass and returns its counters.
    ///
    /// An empty catalog on either side ends the pass early with zero counts.
    pub async fn run(&self) -> Result<SyncOutcome> {
        let mut outcome = SyncOutcome::default();

        info!("Fetching listings from {}...", self.source.name());
        let sources = self
            .source
            .fetch_active_listings()
            .await
            .map_err(|e| SyncError::fetch(self.source.name(), e))?;
        if sources.is_empty() {
            warn!("No listings found on {}, nothing to sync", self.source.name());
            return Ok(outcome);
        }

        info!("Fetching listings from {}...", self.target.name());
        let targets = self
            .target
            .fetch_listings()
            .await
            .map_err(|e| SyncError::fetch(self.target.name(), e))?;
        if targets.is_empty() {
            warn!("No listings found on {}, nothing to sync", self.target.name());
            return Ok(outcome);
        }

        info!(
            "Syncing {} {} listings against {} {} listings",
            sources.len(),
            self.source.name(),
            targets.len(),
            self.target.name()
        );

        for listing in &sources {
            match self.sync_listing(listing, &targets).await {
                ItemOutcome::Updated => outcome.updated += 1,
                ItemOutcome::Unchanged => outcome.unchanged += 1,
                ItemOutcome::Unmatched => outcome.unmatched += 1,
                ItemOutcome::Skipped => {}
            }
        }

        info!("{}", "=".repeat(50));
        info!("Sync summary{}:", if self.settings.dry_run { " (dry run)" } else { "" });
        info!("- Updated: {}", outcome.updated);
        info!("- Unchanged: {}", outcome.unchanged);
        info!("- Unmatched: {}", outcome.unmatched);
        info!("{}", "=".repeat(50));

        Ok(outcome)
    }

    async fn sync_listing(&self, listing: &SourceListing, targets: &[TargetListing]) -> ItemOutcome {
        if !listing.status.is_active() {
            debug!("Skipping inactive listing: {} ({:?})", listing.title, listing.status);
            return ItemOutcome::Skipped;
        }

        let Some(target) = self.matcher.find_match(listing, targets) else {
            warn!(
                "No match found for: {} (SKU: {})",
                listing.title,
                listing.sku().unwrap_or("-")
            );
            return ItemOutcome::Unmatched;
        };

        let price = match net_price(
            &listing.price,
            self.settings.commission_rate_percent,
            self.settings.price_round_digits,
        ) {
            Ok(price) => price,
            Err(e) => {
                warn!("Could not compute price for {}, using 0: {}", listing.id, e);
                0.0
            }
        };

        if target.has_variants() {
            self.sync_variants(target, price).await
        } else {
            self.sync_single_price(target, price).await
        }
    }

    async fn sync_single_price(&self, target: &TargetListing, price: f64) -> ItemOutcome {
        let label = target.label(&self.settings.name_locale);
        let current = target.current_price();

        if !price_changed(current, price, self.settings.min_price_diff_tolerance) {
            debug!("Price unchanged for {}: {}", label, current);
            return ItemOutcome::Unchanged;
        }

        info!("Updating price of {} from {} to {}", label, current, price);
        if self.settings.dry_run {
            info!("[DRY RUN] Would set price of product {} to {}", target.id, price);
            return ItemOutcome::Updated;
        }

        match self.target.update_listing_price(target.id, price).await {
            Ok(()) => ItemOutcome::Updated,
            Err(e) => {
                error!("Failed to update price of {}: {}", label, e);
                ItemOutcome::Skipped
            }
        }
    }

    async fn sync_variants(&self, target: &TargetListing, base_price: f64) -> ItemOutcome {
        let label = target.label(&self.settings.name_locale);
        let allocation = self.allocator.allocate(target, base_price);

        if !allocation.any_changed() {
            debug!("Variant prices unchanged for {}", label);
            return ItemOutcome::Unchanged;
        }

        let mut written = 0usize;
        let mut failed = 0usize;
        for change in allocation.pending() {
            info!(
                "Updating variant {} of {} from {} to {}",
                change.variant_id, label, change.current_price, change.new_price
            );

            if self.settings.dry_run {
                info!(
                    "[DRY RUN] Would set price of variant {} to {}",
                    change.variant_id, change.new_price
                );
                written += 1;
                continue;
            }

            match self
                .target
                .update_variant_price(target.id, change.variant_id, change.new_price)
                .await
            {
                Ok(()) => written += 1,
                Err(e) => {
                    error!(
                        "Failed to update variant {} of {}: {}",
                        change.variant_id, label, e
                    );
                    failed += 1;
                }
            }
        }

        if failed > 0 {
            warn!("{} of {} variant updates failed for {}", failed, written + failed, label);
        }
        if written > 0 {
            ItemOutcome::Updated
        } else {
            ItemOutcome::Skipped
        }
    }
}

#[cfg(test)]
#[path = "sync_tests.rs"]
mod tests;
