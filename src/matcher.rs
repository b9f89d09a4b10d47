//! Pairing of source listings with target listings.
//!
//! Both strategies return the first hit in target catalog order. Duplicate
//! SKUs or overlapping names across target listings are not detected;
//! whichever listing comes first in the catalog wins.

use log::debug;

use crate::models::{MatchStrategy, SourceListing, TargetListing};

/// Locale whose name is compared first when matching by name
pub const DEFAULT_NAME_LOCALE: &str = "es";

/// Finds the target listing that corresponds to a source listing.
#[derive(Debug, Clone)]
pub struct ProductMatcher {
    strategy: MatchStrategy,
    name_locale: String,
}

impl Default for ProductMatcher {
    fn default() -> Self {
        Self::new(MatchStrategy::default(), DEFAULT_NAME_LOCALE)
    }
}

impl ProductMatcher {
    pub fn new(strategy: MatchStrategy, name_locale: impl Into<String>) -> Self {
        Self {
            strategy,
            name_locale: name_locale.into(),
        }
    }

    pub fn strategy(&self) -> MatchStrategy {
        self.strategy
    }

    /// Returns the first target listing matching `source`, if any.
    pub fn find_match<'a>(
        &self,
        source: &SourceListing,
        targets: &'a [TargetListing],
    ) -> Option<&'a TargetListing> {
        let found = match self.strategy {
            MatchStrategy::BySku => match_by_sku(source, targets),
            MatchStrategy::ByName => match_by_name(source, targets, &self.name_locale),
        };

        if found.is_none() {
            debug!(
                "No match for '{}' (SKU: {})",
                source.title,
                source.sku().unwrap_or("-")
            );
        }
        found
    }
}

/// Matches on the target's own SKU or any of its variants' SKUs.
/// A source listing without SKU never matches.
fn match_by_sku<'a>(source: &SourceListing, targets: &'a [TargetListing]) -> Option<&'a TargetListing> {
    let sku = source.sku()?;

    targets.iter().find(|target| {
        if target.sku.as_deref() == Some(sku) {
            debug!("SKU match on product {}: {}", target.id, sku);
            return true;
        }
        if let Some(variant) = target
            .variants
            .iter()
            .find(|v| v.sku.as_deref() == Some(sku))
        {
            debug!(
                "SKU match on variant {} of product {}: {}",
                variant.id, target.id, sku
            );
            return true;
        }
        false
    })
}

/// Case-insensitive substring match in either direction.
fn match_by_name<'a>(
    source: &SourceListing,
    targets: &'a [TargetListing],
    locale: &str,
) -> Option<&'a TargetListing> {
    let source_title = source.title.trim().to_lowercase();
    if source_title.is_empty() {
        return None;
    }

    targets.iter().find(|target| {
        let Some(name) = target.display_name(locale) else {
            return false;
        };
        let target_name = name.trim().to_lowercase();
        if target_name.is_empty() {
            return false;
        }

        let hit = target_name.contains(&source_title) || source_title.contains(&target_name);
        if hit {
            debug!("Name match: '{}' - '{}'", source_title, target_name);
        }
        hit
    })
}

#[cfg(test)]
#[path = "matcher_tests.rs"]
mod tests;
