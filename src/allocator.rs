//! Distribution of a computed net price over a listing's variants.
//!
//! A single variant simply takes the net price. With several variants the
//! current prices are scaled by `net / mean(current)`, which keeps the
//! relative spread between variants (size tiers, premium colors) and
//! centers them on the net price.

use log::warn;

use crate::models::TargetListing;
use crate::pricing::{price_changed, round_to, DEFAULT_ROUND_DIGITS, DEFAULT_TOLERANCE};

/// New price proposed for one variant
#[derive(Debug, Clone, PartialEq)]
pub struct VariantPriceChange {
    pub variant_id: u64,
    pub current_price: f64,
    pub new_price: f64,
    pub changed: bool,
}

/// Result of allocating a net price across a listing's variants
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariantAllocation {
    pub changes: Vec<VariantPriceChange>,
    /// Set when the variants' mean price is zero and no scale could be derived
    pub integrity_warning: bool,
}

impl VariantAllocation {
    pub fn any_changed(&self) -> bool {
        self.changes.iter().any(|c| c.changed)
    }

    /// Only the variants whose price must be written
    pub fn pending(&self) -> impl Iterator<Item = &VariantPriceChange> {
        self.changes.iter().filter(|c| c.changed)
    }
}

#[derive(Debug, Clone)]
pub struct VariantPriceAllocator {
    round_digits: u32,
    tolerance: f64,
}

impl Default for VariantPriceAllocator {
    fn default() -> Self {
        Self::new(DEFAULT_ROUND_DIGITS, DEFAULT_TOLERANCE)
    }
}

impl VariantPriceAllocator {
    pub fn new(round_digits: u32, tolerance: f64) -> Self {
        Self {
            round_digits,
            tolerance,
        }
    }

    /// Computes new variant prices for `listing` given its base net price.
    ///
    /// Listings without variants yield an empty allocation.
    pub fn allocate(&self, listing: &TargetListing, base_net_price: f64) -> VariantAllocation {
        match listing.variants.as_slice() {
            [] => VariantAllocation::default(),
            [only] => {
                let current = only.current_price();
                VariantAllocation {
                    changes: vec![VariantPriceChange {
                        variant_id: only.id,
                        current_price: current,
                        new_price: base_net_price,
                        changed: price_changed(current, base_net_price, self.tolerance),
                    }],
                    integrity_warning: false,
                }
            }
            variants => {
                let total: f64 = variants.iter().map(|v| v.current_price()).sum();
                let mean = total / variants.len() as f64;

                if mean == 0.0 {
                    warn!(
                        "Product {} has variants with mean price 0, cannot scale prices",
                        listing.id
                    );
                    return VariantAllocation {
                        changes: Vec::new(),
                        integrity_warning: true,
                    };
                }

                let scale = base_net_price / mean;
                let changes = variants
                    .iter()
                    .map(|variant| {
                        let current = variant.current_price();
                        let new_price = round_to(current * scale, self.round_digits);
                        VariantPriceChange {
                            variant_id: variant.id,
                            current_price: current,
                            new_price,
                            changed: price_changed(current, new_price, self.tolerance),
                        }
                    })
                    .collect();

                VariantAllocation {
                    changes,
                    integrity_warning: false,
                }
            }
        }
    }
}
