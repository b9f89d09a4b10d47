//! ML-TN Sync - commission-free price sync from Mercado Libre to Tienda Nube
//!
//! Reads the seller's active Mercado Libre listings, removes the Mercado
//! Libre commission from each price, and writes the result to the matching
//! Tienda Nube product or its variants.

pub mod allocator;
pub mod config;
pub mod error;
pub mod logging;
pub mod matcher;
pub mod mercadolibre;
pub mod models;
pub mod pacing;
pub mod pricing;
pub mod sync;
pub mod tiendanube;

pub use allocator::{VariantAllocation, VariantPriceAllocator, VariantPriceChange};
pub use config::Config;
pub use error::{Result, SyncError};
pub use matcher::ProductMatcher;
pub use mercadolibre::{MercadoLibreApi, TokenPair};
pub use models::{
    ListingStatus, MatchStrategy, PriceValue, SourceListing, SyncOutcome, TargetListing, Variant,
};
pub use pricing::{net_price, price_changed};
pub use sync::{SourceCatalog, SyncOrchestrator, SyncSettings, TargetCatalog};
pub use tiendanube::TiendaNubeApi;
