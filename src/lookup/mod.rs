//! Product lookup against the external food catalog.
//!
//! The comparison and snapshot paths only see the `ProductLookup` trait, so the
//! live catalog client, the caching wrapper and the in-memory fake are
//! interchangeable.
//!
//! A name lookup runs in two steps: `search` finds the first catalog hit, then
//! the hit's barcode is resolved through `lookup_by_barcode` on the same
//! lookup. A caching wrapper therefore caches both steps.

mod cache;
mod fake;
mod open_food_facts;

pub use cache::CachedLookup;
pub use fake::StaticLookup;
pub use open_food_facts::OpenFoodFactsClient;

use crate::error::LookupError;
use crate::product::Product;
use async_trait::async_trait;

/// First catalog hit for a free-text name
#[derive(Debug, Clone, PartialEq)]
pub enum SearchHit {
    /// The hit carries a barcode whose full record should replace it.
    /// `partial` is the abbreviated search record, used if that fails.
    Barcode { code: String, partial: Product },
    /// The hit is already the final record
    Complete(Product),
}

/// Resolves human-readable names or barcodes to catalog products.
#[async_trait]
pub trait ProductLookup: Send + Sync {
    /// Search step only: the first hit for a name, without barcode resolution.
    async fn search(&self, name: &str) -> Result<SearchHit, LookupError>;

    /// Resolve a barcode.
    async fn lookup_by_barcode(&self, barcode: &str) -> Result<Product, LookupError>;

    /// Resolve a free-text product name (first catalog hit wins).
    async fn lookup_by_name(&self, name: &str) -> Result<Product, LookupError> {
        let hit = self.search(name).await?;
        resolve_hit(self, name, hit).await
    }
}

/// Finish a name lookup: fetch the full record behind a barcode hit through
/// `lookup`, falling back to the search record when that fails.
pub async fn resolve_hit<L>(lookup: &L, name: &str, hit: SearchHit) -> Result<Product, LookupError>
where
    L: ProductLookup + ?Sized,
{
    match hit {
        SearchHit::Complete(product) => Ok(product),
        SearchHit::Barcode { code, partial } => match lookup.lookup_by_barcode(&code).await {
            Ok(product) => Ok(product),
            Err(e) => {
                tracing::warn!(
                    "Barcode lookup {} failed for '{}' ({}); using search hit",
                    code,
                    name,
                    e
                );
                Ok(partial)
            }
        },
    }
}
