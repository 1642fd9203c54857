//! Bounded in-memory cache in front of a `ProductLookup`.

use async_trait::async_trait;
use moka::future::Cache;
use std::sync::Arc;

use super::{resolve_hit, ProductLookup, SearchHit};
use crate::error::LookupError;
use crate::product::Product;

pub const DEFAULT_CACHE_CAPACITY: u64 = 50;

/// Caches resolved products by lookup argument.
///
/// Capacity-bounded with no time-based expiry. Found products and definite
/// "no such product" answers are cached; transport failures are not, so a
/// flaky catalog is retried on the next request.
///
/// A name lookup resolves its barcode through this cache, so names that land
/// on the same product share one barcode fetch.
pub struct CachedLookup<L> {
    inner: L,
    /// `None` records a cached miss
    cache: Cache<String, Option<Arc<Product>>>,
}

impl<L: ProductLookup> CachedLookup<L> {
    pub fn new(inner: L, capacity: u64) -> Self {
        let cache = Cache::builder().max_capacity(capacity).build();
        Self { inner, cache }
    }

    pub fn inner(&self) -> &L {
        &self.inner
    }

    async fn cached<F>(&self, key: String, arg: &str, fetch: F) -> Result<Product, LookupError>
    where
        F: std::future::Future<Output = Result<Product, LookupError>>,
    {
        if let Some(hit) = self.cache.get(&key).await {
            tracing::debug!("Cache hit for {}", key);
            return hit
                .map(|product| product.as_ref().clone())
                .ok_or_else(|| LookupError::NotFound(arg.to_string()));
        }

        match fetch.await {
            Ok(product) => {
                self.cache.insert(key, Some(Arc::new(product.clone()))).await;
                Ok(product)
            }
            Err(LookupError::NotFound(what)) => {
                self.cache.insert(key, None).await;
                Err(LookupError::NotFound(what))
            }
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl<L: ProductLookup> ProductLookup for CachedLookup<L> {
    async fn search(&self, name: &str) -> Result<SearchHit, LookupError> {
        self.inner.search(name).await
    }

    async fn lookup_by_name(&self, name: &str) -> Result<Product, LookupError> {
        let fetch = async {
            let hit = self.inner.search(name).await?;
            resolve_hit(self, name, hit).await
        };
        self.cached(format!("name:{}", name), name, fetch).await
    }

    async fn lookup_by_barcode(&self, barcode: &str) -> Result<Product, LookupError> {
        self.cached(
            format!("barcode:{}", barcode),
            barcode,
            self.inner.lookup_by_barcode(barcode),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::StaticLookup;

    fn fake() -> StaticLookup {
        StaticLookup::new()
            .with_product("oat milk", Product::with_ingredients(["oats", "water"], "paper"))
            .with_failure("flaky")
    }

    #[tokio::test]
    async fn test_repeated_lookup_hits_cache() {
        let lookup = CachedLookup::new(fake(), DEFAULT_CACHE_CAPACITY);

        let first = lookup.lookup_by_name("oat milk").await.unwrap();
        let second = lookup.lookup_by_name("oat milk").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(lookup.inner().calls(), 1);
    }

    #[tokio::test]
    async fn test_misses_are_cached() {
        let lookup = CachedLookup::new(fake(), DEFAULT_CACHE_CAPACITY);

        assert!(matches!(
            lookup.lookup_by_name("unknown").await,
            Err(LookupError::NotFound(_))
        ));
        assert!(matches!(
            lookup.lookup_by_name("unknown").await,
            Err(LookupError::NotFound(_))
        ));
        assert_eq!(lookup.inner().calls(), 1);
    }

    #[tokio::test]
    async fn test_transport_failures_are_not_cached() {
        let lookup = CachedLookup::new(fake(), DEFAULT_CACHE_CAPACITY);

        assert!(lookup.lookup_by_name("flaky").await.is_err());
        assert!(lookup.lookup_by_name("flaky").await.is_err());
        assert_eq!(lookup.inner().calls(), 2);
    }

    #[tokio::test]
    async fn test_name_and_barcode_keys_are_separate() {
        let lookup = CachedLookup::new(fake(), DEFAULT_CACHE_CAPACITY);

        lookup.lookup_by_name("oat milk").await.unwrap();
        lookup.lookup_by_barcode("oat milk").await.unwrap();
        assert_eq!(lookup.inner().calls(), 2);
    }

    #[tokio::test]
    async fn test_names_sharing_a_barcode_fetch_it_once() {
        let spread = Product::with_ingredients(["sugar", "palm oil", "hazelnuts"], "plastic");
        let inner = StaticLookup::new()
            .with_product("3017620422003", spread.clone())
            .with_barcode("hazelnut spread", "3017620422003")
            .with_barcode("chocolate spread", "3017620422003");
        let lookup = CachedLookup::new(inner, DEFAULT_CACHE_CAPACITY);

        let first = lookup.lookup_by_name("hazelnut spread").await.unwrap();
        let second = lookup.lookup_by_name("chocolate spread").await.unwrap();

        assert_eq!(first, spread);
        assert_eq!(second, spread);
        assert_eq!(lookup.inner().searches(), 2);
        assert_eq!(lookup.inner().barcode_lookups(), 1);
    }

    #[tokio::test]
    async fn test_failed_barcode_falls_back_to_search_record() {
        let inner = StaticLookup::new().with_barcode("store brand jam", "0000000000000");
        let lookup = CachedLookup::new(inner, DEFAULT_CACHE_CAPACITY);

        let product = lookup.lookup_by_name("store brand jam").await.unwrap();
        assert_eq!(product.barcode.as_deref(), Some("0000000000000"));
        assert_eq!(product.display_name.as_deref(), Some("store brand jam"));
        assert!(product.ingredients.is_empty());

        // Neither the name nor the missing barcode is asked for again
        lookup.lookup_by_name("store brand jam").await.unwrap();
        assert!(lookup.lookup_by_barcode("0000000000000").await.is_err());
        assert_eq!(lookup.inner().searches(), 1);
        assert_eq!(lookup.inner().barcode_lookups(), 1);
    }
}
