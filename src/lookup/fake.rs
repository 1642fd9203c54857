//! In-memory lookup for tests and offline runs.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{ProductLookup, SearchHit};
use crate::error::LookupError;
use crate::product::Product;

/// Lookup backed by a fixed map.
///
/// Names registered with `with_failure` answer with a timeout, every other
/// unknown name is "not found". Keys are matched case-insensitively and the
/// same map serves both names and barcodes. A name registered with
/// `with_barcode` searches to a barcode hit, like the live catalog does.
#[derive(Debug, Default)]
pub struct StaticLookup {
    products: HashMap<String, Product>,
    barcodes: HashMap<String, String>,
    failing: HashSet<String>,
    searches: AtomicUsize,
    barcode_lookups: AtomicUsize,
}

impl StaticLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_product(mut self, key: &str, product: Product) -> Self {
        self.products.insert(key.to_lowercase(), product);
        self
    }

    /// Make searches for `name` return a hit pointing at `barcode`.
    pub fn with_barcode(mut self, name: &str, barcode: &str) -> Self {
        self.barcodes.insert(name.to_lowercase(), barcode.to_string());
        self
    }

    pub fn with_failure(mut self, key: &str) -> Self {
        self.failing.insert(key.to_lowercase());
        self
    }

    /// Number of lookups answered so far
    pub fn calls(&self) -> usize {
        self.searches() + self.barcode_lookups()
    }

    pub fn searches(&self) -> usize {
        self.searches.load(Ordering::SeqCst)
    }

    pub fn barcode_lookups(&self) -> usize {
        self.barcode_lookups.load(Ordering::SeqCst)
    }

    fn resolve(&self, key: &str) -> Result<Product, LookupError> {
        let key = key.to_lowercase();

        if self.failing.contains(&key) {
            return Err(LookupError::Timeout);
        }
        self.products
            .get(&key)
            .cloned()
            .ok_or(LookupError::NotFound(key))
    }
}

#[async_trait]
impl ProductLookup for StaticLookup {
    async fn search(&self, name: &str) -> Result<SearchHit, LookupError> {
        self.searches.fetch_add(1, Ordering::SeqCst);

        match self.barcodes.get(&name.to_lowercase()) {
            Some(code) => Ok(SearchHit::Barcode {
                code: code.clone(),
                partial: Product {
                    display_name: Some(name.to_string()),
                    barcode: Some(code.clone()),
                    ..Product::default()
                },
            }),
            None => self.resolve(name).map(SearchHit::Complete),
        }
    }

    async fn lookup_by_barcode(&self, barcode: &str) -> Result<Product, LookupError> {
        self.barcode_lookups.fetch_add(1, Ordering::SeqCst);
        self.resolve(barcode)
    }
}
