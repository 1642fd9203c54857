//! Eco Scorer Rust Implementation
//!
//! Looks up grocery products in an external food catalog, scores them on a
//! 0-100 eco-friendliness scale and returns a ranked comparison.
//!
//! Layout:
//! - `category_table`: ingredient → good/harmful/neutral table loaded at startup
//! - `classifier`: partial-match classification against the table
//! - `scorer`: eco-score calculation
//! - `product`: catalog record decoding
//! - `compare`: request validation, placeholders and ranking
//! - `lookup`: catalog client, bounded cache, in-memory fake (feature `api`)
//! - `api_server`: axum router (feature `api`)
//! - `snapshot`: JSON snapshots of fetched products

pub mod category_table;
pub mod classifier;
pub mod compare;
pub mod config;
pub mod error;
pub mod product;
pub mod scorer;
pub mod snapshot;

#[cfg(feature = "api")]
pub mod api_server;
#[cfg(feature = "api")]
pub mod lookup;

// Re-export commonly used types
pub use category_table::{Category, CategoryTable, TableLoad};
pub use classifier::classify;
pub use compare::{CompareRequest, ComparisonEntry};
pub use config::Config;
pub use product::{CatalogProduct, IngredientRecord, Product};
pub use scorer::{EcoScoreResult, EcoScorer};

#[cfg(feature = "api")]
pub use api_server::{create_router, AppState};
