//! Comparison orchestration: validate names, resolve, score, rank.

use serde::Serialize;
use serde_json::Value;

use crate::product::Product;
use crate::scorer::{EcoScoreResult, EcoScorer};

/// Validated `/compare` request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompareRequest {
    pub product_names: Vec<String>,
}

/// Why a request body was rejected
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid request format: expected a JSON object")]
    NotAnObject,

    #[error("Invalid request format: 'product_names' must be a list")]
    MissingProductNames,

    #[error("Invalid request format: 'product_names' must contain at least one name")]
    EmptyProductNames,

    #[error("Invalid request format: product_names[{0}] must be a non-empty string")]
    InvalidName(usize),
}

impl CompareRequest {
    /// Validate a decoded JSON body.
    ///
    /// Accepts one or more names; every entry must be a non-blank string.
    pub fn from_json(body: &Value) -> Result<Self, ValidationError> {
        let object = body.as_object().ok_or(ValidationError::NotAnObject)?;
        let names = object
            .get("product_names")
            .and_then(Value::as_array)
            .ok_or(ValidationError::MissingProductNames)?;

        if names.is_empty() {
            return Err(ValidationError::EmptyProductNames);
        }

        let product_names = names
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                name.as_str()
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .ok_or(ValidationError::InvalidName(idx))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { product_names })
    }
}

/// One row of the comparison response
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonEntry {
    pub name: String,
    pub image: String,
    pub eco_score: u8,
    pub good_ingredients: Vec<String>,
    pub harmful_ingredients: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub packaging: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ComparisonEntry {
    pub fn scored(product: &Product, result: EcoScoreResult) -> Self {
        let packaging = Some(product.packaging.trim())
            .filter(|p| !p.is_empty())
            .map(str::to_string);

        Self {
            name: product.name_or_unknown().to_string(),
            image: product.image_url.clone(),
            eco_score: result.eco_score,
            good_ingredients: result.good_ingredients,
            harmful_ingredients: result.harmful_ingredients,
            packaging,
            error: None,
        }
    }

    /// Stand-in for a product that could not be resolved
    pub fn placeholder(requested_name: &str, error: impl Into<String>) -> Self {
        Self {
            name: requested_name.to_string(),
            image: String::new(),
            eco_score: 0,
            good_ingredients: Vec::new(),
            harmful_ingredients: Vec::new(),
            packaging: None,
            error: Some(error.into()),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.error.is_some()
    }
}

/// Outcome of resolving one requested name
pub type Resolution<E> = Result<Product, E>;

/// Score resolved products, substitute placeholders for failures, rank.
///
/// `resolutions` pairs each requested name with its lookup outcome, in request
/// order. The sort is stable so equal scores keep request order.
pub fn rank<E: std::fmt::Display>(
    scorer: &EcoScorer,
    resolutions: Vec<(String, Resolution<E>)>,
) -> Vec<ComparisonEntry> {
    let mut entries: Vec<ComparisonEntry> = resolutions
        .into_iter()
        .map(|(requested, resolution)| match resolution {
            Ok(product) => {
                let result = scorer.score(&product);
                ComparisonEntry::scored(&product, result)
            }
            Err(e) => {
                tracing::warn!("Lookup failed for '{}': {}", requested, e);
                ComparisonEntry::placeholder(&requested, e.to_string())
            }
        })
        .collect();

    sort_by_score(&mut entries);
    entries
}

/// Highest score first; ties keep their relative order.
pub fn sort_by_score(entries: &mut [ComparisonEntry]) {
    entries.sort_by(|a, b| b.eco_score.cmp(&a.eco_score));
}

#[cfg(feature = "api")]
pub use self::resolve::{compare_products, resolve_all};

#[cfg(feature = "api")]
mod resolve {
    use super::*;
    use crate::error::LookupError;
    use crate::lookup::ProductLookup;

    /// Resolve every requested name through `lookup`, in request order.
    ///
    /// Names are resolved one after another; a failure only affects its own row.
    pub async fn resolve_all(
        request: &CompareRequest,
        lookup: &dyn ProductLookup,
    ) -> Vec<(String, Resolution<LookupError>)> {
        let mut resolutions = Vec::with_capacity(request.product_names.len());

        for name in &request.product_names {
            let resolution = lookup.lookup_by_name(name).await;
            resolutions.push((name.clone(), resolution));
        }

        resolutions
    }

    /// Resolve, score and rank in one call.
    pub async fn compare_products(
        request: &CompareRequest,
        lookup: &dyn ProductLookup,
        scorer: &EcoScorer,
    ) -> Vec<ComparisonEntry> {
        let resolutions = resolve_all(request, lookup).await;
        rank(scorer, resolutions)
    }

}
