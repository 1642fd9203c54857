//! Product model
//!
//! `CatalogProduct` mirrors the catalog's JSON record (only the fields we read);
//! `Product` is the projection the scorer and the comparison consume.
//!
//! Decoding is lenient: the catalog is crowd-sourced, so a wrong-typed field
//! becomes its empty default instead of failing the whole record.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One entry of a product's structured ingredient list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientRecord {
    pub text: String,
}

impl IngredientRecord {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Raw catalog record
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogProduct {
    #[serde(default, deserialize_with = "lenient_string")]
    pub product_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub image_front_small_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_ingredients")]
    pub ingredients: Vec<IngredientRecord>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub ingredients_text: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub packaging: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub ecoscore_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient_tags")]
    pub additives_tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub code: Option<String>,
}

/// Product as seen by the scorer
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Product {
    pub display_name: Option<String>,
    pub image_url: String,
    pub ingredients: Vec<IngredientRecord>,
    /// Raw packaging descriptor, possibly comma-separated
    pub packaging: String,
    /// Additive tags such as `en:e330`; `None` when the catalog omits them
    pub additives: Option<Vec<String>>,
    pub ingredients_text: Option<String>,
    pub barcode: Option<String>,
    /// The catalog's own eco-score, carried through for reference only
    pub catalog_eco_score: Option<f64>,
}

impl From<CatalogProduct> for Product {
    fn from(raw: CatalogProduct) -> Self {
        let image_url = raw
            .image_url
            .filter(|s| !s.is_empty())
            .or(raw.image_front_small_url)
            .unwrap_or_default();

        Product {
            display_name: raw.product_name.filter(|s| !s.trim().is_empty()),
            image_url,
            ingredients: raw.ingredients,
            packaging: raw.packaging.unwrap_or_default(),
            additives: raw.additives_tags,
            ingredients_text: raw.ingredients_text,
            barcode: raw.code.filter(|s| !s.trim().is_empty()),
            catalog_eco_score: raw.ecoscore_score,
        }
    }
}

impl Product {
    /// Convenience constructor for products built in code
    pub fn with_ingredients<I, S>(ingredients: I, packaging: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Product {
            ingredients: ingredients.into_iter().map(IngredientRecord::new).collect(),
            packaging: packaging.to_string(),
            ..Default::default()
        }
    }

    pub fn name_or_unknown(&self) -> &str {
        self.display_name.as_deref().unwrap_or("Unknown")
    }

    pub fn has_structured_ingredients(&self) -> bool {
        !self.ingredients.is_empty()
    }
}

// ============================================================================
// Lenient field decoders
// ============================================================================

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

/// `[{"text": "..."}, ...]`; entries without a string `text` become empty records
/// (the scorer skips them), anything that is not an array becomes no list at all.
fn lenient_ingredients<'de, D>(deserializer: D) -> Result<Vec<IngredientRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = match Value::deserialize(deserializer)? {
        Value::Array(items) => items,
        _ => return Ok(Vec::new()),
    };

    Ok(items
        .into_iter()
        .map(|item| {
            let text = item
                .get("text")
                .and_then(Value::as_str)
                .unwrap_or("")
                .to_string();
            IngredientRecord { text }
        })
        .collect())
}

fn lenient_tags<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => Some(
            items
                .into_iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
        ),
        _ => None,
    })
}
