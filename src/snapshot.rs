//! Flat-file snapshots of fetched products.
//!
//! Writes a JSON array of `{name, ingredients, image}`, replacing the file
//! wholesale. Nothing in the scoring path reads it back.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::SnapshotError;
use crate::product::Product;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    pub name: String,
    pub ingredients: Vec<String>,
    pub image: String,
}

impl SnapshotEntry {
    /// Project a product; `requested_name` is used when the catalog has no name.
    ///
    /// Ingredients come from the free-text list (split on ", ") when present,
    /// else from the structured records, else `["Unknown"]`.
    pub fn from_product(product: &Product, requested_name: &str) -> Self {
        let from_text: Vec<String> = product
            .ingredients_text
            .as_deref()
            .map(|text| {
                text.split(", ")
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let ingredients = if !from_text.is_empty() {
            from_text
        } else {
            let structured: Vec<String> = product
                .ingredients
                .iter()
                .map(|r| r.text.trim())
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect();
            if structured.is_empty() {
                vec!["Unknown".to_string()]
            } else {
                structured
            }
        };

        Self {
            name: product
                .display_name
                .clone()
                .unwrap_or_else(|| requested_name.to_string()),
            ingredients,
            image: product.image_url.clone(),
        }
    }
}

/// Overwrite `path` with the entries as a 4-space indented JSON array.
pub fn write_snapshot(
    path: impl AsRef<Path>,
    entries: &[SnapshotEntry],
) -> Result<(), SnapshotError> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    entries.serialize(&mut serializer)?;

    std::fs::write(path.as_ref(), buf)?;
    tracing::info!("Wrote {} products to {:?}", entries.len(), path.as_ref());
    Ok(())
}

#[cfg(feature = "api")]
pub use self::fetch::save_snapshot;

#[cfg(feature = "api")]
mod fetch {
    use super::*;
    use crate::lookup::ProductLookup;

    /// Look up each name and snapshot the ones that resolve.
    ///
    /// Failed lookups are logged and left out of the file.
    pub async fn save_snapshot(
        names: &[String],
        lookup: &dyn ProductLookup,
        path: impl AsRef<Path>,
    ) -> Result<Vec<SnapshotEntry>, SnapshotError> {
        let mut entries = Vec::with_capacity(names.len());

        for name in names {
            match lookup.lookup_by_name(name).await {
                Ok(product) => entries.push(SnapshotEntry::from_product(&product, name)),
                Err(e) => tracing::warn!("Skipping '{}' in snapshot: {}", name, e),
            }
        }

        write_snapshot(path, &entries)?;
        Ok(entries)
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingredients_prefer_free_text() {
        let mut product = Product::with_ingredients(["structured"], "");
        product.ingredients_text = Some("sugar, palm oil, hazelnuts".into());
        let entry = SnapshotEntry::from_product(&product, "spread");

        assert_eq!(entry.name, "spread");
        assert_eq!(entry.ingredients, vec!["sugar", "palm oil", "hazelnuts"]);
    }

    #[test]
    fn test_ingredients_fall_back_to_unknown() {
        let product = Product::default();
        let entry = SnapshotEntry::from_product(&product, "mystery");
        assert_eq!(entry.ingredients, vec!["Unknown"]);
    }

    #[test]
    fn test_write_overwrites_with_indented_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.json");
        std::fs::write(&path, "stale contents").unwrap();

        let entries = vec![SnapshotEntry {
            name: "Oat Drink".into(),
            ingredients: vec!["water".into(), "oats".into()],
            image: String::new(),
        }];
        write_snapshot(&path, &entries).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("[\n    {"));
        let parsed: Vec<SnapshotEntry> = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, entries);
    }
}
