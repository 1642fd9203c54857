//! Category Table - ingredient name → eco category
//!
//! Loaded once at startup from a two-column CSV (`ingredient`, `category`)
//! and shared read-only for the lifetime of the process.
//!
//! Entries keep insertion order: the classifier walks them front to back and
//! the first substring match wins, so order is part of the table's meaning.

use polars::prelude::*;
use rustc_hash::FxHashMap;
use std::io::Cursor;
use std::path::Path;

/// Classification of a single ingredient
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Good,
    Harmful,
    Neutral,
}

impl Category {
    /// Parse a category cell. Case-insensitive, surrounding whitespace ignored.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "good" => Some(Category::Good),
            "harmful" => Some(Category::Harmful),
            "neutral" => Some(Category::Neutral),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Good => "good",
            Category::Harmful => "harmful",
            Category::Neutral => "neutral",
        }
    }
}

/// Insertion-ordered ingredient → category mapping
#[derive(Debug, Clone, Default)]
pub struct CategoryTable {
    entries: Vec<(String, Category)>,
    /// key → position in `entries`
    index: FxHashMap<String, usize>,
}

/// Outcome of loading the table at startup
///
/// `Empty` is not an error: the service still runs, it just classifies every
/// ingredient as Neutral.
#[derive(Debug)]
pub enum TableLoad {
    Loaded(CategoryTable),
    Empty { reason: String },
}

impl TableLoad {
    pub fn into_table(self) -> CategoryTable {
        match self {
            TableLoad::Loaded(table) => table,
            TableLoad::Empty { .. } => CategoryTable::default(),
        }
    }

    /// Emit the startup log line for this outcome.
    pub fn log_outcome(&self, source: &Path) {
        match self {
            TableLoad::Loaded(table) => {
                tracing::info!("Loaded {} category entries from {:?}", table.len(), source)
            }
            TableLoad::Empty { reason } => {
                tracing::warn!(
                    "Category table unavailable ({}); all ingredients will classify as neutral",
                    reason
                )
            }
        }
    }
}

impl CategoryTable {
    /// Build a table from (ingredient, category) pairs.
    ///
    /// Keys are lower-cased and trimmed; blank keys are ignored. A repeated key
    /// overwrites the earlier category but keeps the earlier position.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Category)>,
        S: AsRef<str>,
    {
        let mut table = CategoryTable::default();
        for (key, category) in entries {
            table.insert(key.as_ref(), category);
        }
        table
    }

    fn insert(&mut self, key: &str, category: Category) {
        let key = key.trim().to_lowercase();
        if key.is_empty() {
            return;
        }
        match self.index.get(&key) {
            Some(&pos) => self.entries[pos].1 = category,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, category));
            }
        }
    }

    /// Load the table from a CSV file.
    ///
    /// Never fails: a missing or unreadable source yields `TableLoad::Empty`.
    pub fn load(path: impl AsRef<Path>) -> TableLoad {
        let path = path.as_ref();
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                return TableLoad::Empty {
                    reason: format!("cannot read {:?}: {}", path, e),
                }
            }
        };

        match Self::parse_csv(bytes) {
            Ok(table) if table.is_empty() => TableLoad::Empty {
                reason: format!("{:?} contains no usable rows", path),
            },
            Ok(table) => TableLoad::Loaded(table),
            Err(e) => TableLoad::Empty {
                reason: format!("cannot parse {:?}: {:#}", path, e),
            },
        }
    }

    /// Parse CSV bytes with an `ingredient,category` header.
    ///
    /// Rows with a blank ingredient or an unknown category are dropped with a warning.
    /// Rows with extra fields keep their first two columns.
    pub fn parse_csv(bytes: Vec<u8>) -> anyhow::Result<Self> {
        use anyhow::Context;

        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_parse_options(CsvParseOptions::default().with_truncate_ragged_lines(true))
            .into_reader_with_file_handle(Cursor::new(bytes))
            .finish()
            .context("Failed to read category CSV")?;

        let ingredients = df
            .column("ingredient")
            .context("Column 'ingredient' not found")?
            .cast(&DataType::String)
            .context("Column 'ingredient' is not castable to string")?;
        let categories = df
            .column("category")
            .context("Column 'category' not found")?
            .cast(&DataType::String)
            .context("Column 'category' is not castable to string")?;

        let ingredients = ingredients.str()?;
        let categories = categories.str()?;

        let mut table = CategoryTable::default();
        let mut dropped = 0usize;

        for idx in 0..df.height() {
            let key = ingredients.get(idx).map(str::trim).unwrap_or("");
            if key.is_empty() {
                tracing::warn!("Dropping category row {}: missing ingredient", idx + 1);
                dropped += 1;
                continue;
            }

            match categories.get(idx).and_then(Category::parse) {
                Some(category) => table.insert(key, category),
                None => {
                    tracing::warn!(
                        "Dropping category row {} ({}): invalid category {:?}",
                        idx + 1,
                        key,
                        categories.get(idx)
                    );
                    dropped += 1;
                }
            }
        }

        if dropped > 0 {
            tracing::warn!("Dropped {} malformed category rows", dropped);
        }

        Ok(table)
    }

    /// Entries in insertion order
    pub fn entries(&self) -> impl Iterator<Item = (&str, Category)> {
        self.entries.iter().map(|(k, c)| (k.as_str(), *c))
    }

    /// Exact-key lookup (no substring matching)
    pub fn get(&self, key: &str) -> Option<Category> {
        self.index
            .get(&key.trim().to_lowercase())
            .map(|&pos| self.entries[pos].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_lowercases_keys_and_categories() {
        let csv = "ingredient,category\nPalm Oil,HARMFUL\n Vitamin C ,Good\n";
        let table = CategoryTable::parse_csv(csv.as_bytes().to_vec()).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.get("palm oil"), Some(Category::Harmful));
        assert_eq!(table.get("vitamin c"), Some(Category::Good));
    }

    #[test]
    fn test_malformed_rows_are_dropped() {
        let csv = "ingredient,category\nsugar,harmful\nsalt,\n,good\nwater,delicious\noats,good\n";
        let table = CategoryTable::parse_csv(csv.as_bytes().to_vec()).unwrap();

        let keys: Vec<&str> = table.entries().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["sugar", "oats"]);
    }

    #[test]
    fn test_ragged_row_does_not_reject_table() {
        let csv = "ingredient,category\nsugar,harmful\nsalt,harmful,extra\noats,good\n";
        let table = CategoryTable::parse_csv(csv.as_bytes().to_vec()).unwrap();

        let entries: Vec<(&str, Category)> = table.entries().collect();
        assert_eq!(
            entries,
            vec![
                ("sugar", Category::Harmful),
                ("salt", Category::Harmful),
                ("oats", Category::Good),
            ]
        );
    }

    #[test]
    fn test_duplicate_key_last_write_wins_in_original_position() {
        let csv = "ingredient,category\nsugar,harmful\noats,good\nsugar,neutral\n";
        let table = CategoryTable::parse_csv(csv.as_bytes().to_vec()).unwrap();

        let entries: Vec<(&str, Category)> = table.entries().collect();
        assert_eq!(
            entries,
            vec![("sugar", Category::Neutral), ("oats", Category::Good)]
        );
    }

    #[test]
    fn test_missing_column_is_an_error() {
        let csv = "name,category\nsugar,harmful\n";
        assert!(CategoryTable::parse_csv(csv.as_bytes().to_vec()).is_err());
    }

    #[test]
    fn test_load_missing_file_is_empty_outcome() {
        let outcome = CategoryTable::load("/definitely/not/here/ingredients.csv");
        match outcome {
            TableLoad::Empty { reason } => assert!(reason.contains("cannot read")),
            TableLoad::Loaded(_) => panic!("expected empty outcome"),
        }
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "ingredient,category").unwrap();
        writeln!(file, "sugar,harmful").unwrap();
        writeln!(file, "vitamin c,good").unwrap();

        let table = match CategoryTable::load(file.path()) {
            TableLoad::Loaded(table) => table,
            TableLoad::Empty { reason } => panic!("unexpected empty table: {}", reason),
        };
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_empty_outcome_into_table() {
        let table = TableLoad::Empty { reason: "test".into() }.into_table();
        assert!(table.is_empty());
    }

    #[test]
    fn test_category_parse() {
        assert_eq!(Category::parse(" Harmful "), Some(Category::Harmful));
        assert_eq!(Category::parse("bad"), None);
        assert_eq!(Category::Good.as_str(), "good");
    }
}
