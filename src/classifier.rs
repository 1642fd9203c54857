//! Ingredient classification by partial match against the category table.

use crate::category_table::{Category, CategoryTable};

/// Classify a free-text ingredient.
///
/// The input is lower-cased and trimmed, then the table is walked in insertion
/// order; the first key contained in the input decides the category.
/// "palm oil, refined" therefore matches a "palm oil" entry.
/// No match (or blank input) is Neutral.
pub fn classify(ingredient: &str, table: &CategoryTable) -> Category {
    let text = ingredient.trim().to_lowercase();
    if text.is_empty() {
        return Category::Neutral;
    }

    table
        .entries()
        .find(|(key, _)| text.contains(*key))
        .map(|(_, category)| category)
        .unwrap_or(Category::Neutral)
}
