//! Eco Scorer - folds ingredient classifications and packaging into a 0-100 score
//!
//! Scoring walk for one product:
//! - start from the baseline (50)
//! - no structured ingredient list → baseline, nothing tracked, stop
//! - harmful ingredient -15, good ingredient +10, neutral untracked
//! - packaging: "plastic" -10, otherwise "paper" +5
//! - additive tags -10 each (tag tracked as harmful)
//! - dedupe lists, harmful wins over good, clamp to [0, 100]

use crate::category_table::{Category, CategoryTable};
use crate::classifier::classify;
use crate::product::Product;
use rustc_hash::FxHashSet;
use serde::Serialize;
use std::sync::Arc;

pub const BASELINE_SCORE: i32 = 50;
pub const HARMFUL_PENALTY: i32 = 15;
pub const GOOD_BONUS: i32 = 10;
pub const PLASTIC_PENALTY: i32 = 10;
pub const PAPER_BONUS: i32 = 5;
pub const ADDITIVE_PENALTY: i32 = 10;

pub const MIN_SCORE: i32 = 0;
pub const MAX_SCORE: i32 = 100;

/// Eco score result for one product
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EcoScoreResult {
    pub eco_score: u8,
    pub good_ingredients: Vec<String>,
    pub harmful_ingredients: Vec<String>,
}

impl EcoScoreResult {
    pub fn baseline() -> Self {
        Self {
            eco_score: BASELINE_SCORE as u8,
            good_ingredients: Vec::new(),
            harmful_ingredients: Vec::new(),
        }
    }
}

/// Intermediate values, kept for diagnostics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreBreakdown {
    /// Score before clamping; may leave [0, 100]
    pub raw_score: i32,
    pub packaging_adjustment: i32,
    pub additive_count: usize,
    pub good_ingredients: Vec<String>,
    pub harmful_ingredients: Vec<String>,
}

impl ScoreBreakdown {
    pub fn final_score(&self) -> u8 {
        self.raw_score.clamp(MIN_SCORE, MAX_SCORE) as u8
    }
}

/// Scorer holding the shared, read-only category table
#[derive(Debug, Clone)]
pub struct EcoScorer {
    table: Arc<CategoryTable>,
}

impl EcoScorer {
    pub fn new(table: Arc<CategoryTable>) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &CategoryTable {
        &self.table
    }

    /// Score a product
    pub fn score(&self, product: &Product) -> EcoScoreResult {
        let breakdown = self.breakdown(product);
        let eco_score = breakdown.final_score();

        tracing::debug!(
            product = product.name_or_unknown(),
            raw = breakdown.raw_score,
            packaging = breakdown.packaging_adjustment,
            additives = breakdown.additive_count,
            good = ?breakdown.good_ingredients,
            harmful = ?breakdown.harmful_ingredients,
            eco_score,
            "Scored product"
        );

        EcoScoreResult {
            eco_score,
            good_ingredients: breakdown.good_ingredients,
            harmful_ingredients: breakdown.harmful_ingredients,
        }
    }

    /// Compute the unclamped breakdown behind `score`
    pub fn breakdown(&self, product: &Product) -> ScoreBreakdown {
        let mut raw_score = BASELINE_SCORE;
        let mut good = Vec::new();
        let mut harmful = Vec::new();

        if !product.has_structured_ingredients() {
            tracing::warn!(
                "No structured ingredients for {}; using baseline score",
                product.name_or_unknown()
            );
            return ScoreBreakdown {
                raw_score,
                packaging_adjustment: 0,
                additive_count: 0,
                good_ingredients: good,
                harmful_ingredients: harmful,
            };
        }

        for record in &product.ingredients {
            let name = record.text.trim().to_lowercase();
            if name.is_empty() {
                continue;
            }

            match classify(&name, &self.table) {
                Category::Harmful => {
                    harmful.push(name);
                    raw_score -= HARMFUL_PENALTY;
                }
                Category::Good => {
                    good.push(name);
                    raw_score += GOOD_BONUS;
                }
                Category::Neutral => {}
            }
        }

        let packaging_adjustment = packaging_adjustment(&product.packaging);
        raw_score += packaging_adjustment;

        let mut additive_count = 0;
        for tag in product.additives.iter().flatten() {
            let additive = strip_tag_namespace(tag);
            if additive.is_empty() {
                continue;
            }
            harmful.push(additive.to_string());
            raw_score -= ADDITIVE_PENALTY;
            additive_count += 1;
        }

        let harmful = dedupe(harmful);
        let harmful_set: FxHashSet<&str> = harmful.iter().map(String::as_str).collect();
        let good: Vec<String> = dedupe(good)
            .into_iter()
            .filter(|g| !harmful_set.contains(g.as_str()))
            .collect();

        ScoreBreakdown {
            raw_score,
            packaging_adjustment,
            additive_count,
            good_ingredients: good,
            harmful_ingredients: harmful,
        }
    }
}

/// Packaging adjustment: plastic takes precedence over paper, never both.
pub fn packaging_adjustment(packaging: &str) -> i32 {
    let lowered = packaging.to_lowercase();
    let materials: Vec<&str> = lowered.split(',').map(str::trim).collect();

    if materials.contains(&"plastic") {
        -PLASTIC_PENALTY
    } else if materials.contains(&"paper") {
        PAPER_BONUS
    } else {
        0
    }
}

/// `en:e330` → `e330`; tags without a namespace pass through trimmed.
pub fn strip_tag_namespace(tag: &str) -> &str {
    match tag.rfind(':') {
        Some(pos) => tag[pos + 1..].trim(),
        None => tag.trim(),
    }
}

/// Remove repeats, keeping first-seen order
fn dedupe(items: Vec<String>) -> Vec<String> {
    let mut seen = FxHashSet::default();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}
