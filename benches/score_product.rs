use criterion::{black_box, criterion_group, criterion_main, Criterion};
use eco_scorer_rust::{CategoryTable, EcoScorer, Product};
use std::sync::Arc;

fn load_scorer() -> EcoScorer {
    let bytes = include_bytes!("../data/ingredients.csv").to_vec();
    let table = CategoryTable::parse_csv(bytes).expect("bundled category table parses");
    EcoScorer::new(Arc::new(table))
}

fn bench_score_product(c: &mut Criterion) {
    let scorer = load_scorer();

    let mut spread = Product::with_ingredients(
        [
            "Sugar",
            "Palm Oil",
            "Hazelnuts (13%)",
            "Skimmed Milk Powder (8.7%)",
            "Fat-Reduced Cocoa (7.4%)",
            "Emulsifier: Lecithins (Soya)",
            "Vanillin",
        ],
        "plastic,jar",
    );
    spread.additives = Some(vec!["en:e322".into(), "en:e322i".into()]);

    let porridge = Product::with_ingredients(
        ["Organic Wholegrain Oats", "Water", "Sea Salt", "Vitamin D"],
        "paper",
    );

    c.bench_function("score_spread", |b| b.iter(|| scorer.score(black_box(&spread))));
    c.bench_function("score_porridge", |b| b.iter(|| scorer.score(black_box(&porridge))));
}

criterion_group!(benches, bench_score_product);
criterion_main!(benches);
