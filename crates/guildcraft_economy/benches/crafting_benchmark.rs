//! Benchmark for alchemy and deck resolution.
//!
//! Run with: cargo bench --package guildcraft_economy --bench crafting_benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use guildcraft_economy::card::{CardInfo, EnhancementCard, GatheringCard, RecipeCard, RequiredMaterial};
use guildcraft_economy::effect::{Effect, EffectType, TargetAction};
use guildcraft_economy::material::MaterialInstance;
use guildcraft_economy::quality::QualityRank;
use guildcraft_economy::{can_craft, craft, craft_with_enhancements, rng, Card, Deck, Inventory};

fn create_test_inventory() -> Inventory {
    // 20 materials, each split across three quality stacks
    let stacks: Vec<MaterialInstance> = (0..20u32)
        .flat_map(|i| {
            [QualityRank::D, QualityRank::C, QualityRank::A]
                .into_iter()
                .map(move |q| MaterialInstance::new(format!("mat_{i}"), q, 10))
        })
        .collect();
    Inventory::new().add_all(&stacks)
}

fn create_test_recipe() -> RecipeCard {
    let lines = (0..5u32)
        .map(|i| RequiredMaterial::new(format!("mat_{}", i * 3), 12))
        .collect();
    RecipeCard::new(CardInfo::new("recipe_bench", "Bench Elixir"), 2, lines, "elixir", "medicine").unwrap()
}

fn benchmark_can_craft(c: &mut Criterion) {
    let inventory = create_test_inventory();
    let recipe = create_test_recipe();

    c.bench_function("can_craft_check", |b| {
        b.iter(|| black_box(can_craft(&inventory, &recipe)));
    });
}

fn benchmark_craft_transaction(c: &mut Criterion) {
    let inventory = create_test_inventory();
    let recipe = create_test_recipe();

    c.bench_function("craft_five_lines", |b| {
        b.iter(|| black_box(craft(&inventory, &recipe)));
    });
}

fn benchmark_craft_with_enhancements(c: &mut Criterion) {
    let inventory = create_test_inventory();
    let recipe = create_test_recipe();
    let played = [
        EnhancementCard::new(
            CardInfo::new("focus", "Focus"),
            Effect::new(EffectType::QualityUp, 10),
            TargetAction::Alchemy,
        ),
        EnhancementCard::new(
            CardInfo::new("thrift", "Thrift"),
            Effect::new(EffectType::MaterialSave, 30),
            TargetAction::All,
        ),
    ];
    let mut rng = rng::seeded(42);

    c.bench_function("craft_with_enhancements", |b| {
        b.iter(|| black_box(craft_with_enhancements(&inventory, &recipe, &played, &mut rng)));
    });
}

fn benchmark_deck_cycle(c: &mut Criterion) {
    let cards: Vec<Card> = (0..30)
        .map(|i| {
            GatheringCard::new(CardInfo::new(format!("loc_{i}"), "Location"), 1, vec![])
                .unwrap()
                .into()
        })
        .collect();
    let deck = Deck::new(cards);
    let mut rng = rng::seeded(7);

    c.bench_function("deck_draw_discard_cycle", |b| {
        b.iter(|| {
            let mut current = deck.clone();
            for _ in 0..8 {
                let (next, drawn) = current.draw(5, &mut rng);
                black_box(&drawn);
                current = next.discard_hand();
            }
            black_box(current)
        });
    });
}

criterion_group!(
    benches,
    benchmark_can_craft,
    benchmark_craft_transaction,
    benchmark_craft_with_enhancements,
    benchmark_deck_cycle,
);
criterion_main!(benches);
