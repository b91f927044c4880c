//! Integration test walking one in-game day through every system.

use guildcraft_economy::rng::{self, FixedRoll};
use guildcraft_economy::{
    craft_with_bonuses, Card, Deck, DraftState, EngineConfig, GamePhase, GameState, Inventory,
    MasterData, PlayerState, QualityRank, ShopState, TargetAction,
};

const MASTER_DATA: &str = r#"
[[materials]]
id = "herb"
name = "Healing Herb"
base_quality = "C"

[[materials]]
id = "spring_water"
name = "Spring Water"
base_quality = "B"

[[cards]]
kind = "gathering"
id = "forest"
name = "Whispering Forest"
cost = 1
materials = [
    { material_id = "herb", quantity = 3, probability = 1.0 },
    { material_id = "spring_water", quantity = 1, probability = 1.0 },
]

[[cards]]
kind = "gathering"
id = "spring"
name = "Hidden Spring"
cost = 1
materials = [{ material_id = "spring_water", quantity = 2, probability = 1.0, quality = "A" }]

[[cards]]
kind = "recipe"
id = "recipe_potion"
name = "Healing Potion"
cost = 2
required_materials = [
    { material_id = "herb", quantity = 2 },
    { material_id = "spring_water", quantity = 1, min_quality = "B" },
]
output_item_id = "healing_potion"
category = "medicine"

[[cards]]
kind = "enhancement"
id = "steady_hands"
name = "Steady Hands"
effect = { type = "QUALITY_UP", value = 10 }
target_action = "ALL"

[[cards]]
kind = "enhancement"
id = "quick_step"
name = "Quick Step"
effect = { type = "COST_REDUCTION", value = 1 }
target_action = "ALCHEMY"

[[artifacts]]
id = "merchant_ring"
name = "Merchant Ring"
effect = { type = "GOLD_BOOST", value = 50 }
acquisition_type = "shop"

[[shop_items]]
id = "buy_ring"
name = "Merchant Ring"
kind = "artifact"
reference_id = "merchant_ring"
price = 60
stock = 1
"#;

#[test]
fn test_full_day() {
    let data = MasterData::from_toml_str(MASTER_DATA).unwrap();
    let config = EngineConfig::default();
    let mut game = GameState::new();
    let mut player = PlayerState::new(&config);
    let mut inventory = Inventory::new();

    // Gathering: two draft rounds with guaranteed yields
    game = game.next_phase();
    assert_eq!(game.phase(), GamePhase::Gathering);
    let locations = data.gathering_cards_unlocked_at(player.rank());
    let mut draft = DraftState::new(2);
    for pick in ["forest", "spring"] {
        draft = draft.generate_pool(&locations, 3, &mut rng::seeded(3)).unwrap();
        draft = draft.select_card(pick, &data, &mut FixedRoll::LOW).unwrap().state;
    }
    assert!(draft.is_complete());
    inventory = inventory.add_all(draft.obtained_materials());
    assert_eq!(inventory.total_quantity("herb"), 3);
    assert_eq!(inventory.total_quantity("spring_water"), 3);

    // Alchemy: play the recipe with both enhancements in hand
    game = game.next_phase();
    let deck = Deck::from_config(
        vec![
            data.require_card("recipe_potion").unwrap().clone(),
            data.require_card("steady_hands").unwrap().clone(),
            data.require_card("quick_step").unwrap().clone(),
        ],
        &config,
    );
    let (deck, hand) = deck.draw(config.hand_size, &mut FixedRoll::LOW);
    assert_eq!(hand.len(), 3);

    let recipe_card = data.require_card("recipe_potion").unwrap();
    let recipe = recipe_card.as_recipe().unwrap();
    let enhancements: Vec<_> = hand.iter().filter_map(Card::as_enhancement).cloned().collect();
    let cost_effects: Vec<_> = enhancements
        .iter()
        .filter(|card| card.can_apply_to(TargetAction::Alchemy))
        .map(|card| *card.effect())
        .collect();

    player = player.spend_for_card(recipe_card, &cost_effects).unwrap();
    assert_eq!(player.action_points(), 2);

    let outcome = craft_with_bonuses(&inventory, recipe, &enhancements, &[], &mut FixedRoll::HIGH).unwrap();
    inventory = outcome.inventory;
    assert_eq!(outcome.crafted_item.item_id, "healing_potion");
    assert!(outcome.crafted_item.quality_rank >= QualityRank::B);
    assert_eq!(inventory.total_quantity("herb"), 1);
    assert_eq!(inventory.total_quantity("spring_water"), 2);

    let deck = deck.use_card("recipe_potion").unwrap().discard_hand();
    assert_eq!(deck.discard_pile().len(), 3);

    // Delivery: reward, then a shop visit
    game = game.next_phase();
    assert_eq!(game.phase(), GamePhase::Delivery);
    player = player.add_gold(20).add_promotion_gauge(40);

    let shop = ShopState::for_player(&player);
    let bought = shop.purchase(&data, "buy_ring").unwrap();
    assert_eq!(bought.state.gold(), 60);
    assert_eq!(bought.state.remaining_stock(&bought.item), Some(0));
    player = player.subtract_gold(bought.item.price);

    let ring = data.artifact(&bought.item.reference_id).unwrap().clone();
    player = player.reward_gold(10, &[ring]);
    assert_eq!(player.gold(), 75);

    // Back to the quest board on day two
    game = game.next_phase();
    player = player.restore_action_points();
    assert_eq!(game.phase(), GamePhase::QuestAccept);
    assert_eq!(game.day(), 2);
    assert_eq!(player.action_points(), config.max_action_points);
}

#[test]
fn test_master_data_rejects_bad_reference() {
    let broken = MASTER_DATA.replace("reference_id = \"merchant_ring\"", "reference_id = \"crown\"");
    assert!(MasterData::from_toml_str(&broken).is_err());
}
