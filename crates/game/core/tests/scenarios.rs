use tactics_core::cards::draw_cards;
use tactics_core::combat::{calculate_damage, effective_accuracy, jam_probability};
use tactics_core::engine::resolve_outcome;
use tactics_core::{
    ActionResult, AttackOutcome, BattleConfig, BattleEngine, BattleEnv, BattlePhase, BattleState,
    CardId, CardTable, EncounterBuilder, Grid, LoadPenalties, LogTag, PcgRng, Position, Rewards,
    ScriptedRng, Side, TemplateStats, UnitId, UnitState, UnitTemplate,
};

fn template(id: &str, agi: i32, acc: Option<i32>) -> UnitTemplate {
    UnitTemplate::new(
        id,
        id,
        "vanguard",
        TemplateStats {
            max_hp: 15,
            atk: 5,
            def: 1,
            agi,
            acc,
        },
    )
    .with_deck(["core_basic_attack", "core_guard", "core_wait"])
}

fn duel(attacker_acc: i32, penalties: Option<LoadPenalties>) -> BattleState {
    let attacker = UnitState::from_template(
        &template("p1", 5, Some(attacker_acc)),
        UnitId::from("p1"),
        Side::Player,
        Some(Position::new(0, 0)),
        vec![],
    );
    let defender = UnitState::from_template(
        &template("e1", 3, None),
        UnitId::from("e1"),
        Side::Enemy,
        Some(Position::new(1, 0)),
        vec![],
    );
    let mut state =
        BattleState::new(Grid::new(6, 4), vec![attacker, defender]).with_load_penalties(penalties);
    state.active = Some(UnitId::from("p1"));
    state.turn = 1;
    state
}

#[test]
fn fastest_unit_acts_first() {
    let config = BattleConfig::default();
    let state = EncounterBuilder::with_dimensions(6, 4)
        .player(template("alpha", 4, None), None)
        .player(template("bravo", 6, None), None)
        .enemy(template("sentry", 3, None), None)
        .build(&config, &mut PcgRng::new(11))
        .unwrap();

    assert_eq!(
        state.turn_order,
        vec![
            UnitId::from("bravo"),
            UnitId::from("alpha"),
            UnitId::from("sentry_1")
        ]
    );
    assert_eq!(state.active, Some(UnitId::from("bravo")));
    assert_eq!(state.turn, 1);
    assert_eq!(
        state.unit(&UnitId::from("bravo")).unwrap().cards.hand.len(),
        3
    );
}

#[test]
fn empty_draw_pile_reshuffles_discards() {
    let mut unit = UnitState::from_template(
        &template("p1", 3, None),
        UnitId::from("p1"),
        Side::Player,
        None,
        vec![],
    );
    unit.cards.discard = ["a", "b", "c"].into_iter().map(CardId::from).collect();

    let report = draw_cards(&mut unit, 5, &mut PcgRng::new(4));
    assert!(report.reshuffled);
    assert_eq!(report.drawn, 3);
    assert_eq!(unit.cards.hand.len(), 3);
    assert!(unit.cards.draw.is_empty());
    assert!(unit.cards.discard.is_empty());
}

#[test]
fn overstrained_attacker_misses_on_high_roll() {
    let config = BattleConfig::default();
    let cards = CardTable::starter();
    let mut state = duel(90, None);
    state.unit_mut(&UnitId::from("p1")).unwrap().strain = 6;
    assert_eq!(
        effective_accuracy(state.unit(&UnitId::from("p1")).unwrap(), &config),
        70
    );

    let mut rng = ScriptedRng::new([0.75]);
    let mut engine = BattleEngine::new(BattleEnv::new(&config, &cards), &mut rng);
    let outcome = engine
        .attack(&state, &UnitId::from("p1"), &UnitId::from("e1"))
        .unwrap();

    assert_eq!(
        outcome.result,
        ActionResult::Attack(AttackOutcome::Missed { accuracy: 70 })
    );
    let after = &outcome.state;
    assert_eq!(after.unit(&UnitId::from("e1")).unwrap().hp, 15);
    assert_eq!(after.unit(&UnitId::from("p1")).unwrap().strain, 6);
    assert!(
        after
            .log
            .last()
            .unwrap()
            .message
            .ends_with("(strain interference).")
    );
}

#[test]
fn bulk_overload_jam_short_circuits_attack() {
    let config = BattleConfig::default();
    let cards = CardTable::starter();
    let penalties = LoadPenalties::from_ratios(0.5, 1.3, 0.5);
    let state = duel(100, Some(penalties));
    let attacker = state.unit(&UnitId::from("p1")).unwrap();
    assert!((jam_probability(attacker, Some(&penalties), &config) - 0.3).abs() < 1e-9);

    let mut rng = ScriptedRng::new([0.1, 0.0]);
    let mut engine = BattleEngine::new(BattleEnv::new(&config, &cards), &mut rng);
    let outcome = engine
        .attack(&state, &UnitId::from("p1"), &UnitId::from("e1"))
        .unwrap();
    drop(engine);

    assert_eq!(outcome.result, ActionResult::Attack(AttackOutcome::Jammed));
    assert_eq!(outcome.state.unit(&UnitId::from("e1")).unwrap().hp, 15);
    assert_eq!(outcome.state.log.count(LogTag::Jam), 1);
    assert_eq!(rng.remaining(), 1);
}

#[test]
fn victory_rewards_scale_with_enemy_count() {
    assert_eq!(
        Rewards::for_enemy_count(1).to_string(),
        "+10 WAD, +2 Metal Scrap, +1 Wood, +0 Chaos Shards, +0 Steam Components."
    );
    let three = Rewards::for_enemy_count(3);
    assert_eq!(
        (three.wad, three.metal_scrap, three.wood, three.chaos_shards),
        (30, 6, 3, 1)
    );
    assert_eq!(three.steam_components, 1);
}

#[test]
fn damage_never_drops_below_one() {
    let config = BattleConfig::default();
    let mut fortress = UnitState::from_template(
        &template("e1", 3, None),
        UnitId::from("e1"),
        Side::Enemy,
        None,
        vec![],
    );
    fortress.stats.def = 40;
    assert_eq!(calculate_damage(1, &fortress, &config), 1);
}

#[test]
fn full_rotation_increments_turn_once() {
    let config = BattleConfig::default();
    let cards = CardTable::starter();
    let mut state = EncounterBuilder::with_dimensions(6, 4)
        .player(template("alpha", 4, None), None)
        .player(template("bravo", 6, None), None)
        .enemy(template("sentry", 3, None), None)
        .build(&config, &mut PcgRng::new(2))
        .unwrap();
    let start_turn = state.turn;
    let start_active = state.active.clone();

    let mut rng = PcgRng::new(9);
    let mut engine = BattleEngine::new(BattleEnv::new(&config, &cards), &mut rng);
    for _ in 0..state.turn_order.len() {
        state = engine.advance_turn(&state).unwrap().into_state();
    }

    assert_eq!(state.turn, start_turn + 1);
    assert_eq!(state.active, start_active);
}

#[test]
fn outcome_evaluation_is_idempotent() {
    let config = BattleConfig::default();
    let mut state = duel(100, None);
    state.remove_unit(&UnitId::from("e1"));

    assert_eq!(resolve_outcome(&mut state, &config), BattlePhase::Victory);
    let settled = state.clone();
    assert_eq!(resolve_outcome(&mut state, &config), BattlePhase::Victory);
    assert_eq!(state, settled);
    assert_eq!(state.log.count(LogTag::Reward), 1);
}

#[test]
fn strain_floor_holds_under_heavy_venting() {
    let config = BattleConfig::default();
    let cards = CardTable::starter();
    let mut rng = PcgRng::new(1);
    let mut engine = BattleEngine::new(BattleEnv::new(&config, &cards), &mut rng);
    let mut state = duel(100, None);

    state = engine
        .apply_strain(&state, &UnitId::from("p1"), 2)
        .unwrap()
        .into_state();
    let outcome = engine
        .apply_strain(&state, &UnitId::from("p1"), -10)
        .unwrap();
    assert_eq!(outcome.result.before, 2);
    assert_eq!(outcome.result.after, 0);
}

#[test]
fn seeded_encounters_replay_identically() {
    let config = BattleConfig::default();
    let cards = CardTable::starter();
    let play = |seed: u64| {
        let mut rng = PcgRng::new(seed);
        let mut state = EncounterBuilder::with_dimensions(4, 3)
            .player(template("alpha", 5, None), Some(Position::new(0, 1)))
            .enemy(template("sentry", 3, None), Some(Position::new(1, 1)))
            .build(&config, &mut rng)
            .unwrap();
        let mut engine = BattleEngine::new(BattleEnv::new(&config, &cards), &mut rng);
        for _ in 0..40 {
            if state.is_terminal() {
                break;
            }
            let player_turn = state
                .active_unit()
                .is_some_and(|unit| unit.side == Side::Player);
            state = if player_turn {
                engine.auto_turn(&state).unwrap().into_state()
            } else {
                engine.enemy_turn(&state).unwrap().into_state()
            };
        }
        state
    };

    assert_eq!(play(21), play(21));
}
