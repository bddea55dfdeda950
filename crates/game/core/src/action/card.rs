use crate::action::ActionTransition;
use crate::cards::{CardDefinition, CardEffect, CardTarget, take_from_hand};
use crate::combat::{DamageApplied, apply_damage, calculate_damage};
use crate::env::{BattleEnv, RngSource};
use crate::error::{ErrorSeverity, GameError};
use crate::state::{BattleState, Buff, CardId, LogTag, UnitId, UnitState};
use crate::strain::apply_strain;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CardError {
    #[error("battle is already over")]
    PhaseTerminal,

    #[error("unit {0} not found")]
    UnitNotFound(UnitId),

    #[error("target {0} not found")]
    TargetNotFound(UnitId),

    #[error("hand has no card at index {index} (size {hand_size})")]
    NotInHand { index: usize, hand_size: usize },

    #[error("card {0} is not in the catalog")]
    UnknownCard(CardId),

    #[error("card {card} cannot target {target}")]
    InvalidTarget { card: CardId, target: UnitId },

    #[error("{target} is {distance} tiles away, card {card} reaches {range}")]
    OutOfRange {
        card: CardId,
        target: UnitId,
        distance: u32,
        range: u32,
    },

    #[error("unit {0} is not on the grid")]
    NotPlaced(UnitId),
}

impl GameError for CardError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::OutOfRange { .. } => ErrorSeverity::Recoverable,
            Self::UnknownCard(_) => ErrorSeverity::Internal,
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::PhaseTerminal => "CARD_PHASE_TERMINAL",
            Self::UnitNotFound(_) => "CARD_UNIT_NOT_FOUND",
            Self::TargetNotFound(_) => "CARD_TARGET_NOT_FOUND",
            Self::NotInHand { .. } => "CARD_NOT_IN_HAND",
            Self::UnknownCard(_) => "CARD_UNKNOWN",
            Self::InvalidTarget { .. } => "CARD_INVALID_TARGET",
            Self::OutOfRange { .. } => "CARD_OUT_OF_RANGE",
            Self::NotPlaced(_) => "CARD_NOT_PLACED",
        }
    }
}

/// What the card's effect did to its target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CardResolution {
    Damaged { damage: i32, killed: bool },
    Healed { amount: i32 },
    Guarded { magnitude: i32 },
    Vented { amount: u32 },
    Nothing,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CardOutcome {
    pub card: CardId,
    pub target: UnitId,
    pub resolution: CardResolution,
}

/// Plays the card at `hand_index` from the actor's hand.
///
/// Damage cards skip the jam and accuracy rolls that the attack action makes.
/// Every card moves to the discard pile and charges its strain cost.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayCardAction {
    pub actor: UnitId,
    pub hand_index: usize,
    /// `None` targets the actor itself.
    pub target: Option<UnitId>,
}

impl PlayCardAction {
    pub fn new(actor: impl Into<UnitId>, hand_index: usize, target: Option<UnitId>) -> Self {
        Self {
            actor: actor.into(),
            hand_index,
            target,
        }
    }

    pub fn target_id(&self) -> &UnitId {
        self.target.as_ref().unwrap_or(&self.actor)
    }

    fn card<'e>(
        &self,
        actor: &UnitState,
        env: &BattleEnv<'e>,
    ) -> Result<&'e CardDefinition, CardError> {
        let id = actor
            .cards
            .hand
            .get(self.hand_index)
            .ok_or(CardError::NotInHand {
                index: self.hand_index,
                hand_size: actor.cards.hand.len(),
            })?;
        env.cards()
            .card(id)
            .ok_or_else(|| CardError::UnknownCard(id.clone()))
    }
}

/// Whether `card` may be played by `actor` on `target`, range included.
pub fn check_card_target(
    card: &CardDefinition,
    actor: &UnitState,
    target: &UnitState,
) -> Result<(), CardError> {
    let invalid = || CardError::InvalidTarget {
        card: card.id.clone(),
        target: target.id.clone(),
    };
    match card.target {
        CardTarget::SelfOnly if target.id != actor.id => return Err(invalid()),
        CardTarget::Enemy if !actor.side.opposes(target.side) => return Err(invalid()),
        CardTarget::Ally if actor.side != target.side => return Err(invalid()),
        _ => {}
    }
    if target.id == actor.id {
        return Ok(());
    }

    let origin = actor
        .position
        .ok_or_else(|| CardError::NotPlaced(actor.id.clone()))?;
    let destination = target
        .position
        .ok_or_else(|| CardError::NotPlaced(target.id.clone()))?;
    let distance = origin.manhattan(destination);
    if distance > card.range {
        return Err(CardError::OutOfRange {
            card: card.id.clone(),
            target: target.id.clone(),
            distance,
            range: card.range,
        });
    }
    Ok(())
}

impl ActionTransition for PlayCardAction {
    type Error = CardError;
    type Result = CardOutcome;

    fn actor(&self) -> &UnitId {
        &self.actor
    }

    fn pre_validate(&self, state: &BattleState, env: &BattleEnv<'_>) -> Result<(), Self::Error> {
        if state.is_terminal() {
            return Err(CardError::PhaseTerminal);
        }
        let actor = state
            .unit(&self.actor)
            .ok_or_else(|| CardError::UnitNotFound(self.actor.clone()))?;
        let card = self.card(actor, env)?;
        let target_id = self.target_id();
        let target = state
            .unit(target_id)
            .ok_or_else(|| CardError::TargetNotFound(target_id.clone()))?;
        check_card_target(card, actor, target)
    }

    fn apply<R: RngSource + ?Sized>(
        &self,
        state: &mut BattleState,
        env: &BattleEnv<'_>,
        _rng: &mut R,
    ) -> Result<Self::Result, Self::Error> {
        let config = env.config();
        let actor = state
            .unit(&self.actor)
            .ok_or_else(|| CardError::UnitNotFound(self.actor.clone()))?;
        let card = self.card(actor, env)?;
        let actor_name = actor.name.clone();
        let actor_atk = actor.stats.atk;
        let target_id = self.target_id().clone();

        let target_name = state
            .unit(&target_id)
            .map(|unit| unit.name.clone())
            .ok_or_else(|| CardError::TargetNotFound(target_id.clone()))?;
        let line = if target_id == self.actor {
            format!("{actor_name} plays {}.", card.name)
        } else {
            format!("{actor_name} plays {} on {target_name}.", card.name)
        };
        state.log.push(LogTag::Card, line);

        if let Some(unit) = state.unit_mut(&self.actor) {
            take_from_hand(unit, self.hand_index);
        }

        let resolution = match card.effect {
            CardEffect::Damage(amount) => {
                let damage = amount.max(config.min_damage);
                deal_damage(state, &actor_name, &target_id, damage)?
            }
            CardEffect::Strike => {
                let defender = state
                    .unit(&target_id)
                    .ok_or_else(|| CardError::TargetNotFound(target_id.clone()))?;
                let damage = calculate_damage(actor_atk, defender, config);
                deal_damage(state, &actor_name, &target_id, damage)?
            }
            CardEffect::Heal(amount) => {
                let target = state
                    .unit_mut(&target_id)
                    .ok_or_else(|| CardError::TargetNotFound(target_id.clone()))?;
                let before = target.hp;
                target.hp = (target.hp + amount.max(0)).min(target.max_hp);
                let healed = target.hp - before;
                let (hp, max_hp) = (target.hp, target.max_hp);
                state.log.push(
                    LogTag::Heal,
                    format!("{target_name} recovers {healed} HP (HP {hp}/{max_hp})."),
                );
                CardResolution::Healed { amount: healed }
            }
            CardEffect::Guard {
                magnitude,
                duration,
            } => {
                let target = state
                    .unit_mut(&target_id)
                    .ok_or_else(|| CardError::TargetNotFound(target_id.clone()))?;
                target.buffs.push(Buff::defense_up(magnitude, duration));
                state.log.push(
                    LogTag::Buff,
                    format!("{target_name} braces: +{magnitude} DEF for {duration} turn(s)."),
                );
                CardResolution::Guarded { magnitude }
            }
            CardEffect::Cooldown(amount) => {
                let vent = i32::try_from(amount).unwrap_or(i32::MAX);
                let change = apply_strain(state, &self.actor, -vent, config)
                    .map_err(|_| CardError::UnitNotFound(self.actor.clone()))?;
                CardResolution::Vented {
                    amount: change.before - change.after,
                }
            }
            CardEffect::None => CardResolution::Nothing,
        };

        if card.strain_cost > 0 {
            let cost = i32::try_from(card.strain_cost).unwrap_or(i32::MAX);
            apply_strain(state, &self.actor, cost, config)
                .map_err(|_| CardError::UnitNotFound(self.actor.clone()))?;
        }

        Ok(CardOutcome {
            card: card.id.clone(),
            target: target_id,
            resolution,
        })
    }
}

fn deal_damage(
    state: &mut BattleState,
    source_name: &str,
    target: &UnitId,
    damage: i32,
) -> Result<CardResolution, CardError> {
    let applied = apply_damage(state, source_name, target, damage)
        .map_err(|_| CardError::TargetNotFound(target.clone()))?;
    Ok(CardResolution::Damaged {
        damage,
        killed: matches!(applied, DamageApplied::Killed { .. }),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardTable;
    use crate::config::BattleConfig;
    use crate::engine::{BattleEngine, ExecuteError, TransitionPhase};
    use crate::env::{Grid, LoadPenalties, PcgRng, ScriptedRng, TemplateStats, UnitTemplate};
    use crate::state::{BattlePhase, BuffKind, Position, Side};
    use crate::ActionResult;

    fn unit(id: &str, side: Side, agi: i32, hand: &[&str], position: Position) -> UnitState {
        let template = UnitTemplate::new(
            id,
            id,
            "c",
            TemplateStats {
                max_hp: 15,
                atk: 4,
                def: 1,
                agi,
                acc: None,
            },
        );
        let mut unit =
            UnitState::from_template(&template, UnitId::from(id), side, Some(position), vec![]);
        unit.cards.hand = hand.iter().copied().map(CardId::from).collect();
        unit
    }

    /// p1 holds power slash, guarded stance and quick shot; e1 stands
    /// adjacent and e2 five tiles off.
    fn battle() -> BattleState {
        let hand = ["class_power_slash", "card_guarded_stance", "card_quick_shot"];
        let mut state = BattleState::new(
            Grid::new(8, 4),
            vec![
                unit("p1", Side::Player, 5, &hand, Position::new(0, 0)),
                unit("e1", Side::Enemy, 3, &[], Position::new(1, 0)),
                unit("e2", Side::Enemy, 2, &[], Position::new(4, 1)),
            ],
        );
        state.active = Some(UnitId::from("p1"));
        state.turn = 1;
        state
    }

    fn id(raw: &str) -> UnitId {
        UnitId::from(raw)
    }

    #[test]
    fn played_card_moves_to_discard_and_charges_strain() {
        let config = BattleConfig::default();
        let cards = CardTable::starter();
        let mut rng = PcgRng::new(3);
        let mut engine = BattleEngine::new(BattleEnv::new(&config, &cards), &mut rng);

        let outcome = engine
            .play_card(&battle(), &id("p1"), 0, Some(id("e1")))
            .unwrap();

        assert_eq!(
            outcome.result,
            ActionResult::PlayCard(CardOutcome {
                card: CardId::from("class_power_slash"),
                target: id("e1"),
                resolution: CardResolution::Damaged {
                    damage: 6,
                    killed: false
                },
            })
        );
        let state = &outcome.state;
        let p1 = state.unit(&id("p1")).unwrap();
        assert_eq!(
            p1.cards.hand,
            vec![
                CardId::from("card_guarded_stance"),
                CardId::from("card_quick_shot")
            ]
        );
        assert_eq!(p1.cards.discard, vec![CardId::from("class_power_slash")]);
        assert_eq!(p1.strain, 2);
        assert_eq!(state.unit(&id("e1")).unwrap().hp, 9);
        assert_eq!(state.log.count(LogTag::Card), 1);
    }

    #[test]
    fn crossing_the_threshold_raises_one_alert() {
        let config = BattleConfig::default();
        let cards = CardTable::starter();
        let mut rng = PcgRng::new(3);
        let mut engine = BattleEngine::new(BattleEnv::new(&config, &cards), &mut rng);
        let mut state = battle();
        state.unit_mut(&id("p1")).unwrap().strain = 5;

        let state = engine
            .play_card(&state, &id("p1"), 0, Some(id("e1")))
            .unwrap()
            .into_state();
        assert_eq!(state.unit(&id("p1")).unwrap().strain, 7);
        assert_eq!(state.log.count(LogTag::Alert), 1);

        // already over: further cost stays silent
        let state = engine
            .play_card(&state, &id("p1"), 0, None)
            .unwrap()
            .into_state();
        assert_eq!(state.unit(&id("p1")).unwrap().strain, 8);
        assert_eq!(state.log.count(LogTag::Alert), 1);
    }

    #[test]
    fn guard_lasts_until_the_units_next_activation() {
        let config = BattleConfig::default();
        let cards = CardTable::starter();
        let mut rng = PcgRng::new(5);
        let mut engine = BattleEngine::new(BattleEnv::new(&config, &cards), &mut rng);

        let outcome = engine.play_card(&battle(), &id("p1"), 1, None).unwrap();
        assert!(matches!(
            outcome.result,
            ActionResult::PlayCard(CardOutcome {
                resolution: CardResolution::Guarded { magnitude: 2 },
                ..
            })
        ));
        let buffs = &outcome.state.unit(&id("p1")).unwrap().buffs;
        assert_eq!(buffs.len(), 1);
        assert_eq!(buffs[0].kind, BuffKind::DefenseUp);
        assert_eq!(buffs[0].remaining, 1);

        let mut state = outcome.into_state();
        for _ in 0..state.turn_order.len() - 1 {
            state = engine.advance_turn(&state).unwrap().into_state();
            assert_eq!(state.unit(&id("p1")).unwrap().buffs.len(), 1);
        }
        state = engine.advance_turn(&state).unwrap().into_state();
        assert_eq!(state.active, Some(id("p1")));
        assert!(state.unit(&id("p1")).unwrap().buffs.is_empty());
    }

    #[test]
    fn damage_cards_skip_jam_and_accuracy_rolls() {
        let config = BattleConfig::default();
        let cards = CardTable::starter();
        let mut state = battle().with_load_penalties(Some(LoadPenalties::from_ratios(
            0.5, 1.5, 0.5,
        )));
        state.unit_mut(&id("p1")).unwrap().strain = 9;

        let mut rng = ScriptedRng::new([0.0, 0.99]);
        let mut engine = BattleEngine::new(BattleEnv::new(&config, &cards), &mut rng);
        let outcome = engine
            .play_card(&state, &id("p1"), 2, Some(id("e2")))
            .unwrap();
        drop(engine);

        assert_eq!(outcome.state.unit(&id("e2")).unwrap().hp, 12);
        assert_eq!(outcome.state.log.count(LogTag::Jam), 0);
        assert_eq!(outcome.state.log.count(LogTag::Miss), 0);
        assert_eq!(rng.remaining(), 2);
    }

    #[test]
    fn lethal_card_settles_the_battle() {
        let config = BattleConfig::default();
        let cards = CardTable::starter();
        let mut state = battle();
        state.remove_unit(&id("e2"));
        state.unit_mut(&id("e1")).unwrap().hp = 4;

        let mut rng = PcgRng::new(8);
        let mut engine = BattleEngine::new(BattleEnv::new(&config, &cards), &mut rng);
        let outcome = engine
            .play_card(&state, &id("p1"), 0, Some(id("e1")))
            .unwrap();

        assert!(matches!(
            outcome.result,
            ActionResult::PlayCard(CardOutcome {
                resolution: CardResolution::Damaged { killed: true, .. },
                ..
            })
        ));
        let state = &outcome.state;
        assert!(state.unit(&id("e1")).is_none());
        assert_eq!(state.phase, BattlePhase::Victory);
        assert!(state.active.is_none());
        assert!(state.rewards.is_some());
        assert_eq!(state.log.count(LogTag::Reward), 1);
    }

    #[test]
    fn out_of_range_and_wrong_side_are_rejected() {
        let config = BattleConfig::default();
        let cards = CardTable::starter();
        let mut rng = PcgRng::new(1);
        let mut engine = BattleEngine::new(BattleEnv::new(&config, &cards), &mut rng);
        let state = battle();

        // power slash reaches 1 tile, e2 is 5 away
        let err = engine
            .play_card(&state, &id("p1"), 0, Some(id("e2")))
            .unwrap_err();
        assert_eq!(err.phase(), Some(TransitionPhase::PreValidate));
        let ExecuteError::PlayCard(failure) = err else {
            panic!("expected a card error");
        };
        assert_eq!(
            failure.error,
            CardError::OutOfRange {
                card: CardId::from("class_power_slash"),
                target: id("e2"),
                distance: 5,
                range: 1,
            }
        );

        // guarded stance only targets its player
        let err = engine
            .play_card(&state, &id("p1"), 1, Some(id("e1")))
            .unwrap_err();
        let ExecuteError::PlayCard(failure) = err else {
            panic!("expected a card error");
        };
        assert_eq!(
            failure.error,
            CardError::InvalidTarget {
                card: CardId::from("card_guarded_stance"),
                target: id("e1"),
            }
        );
    }
}
