//! Per-combatant mutable record.

use super::{CardId, Position, Side, UnitId};
use crate::env::UnitTemplate;

/// Combat stats of a unit after template and load adjustments.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatStats {
    pub atk: i32,
    pub def: i32,
    pub agi: i32,
    pub acc: Option<i32>,
}

impl CombatStats {
    pub fn accuracy_or(&self, default: i32) -> i32 {
        self.acc.unwrap_or(default)
    }
}

/// The four card piles a unit cycles through during a battle.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CardPiles {
    pub draw: Vec<CardId>,
    pub hand: Vec<CardId>,
    pub discard: Vec<CardId>,
    /// Part of the record; no engine rule moves cards here yet.
    pub exhausted: Vec<CardId>,
}

impl CardPiles {
    pub fn with_draw_pile(draw: Vec<CardId>) -> Self {
        Self {
            draw,
            ..Self::default()
        }
    }

    pub fn total(&self) -> usize {
        self.draw.len() + self.hand.len() + self.discard.len() + self.exhausted.len()
    }
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum BuffKind {
    DefenseUp,
}

/// A timed modifier on a unit. `remaining` counts the owner's turn starts.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Buff {
    pub id: String,
    pub kind: BuffKind,
    pub magnitude: i32,
    pub remaining: u32,
}

impl Buff {
    pub fn new(id: impl Into<String>, kind: BuffKind, magnitude: i32, remaining: u32) -> Self {
        Self {
            id: id.into(),
            kind,
            magnitude,
            remaining,
        }
    }

    pub fn defense_up(magnitude: i32, remaining: u32) -> Self {
        Self::new("def_buff", BuffKind::DefenseUp, magnitude, remaining)
    }
}

/// Battle record of a single combatant.
///
/// # Invariants
///
/// - `strain` is unsigned and therefore never negative
/// - `position`, when set, is inside the grid and unique among units
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitState {
    pub id: UnitId,
    pub base_id: UnitId,
    pub name: String,
    pub class_id: String,
    pub side: Side,
    /// None while the unit is not on the grid.
    pub position: Option<Position>,
    pub hp: i32,
    pub max_hp: i32,
    pub stats: CombatStats,
    pub strain: u32,
    pub cards: CardPiles,
    pub buffs: Vec<Buff>,
}

impl UnitState {
    /// Creates a fresh unit at full hp with zero strain. `deck` becomes the
    /// draw pile as given; shuffling is the caller's job.
    pub fn from_template(
        template: &UnitTemplate,
        id: UnitId,
        side: Side,
        position: Option<Position>,
        deck: Vec<CardId>,
    ) -> Self {
        let stats = template.stats;
        Self {
            id,
            base_id: UnitId::new(template.id.clone()),
            name: template.name.clone(),
            class_id: template.class_id.clone(),
            side,
            position,
            hp: stats.max_hp,
            max_hp: stats.max_hp,
            stats: CombatStats {
                atk: stats.atk,
                def: stats.def,
                agi: stats.agi,
                acc: stats.acc,
            },
            strain: 0,
            cards: CardPiles::with_draw_pile(deck),
            buffs: Vec::new(),
        }
    }

    #[inline]
    pub fn is_player(&self) -> bool {
        self.side == Side::Player
    }

    #[inline]
    pub fn is_enemy(&self) -> bool {
        self.side == Side::Enemy
    }

    pub fn is_placed(&self) -> bool {
        self.position.is_some()
    }

    /// Sum of active defense-up magnitudes.
    pub fn defense_bonus(&self) -> i32 {
        self.buffs
            .iter()
            .filter(|buff| buff.kind == BuffKind::DefenseUp)
            .map(|buff| buff.magnitude)
            .sum()
    }

    /// Decrements every buff by one turn and drops the expired ones.
    pub fn tick_buffs(&mut self) {
        for buff in &mut self.buffs {
            buff.remaining = buff.remaining.saturating_sub(1);
        }
        self.buffs.retain(|buff| buff.remaining > 0);
    }

    /// Manhattan distance to another placed unit.
    pub fn distance_to(&self, other: &UnitState) -> Option<u32> {
        Some(self.position?.manhattan(other.position?))
    }
}
