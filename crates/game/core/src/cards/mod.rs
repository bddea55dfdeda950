//! Card definitions, the catalog oracle, and deck lifecycle.
//!
//! Units only carry [`CardId`]s in their piles; what a card does is looked up
//! in a [`CardCatalog`] supplied through [`crate::BattleEnv`].

pub mod deck;

use std::collections::HashMap;

pub use deck::{DrawReport, discard_hand, draw_cards, take_from_hand};

use crate::state::CardId;

/// Who a card may be played on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum CardTarget {
    /// A unit on the opposing side within range.
    Enemy,
    /// A unit on the actor's side (including the actor) within range.
    Ally,
    /// The acting unit only.
    SelfOnly,
}

/// What resolving a card does to its target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CardEffect {
    /// Fixed damage; no accuracy or jam check.
    Damage(i32),
    /// Weapon strike: attacker atk against target defense, no accuracy or jam check.
    Strike,
    /// Restores hp up to the target's maximum.
    Heal(i32),
    /// Grants a defense-up buff.
    Guard { magnitude: i32, duration: u32 },
    /// Vents strain from the actor.
    Cooldown(u32),
    None,
}

impl CardEffect {
    pub fn deals_damage(&self) -> bool {
        matches!(self, CardEffect::Damage(_) | CardEffect::Strike)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CardDefinition {
    pub id: CardId,
    pub name: String,
    pub target: CardTarget,
    pub strain_cost: u32,
    /// Maximum Manhattan distance to the target; 0 for self cards.
    pub range: u32,
    pub effect: CardEffect,
}

impl CardDefinition {
    pub fn new(
        id: impl Into<CardId>,
        name: impl Into<String>,
        target: CardTarget,
        strain_cost: u32,
        range: u32,
        effect: CardEffect,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            target,
            strain_cost,
            range,
            effect,
        }
    }
}

/// Read-only lookup of card definitions.
pub trait CardCatalog: Send + Sync {
    fn card(&self, id: &CardId) -> Option<&CardDefinition>;

    fn contains(&self, id: &CardId) -> bool {
        self.card(id).is_some()
    }
}

/// In-memory card catalog.
#[derive(Clone, Debug, Default)]
pub struct CardTable {
    cards: HashMap<CardId, CardDefinition>,
}

impl CardTable {
    pub const BASIC_ATTACK: &'static str = "core_basic_attack";
    pub const GUARD: &'static str = "core_guard";
    pub const WAIT: &'static str = "core_wait";
    pub const AID: &'static str = "core_aid";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_definitions(definitions: impl IntoIterator<Item = CardDefinition>) -> Self {
        let mut table = Self::new();
        table.extend(definitions);
        table
    }

    /// Core and common equipment cards every squad starts with.
    pub fn starter() -> Self {
        Self::from_definitions([
            CardDefinition::new(
                Self::BASIC_ATTACK,
                "Basic Attack",
                CardTarget::Enemy,
                0,
                1,
                CardEffect::Strike,
            ),
            CardDefinition::new(
                Self::GUARD,
                "Guard",
                CardTarget::SelfOnly,
                0,
                0,
                CardEffect::Guard {
                    magnitude: 2,
                    duration: 1,
                },
            ),
            CardDefinition::new(
                Self::WAIT,
                "Wait",
                CardTarget::SelfOnly,
                0,
                0,
                CardEffect::Cooldown(1),
            ),
            CardDefinition::new(
                Self::AID,
                "Aid",
                CardTarget::Ally,
                1,
                2,
                CardEffect::Heal(3),
            ),
            CardDefinition::new(
                "card_quick_shot",
                "Quick Shot",
                CardTarget::Enemy,
                1,
                5,
                CardEffect::Damage(3),
            ),
            CardDefinition::new(
                "class_power_slash",
                "Power Slash",
                CardTarget::Enemy,
                2,
                1,
                CardEffect::Damage(6),
            ),
            CardDefinition::new(
                "card_guarded_stance",
                "Guarded Stance",
                CardTarget::SelfOnly,
                1,
                0,
                CardEffect::Guard {
                    magnitude: 2,
                    duration: 1,
                },
            ),
        ])
    }

    /// Default deck for enemy templates that do not declare one.
    pub fn default_enemy_deck() -> Vec<CardId> {
        [Self::BASIC_ATTACK, Self::BASIC_ATTACK, Self::GUARD, Self::WAIT]
            .into_iter()
            .map(CardId::from)
            .collect()
    }

    /// Inserts or replaces a definition, returning the previous one.
    pub fn insert(&mut self, definition: CardDefinition) -> Option<CardDefinition> {
        self.cards.insert(definition.id.clone(), definition)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CardDefinition> {
        self.cards.values()
    }
}

impl Extend<CardDefinition> for CardTable {
    fn extend<T: IntoIterator<Item = CardDefinition>>(&mut self, iter: T) {
        for definition in iter {
            self.insert(definition);
        }
    }
}

impl CardCatalog for CardTable {
    fn card(&self, id: &CardId) -> Option<&CardDefinition> {
        self.cards.get(id)
    }
}
