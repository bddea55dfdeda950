use super::{AttackAction, CardOutcome, MoveAction, PlayCardAction};
use crate::combat::AttackOutcome;
use crate::state::{Position, UnitId};

/// A single command against the battle state.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Action {
    Move(MoveAction),
    Attack(AttackAction),
    PlayCard(PlayCardAction),
}

impl Action {
    pub fn move_to(actor: impl Into<UnitId>, destination: Position) -> Self {
        Action::Move(MoveAction::new(actor, destination))
    }

    pub fn attack(attacker: impl Into<UnitId>, defender: impl Into<UnitId>) -> Self {
        Action::Attack(AttackAction::new(attacker, defender))
    }

    pub fn play_card(
        actor: impl Into<UnitId>,
        hand_index: usize,
        target: Option<UnitId>,
    ) -> Self {
        Action::PlayCard(PlayCardAction::new(actor, hand_index, target))
    }

    pub fn actor(&self) -> &UnitId {
        match self {
            Action::Move(action) => &action.actor,
            Action::Attack(action) => &action.attacker,
            Action::PlayCard(action) => &action.actor,
        }
    }

    pub fn as_snake_case(&self) -> &'static str {
        match self {
            Action::Move(_) => "move",
            Action::Attack(_) => "attack",
            Action::PlayCard(_) => "play_card",
        }
    }
}

/// Action-specific result returned alongside the new snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionResult {
    Move { from: Position, to: Position },
    Attack(AttackOutcome),
    PlayCard(CardOutcome),
}
