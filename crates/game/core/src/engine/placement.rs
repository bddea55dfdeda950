//! Pre-battle squad placement on the left edge.

use crate::config::BattleConfig;
use crate::env::RngSource;
use crate::error::{ErrorSeverity, GameError};
use crate::state::{BattleState, LogTag, Position, UnitId};

use super::errors::TurnError;
use super::setup::start_battle;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PlacementError {
    #[error("unit {0} not found")]
    UnitNotFound(UnitId),

    #[error("unit {0} is not in the player squad")]
    NotPlayerUnit(UnitId),

    #[error("{position} is not on the left edge")]
    InvalidTile { position: Position },

    #[error("tile {position} is already occupied")]
    Occupied { position: Position },

    #[error("maximum units per side ({max}) reached")]
    LimitReached { max: usize },

    #[error("unit {0} is already placed")]
    AlreadyPlaced(UnitId),

    #[error("unit {0} is not placed")]
    NotPlaced(UnitId),

    #[error("place at least one unit before confirming")]
    NothingPlaced,

    #[error(transparent)]
    Turn(#[from] TurnError),
}

impl GameError for PlacementError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Occupied { .. } | Self::LimitReached { .. } | Self::NothingPlaced => {
                ErrorSeverity::Recoverable
            }
            Self::Turn(err) => err.severity(),
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnitNotFound(_) => "PLACE_UNIT_NOT_FOUND",
            Self::NotPlayerUnit(_) => "PLACE_NOT_PLAYER_UNIT",
            Self::InvalidTile { .. } => "PLACE_INVALID_TILE",
            Self::Occupied { .. } => "PLACE_OCCUPIED",
            Self::LimitReached { .. } => "PLACE_LIMIT_REACHED",
            Self::AlreadyPlaced(_) => "PLACE_ALREADY_PLACED",
            Self::NotPlaced(_) => "PLACE_NOT_PLACED",
            Self::NothingPlaced => "PLACE_NOTHING_PLACED",
            Self::Turn(err) => err.error_code(),
        }
    }
}

/// `clamp(floor(width * height * 0.25), 3, 10)`.
pub fn max_units_per_side(width: u32, height: u32) -> usize {
    let area = u64::from(width) * u64::from(height);
    (area / 4).clamp(3, 10) as usize
}

/// An encounter waiting for the squad to be positioned.
///
/// Enemies are already on the grid. Squad members that are still unplaced
/// when the plan is confirmed sit the battle out.
#[derive(Clone, Debug)]
pub struct PlacementPlan {
    state: BattleState,
    placed: Vec<UnitId>,
    max_units: usize,
}

impl PlacementPlan {
    pub(super) fn new(state: BattleState) -> Self {
        let dims = state.dimensions();
        Self {
            state,
            placed: Vec::new(),
            max_units: max_units_per_side(dims.width, dims.height),
        }
    }

    pub fn state(&self) -> &BattleState {
        &self.state
    }

    pub fn placed(&self) -> &[UnitId] {
        &self.placed
    }

    pub fn max_units(&self) -> usize {
        self.max_units
    }

    /// Squad members not yet on the grid, in roster order.
    pub fn unplaced(&self) -> impl Iterator<Item = &UnitId> {
        self.state
            .units
            .iter()
            .filter(|unit| unit.is_player() && unit.position.is_none())
            .map(|unit| &unit.id)
    }

    pub fn place(&mut self, id: &UnitId, position: Position) -> Result<(), PlacementError> {
        let unit = self
            .state
            .unit(id)
            .ok_or_else(|| PlacementError::UnitNotFound(id.clone()))?;
        if !unit.is_player() {
            return Err(PlacementError::NotPlayerUnit(id.clone()));
        }
        if self.placed.contains(id) {
            return Err(PlacementError::AlreadyPlaced(id.clone()));
        }
        if position.x != 0 || !self.state.grid.is_passable(position) {
            return Err(PlacementError::InvalidTile { position });
        }
        if self.state.unit_at(position).is_some() {
            return Err(PlacementError::Occupied { position });
        }
        if self.placed.len() >= self.max_units {
            return Err(PlacementError::LimitReached {
                max: self.max_units,
            });
        }

        let name = unit.name.clone();
        if let Some(unit) = self.state.unit_mut(id) {
            unit.position = Some(position);
        }
        self.placed.push(id.clone());
        self.state
            .log
            .push(LogTag::Place, format!("{name} placed at {position}."));
        Ok(())
    }

    pub fn remove(&mut self, id: &UnitId) -> Result<(), PlacementError> {
        let index = self
            .placed
            .iter()
            .position(|placed| placed == id)
            .ok_or_else(|| PlacementError::NotPlaced(id.clone()))?;
        self.placed.remove(index);
        if let Some(unit) = self.state.unit_mut(id) {
            unit.position = None;
        }
        Ok(())
    }

    /// Places every remaining squad member top-down on the left edge until
    /// the edge or the per-side limit runs out. Returns how many were placed.
    pub fn quick_place(&mut self) -> usize {
        let pending: Vec<UnitId> = self.unplaced().cloned().collect();
        let height = self.state.grid.height() as i32;
        let mut count = 0;

        for id in pending {
            if self.placed.len() >= self.max_units {
                break;
            }
            let free = (0..height)
                .map(|y| Position::new(0, y))
                .find(|&position| self.state.is_walkable(position));
            let Some(position) = free else {
                break;
            };
            if self.place(&id, position).is_ok() {
                count += 1;
            }
        }

        self.state
            .log
            .push(LogTag::Place, format!("Quick placed {count} units."));
        count
    }

    /// Drops unplaced squad members and starts the battle.
    pub fn confirm<R: RngSource + ?Sized>(
        self,
        config: &BattleConfig,
        rng: &mut R,
    ) -> Result<BattleState, PlacementError> {
        if self.placed.is_empty() {
            return Err(PlacementError::NothingPlaced);
        }
        let mut state = self.state;
        state
            .units
            .retain(|unit| !(unit.is_player() && unit.position.is_none()));
        state
            .log
            .push(LogTag::Engage, "Placement confirmed. Battle begins.");
        start_battle(&mut state, config, rng)?;
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EncounterBuilder;
    use crate::env::{PcgRng, TemplateStats, UnitTemplate};

    fn template(id: &str, agi: i32) -> UnitTemplate {
        UnitTemplate::new(
            id,
            id,
            "c",
            TemplateStats {
                max_hp: 10,
                atk: 3,
                def: 1,
                agi,
                acc: None,
            },
        )
    }

    fn plan() -> PlacementPlan {
        EncounterBuilder::with_dimensions(4, 3)
            .player(template("alpha", 4), None)
            .player(template("bravo", 5), None)
            .player(template("charlie", 6), None)
            .enemy(template("sentry", 3), None)
            .into_placement(&BattleConfig::default(), &mut PcgRng::new(1))
            .unwrap()
    }

    #[test]
    fn max_units_scale_with_area() {
        assert_eq!(max_units_per_side(2, 2), 3);
        assert_eq!(max_units_per_side(6, 4), 6);
        assert_eq!(max_units_per_side(8, 6), 10);
    }

    #[test]
    fn placement_is_restricted_to_free_left_edge_tiles() {
        let mut plan = plan();
        let alpha = UnitId::from("alpha");
        let bravo = UnitId::from("bravo");
        assert_eq!(plan.unplaced().count(), 3);

        assert_eq!(
            plan.place(&alpha, Position::new(1, 0)),
            Err(PlacementError::InvalidTile {
                position: Position::new(1, 0)
            })
        );
        plan.place(&alpha, Position::new(0, 0)).unwrap();
        assert_eq!(
            plan.place(&bravo, Position::new(0, 0)),
            Err(PlacementError::Occupied {
                position: Position::new(0, 0)
            })
        );
        assert_eq!(
            plan.place(&alpha, Position::new(0, 1)),
            Err(PlacementError::AlreadyPlaced(alpha.clone()))
        );
        assert_eq!(
            plan.place(&UnitId::from("sentry_1"), Position::new(0, 2)),
            Err(PlacementError::NotPlayerUnit(UnitId::from("sentry_1")))
        );

        plan.remove(&alpha).unwrap();
        assert!(plan.placed().is_empty());
        assert!(plan.remove(&alpha).is_err());
    }

    #[test]
    fn confirm_drops_unplaced_units_and_starts() {
        let mut plan = plan();
        plan.place(&UnitId::from("alpha"), Position::new(0, 2))
            .unwrap();
        assert_eq!(
            PlacementPlan::confirm(plan.clone(), &BattleConfig::default(), &mut PcgRng::new(2))
                .map(|state| state.units.len()),
            Ok(2)
        );

        let state = plan
            .confirm(&BattleConfig::default(), &mut PcgRng::new(2))
            .unwrap();
        assert!(state.unit(&UnitId::from("charlie")).is_none());
        assert_eq!(state.active, Some(UnitId::from("alpha")));
        assert_eq!(state.turn, 1);
    }

    #[test]
    fn quick_place_fills_the_edge() {
        let mut plan = plan();
        assert_eq!(plan.quick_place(), 3);
        let state = plan
            .confirm(&BattleConfig::default(), &mut PcgRng::new(2))
            .unwrap();
        assert_eq!(state.active, Some(UnitId::from("charlie")));
        assert_eq!(
            state.unit(&UnitId::from("charlie")).unwrap().position,
            Some(Position::new(0, 2))
        );
    }

    #[test]
    fn confirm_requires_a_placed_unit() {
        let plan = plan();
        let err = plan
            .confirm(&BattleConfig::default(), &mut PcgRng::new(2))
            .unwrap_err();
        assert_eq!(err, PlacementError::NothingPlaced);
    }
}
