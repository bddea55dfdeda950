//! Encounter construction.
//!
//! [`EncounterBuilder`] turns unit templates, a grid and an optional load
//! snapshot into a ready [`BattleState`]. Decks are shuffled through the
//! injected random source, mass overload is applied once, and the first unit
//! in initiative order is activated.

use crate::cards::{CardTable, draw_cards};
use crate::config::BattleConfig;
use crate::env::{Grid, GridDimensions, LoadPenalties, RngSource, UnitTemplate, shuffle};
use crate::error::{ErrorSeverity, GameError};
use crate::state::{
    BattleLog, BattleState, LogTag, Position, Side, UnitId, UnitState, compute_turn_order,
};

use super::errors::TurnError;
use super::placement::PlacementPlan;

pub const MIN_GRID_SIDE: u32 = 1;
pub const MAX_GRID_SIDE: u32 = 64;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SetupError {
    #[error("grid {width}x{height} is outside the supported range")]
    GridSize { width: u32, height: u32 },

    #[error("duplicate unit id {0}")]
    DuplicateUnit(UnitId),

    #[error("unit {unit} placed out of bounds at {position}")]
    OutOfBounds { unit: UnitId, position: Position },

    #[error("unit {unit} placed on a wall at {position}")]
    Blocked { unit: UnitId, position: Position },

    #[error("unit {unit} shares tile {position} with another unit")]
    Occupied { unit: UnitId, position: Position },

    #[error("no free spawn tile left for {0}")]
    NoSpawnSlot(UnitId),

    #[error("encounter has no {0} units")]
    EmptySide(Side),

    #[error(transparent)]
    Turn(#[from] TurnError),
}

impl GameError for SetupError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Turn(err) => err.severity(),
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::GridSize { .. } => "SETUP_GRID_SIZE",
            Self::DuplicateUnit(_) => "SETUP_DUPLICATE_UNIT",
            Self::OutOfBounds { .. } => "SETUP_OUT_OF_BOUNDS",
            Self::Blocked { .. } => "SETUP_BLOCKED",
            Self::Occupied { .. } => "SETUP_OCCUPIED",
            Self::NoSpawnSlot(_) => "SETUP_NO_SPAWN_SLOT",
            Self::EmptySide(_) => "SETUP_EMPTY_SIDE",
            Self::Turn(err) => err.error_code(),
        }
    }
}

#[derive(Clone, Debug)]
struct Spawn {
    template: UnitTemplate,
    position: Option<Position>,
}

/// Builder for a single encounter.
#[derive(Clone, Debug)]
pub struct EncounterBuilder {
    dimensions: GridDimensions,
    /// Prebuilt layout; `None` builds an open floor grid of `dimensions`
    /// once they pass the size check.
    grid: Option<Grid>,
    players: Vec<Spawn>,
    enemies: Vec<Spawn>,
    load_penalties: Option<LoadPenalties>,
}

impl EncounterBuilder {
    pub fn new(grid: Grid) -> Self {
        Self {
            dimensions: grid.dimensions(),
            grid: Some(grid),
            players: Vec::new(),
            enemies: Vec::new(),
            load_penalties: None,
        }
    }

    pub fn with_dimensions(width: u32, height: u32) -> Self {
        Self {
            dimensions: GridDimensions::new(width, height),
            grid: None,
            players: Vec::new(),
            enemies: Vec::new(),
            load_penalties: None,
        }
    }

    /// Adds a squad member. Units without a position are placed down the
    /// left edge when the battle is built.
    pub fn player(mut self, template: UnitTemplate, position: Option<Position>) -> Self {
        self.players.push(Spawn { template, position });
        self
    }

    pub fn players(mut self, templates: impl IntoIterator<Item = UnitTemplate>) -> Self {
        self.players.extend(templates.into_iter().map(|template| Spawn {
            template,
            position: None,
        }));
        self
    }

    /// Adds an enemy. Ids are `{template}_{n}`, numbered per template from 1.
    /// Enemies without a position spawn on the right edge.
    pub fn enemy(mut self, template: UnitTemplate, position: Option<Position>) -> Self {
        self.enemies.push(Spawn { template, position });
        self
    }

    pub fn load_penalties(mut self, penalties: Option<LoadPenalties>) -> Self {
        self.load_penalties = penalties;
        self
    }

    /// Builds the encounter and activates the first unit.
    pub fn build<R: RngSource + ?Sized>(
        self,
        config: &BattleConfig,
        rng: &mut R,
    ) -> Result<BattleState, SetupError> {
        let mut state = self.assemble(config, rng, true)?;
        start_battle(&mut state, config, rng)?;
        Ok(state)
    }

    /// Builds the encounter with every squad member off the grid so the
    /// caller can position them interactively.
    pub fn into_placement<R: RngSource + ?Sized>(
        self,
        config: &BattleConfig,
        rng: &mut R,
    ) -> Result<PlacementPlan, SetupError> {
        let mut state = self.assemble(config, rng, false)?;
        state.log.push(
            LogTag::Place,
            "Unit placement phase - position your squad on the left edge.",
        );
        Ok(PlacementPlan::new(state))
    }

    fn assemble<R: RngSource + ?Sized>(
        self,
        config: &BattleConfig,
        rng: &mut R,
        place_players: bool,
    ) -> Result<BattleState, SetupError> {
        let dims = self.dimensions;
        let valid_side = MIN_GRID_SIDE..=MAX_GRID_SIDE;
        if !valid_side.contains(&dims.width) || !valid_side.contains(&dims.height) {
            return Err(SetupError::GridSize {
                width: dims.width,
                height: dims.height,
            });
        }
        let grid = self
            .grid
            .unwrap_or_else(|| Grid::new(dims.width, dims.height));
        if self.players.is_empty() {
            return Err(SetupError::EmptySide(Side::Player));
        }
        if self.enemies.is_empty() {
            return Err(SetupError::EmptySide(Side::Enemy));
        }

        let mut units: Vec<UnitState> = Vec::new();

        for spawn in &self.players {
            let id = UnitId::new(spawn.template.id.clone());
            let mut deck = spawn.template.deck.clone();
            shuffle(rng, &mut deck);
            let position = if place_players { spawn.position } else { None };
            push_unit(
                &mut units,
                &grid,
                UnitState::from_template(&spawn.template, id, Side::Player, position, deck),
            )?;
        }

        let mut serials: Vec<(&str, u32)> = Vec::new();
        for spawn in &self.enemies {
            let serial = match serials
                .iter_mut()
                .find(|(template, _)| *template == spawn.template.id)
            {
                Some((_, n)) => {
                    *n += 1;
                    *n
                }
                None => {
                    serials.push((spawn.template.id.as_str(), 1));
                    1
                }
            };
            let id = UnitId::new(format!("{}_{serial}", spawn.template.id));
            let mut deck = if spawn.template.deck.is_empty() {
                CardTable::default_enemy_deck()
            } else {
                spawn.template.deck.clone()
            };
            shuffle(rng, &mut deck);
            push_unit(
                &mut units,
                &grid,
                UnitState::from_template(&spawn.template, id, Side::Enemy, spawn.position, deck),
            )?;
        }

        place_on_edge(&mut units, &grid, Side::Enemy)?;
        if place_players {
            place_on_edge(&mut units, &grid, Side::Player)?;
        }

        let mut log = BattleLog::new();
        log.push(LogTag::Engage, "Engagement feed online.");

        if self.load_penalties.is_some_and(|penalties| penalties.mass_over) {
            for unit in units.iter_mut().filter(|unit| unit.is_player()) {
                unit.stats.agi = (unit.stats.agi - config.mass_agi_penalty).max(1);
            }
            log.push(LogTag::Load, "MASS overload - squad AGI reduced.");
        }

        let mut state = BattleState::new(grid, units).with_load_penalties(self.load_penalties);
        state.log = log;
        tracing::debug!(
            units = state.units.len(),
            width = dims.width,
            height = dims.height,
            "encounter assembled"
        );
        Ok(state)
    }
}

fn push_unit(units: &mut Vec<UnitState>, grid: &Grid, unit: UnitState) -> Result<(), SetupError> {
    if units.iter().any(|existing| existing.id == unit.id) {
        return Err(SetupError::DuplicateUnit(unit.id));
    }
    if let Some(position) = unit.position {
        check_spawn_tile(units, grid, &unit.id, position)?;
    }
    units.push(unit);
    Ok(())
}

fn check_spawn_tile(
    units: &[UnitState],
    grid: &Grid,
    id: &UnitId,
    position: Position,
) -> Result<(), SetupError> {
    if !grid.contains(position) {
        return Err(SetupError::OutOfBounds {
            unit: id.clone(),
            position,
        });
    }
    if !grid.is_passable(position) {
        return Err(SetupError::Blocked {
            unit: id.clone(),
            position,
        });
    }
    if units.iter().any(|other| other.position == Some(position)) {
        return Err(SetupError::Occupied {
            unit: id.clone(),
            position,
        });
    }
    Ok(())
}

/// Default spawn row for the `index`-th of `count` units on an edge:
/// `floor(height / count * index + 1)`, kept inside the grid.
pub fn edge_row(height: u32, count: usize, index: usize) -> i32 {
    let count = count.max(1) as f64;
    let row = (f64::from(height) / count * index as f64 + 1.0).floor() as i32;
    row.clamp(0, height.saturating_sub(1) as i32)
}

/// Assigns positions to unplaced units of `side`: enemies on the right edge
/// at their default rows, players top-down on the left edge. Taken tiles fall
/// back to the first free tile of the same column.
fn place_on_edge(units: &mut [UnitState], grid: &Grid, side: Side) -> Result<(), SetupError> {
    let pending: Vec<usize> = units
        .iter()
        .enumerate()
        .filter(|(_, unit)| unit.side == side && unit.position.is_none())
        .map(|(index, _)| index)
        .collect();
    let column = match side {
        Side::Player => 0,
        Side::Enemy => grid.width() as i32 - 1,
    };
    let count = pending.len();

    for (slot, &index) in pending.iter().enumerate() {
        let preferred = match side {
            Side::Player => slot as i32,
            Side::Enemy => edge_row(grid.height(), count, slot),
        };
        let free = |y: i32| {
            let position = Position::new(column, y);
            grid.is_passable(position) && !units.iter().any(|unit| unit.position == Some(position))
        };
        let row = std::iter::once(preferred)
            .chain(0..grid.height() as i32)
            .find(|&y| free(y))
            .ok_or_else(|| SetupError::NoSpawnSlot(units[index].id.clone()))?;
        units[index].position = Some(Position::new(column, row));
    }
    Ok(())
}

/// Activates the first unit in initiative order with the turn counter at 1.
///
/// A player-side first unit draws its opening hand. Strain cooldown, buff
/// decay and the power-surge roll only run on later activations.
pub fn start_battle<R: RngSource + ?Sized>(
    state: &mut BattleState,
    config: &BattleConfig,
    rng: &mut R,
) -> Result<UnitId, TurnError> {
    if state.is_terminal() {
        return Err(TurnError::PhaseTerminal);
    }
    state.turn_order = compute_turn_order(&state.units);
    let first = state
        .turn_order
        .first()
        .cloned()
        .ok_or(TurnError::EmptyTurnOrder)?;
    state.active = Some(first.clone());
    state.turn = 1;

    if let Some(unit) = state.unit_mut(&first).filter(|unit| unit.is_player()) {
        draw_cards(unit, config.hand_size, rng);
        let line = format!("{} draws opening hand.", unit.name);
        state.log.push(LogTag::Unit, line);
    }
    tracing::debug!(active = %first, "battle started");
    Ok(first)
}
