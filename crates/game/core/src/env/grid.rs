use crate::state::Position;

/// Width and height of the battle grid in tiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridDimensions {
    pub width: u32,
    pub height: u32,
}

impl GridDimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && i64::from(position.x) < i64::from(self.width)
            && i64::from(position.y) < i64::from(self.height)
    }

    pub const fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// Canonical terrain classes for battle tiles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TerrainKind {
    #[default]
    Floor,
    Wall,
}

impl TerrainKind {
    pub fn is_passable(self) -> bool {
        matches!(self, TerrainKind::Floor)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tile {
    pub position: Position,
    pub terrain: TerrainKind,
}

/// Static tile set of one encounter.
///
/// Tiles are stored row-major and never change once the grid is built; only
/// unit occupancy (tracked on the units themselves) varies during a battle.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Grid {
    dimensions: GridDimensions,
    tiles: Vec<Tile>,
}

impl Grid {
    /// Creates a `width`×`height` grid of floor tiles.
    pub fn new(width: u32, height: u32) -> Self {
        let dimensions = GridDimensions::new(width, height);
        let mut tiles = Vec::with_capacity(dimensions.area() as usize);
        for y in 0..height as i32 {
            for x in 0..width as i32 {
                tiles.push(Tile {
                    position: Position::new(x, y),
                    terrain: TerrainKind::Floor,
                });
            }
        }
        Self { dimensions, tiles }
    }

    /// Turns the given positions into walls. Out-of-bounds positions are ignored.
    pub fn with_walls(mut self, walls: impl IntoIterator<Item = Position>) -> Self {
        for position in walls {
            if let Some(index) = self.index_of(position) {
                self.tiles[index].terrain = TerrainKind::Wall;
            }
        }
        self
    }

    pub fn dimensions(&self) -> GridDimensions {
        self.dimensions
    }

    pub fn width(&self) -> u32 {
        self.dimensions.width
    }

    pub fn height(&self) -> u32 {
        self.dimensions.height
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn contains(&self, position: Position) -> bool {
        self.dimensions.contains(position)
    }

    pub fn tile(&self, position: Position) -> Option<&Tile> {
        self.index_of(position).map(|index| &self.tiles[index])
    }

    /// True when the tile exists and its terrain admits units. Occupancy is
    /// checked by [`crate::BattleState::is_walkable`].
    pub fn is_passable(&self, position: Position) -> bool {
        self.tile(position)
            .is_some_and(|tile| tile.terrain.is_passable())
    }

    fn index_of(&self, position: Position) -> Option<usize> {
        if !self.contains(position) {
            return None;
        }
        Some(position.y as usize * self.dimensions.width as usize + position.x as usize)
    }
}
