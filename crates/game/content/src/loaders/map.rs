//! Grid layout loader.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tactics_core::engine::{MAX_GRID_SIDE, MIN_GRID_SIDE};
use tactics_core::{Grid, Position, TerrainKind};

use crate::loaders::{LoadResult, read_file};

/// Grid layout structure for RON files.
///
/// Every tile defaults to floor; `tiles` overrides individual cells.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapData {
    pub dimensions: (u32, u32),
    #[serde(default)]
    pub tiles: Vec<(i32, i32, TerrainKind)>,
}

impl MapData {
    pub fn into_grid(self) -> LoadResult<Grid> {
        let (width, height) = self.dimensions;
        let valid = MIN_GRID_SIDE..=MAX_GRID_SIDE;
        if !valid.contains(&width) || !valid.contains(&height) {
            anyhow::bail!("Map dimensions {}x{} are out of range", width, height);
        }

        let grid = Grid::new(width, height);
        let mut walls = Vec::new();
        for (x, y, terrain) in self.tiles {
            let position = Position::new(x, y);
            if !grid.contains(position) {
                anyhow::bail!("Map tile {} lies outside {}x{}", position, width, height);
            }
            if !terrain.is_passable() {
                walls.push(position);
            }
        }
        Ok(grid.with_walls(walls))
    }
}

/// Loader for grid layouts from RON files.
pub struct MapLoader;

impl MapLoader {
    pub fn parse(content: &str) -> LoadResult<Grid> {
        let data: MapData = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse map RON: {}", e))?;
        data.into_grid()
    }

    pub fn load(path: &Path) -> LoadResult<Grid> {
        let content = read_file(path)?;
        Self::parse(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walls_override_floor() {
        let grid = MapLoader::parse("(dimensions: (4, 3), tiles: [(1, 1, wall)])").unwrap();
        assert_eq!(grid.width(), 4);
        assert!(!grid.is_passable(Position::new(1, 1)));
        assert!(grid.is_passable(Position::new(0, 0)));
    }

    #[test]
    fn rejects_tiles_outside_the_grid() {
        assert!(MapLoader::parse("(dimensions: (2, 2), tiles: [(5, 0, wall)])").is_err());
        assert!(MapLoader::parse("(dimensions: (0, 2))").is_err());
    }
}
