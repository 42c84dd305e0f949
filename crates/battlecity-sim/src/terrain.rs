//! Terrain presence grids, one per material.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use battlecity_core::enums::Material;
use battlecity_core::types::Rect;

/// Row-major presence grid for a single material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainGrid {
    material: Material,
    cells: Vec<bool>,
}

impl TerrainGrid {
    /// An empty grid sized for `material`.
    pub fn empty(material: Material) -> Self {
        Self {
            material,
            cells: vec![false; material.cell_count()],
        }
    }

    pub fn material(&self) -> Material {
        self.material
    }

    /// Out-of-range indices read as absent.
    pub fn is_present(&self, index: usize) -> bool {
        self.cells.get(index).copied().unwrap_or(false)
    }

    /// Set a cell. Returns whether the cell changed; out-of-range indices are ignored.
    pub fn set(&mut self, index: usize, present: bool) -> bool {
        match self.cells.get_mut(index) {
            Some(cell) if *cell != present => {
                *cell = present;
                true
            }
            _ => false,
        }
    }

    pub fn present_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, present)| **present)
            .map(|(index, _)| index)
    }

    /// World-space box of a cell.
    pub fn cell_box(&self, index: usize) -> Rect {
        cell_box(self.material, index)
    }
}

/// World-space box of cell `index` in `material`'s grid.
pub fn cell_box(material: Material, index: usize) -> Rect {
    let n = material.cells_per_row();
    let size = material.cell_size();
    let (row, col) = (index / n, index % n);
    Rect::square(col as f64 * size, row as f64 * size, size)
}

/// Indices of the cells whose square strictly intersects `rect`.
///
/// Touching a cell edge is not an overlap. Cells outside the grid are never
/// yielded, so callers can pass boxes that hang off the field.
pub fn cells_overlapping(material: Material, rect: &Rect) -> impl Iterator<Item = usize> {
    let n = material.cells_per_row() as i64;
    let size = material.cell_size();

    let span = |start: f64, len: f64| -> (i64, i64) {
        if len <= 0.0 {
            return (0, -1);
        }
        let first = (start / size).floor() as i64;
        let last = ((start + len) / size).ceil() as i64 - 1;
        (first.max(0), last.min(n - 1))
    };
    let (col_first, col_last) = span(rect.x, rect.width);
    let (row_first, row_last) = span(rect.y, rect.height);

    (row_first..=row_last).flat_map(move |row| {
        (col_first..=col_last).map(move |col| (row * n + col) as usize)
    })
}

/// All five material grids. Grids are shared between world versions and
/// copied only when a destroy event touches them.
#[derive(Debug, Clone, PartialEq)]
pub struct Terrain {
    bricks: Arc<TerrainGrid>,
    steels: Arc<TerrainGrid>,
    rivers: Arc<TerrainGrid>,
    snows: Arc<TerrainGrid>,
    forests: Arc<TerrainGrid>,
}

impl Default for Terrain {
    fn default() -> Self {
        Self {
            bricks: Arc::new(TerrainGrid::empty(Material::Brick)),
            steels: Arc::new(TerrainGrid::empty(Material::Steel)),
            rivers: Arc::new(TerrainGrid::empty(Material::River)),
            snows: Arc::new(TerrainGrid::empty(Material::Snow)),
            forests: Arc::new(TerrainGrid::empty(Material::Forest)),
        }
    }
}

impl Terrain {
    pub fn grid(&self, material: Material) -> &TerrainGrid {
        match material {
            Material::Brick => &self.bricks,
            Material::Steel => &self.steels,
            Material::River => &self.rivers,
            Material::Snow => &self.snows,
            Material::Forest => &self.forests,
        }
    }

    fn grid_mut(&mut self, material: Material) -> &mut TerrainGrid {
        let grid = match material {
            Material::Brick => &mut self.bricks,
            Material::Steel => &mut self.steels,
            Material::River => &mut self.rivers,
            Material::Snow => &mut self.snows,
            Material::Forest => &mut self.forests,
        };
        Arc::make_mut(grid)
    }

    pub fn is_present(&self, material: Material, index: usize) -> bool {
        self.grid(material).is_present(index)
    }

    /// Whether any present cell of `material` strictly overlaps `rect`.
    pub fn overlaps(&self, material: Material, rect: &Rect) -> bool {
        let grid = self.grid(material);
        cells_overlapping(material, rect).any(|index| grid.is_present(index))
    }

    /// Present cells of `material` that strictly overlap `rect`.
    pub fn present_cells_in(&self, material: Material, rect: &Rect) -> Vec<usize> {
        let grid = self.grid(material);
        cells_overlapping(material, rect)
            .filter(|&index| grid.is_present(index))
            .collect()
    }

    /// Mark cells present. Used while building a level.
    pub fn fill(&mut self, material: Material, cells: impl IntoIterator<Item = usize>) {
        let grid = self.grid_mut(material);
        for index in cells {
            grid.set(index, true);
        }
    }

    /// Clear cells. Returns whether anything changed; absent and
    /// out-of-range cells are ignored.
    pub fn clear(&mut self, material: Material, cells: impl IntoIterator<Item = usize>) -> bool {
        let cells: Vec<usize> = cells
            .into_iter()
            .filter(|&index| self.is_present(material, index))
            .collect();
        if cells.is_empty() {
            return false;
        }
        let grid = self.grid_mut(material);
        for index in cells {
            grid.set(index, false);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cells_overlapping_is_strict() {
        // Exactly one brick cell: [8,16) x [8,16).
        let exact = Rect::square(8.0, 8.0, 8.0);
        let cells: Vec<usize> = cells_overlapping(Material::Brick, &exact).collect();
        assert_eq!(cells, vec![26 + 1]);
    }

    #[test]
    fn test_cells_overlapping_spans_rows_and_cols() {
        let r = Rect::new(6.0, 6.0, 4.0, 4.0);
        let cells: Vec<usize> = cells_overlapping(Material::Brick, &r).collect();
        assert_eq!(cells, vec![0, 1, 26, 27]);
    }

    #[test]
    fn test_cells_overlapping_drops_off_field_cells() {
        let r = Rect::new(-10.0, -10.0, 12.0, 12.0);
        let cells: Vec<usize> = cells_overlapping(Material::Steel, &r).collect();
        assert_eq!(cells, vec![0]);

        let beyond = Rect::new(300.0, 300.0, 3.0, 3.0);
        assert_eq!(cells_overlapping(Material::Steel, &beyond).count(), 0);
    }

    #[test]
    fn test_out_of_range_index_reads_absent() {
        let mut grid = TerrainGrid::empty(Material::River);
        assert!(!grid.set(10_000, true));
        assert!(!grid.is_present(10_000));
    }

    #[test]
    fn test_clear_copies_on_write() {
        let mut a = Terrain::default();
        a.fill(Material::Brick, [3, 4]);
        let mut b = a.clone();
        assert!(b.clear(Material::Brick, [3, 99_999]));
        assert!(a.is_present(Material::Brick, 3));
        assert!(!b.is_present(Material::Brick, 3));
        assert!(b.is_present(Material::Brick, 4));
        assert!(!b.clear(Material::Brick, [3]));
    }

    #[test]
    fn test_cell_box_round_trips_index() {
        let index = 42;
        let b = cell_box(Material::Brick, index);
        assert_eq!((b.x, b.y), (16.0 * 8.0, 8.0));
        let cells: Vec<usize> = cells_overlapping(Material::Brick, &b).collect();
        assert_eq!(cells, vec![index]);
    }
}
