//! Walkability grid and tile geometry.
//!
//! The grid is immutable after construction. All world-to-cell conversion
//! clamps into range so callers can pass arbitrary points.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Rect;

/// Errors raised while building a [`NavigationGrid`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GridError {
    /// The matrix has no rows or its first row has no columns.
    #[error("walkability matrix is empty")]
    Empty,
    /// A row has a different length than the first row.
    #[error("row {row} has {found} columns, expected {expected}")]
    RaggedRow {
        /// Offending row index
        row: usize,
        /// Column count of the first row
        expected: usize,
        /// Column count of the offending row
        found: usize,
    },
    /// Tile width or height is not a positive finite number.
    #[error("tile size must be positive and finite, got {width}x{height}")]
    InvalidTileSize {
        /// Tile width
        width: f32,
        /// Tile height
        height: f32,
    },
    /// An ASCII map contained a character that is neither open nor blocked.
    #[error("unknown tile {ch:?} at row {row}, column {col}")]
    UnknownTile {
        /// The character found
        ch: char,
        /// Row index
        row: usize,
        /// Column index
        col: usize,
    },
}

/// A cell index in the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Cell {
    /// Column (x axis)
    pub col: usize,
    /// Row (y axis)
    pub row: usize,
}

impl Cell {
    /// Create a cell index.
    #[must_use]
    pub const fn new(col: usize, row: usize) -> Self {
        Self { col, row }
    }
}

/// Read-only walkability map with tile geometry.
///
/// Cells are stored row-major. A matrix entry of `0` marks a blocked tile;
/// any other value is open.
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationGrid {
    cols: usize,
    rows: usize,
    tile_size: Vec2,
    open: Vec<bool>,
}

impl NavigationGrid {
    /// Build a grid from a walkability matrix (`matrix[row][col]`).
    ///
    /// # Errors
    ///
    /// Returns [`GridError`] when the matrix is empty or ragged, or when the
    /// tile size is not positive.
    pub fn new<R: AsRef<[i32]>>(matrix: &[R], tile_size: Vec2) -> Result<Self, GridError> {
        if !(tile_size.x.is_finite() && tile_size.y.is_finite() && tile_size.x > 0.0 && tile_size.y > 0.0) {
            return Err(GridError::InvalidTileSize {
                width: tile_size.x,
                height: tile_size.y,
            });
        }

        let rows = matrix.len();
        let cols = matrix.first().map_or(0, |row| row.as_ref().len());
        if rows == 0 || cols == 0 {
            return Err(GridError::Empty);
        }

        let mut open = Vec::with_capacity(rows * cols);
        for (row_idx, row) in matrix.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != cols {
                return Err(GridError::RaggedRow {
                    row: row_idx,
                    expected: cols,
                    found: row.len(),
                });
            }
            open.extend(row.iter().map(|&value| value != 0));
        }

        Ok(Self {
            cols,
            rows,
            tile_size,
            open,
        })
    }

    /// Build a fully open grid.
    ///
    /// # Errors
    ///
    /// Returns [`GridError`] for zero dimensions or an invalid tile size.
    pub fn open(cols: usize, rows: usize, tile_size: Vec2) -> Result<Self, GridError> {
        let matrix = vec![vec![1; cols]; rows];
        Self::new(&matrix, tile_size)
    }

    /// Parse a grid from ASCII art: `.` is open, `#` is blocked.
    ///
    /// Leading/trailing whitespace on each line and blank lines are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::UnknownTile`] for any other character, plus the
    /// errors of [`NavigationGrid::new`].
    pub fn from_ascii(map: &str, tile_size: Vec2) -> Result<Self, GridError> {
        let mut matrix = Vec::new();
        for (row, line) in map.lines().map(str::trim).filter(|l| !l.is_empty()).enumerate() {
            let cells = line
                .chars()
                .enumerate()
                .map(|(col, ch)| match ch {
                    '.' => Ok(1),
                    '#' => Ok(0),
                    _ => Err(GridError::UnknownTile { ch, row, col }),
                })
                .collect::<Result<Vec<i32>, _>>()?;
            matrix.push(cells);
        }
        Self::new(&matrix, tile_size)
    }

    /// Number of columns.
    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of rows.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Tile width and height in world units.
    #[must_use]
    pub fn tile_size(&self) -> Vec2 {
        self.tile_size
    }

    /// World-space rectangle covered by the whole grid.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn extent(&self) -> Rect {
        Rect::from_size(Vec2::new(
            self.cols as f32 * self.tile_size.x,
            self.rows as f32 * self.tile_size.y,
        ))
    }

    /// Convert a world point to the cell containing it, clamped into the grid.
    #[must_use]
    pub fn world_to_cell(&self, pos: Vec2) -> Cell {
        Cell {
            col: floor_index(pos.x / self.tile_size.x, self.cols),
            row: floor_index(pos.y / self.tile_size.y, self.rows),
        }
    }

    /// World-space center of a cell. This is the waypoint position.
    #[must_use]
    pub fn cell_center(&self, cell: Cell) -> Vec2 {
        self.cell_rect(cell).center()
    }

    /// World-space rectangle of a cell.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn cell_rect(&self, cell: Cell) -> Rect {
        let min = Vec2::new(cell.col as f32 * self.tile_size.x, cell.row as f32 * self.tile_size.y);
        Rect::from_min_max(min, min + self.tile_size)
    }

    /// Check if the cell at `(col, row)` is open. Out-of-range cells are blocked.
    #[must_use]
    pub fn is_walkable(&self, col: usize, row: usize) -> bool {
        col < self.cols && row < self.rows && self.open[row * self.cols + col]
    }

    /// Check if a cell is open.
    #[must_use]
    pub fn is_cell_walkable(&self, cell: Cell) -> bool {
        self.is_walkable(cell.col, cell.row)
    }

    /// Check if the (clamped) cell under a world point is open.
    #[must_use]
    pub fn is_point_walkable(&self, pos: Vec2) -> bool {
        self.is_cell_walkable(self.world_to_cell(pos))
    }

    /// All cells covered by `rect`, clamped into the grid, in row-major order.
    pub fn footprint(&self, rect: &Rect) -> impl Iterator<Item = Cell> {
        let col_min = floor_index(rect.min.x / self.tile_size.x, self.cols);
        let row_min = floor_index(rect.min.y / self.tile_size.y, self.rows);
        let col_max = ceil_index(rect.max.x / self.tile_size.x, self.cols).max(col_min);
        let row_max = ceil_index(rect.max.y / self.tile_size.y, self.rows).max(row_min);

        (row_min..=row_max).flat_map(move |row| (col_min..=col_max).map(move |col| Cell { col, row }))
    }

    /// Check that `rect` lies inside the grid and every covered cell is open.
    #[must_use]
    pub fn is_footprint_walkable(&self, rect: &Rect) -> bool {
        self.extent().contains_rect(rect) && self.footprint(rect).all(|cell| self.is_cell_walkable(cell))
    }

    /// Iterate over the 8-connected neighbours of a cell that lie in the grid.
    pub(crate) fn neighbours(&self, cell: Cell) -> impl Iterator<Item = (Cell, i32, i32)> + '_ {
        const OFFSETS: [(i32, i32); 8] = [
            (0, -1),
            (1, 0),
            (0, 1),
            (-1, 0),
            (1, -1),
            (1, 1),
            (-1, 1),
            (-1, -1),
        ];
        OFFSETS.iter().filter_map(move |&(dx, dy)| {
            let col = cell.col.checked_add_signed(dx as isize)?;
            let row = cell.row.checked_add_signed(dy as isize)?;
            (col < self.cols && row < self.rows).then_some((Cell { col, row }, dx, dy))
        })
    }

    /// Flat index of a cell (row-major).
    pub(crate) fn index(&self, cell: Cell) -> usize {
        cell.row * self.cols + cell.col
    }

    /// Cell for a flat index.
    pub(crate) fn cell_at(&self, index: usize) -> Cell {
        Cell {
            col: index % self.cols,
            row: index / self.cols,
        }
    }

    /// Total number of cells.
    pub(crate) fn len(&self) -> usize {
        self.open.len()
    }
}

/// `clamp(floor(value), 0, count - 1)`; NaN maps to 0.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn floor_index(value: f32, count: usize) -> usize {
    let idx = value.floor();
    if idx.is_nan() || idx <= 0.0 {
        0
    } else {
        (idx as usize).min(count - 1)
    }
}

/// Index of the last cell touched by an exclusive max edge, clamped.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn ceil_index(value: f32, count: usize) -> usize {
    let idx = value.ceil() - 1.0;
    if idx.is_nan() || idx <= 0.0 {
        0
    } else {
        (idx as usize).min(count - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tile() -> Vec2 {
        Vec2::splat(32.0)
    }

    mod construction_tests {
        use super::*;

        #[test]
        fn new_reads_matrix() {
            let grid = NavigationGrid::new(&[vec![1, 0, 1], vec![1, 1, 7]], tile()).unwrap();
            assert_eq!(grid.cols(), 3);
            assert_eq!(grid.rows(), 2);
            assert!(grid.is_walkable(0, 0));
            assert!(!grid.is_walkable(1, 0));
            assert!(grid.is_walkable(2, 1));
        }

        #[test]
        fn empty_matrix_rejected() {
            let empty: [Vec<i32>; 0] = [];
            assert_eq!(NavigationGrid::new(&empty, tile()), Err(GridError::Empty));
            assert_eq!(NavigationGrid::new(&[Vec::<i32>::new()], tile()), Err(GridError::Empty));
        }

        #[test]
        fn ragged_matrix_rejected() {
            let err = NavigationGrid::new(&[vec![1, 1], vec![1]], tile()).unwrap_err();
            assert_eq!(
                err,
                GridError::RaggedRow {
                    row: 1,
                    expected: 2,
                    found: 1
                }
            );
        }

        #[test]
        fn bad_tile_size_rejected() {
            let err = NavigationGrid::new(&[vec![1]], Vec2::new(0.0, 32.0)).unwrap_err();
            assert!(matches!(err, GridError::InvalidTileSize { .. }));
            let err = NavigationGrid::new(&[vec![1]], Vec2::new(f32::NAN, 32.0)).unwrap_err();
            assert!(matches!(err, GridError::InvalidTileSize { .. }));
        }

        #[test]
        fn from_ascii_parses_map() {
            let grid = NavigationGrid::from_ascii("\n  .#\n  ..\n", tile()).unwrap();
            assert_eq!(grid.cols(), 2);
            assert_eq!(grid.rows(), 2);
            assert!(!grid.is_walkable(1, 0));
        }

        #[test]
        fn from_ascii_rejects_unknown_tile() {
            let err = NavigationGrid::from_ascii("..\n.x", tile()).unwrap_err();
            assert_eq!(err, GridError::UnknownTile { ch: 'x', row: 1, col: 1 });
        }
    }

    mod conversion_tests {
        use super::*;

        #[test]
        fn world_to_cell_floors() {
            let grid = NavigationGrid::open(10, 10, tile()).unwrap();
            assert_eq!(grid.world_to_cell(Vec2::new(0.0, 0.0)), Cell::new(0, 0));
            assert_eq!(grid.world_to_cell(Vec2::new(31.9, 32.0)), Cell::new(0, 1));
            assert_eq!(grid.world_to_cell(Vec2::new(100.0, 200.0)), Cell::new(3, 6));
        }

        #[test]
        fn world_to_cell_clamps_out_of_range() {
            let grid = NavigationGrid::open(10, 5, tile()).unwrap();
            assert_eq!(grid.world_to_cell(Vec2::new(-50.0, -1.0)), Cell::new(0, 0));
            assert_eq!(grid.world_to_cell(Vec2::new(1e9, 1e9)), Cell::new(9, 4));
            assert_eq!(grid.world_to_cell(Vec2::new(f32::NAN, f32::INFINITY)), Cell::new(0, 4));
        }

        #[test]
        fn cell_center_is_mid_tile() {
            let grid = NavigationGrid::open(4, 4, Vec2::new(32.0, 16.0)).unwrap();
            assert_eq!(grid.cell_center(Cell::new(1, 2)), Vec2::new(48.0, 40.0));
            assert_eq!(grid.world_to_cell(grid.cell_center(Cell::new(3, 1))), Cell::new(3, 1));
        }

        #[test]
        fn cell_rect_spans_one_tile() {
            let grid = NavigationGrid::open(4, 4, Vec2::new(32.0, 16.0)).unwrap();
            let rect = grid.cell_rect(Cell::new(1, 2));
            assert_eq!(rect.min, Vec2::new(32.0, 32.0));
            assert_eq!(rect.max, Vec2::new(64.0, 48.0));
            assert_eq!(grid.footprint(&rect).collect::<Vec<_>>(), vec![Cell::new(1, 2)]);
        }

        #[test]
        fn out_of_range_cells_are_blocked() {
            let grid = NavigationGrid::open(2, 2, tile()).unwrap();
            assert!(!grid.is_walkable(2, 0));
            assert!(!grid.is_walkable(0, 2));
        }
    }

    mod footprint_tests {
        use super::*;

        #[test]
        fn footprint_covers_straddled_cells() {
            let grid = NavigationGrid::open(10, 10, tile()).unwrap();
            let rect = Rect::from_center(Vec2::new(32.0, 32.0), Vec2::splat(8.0));
            let cells: Vec<_> = grid.footprint(&rect).collect();
            assert_eq!(
                cells,
                vec![Cell::new(0, 0), Cell::new(1, 0), Cell::new(0, 1), Cell::new(1, 1)]
            );
        }

        #[test]
        fn footprint_exclusive_max_edge() {
            let grid = NavigationGrid::open(10, 10, tile()).unwrap();
            let rect = Rect::from_min_max(Vec2::ZERO, Vec2::splat(64.0));
            assert_eq!(grid.footprint(&rect).count(), 4);
        }

        #[test]
        fn footprint_rejects_partially_blocked_box() {
            let grid = NavigationGrid::from_ascii("...\n.#.\n...", tile()).unwrap();
            // Center cell (0,0) is open but the box reaches into blocked (1,1).
            let rect = Rect::from_center(Vec2::new(30.0, 30.0), Vec2::splat(10.0));
            assert!(grid.is_point_walkable(rect.center()));
            assert!(!grid.is_footprint_walkable(&rect));
        }

        #[test]
        fn footprint_outside_grid_rejected() {
            let grid = NavigationGrid::open(3, 3, tile()).unwrap();
            let rect = Rect::from_center(Vec2::new(2.0, 40.0), Vec2::splat(8.0));
            assert!(!grid.is_footprint_walkable(&rect));
        }
    }
}
