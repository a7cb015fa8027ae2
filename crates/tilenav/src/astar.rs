//! A* path planning over a [`NavigationGrid`].
//!
//! Search runs on cells; results are returned as cell-center waypoints. Step
//! cost is 1 for straight moves and sqrt(2) for diagonal moves, with an
//! octile heuristic, so returned paths are shortest in that metric.
//!
//! An empty path means either "no route" or "already there" (start and goal
//! share a cell). Callers treat both as "nothing to follow".

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::f32::consts::SQRT_2;
use std::sync::Arc;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::grid::{Cell, NavigationGrid};

/// Which diagonal steps the planner may take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DiagonalMovement {
    /// Diagonal steps are always allowed, even past blocked corners.
    #[default]
    Always,
    /// Diagonal steps require both adjacent orthogonal cells to be open.
    IfNoObstacle,
    /// Only the four orthogonal directions.
    Never,
}

/// Open-set entry. Ordered so that `BinaryHeap` pops the lowest `f` first,
/// then the lowest `h`, then the earliest pushed.
#[derive(Debug, Clone, Copy)]
struct Frontier {
    f: f32,
    h: f32,
    seq: u64,
    index: usize,
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frontier {}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.h.total_cmp(&self.h))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// A* planner bound to a shared, immutable grid.
///
/// # Example
///
/// ```
/// use glam::Vec2;
/// use tilenav::{Cell, NavigationGrid, PathPlanner};
///
/// let grid = NavigationGrid::open(10, 10, Vec2::splat(32.0)).unwrap();
/// let planner = PathPlanner::new(grid);
///
/// let cells = planner.find_cell_path(Cell::new(0, 0), Cell::new(9, 9));
/// assert_eq!(cells.len(), 10);
/// ```
#[derive(Debug, Clone)]
pub struct PathPlanner {
    grid: Arc<NavigationGrid>,
    diagonal: DiagonalMovement,
}

impl PathPlanner {
    /// Create a planner with the default diagonal policy.
    #[must_use]
    pub fn new(grid: impl Into<Arc<NavigationGrid>>) -> Self {
        Self {
            grid: grid.into(),
            diagonal: DiagonalMovement::default(),
        }
    }

    /// Set the diagonal movement policy.
    #[must_use]
    pub fn with_diagonal(mut self, diagonal: DiagonalMovement) -> Self {
        self.diagonal = diagonal;
        self
    }

    /// The grid this planner searches.
    #[must_use]
    pub fn grid(&self) -> &Arc<NavigationGrid> {
        &self.grid
    }

    /// The active diagonal policy.
    #[must_use]
    pub fn diagonal(&self) -> DiagonalMovement {
        self.diagonal
    }

    /// Find a path between two world points.
    ///
    /// Both points are clamped into the grid. The result runs from the start
    /// cell's center through the end cell's center inclusive, or is empty when
    /// there is no route or both points share a cell.
    #[must_use]
    pub fn find_path(&self, start: Vec2, end: Vec2) -> Vec<Vec2> {
        let start = self.grid.world_to_cell(start);
        let end = self.grid.world_to_cell(end);
        self.find_cell_path(start, end)
            .into_iter()
            .map(|cell| self.grid.cell_center(cell))
            .collect()
    }

    /// Find a path between two cells.
    ///
    /// Cells outside the grid are clamped to the nearest edge cell. The start
    /// cell may be blocked (an entity can stand on a wall edge); the end cell
    /// must be open.
    #[must_use]
    pub fn find_cell_path(&self, start: Cell, end: Cell) -> Vec<Cell> {
        let grid = &*self.grid;
        let start = clamp_cell(grid, start);
        let end = clamp_cell(grid, end);

        if start == end || !grid.is_cell_walkable(end) {
            return Vec::new();
        }

        let len = grid.len();
        let mut g_score = vec![f32::INFINITY; len];
        let mut came_from = vec![usize::MAX; len];
        let mut closed = vec![false; len];
        let mut open = BinaryHeap::new();
        let mut seq = 0_u64;

        let start_idx = grid.index(start);
        let end_idx = grid.index(end);
        g_score[start_idx] = 0.0;
        let h = self.heuristic(start, end);
        open.push(Frontier {
            f: h,
            h,
            seq,
            index: start_idx,
        });

        let mut expanded = 0_usize;
        while let Some(Frontier { index, .. }) = open.pop() {
            if closed[index] {
                continue;
            }
            if index == end_idx {
                trace!(expanded, "path found");
                return reconstruct(grid, &came_from, start_idx, end_idx);
            }
            closed[index] = true;
            expanded += 1;

            let cell = grid.cell_at(index);
            for (next, dx, dy) in grid.neighbours(cell) {
                let diagonal = dx != 0 && dy != 0;
                if !grid.is_cell_walkable(next) || !self.diagonal_allowed(cell, dx, dy, diagonal) {
                    continue;
                }
                let next_idx = grid.index(next);
                if closed[next_idx] {
                    continue;
                }
                let step = if diagonal { SQRT_2 } else { 1.0 };
                let tentative = g_score[index] + step;
                if tentative < g_score[next_idx] {
                    g_score[next_idx] = tentative;
                    came_from[next_idx] = index;
                    let h = self.heuristic(next, end);
                    seq += 1;
                    open.push(Frontier {
                        f: tentative + h,
                        h,
                        seq,
                        index: next_idx,
                    });
                }
            }
        }

        trace!(expanded, ?start, ?end, "no route");
        Vec::new()
    }

    fn diagonal_allowed(&self, cell: Cell, dx: i32, dy: i32, diagonal: bool) -> bool {
        if !diagonal {
            return true;
        }
        match self.diagonal {
            DiagonalMovement::Always => true,
            DiagonalMovement::Never => false,
            DiagonalMovement::IfNoObstacle => {
                let horizontal = cell.col.checked_add_signed(dx as isize);
                let vertical = cell.row.checked_add_signed(dy as isize);
                match (horizontal, vertical) {
                    (Some(col), Some(row)) => {
                        self.grid.is_walkable(col, cell.row) && self.grid.is_walkable(cell.col, row)
                    }
                    _ => false,
                }
            }
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn heuristic(&self, from: Cell, to: Cell) -> f32 {
        let dx = from.col.abs_diff(to.col) as f32;
        let dy = from.row.abs_diff(to.row) as f32;
        match self.diagonal {
            DiagonalMovement::Never => dx + dy,
            DiagonalMovement::Always | DiagonalMovement::IfNoObstacle => {
                (dx + dy) + (SQRT_2 - 2.0) * dx.min(dy)
            }
        }
    }
}

fn clamp_cell(grid: &NavigationGrid, cell: Cell) -> Cell {
    Cell {
        col: cell.col.min(grid.cols() - 1),
        row: cell.row.min(grid.rows() - 1),
    }
}

fn reconstruct(grid: &NavigationGrid, came_from: &[usize], start: usize, end: usize) -> Vec<Cell> {
    let mut path = vec![grid.cell_at(end)];
    let mut current = end;
    while current != start {
        current = came_from[current];
        path.push(grid.cell_at(current));
    }
    path.reverse();
    path
}
