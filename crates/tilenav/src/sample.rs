//! Random placement of boxes on open ground.

use glam::Vec2;
use rand::Rng;
use thiserror::Error;

use crate::grid::NavigationGrid;
use crate::Rect;

/// Failure to find an acceptable position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SampleError {
    /// Every attempt landed on blocked cells or was rejected by the caller.
    #[error("no open footprint found after {attempts} attempts")]
    Exhausted {
        /// Number of candidates tried
        attempts: u32,
    },
}

/// Sample a center point inside `region` whose whole box is on open cells.
///
/// Candidates are drawn uniformly so that the box of `half_extents` stays in
/// `region`. A candidate is kept when every cell of its footprint is open and
/// `accept` returns `true`. At most `max_attempts` candidates are tried.
///
/// # Errors
///
/// Returns [`SampleError::Exhausted`] when no candidate qualifies.
///
/// # Example
///
/// ```
/// use glam::Vec2;
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
/// use tilenav::{sample_open_position, NavigationGrid};
///
/// let grid = NavigationGrid::open(8, 8, Vec2::splat(32.0)).unwrap();
/// let mut rng = ChaCha8Rng::seed_from_u64(7);
/// let pos = sample_open_position(&grid, &mut rng, grid.extent(), Vec2::splat(10.0), 16, |_| true)
///     .unwrap();
/// assert!(grid.extent().contains_point(pos));
/// ```
pub fn sample_open_position<R, F>(
    grid: &NavigationGrid,
    rng: &mut R,
    region: Rect,
    half_extents: Vec2,
    max_attempts: u32,
    mut accept: F,
) -> Result<Vec2, SampleError>
where
    R: Rng + ?Sized,
    F: FnMut(Vec2) -> bool,
{
    let centers = region.shrink(half_extents);
    for _ in 0..max_attempts {
        let candidate = Vec2::new(
            uniform(rng, centers.min.x, centers.max.x),
            uniform(rng, centers.min.y, centers.max.y),
        );
        let footprint = Rect::from_center(candidate, half_extents);
        if grid.is_footprint_walkable(&footprint) && accept(candidate) {
            return Ok(candidate);
        }
    }
    Err(SampleError::Exhausted {
        attempts: max_attempts,
    })
}

fn uniform<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    if max > min {
        rng.gen_range(min..max)
    } else {
        min
    }
}
