//! Weapon aiming.
//!
//! The renderer rotates the weapon sprite towards the cursor every frame.
//! Rotated sprites are expensive to rebuild, so [`AngleCache`] keeps one
//! value per 3 degree bucket and hands back the cached value for any angle
//! that falls into an already filled bucket.

use glam::Vec2;

/// Degrees covered by one cache bucket.
pub const BUCKET_DEGREES: f32 = 3.0;

/// Number of buckets in a full turn.
pub const BUCKET_COUNT: usize = 120;

/// Angle in radians from `from` towards `to`, in `(-π, π]`.
///
/// Zero when the points coincide.
#[must_use]
pub fn aim_angle(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}

/// Bucket index for an angle in radians.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn bucket(angle: f32) -> usize {
    if !angle.is_finite() {
        return 0;
    }
    let degrees = angle.to_degrees().rem_euclid(360.0);
    ((degrees / BUCKET_DEGREES) as usize) % BUCKET_COUNT
}

/// Fixed-capacity cache keyed by quantized angle.
#[derive(Debug, Clone)]
pub struct AngleCache<T> {
    slots: [Option<T>; BUCKET_COUNT],
}

impl<T> Default for AngleCache<T> {
    fn default() -> Self {
        Self {
            slots: std::array::from_fn(|_| None),
        }
    }
}

impl<T> AngleCache<T> {
    /// An empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached value for `angle`'s bucket, building it with `make` on a miss.
    ///
    /// `make` receives the angle that caused the miss.
    pub fn get_or_insert_with<F>(&mut self, angle: f32, make: F) -> &T
    where
        F: FnOnce(f32) -> T,
    {
        self.slots[bucket(angle)].get_or_insert_with(|| make(angle))
    }

    /// Cached value for `angle`'s bucket, if any.
    #[must_use]
    pub fn get(&self, angle: f32) -> Option<&T> {
        self.slots[bucket(angle)].as_ref()
    }

    /// Number of filled buckets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// True when nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Empty every bucket.
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = None;
        }
    }
}
