#![forbid(unsafe_code)]

//! Pairwise tile collision resolution.
//!
//! Tiles are treated as discs whose radius is half their rendered width.
//! For every unordered pair closer than
//!
//! ```text
//! min_distance = (half_width_a + half_width_b) * scale_factor + padding
//! ```
//!
//! the resolver computes where tile `b` would sit if it were exactly
//! `min_distance` away from `a` along their center line, and nudges both
//! velocities by `correction_gain` of that penetration vector, in opposite
//! directions. Positions are left to the integrator.
//!
//! # Failure Modes
//!
//! - Coincident centers have no defined direction. The pair is separated
//!   along +X (tile `b` right, tile `a` left) so the step never produces
//!   NaN.
//!
//! Complexity is O(n²) per call, fine for tens of tiles.

use crate::config::CollisionConfig;
use crate::geometry::Vec2;
use crate::tile::Tile;

/// Separation direction used when two centers coincide.
pub const COINCIDENT_FALLBACK: Vec2 = Vec2::new(1.0, 0.0);

/// Collision parameters bound to the current tile visual scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionResolver {
    padding: f64,
    scale_factor: f64,
    correction_gain: f64,
    visual_scale: f64,
}

impl CollisionResolver {
    #[must_use]
    pub fn new(config: &CollisionConfig, visual_scale: f64) -> Self {
        Self {
            padding: config.padding,
            scale_factor: config.scale_factor,
            correction_gain: config.correction_gain,
            visual_scale,
        }
    }

    /// Minimum allowed center distance between `a` and `b`.
    #[must_use]
    pub fn min_distance(&self, a: &Tile, b: &Tile) -> f64 {
        let half_a = a.rendered_rect(self.visual_scale).width / 2.0;
        let half_b = b.rendered_rect(self.visual_scale).width / 2.0;
        (half_a + half_b) * self.scale_factor + self.padding
    }

    /// Velocity correction for the pair, or `None` if they do not overlap.
    ///
    /// The returned vector is added to `b` and subtracted from `a`.
    #[must_use]
    pub fn pair_correction(&self, a: &Tile, b: &Tile) -> Option<Vec2> {
        let center_a = a.center();
        let center_b = b.center();
        let delta = center_b - center_a;
        let distance = delta.length();
        let min_distance = self.min_distance(a, b);

        // Negated so a NaN distance also bails out.
        #[allow(clippy::neg_cmp_op_on_partial_ord)]
        let separated = !(distance < min_distance);
        if separated {
            return None;
        }

        let direction = if distance > 0.0 {
            Vec2::from_angle(delta.angle())
        } else {
            COINCIDENT_FALLBACK
        };
        let target = center_a + direction * min_distance;
        Some((target - center_b) * self.correction_gain)
    }

    /// Apply corrections to every overlapping pair. Returns the number of
    /// overlapping pairs found.
    pub fn resolve(&self, tiles: &mut [Tile]) -> usize {
        let mut contacts = 0;
        for i in 0..tiles.len() {
            for j in (i + 1)..tiles.len() {
                let Some(correction) = self.pair_correction(&tiles[i], &tiles[j]) else {
                    continue;
                };
                contacts += 1;
                tiles[i].vel -= correction;
                tiles[j].vel += correction;
            }
        }
        contacts
    }
}
