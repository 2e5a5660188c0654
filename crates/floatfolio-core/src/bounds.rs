#![forbid(unsafe_code)]

//! Viewport boundary clamp with inelastic bounce.
//!
//! Bounds for an element of size `w × h` in a `W × H` viewport with
//! padding `p`:
//!
//! ```text
//! min = (-p, -p)
//! max = (W - w + p, H - h + p)
//! ```
//!
//! A position outside the box is pinned to the violated edge and the
//! matching velocity component is reflected and scaled by the restitution
//! (0.5 for tiles, 0.3 for the info box).

use crate::geometry::{Size, Vec2};

/// Allowed top-left range for one element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    /// Bounds for an element of `element` size inside `viewport`.
    ///
    /// When the element does not fit (`max < min` on an axis), `max`
    /// collapses onto `min` so the range is never empty.
    #[must_use]
    pub fn for_element(viewport: Size, element: Size, padding: f64) -> Self {
        let min = Vec2::new(-padding, -padding);
        let max = Vec2::new(
            (viewport.width - element.width + padding).max(min.x),
            (viewport.height - element.height + padding).max(min.y),
        );
        Self { min, max }
    }

    /// Whether `pos` lies within the bounds (inclusive).
    #[inline]
    #[must_use]
    pub fn contains(&self, pos: Vec2) -> bool {
        pos.x >= self.min.x && pos.x <= self.max.x && pos.y >= self.min.y && pos.y <= self.max.y
    }

    /// Pin `pos` inside the bounds, bouncing `vel` on each violated axis.
    ///
    /// Returns `true` if any edge was hit.
    pub fn clamp(&self, pos: &mut Vec2, vel: &mut Vec2, restitution: f64) -> bool {
        let hit_x = clamp_axis(&mut pos.x, &mut vel.x, self.min.x, self.max.x, restitution);
        let hit_y = clamp_axis(&mut pos.y, &mut vel.y, self.min.y, self.max.y, restitution);
        hit_x || hit_y
    }
}

fn clamp_axis(pos: &mut f64, vel: &mut f64, min: f64, max: f64, restitution: f64) -> bool {
    if *pos < min {
        *pos = min;
        *vel *= -restitution;
        true
    } else if *pos > max {
        *pos = max;
        *vel *= -restitution;
        true
    } else {
        false
    }
}
