#![forbid(unsafe_code)]

//! Tile bodies: per-tile position, velocity and layout origin.
//!
//! Tiles are registered once, in host order, and live for the whole page.
//! The registry owns them and performs the per-frame integration step:
//!
//! ```text
//! vel += gravity
//! vel *= friction
//! pos += vel
//! ```
//!
//! # Invariants
//!
//! 1. `pos` and `vel` are finite for every tile.
//! 2. Registration order is stable; a tile's index never changes.

use crate::config::LayoutConfig;
use crate::geometry::{Rect, Size, Vec2};

/// Host-supplied description of one work-item element.
#[derive(Debug, Clone, PartialEq)]
pub struct TileSpec {
    /// Content key used to look up the project title and description.
    pub asset_id: String,
    /// Unscaled layout size (`offsetWidth`, `offsetHeight`).
    pub size: Size,
}

impl TileSpec {
    #[must_use]
    pub fn new(asset_id: impl Into<String>, size: Size) -> Self {
        Self {
            asset_id: asset_id.into(),
            size,
        }
    }
}

/// One floating work item.
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    asset_id: String,
    size: Size,
    origin: Vec2,
    /// Top-left position (px).
    pub pos: Vec2,
    /// Velocity (px per frame).
    pub vel: Vec2,
}

impl Tile {
    /// Place a tile at its fractional `origin` within `viewport`.
    #[must_use]
    pub fn new(spec: TileSpec, origin: Vec2, viewport: Size) -> Self {
        let pos = Vec2::new(viewport.width * origin.x, viewport.height * origin.y);
        Self {
            asset_id: spec.asset_id,
            size: spec.size,
            origin,
            pos,
            vel: Vec2::ZERO,
        }
    }

    /// Content key for this tile.
    #[inline]
    #[must_use]
    pub fn asset_id(&self) -> &str {
        &self.asset_id
    }

    /// Unscaled layout size.
    #[inline]
    #[must_use]
    pub fn size(&self) -> Size {
        self.size
    }

    /// Replace the layout size after the host re-measures the element.
    pub fn set_size(&mut self, size: Size) {
        self.size = size;
    }

    /// Fractional layout origin.
    #[inline]
    #[must_use]
    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    /// Bounds as rendered with a centered uniform `visual_scale`.
    #[inline]
    #[must_use]
    pub fn rendered_rect(&self, visual_scale: f64) -> Rect {
        Rect::scaled_about_center(self.pos, self.size, visual_scale)
    }

    /// Center point; unaffected by the visual scale.
    #[inline]
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size.half()
    }

    /// One integration step.
    pub fn integrate(&mut self, gravity: Vec2, friction: f64) {
        self.vel += gravity;
        self.vel *= friction;
        self.pos += self.vel;
    }

    /// Velocity magnitude.
    #[inline]
    #[must_use]
    pub fn speed(&self) -> f64 {
        self.vel.length()
    }
}

/// Ordered collection of all tiles on the page.
#[derive(Debug, Clone, Default)]
pub struct TileRegistry {
    tiles: Vec<Tile>,
}

impl TileRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the next tile, assigning its origin from `layout` by
    /// registration order. Returns the new tile's index.
    pub fn register(&mut self, spec: TileSpec, layout: &LayoutConfig, viewport: Size) -> usize {
        let index = self.tiles.len();
        let origin = layout.origin_for(index);
        self.tiles.push(Tile::new(spec, origin, viewport));
        index
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Tile> {
        self.tiles.get(index)
    }

    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Tile> {
        self.tiles.get_mut(index)
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Tile> {
        self.tiles.iter()
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[Tile] {
        &self.tiles
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [Tile] {
        &mut self.tiles
    }

    /// Integrate every tile by one frame.
    pub fn integrate_all(&mut self, gravity: Vec2, friction: f64) {
        for tile in &mut self.tiles {
            tile.integrate(gravity, friction);
        }
    }

    /// Largest tile speed, or 0 with no tiles.
    #[must_use]
    pub fn max_speed(&self) -> f64 {
        self.tiles.iter().map(Tile::speed).fold(0.0, f64::max)
    }
}
