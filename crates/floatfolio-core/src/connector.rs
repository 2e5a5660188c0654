#![forbid(unsafe_code)]

//! Connector line between the active tile and the info panel.
//!
//! Every frame the overlay is cleared. With an active tile and an open
//! panel, a line runs from the tile's rendered center to the middle of the
//! panel's left edge, with a filled marker at the tile end.

use crate::config::ConnectorStyle;
use crate::geometry::{Rect, Vec2};
use crate::scene::Overlay;

/// Endpoints of one connector frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConnectorSegment {
    /// Tile end, where the marker sits.
    pub from: Vec2,
    /// Info-panel end.
    pub to: Vec2,
}

impl ConnectorSegment {
    /// Segment from a tile's rendered bounds to the panel bounds.
    #[must_use]
    pub fn between(tile: Rect, panel: Rect) -> Self {
        Self {
            from: tile.center(),
            to: panel.left_middle(),
        }
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        self.from.distance(self.to)
    }
}

/// Draws the connector with a fixed style.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectorRenderer {
    style: ConnectorStyle,
}

impl ConnectorRenderer {
    #[must_use]
    pub fn new(style: ConnectorStyle) -> Self {
        Self { style }
    }

    #[must_use]
    pub fn style(&self) -> &ConnectorStyle {
        &self.style
    }

    /// Clear `overlay` and draw `segment` if there is one. Returns whether
    /// anything was drawn.
    pub fn render<O: Overlay + ?Sized>(
        &self,
        overlay: &mut O,
        segment: Option<ConnectorSegment>,
    ) -> bool {
        overlay.clear();
        let Some(segment) = segment else {
            return false;
        };
        if !segment.from.is_finite() || !segment.to.is_finite() {
            return false;
        }
        overlay.draw_line(segment.from, segment.to, &self.style);
        overlay.fill_circle(segment.from, self.style.marker_radius, &self.style);
        true
    }
}
