#![forbid(unsafe_code)]

//! Info-box spring controller.
//!
//! While a tile is open the info panel is dragged toward it by a one-sided
//! spring: no force inside `connection_distance`, a pull proportional to
//! the excess outside it. Heavy friction (velocity keeps only ~12% per
//! frame) turns this into a fast, overshoot-free approach:
//!
//! ```text
//! if d > connection_distance:
//!     vel += dir * (d - connection_distance) * pull_strength
//! vel *= friction
//! pos += vel
//! clamp(pos, vel, restitution = 0.3)
//! ```
//!
//! This is not a true mass-spring-damper; it only needs to look settled.

use crate::bounds::Bounds;
use crate::config::InfoBoxConfig;
use crate::geometry::{Rect, Size, Vec2};

/// State of the floating info panel.
#[derive(Debug, Clone, PartialEq)]
pub struct InfoBox {
    pos: Vec2,
    vel: Vec2,
    size: Size,
}

/// Outcome of one spring step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringStep {
    /// Center distance before the step.
    pub distance: f64,
    /// Whether the pull was applied.
    pub pulled: bool,
    /// Whether the panel hit a viewport edge.
    pub bounced: bool,
}

impl InfoBox {
    /// Panel at its resting spot: right edge, roughly vertically centered.
    #[must_use]
    pub fn new(viewport: Size, size: Size, config: &InfoBoxConfig) -> Self {
        Self {
            pos: Self::home_position(viewport, config),
            vel: Vec2::ZERO,
            size,
        }
    }

    /// Initial top-left position for `viewport`.
    #[must_use]
    pub fn home_position(viewport: Size, config: &InfoBoxConfig) -> Vec2 {
        Vec2::new(
            viewport.width - config.initial_inset_x,
            viewport.height / 2.0 - config.initial_inset_y,
        )
    }

    #[inline]
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.pos
    }

    #[inline]
    #[must_use]
    pub fn velocity(&self) -> Vec2 {
        self.vel
    }

    #[inline]
    #[must_use]
    pub fn size(&self) -> Size {
        self.size
    }

    /// Update the rendered panel size reported by the host.
    pub fn set_size(&mut self, size: Size) {
        self.size = size;
    }

    #[inline]
    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::from_origin_size(self.pos, self.size)
    }

    #[inline]
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.rect().center()
    }

    /// Jump beside the opened tile: just right of it, top-aligned, but never
    /// further right than the resting column.
    pub fn snap_beside(&mut self, tile: Rect, viewport: Size, config: &InfoBoxConfig) {
        self.pos = Vec2::new(
            (tile.right() + config.snap_gap).min(viewport.width - config.initial_inset_x),
            tile.top(),
        );
        self.vel = Vec2::ZERO;
    }

    /// Advance one frame toward `target` (the active tile's center).
    pub fn step(
        &mut self,
        target: Vec2,
        config: &InfoBoxConfig,
        bounds: &Bounds,
        restitution: f64,
    ) -> SpringStep {
        let delta = target - self.center();
        let distance = delta.length();

        let pulled = distance > config.connection_distance;
        if pulled {
            let pull = (distance - config.connection_distance) * config.pull_strength;
            self.vel += Vec2::from_angle(delta.angle()) * pull;
        }

        self.vel *= config.friction;
        self.pos += self.vel;
        let bounced = bounds.clamp(&mut self.pos, &mut self.vel, restitution);

        SpringStep {
            distance,
            pulled,
            bounced,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Size = Size::new(1000.0, 800.0);
    const PANEL: Size = Size::new(300.0, 200.0);

    fn bounds() -> Bounds {
        Bounds::for_element(VIEWPORT, PANEL, 0.0)
    }

    #[test]
    fn starts_at_home() {
        let panel = InfoBox::new(VIEWPORT, PANEL, &InfoBoxConfig::default());
        assert_eq!(panel.position(), Vec2::new(680.0, 200.0));
        assert_eq!(panel.velocity(), Vec2::ZERO);
    }

    #[test]
    fn no_pull_inside_connection_distance() {
        let config = InfoBoxConfig::default();
        let mut panel = InfoBox::new(VIEWPORT, PANEL, &config);
        let target = panel.center() + Vec2::new(-100.0, 0.0);
        let step = panel.step(target, &config, &bounds(), 0.3);
        assert!(!step.pulled);
        assert_eq!(panel.position(), Vec2::new(680.0, 200.0));
    }

    #[test]
    fn pull_moves_toward_target() {
        let config = InfoBoxConfig::default();
        let mut panel = InfoBox::new(VIEWPORT, PANEL, &config);
        let target = panel.center() + Vec2::new(-500.0, 0.0);
        let step = panel.step(target, &config, &bounds(), 0.3);
        assert!(step.pulled);
        // (500 - 300) * 0.05 = 10, then * 0.12.
        assert!((panel.velocity().x + 1.2).abs() < 1e-9);
        assert!((panel.position().x - 678.8).abs() < 1e-9);
    }

    #[test]
    fn approach_is_monotonic_and_settles() {
        let config = InfoBoxConfig {
            connection_distance: 50.0,
            ..InfoBoxConfig::default()
        };
        let mut panel = InfoBox::new(VIEWPORT, PANEL, &config);
        let target = Vec2::new(300.0, 400.0);
        let mut last = panel.center().distance(target);
        for _ in 0..2000 {
            panel.step(target, &config, &bounds(), 0.3);
            let now = panel.center().distance(target);
            assert!(now <= last + 1e-9, "distance grew: {last} -> {now}");
            last = now;
        }
        assert!(last - 50.0 < 0.5, "gap left: {}", last - 50.0);
    }

    #[test]
    fn clamped_to_viewport() {
        let config = InfoBoxConfig {
            connection_distance: 0.0,
            pull_strength: 1.0,
            ..InfoBoxConfig::default()
        };
        let mut panel = InfoBox::new(VIEWPORT, PANEL, &config);
        let far_right = Vec2::new(10_000.0, 400.0);
        for _ in 0..50 {
            panel.step(far_right, &config, &bounds(), 0.3);
            assert!(bounds().contains(panel.position()));
        }
        assert_eq!(panel.position().x, 700.0);
    }

    #[test]
    fn snap_beside_tile() {
        let config = InfoBoxConfig::default();
        let mut panel = InfoBox::new(VIEWPORT, PANEL, &config);
        panel.snap_beside(Rect::new(100.0, 50.0, 120.0, 80.0), VIEWPORT, &config);
        assert_eq!(panel.position(), Vec2::new(240.0, 50.0));

        panel.snap_beside(Rect::new(800.0, 10.0, 120.0, 80.0), VIEWPORT, &config);
        assert_eq!(panel.position(), Vec2::new(680.0, 10.0));
    }
}
