#![forbid(unsafe_code)]

//! Tunable parameters for the tile simulation, as data.
//!
//! Every constant the interaction layer uses lives in [`SimConfig`], grouped
//! by subsystem. Two presets reproduce the page's regular and constrained
//! (phone-sized) variants; either can be loaded from TOML or JSON at startup
//! when the `config` feature is enabled.
//!
//! # Loading
//!
//! ```toml
//! # floatfolio.toml
//! [pointer]
//! repel_distance = 200.0
//! repel_strength = 0.2
//!
//! [bounds]
//! tile_padding = 100.0
//! ```
//!
//! ```rust,ignore
//! let config = SimConfig::from_toml_file("floatfolio.toml")?.validated()?;
//! ```
//!
//! # Defaults
//!
//! `SimConfig::default()` equals [`SimConfig::regular()`].

#[cfg(feature = "config")]
use std::path::Path;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use crate::geometry::Vec2;

/// Layout fractions used by the portfolio page, in tile order.
pub const DEFAULT_LAYOUT_ORIGINS: [Vec2; 8] = [
    Vec2::new(0.05, 0.08),
    Vec2::new(0.65, 0.05),
    Vec2::new(0.15, 0.38),
    Vec2::new(0.58, 0.45),
    Vec2::new(0.35, 0.55),
    Vec2::new(0.70, 0.65),
    Vec2::new(0.04, 0.65),
    Vec2::new(0.40, 0.10),
];

/// Origin for tiles registered past the end of the layout table.
pub const FALLBACK_LAYOUT_ORIGIN: Vec2 = Vec2::new(0.5, 0.5);

// ---------------------------------------------------------------------------
// Top-level SimConfig
// ---------------------------------------------------------------------------

/// Every tunable parameter of the simulation core.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct SimConfig {
    /// Tile integration parameters.
    pub physics: PhysicsConfig,
    /// Tile-tile collision parameters.
    pub collision: CollisionConfig,
    /// Boundary clamp parameters for tiles and the info box.
    pub bounds: BoundsConfig,
    /// Pointer repulsion parameters.
    pub pointer: PointerConfig,
    /// Device-tilt gravity parameters.
    pub orientation: OrientationConfig,
    /// Info-box spring parameters.
    pub info_box: InfoBoxConfig,
    /// Connector line appearance.
    pub connector: ConnectorStyle,
    /// Swipeable card stack parameters.
    pub card_stack: CardStackConfig,
    /// Input buffering.
    pub input: InputConfig,
    /// Initial tile placement and visual scale.
    pub layout: LayoutConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::regular()
    }
}

impl SimConfig {
    /// Preset for regular (desktop) layouts.
    #[must_use]
    pub fn regular() -> Self {
        Self {
            physics: PhysicsConfig::default(),
            collision: CollisionConfig::default(),
            bounds: BoundsConfig::default(),
            pointer: PointerConfig::default(),
            orientation: OrientationConfig::default(),
            info_box: InfoBoxConfig::default(),
            connector: ConnectorStyle::default(),
            card_stack: CardStackConfig::default(),
            input: InputConfig::default(),
            layout: LayoutConfig::default(),
        }
    }

    /// Preset for constrained (phone-sized) layouts: smaller, shrunken tiles
    /// that may float partially off-screen, weaker pointer repulsion and
    /// stronger tilt gravity.
    #[must_use]
    pub fn constrained() -> Self {
        let mut config = Self::regular();
        config.physics.friction = 0.95;
        config.collision.padding = 5.0;
        config.collision.scale_factor = 0.6;
        config.bounds.tile_padding = 100.0;
        config.pointer.repel_distance = 150.0;
        config.pointer.repel_strength = 0.1;
        config.orientation.gravity_strength = 0.5;
        config.info_box.connection_distance = 200.0;
        config.info_box.snap_on_open = true;
        config.connector.line_width = 0.5;
        config.connector.marker_radius = 3.0;
        config.layout.tile_visual_scale = 0.6;
        config
    }

    /// Load from a TOML string. The result is validated.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str::<Self>(s)
            .map_err(ConfigError::Toml)
            .and_then(Self::validated)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string. The result is validated.
    #[cfg(feature = "config")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str::<Self>(s)
            .map_err(ConfigError::Json)
            .and_then(Self::validated)
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Serialize to a pretty-printed JSON string.
    #[cfg(feature = "config")]
    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(ConfigError::Json)
    }

    /// Check all parameters, returning one message per violation.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        open_unit(&mut errors, "physics.friction", self.physics.friction);
        open_unit(&mut errors, "info_box.friction", self.info_box.friction);

        non_negative(&mut errors, "collision.padding", self.collision.padding);
        positive(&mut errors, "collision.scale_factor", self.collision.scale_factor);
        non_negative(
            &mut errors,
            "collision.correction_gain",
            self.collision.correction_gain,
        );

        non_negative(&mut errors, "bounds.tile_padding", self.bounds.tile_padding);
        non_negative(
            &mut errors,
            "bounds.info_box_padding",
            self.bounds.info_box_padding,
        );
        closed_unit(
            &mut errors,
            "bounds.tile_restitution",
            self.bounds.tile_restitution,
        );
        closed_unit(
            &mut errors,
            "bounds.info_box_restitution",
            self.bounds.info_box_restitution,
        );

        positive(&mut errors, "pointer.repel_distance", self.pointer.repel_distance);
        non_negative(&mut errors, "pointer.repel_strength", self.pointer.repel_strength);

        non_negative(
            &mut errors,
            "orientation.gravity_strength",
            self.orientation.gravity_strength,
        );
        positive(
            &mut errors,
            "orientation.max_tilt_degrees",
            self.orientation.max_tilt_degrees,
        );

        non_negative(&mut errors, "info_box.pull_strength", self.info_box.pull_strength);
        non_negative(
            &mut errors,
            "info_box.connection_distance",
            self.info_box.connection_distance,
        );
        finite(&mut errors, "info_box.initial_inset_x", self.info_box.initial_inset_x);
        finite(&mut errors, "info_box.initial_inset_y", self.info_box.initial_inset_y);
        non_negative(&mut errors, "info_box.snap_gap", self.info_box.snap_gap);

        non_negative(&mut errors, "connector.line_width", self.connector.line_width);
        non_negative(&mut errors, "connector.marker_radius", self.connector.marker_radius);
        if self.connector.color.trim().is_empty() {
            errors.push("connector.color must not be empty".into());
        }

        positive(
            &mut errors,
            "card_stack.swipe_threshold",
            self.card_stack.swipe_threshold,
        );
        non_negative(&mut errors, "card_stack.drag_follow", self.card_stack.drag_follow);
        non_negative(&mut errors, "card_stack.card_spacing", self.card_stack.card_spacing);

        if self.input.max_pending == 0 {
            errors.push("input.max_pending must be > 0".into());
        }

        positive(
            &mut errors,
            "layout.tile_visual_scale",
            self.layout.tile_visual_scale,
        );
        if self.layout.origins.iter().any(|origin| !origin.is_finite()) {
            errors.push("layout.origins must be finite".into());
        }

        errors
    }

    /// Return `self` if [`validate`](Self::validate) finds nothing.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Human-readable one-line summary of the key parameters.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "friction={} repel={}@{} padding={} gravity={} connect={} scale={}",
            self.physics.friction,
            self.pointer.repel_strength,
            self.pointer.repel_distance,
            self.bounds.tile_padding,
            self.orientation.gravity_strength,
            self.info_box.connection_distance,
            self.layout.tile_visual_scale,
        )
    }
}

fn finite(errors: &mut Vec<String>, name: &str, value: f64) -> bool {
    if value.is_finite() {
        true
    } else {
        errors.push(format!("{name} must be finite, got {value}"));
        false
    }
}

fn positive(errors: &mut Vec<String>, name: &str, value: f64) {
    if finite(errors, name, value) && value <= 0.0 {
        errors.push(format!("{name} must be > 0, got {value}"));
    }
}

fn non_negative(errors: &mut Vec<String>, name: &str, value: f64) {
    if finite(errors, name, value) && value < 0.0 {
        errors.push(format!("{name} must be >= 0, got {value}"));
    }
}

fn open_unit(errors: &mut Vec<String>, name: &str, value: f64) {
    if finite(errors, name, value) && (value <= 0.0 || value >= 1.0) {
        errors.push(format!("{name} must be in (0, 1), got {value}"));
    }
}

fn closed_unit(errors: &mut Vec<String>, name: &str, value: f64) {
    if finite(errors, name, value) && !(0.0..=1.0).contains(&value) {
        errors.push(format!("{name} must be in [0, 1], got {value}"));
    }
}

// ---------------------------------------------------------------------------
// Sub-configs (flat, serde-friendly)
// ---------------------------------------------------------------------------

/// Tile integration parameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct PhysicsConfig {
    /// Per-frame velocity multiplier, in (0, 1). Default: 0.98.
    pub friction: f64,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self { friction: 0.98 }
    }
}

/// Tile-tile collision parameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct CollisionConfig {
    /// Minimum gap between tiles (px). Default: 20.
    pub padding: f64,
    /// Multiplier on the summed half widths. Default: 1.0.
    pub scale_factor: f64,
    /// Fraction of the penetration vector applied as a velocity impulse.
    /// Default: 0.05.
    pub correction_gain: f64,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            padding: 20.0,
            scale_factor: 1.0,
            correction_gain: 0.05,
        }
    }
}

/// Boundary clamp parameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct BoundsConfig {
    /// How far tiles may float past the viewport edge (px). Default: 0.
    pub tile_padding: f64,
    /// Fraction of velocity kept (and reflected) on a tile wall hit.
    /// Default: 0.5.
    pub tile_restitution: f64,
    /// How far the info box may float past the viewport edge (px).
    /// Default: 0.
    pub info_box_padding: f64,
    /// Fraction of velocity kept (and reflected) on an info-box wall hit.
    /// Default: 0.3.
    pub info_box_restitution: f64,
}

impl Default for BoundsConfig {
    fn default() -> Self {
        Self {
            tile_padding: 0.0,
            tile_restitution: 0.5,
            info_box_padding: 0.0,
            info_box_restitution: 0.3,
        }
    }
}

/// Pointer repulsion parameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct PointerConfig {
    /// Radius of influence around the pointer (px). Default: 200.
    pub repel_distance: f64,
    /// Velocity delta at zero distance. Default: 0.2.
    pub repel_strength: f64,
}

impl Default for PointerConfig {
    fn default() -> Self {
        Self {
            repel_distance: 200.0,
            repel_strength: 0.2,
        }
    }
}

/// Device-tilt gravity parameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct OrientationConfig {
    /// Gravity per frame at full tilt. Default: 0.3.
    pub gravity_strength: f64,
    /// Tilt angle mapped to full strength (degrees). Default: 90.
    pub max_tilt_degrees: f64,
}

impl Default for OrientationConfig {
    fn default() -> Self {
        Self {
            gravity_strength: 0.3,
            max_tilt_degrees: 90.0,
        }
    }
}

/// Info-box spring parameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct InfoBoxConfig {
    /// Pull per pixel of excess distance. Default: 0.05.
    pub pull_strength: f64,
    /// Per-frame velocity multiplier, in (0, 1). Default: 0.12.
    pub friction: f64,
    /// Center distance under which no pull is applied (px). Default: 300.
    pub connection_distance: f64,
    /// Initial x is `viewport_width - initial_inset_x`. Default: 320.
    pub initial_inset_x: f64,
    /// Initial y is `viewport_height / 2 - initial_inset_y`. Default: 200.
    pub initial_inset_y: f64,
    /// Jump next to the tile when it is opened. Default: false.
    pub snap_on_open: bool,
    /// Horizontal gap used by `snap_on_open` (px). Default: 20.
    pub snap_gap: f64,
}

impl Default for InfoBoxConfig {
    fn default() -> Self {
        Self {
            pull_strength: 0.05,
            friction: 0.12,
            connection_distance: 300.0,
            initial_inset_x: 320.0,
            initial_inset_y: 200.0,
            snap_on_open: false,
            snap_gap: 20.0,
        }
    }
}

/// Connector line appearance, passed through to the overlay.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct ConnectorStyle {
    /// CSS color for line and marker. Default: `#ffffff`.
    pub color: String,
    /// Line width (px). Default: 1.0.
    pub line_width: f64,
    /// Marker circle radius (px). Default: 4.0.
    pub marker_radius: f64,
}

impl Default for ConnectorStyle {
    fn default() -> Self {
        Self {
            color: "#ffffff".to_string(),
            line_width: 1.0,
            marker_radius: 4.0,
        }
    }
}

/// Swipeable card stack parameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct CardStackConfig {
    /// Horizontal drag (px) needed to change cards. Default: 50.
    pub swipe_threshold: f64,
    /// Live offset per pixel of drag on the front card. Default: 1.0.
    pub drag_follow: f64,
    /// Horizontal step between neighbouring cards (px). Default: 40.
    pub card_spacing: f64,
}

impl Default for CardStackConfig {
    fn default() -> Self {
        Self {
            swipe_threshold: 50.0,
            drag_follow: 1.0,
            card_spacing: 40.0,
        }
    }
}

/// Input buffering.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct InputConfig {
    /// Events held between frames before the oldest is dropped.
    /// Default: 256.
    pub max_pending: usize,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self { max_pending: 256 }
    }
}

/// Initial tile placement and visual scale.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct LayoutConfig {
    /// Uniform visual shrink applied to tiles about their center.
    /// Default: 1.0.
    pub tile_visual_scale: f64,
    /// Fractional viewport origins, in registration order.
    pub origins: Vec<Vec2>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            tile_visual_scale: 1.0,
            origins: DEFAULT_LAYOUT_ORIGINS.to_vec(),
        }
    }
}

impl LayoutConfig {
    /// Fractional origin for the tile registered at `index`.
    #[must_use]
    pub fn origin_for(&self, index: usize) -> Vec2 {
        self.origins
            .get(index)
            .copied()
            .unwrap_or(FALLBACK_LAYOUT_ORIGIN)
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors that can occur when loading a configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "config")]
    Toml(toml::de::Error),
    /// JSON parse error.
    #[cfg(feature = "config")]
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "config")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "config")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
