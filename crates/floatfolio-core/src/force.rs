#![forbid(unsafe_code)]

//! Pointer repulsion and device-tilt gravity.
//!
//! # Pointer repulsion
//!
//! Each pointer sample pushes every tile whose center lies within
//! `repel_distance` directly away from the pointer. The velocity delta falls
//! off linearly from `repel_strength` at the pointer to zero at the radius:
//!
//! ```text
//! force = (repel_distance - distance) / repel_distance
//! vel  -= direction(center -> pointer) * force * repel_strength
//! ```
//!
//! A pointer exactly on a tile center has no direction; the tile is pushed
//! straight up with the full `repel_strength`.
//!
//! # Orientation gravity
//!
//! Tilt angles (`beta` front-back, `gamma` left-right) are clamped to
//! `±max_tilt_degrees`, normalized to `[-1, 1]` and scaled by
//! `gravity_strength` into a persistent vector. It is only consumed while
//! the [`OrientationGate`] is active.

use crate::config::{OrientationConfig, PointerConfig};
use crate::geometry::Vec2;

/// Direction from tile center toward the pointer assumed when they
/// coincide (pointer "below" the tile, so the tile moves up).
pub const COINCIDENT_POINTER_DIRECTION: Vec2 = Vec2::new(0.0, 1.0);

/// Pointer repulsion field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerField {
    repel_distance: f64,
    repel_strength: f64,
}

impl PointerField {
    #[must_use]
    pub fn new(config: &PointerConfig) -> Self {
        Self {
            repel_distance: config.repel_distance,
            repel_strength: config.repel_strength,
        }
    }

    /// Velocity delta for a tile centered at `center`, or `None` when the
    /// pointer is out of range.
    #[must_use]
    pub fn impulse(&self, pointer: Vec2, center: Vec2) -> Option<Vec2> {
        let toward_pointer = pointer - center;
        let distance = toward_pointer.length();
        #[allow(clippy::neg_cmp_op_on_partial_ord)]
        let out_of_range = !(distance < self.repel_distance);
        if out_of_range {
            return None;
        }
        let force = (self.repel_distance - distance) / self.repel_distance;
        let direction = toward_pointer.normalize_or(COINCIDENT_POINTER_DIRECTION);
        Some(-direction * (force * self.repel_strength))
    }
}

/// Orientation capability as reported by the host platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "snake_case"))]
pub enum OrientationCapability {
    /// No tilt source on this device.
    Unavailable,
    /// Tilt events are delivered without asking.
    NotRequired,
    /// The platform requires an explicit user permission grant.
    PermissionRequired,
}

/// Lifecycle of the tilt source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrientationGate {
    /// No capability reported yet, or none available.
    #[default]
    Unavailable,
    /// Waiting for the host's permission prompt to resolve.
    AwaitingPermission,
    /// Tilt events feed gravity.
    Active,
    /// The user refused; gravity stays off.
    Denied,
}

impl OrientationGate {
    #[inline]
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }

    /// Whether the host should show its permission prompt.
    #[inline]
    #[must_use]
    pub const fn needs_prompt(self) -> bool {
        matches!(self, Self::AwaitingPermission)
    }
}

/// Persistent tilt-derived gravity.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OrientationGravity {
    gate: OrientationGate,
    gravity: Vec2,
    strength: f64,
    max_tilt: f64,
}

impl OrientationGravity {
    #[must_use]
    pub fn new(config: &OrientationConfig) -> Self {
        Self {
            gate: OrientationGate::Unavailable,
            gravity: Vec2::ZERO,
            strength: config.gravity_strength,
            max_tilt: config.max_tilt_degrees,
        }
    }

    #[inline]
    #[must_use]
    pub fn gate(&self) -> OrientationGate {
        self.gate
    }

    /// Gravity to add this frame; zero unless active.
    #[inline]
    #[must_use]
    pub fn gravity(&self) -> Vec2 {
        if self.gate.is_active() {
            self.gravity
        } else {
            Vec2::ZERO
        }
    }

    /// Record the platform capability. Returns `true` if the gate became
    /// active as a result.
    ///
    /// Once active or denied, later capability reports are ignored.
    pub fn set_capability(&mut self, capability: OrientationCapability) -> bool {
        if matches!(self.gate, OrientationGate::Active | OrientationGate::Denied) {
            return false;
        }
        self.gate = match capability {
            OrientationCapability::Unavailable => OrientationGate::Unavailable,
            OrientationCapability::NotRequired => OrientationGate::Active,
            OrientationCapability::PermissionRequired => OrientationGate::AwaitingPermission,
        };
        self.gate.is_active()
    }

    /// Resolve a pending permission prompt. Returns `true` if the gate
    /// became active.
    pub fn permission_result(&mut self, granted: bool) -> bool {
        if self.gate != OrientationGate::AwaitingPermission {
            return false;
        }
        self.gate = if granted {
            OrientationGate::Active
        } else {
            OrientationGate::Denied
        };
        self.gate.is_active()
    }

    /// Update gravity from tilt angles in degrees.
    ///
    /// Samples missing either angle, or carrying non-finite values, are
    /// ignored. Returns `true` if gravity changed.
    pub fn update(&mut self, beta: Option<f64>, gamma: Option<f64>) -> bool {
        let (Some(beta), Some(gamma)) = (beta, gamma) else {
            return false;
        };
        if !beta.is_finite() || !gamma.is_finite() {
            return false;
        }
        let beta = beta.clamp(-self.max_tilt, self.max_tilt);
        let gamma = gamma.clamp(-self.max_tilt, self.max_tilt);
        self.gravity = Vec2::new(
            gamma / self.max_tilt * self.strength,
            beta / self.max_tilt * self.strength,
        );
        true
    }

    /// Latest gravity regardless of gate state.
    #[inline]
    #[must_use]
    pub fn raw_gravity(&self) -> Vec2 {
        self.gravity
    }
}
