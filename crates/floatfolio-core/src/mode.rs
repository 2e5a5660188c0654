#![forbid(unsafe_code)]

//! Interaction mode selection.

use std::fmt;

/// Layout class reported by the host (viewport width breakpoint).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "snake_case"))]
pub enum FormFactor {
    #[default]
    Regular,
    /// Phone-sized viewport.
    Constrained,
}

impl FormFactor {
    /// Form factor for a viewport `width`, using the page's 768px breakpoint.
    #[must_use]
    pub fn from_width(width: f64) -> Self {
        if width <= 768.0 {
            Self::Constrained
        } else {
            Self::Regular
        }
    }
}

/// How tiles respond to input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Free-floating tiles with repulsion, collisions and tilt gravity.
    ContinuousPhysics,
    /// One centered card at a time, stepped by horizontal swipes.
    CardStack,
}

impl Mode {
    #[must_use]
    pub const fn for_form_factor(form_factor: FormFactor) -> Self {
        match form_factor {
            FormFactor::Regular => Self::ContinuousPhysics,
            FormFactor::Constrained => Self::CardStack,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ContinuousPhysics => "continuous_physics",
            Self::CardStack => "card_stack",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
