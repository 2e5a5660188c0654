#![forbid(unsafe_code)]

//! Swipeable card stack for constrained layouts.
//!
//! In card-stack mode tiles no longer float. One card is centered at a time
//! and horizontal touch drags step through them.
//!
//! # State Machine
//!
//! ```text
//!            touch start
//!   Idle ─────────────────▶ Dragging { start_x, current_x }
//!    ▲                         │  touch move: current_x = x
//!    │   touch end / cancel    │
//!    └─────────────────────────┘
//! ```
//!
//! On touch end, `diff = current_x - start_x`:
//! - `diff >  threshold` selects the previous card (clamped at 0),
//! - `diff < -threshold` selects the next card (clamped at `count - 1`),
//! - anything else leaves the index alone.
//!
//! # Invariants
//!
//! 1. `current < count`, or `current == 0` when there are no cards.
//! 2. Only the centered card follows the finger while dragging.
//! 3. A cancelled drag never changes the index.
//!
//! Card styling is a pure function of `index - current`, see
//! [`CardPose::for_offset`].

use crate::config::CardStackConfig;

/// Visual placement of one card.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardPose {
    /// Horizontal offset from the centered slot (px).
    pub translate_x: f64,
    pub scale: f64,
    pub opacity: f64,
    pub z_index: i32,
    pub visible: bool,
}

impl CardPose {
    /// Pose for a card `offset` positions away from the centered one.
    ///
    /// `drag_offset` only moves the centered card.
    #[must_use]
    pub fn for_offset(offset: isize, spacing: f64, drag_offset: f64) -> Self {
        let side = offset.signum() as f64;
        match offset.unsigned_abs() {
            0 => Self {
                translate_x: drag_offset,
                scale: 1.0,
                opacity: 1.0,
                z_index: 100,
                visible: true,
            },
            1 => Self {
                translate_x: side * spacing,
                scale: 0.85,
                opacity: 0.6,
                z_index: 99,
                visible: true,
            },
            2 => Self {
                translate_x: side * 2.0 * spacing,
                scale: 0.7,
                opacity: 0.3,
                z_index: 98,
                visible: true,
            },
            _ => Self {
                translate_x: side * 3.0 * spacing,
                scale: 0.7,
                opacity: 0.0,
                z_index: 0,
                visible: false,
            },
        }
    }
}

/// Where the stack is in a touch interaction.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SwipePhase {
    #[default]
    Idle,
    Dragging {
        start_x: f64,
        current_x: f64,
    },
}

/// Index change produced by a completed swipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardTransition {
    pub from: usize,
    pub to: usize,
}

/// Card-stack gesture controller.
#[derive(Debug, Clone)]
pub struct CardStack {
    current: usize,
    count: usize,
    phase: SwipePhase,
    dirty: bool,
    config: CardStackConfig,
}

impl CardStack {
    #[must_use]
    pub fn new(config: CardStackConfig) -> Self {
        Self {
            current: 0,
            count: 0,
            phase: SwipePhase::Idle,
            dirty: true,
            config,
        }
    }

    #[inline]
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[inline]
    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    #[inline]
    #[must_use]
    pub fn phase(&self) -> SwipePhase {
        self.phase
    }

    #[inline]
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, SwipePhase::Dragging { .. })
    }

    /// Update the number of cards, keeping the current index in range.
    pub fn set_count(&mut self, count: usize) {
        self.count = count;
        self.current = self.current.min(count.saturating_sub(1));
        self.dirty = true;
    }

    /// Horizontal drag distance so far, 0 when idle.
    #[must_use]
    pub fn drag_diff(&self) -> f64 {
        match self.phase {
            SwipePhase::Idle => 0.0,
            SwipePhase::Dragging { start_x, current_x } => current_x - start_x,
        }
    }

    /// Live offset applied to the centered card.
    #[must_use]
    pub fn drag_offset(&self) -> f64 {
        self.drag_diff() * self.config.drag_follow
    }

    pub fn touch_start(&mut self, x: f64) {
        self.phase = SwipePhase::Dragging {
            start_x: x,
            current_x: x,
        };
        self.dirty = true;
    }

    /// Follow the finger. Ignored unless dragging.
    pub fn touch_move(&mut self, x: f64) {
        if let SwipePhase::Dragging { current_x, .. } = &mut self.phase {
            *current_x = x;
            self.dirty = true;
        }
    }

    /// Finish the drag, stepping to a neighbouring card if it went past the
    /// threshold.
    pub fn touch_end(&mut self) -> Option<CardTransition> {
        let diff = self.drag_diff();
        if !self.is_dragging() {
            return None;
        }
        self.phase = SwipePhase::Idle;
        self.dirty = true;

        let from = self.current;
        let to = if diff > self.config.swipe_threshold {
            from.saturating_sub(1)
        } else if diff < -self.config.swipe_threshold {
            (from + 1).min(self.count.saturating_sub(1))
        } else {
            from
        };
        if to == from {
            return None;
        }
        self.current = to;
        Some(CardTransition { from, to })
    }

    /// Abandon the drag without changing cards.
    pub fn touch_cancel(&mut self) {
        if self.is_dragging() {
            self.phase = SwipePhase::Idle;
            self.dirty = true;
        }
    }

    /// Pose for card `index` under the current state.
    #[must_use]
    pub fn pose(&self, index: usize) -> CardPose {
        let offset = index as isize - self.current as isize;
        CardPose::for_offset(offset, self.config.card_spacing, self.drag_offset())
    }

    /// Poses for every card in index order.
    pub fn poses(&self) -> impl Iterator<Item = (usize, CardPose)> + '_ {
        (0..self.count).map(|index| (index, self.pose(index)))
    }

    /// Whether the stack changed since the last call, clearing the flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Force a reflow on the next frame.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}
