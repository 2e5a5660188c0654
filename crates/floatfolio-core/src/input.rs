#![forbid(unsafe_code)]

//! Host input events and the per-frame input buffer.
//!
//! Event callbacks never touch simulation state directly. They push an
//! [`InputEvent`] into the [`InputQueue`], and the frame scheduler drains
//! the queue exactly once at the start of the next frame.
//!
//! With the `config` feature the events use a `kind`-tagged JSON schema:
//!
//! ```json
//! {"kind":"pointer","x":120.0,"y":48.5}
//! {"kind":"touch","phase":"start","x":200.0,"y":300.0}
//! {"kind":"orientation","beta":12.5,"gamma":null}
//! ```

use std::collections::VecDeque;

use crate::geometry::Vec2;

/// Phase for touch events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "snake_case"))]
pub enum TouchPhase {
    Start,
    Move,
    End,
    Cancel,
}

/// One host input event, in viewport pixels and degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "config", serde(tag = "kind", rename_all = "snake_case"))]
pub enum InputEvent {
    /// Mouse move, or the first touch point of a touch move.
    Pointer { x: f64, y: f64 },
    /// Touch lifecycle, first touch point only.
    Touch { phase: TouchPhase, x: f64, y: f64 },
    /// Device tilt. Either angle may be missing on some platforms.
    Orientation {
        #[cfg_attr(feature = "config", serde(default))]
        beta: Option<f64>,
        #[cfg_attr(feature = "config", serde(default))]
        gamma: Option<f64>,
    },
}

impl InputEvent {
    #[must_use]
    pub const fn pointer(x: f64, y: f64) -> Self {
        Self::Pointer { x, y }
    }

    #[must_use]
    pub const fn touch(phase: TouchPhase, x: f64, y: f64) -> Self {
        Self::Touch { phase, x, y }
    }

    #[must_use]
    pub const fn orientation(beta: f64, gamma: f64) -> Self {
        Self::Orientation {
            beta: Some(beta),
            gamma: Some(gamma),
        }
    }

    /// Position carried by pointer and touch events.
    #[must_use]
    pub fn position(&self) -> Option<Vec2> {
        match *self {
            Self::Pointer { x, y } | Self::Touch { x, y, .. } => Some(Vec2::new(x, y)),
            Self::Orientation { .. } => None,
        }
    }

    /// Every present number is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        match *self {
            Self::Pointer { x, y } | Self::Touch { x, y, .. } => x.is_finite() && y.is_finite(),
            Self::Orientation { beta, gamma } => {
                beta.is_none_or(f64::is_finite) && gamma.is_none_or(f64::is_finite)
            }
        }
    }

    /// Short name for logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Pointer { .. } => "pointer",
            Self::Touch { .. } => "touch",
            Self::Orientation { .. } => "orientation",
        }
    }

    /// Encode as a JSON string.
    #[cfg(feature = "config")]
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Decode a JSON string produced by the host.
    #[cfg(feature = "config")]
    pub fn from_json_str(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

/// Bounded FIFO of events waiting for the next frame.
///
/// When full, the oldest event is discarded and counted.
#[derive(Debug, Clone)]
pub struct InputQueue {
    events: VecDeque<InputEvent>,
    limit: usize,
    dropped: u64,
}

impl InputQueue {
    /// Queue holding at most `limit` events (at least one).
    #[must_use]
    pub fn new(limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            events: VecDeque::with_capacity(limit.min(64)),
            limit,
            dropped: 0,
        }
    }

    /// Append an event. Returns `true` if an older event was dropped to
    /// make room.
    pub fn push(&mut self, event: InputEvent) -> bool {
        let overflow = self.events.len() >= self.limit;
        if overflow {
            self.events.pop_front();
            self.dropped += 1;
        }
        self.events.push_back(event);
        overflow
    }

    /// Take every pending event in arrival order.
    pub fn drain(&mut self) -> std::collections::vec_deque::Drain<'_, InputEvent> {
        self.events.drain(..)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Total events dropped since creation.
    #[must_use]
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn queue_drops_oldest() {
        let mut queue = InputQueue::new(2);
        assert!(!queue.push(InputEvent::pointer(1.0, 0.0)));
        assert!(!queue.push(InputEvent::pointer(2.0, 0.0)));
        assert!(queue.push(InputEvent::pointer(3.0, 0.0)));
        assert_eq!(queue.dropped(), 1);
        let xs: Vec<f64> = queue
            .drain()
            .filter_map(|event| event.position())
            .map(|pos| pos.x)
            .collect();
        assert_eq!(xs, vec![2.0, 3.0]);
        assert!(queue.is_empty());
    }

    #[test]
    fn zero_limit_holds_one() {
        let mut queue = InputQueue::new(0);
        queue.push(InputEvent::pointer(1.0, 1.0));
        queue.push(InputEvent::pointer(2.0, 2.0));
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.limit(), 1);
    }

    #[test]
    fn finiteness() {
        assert!(InputEvent::pointer(1.0, 2.0).is_finite());
        assert!(!InputEvent::pointer(f64::NAN, 2.0).is_finite());
        assert!(!InputEvent::touch(TouchPhase::Move, 0.0, f64::INFINITY).is_finite());
        assert!(
            InputEvent::Orientation {
                beta: None,
                gamma: Some(3.0)
            }
            .is_finite()
        );
        assert!(!InputEvent::orientation(f64::NAN, 0.0).is_finite());
    }

    #[cfg(feature = "config")]
    #[test]
    fn json_schema() {
        assert_eq!(
            InputEvent::from_json_str(r#"{"kind":"pointer","x":10,"y":20.5}"#).unwrap(),
            InputEvent::pointer(10.0, 20.5)
        );
        assert_eq!(
            InputEvent::from_json_str(r#"{"kind":"touch","phase":"cancel","x":1,"y":2}"#)
                .unwrap(),
            InputEvent::touch(TouchPhase::Cancel, 1.0, 2.0)
        );
        assert_eq!(
            InputEvent::from_json_str(r#"{"kind":"orientation","beta":null}"#).unwrap(),
            InputEvent::Orientation {
                beta: None,
                gamma: None
            }
        );
        let encoded = InputEvent::orientation(5.0, -3.0).to_json_string().unwrap();
        assert_eq!(encoded, r#"{"kind":"orientation","beta":5.0,"gamma":-3.0}"#);
    }

    #[cfg(feature = "config")]
    #[test]
    fn json_rejects_unknown_kind() {
        assert!(InputEvent::from_json_str(r#"{"kind":"wheel","dy":3}"#).is_err());
        assert!(InputEvent::from_json_str(r#"{"kind":"touch","phase":"hover","x":1,"y":2}"#).is_err());
        assert!(InputEvent::from_json_str(r#"{"x":1,"y":2}"#).is_err());
    }
}
