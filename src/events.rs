//! # Events and the subscriber stream
//!
//! Dials translate touches into the tagged records here; the router merges
//! each frame's output into one [`EventBatch`] and hands it to exactly one
//! subscriber through an [`EventStream`].
//!
//! Events are immutable values. Replaying a recorded sequence of batches
//! through a consumer reproduces the same control state, since every press
//! has a matching release and directions are absolute, not deltas.

use smallvec::SmallVec;

use crate::config::{ButtonId, DialId};

/// First pointer id of the range reserved for programmatic injection.
/// Real platform touches must stay below this; see [`PointerId::simulated`].
pub const SIMULATED_POINTER_BASE: u64 = 1 << 63;

/// Stable identity of one physical contact, from touch-down to touch-up.
/// Assigned by the platform; only equality matters here.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub struct PointerId(pub u64);

impl PointerId {
    /// A pointer id in the reserved injection range, keyed by the dial
    /// using it so simulated inputs on different dials never collide.
    #[must_use]
    pub fn simulated(dial: DialId) -> Self {
        Self(SIMULATED_POINTER_BASE | u64::from(dial.0))
    }
    #[must_use]
    pub fn is_simulated(self) -> bool {
        self.0 >= SIMULATED_POINTER_BASE
    }
}

/// One finger sample within a touch frame, view-local pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchPoint {
    pub pointer: PointerId,
    pub x: f32,
    pub y: f32,
}

/// Platform-recognized gesture classes forwarded to gesture-aware dials.
///
/// Tap counting and press timing are owned by the platform recognizer; this
/// crate only interprets the already-classified result.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::AsRefStr)]
pub enum GestureKind {
    Tap,
    DoubleTap,
    LongPress,
}

/// One control event, tagged with its originating dial.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Event {
    /// A logical button changed state.
    Button {
        dial: DialId,
        button: ButtonId,
        pressed: bool,
        /// Whether this transition should be considered for haptic feedback.
        haptic: bool,
    },
    /// A direction or analog vector. For an 8-way pad this is the snapped
    /// unit vector, `(0, 0)` on release; for a stick it is the continuous
    /// dead-zone-filtered position clamped to the unit circle.
    Direction {
        dial: DialId,
        x: f32,
        y: f32,
        haptic: bool,
    },
    /// A classified gesture on a gesture-aware dial.
    Gesture { dial: DialId, kind: GestureKind },
}

impl Event {
    #[must_use]
    pub fn dial(&self) -> DialId {
        match *self {
            Event::Button { dial, .. } | Event::Direction { dial, .. } | Event::Gesture { dial, .. } => dial,
        }
    }
    /// The per-event haptic hint. Gestures never carry one.
    #[must_use]
    pub fn haptic_hint(&self) -> bool {
        match *self {
            Event::Button { haptic, .. } | Event::Direction { haptic, .. } => haptic,
            Event::Gesture { .. } => false,
        }
    }
    /// Whether this event represents an activating transition (a press or a
    /// non-neutral direction) as opposed to a deactivating one.
    #[must_use]
    pub fn is_activating(&self) -> bool {
        match *self {
            Event::Button { pressed, .. } => pressed,
            Event::Direction { x, y, .. } => x != 0.0 || y != 0.0,
            Event::Gesture { .. } => true,
        }
    }
}

/// All events one input frame produced, in dial-iteration order.
pub type EventBatch = SmallVec<[Event; 4]>;

/// The single subscriber's end of the event pipeline.
///
/// Batches are pushed from the input thread through a bounded queue; if the
/// subscriber falls behind until the queue fills, whole batches are dropped
/// rather than ever stalling touch processing.
#[derive(Debug)]
pub struct EventStream {
    pub(crate) rx: async_channel::Receiver<EventBatch>,
}

impl EventStream {
    /// Block until the next batch arrives. `None` once the [`crate::Gamepad`]
    /// has been dropped and the queue drained.
    #[must_use]
    pub fn next_batch(&self) -> Option<EventBatch> {
        self.rx.recv_blocking().ok()
    }
    /// Non-blocking read. `None` means "nothing right now", not end of
    /// stream.
    #[must_use]
    pub fn try_next_batch(&self) -> Option<EventBatch> {
        self.rx.try_recv().ok()
    }
    /// The underlying channel, for async consumers.
    #[must_use]
    pub fn receiver(&self) -> &async_channel::Receiver<EventBatch> {
        &self.rx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simulated_pointer_range() {
        let real = PointerId(7);
        let sim = PointerId::simulated(DialId(3));
        assert!(!real.is_simulated());
        assert!(sim.is_simulated());
        assert_ne!(sim, PointerId::simulated(DialId(4)));
    }

    #[test]
    fn activation_classification() {
        let dial = DialId(0);
        let press = Event::Button {
            dial,
            button: ButtonId(1),
            pressed: true,
            haptic: true,
        };
        let neutral = Event::Direction {
            dial,
            x: 0.0,
            y: 0.0,
            haptic: false,
        };
        assert!(press.is_activating());
        assert!(press.haptic_hint());
        assert!(!neutral.is_activating());
        assert!(!Event::Gesture {
            dial,
            kind: GestureKind::Tap
        }
        .haptic_hint());
    }
}
