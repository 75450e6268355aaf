//! # Dials
//!
//! One interactive radial control element per configured socket. Each kind
//! is its own state machine consuming the set of fingers the router assigned
//! to it and producing zero or more [`Event`]s; the closed set of kinds
//! lives behind a single [`DialBehavior`] trait dispatched over the
//! [`Dial`] enum, keeping kind-handling exhaustiveness checkable at compile
//! time.
//!
//! All machines share one shape: **Idle** (no tracked pointer) and
//! **Tracking**. A dial claims the first finger it is handed while Idle, and
//! keeps interpreting that pointer wherever it moves - including outside the
//! dial's own region - until the pointer vanishes from the input frame, at
//! which point it emits its neutral/release exactly once and returns to
//! Idle.

mod buttons;
mod cross;
mod empty;
mod stick;

pub use buttons::{ButtonDial, DoubleButtonDial, PrimaryButtonsDial};
pub use cross::{expand, snap, Cardinals, CrossDial};
pub use empty::EmptyDial;
pub use stick::StickDial;

use enum_dispatch::enum_dispatch;
use smallvec::SmallVec;

use crate::config::{ButtonId, DialConfig, DialId};
use crate::draw::{Canvas, Theme};
use crate::events::{EventBatch, GestureKind, PointerId, TouchPoint};
use crate::geom::{Circle, Point, Rect, TouchBound};

/// Result of handing a dial its per-frame input set.
#[derive(Debug, Default)]
pub struct Touched {
    /// Whether the dial's visual state changed and a redraw is warranted.
    pub changed: bool,
    /// Events to merge into the frame's batch, in emission order.
    pub events: EventBatch,
}

impl Touched {
    /// Nothing happened.
    #[must_use]
    pub fn quiet() -> Self {
        Self::default()
    }
    #[must_use]
    pub fn changed(events: EventBatch) -> Self {
        Self {
            changed: true,
            events,
        }
    }
}

/// An accessibility entry: what a dial is, and where.
#[derive(Clone, Debug, PartialEq)]
pub struct DialLabel {
    pub dial: DialId,
    pub text: String,
    pub rect: Rect,
}

/// A dial's current placement: drawing rectangle plus hit-test region, both
/// device pixels. Updated on every layout pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Geometry {
    pub rect: Rect,
    pub bound: TouchBound,
}

impl Default for Geometry {
    fn default() -> Self {
        Self {
            rect: Rect::default(),
            bound: TouchBound::Circle(Circle::new(Point::default(), 0.0)),
        }
    }
}

impl Geometry {
    #[must_use]
    pub fn center(&self) -> Point {
        self.rect.center()
    }
    /// Half the drawing rectangle's width. Dial rectangles are square, so
    /// this is the dial's radius.
    #[must_use]
    pub fn radius(&self) -> f32 {
        self.rect.width() / 2.0
    }
    /// Dial-relative normalized coordinates: the dial's own circle maps to
    /// the unit circle. Values may exceed it for fingers dragged outside.
    #[must_use]
    pub fn normalized(&self, p: Point) -> Point {
        let c = self.center();
        let r = self.radius().max(f32::EPSILON);
        Point::new((p.x - c.x) / r, (p.y - c.y) / r)
    }
}

/// Find the sample for a specific pointer within a frame's input set.
pub(crate) fn find_pointer(fingers: &[TouchPoint], id: PointerId) -> Option<&TouchPoint> {
    fingers.iter().find(|f| f.pointer == id)
}

/// The capability surface every dial kind implements.
#[enum_dispatch]
pub trait DialBehavior {
    /// The dial's configured identity, if any. `Empty` dials are anonymous.
    fn dial_id(&self) -> Option<DialId>;
    /// Adopt a freshly computed placement. Interpretation state survives;
    /// only geometry changes.
    fn measure(&mut self, rect: Rect, bound: TouchBound);
    fn geometry(&self) -> &Geometry;
    /// Whether the router may assign fingers to this dial at all. `Empty`
    /// dials occupy layout slots but refuse ownership.
    fn accepts_pointers(&self) -> bool {
        true
    }
    /// Interpret this frame's assigned fingers. The set contains every
    /// pointer this dial tracks (wherever it currently is) plus any newly
    /// assigned ones; an empty set means all its fingers lifted.
    fn handle_touch(&mut self, fingers: &[TouchPoint]) -> Touched;
    /// Pointer ids this dial currently owns.
    fn tracked_pointers(&self) -> SmallVec<[PointerId; 2]>;
    fn draw(&self, canvas: &mut dyn Canvas, theme: &Theme);
    /// A platform-classified gesture at the given dial-relative normalized
    /// position. Dials without gesture support ignore it.
    fn gesture(&mut self, _at: Point, _kind: GestureKind) -> Touched {
        Touched::quiet()
    }
    /// Programmatic analog input, bypassing touch. Only meaningful for
    /// sticks.
    fn simulate_motion(&mut self, _x: f32, _y: f32) -> Touched {
        Touched::quiet()
    }
    /// Programmatic button input, bypassing touch.
    fn simulate_key(&mut self, _button: ButtonId, _pressed: bool) -> Touched {
        Touched::quiet()
    }
    /// Drop any programmatic input, returning to touch-only state.
    fn clear_simulated(&mut self) -> Touched {
        Touched::quiet()
    }
    /// Append accessibility entries for this dial.
    fn labels(&self, _out: &mut Vec<DialLabel>) {}
}

/// The closed set of dial kinds.
#[enum_dispatch(DialBehavior)]
pub enum Dial {
    Cross(CrossDial),
    Stick(StickDial),
    PrimaryButtons(PrimaryButtonsDial),
    Button(ButtonDial),
    DoubleButton(DoubleButtonDial),
    Empty(EmptyDial),
}

impl Dial {
    /// Instantiate the runtime state machine for a validated configuration.
    #[must_use]
    pub(crate) fn from_config(config: &DialConfig) -> Self {
        match config {
            DialConfig::Cross(c) => Dial::Cross(CrossDial::new(c.clone())),
            DialConfig::Stick(c) => Dial::Stick(StickDial::new(c.clone())),
            DialConfig::PrimaryButtons(c) => {
                Dial::PrimaryButtons(PrimaryButtonsDial::new(c.clone()))
            }
            DialConfig::Button(c) => Dial::Button(ButtonDial::new(c.clone())),
            DialConfig::DoubleButton(c) => Dial::DoubleButton(DoubleButtonDial::new(c.clone())),
            DialConfig::Empty => Dial::Empty(EmptyDial::default()),
        }
    }
}
