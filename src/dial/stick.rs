//! # The analog stick
//!
//! While a finger is tracked, its dial-relative position is shaped through
//! the dead zone and clamped to the unit circle, then emitted as a
//! continuous `Direction` every frame. The finger may wander far outside the
//! stick's visual bound without losing control - ownership is the router's
//! concern, not geometry's.
//!
//! Motion can also be injected programmatically (sensor-driven control):
//! simulated input lives in a reserved pointer-id space and coexists with a
//! real finger, with the real finger taking precedence while present.

use smallvec::SmallVec;

use crate::config::{ButtonId, DialId, StickConfig};
use crate::draw::{Canvas, Theme};
use crate::events::{Event, EventBatch, GestureKind, PointerId, TouchPoint};
use crate::geom::{Circle, Point, Rect, TouchBound};

use super::{find_pointer, DialBehavior, DialLabel, Geometry, Touched};

pub struct StickDial {
    config: StickConfig,
    geo: Geometry,
    tracked: Option<PointerId>,
    /// Programmatic vector, already shaped. Survives finger activity.
    simulated: Option<(f32, f32)>,
    /// Last emitted vector, for the `changed` flag and knob drawing.
    output: (f32, f32),
}

impl StickDial {
    #[must_use]
    pub(crate) fn new(config: StickConfig) -> Self {
        Self {
            config,
            geo: Geometry::default(),
            tracked: None,
            simulated: None,
            output: (0.0, 0.0),
        }
    }

    /// Dead zone, then clamp to the unit circle.
    fn shape(&self, x: f32, y: f32) -> (f32, f32) {
        let len = x.hypot(y);
        if len < self.config.dead_zone {
            (0.0, 0.0)
        } else if len > 1.0 {
            (x / len, y / len)
        } else {
            (x, y)
        }
    }

    fn emit(&mut self, vector: (f32, f32), haptic: bool) -> Touched {
        let changed = vector != self.output;
        self.output = vector;
        let mut events = EventBatch::new();
        events.push(Event::Direction {
            dial: self.config.id,
            x: vector.0,
            y: vector.1,
            haptic,
        });
        Touched { changed, events }
    }

    fn click(&self, pressed: bool, events: &mut EventBatch) {
        let Some(button) = self.config.button else {
            return;
        };
        events.push(Event::Button {
            dial: self.config.id,
            button,
            pressed,
            haptic: true,
        });
    }
}

impl DialBehavior for StickDial {
    fn dial_id(&self) -> Option<DialId> {
        Some(self.config.id)
    }

    fn measure(&mut self, rect: Rect, bound: TouchBound) {
        self.geo = Geometry { rect, bound };
    }

    fn geometry(&self) -> &Geometry {
        &self.geo
    }

    fn handle_touch(&mut self, fingers: &[TouchPoint]) -> Touched {
        let current = match self.tracked {
            Some(id) => find_pointer(fingers, id),
            None => fingers.first(),
        };
        match current {
            Some(finger) => {
                self.tracked = Some(finger.pointer);
                let rel = self.geo.normalized(Point::new(finger.x, finger.y));
                let vector = self.shape(rel.x, rel.y);
                self.emit(vector, false)
            }
            None => {
                if self.tracked.take().is_none() {
                    return Touched::quiet();
                }
                // Fall back to simulated input if any, otherwise neutral.
                let fallback = self.simulated.unwrap_or((0.0, 0.0));
                self.emit(fallback, false)
            }
        }
    }

    fn tracked_pointers(&self) -> SmallVec<[PointerId; 2]> {
        let mut ids: SmallVec<[PointerId; 2]> = self.tracked.into_iter().collect();
        if self.simulated.is_some() {
            ids.push(PointerId::simulated(self.config.id));
        }
        ids
    }

    fn draw(&self, canvas: &mut dyn Canvas, theme: &Theme) {
        let Some(style) = theme.style(crate::config::DialKind::Stick) else {
            return;
        };
        let center = self.geo.center();
        let radius = self.geo.radius();
        canvas.fill_circle(Circle::new(center, radius), style.fill);
        // Knob follows the current output vector.
        let knob = Point::new(
            center.x + self.output.0 * radius * 0.4,
            center.y + self.output.1 * radius * 0.4,
        );
        canvas.fill_circle(Circle::new(knob, radius * 0.35), style.accent);
    }

    fn gesture(&mut self, _at: Point, kind: GestureKind) -> Touched {
        let mut events = EventBatch::new();
        // A tap is the stick's press-in: press and release in one batch.
        if kind == GestureKind::Tap && self.config.button.is_some() {
            self.click(true, &mut events);
            self.click(false, &mut events);
            return Touched::changed(events);
        }
        if self.config.supports_gesture {
            events.push(Event::Gesture {
                dial: self.config.id,
                kind,
            });
            return Touched::changed(events);
        }
        Touched::quiet()
    }

    fn simulate_motion(&mut self, x: f32, y: f32) -> Touched {
        let vector = self.shape(x, y);
        self.simulated = Some(vector);
        if self.tracked.is_some() {
            // A real finger outranks the injection; the vector is kept and
            // takes over on release.
            return Touched::quiet();
        }
        self.emit(vector, false)
    }

    fn simulate_key(&mut self, button: ButtonId, pressed: bool) -> Touched {
        if self.config.button != Some(button) {
            return Touched::quiet();
        }
        let mut events = EventBatch::new();
        self.click(pressed, &mut events);
        Touched::changed(events)
    }

    fn clear_simulated(&mut self) -> Touched {
        if self.simulated.take().is_none() || self.tracked.is_some() {
            return Touched::quiet();
        }
        self.emit((0.0, 0.0), false)
    }

    fn labels(&self, out: &mut Vec<DialLabel>) {
        out.push(DialLabel {
            dial: self.config.id,
            text: "analog stick".to_owned(),
            rect: self.geo.rect,
        });
    }
}
