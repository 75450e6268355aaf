//! # Button dials
//!
//! Three kinds share this module: the primary-center button cluster, the
//! plain single button, and the split double button. All of them are
//! enter/exit machines - no snapping, no vectors - and all mark their
//! transitions haptic in both directions, leaving it to the
//! [haptic mode](crate::config::HapticMode) to decide which edges actually
//! buzz.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use smallvec::SmallVec;

use crate::config::{ButtonConfig, ButtonId, DialId, DialKind, DoubleButtonConfig, PrimaryButtonsConfig};
use crate::draw::{Canvas, Theme};
use crate::events::{Event, EventBatch, PointerId, TouchPoint};
use crate::geom::{normalize_angle, Circle, Point, Rect, Sector, TouchBound};

use super::{DialBehavior, DialLabel, Geometry, Touched};

/// Where sub-button centers sit, as a fraction of the primary radius.
const CLUSTER_RING: f32 = 0.55;
/// Sub-button radius cap, as a fraction of the primary radius.
const CLUSTER_SUB_MAX: f32 = 0.45;

struct Sub {
    button: ButtonId,
    region: Circle,
    pressed: bool,
}

/// A cluster of sub-buttons arranged inside the primary circle. Each
/// sub-button independently tracks whether an assigned finger is inside its
/// sub-region.
pub struct PrimaryButtonsDial {
    config: PrimaryButtonsConfig,
    geo: Geometry,
    subs: Vec<Sub>,
    owned: SmallVec<[PointerId; 4]>,
}

impl PrimaryButtonsDial {
    #[must_use]
    pub(crate) fn new(config: PrimaryButtonsConfig) -> Self {
        let subs = config
            .buttons
            .iter()
            .map(|&button| Sub {
                button,
                region: Circle::new(Point::default(), 0.0),
                pressed: false,
            })
            .collect();
        Self {
            config,
            geo: Geometry::default(),
            subs,
            owned: SmallVec::new(),
        }
    }

    /// Sub-region placement: a single button fills the center, larger
    /// clusters sit on an inner ring, each sub sized by the arc it occupies.
    fn arrange(&mut self) {
        let center = self.geo.center();
        let radius = self.geo.radius();
        let count = self.subs.len();
        if count == 1 {
            self.subs[0].region = Circle::new(center, radius * 0.6);
            return;
        }
        #[allow(clippy::cast_precision_loss)]
        let count_f = count as f32;
        let sub_radius = radius * CLUSTER_SUB_MAX.min(CLUSTER_RING * PI / count_f);
        for (k, sub) in self.subs.iter_mut().enumerate() {
            #[allow(clippy::cast_precision_loss)]
            let angle = k as f32 * TAU / count_f - FRAC_PI_2;
            let sub_center = Point::new(
                center.x + radius * CLUSTER_RING * angle.cos(),
                center.y + radius * CLUSTER_RING * angle.sin(),
            );
            sub.region = Circle::new(sub_center, sub_radius);
        }
    }
}

impl DialBehavior for PrimaryButtonsDial {
    fn dial_id(&self) -> Option<DialId> {
        Some(self.config.id)
    }

    fn measure(&mut self, rect: Rect, bound: TouchBound) {
        self.geo = Geometry { rect, bound };
        self.arrange();
    }

    fn geometry(&self) -> &Geometry {
        &self.geo
    }

    fn handle_touch(&mut self, fingers: &[TouchPoint]) -> Touched {
        self.owned = fingers.iter().map(|f| f.pointer).collect();

        let mut desired = vec![false; self.subs.len()];
        for finger in fingers {
            let p = Point::new(finger.x, finger.y);
            if self.config.exclusive {
                // Topmost (first-listed) sub-button only.
                if let Some(hit) = self.subs.iter().position(|s| s.region.contains(p)) {
                    desired[hit] = true;
                }
            } else {
                for (i, sub) in self.subs.iter().enumerate() {
                    if sub.region.contains(p) {
                        desired[i] = true;
                    }
                }
            }
        }

        let mut events = EventBatch::new();
        for (sub, want) in self.subs.iter_mut().zip(&desired) {
            if sub.pressed != *want {
                sub.pressed = *want;
                events.push(Event::Button {
                    dial: self.config.id,
                    button: sub.button,
                    pressed: *want,
                    haptic: true,
                });
            }
        }
        if events.is_empty() {
            Touched::quiet()
        } else {
            Touched::changed(events)
        }
    }

    fn tracked_pointers(&self) -> SmallVec<[PointerId; 2]> {
        self.owned.iter().copied().collect()
    }

    fn draw(&self, canvas: &mut dyn Canvas, theme: &Theme) {
        let Some(style) = theme.style(DialKind::PrimaryButtons) else {
            return;
        };
        canvas.fill_circle(Circle::new(self.geo.center(), self.geo.radius()), style.fill);
        for sub in &self.subs {
            canvas.fill_circle(sub.region, style.accent);
            canvas.label(
                sub.region.center,
                &sub.button.0.to_string(),
                style.label,
            );
        }
    }

    fn labels(&self, out: &mut Vec<DialLabel>) {
        out.push(DialLabel {
            dial: self.config.id,
            text: format!("{} button cluster", self.subs.len()),
            rect: self.geo.rect,
        });
    }
}

/// Simple press on finger enter, release when its last finger lifts.
pub struct ButtonDial {
    config: ButtonConfig,
    geo: Geometry,
    owned: SmallVec<[PointerId; 2]>,
    pressed: bool,
}

impl ButtonDial {
    #[must_use]
    pub(crate) fn new(config: ButtonConfig) -> Self {
        Self {
            config,
            geo: Geometry::default(),
            owned: SmallVec::new(),
            pressed: false,
        }
    }
}

impl DialBehavior for ButtonDial {
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
        self.owned = fingers.iter().map(|f| f.pointer).collect();
        let want = !fingers.is_empty();
        if want == self.pressed {
            return Touched::quiet();
        }
        self.pressed = want;
        let mut events = EventBatch::new();
        events.push(Event::Button {
            dial: self.config.id,
            button: self.config.button,
            pressed: want,
            haptic: true,
        });
        Touched::changed(events)
    }

    fn tracked_pointers(&self) -> SmallVec<[PointerId; 2]> {
        self.owned.clone()
    }

    fn draw(&self, canvas: &mut dyn Canvas, theme: &Theme) {
        let Some(style) = theme.style(DialKind::Button) else {
            return;
        };
        let color = if self.pressed { style.accent } else { style.fill };
        canvas.fill_circle(Circle::new(self.geo.center(), self.geo.radius()), color);
        canvas.label(self.geo.center(), &self.config.button.0.to_string(), style.label);
    }

    fn labels(&self, out: &mut Vec<DialLabel>) {
        out.push(DialLabel {
            dial: self.config.id,
            text: format!("button {}", self.config.button.0),
            rect: self.geo.rect,
        });
    }
}

/// A circle split into two angular halves, each an independent button.
/// A half is pressed while any owned finger's current angle falls in it.
pub struct DoubleButtonDial {
    config: DoubleButtonConfig,
    geo: Geometry,
    owned: SmallVec<[PointerId; 2]>,
    pressed: [bool; 2],
}

impl DoubleButtonDial {
    #[must_use]
    pub(crate) fn new(config: DoubleButtonConfig) -> Self {
        Self {
            config,
            geo: Geometry::default(),
            owned: SmallVec::new(),
            pressed: [false; 2],
        }
    }

    /// Which half a view-space point falls in: `0` for the half sweeping
    /// `[rotation, rotation + π)`, `1` for the other.
    fn half_of(&self, p: Point) -> usize {
        let angle = self.geo.center().angle_to(p);
        let local = normalize_angle(angle - self.config.rotation_deg.to_radians());
        usize::from(local >= PI)
    }
}

impl DialBehavior for DoubleButtonDial {
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
        self.owned = fingers.iter().map(|f| f.pointer).collect();
        let mut desired = [false; 2];
        for finger in fingers {
            desired[self.half_of(Point::new(finger.x, finger.y))] = true;
        }
        let mut events = EventBatch::new();
        for (i, want) in desired.iter().enumerate() {
            if self.pressed[i] != *want {
                self.pressed[i] = *want;
                events.push(Event::Button {
                    dial: self.config.id,
                    button: self.config.buttons[i],
                    pressed: *want,
                    haptic: true,
                });
            }
        }
        if events.is_empty() {
            Touched::quiet()
        } else {
            Touched::changed(events)
        }
    }

    fn tracked_pointers(&self) -> SmallVec<[PointerId; 2]> {
        self.owned.clone()
    }

    fn draw(&self, canvas: &mut dyn Canvas, theme: &Theme) {
        let Some(style) = theme.style(DialKind::DoubleButton) else {
            return;
        };
        let center = self.geo.center();
        let radius = self.geo.radius();
        let rotation = self.config.rotation_deg.to_radians();
        for (i, &pressed) in self.pressed.iter().enumerate() {
            #[allow(clippy::cast_precision_loss)]
            let start = rotation + i as f32 * PI;
            let color = if pressed { style.accent } else { style.fill };
            canvas.fill_sector(Sector::new(center, 0.0, radius, start, start + PI), color);
        }
    }

    fn labels(&self, out: &mut Vec<DialLabel>) {
        out.push(DialLabel {
            dial: self.config.id,
            text: format!(
                "buttons {} and {}",
                self.config.buttons[0].0, self.config.buttons[1].0
            ),
            rect: self.geo.rect,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn measured<D: DialBehavior>(mut dial: D) -> D {
        let rect = Rect::new(0.0, 0.0, 200.0, 200.0);
        let bound = TouchBound::Circle(Circle::new(Point::new(100.0, 100.0), 100.0));
        dial.measure(rect, bound);
        dial
    }

    fn finger(id: u64, x: f32, y: f32) -> TouchPoint {
        TouchPoint {
            pointer: PointerId(id),
            x,
            y,
        }
    }

    #[test]
    fn single_button_press_and_release_once() {
        let mut dial = measured(ButtonDial::new(ButtonConfig {
            id: DialId(1),
            button: ButtonId(5),
        }));
        let t = dial.handle_touch(&[finger(1, 100.0, 100.0)]);
        assert_eq!(t.events.len(), 1);
        assert!(t.events[0].is_activating());
        // Held: no re-emission.
        assert!(dial.handle_touch(&[finger(1, 120.0, 100.0)]).events.is_empty());
        // Released exactly once.
        let t = dial.handle_touch(&[]);
        assert_eq!(t.events.len(), 1);
        assert!(!t.events[0].is_activating());
        assert!(dial.handle_touch(&[]).events.is_empty());
    }

    #[test]
    fn cluster_arranges_subs_inside_primary() {
        let mut dial = measured(PrimaryButtonsDial::new(PrimaryButtonsConfig {
            id: DialId(1),
            buttons: vec![ButtonId(1), ButtonId(2), ButtonId(3), ButtonId(4)],
            exclusive: false,
        }));
        let outer = Circle::new(Point::new(100.0, 100.0), 100.0);
        for sub in &dial.subs {
            // Sub center plus sub radius stays inside the primary circle.
            let reach = outer.center.distance_to(sub.region.center) + sub.region.radius;
            assert!(reach <= 100.0 + 1e-3, "sub reaches {reach}");
        }
        // First sub is at the top of the ring.
        let t = dial.handle_touch(&[finger(1, 100.0, 45.0)]);
        assert_eq!(t.events.len(), 1);
        assert!(matches!(
            t.events[0],
            Event::Button {
                button: ButtonId(1),
                pressed: true,
                ..
            }
        ));
    }

    #[test]
    fn exclusive_cluster_presses_first_match_only() {
        // Two sub-buttons sharing the center region would both fire in
        // overlapping mode; exclusive mode picks the first.
        let mut dial = measured(PrimaryButtonsDial::new(PrimaryButtonsConfig {
            id: DialId(1),
            buttons: vec![ButtonId(1), ButtonId(2)],
            exclusive: true,
        }));
        // With two subs on the ring, regions don't overlap, so emulate the
        // distinction by a point inside only the second.
        let second = dial.subs[1].region.center;
        let t = dial.handle_touch(&[finger(1, second.x, second.y)]);
        assert_eq!(t.events.len(), 1);
        assert!(matches!(
            t.events[0],
            Event::Button {
                button: ButtonId(2),
                ..
            }
        ));
    }

    #[test]
    fn double_button_halves_are_independent() {
        let mut dial = measured(DoubleButtonDial::new(DoubleButtonConfig {
            id: DialId(1),
            buttons: [ButtonId(7), ButtonId(8)],
            rotation_deg: 0.0,
        }));
        // Angle just below π: half 0. Below center is positive Y.
        let t = dial.handle_touch(&[finger(1, 110.0, 140.0)]);
        assert!(matches!(
            t.events[0],
            Event::Button {
                button: ButtonId(7),
                pressed: true,
                ..
            }
        ));
        // Second finger on the opposite half.
        let t = dial.handle_touch(&[finger(1, 110.0, 140.0), finger(2, 110.0, 60.0)]);
        assert!(matches!(
            t.events[0],
            Event::Button {
                button: ButtonId(8),
                pressed: true,
                ..
            }
        ));
        // First finger lifts: only half 0 releases.
        let t = dial.handle_touch(&[finger(2, 110.0, 60.0)]);
        assert_eq!(t.events.len(), 1);
        assert!(matches!(
            t.events[0],
            Event::Button {
                button: ButtonId(7),
                pressed: false,
                ..
            }
        ));
    }
}
