//! # The 8-way directional pad
//!
//! A single tracked finger's angle around the dial center snaps to the
//! nearest of eight 45° sectors. Sector boundaries sit *between* the
//! cardinal directions (the rounding applies a half-sector offset), so
//! sector 0 is centered on "right" and the odd sectors are the diagonals.
//!
//! Diagonals press both adjacent cardinal buttons at once; cardinals press
//! exactly one. Output is deduplicated: a `Direction` is emitted only when
//! the snapped sector changes.
//!
//! ## Quirks
//! The haptic hint alternates by the parity of the *previous* sector index
//! rather than counting real detents - every other sector change buzzes.
//! This reproduces the behavior of the system this crate models; treat it as
//! a feel approximation, not detent semantics.

use std::f32::consts::FRAC_PI_4;

use smallvec::SmallVec;

use crate::config::{ButtonId, CrossConfig, DialId};
use crate::draw::{Canvas, Theme};
use crate::events::{Event, EventBatch, GestureKind, PointerId, TouchPoint};
use crate::geom::{normalize_angle, Circle, Point, Rect, TouchBound};

use super::{find_pointer, DialBehavior, DialLabel, Geometry, Touched};

bitflags::bitflags! {
    /// The set of cardinal directions a snapped sector activates.
    #[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
    pub struct Cardinals: u8 {
        const RIGHT = 1;
        const DOWN = 2;
        const LEFT = 4;
        const UP = 8;
    }
}

/// Snap an angle (radians, screen convention) to one of the 8 sector
/// indices, `0` = right, increasing clockwise.
///
/// Invariant under whole turns, and deterministic at exact boundaries:
/// rounding resolves a boundary angle to the higher sector, so a static
/// finger never toggles between frames.
#[must_use]
pub fn snap(angle: f32) -> u8 {
    let normalized = normalize_angle(angle);
    #[allow(clippy::cast_possible_truncation)]
    let index = (normalized / FRAC_PI_4).round() as i32;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    {
        index.rem_euclid(8) as u8
    }
}

/// The cardinal buttons a sector index activates. Even indices are pure
/// cardinals (one button), odd indices diagonals (exactly two).
#[must_use]
pub fn expand(index: u8) -> Cardinals {
    match index % 8 {
        0 => Cardinals::RIGHT,
        1 => Cardinals::RIGHT | Cardinals::DOWN,
        2 => Cardinals::DOWN,
        3 => Cardinals::DOWN | Cardinals::LEFT,
        4 => Cardinals::LEFT,
        5 => Cardinals::LEFT | Cardinals::UP,
        6 => Cardinals::UP,
        _ => Cardinals::UP | Cardinals::RIGHT,
    }
}

pub struct CrossDial {
    config: CrossConfig,
    geo: Geometry,
    tracked: Option<PointerId>,
    last_index: Option<u8>,
    active: Cardinals,
}

impl CrossDial {
    #[must_use]
    pub(crate) fn new(config: CrossConfig) -> Self {
        Self {
            config,
            geo: Geometry::default(),
            tracked: None,
            last_index: None,
            active: Cardinals::default(),
        }
    }

    fn cardinal_button(&self, cardinal: Cardinals) -> ButtonId {
        let b = &self.config.buttons;
        match cardinal {
            Cardinals::RIGHT => b.right,
            Cardinals::DOWN => b.down,
            Cardinals::LEFT => b.left,
            _ => {
                debug_assert_eq!(cardinal, Cardinals::UP);
                b.up
            }
        }
    }

    /// Emit press/release deltas moving `self.active` to `target`.
    fn push_button_deltas(&mut self, target: Cardinals, events: &mut EventBatch) {
        for cardinal in [
            Cardinals::RIGHT,
            Cardinals::DOWN,
            Cardinals::LEFT,
            Cardinals::UP,
        ] {
            let was = self.active.contains(cardinal);
            let is = target.contains(cardinal);
            if was != is {
                events.push(Event::Button {
                    dial: self.config.id,
                    button: self.cardinal_button(cardinal),
                    pressed: is,
                    haptic: false,
                });
            }
        }
        self.active = target;
    }

    fn release(&mut self) -> Touched {
        self.last_index = None;
        let mut events = EventBatch::new();
        events.push(Event::Direction {
            dial: self.config.id,
            x: 0.0,
            y: 0.0,
            haptic: false,
        });
        self.push_button_deltas(Cardinals::empty(), &mut events);
        Touched::changed(events)
    }
}

impl DialBehavior for CrossDial {
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
        let Some(finger) = current else {
            if self.tracked.take().is_some() {
                return self.release();
            }
            return Touched::quiet();
        };
        self.tracked = Some(finger.pointer);

        let rel = self.geo.normalized(Point::new(finger.x, finger.y));
        let angle = rel.y.atan2(rel.x) - self.config.rotation_deg.to_radians();
        let index = snap(angle);
        if self.last_index == Some(index) {
            return Touched::quiet();
        }

        // Alternating-parity feedback, see module quirks. The first claim
        // has no previous index and stays silent.
        let haptic = self.last_index.is_some_and(|prev| prev % 2 == 0);
        let sector_angle = f32::from(index) * FRAC_PI_4;
        let mut events = EventBatch::new();
        events.push(Event::Direction {
            dial: self.config.id,
            x: sector_angle.cos(),
            y: sector_angle.sin(),
            haptic,
        });
        self.push_button_deltas(expand(index), &mut events);
        self.last_index = Some(index);
        Touched::changed(events)
    }

    fn tracked_pointers(&self) -> SmallVec<[PointerId; 2]> {
        self.tracked.into_iter().collect()
    }

    fn draw(&self, canvas: &mut dyn Canvas, theme: &Theme) {
        let Some(style) = theme.style(crate::config::DialKind::Cross) else {
            return;
        };
        let center = self.geo.center();
        let radius = self.geo.radius();
        canvas.fill_circle(Circle::new(center, radius), style.fill);
        // Four arms, rotated with the pad.
        let rotation = self.config.rotation_deg.to_radians();
        for arm in 0..4u8 {
            let angle = f32::from(arm) * 2.0 * FRAC_PI_4 + rotation;
            let tip = Point::new(
                center.x + radius * 0.8 * angle.cos(),
                center.y + radius * 0.8 * angle.sin(),
            );
            canvas.stroke_line(center, tip, style.accent);
        }
    }

    fn gesture(&mut self, _at: Point, kind: GestureKind) -> Touched {
        if !self.config.supports_gesture {
            return Touched::quiet();
        }
        let mut events = EventBatch::new();
        events.push(Event::Gesture {
            dial: self.config.id,
            kind,
        });
        Touched::changed(events)
    }

    fn labels(&self, out: &mut Vec<DialLabel>) {
        out.push(DialLabel {
            dial: self.config.id,
            text: "directional pad".to_owned(),
            rect: self.geo.rect,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_8, TAU};

    #[test]
    fn snap_invariant_under_whole_turns() {
        for index in 0..8u8 {
            let angle = f32::from(index) * FRAC_PI_4;
            assert_eq!(snap(angle), index);
            assert_eq!(snap(angle + TAU), index);
            assert_eq!(snap(angle - TAU), index);
        }
    }

    #[test]
    fn snap_boundary_is_deterministic() {
        // Exactly between sector 0 and 1. Rounding resolves away from zero,
        // so the boundary belongs to sector 1 - and keeps belonging to it
        // on every re-evaluation.
        assert_eq!(snap(FRAC_PI_8), 1);
        assert_eq!(snap(FRAC_PI_8), snap(FRAC_PI_8));
    }

    #[test]
    fn diagonals_expand_to_two_cardinals() {
        for index in 0..8u8 {
            let set = expand(index);
            let expected = if index % 2 == 0 { 1 } else { 2 };
            assert_eq!(set.bits().count_ones(), expected, "index {index}");
        }
        // Adjacency: each diagonal shares a cardinal with both neighbors.
        for diagonal in [1u8, 3, 5, 7] {
            let set = expand(diagonal);
            assert!(set.contains(expand(diagonal - 1)));
            assert!(set.contains(expand((diagonal + 1) % 8)));
        }
    }
}
