//! # Geometry primitives
//!
//! Small value types used for layout math and touch hit-testing. Everything
//! here is in device pixels unless a function says otherwise, with the usual
//! screen convention: X grows rightwards, Y grows *downwards*, and angles in
//! radians grow clockwise from the positive X axis.
//!
//! Containment tests are pure and get called once per finger per dial per
//! frame, so they stay allocation-free.

use std::f32::consts::TAU;

/// Bring an angle into `[0, 2π)`.
///
/// `rem_euclid` rather than `%` so negative inputs land in the positive range.
#[must_use]
pub fn normalize_angle(angle: f32) -> f32 {
    let a = angle.rem_euclid(TAU);
    // rem_euclid(TAU) can return TAU itself for tiny negative inputs due to
    // rounding. Fold that back to zero.
    if a >= TAU {
        0.0
    } else {
        a
    }
}

/// A point or vector in the XY plane.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
    /// Euclidean length when interpreted as a vector from the origin.
    #[must_use]
    pub fn length(self) -> f32 {
        self.x.hypot(self.y)
    }
    /// Angle of the vector `other - self`, normalized into `[0, 2π)`.
    #[must_use]
    pub fn angle_to(self, other: Point) -> f32 {
        normalize_angle((other.y - self.y).atan2(other.x - self.x))
    }
    #[must_use]
    pub fn distance_to(self, other: Point) -> f32 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// An axis-aligned rectangle, stored as its two corners.
///
/// Empty rectangles (`right < left`) are representable but only occur
/// transiently while accumulating unions.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    #[must_use]
    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }
    /// Square of the given half-extent centered on `center`.
    #[must_use]
    pub fn centered_square(center: Point, half: f32) -> Self {
        Self {
            left: center.x - half,
            top: center.y - half,
            right: center.x + half,
            bottom: center.y + half,
        }
    }
    #[must_use]
    pub fn width(&self) -> f32 {
        self.right - self.left
    }
    #[must_use]
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(
            (self.left + self.right) / 2.0,
            (self.top + self.bottom) / 2.0,
        )
    }
    /// Smallest rectangle containing both `self` and `other`.
    #[must_use]
    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            left: self.left.min(other.left),
            top: self.top.min(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }
    /// Uniform scale about the origin.
    #[must_use]
    pub fn scaled(&self, factor: f32) -> Rect {
        Rect {
            left: self.left * factor,
            top: self.top * factor,
            right: self.right * factor,
            bottom: self.bottom * factor,
        }
    }
    #[must_use]
    pub fn translated(&self, by: Point) -> Rect {
        Rect {
            left: self.left + by.x,
            top: self.top + by.y,
            right: self.right + by.x,
            bottom: self.bottom + by.y,
        }
    }
    /// Edge-inclusive containment.
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left && p.x <= self.right && p.y >= self.top && p.y <= self.bottom
    }
    /// True if `other` lies entirely within `self`, edges included.
    #[must_use]
    pub fn encloses(&self, other: &Rect) -> bool {
        other.left >= self.left
            && other.top >= self.top
            && other.right <= self.right
            && other.bottom <= self.bottom
    }
}

/// A filled disc.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Circle {
    pub center: Point,
    pub radius: f32,
}

impl Circle {
    #[must_use]
    pub const fn new(center: Point, radius: f32) -> Self {
        Self { center, radius }
    }
    /// Edge-inclusive containment.
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        self.center.distance_to(p) <= self.radius
    }
}

/// An angular annulus: the region between two radii and two angles.
///
/// Angles are normalized into `[0, 2π)` at construction. After normalization
/// `end < start` is meaningful and denotes a sector crossing the zero angle,
/// e.g. `start = 15π/8, end = π/8` covers the 45° wedge straddling the
/// positive X axis. A raw span of a whole turn or more is kept as the full
/// ring rather than normalized, which would collapse it to a single angle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sector {
    pub center: Point,
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub start_angle: f32,
    pub end_angle: f32,
}

impl Sector {
    #[must_use]
    pub fn new(center: Point, inner: f32, outer: f32, start: f32, end: f32) -> Self {
        // Slack absorbs the rounding of spans assembled as per-slot sums.
        if end - start >= TAU - 1e-4 {
            return Self {
                center,
                inner_radius: inner,
                outer_radius: outer,
                start_angle: 0.0,
                end_angle: TAU,
            };
        }
        Self {
            center,
            inner_radius: inner,
            outer_radius: outer,
            start_angle: normalize_angle(start),
            end_angle: normalize_angle(end),
        }
    }
    /// Whether `angle` (already normalized) falls within the angular span,
    /// start and end inclusive, handling the wraparound case.
    #[must_use]
    fn spans(&self, angle: f32) -> bool {
        if self.start_angle <= self.end_angle {
            angle >= self.start_angle && angle <= self.end_angle
        } else {
            angle >= self.start_angle || angle <= self.end_angle
        }
    }
    /// Containment: distance within `[inner, outer]` and angle within the
    /// span, all bounds inclusive.
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        let distance = self.center.distance_to(p);
        if distance < self.inner_radius || distance > self.outer_radius {
            return false;
        }
        self.spans(self.center.angle_to(p))
    }
}

/// The hit-testable region a dial exposes for initial finger assignment.
///
/// The primary dial is a disc, secondary ring dials are sectors. This is the
/// whole closed set; shapes are not user-extensible.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TouchBound {
    Circle(Circle),
    Sector(Sector),
}

impl TouchBound {
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        match self {
            TouchBound::Circle(c) => c.contains(p),
            TouchBound::Sector(s) => s.contains(p),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_4, PI};

    #[test]
    fn normalize_wraps_negative() {
        assert!((normalize_angle(-FRAC_PI_4) - (TAU - FRAC_PI_4)).abs() < 1e-6);
        assert!((normalize_angle(TAU + 0.5) - 0.5).abs() < 1e-6);
        assert_eq!(normalize_angle(0.0), 0.0);
    }

    #[test]
    fn circle_edge_inclusive() {
        let c = Circle::new(Point::new(10.0, 10.0), 5.0);
        assert!(c.contains(Point::new(15.0, 10.0)));
        assert!(!c.contains(Point::new(15.01, 10.0)));
    }

    #[test]
    fn sector_start_inclusive_end_exclusive_beyond() {
        let s = Sector::new(Point::default(), 1.0, 2.0, FRAC_PI_4, PI);
        // Exactly at the start angle, mid radius.
        let at = |angle: f32, r: f32| Point::new(r * angle.cos(), r * angle.sin());
        assert!(s.contains(at(FRAC_PI_4, 1.5)));
        // Just past the end angle.
        assert!(!s.contains(at(PI + 0.01, 1.5)));
        // Radius out of band.
        assert!(!s.contains(at(FRAC_PI_4, 0.99)));
        assert!(!s.contains(at(FRAC_PI_4, 2.01)));
    }

    #[test]
    fn sector_wraparound_spans_zero() {
        // 45° wedge straddling the positive X axis.
        let s = Sector::new(Point::default(), 1.0, 2.0, TAU - FRAC_PI_4 / 2.0, FRAC_PI_4 / 2.0);
        assert!(s.contains(Point::new(1.5, 0.0)));
        assert!(s.contains(Point::new(1.5, -0.1)));
        assert!(s.contains(Point::new(1.5, 0.1)));
        // Opposite side.
        assert!(!s.contains(Point::new(-1.5, 0.0)));
    }

    #[test]
    fn full_turn_sector_contains_every_angle() {
        // A whole-ring span must not normalize down to a single angle.
        let s = Sector::new(Point::default(), 1.0, 2.0, -FRAC_PI_4, TAU - FRAC_PI_4);
        for step in 0..16 {
            #[allow(clippy::cast_precision_loss)]
            let angle = step as f32 * TAU / 16.0;
            assert!(
                s.contains(Point::new(1.5 * angle.cos(), 1.5 * angle.sin())),
                "angle {angle}"
            );
        }
        assert!(!s.contains(Point::new(0.5, 0.0)));
    }

    #[test]
    fn rect_union_and_enclose() {
        let a = Rect::new(-1.0, -1.0, 1.0, 1.0);
        let b = Rect::new(0.5, 0.0, 2.0, 0.5);
        let u = a.union(&b);
        assert_eq!(u, Rect::new(-1.0, -1.0, 2.0, 1.0));
        assert!(u.encloses(&a));
        assert!(u.encloses(&b));
        assert!(!a.encloses(&u));
    }
}
