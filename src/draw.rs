//! # Rendering collaborator surface
//!
//! Actual pixel pushing lives outside this crate. Dials draw themselves
//! through the [`Canvas`] trait using nothing but their already-computed
//! geometry and a [`Theme`], so any renderer that can fill circles and
//! sectors can display a gamepad.

use std::collections::HashMap;

use crate::config::DialKind;
use crate::geom::{Circle, Point, Sector};

/// 8-bit RGBA.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color(pub [u8; 4]);

impl Color {
    pub const TRANSPARENT: Color = Color([0, 0, 0, 0]);
}

/// Colors for one dial kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DialStyle {
    pub fill: Color,
    pub accent: Color,
    pub label: Color,
}

/// Per-kind visual styles.
///
/// A style must exist for every dial kind the configuration uses - a missing
/// entry is a construction-time error, never a silent fallback.
#[derive(Clone, Debug)]
pub struct Theme {
    styles: HashMap<DialKind, DialStyle>,
}

impl Theme {
    /// A theme with no styles at all. Useful as a base for [`Theme::with`].
    #[must_use]
    pub fn empty() -> Self {
        Self {
            styles: HashMap::new(),
        }
    }
    #[must_use]
    pub fn with(mut self, kind: DialKind, style: DialStyle) -> Self {
        self.styles.insert(kind, style);
        self
    }
    #[must_use]
    pub fn style(&self, kind: DialKind) -> Option<&DialStyle> {
        self.styles.get(&kind)
    }
}

impl Default for Theme {
    /// A muted grey style for every kind.
    fn default() -> Self {
        let style = DialStyle {
            fill: Color([60, 60, 60, 160]),
            accent: Color([220, 220, 220, 200]),
            label: Color([255, 255, 255, 255]),
        };
        let mut styles = HashMap::new();
        for kind in <DialKind as strum::IntoEnumIterator>::iter() {
            styles.insert(kind, style);
        }
        Self { styles }
    }
}

/// The drawing operations dials need. Implemented by the rendering
/// collaborator; calls arrive in back-to-front order within one
/// [`crate::Gamepad::draw`] pass.
pub trait Canvas {
    fn fill_circle(&mut self, circle: Circle, color: Color);
    fn fill_sector(&mut self, sector: Sector, color: Color);
    fn stroke_line(&mut self, from: Point, to: Point, color: Color);
    fn label(&mut self, at: Point, text: &str, color: Color);
}
