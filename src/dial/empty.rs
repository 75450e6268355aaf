//! A placeholder occupying ring slots for spacing. Never tracks fingers,
//! never emits events, never draws.

use smallvec::SmallVec;

use crate::config::DialId;
use crate::draw::{Canvas, Theme};
use crate::events::{PointerId, TouchPoint};
use crate::geom::{Rect, TouchBound};

use super::{DialBehavior, Geometry, Touched};

#[derive(Default)]
pub struct EmptyDial {
    geo: Geometry,
}

impl DialBehavior for EmptyDial {
    fn dial_id(&self) -> Option<DialId> {
        None
    }

    fn measure(&mut self, rect: Rect, bound: TouchBound) {
        self.geo = Geometry { rect, bound };
    }

    fn geometry(&self) -> &Geometry {
        &self.geo
    }

    fn accepts_pointers(&self) -> bool {
        false
    }

    fn handle_touch(&mut self, _fingers: &[TouchPoint]) -> Touched {
        Touched::quiet()
    }

    fn tracked_pointers(&self) -> SmallVec<[PointerId; 2]> {
        SmallVec::new()
    }

    fn draw(&self, _canvas: &mut dyn Canvas, _theme: &Theme) {}
}
