//! # Layout engine
//!
//! Turns the declarative arrangement (socket count, placements, knobs) plus
//! the current view size into one drawing rectangle and one touch bound per
//! dial.
//!
//! All placement math happens first in *unit space*, where the primary dial
//! is the unit circle centered at the origin. Merging every secondary's unit
//! rectangle with that circle yields the arrangement's bounding box in
//! size-multiplier units, which in turn determines how many pixels one unit
//! may occupy within the view. The whole computation is a pure function of
//! its inputs - identical configuration, knobs, and view size reproduce
//! byte-identical rectangles and sectors.

use std::f32::consts::{FRAC_PI_2, TAU};

use crate::config::{Knobs, SecondaryPlacement};
use crate::geom::{Circle, Point, Rect, Sector, TouchBound};

/// One dial's computed placement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct DialGeometry {
    pub rect: Rect,
    pub bound: TouchBound,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Layout {
    /// Primary radius, pixels.
    pub size: f32,
    pub center: Point,
    pub primary: DialGeometry,
    /// Same order as the placements.
    pub secondary: Vec<DialGeometry>,
}

/// Half-size of a secondary dial in unit space. `scale = 1.0` gives it half
/// the primary's radius.
fn half_size(scale: f32) -> f32 {
    scale * 0.5
}

/// Radial gap between the unit circle and a secondary, in unit space.
fn spacing_units(knobs: &Knobs, placement: &SecondaryPlacement) -> f32 {
    knobs.spacing * 0.5 + placement.spacing_extra
}

/// A secondary's unit-space bounding square when its occupied span starts at
/// `start_slot`.
fn unit_rect(
    sockets: u32,
    start_slot: f32,
    placement: &SecondaryPlacement,
    knobs: &Knobs,
    rotation_rad: f32,
) -> Rect {
    #[allow(clippy::cast_precision_loss)]
    let slot = TAU / sockets as f32;
    #[allow(clippy::cast_precision_loss)]
    let spread = placement.spread as f32;
    let h = half_size(placement.scale);

    let angle = (start_slot + (spread - 1.0) / 2.0) * slot + rotation_rad;
    // Keep wide dials clear of their same-ring neighbors: the chord floor
    // pushes a dial outwards until its half-size fits the arc it occupies.
    // Beyond a half-turn the dial owns most of the ring and no floor applies.
    let half_arc = slot * spread / 2.0;
    let chord_floor = if half_arc < FRAC_PI_2 {
        h / half_arc.tan()
    } else {
        0.0
    };
    let distance = (1.0 + h / 2.0 + spacing_units(knobs, placement))
        .max(chord_floor)
        .max(1.0 + h / 2.0);

    let center = Point::new(distance * angle.cos(), distance * angle.sin());
    Rect::centered_square(center, h)
}

/// The unit-space rectangle a placement contributes to the arrangement
/// bounds. With `avoid_clipping` set this is the union over every slot the
/// dial could start at, making the contribution independent of the ring
/// rotation - no rotation value can then push the dial off-screen.
fn contribution(sockets: u32, placement: &SecondaryPlacement, knobs: &Knobs) -> Rect {
    let rotation_rad = placement.rotation.apply(knobs.rotation_deg).to_radians();
    if placement.avoid_clipping {
        let mut merged = unit_rect(sockets, 0.0, placement, knobs, rotation_rad);
        for slot in 1..sockets {
            #[allow(clippy::cast_precision_loss)]
            let r = unit_rect(sockets, slot as f32, placement, knobs, rotation_rad);
            merged = merged.union(&r);
        }
        merged
    } else {
        #[allow(clippy::cast_precision_loss)]
        unit_rect(sockets, placement.index as f32, placement, knobs, rotation_rad)
    }
}

/// Resolve gravity and pixel offset along one axis. Returns the pixel
/// position of the arrangement's leading (left/top) edge.
fn place_axis(edge_lead: f32, usable: f32, extent_px: f32, gravity: f32, offset: f32) -> f32 {
    let slack = (usable - extent_px).max(0.0);
    let lead = slack * (gravity + 1.0) / 2.0;
    // Offset is clamped so the arrangement never crops outside the view.
    let offset = offset.clamp(-lead, slack - lead);
    edge_lead + lead + offset
}

/// Compute the full layout. The builder guarantees `sockets > 0` and all
/// slot indices in range, so no failure mode remains here.
pub(crate) fn compute(
    sockets: u32,
    placements: &[SecondaryPlacement],
    knobs: &Knobs,
    view: [f32; 2],
) -> Layout {
    debug_assert!(sockets > 0);
    #[allow(clippy::cast_precision_loss)]
    let slot = TAU / sockets as f32;

    // Unit-space bounds: the primary circle merged with every secondary.
    let mut bounds = Rect::new(-1.0, -1.0, 1.0, 1.0);
    for placement in placements {
        bounds = bounds.union(&contribution(sockets, placement, knobs));
    }

    let usable_w = (view[0] - knobs.edges[0] - knobs.edges[2]).max(1.0);
    let usable_h = (view[1] - knobs.edges[1] - knobs.edges[3]).max(1.0);
    let size = (usable_w / bounds.width())
        .min(usable_h / bounds.height())
        .min(knobs.max_diameter / 2.0);

    let lead_x = place_axis(
        knobs.edges[0],
        usable_w,
        bounds.width() * size,
        knobs.gravity[0],
        knobs.offset[0],
    );
    let lead_y = place_axis(
        knobs.edges[1],
        usable_h,
        bounds.height() * size,
        knobs.gravity[1],
        knobs.offset[1],
    );
    let center = Point::new(lead_x - bounds.left * size, lead_y - bounds.top * size);

    let primary = DialGeometry {
        rect: Rect::centered_square(center, size),
        bound: TouchBound::Circle(Circle::new(center, size)),
    };

    let gap = knobs.spacing * 0.5 * size;
    let secondary = placements
        .iter()
        .map(|placement| {
            let rotation_rad = placement.rotation.apply(knobs.rotation_deg).to_radians();
            #[allow(clippy::cast_precision_loss)]
            let index = placement.index as f32;
            let rect = unit_rect(sockets, index, placement, knobs, rotation_rad)
                .scaled(size)
                .translated(center);
            #[allow(clippy::cast_precision_loss)]
            let spread = placement.spread as f32;
            // The end is the start plus the occupied span, so a placement
            // covering every socket yields a whole-turn sector rather than
            // two coincident boundary angles.
            let start = index * slot - slot / 2.0 + rotation_rad;
            let end = start + spread * slot;
            let bound = TouchBound::Sector(Sector::new(
                center,
                size + gap,
                size + gap + size * placement.scale,
                start,
                end,
            ));
            DialGeometry { rect, bound }
        })
        .collect();

    Layout {
        size,
        center,
        primary,
        secondary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DialConfig, RotationRule};

    fn placement(index: u32) -> SecondaryPlacement {
        SecondaryPlacement::at(index, DialConfig::Empty)
    }

    fn knobs() -> Knobs {
        Knobs {
            spacing: 0.0,
            ..Knobs::default()
        }
    }

    #[test]
    fn no_secondaries_bounds_are_the_unit_circle() {
        let layout = compute(8, &[], &knobs(), [400.0, 400.0]);
        assert_eq!(layout.size, 200.0);
        assert_eq!(layout.center, Point::new(200.0, 200.0));
        assert_eq!(layout.primary.rect, Rect::new(0.0, 0.0, 400.0, 400.0));
    }

    #[test]
    fn idempotent_for_identical_inputs() {
        let placements = vec![
            SecondaryPlacement {
                spread: 2,
                scale: 0.8,
                ..placement(1)
            },
            placement(5),
        ];
        let k = Knobs {
            gravity: [0.3, -0.7],
            rotation_deg: 23.0,
            ..Knobs::default()
        };
        let a = compute(8, &placements, &k, [1280.0, 720.0]);
        let b = compute(8, &placements, &k, [1280.0, 720.0]);
        assert_eq!(a, b);
    }

    #[test]
    fn max_diameter_caps_size() {
        let k = Knobs {
            max_diameter: 100.0,
            ..knobs()
        };
        let layout = compute(8, &[], &k, [400.0, 400.0]);
        assert_eq!(layout.size, 50.0);
    }

    #[test]
    fn gravity_pins_to_edges() {
        let k = Knobs {
            max_diameter: 100.0,
            gravity: [-1.0, 1.0],
            ..knobs()
        };
        let layout = compute(8, &[], &k, [400.0, 400.0]);
        // Left edge, bottom edge.
        assert_eq!(layout.primary.rect.left, 0.0);
        assert_eq!(layout.primary.rect.bottom, 400.0);
    }

    #[test]
    fn offset_is_clamped_to_the_view() {
        let k = Knobs {
            max_diameter: 100.0,
            offset: [-10_000.0, 10_000.0],
            ..knobs()
        };
        let layout = compute(8, &[], &k, [400.0, 400.0]);
        assert_eq!(layout.primary.rect.left, 0.0);
        assert_eq!(layout.primary.rect.bottom, 400.0);
    }

    #[test]
    fn secondary_sector_wraps_at_slot_zero() {
        let layout = compute(8, &[placement(0)], &knobs(), [600.0, 400.0]);
        let TouchBound::Sector(sector) = layout.secondary[0].bound else {
            panic!("secondary bound must be a sector");
        };
        // Slot 0 straddles the zero angle: start normalizes above end.
        assert!(sector.start_angle > sector.end_angle);
        assert_eq!(sector.inner_radius, layout.size);
        // A point just past the primary edge at angle zero is inside.
        let p = Point::new(layout.center.x + layout.size * 1.1, layout.center.y);
        assert!(sector.contains(p));
    }

    #[test]
    fn avoid_clipping_reserves_room_at_every_rotation() {
        let p = SecondaryPlacement {
            spread: 3,
            avoid_clipping: true,
            ..placement(0)
        };
        for rotation in 0..360 {
            #[allow(clippy::cast_precision_loss)]
            let k = Knobs {
                rotation_deg: rotation as f32,
                ..knobs()
            };
            let placements = [p.clone()];
            let layout = compute(8, &placements, &k, [800.0, 600.0]);
            // The dial's actual pixel rectangle must sit inside the view at
            // every rotation value.
            let view = Rect::new(0.0, 0.0, 800.0, 600.0);
            assert!(
                view.encloses(&layout.secondary[0].rect),
                "clipped at rotation {rotation}: {:?}",
                layout.secondary[0].rect
            );
        }
    }

    #[test]
    fn full_ring_placement_is_touchable_everywhere() {
        let p = SecondaryPlacement {
            spread: 8,
            ..placement(0)
        };
        let layout = compute(8, std::slice::from_ref(&p), &knobs(), [800.0, 600.0]);
        let TouchBound::Sector(sector) = layout.secondary[0].bound else {
            panic!("secondary bound must be a sector");
        };
        // The dial's own drawing rect center lies inside its bound...
        let rect_center = layout.secondary[0].rect.center();
        assert!(sector.contains(rect_center));
        // ...and so does the opposite side of the ring.
        let opposite = Point::new(
            2.0 * layout.center.x - rect_center.x,
            2.0 * layout.center.y - rect_center.y,
        );
        assert!(sector.contains(opposite));
    }

    #[test]
    fn rotation_ignore_rule_pins_a_dial() {
        let fixed = SecondaryPlacement {
            rotation: RotationRule::Ignore,
            ..placement(2)
        };
        let a = compute(
            8,
            std::slice::from_ref(&fixed),
            &Knobs {
                rotation_deg: 0.0,
                ..knobs()
            },
            [600.0, 600.0],
        );
        let b = compute(
            8,
            std::slice::from_ref(&fixed),
            &Knobs {
                rotation_deg: 90.0,
                ..knobs()
            },
            [600.0, 600.0],
        );
        assert_eq!(a.secondary[0].rect, b.secondary[0].rect);
    }
}
