//! # Virtual radial [gamepad](Gamepad) overlay core 🕹️✨
//!
//! A configurable arrangement of circular "dials" - directional pads,
//! analog sticks, buttons - around one primary center dial, translating
//! multi-touch input into discrete control events. The crate owns the hard
//! parts: persistent finger-to-dial assignment across frames, per-dial touch
//! interpretation, ring layout geometry, and the event/haptics pipeline.
//! Drawing pixels, the accessibility tree, platform touch delivery, and the
//! vibration motor are all collaborators plugged in at the edges.
//!
//! To get started, create a [`Builder`], describe the dials, and feed every
//! hardware touch frame to [`Gamepad::touch_frame`].
//!
//! ## Touch ownership
//! A finger that lands inside a dial's region belongs to that dial until it
//! lifts - even when it is dragged far outside the region. This is what lets
//! a stick keep following a finger past its visual edge. When two regions
//! overlap, the *earlier-configured* dial claims a new finger; this
//! tie-break is fixed configuration order, deliberately not nearest-center.
//!
//! ## Threads
//! One logical owner thread drives layout and touch routing; dial state is
//! only ever touched there. Event delivery and haptic actuation each run on
//! their own consumer context behind bounded queues, so a slow subscriber or
//! actuator can never stall input processing.

#![warn(clippy::pedantic)]

pub mod builder;
pub mod config;
pub mod dial;
mod dispatch;
pub mod draw;
pub mod events;
pub mod geom;
pub mod haptics;
mod layout;

pub use builder::Builder;

use smallvec::SmallVec;

use config::{ButtonId, DialId, Knobs, SecondaryPlacement};
use dial::{Dial, DialBehavior, DialLabel, Touched};
use draw::{Canvas, Theme};
use events::{EventBatch, GestureKind, TouchPoint};
use geom::{Point, Rect};
use haptics::{HapticEffect, HapticSelector};

/// Manages the dial set. This is the main entry point: feed it touch
/// frames, knob changes, and view resizes; it feeds the
/// [`EventStream`](events::EventStream) returned at build time.
pub struct Gamepad {
    pub(crate) sockets: u32,
    pub(crate) placements: Vec<SecondaryPlacement>,
    pub(crate) knobs: Knobs,
    pub(crate) view: [f32; 2],
    pub(crate) origin: [f32; 2],
    pub(crate) prefer_screen_coords: bool,
    pub(crate) theme: Theme,
    /// Index 0 is the primary; secondaries follow in configured order.
    /// This order is also the untracked-finger claiming priority.
    pub(crate) dials: Vec<Dial>,
    pub(crate) selector: HapticSelector,
    pub(crate) events_tx: async_channel::Sender<EventBatch>,
    pub(crate) haptics_tx: Option<async_channel::Sender<HapticEffect>>,
}

impl std::fmt::Debug for Gamepad {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gamepad")
            .field("sockets", &self.sockets)
            .field("view", &self.view)
            .field("knobs", &self.knobs)
            .field("dials", &self.dials.len())
            .finish_non_exhaustive()
    }
}

impl Gamepad {
    /// Process one full multi-touch snapshot: every currently-down finger
    /// with its id and view-local position. Returns whether any dial's
    /// visual state changed and a redraw is warranted.
    ///
    /// Each frame is authoritative full state. Ids appearing without a
    /// prior down, or vanishing without an up, are simply the new truth;
    /// nothing is diffed against the previous frame.
    pub fn touch_frame(&mut self, touches: &[TouchPoint]) -> bool {
        // Dedupe: a frame listing the same pointer twice keeps the first
        // sample. Tolerated, not fatal - next frame self-heals.
        let mut frame: SmallVec<[TouchPoint; 10]> = SmallVec::new();
        for touch in touches {
            if touch.pointer.is_simulated() {
                log::warn!("ignoring touch in the simulated pointer range: {:?}", touch.pointer);
                continue;
            }
            if frame.iter().any(|f| f.pointer == touch.pointer) {
                log::warn!("duplicate pointer {:?} in frame, keeping first", touch.pointer);
                continue;
            }
            frame.push(*touch);
        }

        // Continuity first: fingers already owned stay owned, wherever
        // they've moved.
        let mut owner: SmallVec<[Option<usize>; 10]> = SmallVec::new();
        owner.resize(frame.len(), None);
        for (dial_index, dial) in self.dials.iter().enumerate() {
            for id in dial.tracked_pointers() {
                if let Some(slot) = frame.iter().position(|f| f.pointer == id) {
                    owner[slot] = Some(dial_index);
                }
            }
        }
        // Untracked fingers go to the first dial (configuration order)
        // whose region contains them.
        for (slot, finger) in frame.iter().enumerate() {
            if owner[slot].is_some() {
                continue;
            }
            let p = Point::new(finger.x, finger.y);
            owner[slot] = self
                .dials
                .iter()
                .position(|d| d.accepts_pointers() && d.geometry().bound.contains(p));
            if let Some(claimed) = owner[slot] {
                log::trace!("pointer {:?} claimed by dial #{claimed}", finger.pointer);
            }
        }

        // Invoke every dial with its input set; a dial holding a pointer
        // that vanished must see the empty set to emit its release.
        let mut changed = false;
        let mut batch = EventBatch::new();
        for (dial_index, dial) in self.dials.iter_mut().enumerate() {
            let set: SmallVec<[TouchPoint; 4]> = frame
                .iter()
                .zip(&owner)
                .filter(|(_, o)| **o == Some(dial_index))
                .map(|(f, _)| *f)
                .collect();
            let touched = dial.handle_touch(&set);
            changed |= touched.changed;
            batch.extend(touched.events);
        }

        self.deliver(batch);
        changed
    }

    /// Replace the whole knob set at once and re-layout exactly once.
    pub fn set_knobs(&mut self, knobs: Knobs) {
        self.knobs = knobs.clamped();
        self.relayout();
    }

    #[must_use]
    pub fn knobs(&self) -> &Knobs {
        &self.knobs
    }

    /// The view was resized; recompute every dial's placement.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.view = [width, height];
        self.relayout();
    }

    /// Where the view sits on the screen. Only consulted when the gamepad
    /// was built with
    /// [`prefer_screen_coordinates`](Builder::prefer_screen_coordinates).
    pub fn set_view_origin(&mut self, x: f32, y: f32) {
        self.origin = [x, y];
    }

    /// Forward a platform-classified gesture to a dial. Positions are
    /// dial-relative normalized coordinates, matching what the recognizer
    /// observed.
    pub fn gesture(&mut self, dial: DialId, rel_x: f32, rel_y: f32, kind: GestureKind) {
        self.with_dial(dial, |d| d.gesture(Point::new(rel_x, rel_y), kind));
    }

    /// Inject an analog vector without a real touch, e.g. from a tilt
    /// sensor. Coexists with real fingers; see
    /// [`StickDial`](dial::StickDial).
    pub fn simulate_motion(&mut self, dial: DialId, x: f32, y: f32) {
        self.with_dial(dial, |d| d.simulate_motion(x, y));
    }

    /// Inject a button transition without a real touch.
    pub fn simulate_key(&mut self, dial: DialId, button: ButtonId, pressed: bool) {
        self.with_dial(dial, |d| d.simulate_key(button, pressed));
    }

    /// Drop any injected input on the given dial.
    pub fn clear_simulated(&mut self, dial: DialId) {
        self.with_dial(dial, |d| d.clear_simulated());
    }

    /// Current drawing rectangle of every identified dial, for the
    /// rendering collaborator. Configuration order.
    #[must_use]
    pub fn dial_rects(&self) -> Vec<(DialId, Rect)> {
        self.dials
            .iter()
            .filter_map(|d| Some((d.dial_id()?, self.to_output(d.geometry().rect))))
            .collect()
    }

    /// Accessibility entries: one label and rectangle per identified dial.
    #[must_use]
    pub fn labels(&self) -> Vec<DialLabel> {
        let mut out = Vec::new();
        for dial in &self.dials {
            dial.labels(&mut out);
        }
        for label in &mut out {
            label.rect = self.to_output(label.rect);
        }
        out
    }

    /// Draw every dial back-to-front into the rendering collaborator.
    pub fn draw(&self, canvas: &mut dyn Canvas) {
        for dial in &self.dials {
            dial.draw(canvas, &self.theme);
        }
    }

    fn to_output(&self, rect: Rect) -> Rect {
        if self.prefer_screen_coords {
            rect.translated(Point::new(self.origin[0], self.origin[1]))
        } else {
            rect
        }
    }

    fn with_dial(&mut self, id: DialId, apply: impl FnOnce(&mut Dial) -> Touched) {
        let Some(dial) = self.dials.iter_mut().find(|d| d.dial_id() == Some(id)) else {
            log::warn!("no dial with id {id:?}");
            return;
        };
        let touched = apply(dial);
        self.deliver(touched.events);
    }

    /// Hand a frame's merged batch to the subscriber queue and the haptic
    /// policy. Fire-and-forget on both paths.
    fn deliver(&mut self, batch: EventBatch) {
        if batch.is_empty() {
            return;
        }
        if let Some(effect) = self.selector.select(&batch) {
            if let Some(tx) = &self.haptics_tx {
                // A full or closed haptics queue is silence, never an error.
                let _ = tx.try_send(effect);
            }
        }
        dispatch::send_nonblocking(&self.events_tx, batch);
    }

    pub(crate) fn relayout(&mut self) {
        let layout = layout::compute(self.sockets, &self.placements, &self.knobs, self.view);
        log::debug!(
            "layout: size {:.1}px, center ({:.1}, {:.1}), {} secondary dial(s)",
            layout.size,
            layout.center.x,
            layout.center.y,
            layout.secondary.len()
        );
        self.dials[0].measure(layout.primary.rect, layout.primary.bound);
        for (dial, geometry) in self.dials[1..].iter_mut().zip(&layout.secondary) {
            dial.measure(geometry.rect, geometry.bound);
        }
    }
}
