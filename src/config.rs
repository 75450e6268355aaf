//! # Configuration model
//!
//! Everything here is plain, inert data supplied once at construction time.
//! A [`crate::Builder`] validates it and turns it into live dials; changing
//! the arrangement afterwards means building a new [`crate::Gamepad`].
//!
//! The only mutable piece is [`Knobs`] - user-adjustable placement
//! parameters that may change at runtime and trigger a re-layout, updated
//! atomically through [`crate::Gamepad::set_knobs`] rather than one field at
//! a time.

use smallvec::SmallVec;

/// Caller-assigned identity of one dial. Carried on every event the dial
/// emits so the consumer can tell sources apart.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub struct DialId(pub u32);

/// Caller-assigned identity of one logical button. Unique across the whole
/// gamepad, not per dial.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub struct ButtonId(pub u32);

/// The closed set of dial kinds. Used for theme lookup and diagnostics;
/// the per-kind parameters live in [`DialConfig`].
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, strum::AsRefStr, strum::EnumIter)]
pub enum DialKind {
    Cross,
    Stick,
    PrimaryButtons,
    Button,
    DoubleButton,
    Empty,
}

/// Button ids for the four cardinal directions of a [`Cross`](DialConfig::Cross) pad.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CrossButtons {
    pub right: ButtonId,
    pub down: ButtonId,
    pub left: ButtonId,
    pub up: ButtonId,
}

/// An 8-way directional pad.
#[derive(Clone, Debug, PartialEq)]
pub struct CrossConfig {
    pub id: DialId,
    pub buttons: CrossButtons,
    /// Rotates the whole pad, degrees clockwise. Sector boundaries rotate
    /// with it.
    pub rotation_deg: f32,
    /// Whether platform-recognized gestures on this pad are forwarded as
    /// [`Gesture`](crate::events::Event::Gesture) events.
    pub supports_gesture: bool,
}

/// An analog stick.
#[derive(Clone, Debug, PartialEq)]
pub struct StickConfig {
    pub id: DialId,
    /// Click ("press-in") button, if the stick has one. Driven by tap
    /// gestures and [`crate::Gamepad::simulate_key`].
    pub button: Option<ButtonId>,
    /// Radius below which output snaps to `(0, 0)`. `0.0` disables it.
    pub dead_zone: f32,
    pub supports_gesture: bool,
}

/// A cluster of sub-buttons arranged inside the primary circle.
#[derive(Clone, Debug, PartialEq)]
pub struct PrimaryButtonsConfig {
    pub id: DialId,
    /// One id per sub-button. A single entry is drawn centered, more are
    /// arranged on an inner ring.
    pub buttons: Vec<ButtonId>,
    /// When set, each finger presses only the first sub-button containing
    /// it. When unset, one finger may hold several overlapping sub-buttons
    /// at once.
    pub exclusive: bool,
}

/// A plain press/release button covering its whole region.
#[derive(Clone, Debug, PartialEq)]
pub struct ButtonConfig {
    pub id: DialId,
    pub button: ButtonId,
}

/// A circular region split into two independently-pressable angular halves.
#[derive(Clone, Debug, PartialEq)]
pub struct DoubleButtonConfig {
    pub id: DialId,
    /// `buttons[0]` is the half starting at `rotation_deg`, `buttons[1]` the
    /// opposite one.
    pub buttons: [ButtonId; 2],
    pub rotation_deg: f32,
}

/// What a socket holds. One per primary slot and per configured secondary
/// placement.
#[derive(Clone, Debug, PartialEq)]
pub enum DialConfig {
    Cross(CrossConfig),
    Stick(StickConfig),
    PrimaryButtons(PrimaryButtonsConfig),
    Button(ButtonConfig),
    DoubleButton(DoubleButtonConfig),
    /// Occupies its slots for spacing purposes but never tracks fingers,
    /// never emits, never draws.
    Empty,
}

impl DialConfig {
    #[must_use]
    pub fn kind(&self) -> DialKind {
        match self {
            DialConfig::Cross(_) => DialKind::Cross,
            DialConfig::Stick(_) => DialKind::Stick,
            DialConfig::PrimaryButtons(_) => DialKind::PrimaryButtons,
            DialConfig::Button(_) => DialKind::Button,
            DialConfig::DoubleButton(_) => DialKind::DoubleButton,
            DialConfig::Empty => DialKind::Empty,
        }
    }
    /// The dial's identity, if it has one. `Empty` dials are anonymous.
    #[must_use]
    pub fn id(&self) -> Option<DialId> {
        match self {
            DialConfig::Cross(c) => Some(c.id),
            DialConfig::Stick(c) => Some(c.id),
            DialConfig::PrimaryButtons(c) => Some(c.id),
            DialConfig::Button(c) => Some(c.id),
            DialConfig::DoubleButton(c) => Some(c.id),
            DialConfig::Empty => None,
        }
    }
    /// Every button id this dial can emit, for uniqueness validation.
    #[must_use]
    pub fn button_ids(&self) -> SmallVec<[ButtonId; 4]> {
        match self {
            DialConfig::Cross(c) => {
                SmallVec::from_slice(&[c.buttons.right, c.buttons.down, c.buttons.left, c.buttons.up])
            }
            DialConfig::Stick(c) => c.button.into_iter().collect(),
            DialConfig::PrimaryButtons(c) => c.buttons.iter().copied().collect(),
            DialConfig::Button(c) => SmallVec::from_slice(&[c.button]),
            DialConfig::DoubleButton(c) => SmallVec::from_slice(&c.buttons),
            DialConfig::Empty => SmallVec::new(),
        }
    }
}

/// How a secondary placement reacts to the global
/// [ring rotation knob](Knobs::rotation_deg).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum RotationRule {
    /// Rotate with the ring.
    #[default]
    Follow,
    /// Stay put regardless of the knob.
    Ignore,
    /// Rotate with the ring, offset by a fixed number of degrees.
    Offset(f32),
}

impl RotationRule {
    /// Effective rotation for this placement, in degrees.
    #[must_use]
    pub fn apply(self, global_deg: f32) -> f32 {
        match self {
            RotationRule::Follow => global_deg,
            RotationRule::Ignore => 0.0,
            RotationRule::Offset(extra) => global_deg + extra,
        }
    }
}

/// Where and how one secondary dial sits on the ring.
#[derive(Clone, Debug, PartialEq)]
pub struct SecondaryPlacement {
    /// Angular slot, `0..sockets`, counted clockwise from the positive X axis.
    pub index: u32,
    /// Contiguous slots occupied, at least 1.
    pub spread: u32,
    /// Size relative to the primary: `1.0` gives the dial half the primary's
    /// radius.
    pub scale: f32,
    /// Extra radial gap in primary-radius units, added on top of the global
    /// [`Knobs::spacing`].
    pub spacing_extra: f32,
    pub rotation: RotationRule,
    /// When set, the layout reserves room for this dial at *every* slot it
    /// could rotate into, so no rotation value can push it off-screen.
    pub avoid_clipping: bool,
    pub config: DialConfig,
}

impl SecondaryPlacement {
    /// A placement with neutral sizing at the given slot.
    #[must_use]
    pub fn at(index: u32, config: DialConfig) -> Self {
        Self {
            index,
            spread: 1,
            scale: 1.0,
            spacing_extra: 0.0,
            rotation: RotationRule::Follow,
            avoid_clipping: false,
            config,
        }
    }
}

/// User-adjustable placement parameters.
///
/// These may change while the gamepad is live; feed a whole updated set to
/// [`crate::Gamepad::set_knobs`], which clamps out-of-range values and
/// schedules exactly one re-layout.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Knobs {
    /// Placement bias within the unused view area, each axis in `[-1, 1]`.
    /// `[-1, -1]` hugs the top-left, `[0, 0]` centers, `[1, 1]` the
    /// bottom-right.
    pub gravity: [f32; 2],
    /// Additional pixel displacement, applied after gravity and clamped so
    /// no dial crops outside the view.
    pub offset: [f32; 2],
    /// Cap on the primary dial's diameter, pixels.
    pub max_diameter: f32,
    /// Rotation of the secondary ring, degrees clockwise.
    pub rotation_deg: f32,
    /// Radial gap between the primary and the ring, `[0, 1]` in
    /// primary-radius halves.
    pub spacing: f32,
    /// Spacing from the view edges, pixels: left, top, right, bottom.
    pub edges: [f32; 4],
}

impl Default for Knobs {
    fn default() -> Self {
        Self {
            gravity: [0.0, 0.0],
            offset: [0.0, 0.0],
            max_diameter: f32::INFINITY,
            rotation_deg: 0.0,
            spacing: 0.2,
            edges: [0.0; 4],
        }
    }
}

impl Knobs {
    /// Bring every field into its documented range.
    pub(crate) fn clamped(mut self) -> Self {
        self.gravity[0] = self.gravity[0].clamp(-1.0, 1.0);
        self.gravity[1] = self.gravity[1].clamp(-1.0, 1.0);
        self.spacing = self.spacing.clamp(0.0, 1.0);
        self.max_diameter = self.max_diameter.max(0.0);
        for edge in &mut self.edges {
            *edge = edge.max(0.0);
        }
        self
    }
}

/// When, if ever, state transitions trigger the haptic actuator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, strum::AsRefStr, strum::EnumIter)]
pub enum HapticMode {
    /// Never fire.
    Off,
    /// Fire on activating transitions only (presses, non-neutral directions).
    #[default]
    Press,
    /// Fire on activating and deactivating transitions.
    PressAndRelease,
}
