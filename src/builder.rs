//! Builder-style configuration for assembling a [`Gamepad`].
//!
//! All configuration errors surface here, before any layout or touch
//! processing runs. A successfully built gamepad cannot fail at runtime.

use std::collections::HashSet;

use crate::config::{
    ButtonId, DialConfig, DialId, DialKind, HapticMode, Knobs, SecondaryPlacement,
};
use crate::dial::Dial;
use crate::draw::Theme;
use crate::events::EventStream;
use crate::haptics::{self, HapticActuator, HapticSelector};
use crate::{dispatch, Gamepad};

#[derive(thiserror::Error, Debug)]
pub enum BuildError {
    /// The ring needs at least one socket; slot size is `2π / sockets`.
    #[error("socket count must be at least 1")]
    NoSockets,
    /// A placement names a slot index outside `0..sockets`.
    #[error("slot index {index} out of range for {sockets} socket(s)")]
    SlotOutOfRange { index: u32, sockets: u32 },
    /// A placement occupies zero slots.
    #[error("spread must be at least 1")]
    ZeroSpread,
    /// A placement's spread exceeds the whole ring.
    #[error("spread {spread} exceeds {sockets} socket(s)")]
    SpreadTooWide { spread: u32, sockets: u32 },
    /// Two placements occupy at least one slot in common.
    #[error("placements at slots {first} and {second} overlap")]
    OverlappingSlots { first: u32, second: u32 },
    #[error("dial id {0:?} used more than once")]
    DuplicateDial(DialId),
    #[error("button id {0:?} used more than once")]
    DuplicateButton(ButtonId),
    /// The theme has no style for a configured dial kind. Rendering has no
    /// fallback, so this is fatal up front.
    #[error("theme is missing a style for {}", .0.as_ref())]
    MissingStyle(DialKind),
}

/// Pre-construction configuration for a [`Gamepad`].
pub struct Builder {
    sockets: u32,
    primary: DialConfig,
    secondary: Vec<SecondaryPlacement>,
    knobs: Knobs,
    theme: Theme,
    haptic_mode: HapticMode,
    actuator: Option<Box<dyn HapticActuator>>,
    prefer_screen_coords: bool,
    view: [f32; 2],
}

impl Default for Builder {
    fn default() -> Self {
        Self {
            sockets: 8,
            primary: DialConfig::Empty,
            secondary: Vec::new(),
            knobs: Knobs::default(),
            theme: Theme::default(),
            haptic_mode: HapticMode::default(),
            actuator: None,
            prefer_screen_coords: false,
            view: [0.0, 0.0],
        }
    }
}

/// # Configuration
impl Builder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    /// Number of angular slots on the secondary ring. Defaults to 8.
    #[must_use]
    pub fn sockets(mut self, sockets: u32) -> Self {
        self.sockets = sockets;
        self
    }
    /// The center dial. Defaults to [`DialConfig::Empty`].
    #[must_use]
    pub fn primary(mut self, config: DialConfig) -> Self {
        self.primary = config;
        self
    }
    /// Add one secondary dial on the ring, in claiming-priority order:
    /// earlier placements win overlapping touch regions.
    #[must_use]
    pub fn secondary(mut self, placement: SecondaryPlacement) -> Self {
        self.secondary.push(placement);
        self
    }
    /// Initial runtime knobs. Out-of-range values are clamped.
    #[must_use]
    pub fn knobs(mut self, knobs: Knobs) -> Self {
        self.knobs = knobs;
        self
    }
    /// Visual theme. Must carry a style for every configured dial kind.
    #[must_use]
    pub fn theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }
    #[must_use]
    pub fn haptic_mode(mut self, mode: HapticMode) -> Self {
        self.haptic_mode = mode;
        self
    }
    /// The vibration capability. Without one, haptic hints are computed and
    /// discarded.
    #[must_use]
    pub fn actuator(mut self, actuator: Box<dyn HapticActuator>) -> Self {
        self.actuator = Some(actuator);
        self
    }
    /// Report dial rectangles and labels in screen coordinates (offset by
    /// the view origin) instead of view-local ones.
    #[must_use]
    pub fn prefer_screen_coordinates(mut self, prefer: bool) -> Self {
        self.prefer_screen_coords = prefer;
        self
    }
    /// Initial view size, pixels. Can be changed later via
    /// [`Gamepad::resize`].
    #[must_use]
    pub fn view_size(mut self, width: f32, height: f32) -> Self {
        self.view = [width, height];
        self
    }
}

/// # Finishing
impl Builder {
    fn validate(&self) -> Result<(), BuildError> {
        if self.sockets == 0 {
            return Err(BuildError::NoSockets);
        }
        for placement in &self.secondary {
            if placement.spread == 0 {
                return Err(BuildError::ZeroSpread);
            }
            if placement.spread > self.sockets {
                return Err(BuildError::SpreadTooWide {
                    spread: placement.spread,
                    sockets: self.sockets,
                });
            }
            if placement.index >= self.sockets {
                return Err(BuildError::SlotOutOfRange {
                    index: placement.index,
                    sockets: self.sockets,
                });
            }
        }
        // Occupied slot ranges must not intersect, modulo the ring.
        for (i, a) in self.secondary.iter().enumerate() {
            for b in &self.secondary[i + 1..] {
                let occupied =
                    |p: &SecondaryPlacement, slot: u32| (0..p.spread).any(|k| (p.index + k) % self.sockets == slot);
                if (0..self.sockets).any(|slot| occupied(a, slot) && occupied(b, slot)) {
                    return Err(BuildError::OverlappingSlots {
                        first: a.index,
                        second: b.index,
                    });
                }
            }
        }
        // Identity uniqueness, dials and buttons both.
        let configs = std::iter::once(&self.primary).chain(self.secondary.iter().map(|p| &p.config));
        let mut dial_ids = HashSet::new();
        let mut button_ids = HashSet::new();
        for config in configs.clone() {
            if let Some(id) = config.id() {
                if !dial_ids.insert(id) {
                    return Err(BuildError::DuplicateDial(id));
                }
            }
            for button in config.button_ids() {
                if !button_ids.insert(button) {
                    return Err(BuildError::DuplicateButton(button));
                }
            }
        }
        // Every drawn kind needs a style. `Empty` never draws.
        for config in configs {
            let kind = config.kind();
            if kind != DialKind::Empty && self.theme.style(kind).is_none() {
                return Err(BuildError::MissingStyle(kind));
            }
        }
        Ok(())
    }

    /// Validate the configuration and bring the gamepad up, returning it
    /// together with the single subscriber's [`EventStream`].
    #[allow(clippy::missing_errors_doc)]
    pub fn build(self) -> Result<(Gamepad, EventStream), BuildError> {
        self.validate()?;
        let dials: Vec<Dial> = std::iter::once(&self.primary)
            .chain(self.secondary.iter().map(|p| &p.config))
            .map(Dial::from_config)
            .collect();
        let (events_tx, stream) = dispatch::event_channel();
        let haptics_tx = self.actuator.map(haptics::spawn_actuator);
        let mut gamepad = Gamepad {
            sockets: self.sockets,
            placements: self.secondary,
            knobs: self.knobs.clamped(),
            view: self.view,
            origin: [0.0, 0.0],
            prefer_screen_coords: self.prefer_screen_coords,
            theme: self.theme,
            dials,
            selector: HapticSelector::new(self.haptic_mode),
            events_tx,
            haptics_tx,
        };
        gamepad.relayout();
        Ok((gamepad, stream))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ButtonConfig, CrossButtons, CrossConfig};

    fn cross(id: u32, base_button: u32) -> DialConfig {
        DialConfig::Cross(CrossConfig {
            id: DialId(id),
            buttons: CrossButtons {
                right: ButtonId(base_button),
                down: ButtonId(base_button + 1),
                left: ButtonId(base_button + 2),
                up: ButtonId(base_button + 3),
            },
            rotation_deg: 0.0,
            supports_gesture: false,
        })
    }

    fn button(id: u32, button: u32) -> DialConfig {
        DialConfig::Button(ButtonConfig {
            id: DialId(id),
            button: ButtonId(button),
        })
    }

    #[test]
    fn zero_sockets_is_fatal() {
        let err = Builder::new().sockets(0).build().unwrap_err();
        assert!(matches!(err, BuildError::NoSockets));
    }

    #[test]
    fn overlapping_slots_rejected_across_ring_wrap() {
        // Spread 3 starting at slot 6 wraps onto slot 0.
        let err = Builder::new()
            .secondary(SecondaryPlacement {
                spread: 3,
                ..SecondaryPlacement::at(6, button(1, 1))
            })
            .secondary(SecondaryPlacement::at(0, button(2, 2)))
            .build()
            .unwrap_err();
        assert!(matches!(err, BuildError::OverlappingSlots { .. }));
    }

    #[test]
    fn duplicate_ids_rejected() {
        let err = Builder::new()
            .primary(cross(1, 10))
            .secondary(SecondaryPlacement::at(0, button(1, 20)))
            .build()
            .unwrap_err();
        assert!(matches!(err, BuildError::DuplicateDial(DialId(1))));

        let err = Builder::new()
            .primary(cross(1, 10))
            .secondary(SecondaryPlacement::at(0, button(2, 10)))
            .build()
            .unwrap_err();
        assert!(matches!(err, BuildError::DuplicateButton(ButtonId(10))));
    }

    #[test]
    fn missing_style_is_fatal() {
        let err = Builder::new()
            .primary(cross(1, 10))
            .theme(Theme::empty())
            .build()
            .unwrap_err();
        assert!(matches!(err, BuildError::MissingStyle(DialKind::Cross)));
    }

    #[test]
    fn empty_primary_needs_no_style() {
        // An all-empty configuration builds fine with an empty theme.
        assert!(Builder::new().theme(Theme::empty()).build().is_ok());
    }

    #[test]
    fn built_gamepad_is_debuggable() {
        let (pad, _stream) = Builder::new().theme(Theme::empty()).build().unwrap();
        assert!(format!("{pad:?}").starts_with("Gamepad"));
    }
}
