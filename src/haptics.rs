//! # Haptic policy
//!
//! Decides *whether* a frame's event batch deserves a physical pulse, and
//! hands the decision to a caller-supplied actuator on its own worker
//! thread. The selector owns the policy (which transitions count under the
//! configured [`HapticMode`]); the actuator owns nothing but the physical
//! effect.
//!
//! Failure anywhere on this path degrades to silence. A missing platform
//! capability, a slow actuator, a full queue - none of it may ever reach the
//! input-processing thread.

use crate::config::HapticMode;
use crate::events::Event;

/// The effect classes an actuator may be asked to play.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::AsRefStr)]
pub enum HapticEffect {
    /// An activating transition: a press, or a direction leaving neutral.
    Press,
    /// A deactivating transition.
    Release,
}

/// The vibration capability, implemented by the platform collaborator.
///
/// Runs on a dedicated worker thread; implementations that find the
/// capability unsupported should simply do nothing.
pub trait HapticActuator: Send + 'static {
    fn play(&mut self, effect: HapticEffect);
}

/// Maps one frame's merged batch to at most one effect.
#[derive(Clone, Copy, Debug)]
pub(crate) struct HapticSelector {
    mode: HapticMode,
}

impl HapticSelector {
    pub(crate) fn new(mode: HapticMode) -> Self {
        Self { mode }
    }

    /// At most one pulse per frame: an activating hinted event wins over a
    /// deactivating one when both occur.
    pub(crate) fn select(&self, batch: &[Event]) -> Option<HapticEffect> {
        if self.mode == HapticMode::Off {
            return None;
        }
        let mut press = false;
        let mut release = false;
        for event in batch {
            if !event.haptic_hint() {
                continue;
            }
            if event.is_activating() {
                press = true;
            } else {
                release = true;
            }
        }
        match self.mode {
            HapticMode::Off => None,
            HapticMode::Press => press.then_some(HapticEffect::Press),
            HapticMode::PressAndRelease => {
                if press {
                    Some(HapticEffect::Press)
                } else if release {
                    Some(HapticEffect::Release)
                } else {
                    None
                }
            }
        }
    }
}

/// Depth of the actuator queue. Pulses arrive at most once per input frame;
/// anything the worker can't keep up with is better dropped than queued.
const HAPTIC_QUEUE_DEPTH: usize = 8;

/// Move the actuator onto its worker thread. The returned sender is the only
/// handle; dropping it shuts the worker down.
pub(crate) fn spawn_actuator(
    mut actuator: Box<dyn HapticActuator>,
) -> async_channel::Sender<HapticEffect> {
    let (tx, rx) = async_channel::bounded::<HapticEffect>(HAPTIC_QUEUE_DEPTH);
    std::thread::Builder::new()
        .name("radialpad-haptics".into())
        .spawn(move || {
            while let Ok(effect) = rx.recv_blocking() {
                actuator.play(effect);
            }
            log::debug!("haptic worker shutting down");
        })
        // Spawn failure degrades to no haptics; the sender just sees a
        // closed channel.
        .map_err(|e| log::warn!("could not start haptic worker: {e}"))
        .ok();
    tx
}
