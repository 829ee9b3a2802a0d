//! Discrete key-press events and their key bindings.

use winit::keyboard::KeyCode;

use crate::wave::WaveTrigger;

/// Edge-triggered action requested by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    ToggleRenderMode,
    BumpWave(WaveTrigger),
}

impl InputEvent {
    /// Map a pressed key to its action
    ///
    /// Space toggles solid/wireframe; A, F, S, O bump amplitude, frequency,
    /// speed and offset.
    pub fn from_key(key: KeyCode) -> Option<Self> {
        match key {
            KeyCode::Space => Some(Self::ToggleRenderMode),
            KeyCode::KeyA => Some(Self::BumpWave(WaveTrigger::Amplitude)),
            KeyCode::KeyF => Some(Self::BumpWave(WaveTrigger::Frequency)),
            KeyCode::KeyS => Some(Self::BumpWave(WaveTrigger::Speed)),
            KeyCode::KeyO => Some(Self::BumpWave(WaveTrigger::Offset)),
            _ => None,
        }
    }
}
