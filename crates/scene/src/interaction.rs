//! Marker interaction state machine and outward-facing events.
//!
//! Interaction state is ephemeral and per-marker: it affects scale and label
//! visibility, never business data. The only outward channels are the
//! `EntityClicked` event (at most once per click) and the opaque navigation
//! events.

use bevy::prelude::*;

/// Seconds a marker stays in the click pulse before auto-reverting to idle.
/// Purely a visual affordance.
pub const CLICK_PULSE_SECS: f32 = 0.35;

/// Per-marker interaction state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    Hovered,
    ClickedTransitioning,
}

impl InteractionState {
    pub fn on_pointer_enter(self) -> Self {
        match self {
            InteractionState::Idle => InteractionState::Hovered,
            other => other,
        }
    }

    pub fn on_pointer_leave(self) -> Self {
        match self {
            InteractionState::Hovered => InteractionState::Idle,
            // The click pulse plays out even if the pointer moves away.
            other => other,
        }
    }

    pub fn on_click(self) -> Self {
        match self {
            InteractionState::Hovered => InteractionState::ClickedTransitioning,
            other => other,
        }
    }

    /// Called when the click pulse timer expires.
    pub fn on_pulse_elapsed(self) -> Self {
        match self {
            InteractionState::ClickedTransitioning => InteractionState::Idle,
            other => other,
        }
    }

    pub fn is_enlarged(self) -> bool {
        !matches!(self, InteractionState::Idle)
    }
}

/// Fired when the user clicks a marker. The sole way the marker layer
/// communicates outward; consumers resolve the id against their own store.
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct EntityClicked {
    pub id: String,
}

/// Opaque navigation actions from the UI chrome.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationEvent {
    Back,
    EnterNextView,
}

/// Id of the marker currently under the pointer, if any. Drives the label
/// overlay.
#[derive(Resource, Debug, Default)]
pub struct HoveredEntity(pub Option<String>);
