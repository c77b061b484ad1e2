//! Input event types delivered to widget hooks.
//!
//! Every event carries the physical timestamp supplied by the input source.
//! Mouse events additionally carry the pointer position, both in canvas
//! pixels and in the receiving widget's local HUD space.

use std::time::Duration;

use hudkit_render::Point;
use serde::{Deserialize, Serialize};

/// Keyboard modifiers that may be held during input events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyboardModifiers {
    /// The Shift key is held.
    pub shift: bool,
    /// The Control key is held.
    pub control: bool,
    /// The Alt key is held.
    pub alt: bool,
    /// The Meta/Super key is held.
    pub meta: bool,
}

impl KeyboardModifiers {
    /// No modifiers pressed.
    pub const NONE: Self = Self {
        shift: false,
        control: false,
        alt: false,
        meta: false,
    };

    /// Shift modifier only.
    pub const SHIFT: Self = Self {
        shift: true,
        control: false,
        alt: false,
        meta: false,
    };

    /// Control modifier only.
    pub const CTRL: Self = Self {
        shift: false,
        control: true,
        alt: false,
        meta: false,
    };

    /// Check if any modifier is pressed.
    pub fn any(&self) -> bool {
        self.shift || self.control || self.alt || self.meta
    }
}

/// Mouse buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MouseButton {
    /// Primary button (usually left).
    Left = 0,
    /// Secondary button (usually right).
    Right = 1,
    /// Middle button (scroll wheel click).
    Middle = 2,
}

/// Why a pick was issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PickReason {
    /// A mouse button went down.
    ButtonPressed,
    /// A mouse button went up.
    ButtonReleased,
    /// The pointer moved.
    Moved,
    /// The wheel turned away from the user.
    WheelUp {
        /// Scroll by a page instead of a line.
        page_move: bool,
    },
    /// The wheel turned towards the user.
    WheelDown {
        /// Scroll by a page instead of a line.
        page_move: bool,
    },
}

impl PickReason {
    /// Whether this reason involves a mouse button, which unclickable widgets ignore.
    pub fn is_button(&self) -> bool {
        matches!(self, PickReason::ButtonPressed | PickReason::ButtonReleased)
    }
}

/// A mouse event delivered to the deepest picked widget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseEvent {
    /// Why the pick happened.
    pub reason: PickReason,
    /// The button involved, if any.
    pub button: Option<MouseButton>,
    /// Pointer position in the widget's local HUD space.
    pub local_pos: Point,
    /// Pointer position in canvas pixels.
    pub pixel_pos: Point,
    /// Physical timestamp of the input.
    pub timestamp: Duration,
}

/// Keyboard keys.
///
/// Only the keys hudkit itself binds or that HUD widgets commonly react to
/// are named; everything else arrives as [`Key::Unknown`] with the platform
/// scan code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    // Letters
    A, B, C, D, E, F, G, H, I, J, K, L, M,
    N, O, P, Q, R, S, T, U, V, W, X, Y, Z,

    // Numbers (main keyboard)
    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    // Navigation
    ArrowUp, ArrowDown, ArrowLeft, ArrowRight,
    Home, End, PageUp, PageDown,

    // Editing
    Backspace, Delete, Enter, Tab, Space, Escape,

    // Unknown/unmapped key
    Unknown(u16),
}

impl Key {
    /// Check if this is a navigation key.
    pub fn is_navigation(&self) -> bool {
        matches!(
            self,
            Key::ArrowUp
                | Key::ArrowDown
                | Key::ArrowLeft
                | Key::ArrowRight
                | Key::Home
                | Key::End
                | Key::PageUp
                | Key::PageDown
        )
    }
}

/// A key together with the modifiers that must be held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyBinding {
    pub key: Key,
    #[serde(default)]
    pub modifiers: KeyboardModifiers,
}

impl KeyBinding {
    /// Create a binding.
    pub const fn new(key: Key, modifiers: KeyboardModifiers) -> Self {
        Self { key, modifiers }
    }

    /// Whether a key press matches this binding exactly.
    pub fn matches(&self, key: Key, modifiers: KeyboardModifiers) -> bool {
        self.key == key && self.modifiers == modifiers
    }
}

/// A keyboard event delivered to the end of the focus chain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeyEvent {
    /// A key went down (or auto-repeated).
    Pressed {
        key: Key,
        modifiers: KeyboardModifiers,
        timestamp: Duration,
    },
    /// A key went up.
    Released {
        key: Key,
        modifiers: KeyboardModifiers,
        timestamp: Duration,
    },
    /// A character was produced.
    Typed {
        character: char,
        modifiers: KeyboardModifiers,
        timestamp: Duration,
    },
}

impl KeyEvent {
    /// The physical timestamp of the event.
    pub fn timestamp(&self) -> Duration {
        match self {
            KeyEvent::Pressed { timestamp, .. }
            | KeyEvent::Released { timestamp, .. }
            | KeyEvent::Typed { timestamp, .. } => *timestamp,
        }
    }
}

/// A game controller event delivered to the end of the focus chain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControllerEvent {
    /// A controller button went down.
    ButtonPressed { button: u32, timestamp: Duration },
    /// A controller button went up.
    ButtonReleased { button: u32, timestamp: Duration },
    /// An analog axis moved.
    AxisChanged {
        axis: u32,
        value: f32,
        timestamp: Duration,
    },
}
