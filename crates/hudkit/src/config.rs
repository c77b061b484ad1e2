//! UI configuration.
//!
//! [`UiConfig`] carries the defaults every widget in a [`Hud`](crate::Hud)
//! starts from. It is handed to the HUD at construction and can be loaded
//! from TOML; missing fields take their defaults.
//!
//! ```
//! use hudkit::UiConfig;
//!
//! let config = UiConfig::from_toml_str(r#"
//!     min_redraw_interval_ms = 50
//!     focus_on_press = false
//! "#)?;
//! assert_eq!(config.min_redraw_interval().as_millis(), 50);
//! assert_eq!(config.min_visible_drag_extent, 8.0);
//! # Ok::<(), hudkit::HudError>(())
//! ```

use std::time::Duration;

use hudkit_core::{HudError, HudResult};
use serde::{Deserialize, Serialize};

use crate::widget::{Key, KeyBinding, KeyboardModifiers};

/// Default minimum time between two redraws of one heavyweight widget.
pub const DEFAULT_MIN_REDRAW_INTERVAL_MS: u64 = 20;

/// Toolkit-wide defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Minimum redraw interval, in milliseconds, given to new heavyweight widgets.
    pub min_redraw_interval_ms: u64,
    /// Whether a button press moves focus to the pressed widget.
    pub focus_on_press: bool,
    /// Key that moves focus to the next focusable sibling.
    pub focus_next: KeyBinding,
    /// Key that moves focus to the previous focusable sibling.
    pub focus_previous: KeyBinding,
    /// Extent, in parent HUD units, of a dragged widget that always stays
    /// inside its parent.
    pub min_visible_drag_extent: f32,
    /// Whether new containers test their assembled widgets when picked.
    pub dispatched_picking: bool,
    /// Height of a window header, in the window's parent HUD units.
    pub window_header_height: f32,
    /// Height of one row in a list, in the list's parent HUD units.
    pub list_item_height: f32,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            min_redraw_interval_ms: DEFAULT_MIN_REDRAW_INTERVAL_MS,
            focus_on_press: true,
            focus_next: KeyBinding::new(Key::Tab, KeyboardModifiers::NONE),
            focus_previous: KeyBinding::new(Key::Tab, KeyboardModifiers::SHIFT),
            min_visible_drag_extent: 8.0,
            dispatched_picking: false,
            window_header_height: 24.0,
            list_item_height: 20.0,
        }
    }
}

impl UiConfig {
    /// Parse a configuration from TOML.
    pub fn from_toml_str(source: &str) -> HudResult<Self> {
        toml::from_str(source).map_err(|e| HudError::Config(e.to_string()))
    }

    /// Serialize the configuration to TOML.
    pub fn to_toml_string(&self) -> HudResult<String> {
        toml::to_string(self).map_err(|e| HudError::Config(e.to_string()))
    }

    /// The default minimum redraw interval.
    pub fn min_redraw_interval(&self) -> Duration {
        Duration::from_millis(self.min_redraw_interval_ms)
    }
}
