//! Prelude module for hudkit.
//!
//! This module re-exports the most commonly used types for convenient importing:
//!
//! ```
//! use hudkit::prelude::*;
//! ```
//!
//! This provides access to:
//! - The widget arena (`Hud`, `WidgetBuilder`, `WidgetId`)
//! - Widget hooks (`WidgetContent`, `PaintContext`)
//! - Input events and key bindings
//! - Geometry types (`Point`, `Size`, `Rect`, `Color`)

// ============================================================================
// Errors and Signals
// ============================================================================

pub use crate::{HudError, HudResult, Signal};

// ============================================================================
// Widget Foundation
// ============================================================================

pub use crate::config::UiConfig;
pub use crate::widget::{
    Background, BackgroundSettable, Border, Container, Hud, PaintContext, Pickable, Positioned,
    Sizable, WidgetBase, WidgetBuilder, WidgetContent, WidgetId,
};

// ============================================================================
// Composite Widgets
// ============================================================================

pub use crate::widget::{AbstractList, ListModel, VecListModel, WindowData};

// ============================================================================
// Input
// ============================================================================

pub use crate::widget::{
    ControllerEvent, Key, KeyBinding, KeyEvent, KeyboardModifiers, MouseButton, MouseEvent,
    PickReason,
};

// ============================================================================
// Geometry and Backends
// ============================================================================

pub use hudkit_render::{
    Color, CoordinatesConverter, DrawSurface, Insets, Point, Rect, Size, SurfaceFactory,
};
