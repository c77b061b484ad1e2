//! hudkit - A retained-mode HUD widget toolkit for 3D scenegraph engines.
//!
//! This is the main crate: it owns the widget tree and re-exports the
//! public APIs of `hudkit-core` and `hudkit-render`.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//!
//! use hudkit::{Hud, UiConfig};
//! use hudkit::render::{Point, RecordingSurfaceFactory, ScreenConverter, Size};
//!
//! let surfaces = RecordingSurfaceFactory::new();
//! let mut hud = Hud::new(
//!     ScreenConverter::new(Size::new(1280.0, 720.0)),
//!     surfaces.clone(),
//!     UiConfig::default(),
//! );
//! let window = hud.create_window("Inventory", Point::new(40.0, 40.0), Size::new(300.0, 200.0), true)?;
//! hud.add_widget(hud.root(), window)?;
//!
//! // A new surface is drawn one redraw interval after a frame first sees it.
//! assert_eq!(hud.render_frame(Duration::ZERO)?.redrawn, 0);
//! let stats = hud.render_frame(Duration::from_millis(20))?;
//! assert_eq!(stats.redrawn, 1);
//! assert_eq!(surfaces.surface_count(), 1);
//! # Ok::<(), hudkit::HudError>(())
//! ```

pub mod config;
pub mod prelude;
pub mod widget;

pub use hudkit_core::*;

pub use config::UiConfig;
pub use widget::*;

/// Drawable surface and coordinate conversion contracts.
pub mod render {
    pub use hudkit_render::*;
}
