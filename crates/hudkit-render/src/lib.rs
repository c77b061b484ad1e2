//! Drawing backend contracts for hudkit.
//!
//! hudkit does not render anything itself. This crate defines the boundary
//! it draws through:
//!
//! - [`DrawSurface`]: the texture of one heavyweight widget
//! - [`SurfaceFactory`]: creates those textures on demand
//! - [`CoordinatesConverter`]: the root pixel/HUD/scenegraph mapping
//!
//! It also ships value geometry ([`Point`], [`Size`], [`Rect`], [`Insets`],
//! [`Color`]) and a headless [`RecordingSurface`] backend for tests.
//!
//! # Example
//!
//! ```
//! use hudkit_render::{Color, DrawSurface, Rect, RecordingSurfaceFactory, SurfaceFactory};
//!
//! let factory = RecordingSurfaceFactory::new();
//! let mut backend = factory.clone();
//! let mut surface = backend.create_surface(256, 128)?;
//! surface.fill_rect(Rect::new(0.0, 0.0, 256.0, 24.0), Color::DARK_GRAY);
//! surface.present();
//!
//! assert_eq!(factory.surfaces()[0].present_count(), 1);
//! # Ok::<(), hudkit_render::RenderError>(())
//! ```

mod coords;
mod error;
mod recording;
mod surface;
mod types;

pub use coords::{CoordinatesConverter, ScreenConverter};
pub use error::{RenderError, RenderResult};
pub use recording::{DrawCommand, RecordingHandle, RecordingSurface, RecordingSurfaceFactory, SurfaceLog};
pub use surface::{ClipScope, DrawSurface, ImageId, ScenePlacement, SurfaceFactory};
pub use types::{Color, Insets, Point, Rect, Size};
