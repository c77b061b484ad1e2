//! Widget system for hudkit.
//!
//! This module provides the HUD widget tree:
//!
//! - [`Hud`]: The arena owning every widget, its root and its surfaces
//! - [`WidgetBase`]: Common per-widget state (geometry, flags, signals)
//! - [`WidgetContent`]: Behaviour hooks a widget can override
//! - Containers, assemblers, windows and lists built on top of them
//!
//! # Overview
//!
//! Widgets are addressed by [`WidgetId`] and created through a
//! [`WidgetBuilder`]. A widget is either *lightweight*, drawn into the
//! surface of its nearest heavyweight ancestor, or *heavyweight*, owning a
//! drawable surface placed directly in the 3D scenegraph.
//!
//! Containers hold children in their own internal coordinate space.
//! Assemblers hold the sub-widgets that make up a composite widget, sharing
//! the owner's parent space.
//!
//! # Creating a Widget
//!
//! ```
//! use hudkit::{Hud, UiConfig, WidgetBuilder, WidgetContent, PaintContext, WidgetId};
//! use hudkit_render::{Color, RecordingSurfaceFactory, ScreenConverter, Size};
//!
//! struct Swatch(Color);
//!
//! impl WidgetContent for Swatch {
//!     fn paint(&self, _hud: &Hud, _id: WidgetId, ctx: &mut PaintContext<'_>) {
//!         ctx.fill_rect(ctx.rect(), self.0);
//!     }
//! }
//!
//! let mut hud = Hud::new(
//!     ScreenConverter::new(Size::new(800.0, 600.0)),
//!     RecordingSurfaceFactory::new(),
//!     UiConfig::default(),
//! );
//! let panel = hud.create_widget(WidgetBuilder::new("panel").heavyweight().container().size(200.0, 100.0));
//! let swatch = hud.create_widget(WidgetBuilder::new("swatch").size(20.0, 20.0).content(Swatch(Color::RED)));
//! hud.add_widget(hud.root(), panel)?;
//! hud.add_widget(panel, swatch)?;
//! # Ok::<(), hudkit::HudError>(())
//! ```

mod assembler;
mod base;
mod container;
mod coords;
mod drag;
mod draw;
mod events;
mod focus;
mod hud;
mod layout;
mod list;
mod pick;
mod redraw;
mod traits;
mod window;
mod zorder;

#[cfg(test)]
mod tests;

slotmap::new_key_type! {
    /// Handle of a widget in a [`Hud`].
    pub struct WidgetId;
}

pub use assembler::WidgetAssembler;
pub use base::{Background, BackgroundSettable, Border, Pickable, Positioned, Sizable, WidgetBase};
pub use container::{Container, ContainerData};
pub use draw::FrameStats;
pub use events::{
    ControllerEvent, Key, KeyBinding, KeyEvent, KeyboardModifiers, MouseButton, MouseEvent,
    PickReason,
};
pub use hud::{Hud, WidgetBuilder};
pub use layout::{LayoutItem, LayoutManager, NullLayout};
pub use list::{AbstractList, ListItemContent, ListModel, VecListModel};
pub use pick::PickResult;
pub use redraw::RedrawScheduler;
pub use traits::{PaintContext, WidgetContent};
pub use window::{CloseButtonContent, HeaderContent, WindowData};
pub use zorder::ZIndexPath;
