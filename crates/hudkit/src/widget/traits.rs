//! Widget behaviour hooks.
//!
//! A widget's data lives in its [`WidgetBase`](super::WidgetBase); what it
//! *does* lives in an optional boxed [`WidgetContent`]. The HUD calls the
//! hooks with itself and the widget's id, so a hook can freely mutate the
//! tree, including its own node.
//!
//! # Key Types
//!
//! - [`WidgetContent`] - Behaviour hooks of one widget
//! - [`PaintContext`] - Drawing target passed to [`WidgetContent::paint`]

use std::any::Any;

use hudkit_core::HudResult;
use hudkit_render::{Color, DrawSurface, ImageId, Point, Rect, Size};

use super::events::{ControllerEvent, KeyEvent, MouseEvent};
use super::{Hud, WidgetId};

/// Context provided while drawing a widget's content.
///
/// All rectangles passed in are in the widget's local HUD space; the
/// context maps them onto the host surface.
pub struct PaintContext<'a> {
    surface: &'a mut dyn DrawSurface,
    /// Surface pixel of the widget's local origin.
    origin: Point,
    /// Surface pixels per local unit.
    scale: (f32, f32),
    /// The widget's local rectangle (origin always 0,0).
    widget_rect: Rect,
    show_focus: bool,
}

impl<'a> PaintContext<'a> {
    pub(crate) fn new(
        surface: &'a mut dyn DrawSurface,
        origin: Point,
        scale: (f32, f32),
        size: Size,
        show_focus: bool,
    ) -> Self {
        Self {
            surface,
            origin,
            scale,
            widget_rect: Rect::from_origin_size(Point::ZERO, size),
            show_focus,
        }
    }

    /// Whether the widget currently ends the focus chain.
    #[inline]
    pub fn should_show_focus(&self) -> bool {
        self.show_focus
    }

    /// Get the widget's local rectangle.
    #[inline]
    pub fn rect(&self) -> Rect {
        self.widget_rect
    }

    /// Get the widget's size.
    #[inline]
    pub fn size(&self) -> Size {
        self.widget_rect.size
    }

    /// Map a local point to surface pixels.
    #[inline]
    pub fn to_surface(&self, local: Point) -> Point {
        self.origin + local.scale(self.scale.0, self.scale.1)
    }

    /// Map a local rectangle to surface pixels.
    pub fn to_surface_rect(&self, local: Rect) -> Rect {
        Rect::from_origin_size(
            self.to_surface(local.origin),
            local.size.scale(self.scale.0, self.scale.1),
        )
    }

    /// Fill a local rectangle.
    pub fn fill_rect(&mut self, local: Rect, color: Color) {
        let rect = self.to_surface_rect(local);
        self.surface.fill_rect(rect, color);
    }

    /// Draw a backend image into a local rectangle.
    pub fn draw_image(&mut self, image: ImageId, local: Rect) {
        let rect = self.to_surface_rect(local);
        self.surface.draw_image(image, rect);
    }

    /// Draw text with its top-left at a local point.
    pub fn draw_text(&mut self, text: &str, local: Point, color: Color) {
        let origin = self.to_surface(local);
        self.surface.draw_text(text, origin, color);
    }

    /// The raw surface, for drawing in surface pixels.
    pub fn surface(&mut self) -> &mut dyn DrawSurface {
        &mut *self.surface
    }
}

/// Behaviour hooks of a widget.
///
/// Every hook has a default that does nothing, so an implementation only
/// overrides what it needs. Hooks that receive `&mut Hud` run with the
/// content temporarily taken out of its node; looking up the widget's own
/// content from inside a hook finds nothing.
///
/// `init_size`, `create_shape` and `init` run exactly once, in that order,
/// on the first attach to a HUD root.
pub trait WidgetContent: Any {
    /// Establish the initial size.
    fn init_size(&mut self, hud: &mut Hud, id: WidgetId) -> HudResult<()> {
        let _ = (hud, id);
        Ok(())
    }

    /// Build assembled sub-widgets.
    fn create_shape(&mut self, hud: &mut Hud, id: WidgetId) -> HudResult<()> {
        let _ = (hud, id);
        Ok(())
    }

    /// Final one-time setup once the shape exists.
    fn init(&mut self, hud: &mut Hud, id: WidgetId) -> HudResult<()> {
        let _ = (hud, id);
        Ok(())
    }

    /// Per-frame state update, called before any draw pass.
    fn update(&mut self, hud: &mut Hud, id: WidgetId, now: std::time::Duration) -> HudResult<()> {
        let _ = (hud, id, now);
        Ok(())
    }

    /// Draw the main content, between the background and any children.
    fn paint(&self, hud: &Hud, id: WidgetId, ctx: &mut PaintContext<'_>) {
        let _ = (hud, id, ctx);
    }

    /// A pick ended on this widget.
    fn mouse_event(&mut self, hud: &mut Hud, id: WidgetId, event: &MouseEvent) -> HudResult<()> {
        let _ = (hud, id, event);
        Ok(())
    }

    /// A keyboard event reached the end of the focus chain.
    fn key_event(&mut self, hud: &mut Hud, id: WidgetId, event: &KeyEvent) -> HudResult<()> {
        let _ = (hud, id, event);
        Ok(())
    }

    /// A controller event reached the end of the focus chain.
    fn controller_event(
        &mut self,
        hud: &mut Hud,
        id: WidgetId,
        event: &ControllerEvent,
    ) -> HudResult<()> {
        let _ = (hud, id, event);
        Ok(())
    }

    /// Whether a press at `local` may start dragging this widget.
    fn can_start_drag(&self, hud: &Hud, id: WidgetId, local: Point) -> bool {
        let _ = (hud, id, local);
        true
    }
}
