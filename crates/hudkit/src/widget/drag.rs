//! Pointer dragging.
//!
//! A press on a draggable widget grabs it at the pressed point. While the
//! button is held, every move places the widget so that the grab point
//! stays under the pointer, clamped so that part of the widget always
//! remains inside its parent. Release ends the drag.

use hudkit_core::HudResult;
use hudkit_core::logging::targets;
use hudkit_render::{Point, Rect};
use tracing::debug;

use super::base::{Positioned, Sizable};
use super::hud::Scope;
use super::{Hud, WidgetId};

/// An active drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct DragState {
    pub(crate) widget: WidgetId,
    /// Grab point relative to the widget's location, in its parent space.
    pub(crate) grab_offset: Point,
}

/// Clamp one axis so that `min(min_visible, extent)` stays inside `[low, high]`.
pub(crate) fn clamp_axis(value: f32, extent: f32, low: f32, high: f32, min_visible: f32) -> f32 {
    let keep = min_visible.min(extent).max(0.0);
    let lowest = low - extent + keep;
    let highest = high - keep;
    if lowest > highest {
        (lowest + highest) / 2.0
    } else {
        value.clamp(lowest, highest)
    }
}

impl Hud {
    /// The widget being dragged, if any.
    pub fn dragged_widget(&self) -> Option<WidgetId> {
        self.drag.map(|d| d.widget)
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub(crate) fn start_drag(&mut self, id: WidgetId, pixel: Point) -> HudResult<()> {
        let grab = self.pixels_to_parent_space(id, pixel)?;
        let location = self.node(id)?.base.location();
        self.drag = Some(DragState {
            widget: id,
            grab_offset: grab - location,
        });
        debug!(target: targets::DRAG, widget = ?id, "drag started");
        self.node(id)?.base.drag_started.emit(id);
        Ok(())
    }

    pub(crate) fn drag_to(&mut self, pixel: Point) -> HudResult<()> {
        let Some(drag) = self.drag else {
            return Ok(());
        };
        let pointer = self.pixels_to_parent_space(drag.widget, pixel)?;
        let target = self.clamp_drag_location(drag.widget, pointer - drag.grab_offset)?;
        self.set_location(drag.widget, target)
    }

    /// End the drag normally.
    pub(crate) fn stop_drag(&mut self) -> HudResult<()> {
        let Some(drag) = self.drag.take() else {
            return Ok(());
        };
        debug!(target: targets::DRAG, widget = ?drag.widget, "drag stopped");
        if let Some(node) = self.nodes.get(drag.widget) {
            node.base.drag_stopped.emit(drag.widget);
        }
        Ok(())
    }

    /// Abort the drag because its widget is going away.
    pub(crate) fn cancel_drag(&mut self) -> HudResult<()> {
        let Some(drag) = self.drag.take() else {
            return Ok(());
        };
        debug!(target: targets::DRAG, widget = ?drag.widget, "drag cancelled");
        if let Some(node) = self.nodes.get(drag.widget) {
            node.base.drag_stopped.emit(drag.widget);
        }
        Ok(())
    }

    /// The area a dragged widget is kept inside, in its parent space.
    pub fn drag_bounds(&self, id: WidgetId) -> HudResult<Rect> {
        match self.scope_of(id) {
            Some((container, Scope::Children)) => Ok(Rect::from_origin_size(
                Point::ZERO,
                self.internal_size(container)?,
            )),
            Some((owner, Scope::Assembly)) => Ok(self.node(owner)?.base.bounds()),
            None => Ok(Rect::from_origin_size(Point::ZERO, self.converter.hud_resolution())),
        }
    }

    /// Clamp a proposed location of a dragged widget.
    pub(crate) fn clamp_drag_location(&self, id: WidgetId, location: Point) -> HudResult<Point> {
        let bounds = self.drag_bounds(id)?;
        let size = self.node(id)?.base.size();
        let min_visible = self.config.min_visible_drag_extent;
        Ok(Point::new(
            clamp_axis(location.x, size.width, bounds.left(), bounds.right(), min_visible),
            clamp_axis(location.y, size.height, bounds.top(), bounds.bottom(), min_visible),
        ))
    }
}
