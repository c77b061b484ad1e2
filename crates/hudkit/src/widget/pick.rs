//! Pointer picking.
//!
//! A pick resolves a canvas pixel to the deepest widget under it and then
//! acts on the result:
//!
//! 1. an active drag follows the pointer, or ends on release;
//! 2. the hit path is found by testing widgets topmost first;
//! 3. hover state is moved onto the new path, exits before enters;
//! 4. a button press moves focus and may start a drag;
//! 5. the deepest hit receives the `mouse_event` hook.

use std::time::Duration;

use hudkit_core::HudResult;
use hudkit_core::logging::targets;
use hudkit_render::Point;
use tracing::trace;

use super::base::Pickable;
use super::events::{MouseButton, MouseEvent, PickReason};
use super::hud::Scope;
use super::{Hud, WidgetId};

/// The deepest widget under a picked pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickResult {
    pub widget: WidgetId,
    /// The picked pixel in the widget's local space.
    pub local_pos: Point,
}

impl Hud {
    /// Pick at a canvas pixel.
    ///
    /// Returns the deepest hit, or `None` when the pixel is over no widget.
    #[tracing::instrument(target = "hudkit::pick", level = "trace", skip(self))]
    pub fn pick(
        &mut self,
        pixel: Point,
        reason: PickReason,
        button: Option<MouseButton>,
        now: Duration,
    ) -> HudResult<Option<PickResult>> {
        if self.drag.is_some() {
            match reason {
                PickReason::Moved => self.drag_to(pixel)?,
                PickReason::ButtonReleased => self.stop_drag()?,
                _ => {}
            }
        }

        let mut path = Vec::new();
        let mut covered = Vec::new();
        self.hit_children(self.root, pixel, reason, &mut path, &mut covered)?;
        self.update_hover(&path)?;
        for widget in covered {
            self.clear_hover(widget)?;
        }

        let Some(&deepest) = path.last() else {
            return Ok(None);
        };
        let local_pos = self.pixels_to_local(deepest, pixel)?;
        trace!(target: targets::PICK, widget = ?deepest, ?reason, "picked");

        if reason == PickReason::ButtonPressed {
            self.press_on_path(&path, pixel)?;
        }

        let event = MouseEvent {
            reason,
            button,
            local_pos,
            pixel_pos: pixel,
            timestamp: now,
        };
        if self.contains(deepest) {
            self.with_content(deepest, |content, hud| content.mouse_event(hud, deepest, &event))?;
        }
        Ok(Some(PickResult {
            widget: deepest,
            local_pos,
        }))
    }

    /// Test one widget and, on a hit, descend into it.
    ///
    /// Pushes the widget and its deepest hits onto `path`.
    fn hit_widget(
        &mut self,
        id: WidgetId,
        pixel: Point,
        reason: PickReason,
        path: &mut Vec<WidgetId>,
        covered: &mut Vec<WidgetId>,
    ) -> HudResult<bool> {
        if !self.accepts_pick(id, pixel, reason)? {
            return Ok(false);
        }
        path.push(id);

        // Assembled widgets draw over the children, so they are hit first.
        if self.node(id)?.base.dispatched_picking {
            self.refresh_z_order(id)?;
            let assembled = self.sorted_assembled(id).to_vec();
            for sub in assembled.into_iter().rev() {
                if self.hit_widget(sub, pixel, reason, path, covered)? {
                    return Ok(true);
                }
            }
        }
        if self.node(id)?.container.is_some() {
            self.hit_children(id, pixel, reason, path, covered)?;
        }
        Ok(true)
    }

    fn hit_children(
        &mut self,
        container: WidgetId,
        pixel: Point,
        reason: PickReason,
        path: &mut Vec<WidgetId>,
        covered: &mut Vec<WidgetId>,
    ) -> HudResult<()> {
        self.refresh_z_order(container)?;
        let overlapping = self.has_overlapping_widgets(container)?;
        let children = self.sorted_children(container).to_vec();

        let mut found = false;
        for child in children.into_iter().rev() {
            if found {
                if self.accepts_pick(child, pixel, reason)? {
                    covered.push(child);
                }
                continue;
            }
            if self.hit_widget(child, pixel, reason, path, covered)? {
                found = true;
                if !overlapping {
                    break;
                }
            }
        }
        Ok(())
    }

    /// Whether a widget itself is under the pixel and takes the pick.
    fn accepts_pick(&self, id: WidgetId, pixel: Point, reason: PickReason) -> HudResult<bool> {
        let base = &self.node(id)?.base;
        if !base.visible || !base.pickable || !base.attached {
            return Ok(false);
        }
        if reason.is_button() && !base.accepts_buttons() {
            return Ok(false);
        }
        let local = self.pixels_to_local(id, pixel)?;
        Ok(base.contains_local(local))
    }

    /// Move hover onto `path`, firing exits before enters.
    fn update_hover(&mut self, path: &[WidgetId]) -> HudResult<()> {
        let mut parent = self.root;
        for &next in path {
            let scope = self.scope_of(next).map_or(Scope::Children, |(_, scope)| scope);
            self.retarget_hover(parent, Some((scope, next)))?;
            parent = next;
        }
        self.retarget_hover(parent, None)
    }

    fn retarget_hover(&mut self, parent: WidgetId, target: Option<(Scope, WidgetId)>) -> HudResult<()> {
        for scope in [Scope::Children, Scope::Assembly] {
            let old = self.node(parent)?.hovered_in(scope);
            let wanted = target.filter(|(s, _)| *s == scope).map(|(_, id)| id);
            if old == wanted {
                continue;
            }
            if let Some(old) = old {
                self.clear_hover(old)?;
            }
            self.node_mut(parent)?.set_hovered_in(scope, wanted);
            if let Some(entered) = wanted {
                let base = &mut self.node_mut(entered)?.base;
                base.hovered = true;
                base.mouse_entered.emit(entered);
                trace!(target: targets::PICK, widget = ?entered, "mouse entered");
            }
        }
        Ok(())
    }

    /// Un-hover a widget and its hovered descendants, deepest first.
    pub(crate) fn clear_hover(&mut self, id: WidgetId) -> HudResult<()> {
        let Some(node) = self.nodes.get(id) else {
            return Ok(());
        };
        let hovered_children = [node.hovered_in(Scope::Children), node.hovered_in(Scope::Assembly)];
        for child in hovered_children.into_iter().flatten() {
            self.clear_hover(child)?;
        }

        let node = self.node_mut(id)?;
        node.set_hovered_in(Scope::Children, None);
        node.set_hovered_in(Scope::Assembly, None);
        if std::mem::take(&mut node.base.hovered) {
            node.base.mouse_exited.emit(id);
            trace!(target: targets::PICK, widget = ?id, "mouse exited");
        }
        Ok(())
    }

    /// Un-hover a widget and drop its parent's reference to it.
    pub(crate) fn drop_hover(&mut self, id: WidgetId) -> HudResult<()> {
        self.clear_hover(id)?;
        if let Some((parent, scope)) = self.scope_of(id) {
            let node = self.node_mut(parent)?;
            if node.hovered_in(scope) == Some(id) {
                node.set_hovered_in(scope, None);
            }
        }
        Ok(())
    }

    /// Focus and drag handling for a button press on `path`.
    fn press_on_path(&mut self, path: &[WidgetId], pixel: Point) -> HudResult<()> {
        if self.config.focus_on_press {
            let focusable = path.iter().rev().copied().find(|&w| {
                self.nodes
                    .get(w)
                    .is_some_and(|n| n.base.focusable && n.base.enabled)
            });
            if let Some(widget) = focusable {
                self.request_focus(widget)?;
            }
        }

        let draggable = path.iter().rev().copied().find(|&w| {
            self.nodes
                .get(w)
                .is_some_and(|n| n.base.draggable && n.base.enabled)
        });
        if let Some(widget) = draggable {
            if self.drag.is_some() {
                self.stop_drag()?;
            }
            let local = self.pixels_to_local(widget, pixel)?;
            if self.can_start_drag(widget, local)? {
                self.start_drag(widget, pixel)?;
            }
        }
        Ok(())
    }

    fn can_start_drag(&self, id: WidgetId, local: Point) -> HudResult<bool> {
        let node = self.node(id)?;
        if node.window.is_some() && !self.window_allows_drag(id, local)? {
            return Ok(false);
        }
        Ok(node
            .content
            .as_ref()
            .is_none_or(|content| content.can_start_drag(self, id, local)))
    }
}
