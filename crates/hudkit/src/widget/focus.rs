//! Keyboard focus and event forwarding.
//!
//! Focus is a chain of references starting at the root: each container or
//! assembler on the chain names the one child the chain continues through.
//! The widget at the end of the chain is the only one with focus, and it
//! receives every keyboard and controller event.
//!
//! # Traversal
//!
//! The keys bound in [`UiConfig`](crate::UiConfig) (Tab and Shift+Tab by
//! default) cycle focus through the focusable siblings of the current focus
//! end, wrapping at either end.

use std::time::Duration;

use hudkit_core::HudResult;
use hudkit_core::logging::targets;
use tracing::{debug, warn};

use super::events::{ControllerEvent, Key, KeyEvent, KeyboardModifiers};
use super::hud::Scope;
use super::{Hud, WidgetId};

impl Hud {
    /// The widgets on the focus chain below the root, ending at the focused one.
    pub fn focus_chain(&self) -> Vec<WidgetId> {
        let mut chain = Vec::new();
        let mut current = self.root;
        while let Some(next) = self.nodes.get(current).and_then(|n| n.focused_child()) {
            if chain.contains(&next) {
                break;
            }
            chain.push(next);
            current = next;
        }
        chain
    }

    /// The end of the focus chain.
    pub fn focused_widget(&self) -> Option<WidgetId> {
        self.focus_chain()
            .last()
            .copied()
            .filter(|&id| self.nodes.get(id).is_some_and(|n| n.base.has_focus))
    }

    /// Make `id` the end of the focus chain.
    ///
    /// A request for a detached widget is remembered and replayed when it is
    /// attached. Requests for unfocusable widgets are ignored.
    pub fn request_focus(&mut self, id: WidgetId) -> HudResult<()> {
        let base = &self.node(id)?.base;
        if !base.attached {
            self.node_mut(id)?.base.pending_focus = true;
            debug!(target: targets::FOCUS, widget = ?id, "focus queued until attach");
            return Ok(());
        }
        if !base.focusable {
            warn!(target: targets::FOCUS, widget = ?id, "ignoring focus request for unfocusable widget");
            return Ok(());
        }
        let old = self.focused_widget();
        if old == Some(id) {
            return Ok(());
        }

        self.unlink_focus_chain();
        let mut parent = self.root;
        for widget in self.path_from_root(id) {
            let scope = self.scope_of(widget).map_or(Scope::Children, |(_, scope)| scope);
            self.node_mut(parent)?.set_focused_child(scope, Some(widget));
            parent = widget;
        }

        if let Some(old) = old {
            self.lose_focus(old)?;
        }
        let base = &mut self.node_mut(id)?.base;
        base.has_focus = true;
        base.focus_gained.emit(id);
        debug!(target: targets::FOCUS, from = ?old, to = ?id, "focus moved");
        self.set_texture_dirty(id)
    }

    /// Leave no widget focused.
    pub fn clear_focus(&mut self) -> HudResult<()> {
        let old = self.focused_widget();
        self.unlink_focus_chain();
        if let Some(old) = old {
            self.lose_focus(old)?;
            debug!(target: targets::FOCUS, from = ?old, "focus cleared");
        }
        Ok(())
    }

    /// Clear focus if the chain passes through `id`.
    pub(crate) fn drop_focus_within(&mut self, id: WidgetId) -> HudResult<()> {
        if let Some(node) = self.nodes.get_mut(id) {
            node.base.pending_focus = false;
        }
        if self.focus_chain().contains(&id) {
            self.clear_focus()?;
        }
        Ok(())
    }

    fn unlink_focus_chain(&mut self) {
        let mut current = self.root;
        let mut visited = Vec::new();
        while let Some(node) = self.nodes.get_mut(current) {
            let next = node.focused_child();
            node.set_focused_child(Scope::Children, None);
            match next {
                Some(next) if !visited.contains(&next) => {
                    visited.push(next);
                    current = next;
                }
                _ => break,
            }
        }
    }

    fn lose_focus(&mut self, id: WidgetId) -> HudResult<()> {
        let Some(node) = self.nodes.get_mut(id) else {
            return Ok(());
        };
        if std::mem::take(&mut node.base.has_focus) {
            node.base.focus_lost.emit(id);
        }
        self.set_texture_dirty(id)
    }

    /// Focus the next focusable sibling of the focus end, wrapping around.
    ///
    /// Returns whether any widget could be focused.
    pub fn focus_next(&mut self) -> HudResult<bool> {
        self.cycle_focus(true)
    }

    /// Focus the previous focusable sibling of the focus end, wrapping around.
    pub fn focus_previous(&mut self) -> HudResult<bool> {
        self.cycle_focus(false)
    }

    fn cycle_focus(&mut self, forward: bool) -> HudResult<bool> {
        let current = self.focused_widget();
        let container = current
            .and_then(|id| self.owning_container(id))
            .unwrap_or(self.root);
        let candidates: Vec<WidgetId> = self
            .container(container)?
            .children
            .iter()
            .copied()
            .filter(|&c| {
                self.nodes.get(c).is_some_and(|n| {
                    n.base.focusable && n.base.visible && n.base.enabled && n.base.attached
                })
            })
            .collect();
        if candidates.is_empty() {
            return Ok(false);
        }

        let len = candidates.len();
        let next = match current.and_then(|c| candidates.iter().position(|&w| w == c)) {
            Some(index) if forward => (index + 1) % len,
            Some(index) => (index + len - 1) % len,
            None if forward => 0,
            None => len - 1,
        };
        self.request_focus(candidates[next])?;
        Ok(true)
    }

    /// The container of the nearest ancestor-or-self held as a container child.
    fn owning_container(&self, id: WidgetId) -> Option<WidgetId> {
        let mut current = Some(id);
        while let Some(widget) = current {
            let base = &self.nodes.get(widget)?.base;
            if let Some(container) = base.container {
                return Some(container);
            }
            current = base.assembly_owner;
        }
        None
    }

    // =========================================================================
    // Event forwarding
    // =========================================================================

    /// A key went down. Focus traversal keys are consumed.
    pub fn key_pressed(
        &mut self,
        key: Key,
        modifiers: KeyboardModifiers,
        timestamp: Duration,
    ) -> HudResult<()> {
        if self.config.focus_next.matches(key, modifiers) {
            return self.focus_next().map(drop);
        }
        if self.config.focus_previous.matches(key, modifiers) {
            return self.focus_previous().map(drop);
        }
        self.dispatch_key(KeyEvent::Pressed {
            key,
            modifiers,
            timestamp,
        })
    }

    /// A key went up.
    pub fn key_released(
        &mut self,
        key: Key,
        modifiers: KeyboardModifiers,
        timestamp: Duration,
    ) -> HudResult<()> {
        self.dispatch_key(KeyEvent::Released {
            key,
            modifiers,
            timestamp,
        })
    }

    /// A character was typed.
    pub fn key_typed(
        &mut self,
        character: char,
        modifiers: KeyboardModifiers,
        timestamp: Duration,
    ) -> HudResult<()> {
        self.dispatch_key(KeyEvent::Typed {
            character,
            modifiers,
            timestamp,
        })
    }

    pub fn controller_button_pressed(&mut self, button: u32, timestamp: Duration) -> HudResult<()> {
        self.dispatch_controller(ControllerEvent::ButtonPressed { button, timestamp })
    }

    pub fn controller_button_released(&mut self, button: u32, timestamp: Duration) -> HudResult<()> {
        self.dispatch_controller(ControllerEvent::ButtonReleased { button, timestamp })
    }

    pub fn controller_axis_changed(
        &mut self,
        axis: u32,
        value: f32,
        timestamp: Duration,
    ) -> HudResult<()> {
        self.dispatch_controller(ControllerEvent::AxisChanged {
            axis,
            value,
            timestamp,
        })
    }

    fn dispatch_key(&mut self, event: KeyEvent) -> HudResult<()> {
        let Some(end) = self.focused_widget() else {
            return Ok(());
        };
        self.with_content(end, |content, hud| content.key_event(hud, end, &event))
    }

    fn dispatch_controller(&mut self, event: ControllerEvent) -> HudResult<()> {
        let Some(end) = self.focused_widget() else {
            return Ok(());
        };
        self.with_content(end, |content, hud| content.controller_event(hud, end, &event))
    }
}
