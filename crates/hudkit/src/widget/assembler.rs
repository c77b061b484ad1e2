//! Composed widgets.
//!
//! Every widget carries a [`WidgetAssembler`] listing the lightweight
//! sub-widgets it is composed of: a window's header and content pane, a
//! header's close button, a list's item rows. Assembled widgets live in the
//! owner's parent space, draw on top of the owner's children and delegate
//! their dirtiness to the owner.
//!
//! There are two kinds of sub-widget:
//!
//! - *managed* widgets sit at a location relative to the owner and move
//!   with it;
//! - *unmanaged* widgets are positioned by whoever added them, for example
//!   the rows of a list.

use hudkit_core::logging::targets;
use hudkit_core::{HudError, HudResult};
use hudkit_render::Point;
use tracing::trace;

use super::base::Positioned;
use super::{Hud, WidgetId};

/// The sub-widgets a widget is composed of.
#[derive(Debug, Default)]
pub struct WidgetAssembler {
    widgets: Vec<WidgetId>,
    managed: Vec<WidgetId>,
    /// `widgets` stably sorted by z-index, valid while `widgets_sorted`.
    pub(crate) sorted: Vec<WidgetId>,
    pub(crate) widgets_sorted: bool,
    pub(crate) hovered: Option<WidgetId>,
    pub(crate) focused: Option<WidgetId>,
}

impl WidgetAssembler {
    /// Every sub-widget, in insertion order.
    pub fn widgets(&self) -> &[WidgetId] {
        &self.widgets
    }

    /// The sub-widgets positioned relative to the owner.
    pub fn managed_widgets(&self) -> &[WidgetId] {
        &self.managed
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    pub fn contains(&self, id: WidgetId) -> bool {
        self.widgets.contains(&id)
    }

    pub fn is_managed(&self, id: WidgetId) -> bool {
        self.managed.contains(&id)
    }

    fn link(&mut self, id: WidgetId, managed: bool) {
        self.widgets.push(id);
        if managed {
            self.managed.push(id);
        }
        self.widgets_sorted = false;
    }

    fn unlink(&mut self, id: WidgetId) {
        self.widgets.retain(|&w| w != id);
        self.managed.retain(|&w| w != id);
        self.sorted.retain(|&w| w != id);
        if self.hovered == Some(id) {
            self.hovered = None;
        }
        if self.focused == Some(id) {
            self.focused = None;
        }
    }
}

impl Hud {
    /// The assembler of a widget.
    pub fn assembler(&self, owner: WidgetId) -> HudResult<&WidgetAssembler> {
        Ok(&self.node(owner)?.assembler)
    }

    /// Compose `sub` into `owner` at a location relative to the owner.
    ///
    /// The sub-widget follows the owner whenever the owner moves.
    pub fn assemble_widget(
        &mut self,
        owner: WidgetId,
        sub: WidgetId,
        relative: Point,
    ) -> HudResult<()> {
        self.check_assemblable(owner, sub)?;
        let location = self.node(owner)?.base.location() + relative;
        self.set_location_no_refresh(sub, location)?;
        self.link_assembled(owner, sub, true)
    }

    /// Compose `sub` into `owner` without managing its location.
    pub fn assemble_unmanaged_widget(&mut self, owner: WidgetId, sub: WidgetId) -> HudResult<()> {
        self.check_assemblable(owner, sub)?;
        self.link_assembled(owner, sub, false)
    }

    /// Remove `sub` from `owner`, detaching its subtree.
    pub fn disassemble_widget(&mut self, owner: WidgetId, sub: WidgetId) -> HudResult<()> {
        if self.node(sub)?.base.assembly_owner != Some(owner) {
            return Err(HudError::not_owned(sub, owner));
        }
        self.detach_widget(sub)?;
        self.node_mut(owner)?.assembler.unlink(sub);
        self.node_mut(sub)?.base.assembly_owner = None;
        trace!(target: targets::WIDGET, ?owner, ?sub, "disassembled widget");
        self.set_texture_dirty(owner)
    }

    /// Move a managed sub-widget within its owner.
    pub fn set_relative_location(
        &mut self,
        owner: WidgetId,
        sub: WidgetId,
        relative: Point,
    ) -> HudResult<()> {
        if !self.node(owner)?.assembler.is_managed(sub) {
            return Err(HudError::not_owned(sub, owner));
        }
        let location = self.node(owner)?.base.location() + relative;
        self.set_location(sub, location)
    }

    /// The location of a managed sub-widget relative to its owner.
    pub fn relative_location(&self, owner: WidgetId, sub: WidgetId) -> HudResult<Point> {
        if !self.node(owner)?.assembler.is_managed(sub) {
            return Err(HudError::not_owned(sub, owner));
        }
        Ok(self.node(sub)?.base.location() - self.node(owner)?.base.location())
    }

    fn check_assemblable(&self, owner: WidgetId, sub: WidgetId) -> HudResult<()> {
        self.node(owner)?;
        if self.node(sub)?.base.heavyweight {
            return Err(HudError::heavyweight_in_assembler(sub));
        }
        self.check_adoptable(owner, sub)
    }

    fn link_assembled(&mut self, owner: WidgetId, sub: WidgetId, managed: bool) -> HudResult<()> {
        self.node_mut(owner)?.assembler.link(sub, managed);
        self.node_mut(sub)?.base.assembly_owner = Some(owner);
        trace!(target: targets::WIDGET, ?owner, ?sub, managed, "assembled widget");

        if self.is_attached(owner) {
            if let Err(err) = self.attach_subtree(sub) {
                self.detach_widget(sub)?;
                self.node_mut(owner)?.assembler.unlink(sub);
                self.node_mut(sub)?.base.assembly_owner = None;
                return Err(err);
            }
        }
        self.set_texture_dirty(sub)
    }
}
