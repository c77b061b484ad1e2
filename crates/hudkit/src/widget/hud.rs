//! The widget arena.
//!
//! A [`Hud`] owns every widget of one HUD in a slot map. Widgets refer to
//! each other by [`WidgetId`]: a child names its container, an assembled
//! sub-widget names its assembly owner, and the owners list their children
//! and sub-widgets. Nothing is reference counted.
//!
//! The arena has one root container, the scene. Only heavyweight widgets may
//! be added to it directly; lightweight widgets are drawn into the surface of
//! a heavyweight ancestor.
//!
//! # Lifecycle
//!
//! Widgets are created detached. A widget becomes attached when it is
//! reachable from the root through containment or assembly. On the first
//! attach the `init_size`, `create_shape` and `init` hooks run once; later
//! attaches only revalidate the hierarchy and recreate heavyweight surfaces.
//!
//! ```
//! use hudkit::{Hud, UiConfig, WidgetBuilder};
//! use hudkit_render::{RecordingSurfaceFactory, ScreenConverter, Size};
//!
//! let mut hud = Hud::new(
//!     ScreenConverter::new(Size::new(800.0, 600.0)),
//!     RecordingSurfaceFactory::new(),
//!     UiConfig::default(),
//! );
//! let panel = hud.create_widget(WidgetBuilder::new("panel").heavyweight().size(200.0, 100.0));
//! hud.add_widget(hud.root(), panel)?;
//! assert!(hud.is_attached(panel));
//! # Ok::<(), hudkit::HudError>(())
//! ```

use std::any::Any;
use std::time::Duration;

use hudkit_core::logging::targets;
use hudkit_core::{DebugTree, HudError, HudResult, WidgetTreeDebug};
use hudkit_render::{CoordinatesConverter, Insets, Point, Size, SurfaceFactory};
use slotmap::SlotMap;
use tracing::{debug, trace, warn};

use super::assembler::WidgetAssembler;
use super::base::{
    Background, BackgroundSettable, Border, Pickable, Positioned, Sizable, WidgetBase,
};
use super::container::ContainerData;
use super::drag::DragState;
use super::redraw::HeavyweightState;
use super::traits::WidgetContent;
use super::window::WindowData;
use super::WidgetId;
use crate::config::UiConfig;

/// Which list of its parent a widget sits in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Scope {
    /// A container child.
    Children,
    /// An assembled sub-widget.
    Assembly,
}

/// One widget in the arena.
pub(crate) struct WidgetNode {
    pub(crate) base: WidgetBase,
    pub(crate) container: Option<ContainerData>,
    pub(crate) assembler: WidgetAssembler,
    pub(crate) window: Option<WindowData>,
    pub(crate) heavy: Option<HeavyweightState>,
    pub(crate) content: Option<Box<dyn WidgetContent>>,
}

impl WidgetNode {
    pub(crate) fn hovered_in(&self, scope: Scope) -> Option<WidgetId> {
        match scope {
            Scope::Children => self.container.as_ref().and_then(|c| c.hovered),
            Scope::Assembly => self.assembler.hovered,
        }
    }

    pub(crate) fn set_hovered_in(&mut self, scope: Scope, hovered: Option<WidgetId>) {
        match scope {
            Scope::Children => {
                if let Some(container) = self.container.as_mut() {
                    container.hovered = hovered;
                }
            }
            Scope::Assembly => self.assembler.hovered = hovered,
        }
    }

    /// The next link of the focus chain below this widget.
    pub(crate) fn focused_child(&self) -> Option<WidgetId> {
        self.container
            .as_ref()
            .and_then(|c| c.focused)
            .or(self.assembler.focused)
    }

    /// Point the focus chain at `child` through `scope`, clearing the other scope.
    pub(crate) fn set_focused_child(&mut self, scope: Scope, child: Option<WidgetId>) {
        let (in_children, in_assembly) = match scope {
            Scope::Children => (child, None),
            Scope::Assembly => (None, child),
        };
        if let Some(container) = self.container.as_mut() {
            container.focused = in_children;
        }
        self.assembler.focused = in_assembly;
    }

    /// Container children followed by assembled widgets.
    pub(crate) fn subtree_children(&self) -> Vec<WidgetId> {
        let mut ids: Vec<WidgetId> = self
            .container
            .as_ref()
            .map(|c| c.children.clone())
            .unwrap_or_default();
        ids.extend_from_slice(self.assembler.widgets());
        ids
    }
}

/// Construction parameters for [`Hud::create_widget`].
pub struct WidgetBuilder {
    name: String,
    heavyweight: bool,
    container: bool,
    resolution: Option<Size>,
    padding: Insets,
    location: Point,
    size: Size,
    z_index: i32,
    visible: bool,
    focusable: bool,
    draggable: bool,
    clickable: bool,
    pickable: bool,
    dispatched_picking: Option<bool>,
    background: Option<Background>,
    border: Option<Border>,
    content: Option<Box<dyn WidgetContent>>,
}

impl WidgetBuilder {
    /// Start a lightweight, plain widget.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            heavyweight: false,
            container: false,
            resolution: None,
            padding: Insets::ZERO,
            location: Point::ZERO,
            size: Size::ZERO,
            z_index: 0,
            visible: true,
            focusable: false,
            draggable: false,
            clickable: true,
            pickable: true,
            dispatched_picking: None,
            background: None,
            border: None,
            content: None,
        }
    }

    /// Give the widget its own surface.
    pub fn heavyweight(mut self) -> Self {
        self.heavyweight = true;
        self
    }

    /// Give the widget a child list.
    pub fn container(mut self) -> Self {
        self.container = true;
        self
    }

    /// Fix the container's internal coordinate space to `width` x `height` units.
    pub fn resolution(mut self, width: f32, height: f32) -> Self {
        self.container = true;
        self.resolution = Some(Size::new(width, height));
        self
    }

    /// Container padding inside the border.
    pub fn padding(mut self, padding: Insets) -> Self {
        self.container = true;
        self.padding = padding;
        self
    }

    pub fn location(mut self, x: f32, y: f32) -> Self {
        self.location = Point::new(x, y);
        self
    }

    pub fn size(mut self, width: f32, height: f32) -> Self {
        self.size = Size::new(width, height);
        self
    }

    pub fn z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn focusable(mut self, focusable: bool) -> Self {
        self.focusable = focusable;
        self
    }

    pub fn draggable(mut self, draggable: bool) -> Self {
        self.draggable = draggable;
        self
    }

    pub fn clickable(mut self, clickable: bool) -> Self {
        self.clickable = clickable;
        self
    }

    pub fn pickable(mut self, pickable: bool) -> Self {
        self.pickable = pickable;
        self
    }

    /// Test assembled sub-widgets when the widget is picked.
    pub fn dispatched_picking(mut self, dispatched: bool) -> Self {
        self.dispatched_picking = Some(dispatched);
        self
    }

    pub fn background(mut self, background: Background) -> Self {
        self.background = Some(background);
        self
    }

    pub fn border(mut self, border: Border) -> Self {
        self.border = Some(border);
        self
    }

    /// Attach behaviour hooks.
    pub fn content(mut self, content: impl WidgetContent) -> Self {
        self.content = Some(Box::new(content));
        self
    }
}

/// The widget arena of one HUD.
pub struct Hud {
    pub(super) nodes: SlotMap<WidgetId, WidgetNode>,
    pub(super) root: WidgetId,
    pub(super) converter: Box<dyn CoordinatesConverter>,
    pub(super) surfaces: Box<dyn SurfaceFactory>,
    pub(super) config: UiConfig,
    pub(super) drag: Option<DragState>,
    /// Attached heavyweight widgets in registration order.
    pub(super) heavyweights: Vec<WidgetId>,
    pub(super) scene_sorted: bool,
    pub(super) scene: Vec<WidgetId>,
}

static_assertions::assert_not_impl_any!(Hud: Send, Sync);

impl Hud {
    /// Create an empty HUD over a root converter and a surface backend.
    pub fn new(
        converter: impl CoordinatesConverter + 'static,
        surfaces: impl SurfaceFactory + 'static,
        config: UiConfig,
    ) -> Self {
        let hud_size = converter.hud_resolution();
        let mut base = WidgetBase::new("root".into(), false);
        base.set_size(hud_size);
        base.attached = true;
        base.initialized = true;
        base.hierarchy_valid = Some(true);
        base.this_dirty = false;
        base.units_per_pixel = hud_per_pixel(&converter);

        let mut container = ContainerData::new(None, Insets::ZERO);
        container.internal_units_per_pixel = base.units_per_pixel;

        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(WidgetNode {
            base,
            container: Some(container),
            assembler: WidgetAssembler::default(),
            window: None,
            heavy: None,
            content: None,
        });

        Self {
            nodes,
            root,
            converter: Box::new(converter),
            surfaces: Box::new(surfaces),
            config,
            drag: None,
            heavyweights: Vec::new(),
            scene_sorted: true,
            scene: Vec::new(),
        }
    }

    /// The root scene container.
    pub fn root(&self) -> WidgetId {
        self.root
    }

    /// The configuration the HUD was built with.
    pub fn config(&self) -> &UiConfig {
        &self.config
    }

    /// The root coordinate converter.
    pub fn converter(&self) -> &dyn CoordinatesConverter {
        self.converter.as_ref()
    }

    /// Replace the root converter, for example after a canvas resize.
    pub fn set_converter(&mut self, converter: impl CoordinatesConverter + 'static) -> HudResult<()> {
        let hud_size = converter.hud_resolution();
        self.converter = Box::new(converter);
        self.node_mut(self.root)?.base.set_size(hud_size);
        self.update_size_factors(self.root)?;
        for id in self.heavyweights.clone() {
            self.set_texture_dirty(id)?;
        }
        Ok(())
    }

    // =========================================================================
    // Arena access
    // =========================================================================

    /// Create a detached widget.
    pub fn create_widget(&mut self, builder: WidgetBuilder) -> WidgetId {
        let WidgetBuilder {
            name,
            heavyweight,
            container,
            resolution,
            padding,
            location,
            size,
            z_index,
            visible,
            focusable,
            draggable,
            clickable,
            pickable,
            dispatched_picking,
            background,
            border,
            content,
        } = builder;

        let mut base = WidgetBase::new(name, heavyweight);
        base.set_location(location);
        base.set_size(size);
        base.set_z_index(z_index);
        base.set_background(background);
        base.set_border(border);
        base.visible = visible;
        base.focusable = focusable;
        base.draggable = draggable;
        base.clickable = clickable;
        base.pickable = pickable;
        base.dispatched_picking = dispatched_picking
            .unwrap_or(container && self.config.dispatched_picking);

        let heavy = heavyweight.then(|| HeavyweightState::new(self.config.min_redraw_interval()));
        let id = self.nodes.insert(WidgetNode {
            base,
            container: container.then(|| ContainerData::new(resolution, padding)),
            assembler: WidgetAssembler::default(),
            window: None,
            heavy,
            content,
        });
        trace!(target: targets::WIDGET, widget = ?id, heavyweight, "created widget");
        id
    }

    /// Destroy a widget together with its children and assembled widgets.
    pub fn destroy_widget(&mut self, id: WidgetId) -> HudResult<()> {
        if id == self.root {
            return Err(HudError::InvalidWidgetId);
        }
        let node = self.node(id)?;
        if let Some(container) = node.base.container {
            self.remove_widget(container, id)?;
        } else if let Some(owner) = node.base.assembly_owner {
            self.disassemble_widget(owner, id)?;
        }
        self.destroy_detached(id);
        Ok(())
    }

    fn destroy_detached(&mut self, id: WidgetId) {
        let Some(node) = self.nodes.remove(id) else {
            return;
        };
        trace!(target: targets::WIDGET, widget = ?id, "destroyed widget");
        for child in node.subtree_children() {
            self.destroy_detached(child);
        }
    }

    /// Whether the id refers to a live widget.
    pub fn contains(&self, id: WidgetId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Number of live widgets, the root included.
    pub fn widget_count(&self) -> usize {
        self.nodes.len()
    }

    /// The common data of a widget.
    pub fn widget(&self, id: WidgetId) -> HudResult<&WidgetBase> {
        Ok(&self.node(id)?.base)
    }

    /// Mutable access to a widget's non-visual flags.
    ///
    /// Appearance changes made through this reference are not noticed by
    /// the redraw machinery; use the `Hud` mutators for those.
    pub fn widget_mut(&mut self, id: WidgetId) -> HudResult<&mut WidgetBase> {
        Ok(&mut self.node_mut(id)?.base)
    }

    /// The content of a widget, if it is a `T`.
    pub fn content<T: WidgetContent>(&self, id: WidgetId) -> Option<&T> {
        let content: &dyn WidgetContent = self.nodes.get(id)?.content.as_deref()?;
        (content as &dyn Any).downcast_ref::<T>()
    }

    /// Mutable content of a widget, if it is a `T`.
    pub fn content_mut<T: WidgetContent>(&mut self, id: WidgetId) -> Option<&mut T> {
        let content: &mut dyn WidgetContent = self.nodes.get_mut(id)?.content.as_deref_mut()?;
        (content as &mut dyn Any).downcast_mut::<T>()
    }

    pub(crate) fn node(&self, id: WidgetId) -> HudResult<&WidgetNode> {
        self.nodes.get(id).ok_or(HudError::InvalidWidgetId)
    }

    pub(crate) fn node_mut(&mut self, id: WidgetId) -> HudResult<&mut WidgetNode> {
        self.nodes.get_mut(id).ok_or(HudError::InvalidWidgetId)
    }

    /// Run a hook with the widget's content taken out of its node.
    ///
    /// Widgets without content yield `R::default()`. The content is put back
    /// unless the hook destroyed the widget or installed a replacement.
    pub(crate) fn with_content<R: Default>(
        &mut self,
        id: WidgetId,
        hook: impl FnOnce(&mut dyn WidgetContent, &mut Hud) -> HudResult<R>,
    ) -> HudResult<R> {
        let Some(mut content) = self.node_mut(id)?.content.take() else {
            return Ok(R::default());
        };
        let result = hook(content.as_mut(), self);
        if let Some(node) = self.nodes.get_mut(id) {
            if node.content.is_none() {
                node.content = Some(content);
            }
        }
        result
    }

    // =========================================================================
    // Tree queries
    // =========================================================================

    /// Whether the widget is reachable from the root.
    pub fn is_attached(&self, id: WidgetId) -> bool {
        self.nodes.get(id).is_some_and(|n| n.base.attached)
    }

    /// Which of `parent`'s lists holds `child`, if any.
    pub(crate) fn scope_of(&self, child: WidgetId) -> Option<(WidgetId, Scope)> {
        let base = &self.nodes.get(child)?.base;
        match (base.container, base.assembly_owner) {
            (Some(container), _) => Some((container, Scope::Children)),
            (None, Some(owner)) => Some((owner, Scope::Assembly)),
            (None, None) => None,
        }
    }

    /// Whether `ancestor` is `id` or lies above it.
    pub fn is_ancestor_or_self(&self, ancestor: WidgetId, id: WidgetId) -> bool {
        let mut current = Some(id);
        while let Some(widget) = current {
            if widget == ancestor {
                return true;
            }
            current = self.nodes.get(widget).and_then(|n| n.base.parent());
        }
        false
    }

    /// The widgets from the root's direct child down to `id`.
    pub(crate) fn path_from_root(&self, id: WidgetId) -> Vec<WidgetId> {
        let mut path = Vec::new();
        let mut current = Some(id);
        while let Some(widget) = current {
            if widget == self.root {
                break;
            }
            path.push(widget);
            current = self.nodes.get(widget).and_then(|n| n.base.parent());
        }
        path.reverse();
        path
    }

    /// Attached widgets in depth-first order, parents before children.
    pub(crate) fn attached_preorder(&self) -> Vec<WidgetId> {
        let mut order = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get(id) else {
                continue;
            };
            if !node.base.attached {
                continue;
            }
            order.push(id);
            stack.extend(node.subtree_children().into_iter().rev());
        }
        order
    }

    /// The nearest heavyweight widget at or above `id`.
    pub fn host_of(&self, id: WidgetId) -> Option<WidgetId> {
        let mut current = Some(id);
        while let Some(widget) = current {
            let node = self.nodes.get(widget)?;
            if node.base.heavyweight {
                return Some(widget);
            }
            current = node.base.parent();
        }
        None
    }

    /// Visible, together with every ancestor.
    pub fn is_showing(&self, id: WidgetId) -> bool {
        let mut current = Some(id);
        while let Some(widget) = current {
            match self.nodes.get(widget) {
                Some(node) if node.base.visible => current = node.base.parent(),
                _ => return false,
            }
        }
        true
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Attach a subtree whose parent just became reachable from the root.
    pub(crate) fn attach_subtree(&mut self, id: WidgetId) -> HudResult<()> {
        if self.node(id)?.base.attached {
            return Ok(());
        }
        self.validate_hierarchy(id)?;

        self.node_mut(id)?.base.attached = true;
        self.refresh_size_factors(id)?;
        trace!(target: targets::WIDGET, widget = ?id, "attached");

        if !self.node(id)?.base.initialized {
            self.node_mut(id)?.base.initialized = true;
            self.with_content(id, |content, hud| content.init_size(hud, id))?;
            self.with_content(id, |content, hud| content.create_shape(hud, id))?;
            self.with_content(id, |content, hud| content.init(hud, id))?;
        }

        if self.node(id)?.base.heavyweight {
            self.register_heavyweight(id)?;
        }

        for child in self.node(id)?.subtree_children() {
            self.attach_subtree(child)?;
        }

        if std::mem::take(&mut self.node_mut(id)?.base.pending_focus) {
            self.request_focus(id)?;
        }
        self.set_texture_dirty(id)
    }

    /// Detach a subtree that is no longer reachable from the root.
    ///
    /// Clears every reference the rest of the HUD holds into the subtree:
    /// the focus chain, the hover path and an active drag. A window detaches
    /// its content pane before itself and fires `closed` afterwards.
    pub(crate) fn detach_widget(&mut self, id: WidgetId) -> HudResult<()> {
        if !self.is_attached(id) {
            return Ok(());
        }
        let pane = self.node(id)?.window.as_ref().map(|window| window.content_pane);
        if let Some(pane) = pane {
            self.detach_widget(pane)?;
        }
        if let Some(drag) = self.drag {
            if self.is_ancestor_or_self(id, drag.widget) {
                warn!(target: targets::DRAG, widget = ?drag.widget, "drag target detached, cancelling drag");
                self.cancel_drag()?;
            }
        }
        self.drop_focus_within(id)?;
        self.drop_hover(id)?;
        self.detach_subtree(id);
        if pane.is_some() {
            debug!(target: targets::WIDGET, window = ?id, "closed window");
            self.window(id)?.closed.emit(id);
        }
        Ok(())
    }

    fn detach_subtree(&mut self, id: WidgetId) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        if !node.base.attached {
            return;
        }
        node.base.attached = false;
        node.base.hierarchy_valid = None;
        if let Some(heavy) = node.heavy.as_mut() {
            heavy.release_surface();
        }
        let children = node.subtree_children();
        if self.heavyweights.contains(&id) {
            self.heavyweights.retain(|&w| w != id);
            self.scene_sorted = false;
        }
        trace!(target: targets::WIDGET, widget = ?id, "detached");
        for child in children {
            self.detach_subtree(child);
        }
    }

    fn validate_hierarchy(&mut self, id: WidgetId) -> HudResult<()> {
        let cached = self.node(id)?.base.hierarchy_valid;
        let valid = match cached {
            Some(valid) => valid,
            None => {
                let valid = self.node(id)?.base.heavyweight || self.has_heavyweight_ancestor(id);
                self.node_mut(id)?.base.hierarchy_valid = Some(valid);
                valid
            }
        };
        if valid {
            Ok(())
        } else {
            Err(HudError::no_heavyweight_ancestor(id))
        }
    }

    fn has_heavyweight_ancestor(&self, id: WidgetId) -> bool {
        let mut current = self.nodes.get(id).and_then(|n| n.base.parent());
        while let Some(widget) = current {
            match self.nodes.get(widget) {
                Some(node) if node.base.heavyweight => return true,
                Some(node) => current = node.base.parent(),
                None => return false,
            }
        }
        false
    }

    /// Run layout and `update` hooks over the attached tree, parents first.
    #[tracing::instrument(skip(self), target = "hudkit::widget", level = "trace")]
    pub fn update(&mut self, now: Duration) -> HudResult<()> {
        for id in self.attached_preorder() {
            if !self.is_attached(id) {
                continue;
            }
            self.apply_layout(id)?;
            self.with_content(id, |content, hud| content.update(hud, id, now))?;
        }
        Ok(())
    }

    // =========================================================================
    // Appearance mutators
    // =========================================================================

    /// Move a widget and refresh its texture.
    ///
    /// Managed assembled widgets follow by the same delta.
    pub fn set_location(&mut self, id: WidgetId, location: Point) -> HudResult<()> {
        self.move_widget(id, location, true)
    }

    /// Move a widget without marking anything dirty.
    pub fn set_location_no_refresh(&mut self, id: WidgetId, location: Point) -> HudResult<()> {
        self.move_widget(id, location, false)
    }

    fn move_widget(&mut self, id: WidgetId, location: Point, refresh: bool) -> HudResult<()> {
        if id == self.root {
            return Ok(());
        }
        let node = self.node_mut(id)?;
        let old = node.base.location();
        if !node.base.set_location(location) {
            return Ok(());
        }
        let delta = location - old;
        for sub in node.assembler.managed_widgets().to_vec() {
            let sub_location = self.node(sub)?.base.location() + delta;
            self.move_widget(sub, sub_location, false)?;
        }
        self.invalidate_overlap(id);
        self.node(id)?.base.location_changed.emit(location);
        if refresh {
            self.set_texture_dirty(id)?;
        }
        Ok(())
    }

    /// Resize a widget.
    pub fn set_size(&mut self, id: WidgetId, size: Size) -> HudResult<()> {
        if id == self.root {
            return Ok(());
        }
        if !self.node_mut(id)?.base.set_size(size) {
            return Ok(());
        }
        self.invalidate_overlap(id);
        self.invalidate_layout(id);
        if self.node(id)?.window.is_some() {
            self.layout_window(id)?;
        }
        self.update_size_factors(id)?;
        self.node(id)?.base.size_changed.emit(size);
        self.set_texture_dirty(id)
    }

    /// Change the paint and pick order within the sibling scope.
    pub fn set_z_index(&mut self, id: WidgetId, z_index: i32) -> HudResult<()> {
        if !self.node_mut(id)?.base.set_z_index(z_index) {
            return Ok(());
        }
        self.mark_scope_unsorted(id);
        if self.subtree_has_heavyweight(id) {
            self.scene_sorted = false;
        }
        self.set_texture_dirty(id)
    }

    /// Show or hide a widget.
    pub fn set_visible(&mut self, id: WidgetId, visible: bool) -> HudResult<()> {
        let node = self.node_mut(id)?;
        if node.base.visible == visible {
            return Ok(());
        }
        node.base.visible = visible;
        if !visible {
            self.drop_hover(id)?;
        }
        self.invalidate_overlap(id);
        self.set_texture_dirty(id)
    }

    /// Override the pick area of a widget. `None` picks against its full size.
    pub fn set_pick_size(&mut self, id: WidgetId, pick_size: Option<Size>) -> HudResult<()> {
        self.node_mut(id)?.base.set_pick_size(pick_size);
        self.invalidate_overlap(id);
        Ok(())
    }

    /// Replace the background.
    pub fn set_background(&mut self, id: WidgetId, background: Option<Background>) -> HudResult<()> {
        if self.node_mut(id)?.base.set_background(background) {
            self.set_texture_dirty(id)?;
        }
        Ok(())
    }

    /// Replace the border. Containers remap their internal space.
    pub fn set_border(&mut self, id: WidgetId, border: Option<Border>) -> HudResult<()> {
        if !self.node_mut(id)?.base.set_border(border) {
            return Ok(());
        }
        self.invalidate_layout(id);
        self.update_size_factors(id)?;
        self.set_texture_dirty(id)
    }

    fn subtree_has_heavyweight(&self, id: WidgetId) -> bool {
        self.heavyweights
            .iter()
            .any(|&heavy| self.is_ancestor_or_self(id, heavy))
    }

    /// Dump the attached and detached-but-owned tree below the root.
    pub fn debug_tree(&self) -> String {
        WidgetTreeDebug::new().format(self)
    }
}

/// HUD units per canvas pixel at the root.
pub(crate) fn hud_per_pixel(converter: &dyn CoordinatesConverter) -> (f32, f32) {
    let hud = converter.hud_resolution();
    let pixels = converter.pixel_resolution();
    (
        if pixels.width > 0.0 { hud.width / pixels.width } else { 0.0 },
        if pixels.height > 0.0 { hud.height / pixels.height } else { 0.0 },
    )
}

impl DebugTree for Hud {
    type Node = WidgetId;

    fn debug_roots(&self) -> Vec<WidgetId> {
        vec![self.root]
    }

    fn debug_children(&self, node: WidgetId) -> Vec<WidgetId> {
        self.nodes
            .get(node)
            .map(|n| n.subtree_children())
            .unwrap_or_default()
    }

    fn debug_label(&self, node: WidgetId) -> String {
        let Some(n) = self.nodes.get(node) else {
            return format!("{node:?} (destroyed)");
        };
        let base = &n.base;
        let kind = if n.window.is_some() {
            "window"
        } else if n.container.is_some() {
            "container"
        } else {
            "widget"
        };
        let mut label = format!(
            "{} [{kind}] at ({}, {}) size {}x{} z={}",
            base.name(),
            base.location().x,
            base.location().y,
            base.size().width,
            base.size().height,
            base.z_index(),
        );
        if base.heavyweight {
            label.push_str(" heavyweight");
        }
        if base.assembly_owner.is_some() {
            label.push_str(" assembled");
        }
        if !base.visible {
            label.push_str(" hidden");
        }
        if base.has_focus {
            label.push_str(" focused");
        }
        if base.this_dirty || base.hosted_dirty {
            label.push_str(" dirty");
        }
        label
    }
}
