//! Widget containers.
//!
//! A container is a widget with a child list and an internal coordinate
//! space. Children are positioned in that space, drawn clipped to the
//! container's content area (its bounds minus border and padding) and picked
//! topmost first.
//!
//! # Internal space
//!
//! Without a resolution the internal space has the size of the content area
//! and the same scale as the parent space. With a resolution the content
//! area is stretched over `resolution` units, so children can be laid out in
//! fixed units whatever the container's actual size.

use hudkit_core::logging::targets;
use hudkit_core::{HudError, HudResult};
use hudkit_render::{Insets, Point, Rect, Size};
use tracing::trace;

use super::base::{Pickable, Positioned, Sizable};
use super::layout::{LayoutItem, LayoutManager};
use super::{Hud, WidgetId};

/// Read access to a container's state.
pub trait Container {
    /// Children in insertion order.
    fn children(&self) -> &[WidgetId];

    /// The fixed internal resolution, if one is set.
    fn resolution(&self) -> Option<Size>;

    /// Padding between the border and the internal space.
    fn padding(&self) -> Insets;

    /// The child the focus chain passes through, if any.
    fn focused_child(&self) -> Option<WidgetId>;

    /// The child under the pointer, if any.
    fn hovered_child(&self) -> Option<WidgetId>;

    /// Whether a layout manager positions the children.
    fn has_layout(&self) -> bool;

    fn child_count(&self) -> usize {
        self.children().len()
    }
}

/// Child list and internal space of a container widget.
pub struct ContainerData {
    pub(crate) children: Vec<WidgetId>,
    /// `children` stably sorted by z-index, valid while `widgets_sorted`.
    pub(crate) sorted: Vec<WidgetId>,
    pub(crate) widgets_sorted: bool,
    pub(crate) resolution: Option<Size>,
    pub(crate) padding: Insets,
    pub(crate) layout: Option<Box<dyn LayoutManager>>,
    pub(crate) layout_dirty: bool,
    pub(crate) focused: Option<WidgetId>,
    pub(crate) hovered: Option<WidgetId>,
    /// Cached answer of `has_overlapping_widgets`.
    pub(crate) overlapping: Option<bool>,
    /// Internal HUD units per canvas pixel.
    pub(crate) internal_units_per_pixel: (f32, f32),
}

impl ContainerData {
    pub(crate) fn new(resolution: Option<Size>, padding: Insets) -> Self {
        Self {
            children: Vec::new(),
            sorted: Vec::new(),
            widgets_sorted: true,
            resolution,
            padding,
            layout: None,
            layout_dirty: false,
            focused: None,
            hovered: None,
            overlapping: None,
            internal_units_per_pixel: (1.0, 1.0),
        }
    }

    pub(crate) fn unlink(&mut self, child: WidgetId) {
        self.children.retain(|&c| c != child);
        self.sorted.retain(|&c| c != child);
        self.overlapping = None;
        self.layout_dirty = true;
        if self.focused == Some(child) {
            self.focused = None;
        }
        if self.hovered == Some(child) {
            self.hovered = None;
        }
    }
}

impl Container for ContainerData {
    fn children(&self) -> &[WidgetId] {
        &self.children
    }

    fn resolution(&self) -> Option<Size> {
        self.resolution
    }

    fn padding(&self) -> Insets {
        self.padding
    }

    fn focused_child(&self) -> Option<WidgetId> {
        self.focused
    }

    fn hovered_child(&self) -> Option<WidgetId> {
        self.hovered
    }

    fn has_layout(&self) -> bool {
        self.layout.is_some()
    }
}

impl std::fmt::Debug for ContainerData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContainerData")
            .field("children", &self.children)
            .field("resolution", &self.resolution)
            .field("padding", &self.padding)
            .field("has_layout", &self.layout.is_some())
            .field("focused", &self.focused)
            .field("hovered", &self.hovered)
            .finish_non_exhaustive()
    }
}

impl Hud {
    /// The container data of a widget.
    pub fn container(&self, id: WidgetId) -> HudResult<&ContainerData> {
        self.node(id)?
            .container
            .as_ref()
            .ok_or_else(|| HudError::not_a_container(id))
    }

    pub(crate) fn container_mut(&mut self, id: WidgetId) -> HudResult<&mut ContainerData> {
        self.node_mut(id)?
            .container
            .as_mut()
            .ok_or_else(|| HudError::not_a_container(id))
    }

    /// Add `child` to `container`.
    ///
    /// When the container is attached the child's subtree is attached too;
    /// if that fails the child is unlinked again and the error returned.
    pub fn add_widget(&mut self, container: WidgetId, child: WidgetId) -> HudResult<()> {
        self.container(container)?;
        self.check_adoptable(container, child)?;
        if container == self.root && !self.node(child)?.base.heavyweight {
            return Err(HudError::no_heavyweight_ancestor(child));
        }

        let data = self.container_mut(container)?;
        data.children.push(child);
        data.widgets_sorted = false;
        data.overlapping = None;
        data.layout_dirty = true;
        self.node_mut(child)?.base.container = Some(container);
        trace!(target: targets::WIDGET, ?container, ?child, "added child");

        if self.is_attached(container) {
            if let Err(err) = self.attach_subtree(child) {
                self.detach_widget(child)?;
                self.container_mut(container)?.unlink(child);
                self.node_mut(child)?.base.container = None;
                return Err(err);
            }
        }
        self.set_texture_dirty(child)
    }

    /// Move `child` to `location`, then add it to `container`.
    pub fn add_widget_at(
        &mut self,
        container: WidgetId,
        child: WidgetId,
        location: Point,
    ) -> HudResult<()> {
        self.set_location_no_refresh(child, location)?;
        self.add_widget(container, child)
    }

    /// Remove `child` from `container`, detaching its subtree.
    pub fn remove_widget(&mut self, container: WidgetId, child: WidgetId) -> HudResult<()> {
        if self.node(child)?.base.container != Some(container) {
            return Err(HudError::not_owned(child, container));
        }
        self.detach_widget(child)?;
        self.container_mut(container)?.unlink(child);
        self.node_mut(child)?.base.container = None;
        trace!(target: targets::WIDGET, ?container, ?child, "removed child");
        self.set_texture_dirty(container)
    }

    /// Children of a container in insertion order.
    pub fn children(&self, container: WidgetId) -> HudResult<&[WidgetId]> {
        Ok(&self.container(container)?.children)
    }

    /// Children of a container in paint order, topmost last.
    pub fn children_by_z(&mut self, container: WidgetId) -> HudResult<Vec<WidgetId>> {
        self.container(container)?;
        self.refresh_z_order(container)?;
        Ok(self.container(container)?.sorted.clone())
    }

    /// Fix the internal resolution, or restore the content-size default with `None`.
    pub fn set_resolution(&mut self, container: WidgetId, resolution: Option<Size>) -> HudResult<()> {
        let data = self.container_mut(container)?;
        if data.resolution == resolution {
            return Ok(());
        }
        data.resolution = resolution;
        data.layout_dirty = true;
        self.update_size_factors(container)?;
        self.set_texture_dirty(container)
    }

    /// The fixed internal resolution, if one is set.
    pub fn resolution(&self, container: WidgetId) -> HudResult<Option<Size>> {
        Ok(self.container(container)?.resolution)
    }

    /// Set the padding between border and internal space.
    pub fn set_padding(&mut self, container: WidgetId, padding: Insets) -> HudResult<()> {
        let data = self.container_mut(container)?;
        if data.padding == padding {
            return Ok(());
        }
        data.padding = padding;
        data.layout_dirty = true;
        self.update_size_factors(container)?;
        self.set_texture_dirty(container)
    }

    /// Install a layout manager. It runs on the next update.
    pub fn set_layout(
        &mut self,
        container: WidgetId,
        layout: impl LayoutManager + 'static,
    ) -> HudResult<()> {
        let data = self.container_mut(container)?;
        data.layout = Some(Box::new(layout));
        data.layout_dirty = true;
        self.set_texture_dirty(container)
    }

    /// Remove the layout manager, leaving children where they are.
    pub fn clear_layout(&mut self, container: WidgetId) -> HudResult<()> {
        let data = self.container_mut(container)?;
        data.layout = None;
        data.layout_dirty = false;
        Ok(())
    }

    /// Whether the pick areas of any two visible children intersect.
    ///
    /// Picking stops at the first hit child when this is false.
    pub fn has_overlapping_widgets(&mut self, container: WidgetId) -> HudResult<bool> {
        if let Some(cached) = self.container(container)?.overlapping {
            return Ok(cached);
        }
        let areas: Vec<Rect> = self
            .container(container)?
            .children
            .iter()
            .filter_map(|&c| self.nodes.get(c))
            .filter(|n| n.base.visible)
            .map(|n| Rect::from_origin_size(n.base.location(), n.base.pick_size()))
            .collect();
        let overlapping = areas
            .iter()
            .enumerate()
            .any(|(i, a)| areas[i + 1..].iter().any(|b| a.overlaps(b)));
        self.container_mut(container)?.overlapping = Some(overlapping);
        Ok(overlapping)
    }

    /// Reject `child` if it already has a parent or would create a cycle.
    pub(crate) fn check_adoptable(&self, parent: WidgetId, child: WidgetId) -> HudResult<()> {
        let base = &self.node(child)?.base;
        if base.parent().is_some() || child == self.root {
            return Err(HudError::already_owned(child));
        }
        if self.is_ancestor_or_self(child, parent) {
            return Err(HudError::circular_hierarchy(child));
        }
        Ok(())
    }

    /// Mark the layout of `id` stale if it is a container.
    pub(crate) fn invalidate_layout(&mut self, id: WidgetId) {
        if let Some(data) = self.nodes.get_mut(id).and_then(|n| n.container.as_mut()) {
            data.layout_dirty = true;
        }
    }

    /// Drop the overlap cache of the container holding `child`.
    pub(crate) fn invalidate_overlap(&mut self, child: WidgetId) {
        let Some(container) = self.nodes.get(child).and_then(|n| n.base.container) else {
            return;
        };
        if let Some(data) = self.nodes.get_mut(container).and_then(|n| n.container.as_mut()) {
            data.overlapping = None;
        }
    }

    /// Run the container's layout manager if its layout is stale.
    pub(crate) fn apply_layout(&mut self, id: WidgetId) -> HudResult<()> {
        let Some(data) = self.node_mut(id)?.container.as_mut() else {
            return Ok(());
        };
        if !std::mem::take(&mut data.layout_dirty) {
            return Ok(());
        }
        let Some(mut layout) = data.layout.take() else {
            return Ok(());
        };

        let content = self.internal_size(id)?;
        let items: Vec<LayoutItem> = self
            .container(id)?
            .children
            .iter()
            .filter_map(|&child| {
                let base = &self.nodes.get(child)?.base;
                Some(LayoutItem {
                    id: child,
                    location: base.location(),
                    size: base.size(),
                    visible: base.visible,
                })
            })
            .collect();
        let rects = layout.layout(content, &items);
        if let Some(data) = self.nodes.get_mut(id).and_then(|n| n.container.as_mut()) {
            data.layout = Some(layout);
        }

        trace!(target: targets::WIDGET, container = ?id, items = items.len(), "applied layout");
        for (item, rect) in items.iter().zip(rects) {
            self.set_location(item.id, rect.origin)?;
            self.set_size(item.id, rect.size)?;
        }
        Ok(())
    }
}
