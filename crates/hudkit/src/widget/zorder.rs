//! Z-ordering of siblings and of heavyweight surfaces.
//!
//! A z-index only orders a widget among its siblings: the children of one
//! container, or the assembled widgets of one owner. Each scope keeps a
//! lazily refreshed copy of its list, stably sorted by z-index, so widgets
//! with equal z keep their insertion order. The last entry is the topmost.
//!
//! Heavyweight surfaces are ordered across the whole HUD by their
//! [`ZIndexPath`].

use hudkit_core::logging::targets;
use hudkit_core::{HudError, HudResult};
use tracing::trace;

use super::base::{Positioned, Sizable};
use super::hud::Scope;
use super::{Hud, WidgetId};

/// The z-indices from the root's child down to a widget.
///
/// Paths compare lexicographically; at an equal prefix the shorter path
/// orders first, so a heavyweight widget sits below heavyweight widgets
/// nested inside it.
///
/// ```
/// use hudkit::ZIndexPath;
///
/// let window = ZIndexPath::new(vec![1]);
/// let nested = ZIndexPath::new(vec![1, 0]);
/// let above = ZIndexPath::new(vec![2]);
/// assert!(window < nested);
/// assert!(nested < above);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ZIndexPath(Vec<i32>);

impl ZIndexPath {
    pub fn new(path: Vec<i32>) -> Self {
        Self(path)
    }

    pub fn as_slice(&self) -> &[i32] {
        &self.0
    }

    /// Number of scopes between the root and the widget.
    pub fn depth(&self) -> usize {
        self.0.len()
    }
}

impl Hud {
    /// The z-index path of a widget.
    pub fn z_index_path(&self, id: WidgetId) -> HudResult<ZIndexPath> {
        self.node(id)?;
        let path = self
            .path_from_root(id)
            .into_iter()
            .filter_map(|w| self.nodes.get(w).map(|n| n.base.z_index()))
            .collect();
        Ok(ZIndexPath(path))
    }

    /// Attached heavyweight widgets back to front.
    ///
    /// Widgets with equal paths keep their registration order.
    pub fn scene_order(&mut self) -> Vec<WidgetId> {
        if !self.scene_sorted {
            let mut keyed: Vec<(ZIndexPath, WidgetId)> = self
                .heavyweights
                .iter()
                .filter_map(|&id| Some((self.z_index_path(id).ok()?, id)))
                .collect();
            keyed.sort_by(|a, b| a.0.cmp(&b.0));
            self.scene = keyed.into_iter().map(|(_, id)| id).collect();
            self.scene_sorted = true;
            trace!(target: targets::DRAW, surfaces = self.scene.len(), "sorted scene");
        }
        self.scene.clone()
    }

    /// Mark the sibling scope holding `id` unsorted.
    pub(crate) fn mark_scope_unsorted(&mut self, id: WidgetId) {
        let Some((parent, scope)) = self.scope_of(id) else {
            return;
        };
        let Some(node) = self.nodes.get_mut(parent) else {
            return;
        };
        match scope {
            Scope::Children => {
                if let Some(container) = node.container.as_mut() {
                    container.widgets_sorted = false;
                }
            }
            Scope::Assembly => node.assembler.widgets_sorted = false,
        }
    }

    fn sorted_by_z(&self, ids: &[WidgetId]) -> Vec<WidgetId> {
        let mut sorted = ids.to_vec();
        sorted.sort_by_key(|&id| self.nodes.get(id).map_or(0, |n| n.base.z_index()));
        sorted
    }

    /// Refresh the sorted caches of one widget's two scopes.
    pub(crate) fn refresh_z_order(&mut self, id: WidgetId) -> HudResult<()> {
        let node = self.node(id)?;
        let children = node
            .container
            .as_ref()
            .filter(|c| !c.widgets_sorted)
            .map(|c| self.sorted_by_z(&c.children));
        let assembled =
            (!node.assembler.widgets_sorted).then(|| self.sorted_by_z(node.assembler.widgets()));

        let node = self.node_mut(id)?;
        if let (Some(sorted), Some(container)) = (children, node.container.as_mut()) {
            container.sorted = sorted;
            container.widgets_sorted = true;
        }
        if let Some(sorted) = assembled {
            node.assembler.sorted = sorted;
            node.assembler.widgets_sorted = true;
        }
        Ok(())
    }

    /// Refresh every sorted cache below `id`.
    pub(crate) fn refresh_z_order_subtree(&mut self, id: WidgetId) -> HudResult<()> {
        self.refresh_z_order(id)?;
        for child in self.node(id)?.subtree_children() {
            self.refresh_z_order_subtree(child)?;
        }
        Ok(())
    }

    /// Container children in paint order, as last refreshed.
    pub(crate) fn sorted_children(&self, id: WidgetId) -> &[WidgetId] {
        self.nodes
            .get(id)
            .and_then(|n| n.container.as_ref())
            .map_or(&[], |c| c.sorted.as_slice())
    }

    /// Assembled widgets in paint order, as last refreshed.
    pub(crate) fn sorted_assembled(&self, id: WidgetId) -> &[WidgetId] {
        self.nodes
            .get(id)
            .map_or(&[], |n| n.assembler.sorted.as_slice())
    }

    /// Pixel size of a heavyweight surface. Never smaller than 1x1.
    pub(crate) fn surface_pixel_size(&self, id: WidgetId) -> HudResult<(u32, u32)> {
        let size = self.hud_size_to_pixels(id, self.node(id)?.base.size())?;
        Ok((
            (size.width.ceil() as u32).max(1),
            (size.height.ceil() as u32).max(1),
        ))
    }

    /// Create the surface of a heavyweight widget and add it to the scene.
    pub(crate) fn register_heavyweight(&mut self, id: WidgetId) -> HudResult<()> {
        let (width, height) = self.surface_pixel_size(id)?;
        let surface = self
            .surfaces
            .create_surface(width, height)
            .map_err(|e| HudError::Surface(e.to_string()))?;

        let min_interval = self.config.min_redraw_interval();
        let heavy = self
            .node_mut(id)?
            .heavy
            .get_or_insert_with(|| super::redraw::HeavyweightState::new(min_interval));
        heavy.surface = Some(surface);
        heavy.scheduler.reset();
        heavy.scheduler.mark_dirty();

        if !self.heavyweights.contains(&id) {
            self.heavyweights.push(id);
        }
        self.scene_sorted = false;
        trace!(target: targets::DRAW, widget = ?id, width, height, "registered surface");
        Ok(())
    }
}
