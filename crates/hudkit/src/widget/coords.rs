//! The coordinate transform chain.
//!
//! Every widget position is expressed in its *parent space*: the internal
//! space of its container, or for an assembled widget the parent space of
//! its owner. A widget's *local* space is its parent space moved so that the
//! widget's top-left corner is the origin.
//!
//! Converting to canvas pixels walks container by container up to the root,
//! whose internal space is the HUD space of the [`CoordinatesConverter`].
//! Each container maps its internal space onto its content area:
//!
//! ```text
//! parent = location + (border + padding).top_left + internal * scale
//! scale  = content_size / resolution   (1 without a resolution)
//! ```
//!
//! All conversions fail with [`HudError::NotAttached`] on a widget that is
//! not reachable from the root.
//!
//! [`CoordinatesConverter`]: hudkit_render::CoordinatesConverter

use hudkit_core::{HudError, HudResult};
use hudkit_render::{Insets, Point, Size};

use super::base::{BackgroundSettable, Positioned, Sizable};
use super::hud::{Scope, hud_per_pixel};
use super::{Hud, WidgetId};

fn ratio(num: f32, den: f32) -> f32 {
    if den != 0.0 { num / den } else { 0.0 }
}

impl Hud {
    fn require_attached(&self, id: WidgetId) -> HudResult<()> {
        if self.node(id)?.base.attached {
            Ok(())
        } else {
            Err(HudError::not_attached(id))
        }
    }

    /// Border plus padding of a container.
    pub(crate) fn content_insets(&self, id: WidgetId) -> HudResult<Insets> {
        let node = self.node(id)?;
        let padding = node.container.as_ref().map(|c| c.padding).unwrap_or(Insets::ZERO);
        Ok(node.base.border_insets().combine(padding))
    }

    /// Size of the content area in the widget's parent space.
    pub(crate) fn content_size(&self, id: WidgetId) -> HudResult<Size> {
        Ok(self.node(id)?.base.size().shrink(self.content_insets(id)?))
    }

    /// Extent of a container's internal space.
    pub fn internal_size(&self, container: WidgetId) -> HudResult<Size> {
        if container == self.root {
            return Ok(self.converter.hud_resolution());
        }
        match self.container(container)?.resolution {
            Some(resolution) => Ok(resolution),
            None => self.content_size(container),
        }
    }

    /// Parent-space units per internal unit of a container.
    pub(crate) fn internal_scale(&self, container: WidgetId) -> HudResult<(f32, f32)> {
        match self.container(container)?.resolution {
            Some(resolution) if container != self.root => {
                let content = self.content_size(container)?;
                Ok((
                    ratio(content.width, resolution.width),
                    ratio(content.height, resolution.height),
                ))
            }
            _ => Ok((1.0, 1.0)),
        }
    }

    fn internal_to_pixels(&self, container: WidgetId, point: Point) -> HudResult<Point> {
        if container == self.root {
            return Ok(self.converter.hud_to_pixels(point));
        }
        let insets = self.content_insets(container)?;
        let (sx, sy) = self.internal_scale(container)?;
        let parent = self.node(container)?.base.location()
            + Point::new(insets.left, insets.top)
            + point.scale(sx, sy);
        self.parent_space_to_pixels(container, parent)
    }

    fn pixels_to_internal(&self, container: WidgetId, pixels: Point) -> HudResult<Point> {
        if container == self.root {
            return Ok(self.converter.pixels_to_hud(pixels));
        }
        let insets = self.content_insets(container)?;
        let (sx, sy) = self.internal_scale(container)?;
        let offset = self.pixels_to_parent_space(container, pixels)?
            - self.node(container)?.base.location()
            - Point::new(insets.left, insets.top);
        Ok(Point::new(ratio(offset.x, sx), ratio(offset.y, sy)))
    }

    /// Map a point of the widget's parent space to canvas pixels.
    pub fn parent_space_to_pixels(&self, id: WidgetId, point: Point) -> HudResult<Point> {
        self.require_attached(id)?;
        match self.scope_of(id) {
            Some((container, Scope::Children)) => self.internal_to_pixels(container, point),
            Some((owner, Scope::Assembly)) => self.parent_space_to_pixels(owner, point),
            None if id == self.root => Ok(self.converter.hud_to_pixels(point)),
            None => Err(HudError::not_attached(id)),
        }
    }

    /// Map canvas pixels into the widget's parent space.
    pub fn pixels_to_parent_space(&self, id: WidgetId, pixels: Point) -> HudResult<Point> {
        self.require_attached(id)?;
        match self.scope_of(id) {
            Some((container, Scope::Children)) => self.pixels_to_internal(container, pixels),
            Some((owner, Scope::Assembly)) => self.pixels_to_parent_space(owner, pixels),
            None if id == self.root => Ok(self.converter.pixels_to_hud(pixels)),
            None => Err(HudError::not_attached(id)),
        }
    }

    /// Map a local point to canvas pixels.
    pub fn local_to_pixels(&self, id: WidgetId, local: Point) -> HudResult<Point> {
        let location = self.node(id)?.base.location();
        self.parent_space_to_pixels(id, location + local)
    }

    /// Map canvas pixels to the widget's local space.
    pub fn pixels_to_local(&self, id: WidgetId, pixels: Point) -> HudResult<Point> {
        let parent = self.pixels_to_parent_space(id, pixels)?;
        Ok(parent - self.node(id)?.base.location())
    }

    /// Map a local point to the widget's parent space.
    pub fn local_to_parent_space(&self, id: WidgetId, local: Point) -> HudResult<Point> {
        self.require_attached(id)?;
        Ok(self.node(id)?.base.location() + local)
    }

    /// Convert an extent in the widget's local space to pixels.
    pub fn hud_size_to_pixels(&self, id: WidgetId, size: Size) -> HudResult<Size> {
        self.require_attached(id)?;
        let (ux, uy) = self.node(id)?.base.units_per_pixel;
        Ok(Size::new(ratio(size.width, ux), ratio(size.height, uy)))
    }

    /// Convert a pixel extent to the widget's local space.
    pub fn pixels_size_to_hud(&self, id: WidgetId, size: Size) -> HudResult<Size> {
        self.require_attached(id)?;
        let (ux, uy) = self.node(id)?.base.units_per_pixel;
        Ok(size.scale(ux, uy))
    }

    /// Map a local point into scenegraph space.
    pub fn local_to_scenegraph(&self, id: WidgetId, local: Point) -> HudResult<glam::Vec2> {
        let pixels = self.local_to_pixels(id, local)?;
        Ok(self.converter.pixels_to_scenegraph(pixels))
    }

    /// Map a scenegraph point into the widget's local space.
    pub fn scenegraph_to_local(&self, id: WidgetId, point: glam::Vec2) -> HudResult<Point> {
        let pixels = self.converter.scenegraph_to_pixels(point);
        self.pixels_to_local(id, pixels)
    }

    /// Cached HUD units per pixel of the widget's parent space.
    pub fn units_per_pixel(&self, id: WidgetId) -> HudResult<(f32, f32)> {
        self.require_attached(id)?;
        Ok(self.node(id)?.base.units_per_pixel)
    }

    /// Recompute the cached factors of a widget and its whole subtree.
    pub(crate) fn update_size_factors(&mut self, id: WidgetId) -> HudResult<()> {
        if !self.is_attached(id) {
            return Ok(());
        }
        self.refresh_size_factors(id)?;
        for child in self.node(id)?.subtree_children() {
            self.update_size_factors(child)?;
        }
        Ok(())
    }

    /// Recompute the cached factors of one widget from its parent.
    pub(crate) fn refresh_size_factors(&mut self, id: WidgetId) -> HudResult<()> {
        let root_factor = hud_per_pixel(self.converter.as_ref());
        let own = match self.scope_of(id) {
            Some((container, Scope::Children)) => self.container(container)?.internal_units_per_pixel,
            Some((owner, Scope::Assembly)) => self.node(owner)?.base.units_per_pixel,
            None => root_factor,
        };
        let internal = if id == self.root {
            Some(root_factor)
        } else if self.node(id)?.container.is_some() {
            let (sx, sy) = self.internal_scale(id)?;
            Some((ratio(own.0, sx), ratio(own.1, sy)))
        } else {
            None
        };

        let node = self.node_mut(id)?;
        node.base.units_per_pixel = own;
        if let (Some(container), Some(internal)) = (node.container.as_mut(), internal) {
            container.internal_units_per_pixel = internal;
        }
        Ok(())
    }
}
