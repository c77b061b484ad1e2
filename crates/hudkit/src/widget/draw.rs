//! Frame rendering.
//!
//! [`Hud::render_frame`] walks the heavyweight widgets in scene order. Each
//! one is placed in the scene, and redrawn when its [`RedrawScheduler`]
//! allows it. A redraw paints the heavyweight widget followed by every
//! lightweight widget hosted in it, each in five clipped phases:
//!
//! 1. background, over the full bounds;
//! 2. the content's `paint` hook, inside the border;
//! 3. visible lightweight children in z-order, inside the content area;
//! 4. assembled widgets in z-order, over the full bounds;
//! 5. the border.
//!
//! Clips only ever narrow, so nothing a widget draws leaks outside its
//! ancestors.
//!
//! [`RedrawScheduler`]: super::RedrawScheduler

use std::time::Duration;

use hudkit_core::HudResult;
use hudkit_core::logging::targets;
use hudkit_render::{ClipScope, Color, DrawSurface, Point, Rect, ScenePlacement, Size};
use tracing::trace;

use super::base::{Background, BackgroundSettable, Sizable};
use super::traits::PaintContext;
use super::{Hud, WidgetId};

/// Statistics from one [`Hud::render_frame`] pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameStats {
    /// Surfaces repainted this frame.
    pub redrawn: usize,
    /// Surfaces left as they were.
    pub skipped: usize,
}

impl FrameStats {
    /// Total surfaces visited.
    pub fn total(&self) -> usize {
        self.redrawn + self.skipped
    }
}

/// Maps local rectangles of one widget onto its host surface.
#[derive(Debug, Clone, Copy)]
struct SurfaceMapping {
    origin: Point,
    scale: (f32, f32),
}

impl SurfaceMapping {
    fn rect(&self, local: Rect) -> Rect {
        Rect::from_origin_size(
            self.origin + local.origin.scale(self.scale.0, self.scale.1),
            local.size.scale(self.scale.0, self.scale.1),
        )
    }
}

fn inverse(units_per_pixel: (f32, f32)) -> (f32, f32) {
    let inv = |v: f32| if v != 0.0 { 1.0 / v } else { 0.0 };
    (inv(units_per_pixel.0), inv(units_per_pixel.1))
}

impl Hud {
    /// Place, and where due redraw, every heavyweight surface.
    #[tracing::instrument(target = "hudkit::draw", level = "trace", skip(self))]
    pub fn render_frame(&mut self, now: Duration) -> HudResult<FrameStats> {
        let mut stats = FrameStats::default();
        for (index, id) in self.scene_order().into_iter().enumerate() {
            self.place_surface(id, index)?;

            let showing = self.is_showing(id);
            let Some(heavy) = self.node_mut(id)?.heavy.as_mut() else {
                continue;
            };
            if heavy.shown != showing {
                if let Some(surface) = heavy.surface.as_mut() {
                    surface.set_visible(showing);
                }
                heavy.shown = showing;
            }
            if !showing || !heavy.scheduler.should_redraw(now) {
                stats.skipped += 1;
                continue;
            }

            self.redraw_surface(id)?;
            self.clear_dirty(id);
            if let Some(heavy) = self.node_mut(id)?.heavy.as_mut() {
                heavy.scheduler.redrawn(now);
            }
            stats.redrawn += 1;
        }
        Ok(stats)
    }

    /// Keep the surface size and scene placement in step with the widget.
    fn place_surface(&mut self, id: WidgetId, order: usize) -> HudResult<()> {
        let (width, height) = self.surface_pixel_size(id)?;
        let top_left = self.local_to_pixels(id, Point::ZERO)?;
        let pixel_size = self.hud_size_to_pixels(id, self.node(id)?.base.size())?;
        let translation = self.converter.pixels_to_scenegraph(top_left);
        let placement = ScenePlacement {
            translation: translation.extend(order as f32),
            size: self.converter.pixel_size_to_scenegraph(pixel_size),
            order,
        };

        let Some(heavy) = self.node_mut(id)?.heavy.as_mut() else {
            return Ok(());
        };
        let Some(surface) = heavy.surface.as_mut() else {
            return Ok(());
        };
        if surface.size() != (width, height) {
            surface.resize(width, height);
            heavy.scheduler.mark_dirty();
        }
        if heavy.placement != Some(placement) {
            surface.set_placement(placement);
            heavy.placement = Some(placement);
        }
        Ok(())
    }

    fn redraw_surface(&mut self, id: WidgetId) -> HudResult<()> {
        self.refresh_z_order_subtree(id)?;
        let Some(mut surface) = self
            .node_mut(id)?
            .heavy
            .as_mut()
            .and_then(|h| h.surface.take())
        else {
            return Ok(());
        };

        surface.set_clip_rect(None);
        surface.clear(Color::TRANSPARENT);
        let result = self
            .local_to_pixels(id, Point::ZERO)
            .and_then(|host_origin| self.draw_widget(id, surface.as_mut(), host_origin));
        surface.present();
        trace!(target: targets::DRAW, widget = ?id, ok = result.is_ok(), "redrew surface");

        if let Some(heavy) = self.nodes.get_mut(id).and_then(|n| n.heavy.as_mut()) {
            heavy.surface = Some(surface);
        }
        result
    }

    fn draw_widget(
        &self,
        id: WidgetId,
        surface: &mut dyn DrawSurface,
        host_origin: Point,
    ) -> HudResult<()> {
        let node = self.node(id)?;
        let base = &node.base;
        let size = base.size();
        let map = SurfaceMapping {
            origin: self.local_to_pixels(id, Point::ZERO)? - host_origin,
            scale: inverse(base.units_per_pixel),
        };
        let full = Rect::from_origin_size(Point::ZERO, size);

        let mut bounds = ClipScope::push(surface, map.rect(full));
        if bounds.is_empty() {
            return Ok(());
        }

        match base.background() {
            Some(Background::Color(color)) => bounds.surface().fill_rect(map.rect(full), color),
            Some(Background::Image(image)) => bounds.surface().draw_image(image, map.rect(full)),
            None => {}
        }

        let border = base.border_insets();
        if let Some(content) = node.content.as_ref() {
            let inner = Rect::from_origin_size(Point::new(border.left, border.top), size.shrink(border));
            let mut clip = ClipScope::push(bounds.surface(), map.rect(inner));
            if !clip.is_empty() {
                let mut ctx = PaintContext::new(clip.surface(), map.origin, map.scale, size, base.has_focus);
                content.paint(self, id, &mut ctx);
            }
        }

        if node.container.is_some() {
            let insets = self.content_insets(id)?;
            let area = Rect::from_origin_size(Point::new(insets.left, insets.top), size.shrink(insets));
            let mut clip = ClipScope::push(bounds.surface(), map.rect(area));
            if !clip.is_empty() {
                for &child in self.sorted_children(id) {
                    let Some(child_node) = self.nodes.get(child) else {
                        continue;
                    };
                    if child_node.base.visible && !child_node.base.heavyweight {
                        self.draw_widget(child, clip.surface(), host_origin)?;
                    }
                }
            }
        }

        for &sub in self.sorted_assembled(id) {
            if self.nodes.get(sub).is_some_and(|n| n.base.visible) {
                self.draw_widget(sub, bounds.surface(), host_origin)?;
            }
        }

        if let Some(frame) = base.border() {
            for side in border_rects(size, frame.insets) {
                if !side.is_empty() {
                    bounds.surface().fill_rect(map.rect(side), frame.color);
                }
            }
        }
        Ok(())
    }
}

/// The four sides of a border, in local space.
fn border_rects(size: Size, insets: hudkit_render::Insets) -> [Rect; 4] {
    let middle = (size.height - insets.vertical()).max(0.0);
    [
        Rect::new(0.0, 0.0, size.width, insets.top),
        Rect::new(0.0, size.height - insets.bottom, size.width, insets.bottom),
        Rect::new(0.0, insets.top, insets.left, middle),
        Rect::new(size.width - insets.right, insets.top, insets.right, middle),
    ]
}
