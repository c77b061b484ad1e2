//! Drawable surface contracts.
//!
//! Every heavyweight widget owns one [`DrawSurface`]: an independently drawn
//! texture placed in the 3D scene. Lightweight widgets draw into the surface
//! of their host. Surfaces are created on demand through a [`SurfaceFactory`]
//! supplied by the engine integration.
//!
//! All drawing coordinates are surface pixels with a top-left origin.

use crate::error::RenderResult;
use crate::types::{Color, Point, Rect};

/// Handle to an image owned by the rendering backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageId(pub u32);

/// Spatial placement of a surface in the scenegraph.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScenePlacement {
    /// Top-left corner in scenegraph units. `z` carries the layering depth.
    pub translation: glam::Vec3,
    /// Extent in scenegraph units.
    pub size: glam::Vec2,
    /// Position of the surface in the scene's back-to-front draw order.
    pub order: usize,
}

/// A drawable texture surface.
pub trait DrawSurface {
    /// Surface size in pixels.
    fn size(&self) -> (u32, u32);

    /// Resize the backing texture. Contents are undefined until the next redraw.
    fn resize(&mut self, width: u32, height: u32);

    /// The active clip rectangle, or `None` when unclipped.
    fn clip_rect(&self) -> Option<Rect>;

    /// Replace the active clip rectangle.
    ///
    /// Prefer [`ClipScope`], which only ever narrows the clip.
    fn set_clip_rect(&mut self, clip: Option<Rect>);

    /// Clear the whole surface, ignoring the clip.
    fn clear(&mut self, color: Color);

    /// Fill a rectangle, respecting the clip.
    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Blit a backend image scaled into `dest`, respecting the clip.
    fn draw_image(&mut self, image: ImageId, dest: Rect);

    /// Draw a run of text with its top-left at `origin`. Glyph shaping is the
    /// backend's business.
    fn draw_text(&mut self, text: &str, origin: Point, color: Color);

    /// Move the surface in the scene.
    fn set_placement(&mut self, placement: ScenePlacement);

    /// Show or hide the surface in the scene.
    fn set_visible(&mut self, visible: bool);

    /// Finish a redraw and hand the texture to the scene.
    fn present(&mut self);
}

/// Creates surfaces for heavyweight widgets.
pub trait SurfaceFactory {
    /// Create a surface of the given pixel size.
    fn create_surface(&mut self, width: u32, height: u32) -> RenderResult<Box<dyn DrawSurface>>;
}

/// A scoped clip on a surface.
///
/// Pushing a scope intersects the requested rectangle with the current clip,
/// so a nested scope can only narrow what is drawable. Dropping the scope
/// restores the clip that was active before it.
///
/// ```
/// use hudkit_render::{ClipScope, DrawSurface, Rect, RecordingSurface};
///
/// let mut surface = RecordingSurface::new(100, 100);
/// {
///     let mut outer = ClipScope::push(&mut surface, Rect::new(0.0, 0.0, 50.0, 50.0));
///     let inner = ClipScope::push(outer.surface(), Rect::new(25.0, 25.0, 50.0, 50.0));
///     assert_eq!(inner.clip(), Rect::new(25.0, 25.0, 25.0, 25.0));
/// }
/// assert_eq!(surface.clip_rect(), None);
/// ```
pub struct ClipScope<'a> {
    surface: &'a mut dyn DrawSurface,
    previous: Option<Rect>,
    clip: Rect,
}

impl<'a> ClipScope<'a> {
    /// Narrow the clip of `surface` to `rect` until the scope is dropped.
    pub fn push(surface: &'a mut dyn DrawSurface, rect: Rect) -> Self {
        let previous = surface.clip_rect();
        let clip = match previous {
            // An empty intersection keeps the origin so later narrowing stays empty.
            Some(current) => current
                .intersect(&rect)
                .unwrap_or(Rect::from_origin_size(rect.origin, Default::default())),
            None => rect,
        };
        surface.set_clip_rect(Some(clip));
        Self {
            surface,
            previous,
            clip,
        }
    }

    /// The effective clip inside this scope.
    pub fn clip(&self) -> Rect {
        self.clip
    }

    /// Whether nothing inside this scope can be drawn.
    pub fn is_empty(&self) -> bool {
        self.clip.is_empty()
    }

    /// The clipped surface.
    pub fn surface(&mut self) -> &mut dyn DrawSurface {
        &mut *self.surface
    }
}

impl Drop for ClipScope<'_> {
    fn drop(&mut self) {
        self.surface.set_clip_rect(self.previous);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::RecordingSurface;

    #[test]
    fn test_clip_never_expands() {
        let mut surface = RecordingSurface::new(200, 200);
        let mut outer = ClipScope::push(&mut surface, Rect::new(10.0, 10.0, 50.0, 50.0));
        let inner = ClipScope::push(outer.surface(), Rect::new(0.0, 0.0, 500.0, 500.0));
        assert_eq!(inner.clip(), Rect::new(10.0, 10.0, 50.0, 50.0));
    }

    #[test]
    fn test_disjoint_clip_is_empty() {
        let mut surface = RecordingSurface::new(200, 200);
        let mut outer = ClipScope::push(&mut surface, Rect::new(0.0, 0.0, 10.0, 10.0));
        let inner = ClipScope::push(outer.surface(), Rect::new(50.0, 50.0, 10.0, 10.0));
        assert!(inner.is_empty());
    }

    #[test]
    fn test_clip_restored_on_drop() {
        let mut surface = RecordingSurface::new(200, 200);
        {
            let mut outer = ClipScope::push(&mut surface, Rect::new(0.0, 0.0, 100.0, 100.0));
            {
                let _inner = ClipScope::push(outer.surface(), Rect::new(0.0, 0.0, 10.0, 10.0));
            }
            assert_eq!(
                outer.surface().clip_rect(),
                Some(Rect::new(0.0, 0.0, 100.0, 100.0))
            );
        }
        assert_eq!(surface.clip_rect(), None);
    }
}
