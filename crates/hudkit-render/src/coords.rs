//! Root-level coordinate conversion.
//!
//! Three spaces meet at the root of a HUD:
//!
//! - **pixel space**: physical canvas pixels, top-left origin, y down;
//! - **HUD space**: the root's resolution-independent space, top-left
//!   origin, y down, spanning [`CoordinatesConverter::hud_resolution`];
//! - **scenegraph space**: the engine's local units, origin at the canvas
//!   centre, y up.
//!
//! Nested containers remap HUD space further; that chain lives in the widget
//! tree. The converter only supplies the base mapping for the whole tree.

use crate::types::{Point, Size};

/// The base pixel/HUD/scenegraph mapping for a HUD.
pub trait CoordinatesConverter {
    /// Canvas size in pixels.
    fn pixel_resolution(&self) -> Size;

    /// Size of the root HUD space.
    fn hud_resolution(&self) -> Size;

    /// Convert a canvas pixel position to root HUD space.
    fn pixels_to_hud(&self, point: Point) -> Point;

    /// Convert a root HUD position to canvas pixels.
    fn hud_to_pixels(&self, point: Point) -> Point;

    /// Convert a canvas pixel position to scenegraph space.
    fn pixels_to_scenegraph(&self, point: Point) -> glam::Vec2;

    /// Convert a scenegraph position to canvas pixels.
    fn scenegraph_to_pixels(&self, point: glam::Vec2) -> Point;

    /// Convert a pixel extent to a scenegraph extent.
    fn pixel_size_to_scenegraph(&self, size: Size) -> glam::Vec2;
}

/// A linear converter for a flat screen-aligned canvas.
///
/// One scenegraph unit spans half the canvas height, so the visible
/// scenegraph range is `[-1, 1]` vertically and `[-aspect, aspect]`
/// horizontally.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenConverter {
    pixels: Size,
    hud: Size,
}

impl ScreenConverter {
    /// Create a converter whose HUD space matches the canvas pixels.
    pub fn new(pixel_resolution: Size) -> Self {
        Self {
            pixels: pixel_resolution,
            hud: pixel_resolution,
        }
    }

    /// Create a converter with a custom root HUD resolution.
    pub fn with_hud_resolution(pixel_resolution: Size, hud_resolution: Size) -> Self {
        Self {
            pixels: pixel_resolution,
            hud: hud_resolution,
        }
    }

    /// Update the canvas size, keeping the HUD resolution.
    pub fn set_pixel_resolution(&mut self, pixel_resolution: Size) {
        self.pixels = pixel_resolution;
    }

    fn scale_hud_per_pixel(&self) -> (f32, f32) {
        (
            ratio(self.hud.width, self.pixels.width),
            ratio(self.hud.height, self.pixels.height),
        )
    }

    fn scenegraph_unit(&self) -> f32 {
        (self.pixels.height / 2.0).max(f32::EPSILON)
    }
}

fn ratio(num: f32, den: f32) -> f32 {
    if den == 0.0 { 0.0 } else { num / den }
}

impl CoordinatesConverter for ScreenConverter {
    fn pixel_resolution(&self) -> Size {
        self.pixels
    }

    fn hud_resolution(&self) -> Size {
        self.hud
    }

    fn pixels_to_hud(&self, point: Point) -> Point {
        let (sx, sy) = self.scale_hud_per_pixel();
        point.scale(sx, sy)
    }

    fn hud_to_pixels(&self, point: Point) -> Point {
        Point::new(
            ratio(point.x * self.pixels.width, self.hud.width),
            ratio(point.y * self.pixels.height, self.hud.height),
        )
    }

    fn pixels_to_scenegraph(&self, point: Point) -> glam::Vec2 {
        let unit = self.scenegraph_unit();
        glam::Vec2::new(
            (point.x - self.pixels.width / 2.0) / unit,
            (self.pixels.height / 2.0 - point.y) / unit,
        )
    }

    fn scenegraph_to_pixels(&self, point: glam::Vec2) -> Point {
        let unit = self.scenegraph_unit();
        Point::new(
            point.x * unit + self.pixels.width / 2.0,
            self.pixels.height / 2.0 - point.y * unit,
        )
    }

    fn pixel_size_to_scenegraph(&self, size: Size) -> glam::Vec2 {
        let unit = self.scenegraph_unit();
        glam::Vec2::new(size.width / unit, size.height / unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-4 && (a.y - b.y).abs() < 1e-4
    }

    #[test]
    fn test_hud_pixel_round_trip() {
        let conv = ScreenConverter::with_hud_resolution(Size::new(1920.0, 1080.0), Size::new(800.0, 600.0));
        let p = Point::new(333.0, 222.0);
        assert!(approx(conv.pixels_to_hud(conv.hud_to_pixels(p)), p));
        assert!(approx(conv.hud_to_pixels(Point::new(800.0, 600.0)), Point::new(1920.0, 1080.0)));
    }

    #[test]
    fn test_scenegraph_origin_is_canvas_centre() {
        let conv = ScreenConverter::new(Size::new(800.0, 600.0));
        assert_eq!(conv.pixels_to_scenegraph(Point::new(400.0, 300.0)), glam::Vec2::ZERO);
        assert_eq!(conv.pixels_to_scenegraph(Point::new(400.0, 0.0)), glam::Vec2::new(0.0, 1.0));

        let p = Point::new(12.0, 590.0);
        assert!(approx(conv.scenegraph_to_pixels(conv.pixels_to_scenegraph(p)), p));
    }

    #[test]
    fn test_scenegraph_size() {
        let conv = ScreenConverter::new(Size::new(800.0, 600.0));
        assert_eq!(
            conv.pixel_size_to_scenegraph(Size::new(300.0, 150.0)),
            glam::Vec2::new(1.0, 0.5)
        );
    }
}
