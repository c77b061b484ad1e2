//! Layout manager contract.
//!
//! hudkit ships no concrete layouts. A container may carry a
//! [`LayoutManager`]; when its layout is invalidated (children added or
//! removed, the container resized, padding or resolution changed) the next
//! [`Hud::update`](super::Hud::update) hands the manager the container's
//! internal size and one [`LayoutItem`] per child, and applies the returned
//! rectangles as the children's new bounds.

use hudkit_render::{Point, Rect, Size};

use super::WidgetId;

/// A child as seen by a layout manager.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutItem {
    pub id: WidgetId,
    /// Current location in the container's internal space.
    pub location: Point,
    /// Current size in the container's internal space.
    pub size: Size,
    pub visible: bool,
}

/// Positions the children of one container.
pub trait LayoutManager {
    /// Compute the bounds of every item, in the container's internal space.
    ///
    /// The result pairs with `items` by index. Missing entries leave the
    /// corresponding child where it is.
    fn layout(&mut self, content_size: Size, items: &[LayoutItem]) -> Vec<Rect>;
}

/// A layout that leaves every child where it is.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullLayout;

impl LayoutManager for NullLayout {
    fn layout(&mut self, _content_size: Size, items: &[LayoutItem]) -> Vec<Rect> {
        items
            .iter()
            .map(|item| Rect::from_origin_size(item.location, item.size))
            .collect()
    }
}
