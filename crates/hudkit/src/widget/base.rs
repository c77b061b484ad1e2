//! Widget base data and capability traits.
//!
//! Every node in a [`Hud`](super::Hud) carries one [`WidgetBase`]: geometry,
//! flags, dirty state, tree links and notification signals. The capability
//! traits ([`Positioned`], [`Sizable`], [`BackgroundSettable`], [`Pickable`])
//! expose that data by concern.
//!
//! The trait setters only record the new value and report whether it
//! changed. Appearance changes must go through the `Hud` mutators of the same
//! name, which also mark textures dirty, move assembled widgets and refresh
//! coordinate caches.

use hudkit_core::Signal;
use hudkit_render::{Color, ImageId, Insets, Point, Rect, Size};

use super::WidgetId;

/// A solid frame drawn inside a widget's bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Border {
    /// Thickness of each side, in the widget's parent HUD units.
    pub insets: Insets,
    /// Fill color of the frame.
    pub color: Color,
}

impl Border {
    /// A border of equal thickness on every side.
    pub fn uniform(width: f32, color: Color) -> Self {
        Self {
            insets: Insets::uniform(width),
            color,
        }
    }
}

/// What fills a widget's bounds before its content is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Background {
    /// A solid color.
    Color(Color),
    /// A backend image scaled to the bounds.
    Image(ImageId),
}

/// Position and layering within the parent space.
pub trait Positioned {
    /// Top-left corner in the parent space.
    fn location(&self) -> Point;

    /// Record a new location. Returns whether it changed.
    fn set_location(&mut self, location: Point) -> bool;

    /// Paint and pick order within the sibling scope.
    fn z_index(&self) -> i32;

    /// Record a new z-index. Returns whether it changed.
    fn set_z_index(&mut self, z_index: i32) -> bool;
}

/// Extent within the parent space.
pub trait Sizable {
    /// Size in parent HUD units.
    fn size(&self) -> Size;

    /// Record a new size. Returns whether it changed.
    fn set_size(&mut self, size: Size) -> bool;

    /// Location and size as one rectangle in the parent space.
    fn bounds(&self) -> Rect;
}

/// Background and border decoration.
pub trait BackgroundSettable {
    /// The current background, if any.
    fn background(&self) -> Option<Background>;

    /// Record a new background. Returns whether it changed.
    fn set_background(&mut self, background: Option<Background>) -> bool;

    /// The current border, if any.
    fn border(&self) -> Option<Border>;

    /// Record a new border. Returns whether it changed.
    fn set_border(&mut self, border: Option<Border>) -> bool;

    /// Border thickness, zero when there is no border.
    fn border_insets(&self) -> Insets {
        self.border().map(|b| b.insets).unwrap_or(Insets::ZERO)
    }
}

/// Participation in pointer picking.
pub trait Pickable {
    /// Whether the widget takes part in picking at all.
    fn is_pickable(&self) -> bool;

    /// Enable or disable picking.
    fn set_pickable(&mut self, pickable: bool);

    /// Whether button presses and releases reach the widget.
    fn is_clickable(&self) -> bool;

    /// Enable or disable button events.
    fn set_clickable(&mut self, clickable: bool);

    /// The pick area, anchored at the local origin.
    fn pick_size(&self) -> Size;

    /// Override the pick area. `None` picks against the full size.
    fn set_pick_size(&mut self, pick_size: Option<Size>);

    /// Whether a local point falls inside the pick area.
    fn contains_local(&self, local: Point) -> bool {
        let size = self.pick_size();
        local.x >= 0.0 && local.y >= 0.0 && local.x < size.width && local.y < size.height
    }
}

/// Common data of every widget.
pub struct WidgetBase {
    name: String,
    location: Point,
    size: Size,
    z_index: i32,
    pick_size: Option<Size>,
    background: Option<Background>,
    border: Option<Border>,

    pub(crate) heavyweight: bool,
    pub(crate) visible: bool,
    pub(crate) enabled: bool,
    pub(crate) clickable: bool,
    pub(crate) pickable: bool,
    pub(crate) draggable: bool,
    pub(crate) focusable: bool,
    pub(crate) dispatched_picking: bool,

    /// This widget's own appearance changed.
    pub(crate) this_dirty: bool,
    /// Something hosted in this widget's subtree changed.
    pub(crate) hosted_dirty: bool,

    pub(crate) container: Option<WidgetId>,
    pub(crate) assembly_owner: Option<WidgetId>,

    pub(crate) attached: bool,
    pub(crate) initialized: bool,
    pub(crate) hierarchy_valid: Option<bool>,
    pub(crate) pending_focus: bool,
    pub(crate) has_focus: bool,
    pub(crate) hovered: bool,

    /// Parent-space HUD units per canvas pixel, refreshed by `update_size_factors`.
    pub(crate) units_per_pixel: (f32, f32),

    /// Emitted with the widget id when it becomes the focus chain end.
    pub focus_gained: Signal<WidgetId>,
    /// Emitted with the widget id when it stops being the focus chain end.
    pub focus_lost: Signal<WidgetId>,
    /// Emitted when the pointer starts hovering the widget.
    pub mouse_entered: Signal<WidgetId>,
    /// Emitted when the pointer stops hovering the widget.
    pub mouse_exited: Signal<WidgetId>,
    /// Emitted when a drag of this widget begins.
    pub drag_started: Signal<WidgetId>,
    /// Emitted when a drag of this widget ends or is cancelled.
    pub drag_stopped: Signal<WidgetId>,
    /// Emitted with the new location.
    pub location_changed: Signal<Point>,
    /// Emitted with the new size.
    pub size_changed: Signal<Size>,
}

impl WidgetBase {
    pub(crate) fn new(name: String, heavyweight: bool) -> Self {
        Self {
            name,
            location: Point::ZERO,
            size: Size::ZERO,
            z_index: 0,
            pick_size: None,
            background: None,
            border: None,
            heavyweight,
            visible: true,
            enabled: true,
            clickable: true,
            pickable: true,
            draggable: false,
            focusable: false,
            dispatched_picking: false,
            this_dirty: true,
            hosted_dirty: false,
            container: None,
            assembly_owner: None,
            attached: false,
            initialized: false,
            hierarchy_valid: None,
            pending_focus: false,
            has_focus: false,
            hovered: false,
            units_per_pixel: (1.0, 1.0),
            focus_gained: Signal::new(),
            focus_lost: Signal::new(),
            mouse_entered: Signal::new(),
            mouse_exited: Signal::new(),
            drag_started: Signal::new(),
            drag_stopped: Signal::new(),
            location_changed: Signal::new(),
            size_changed: Signal::new(),
        }
    }

    // =========================================================================
    // Identity and tree links
    // =========================================================================

    /// The debug name given at creation.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the widget owns its own surface.
    pub fn is_heavyweight(&self) -> bool {
        self.heavyweight
    }

    /// The container holding this widget as a child.
    pub fn container(&self) -> Option<WidgetId> {
        self.container
    }

    /// The widget composing this one as a sub-part.
    pub fn assembly_owner(&self) -> Option<WidgetId> {
        self.assembly_owner
    }

    /// The container or assembly owner, whichever is set.
    pub fn parent(&self) -> Option<WidgetId> {
        self.container.or(self.assembly_owner)
    }

    /// Whether the widget is reachable from the HUD root.
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Whether the one-time init hooks have run.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    // =========================================================================
    // Flags
    // =========================================================================

    /// Whether the widget is drawn and picked.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Whether the widget reacts to input.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable input.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Whether the widget can be dragged with the pointer.
    pub fn is_draggable(&self) -> bool {
        self.draggable
    }

    /// Allow or forbid pointer dragging.
    pub fn set_draggable(&mut self, draggable: bool) {
        self.draggable = draggable;
    }

    /// Whether the widget can end the focus chain.
    pub fn is_focusable(&self) -> bool {
        self.focusable
    }

    /// Allow or forbid focus.
    pub fn set_focusable(&mut self, focusable: bool) {
        self.focusable = focusable;
    }

    /// Whether assembled sub-widgets take part in picking.
    pub fn is_dispatched_picking(&self) -> bool {
        self.dispatched_picking
    }

    /// Opt in or out of picking assembled sub-widgets.
    pub fn set_dispatched_picking(&mut self, dispatched: bool) {
        self.dispatched_picking = dispatched;
    }

    /// Whether the widget is the end of the focus chain.
    pub fn has_focus(&self) -> bool {
        self.has_focus
    }

    /// Whether the pointer currently hovers the widget.
    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    /// Whether the widget's own appearance awaits a redraw.
    pub fn is_texture_dirty(&self) -> bool {
        self.this_dirty
    }

    /// Whether something hosted below the widget awaits a redraw.
    pub fn is_hosted_dirty(&self) -> bool {
        self.hosted_dirty
    }

    /// Clickable and enabled.
    pub(crate) fn accepts_buttons(&self) -> bool {
        self.clickable && self.enabled
    }
}

impl Positioned for WidgetBase {
    fn location(&self) -> Point {
        self.location
    }

    fn set_location(&mut self, location: Point) -> bool {
        if self.location == location {
            return false;
        }
        self.location = location;
        true
    }

    fn z_index(&self) -> i32 {
        self.z_index
    }

    fn set_z_index(&mut self, z_index: i32) -> bool {
        if self.z_index == z_index {
            return false;
        }
        self.z_index = z_index;
        true
    }
}

impl Sizable for WidgetBase {
    fn size(&self) -> Size {
        self.size
    }

    fn set_size(&mut self, size: Size) -> bool {
        if self.size == size {
            return false;
        }
        self.size = size;
        true
    }

    fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.location, self.size)
    }
}

impl BackgroundSettable for WidgetBase {
    fn background(&self) -> Option<Background> {
        self.background
    }

    fn set_background(&mut self, background: Option<Background>) -> bool {
        if self.background == background {
            return false;
        }
        self.background = background;
        true
    }

    fn border(&self) -> Option<Border> {
        self.border
    }

    fn set_border(&mut self, border: Option<Border>) -> bool {
        if self.border == border {
            return false;
        }
        self.border = border;
        true
    }
}

impl Pickable for WidgetBase {
    fn is_pickable(&self) -> bool {
        self.pickable
    }

    fn set_pickable(&mut self, pickable: bool) {
        self.pickable = pickable;
    }

    fn is_clickable(&self) -> bool {
        self.clickable
    }

    fn set_clickable(&mut self, clickable: bool) {
        self.clickable = clickable;
    }

    fn pick_size(&self) -> Size {
        self.pick_size.unwrap_or(self.size)
    }

    fn set_pick_size(&mut self, pick_size: Option<Size>) {
        self.pick_size = pick_size;
    }
}

impl std::fmt::Debug for WidgetBase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WidgetBase")
            .field("name", &self.name)
            .field("location", &self.location)
            .field("size", &self.size)
            .field("z_index", &self.z_index)
            .field("heavyweight", &self.heavyweight)
            .field("visible", &self.visible)
            .field("attached", &self.attached)
            .field("has_focus", &self.has_focus)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setters_report_changes() {
        let mut base = WidgetBase::new("w".into(), false);
        assert!(base.set_location(Point::new(1.0, 2.0)));
        assert!(!base.set_location(Point::new(1.0, 2.0)));
        assert!(base.set_z_index(3));
        assert!(!base.set_z_index(3));
        assert!(!base.set_background(None));
        assert!(base.set_background(Some(Background::Color(Color::RED))));
    }

    #[test]
    fn test_pick_size_defaults_to_size() {
        let mut base = WidgetBase::new("w".into(), false);
        base.set_size(Size::new(40.0, 20.0));
        assert!(base.contains_local(Point::new(39.0, 19.0)));
        assert!(!base.contains_local(Point::new(40.0, 0.0)));

        base.set_pick_size(Some(Size::new(10.0, 10.0)));
        assert!(!base.contains_local(Point::new(20.0, 5.0)));
        assert!(base.contains_local(Point::new(5.0, 5.0)));
    }

    #[test]
    fn test_border_insets_default_to_zero() {
        let mut base = WidgetBase::new("w".into(), false);
        assert_eq!(base.border_insets(), Insets::ZERO);
        base.set_border(Some(Border::uniform(2.0, Color::WHITE)));
        assert_eq!(base.border_insets(), Insets::uniform(2.0));
    }
}
