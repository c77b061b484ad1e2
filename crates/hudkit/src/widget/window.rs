//! HUD windows.
//!
//! A window is a heavyweight, draggable widget composed of two assembled
//! parts: an optional header showing the title and a close button, and a
//! content pane container that holds the window's children.
//!
//! ```text
//! window (heavyweight)
//! ├── header (assembled)
//! │   └── close button (assembled)
//! └── content pane (assembled container)
//!     └── ...children
//! ```
//!
//! By default a window can only be dragged by its header; enabling pane
//! dragging lets a press anywhere in the window start the drag.

use hudkit_core::logging::targets;
use hudkit_core::{HudError, HudResult, Signal};
use hudkit_render::{Color, Point, Rect, Size};
use tracing::debug;

use super::base::{Background, Positioned, Sizable};
use super::events::{MouseEvent, PickReason};
use super::hud::WidgetBuilder;
use super::traits::{PaintContext, WidgetContent};
use super::{Hud, WidgetId};

const HEADER_BACKGROUND: Color = Color::from_rgb(0.18, 0.2, 0.26);
const CLOSE_BACKGROUND: Color = Color::from_rgb(0.6, 0.15, 0.15);
const TITLE_INSET: f32 = 4.0;

/// Window-specific parts of a window widget.
#[derive(Debug)]
pub struct WindowData {
    pub(crate) header: Option<WidgetId>,
    pub(crate) close_button: Option<WidgetId>,
    pub(crate) content_pane: WidgetId,
    pub(crate) pane_dragging: bool,
    /// Emitted with the window id after the window is closed.
    pub closed: Signal<WidgetId>,
}

impl WindowData {
    pub fn header(&self) -> Option<WidgetId> {
        self.header
    }

    pub fn close_button(&self) -> Option<WidgetId> {
        self.close_button
    }

    pub fn content_pane(&self) -> WidgetId {
        self.content_pane
    }

    pub fn is_pane_dragging_enabled(&self) -> bool {
        self.pane_dragging
    }
}

/// Content of a window header: draws the title.
#[derive(Debug, Clone)]
pub struct HeaderContent {
    title: String,
    color: Color,
}

impl HeaderContent {
    pub fn title(&self) -> &str {
        &self.title
    }
}

impl WidgetContent for HeaderContent {
    fn paint(&self, _hud: &Hud, _id: WidgetId, ctx: &mut PaintContext<'_>) {
        ctx.draw_text(&self.title, Point::new(TITLE_INSET, TITLE_INSET), self.color);
    }
}

/// Content of a window's close button.
#[derive(Debug, Clone, Copy)]
pub struct CloseButtonContent {
    window: WidgetId,
}

impl WidgetContent for CloseButtonContent {
    fn paint(&self, _hud: &Hud, _id: WidgetId, ctx: &mut PaintContext<'_>) {
        let size = ctx.size();
        let mark = Rect::new(size.width * 0.3, size.height * 0.45, size.width * 0.4, size.height * 0.1);
        ctx.fill_rect(mark, Color::WHITE);
    }

    fn mouse_event(&mut self, hud: &mut Hud, _id: WidgetId, event: &MouseEvent) -> HudResult<()> {
        if event.reason == PickReason::ButtonPressed {
            hud.close_window(self.window)?;
        }
        Ok(())
    }
}

impl Hud {
    /// Create a detached window.
    ///
    /// `location` and `size` are in the parent space the window will be
    /// added to. The header takes `window_header_height` from the config.
    pub fn create_window(
        &mut self,
        title: impl Into<String>,
        location: Point,
        size: Size,
        with_header: bool,
    ) -> HudResult<WidgetId> {
        let title = title.into();
        let window = self.create_widget(
            WidgetBuilder::new(title.clone())
                .heavyweight()
                .location(location.x, location.y)
                .size(size.width, size.height)
                .draggable(true)
                .dispatched_picking(true)
                .background(Background::Color(Color::DARK_GRAY)),
        );

        let header_height = if with_header {
            self.config.window_header_height.min(size.height)
        } else {
            0.0
        };

        let (header, close_button) = if with_header {
            let header = self.create_widget(
                WidgetBuilder::new("header")
                    .size(size.width, header_height)
                    .dispatched_picking(true)
                    .background(Background::Color(HEADER_BACKGROUND))
                    .content(HeaderContent {
                        title,
                        color: Color::WHITE,
                    }),
            );
            self.assemble_widget(window, header, Point::ZERO)?;

            let close = self.create_widget(
                WidgetBuilder::new("close")
                    .size(header_height, header_height)
                    .background(Background::Color(CLOSE_BACKGROUND))
                    .content(CloseButtonContent { window }),
            );
            self.assemble_widget(header, close, Point::new(size.width - header_height, 0.0))?;
            (Some(header), Some(close))
        } else {
            (None, None)
        };

        let pane = self.create_widget(
            WidgetBuilder::new("content pane")
                .container()
                .size(size.width, size.height - header_height),
        );
        self.assemble_widget(window, pane, Point::new(0.0, header_height))?;

        self.node_mut(window)?.window = Some(WindowData {
            header,
            close_button,
            content_pane: pane,
            pane_dragging: false,
            closed: Signal::new(),
        });
        debug!(target: targets::WIDGET, ?window, with_header, "created window");
        Ok(window)
    }

    /// The window parts of a widget.
    pub fn window(&self, window: WidgetId) -> HudResult<&WindowData> {
        self.node(window)?
            .window
            .as_ref()
            .ok_or_else(|| HudError::unexpected_content(window, "window"))
    }

    fn window_mut(&mut self, window: WidgetId) -> HudResult<&mut WindowData> {
        self.node_mut(window)?
            .window
            .as_mut()
            .ok_or_else(|| HudError::unexpected_content(window, "window"))
    }

    /// The container holding a window's children.
    pub fn content_pane(&self, window: WidgetId) -> HudResult<WidgetId> {
        Ok(self.window(window)?.content_pane)
    }

    /// Change the header title. Windows without a header ignore this.
    pub fn set_title(&mut self, window: WidgetId, title: impl Into<String>) -> HudResult<()> {
        let Some(header) = self.window(window)?.header else {
            return Ok(());
        };
        if let Some(content) = self.content_mut::<HeaderContent>(header) {
            content.title = title.into();
        }
        self.set_texture_dirty(header)
    }

    /// The header title, `None` for a window without a header.
    pub fn title(&self, window: WidgetId) -> HudResult<Option<&str>> {
        let header = self.window(window)?.header;
        Ok(header
            .and_then(|h| self.content::<HeaderContent>(h))
            .map(HeaderContent::title))
    }

    /// Allow a press anywhere in the window to start a drag.
    pub fn set_pane_dragging_enabled(&mut self, window: WidgetId, enabled: bool) -> HudResult<()> {
        self.window_mut(window)?.pane_dragging = enabled;
        Ok(())
    }

    /// Close a window.
    ///
    /// The window leaves its container, which detaches the content pane
    /// first and then fires `closed`. A closed window can be added again.
    pub fn close_window(&mut self, window: WidgetId) -> HudResult<()> {
        self.window(window)?;
        let base = &self.node(window)?.base;
        match (base.container, base.assembly_owner) {
            (Some(container), _) => self.remove_widget(container, window),
            (None, Some(owner)) => self.disassemble_widget(owner, window),
            (None, None) => self.detach_widget(window),
        }
    }

    /// Fit the header and content pane to the window's size.
    pub(crate) fn layout_window(&mut self, window: WidgetId) -> HudResult<()> {
        let data = self.window(window)?;
        let (header, close, pane) = (data.header, data.close_button, data.content_pane);
        let size = self.node(window)?.base.size();

        let mut header_height = 0.0;
        if let Some(header) = header {
            header_height = self.config.window_header_height.min(size.height);
            self.set_size(header, Size::new(size.width, header_height))?;
            if let Some(close) = close {
                self.set_size(close, Size::new(header_height, header_height))?;
                self.set_relative_location(header, close, Point::new(size.width - header_height, 0.0))?;
            }
        }
        self.set_relative_location(window, pane, Point::new(0.0, header_height))?;
        self.set_size(pane, Size::new(size.width, (size.height - header_height).max(0.0)))
    }

    /// Whether a press at `local` may drag the window.
    pub(crate) fn window_allows_drag(&self, window: WidgetId, local: Point) -> HudResult<bool> {
        let data = self.window(window)?;
        if data.pane_dragging {
            return Ok(true);
        }
        let Some(header) = data.header else {
            return Ok(false);
        };
        let origin = self.node(window)?.base.location();
        let in_part = |part: WidgetId| -> HudResult<bool> {
            let bounds = self.node(part)?.base.bounds();
            Ok(bounds.offset(-origin.x, -origin.y).contains(local))
        };
        let on_close = match data.close_button {
            Some(close) => in_part(close)?,
            None => false,
        };
        Ok(in_part(header)? && !on_close)
    }
}
