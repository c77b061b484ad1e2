//! Model-backed lists.
//!
//! An [`AbstractList`] shows the rows of a [`ListModel`] as a column of
//! item widgets. Only the visible rows have widgets: they are unmanaged
//! assembled sub-widgets of the list, created on demand and reused as the
//! list scrolls. Rows past the end of the model are hidden.
//!
//! ```
//! use hudkit::{Hud, UiConfig, VecListModel};
//! use hudkit_render::{Point, RecordingSurfaceFactory, ScreenConverter, Size};
//!
//! let mut hud = Hud::new(
//!     ScreenConverter::new(Size::new(640.0, 480.0)),
//!     RecordingSurfaceFactory::new(),
//!     UiConfig::default(),
//! );
//! let list = hud.create_list("inventory", Point::ZERO, Size::new(100.0, 60.0));
//! hud.set_list_model(list, Some(Box::new(VecListModel::from(vec!["sword", "shield"]))))?;
//! assert_eq!(hud.list_selected(list)?, None);
//!
//! hud.select_list_item(list, Some(1))?;
//! assert_eq!(hud.list_selected(list)?, Some(1));
//! # Ok::<(), hudkit::HudError>(())
//! ```

use std::any::Any;
use std::time::Duration;

use hudkit_core::logging::targets;
use hudkit_core::{HudError, HudResult, Signal};
use hudkit_render::{Color, Point, Rect, Size};
use tracing::trace;

use super::base::{Positioned, Sizable};
use super::events::{MouseEvent, PickReason};
use super::hud::WidgetBuilder;
use super::traits::{PaintContext, WidgetContent};
use super::{Hud, WidgetId};

const SELECTED_BACKGROUND: Color = Color::from_rgb(0.2, 0.35, 0.6);
const TEXT_INSET: f32 = 2.0;

/// The rows shown by a list.
pub trait ListModel {
    /// Number of rows.
    fn len(&self) -> usize;

    /// Text of one row, `None` past the end.
    fn item_text(&self, index: usize) -> Option<String>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A list model over owned strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VecListModel {
    items: Vec<String>,
}

impl VecListModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, item: impl Into<String>) {
        self.items.push(item.into());
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }
}

impl<S: Into<String>> From<Vec<S>> for VecListModel {
    fn from(items: Vec<S>) -> Self {
        Self {
            items: items.into_iter().map(Into::into).collect(),
        }
    }
}

impl ListModel for VecListModel {
    fn len(&self) -> usize {
        self.items.len()
    }

    fn item_text(&self, index: usize) -> Option<String> {
        self.items.get(index).cloned()
    }
}

/// Content of a list widget.
pub struct AbstractList {
    model: Option<Box<dyn ListModel>>,
    selected: Option<usize>,
    first_visible: usize,
    item_height: f32,
    /// Reused row widgets, in row order.
    rows: Vec<WidgetId>,
    /// List location the rows were last placed at.
    placed_at: Option<Point>,
    stale: bool,
    /// Emitted with the new selection.
    pub selection_changed: Signal<Option<usize>>,
}

impl AbstractList {
    pub fn new(item_height: f32) -> Self {
        Self {
            model: None,
            selected: None,
            first_visible: 0,
            item_height,
            rows: Vec::new(),
            placed_at: None,
            stale: true,
            selection_changed: Signal::new(),
        }
    }

    /// Number of rows in the model.
    pub fn len(&self) -> usize {
        self.model.as_ref().map_or(0, |m| m.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The selected row, `None` when nothing is selected or the list is empty.
    pub fn selected(&self) -> Option<usize> {
        self.selected.filter(|&index| index < self.len())
    }

    /// Index of the topmost visible row.
    pub fn first_visible(&self) -> usize {
        self.first_visible
    }

    pub fn item_height(&self) -> f32 {
        self.item_height
    }

    /// Text of a model row.
    pub fn item_text(&self, index: usize) -> Option<String> {
        self.model.as_ref().and_then(|m| m.item_text(index))
    }

    /// The row widgets currently in use, visible or not.
    pub fn rows(&self) -> &[WidgetId] {
        &self.rows
    }

    fn visible_rows(&self, size: Size) -> usize {
        if self.item_height <= 0.0 {
            return 0;
        }
        (size.height / self.item_height).floor() as usize
    }

    fn max_first_visible(&self, size: Size) -> usize {
        self.len().saturating_sub(self.visible_rows(size))
    }

    /// Bring the row widgets in line with the model and scroll position.
    fn refresh(&mut self, hud: &mut Hud, id: WidgetId) -> HudResult<()> {
        let base = hud.widget(id)?;
        let (location, size) = (base.location(), base.size());
        self.first_visible = self.first_visible.min(self.max_first_visible(size));
        let visible = self.visible_rows(size);

        while self.rows.len() < visible {
            let row = self.rows.len();
            let item = hud.create_widget(
                WidgetBuilder::new(format!("list item {row}"))
                    .content(ListItemContent { list: id, row }),
            );
            hud.assemble_unmanaged_widget(id, item)?;
            self.rows.push(item);
        }

        let len = self.len();
        for (row, &item) in self.rows.iter().enumerate() {
            let shown = row < visible && self.first_visible + row < len;
            hud.set_location(item, location + Point::new(0.0, row as f32 * self.item_height))?;
            hud.set_size(item, Size::new(size.width, self.item_height))?;
            hud.set_visible(item, shown)?;
            hud.set_texture_dirty(item)?;
        }

        self.placed_at = Some(location);
        self.stale = false;
        trace!(target: targets::WIDGET, list = ?id, first = self.first_visible, visible, "refreshed list rows");
        Ok(())
    }

    fn select(&mut self, index: Option<usize>) -> bool {
        let index = index.filter(|&i| i < self.len());
        if self.selected() == index {
            return false;
        }
        self.selected = index;
        self.stale = true;
        self.selection_changed.emit(index);
        true
    }

    fn scroll(&mut self, delta: isize) {
        let first = self.first_visible.saturating_add_signed(delta);
        if first != self.first_visible {
            self.first_visible = first;
            self.stale = true;
        }
    }

    fn scroll_into_view(&mut self, index: usize, size: Size) {
        let visible = self.visible_rows(size).max(1);
        if index < self.first_visible {
            self.first_visible = index;
        } else if index >= self.first_visible + visible {
            self.first_visible = index + 1 - visible;
        }
        self.stale = true;
    }
}

impl WidgetContent for AbstractList {
    fn update(&mut self, hud: &mut Hud, id: WidgetId, _now: Duration) -> HudResult<()> {
        let moved = self.placed_at != Some(hud.widget(id)?.location());
        if self.stale || moved {
            self.refresh(hud, id)?;
        }
        Ok(())
    }

    fn mouse_event(&mut self, hud: &mut Hud, id: WidgetId, event: &MouseEvent) -> HudResult<()> {
        let size = hud.widget(id)?.size();
        let page = self.visible_rows(size).max(1) as isize;
        match event.reason {
            PickReason::WheelUp { page_move } => self.scroll(if page_move { -page } else { -1 }),
            PickReason::WheelDown { page_move } => self.scroll(if page_move { page } else { 1 }),
            _ => return Ok(()),
        }
        self.refresh(hud, id)
    }
}

/// Content of one list row.
///
/// A row reads its text and selection from the list at paint time.
#[derive(Debug, Clone, Copy)]
pub struct ListItemContent {
    list: WidgetId,
    row: usize,
}

impl ListItemContent {
    /// Position of the row below the top of the list.
    pub fn row(&self) -> usize {
        self.row
    }

    /// The model row shown, `None` for a spare row past the end.
    pub fn index(&self, hud: &Hud) -> Option<usize> {
        let list = hud.list(self.list).ok()?;
        let index = list.first_visible() + self.row;
        (index < list.len()).then_some(index)
    }
}

impl WidgetContent for ListItemContent {
    fn paint(&self, hud: &Hud, _id: WidgetId, ctx: &mut PaintContext<'_>) {
        let (Ok(list), Some(index)) = (hud.list(self.list), self.index(hud)) else {
            return;
        };
        if list.selected() == Some(index) {
            ctx.fill_rect(ctx.rect(), SELECTED_BACKGROUND);
        }
        if let Some(text) = list.item_text(index) {
            ctx.draw_text(&text, Point::new(TEXT_INSET, TEXT_INSET), Color::WHITE);
        }
    }

    fn mouse_event(&mut self, hud: &mut Hud, _id: WidgetId, event: &MouseEvent) -> HudResult<()> {
        let list = self.list;
        match event.reason {
            PickReason::ButtonPressed => match self.index(hud) {
                Some(index) => hud.select_list_item(list, Some(index)),
                None => Ok(()),
            },
            PickReason::WheelUp { .. } | PickReason::WheelDown { .. } => {
                hud.with_list(list, |content, hud| content.mouse_event(hud, list, event))
            }
            _ => Ok(()),
        }
    }
}

impl Hud {
    /// Create a detached list widget with no model.
    pub fn create_list(&mut self, name: impl Into<String>, location: Point, size: Size) -> WidgetId {
        let item_height = self.config.list_item_height;
        self.create_widget(
            WidgetBuilder::new(name)
                .location(location.x, location.y)
                .size(size.width, size.height)
                .dispatched_picking(true)
                .content(AbstractList::new(item_height)),
        )
    }

    /// Run `f` with the list content of `id` taken out of its node.
    pub(crate) fn with_list<R>(
        &mut self,
        id: WidgetId,
        f: impl FnOnce(&mut AbstractList, &mut Hud) -> HudResult<R>,
    ) -> HudResult<R> {
        let Some(mut content) = self.node_mut(id)?.content.take() else {
            return Err(HudError::unexpected_content(id, "list"));
        };
        let result = match (content.as_mut() as &mut dyn Any).downcast_mut::<AbstractList>() {
            Some(list) => f(list, self),
            None => Err(HudError::unexpected_content(id, "list")),
        };
        if let Some(node) = self.nodes.get_mut(id) {
            if node.content.is_none() {
                node.content = Some(content);
            }
        }
        result
    }

    /// Replace the model of a list. The selection and scroll position reset.
    pub fn set_list_model(&mut self, list: WidgetId, model: Option<Box<dyn ListModel>>) -> HudResult<()> {
        let model = model.ok_or(HudError::MissingArgument("model"))?;
        self.with_list(list, |content, hud| {
            content.model = Some(model);
            content.first_visible = 0;
            content.select(None);
            content.refresh(hud, list)
        })?;
        self.set_texture_dirty(list)
    }

    /// The selected row of a list, `None` on an empty list.
    pub fn list_selected(&self, list: WidgetId) -> HudResult<Option<usize>> {
        self.content::<AbstractList>(list)
            .map(AbstractList::selected)
            .ok_or_else(|| HudError::unexpected_content(list, "list"))
    }

    /// Select a row, scrolling it into view. Out-of-range indices clear the selection.
    pub fn select_list_item(&mut self, list: WidgetId, index: Option<usize>) -> HudResult<()> {
        let size = self.widget(list)?.size();
        let changed = self.with_list(list, |content, hud| {
            let changed = content.select(index);
            if let Some(index) = content.selected() {
                content.scroll_into_view(index, size);
            }
            content.refresh(hud, list)?;
            Ok(changed)
        })?;
        if changed {
            trace!(target: targets::WIDGET, ?list, ?index, "list selection changed");
        }
        Ok(())
    }

    /// Scroll a list by whole rows.
    pub fn scroll_list(&mut self, list: WidgetId, rows: isize) -> HudResult<()> {
        self.with_list(list, |content, hud| {
            content.scroll(rows);
            content.refresh(hud, list)
        })
    }

    /// The list content of a widget.
    pub fn list(&self, list: WidgetId) -> HudResult<&AbstractList> {
        self.content::<AbstractList>(list)
            .ok_or_else(|| HudError::unexpected_content(list, "list"))
    }

    /// Item rectangles of the visible rows, in the list's local space.
    pub fn list_row_rects(&self, list: WidgetId) -> HudResult<Vec<Rect>> {
        let content = self.list(list)?;
        let width = self.widget(list)?.size().width;
        Ok(content
            .rows()
            .iter()
            .enumerate()
            .filter(|(_, row)| self.nodes.get(**row).is_some_and(|n| n.base.visible))
            .map(|(i, _)| Rect::new(0.0, i as f32 * content.item_height(), width, content.item_height()))
            .collect())
    }
}
