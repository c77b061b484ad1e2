//! Dirty tracking and redraw throttling.
//!
//! A widget whose appearance changes is marked *texture dirty*. Dirtiness
//! travels towards the heavyweight widget whose surface shows it:
//!
//! 1. an assembled widget hands the mark to its assembly owner;
//! 2. any other widget records `this_dirty`;
//! 3. a heavyweight widget then tells its [`RedrawScheduler`];
//! 4. a lightweight widget marks every container up to its host as
//!    *hosted dirty*, and the host tells its scheduler.
//!
//! The scheduler decides when the host actually redraws, so a burst of
//! changes inside one cooldown window costs a single redraw at its end.

use std::time::Duration;

use hudkit_core::HudResult;
use hudkit_core::logging::targets;
use hudkit_render::{DrawSurface, ScenePlacement};
use tracing::trace;

use super::{Hud, WidgetId};

/// Per-surface redraw throttle.
///
/// The cooldown window opens when a frame first sees a pending change, so
/// every change made inside the window lands in one redraw at its end.
///
/// ```
/// use std::time::Duration;
/// use hudkit::RedrawScheduler;
///
/// let ms = Duration::from_millis;
/// let mut scheduler = RedrawScheduler::new(ms(50));
/// scheduler.mark_dirty();
/// assert!(!scheduler.should_redraw(ms(0)));
/// scheduler.mark_dirty();
/// assert!(!scheduler.should_redraw(ms(10)));
/// assert!(scheduler.should_redraw(ms(50)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedrawScheduler {
    min_redraw_interval: Duration,
    forced_redraw_frequency: Option<Duration>,
    last_redraw: Option<Duration>,
    pending: bool,
    /// When a frame first saw the pending change.
    dirty_since: Option<Duration>,
}

impl RedrawScheduler {
    /// Create a scheduler that has never drawn.
    pub fn new(min_redraw_interval: Duration) -> Self {
        Self {
            min_redraw_interval,
            forced_redraw_frequency: None,
            last_redraw: None,
            pending: false,
            dirty_since: None,
        }
    }

    pub fn min_redraw_interval(&self) -> Duration {
        self.min_redraw_interval
    }

    /// Set the cooldown between two redraws of a dirty surface.
    pub fn set_min_redraw_interval(&mut self, interval: Duration) {
        self.min_redraw_interval = interval;
    }

    pub fn forced_redraw_frequency(&self) -> Option<Duration> {
        self.forced_redraw_frequency
    }

    /// Redraw at least this often, dirty or not.
    pub fn set_forced_redraw_frequency(&mut self, frequency: Option<Duration>) {
        self.forced_redraw_frequency = frequency;
    }

    /// Record that the surface content is stale.
    pub fn mark_dirty(&mut self) {
        self.pending = true;
    }

    /// Whether a change is waiting for a redraw.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Time of the last redraw, `None` before the first one.
    pub fn last_redraw(&self) -> Option<Duration> {
        self.last_redraw
    }

    /// When the cooldown of the pending change opened, if a frame has seen it.
    pub fn dirty_since(&self) -> Option<Duration> {
        self.dirty_since
    }

    /// Whether the surface should be redrawn at `now`.
    ///
    /// The first call that sees a pending change opens its cooldown window
    /// at `now`. A dirty surface redraws once the minimum interval has
    /// passed since both that moment and the last redraw. The forced
    /// frequency redraws a drawn surface whether or not it is dirty.
    pub fn should_redraw(&mut self, now: Duration) -> bool {
        let forced_due = match (self.last_redraw, self.forced_redraw_frequency) {
            (Some(last), Some(frequency)) => now.saturating_sub(last) >= frequency,
            _ => false,
        };
        if forced_due {
            return true;
        }
        if !self.pending {
            return false;
        }
        let since = *self.dirty_since.get_or_insert(now);
        let opened = self.last_redraw.map_or(since, |last| last.max(since));
        now >= opened + self.min_redraw_interval
    }

    /// Record a completed redraw. This also clears any dormant dirtiness.
    pub fn redrawn(&mut self, now: Duration) {
        self.last_redraw = Some(now);
        self.pending = false;
        self.dirty_since = None;
    }

    /// Forget the last redraw and any open cooldown.
    pub(crate) fn reset(&mut self) {
        self.last_redraw = None;
        self.dirty_since = None;
    }
}

/// The surface and throttle of a heavyweight widget.
pub(crate) struct HeavyweightState {
    pub(crate) scheduler: RedrawScheduler,
    /// Present while the widget is attached.
    pub(crate) surface: Option<Box<dyn DrawSurface>>,
    pub(crate) placement: Option<ScenePlacement>,
    pub(crate) shown: bool,
}

impl HeavyweightState {
    pub(crate) fn new(min_redraw_interval: Duration) -> Self {
        Self {
            scheduler: RedrawScheduler::new(min_redraw_interval),
            surface: None,
            placement: None,
            shown: false,
        }
    }

    /// Hide and drop the surface.
    pub(crate) fn release_surface(&mut self) {
        if let Some(mut surface) = self.surface.take() {
            surface.set_visible(false);
        }
        self.placement = None;
        self.shown = false;
    }
}

impl Hud {
    /// Mark a widget's appearance stale, propagating to its host surface.
    pub fn set_texture_dirty(&mut self, id: WidgetId) -> HudResult<()> {
        if id == self.root {
            return Ok(());
        }
        let node = self.node_mut(id)?;
        if let Some(owner) = node.base.assembly_owner {
            return self.set_texture_dirty(owner);
        }
        node.base.this_dirty = true;
        trace!(target: targets::DRAW, widget = ?id, "texture dirty");
        if let Some(heavy) = node.heavy.as_mut() {
            heavy.scheduler.mark_dirty();
            return Ok(());
        }
        match node.base.container {
            Some(container) => self.set_hosted_dirty(container),
            None => Ok(()),
        }
    }

    fn set_hosted_dirty(&mut self, id: WidgetId) -> HudResult<()> {
        let mut current = id;
        while current != self.root {
            let node = self.node_mut(current)?;
            if let Some(owner) = node.base.assembly_owner {
                current = owner;
                continue;
            }
            node.base.hosted_dirty = true;
            if let Some(heavy) = node.heavy.as_mut() {
                heavy.scheduler.mark_dirty();
                break;
            }
            match node.base.container {
                Some(container) => current = container,
                None => break,
            }
        }
        Ok(())
    }

    /// Clear the dirty flags of a host and everything drawn into its surface.
    pub(crate) fn clear_dirty(&mut self, host: WidgetId) {
        let mut stack = vec![host];
        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get_mut(id) else {
                continue;
            };
            if id != host && node.base.heavyweight {
                continue;
            }
            node.base.this_dirty = false;
            node.base.hosted_dirty = false;
            stack.extend(node.subtree_children());
        }
    }

    /// The redraw throttle of a heavyweight widget.
    pub fn redraw_scheduler(&self, id: WidgetId) -> Option<&RedrawScheduler> {
        self.nodes.get(id)?.heavy.as_ref().map(|h| &h.scheduler)
    }

    /// Mutable redraw throttle of a heavyweight widget.
    pub fn redraw_scheduler_mut(&mut self, id: WidgetId) -> Option<&mut RedrawScheduler> {
        self.nodes.get_mut(id)?.heavy.as_mut().map(|h| &mut h.scheduler)
    }
}
