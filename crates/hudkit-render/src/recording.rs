//! Headless recording surfaces.
//!
//! [`RecordingSurface`] implements [`DrawSurface`] without a GPU: every call
//! is appended to a shared [`SurfaceLog`]. Tests keep a
//! [`RecordingSurfaceFactory`] clone, hand another clone to the widget tree,
//! and inspect what each surface received after a frame.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::trace;

use crate::error::{RenderError, RenderResult};
use crate::surface::{DrawSurface, ImageId, ScenePlacement, SurfaceFactory};
use crate::types::{Color, Point, Rect};

/// A recorded surface call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// The whole surface was cleared.
    Clear(Color),
    /// A rectangle was filled under `clip`.
    FillRect {
        rect: Rect,
        color: Color,
        clip: Option<Rect>,
    },
    /// An image was drawn under `clip`.
    DrawImage {
        image: ImageId,
        dest: Rect,
        clip: Option<Rect>,
    },
    /// Text was drawn under `clip`.
    DrawText {
        text: String,
        origin: Point,
        color: Color,
        clip: Option<Rect>,
    },
    /// The clip rectangle changed.
    SetClip(Option<Rect>),
}

impl DrawCommand {
    /// The area this command actually touches, if it draws anything.
    pub fn visible_area(&self) -> Option<Rect> {
        let (rect, clip) = match self {
            DrawCommand::FillRect { rect, clip, .. } => (*rect, *clip),
            DrawCommand::DrawImage { dest, clip, .. } => (*dest, *clip),
            _ => return None,
        };
        match clip {
            Some(clip) => rect.intersect(&clip),
            None => Some(rect),
        }
    }
}

/// Everything a recording surface has received.
#[derive(Debug, Clone, Default)]
pub struct SurfaceLog {
    /// Drawing commands since the last [`RecordingHandle::take_commands`].
    pub commands: Vec<DrawCommand>,
    /// Number of completed redraws.
    pub present_count: usize,
    /// Current pixel size.
    pub size: (u32, u32),
    /// Last placement set on the surface.
    pub placement: Option<ScenePlacement>,
    /// Whether the surface is shown in the scene.
    pub visible: bool,
}

/// Shared view onto a recording surface's log.
#[derive(Debug, Clone)]
pub struct RecordingHandle {
    log: Arc<Mutex<SurfaceLog>>,
}

impl RecordingHandle {
    /// A snapshot of the full log.
    pub fn snapshot(&self) -> SurfaceLog {
        self.log.lock().clone()
    }

    /// Number of completed redraws.
    pub fn present_count(&self) -> usize {
        self.log.lock().present_count
    }

    /// The recorded commands, leaving them in place.
    pub fn commands(&self) -> Vec<DrawCommand> {
        self.log.lock().commands.clone()
    }

    /// Remove and return the recorded commands.
    pub fn take_commands(&self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.log.lock().commands)
    }

    /// The last placement set on the surface.
    pub fn placement(&self) -> Option<ScenePlacement> {
        self.log.lock().placement
    }

    /// The current pixel size.
    pub fn size(&self) -> (u32, u32) {
        self.log.lock().size
    }
}

/// A [`DrawSurface`] that records instead of rendering.
#[derive(Debug)]
pub struct RecordingSurface {
    log: Arc<Mutex<SurfaceLog>>,
    clip: Option<Rect>,
}

impl RecordingSurface {
    /// Create a recording surface of the given pixel size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            log: Arc::new(Mutex::new(SurfaceLog {
                size: (width, height),
                visible: true,
                ..Default::default()
            })),
            clip: None,
        }
    }

    /// A handle that stays valid after the surface is boxed away.
    pub fn handle(&self) -> RecordingHandle {
        RecordingHandle {
            log: self.log.clone(),
        }
    }

    fn record(&self, command: DrawCommand) {
        self.log.lock().commands.push(command);
    }
}

impl DrawSurface for RecordingSurface {
    fn size(&self) -> (u32, u32) {
        self.log.lock().size
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.log.lock().size = (width, height);
    }

    fn clip_rect(&self) -> Option<Rect> {
        self.clip
    }

    fn set_clip_rect(&mut self, clip: Option<Rect>) {
        if self.clip != clip {
            self.clip = clip;
            self.record(DrawCommand::SetClip(clip));
        }
    }

    fn clear(&mut self, color: Color) {
        self.record(DrawCommand::Clear(color));
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.record(DrawCommand::FillRect {
            rect,
            color,
            clip: self.clip,
        });
    }

    fn draw_image(&mut self, image: ImageId, dest: Rect) {
        self.record(DrawCommand::DrawImage {
            image,
            dest,
            clip: self.clip,
        });
    }

    fn draw_text(&mut self, text: &str, origin: Point, color: Color) {
        self.record(DrawCommand::DrawText {
            text: text.to_owned(),
            origin,
            color,
            clip: self.clip,
        });
    }

    fn set_placement(&mut self, placement: ScenePlacement) {
        self.log.lock().placement = Some(placement);
    }

    fn set_visible(&mut self, visible: bool) {
        self.log.lock().visible = visible;
    }

    fn present(&mut self) {
        let mut log = self.log.lock();
        log.present_count += 1;
        trace!(
            target: "hudkit_render::recording",
            presents = log.present_count,
            commands = log.commands.len(),
            "surface presented"
        );
    }
}

/// A [`SurfaceFactory`] producing [`RecordingSurface`]s.
///
/// Clones share the list of created surfaces.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurfaceFactory {
    created: Arc<Mutex<Vec<RecordingHandle>>>,
}

impl RecordingSurfaceFactory {
    /// Create a factory with no surfaces yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Handles for every surface created so far, in creation order.
    pub fn surfaces(&self) -> Vec<RecordingHandle> {
        self.created.lock().clone()
    }

    /// Number of surfaces created so far.
    pub fn surface_count(&self) -> usize {
        self.created.lock().len()
    }
}

impl SurfaceFactory for RecordingSurfaceFactory {
    fn create_surface(&mut self, width: u32, height: u32) -> RenderResult<Box<dyn DrawSurface>> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidDimensions { width, height });
        }
        let surface = RecordingSurface::new(width, height);
        self.created.lock().push(surface.handle());
        Ok(Box::new(surface))
    }
}
