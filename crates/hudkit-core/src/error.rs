//! Error types for hudkit.
//!
//! Every variant of [`HudError`] is a configuration or usage error: the
//! widget tree was asked to do something its invariants forbid. None of them
//! are recoverable at runtime, and no operation in hudkit retries. Callers
//! (usually the render loop) propagate them with `?` and treat them as fatal.
//!
//! Conditions that are merely redundant, such as setting a property to its
//! current value or removing a listener that was never connected, are not
//! errors and never produce one.

use thiserror::Error;

/// The main error type for hudkit operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HudError {
    /// A coordinate conversion or placement query was issued on a widget that
    /// is not attached to a HUD root.
    #[error("widget {widget} is not attached to a HUD")]
    NotAttached {
        /// Debug representation of the widget id.
        widget: String,
    },

    /// A heavyweight widget was handed to a widget assembler.
    #[error("widget {widget} is heavyweight and cannot be assembled into another widget")]
    HeavyweightInAssembler {
        /// Debug representation of the widget id.
        widget: String,
    },

    /// A lightweight widget was attached without any heavyweight ancestor.
    #[error("lightweight widget {widget} has no heavyweight ancestor to render into")]
    NoHeavyweightAncestor {
        /// Debug representation of the widget id.
        widget: String,
    },

    /// The widget is not owned by the container or assembler it was removed from.
    #[error("widget {widget} is not owned by {owner}")]
    NotOwned {
        /// Debug representation of the widget id.
        widget: String,
        /// Debug representation of the supposed owner.
        owner: String,
    },

    /// The widget already belongs to a container or an assembly owner.
    #[error("widget {widget} already has a container or assembly owner")]
    AlreadyOwned {
        /// Debug representation of the widget id.
        widget: String,
    },

    /// Linking the widget would make it its own ancestor.
    #[error("widget {widget} cannot be placed inside its own subtree")]
    CircularHierarchy {
        /// Debug representation of the widget id.
        widget: String,
    },

    /// The widget id is stale or was never issued by this HUD.
    #[error("invalid or destroyed widget id")]
    InvalidWidgetId,

    /// A container operation targeted a widget without container data.
    #[error("widget {widget} is not a container")]
    NotAContainer {
        /// Debug representation of the widget id.
        widget: String,
    },

    /// A widget's content is not of the kind the operation needs.
    #[error("widget {widget} is not a {expected}")]
    UnexpectedContent {
        /// Debug representation of the widget id.
        widget: String,
        /// The kind of widget the operation expected.
        expected: &'static str,
    },

    /// A required argument was missing.
    #[error("missing required argument: {0}")]
    MissingArgument(&'static str),

    /// The drawing backend could not provide a surface.
    #[error("surface error: {0}")]
    Surface(String),

    /// The UI configuration could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Scheduler error.
    #[error("scheduler error: {0}")]
    Scheduler(#[from] SchedulerError),
}

impl HudError {
    /// Build a [`HudError::NotAttached`] for any debuggable id.
    pub fn not_attached(widget: impl std::fmt::Debug) -> Self {
        Self::NotAttached {
            widget: format!("{widget:?}"),
        }
    }

    /// Build a [`HudError::HeavyweightInAssembler`] for any debuggable id.
    pub fn heavyweight_in_assembler(widget: impl std::fmt::Debug) -> Self {
        Self::HeavyweightInAssembler {
            widget: format!("{widget:?}"),
        }
    }

    /// Build a [`HudError::NoHeavyweightAncestor`] for any debuggable id.
    pub fn no_heavyweight_ancestor(widget: impl std::fmt::Debug) -> Self {
        Self::NoHeavyweightAncestor {
            widget: format!("{widget:?}"),
        }
    }

    /// Build a [`HudError::NotOwned`] for any debuggable ids.
    pub fn not_owned(widget: impl std::fmt::Debug, owner: impl std::fmt::Debug) -> Self {
        Self::NotOwned {
            widget: format!("{widget:?}"),
            owner: format!("{owner:?}"),
        }
    }

    /// Build a [`HudError::AlreadyOwned`] for any debuggable id.
    pub fn already_owned(widget: impl std::fmt::Debug) -> Self {
        Self::AlreadyOwned {
            widget: format!("{widget:?}"),
        }
    }

    /// Build a [`HudError::CircularHierarchy`] for any debuggable id.
    pub fn circular_hierarchy(widget: impl std::fmt::Debug) -> Self {
        Self::CircularHierarchy {
            widget: format!("{widget:?}"),
        }
    }

    /// Build a [`HudError::UnexpectedContent`] for any debuggable id.
    pub fn unexpected_content(widget: impl std::fmt::Debug, expected: &'static str) -> Self {
        Self::UnexpectedContent {
            widget: format!("{widget:?}"),
            expected,
        }
    }

    /// Build a [`HudError::NotAContainer`] for any debuggable id.
    pub fn not_a_container(widget: impl std::fmt::Debug) -> Self {
        Self::NotAContainer {
            widget: format!("{widget:?}"),
        }
    }
}

/// Scheduler-specific errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchedulerError {
    /// The operation or interval id is invalid or was already unscheduled.
    #[error("invalid or unscheduled operation id")]
    InvalidOperationId,
    /// The scheduler owning a queue handle has been dropped.
    #[error("scheduler has been dropped")]
    SchedulerDropped,
}

/// A specialized Result type for hudkit operations.
pub type HudResult<T> = std::result::Result<T, HudError>;
