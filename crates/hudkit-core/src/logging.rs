//! Logging and debugging facilities for hudkit.
//!
//! This module provides:
//! - Target names for filtering hudkit's `tracing` output by subsystem
//! - A formatter for dumping widget trees in a human-readable form
//! - A performance span guard for profiling hooks
//!
//! # Tracing Integration
//!
//! hudkit uses the `tracing` crate for instrumentation. To see logs,
//! install a subscriber in the application:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("hudkit::focus=debug,hudkit::draw=trace")
//!     .init();
//! ```

use std::fmt::Write as FmtWrite;

/// Target names for log filtering.
pub mod targets {
    /// Widget lifecycle: attach, detach, dirty marks.
    pub const WIDGET: &str = "hudkit::widget";
    /// Pointer picking and hover tracking.
    pub const PICK: &str = "hudkit::pick";
    /// Focus transitions and keyboard routing.
    pub const FOCUS: &str = "hudkit::focus";
    /// Drag state machine.
    pub const DRAG: &str = "hudkit::drag";
    /// Texture redraws.
    pub const DRAW: &str = "hudkit::draw";
    /// Operation scheduler.
    pub const SCHEDULER: &str = "hudkit::scheduler";
}

/// A tree that can be dumped with [`WidgetTreeDebug`].
///
/// Node labels are produced by the implementor; there is no reflective
/// field enumeration.
pub trait DebugTree {
    /// Handle type for a node.
    type Node: Copy;

    /// The root nodes of the tree.
    fn debug_roots(&self) -> Vec<Self::Node>;

    /// The children of a node, in display order.
    fn debug_children(&self, node: Self::Node) -> Vec<Self::Node>;

    /// A one-line description of the node.
    fn debug_label(&self, node: Self::Node) -> String;
}

/// Style options for tree visualization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TreeStyle {
    /// ASCII characters for tree branches.
    Ascii,
    /// Unicode box-drawing characters.
    #[default]
    Unicode,
    /// Compact single-line representation.
    Compact,
}

/// Configuration for tree debug output.
#[derive(Debug, Clone)]
pub struct TreeFormatOptions {
    /// The style of tree visualization.
    pub style: TreeStyle,
    /// Maximum depth to traverse (None for unlimited).
    pub max_depth: Option<usize>,
    /// Indent size for each level.
    pub indent_size: usize,
}

impl Default for TreeFormatOptions {
    fn default() -> Self {
        Self {
            style: TreeStyle::default(),
            max_depth: None,
            indent_size: 2,
        }
    }
}

/// Debug utility for visualizing widget trees.
#[derive(Debug, Clone, Default)]
pub struct WidgetTreeDebug {
    options: TreeFormatOptions,
}

impl WidgetTreeDebug {
    /// Create a new debug visualizer with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a debug visualizer with custom options.
    pub fn with_options(options: TreeFormatOptions) -> Self {
        Self { options }
    }

    /// Format the entire tree starting from all of its roots.
    pub fn format<T: DebugTree>(&self, tree: &T) -> String {
        let mut output = String::new();
        let roots = tree.debug_roots();
        if roots.is_empty() {
            output.push_str("(empty)\n");
        }
        let count = roots.len();
        for (i, root) in roots.into_iter().enumerate() {
            self.format_subtree_into(tree, root, 0, i + 1 == count, &mut output);
        }
        output
    }

    /// Format a subtree starting from a specific node.
    pub fn format_subtree<T: DebugTree>(&self, tree: &T, node: T::Node) -> String {
        let mut output = String::new();
        self.format_subtree_into(tree, node, 0, true, &mut output);
        output
    }

    fn format_subtree_into<T: DebugTree>(
        &self,
        tree: &T,
        node: T::Node,
        depth: usize,
        is_last: bool,
        output: &mut String,
    ) {
        if self.options.max_depth.is_some_and(|max| depth > max) {
            return;
        }

        let _ = writeln!(
            output,
            "{}{}",
            self.build_prefix(depth, is_last),
            tree.debug_label(node)
        );

        let children = tree.debug_children(node);
        let count = children.len();
        for (i, child) in children.into_iter().enumerate() {
            self.format_subtree_into(tree, child, depth + 1, i + 1 == count, output);
        }
    }

    fn build_prefix(&self, depth: usize, is_last: bool) -> String {
        if depth == 0 {
            return String::new();
        }

        let (branch, tee, corner) = match self.options.style {
            TreeStyle::Ascii => ("|", "+--", "`--"),
            TreeStyle::Unicode => ("\u{2502}", "\u{251c}\u{2500}\u{2500}", "\u{2514}\u{2500}\u{2500}"),
            TreeStyle::Compact => ("", "-", "-"),
        };

        let mut prefix = String::new();
        for _ in 0..(depth - 1) {
            prefix.push_str(branch);
            prefix.push_str(&" ".repeat(self.options.indent_size));
        }
        prefix.push_str(if is_last { corner } else { tee });
        prefix.push(' ');
        prefix
    }
}

/// A guard that keeps a tracing span entered until dropped.
#[derive(Debug)]
pub struct PerfSpan {
    _span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Enter a new performance span.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: "hudkit::perf", "perf", operation = name);
        Self {
            _span: span.entered(),
        }
    }
}
