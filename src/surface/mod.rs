//! The view side of a wizard.
//!
//! The core never reads view state back to make decisions, apart from two
//! measurements (`panel_width`, `has_input_focus`). Everything else flows one
//! way: the wizard tells the surface what to reflect.

use std::collections::BTreeSet;
use std::time::Duration;

pub mod memory;

pub use memory::{ActionNode, MemorySurface, PanelNode, RowNode};

/// Suffix of the step button id.
pub const TAB_SUFFIX: &str = "-t-";
/// Suffix of the content panel id.
pub const PANEL_SUFFIX: &str = "-p-";
/// Suffix of the step title id.
pub const TITLE_SUFFIX: &str = "-h-";

/// Per-position identifiers of a step's nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepIds {
    pub tab: String,
    pub panel: String,
    pub header: String,
}

impl StepIds {
    pub fn new(uid: &str, index: usize) -> Self {
        Self {
            tab: format!("{uid}{TAB_SUFFIX}{index}"),
            panel: format!("{uid}{PANEL_SUFFIX}{index}"),
            header: format!("{uid}{TITLE_SUFFIX}{index}"),
        }
    }
}

/// Body of a content panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelContent {
    Html(String),
    Frame { src: String },
}

impl Default for PanelContent {
    fn default() -> Self {
        PanelContent::Html(String::new())
    }
}

/// Everything needed to create the nodes of one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepNodes {
    pub ids: StepIds,
    /// Rendered step button label
    pub label: String,
    /// Raw title markup for the header node
    pub title: String,
    pub body: PanelContent,
}

/// State classes of a step row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RowClass {
    First,
    Last,
    Current,
    Done,
    Disabled,
    Error,
}

impl RowClass {
    pub fn as_str(self) -> &'static str {
        match self {
            RowClass::First => "first",
            RowClass::Last => "last",
            RowClass::Current => "current",
            RowClass::Done => "done",
            RowClass::Disabled => "disabled",
            RowClass::Error => "error",
        }
    }
}

pub type RowClasses = BTreeSet<RowClass>;

/// Controls of the action row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Previous,
    Next,
    Finish,
}

impl Action {
    /// Fragment used as the control's link target.
    pub fn href(self) -> &'static str {
        match self {
            Action::Previous => "#previous",
            Action::Next => "#next",
            Action::Finish => "#finish",
        }
    }
}

/// Visibility and enablement of one action control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlState {
    pub visible: bool,
    pub enabled: bool,
}

impl ControlState {
    pub fn shown(enabled: bool) -> Self {
        Self {
            visible: true,
            enabled,
        }
    }

    pub fn hidden() -> Self {
        Self {
            visible: false,
            enabled: false,
        }
    }
}

/// Visual animation started on a panel; completion is tracked by the wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Animation {
    FadeOut,
    FadeIn,
    SlideUp,
    SlideDown,
    /// Horizontal move between two offsets, in the same unit as `panel_width`
    Offset { from: i32, to: i32 },
}

/// Root structure created on mount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceFrame {
    pub uid: String,
    pub css_class: String,
    pub steps_container_tag: String,
    pub content_container_tag: String,
}

/// The action row created when pagination is enabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRow {
    pub container_tag: String,
    /// Accessible name of the row
    pub label: String,
    /// Controls in display order with their labels
    pub controls: Vec<(Action, String)>,
}

/// Operations the wizard needs from a view binding.
pub trait RenderSurface {
    fn mount(&mut self, frame: &SurfaceFrame);
    fn unmount(&mut self);

    /// Create the row, header and panel for a step at `index`; later nodes shift.
    fn insert_step(&mut self, index: usize, nodes: StepNodes);
    fn remove_step(&mut self, index: usize);
    /// Reassign ids and the button label after positions moved.
    fn relabel_step(&mut self, index: usize, ids: &StepIds, label: &str);

    fn set_row_classes(&mut self, index: usize, classes: &RowClasses);
    /// Move the accessibility "current" marker onto the row at `index`.
    fn set_current_marker(&mut self, index: usize, marker: &str);
    fn focus_row(&mut self, index: usize);

    fn set_panel_current(&mut self, index: usize, current: bool);
    fn set_panel_hidden(&mut self, index: usize, hidden: bool);
    fn set_panel_busy(&mut self, index: usize, busy: bool);
    fn set_panel_content(&mut self, index: usize, content: PanelContent);
    fn set_panel_offset(&mut self, index: usize, offset: i32);
    fn panel_width(&self, index: usize) -> i32;
    fn animate(&mut self, index: usize, animation: Animation, duration: Duration);

    fn mount_actions(&mut self, row: &ActionRow);
    fn set_action_state(&mut self, action: Action, state: ControlState);

    /// Whether an input-like element inside the wizard holds focus.
    fn has_input_focus(&self) -> bool;
}
