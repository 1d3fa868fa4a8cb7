//! In-memory document implementing [`RenderSurface`].
//!
//! Holds rows, panels and actions exactly as the wizard described them. The
//! terminal front-end draws from it and tests assert against it.

use std::collections::HashMap;
use std::time::Duration;

use super::{
    Action, ActionRow, Animation, ControlState, PanelContent, RenderSurface, RowClass, RowClasses,
    StepIds, StepNodes, SurfaceFrame,
};

/// Default panel width reported to `SlideLeft` transitions.
pub const DEFAULT_PANEL_WIDTH: i32 = 600;

/// A step button in the steps list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowNode {
    pub id: String,
    /// Link target (`#<header id>`)
    pub href: String,
    /// Id of the panel this row controls
    pub controls: String,
    pub label: String,
    pub classes: RowClasses,
    /// Accessibility marker text, present on the current row only
    pub marker: Option<String>,
}

impl RowNode {
    pub fn has(&self, class: RowClass) -> bool {
        self.classes.contains(&class)
    }

    pub fn aria_selected(&self) -> bool {
        self.has(RowClass::Current)
    }

    pub fn aria_disabled(&self) -> bool {
        self.has(RowClass::Disabled)
    }
}

/// A step header plus its content panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelNode {
    pub id: String,
    pub header_id: String,
    pub title: String,
    pub content: PanelContent,
    pub current: bool,
    pub hidden: bool,
    pub busy: bool,
    pub offset: i32,
    /// Animation started most recently and not yet settled
    pub animating: Option<Animation>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionNode {
    pub label: String,
    pub state: ControlState,
}

#[derive(Debug, Clone, Default)]
pub struct MemorySurface {
    pub frame: Option<SurfaceFrame>,
    pub rows: Vec<RowNode>,
    pub panels: Vec<PanelNode>,
    /// Accessible name of the action row, if one was mounted
    pub actions_label: Option<String>,
    pub actions: HashMap<Action, ActionNode>,
    action_order: Vec<Action>,
    pub focused_row: Option<usize>,
    /// Simulated focus on a form field inside the wizard
    pub input_focused: bool,
    pub panel_width: i32,
    /// Every animation started, in order
    pub animation_log: Vec<(usize, Animation, Duration)>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self {
            panel_width: DEFAULT_PANEL_WIDTH,
            ..Self::default()
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.frame.is_some()
    }

    /// Positions of the rows carrying `class`.
    pub fn rows_with(&self, class: RowClass) -> Vec<usize> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, row)| row.has(class))
            .map(|(i, _)| i)
            .collect()
    }

    /// Positions of the panels not hidden.
    pub fn visible_panels(&self) -> Vec<usize> {
        self.panels
            .iter()
            .enumerate()
            .filter(|(_, panel)| !panel.hidden)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn action(&self, action: Action) -> Option<ControlState> {
        self.actions.get(&action).map(|node| node.state)
    }

    /// Mounted actions in display order.
    pub fn action_order(&self) -> &[Action] {
        &self.action_order
    }

    pub fn titles(&self) -> Vec<&str> {
        self.panels.iter().map(|p| p.title.as_str()).collect()
    }
}

impl RenderSurface for MemorySurface {
    fn mount(&mut self, frame: &SurfaceFrame) {
        self.frame = Some(frame.clone());
    }

    fn unmount(&mut self) {
        self.frame = None;
        self.rows.clear();
        self.panels.clear();
        self.actions.clear();
        self.action_order.clear();
        self.actions_label = None;
        self.focused_row = None;
    }

    fn insert_step(&mut self, index: usize, nodes: StepNodes) {
        let index = index.min(self.rows.len());
        self.rows.insert(
            index,
            RowNode {
                id: nodes.ids.tab,
                href: format!("#{}", nodes.ids.header),
                controls: nodes.ids.panel.clone(),
                label: nodes.label,
                classes: RowClasses::new(),
                marker: None,
            },
        );
        self.panels.insert(
            index,
            PanelNode {
                id: nodes.ids.panel,
                header_id: nodes.ids.header,
                title: nodes.title,
                content: nodes.body,
                current: false,
                hidden: true,
                busy: false,
                offset: 0,
                animating: None,
            },
        );
        if let Some(focused) = self.focused_row.as_mut() {
            if *focused >= index {
                *focused += 1;
            }
        }
    }

    fn remove_step(&mut self, index: usize) {
        if index < self.rows.len() {
            self.rows.remove(index);
            self.panels.remove(index);
        }
        self.focused_row = match self.focused_row {
            Some(f) if f == index => None,
            Some(f) if f > index => Some(f - 1),
            other => other,
        };
    }

    fn relabel_step(&mut self, index: usize, ids: &StepIds, label: &str) {
        if let Some(row) = self.rows.get_mut(index) {
            row.id = ids.tab.clone();
            row.href = format!("#{}", ids.header);
            row.controls = ids.panel.clone();
            row.label = label.to_string();
        }
        if let Some(panel) = self.panels.get_mut(index) {
            panel.id = ids.panel.clone();
            panel.header_id = ids.header.clone();
        }
    }

    fn set_row_classes(&mut self, index: usize, classes: &RowClasses) {
        if let Some(row) = self.rows.get_mut(index) {
            row.classes = classes.clone();
        }
    }

    fn set_current_marker(&mut self, index: usize, marker: &str) {
        for row in &mut self.rows {
            row.marker = None;
        }
        if let Some(row) = self.rows.get_mut(index) {
            row.marker = Some(marker.to_string());
        }
    }

    fn focus_row(&mut self, index: usize) {
        if index < self.rows.len() {
            self.focused_row = Some(index);
        }
    }

    fn set_panel_current(&mut self, index: usize, current: bool) {
        if let Some(panel) = self.panels.get_mut(index) {
            panel.current = current;
        }
    }

    fn set_panel_hidden(&mut self, index: usize, hidden: bool) {
        if let Some(panel) = self.panels.get_mut(index) {
            panel.hidden = hidden;
            panel.animating = None;
        }
    }

    fn set_panel_busy(&mut self, index: usize, busy: bool) {
        if let Some(panel) = self.panels.get_mut(index) {
            panel.busy = busy;
        }
    }

    fn set_panel_content(&mut self, index: usize, content: PanelContent) {
        if let Some(panel) = self.panels.get_mut(index) {
            panel.content = content;
        }
    }

    fn set_panel_offset(&mut self, index: usize, offset: i32) {
        if let Some(panel) = self.panels.get_mut(index) {
            panel.offset = offset;
            if offset == 0 {
                panel.animating = None;
            }
        }
    }

    fn panel_width(&self, _index: usize) -> i32 {
        self.panel_width
    }

    fn animate(&mut self, index: usize, animation: Animation, duration: Duration) {
        if let Some(panel) = self.panels.get_mut(index) {
            panel.animating = Some(animation);
            self.animation_log.push((index, animation, duration));
        }
    }

    fn mount_actions(&mut self, row: &ActionRow) {
        self.actions_label = Some(row.label.clone());
        self.actions.clear();
        self.action_order.clear();
        for (action, label) in &row.controls {
            self.action_order.push(*action);
            self.actions.insert(
                *action,
                ActionNode {
                    label: label.clone(),
                    state: ControlState::shown(true),
                },
            );
        }
    }

    fn set_action_state(&mut self, action: Action, state: ControlState) {
        if let Some(node) = self.actions.get_mut(&action) {
            node.state = state;
        }
    }

    fn has_input_focus(&self) -> bool {
        self.input_focused
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nodes(uid: &str, index: usize, title: &str) -> StepNodes {
        StepNodes {
            ids: StepIds::new(uid, index),
            label: title.to_string(),
            title: title.to_string(),
            body: PanelContent::Html(format!("<p>{title}</p>")),
        }
    }

    #[test]
    fn test_inserted_panels_start_hidden() {
        let mut surface = MemorySurface::new();
        surface.insert_step(0, nodes("u", 0, "a"));
        assert!(surface.panels[0].hidden);
        assert!(surface.visible_panels().is_empty());
        assert_eq!(surface.rows[0].href, "#u-h-0");
        assert_eq!(surface.rows[0].controls, "u-p-0");
    }

    #[test]
    fn test_focus_follows_shifts() {
        let mut surface = MemorySurface::new();
        surface.insert_step(0, nodes("u", 0, "a"));
        surface.insert_step(1, nodes("u", 1, "b"));
        surface.focus_row(1);
        surface.insert_step(0, nodes("u", 0, "z"));
        assert_eq!(surface.focused_row, Some(2));
        surface.remove_step(2);
        assert_eq!(surface.focused_row, None);
    }

    #[test]
    fn test_marker_moves() {
        let mut surface = MemorySurface::new();
        surface.insert_step(0, nodes("u", 0, "a"));
        surface.insert_step(1, nodes("u", 1, "b"));
        surface.set_current_marker(0, "current step:");
        surface.set_current_marker(1, "current step:");
        assert_eq!(surface.rows[0].marker, None);
        assert_eq!(surface.rows[1].marker.as_deref(), Some("current step:"));
    }

    #[test]
    fn test_unmount_clears_document() {
        let mut surface = MemorySurface::new();
        surface.mount(&SurfaceFrame {
            uid: "u".to_string(),
            css_class: "wizard".to_string(),
            steps_container_tag: "div".to_string(),
            content_container_tag: "div".to_string(),
        });
        surface.insert_step(0, nodes("u", 0, "a"));
        surface.unmount();
        assert!(!surface.is_mounted());
        assert!(surface.rows.is_empty());
        assert!(surface.panels.is_empty());
    }
}
