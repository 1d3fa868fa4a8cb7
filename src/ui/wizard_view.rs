//! Draws a [`MemorySurface`] with ratatui.

use once_cell::sync::Lazy;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use regex::Regex;

use crate::surface::{Animation, MemorySurface, PanelContent, PanelNode, RowClass, RowNode};

static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<[^>]*>").expect("tag pattern is valid"));
static SPACES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("space pattern is valid"));

/// Flatten markup to display text.
pub fn plain_text(markup: &str) -> String {
    let stripped = TAG.replace_all(markup, " ");
    let collapsed = SPACES.replace_all(&stripped, " ");
    collapsed
        .trim()
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&amp;", "&")
}

/// Screen regions of the wizard.
pub struct WizardLayout {
    pub steps: Rect,
    pub content: Rect,
    pub actions: Rect,
    pub status: Rect,
}

impl WizardLayout {
    pub fn new(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(5),
                Constraint::Length(3),
                Constraint::Length(1),
            ])
            .split(area);
        Self {
            steps: chunks[0],
            content: chunks[1],
            actions: chunks[2],
            status: chunks[3],
        }
    }
}

pub fn render(frame: &mut Frame, surface: &MemorySurface, status: &str) {
    let layout = WizardLayout::new(frame.area());
    render_steps(frame, layout.steps, surface);
    render_content(frame, layout.content, surface);
    render_actions(frame, layout.actions, surface);
    frame.render_widget(
        Paragraph::new(status.to_string()).style(Style::default().fg(Color::DarkGray)),
        layout.status,
    );
}

fn row_style(row: &RowNode) -> Style {
    let style = if row.has(RowClass::Current) {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else if row.has(RowClass::Error) {
        Style::default().fg(Color::Red)
    } else if row.has(RowClass::Disabled) {
        Style::default().fg(Color::DarkGray)
    } else if row.has(RowClass::Done) {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::White)
    };
    if row.has(RowClass::Error) && row.has(RowClass::Current) {
        style.fg(Color::Red)
    } else {
        style
    }
}

fn render_steps(frame: &mut Frame, area: Rect, surface: &MemorySurface) {
    let mut spans = Vec::with_capacity(surface.rows.len() * 2);
    for (index, row) in surface.rows.iter().enumerate() {
        if index > 0 {
            spans.push(Span::styled(" › ", Style::default().fg(Color::DarkGray)));
        }
        let mut style = row_style(row);
        if surface.focused_row == Some(index) {
            style = style.add_modifier(Modifier::UNDERLINED);
        }
        spans.push(Span::styled(format!(" {} ", plain_text(&row.label)), style));
    }

    let title = surface
        .frame
        .as_ref()
        .map_or_else(String::new, |f| format!(" {} ", f.css_class));
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));
    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

/// Whether a panel should be on screen, and how bright.
fn panel_style(panel: &PanelNode) -> Option<Style> {
    match (panel.hidden, panel.animating) {
        (false, Some(Animation::FadeOut | Animation::SlideUp)) => {
            Some(Style::default().fg(Color::DarkGray))
        }
        (false, _) => Some(Style::default()),
        (true, Some(Animation::FadeIn | Animation::SlideDown)) => {
            Some(Style::default().fg(Color::Gray))
        }
        (true, _) => None,
    }
}

fn panel_body(panel: &PanelNode) -> String {
    match &panel.content {
        PanelContent::Html(markup) => plain_text(markup),
        PanelContent::Frame { src } => format!("[embedded page: {src}]"),
    }
}

/// Shift `area` horizontally by `offset` columns, clipped to `bounds`.
fn shifted(area: Rect, offset: i32, bounds: Rect) -> Option<Rect> {
    let left = i32::from(area.x) + offset;
    let right = left + i32::from(area.width);
    let clip_left = left.max(i32::from(bounds.x));
    let clip_right = right.min(i32::from(bounds.x) + i32::from(bounds.width));
    if clip_right <= clip_left {
        return None;
    }
    Some(Rect::new(
        clip_left as u16,
        area.y,
        (clip_right - clip_left) as u16,
        area.height,
    ))
}

fn render_content(frame: &mut Frame, area: Rect, surface: &MemorySurface) {
    frame.render_widget(Clear, area);
    for panel in &surface.panels {
        let Some(style) = panel_style(panel) else {
            continue;
        };
        let Some(target) = shifted(area, panel.offset, area) else {
            continue;
        };

        let mut title = format!(" {} ", plain_text(&panel.title));
        if panel.busy {
            title.push_str("(loading) ");
        }
        let border = if panel.current { Color::Cyan } else { Color::Gray };
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border));
        let body = Paragraph::new(panel_body(panel))
            .style(style)
            .wrap(Wrap { trim: true })
            .block(block);
        frame.render_widget(body, target);
    }
}

fn render_actions(frame: &mut Frame, area: Rect, surface: &MemorySurface) {
    let Some(label) = surface.actions_label.as_deref() else {
        return;
    };

    let mut spans = Vec::new();
    for action in surface.action_order() {
        let Some(node) = surface.actions.get(action) else {
            continue;
        };
        if !node.state.visible {
            continue;
        }
        let style = if node.state.enabled {
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(format!("[ {} ]", node.label), style));
        spans.push(Span::raw("  "));
    }

    let block = Block::default()
        .title(format!(" {label} "))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));
    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_strips_tags_and_entities() {
        assert_eq!(
            plain_text("<span class=\"number\">1.</span> Intro &amp; setup"),
            "1. Intro & setup"
        );
        assert_eq!(plain_text("<p>a</p>\n\n<p>b</p>"), "a b");
    }

    #[test]
    fn test_shifted_clips_to_bounds() {
        let area = Rect::new(0, 2, 80, 10);
        assert_eq!(shifted(area, 0, area), Some(area));
        assert_eq!(shifted(area, 20, area), Some(Rect::new(20, 2, 60, 10)));
        assert_eq!(shifted(area, -30, area), Some(Rect::new(0, 2, 50, 10)));
        assert_eq!(shifted(area, 80, area), None);
    }

    #[test]
    fn test_panel_visibility_follows_animation() {
        let mut panel = PanelNode {
            id: "p".to_string(),
            header_id: "h".to_string(),
            title: "t".to_string(),
            content: PanelContent::default(),
            current: false,
            hidden: true,
            busy: false,
            offset: 0,
            animating: None,
        };
        assert!(panel_style(&panel).is_none());
        panel.animating = Some(Animation::FadeIn);
        assert!(panel_style(&panel).is_some());
        panel.hidden = false;
        panel.animating = None;
        assert_eq!(panel_style(&panel), Some(Style::default()));
    }

    #[test]
    fn test_frame_body_names_source() {
        let panel = PanelNode {
            id: "p".to_string(),
            header_id: "h".to_string(),
            title: "t".to_string(),
            content: PanelContent::Frame {
                src: "/docs".to_string(),
            },
            current: true,
            hidden: false,
            busy: false,
            offset: 0,
            animating: None,
        };
        assert_eq!(panel_body(&panel), "[embedded page: /docs]");
    }
}
