//! Turns a markup fragment of alternating title/body elements into steps.
//!
//! Only the top level of the fragment is inspected. Nested elements are
//! skipped over by depth tracking, so a body may contain further `div`s.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::StepsError;
use crate::wizard::{ContentMode, Step};

static COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").expect("valid regex"));

static TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<(/?)([a-zA-Z][a-zA-Z0-9-]*)((?:[^>"']|"[^"]*"|'[^']*')*?)(/?)>"#)
        .expect("valid regex")
});

static ATTR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([^\s=/"']+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+)))?"#)
        .expect("valid regex")
});

const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// A top-level element of the source fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Lower-cased tag name
    pub tag: String,
    pub attrs: HashMap<String, String>,
    /// Raw markup between the opening and closing tag
    pub inner: String,
}

impl Element {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }
}

/// Split `source` into its top-level elements, in document order.
///
/// Text between elements is ignored. Unclosed elements are dropped.
pub fn top_level_elements(source: &str) -> Vec<Element> {
    let source = COMMENT.replace_all(source, "");
    let mut elements = Vec::new();
    let mut stack: Vec<(String, &str, usize)> = Vec::new();

    for caps in TAG.captures_iter(&source) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(2)) else {
            continue;
        };
        let closing = caps.get(1).is_some_and(|m| !m.as_str().is_empty());
        let self_closing = caps.get(4).is_some_and(|m| !m.as_str().is_empty());
        let attrs = caps.get(3).map_or("", |m| m.as_str());
        let tag = name.as_str().to_ascii_lowercase();

        if closing {
            let Some(pos) = stack.iter().rposition(|(open, _, _)| *open == tag) else {
                continue;
            };
            // Unclosed children of the matched element are implicitly closed.
            let (open_tag, open_attrs, inner_start) = stack[pos].clone();
            stack.truncate(pos);
            if stack.is_empty() {
                elements.push(Element {
                    tag: open_tag,
                    attrs: parse_attrs(open_attrs),
                    inner: source[inner_start..whole.start()].to_string(),
                });
            }
        } else if self_closing || VOID_TAGS.contains(&tag.as_str()) {
            if stack.is_empty() {
                elements.push(Element {
                    tag,
                    attrs: parse_attrs(attrs),
                    inner: String::new(),
                });
            }
        } else {
            stack.push((tag, attrs, whole.end()));
        }
    }

    elements
}

fn parse_attrs(raw: &str) -> HashMap<String, String> {
    ATTR.captures_iter(raw)
        .filter_map(|caps| {
            let name = caps.get(1)?.as_str().to_ascii_lowercase();
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map_or("", |m| m.as_str());
            Some((name, value.to_string()))
        })
        .collect()
}

/// Build one step per title/body pair.
///
/// Fails with [`StepsError::StructuralMismatch`] when the counts differ, and
/// with an enum error when a body carries an unresolvable `data-mode`.
pub fn parse(source: &str, header_tag: &str, body_tag: &str) -> Result<Vec<Step>, StepsError> {
    let header_tag = header_tag.to_ascii_lowercase();
    let body_tag = body_tag.to_ascii_lowercase();
    let elements = top_level_elements(source);

    let titles: Vec<&Element> = elements.iter().filter(|e| e.tag == header_tag).collect();
    let bodies: Vec<&Element> = elements.iter().filter(|e| e.tag == body_tag).collect();

    if titles.len() > bodies.len() {
        return Err(StepsError::StructuralMismatch(
            "One or more corresponding step contents are missing.".to_string(),
        ));
    }
    if titles.len() < bodies.len() {
        return Err(StepsError::StructuralMismatch(
            "One or more corresponding step titles are missing.".to_string(),
        ));
    }

    titles
        .iter()
        .zip(bodies.iter())
        .map(|(title, body)| step_from_pair(title, body))
        .collect()
}

fn step_from_pair(title: &Element, body: &Element) -> Result<Step, StepsError> {
    let mode = ContentMode::from_data_mode(body.attr("data-mode"))?;
    let step = if mode == ContentMode::Html {
        Step::html(title.inner.trim(), body.inner.trim())
    } else {
        Step {
            title: title.inner.trim().to_string(),
            content: String::new(),
            content_url: body.attr("data-url").unwrap_or_default().to_string(),
            content_mode: mode,
            content_loaded: body.attr("data-loaded") == Some("1"),
        }
    };
    Ok(step)
}
