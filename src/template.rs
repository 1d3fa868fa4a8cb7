//! Placeholder substitution for step titles and loading placeholders.
//!
//! Templates reference values as `#key#`, where `key` is made of ASCII letters
//! only. Every referenced key must be present in the substitution map.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::StepsError;

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"#([a-zA-Z]*)#").expect("placeholder pattern is valid"));

/// Substitution values keyed by placeholder name.
pub type Substitutions<'a> = HashMap<&'a str, String>;

/// Render `template`, replacing each `#key#` with `substitutes[key]`.
///
/// Fails with [`StepsError::MissingSubstitution`] on the first key that has no
/// value; nothing is partially rendered in that case.
pub fn render(template: &str, substitutes: &Substitutions<'_>) -> Result<String, StepsError> {
    let mut rendered = String::with_capacity(template.len());
    let mut last = 0;

    for caps in PLACEHOLDER.captures_iter(template) {
        let (Some(whole), Some(key)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let key = key.as_str();
        let value = substitutes
            .get(key)
            .ok_or_else(|| StepsError::MissingSubstitution {
                key: key.to_string(),
            })?;

        rendered.push_str(&template[last..whole.start()]);
        rendered.push_str(value);
        last = whole.end();
    }

    rendered.push_str(&template[last..]);
    Ok(rendered)
}

/// Render a step button label (`#index#` is one-based).
pub fn render_title(template: &str, index: usize, title: &str) -> Result<String, StepsError> {
    let mut substitutes = Substitutions::new();
    substitutes.insert("index", (index + 1).to_string());
    substitutes.insert("title", title.to_string());
    render(template, &substitutes)
}

/// Render the placeholder shown while async content is being fetched.
pub fn render_loading(template: &str, text: &str) -> Result<String, StepsError> {
    let mut substitutes = Substitutions::new();
    substitutes.insert("text", text.to_string());
    render(template, &substitutes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_replaces_every_occurrence() {
        let mut subs = Substitutions::new();
        subs.insert("name", "Ada".to_string());
        let out = render("#name# and #name# again", &subs).unwrap();
        assert_eq!(out, "Ada and Ada again");
    }

    #[test]
    fn test_render_missing_key_fails() {
        let subs = Substitutions::new();
        let err = render("hello #who#", &subs).unwrap_err();
        assert_eq!(
            err,
            StepsError::MissingSubstitution {
                key: "who".to_string()
            }
        );
    }

    #[test]
    fn test_render_without_placeholders_is_identity() {
        let subs = Substitutions::new();
        assert_eq!(render("plain text", &subs).unwrap(), "plain text");
    }

    #[test]
    fn test_render_does_not_rescan_substituted_values() {
        let mut subs = Substitutions::new();
        subs.insert("a", "#b#".to_string());
        assert_eq!(render("[#a#]", &subs).unwrap(), "[#b#]");
    }

    #[test]
    fn test_render_is_repeatable() {
        let mut subs = Substitutions::new();
        subs.insert("text", "Loading".to_string());
        let first = render("<i></i> #text#", &subs).unwrap();
        let second = render("<i></i> #text#", &subs).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_digits_are_not_part_of_a_key() {
        let subs = Substitutions::new();
        assert_eq!(render("#1#", &subs).unwrap(), "#1#");
    }

    #[test]
    fn test_render_title_uses_one_based_index() {
        let out = render_title("<span class=\"number\">#index#.</span> #title#", 0, "Intro")
            .unwrap();
        assert_eq!(out, "<span class=\"number\">1.</span> Intro");
    }

    #[test]
    fn test_render_loading() {
        let out = render_loading("<span class=\"spinner\"></span> #text#", "Loading ...")
            .unwrap();
        assert!(out.ends_with("Loading ..."));
    }
}
