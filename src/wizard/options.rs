//! Per-instance wizard configuration.
//!
//! All fields deserialize with defaults, so a config file only names what it
//! changes.

use serde::{Deserialize, Serialize};

use super::enums::{EnumRepr, KeyedEnum};
use crate::error::StepsError;

/// Visual handoff between the outgoing and incoming content panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "EnumRepr")]
pub enum TransitionEffect {
    #[default]
    None,
    Fade,
    Slide,
    SlideLeft,
}

impl KeyedEnum for TransitionEffect {
    const ENTRIES: &'static [(&'static str, Self)] = &[
        ("none", TransitionEffect::None),
        ("fade", TransitionEffect::Fade),
        ("slide", TransitionEffect::Slide),
        ("slideLeft", TransitionEffect::SlideLeft),
    ];
}

impl TryFrom<EnumRepr> for TransitionEffect {
    type Error = StepsError;

    fn try_from(repr: EnumRepr) -> Result<Self, Self::Error> {
        repr.resolve()
    }
}

impl std::str::FromStr for TransitionEffect {
    type Err = StepsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_attr(s)
    }
}

/// User-facing strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Labels {
    /// Accessibility marker prefixed to the current step button.
    pub current: String,
    /// Accessible name of the action row.
    pub pagination: String,
    pub finish: String,
    pub next: String,
    pub previous: String,
    /// Text substituted into the loading template.
    pub loading: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            current: "current step:".to_string(),
            pagination: "Pagination".to_string(),
            finish: "Finish".to_string(),
            next: "Next".to_string(),
            previous: "Previous".to_string(),
            loading: "Loading ...".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WizardOptions {
    /// Tag of the source elements holding step titles
    pub header_tag: String,
    /// Tag of the source elements holding step bodies
    pub body_tag: String,
    pub content_container_tag: String,
    pub action_container_tag: String,
    pub steps_container_tag: String,
    pub css_class: String,

    pub title_template: String,
    pub loading_template: String,

    /// Focus the start step when this is the first wizard of the process
    pub auto_focus: bool,
    /// Every step is clickable from the start
    pub enable_all_steps: bool,
    pub enable_key_navigation: bool,
    pub enable_pagination: bool,
    /// Ignore key navigation while an input inside the wizard has focus
    pub suppress_pagination_on_focus: bool,
    pub enable_content_cache: bool,
    pub enable_finish_button: bool,
    /// Show Finish next to Next instead of replacing it on the last step
    pub show_finish_button_always: bool,
    /// Never navigate backwards; hides Previous
    pub force_move_forward: bool,
    /// Persist the current index through the state store
    pub save_state: bool,
    /// Zero-based initial step
    pub start_index: usize,

    pub transition_effect: TransitionEffect,
    /// Animation duration in milliseconds
    pub transition_effect_speed: u64,

    pub labels: Labels,
}

impl Default for WizardOptions {
    fn default() -> Self {
        Self {
            header_tag: "h1".to_string(),
            body_tag: "div".to_string(),
            content_container_tag: "div".to_string(),
            action_container_tag: "div".to_string(),
            steps_container_tag: "div".to_string(),
            css_class: "wizard".to_string(),
            title_template: "<span class=\"number\">#index#.</span> #title#".to_string(),
            loading_template: "<span class=\"spinner\"></span> #text#".to_string(),
            auto_focus: false,
            enable_all_steps: false,
            enable_key_navigation: true,
            enable_pagination: true,
            suppress_pagination_on_focus: true,
            enable_content_cache: true,
            enable_finish_button: true,
            show_finish_button_always: false,
            force_move_forward: false,
            save_state: false,
            start_index: 0,
            transition_effect: TransitionEffect::None,
            transition_effect_speed: 200,
            labels: Labels::default(),
        }
    }
}

impl WizardOptions {
    pub fn transition_duration(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.transition_effect_speed)
    }
}
