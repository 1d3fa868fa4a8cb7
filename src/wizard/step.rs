//! Step records and the ordered registry that holds them.

use serde::{Deserialize, Serialize};

use super::enums::{EnumRepr, KeyedEnum};
use crate::error::StepsError;

/// How a step's body is obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "EnumRepr")]
pub enum ContentMode {
    /// Body markup is inline in the source.
    #[default]
    Html,
    /// Body is an embedded frame pointing at `content_url`.
    Iframe,
    /// Body is fetched from `content_url` when the step is first shown.
    Async,
}

impl KeyedEnum for ContentMode {
    const ENTRIES: &'static [(&'static str, Self)] = &[
        ("html", ContentMode::Html),
        ("iframe", ContentMode::Iframe),
        ("async", ContentMode::Async),
    ];
}

impl TryFrom<EnumRepr> for ContentMode {
    type Error = StepsError;

    fn try_from(repr: EnumRepr) -> Result<Self, Self::Error> {
        repr.resolve()
    }
}

impl ContentMode {
    /// Resolve the `data-mode` attribute of a content element.
    ///
    /// A missing attribute means inline markup.
    pub fn from_data_mode(attr: Option<&str>) -> Result<Self, StepsError> {
        match attr {
            None => Ok(ContentMode::Html),
            Some(raw) => Self::from_attr(raw),
        }
    }
}

/// One page of the wizard.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Step {
    /// Header markup, used for the step button label.
    pub title: String,
    /// Inline body markup; empty unless the mode is `Html`.
    pub content: String,
    /// Source for `Iframe` and `Async` modes.
    pub content_url: String,
    pub content_mode: ContentMode,
    /// Whether non-inline content has been rendered at least once.
    pub content_loaded: bool,
}

impl Step {
    pub fn html(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            ..Self::default()
        }
    }

    pub fn iframe(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content_url: url.into(),
            content_mode: ContentMode::Iframe,
            ..Self::default()
        }
    }

    pub fn remote(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content_url: url.into(),
            content_mode: ContentMode::Async,
            ..Self::default()
        }
    }

    /// Drop fields that carry no meaning for the step's mode.
    pub(crate) fn normalized(mut self) -> Self {
        if self.content_mode == ContentMode::Html {
            self.content_url.clear();
            self.content_loaded = false;
        } else {
            self.content.clear();
        }
        self
    }
}

/// Identity of a step that survives index shifts.
///
/// Positions change on insert/remove; deferred work (a pending transition, an
/// in-flight fetch) is addressed by key and resolved to a position when it runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StepKey(u64);

impl StepKey {
    #[cfg(test)]
    pub(crate) fn from_raw(raw: u64) -> Self {
        StepKey(raw)
    }
}

#[derive(Debug, Clone)]
struct StepEntry {
    key: StepKey,
    step: Step,
}

/// Ordered, position-addressed collection of steps.
#[derive(Debug, Clone, Default)]
pub struct StepRegistry {
    entries: Vec<StepEntry>,
    next_key: u64,
}

impl StepRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<&Step, StepsError> {
        self.entries
            .get(index)
            .map(|e| &e.step)
            .ok_or_else(|| StepsError::out_of_range(index, self.count()))
    }

    pub fn get_mut(&mut self, index: usize) -> Result<&mut Step, StepsError> {
        let count = self.count();
        self.entries
            .get_mut(index)
            .map(|e| &mut e.step)
            .ok_or_else(|| StepsError::out_of_range(index, count))
    }

    /// Append a step, returning its key.
    pub fn push(&mut self, step: Step) -> StepKey {
        let key = self.allocate_key();
        self.entries.push(StepEntry { key, step });
        key
    }

    /// Insert at `index` (`0 <= index <= count`); later steps shift by one.
    pub fn insert_at(&mut self, index: usize, step: Step) -> Result<StepKey, StepsError> {
        if index > self.count() {
            return Err(StepsError::out_of_range(index, self.count()));
        }
        let key = self.allocate_key();
        self.entries.insert(index, StepEntry { key, step });
        Ok(key)
    }

    /// Remove the step at `index` (`0 <= index < count`).
    pub fn remove_at(&mut self, index: usize) -> Result<Step, StepsError> {
        if index >= self.count() {
            return Err(StepsError::out_of_range(index, self.count()));
        }
        Ok(self.entries.remove(index).step)
    }

    pub fn key_of(&self, index: usize) -> Option<StepKey> {
        self.entries.get(index).map(|e| e.key)
    }

    /// Current position of a keyed step, if it still exists.
    pub fn index_of(&self, key: StepKey) -> Option<usize> {
        self.entries.iter().position(|e| e.key == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Step> {
        self.entries.iter().map(|e| &e.step)
    }

    fn allocate_key(&mut self) -> StepKey {
        let key = StepKey(self.next_key);
        self.next_key += 1;
        key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry(titles: &[&str]) -> StepRegistry {
        let mut reg = StepRegistry::new();
        for title in titles {
            reg.push(Step::html(*title, ""));
        }
        reg
    }

    #[test]
    fn test_get_by_position() {
        let reg = registry(&["a", "b", "c"]);
        assert_eq!(reg.get(1).unwrap().title, "b");
        assert!(matches!(
            reg.get(3),
            Err(StepsError::IndexOutOfRange { index: 3, count: 3 })
        ));
    }

    #[test]
    fn test_insert_shifts_later_positions() {
        let mut reg = registry(&["a", "b"]);
        reg.insert_at(1, Step::html("x", "")).unwrap();
        let titles: Vec<_> = reg.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, ["a", "x", "b"]);
    }

    #[test]
    fn test_insert_at_count_appends() {
        let mut reg = registry(&["a"]);
        reg.insert_at(1, Step::html("z", "")).unwrap();
        assert_eq!(reg.get(1).unwrap().title, "z");
        assert!(reg.insert_at(5, Step::default()).is_err());
    }

    #[test]
    fn test_remove_out_of_range() {
        let mut reg = registry(&["a"]);
        assert!(reg.remove_at(1).is_err());
        assert_eq!(reg.remove_at(0).unwrap().title, "a");
        assert!(reg.is_empty());
    }

    #[test]
    fn test_keys_follow_steps_across_shifts() {
        let mut reg = registry(&["a", "b"]);
        let b = reg.key_of(1).unwrap();
        reg.insert_at(0, Step::html("first", "")).unwrap();
        assert_eq!(reg.index_of(b), Some(2));
        reg.remove_at(2).unwrap();
        assert_eq!(reg.index_of(b), None);
    }

    #[test]
    fn test_content_mode_from_data_mode() {
        assert_eq!(ContentMode::from_data_mode(None).unwrap(), ContentMode::Html);
        assert_eq!(
            ContentMode::from_data_mode(Some("0")).unwrap(),
            ContentMode::Html
        );
        assert_eq!(
            ContentMode::from_data_mode(Some("async")).unwrap(),
            ContentMode::Async
        );
        assert_eq!(
            ContentMode::from_data_mode(Some("2")).unwrap(),
            ContentMode::Async
        );
    }

    #[test]
    fn test_content_mode_rejects_bad_attributes() {
        assert!(matches!(
            ContentMode::from_data_mode(Some("")),
            Err(StepsError::InvalidEnumKey(_))
        ));
        assert!(matches!(
            ContentMode::from_data_mode(Some("   ")),
            Err(StepsError::InvalidEnumKey(_))
        ));
        assert!(matches!(
            ContentMode::from_data_mode(Some("blah")),
            Err(StepsError::InvalidEnumKey(_))
        ));
        assert!(matches!(
            ContentMode::from_data_mode(Some("5")),
            Err(StepsError::InvalidEnumValue(_))
        ));
        assert!(matches!(
            ContentMode::from_data_mode(Some("-1")),
            Err(StepsError::InvalidEnumValue(_))
        ));
    }

    #[test]
    fn test_content_mode_deserializes_from_key_or_value() {
        let by_key: ContentMode = serde_json::from_str("\"iframe\"").unwrap();
        let by_value: ContentMode = serde_json::from_str("1").unwrap();
        assert_eq!(by_key, ContentMode::Iframe);
        assert_eq!(by_value, ContentMode::Iframe);
        assert!(serde_json::from_str::<ContentMode>("9").is_err());
        assert_eq!(serde_json::to_string(&ContentMode::Async).unwrap(), "\"async\"");
    }

    #[test]
    fn test_normalized_clears_mode_irrelevant_fields() {
        let mut step = Step::html("t", "body");
        step.content_url = "/ignored".to_string();
        step.content_loaded = true;
        let step = step.normalized();
        assert!(step.content_url.is_empty());
        assert!(!step.content_loaded);

        let mut remote = Step::remote("t", "/x");
        remote.content = "inline".to_string();
        assert!(remote.normalized().content.is_empty());
    }
}
