//! KeyClassifier - maps keystrokes to semantic categories

use std::collections::BTreeMap;

use super::category::KeyCategory;
use super::pattern::{KeyPattern, KeyUsage};
use super::types::{KeyCode, Keystroke};

/// Pattern lists per category.
///
/// Classification is pure: a keystroke may belong to several categories and
/// the state machine decides which one wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyClassifier {
    patterns: BTreeMap<KeyCategory, Vec<KeyPattern>>,
}

impl KeyClassifier {
    /// Create a classifier with no patterns
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a classifier from category/pattern pairs
    pub fn with_patterns(patterns: impl IntoIterator<Item = (KeyCategory, KeyPattern)>) -> Self {
        let mut classifier = Self::new();
        for (category, pattern) in patterns {
            classifier.add(category, pattern);
        }
        classifier
    }

    pub fn add(&mut self, category: KeyCategory, pattern: KeyPattern) {
        let list = self.patterns.entry(category).or_default();
        if !list.contains(&pattern) {
            list.push(pattern);
        }
    }

    /// Replace every pattern of a category
    pub fn replace(&mut self, category: KeyCategory, patterns: Vec<KeyPattern>) {
        self.patterns.insert(category, patterns);
    }

    /// Add every pattern of `other`, keeping existing ones
    pub fn merge(&mut self, other: KeyClassifier) {
        for (category, patterns) in other.patterns {
            for pattern in patterns {
                self.add(category, pattern);
            }
        }
    }

    /// Make `key` the only command trigger; it fires with ctrl and alt released
    pub fn set_command_key(&mut self, key: KeyCode) {
        self.replace(
            KeyCategory::Command,
            vec![KeyPattern::new(key).ctrl(KeyUsage::Off).alt(KeyUsage::Off)],
        );
    }

    pub fn patterns(&self, category: KeyCategory) -> &[KeyPattern] {
        self.patterns
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of patterns across all categories
    pub fn len(&self) -> usize {
        self.patterns.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check category membership
    pub fn is(&self, category: KeyCategory, keystroke: &Keystroke) -> bool {
        self.patterns(category)
            .iter()
            .any(|pattern| pattern.matches(keystroke))
    }

    /// All categories the keystroke belongs to, in dispatch order
    pub fn categories(&self, keystroke: &Keystroke) -> Vec<KeyCategory> {
        KeyCategory::ALL
            .into_iter()
            .filter(|&category| self.is(category, keystroke))
            .collect()
    }

    /// First category in dispatch order, if any
    pub fn classify(&self, keystroke: &Keystroke) -> Option<KeyCategory> {
        KeyCategory::ALL
            .into_iter()
            .find(|&category| self.is(category, keystroke))
    }

    // === Shorthands used by the state machine ===

    #[inline]
    pub fn is_swallowed(&self, keystroke: &Keystroke) -> bool {
        self.is(KeyCategory::Denied, keystroke) || self.is(KeyCategory::Paste, keystroke)
    }

    #[inline]
    pub fn is_single_operation(&self, keystroke: &Keystroke) -> bool {
        self.is(KeyCategory::SingleOperation, keystroke)
    }

    #[inline]
    pub fn is_command(&self, keystroke: &Keystroke) -> bool {
        self.is(KeyCategory::Command, keystroke)
    }

    /// Keys that leave a staged deletion pending
    pub fn keeps_staged_deletion(&self, keystroke: &Keystroke) -> bool {
        self.is(KeyCategory::Remove, keystroke)
            || self.is(KeyCategory::Cancel, keystroke)
            || self.is(KeyCategory::VerticalMove, keystroke)
            || self.is(KeyCategory::Enter, keystroke)
    }
}
