//! The set of characters the user has tapped.

use serde::Serialize;

/// Ordered set of selected characters, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Selection {
    chars: Vec<char>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects `ch` if it is not selected, deselects it otherwise.
    /// Returns whether `ch` is selected afterwards.
    pub fn toggle(&mut self, ch: char) -> bool {
        if let Some(pos) = self.chars.iter().position(|&c| c == ch) {
            self.chars.remove(pos);
            false
        } else {
            self.chars.push(ch);
            true
        }
    }

    pub fn contains(&self, ch: char) -> bool {
        self.chars.contains(&ch)
    }

    /// Most recently selected character.
    pub fn last(&self) -> Option<char> {
        self.chars.last().copied()
    }

    pub fn clear(&mut self) {
        self.chars.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn as_slice(&self) -> &[char] {
        &self.chars
    }
}
