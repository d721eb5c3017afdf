//! Interactive text analysis.
//!
//! Holds the text being read and the characters the user has tapped, and
//! projects them into a view the webview renders directly.

mod kanji;
pub mod kanji_table;
mod selection;

pub use kanji::{glyphs, is_kanji, Glyph};
pub use selection::Selection;

use crate::api::KanjiInfo;
use serde::Serialize;

/// Shown when neither the user nor the backend supplied any text.
pub const SAMPLE_TEXT: &str = "私は日本語を勉強しています。 漢字は難しいですが、面白いです。";

/// Everything the analysis page needs to render.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisView {
    pub text: String,
    pub glyphs: Vec<Glyph>,
    pub selected: Selection,
    /// Detail entry of the most recently selected character.
    pub detail: Option<KanjiInfo>,
}

#[derive(Debug, Default)]
pub struct AnalysisSession {
    text: String,
    selection: Selection,
}

impl AnalysisSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Replaces the text. The old selection refers to the old text, so it goes too.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.selection.clear();
    }

    /// Toggles `ch` in the selection. Returns whether it is now selected.
    pub fn toggle(&mut self, ch: char) -> bool {
        self.selection.toggle(ch)
    }

    pub fn reset_selection(&mut self) {
        self.selection.clear();
    }

    pub fn view(&self) -> AnalysisView {
        AnalysisView {
            text: self.text.clone(),
            glyphs: glyphs(&self.text, kanji_table::contains, |ch| {
                self.selection.contains(ch)
            }),
            selected: self.selection.clone(),
            detail: self
                .selection
                .last()
                .and_then(kanji_table::lookup)
                .cloned(),
        }
    }
}

/// Parses a webview-supplied string that must hold exactly one character.
pub fn single_char(s: &str) -> Option<char> {
    let mut chars = s.trim().chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Some(ch),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_marks_selected_glyphs() {
        let mut session = AnalysisSession::new();
        session.set_text("漢字を");
        session.toggle('字');

        let view = session.view();
        assert_eq!(view.glyphs.len(), 3);
        assert!(!view.glyphs[0].selected);
        assert!(view.glyphs[1].selected);
        assert!(view.glyphs[1].has_entry);
        assert!(!view.glyphs[2].is_kanji);
    }

    #[test]
    fn detail_follows_last_selected() {
        let mut session = AnalysisSession::new();
        session.set_text(SAMPLE_TEXT);
        session.toggle('私');
        session.toggle('語');
        assert_eq!(session.view().detail.unwrap().kanji, "語");

        session.toggle('語');
        assert_eq!(session.view().detail.unwrap().kanji, "私");

        session.reset_selection();
        assert!(session.view().detail.is_none());
    }

    #[test]
    fn selecting_unknown_kanji_has_no_detail() {
        let mut session = AnalysisSession::new();
        session.set_text("鬱");
        session.toggle('鬱');
        let view = session.view();
        assert!(view.glyphs[0].is_kanji);
        assert!(!view.glyphs[0].has_entry);
        assert!(view.detail.is_none());
    }

    #[test]
    fn new_text_clears_selection() {
        let mut session = AnalysisSession::new();
        session.set_text("日本");
        session.toggle('日');
        session.set_text("今日");
        assert!(session.selection().is_empty());
        assert_eq!(session.text(), "今日");
    }

    #[test]
    fn single_char_accepts_exactly_one() {
        assert_eq!(single_char("日"), Some('日'));
        assert_eq!(single_char(" 日 "), Some('日'));
        assert_eq!(single_char(""), None);
        assert_eq!(single_char("日本"), None);
    }
}
