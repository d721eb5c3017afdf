//! Character classification.

use serde::Serialize;

/// CJK Unified Ideographs, up to the end of the JIS-relevant range.
const UNIFIED: std::ops::RangeInclusive<u32> = 0x4E00..=0x9FAF;
/// CJK Unified Ideographs Extension A.
const EXTENSION_A: std::ops::RangeInclusive<u32> = 0x3400..=0x4DBF;

/// Whether `ch` is a kanji, judged purely by code point range.
pub fn is_kanji(ch: char) -> bool {
    let code = ch as u32;
    UNIFIED.contains(&code) || EXTENSION_A.contains(&code)
}

/// One character of the interactive text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Glyph {
    pub ch: char,
    pub is_kanji: bool,
    /// The bundled table has an entry for this character.
    pub has_entry: bool,
    pub selected: bool,
}

/// Splits `text` into glyphs. `has_entry` and `selected` are answered by
/// the callbacks so this stays independent of where the data lives.
pub fn glyphs(
    text: &str,
    has_entry: impl Fn(char) -> bool,
    selected: impl Fn(char) -> bool,
) -> Vec<Glyph> {
    text.chars()
        .map(|ch| {
            let kanji = is_kanji(ch);
            Glyph {
                ch,
                is_kanji: kanji,
                has_entry: kanji && has_entry(ch),
                selected: selected(ch),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unified_block_edges() {
        assert!(is_kanji('\u{4E00}'));
        assert!(is_kanji('\u{9FAF}'));
        assert!(!is_kanji('\u{4DFF}')); // hexagram symbol, between the blocks
        assert!(!is_kanji('\u{9FB0}'));
    }

    #[test]
    fn extension_a_edges() {
        assert!(is_kanji('\u{3400}'));
        assert!(is_kanji('\u{4DBF}'));
        assert!(!is_kanji('\u{33FF}'));
    }

    #[test]
    fn common_text() {
        for ch in "私日本語漢字".chars() {
            assert!(is_kanji(ch), "{} should be kanji", ch);
        }
        for ch in "はをカタ。、 aA1！".chars() {
            assert!(!is_kanji(ch), "{} should not be kanji", ch);
        }
    }

    #[test]
    fn glyphs_split_by_character() {
        let out = glyphs("私は", |c| c == '私', |c| c == 'は');
        assert_eq!(out.len(), 2);
        assert_eq!(
            out[0],
            Glyph { ch: '私', is_kanji: true, has_entry: true, selected: false }
        );
        assert_eq!(
            out[1],
            Glyph { ch: 'は', is_kanji: false, has_entry: false, selected: true }
        );
    }

    #[test]
    fn non_kanji_never_has_entry() {
        let out = glyphs("あ", |_| true, |_| false);
        assert!(!out[0].has_entry);
    }
}
