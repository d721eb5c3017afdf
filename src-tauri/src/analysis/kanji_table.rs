//! Bundled, read-only kanji table.
//!
//! A small hand-authored set of entries shipped with the app so the
//! analysis view has detail data even without a backend.

use crate::api::KanjiInfo;
use std::collections::HashMap;
use std::sync::LazyLock;

static TABLE_JSON: &str = include_str!("../../resources/kanji_table.json");

static TABLE: LazyLock<HashMap<char, KanjiInfo>> = LazyLock::new(|| {
    let entries: Vec<KanjiInfo> = match serde_json::from_str(TABLE_JSON) {
        Ok(entries) => entries,
        Err(e) => {
            log::error!("[ANALYSIS] Bundled kanji table is malformed: {}", e);
            Vec::new()
        }
    };

    entries
        .into_iter()
        .filter_map(|info| {
            let mut chars = info.kanji.chars();
            match (chars.next(), chars.next()) {
                (Some(ch), None) => Some((ch, info)),
                _ => {
                    log::warn!("[ANALYSIS] Skipping table entry '{}'", info.kanji);
                    None
                }
            }
        })
        .collect()
});

pub fn lookup(ch: char) -> Option<&'static KanjiInfo> {
    TABLE.get(&ch)
}

pub fn contains(ch: char) -> bool {
    TABLE.contains_key(&ch)
}

pub fn len() -> usize {
    TABLE.len()
}
