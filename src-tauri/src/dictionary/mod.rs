//! Free-text dictionary search and single-kanji lookup.
//!
//! Failures never reach the caller: they are logged and degrade to "no
//! results" / "not found".

use crate::analysis::{kanji_table, single_char};
use crate::api::{BackendClient, KanjiInfo, SearchResult};

/// Queries submitted during this run, oldest first.
#[derive(Debug, Default)]
pub struct DictionarySession {
    history: Vec<String>,
}

impl DictionarySession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a query. Blank queries are not recorded.
    /// Returns the trimmed query if it was recorded.
    pub fn record(&mut self, query: &str) -> Option<String> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }
        self.history.push(query.to_string());
        Some(query.to_string())
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }
}

/// Runs a general search. An empty query returns nothing without a request.
pub async fn search(client: &BackendClient, query: &str) -> Vec<SearchResult> {
    if query.trim().is_empty() {
        return Vec::new();
    }
    match client.search_general(query).await {
        Ok(results) => results,
        Err(e) => {
            log::warn!("[DICT] Search for '{}' failed: {}", query.trim(), e);
            Vec::new()
        }
    }
}

/// Looks up one kanji.
///
/// Anything other than a single character is rejected without a request.
/// A backend "not found" is final; an unreachable or failing backend falls
/// back to the bundled table.
pub async fn lookup_kanji(client: &BackendClient, term: &str) -> Option<KanjiInfo> {
    let Some(ch) = single_char(term) else {
        log::info!("[DICT] Ignoring kanji lookup for '{}': not a single character", term);
        return None;
    };

    match client.kanji_detail(ch).await {
        Ok(found) => found,
        Err(e) => {
            log::warn!("[DICT] Kanji lookup for '{}' failed, using bundled table: {}", ch, e);
            kanji_table::lookup(ch).cloned()
        }
    }
}
