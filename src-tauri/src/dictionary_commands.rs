//! Tauri commands for the dictionary page.

use crate::api::{BackendClient, KanjiInfo, SearchResult};
use crate::dictionary::{self, DictionarySession};
use std::sync::Mutex;
use tauri::State;

/// Tauri command: free-text search. Blank queries return nothing and are
/// not recorded.
#[tauri::command]
pub async fn search_dictionary(
    query: String,
    session: State<'_, Mutex<DictionarySession>>,
    client: State<'_, BackendClient>,
) -> Result<Vec<SearchResult>, String> {
    let recorded = session.lock().map_err(|e| e.to_string())?.record(&query);
    let Some(query) = recorded else {
        return Ok(Vec::new());
    };
    Ok(dictionary::search(&client, &query).await)
}

/// Tauri command: detail for one kanji, or `None` if it is unknown.
#[tauri::command]
pub async fn lookup_kanji(
    character: String,
    client: State<'_, BackendClient>,
) -> Result<Option<KanjiInfo>, String> {
    Ok(dictionary::lookup_kanji(&client, &character).await)
}

/// Tauri command: queries searched so far.
#[tauri::command]
pub fn search_history(session: State<'_, Mutex<DictionarySession>>) -> Result<Vec<String>, String> {
    Ok(session.lock().map_err(|e| e.to_string())?.history().to_vec())
}
