//! Tauri commands for the analysis page and text input.

use crate::analysis::{kanji_table, single_char, AnalysisSession, AnalysisView, SAMPLE_TEXT};
use crate::api::{BackendClient, KanjiInfo};
use std::sync::Mutex;
use tauri::State;

/// Tauri command: set the text to analyse.
///
/// Uses `text` when the user typed something; otherwise asks the backend
/// for its current translation, and falls back to the sample sentence.
#[tauri::command]
pub async fn load_analysis_text(
    text: Option<String>,
    session: State<'_, Mutex<AnalysisSession>>,
    client: State<'_, BackendClient>,
) -> Result<AnalysisView, String> {
    let text = match text.filter(|t| !t.trim().is_empty()) {
        Some(t) => t,
        None => match client.fetch_translation().await {
            Ok(t) => t,
            Err(e) => {
                log::warn!("[ANALYSIS] No translation from backend, using sample text: {}", e);
                SAMPLE_TEXT.to_string()
            }
        },
    };

    let mut guard = session.lock().map_err(|e| e.to_string())?;
    guard.set_text(text);
    log::info!("[ANALYSIS] Loaded {} characters", guard.text().chars().count());
    Ok(guard.view())
}

/// Tauri command: current analysis view without changing anything.
#[tauri::command]
pub fn analysis_view(session: State<'_, Mutex<AnalysisSession>>) -> Result<AnalysisView, String> {
    let guard = session.lock().map_err(|e| e.to_string())?;
    Ok(guard.view())
}

/// Tauri command: select or deselect a character.
#[tauri::command]
pub fn toggle_character(
    character: String,
    session: State<'_, Mutex<AnalysisSession>>,
) -> Result<AnalysisView, String> {
    let ch = single_char(&character)
        .ok_or_else(|| format!("Expected a single character, got '{}'", character))?;
    let mut guard = session.lock().map_err(|e| e.to_string())?;
    guard.toggle(ch);
    Ok(guard.view())
}

/// Tauri command: deselect everything.
#[tauri::command]
pub fn reset_selection(session: State<'_, Mutex<AnalysisSession>>) -> Result<AnalysisView, String> {
    let mut guard = session.lock().map_err(|e| e.to_string())?;
    guard.reset_selection();
    Ok(guard.view())
}

/// Tauri command: tooltip data for a hovered character.
#[tauri::command]
pub fn hover_character(character: String) -> Option<KanjiInfo> {
    single_char(&character)
        .and_then(kanji_table::lookup)
        .cloned()
}

/// Tauri command: copy the analysed text to the system clipboard.
#[tauri::command]
pub fn copy_analysis_text(session: State<'_, Mutex<AnalysisSession>>) -> Result<(), String> {
    let text = session.lock().map_err(|e| e.to_string())?.text().to_string();
    if text.is_empty() {
        return Ok(());
    }
    let mut clipboard = arboard::Clipboard::new().map_err(|e| e.to_string())?;
    clipboard.set_text(text).map_err(|e| e.to_string())?;
    log::info!("[ANALYSIS] Text copied to clipboard");
    Ok(())
}

/// Tauri command: OCR and translate an image the webview already holds.
///
/// Returns `None` when the backend cannot produce text.
#[tauri::command]
pub async fn translate_image(
    image_data: String,
    client: State<'_, BackendClient>,
) -> Result<Option<String>, String> {
    match client.translate_image(&image_data).await {
        Ok(text) => Ok(Some(text)),
        Err(e) => {
            log::warn!("[ANALYSIS] Translation failed: {}", e);
            Ok(None)
        }
    }
}
