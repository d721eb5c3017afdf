//! Kanji Lens: Tauri application entry point.
//!
//! This is the app shell that wires together:
//! - System tray (tray.rs)
//! - Screen capture domain (capture/)
//! - Backend client (api/)
//! - Analysis and dictionary state (analysis/, dictionary/)
//! - Tauri command handlers for frontend communication

pub mod analysis;
pub mod analysis_commands;
pub mod api;
pub mod capture;
pub mod config;
pub mod dictionary;
pub mod dictionary_commands;
mod tray;

use analysis::AnalysisSession;
use api::BackendClient;
use capture::{CropRect, SnipCapture, SnipPayload, SnipState, TauriSnipHost, MAIN_WINDOW, OVERLAY_WINDOW};
use config::AppConfig;
use dictionary::DictionarySession;
use std::sync::Mutex;
use std::time::Duration;
use tauri::{Emitter, Manager};

pub const IPC_EXAMPLE_EVENT: &str = "ipc-example";

/// Runs one snip through the real window manager.
///
/// `None` when a snip is already in flight, the user cancelled, or
/// anything failed (already logged).
async fn snip(app: &tauri::AppHandle, state: &SnipState, config: &AppConfig) -> Option<SnipCapture> {
    let Some(_guard) = state.begin() else {
        log::warn!("[SNIP] Snip already in progress, ignoring request");
        return None;
    };
    let host = TauriSnipHost::new(app.clone(), state.slot.clone());
    capture::run_snip(&host, &state.slot, Duration::from_millis(config.capture_settle_ms)).await
}

/// Tauri command: let the user draw a rectangle over the current display.
///
/// Returns the full display as a PNG data URL plus the rectangle, or
/// `None` on cancel or failure.
#[tauri::command]
async fn capture_screen_snip(
    app: tauri::AppHandle,
    state: tauri::State<'_, SnipState>,
    config: tauri::State<'_, AppConfig>,
) -> Result<Option<SnipPayload>, String> {
    let Some(capture) = snip(&app, &state, &config).await else {
        return Ok(None);
    };

    let start = std::time::Instant::now();
    match capture.to_payload() {
        Ok(payload) => {
            log::info!(
                "[SNIP] PNG encoded in {}ms ({} bytes)",
                start.elapsed().as_millis(),
                payload.data_url.len()
            );
            Ok(Some(payload))
        }
        Err(e) => {
            log::error!("[SNIP] {}", e);
            Ok(None)
        }
    }
}

/// Tauri command: the overlay reports the user's rectangle, or `None`
/// when the user cancelled.
#[tauri::command]
fn submit_snip_selection(state: tauri::State<'_, SnipState>, rect: Option<CropRect>) {
    if !state.slot.resolve(rect) {
        log::warn!("[SNIP] Selection arrived with no snip waiting");
    }
}

/// Tauri command: close the overlay; the pending snip resolves as cancelled.
#[tauri::command]
fn cancel_snip(app: tauri::AppHandle, state: tauri::State<'_, SnipState>) -> Result<(), String> {
    state.slot.resolve(None);
    if let Some(window) = app.get_webview_window(OVERLAY_WINDOW) {
        window.close().map_err(|e| e.to_string())?;
    }
    Ok(())
}

/// Tauri command: snip, crop, and translate in one step.
#[tauri::command]
async fn scan_region(
    app: tauri::AppHandle,
    state: tauri::State<'_, SnipState>,
    config: tauri::State<'_, AppConfig>,
    client: tauri::State<'_, BackendClient>,
) -> Result<Option<String>, String> {
    let Some(capture) = snip(&app, &state, &config).await else {
        return Ok(None);
    };

    let png = match capture.cropped_png() {
        Ok(png) => png,
        Err(e) => {
            log::warn!("[SNIP] Nothing to scan: {}", e);
            return Ok(None);
        }
    };

    match client.translate_image(&capture::png_data_url(&png)).await {
        Ok(text) => Ok(Some(text)),
        Err(e) => {
            log::warn!("[SNIP] Translation of scanned region failed: {}", e);
            Ok(None)
        }
    }
}

/// Tauri command: generic request/reply example channel.
#[tauri::command]
fn ipc_example(window: tauri::WebviewWindow, message: String) -> Result<(), String> {
    log::info!("IPC test: {}", message);
    window
        .emit_to(window.label(), IPC_EXAMPLE_EVENT, "IPC test: pong")
        .map_err(|e| e.to_string())
}

/// Entry point, called by the Tauri runtime.
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    env_logger::init();

    let config = AppConfig::load();

    tauri::Builder::default()
        .plugin(tauri_plugin_shell::init())
        .manage(SnipState::new())
        .manage(Mutex::new(AnalysisSession::new()))
        .manage(Mutex::new(DictionarySession::new()))
        .invoke_handler(tauri::generate_handler![
            capture_screen_snip,
            submit_snip_selection,
            cancel_snip,
            scan_region,
            ipc_example,
            analysis_commands::load_analysis_text,
            analysis_commands::analysis_view,
            analysis_commands::toggle_character,
            analysis_commands::reset_selection,
            analysis_commands::hover_character,
            analysis_commands::copy_analysis_text,
            analysis_commands::translate_image,
            dictionary_commands::search_dictionary,
            dictionary_commands::lookup_kanji,
            dictionary_commands::search_history,
        ])
        .setup(move |app| {
            log::info!("Kanji Lens starting up");

            let client = BackendClient::new(&config)?;
            log::info!("[CONFIG] Backend at {}", client.base_url());
            app.manage(client);

            if let Some(window) = app.get_webview_window(MAIN_WINDOW) {
                window.show()?;
                if config.start_minimized {
                    window.minimize()?;
                }
            }
            app.manage(config.clone());

            tray::setup_tray(app.handle())?;

            log::info!("System tray initialized, ready to scan");
            Ok(())
        })
        .run(tauri::generate_context!())
        .expect("Error running Kanji Lens");
}
