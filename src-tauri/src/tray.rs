//! System tray setup and click handler.
//!
//! Left-click brings the main window forward. The menu can start a scan,
//! which the main window handles like its own "Scan" button.

use crate::capture::MAIN_WINDOW;
use tauri::{
    image::Image as TauriImage,
    menu::{MenuBuilder, MenuItemBuilder},
    tray::TrayIconBuilder,
    AppHandle, Emitter, Manager,
};

pub const SCAN_REQUESTED_EVENT: &str = "scan-requested";

/// Sets up the system tray icon and its menu.
pub fn setup_tray(app: &AppHandle) -> Result<(), Box<dyn std::error::Error>> {
    let scan_item = MenuItemBuilder::with_id("scan", "Scan Region").build(app)?;
    let show_item = MenuItemBuilder::with_id("show", "Show Window").build(app)?;
    let quit_item = MenuItemBuilder::with_id("quit", "Quit Kanji Lens").build(app)?;
    let menu = MenuBuilder::new(app)
        .item(&scan_item)
        .item(&show_item)
        .separator()
        .item(&quit_item)
        .build()?;

    // Decode the PNG icon to RGBA for Tauri's Image type
    let icon_bytes = include_bytes!("../icons/32x32.png");
    let icon_img = image::load_from_memory(icon_bytes)
        .map_err(|e| format!("Failed to decode tray icon: {}", e))?;
    let rgba = icon_img.to_rgba8();
    let (w, h) = (rgba.width(), rgba.height());
    let tray_icon = TauriImage::new_owned(rgba.into_raw(), w, h);

    let _tray = TrayIconBuilder::new()
        .icon(tray_icon)
        .tooltip("Kanji Lens")
        .menu(&menu)
        .show_menu_on_left_click(false)
        .on_tray_icon_event(|tray_icon, event| {
            if let tauri::tray::TrayIconEvent::Click {
                button: tauri::tray::MouseButton::Left,
                ..
            } = event
            {
                show_main_window(tray_icon.app_handle());
            }
        })
        .on_menu_event(|app, event| match event.id().as_ref() {
            "scan" => {
                log::info!("Scan requested from tray menu");
                show_main_window(app);
                if let Err(e) = app.emit_to(MAIN_WINDOW, SCAN_REQUESTED_EVENT, ()) {
                    log::error!("Failed to forward scan request: {}", e);
                }
            }
            "show" => show_main_window(app),
            "quit" => {
                log::info!("Quit requested from tray menu");
                app.exit(0);
            }
            _ => {}
        })
        .build(app)?;

    Ok(())
}

fn show_main_window(app: &AppHandle) {
    if let Some(window) = app.get_webview_window(MAIN_WINDOW) {
        let _ = window.unminimize();
        let _ = window.show();
        let _ = window.set_focus();
    }
}
