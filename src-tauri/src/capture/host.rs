//! [`SnipHost`] backed by the Tauri window manager and `xcap`.

use super::screenshot::{self, CaptureError, CaptureSource};
use super::session::{DisplayInfo, LogicalBounds, SelectionSlot, SnipHost};
use tauri::webview::PageLoadEvent;
use tauri::{AppHandle, Manager, WebviewUrl, WebviewWindow, WebviewWindowBuilder, WindowEvent};

pub const MAIN_WINDOW: &str = "main";
pub const OVERLAY_WINDOW: &str = "snip-overlay";
const OVERLAY_PAGE: &str = "selector.html";

pub struct TauriSnipHost {
    app: AppHandle,
    slot: SelectionSlot,
}

impl TauriSnipHost {
    pub fn new(app: AppHandle, slot: SelectionSlot) -> Self {
        Self { app, slot }
    }

    fn main_window(&self) -> Option<WebviewWindow> {
        self.app.get_webview_window(MAIN_WINDOW)
    }
}

impl SnipHost for TauriSnipHost {
    fn locate_display(&self) -> Result<DisplayInfo, CaptureError> {
        let window = self.main_window().ok_or(CaptureError::NoMainWindow)?;

        let monitor = window
            .current_monitor()
            .map_err(|e| CaptureError::DisplayLookup(e.to_string()))?
            .or_else(|| window.primary_monitor().ok().flatten())
            .ok_or_else(|| CaptureError::DisplayLookup("no monitor reported".into()))?;

        let scale = monitor.scale_factor();
        let pos = monitor.position();
        let size = monitor.size();
        let bounds = LogicalBounds {
            x: pos.x as f64 / scale,
            y: pos.y as f64 / scale,
            width: size.width as f64 / scale,
            height: size.height as f64 / scale,
        };

        // Resolve the capture-layer id from the window's centre.
        let id = match (window.outer_position(), window.outer_size()) {
            (Ok(p), Ok(s)) => {
                let cx = p.x + (s.width / 2) as i32;
                let cy = p.y + (s.height / 2) as i32;
                let logical = ((cx as f64 / scale) as i32, (cy as f64 / scale) as i32);
                screenshot::monitor_id_at(&[logical, (cx, cy)])
            }
            _ => None,
        };

        Ok(DisplayInfo {
            id,
            bounds,
            scale_factor: scale,
        })
    }

    fn hide_main_window(&self) -> bool {
        let Some(window) = self.main_window() else {
            return false;
        };
        let minimizable = window.is_minimizable().unwrap_or(false);
        let minimized = window.is_minimized().unwrap_or(true);
        if !minimizable || minimized {
            return false;
        }
        match window.minimize() {
            Ok(()) => true,
            Err(e) => {
                log::warn!("[SNIP] Failed to minimize main window: {}", e);
                false
            }
        }
    }

    fn restore_main_window(&self) {
        let Some(window) = self.main_window() else {
            return;
        };
        if window.is_minimized().unwrap_or(false) {
            if let Err(e) = window.unminimize() {
                log::warn!("[SNIP] Failed to restore main window: {}", e);
            }
        }
    }

    fn focus_main_window(&self) {
        let Some(window) = self.main_window() else {
            return;
        };
        if !window.is_focused().unwrap_or(true) {
            let _ = window.set_focus();
        }
    }

    fn capture_sources(&self, _display: &DisplayInfo) -> Result<Vec<CaptureSource>, CaptureError> {
        screenshot::capture_all_monitors()
    }

    fn open_overlay(&self, display: &DisplayInfo) -> Result<(), CaptureError> {
        // A stale overlay from an aborted session would shadow the new one.
        if let Some(stale) = self.app.get_webview_window(OVERLAY_WINDOW) {
            let _ = stale.destroy();
        }

        let b = display.bounds;
        let overlay = WebviewWindowBuilder::new(
            &self.app,
            OVERLAY_WINDOW,
            WebviewUrl::App(OVERLAY_PAGE.into()),
        )
        .position(b.x, b.y)
        .inner_size(b.width, b.height)
        .transparent(true)
        .decorations(false)
        .always_on_top(true)
        .skip_taskbar(true)
        .resizable(false)
        .shadow(false)
        .visible(false)
        .title("Kanji Lens Selector")
        .on_page_load(|window, payload| {
            if matches!(payload.event(), PageLoadEvent::Finished) {
                let _ = window.show();
                let _ = window.set_focus();
            }
        })
        .build()
        .map_err(|e| CaptureError::Overlay(e.to_string()))?;

        let slot = self.slot.clone();
        overlay.on_window_event(move |event| {
            if let WindowEvent::Destroyed = event {
                if slot.resolve(None) {
                    log::info!("[SNIP] Overlay closed before a selection was made");
                }
            }
        });

        Ok(())
    }

    fn close_overlay(&self) {
        if let Some(overlay) = self.app.get_webview_window(OVERLAY_WINDOW) {
            if let Err(e) = overlay.close() {
                log::warn!("[SNIP] Failed to close overlay: {}", e);
            }
        }
    }
}
