//! Snip orchestration against a scripted host.
//!
//! Every exit path must restore a hidden main window exactly once and close
//! an opened overlay exactly once.

use image::{DynamicImage, RgbaImage};
use kanji_lens_lib::capture::{
    run_snip, CaptureError, CaptureSource, CropRect, DisplayInfo, LogicalBounds, SelectionSlot,
    SnipHost,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// What the overlay does once it is open.
#[derive(Clone, Copy)]
enum UserAction {
    Confirm(CropRect),
    Cancel,
    /// The overlay window is closed out from under the session.
    CloseWindow,
    /// The user confirms, then the window-close handler fires as well.
    ConfirmThenClose(CropRect),
}

enum Sources {
    Displays(Vec<u32>),
    Fail,
}

struct ScriptedHost {
    slot: SelectionSlot,
    display_id: Option<u32>,
    minimizable: bool,
    locate_fails: bool,
    sources: Sources,
    overlay_fails: bool,
    action: UserAction,

    hidden: AtomicUsize,
    restored: AtomicUsize,
    focused: AtomicUsize,
    overlays_opened: AtomicUsize,
    overlays_closed: AtomicUsize,
    captured_for: Mutex<Option<DisplayInfo>>,
}

impl ScriptedHost {
    fn new(slot: &SelectionSlot, action: UserAction) -> Self {
        Self {
            slot: slot.clone(),
            display_id: Some(2),
            minimizable: true,
            locate_fails: false,
            sources: Sources::Displays(vec![1, 2]),
            overlay_fails: false,
            action,
            hidden: AtomicUsize::new(0),
            restored: AtomicUsize::new(0),
            focused: AtomicUsize::new(0),
            overlays_opened: AtomicUsize::new(0),
            overlays_closed: AtomicUsize::new(0),
            captured_for: Mutex::new(None),
        }
    }

    fn restored(&self) -> usize {
        self.restored.load(Ordering::SeqCst)
    }

    fn closed(&self) -> usize {
        self.overlays_closed.load(Ordering::SeqCst)
    }
}

impl SnipHost for ScriptedHost {
    fn locate_display(&self) -> Result<DisplayInfo, CaptureError> {
        if self.locate_fails {
            return Err(CaptureError::NoMainWindow);
        }
        Ok(DisplayInfo {
            id: self.display_id,
            bounds: LogicalBounds { x: 0.0, y: 0.0, width: 800.0, height: 600.0 },
            scale_factor: 2.0,
        })
    }

    fn hide_main_window(&self) -> bool {
        if !self.minimizable {
            return false;
        }
        self.hidden.fetch_add(1, Ordering::SeqCst);
        true
    }

    fn restore_main_window(&self) {
        self.restored.fetch_add(1, Ordering::SeqCst);
    }

    fn focus_main_window(&self) {
        self.focused.fetch_add(1, Ordering::SeqCst);
    }

    fn capture_sources(&self, display: &DisplayInfo) -> Result<Vec<CaptureSource>, CaptureError> {
        *self.captured_for.lock().unwrap() = Some(display.clone());
        match &self.sources {
            Sources::Fail => Err(CaptureError::MonitorEnumeration("scripted".into())),
            Sources::Displays(ids) => Ok(ids
                .iter()
                .map(|&id| CaptureSource {
                    display_id: id,
                    // Width encodes the id so tests can tell sources apart.
                    image: DynamicImage::ImageRgba8(RgbaImage::new(100 + id, 50)),
                })
                .collect()),
        }
    }

    fn open_overlay(&self, _display: &DisplayInfo) -> Result<(), CaptureError> {
        if self.overlay_fails {
            return Err(CaptureError::Overlay("scripted".into()));
        }
        self.overlays_opened.fetch_add(1, Ordering::SeqCst);
        match self.action {
            UserAction::Confirm(rect) => {
                self.slot.resolve(Some(rect));
            }
            UserAction::Cancel => {
                self.slot.resolve(None);
            }
            UserAction::CloseWindow => {
                let slot = self.slot.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(Duration::from_millis(10)).await;
                    slot.resolve(None);
                });
            }
            UserAction::ConfirmThenClose(rect) => {
                self.slot.resolve(Some(rect));
                self.slot.resolve(None);
            }
        }
        Ok(())
    }

    fn close_overlay(&self) {
        self.overlays_closed.fetch_add(1, Ordering::SeqCst);
        // Closing the real overlay fires its close handler too.
        self.slot.resolve(None);
    }
}

fn rect() -> CropRect {
    CropRect { x: 10.0, y: 10.0, width: 20.0, height: 20.0 }
}

const NO_SETTLE: Duration = Duration::ZERO;

#[tokio::test]
async fn confirmed_selection_returns_matching_display() {
    let slot = SelectionSlot::new();
    let host = ScriptedHost::new(&slot, UserAction::Confirm(rect()));

    let capture = run_snip(&host, &slot, NO_SETTLE).await.expect("snip");

    assert_eq!(capture.crop_rect, rect());
    assert_eq!(capture.image.width(), 102, "display 2 should be picked");
    assert_eq!(capture.scale_factor, 2.0);
    assert_eq!(host.restored(), 1);
    assert_eq!(host.closed(), 1);
    assert!(!slot.is_pending());
}

#[tokio::test]
async fn unknown_display_falls_back_to_first_source() {
    let slot = SelectionSlot::new();
    let mut host = ScriptedHost::new(&slot, UserAction::Confirm(rect()));
    host.display_id = Some(99);

    let capture = run_snip(&host, &slot, NO_SETTLE).await.expect("snip");
    assert_eq!(capture.image.width(), 101);
    assert_eq!(host.restored(), 1);
}

#[tokio::test]
async fn cancel_restores_once() {
    let slot = SelectionSlot::new();
    let host = ScriptedHost::new(&slot, UserAction::Cancel);

    assert!(run_snip(&host, &slot, NO_SETTLE).await.is_none());
    assert_eq!(host.restored(), 1);
    assert_eq!(host.closed(), 1);
}

#[tokio::test]
async fn overlay_closed_restores_once() {
    let slot = SelectionSlot::new();
    let host = ScriptedHost::new(&slot, UserAction::CloseWindow);

    assert!(run_snip(&host, &slot, NO_SETTLE).await.is_none());
    assert_eq!(host.restored(), 1);
    assert_eq!(host.closed(), 1);
}

#[tokio::test]
async fn confirm_and_close_race_resolves_once() {
    let slot = SelectionSlot::new();
    let host = ScriptedHost::new(&slot, UserAction::ConfirmThenClose(rect()));

    let capture = run_snip(&host, &slot, NO_SETTLE).await;
    assert_eq!(capture.map(|c| c.crop_rect), Some(rect()));
    assert_eq!(host.restored(), 1);
    assert_eq!(host.closed(), 1);
}

#[tokio::test]
async fn source_enumeration_failure_still_restores() {
    let slot = SelectionSlot::new();
    let mut host = ScriptedHost::new(&slot, UserAction::Confirm(rect()));
    host.sources = Sources::Fail;

    assert!(run_snip(&host, &slot, NO_SETTLE).await.is_none());
    assert_eq!(host.restored(), 1);
    assert_eq!(host.overlays_opened.load(Ordering::SeqCst), 0);
    assert_eq!(host.closed(), 0);
}

#[tokio::test]
async fn no_sources_still_restores() {
    let slot = SelectionSlot::new();
    let mut host = ScriptedHost::new(&slot, UserAction::Confirm(rect()));
    host.sources = Sources::Displays(Vec::new());

    assert!(run_snip(&host, &slot, NO_SETTLE).await.is_none());
    assert_eq!(host.restored(), 1);
    assert_eq!(host.overlays_opened.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn overlay_failure_still_restores() {
    let slot = SelectionSlot::new();
    let mut host = ScriptedHost::new(&slot, UserAction::Confirm(rect()));
    host.overlay_fails = true;

    assert!(run_snip(&host, &slot, NO_SETTLE).await.is_none());
    assert_eq!(host.restored(), 1);
    assert_eq!(host.closed(), 0);
    assert!(!slot.is_pending());
}

#[tokio::test]
async fn display_lookup_failure_touches_nothing() {
    let slot = SelectionSlot::new();
    let mut host = ScriptedHost::new(&slot, UserAction::Confirm(rect()));
    host.locate_fails = true;

    assert!(run_snip(&host, &slot, NO_SETTLE).await.is_none());
    assert_eq!(host.hidden.load(Ordering::SeqCst), 0);
    assert_eq!(host.restored(), 0);
    assert!(host.captured_for.lock().unwrap().is_none());
}

#[tokio::test]
async fn window_not_minimizable_is_focused_instead() {
    let slot = SelectionSlot::new();
    let mut host = ScriptedHost::new(&slot, UserAction::Confirm(rect()));
    host.minimizable = false;

    assert!(run_snip(&host, &slot, NO_SETTLE).await.is_some());
    assert_eq!(host.restored(), 0);
    assert_eq!(host.focused.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn settle_delay_is_applied_after_hiding() {
    let slot = SelectionSlot::new();
    let host = ScriptedHost::new(&slot, UserAction::Cancel);

    let start = std::time::Instant::now();
    run_snip(&host, &slot, Duration::from_millis(30)).await;
    assert!(start.elapsed() >= Duration::from_millis(30));
}
