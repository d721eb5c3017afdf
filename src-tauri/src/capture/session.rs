//! Snip session orchestration.
//!
//! One invocation: find the display, hide the main window, grab the display,
//! show the selection overlay, wait for one rectangle (or a cancel, or the
//! overlay closing), tear everything down exactly once.
//!
//! The OS-facing steps sit behind [`SnipHost`] so the flow can run against
//! a scripted host in tests.

use super::region::CropRect;
use super::screenshot::{select_source, CaptureError, CaptureSource};
use image::DynamicImage;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::oneshot;

/// Logical-pixel bounds of a display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogicalBounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// The display containing the requesting window.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayInfo {
    /// Capture-layer monitor id, if it could be resolved.
    pub id: Option<u32>,
    pub bounds: LogicalBounds,
    pub scale_factor: f64,
}

/// A confirmed snip: the full display bitmap and the user's rectangle.
#[derive(Debug, Clone)]
pub struct SnipCapture {
    pub image: DynamicImage,
    pub crop_rect: CropRect,
    pub scale_factor: f64,
}

/// OS-facing side of a snip.
pub trait SnipHost: Send + Sync {
    fn locate_display(&self) -> Result<DisplayInfo, CaptureError>;

    /// Minimizes the main window if it is minimizable and not already
    /// minimized. Returns whether it was hidden by this call.
    fn hide_main_window(&self) -> bool;

    /// Restores a window hidden by [`SnipHost::hide_main_window`].
    fn restore_main_window(&self);

    /// Brings the main window back to the front when it was not hidden.
    fn focus_main_window(&self);

    fn capture_sources(&self, display: &DisplayInfo) -> Result<Vec<CaptureSource>, CaptureError>;

    fn open_overlay(&self, display: &DisplayInfo) -> Result<(), CaptureError>;

    /// Closes the overlay if it is still open. Must tolerate repeat calls.
    fn close_overlay(&self);
}

type Selection = Option<CropRect>;

/// One-shot completion shared by the overlay command and the overlay's
/// close handler. Whoever resolves first wins; later calls are no-ops.
#[derive(Clone, Default)]
pub struct SelectionSlot {
    pending: Arc<Mutex<Option<oneshot::Sender<Selection>>>>,
}

impl SelectionSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepares a new wait. Any previous waiter is dropped and resolves as
    /// cancelled.
    pub fn arm(&self) -> oneshot::Receiver<Selection> {
        let (tx, rx) = oneshot::channel();
        if let Ok(mut guard) = self.pending.lock() {
            *guard = Some(tx);
        }
        rx
    }

    /// Delivers a selection to the pending waiter.
    ///
    /// Returns `false` if nothing was waiting (already resolved or never armed).
    pub fn resolve(&self, selection: Selection) -> bool {
        let sender = match self.pending.lock() {
            Ok(mut guard) => guard.take(),
            Err(_) => None,
        };
        match sender {
            Some(tx) => tx.send(selection).is_ok(),
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.lock().map(|g| g.is_some()).unwrap_or(false)
    }
}

/// Undoes the side effects of a snip. Runs its body at most once, either
/// explicitly through [`Teardown::finish`] or on drop.
pub struct Teardown<'a, H: SnipHost + ?Sized> {
    host: &'a H,
    hid_main: bool,
    overlay_open: bool,
    done: bool,
}

impl<'a, H: SnipHost + ?Sized> Teardown<'a, H> {
    pub fn new(host: &'a H, hid_main: bool) -> Self {
        Self {
            host,
            hid_main,
            overlay_open: false,
            done: false,
        }
    }

    fn overlay_opened(&mut self) {
        self.overlay_open = true;
    }

    pub fn finish(&mut self) {
        if self.done {
            return;
        }
        self.done = true;

        if self.overlay_open {
            self.host.close_overlay();
        }
        if self.hid_main {
            self.host.restore_main_window();
        } else {
            self.host.focus_main_window();
        }
    }
}

impl<H: SnipHost + ?Sized> Drop for Teardown<'_, H> {
    fn drop(&mut self) {
        self.finish();
    }
}

/// Runs one snip against `host`.
///
/// Returns `None` on cancel or on any failure; failures are logged here.
/// `settle` is how long to wait after hiding the main window so it is not
/// part of the capture.
pub async fn run_snip<H: SnipHost + ?Sized>(
    host: &H,
    slot: &SelectionSlot,
    settle: Duration,
) -> Option<SnipCapture> {
    let start = std::time::Instant::now();

    let display = match host.locate_display() {
        Ok(d) => d,
        Err(e) => {
            log::error!("[SNIP] {}", e);
            return None;
        }
    };

    let hid_main = host.hide_main_window();
    let mut teardown = Teardown::new(host, hid_main);
    if hid_main && !settle.is_zero() {
        tokio::time::sleep(settle).await;
    }

    let sources = match host.capture_sources(&display) {
        Ok(s) => s,
        Err(e) => {
            log::error!("[SNIP] Source enumeration failed: {}", e);
            teardown.finish();
            return None;
        }
    };

    let Some(source) = select_source(sources, display.id) else {
        log::error!("[SNIP] {}", CaptureError::NoSource);
        teardown.finish();
        return None;
    };

    let capture_ms = start.elapsed().as_millis();
    log::info!(
        "[SNIP] Display {:?} captured in {}ms ({}x{})",
        source.display_id,
        capture_ms,
        source.image.width(),
        source.image.height()
    );

    let selection = slot.arm();
    if let Err(e) = host.open_overlay(&display) {
        log::error!("[SNIP] {}", e);
        slot.resolve(None);
        teardown.finish();
        return None;
    }
    teardown.overlay_opened();

    // A dropped sender means the slot was re-armed or torn down: treat as cancel.
    let rect = selection.await.unwrap_or(None);
    teardown.finish();

    match rect {
        Some(crop_rect) => {
            log::info!(
                "[SNIP] Selection confirmed after {}ms: {:?}",
                start.elapsed().as_millis(),
                crop_rect
            );
            Some(SnipCapture {
                image: source.image,
                crop_rect,
                scale_factor: display.scale_factor,
            })
        }
        None => {
            log::info!("[SNIP] Selection cancelled");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Counters {
        restored: AtomicUsize,
        focused: AtomicUsize,
        closed: AtomicUsize,
    }

    struct CountingHost {
        counters: Counters,
    }

    impl SnipHost for CountingHost {
        fn locate_display(&self) -> Result<DisplayInfo, CaptureError> {
            unreachable!()
        }
        fn hide_main_window(&self) -> bool {
            true
        }
        fn restore_main_window(&self) {
            self.counters.restored.fetch_add(1, Ordering::SeqCst);
        }
        fn focus_main_window(&self) {
            self.counters.focused.fetch_add(1, Ordering::SeqCst);
        }
        fn capture_sources(&self, _: &DisplayInfo) -> Result<Vec<CaptureSource>, CaptureError> {
            Ok(vec![CaptureSource {
                display_id: 1,
                image: DynamicImage::ImageRgba8(RgbaImage::new(1, 1)),
            }])
        }
        fn open_overlay(&self, _: &DisplayInfo) -> Result<(), CaptureError> {
            Ok(())
        }
        fn close_overlay(&self) {
            self.counters.closed.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn teardown_runs_once() {
        let host = CountingHost { counters: Counters::default() };
        {
            let mut teardown = Teardown::new(&host, true);
            teardown.overlay_opened();
            teardown.finish();
            teardown.finish();
        }
        assert_eq!(host.counters.restored.load(Ordering::SeqCst), 1);
        assert_eq!(host.counters.closed.load(Ordering::SeqCst), 1);
        assert_eq!(host.counters.focused.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn teardown_on_drop_focuses_when_not_hidden() {
        let host = CountingHost { counters: Counters::default() };
        drop(Teardown::new(&host, false));
        assert_eq!(host.counters.focused.load(Ordering::SeqCst), 1);
        assert_eq!(host.counters.restored.load(Ordering::SeqCst), 0);
        assert_eq!(host.counters.closed.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn slot_resolves_once() {
        let slot = SelectionSlot::new();
        let rx = slot.arm();
        assert!(slot.is_pending());

        let rect = CropRect { x: 1.0, y: 2.0, width: 3.0, height: 4.0 };
        assert!(slot.resolve(Some(rect)));
        assert!(!slot.resolve(None));
        assert_eq!(rx.await.unwrap(), Some(rect));
    }

    #[tokio::test]
    async fn rearming_cancels_previous_waiter() {
        let slot = SelectionSlot::new();
        let first = slot.arm();
        let _second = slot.arm();
        assert!(first.await.is_err());
    }

    #[test]
    fn resolve_without_waiter_is_noop() {
        let slot = SelectionSlot::new();
        assert!(!slot.resolve(None));
        assert!(!slot.is_pending());
    }
}
