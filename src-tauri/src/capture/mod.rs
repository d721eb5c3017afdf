//! Screen capture domain — public API.
//!
//! This module owns all screen capture functionality.
//! External code should only use the public items exported here.

mod host;
mod region;
mod screenshot;
mod session;

pub use host::{TauriSnipHost, MAIN_WINDOW, OVERLAY_WINDOW};
pub use region::{crop_to_png_bytes, encode_png_data_url, png_data_url, CropError, CropRect, PixelRect};
pub use screenshot::{select_source, CaptureError, CaptureSource};
pub use session::{
    run_snip, DisplayInfo, LogicalBounds, SelectionSlot, SnipCapture, SnipHost, Teardown,
};

use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};

/// What `capture_screen_snip` hands to the webview.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnipPayload {
    pub data_url: String,
    pub crop_rect: CropRect,
    pub scale_factor: f64,
}

impl SnipCapture {
    /// Encodes the full bitmap for the bridge.
    pub fn to_payload(&self) -> Result<SnipPayload, CropError> {
        Ok(SnipPayload {
            data_url: encode_png_data_url(&self.image)?,
            crop_rect: self.crop_rect,
            scale_factor: self.scale_factor,
        })
    }

    /// Crops the confirmed rectangle out of the bitmap as PNG bytes.
    pub fn cropped_png(&self) -> Result<Vec<u8>, CropError> {
        let pixels = self
            .crop_rect
            .to_pixels(self.scale_factor, self.image.width(), self.image.height())
            .ok_or(CropError::ZeroDimension)?;
        crop_to_png_bytes(&self.image, pixels)
    }
}

/// Shared snip state: the pending selection and the in-flight flag.
pub struct SnipState {
    pub slot: SelectionSlot,
    in_flight: AtomicBool,
}

impl SnipState {
    pub fn new() -> Self {
        Self {
            slot: SelectionSlot::new(),
            in_flight: AtomicBool::new(false),
        }
    }

    /// Claims the snip flow. Returns `None` if a snip is already running.
    pub fn begin(&self) -> Option<SnipGuard<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| SnipGuard { state: self })
    }
}

impl Default for SnipState {
    fn default() -> Self {
        Self::new()
    }
}

/// Releases the in-flight flag on drop.
pub struct SnipGuard<'a> {
    state: &'a SnipState,
}

impl Drop for SnipGuard<'_> {
    fn drop(&mut self) {
        self.state.in_flight.store(false, Ordering::Release);
    }
}
