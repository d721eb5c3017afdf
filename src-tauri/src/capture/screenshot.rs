//! Display lookup and full-screen capture using the `xcap` crate.
//!
//! Infrastructure layer: this is the part that talks to the OS.

use image::DynamicImage;
use xcap::Monitor;

/// One capture source: a display and its bitmap at native resolution.
#[derive(Debug, Clone)]
pub struct CaptureSource {
    pub display_id: u32,
    pub image: DynamicImage,
}

/// Finds the capture-layer id of the monitor containing a point.
///
/// Backends disagree on whether monitor coordinates are logical or physical,
/// so the caller passes both forms of the same point and the first hit wins.
pub fn monitor_id_at(points: &[(i32, i32)]) -> Option<u32> {
    points
        .iter()
        .find_map(|&(x, y)| Monitor::from_point(x, y).ok())
        .and_then(|m| m.id().ok())
}

/// Captures every monitor at its native pixel resolution.
///
/// Monitors that fail to capture are skipped with a warning; an error is
/// only returned if enumeration itself fails.
pub fn capture_all_monitors() -> Result<Vec<CaptureSource>, CaptureError> {
    let monitors = Monitor::all().map_err(|e| CaptureError::MonitorEnumeration(e.to_string()))?;

    let mut sources = Vec::with_capacity(monitors.len());
    for monitor in monitors {
        let display_id = match monitor.id() {
            Ok(id) => id,
            Err(e) => {
                log::warn!("[SNIP] Skipping monitor without id: {}", e);
                continue;
            }
        };
        match monitor.capture_image() {
            Ok(image) => sources.push(CaptureSource {
                display_id,
                image: DynamicImage::ImageRgba8(image),
            }),
            Err(e) => log::warn!("[SNIP] Capture of monitor {} failed: {}", display_id, e),
        }
    }

    Ok(sources)
}

/// Picks the source for `display_id`, falling back to the first source.
pub fn select_source(sources: Vec<CaptureSource>, display_id: Option<u32>) -> Option<CaptureSource> {
    let index = display_id
        .and_then(|id| sources.iter().position(|s| s.display_id == id))
        .or_else(|| {
            if !sources.is_empty() {
                log::warn!(
                    "[SNIP] No capture source for display {:?}, falling back to the first source",
                    display_id
                );
            }
            (!sources.is_empty()).then_some(0)
        })?;

    sources.into_iter().nth(index)
}

#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("Main window is not available")]
    NoMainWindow,

    #[error("Failed to locate the current display: {0}")]
    DisplayLookup(String),

    #[error("Failed to enumerate monitors: {0}")]
    MonitorEnumeration(String),

    #[error("No screen source available")]
    NoSource,

    #[error("Failed to open the selection overlay: {0}")]
    Overlay(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    fn source(id: u32) -> CaptureSource {
        CaptureSource {
            display_id: id,
            image: DynamicImage::ImageRgba8(RgbaImage::new(id + 1, 1)),
        }
    }

    #[test]
    fn select_exact_display() {
        let picked = select_source(vec![source(1), source(2), source(3)], Some(2)).unwrap();
        assert_eq!(picked.display_id, 2);
    }

    #[test]
    fn falls_back_to_first_source() {
        let picked = select_source(vec![source(7), source(8)], Some(42)).unwrap();
        assert_eq!(picked.display_id, 7);

        let picked = select_source(vec![source(7), source(8)], None).unwrap();
        assert_eq!(picked.display_id, 7);
    }

    #[test]
    fn no_sources_selects_nothing() {
        assert!(select_source(Vec::new(), Some(1)).is_none());
    }
}
