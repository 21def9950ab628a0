//! Display enumeration with fallbacks.

use snapzone_platform_core::{DisplayLayout, FALLBACK_SCREEN_SIZE};

use crate::backend::CaptureBackend;

/// Enumerate displays through `backend`.
///
/// Never fails: enumeration errors and empty results produce a synthetic
/// single-display layout sized from the backend's fallback screen size.
pub fn enumerate_displays(backend: &dyn CaptureBackend) -> DisplayLayout {
    let displays = match backend.detect_displays() {
        Ok(displays) if !displays.is_empty() => displays,
        Ok(_) => {
            tracing::warn!(backend = backend.name(), "No displays reported");
            return fallback_layout(backend);
        }
        Err(e) => {
            tracing::warn!(backend = backend.name(), "Display enumeration failed: {e}");
            return fallback_layout(backend);
        }
    };

    let layout = DisplayLayout::from_platform(displays, backend.reported_virtual_screen());
    if layout.has_virtual_screen_discrepancy() {
        tracing::warn!(
            reported = %layout.virtual_screen(),
            computed = %layout.bounding_box(),
            "Platform virtual screen differs from display bounding box; using platform figure"
        );
    }

    tracing::debug!(
        displays = layout.len(),
        virtual_screen = %layout.virtual_screen(),
        "Enumerated displays"
    );
    layout
}

fn fallback_layout(backend: &dyn CaptureBackend) -> DisplayLayout {
    let (width, height) = backend
        .fallback_screen_size()
        .filter(|(w, h)| *w > 0 && *h > 0)
        .unwrap_or(FALLBACK_SCREEN_SIZE);
    tracing::info!(width, height, "Using synthetic display layout");
    DisplayLayout::synthetic(width, height)
}

/// One-line-per-display description used in error messages.
pub fn display_list_for_error(layout: &DisplayLayout) -> String {
    layout
        .displays()
        .iter()
        .enumerate()
        .map(|(idx, display)| {
            format!(
                "{idx}:{}({}x{}@{},{}{})",
                display.name,
                display.width,
                display.height,
                display.left,
                display.top,
                if display.primary { ",primary" } else { "" }
            )
        })
        .collect::<Vec<_>>()
        .join(", ")
}
