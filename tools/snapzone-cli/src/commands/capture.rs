//! Non-interactive capture.

use std::path::PathBuf;

use anyhow::{bail, Context};
use snapzone_capture_engine::CaptureEngine;
use snapzone_common::config::{QualityPreset, ScreenshotMode};
use snapzone_persistence::{capture_display_to_file, save, SavedImage};
use snapzone_platform_core::ScreenRect;
use snapzone_selection::{
    CancelReason, HeadlessHost, OverlayEvent, SelectionController, SelectionOutcome,
    MIN_SELECTION_SIZE,
};

pub struct CaptureArgs {
    pub mode: ScreenshotMode,
    pub display: Option<usize>,
    pub region: Option<ScreenRect>,
    pub quality: QualityPreset,
    pub output: PathBuf,
    pub prefix: String,
}

pub fn run(args: CaptureArgs) -> anyhow::Result<()> {
    let engine = CaptureEngine::with_default_backend();

    let saved = if let Some(index) = args.display {
        capture_display_to_file(
            &engine,
            Some(index),
            args.quality,
            &args.output,
            &args.prefix,
        )
        .with_context(|| format!("Failed to capture display {index}"))?
    } else if let Some(region) = args.region {
        capture_region(&engine, &args, region)?
    } else {
        let snapshot = engine
            .capture_for_mode(args.mode)
            .context("Screen capture failed")?;
        save(
            &snapshot.capture.image,
            args.quality,
            &args.output,
            &args.prefix,
        )
        .context("Failed to save screenshot")?
    };

    println!("Saved {} ({})", saved.path.display(), saved.summary());
    Ok(())
}

/// Replay `region` as an overlay drag so it takes the same commit path.
fn capture_region(
    engine: &CaptureEngine,
    args: &CaptureArgs,
    region: ScreenRect,
) -> anyhow::Result<SavedImage> {
    let mut controller = SelectionController::new(HeadlessHost);
    let session = controller
        .start_with(|| engine.capture_for_mode(args.mode))
        .context("Screen capture failed")?;

    let geometry = *session.geometry();
    let (x1, y1) = geometry.virtual_to_overlay(region.left, region.top);
    let right = (region.right()).min(i32::MAX as i64) as i32;
    let bottom = (region.bottom()).min(i32::MAX as i64) as i32;
    let (x2, y2) = geometry.virtual_to_overlay(right, bottom);

    controller.handle(OverlayEvent::PointerDown { x: x1, y: y1 });
    controller.handle(OverlayEvent::PointerMove { x: x2, y: y2 });
    let outcome = controller.handle(OverlayEvent::PointerUp { x: x2, y: y2 });

    match outcome {
        Some(SelectionOutcome::Committed { image, region, .. }) => {
            tracing::debug!(?region, "Region cropped from capture");
            save(&image, args.quality, &args.output, &args.prefix)
                .context("Failed to save screenshot")
        }
        Some(SelectionOutcome::Cancelled(CancelReason::Degenerate)) => bail!(
            "Region {region} is smaller than {MIN_SELECTION_SIZE}x{MIN_SELECTION_SIZE} pixels"
        ),
        Some(SelectionOutcome::Cancelled(reason)) => bail!("Capture cancelled: {reason:?}"),
        Some(SelectionOutcome::Failed(e)) => {
            Err(e).with_context(|| format!("Region {region} is outside the captured area"))
        }
        None => bail!("Selection did not complete"),
    }
}

/// Parse `X,Y,W,H` in virtual-screen pixels.
pub fn parse_region(value: &str) -> Result<ScreenRect, String> {
    let parts: Vec<&str> = value.split(',').map(str::trim).collect();
    let [x, y, w, h] = parts.as_slice() else {
        return Err(format!("expected X,Y,W,H but got '{value}'"));
    };
    let parse_i = |s: &str| s.parse::<i32>().map_err(|e| format!("invalid coordinate '{s}': {e}"));
    let parse_u = |s: &str| s.parse::<u32>().map_err(|e| format!("invalid size '{s}': {e}"));
    Ok(ScreenRect::new(parse_i(x)?, parse_i(y)?, parse_u(w)?, parse_u(h)?))
}
