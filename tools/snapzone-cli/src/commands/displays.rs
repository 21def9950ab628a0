//! List displays.

use snapzone_capture_engine::CaptureEngine;

pub fn run(json: bool) -> anyhow::Result<()> {
    let engine = CaptureEngine::with_default_backend();
    let layout = engine.enumerate_displays();

    if json {
        println!("{}", serde_json::to_string_pretty(&layout)?);
        return Ok(());
    }

    println!("Backend: {}", engine.backend_name());
    if layout.is_synthetic() {
        println!("[WARN] Display enumeration failed; showing a fallback layout");
    }

    for (index, display) in layout.displays().iter().enumerate() {
        println!(
            "  [{index}] {} {}x{} @ ({}, {}) scale {}x{}",
            display.name,
            display.width,
            display.height,
            display.left,
            display.top,
            display.scale_factor,
            if display.primary { " (primary)" } else { "" }
        );
        if display.work_area != display.rect() {
            println!("       work area {}", display.work_area);
        }
    }

    println!("Virtual screen: {}", layout.virtual_screen());
    if layout.has_virtual_screen_discrepancy() {
        println!(
            "[WARN] Platform figure differs from display bounds {}",
            layout.bounding_box()
        );
    }

    match engine.backend().pointer_position() {
        Some((x, y)) => {
            let display = layout.display_under_or_primary(Some((x, y)));
            println!("Pointer: ({x}, {y}) on {}", display.name);
        }
        None => println!("Pointer: unavailable (primary display is used)"),
    }

    Ok(())
}
