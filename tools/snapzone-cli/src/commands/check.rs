//! Check capture capabilities.

use snapzone_capture_engine::CaptureEngine;
use snapzone_common::config::config_file_path;
use snapzone_common::error::SnapError;
use snapzone_platform_core::ScreenRect;

pub fn run() -> anyhow::Result<()> {
    println!("SnapZone System Check");
    println!("{}", "=".repeat(50));

    // Display server
    #[cfg(target_os = "linux")]
    {
        use snapzone_platform_linux::{detect_display_server, DisplayServer};
        match detect_display_server() {
            DisplayServer::Wayland => println!("[OK] Display server: Wayland (portable capture)"),
            DisplayServer::X11 => println!("[OK] Display server: X11"),
            DisplayServer::Unknown => println!("[WARN] Display server: Unknown"),
        }
    }

    let engine = CaptureEngine::with_default_backend();
    println!("[OK] Capture backend: {}", engine.backend_name());

    // Check displays
    let layout = engine.enumerate_displays();
    if layout.is_synthetic() {
        println!("[WARN] Display enumeration failed; using a fallback layout");
    } else {
        println!("[OK] Displays detected: {}", layout.len());
    }
    for d in layout.displays() {
        println!(
            "     {} {}x{} @ ({}, {}) (scale: {}x) {}",
            d.name,
            d.width,
            d.height,
            d.left,
            d.top,
            d.scale_factor,
            if d.primary { "(primary)" } else { "" }
        );
    }
    println!("     virtual screen {}", layout.virtual_screen());

    // Probe capture paths on a single pixel
    let vs = layout.virtual_screen();
    let probe = ScreenRect::new(vs.left, vs.top, 1, 1);
    let backend = engine.backend();
    report("Virtual-screen fast path", backend.grab_virtual_screen(&probe).map(|_| ()));
    report("Per-display fast path", backend.grab_display(layout.primary()).map(|_| ()));
    report("Bounding-box grab", backend.grab_region(&probe).map(|_| ()));

    match backend.pointer_position() {
        Some((x, y)) => println!("[OK] Pointer position: ({x}, {y})"),
        None => println!("[WARN] Pointer position unavailable; mouse mode uses the primary display"),
    }

    let config_path = config_file_path();
    if config_path.exists() {
        println!("[OK] Config: {}", config_path.display());
    } else {
        println!(
            "[INFO] Config: {} (not created, defaults in use)",
            config_path.display()
        );
    }

    Ok(())
}

fn report(what: &str, result: Result<(), SnapError>) {
    match result {
        Ok(()) => println!("[OK] {what}"),
        Err(SnapError::Unsupported { .. }) => println!("[INFO] {what}: not available"),
        Err(e) => println!("[WARN] {what}: {e}"),
    }
}
