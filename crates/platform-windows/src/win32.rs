use std::mem;

use image::RgbaImage;
use snapzone_common::error::{SnapError, SnapResult};
use snapzone_platform_core::{default_display_name, Display, ScreenRect};
use windows::Win32::Foundation::{BOOL, HWND, LPARAM, POINT, RECT};
use windows::Win32::Graphics::Gdi::{
    BitBlt, CreateCompatibleBitmap, CreateCompatibleDC, DeleteDC, DeleteObject,
    EnumDisplayMonitors, GetDC, GetDIBits, GetMonitorInfoW, ReleaseDC, SelectObject, BITMAPINFO,
    BITMAPINFOHEADER, BI_RGB, CAPTUREBLT, DIB_RGB_COLORS, HBITMAP, HDC, HGDIOBJ, HMONITOR,
    MONITORINFOEXW, MONITORINFOF_PRIMARY, ROP_CODE, SRCCOPY,
};
use windows::Win32::UI::WindowsAndMessaging::{
    GetCursorPos, GetSystemMetrics, SM_CXSCREEN, SM_CXVIRTUALSCREEN, SM_CYSCREEN,
    SM_CYVIRTUALSCREEN, SM_XVIRTUALSCREEN, SM_YVIRTUALSCREEN,
};

use crate::{bgra_to_rgba_in_place, device_name_from_wide};

fn rect_from_win32(rc: &RECT) -> ScreenRect {
    ScreenRect::from_edges(
        rc.left as i64,
        rc.top as i64,
        rc.right as i64,
        rc.bottom as i64,
    )
}

pub(crate) fn detect_monitors() -> SnapResult<Vec<Display>> {
    unsafe extern "system" fn enum_proc(
        monitor: HMONITOR,
        _hdc: HDC,
        _rect: *mut RECT,
        data: LPARAM,
    ) -> BOOL {
        let displays = unsafe { &mut *(data.0 as *mut Vec<Display>) };
        let mut info = MONITORINFOEXW::default();
        info.monitorInfo.cbSize = mem::size_of::<MONITORINFOEXW>() as u32;
        if unsafe { GetMonitorInfoW(monitor, &mut info.monitorInfo as *mut _ as *mut _) }.as_bool()
        {
            let index = displays.len();
            let primary = info.monitorInfo.dwFlags & MONITORINFOF_PRIMARY != 0;
            let mut name = device_name_from_wide(&info.szDevice);
            if name.is_empty() {
                name = default_display_name(index, primary);
            }
            let mut display = Display::new(
                index as u32,
                name,
                rect_from_win32(&info.monitorInfo.rcMonitor),
                primary,
            );
            display.work_area = rect_from_win32(&info.monitorInfo.rcWork);
            displays.push(display);
        }
        BOOL(1)
    }

    let mut displays: Vec<Display> = Vec::new();
    let ok = unsafe {
        EnumDisplayMonitors(
            HDC::default(),
            None,
            Some(enum_proc),
            LPARAM(&mut displays as *mut Vec<Display> as isize),
        )
    };
    if !ok.as_bool() {
        return Err(SnapError::enumeration("EnumDisplayMonitors failed"));
    }
    tracing::debug!(count = displays.len(), "Enumerated Win32 monitors");
    Ok(displays)
}

pub(crate) fn virtual_screen() -> Option<ScreenRect> {
    let (left, top, width, height) = unsafe {
        (
            GetSystemMetrics(SM_XVIRTUALSCREEN),
            GetSystemMetrics(SM_YVIRTUALSCREEN),
            GetSystemMetrics(SM_CXVIRTUALSCREEN),
            GetSystemMetrics(SM_CYVIRTUALSCREEN),
        )
    };
    (width > 0 && height > 0).then(|| ScreenRect::new(left, top, width as u32, height as u32))
}

pub(crate) fn primary_screen_size() -> Option<(u32, u32)> {
    let (width, height) = unsafe { (GetSystemMetrics(SM_CXSCREEN), GetSystemMetrics(SM_CYSCREEN)) };
    (width > 0 && height > 0).then_some((width as u32, height as u32))
}

pub(crate) fn cursor_position() -> Option<(i32, i32)> {
    let mut point = POINT::default();
    unsafe {
        if GetCursorPos(&mut point).is_ok() {
            Some((point.x, point.y))
        } else {
            None
        }
    }
}

/// GDI handles released in reverse order of acquisition.
struct BlitResources {
    screen_dc: HDC,
    mem_dc: HDC,
    bitmap: HBITMAP,
    old_object: HGDIOBJ,
}

impl Drop for BlitResources {
    fn drop(&mut self) {
        unsafe {
            if !self.old_object.0.is_null() {
                let _ = SelectObject(self.mem_dc, self.old_object);
            }
            if !self.bitmap.0.is_null() {
                let _ = DeleteObject(self.bitmap);
            }
            if !self.mem_dc.0.is_null() {
                let _ = DeleteDC(self.mem_dc);
            }
            if !self.screen_dc.0.is_null() {
                let _ = ReleaseDC(HWND::default(), self.screen_dc);
            }
        }
    }
}

pub(crate) fn blit_rect(rect: &ScreenRect) -> SnapResult<RgbaImage> {
    if rect.is_empty() {
        return Err(SnapError::capture(format!("Cannot copy empty area {rect}")));
    }
    let width = rect.width as i32;
    let height = rect.height as i32;

    let mut res = BlitResources {
        screen_dc: HDC::default(),
        mem_dc: HDC::default(),
        bitmap: HBITMAP::default(),
        old_object: HGDIOBJ::default(),
    };

    unsafe {
        res.screen_dc = GetDC(HWND::default());
        if res.screen_dc.0.is_null() {
            return Err(SnapError::capture("GetDC failed for the desktop"));
        }
        res.mem_dc = CreateCompatibleDC(res.screen_dc);
        if res.mem_dc.0.is_null() {
            return Err(SnapError::capture("CreateCompatibleDC failed"));
        }
        res.bitmap = CreateCompatibleBitmap(res.screen_dc, width, height);
        if res.bitmap.0.is_null() {
            return Err(SnapError::capture(format!(
                "CreateCompatibleBitmap failed for {width}x{height}"
            )));
        }
        res.old_object = SelectObject(res.mem_dc, res.bitmap);

        BitBlt(
            res.mem_dc,
            0,
            0,
            width,
            height,
            res.screen_dc,
            rect.left,
            rect.top,
            ROP_CODE(SRCCOPY.0 | CAPTUREBLT.0),
        )
        .map_err(|e| SnapError::capture(format!("BitBlt failed: {e}")))?;
    }

    let mut bmi = BITMAPINFO::default();
    bmi.bmiHeader = BITMAPINFOHEADER {
        biSize: mem::size_of::<BITMAPINFOHEADER>() as u32,
        biWidth: width,
        biHeight: -height,
        biPlanes: 1,
        biBitCount: 32,
        biCompression: BI_RGB.0,
        ..Default::default()
    };

    let mut pixels = vec![0u8; rect.width as usize * rect.height as usize * 4];
    let lines = unsafe {
        // The bitmap must not be selected into a DC while GetDIBits reads it.
        SelectObject(res.mem_dc, res.old_object);
        res.old_object = HGDIOBJ::default();
        GetDIBits(
            res.mem_dc,
            res.bitmap,
            0,
            rect.height,
            Some(pixels.as_mut_ptr().cast()),
            &mut bmi,
            DIB_RGB_COLORS,
        )
    };
    drop(res);

    if lines != height {
        return Err(SnapError::capture(format!(
            "GetDIBits copied {lines} of {height} rows"
        )));
    }

    bgra_to_rgba_in_place(&mut pixels);
    RgbaImage::from_raw(rect.width, rect.height, pixels)
        .ok_or_else(|| SnapError::capture("DIB buffer does not match the requested size"))
}
