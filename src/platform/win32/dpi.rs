#![allow(unsafe_code)]

use windows::Win32::{
    Foundation::HWND,
    UI::HiDpi::{
        GetDpiForSystem, GetDpiForWindow, SetProcessDpiAwarenessContext,
        DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2,
    },
};

/// The DPI every chrome metric is authored at.  `ui::layout` keeps its own
/// copy of this constant so it stays free of Win32 imports.
pub(crate) const BASE_DPI: u32 = 96;

/// Scale a 96-DPI chrome metric to the given monitor DPI.  Truncating, the
/// same arithmetic `ui::layout` applies, so hit zones and painted rects stay
/// aligned.
pub(crate) fn scale(px: i32, dpi: u32) -> i32 {
    px * dpi as i32 / BASE_DPI as i32
}

/// Pixel height for `CreateFontIndirectW` from a point size.  Negative, so
/// GDI matches on character height instead of cell height.
pub(crate) fn font_height(pt: i32, dpi: u32) -> i32 {
    -(pt * dpi as i32) / 72
}

/// Claim Per-Monitor v2 awareness for the process.  Without it the system
/// would rescale the hand-drawn chrome as a bitmap on mixed-DPI setups.
/// Call once, before the first window exists.
pub(crate) fn init() {
    // SAFETY: no preconditions; a repeated or late call merely fails, and the
    // result is ignored because v2 support is assumed (Windows 10 1703+).
    unsafe {
        let _ = SetProcessDpiAwarenessContext(DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2);
    }
}

/// DPI of the monitor hosting `hwnd`, or 96 when the query fails.
pub(crate) fn get_for_window(hwnd: HWND) -> u32 {
    // SAFETY: hwnd refers to a live window owned by the calling thread.
    match unsafe { GetDpiForWindow(hwnd) } {
        0 => BASE_DPI,
        dpi => dpi,
    }
}

/// Primary-monitor DPI, for sizing the window before it exists.
pub(crate) fn get_system_dpi() -> u32 {
    // SAFETY: takes no arguments; 0 is only returned on pre-1607 systems.
    match unsafe { GetDpiForSystem() } {
        0 => BASE_DPI,
        dpi => dpi,
    }
}
