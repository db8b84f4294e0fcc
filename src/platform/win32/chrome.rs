// ── Borderless chrome mechanics ───────────────────────────────────────────────
//
// The main window keeps the caption and thick-frame styles (so Aero Snap,
// the work-area maximize, and the minimize animation survive) but shows no
// system non-client area: WM_NCCALCSIZE hands the whole frame to the
// client, and the title bar, caption buttons, and resize band are redrawn
// over client coordinates.  This module owns the Win32 side of that recipe;
// the geometry itself lives in `ui::layout`.

#![allow(unsafe_code)]

use windows::Win32::{
    Foundation::{HWND, LPARAM, RECT, WPARAM},
    Graphics::Gdi::{CreateRoundRectRgn, SetWindowRgn, HRGN},
    UI::{
        HiDpi::GetSystemMetricsForDpi,
        Input::KeyboardAndMouse::ReleaseCapture,
        WindowsAndMessaging::{
            SendMessageW, HTBOTTOM, HTBOTTOMLEFT, HTBOTTOMRIGHT, HTCAPTION,
            HTLEFT, HTRIGHT, HTTOP, HTTOPLEFT, HTTOPRIGHT, SM_CXFRAME, SM_CXPADDEDBORDER,
            SM_CYFRAME, WM_NCLBUTTONDOWN,
        },
    },
};

use super::dpi;
use crate::ui::layout::ResizeEdge;

/// Corner rounding radius at 96 DPI, in pixels.
pub(crate) const CORNER_RADIUS: i32 = 8;

// ── Window region ─────────────────────────────────────────────────────────────

/// Clip the window to a rounded rectangle, or clear the region entirely
/// while maximized (a maximized window must reach every monitor edge with
/// square corners).
pub(crate) fn apply_window_region(hwnd: HWND, width: i32, height: i32, maximized: bool, dpi: u32) {
    if maximized {
        // SAFETY: hwnd valid; a null region removes any window region.
        unsafe {
            let _ = SetWindowRgn(hwnd, HRGN::default(), true);
        }
        return;
    }

    let diameter = dpi::scale(CORNER_RADIUS * 2, dpi);
    // Region right/bottom edges are exclusive, hence the +1.
    // SAFETY: hwnd valid.  Once SetWindowRgn succeeds the system owns the
    // region handle; it must not be deleted here.
    unsafe {
        let rgn = CreateRoundRectRgn(0, 0, width + 1, height + 1, diameter, diameter);
        let _ = SetWindowRgn(hwnd, rgn, true);
    }
}

// ── Window movement ───────────────────────────────────────────────────────────

/// Hand a press on empty title bar surface to the system as a caption drag.
/// The system runs the modal move loop from here, so Aero Snap keeps working.
pub(crate) fn begin_window_drag(hwnd: HWND) {
    // SAFETY: hwnd valid; capture must be released first or DefWindowProc
    // ignores the synthetic non-client press.
    unsafe {
        let _ = ReleaseCapture();
        let _ = SendMessageW(hwnd, WM_NCLBUTTONDOWN, WPARAM(HTCAPTION as usize), LPARAM(0));
    }
}

// ── Frame geometry ────────────────────────────────────────────────────────────

/// While maximized, a frameless window's client rect hangs past the monitor
/// edges by the (invisible) resize frame; shrink it back so no content is
/// cut off.  Applied to `rgrc[0]` during WM_NCCALCSIZE.
pub(crate) fn adjust_maximized_client_rect(rect: &mut RECT, dpi: u32) {
    // SAFETY: metric queries have no preconditions.
    let (inset_x, inset_y) = unsafe {
        let padded = GetSystemMetricsForDpi(SM_CXPADDEDBORDER, dpi);
        (
            GetSystemMetricsForDpi(SM_CXFRAME, dpi) + padded,
            GetSystemMetricsForDpi(SM_CYFRAME, dpi) + padded,
        )
    };
    rect.left += inset_x;
    rect.top += inset_y;
    rect.right -= inset_x;
    rect.bottom -= inset_y;
}

/// WM_NCHITTEST return code for a resize zone.
pub(crate) fn hit_code(edge: ResizeEdge) -> u32 {
    match edge {
        ResizeEdge::Left => HTLEFT,
        ResizeEdge::Right => HTRIGHT,
        ResizeEdge::Top => HTTOP,
        ResizeEdge::Bottom => HTBOTTOM,
        ResizeEdge::TopLeft => HTTOPLEFT,
        ResizeEdge::TopRight => HTTOPRIGHT,
        ResizeEdge::BottomLeft => HTBOTTOMLEFT,
        ResizeEdge::BottomRight => HTBOTTOMRIGHT,
    }
}
