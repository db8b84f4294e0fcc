// ── Main window ───────────────────────────────────────────────────────────────
//
// Responsibilities in this file (unsafe confined to platform::win32):
//   • Register the main window class and create the borderless top-level
//     window (WS_POPUP, rounded corners, no system frame).
//   • Run the Win32 message loop with accelerator translation.
//   • Paint the hand-drawn chrome: title bar, caption buttons, menu bar.
//   • Route input: caption buttons, menu items, title-bar drag, resize edges.
//   • Dispatch commands into `app::DocumentController` through a `Shell`
//     backed by the real edit control, the common dialogs, and `fileio`.
//   • Give main() a safe modal-error fallback for startup failures.

#![allow(unsafe_code)]

use std::path::{Path, PathBuf};

use windows::{
    core::{w, PCWSTR},
    Win32::{
        Foundation::{
            COLORREF, GetLastError, HINSTANCE, HWND, LPARAM, LRESULT, POINT, RECT, WPARAM,
        },
        Graphics::Gdi::{
            BeginPaint, CreateSolidBrush, DeleteObject, DrawTextW, EndPaint, FillRect,
            InvalidateRect, ScreenToClient, SelectObject, SetBkColor, SetBkMode, SetTextColor,
            UpdateWindow, DRAW_TEXT_FORMAT, DT_CENTER, DT_END_ELLIPSIS, DT_SINGLELINE,
            DT_VCENTER, HBRUSH, HDC, PAINTSTRUCT, TRANSPARENT,
        },
        System::LibraryLoader::GetModuleHandleW,
        UI::{
            Controls::WM_MOUSELEAVE,
            Input::KeyboardAndMouse::{
                ReleaseCapture, SetCapture, TrackMouseEvent, TME_LEAVE, TRACKMOUSEEVENT,
            },
            WindowsAndMessaging::{
                CreateWindowExW, DefWindowProcW, DestroyAcceleratorTable, DestroyMenu,
                DestroyWindow, DispatchMessageW, GetClientRect, GetMessageW, GetSystemMetrics,
                GetWindowLongPtrW, IsZoomed, LoadCursorW, LoadIconW, MessageBoxW, MoveWindow,
                PostMessageW, PostQuitMessage, RegisterClassExW, SendMessageW,
                SetWindowLongPtrW, SetWindowPos, ShowWindow, TranslateAcceleratorW,
                TranslateMessage, CS_DBLCLKS, CS_HREDRAW, CS_VREDRAW, EN_CHANGE,
                GWLP_USERDATA, HACCEL, HMENU, HTCLIENT, IDC_ARROW, IDI_APPLICATION,
                MB_ICONERROR, MB_OK, MINMAXINFO, MSG, NCCALCSIZE_PARAMS, SIZE_MINIMIZED,
                SM_CXSCREEN, SM_CYSCREEN, SWP_NOACTIVATE, SWP_NOZORDER, SW_MAXIMIZE,
                SW_MINIMIZE, SW_RESTORE, SW_SHOW, WINDOW_EX_STYLE, WM_ACTIVATE, WM_CLOSE,
                WM_COMMAND, WM_CTLCOLOREDIT, WM_CTLCOLORSTATIC, WM_DESTROY, WM_DPICHANGED,
                WM_ERASEBKGND, WM_GETMINMAXINFO, WM_LBUTTONDBLCLK, WM_LBUTTONDOWN,
                WM_LBUTTONUP, WM_MOUSEMOVE, WM_NCCALCSIZE, WM_NCDESTROY,
                WM_NCHITTEST, WM_PAINT, WM_SETFONT, WM_SIZE, WNDCLASSEXW, WS_CAPTION,
                WS_CLIPCHILDREN, WS_MAXIMIZEBOX, WS_MINIMIZEBOX, WS_POPUP, WS_SYSMENU,
                WS_THICKFRAME,
            },
        },
    },
};

use super::{
    chrome,
    controls::{self, Fonts, Menus},
    dialogs, dpi,
};
use crate::app::{self, DocumentController, SaveChoice, Shell};
use crate::editor::{EditView, WM_APP_CARET_MOVED, WM_APP_ZOOM_WHEEL};
use crate::error::{NotepadError, Result};
use crate::fileio;
use crate::theme::{self, Theme};
use crate::ui::layout::{self, CaptionButton, ChromeLayout, MenuId};

// ── Window identity ───────────────────────────────────────────────────────────

/// Class name the main window is registered under.
const CLASS_NAME: PCWSTR = w!("ModernNotepadMainWindow");

/// Initial caption text; `sync_title` keeps it current afterwards.
const APP_TITLE: PCWSTR = w!("Modern Notepad");

/// Default client width at 96 DPI.
const DEFAULT_WIDTH: i32 = 1000;

/// Default client height at 96 DPI.
const DEFAULT_HEIGHT: i32 = 600;

/// Smallest size the user can resize down to, at 96 DPI.
const MIN_WIDTH: i32 = 400;
const MIN_HEIGHT: i32 = 300;

/// Left inset of the title text at 96 DPI, clearing the rounded corner.
const TITLE_TEXT_PADDING: i32 = 12;

// ── Public API ────────────────────────────────────────────────────────────────

/// Register the main window class, create the window and its children, and
/// drive the message loop until the user closes the application.
///
/// Debug builds time the path from process start to first visible frame.
pub(crate) fn run() -> Result<()> {
    // Debug-only so release builds carry no dead timestamp.
    #[cfg(debug_assertions)]
    let t0 = std::time::Instant::now();

    dpi::init();
    controls::init_dark_menus();
    let theme = theme::load();

    // SAFETY: with None this returns the exe's own module handle, which
    // lives as long as the process.
    let hmodule = unsafe { GetModuleHandleW(None) }.map_err(NotepadError::from)?;

    // Same underlying value per the Win32 ABI; the field conversion keeps
    // this compiling whether or not the bindings make them distinct types.
    let hinstance = HINSTANCE(hmodule.0);

    register_class(hinstance, &theme)?;
    let hwnd = create_window(hinstance)?;

    // Children and per-window resources.  The window is still hidden, so
    // nothing paints until the state below is in place.
    let editor = EditView::create(hwnd, hinstance, controls::IDC_EDITOR)?;
    let status = controls::create_status_bar(hwnd, hinstance)?;
    let menus = controls::build_menus()?;
    let haccel = controls::create_accelerators()?;
    let dpi = dpi::get_for_window(hwnd);

    let fonts = Fonts::create(controls::DEFAULT_EDITOR_PT, dpi);
    editor.set_font(fonts.editor);
    set_status_font(status, &fonts);

    let state = Box::new(WindowState {
        controller: DocumentController::new(),
        editor,
        status,
        menus,
        haccel,
        fonts,
        brushes: Brushes::create(&theme),
        theme,
        dpi,
        editor_pt: controls::DEFAULT_EDITOR_PT,
        hot: None,
        hot_menu: None,
        pressed: None,
        tracking_mouse: false,
    });

    let state_ptr = Box::into_raw(state);
    // SAFETY: ownership of the box moves to the window here; the WM_NCDESTROY
    // handler reclaims and drops it exactly once.
    unsafe {
        SetWindowLongPtrW(hwnd, GWLP_USERDATA, state_ptr as isize);
    }

    // First layout and title/status fill, now that the state is reachable.
    // Focus lands on the editor so typing works immediately once shown.
    // SAFETY: state_ptr was just installed; the reference is dropped before
    // ShowWindow re-enters the window procedure.
    {
        let state = unsafe { &mut *state_ptr };
        on_size(hwnd, state);
        sync_title(hwnd, state);
        sync_status(state);
        state.editor.focus();
    }

    // SAFETY: hwnd is valid; the previous-visibility and repaint-success
    // returns carry no information we act on.
    unsafe {
        let _ = ShowWindow(hwnd, SW_SHOW);
        let _ = UpdateWindow(hwnd);
    }

    // First frame is on screen at this point.
    #[cfg(debug_assertions)]
    eprintln!(
        "[notepad] window visible in {:.1} ms",
        t0.elapsed().as_secs_f64() * 1000.0
    );

    message_loop(hwnd, haccel)
}

/// Modal dialog for errors that happen before (or instead of) a window.
///
/// `main()` calls this when `run()` fails; the UTF-16 conversion happens
/// here so the caller stays free of Win32 types.
pub(crate) fn show_error_dialog(message: &str) {
    let msg_wide: Vec<u16> = message.encode_utf16().chain(std::iter::once(0)).collect();
    let title_wide: Vec<u16> = "Modern Notepad — Fatal Error"
        .encode_utf16()
        .chain(std::iter::once(0))
        .collect();

    // SAFETY: both strings are null-terminated UTF-16 and live across the
    // call.  A null owner keeps the box standalone; which button dismissed
    // it does not matter.
    unsafe {
        let _ = MessageBoxW(
            HWND::default(),
            PCWSTR(msg_wide.as_ptr()),
            PCWSTR(title_wide.as_ptr()),
            MB_OK | MB_ICONERROR,
        );
    }
}

// ── Window state ──────────────────────────────────────────────────────────────

/// Solid GDI brushes derived from the theme, one per fill role.
struct Brushes {
    background: HBRUSH,
    title_bar: HBRUSH,
    menu_bar: HBRUSH,
    button_hover: HBRUSH,
    close_hover: HBRUSH,
    menu_hover: HBRUSH,
}

impl Brushes {
    fn create(theme: &Theme) -> Self {
        // SAFETY: CreateSolidBrush has no preconditions and always returns a
        // usable brush handle.
        unsafe {
            Self {
                background: CreateSolidBrush(COLORREF(theme.background)),
                title_bar: CreateSolidBrush(COLORREF(theme.title_bar)),
                menu_bar: CreateSolidBrush(COLORREF(theme.menu_bar)),
                button_hover: CreateSolidBrush(COLORREF(theme.button_hover)),
                close_hover: CreateSolidBrush(COLORREF(theme.close_button_hover)),
                menu_hover: CreateSolidBrush(COLORREF(theme.menu_hover)),
            }
        }
    }

    fn delete(&self) {
        // SAFETY: the handles came from CreateSolidBrush and are no longer
        // selected into any DC once painting has finished.
        unsafe {
            let _ = DeleteObject(self.background);
            let _ = DeleteObject(self.title_bar);
            let _ = DeleteObject(self.menu_bar);
            let _ = DeleteObject(self.button_hover);
            let _ = DeleteObject(self.close_hover);
            let _ = DeleteObject(self.menu_hover);
        }
    }
}

/// Everything the main window owns, boxed and stashed in GWLP_USERDATA.
///
/// Created in `run()` right after the window exists, reclaimed and dropped in
/// WM_NCDESTROY.  All access happens on the UI thread.
struct WindowState {
    controller: DocumentController,
    editor: EditView,
    status: HWND,
    menus: Menus,
    haccel: HACCEL,
    fonts: Fonts,
    theme: Theme,
    brushes: Brushes,
    /// DPI of the monitor the window currently lives on.
    dpi: u32,
    /// Editor font size in points, adjusted by Ctrl+wheel.
    editor_pt: i32,
    /// Caption button currently under the cursor.
    hot: Option<CaptionButton>,
    /// Menu bar item currently under the cursor.
    hot_menu: Option<MenuId>,
    /// Caption button armed by a mouse press, fired on release over it.
    pressed: Option<CaptionButton>,
    /// Whether a WM_MOUSELEAVE request is outstanding.
    tracking_mouse: bool,
}

/// Recover the state pointer stashed in GWLP_USERDATA.
///
/// Returns `None` for messages that arrive before `run()` installs the state
/// (sent from inside CreateWindowExW) and after WM_NCDESTROY has dropped it.
///
/// SAFETY: the caller must be on the UI thread and must not let the returned
/// reference outlive the current message.
unsafe fn state_from_hwnd(hwnd: HWND) -> Option<&'static mut WindowState> {
    let ptr = GetWindowLongPtrW(hwnd, GWLP_USERDATA) as *mut WindowState;
    ptr.as_mut()
}

// ── Window class registration ─────────────────────────────────────────────────

fn register_class(hinstance: HINSTANCE, theme: &Theme) -> Result<()> {
    // SAFETY: IDI_APPLICATION and IDC_ARROW are stock resources present on
    // every Windows version; loading them with a null module cannot dangle.
    let icon = unsafe { LoadIconW(None, IDI_APPLICATION) }.map_err(NotepadError::from)?;
    let cursor = unsafe { LoadCursorW(None, IDC_ARROW) }.map_err(NotepadError::from)?;

    // Class background in the theme colour, so any strip uncovered during a
    // resize flashes dark rather than white.  The class keeps the brush for
    // the process lifetime.
    // SAFETY: CreateSolidBrush has no preconditions.
    let bg_brush = unsafe { CreateSolidBrush(COLORREF(theme.background)) };

    let wndclass = WNDCLASSEXW {
        // WNDCLASSEXW is ~80 bytes; the cast to u32 is always lossless.
        cbSize: std::mem::size_of::<WNDCLASSEXW>() as u32,
        // CS_DBLCLKS so the title bar receives WM_LBUTTONDBLCLK for the
        // double-click-to-maximize gesture.
        style: CS_HREDRAW | CS_VREDRAW | CS_DBLCLKS,
        lpfnWndProc: Some(wnd_proc),
        cbClsExtra: 0,
        cbWndExtra: 0,
        hInstance: hinstance,
        hIcon: icon,
        hCursor: cursor,
        hbrBackground: bg_brush,
        lpszMenuName: PCWSTR::null(),
        lpszClassName: CLASS_NAME,
        hIconSm: icon,
    };

    // SAFETY: every handle in wndclass is valid and CLASS_NAME is a static
    // UTF-16 literal; a zero atom signals failure.
    let atom = unsafe { RegisterClassExW(&wndclass) };
    if atom == 0 {
        return Err(last_error("RegisterClassExW"));
    }

    Ok(())
}

// ── Window creation ───────────────────────────────────────────────────────────

fn create_window(hinstance: HINSTANCE) -> Result<HWND> {
    let dpi = dpi::get_system_dpi();
    let width = dpi::scale(DEFAULT_WIDTH, dpi);
    let height = dpi::scale(DEFAULT_HEIGHT, dpi);

    // SAFETY: metric queries have no preconditions.
    let (screen_w, screen_h) =
        unsafe { (GetSystemMetrics(SM_CXSCREEN), GetSystemMetrics(SM_CYSCREEN)) };
    let x = ((screen_w - width) / 2).max(0);
    let y = ((screen_h - height) / 2).max(0);

    // The borderless recipe: WS_POPUP plus the caption and thick-frame bits
    // keeps maximise-to-work-area, Aero Snap, and the minimise animation,
    // while the WM_NCCALCSIZE handler claims the whole frame for the client.
    let style = WS_POPUP
        | WS_CAPTION
        | WS_THICKFRAME
        | WS_SYSMENU
        | WS_MINIMIZEBOX
        | WS_MAXIMIZEBOX
        | WS_CLIPCHILDREN;

    // SAFETY: the class was registered above under this hinstance.  Null
    // parent makes a top-level window; null menu because the menu bar is
    // drawn by hand; null lpParam because the state box is installed after
    // creation, while the window is still hidden.
    let hwnd = unsafe {
        CreateWindowExW(
            WINDOW_EX_STYLE(0),
            CLASS_NAME,
            APP_TITLE,
            style,
            x,
            y,
            width,
            height,
            HWND::default(),
            HMENU::default(),
            hinstance,
            None,
        )
    }
    .unwrap_or_default();

    if hwnd == HWND::default() {
        return Err(last_error("CreateWindowExW"));
    }

    Ok(hwnd)
}

// ── Message loop ──────────────────────────────────────────────────────────────

fn message_loop(hwnd: HWND, haccel: HACCEL) -> Result<()> {
    let mut msg = MSG::default();

    loop {
        // SAFETY: msg outlives the call; a null filter window plus the 0,0
        // range pulls every message queued for this thread.
        let ret = unsafe { GetMessageW(&mut msg, HWND::default(), 0, 0) };

        match ret.0 {
            // -1 signals failure.
            -1 => return Err(last_error("GetMessageW")),
            // 0 means WM_QUIT arrived; time to leave.
            0 => break,
            _ => unsafe {
                // SAFETY: msg holds whatever GetMessageW just filled in.
                // Accelerators are matched first; on a hit the keystroke has
                // been delivered as WM_COMMAND and must not be dispatched.
                if TranslateAcceleratorW(hwnd, haccel, &msg) == 0 {
                    let _ = TranslateMessage(&msg);
                    let _ = DispatchMessageW(&msg);
                }
            },
        }
    }

    Ok(())
}

// ── Window procedure ──────────────────────────────────────────────────────────

// SAFETY: installed as the class window procedure, so every argument arrives
// straight from the dispatcher and is good for the duration of the call.
// hwnd must not be stashed anywhere that outlives the handler.
unsafe extern "system" fn wnd_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    // Frame messages first: they arrive from inside CreateWindowExW, before
    // the state pointer exists, and need no state.
    match msg {
        // With wparam TRUE this message asks how much of the proposed window
        // rectangle is client area.  Returning 0 without touching rgrc[0]
        // claims all of it: no system frame, no system caption.
        WM_NCCALCSIZE if wparam.0 != 0 => return on_nccalcsize(hwnd, lparam),
        WM_NCHITTEST => return on_nchittest(hwnd, lparam),
        WM_GETMINMAXINFO => return on_getminmaxinfo(hwnd, lparam),
        _ => {}
    }

    let Some(state) = state_from_hwnd(hwnd) else {
        return DefWindowProcW(hwnd, msg, wparam, lparam);
    };

    match msg {
        // ── Layout & painting ─────────────────────────────────────────────────
        WM_SIZE => {
            if wparam.0 as u32 != SIZE_MINIMIZED {
                on_size(hwnd, state);
            }
            LRESULT(0)
        }

        WM_PAINT => {
            on_paint(hwnd, state);
            LRESULT(0)
        }

        // The chrome paint fills every exposed pixel; nothing to erase.
        WM_ERASEBKGND => LRESULT(1),

        WM_DPICHANGED => {
            on_dpi_changed(hwnd, state, wparam, lparam);
            LRESULT(0)
        }

        // Text and background colours for the child controls.
        WM_CTLCOLOREDIT | WM_CTLCOLORSTATIC => on_ctlcolor(state, msg, wparam),

        // ── Mouse on the chrome ───────────────────────────────────────────────
        WM_MOUSEMOVE => {
            on_mouse_move(hwnd, state, lparam);
            LRESULT(0)
        }

        WM_MOUSELEAVE => {
            state.tracking_mouse = false;
            if state.hot.is_some() || state.hot_menu.is_some() {
                state.hot = None;
                state.hot_menu = None;
                invalidate(hwnd);
            }
            LRESULT(0)
        }

        WM_LBUTTONDOWN => {
            on_lbutton_down(hwnd, state, lparam);
            LRESULT(0)
        }

        WM_LBUTTONUP => {
            on_lbutton_up(hwnd, state, lparam);
            LRESULT(0)
        }

        WM_LBUTTONDBLCLK => {
            let pt = point_from_lparam(lparam);
            if current_layout(hwnd, state.dpi).title_drag_zone(pt.x, pt.y) {
                toggle_maximized(hwnd);
            } else {
                // CS_DBLCLKS swallowed the second press; replay it.
                on_lbutton_down(hwnd, state, lparam);
            }
            LRESULT(0)
        }

        // ── Events forwarded by the editor subclass ───────────────────────────
        WM_APP_ZOOM_WHEEL => {
            let delta = wparam.0 as isize as i32;
            if let Some(pt) = app::zoom_step(state.editor_pt, delta) {
                state.editor_pt = pt;
                rebuild_fonts(state);
            }
            LRESULT(0)
        }

        WM_APP_CARET_MOVED => {
            sync_status(state);
            LRESULT(0)
        }

        // ── Commands ──────────────────────────────────────────────────────────
        WM_COMMAND => on_command(hwnd, state, wparam, lparam),

        WM_ACTIVATE => {
            // Hand focus straight to the editor whenever the window activates
            // (low word 0 is WA_INACTIVE).
            if (wparam.0 & 0xFFFF) != 0 {
                state.editor.focus();
            }
            LRESULT(0)
        }

        // ── Lifecycle ─────────────────────────────────────────────────────────
        WM_CLOSE => {
            let mut shell = Win32Shell {
                hwnd,
                editor: state.editor,
            };
            if state.controller.request_close(&mut shell) {
                // SAFETY: hwnd is the window being closed; DestroyWindow
                // triggers WM_DESTROY, which posts WM_QUIT below.
                let _ = DestroyWindow(hwnd);
            }
            LRESULT(0)
        }

        WM_DESTROY => {
            // SAFETY: queues WM_QUIT for this thread; no preconditions.
            PostQuitMessage(0);
            LRESULT(0)
        }

        WM_NCDESTROY => {
            // Final message this window receives: release everything it owns,
            // then drop the state box.  The editor subclass has already
            // removed itself in its own WM_NCDESTROY.
            state.fonts.delete();
            state.brushes.delete();
            // SAFETY: the drop-down menus were never attached to a window, so
            // they are destroyed by hand; the accelerator table is unused once
            // WM_QUIT ends the message loop.
            let _ = DestroyMenu(state.menus.file);
            let _ = DestroyMenu(state.menus.edit);
            let _ = DestroyAcceleratorTable(state.haccel);
            let ptr: *mut WindowState = state;
            SetWindowLongPtrW(hwnd, GWLP_USERDATA, 0);
            // SAFETY: ptr came from Box::into_raw in run(); zeroing the
            // GWLP_USERDATA slot above guarantees no further access.
            drop(Box::from_raw(ptr));
            DefWindowProcW(hwnd, msg, wparam, lparam)
        }

        // SAFETY: anything not handled above is forwarded untouched, with
        // the arguments exactly as the dispatcher delivered them.
        _ => DefWindowProcW(hwnd, msg, wparam, lparam),
    }
}

// ── Frame handlers (stateless) ────────────────────────────────────────────────

fn on_nccalcsize(hwnd: HWND, lparam: LPARAM) -> LRESULT {
    // SAFETY: for WM_NCCALCSIZE with wparam TRUE the system passes a valid
    // NCCALCSIZE_PARAMS; rgrc[0] holds the proposed window rectangle.
    unsafe {
        if IsZoomed(hwnd).as_bool() {
            // Maximized, the frameless window overhangs every monitor edge by
            // the invisible resize frame; pull the client rectangle back in.
            let params = &mut *(lparam.0 as *mut NCCALCSIZE_PARAMS);
            chrome::adjust_maximized_client_rect(&mut params.rgrc[0], dpi::get_for_window(hwnd));
        }
    }
    LRESULT(0)
}

fn on_nchittest(hwnd: HWND, lparam: LPARAM) -> LRESULT {
    // lparam carries screen coordinates for this message.
    let mut pt = point_from_lparam(lparam);
    let mut client = RECT::default();

    // SAFETY: hwnd is valid for the duration of the message.
    unsafe {
        let _ = ScreenToClient(hwnd, &mut pt);
        let _ = GetClientRect(hwnd, &mut client);

        // Resize band along the window edges, suppressed while maximized
        // (a maximized window cannot be resized by dragging).
        if !IsZoomed(hwnd).as_bool() {
            let dpi = dpi::get_for_window(hwnd);
            let border = dpi::scale(layout::RESIZE_BORDER, dpi);
            if let Some(edge) =
                layout::resize_edge_at(client.right, client.bottom, pt.x, pt.y, border)
            {
                return LRESULT(chrome::hit_code(edge) as isize);
            }
        }
    }

    // Everything else is client area.  Title-bar dragging is handled from
    // WM_LBUTTONDOWN rather than HTCAPTION so the caption buttons stay
    // clickable.
    LRESULT(HTCLIENT as isize)
}

fn on_getminmaxinfo(hwnd: HWND, lparam: LPARAM) -> LRESULT {
    let dpi = dpi::get_for_window(hwnd);
    // SAFETY: the system passes a valid MINMAXINFO for this message.
    let info = unsafe { &mut *(lparam.0 as *mut MINMAXINFO) };
    info.ptMinTrackSize.x = dpi::scale(MIN_WIDTH, dpi);
    info.ptMinTrackSize.y = dpi::scale(MIN_HEIGHT, dpi);
    LRESULT(0)
}

// ── Layout ────────────────────────────────────────────────────────────────────

fn on_size(hwnd: HWND, state: &mut WindowState) {
    let mut client = RECT::default();
    // SAFETY: hwnd is valid; MoveWindow repositions our own children.
    unsafe {
        let _ = GetClientRect(hwnd, &mut client);
        let cl = ChromeLayout::compute(client.right, client.bottom, state.dpi);

        let e = cl.editor;
        let _ = MoveWindow(state.editor.hwnd(), e.x, e.y, e.w, e.h, true);

        // The status text control is inset from the window edge by the resize
        // border width; on_paint fills the surrounding strip.
        let pad = dpi::scale(layout::RESIZE_BORDER, state.dpi);
        let s = cl.status_bar;
        let _ = MoveWindow(
            state.status,
            s.x + pad,
            s.y,
            (s.w - 2 * pad).max(0),
            s.h,
            true,
        );

        chrome::apply_window_region(
            hwnd,
            client.right,
            client.bottom,
            IsZoomed(hwnd).as_bool(),
            state.dpi,
        );
    }
    invalidate(hwnd);
}

fn on_dpi_changed(hwnd: HWND, state: &mut WindowState, wparam: WPARAM, lparam: LPARAM) {
    state.dpi = (wparam.0 & 0xFFFF) as u32;

    // SAFETY: lparam points to the rectangle the system suggests for the new
    // monitor; adopting it verbatim keeps the window under the cursor.
    unsafe {
        let suggested = &*(lparam.0 as *const RECT);
        let _ = SetWindowPos(
            hwnd,
            HWND::default(),
            suggested.left,
            suggested.top,
            suggested.right - suggested.left,
            suggested.bottom - suggested.top,
            SWP_NOZORDER | SWP_NOACTIVATE,
        );
    }

    rebuild_fonts(state);
}

/// Recreate all fonts at the current DPI and editor point size, swap them
/// into the controls, then release the previous set.
fn rebuild_fonts(state: &mut WindowState) {
    let fonts = Fonts::create(state.editor_pt, state.dpi);
    state.editor.set_font(fonts.editor);
    set_status_font(state.status, &fonts);
    state.fonts.delete();
    state.fonts = fonts;
}

fn set_status_font(status: HWND, fonts: &Fonts) {
    // SAFETY: status is a valid child window; the font handle stays alive in
    // WindowState until replaced or deleted.  LPARAM(1) requests a redraw.
    unsafe {
        let _ = SendMessageW(status, WM_SETFONT, WPARAM(fonts.ui.0 as usize), LPARAM(1));
    }
}

// ── Painting ──────────────────────────────────────────────────────────────────

fn on_paint(hwnd: HWND, state: &mut WindowState) {
    let mut ps = PAINTSTRUCT::default();
    let mut client = RECT::default();

    // SAFETY: hwnd is valid; BeginPaint/EndPaint bracket this paint cycle and
    // every draw call in between targets the DC it returned.
    unsafe {
        let hdc = BeginPaint(hwnd, &mut ps);
        let _ = GetClientRect(hwnd, &mut client);
        let cl = ChromeLayout::compute(client.right, client.bottom, state.dpi);
        let maximized = IsZoomed(hwnd).as_bool();

        // Gutters around the child controls.
        FillRect(hdc, &ps.rcPaint, state.brushes.background);
        // Strip behind the status text.
        FillRect(hdc, &win_rect(cl.status_bar), state.brushes.title_bar);

        paint_title_bar(hdc, state, &cl, maximized);
        paint_menu_bar(hdc, state, &cl);

        let _ = EndPaint(hwnd, &ps);
    }
}

/// Title bar: fill, hover feedback, window title, caption glyphs.
///
/// SAFETY contract: `hdc` is the active paint DC for this window.
fn paint_title_bar(hdc: HDC, state: &WindowState, cl: &ChromeLayout, maximized: bool) {
    // SAFETY: per the function contract; brushes and fonts outlive the call.
    unsafe {
        FillRect(hdc, &win_rect(cl.title_bar), state.brushes.title_bar);

        if let Some(button) = state.hot {
            let brush = match button {
                CaptionButton::Close => state.brushes.close_hover,
                _ => state.brushes.button_hover,
            };
            FillRect(hdc, &win_rect(cl.button_rect(button)), brush);
        }

        let old_font = SelectObject(hdc, state.fonts.ui);
        SetBkMode(hdc, TRANSPARENT);
        SetTextColor(hdc, COLORREF(state.theme.text));

        // Window title, inset past the rounded corner and stopped short of
        // the caption buttons.
        let mut text_rect = win_rect(cl.title_bar);
        text_rect.left += dpi::scale(TITLE_TEXT_PADDING, state.dpi);
        text_rect.right = cl.btn_min.x;
        draw_text(
            hdc,
            &state.controller.window_title(),
            &mut text_rect,
            DT_SINGLELINE | DT_VCENTER | DT_END_ELLIPSIS,
        );

        SelectObject(hdc, state.fonts.caption);
        for button in [
            CaptionButton::Minimize,
            CaptionButton::Maximize,
            CaptionButton::Close,
        ] {
            let mut rect = win_rect(cl.button_rect(button));
            draw_text(
                hdc,
                layout::caption_glyph(button, maximized),
                &mut rect,
                DT_SINGLELINE | DT_CENTER | DT_VCENTER,
            );
        }

        SelectObject(hdc, old_font);
    }
}

/// Menu bar strip with its two items.
///
/// SAFETY contract: `hdc` is the active paint DC for this window.
fn paint_menu_bar(hdc: HDC, state: &WindowState, cl: &ChromeLayout) {
    // SAFETY: per the function contract.
    unsafe {
        FillRect(hdc, &win_rect(cl.menu_bar), state.brushes.menu_bar);

        if let Some(item) = state.hot_menu {
            FillRect(hdc, &win_rect(cl.menu_rect(item)), state.brushes.menu_hover);
        }

        let old_font = SelectObject(hdc, state.fonts.ui);
        SetBkMode(hdc, TRANSPARENT);
        SetTextColor(hdc, COLORREF(state.theme.text));

        let mut file_rect = win_rect(cl.menu_file);
        draw_text(hdc, "File", &mut file_rect, DT_SINGLELINE | DT_CENTER | DT_VCENTER);
        let mut edit_rect = win_rect(cl.menu_edit);
        draw_text(hdc, "Edit", &mut edit_rect, DT_SINGLELINE | DT_CENTER | DT_VCENTER);

        SelectObject(hdc, old_font);
    }
}

/// Draw `text` into `rect` with the font currently selected into `hdc`.
///
/// SAFETY contract: `hdc` is a live DC.
fn draw_text(hdc: HDC, text: &str, rect: &mut RECT, format: DRAW_TEXT_FORMAT) {
    let mut wide: Vec<u16> = text.encode_utf16().collect();
    // SAFETY: wide and rect are valid for the duration of the call; DrawTextW
    // takes the text length from the slice.
    unsafe {
        DrawTextW(hdc, &mut wide, rect, format);
    }
}

/// Convert a layout rectangle to the Win32 representation.
fn win_rect(r: layout::Rect) -> RECT {
    RECT {
        left: r.x,
        top: r.y,
        right: r.right(),
        bottom: r.bottom(),
    }
}

/// Queue a repaint of the hand-drawn chrome.  Child controls are unaffected.
fn invalidate(hwnd: HWND) {
    // SAFETY: hwnd is valid; None invalidates the whole client area.
    unsafe {
        let _ = InvalidateRect(hwnd, None, false);
    }
}

/// Chrome layout for the current client size.
fn current_layout(hwnd: HWND, dpi: u32) -> ChromeLayout {
    let mut client = RECT::default();
    // SAFETY: hwnd is valid for the duration of the message.
    unsafe {
        let _ = GetClientRect(hwnd, &mut client);
    }
    ChromeLayout::compute(client.right, client.bottom, dpi)
}

// ── Mouse on the chrome ───────────────────────────────────────────────────────

fn on_mouse_move(hwnd: HWND, state: &mut WindowState, lparam: LPARAM) {
    let pt = point_from_lparam(lparam);
    let cl = current_layout(hwnd, state.dpi);

    let hot = cl.caption_button_at(pt.x, pt.y);
    let hot_menu = cl.menu_item_at(pt.x, pt.y);
    if hot != state.hot || hot_menu != state.hot_menu {
        state.hot = hot;
        state.hot_menu = hot_menu;
        invalidate(hwnd);
    }

    if !state.tracking_mouse {
        // One WM_MOUSELEAVE per request; re-armed after it fires.
        let mut track = TRACKMOUSEEVENT {
            cbSize: std::mem::size_of::<TRACKMOUSEEVENT>() as u32,
            dwFlags: TME_LEAVE,
            hwndTrack: hwnd,
            dwHoverTime: 0,
        };
        // SAFETY: track is fully initialised and hwnd is valid.
        if unsafe { TrackMouseEvent(&mut track) }.is_ok() {
            state.tracking_mouse = true;
        }
    }
}

fn on_lbutton_down(hwnd: HWND, state: &mut WindowState, lparam: LPARAM) {
    let pt = point_from_lparam(lparam);
    let cl = current_layout(hwnd, state.dpi);

    if let Some(button) = cl.caption_button_at(pt.x, pt.y) {
        // Arm the button; it fires on release over the same button.
        state.pressed = Some(button);
        // SAFETY: hwnd is valid; the capture is released in on_lbutton_up.
        unsafe {
            let _ = SetCapture(hwnd);
        }
        return;
    }

    if let Some(item) = cl.menu_item_at(pt.x, pt.y) {
        let rect = cl.menu_rect(item);
        let menu = match item {
            MenuId::File => state.menus.file,
            MenuId::Edit => state.menus.edit,
        };
        // Drop-down opens flush with the item's bottom-left corner.  The
        // chosen command arrives as WM_COMMAND.
        controls::show_popup_menu(hwnd, menu, rect.x, rect.bottom());
        return;
    }

    if cl.title_drag_zone(pt.x, pt.y) {
        chrome::begin_window_drag(hwnd);
    }
}

fn on_lbutton_up(hwnd: HWND, state: &mut WindowState, lparam: LPARAM) {
    let Some(pressed) = state.pressed.take() else {
        return;
    };

    // SAFETY: releases the capture taken in on_lbutton_down.
    unsafe {
        let _ = ReleaseCapture();
    }

    let pt = point_from_lparam(lparam);
    let cl = current_layout(hwnd, state.dpi);
    if cl.caption_button_at(pt.x, pt.y) != Some(pressed) {
        // Released elsewhere: the press is abandoned.
        return;
    }

    match pressed {
        CaptionButton::Minimize => {
            // SAFETY: hwnd is valid.
            unsafe {
                let _ = ShowWindow(hwnd, SW_MINIMIZE);
            }
        }
        CaptionButton::Maximize => toggle_maximized(hwnd),
        CaptionButton::Close => {
            // Route through WM_CLOSE so the unsaved-changes gate runs after
            // the mouse interaction has fully unwound.
            // SAFETY: hwnd is valid; posting cannot fail while the queue lives.
            unsafe {
                let _ = PostMessageW(hwnd, WM_CLOSE, WPARAM(0), LPARAM(0));
            }
        }
    }
}

fn toggle_maximized(hwnd: HWND) {
    // SAFETY: hwnd is valid; ShowWindow's previous-state return is unused.
    // The state change delivers WM_SIZE synchronously (region + layout), and
    // UpdateWindow flushes the repaint so no frame shows the old glyph.
    unsafe {
        let cmd = if IsZoomed(hwnd).as_bool() {
            SW_RESTORE
        } else {
            SW_MAXIMIZE
        };
        let _ = ShowWindow(hwnd, cmd);
        let _ = UpdateWindow(hwnd);
    }
}

/// Unpack the signed 16-bit x/y pair carried by mouse and hit-test messages.
fn point_from_lparam(lparam: LPARAM) -> POINT {
    POINT {
        x: (lparam.0 & 0xFFFF) as u16 as i16 as i32,
        y: ((lparam.0 >> 16) & 0xFFFF) as u16 as i16 as i32,
    }
}

// ── Child control colours ─────────────────────────────────────────────────────

fn on_ctlcolor(state: &WindowState, msg: u32, wparam: WPARAM) -> LRESULT {
    // wparam is the child's device context.  Colours are set on the DC; the
    // returned brush fills the control background.
    let hdc = HDC(wparam.0 as *mut core::ffi::c_void);
    let (brush, back) = if msg == WM_CTLCOLORSTATIC {
        // The status line sits on the title-bar colour.
        (state.brushes.title_bar, state.theme.title_bar)
    } else {
        (state.brushes.background, state.theme.background)
    };

    // SAFETY: the DC handle is valid while the child control paints.
    unsafe {
        SetTextColor(hdc, COLORREF(state.theme.text));
        SetBkColor(hdc, COLORREF(back));
    }
    LRESULT(brush.0 as isize)
}

// ── Commands ──────────────────────────────────────────────────────────────────

fn on_command(hwnd: HWND, state: &mut WindowState, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    // Low word of WPARAM is the command identifier; high word the notify code.
    let id = wparam.0 & 0xFFFF;
    let code = ((wparam.0 >> 16) & 0xFFFF) as u32;

    if id == controls::IDC_EDITOR {
        // EN_CHANGE follows every text mutation, so the caret has moved.
        if code == EN_CHANGE {
            sync_status(state);
        }
        return LRESULT(0);
    }

    let mut shell = Win32Shell {
        hwnd,
        editor: state.editor,
    };

    match id {
        controls::IDM_FILE_NEW => {
            state.controller.request_new(&mut shell);
            after_file_op(hwnd, state);
        }
        controls::IDM_FILE_OPEN => {
            state.controller.request_open(&mut shell);
            after_file_op(hwnd, state);
        }
        controls::IDM_FILE_SAVE => {
            let _ = state.controller.request_save(&mut shell);
            after_file_op(hwnd, state);
        }
        controls::IDM_FILE_SAVE_AS => {
            let _ = state.controller.request_save_as(&mut shell);
            after_file_op(hwnd, state);
        }
        controls::IDM_FILE_EXIT => {
            // Same path as the close button: the unsaved-changes gate decides.
            // SAFETY: hwnd is valid; posting cannot fail while the queue lives.
            unsafe {
                let _ = PostMessageW(hwnd, WM_CLOSE, WPARAM(0), LPARAM(0));
            }
        }
        controls::IDM_EDIT_UNDO => state.editor.undo(),
        controls::IDM_EDIT_CUT => state.editor.cut(),
        controls::IDM_EDIT_COPY => state.editor.copy_to_clipboard(),
        controls::IDM_EDIT_PASTE => state.editor.paste(),
        controls::IDM_EDIT_SELECT_ALL => state.editor.select_all(),
        _ => {
            // SAFETY: parameters are forwarded untouched from this window's
            // own message delivery.
            return unsafe { DefWindowProcW(hwnd, WM_COMMAND, wparam, lparam) };
        }
    }

    LRESULT(0)
}

/// Refresh the pieces a file operation can change, then return focus to the
/// editor so typing resumes immediately.
fn after_file_op(hwnd: HWND, state: &mut WindowState) {
    sync_title(hwnd, state);
    sync_status(state);
    state.editor.focus();
}

/// Push the controller's current title into the real caption and repaint the
/// hand-drawn band that displays it.
fn sync_title(hwnd: HWND, state: &mut WindowState) {
    controls::set_window_text(hwnd, &state.controller.window_title());
    invalidate(hwnd);
}

/// Re-read the caret position and rewrite the status line.
fn sync_status(state: &mut WindowState) {
    let (line, column) = state.editor.caret_line_col();
    controls::set_window_text(state.status, &app::format_status(line, column));
}

// ── Shell implementation ──────────────────────────────────────────────────────

/// `app::Shell` backed by the real window: editor text through `EditView`,
/// prompts through the common dialogs, file bytes through `fileio`.
struct Win32Shell {
    hwnd: HWND,
    editor: EditView,
}

impl Shell for Win32Shell {
    fn live_text(&mut self) -> String {
        self.editor.text()
    }

    fn set_live_text(&mut self, text: &str) {
        self.editor.set_text(text);
    }

    fn ask_unsaved(&mut self, prompt: &str) -> SaveChoice {
        dialogs::ask_unsaved_changes(self.hwnd, prompt)
    }

    fn choose_open_path(&mut self) -> Option<PathBuf> {
        dialogs::show_open_dialog(self.hwnd)
    }

    fn choose_save_path(&mut self, suggested_name: &str) -> Option<PathBuf> {
        dialogs::show_save_dialog(self.hwnd, suggested_name)
    }

    fn read_file(&mut self, path: &Path) -> Result<String> {
        fileio::read_document(path)
    }

    fn write_file(&mut self, path: &Path, content: &str) -> Result<()> {
        fileio::write_document(path, content)
    }

    fn report_error(&mut self, message: &str) {
        dialogs::show_error_message(self.hwnd, message);
    }
}

// ── Error helpers ─────────────────────────────────────────────────────────────

/// Wrap the thread's last-error code in a `NotepadError`.
///
/// Must run before anything else touches Win32 on this thread: the code
/// lives in thread-local state the next API call is free to clobber.
fn last_error(function: &'static str) -> NotepadError {
    // SAFETY: reads a thread-local; cannot fail.
    let code = unsafe { GetLastError() };
    NotepadError::Win32 {
        function,
        code: code.0,
    }
}
