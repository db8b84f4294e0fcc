// ── Child controls, menus & fonts ─────────────────────────────────────────────
//
// Creation helpers for everything the main window owns besides the editor:
// the status line, the File/Edit popup menus, the accelerator table, the
// GDI fonts, and the process-wide dark-menu opt-in.
//
// Lives inside `platform::win32`, so `unsafe` is allowed under crate policy.

#![allow(unsafe_code)]

use std::sync::OnceLock;

use windows::{
    core::{w, PCSTR, PCWSTR},
    Win32::{
        Foundation::{GetLastError, HINSTANCE, HMODULE, HWND, POINT},
        Graphics::Gdi::{
            ClientToScreen, CreateFontIndirectW, DeleteObject, HFONT, LOGFONTW,
            CLEARTYPE_QUALITY, DEFAULT_CHARSET,
        },
        System::LibraryLoader::{GetProcAddress, LoadLibraryW},
        UI::WindowsAndMessaging::{
            AppendMenuW, CreateAcceleratorTableW, CreatePopupMenu, CreateWindowExW,
            SetWindowTextW, TrackPopupMenu, ACCEL, ACCEL_VIRT_FLAGS, FCONTROL, FSHIFT,
            FVIRTKEY, HACCEL, HMENU, MF_SEPARATOR, MF_STRING, TPM_LEFTALIGN, TPM_TOPALIGN,
            WINDOW_EX_STYLE, WINDOW_STYLE, WS_CHILD, WS_VISIBLE,
        },
    },
};

use super::dpi;
use crate::error::{NotepadError, Result};

// ── Command identifiers ───────────────────────────────────────────────────────

pub(crate) const IDM_FILE_NEW: usize = 1001;
pub(crate) const IDM_FILE_OPEN: usize = 1002;
pub(crate) const IDM_FILE_SAVE: usize = 1003;
pub(crate) const IDM_FILE_SAVE_AS: usize = 1004;
pub(crate) const IDM_FILE_EXIT: usize = 1005;

pub(crate) const IDM_EDIT_UNDO: usize = 2001;
pub(crate) const IDM_EDIT_CUT: usize = 2002;
pub(crate) const IDM_EDIT_COPY: usize = 2003;
pub(crate) const IDM_EDIT_PASTE: usize = 2004;
pub(crate) const IDM_EDIT_SELECT_ALL: usize = 2005;

/// Child control ID of the editor, echoed back in EN_CHANGE notifications.
pub(crate) const IDC_EDITOR: usize = 100;

// ── Menus ─────────────────────────────────────────────────────────────────────

/// The two popup menus behind the hand-drawn menu bar items.  Not attached
/// to the window (there is no system menu bar); the owner destroys them on
/// teardown.
pub(crate) struct Menus {
    pub(crate) file: HMENU,
    pub(crate) edit: HMENU,
}

pub(crate) fn build_menus() -> Result<Menus> {
    // SAFETY: CreatePopupMenu has no preconditions; AppendMenuW receives
    // valid menu handles and static strings.
    unsafe {
        let file = CreatePopupMenu().map_err(NotepadError::from)?;
        AppendMenuW(file, MF_STRING, IDM_FILE_NEW, w!("&New\tCtrl+N"))
            .map_err(NotepadError::from)?;
        AppendMenuW(file, MF_STRING, IDM_FILE_OPEN, w!("&Open…\tCtrl+O"))
            .map_err(NotepadError::from)?;
        AppendMenuW(file, MF_STRING, IDM_FILE_SAVE, w!("&Save\tCtrl+S"))
            .map_err(NotepadError::from)?;
        AppendMenuW(file, MF_STRING, IDM_FILE_SAVE_AS, w!("Save &As…\tCtrl+Shift+S"))
            .map_err(NotepadError::from)?;
        AppendMenuW(file, MF_SEPARATOR, 0, PCWSTR::null()).map_err(NotepadError::from)?;
        AppendMenuW(file, MF_STRING, IDM_FILE_EXIT, w!("E&xit\tAlt+F4"))
            .map_err(NotepadError::from)?;

        let edit = CreatePopupMenu().map_err(NotepadError::from)?;
        AppendMenuW(edit, MF_STRING, IDM_EDIT_UNDO, w!("&Undo\tCtrl+Z"))
            .map_err(NotepadError::from)?;
        AppendMenuW(edit, MF_SEPARATOR, 0, PCWSTR::null()).map_err(NotepadError::from)?;
        AppendMenuW(edit, MF_STRING, IDM_EDIT_CUT, w!("Cu&t\tCtrl+X"))
            .map_err(NotepadError::from)?;
        AppendMenuW(edit, MF_STRING, IDM_EDIT_COPY, w!("&Copy\tCtrl+C"))
            .map_err(NotepadError::from)?;
        AppendMenuW(edit, MF_STRING, IDM_EDIT_PASTE, w!("&Paste\tCtrl+V"))
            .map_err(NotepadError::from)?;
        AppendMenuW(edit, MF_SEPARATOR, 0, PCWSTR::null()).map_err(NotepadError::from)?;
        AppendMenuW(edit, MF_STRING, IDM_EDIT_SELECT_ALL, w!("Select &All\tCtrl+A"))
            .map_err(NotepadError::from)?;

        Ok(Menus { file, edit })
    }
}

/// Open a popup menu with its top-left corner at a client-area point.
/// The chosen command arrives on `owner` as WM_COMMAND.
pub(crate) fn show_popup_menu(owner: HWND, menu: HMENU, client_x: i32, client_y: i32) {
    let mut pt = POINT {
        x: client_x,
        y: client_y,
    };
    // SAFETY: owner is a valid window; TrackPopupMenu runs its own modal
    // loop and posts the selection before returning.
    unsafe {
        let _ = ClientToScreen(owner, &mut pt);
        let _ = TrackPopupMenu(menu, TPM_LEFTALIGN | TPM_TOPALIGN, pt.x, pt.y, 0, owner, None);
    }
}

// ── Accelerators ──────────────────────────────────────────────────────────────

fn accel(modifiers: ACCEL_VIRT_FLAGS, key: char, cmd: usize) -> ACCEL {
    ACCEL {
        fVirt: FVIRTKEY | modifiers,
        key: key as u16,
        cmd: cmd as u16,
    }
}

/// Keyboard shortcut table.  Cut/copy/paste/undo are deliberately absent:
/// the EDIT control handles those natively, and routing them through the
/// table would bypass its own clipboard handling.
pub(crate) fn create_accelerators() -> Result<HACCEL> {
    let table = [
        accel(FCONTROL, 'N', IDM_FILE_NEW),
        accel(FCONTROL, 'O', IDM_FILE_OPEN),
        accel(FCONTROL, 'S', IDM_FILE_SAVE),
        accel(FCONTROL | FSHIFT, 'S', IDM_FILE_SAVE_AS),
        accel(FCONTROL, 'A', IDM_EDIT_SELECT_ALL),
    ];
    // SAFETY: table is a valid ACCEL slice; the system copies it.
    unsafe { CreateAcceleratorTableW(&table) }.map_err(NotepadError::from)
}

// ── Status line ───────────────────────────────────────────────────────────────

/// Create the STATIC control that shows the caret position.  The text is
/// written by the owner after every caret or content change.
pub(crate) fn create_status_bar(parent: HWND, hinstance: HINSTANCE) -> Result<HWND> {
    // SAFETY: "STATIC" is a system class that is always registered; parent
    // and hinstance are the freshly created main window and the exe's module.
    let hwnd = unsafe {
        CreateWindowExW(
            WINDOW_EX_STYLE(0),
            w!("STATIC"),
            PCWSTR::null(),
            WS_CHILD | WS_VISIBLE | WINDOW_STYLE(0x0200), // SS_CENTERIMAGE
            0,
            0,
            0,
            0,
            parent,
            HMENU::default(),
            hinstance,
            None,
        )
    }
    .unwrap_or_default();

    if hwnd == HWND::default() {
        // SAFETY: GetLastError reads thread-local state set by the just-
        // failed CreateWindowExW; no Win32 calls between them.
        let code = unsafe { GetLastError().0 };
        return Err(NotepadError::Win32 {
            function: "CreateWindowExW (STATIC)",
            code,
        });
    }

    Ok(hwnd)
}

/// Replace a window's text (UTF-16 conversion included).  Used for the main
/// title and the status line.
pub(crate) fn set_window_text(hwnd: HWND, text: &str) {
    let wide: Vec<u16> = text.encode_utf16().chain(std::iter::once(0)).collect();
    // SAFETY: wide is a valid null-terminated UTF-16 string that outlives
    // the call.
    unsafe {
        let _ = SetWindowTextW(hwnd, PCWSTR(wide.as_ptr()));
    }
}

// ── Fonts ─────────────────────────────────────────────────────────────────────

/// Point size of the title, menu label, and status line font.
const UI_FONT_PT: i32 = 11;

/// Point size of the caption button glyph font.
const CAPTION_FONT_PT: i32 = 12;

/// Editor point size at startup, before any Ctrl+wheel zoom.
pub(crate) const DEFAULT_EDITOR_PT: i32 = 14;

/// GDI fonts for the hand-drawn chrome and the editor.  Rebuilt whenever the
/// DPI or the editor zoom changes; the owner deletes the old set.
pub(crate) struct Fonts {
    /// Segoe UI, for the title text, menu labels, and status line.
    pub(crate) ui: HFONT,
    /// Segoe UI at caption size, for the minimize/maximize/close glyphs.
    pub(crate) caption: HFONT,
    /// Consolas at the current zoom level.
    pub(crate) editor: HFONT,
}

impl Fonts {
    pub(crate) fn create(editor_pt: i32, dpi: u32) -> Self {
        Self {
            ui: make_font("Segoe UI", UI_FONT_PT, dpi),
            caption: make_font("Segoe UI", CAPTION_FONT_PT, dpi),
            editor: make_font("Consolas", editor_pt, dpi),
        }
    }

    /// Release the GDI handles.  Only call once no control or DC still
    /// selects them.
    pub(crate) fn delete(&self) {
        // SAFETY: the handles came from CreateFontIndirectW and are no longer
        // selected into any DC.
        unsafe {
            let _ = DeleteObject(self.ui);
            let _ = DeleteObject(self.caption);
            let _ = DeleteObject(self.editor);
        }
    }
}

fn make_font(face: &str, pt: i32, dpi: u32) -> HFONT {
    let mut lf = LOGFONTW {
        lfHeight: dpi::font_height(pt, dpi),
        lfWeight: 400, // FW_NORMAL
        lfCharSet: DEFAULT_CHARSET,
        lfQuality: CLEARTYPE_QUALITY,
        ..Default::default()
    };
    for (dst, src) in lf.lfFaceName.iter_mut().zip(face.encode_utf16()) {
        *dst = src;
    }
    // SAFETY: lf is fully initialised; both face names fit the 31-character
    // LOGFONT limit with room to spare.
    unsafe { CreateFontIndirectW(&lf) }
}

// ── Dark popup menus ──────────────────────────────────────────────────────────
//
// The switches that make popup menus follow dark mode are not in any public
// header; uxtheme exports them by ordinal only (stable since Windows 10
// 1809).  Best effort: on builds without the ordinals the menus stay light.

#[repr(i32)]
#[derive(Clone, Copy)]
enum PreferredAppMode {
    AllowDark = 1,
}

type SetPreferredAppModeFn = unsafe extern "system" fn(PreferredAppMode) -> PreferredAppMode;
type RefreshImmersiveColorPolicyStateFn = unsafe extern "system" fn();
type FlushMenuThemesFn = unsafe extern "system" fn();

const ORD_REFRESH_IMMERSIVE_COLOR_POLICY_STATE: usize = 104;
const ORD_SET_PREFERRED_APP_MODE: usize = 135;
const ORD_FLUSH_MENU_THEMES: usize = 136;

/// Opt the process into dark popup menus.  Idempotent; call before the
/// first menu is shown.
pub(crate) fn init_dark_menus() {
    static INIT: OnceLock<()> = OnceLock::new();
    INIT.get_or_init(|| {
        // SAFETY: uxtheme.dll is a system DLL that stays loaded for the
        // process lifetime.  Each ordinal is transmuted to the signature the
        // export has carried since 1809; missing ordinals are skipped.
        unsafe {
            let Ok(module) = LoadLibraryW(w!("uxtheme.dll")) else {
                return;
            };
            if let Some(ptr) = ordinal_proc(module, ORD_SET_PREFERRED_APP_MODE) {
                let set_preferred =
                    std::mem::transmute::<*const core::ffi::c_void, SetPreferredAppModeFn>(ptr);
                let _ = set_preferred(PreferredAppMode::AllowDark);
            }
            if let Some(ptr) = ordinal_proc(module, ORD_REFRESH_IMMERSIVE_COLOR_POLICY_STATE) {
                let refresh = std::mem::transmute::<
                    *const core::ffi::c_void,
                    RefreshImmersiveColorPolicyStateFn,
                >(ptr);
                refresh();
            }
            if let Some(ptr) = ordinal_proc(module, ORD_FLUSH_MENU_THEMES) {
                let flush =
                    std::mem::transmute::<*const core::ffi::c_void, FlushMenuThemesFn>(ptr);
                flush();
            }
        }
    });
}

fn ordinal_proc(module: HMODULE, ordinal: usize) -> Option<*const core::ffi::c_void> {
    // SAFETY: a PCSTR value below 0x10000 is interpreted as an export ordinal.
    unsafe { GetProcAddress(module, PCSTR(ordinal as *const u8)) }
        .map(|f| f as *const core::ffi::c_void)
}
