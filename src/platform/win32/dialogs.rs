// ── Common dialogs ─────────────────────────────────────────────────────────────
//
// Thin wrappers around the Win32 common-dialog and message-box APIs.  The
// file pickers return `Some(path)` on user confirmation and `None` on cancel
// or error; the prompts translate button IDs into plain Rust enums.
//
// Lives inside `platform::win32`, so `unsafe` is allowed under crate policy.

#![allow(unsafe_code)]

use std::path::PathBuf;

use windows::{
    core::{w, PCWSTR},
    Win32::{
        Foundation::HWND,
        UI::{
            Controls::Dialogs::{
                GetOpenFileNameW, GetSaveFileNameW, OFN_FILEMUSTEXIST, OFN_HIDEREADONLY,
                OFN_OVERWRITEPROMPT, OFN_PATHMUSTEXIST, OPENFILENAMEW,
            },
            WindowsAndMessaging::{
                MessageBoxW, IDCANCEL, IDNO, IDYES, MB_ICONERROR, MB_ICONWARNING, MB_OK,
                MB_YESNOCANCEL,
            },
        },
    },
};

use crate::app::{SaveChoice, APP_NAME};

// ── Path buffer ───────────────────────────────────────────────────────────────

/// Result buffer length in `WCHAR`s: room for a full `\\?\` extended path
/// (32 767 characters) plus the terminator.  `MAX_PATH` would truncate
/// modern paths.
const PATH_BUF_LEN: usize = 32_768;

/// Filter pairs, null-separated, double-null terminated.  Plain text leads
/// and `nFilterIndex` 1 selects it, matching what the editor writes.
const TEXT_FILTER: &str = "Text Files (*.txt)\0*.txt\0All Files (*.*)\0*.*\0\0";

// ── Open dialog ───────────────────────────────────────────────────────────────

/// Standard "Open File" picker; `None` when the user backs out.
pub(crate) fn show_open_dialog(hwnd_owner: HWND) -> Option<PathBuf> {
    let mut buf = vec![0u16; PATH_BUF_LEN];
    let filter: Vec<u16> = TEXT_FILTER.encode_utf16().collect();

    let mut ofn = OPENFILENAMEW {
        lStructSize: std::mem::size_of::<OPENFILENAMEW>() as u32,
        hwndOwner: hwnd_owner,
        lpstrFilter: PCWSTR(filter.as_ptr()),
        nFilterIndex: 1,
        lpstrFile: windows::core::PWSTR(buf.as_mut_ptr()),
        nMaxFile: PATH_BUF_LEN as u32,
        Flags: OFN_FILEMUSTEXIST | OFN_PATHMUSTEXIST | OFN_HIDEREADONLY,
        ..Default::default()
    };

    // SAFETY: every pointer in `ofn` targets a local buffer that outlives the
    // call, and the dialog writes the selection inside `buf`'s bounds.  Runs
    // on the UI thread, as its modal loop requires.
    let ok = unsafe { GetOpenFileNameW(&mut ofn) };

    ok.as_bool().then(|| path_from_buf(&buf))
}

// ── Save dialog ───────────────────────────────────────────────────────────────

/// Standard "Save As" picker.  `default_name` pre-fills the filename field;
/// an extensionless entry gets `.txt` appended.  `None` when cancelled.
pub(crate) fn show_save_dialog(hwnd_owner: HWND, default_name: &str) -> Option<PathBuf> {
    // lpstrFile is in/out: seed it with the suggested name, terminator intact
    // even if the name is oversized.
    let mut buf = vec![0u16; PATH_BUF_LEN];
    for (dst, src) in buf
        .iter_mut()
        .zip(default_name.encode_utf16().take(PATH_BUF_LEN - 1))
    {
        *dst = src;
    }

    let filter: Vec<u16> = TEXT_FILTER.encode_utf16().collect();

    let mut ofn = OPENFILENAMEW {
        lStructSize: std::mem::size_of::<OPENFILENAMEW>() as u32,
        hwndOwner: hwnd_owner,
        lpstrFilter: PCWSTR(filter.as_ptr()),
        nFilterIndex: 1,
        lpstrFile: windows::core::PWSTR(buf.as_mut_ptr()),
        nMaxFile: PATH_BUF_LEN as u32,
        lpstrDefExt: w!("txt"),
        Flags: OFN_OVERWRITEPROMPT | OFN_PATHMUSTEXIST,
        ..Default::default()
    };

    // SAFETY: same buffer ownership as show_open_dialog.
    let ok = unsafe { GetSaveFileNameW(&mut ofn) };

    ok.as_bool().then(|| path_from_buf(&buf))
}

// ── Prompts ───────────────────────────────────────────────────────────────────

/// Three-way unsaved-changes prompt: Yes saves, No discards, Cancel (or
/// closing the box) vetoes the pending action.
pub(crate) fn ask_unsaved_changes(hwnd_owner: HWND, prompt: &str) -> SaveChoice {
    let text: Vec<u16> = prompt.encode_utf16().chain(std::iter::once(0)).collect();
    let caption: Vec<u16> = APP_NAME.encode_utf16().chain(std::iter::once(0)).collect();

    // SAFETY: text and caption are valid null-terminated UTF-16 strings that
    // outlive the call; hwnd_owner is the main window, so the box is modal.
    let choice = unsafe {
        MessageBoxW(
            hwnd_owner,
            PCWSTR(text.as_ptr()),
            PCWSTR(caption.as_ptr()),
            MB_YESNOCANCEL | MB_ICONWARNING,
        )
    };

    match choice {
        x if x == IDYES => SaveChoice::Save,
        x if x == IDNO => SaveChoice::Discard,
        x if x == IDCANCEL => SaveChoice::Cancel,
        _ => SaveChoice::Cancel,
    }
}

/// Modal error report, used for failed reads and writes.
pub(crate) fn show_error_message(hwnd_owner: HWND, message: &str) {
    let text: Vec<u16> = message.encode_utf16().chain(std::iter::once(0)).collect();
    let caption: Vec<u16> = APP_NAME.encode_utf16().chain(std::iter::once(0)).collect();

    // SAFETY: text and caption are valid null-terminated UTF-16 strings that
    // outlive the call.  Return value (button pressed) is intentionally
    // unused for an error dialog.
    unsafe {
        let _ = MessageBoxW(
            hwnd_owner,
            PCWSTR(text.as_ptr()),
            PCWSTR(caption.as_ptr()),
            MB_OK | MB_ICONERROR,
        );
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// The path written into a picker's out-buffer, up to its terminator.
fn path_from_buf(buf: &[u16]) -> PathBuf {
    let len = buf.iter().position(|&c| c == 0).unwrap_or(buf.len());
    PathBuf::from(String::from_utf16_lossy(&buf[..len]))
}
