// ── Edit control hosting ──────────────────────────────────────────────────────
//
// Safe Rust API over the system "EDIT" child control that fills the client
// area.  This is one of exactly two modules where `unsafe` is permitted.
// Every `unsafe` block in here MUST carry a `// SAFETY:` comment.
//
// The control is subclassed so that three events reach the main window
// procedure as WM_APP messages: Ctrl+wheel (font zoom), key-up and mouse-up
// (status line refresh).  Everything else is stock EDIT behaviour, which
// already covers typing, selection, scrolling, and the clipboard.

#![allow(unsafe_code)]

use windows::{
    core::{w, PCWSTR},
    Win32::{
        Foundation::{GetLastError, HINSTANCE, HWND, LPARAM, LRESULT, WPARAM},
        Graphics::Gdi::HFONT,
        UI::{
            Controls::{
                SetWindowTheme, EM_EMPTYUNDOBUFFER, EM_GETSEL, EM_LINEFROMCHAR, EM_LINEINDEX,
                EM_SETSEL,
            },
            Input::KeyboardAndMouse::SetFocus,
            Shell::{DefSubclassProc, RemoveWindowSubclass, SetWindowSubclass},
            WindowsAndMessaging::{
                CreateWindowExW, GetWindowTextLengthW, GetWindowTextW, SendMessageW,
                SetWindowTextW, ES_AUTOHSCROLL, ES_AUTOVSCROLL, ES_MULTILINE, ES_NOHIDESEL,
                ES_WANTRETURN, HMENU, WINDOW_EX_STYLE, WINDOW_STYLE, WM_APP, WM_COPY, WM_CUT,
                WM_KEYUP, WM_LBUTTONUP, WM_MOUSEWHEEL, WM_NCDESTROY, WM_PASTE, WM_SETFONT,
                WM_UNDO, WS_CHILD, WS_HSCROLL, WS_VISIBLE, WS_VSCROLL,
            },
        },
    },
};

use crate::error::{NotepadError, Result};

/// Win32 class name of the stock edit control.
const CLASS_NAME: PCWSTR = w!("EDIT");

const SUBCLASS_ID: usize = 1;

// ── Forwarded events ──────────────────────────────────────────────────────────

/// Sent to the main window when Ctrl+wheel requests a zoom step.
/// `WPARAM` carries the signed wheel delta.
pub(crate) const WM_APP_ZOOM_WHEEL: u32 = WM_APP + 1;

/// Sent to the main window after a key-up or mouse-up in the editor so the
/// status line can re-read the caret position.
pub(crate) const WM_APP_CARET_MOVED: u32 = WM_APP + 2;

// SAFETY: installed via SetWindowSubclass with the main window handle in
// ref_data.  The main window outlives the child, so the handle stays valid
// for every callback until WM_NCDESTROY removes the subclass.
unsafe extern "system" fn edit_subclass_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
    _subclass_id: usize,
    ref_data: usize,
) -> LRESULT {
    let main_window = HWND(ref_data as *mut core::ffi::c_void);

    match msg {
        // 0x0008 = MK_CONTROL in the wheel message's key-state word.
        WM_MOUSEWHEEL if wparam.0 & 0x0008 != 0 => {
            let delta = ((wparam.0 >> 16) & 0xFFFF) as u16 as i16;
            // Swallowed: a zoom request must not also scroll the text.
            let _ = SendMessageW(
                main_window,
                WM_APP_ZOOM_WHEEL,
                WPARAM(delta as isize as usize),
                LPARAM(0),
            );
            LRESULT(0)
        }

        WM_KEYUP | WM_LBUTTONUP => {
            // Let the control move the caret first, then report.
            let result = DefSubclassProc(hwnd, msg, wparam, lparam);
            let _ = SendMessageW(main_window, WM_APP_CARET_MOVED, WPARAM(0), LPARAM(0));
            result
        }

        WM_NCDESTROY => {
            let _ = RemoveWindowSubclass(hwnd, Some(edit_subclass_proc), SUBCLASS_ID);
            DefSubclassProc(hwnd, msg, wparam, lparam)
        }

        _ => DefSubclassProc(hwnd, msg, wparam, lparam),
    }
}

// ── EditView ──────────────────────────────────────────────────────────────────

/// A hosted multiline EDIT child window.
///
/// Holds only the child `HWND`; Windows destroys the control with its parent,
/// so there is no explicit cleanup.  `Copy` because the handle is the whole
/// state.
#[derive(Clone, Copy)]
pub(crate) struct EditView {
    hwnd: HWND,
}

impl EditView {
    /// Create the editor child inside `parent`.
    ///
    /// The control is created at zero size; the parent positions it from the
    /// chrome layout on the first WM_SIZE.  `control_id` is echoed back in
    /// WM_COMMAND notifications (EN_CHANGE).
    pub(crate) fn create(parent: HWND, hinstance: HINSTANCE, control_id: usize) -> Result<Self> {
        let style = WS_CHILD
            | WS_VISIBLE
            | WS_VSCROLL
            | WS_HSCROLL
            | WINDOW_STYLE(
                (ES_MULTILINE | ES_AUTOVSCROLL | ES_AUTOHSCROLL | ES_WANTRETURN | ES_NOHIDESEL)
                    as u32,
            );

        // SAFETY: "EDIT" is a system class that is always registered; parent
        // and hinstance are the freshly created main window and the exe's
        // module.  The HMENU slot carries the child control ID, as documented
        // for WS_CHILD windows.
        let hwnd = unsafe {
            CreateWindowExW(
                WINDOW_EX_STYLE(0),
                CLASS_NAME,
                PCWSTR::null(),
                style,
                0,
                0,
                0,
                0,
                parent,
                HMENU(control_id as *mut core::ffi::c_void),
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
                function: "CreateWindowExW (EDIT)",
                code,
            });
        }

        // Dark scrollbars where the OS supports the Explorer dark theme.
        // SAFETY: hwnd is a valid window; on failure the scrollbars stay light.
        unsafe {
            let _ = SetWindowTheme(hwnd, w!("DarkMode_Explorer"), PCWSTR::null());
        }

        // SAFETY: hwnd is valid; edit_subclass_proc matches SUBCLASSPROC; the
        // parent outlives the child, so stashing its handle in ref_data is
        // sound for the subclass lifetime.
        let installed =
            unsafe { SetWindowSubclass(hwnd, Some(edit_subclass_proc), SUBCLASS_ID, parent.0 as usize) };
        if !installed.as_bool() {
            // SAFETY: as above, immediately after the failing call.
            let code = unsafe { GetLastError().0 };
            return Err(NotepadError::Win32 {
                function: "SetWindowSubclass",
                code,
            });
        }

        Ok(Self { hwnd })
    }

    /// The editor child window handle.  Valid until the parent is destroyed.
    pub(crate) fn hwnd(&self) -> HWND {
        self.hwnd
    }

    // ── Text ──────────────────────────────────────────────────────────────────

    /// Read the full buffer contents.
    pub(crate) fn text(&self) -> String {
        // SAFETY: hwnd valid; length query only.
        let len = unsafe { GetWindowTextLengthW(self.hwnd) };
        if len <= 0 {
            return String::new();
        }
        let mut buf = vec![0u16; len as usize + 1];
        // SAFETY: buf holds len+1 wide chars; GetWindowTextW writes at most
        // that many including the terminator.
        let copied = unsafe { GetWindowTextW(self.hwnd, &mut buf) };
        String::from_utf16_lossy(&buf[..copied.max(0) as usize])
    }

    /// Replace the buffer contents and reset the undo history.
    ///
    /// Line endings are normalised to CRLF first: the multiline EDIT control
    /// only breaks lines on `\r\n`.
    pub(crate) fn set_text(&self, text: &str) {
        let crlf = to_crlf(text);
        let wide: Vec<u16> = crlf.encode_utf16().chain(std::iter::once(0)).collect();
        // SAFETY: wide is a valid null-terminated UTF-16 string that outlives
        // both calls; EM_EMPTYUNDOBUFFER takes no parameters.
        unsafe {
            let _ = SetWindowTextW(self.hwnd, PCWSTR(wide.as_ptr()));
            let _ = SendMessageW(self.hwnd, EM_EMPTYUNDOBUFFER, WPARAM(0), LPARAM(0));
        }
    }

    // ── Caret ─────────────────────────────────────────────────────────────────

    /// 1-based (line, column) of the selection start, for the status line.
    pub(crate) fn caret_line_col(&self) -> (usize, usize) {
        let mut start: u32 = 0;
        // SAFETY: hwnd valid; EM_GETSEL writes the selection start through the
        // WPARAM pointer, which stays alive across the call.  The line queries
        // are read-only; EM_LINEINDEX returns -1 only for an invalid line, in
        // which case the column clamps to 1.
        unsafe {
            let _ = SendMessageW(
                self.hwnd,
                EM_GETSEL,
                WPARAM(&mut start as *mut u32 as usize),
                LPARAM(0),
            );
            let line = SendMessageW(self.hwnd, EM_LINEFROMCHAR, WPARAM(start as usize), LPARAM(0)).0;
            let line_start = SendMessageW(self.hwnd, EM_LINEINDEX, WPARAM(line as usize), LPARAM(0)).0;
            let column = start as isize - line_start;
            ((line + 1) as usize, (column + 1).max(1) as usize)
        }
    }

    // ── Edit operations ───────────────────────────────────────────────────────

    /// Undo the last edit.
    pub(crate) fn undo(&self) {
        // SAFETY: hwnd valid; WM_UNDO is processed natively by EDIT.
        unsafe {
            let _ = SendMessageW(self.hwnd, WM_UNDO, WPARAM(0), LPARAM(0));
        }
    }

    /// Cut the selection to the clipboard.
    pub(crate) fn cut(&self) {
        // SAFETY: hwnd valid; WM_CUT is processed natively by EDIT.
        unsafe {
            let _ = SendMessageW(self.hwnd, WM_CUT, WPARAM(0), LPARAM(0));
        }
    }

    /// Copy the selection to the clipboard.
    pub(crate) fn copy_to_clipboard(&self) {
        // SAFETY: hwnd valid; WM_COPY is processed natively by EDIT.
        unsafe {
            let _ = SendMessageW(self.hwnd, WM_COPY, WPARAM(0), LPARAM(0));
        }
    }

    /// Paste from the clipboard at the caret.
    pub(crate) fn paste(&self) {
        // SAFETY: hwnd valid; WM_PASTE is processed natively by EDIT.
        unsafe {
            let _ = SendMessageW(self.hwnd, WM_PASTE, WPARAM(0), LPARAM(0));
        }
    }

    /// Select the whole buffer.
    pub(crate) fn select_all(&self) {
        // SAFETY: hwnd valid; EM_SETSEL with 0..-1 selects everything.
        unsafe {
            let _ = SendMessageW(self.hwnd, EM_SETSEL, WPARAM(0), LPARAM(-1));
        }
    }

    /// Assign the editor font.  The font handle is owned by the caller and
    /// must stay alive while the control uses it.
    pub(crate) fn set_font(&self, font: HFONT) {
        // SAFETY: hwnd valid; LPARAM(1) requests an immediate redraw.
        unsafe {
            let _ = SendMessageW(self.hwnd, WM_SETFONT, WPARAM(font.0 as usize), LPARAM(1));
        }
    }

    /// Put the keyboard focus in the editor.
    pub(crate) fn focus(&self) {
        // SAFETY: hwnd valid; the previous-focus return is unused.
        unsafe {
            let _ = SetFocus(self.hwnd);
        }
    }
}

// ── Line endings ──────────────────────────────────────────────────────────────

/// Normalise `\n`, `\r`, and `\r\n` to CRLF for the EDIT control.
fn to_crlf(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push_str("\r\n");
            }
            '\n' => out.push_str("\r\n"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::to_crlf;

    #[test]
    fn lf_becomes_crlf() {
        assert_eq!(to_crlf("a\nb\n"), "a\r\nb\r\n");
    }

    #[test]
    fn existing_crlf_is_untouched() {
        assert_eq!(to_crlf("a\r\nb"), "a\r\nb");
    }

    #[test]
    fn lone_cr_becomes_crlf() {
        assert_eq!(to_crlf("a\rb"), "a\r\nb");
    }

    #[test]
    fn mixed_endings_normalise() {
        assert_eq!(to_crlf("a\nb\r\nc\rd"), "a\r\nb\r\nc\r\nd");
    }
}
