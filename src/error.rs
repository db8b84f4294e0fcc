// ── Central error type ────────────────────────────────────────────────────────
//
// Every fallible operation returns `error::Result<T>`.  Nothing panics in
// production paths: a failure before the window exists surfaces through
// `platform::win32::window::show_error_dialog`, and a failure while the
// window is live goes through `app::Shell::report_error` with the document
// left untouched.

/// Every failure the application can produce.
#[derive(Debug)]
pub enum NotepadError {
    /// A Win32 call signalled failure.  `function` names the call site for
    /// the dialog text; `code` holds the `GetLastError` value or HRESULT bits.
    Win32 {
        function: &'static str,
        code: u32,
    },

    /// File open, read or write failure from the I/O gateway.
    Io(std::io::Error),
}

impl std::fmt::Display for NotepadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Win32 { function, code } => {
                write!(f, "{function} failed (Win32 error {code:#010x})")
            }
            // Rendered verbatim: the gateway callers prefix their own
            // "Could not open/save the file:" context.
            Self::Io(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for NotepadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Win32 { .. } => None,
        }
    }
}

impl From<std::io::Error> for NotepadError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

// Lets `?` lift `windows::core::Result<T>` values anywhere in the platform
// modules.  The HRESULT bits are kept as-is, so Win32 failures show up as
// 0x8007xxxx.
impl From<windows::core::Error> for NotepadError {
    fn from(e: windows::core::Error) -> Self {
        Self::Win32 {
            function: "Win32 API call",
            code: e.code().0 as u32,
        }
    }
}

/// Alias every fallible function in the crate returns.
pub type Result<T> = std::result::Result<T, NotepadError>;
