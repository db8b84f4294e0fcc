// ── Platform abstraction layer ────────────────────────────────────────────────
//
// This module holds the OS-facing side of the application.  No `unsafe` lives
// here at the top level; the Win32 FFI is confined to the `win32` sub-module
// (and, for the hosted EDIT control, `crate::editor`) and never leaks outward.

pub mod win32;
