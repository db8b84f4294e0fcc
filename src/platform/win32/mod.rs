// ── Win32 platform implementation ─────────────────────────────────────────────
//
// One of the crate's two `unsafe`-permitted modules (the other is `editor`,
// which hosts the EDIT child control).  Every `unsafe` block MUST carry a
// `// SAFETY:` comment naming the invariant that makes it sound and what,
// if anything, the caller has to uphold.
//
// Visibility stays as tight as the callers allow; the unsafe surface does
// not leak past this module boundary.

#![allow(unsafe_code)]

// ── Sub-modules ───────────────────────────────────────────────────────────────

pub mod dialogs; // common open/save dialogs and message boxes
pub mod window; // main window, WndProc, message loop

pub(crate) mod chrome; // borderless-frame helpers: region, drag, hit codes
pub(crate) mod controls; // menus, accelerators, status bar, fonts
pub(crate) mod dpi; // per-monitor DPI v2 helpers
