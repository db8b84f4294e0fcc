// ── UI geometry ───────────────────────────────────────────────────────────────
//
// Pure Rust helpers for the hand-drawn window chrome.  Everything here is
// plain arithmetic over client coordinates; painting and control placement
// happen in `platform::win32::window`.

pub(crate) mod layout;
