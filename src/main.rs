// ── Safety policy ────────────────────────────────────────────────────────────
// The crate is safe Rust except for two modules that talk to Win32:
//   • `platform::win32` – window, chrome, dialogs, controls FFI
//   • `editor`          – the hosted EDIT control and its subclass
// Every unsafe block there MUST carry a `// SAFETY:` comment.
#![deny(unsafe_code)]

// A GUI subsystem binary in release; debug keeps the console attached so the
// eprintln! startup milestones have somewhere to go.
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod editor;
mod error;
mod fileio;
mod platform;
mod theme;
mod ui;

fn main() {
    if let Err(e) = platform::win32::window::run() {
        // No window survived to host the message, so a bare modal box is the
        // one output channel left.
        platform::win32::window::show_error_dialog(&e.to_string());
        std::process::exit(1);
    }
}
