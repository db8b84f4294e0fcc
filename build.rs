/// Modern Notepad build script.
///
/// The source assumes Win32 semantics everywhere (window chrome, common
/// dialogs, the EDIT control), so the build is gated to Windows targets.
fn main() {
    // Hard gate: fail loudly on any other target rather than silently
    // producing a broken binary.
    let target_os = std::env::var("CARGO_CFG_TARGET_OS").unwrap_or_default();
    if target_os != "windows" {
        panic!(
            "Modern Notepad only builds for Windows \
             (CARGO_CFG_TARGET_OS = {target_os:?})"
        );
    }

    // Only re-run the build script when it changes.
    println!("cargo:rerun-if-changed=build.rs");
}
