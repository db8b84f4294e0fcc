// ── Application logic & document state ────────────────────────────────────────
//
// A single `DocumentController` is created on startup and owned by
// `WindowState` for the lifetime of the main window.  All mutations happen on
// the UI thread; there is no global mutable state.
//
// The controller never touches Win32 directly.  Everything it needs from the
// surrounding window (editor text, dialogs, disk I/O) comes in through the
// `Shell` trait, which keeps the New/Open/Save/close flows testable with a
// scripted fake.

use std::path::{Path, PathBuf};

use crate::error::Result;

/// Application display name; also the window title for an untitled buffer.
pub(crate) const APP_NAME: &str = "Modern Notepad";

/// Prompt shown when File ▸ New or File ▸ Open would discard unsaved changes.
pub(crate) const UNSAVED_PROMPT: &str =
    "There are unsaved changes. Do you want to save them?";

/// Prompt shown when closing the window with unsaved changes.
pub(crate) const UNSAVED_CLOSE_PROMPT: &str =
    "There are unsaved changes. Do you want to save them before closing?";

// ── Shell ─────────────────────────────────────────────────────────────────────

/// Outcome of the three-way unsaved-changes prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SaveChoice {
    Save,
    Discard,
    Cancel,
}

/// What the controller needs from the surrounding window.
///
/// `platform::win32::window` implements this over the real editor control,
/// the common dialogs, and `fileio`; tests substitute a scripted fake.
pub(crate) trait Shell {
    /// Current contents of the editor control.
    fn live_text(&mut self) -> String;

    /// Replace the editor contents and reset its undo stack.
    fn set_live_text(&mut self, text: &str);

    /// Three-way Save / Discard / Cancel prompt.
    fn ask_unsaved(&mut self, prompt: &str) -> SaveChoice;

    /// "Open" file picker; `None` when the user cancels.
    fn choose_open_path(&mut self) -> Option<PathBuf>;

    /// "Save As" file picker with the filename field pre-filled;
    /// `None` when the user cancels.
    fn choose_save_path(&mut self, suggested_name: &str) -> Option<PathBuf>;

    fn read_file(&mut self, path: &Path) -> Result<String>;

    fn write_file(&mut self, path: &Path, content: &str) -> Result<()>;

    /// Modal error report.  Reporting never interrupts control flow.
    fn report_error(&mut self, message: &str);
}

// ── Document ──────────────────────────────────────────────────────────────────

/// State of the single open document.
///
/// Dirtiness is never stored.  It is derived on every query by comparing the
/// live editor text against the snapshot taken at the last successful open or
/// save, so typing a change and then reverting it by hand leaves the document
/// clean again.
#[derive(Debug)]
pub(crate) struct Document {
    /// Absolute path of the file on disk, or `None` for an untitled buffer.
    path: Option<PathBuf>,
    /// Editor contents at the moment of the last successful open or save.
    /// `None` until then; an untitled buffer counts as clean while empty.
    saved_snapshot: Option<String>,
    /// Editor contents as of the last refresh from the control.
    live: String,
}

impl Document {
    /// A fresh, untitled, empty document.
    fn untitled() -> Self {
        Self {
            path: None,
            saved_snapshot: None,
            live: String::new(),
        }
    }

    /// `true` when the live text differs from the last open/save snapshot.
    fn is_dirty(&self) -> bool {
        self.live != self.saved_snapshot.as_deref().unwrap_or("")
    }

    /// Bare filename component of the open file, if any.
    fn file_name(&self) -> Option<String> {
        self.path
            .as_deref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
    }

    /// Title string for the main window.
    ///
    /// | State | Title |
    /// |---|---|
    /// | No file open | `"Modern Notepad"` |
    /// | File open | `"Modern Notepad - notes.txt"` |
    fn window_title(&self) -> String {
        match self.file_name() {
            Some(name) => format!("{APP_NAME} - {name}"),
            None => APP_NAME.to_owned(),
        }
    }
}

// ── DocumentController ────────────────────────────────────────────────────────

/// Drives every document-level operation: New, Open, Save, Save As, and the
/// unsaved-changes gate in front of anything destructive.
///
/// Each entry point refreshes the cached live text from the control first, so
/// dirtiness always reflects what the user actually sees.
pub(crate) struct DocumentController {
    doc: Document,
}

impl DocumentController {
    pub(crate) fn new() -> Self {
        Self {
            doc: Document::untitled(),
        }
    }

    pub(crate) fn window_title(&self) -> String {
        self.doc.window_title()
    }

    fn refresh(&mut self, shell: &mut dyn Shell) {
        self.doc.live = shell.live_text();
    }

    // ── File operations ───────────────────────────────────────────────────────

    /// File ▸ New.  Runs the gate, then resets to an empty untitled buffer.
    pub(crate) fn request_new(&mut self, shell: &mut dyn Shell) {
        if !self.confirm_discard(shell, UNSAVED_PROMPT) {
            return;
        }
        self.doc = Document::untitled();
        shell.set_live_text("");
    }

    /// File ▸ Open.  Runs the gate, then the picker, then loads the file.
    /// A read failure is reported and leaves the current document in place.
    pub(crate) fn request_open(&mut self, shell: &mut dyn Shell) {
        if !self.confirm_discard(shell, UNSAVED_PROMPT) {
            return;
        }
        let Some(path) = shell.choose_open_path() else {
            return;
        };
        match shell.read_file(&path) {
            Ok(content) => {
                shell.set_live_text(&content);
                // Snapshot what the control actually holds (it may normalise
                // line endings), so a freshly opened file is always clean.
                let live = shell.live_text();
                self.doc = Document {
                    path: Some(path),
                    saved_snapshot: Some(live.clone()),
                    live,
                };
            }
            Err(e) => shell.report_error(&format!("Could not open the file: {e}")),
        }
    }

    /// File ▸ Save.  Writes to the current path, or falls through to Save As
    /// for an untitled buffer.  Returns `true` once the document is saved,
    /// `false` when the user cancelled the picker or the write failed.
    pub(crate) fn request_save(&mut self, shell: &mut dyn Shell) -> bool {
        self.refresh(shell);
        match self.doc.path.clone() {
            Some(path) => self.write_to(shell, path),
            None => self.save_to_picked_path(shell),
        }
    }

    /// File ▸ Save As.  Always prompts for a destination.
    pub(crate) fn request_save_as(&mut self, shell: &mut dyn Shell) -> bool {
        self.refresh(shell);
        self.save_to_picked_path(shell)
    }

    fn save_to_picked_path(&mut self, shell: &mut dyn Shell) -> bool {
        let suggested = self.doc.file_name().unwrap_or_default();
        let Some(path) = shell.choose_save_path(&suggested) else {
            return false;
        };
        self.write_to(shell, path)
    }

    /// Write the live text to `path`; on success adopt the path and take a
    /// fresh snapshot.
    fn write_to(&mut self, shell: &mut dyn Shell, path: PathBuf) -> bool {
        match shell.write_file(&path, &self.doc.live) {
            Ok(()) => {
                self.doc.path = Some(path);
                self.doc.saved_snapshot = Some(self.doc.live.clone());
                true
            }
            Err(e) => {
                shell.report_error(&format!("Could not save the file: {e}"));
                false
            }
        }
    }

    /// Window close request.  Returns `true` when the window may close.
    pub(crate) fn request_close(&mut self, shell: &mut dyn Shell) -> bool {
        self.confirm_discard(shell, UNSAVED_CLOSE_PROMPT)
    }

    // ── Unsaved-changes gate ──────────────────────────────────────────────────

    /// The gate in front of New, Open, and window close.
    ///
    /// Returns `true` when the destructive action may proceed:
    /// - clean document: proceed without prompting
    /// - `Discard`: proceed, dropping the changes
    /// - `Cancel`: veto
    /// - `Save`: run Save once, then re-check; a document still dirty
    ///   afterwards (picker cancelled, write failed) vetoes the action
    fn confirm_discard(&mut self, shell: &mut dyn Shell, prompt: &str) -> bool {
        self.refresh(shell);
        if !self.doc.is_dirty() {
            return true;
        }
        match shell.ask_unsaved(prompt) {
            SaveChoice::Discard => true,
            SaveChoice::Cancel => false,
            SaveChoice::Save => {
                self.request_save(shell);
                self.refresh(shell);
                !self.doc.is_dirty()
            }
        }
    }
}

// ── Status line ───────────────────────────────────────────────────────────────

/// Status bar text for a 1-based caret position.
pub(crate) fn format_status(line: usize, column: usize) -> String {
    format!("Line: {line}, Column: {column}")
}

// ── Editor zoom ───────────────────────────────────────────────────────────────

/// Smallest editor font size reachable via Ctrl+wheel, in points.
pub(crate) const MIN_FONT_PT: i32 = 8;
/// Largest editor font size reachable via Ctrl+wheel, in points.
pub(crate) const MAX_FONT_PT: i32 = 72;

/// One Ctrl+wheel zoom step: ±1pt by wheel direction, clamped.  Returns
/// `None` when the size would not change, so callers skip the font rebuild.
pub(crate) fn zoom_step(current_pt: i32, wheel_delta: i32) -> Option<i32> {
    if wheel_delta == 0 {
        return None;
    }
    let step = if wheel_delta > 0 { 1 } else { -1 };
    let next = (current_pt + step).clamp(MIN_FONT_PT, MAX_FONT_PT);
    (next != current_pt).then_some(next)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// Scripted stand-in for the real window: hands out editor text, canned
    /// dialog answers, and an in-memory filesystem.
    struct FakeShell {
        text: String,
        answers: Vec<SaveChoice>,
        open_path: Option<PathBuf>,
        save_path: Option<PathBuf>,
        suggested: Vec<String>,
        files: HashMap<PathBuf, String>,
        fail_writes: bool,
        writes: usize,
        errors: Vec<String>,
        prompts: Vec<String>,
    }

    impl FakeShell {
        fn new(text: &str) -> Self {
            Self {
                text: text.to_owned(),
                answers: Vec::new(),
                open_path: None,
                save_path: None,
                suggested: Vec::new(),
                files: HashMap::new(),
                fail_writes: false,
                writes: 0,
                errors: Vec::new(),
                prompts: Vec::new(),
            }
        }
    }

    impl Shell for FakeShell {
        fn live_text(&mut self) -> String {
            self.text.clone()
        }

        fn set_live_text(&mut self, text: &str) {
            self.text = text.to_owned();
        }

        fn ask_unsaved(&mut self, prompt: &str) -> SaveChoice {
            self.prompts.push(prompt.to_owned());
            self.answers.remove(0)
        }

        fn choose_open_path(&mut self) -> Option<PathBuf> {
            self.open_path.clone()
        }

        fn choose_save_path(&mut self, suggested_name: &str) -> Option<PathBuf> {
            self.suggested.push(suggested_name.to_owned());
            self.save_path.clone()
        }

        fn read_file(&mut self, path: &Path) -> Result<String> {
            match self.files.get(path) {
                Some(content) => Ok(content.clone()),
                None => Err(std::io::Error::from(std::io::ErrorKind::NotFound).into()),
            }
        }

        fn write_file(&mut self, path: &Path, content: &str) -> Result<()> {
            self.writes += 1;
            if self.fail_writes {
                return Err(std::io::Error::from(std::io::ErrorKind::PermissionDenied).into());
            }
            self.files.insert(path.to_owned(), content.to_owned());
            Ok(())
        }

        fn report_error(&mut self, message: &str) {
            self.errors.push(message.to_owned());
        }
    }

    #[test]
    fn fresh_document_is_clean_and_untitled() {
        let mut shell = FakeShell::new("");
        let mut ctrl = DocumentController::new();
        assert_eq!(ctrl.window_title(), "Modern Notepad");
        // No prompt on close: the gate sees a clean document.
        assert!(ctrl.request_close(&mut shell));
        assert!(shell.prompts.is_empty());
    }

    #[test]
    fn typed_text_dirties_the_untitled_buffer() {
        let mut shell = FakeShell::new("hello");
        shell.answers.push(SaveChoice::Cancel);
        let mut ctrl = DocumentController::new();
        assert!(!ctrl.request_close(&mut shell));
        assert_eq!(shell.prompts, vec![UNSAVED_CLOSE_PROMPT.to_owned()]);
    }

    #[test]
    fn cancel_vetoes_new() {
        let mut shell = FakeShell::new("hello");
        shell.answers.push(SaveChoice::Cancel);
        let mut ctrl = DocumentController::new();
        ctrl.request_new(&mut shell);
        assert_eq!(shell.text, "hello");
        assert_eq!(shell.prompts, vec![UNSAVED_PROMPT.to_owned()]);
    }

    #[test]
    fn discard_proceeds_without_writing() {
        let mut shell = FakeShell::new("hello");
        shell.answers.push(SaveChoice::Discard);
        let mut ctrl = DocumentController::new();
        ctrl.request_new(&mut shell);
        assert_eq!(shell.text, "");
        assert_eq!(shell.writes, 0);
    }

    #[test]
    fn save_choice_saves_once_then_proceeds() {
        let mut shell = FakeShell::new("hello");
        shell.answers.push(SaveChoice::Save);
        shell.save_path = Some(PathBuf::from("out.txt"));
        let mut ctrl = DocumentController::new();
        ctrl.request_new(&mut shell);
        assert_eq!(shell.writes, 1);
        assert_eq!(shell.files[Path::new("out.txt")], "hello");
        assert_eq!(shell.text, "");
        assert_eq!(ctrl.window_title(), "Modern Notepad");
    }

    #[test]
    fn cancelled_save_as_vetoes_the_action() {
        let mut shell = FakeShell::new("hello");
        shell.answers.push(SaveChoice::Save);
        shell.save_path = None;
        let mut ctrl = DocumentController::new();
        ctrl.request_new(&mut shell);
        // The document stayed dirty, so New was vetoed without an error.
        assert_eq!(shell.text, "hello");
        assert!(shell.errors.is_empty());
    }

    #[test]
    fn failed_write_vetoes_and_reports() {
        let mut shell = FakeShell::new("hello");
        shell.answers.push(SaveChoice::Save);
        shell.save_path = Some(PathBuf::from("out.txt"));
        shell.fail_writes = true;
        let mut ctrl = DocumentController::new();
        assert!(!ctrl.request_close(&mut shell));
        assert_eq!(shell.errors.len(), 1);
        assert!(shell.errors[0].starts_with("Could not save the file:"));
    }

    #[test]
    fn open_replaces_document_and_title() {
        let mut shell = FakeShell::new("");
        shell.files.insert(PathBuf::from("a.txt"), "alpha".to_owned());
        shell.open_path = Some(PathBuf::from("a.txt"));
        let mut ctrl = DocumentController::new();
        ctrl.request_open(&mut shell);
        assert_eq!(shell.text, "alpha");
        assert_eq!(ctrl.window_title(), "Modern Notepad - a.txt");
        // Loaded content is the new snapshot: closing needs no prompt.
        assert!(ctrl.request_close(&mut shell));
        assert!(shell.prompts.is_empty());
    }

    #[test]
    fn cancelled_open_picker_is_a_no_op() {
        let mut shell = FakeShell::new("");
        shell.open_path = None;
        let mut ctrl = DocumentController::new();
        ctrl.request_open(&mut shell);
        assert_eq!(shell.text, "");
        assert!(shell.prompts.is_empty());
        assert!(shell.errors.is_empty());
    }

    #[test]
    fn failed_read_reports_and_keeps_document() {
        let mut shell = FakeShell::new("");
        shell.open_path = Some(PathBuf::from("missing.txt"));
        let mut ctrl = DocumentController::new();
        ctrl.request_open(&mut shell);
        assert_eq!(shell.errors.len(), 1);
        assert!(shell.errors[0].starts_with("Could not open the file:"));
        assert_eq!(ctrl.window_title(), "Modern Notepad");
        assert_eq!(shell.text, "");
    }

    #[test]
    fn save_reuses_the_open_path_without_prompting() {
        let mut shell = FakeShell::new("");
        shell.files.insert(PathBuf::from("a.txt"), "alpha".to_owned());
        shell.open_path = Some(PathBuf::from("a.txt"));
        let mut ctrl = DocumentController::new();
        ctrl.request_open(&mut shell);

        shell.text = "alpha beta".to_owned();
        shell.save_path = None; // the picker would fail the save if consulted
        assert!(ctrl.request_save(&mut shell));
        assert_eq!(shell.files[Path::new("a.txt")], "alpha beta");
    }

    #[test]
    fn save_as_prompts_even_with_a_path() {
        let mut shell = FakeShell::new("");
        shell.files.insert(PathBuf::from("a.txt"), "alpha".to_owned());
        shell.open_path = Some(PathBuf::from("a.txt"));
        let mut ctrl = DocumentController::new();
        ctrl.request_open(&mut shell);

        shell.save_path = Some(PathBuf::from("b.txt"));
        assert!(ctrl.request_save_as(&mut shell));
        assert_eq!(shell.files[Path::new("b.txt")], "alpha");
        assert_eq!(shell.suggested, vec!["a.txt".to_owned()]);
        assert_eq!(ctrl.window_title(), "Modern Notepad - b.txt");
    }

    #[test]
    fn untitled_save_falls_through_to_save_as() {
        let mut shell = FakeShell::new("note");
        shell.save_path = Some(PathBuf::from("note.txt"));
        let mut ctrl = DocumentController::new();
        assert!(ctrl.request_save(&mut shell));
        assert_eq!(shell.files[Path::new("note.txt")], "note");
        assert_eq!(ctrl.window_title(), "Modern Notepad - note.txt");
    }

    #[test]
    fn hand_reverted_text_counts_as_clean() {
        let mut shell = FakeShell::new("");
        shell.files.insert(PathBuf::from("a.txt"), "alpha".to_owned());
        shell.open_path = Some(PathBuf::from("a.txt"));
        let mut ctrl = DocumentController::new();
        ctrl.request_open(&mut shell);

        // Edit, then undo the edit by typing the original text back.
        shell.text = "alphax".to_owned();
        shell.text = "alpha".to_owned();
        assert!(ctrl.request_close(&mut shell));
        assert!(shell.prompts.is_empty());
    }

    #[test]
    fn saving_a_clean_document_rewrites_the_file() {
        let mut shell = FakeShell::new("");
        shell.files.insert(PathBuf::from("a.txt"), "alpha".to_owned());
        shell.open_path = Some(PathBuf::from("a.txt"));
        let mut ctrl = DocumentController::new();
        ctrl.request_open(&mut shell);

        assert!(ctrl.request_save(&mut shell));
        assert_eq!(shell.writes, 1);
        assert!(shell.prompts.is_empty());
    }

    #[test]
    fn status_text_is_one_based() {
        assert_eq!(format_status(1, 1), "Line: 1, Column: 1");
        assert_eq!(format_status(12, 40), "Line: 12, Column: 40");
    }

    #[test]
    fn zoom_steps_by_one_point() {
        assert_eq!(zoom_step(14, 120), Some(15));
        assert_eq!(zoom_step(14, -120), Some(13));
    }

    #[test]
    fn zoom_clamps_at_both_ends() {
        assert_eq!(zoom_step(MAX_FONT_PT, 120), None);
        assert_eq!(zoom_step(MIN_FONT_PT, -120), None);
        assert_eq!(zoom_step(MAX_FONT_PT - 1, 120), Some(MAX_FONT_PT));
        assert_eq!(zoom_step(MIN_FONT_PT + 1, -120), Some(MIN_FONT_PT));
    }
}
