// ── Encoding I/O gateway ──────────────────────────────────────────────────────
//
// All document bytes enter and leave the process here.  The encoding is
// fixed UTF-8: reads strip a leading BOM and substitute invalid sequences
// with U+FFFD, writes emit the content bytes exactly (no BOM).  Failures
// return `NotepadError::Io`; its Display text is what the error box shows.

use std::fs;
use std::path::Path;

use crate::error::Result;

/// UTF-8 byte-order mark.  Dropped on read, never written.
const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Read the full content of `path` as UTF-8 text.
///
/// Invalid sequences decode to U+FFFD instead of failing the open.
pub(crate) fn read_document(path: &Path) -> Result<String> {
    let bytes = fs::read(path)?;
    Ok(decode_utf8(&bytes))
}

/// Write `content` to `path`, replacing any existing file.
pub(crate) fn write_document(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content.as_bytes())?;
    Ok(())
}

fn decode_utf8(bytes: &[u8]) -> String {
    let body = bytes.strip_prefix(&UTF8_BOM).unwrap_or(bytes);
    String::from_utf8_lossy(body).into_owned()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NotepadError;

    #[test]
    fn round_trip_preserves_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.txt");
        write_document(&path, "line1\r\nline2").unwrap();
        assert_eq!(read_document(&path).unwrap(), "line1\r\nline2");
    }

    #[test]
    fn read_strips_utf8_bom() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bom.txt");
        std::fs::write(&path, b"\xEF\xBB\xBFhello").unwrap();
        assert_eq!(read_document(&path).unwrap(), "hello");
    }

    #[test]
    fn read_substitutes_invalid_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.txt");
        std::fs::write(&path, b"ok\xFFok").unwrap();
        assert_eq!(read_document(&path).unwrap(), "ok\u{FFFD}ok");
    }

    #[test]
    fn write_emits_no_bom() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plain.txt");
        write_document(&path, "text").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"text");
    }

    #[test]
    fn missing_file_reports_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_document(&dir.path().join("absent.txt")).unwrap_err();
        assert!(matches!(err, NotepadError::Io(_)));
    }

    #[test]
    fn write_replaces_existing_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.txt");
        write_document(&path, "first version, quite long").unwrap();
        write_document(&path, "second").unwrap();
        assert_eq!(read_document(&path).unwrap(), "second");
    }
}
