//! Input staging: normalise a user-supplied path or raw bytes to a local
//! PDF file inside a request-scoped working directory.
//!
//! ## Why a temp directory per request?
//!
//! pdfium requires a file-system path — it cannot stream from a byte buffer.
//! Staging uploaded bytes into a `TempDir` gives us a path pdfium can open
//! while guaranteeing cleanup on every exit path (success, failure, panic):
//! the directory is removed when `ResolvedInput` is dropped. Each request
//! owns its directory exclusively; nothing is shared across requests.
//!
//! We validate the PDF magic bytes (`%PDF`) before returning so callers get
//! a meaningful error rather than a pdfium crash.

use crate::error::Pdf2DocxError;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::debug;

/// The resolved input — either a local path or bytes staged to a temp file.
pub enum ResolvedInput {
    /// Input was already a local file.
    Local(PathBuf),
    /// Input arrived as raw bytes; written to a request-scoped directory.
    /// The `TempDir` is kept alive to prevent cleanup until processing completes.
    Staged { path: PathBuf, _workdir: TempDir },
}

impl ResolvedInput {
    /// Get the path to the PDF file regardless of how it was resolved.
    pub fn path(&self) -> &Path {
        match self {
            ResolvedInput::Local(p) => p,
            ResolvedInput::Staged { path, .. } => path,
        }
    }
}

/// Resolve a local file path, validating existence and PDF magic bytes.
pub fn resolve_local(path_str: &str) -> Result<ResolvedInput, Pdf2DocxError> {
    let path = PathBuf::from(path_str);

    if !path.exists() {
        return Err(Pdf2DocxError::FileNotFound { path });
    }

    // Check read permission by attempting to open
    match std::fs::File::open(&path) {
        Ok(mut f) => {
            use std::io::Read;
            let mut magic = [0u8; 4];
            if f.read_exact(&mut magic).is_ok() && &magic != b"%PDF" {
                return Err(Pdf2DocxError::NotAPdf { path, magic });
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(Pdf2DocxError::PermissionDenied { path });
        }
        Err(_) => {
            return Err(Pdf2DocxError::FileNotFound { path });
        }
    }

    debug!("Resolved local PDF: {}", path.display());
    Ok(ResolvedInput::Local(path))
}

/// Stage raw PDF bytes into a fresh working directory.
pub fn stage_bytes(bytes: &[u8]) -> Result<ResolvedInput, Pdf2DocxError> {
    if bytes.len() < 4 || &bytes[..4] != b"%PDF" {
        let mut magic = [0u8; 4];
        let n = bytes.len().min(4);
        magic[..n].copy_from_slice(&bytes[..n]);
        return Err(Pdf2DocxError::NotAPdf {
            path: PathBuf::from("<uploaded bytes>"),
            magic,
        });
    }

    let workdir = TempDir::new().map_err(|e| Pdf2DocxError::Internal(e.to_string()))?;
    let path = workdir.path().join("input.pdf");
    std::fs::write(&path, bytes).map_err(|e| {
        Pdf2DocxError::Internal(format!("Failed to write staged PDF: {e}"))
    })?;

    debug!("Staged {} bytes to {}", bytes.len(), path.display());
    Ok(ResolvedInput::Staged {
        path,
        _workdir: workdir,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn resolve_missing_file() {
        let result = resolve_local("/definitely/not/a/real/file.pdf");
        assert!(matches!(result, Err(Pdf2DocxError::FileNotFound { .. })));
    }

    #[test]
    fn resolve_rejects_non_pdf() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"hello, this is not a pdf").unwrap();
        let result = resolve_local(f.path().to_str().unwrap());
        assert!(matches!(result, Err(Pdf2DocxError::NotAPdf { .. })));
    }

    #[test]
    fn resolve_accepts_pdf_magic() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"%PDF-1.7 rest of file").unwrap();
        let resolved = resolve_local(f.path().to_str().unwrap()).unwrap();
        assert_eq!(resolved.path(), f.path());
    }

    #[test]
    fn stage_rejects_non_pdf_bytes() {
        let result = stage_bytes(b"GIF89a");
        assert!(matches!(result, Err(Pdf2DocxError::NotAPdf { .. })));
    }

    #[test]
    fn stage_rejects_short_input() {
        let result = stage_bytes(b"%P");
        assert!(matches!(result, Err(Pdf2DocxError::NotAPdf { .. })));
    }

    #[test]
    fn staged_workdir_removed_on_drop() {
        let resolved = stage_bytes(b"%PDF-1.4 fake body").unwrap();
        let dir = resolved.path().parent().unwrap().to_path_buf();
        assert!(dir.exists());
        assert!(resolved.path().exists());
        drop(resolved);
        assert!(!dir.exists(), "workdir must be removed on drop");
    }
}
