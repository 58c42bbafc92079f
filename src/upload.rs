use std::path::Path;

/// File extensions the intake accepts, matching what the analysis workflow
/// understands.
pub const ALLOWED_EXTENSIONS: &[&str] = &["txt", "csv", "drf"];

/// A file read from disk and ready for submission: original filename, raw
/// bytes, and the MIME type declared alongside them. The content is an
/// opaque blob — nothing here parses DRF data.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("unsupported file type '{0}' (expected txt, csv, or drf)")]
    UnsupportedExtension(String),
    #[error("failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Read a file for submission, enforcing the extension allow-list.
///
/// The extension check runs before any I/O so an unsupported path never
/// touches the filesystem.
pub fn read_upload(path: &Path) -> Result<UploadedFile, UploadError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();
    if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(UploadError::UnsupportedExtension(extension));
    }

    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload")
        .to_string();
    let bytes = std::fs::read(path).map_err(|source| UploadError::Io {
        path: path.display().to_string(),
        source,
    })?;

    Ok(UploadedFile {
        name,
        bytes,
        mime_type: mime_for_extension(&extension).to_string(),
    })
}

/// Declared MIME type per allowed extension. DRF files are an opaque binary
/// format as far as this tool is concerned.
fn mime_for_extension(extension: &str) -> &'static str {
    match extension {
        "txt" => "text/plain",
        "csv" => "text/csv",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn reads_allowed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("race1.drf");
        std::fs::write(&path, b"raw drf bytes").unwrap();

        let upload = read_upload(&path).unwrap();
        assert_eq!(upload.name, "race1.drf");
        assert_eq!(upload.bytes, b"raw drf bytes");
        assert_eq!(upload.mime_type, "application/octet-stream");
    }

    #[test]
    fn extension_check_is_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("RACE1.DRF");
        std::fs::write(&path, b"x").unwrap();
        assert!(read_upload(&path).is_ok());
    }

    #[test]
    fn rejects_unsupported_extension_before_reading() {
        // Path doesn't exist — the error must be about the extension, not I/O.
        let err = read_upload(Path::new("/nonexistent/report.pdf")).unwrap_err();
        assert!(matches!(err, UploadError::UnsupportedExtension(ext) if ext == "pdf"));
    }

    #[test]
    fn rejects_missing_extension() {
        let err = read_upload(Path::new("/nonexistent/README")).unwrap_err();
        assert!(matches!(err, UploadError::UnsupportedExtension(ext) if ext.is_empty()));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = read_upload(Path::new("/nonexistent/race.csv")).unwrap_err();
        assert!(matches!(err, UploadError::Io { .. }));
    }

    #[test]
    fn mime_types_per_extension() {
        assert_eq!(mime_for_extension("txt"), "text/plain");
        assert_eq!(mime_for_extension("csv"), "text/csv");
        assert_eq!(mime_for_extension("drf"), "application/octet-stream");
    }
}
