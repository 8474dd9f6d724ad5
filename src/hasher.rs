use std::fs::{self, File};
use std::io;
use std::path::Path;

use sha2::{Digest, Sha256};

/// True when `path` already holds exactly `rendered`.
///
/// A size mismatch short-circuits; otherwise the file is streamed through
/// SHA-256 and compared with the digest of the rendered document.
#[must_use]
pub fn is_unchanged(path: &Path, rendered: &str) -> bool {
    match fs::metadata(path) {
        Ok(meta) if meta.is_file() && meta.len() == rendered.len() as u64 => {}
        _ => return false,
    }
    match file_digest(path) {
        Ok(existing) => existing == Sha256::digest(rendered.as_bytes()),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "could not hash existing output");
            false
        }
    }
}

fn file_digest(path: &Path) -> io::Result<sha2::digest::Output<Sha256>> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher)?;
    Ok(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn identical_content_is_unchanged() {
        let mut tmp = NamedTempFile::new().unwrap();
        writeln!(tmp, "{{\"chapters\": []}}").unwrap();
        assert!(is_unchanged(tmp.path(), "{\"chapters\": []}\n"));
    }

    #[test]
    fn same_length_different_content_is_changed() {
        let mut tmp = NamedTempFile::new().unwrap();
        write!(tmp, "verse-one").unwrap();
        assert!(!is_unchanged(tmp.path(), "verse-two"));
    }

    #[test]
    fn different_length_is_changed() {
        let mut tmp = NamedTempFile::new().unwrap();
        write!(tmp, "same").unwrap();
        assert!(!is_unchanged(tmp.path(), "same\n"));
    }

    #[test]
    fn missing_or_directory_output_is_changed() {
        let dir = TempDir::new().unwrap();
        assert!(!is_unchanged(&dir.path().join("out.json"), ""));
        assert!(!is_unchanged(dir.path(), ""));
    }

    #[test]
    fn empty_file_matches_empty_document() {
        let tmp = NamedTempFile::new().unwrap();
        assert!(is_unchanged(tmp.path(), ""));
    }
}
