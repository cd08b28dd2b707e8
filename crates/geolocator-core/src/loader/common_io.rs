// crates/geolocator-core/src/loader/common_io.rs
use crate::error::{GeoError, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

#[cfg(feature = "compact")]
use flate2::read::GzDecoder;

/// `true` for `*.gz` paths.
pub fn is_gzip(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("gz"))
        .unwrap_or(false)
}

/// Opens a file, buffers it, and wraps it in a Gzip decoder for `*.gz` paths.
/// Returns a generic Reader so the caller doesn't care about the compression.
pub fn open_stream(path: &Path) -> Result<Box<dyn Read>> {
    let file = File::open(path).map_err(|e| {
        GeoError::NotFound(format!("Backup not found at {}: {}", path.display(), e))
    })?;

    let reader = BufReader::new(file);

    if !is_gzip(path) {
        return Ok(Box::new(reader));
    }

    #[cfg(feature = "compact")]
    {
        Ok(Box::new(GzDecoder::new(reader)))
    }

    #[cfg(not(feature = "compact"))]
    {
        Err(GeoError::InvalidData(format!(
            "{} is gzip-compressed; enable the `compact` feature",
            path.display()
        )))
    }
}

/// A download is needed if the file is missing, empty, or `force` is set.
pub fn needs_download(path: &Path, force: bool) -> bool {
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_file() => force || meta.len() == 0,
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_needs_download() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("backup.json");
        assert!(needs_download(&path, false));

        std::fs::File::create(&path).unwrap();
        assert!(needs_download(&path, false), "empty file must be re-fetched");

        std::fs::File::create(&path)
            .unwrap()
            .write_all(b"{}")
            .unwrap();
        assert!(!needs_download(&path, false));
        assert!(needs_download(&path, true));
    }

    #[test]
    fn test_open_missing_file() {
        let err = open_stream(Path::new("/definitely/not/here.json")).err().unwrap();
        assert!(matches!(err, GeoError::NotFound(_)));
    }

    #[test]
    fn test_is_gzip() {
        assert!(is_gzip(Path::new("locations.json.gz")));
        assert!(!is_gzip(Path::new("locations.json")));
    }
}
