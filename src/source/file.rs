use super::{LineSource, Lines, ReadLines};
use crate::error::{Result, SecdefError};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// A secdef file on local disk
///
/// With the `compression` feature, paths ending in `.zst` or `.gz` are
/// decompressed while reading.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileSource { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn codec(&self) -> Option<Codec> {
        match self.path.extension()?.to_str()? {
            "zst" => Some(Codec::Zstd),
            "gz" => Some(Codec::Gzip),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Codec {
    Zstd,
    Gzip,
}

impl LineSource for FileSource {
    fn name(&self) -> String {
        self.path.display().to_string()
    }

    fn open(&self) -> Result<Lines<'_>> {
        let file =
            File::open(&self.path).map_err(|e| SecdefError::source_unavailable(self.name(), e))?;

        if let Some(codec) = self.codec() {
            return open_compressed(self, file, codec);
        }

        Ok(Box::new(ReadLines::new(BufReader::new(file))))
    }
}

#[cfg(feature = "compression")]
fn open_compressed<'a>(source: &FileSource, file: File, codec: Codec) -> Result<Lines<'a>> {
    match codec {
        Codec::Zstd => {
            let decoder = zstd::stream::read::Decoder::new(file)
                .map_err(|e| SecdefError::source_unavailable(source.name(), e))?;
            Ok(Box::new(ReadLines::new(BufReader::new(decoder))))
        }
        // Multi-member so concatenated gzip files read through to the end
        Codec::Gzip => {
            let decoder = flate2::read::MultiGzDecoder::new(file);
            Ok(Box::new(ReadLines::new(BufReader::new(decoder))))
        }
    }
}

#[cfg(not(feature = "compression"))]
fn open_compressed<'a>(source: &FileSource, _file: File, codec: Codec) -> Result<Lines<'a>> {
    Err(SecdefError::source_unavailable(
        source.name(),
        format!("{:?} input requires the `compression` feature", codec),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_is_unavailable() {
        let source = FileSource::new("/nonexistent/secdef.dat");
        let err = source.open().err().unwrap();
        assert!(matches!(err, SecdefError::SourceUnavailable { .. }));
        assert!(err.is_source_failure());
    }

    #[test]
    fn test_reads_file_lines() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "167=FUT\x01462=14\x01\n167=OOF\x01\n").unwrap();

        let source = FileSource::new(file.path());
        let lines: Vec<String> = source.open().unwrap().map(|l| l.unwrap()).collect();
        assert_eq!(lines, vec!["167=FUT\x01462=14\x01", "167=OOF\x01"]);

        // Reopening starts from the top again
        assert_eq!(source.open().unwrap().count(), 2);
    }

    #[cfg(feature = "compression")]
    #[test]
    fn test_reads_zstd_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secdef.dat.zst");
        let compressed = zstd::encode_all(&b"167=FUT\x01\n167=IRS\x01\n"[..], 3).unwrap();
        std::fs::write(&path, compressed).unwrap();

        let lines: Vec<String> = FileSource::new(&path)
            .open()
            .unwrap()
            .map(|l| l.unwrap())
            .collect();
        assert_eq!(lines, vec!["167=FUT\x01", "167=IRS\x01"]);
    }

    #[cfg(feature = "compression")]
    #[test]
    fn test_reads_gzip_file() {
        use flate2::write::GzEncoder;
        use flate2::Compression;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secdef.dat.gz");
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"167=FUT\x01462=14\x01\n167=OOF\x01\n").unwrap();
        std::fs::write(&path, encoder.finish().unwrap()).unwrap();

        let lines: Vec<String> = FileSource::new(&path)
            .open()
            .unwrap()
            .map(|l| l.unwrap())
            .collect();
        assert_eq!(lines, vec!["167=FUT\x01462=14\x01", "167=OOF\x01"]);
    }

    #[test]
    fn test_codec_from_extension() {
        assert_eq!(FileSource::new("secdef.dat.gz").codec(), Some(Codec::Gzip));
        assert_eq!(FileSource::new("secdef.dat.zst").codec(), Some(Codec::Zstd));
        assert_eq!(FileSource::new("secdef.dat").codec(), None);
    }

    #[cfg(not(feature = "compression"))]
    #[test]
    fn test_gzip_without_feature_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secdef.dat.gz");
        std::fs::write(&path, b"ignored").unwrap();

        let err = FileSource::new(&path).open().err().unwrap();
        assert!(matches!(err, SecdefError::SourceUnavailable { .. }));
    }

    #[cfg(not(feature = "compression"))]
    #[test]
    fn test_zstd_without_feature_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secdef.dat.zst");
        std::fs::write(&path, b"ignored").unwrap();

        let err = FileSource::new(&path).open().err().unwrap();
        assert!(matches!(err, SecdefError::SourceUnavailable { .. }));
    }
}
