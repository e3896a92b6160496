// アーカイブ - 成功アイテムを1つのZIPにまとめる

use crate::core::{ProcessingError, ProcessingResult};
use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// CLIが使うデフォルトのアーカイブ名
pub const DEFAULT_ARCHIVE_NAME: &str = "processed_images.zip";

/// メモリ上でZIPを組み立てる
///
/// エントリは追加した順に格納される。
pub struct ZipArchiveBuilder {
    writer: ZipWriter<Cursor<Vec<u8>>>,
    options: FileOptions,
    entries: usize,
}

impl Default for ZipArchiveBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ZipArchiveBuilder {
    pub fn new() -> Self {
        Self {
            writer: ZipWriter::new(Cursor::new(Vec::new())),
            options: FileOptions::default().compression_method(CompressionMethod::Deflated),
            entries: 0,
        }
    }

    /// エントリを追加
    pub fn add_entry(&mut self, name: &str, data: &[u8]) -> ProcessingResult<()> {
        self.writer
            .start_file(name, self.options)
            .map_err(|e| ProcessingError::archive(anyhow::Error::new(e).context(name.to_string())))?;
        self.writer
            .write_all(data)
            .map_err(|e| ProcessingError::archive(anyhow::Error::new(e).context(name.to_string())))?;
        self.entries += 1;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries == 0
    }

    /// ZIPを確定してバイト列を返す
    pub fn finish(mut self) -> ProcessingResult<Vec<u8>> {
        let cursor = self
            .writer
            .finish()
            .map_err(|e| ProcessingError::archive(e.into()))?;
        Ok(cursor.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use zip::ZipArchive;

    #[test]
    fn test_archive_preserves_insertion_order() {
        let mut builder = ZipArchiveBuilder::new();
        builder.add_entry("b.jpg", b"second").unwrap();
        builder.add_entry("a.jpg", b"first").unwrap();
        builder.add_entry("c.png", &[0u8; 1024]).unwrap();
        assert_eq!(builder.len(), 3);

        let bytes = builder.finish().unwrap();
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 3);

        let names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect();
        assert_eq!(names, vec!["b.jpg", "a.jpg", "c.png"]);

        let mut contents = Vec::new();
        archive
            .by_name("a.jpg")
            .unwrap()
            .read_to_end(&mut contents)
            .unwrap();
        assert_eq!(contents, b"first");
    }

    #[test]
    fn test_empty_archive() {
        let builder = ZipArchiveBuilder::new();
        assert!(builder.is_empty());

        let bytes = builder.finish().unwrap();
        let archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 0);
    }
}
