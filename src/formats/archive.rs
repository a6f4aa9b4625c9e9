//! Zip packages and tar archives built in memory.

use crate::error::AppResult;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// In-memory zip writer used by archives and every zip-based document format.
pub struct ZipPackage {
    writer: ZipWriter<Cursor<Vec<u8>>>,
}

impl Default for ZipPackage {
    fn default() -> Self {
        Self::new()
    }
}

impl ZipPackage {
    pub fn new() -> Self {
        Self {
            writer: ZipWriter::new(Cursor::new(Vec::new())),
        }
    }

    /// Add an uncompressed entry. Package `mimetype` entries must be stored.
    pub fn stored(&mut self, path: &str, bytes: &[u8]) -> AppResult<()> {
        self.add(path, bytes, CompressionMethod::Stored)
    }

    pub fn deflated(&mut self, path: &str, bytes: &[u8]) -> AppResult<()> {
        self.add(path, bytes, CompressionMethod::Deflated)
    }

    pub fn directory(&mut self, path: &str) -> AppResult<()> {
        self.writer
            .add_directory(path, SimpleFileOptions::default())?;
        Ok(())
    }

    fn add(&mut self, path: &str, bytes: &[u8], method: CompressionMethod) -> AppResult<()> {
        let options = SimpleFileOptions::default()
            .compression_method(method)
            .unix_permissions(0o644);
        self.writer.start_file(path, options)?;
        self.writer.write_all(bytes)?;
        Ok(())
    }

    pub fn finish(self) -> AppResult<Vec<u8>> {
        Ok(self.writer.finish()?.into_inner())
    }
}

/// Tar archive of `entries`, gzip-compressed when `gzip` is set.
///
/// Every entry gets mode 0644 and the given modification time.
pub fn tar(entries: &[(String, Vec<u8>)], gzip: bool, mtime: u64) -> AppResult<Vec<u8>> {
    let mut builder = tar::Builder::new(Vec::new());
    for (path, bytes) in entries {
        let mut header = tar::Header::new_gnu();
        header.set_size(bytes.len() as u64);
        header.set_mode(0o644);
        header.set_mtime(mtime);
        builder.append_data(&mut header, path, bytes.as_slice())?;
    }
    let archive = builder.into_inner()?;

    if !gzip {
        return Ok(archive);
    }
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&archive)?;
    Ok(encoder.finish()?)
}
