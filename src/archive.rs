//! ZIP assembly of rendered label documents.

use std::io::{Cursor, Seek, Write};

use thiserror::Error;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use crate::label::RenderedDocument;

/// Deflate at maximum compression.
const COMPRESSION_LEVEL: i64 = 9;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("failed to write archive entry: {0}")]
    Io(#[from] std::io::Error),
    #[error("archive has no entries")]
    Empty,
}

/// Writes named entries into a ZIP archive.
///
/// `finish` consumes the writer, so an archive is finalized at most once and
/// never receives entries afterwards. Dropping an unfinished writer releases
/// the underlying sink without producing a valid archive.
pub struct ArchiveWriter<W: Write + Seek> {
    zip: ZipWriter<W>,
    entries: Vec<String>,
}

impl ArchiveWriter<Cursor<Vec<u8>>> {
    pub fn in_memory() -> Self {
        Self::new(Cursor::new(Vec::new()))
    }
}

impl<W: Write + Seek> ArchiveWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            zip: ZipWriter::new(sink),
            entries: Vec::new(),
        }
    }

    fn options() -> SimpleFileOptions {
        // A fixed timestamp keeps identical requests byte-identical.
        SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .compression_level(Some(COMPRESSION_LEVEL))
            .last_modified_time(DateTime::default())
    }

    pub fn append(&mut self, name: &str, bytes: &[u8]) -> Result<(), ArchiveError> {
        self.zip.start_file(name, Self::options())?;
        self.zip.write_all(bytes)?;
        self.entries.push(name.to_string());
        Ok(())
    }

    pub fn append_document(&mut self, document: &RenderedDocument) -> Result<(), ArchiveError> {
        self.append(&document.name, &document.pdf)
    }

    /// Entry names appended so far, in order.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Write the central directory and hand back the sink.
    pub fn finish(self) -> Result<W, ArchiveError> {
        if self.entries.is_empty() {
            return Err(ArchiveError::Empty);
        }
        Ok(self.zip.finish()?)
    }
}

/// Pack `documents` into an in-memory archive, preserving their order.
pub fn bundle(documents: &[RenderedDocument]) -> Result<Vec<u8>, ArchiveError> {
    let mut archive = ArchiveWriter::in_memory();
    for document in documents {
        archive.append_document(document)?;
    }
    Ok(archive.finish()?.into_inner())
}
