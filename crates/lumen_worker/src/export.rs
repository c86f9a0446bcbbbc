use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use lumen_core::ExportEntry;
use lumen_logging::{lumen_info, lumen_warn};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::persist::{AtomicFileWriter, PersistError};
use crate::remover::encode_png;

pub const ARCHIVE_FILENAME: &str = "images.zip";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub written: usize,
    pub skipped: usize,
    pub archive_path: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("persist error: {0}")]
    Persist(#[from] PersistError),
}

/// Archive entry name for the `index`-th (0-based) image.
pub fn entry_name(index: usize) -> String {
    format!("image-{}.png", index + 1)
}

/// Builds the archive in memory. Entry `n` keeps its position number even
/// when an earlier entry could not be read.
pub fn build_zip_archive(entries: &[ExportEntry]) -> Result<(Vec<u8>, usize), ExportError> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

    let mut skipped = 0;
    for (index, entry) in entries.iter().enumerate() {
        let png = match load_as_png(entry.preferred_source()) {
            Ok(png) => png,
            Err(reason) => {
                lumen_warn!(
                    "Leaving {} out of the archive: {}",
                    entry.preferred_source(),
                    reason
                );
                skipped += 1;
                continue;
            }
        };
        let options =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        zip.start_file(entry_name(index), options)?;
        zip.write_all(&png)?;
    }

    let cursor = zip.finish()?;
    Ok((cursor.into_inner(), skipped))
}

/// Writes `images.zip` into `output_dir` atomically.
pub fn export_zip(entries: &[ExportEntry], output_dir: &Path) -> Result<ExportSummary, ExportError> {
    let (bytes, skipped) = build_zip_archive(entries)?;
    let writer = AtomicFileWriter::new(output_dir.to_path_buf());
    let archive_path = writer.write(ARCHIVE_FILENAME, &bytes)?;
    let written = entries.len() - skipped;
    lumen_info!("Wrote {} image(s) to {:?}", written, archive_path);
    Ok(ExportSummary {
        written,
        skipped,
        archive_path,
    })
}

fn load_as_png(source: &str) -> Result<Vec<u8>, String> {
    let image = image::open(source).map_err(|err| format!("cannot read image: {err}"))?;
    encode_png(image)
}
