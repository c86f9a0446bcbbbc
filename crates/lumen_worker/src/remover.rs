//! Sequential background removal over a batch of images.
use std::io::Cursor;
use std::path::PathBuf;

use image::{DynamicImage, ImageFormat};
use lumen_logging::{lumen_debug, lumen_warn};

use crate::filename::processed_filename;
use crate::matte::{apply_alpha_matte, MatteModel};
use crate::persist::AtomicFileWriter;

/// Progress for one batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageEvent {
    /// An image was processed and written to `output`.
    Processed { index: usize, output: String },
    /// An image failed; the batch continues with the next one.
    Skipped { index: usize, reason: String },
    /// Every image has been attempted.
    Finished { processed: usize, skipped: usize },
}

pub trait ImageEventSink: Send + Sync {
    fn on_event(&self, event: ImageEvent);
}

impl<F> ImageEventSink for F
where
    F: Fn(ImageEvent) + Send + Sync,
{
    fn on_event(&self, event: ImageEvent) {
        self(event)
    }
}

pub struct BackgroundRemover<M> {
    model: M,
    writer: AtomicFileWriter,
}

impl<M: MatteModel> BackgroundRemover<M> {
    pub fn new(model: M, output_dir: PathBuf) -> Self {
        Self {
            model,
            writer: AtomicFileWriter::new(output_dir),
        }
    }

    /// Processes `sources` one at a time, in order. Each image is loaded,
    /// matted and encoded before the next one starts.
    pub fn process(&self, sources: &[String], sink: &dyn ImageEventSink) {
        let mut processed = 0;
        let mut skipped = 0;
        for (index, source) in sources.iter().enumerate() {
            match self.process_one(source) {
                Ok(output) => {
                    lumen_debug!("Removed background of {} -> {:?}", source, output);
                    processed += 1;
                    sink.on_event(ImageEvent::Processed {
                        index,
                        output: output.to_string_lossy().into_owned(),
                    });
                }
                Err(reason) => {
                    lumen_warn!("Skipping {}: {}", source, reason);
                    skipped += 1;
                    sink.on_event(ImageEvent::Skipped { index, reason });
                }
            }
        }
        sink.on_event(ImageEvent::Finished { processed, skipped });
    }

    fn process_one(&self, source: &str) -> Result<PathBuf, String> {
        let mut image = image::open(source)
            .map_err(|err| format!("cannot read image: {err}"))?
            .to_rgba8();
        let matte = self.model.predict(&image).map_err(|err| err.to_string())?;
        apply_alpha_matte(&mut image, &matte);

        let bytes = encode_png(DynamicImage::ImageRgba8(image))?;
        self.writer
            .write(&processed_filename(source), &bytes)
            .map_err(|err| err.to_string())
    }
}

pub(crate) fn encode_png(image: DynamicImage) -> Result<Vec<u8>, String> {
    let mut buffer = Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, ImageFormat::Png)
        .map_err(|err| format!("cannot encode png: {err}"))?;
    Ok(buffer.into_inner())
}
