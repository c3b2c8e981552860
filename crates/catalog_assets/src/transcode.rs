//! Image transcoder.
//!
//! Every uploaded image is decoded and re-encoded into one canonical lossy
//! format before it reaches the store. Re-encoding also drops EXIF/XMP
//! metadata.

use catalog_error::{TranscodeError, TranscodeErrorKind};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageReader};
use std::io::Cursor;
use std::sync::Arc;

/// MIME type of every transcoded asset.
pub const CANONICAL_CONTENT_TYPE: &str = "image/jpeg";

/// File extension matching [`CANONICAL_CONTENT_TYPE`].
pub const CANONICAL_EXTENSION: &str = "jpg";

/// Default encoder quality (1-100).
pub const DEFAULT_QUALITY: u8 = 40;

/// Default decode guard in pixels.
pub const DEFAULT_MAX_PIXELS: u64 = 40_000_000;

/// Re-encodes arbitrary input images as JPEG at a fixed quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageTranscoder {
    quality: u8,
    max_pixels: u64,
}

impl Default for ImageTranscoder {
    fn default() -> Self {
        Self::new(DEFAULT_QUALITY, DEFAULT_MAX_PIXELS)
    }
}

impl ImageTranscoder {
    /// Create a transcoder. Quality is clamped to 1-100.
    pub fn new(quality: u8, max_pixels: u64) -> Self {
        Self {
            quality: quality.clamp(1, 100),
            max_pixels,
        }
    }

    /// Encoder quality in use.
    pub fn quality(&self) -> u8 {
        self.quality
    }

    /// MIME type of the output.
    pub fn content_type(&self) -> &'static str {
        CANONICAL_CONTENT_TYPE
    }

    /// File extension of the output.
    pub fn extension(&self) -> &'static str {
        CANONICAL_EXTENSION
    }

    /// Transcode `raw` into the canonical format.
    ///
    /// # Errors
    ///
    /// - `Decode` if `raw` is not an image in a supported format
    /// - `ResolutionTooLarge` if it has more pixels than allowed
    /// - `Encode` if the encoder fails
    pub fn transcode(&self, raw: &[u8]) -> Result<Vec<u8>, TranscodeError> {
        let (width, height) = reader(raw)?
            .into_dimensions()
            .map_err(|e| TranscodeError::new(TranscodeErrorKind::Decode(e.to_string())))?;

        if u64::from(width) * u64::from(height) > self.max_pixels {
            return Err(TranscodeError::new(
                TranscodeErrorKind::ResolutionTooLarge { width, height },
            ));
        }

        let img = reader(raw)?
            .decode()
            .map_err(|e| TranscodeError::new(TranscodeErrorKind::Decode(e.to_string())))?;

        self.encode(&img)
    }

    /// Transcode on the blocking thread pool so async callers are never stalled.
    pub async fn transcode_blocking(&self, raw: Arc<[u8]>) -> Result<Vec<u8>, TranscodeError> {
        let transcoder = *self;
        tokio::task::spawn_blocking(move || transcoder.transcode(&raw))
            .await
            .map_err(|e| TranscodeError::new(TranscodeErrorKind::Task(e.to_string())))?
    }

    fn encode(&self, img: &DynamicImage) -> Result<Vec<u8>, TranscodeError> {
        let mut buf = Cursor::new(Vec::new());
        let encoder = JpegEncoder::new_with_quality(&mut buf, self.quality);
        // JPEG has no alpha channel
        img.to_rgb8()
            .write_with_encoder(encoder)
            .map_err(|e| TranscodeError::new(TranscodeErrorKind::Encode(e.to_string())))?;

        Ok(buf.into_inner())
    }
}

fn reader(raw: &[u8]) -> Result<ImageReader<Cursor<&[u8]>>, TranscodeError> {
    ImageReader::new(Cursor::new(raw))
        .with_guessed_format()
        .map_err(|e| TranscodeError::new(TranscodeErrorKind::Decode(e.to_string())))
}
