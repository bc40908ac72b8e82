//! Image processor - decode, bound and re-encode raster images

use async_trait::async_trait;
use bytes::Bytes;
use imgpress_core::constants::{MAX_QUALITY, MIN_QUALITY};
use imgpress_core::{File, ResolvedOptions};
use tokio::io::AsyncSeekExt;

use crate::compression::{ImageCompressor, OutputFormat};
use crate::image::resize::downscale;
use crate::traits::{Processor, ProcessorError};

const SUPPORTED_CONTENT_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/png", "image/webp"];

/// Re-encodes JPEG, PNG and WebP input into the requested format.
///
/// Decoding and encoding drop any embedded metadata (EXIF, ICC profiles, text chunks).
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageProcessor;

impl ImageProcessor {
    pub fn new() -> Self {
        Self
    }
}

/// Lower-cased MIME type without parameters, e.g. `image/png; q=1` -> `image/png`.
fn essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

fn validate_quality(quality: u32) -> Result<u8, ProcessorError> {
    if !(MIN_QUALITY..=MAX_QUALITY).contains(&quality) {
        return Err(ProcessorError::InvalidOptions(format!(
            "quality must be between {} and {}, got {}",
            MIN_QUALITY, MAX_QUALITY, quality
        )));
    }
    Ok(quality as u8)
}

#[async_trait]
impl Processor for ImageProcessor {
    fn name(&self) -> &'static str {
        "image"
    }

    fn supports(&self, content_type: &str) -> bool {
        SUPPORTED_CONTENT_TYPES.contains(&essence(content_type).as_str())
    }

    async fn process(
        &self,
        input: &mut File,
        opts: &ResolvedOptions,
    ) -> Result<File, ProcessorError> {
        let format = OutputFormat::parse(&opts.format)?;
        let quality = validate_quality(opts.quality)?;

        let data = input.read_to_vec().await?;
        input.content.rewind().await?;

        if data.is_empty() {
            return Err(ProcessorError::Decode("empty input".to_string()));
        }

        let original_size = data.len();
        let (max_width, max_height) = (opts.max_width, opts.max_height);
        let start = std::time::Instant::now();

        let encoded = tokio::task::spawn_blocking(move || -> Result<Bytes, ProcessorError> {
            let img = image::load_from_memory(&data)
                .map_err(|e| ProcessorError::Decode(e.to_string()))?;
            let img = downscale(img, max_width, max_height);
            ImageCompressor::compress(&img, format, quality)
        })
        .await
        .map_err(|e| ProcessorError::Internal(format!("image task failed: {}", e)))??;

        tracing::debug!(
            format = format.extension(),
            quality = quality,
            original_size = original_size,
            compressed_size = encoded.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Image re-encoded"
        );

        Ok(File::from_bytes(Vec::from(encoded), format.to_mime_type()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, GenericImageView, ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;
    use tokio::io::AsyncReadExt;

    fn png_file(width: u32, height: u32) -> File {
        let img = DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        }));
        let mut buffer = Vec::new();
        img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
            .unwrap();
        File::from_bytes(buffer, "image/png")
    }

    fn opts(format: &str, quality: u32, max_width: u32, max_height: u32) -> ResolvedOptions {
        ResolvedOptions {
            format: format.to_string(),
            quality,
            max_width,
            max_height,
        }
    }

    #[test]
    fn test_supports_matches_essence() {
        let processor = ImageProcessor::new();
        assert!(processor.supports("image/jpeg"));
        assert!(processor.supports("image/jpg"));
        assert!(processor.supports("IMAGE/PNG"));
        assert!(processor.supports("image/webp; charset=binary"));
        assert!(!processor.supports("image/gif"));
        assert!(!processor.supports("text/plain"));
        assert!(!processor.supports(""));
    }

    #[tokio::test]
    async fn test_png_to_jpeg() {
        let mut input = png_file(40, 30);
        let mut output = ImageProcessor
            .process(&mut input, &opts("jpeg", 80, 0, 0))
            .await
            .unwrap();

        assert_eq!(output.content_type, "image/jpeg");

        // returned stream starts at the beginning of the encoded data
        let mut data = Vec::new();
        output.content.read_to_end(&mut data).await.unwrap();
        assert_eq!(data.len() as u64, output.size);
        assert_eq!(&data[..2], &[0xFF, 0xD8]);
        assert_eq!(image::load_from_memory(&data).unwrap().dimensions(), (40, 30));
    }

    #[tokio::test]
    async fn test_input_is_left_at_start() {
        let mut input = png_file(8, 8);
        let original = input.read_to_vec().await.unwrap();

        ImageProcessor
            .process(&mut input, &opts("png", 80, 0, 0))
            .await
            .unwrap();

        let mut after = Vec::new();
        input.content.read_to_end(&mut after).await.unwrap();
        assert_eq!(after, original);
    }

    #[tokio::test]
    async fn test_output_is_bounded() {
        let mut input = png_file(40, 20);
        let mut output = ImageProcessor
            .process(&mut input, &opts("webp", 70, 10, 0))
            .await
            .unwrap();

        assert_eq!(output.content_type, "image/webp");
        let data = output.read_to_vec().await.unwrap();
        assert_eq!(image::load_from_memory(&data).unwrap().dimensions(), (10, 5));
    }

    #[tokio::test]
    async fn test_quality_out_of_range_is_input_fault() {
        for quality in [0, 101] {
            let mut input = png_file(4, 4);
            let err = ImageProcessor
                .process(&mut input, &opts("jpeg", quality, 0, 0))
                .await
                .unwrap_err();
            assert!(matches!(err, ProcessorError::InvalidOptions(_)));
            assert!(err.is_input_fault());
        }
    }

    #[tokio::test]
    async fn test_unknown_format_is_rejected() {
        let mut input = png_file(4, 4);
        let err = ImageProcessor
            .process(&mut input, &opts("gif", 80, 0, 0))
            .await
            .unwrap_err();
        assert!(matches!(err, ProcessorError::UnsupportedFormat(_)));
    }

    #[tokio::test]
    async fn test_undecodable_input() {
        let mut input = File::from_bytes(b"definitely not an image".to_vec(), "image/png");
        let err = ImageProcessor
            .process(&mut input, &opts("jpeg", 80, 0, 0))
            .await
            .unwrap_err();
        assert!(matches!(err, ProcessorError::Decode(_)));
        assert!(err.is_input_fault());

        let mut empty = File::from_bytes(Vec::new(), "image/png");
        let err = ImageProcessor
            .process(&mut empty, &opts("jpeg", 80, 0, 0))
            .await
            .unwrap_err();
        assert!(matches!(err, ProcessorError::Decode(_)));
    }
}
