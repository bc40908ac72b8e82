use bytes::Bytes;
use image::{DynamicImage, GenericImageView, ImageFormat};
use std::io::Cursor;

use crate::traits::ProcessorError;

/// Output format for compressed images
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Jpeg,
    Png,
    WebP,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Result<Self, ProcessorError> {
        match s.to_lowercase().as_str() {
            "jpeg" | "jpg" => Ok(OutputFormat::Jpeg),
            "png" => Ok(OutputFormat::Png),
            "webp" => Ok(OutputFormat::WebP),
            _ => Err(ProcessorError::UnsupportedFormat(s.to_string())),
        }
    }

    pub fn to_mime_type(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Png => "image/png",
            OutputFormat::WebP => "image/webp",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpeg",
            OutputFormat::Png => "png",
            OutputFormat::WebP => "webp",
        }
    }
}

/// Stateless encoders for the supported output formats
pub struct ImageCompressor;

impl ImageCompressor {
    /// Encode `img` as `format`. `quality` (1-100) is ignored for lossless PNG.
    pub fn compress(
        img: &DynamicImage,
        format: OutputFormat,
        quality: u8,
    ) -> Result<Bytes, ProcessorError> {
        match format {
            OutputFormat::Jpeg => Self::compress_jpeg(img, quality),
            OutputFormat::Png => Self::compress_png(img),
            OutputFormat::WebP => Self::compress_webp(img, quality),
        }
    }

    /// Compress to JPEG using mozjpeg
    fn compress_jpeg(img: &DynamicImage, quality: u8) -> Result<Bytes, ProcessorError> {
        let rgb_img = img.to_rgb8();
        let (width, height) = rgb_img.dimensions();

        let mut comp = mozjpeg::Compress::new(mozjpeg::ColorSpace::JCS_RGB);
        comp.set_size(width as usize, height as usize);
        comp.set_quality(quality as f32);
        comp.set_progressive_mode();
        comp.set_optimize_coding(true);

        let mut comp = comp
            .start_compress(Vec::new())
            .map_err(|e| ProcessorError::Encode(format!("jpeg: {}", e)))?;
        comp.write_scanlines(&rgb_img)
            .map_err(|e| ProcessorError::Encode(format!("jpeg: {}", e)))?;
        let jpeg_data = comp
            .finish()
            .map_err(|e| ProcessorError::Encode(format!("jpeg: {}", e)))?;

        Ok(Bytes::from(jpeg_data))
    }

    /// Compress to PNG
    fn compress_png(img: &DynamicImage) -> Result<Bytes, ProcessorError> {
        let mut buffer = Vec::new();
        let mut cursor = Cursor::new(&mut buffer);

        img.write_to(&mut cursor, ImageFormat::Png)
            .map_err(|e| ProcessorError::Encode(format!("png: {}", e)))?;

        Ok(Bytes::from(buffer))
    }

    /// Compress to lossy WebP
    fn compress_webp(img: &DynamicImage, quality: u8) -> Result<Bytes, ProcessorError> {
        let (width, height) = img.dimensions();

        let rgba_img = img.to_rgba8();

        let encoder = webp::Encoder::from_rgba(&rgba_img, width, height);
        let webp_data = encoder.encode(quality as f32);

        Ok(Bytes::copy_from_slice(&webp_data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn gradient(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x * 7 % 256) as u8, (y * 5 % 256) as u8, ((x + y) % 256) as u8])
        }))
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!(OutputFormat::parse("JPG").unwrap(), OutputFormat::Jpeg);
        assert_eq!(OutputFormat::parse("jpeg").unwrap(), OutputFormat::Jpeg);
        assert_eq!(OutputFormat::parse("png").unwrap(), OutputFormat::Png);
        assert_eq!(OutputFormat::parse("WebP").unwrap(), OutputFormat::WebP);
        assert!(matches!(
            OutputFormat::parse("avif"),
            Err(ProcessorError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_mime_type_and_extension() {
        assert_eq!(OutputFormat::Jpeg.to_mime_type(), "image/jpeg");
        assert_eq!(OutputFormat::Jpeg.extension(), "jpeg");
        assert_eq!(OutputFormat::WebP.to_mime_type(), "image/webp");
    }

    #[test]
    fn test_jpeg_output_has_soi_marker() {
        let data = ImageCompressor::compress(&gradient(32, 24), OutputFormat::Jpeg, 80).unwrap();
        assert_eq!(&data[..2], &[0xFF, 0xD8]);
        assert_eq!(
            image::guess_format(&data).unwrap(),
            ImageFormat::Jpeg
        );
    }

    #[test]
    fn test_png_output_decodes_to_same_dimensions() {
        let data = ImageCompressor::compress(&gradient(17, 9), OutputFormat::Png, 80).unwrap();
        let decoded = image::load_from_memory(&data).unwrap();
        assert_eq!(decoded.dimensions(), (17, 9));
    }

    #[test]
    fn test_webp_output_is_riff_container() {
        let data = ImageCompressor::compress(&gradient(16, 16), OutputFormat::WebP, 75).unwrap();
        assert_eq!(&data[..4], b"RIFF");
        assert_eq!(&data[8..12], b"WEBP");
    }

    #[test]
    fn test_lower_jpeg_quality_is_smaller() {
        let img = gradient(128, 128);
        let high = ImageCompressor::compress(&img, OutputFormat::Jpeg, 95).unwrap();
        let low = ImageCompressor::compress(&img, OutputFormat::Jpeg, 10).unwrap();
        assert!(low.len() < high.len());
    }
}
