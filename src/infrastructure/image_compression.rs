// src/infrastructure/image_compression.rs
//
// Product image compression
//
// RULES:
// - Longer side is clamped to ImageLimits::max_dimension, aspect preserved
// - JPEG quality steps down until the buffer fits or the floor is reached
// - The floor result is accepted even when oversized
// - Decode failures are per-file; a batch never aborts on one bad image

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ExtendedColorType};

use crate::config::ImageLimits;
use crate::error::{AppError, AppResult};

/// Quality attempts in order; the last entry is the floor.
pub const QUALITY_LADDER: [u8; 6] = [85, 75, 65, 55, 45, 30];

pub const QUALITY_FLOOR: u8 = QUALITY_LADDER[QUALITY_LADDER.len() - 1];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedImage {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// JPEG quality of the returned encoding (1-100)
    pub quality: u8,
    /// Encodings performed, including the returned one
    pub attempts: usize,
}

impl CompressedImage {
    pub fn within(&self, limits: &ImageLimits) -> bool {
        self.bytes.len() <= limits.max_size_bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// One file that could not be turned into an upload
#[derive(Debug, Clone)]
pub struct ImageRejection {
    pub name: String,
    pub error: AppError,
}

#[derive(Debug, Clone, Default)]
pub struct CompressionBatch {
    pub images: Vec<Vec<u8>>,
    pub rejected: Vec<ImageRejection>,
}

/// Target size for an image whose longer side may exceed `max_dimension`.
pub fn target_dimensions(width: u32, height: u32, max_dimension: u32) -> (u32, u32) {
    let longer = width.max(height);
    if longer <= max_dimension {
        return (width, height);
    }
    let scale = |side: u32| -> u32 {
        let scaled = (u64::from(side) * u64::from(max_dimension) + u64::from(longer) / 2)
            / u64::from(longer);
        (scaled as u32).max(1)
    };
    if width >= height {
        (max_dimension, scale(height))
    } else {
        (scale(width), max_dimension)
    }
}

/// Decode `source` and re-encode it within `limits`.
pub fn compress(source: &[u8], limits: ImageLimits) -> AppResult<CompressedImage> {
    let decoded = image::load_from_memory(source).map_err(|e| AppError::Decode(e.to_string()))?;
    compress_decoded(&decoded, limits)
}

pub fn compress_decoded(image: &DynamicImage, limits: ImageLimits) -> AppResult<CompressedImage> {
    let (width, height) = target_dimensions(image.width(), image.height(), limits.max_dimension);

    let raster = if (width, height) == (image.width(), image.height()) {
        image.to_rgb8()
    } else {
        log::debug!(
            "resizing image {}x{} -> {}x{}",
            image.width(),
            image.height(),
            width,
            height
        );
        image.resize_exact(width, height, FilterType::Triangle).to_rgb8()
    };

    let mut attempts = 0;
    for quality in QUALITY_LADDER {
        attempts += 1;
        let mut bytes = Vec::new();
        JpegEncoder::new_with_quality(&mut bytes, quality)
            .encode(raster.as_raw(), width, height, ExtendedColorType::Rgb8)
            .map_err(|e| AppError::Encode(e.to_string()))?;

        if bytes.len() <= limits.max_size_bytes || quality == QUALITY_FLOOR {
            if bytes.len() > limits.max_size_bytes {
                log::warn!(
                    "image still {} bytes at quality floor {}, accepting",
                    bytes.len(),
                    quality
                );
            }
            return Ok(CompressedImage {
                bytes,
                width,
                height,
                quality,
                attempts,
            });
        }
    }

    Err(AppError::Encode("quality ladder is empty".to_string()))
}

/// `compress` on the blocking pool so large images never stall the runtime.
pub async fn compress_async(source: Vec<u8>, limits: ImageLimits) -> AppResult<CompressedImage> {
    tokio::task::spawn_blocking(move || compress(&source, limits)).await?
}

/// Compress every named file, collecting failures instead of stopping.
pub async fn compress_all(files: Vec<(String, Vec<u8>)>, limits: ImageLimits) -> CompressionBatch {
    let mut batch = CompressionBatch::default();
    for (name, bytes) in files {
        match compress_async(bytes, limits).await {
            Ok(image) => batch.images.push(image.into_bytes()),
            Err(error) => {
                log::warn!("skipping image {}: {}", name, error);
                batch.rejected.push(ImageRejection { name, error });
            }
        }
    }
    batch
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, RgbImage};
    use std::io::Cursor;

    fn noise(width: u32, height: u32) -> DynamicImage {
        let mut state: u32 = 0x2545_f491;
        let mut next = move || {
            state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            (state >> 24) as u8
        };
        let pixels = RgbImage::from_fn(width, height, |_, _| image::Rgb([next(), next(), next()]));
        DynamicImage::ImageRgb8(pixels)
    }

    fn png_bytes(image: &DynamicImage) -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        image.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_target_dimensions() {
        assert_eq!(target_dimensions(4000, 3000, 1200), (1200, 900));
        assert_eq!(target_dimensions(3000, 4000, 1200), (900, 1200));
        assert_eq!(target_dimensions(1000, 333, 600), (600, 200));
        assert_eq!(target_dimensions(800, 600, 1200), (800, 600));
        assert_eq!(target_dimensions(5000, 1, 1200), (1200, 1));
    }

    #[test]
    fn test_large_noise_image_is_bounded() {
        let limits = ImageLimits::default();
        let result = compress_decoded(&noise(4000, 3000), limits).unwrap();

        assert_eq!((result.width, result.height), (1200, 900));
        assert!(result.within(&limits) || result.quality == QUALITY_FLOOR);
        assert!(result.attempts <= 6);

        let reopened = image::load_from_memory(&result.bytes).unwrap();
        assert!(reopened.width().max(reopened.height()) <= 1200);
    }

    #[test]
    fn test_small_image_keeps_size_and_first_quality() {
        let source = png_bytes(&noise(64, 48));
        let result = compress(&source, ImageLimits::default()).unwrap();

        assert_eq!((result.width, result.height), (64, 48));
        assert_eq!(result.quality, 85);
        assert_eq!(result.attempts, 1);
    }

    #[test]
    fn test_tight_budget_walks_the_ladder() {
        let limits = ImageLimits {
            max_dimension: 300,
            max_size_bytes: 1,
        };
        let result = compress(&png_bytes(&noise(600, 400)), limits).unwrap();

        assert_eq!((result.width, result.height), (300, 200));
        assert_eq!(result.quality, QUALITY_FLOOR);
        assert_eq!(result.attempts, QUALITY_LADDER.len());
    }

    #[test]
    fn test_garbage_is_a_decode_error() {
        let result = compress(b"definitely not an image", ImageLimits::default());
        assert!(matches!(result, Err(AppError::Decode(_))));
    }

    #[tokio::test]
    async fn test_batch_collects_rejections() {
        let files = vec![
            ("table.png".to_string(), png_bytes(&noise(32, 32))),
            ("notes.txt".to_string(), b"hello".to_vec()),
            ("chair.png".to_string(), png_bytes(&noise(16, 16))),
        ];

        let batch = compress_all(files, ImageLimits::default()).await;

        assert_eq!(batch.images.len(), 2);
        assert_eq!(batch.rejected.len(), 1);
        assert_eq!(batch.rejected[0].name, "notes.txt");
        assert!(matches!(batch.rejected[0].error, AppError::Decode(_)));
    }
}
