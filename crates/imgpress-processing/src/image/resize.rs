use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};

/// Target dimensions that fit `width` x `height` inside the given bounds.
///
/// A bound of 0 means unbounded. Aspect ratio is kept and images are never upscaled, so
/// `None` is returned when the image already fits.
pub fn fit_within(width: u32, height: u32, max_width: u32, max_height: u32) -> Option<(u32, u32)> {
    if width == 0 || height == 0 {
        return None;
    }

    let scale_for = |actual: u32, bound: u32| {
        if bound > 0 && actual > bound {
            bound as f64 / actual as f64
        } else {
            1.0
        }
    };

    let scale = scale_for(width, max_width).min(scale_for(height, max_height));
    if scale >= 1.0 {
        return None;
    }

    let clamp = |value: f64, bound: u32| {
        let value = (value.round() as u32).max(1);
        if bound > 0 {
            value.min(bound)
        } else {
            value
        }
    };

    Some((
        clamp(width as f64 * scale, max_width),
        clamp(height as f64 * scale, max_height),
    ))
}

/// Downscale `img` to fit the bounds, or return it unchanged.
pub fn downscale(img: DynamicImage, max_width: u32, max_height: u32) -> DynamicImage {
    let (width, height) = img.dimensions();
    match fit_within(width, height, max_width, max_height) {
        Some((new_width, new_height)) => {
            tracing::debug!(
                from_width = width,
                from_height = height,
                to_width = new_width,
                to_height = new_height,
                "Downscaling image"
            );
            img.resize_exact(new_width, new_height, FilterType::Lanczos3)
        }
        None => img,
    }
}
