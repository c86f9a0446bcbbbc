use image::imageops::{self, FilterType};
use image::{GrayImage, Luma, RgbaImage};

use crate::PipelineError;

/// Predicts a foreground alpha matte (255 = keep) for an image.
pub trait MatteModel: Send + Sync {
    fn predict(&self, image: &RgbaImage) -> Result<GrayImage, PipelineError>;
}

/// Matte from distance to the mean border colour.
///
/// Pixels within `tolerance` of the border colour become transparent, pixels
/// beyond `tolerance + feather` stay opaque, and the band in between ramps
/// linearly. Good enough for product shots on plain backdrops.
#[derive(Debug, Clone, Copy)]
pub struct BorderColorMatte {
    pub tolerance: f32,
    pub feather: f32,
}

impl Default for BorderColorMatte {
    fn default() -> Self {
        Self {
            tolerance: 24.0,
            feather: 24.0,
        }
    }
}

impl BorderColorMatte {
    fn border_color(image: &RgbaImage) -> [f32; 3] {
        let (width, height) = image.dimensions();
        let mut sum = [0f64; 3];
        let mut count = 0f64;
        for (x, y, pixel) in image.enumerate_pixels() {
            if x == 0 || y == 0 || x + 1 == width || y + 1 == height {
                for (channel, acc) in sum.iter_mut().enumerate() {
                    *acc += f64::from(pixel[channel]);
                }
                count += 1.0;
            }
        }
        if count == 0.0 {
            return [0.0; 3];
        }
        [
            (sum[0] / count) as f32,
            (sum[1] / count) as f32,
            (sum[2] / count) as f32,
        ]
    }
}

impl MatteModel for BorderColorMatte {
    fn predict(&self, image: &RgbaImage) -> Result<GrayImage, PipelineError> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(PipelineError::Inference("image has no pixels".to_string()));
        }
        let background = Self::border_color(image);
        let feather = self.feather.max(f32::EPSILON);
        Ok(GrayImage::from_fn(width, height, |x, y| {
            let pixel = image.get_pixel(x, y);
            let distance = (0..3)
                .map(|channel| {
                    let delta = f32::from(pixel[channel]) - background[channel];
                    delta * delta
                })
                .sum::<f32>()
                .sqrt();
            let alpha = ((distance - self.tolerance) / feather).clamp(0.0, 1.0);
            Luma([(alpha * 255.0).round() as u8])
        }))
    }
}

/// Writes `matte` into the alpha channel, resizing it to the image first.
pub fn apply_alpha_matte(image: &mut RgbaImage, matte: &GrayImage) {
    let (width, height) = image.dimensions();
    let resized;
    let matte = if matte.dimensions() == (width, height) {
        matte
    } else {
        resized = imageops::resize(matte, width, height, FilterType::Triangle);
        &resized
    };
    for (pixel, alpha) in image.pixels_mut().zip(matte.pixels()) {
        pixel[3] = alpha[0];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn framed_square() -> RgbaImage {
        // White backdrop with a red 2x2 subject in the middle.
        RgbaImage::from_fn(6, 6, |x, y| {
            if (2..4).contains(&x) && (2..4).contains(&y) {
                Rgba([200, 0, 0, 255])
            } else {
                Rgba([255, 255, 255, 255])
            }
        })
    }

    #[test]
    fn backdrop_becomes_transparent_and_subject_stays() {
        let image = framed_square();
        let matte = BorderColorMatte::default().predict(&image).unwrap();
        assert_eq!(matte.get_pixel(0, 0)[0], 0);
        assert_eq!(matte.get_pixel(2, 2)[0], 255);
    }

    #[test]
    fn apply_resizes_smaller_matte() {
        let mut image = RgbaImage::from_pixel(4, 4, Rgba([10, 10, 10, 255]));
        let matte = GrayImage::from_pixel(2, 2, Luma([0]));
        apply_alpha_matte(&mut image, &matte);
        assert!(image.pixels().all(|p| p[3] == 0));
    }
}
