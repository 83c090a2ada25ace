// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image preprocessing for YOLO-style detectors

use image::{DynamicImage, GenericImageView, Rgb, RgbImage};
use ndarray::Array4;

/// Default square input size for YOLOv8 exports
pub const DETECTION_INPUT_SIZE: u32 = 640;

/// Padding colour used by the Ultralytics letterbox
pub const PAD_VALUE: u8 = 114;

/// A letterboxed input tensor plus the transform needed to map boxes back
#[derive(Debug, Clone)]
pub struct Letterbox {
    /// NCHW tensor of shape [1, 3, size, size], values in [0, 1]
    pub tensor: Array4<f32>,
    /// Scale applied to the original image
    pub scale: f32,
    /// Horizontal padding (left) in input pixels
    pub pad_x: f32,
    /// Vertical padding (top) in input pixels
    pub pad_y: f32,
    /// Original image width
    pub orig_w: u32,
    /// Original image height
    pub orig_h: u32,
}

impl Letterbox {
    /// Map a point from model input space back to original image space,
    /// clipped to the image bounds.
    pub fn to_original(&self, x: f32, y: f32) -> (f32, f32) {
        let ox = (x - self.pad_x) / self.scale;
        let oy = (y - self.pad_y) / self.scale;
        (
            ox.clamp(0.0, self.orig_w as f32),
            oy.clamp(0.0, self.orig_h as f32),
        )
    }
}

/// Resize an image to fit a square target while preserving aspect ratio
///
/// Returns the padded image with the scale and offsets used.
pub fn resize_with_padding(image: &DynamicImage, target_size: u32) -> (RgbImage, f32, u32, u32) {
    let (orig_w, orig_h) = image.dimensions();

    if orig_w == 0 || orig_h == 0 {
        let blank = RgbImage::from_pixel(target_size, target_size, Rgb([PAD_VALUE; 3]));
        return (blank, 1.0, 0, 0);
    }

    let scale = (target_size as f32 / orig_w as f32).min(target_size as f32 / orig_h as f32);

    // Ensure minimum 1 pixel
    let new_w = ((orig_w as f32 * scale).round() as u32).clamp(1, target_size);
    let new_h = ((orig_h as f32 * scale).round() as u32).clamp(1, target_size);

    let resized = image.resize_exact(new_w, new_h, image::imageops::FilterType::Triangle);
    let rgb = resized.to_rgb8();

    let mut output = RgbImage::from_pixel(target_size, target_size, Rgb([PAD_VALUE; 3]));

    let offset_x = (target_size - new_w) / 2;
    let offset_y = (target_size - new_h) / 2;

    for y in 0..new_h {
        for x in 0..new_w {
            let pixel = rgb.get_pixel(x, y);
            output.put_pixel(x + offset_x, y + offset_y, *pixel);
        }
    }

    (output, scale, offset_x, offset_y)
}

/// Letterbox an image and convert it to an NCHW tensor
///
/// Steps:
/// 1. Resize with aspect ratio preservation to `target_size`
/// 2. Pad to square with grey (114) background
/// 3. Scale pixels to [0, 1]
/// 4. Convert to NCHW tensor format [1, 3, H, W]
pub fn letterbox(image: &DynamicImage, target_size: u32) -> Letterbox {
    let (orig_w, orig_h) = image.dimensions();
    let (padded, scale, offset_x, offset_y) = resize_with_padding(image, target_size);

    let size = target_size as usize;
    let mut tensor = Array4::zeros((1, 3, size, size));

    for (x, y, pixel) in padded.enumerate_pixels() {
        for c in 0..3 {
            tensor[[0, c, y as usize, x as usize]] = pixel[c] as f32 / 255.0;
        }
    }

    Letterbox {
        tensor,
        scale,
        pad_x: offset_x as f32,
        pad_y: offset_y as f32,
        orig_w,
        orig_h,
    }
}
