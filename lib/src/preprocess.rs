//! The fixed ImageNet evaluation transform: resize the shortest side to 256, then center-crop
//! 224×224 and normalize each channel after scaling to `[0, 1]`.

use image::{
	imageops::{self, FilterType},
	RgbImage,
};

pub const RESIZE: u32 = 256;
pub const CROP: u32 = 224;
pub const MEAN: [f32; 3] = [0.485, 0.456, 0.406];
pub const STD: [f32; 3] = [0.229, 0.224, 0.225];

/// Number of values in a preprocessed image, laid out as `[3, CROP, CROP]`.
pub const INPUT_LEN: usize = 3 * (CROP as usize) * (CROP as usize);

#[derive(Debug, thiserror::Error)]
pub enum PreprocessError {
	#[error("Image payload is empty")]
	Empty,

	#[error("Could not decode image: {0}")]
	Decode(#[from] image::ImageError),

	#[error("Image has no pixels ({0}x{1})")]
	ZeroSized(u32, u32),
}

/// Decode an encoded image (PNG, JPEG, ...) and convert it to 8-bit RGB.
///
/// # Errors
///
/// Returns an error if the bytes are empty, not a supported image, or an image without pixels.
pub fn decode_image(bytes: &[u8]) -> Result<RgbImage, PreprocessError> {
	if bytes.is_empty() {
		return Err(PreprocessError::Empty);
	}

	let image = image::load_from_memory(bytes)?.to_rgb8();
	let (width, height) = image.dimensions();
	if width == 0 || height == 0 {
		return Err(PreprocessError::ZeroSized(width, height));
	}

	Ok(image)
}

/// Run the whole transform, returning normalized CHW values.
pub fn preprocess(image: &RgbImage) -> Vec<f32> {
	let resized = resize_shortest_side(image, RESIZE);
	let cropped = center_crop(&resized, CROP);

	to_normalized_chw(&cropped)
}

/// Scale the image so its shortest side is `size`, keeping the aspect ratio (the long side is truncated).
pub fn resize_shortest_side(image: &RgbImage, size: u32) -> RgbImage {
	let (width, height) = image.dimensions();
	let (short, long) = if width <= height {
		(width, height)
	} else {
		(height, width)
	};

	if short == size {
		return image.clone();
	}

	#[allow(clippy::cast_possible_truncation)]
	let new_long = (u64::from(size) * u64::from(long) / u64::from(short)) as u32;
	let (new_width, new_height) = if width <= height {
		(size, new_long)
	} else {
		(new_long, size)
	};

	imageops::resize(image, new_width, new_height, FilterType::Triangle)
}

/// Crop a `size`×`size` square out of the middle of the image. Odd margins round half to even.
pub fn center_crop(image: &RgbImage, size: u32) -> RgbImage {
	let (width, height) = image.dimensions();
	let left = crop_offset(width, size);
	let top = crop_offset(height, size);

	imageops::crop_imm(image, left, top, size.min(width), size.min(height)).to_image()
}

fn crop_offset(dimension: u32, size: u32) -> u32 {
	let margin = f64::from(dimension.saturating_sub(size)) / 2.0;

	#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
	let offset = margin.round_ties_even() as u32;
	offset
}

/// Scale pixels to `[0, 1]`, normalize with the ImageNet statistics and lay them out channel-first.
pub fn to_normalized_chw(image: &RgbImage) -> Vec<f32> {
	let plane = (image.width() * image.height()) as usize;
	let mut values = vec![0f32; 3 * plane];

	for (i, pixel) in image.pixels().enumerate() {
		for channel in 0..3 {
			let scaled = f32::from(pixel[channel]) / 255.0;
			values[channel * plane + i] = (scaled - MEAN[channel]) / STD[channel];
		}
	}

	values
}

#[cfg(test)]
mod tests {
	use super::*;
	use image::Rgb;

	fn solid(width: u32, height: u32, color: [u8; 3]) -> RgbImage {
		RgbImage::from_pixel(width, height, Rgb(color))
	}

	#[test]
	fn shortest_side_becomes_256() {
		assert_eq!(
			resize_shortest_side(&solid(300, 400, [0, 0, 0]), RESIZE).dimensions(),
			(256, 341)
		);
		assert_eq!(
			resize_shortest_side(&solid(640, 480, [0, 0, 0]), RESIZE).dimensions(),
			(341, 256)
		);
		assert_eq!(
			resize_shortest_side(&solid(10, 10, [0, 0, 0]), RESIZE).dimensions(),
			(256, 256)
		);
	}

	#[test]
	fn images_already_at_size_are_untouched() {
		let image = solid(256, 500, [1, 2, 3]);

		assert_eq!(resize_shortest_side(&image, RESIZE), image);
	}

	#[test]
	fn center_crop_rounds_half_to_even() {
		// 227 - 224 = 3, so the margin is 1.5 and rounds up to 2.
		assert_eq!(crop_offset(227, CROP), 2);
		// 229 - 224 = 5, so the margin is 2.5 and rounds down to 2.
		assert_eq!(crop_offset(229, CROP), 2);
		assert_eq!(crop_offset(256, CROP), 16);
		assert_eq!(crop_offset(224, CROP), 0);
	}

	#[test]
	fn center_crop_takes_the_middle() {
		let mut image = solid(228, 224, [0, 0, 0]);
		image.put_pixel(2, 0, Rgb([255, 0, 0]));

		let cropped = center_crop(&image, CROP);

		assert_eq!(cropped.dimensions(), (224, 224));
		assert_eq!(cropped.get_pixel(0, 0), &Rgb([255, 0, 0]));
	}

	#[test]
	fn normalization_uses_imagenet_statistics() {
		let values = to_normalized_chw(&solid(2, 1, [255, 0, 128]));

		assert_eq!(values.len(), 6);
		assert!((values[0] - (1.0 - 0.485) / 0.229).abs() < 1e-6);
		assert!((values[1] - (1.0 - 0.485) / 0.229).abs() < 1e-6);
		assert!((values[2] - (0.0 - 0.456) / 0.224).abs() < 1e-6);
		assert!((values[4] - (128.0 / 255.0 - 0.406) / 0.225).abs() < 1e-6);
	}

	#[test]
	fn preprocess_produces_a_full_input() {
		let values = preprocess(&solid(500, 375, [10, 20, 30]));

		assert_eq!(values.len(), INPUT_LEN);
		assert!(values.iter().all(|v| v.is_finite()));
	}

	#[test]
	fn empty_and_garbage_bytes_do_not_decode() {
		assert!(matches!(decode_image(&[]), Err(PreprocessError::Empty)));
		assert!(matches!(
			decode_image(b"definitely not an image"),
			Err(PreprocessError::Decode(_))
		));
	}

	#[test]
	fn images_without_pixels_are_rejected() {
		assert!(matches!(
			decode_image(b"P6\n0 0\n255\n"),
			Err(PreprocessError::ZeroSized(0, 0))
		));
	}
}
