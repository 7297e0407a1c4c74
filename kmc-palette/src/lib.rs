//! Extract a color palette from an image by performing k-means clustering over its RGB pixels.
//!
//! # Examples
//!
//! ## Read an image file and get 8 colors, sorted from darkest to brightest.
//!
//! ```no_run
//! let image = image::open("some image").unwrap().into_rgb8();
//! let colors = kmc_palette::samples_from_image(&image);
//!
//! let mut palette = kmc_palette::run_kmeans(8, 1, colors).unwrap();
//! kmc_palette::sort_by_brightness(&mut palette);
//! ```
//!
//! ## Add lighter and darker variants and print them.
//!
//! ```no_run
//! # let image = image::open("some image").unwrap().into_rgb8();
//! # let colors = kmc_palette::samples_from_image(&image);
//! let mut palette = kmc_palette::run_kmeans(4, 2, colors).unwrap();
//! kmc_palette::sort_by_brightness(&mut palette);
//! kmc_palette::expand_with_variants(&mut palette);
//!
//! for &color in &palette {
//!     println!("{}", kmc_palette::format::palette_line(color));
//! }
//! ```
//!
//! ## Control the random starting centroids.
//!
//! ```no_run
//! use rand::SeedableRng;
//!
//! # let image = image::open("some image").unwrap().into_rgb8();
//! # let colors = kmc_palette::samples_from_image(&image);
//! let mut rng = rand_xoshiro::Xoshiro256PlusPlus::seed_from_u64(42);
//! let result = kmc_palette::kmeans::run_with_rng(colors, 8, 4, 64, &mut rng).unwrap();
//! println!("variance: {}", result.variance);
//! ```
//!
//! # Arguments
//!
//! ## K
//!
//! The number of clusters, and so the number of colors in the raw palette.
//! Must be at least `1`.
//! Clusters that end up with no pixels are kept and given a black centroid.
//!
//! ## Attempts
//!
//! k-means starts from randomly chosen centroids and can get stuck in a local minimum.
//! After one baseline run, k-means is run `attempts` more times,
//! and the run with the lowest total variance is kept (the earliest one on ties).
//! `0` attempts only runs the baseline.
//!
//! ## Max Iterations
//!
//! Each run stops once its centroids no longer change,
//! or after this many iterations, whichever comes first.
//!
//! ## Seed
//!
//! The value used to seed the random number generator for the starting centroids.
//! Attempt `i` is seeded with `seed ^ i`.

#![deny(unsafe_code)]
#![warn(clippy::pedantic, clippy::cargo)]
#![warn(clippy::use_debug, clippy::dbg_macro, clippy::todo, clippy::unimplemented)]
#![warn(clippy::unwrap_used, clippy::unwrap_in_result)]
#![warn(clippy::unneeded_field_pattern, clippy::rest_pat_in_fully_bound_structs)]
#![warn(clippy::unnecessary_self_imports)]
#![warn(clippy::str_to_string, clippy::string_to_string, clippy::string_slice)]
#![warn(missing_docs, clippy::missing_docs_in_private_items, rustdoc::all)]
#![warn(clippy::float_cmp_const, clippy::lossy_float_literal)]
#![allow(clippy::module_name_repetitions)]

use image::RgbImage;

pub mod distance;
pub mod format;
pub mod kmeans;
pub mod variants;

pub use kmeans::{KmeansError, KmeansResult, Termination, DEFAULT_MAX_ITER};
pub use variants::{expand_with_variants, sort_by_brightness};

/// An 8-bit sRGB color
pub type Color = palette::Srgb<u8>;

/// Default number of clusters
pub const DEFAULT_K: u8 = 8;

/// Default number of additional k-means attempts
pub const DEFAULT_ATTEMPTS: u32 = 1;

/// Default seed used by [`run_kmeans`]
pub const DEFAULT_SEED: u64 = 0;

/// Borrow the pixels of an image as colors, in row-major order
#[must_use]
pub fn samples_from_image(image: &RgbImage) -> &[Color] {
	// the raw buffer may be longer than the pixels it holds
	let len = image.width() as usize * image.height() as usize * 3;
	palette::cast::from_component_slice(&image.as_raw()[..len])
}

/// Runs k-means on the provided colors and returns the centroids of the best attempt as the raw palette.
///
/// This uses [`DEFAULT_MAX_ITER`] and [`DEFAULT_SEED`];
/// see [`kmeans::run`] to provide them.
///
/// # Errors
/// Returns an error if `k` is `0` or `colors` is empty.
pub fn run_kmeans(k: u8, attempts: u32, colors: &[Color]) -> Result<Vec<Color>, KmeansError> {
	kmeans::run(colors, k, attempts, DEFAULT_MAX_ITER, DEFAULT_SEED).map(|result| result.centroids)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
	use super::*;
	use image::Rgb;

	fn black_and_white() -> RgbImage {
		RgbImage::from_fn(2, 2, |_, y| if y == 0 { Rgb([0, 0, 0]) } else { Rgb([255, 255, 255]) })
	}

	#[test]
	#[allow(clippy::cast_possible_truncation)]
	fn samples_are_row_major() {
		let image = RgbImage::from_fn(3, 2, |x, y| Rgb([x as u8, y as u8, 7]));
		let colors = samples_from_image(&image);

		assert_eq!(
			colors,
			[
				Color::new(0, 0, 7),
				Color::new(1, 0, 7),
				Color::new(2, 0, 7),
				Color::new(0, 1, 7),
				Color::new(1, 1, 7),
				Color::new(2, 1, 7),
			]
		);
	}

	#[test]
	fn samples_ignore_excess_buffer() {
		let image = RgbImage::from_raw(1, 1, vec![9; 6]).unwrap();
		assert_eq!(samples_from_image(&image), [Color::new(9, 9, 9)]);

		let image = RgbImage::from_raw(1, 1, vec![9; 4]).unwrap();
		assert_eq!(samples_from_image(&image), [Color::new(9, 9, 9)]);
	}

	#[test]
	fn black_and_white_image() {
		let image = black_and_white();
		let colors = samples_from_image(&image);
		assert_eq!(colors.len(), 4);

		for attempts in 1..4 {
			let mut palette = run_kmeans(2, attempts, colors).unwrap();
			sort_by_brightness(&mut palette);
			assert_eq!(palette, [Color::new(0, 0, 0), Color::new(255, 255, 255)]);

			expand_with_variants(&mut palette);
			assert_eq!(
				palette,
				[
					Color::new(0, 0, 0),
					Color::new(30, 30, 30),
					Color::new(225, 225, 225),
					Color::new(255, 255, 255),
				]
			);
		}
	}

	#[test]
	fn more_clusters_than_colors() {
		let image = black_and_white();
		let palette = run_kmeans(6, 0, samples_from_image(&image)).unwrap();
		assert_eq!(palette.len(), 6);
	}

	#[test]
	fn empty_image() {
		let image = RgbImage::new(0, 0);
		assert_eq!(run_kmeans(8, 1, samples_from_image(&image)), Err(KmeansError::NoSamples));
	}
}
