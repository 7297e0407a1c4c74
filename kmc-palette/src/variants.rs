//! Palette post-processing: brightness ordering and lighter/darker variants

use crate::Color;

/// The amount added to or subtracted from each channel to make a variant
pub const VARIANT_INCREMENT: u8 = 30;

/// Colors with a brightness below this are considered dark
pub const BRIGHTNESS_THRESHOLD: u16 = 128;

/// The sum of the channels of a color, in the range `0..=765`
#[must_use]
pub fn brightness(color: Color) -> u16 {
	u16::from(color.red) + u16::from(color.green) + u16::from(color.blue)
}

/// Whether the color is dark enough to get a lighter variant
#[must_use]
pub fn is_dark(color: Color) -> bool {
	brightness(color) < BRIGHTNESS_THRESHOLD
}

/// Brighten each channel by [`VARIANT_INCREMENT`], saturating at `255`
#[must_use]
pub fn lighter(color: Color) -> Color {
	Color::new(
		color.red.saturating_add(VARIANT_INCREMENT),
		color.green.saturating_add(VARIANT_INCREMENT),
		color.blue.saturating_add(VARIANT_INCREMENT),
	)
}

/// Darken each channel by [`VARIANT_INCREMENT`], saturating at `0`
#[must_use]
pub fn darker(color: Color) -> Color {
	Color::new(
		color.red.saturating_sub(VARIANT_INCREMENT),
		color.green.saturating_sub(VARIANT_INCREMENT),
		color.blue.saturating_sub(VARIANT_INCREMENT),
	)
}

/// The `[darker, lighter]` pair for a color.
///
/// A dark color is paired with a lighter variant of itself,
/// and any other color is paired with a darker variant of itself.
#[must_use]
pub fn variant_pair(color: Color) -> [Color; 2] {
	if is_dark(color) {
		[color, lighter(color)]
	} else {
		[darker(color), color]
	}
}

/// Sort the palette by ascending brightness
pub fn sort_by_brightness(palette: &mut [Color]) {
	palette.sort_by_key(|&color| brightness(color));
}

/// Replace each color in the palette with its [`variant_pair`], doubling its length.
///
/// Applying this more than once keeps adding variants of variants,
/// so it should only be done once per palette.
pub fn expand_with_variants(palette: &mut Vec<Color>) {
	*palette = palette.iter().flat_map(|&color| variant_pair(color)).collect();
}

#[cfg(test)]
mod tests {
	use super::*;

	fn test_palette() -> Vec<Color> {
		vec![
			Color::new(200, 200, 200),
			Color::new(10, 10, 10),
			Color::new(255, 0, 128),
			Color::new(0, 0, 0),
			Color::new(127, 0, 0),
			Color::new(43, 43, 42),
			Color::new(100, 28, 0),
			Color::new(255, 255, 255),
		]
	}

	fn assert_sorted(palette: &[Color]) {
		for pair in palette.windows(2) {
			assert!(brightness(pair[0]) <= brightness(pair[1]));
		}
	}

	#[test]
	fn brightness_range() {
		assert_eq!(brightness(Color::new(0, 0, 0)), 0);
		assert_eq!(brightness(Color::new(255, 255, 255)), 765);
		assert_eq!(brightness(Color::new(255, 0, 128)), 383);
	}

	#[test]
	fn dark_threshold() {
		assert!(is_dark(Color::new(127, 0, 0)));
		assert!(is_dark(Color::new(43, 42, 42)));
		assert!(!is_dark(Color::new(43, 43, 42)));
		assert!(!is_dark(Color::new(128, 0, 0)));
	}

	#[test]
	fn variants_saturate() {
		assert_eq!(lighter(Color::new(10, 240, 225)), Color::new(40, 255, 255));
		assert_eq!(darker(Color::new(10, 240, 30)), Color::new(0, 210, 0));
	}

	#[test]
	fn sort_is_ordered_and_idempotent() {
		let mut palette = test_palette();
		sort_by_brightness(&mut palette);
		assert_sorted(&palette);
		assert_eq!(palette.len(), test_palette().len());

		let once = palette.clone();
		sort_by_brightness(&mut palette);
		assert_eq!(once, palette);
	}

	#[test]
	fn expand_doubles_length() {
		let mut palette = test_palette();
		expand_with_variants(&mut palette);
		assert_eq!(palette.len(), 2 * test_palette().len());

		for (pair, &original) in palette.chunks_exact(2).zip(&test_palette()) {
			assert!(pair.contains(&original));
		}
	}

	#[test]
	fn expand_known_colors() {
		let mut palette = vec![Color::new(10, 10, 10), Color::new(200, 200, 200)];
		expand_with_variants(&mut palette);
		assert_eq!(
			palette,
			vec![
				Color::new(10, 10, 10),
				Color::new(40, 40, 40),
				Color::new(170, 170, 170),
				Color::new(200, 200, 200),
			]
		);
	}

	#[test]
	fn expand_empty_palette() {
		let mut palette = Vec::new();
		expand_with_variants(&mut palette);
		assert!(palette.is_empty());
	}
}
