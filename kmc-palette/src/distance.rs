//! Distance and aggregation helpers for RGB colors

use crate::Color;

/// Squared Euclidean distance between two colors in RGB channel space
#[must_use]
pub fn squared_distance(x: Color, y: Color) -> f64 {
	let dr = f64::from(x.red) - f64::from(y.red);
	let dg = f64::from(x.green) - f64::from(y.green);
	let db = f64::from(x.blue) - f64::from(y.blue);
	dr * dr + dg * dg + db * db
}

/// Euclidean distance between two colors in RGB channel space
#[must_use]
pub fn distance(x: Color, y: Color) -> f64 {
	squared_distance(x, y).sqrt()
}

/// Returns the index of the smallest value, or `None` if there are no values.
///
/// Ties resolve to the first occurrence.
#[must_use]
pub fn argmin(values: impl IntoIterator<Item = f64>) -> Option<usize> {
	let mut min: Option<(usize, f64)> = None;
	for (i, value) in values.into_iter().enumerate() {
		match min {
			Some((_, min_value)) if value >= min_value => {},
			_ => min = Some((i, value)),
		}
	}
	min.map(|(i, _)| i)
}

/// Running per-channel sum of colors
///
/// Each channel is accumulated in a `u64`,
/// which cannot overflow for any realistic number of pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColorSum {
	/// Sum of the red channels
	red: u64,
	/// Sum of the green channels
	green: u64,
	/// Sum of the blue channels
	blue: u64,
	/// Number of colors added
	count: u64,
}

impl ColorSum {
	/// Add a color to the sum
	pub fn add(&mut self, color: Color) {
		self.red += u64::from(color.red);
		self.green += u64::from(color.green);
		self.blue += u64::from(color.blue);
		self.count += 1;
	}

	/// The number of colors added so far
	#[must_use]
	pub const fn count(&self) -> u64 {
		self.count
	}

	/// The truncated per-channel mean, or black if no colors were added
	#[must_use]
	pub fn mean(&self) -> Color {
		if self.count == 0 {
			return Color::new(0, 0, 0);
		}

		// the mean of u8 values always fits in a u8
		#[allow(clippy::cast_possible_truncation)]
		Color::new(
			(self.red / self.count) as u8,
			(self.green / self.count) as u8,
			(self.blue / self.count) as u8,
		)
	}
}

impl Extend<Color> for ColorSum {
	fn extend<I: IntoIterator<Item = Color>>(&mut self, iter: I) {
		for color in iter {
			self.add(color);
		}
	}
}

impl FromIterator<Color> for ColorSum {
	fn from_iter<I: IntoIterator<Item = Color>>(iter: I) -> Self {
		let mut sum = Self::default();
		sum.extend(iter);
		sum
	}
}

/// Per-channel mean of the given colors, truncated towards zero
///
/// Returns black for an empty slice.
#[must_use]
pub fn mean(colors: &[Color]) -> Color {
	colors.iter().copied().collect::<ColorSum>().mean()
}
