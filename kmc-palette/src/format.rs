//! Text and ANSI escape formatting for palette colors

use crate::{variants, Color};

/// Resets all terminal colors and styles
pub const ANSI_RESET: &str = "\x1b[0m";

/// Lowercase, zero padded hex code, e.g. `#ff0080`
#[must_use]
pub fn to_hex(color: Color) -> String {
	format!("#{color:x}")
}

/// The color as an `rgb(r, g, b)` triple with each channel padded to 3 characters
#[must_use]
pub fn to_rgb(color: Color) -> String {
	format!("rgb({:3}, {:3}, {:3})", color.red, color.green, color.blue)
}

/// The true color escape sequence that sets the terminal background to this color
#[must_use]
pub fn to_ansi_background(color: Color) -> String {
	format!("\x1b[48;2;{};{};{}m", color.red, color.green, color.blue)
}

/// `width` spaces with this color as their background, followed by a reset
#[must_use]
pub fn swatch(color: Color, width: usize) -> String {
	format!("{}{:width$}{ANSI_RESET}", to_ansi_background(color), "")
}

/// One line of the vertical palette listing: rgb triple, hex code, then a swatch
#[must_use]
pub fn palette_line(color: Color) -> String {
	format!("{:<20} {:<10} {}", to_rgb(color), to_hex(color), swatch(color, 4))
}

/// Space separated hex codes
#[must_use]
pub fn hex_list(colors: &[Color]) -> String {
	colors.iter().map(|&color| to_hex(color)).collect::<Vec<_>>().join(" ")
}

/// Split a palette into a row of darker colors and a row of lighter colors.
///
/// If the palette has already been expanded with variants, then its pairs are split apart.
/// Otherwise, the variant pair for each color is computed here.
///
/// An expanded palette must have an even length.
#[must_use]
pub fn variant_rows(palette: &[Color], expanded: bool) -> (Vec<Color>, Vec<Color>) {
	if expanded {
		debug_assert!(palette.len() % 2 == 0, "expanded palette has an odd length");
		palette.chunks_exact(2).map(|pair| (pair[0], pair[1])).unzip()
	} else {
		palette
			.iter()
			.map(|&color| {
				let [dark, light] = variants::variant_pair(color);
				(dark, light)
			})
			.unzip()
	}
}
