//! Generate a color palette from an image by performing k-means clustering on its RGB pixels.

#![deny(unsafe_code, unsafe_op_in_unsafe_fn)]
#![warn(
    clippy::pedantic,
    clippy::cargo,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used,
    clippy::unwrap_in_result,
    clippy::unneeded_field_pattern,
    clippy::rest_pat_in_fully_bound_structs,
    clippy::unnecessary_self_imports,
    clippy::str_to_string,
    clippy::string_to_string,
    clippy::string_slice,
    missing_docs,
    clippy::missing_docs_in_private_items,
    rustdoc::all,
    clippy::float_cmp_const,
    clippy::lossy_float_literal
)]
#![allow(clippy::doc_markdown, clippy::module_name_repetitions)]

mod cli;

#[allow(clippy::wildcard_imports)]
use cli::*;

use std::{io, path::Path, process::ExitCode, time::Instant};

use clap::Parser;
use colored::Colorize;
use image::{io::Reader as ImageReader, DynamicImage};
use kmc_palette::{format, kmeans, variants, Color, KmeansError, KmeansResult, Termination};

/// Record the running time of a function and log the elapsed time
macro_rules! time {
    ($name: literal, $func_call: expr) => {{
        let start = Instant::now();
        let result = $func_call;
        log::debug!("{} took {}ms", $name, start.elapsed().as_millis());
        result
    }};
}

/// Width of each color block in the horizontal rows
const ROW_SWATCH_WIDTH: usize = 2;

/// Everything that can stop a palette from being printed
#[derive(Debug, thiserror::Error)]
enum AppError {
    /// Failed to open or read the image file
    #[error("Error opening file: {0}")]
    Open(#[source] io::Error),
    /// Failed to decode the image file
    #[error("Error decoding image: {0}")]
    Decode(#[source] image::ImageError),
    /// The image had nothing to cluster
    #[error("Error generating palette: {0}")]
    Kmeans(#[from] KmeansError),
    /// Failed to install the logger
    #[error("Failed to set the logger: {0}")]
    Logger(#[from] log::SetLoggerError),
    /// Failed to build the thread pool
    #[cfg(feature = "threads")]
    #[error("Failed to build the thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

fn main() -> ExitCode {
    let options = match Options::try_parse() {
        Ok(options) => options,
        Err(e) => {
            if e.print().is_err() {
                return ExitCode::FAILURE;
            }
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    let result = init_logger(options.verbose).and_then(|()| run_generate_and_print_palette(&options));

    // Returning Result<_> uses Debug printing instead of Display
    if let Err(e) = result {
        eprintln!("{}", e.to_string().red());
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Log to stderr, only showing warnings and errors unless `verbose` is set
fn init_logger(verbose: bool) -> Result<(), AppError> {
    use simplelog::{ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode};

    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    let config = ConfigBuilder::new()
        .set_time_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Off)
        .build();

    TermLogger::init(level, config, TerminalMode::Stderr, ColorChoice::Auto)?;
    Ok(())
}

/// Builds a thread pool and then runs `generate_and_print_palette`
#[cfg(feature = "threads")]
fn run_generate_and_print_palette(options: &Options) -> Result<(), AppError> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(usize::from(options.threads))
        .build()?;

    pool.install(|| generate_and_print_palette(options))
}

/// Runs `generate_and_print_palette` on a single thread
#[cfg(not(feature = "threads"))]
fn run_generate_and_print_palette(options: &Options) -> Result<(), AppError> {
    generate_and_print_palette(options)
}

/// Load an image, generate its palette, and print the result using the given options
fn generate_and_print_palette(options: &Options) -> Result<(), AppError> {
    log::info!("Number of clusters set to {}", options.k);
    log::info!("Number of additional attempts set to {}", options.attempts);
    log::info!("Maximum iterations set to {}", options.max_iter);

    // Input
    let image = time!("Image loading", load_image(&options.image))?;
    let image = image.into_rgb8();
    let colors = kmc_palette::samples_from_image(&image);
    log::info!("Pixels fetched: {}", colors.len());

    // Processing
    let seed = options.seed.unwrap_or_else(rand::random);
    log::info!("Using seed {seed}");

    let result = time!(
        "k-means",
        kmeans::run(colors, options.k, options.attempts, options.max_iter, seed)
    )?;
    log_result(&result);

    let palette = post_process(result.centroids, options.skip_variants);

    // Output
    for line in palette_lines(&palette, !options.skip_variants, options.hide_horizontal) {
        println!("{line}");
    }

    Ok(())
}

/// Load the image at the given path
fn load_image(path: &Path) -> Result<DynamicImage, AppError> {
    let reader = ImageReader::open(path)
        .and_then(ImageReader::with_guessed_format)
        .map_err(AppError::Open)?;

    log::info!("Opened file: {}", path.display());

    let image = reader.decode().map_err(AppError::Decode)?;

    log::info!("Decoded image: {}", path.display());

    Ok(image)
}

/// Log how the best k-means attempt went
fn log_result(result: &KmeansResult) {
    match result.termination {
        Termination::Converged => {
            log::info!("Best attempt converged after {} iterations", result.iterations);
        }
        Termination::MaxIterationsExceeded => log::info!(
            "Best attempt did not converge within {} iterations",
            result.iterations
        ),
    }

    log::info!("Best attempt variance: {}", result.variance);

    let empty = result.counts.iter().filter(|&&n| n == 0).count();
    if empty > 0 {
        log::warn!("{empty} cluster(s) ended up empty and will show as black");
    }
}

/// Sort the raw palette by brightness and, unless skipped, add color variants
fn post_process(mut palette: Vec<Color>, skip_variants: bool) -> Vec<Color> {
    log::info!("Palette ready, sorting...");
    variants::sort_by_brightness(&mut palette);

    if skip_variants {
        log::info!("Skipping adding color variations...");
    } else {
        log::info!("Adding color variations...");
        variants::expand_with_variants(&mut palette);
    }

    palette
}

/// The lines to print for a palette
///
/// `expanded` tells whether the palette already contains variant pairs.
fn palette_lines(palette: &[Color], expanded: bool, hide_horizontal: bool) -> Vec<String> {
    let mut lines = vec!["Palette:".bold().to_string()];
    lines.extend(palette.iter().map(|&color| format::palette_line(color)));

    if !hide_horizontal {
        let (darker, lighter) = format::variant_rows(palette, expanded);
        let row = |colors: Vec<Color>| {
            colors
                .into_iter()
                .map(|color| format::swatch(color, ROW_SWATCH_WIDTH))
                .collect::<String>()
        };

        lines.push(String::new());
        lines.push(row(darker));
        lines.push(row(lighter));
    }

    lines
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use std::path::PathBuf;

    fn black_and_white() -> RgbImage {
        RgbImage::from_fn(2, 2, |_, y| {
            if y == 0 {
                Rgb([0, 0, 0])
            } else {
                Rgb([255, 255, 255])
            }
        })
    }

    #[test]
    fn missing_file() {
        let result = load_image(&PathBuf::from("does/not/exist.png"));
        assert!(matches!(result, Err(AppError::Open(_))));
    }

    #[test]
    fn undecodable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.png");
        std::fs::write(&path, b"this is not an image").unwrap();

        let result = load_image(&path);
        assert!(matches!(result, Err(AppError::Decode(_))));
    }

    #[test]
    fn load_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bw.png");
        black_and_white().save(&path).unwrap();

        let image = load_image(&path).unwrap().into_rgb8();
        assert_eq!(image, black_and_white());
    }

    #[test]
    fn post_process_sorts_then_expands() {
        let raw = vec![Color::new(200, 200, 200), Color::new(10, 10, 10)];

        assert_eq!(
            post_process(raw.clone(), true),
            [Color::new(10, 10, 10), Color::new(200, 200, 200)]
        );

        assert_eq!(
            post_process(raw, false),
            [
                Color::new(10, 10, 10),
                Color::new(40, 40, 40),
                Color::new(170, 170, 170),
                Color::new(200, 200, 200),
            ]
        );
    }

    #[test]
    fn palette_lines_layout() {
        let palette = post_process(vec![Color::new(10, 10, 10)], false);

        let lines = palette_lines(&palette, true, false);
        assert_eq!(lines.len(), 1 + 2 + 3);
        assert_eq!(
            lines[1],
            "rgb( 10,  10,  10)   #0a0a0a    \x1b[48;2;10;10;10m    \x1b[0m"
        );
        assert_eq!(lines[3], "");
        assert_eq!(lines[4], "\x1b[48;2;10;10;10m  \x1b[0m");
        assert_eq!(lines[5], "\x1b[48;2;40;40;40m  \x1b[0m");

        let lines = palette_lines(&palette, true, true);
        assert_eq!(lines.len(), 1 + 2);
    }

    #[test]
    fn palette_lines_without_variants() {
        let palette = [Color::new(200, 200, 200)];
        let lines = palette_lines(&palette, false, false);

        assert_eq!(lines.len(), 1 + 1 + 3);
        assert_eq!(lines[3], "\x1b[48;2;170;170;170m  \x1b[0m");
        assert_eq!(lines[4], "\x1b[48;2;200;200;200m  \x1b[0m");
    }

    #[test]
    fn black_and_white_palette() {
        let image = black_and_white();
        let colors = kmc_palette::samples_from_image(&image);
        let result = kmeans::run(colors, 2, 1, 64, 0).unwrap();

        assert_eq!(
            post_process(result.centroids, true),
            [Color::new(0, 0, 0), Color::new(255, 255, 255)]
        );
    }

    #[test]
    fn empty_palette_error_message() {
        let error = AppError::from(KmeansError::NoSamples);
        assert_eq!(
            error.to_string(),
            "Error generating palette: there are no colors to cluster"
        );
    }
}
