//! Specifies the CLI and handles arg parsing

use clap::Parser;
use kmc_palette::{DEFAULT_ATTEMPTS, DEFAULT_K, DEFAULT_MAX_ITER};
use std::path::PathBuf;

/// Generate a color palette for an image by performing k-means clustering on its RGB pixels.
///
/// Each color is printed as an rgb triple, a hex code, and a block of that color.
/// By default, every color is paired with a lighter or darker variant of itself.
#[allow(clippy::struct_excessive_bools)]
#[derive(Parser)]
#[command(version)]
pub struct Options {
    /// The path to the input image
    pub image: PathBuf,

    /// The number of colors to find
    #[arg(short, default_value_t = DEFAULT_K, value_parser = clap::value_parser!(u8).range(1..))]
    pub k: u8,

    /// The number of additional k-means attempts to run after the first one
    ///
    /// k-means can get stuck in a local minimum, so you may want to run a few more attempts to get better results.
    /// The attempt with the lowest variance is picked.
    #[arg(short = 'n', long, default_value_t = DEFAULT_ATTEMPTS)]
    pub attempts: u32,

    /// The maximum number of iterations for each k-means attempt
    ///
    /// You can use the --verbose option to see whether the attempts converged.
    #[arg(short = 'i', long, default_value_t = DEFAULT_MAX_ITER)]
    pub max_iter: u32,

    /// Do not add a lighter or darker variant for each color
    #[arg(long)]
    pub skip_variants: bool,

    /// Do not print the palette as two horizontal rows of color blocks
    #[arg(long)]
    pub hide_horizontal: bool,

    /// The seed value used for the random number generator
    ///
    /// A random seed is used if none is provided.
    #[arg(long)]
    pub seed: Option<u64>,

    /// The number of threads to use for the k-means attempts
    ///
    /// A value of 0 will use the number of available cores.
    #[cfg(feature = "threads")]
    #[arg(short, long, default_value_t = 0)]
    pub threads: u8,

    /// Print additional information, such as the number of k-means iterations
    #[arg(short, long)]
    pub verbose: bool,
}
