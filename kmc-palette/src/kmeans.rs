//! Provides the implementation for k-means over RGB colors

use crate::{
	distance::{self, ColorSum},
	format, Color,
};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

/// Default maximum number of iterations for each k-means attempt
pub const DEFAULT_MAX_ITER: u32 = 64;

/// Invalid input given to k-means
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum KmeansError {
	/// `k` was `0`
	#[error("the number of clusters must be at least 1")]
	NoClusters,
	/// The slice of colors was empty
	#[error("there are no colors to cluster")]
	NoSamples,
}

/// How a k-means attempt stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
	/// The centroids did not change after an iteration
	Converged,
	/// The maximum number of iterations elapsed before convergence
	MaxIterationsExceeded,
}

/// Result from running k-means
#[derive(Debug, Clone)]
pub struct KmeansResult {
	/// Total variance achieved by these centroids
	///
	/// This is the sum of the variance of each cluster,
	/// so it is only comparable between results with the same `k`.
	pub variance: f64,
	/// Final centroid colors, one per cluster
	pub centroids: Vec<Color>,
	/// Number of pixels in each cluster
	pub counts: Vec<usize>,
	/// The cluster of each input color, by index into `centroids`
	pub assignments: Vec<u8>,
	/// Number of elapsed iterations
	pub iterations: u32,
	/// Whether the attempt converged
	pub termination: Termination,
}

impl KmeansResult {
	/// Build a result from final centroids and the assignments computed against them
	fn new(
		colors: &[Color],
		centroids: Vec<Color>,
		assignments: Vec<u8>,
		iterations: u32,
		termination: Termination,
	) -> Self {
		let mut counts = vec![0; centroids.len()];
		let mut squared_sums = vec![0.0; centroids.len()];
		for (&color, &center) in colors.iter().zip(&assignments) {
			let i = usize::from(center);
			counts[i] += 1;
			squared_sums[i] += distance::squared_distance(color, centroids[i]);
		}

		// cluster sizes are far below 2^52
		#[allow(clippy::cast_precision_loss)]
		let variance = squared_sums
			.iter()
			.zip(&counts)
			.map(|(&sum, &n)| if n == 0 { 0.0 } else { sum / n as f64 })
			.sum();

		Self {
			variance,
			centroids,
			counts,
			assignments,
			iterations,
			termination,
		}
	}

	/// Group the colors that k-means was run on by their cluster
	///
	/// `colors` must be the same slice that produced this result.
	#[must_use]
	pub fn clusters(&self, colors: &[Color]) -> Vec<Vec<Color>> {
		let mut clusters = self.counts.iter().map(|&n| Vec::with_capacity(n)).collect::<Vec<_>>();
		for (&color, &center) in colors.iter().zip(&self.assignments) {
			clusters[usize::from(center)].push(color);
		}
		clusters
	}
}

/// Ensure there is something to cluster
const fn check_input(colors: &[Color], k: u8) -> Result<(), KmeansError> {
	if k == 0 {
		Err(KmeansError::NoClusters)
	} else if colors.is_empty() {
		Err(KmeansError::NoSamples)
	} else {
		Ok(())
	}
}

/// Choose `k` starting centroids uniformly at random, with replacement
fn random_centroids(k: u8, rng: &mut impl Rng, colors: &[Color]) -> Vec<Color> {
	(0..k).map(|_| colors[rng.gen_range(0..colors.len())]).collect()
}

/// Assign each color to its nearest centroid, preferring the lowest index on ties
fn update_assignments(colors: &[Color], centroids: &[Color], assignments: &mut [u8]) {
	for (&color, center) in colors.iter().zip(assignments) {
		let nearest = distance::argmin(centroids.iter().map(|&centroid| distance::distance(color, centroid)))
			.unwrap_or_default();

		// nearest < centroids.len() <= u8::MAX
		#[allow(clippy::cast_possible_truncation)]
		{
			*center = nearest as u8;
		}
	}
}

/// Compute the mean of each cluster, giving black for empty clusters
fn cluster_means(colors: &[Color], assignments: &[u8], k: usize) -> Vec<Color> {
	let mut sums = vec![ColorSum::default(); k];
	for (&color, &center) in colors.iter().zip(assignments) {
		sums[usize::from(center)].add(color);
	}
	sums.iter().map(ColorSum::mean).collect()
}

/// Run a single attempt of k-means
fn kmeans(colors: &[Color], k: u8, max_iter: u32, rng: &mut impl Rng) -> KmeansResult {
	let mut centroids = random_centroids(k, rng, colors);
	let mut assignments = vec![0; colors.len()];

	log::debug!("Initial centroids: {}", format::hex_list(&centroids));

	for iteration in 0..max_iter {
		update_assignments(colors, &centroids, &mut assignments);
		let means = cluster_means(colors, &assignments, usize::from(k));

		log::trace!("[{iteration}] means: {}", format::hex_list(&means));

		if means == centroids {
			log::debug!("Converged after {} iterations", iteration + 1);
			return KmeansResult::new(colors, means, assignments, iteration + 1, Termination::Converged);
		}

		centroids = means;
	}

	log::debug!("Did not converge within {max_iter} iterations");

	// the loop only assigned colors to the previous centroids
	update_assignments(colors, &centroids, &mut assignments);
	KmeansResult::new(colors, centroids, assignments, max_iter, Termination::MaxIterationsExceeded)
}

/// Run a single attempt of k-means using the given random number generator for the starting centroids
///
/// # Errors
/// Returns an error if `k` is `0` or `colors` is empty.
pub fn cluster(colors: &[Color], k: u8, max_iter: u32, rng: &mut impl Rng) -> Result<KmeansResult, KmeansError> {
	check_input(colors, k)?;
	Ok(kmeans(colors, k, max_iter, rng))
}

/// Keep the result with the lowest variance, preferring earlier results on ties
fn select_best(baseline: KmeansResult, others: impl IntoIterator<Item = KmeansResult>) -> KmeansResult {
	others.into_iter().fold(baseline, |best, result| {
		log::debug!("Attempt variance: {} (best so far: {})", result.variance, best.variance);
		if result.variance < best.variance {
			result
		} else {
			best
		}
	})
}

/// Run one baseline attempt of k-means followed by `attempts` more, taking the one with the lowest variance.
///
/// Every attempt draws its starting centroids from `rng`, one after another.
///
/// # Errors
/// Returns an error if `k` is `0` or `colors` is empty.
pub fn run_with_rng(
	colors: &[Color],
	k: u8,
	attempts: u32,
	max_iter: u32,
	rng: &mut impl Rng,
) -> Result<KmeansResult, KmeansError> {
	check_input(colors, k)?;
	let baseline = kmeans(colors, k, max_iter, rng);
	Ok(select_best(baseline, (0..attempts).map(|_| kmeans(colors, k, max_iter, &mut *rng))))
}

/// Run attempt number `i` with its own generator derived from `seed`
fn seeded_attempt(colors: &[Color], k: u8, max_iter: u32, seed: u64, i: u32) -> KmeansResult {
	let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed ^ u64::from(i));
	kmeans(colors, k, max_iter, &mut rng)
}

/// Run one baseline attempt of k-means followed by `attempts` more, taking the one with the lowest variance.
///
/// Attempt `i` (the baseline being `0`) is seeded with `seed ^ i`,
/// so the same arguments always give the same result,
/// and raising `attempts` can never give a result with a higher variance.
///
/// # Errors
/// Returns an error if `k` is `0` or `colors` is empty.
#[cfg(not(feature = "threads"))]
pub fn run(colors: &[Color], k: u8, attempts: u32, max_iter: u32, seed: u64) -> Result<KmeansResult, KmeansError> {
	check_input(colors, k)?;
	let baseline = seeded_attempt(colors, k, max_iter, seed, 0);
	Ok(select_best(
		baseline,
		(1..=attempts).map(|i| seeded_attempt(colors, k, max_iter, seed, i)),
	))
}

/// Run one baseline attempt of k-means followed by `attempts` more, taking the one with the lowest variance.
///
/// Attempt `i` (the baseline being `0`) is seeded with `seed ^ i`,
/// so the same arguments always give the same result,
/// and raising `attempts` can never give a result with a higher variance.
///
/// The additional attempts are run in parallel, but they are compared in order afterwards.
///
/// # Errors
/// Returns an error if `k` is `0` or `colors` is empty.
#[cfg(feature = "threads")]
pub fn run(colors: &[Color], k: u8, attempts: u32, max_iter: u32, seed: u64) -> Result<KmeansResult, KmeansError> {
	use rayon::prelude::*;

	check_input(colors, k)?;
	let baseline = seeded_attempt(colors, k, max_iter, seed, 0);
	let others = (1..=attempts)
		.into_par_iter()
		.map(|i| seeded_attempt(colors, k, max_iter, seed, i))
		.collect::<Vec<_>>();

	Ok(select_best(baseline, others))
}
