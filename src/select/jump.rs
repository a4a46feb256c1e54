//! Distortion jump (Sugar & James, 2003).
//!
//! Rate-distortion view of clustering: transform the distortion with a
//! negative power and look for the largest jump between consecutive k.
//!
//! ```text
//! Y    = d / 2
//! J(k) = D(k)^(-Y) - D(k-1)^(-Y)
//! k*   = argmax J(k)
//! ```
//!
//! `D(1)` is the distortion of the single-cluster assignment. Only
//! non-negative jumps are candidates; if every jump is negative or NaN (all
//! rows identical gives `inf - inf`) the scan fails with
//! [`Error::NoImprovingK`].

use super::scan::{assign_checked, best_score, resolve_k_max};
use super::traits::{Clusterer, KScore, KSelector};
use crate::error::{Error, Result};
use crate::metrics::distortion;
use ndarray::ArrayView2;
use tracing::{debug, instrument};

/// Distortion jump selector.
#[derive(Debug, Clone, Default)]
pub struct DistortionJump {
    /// Largest k scanned; `None` means `n_samples / 2`.
    k_max: Option<usize>,
}

impl DistortionJump {
    /// Create a selector scanning up to `n_samples / 2`.
    pub fn new() -> Self {
        Self { k_max: None }
    }

    /// Set the largest k to scan.
    pub fn with_k_max(mut self, k_max: usize) -> Self {
        self.k_max = Some(k_max);
        self
    }
}

impl KSelector for DistortionJump {
    fn scores<C: Clusterer + ?Sized>(
        &self,
        data: ArrayView2<'_, f64>,
        clusterer: &C,
    ) -> Result<Vec<KScore>> {
        jump_scores(data, clusterer, self.k_max)
    }

    fn select_k<C: Clusterer + ?Sized>(
        &self,
        data: ArrayView2<'_, f64>,
        clusterer: &C,
    ) -> Result<usize> {
        distortion_jump(data, clusterer, self.k_max)
    }
}

/// Choose k with the largest non-negative jump in transformed distortion.
///
/// Ties go to the smallest k.
///
/// # Errors
///
/// [`Error::NoImprovingK`] when no jump in `[2, k_max]` is non-negative.
pub fn distortion_jump<C>(
    data: ArrayView2<'_, f64>,
    clusterer: &C,
    k_max: Option<usize>,
) -> Result<usize>
where
    C: Clusterer + ?Sized,
{
    let scores = jump_scores(data, clusterer, k_max)?;
    let candidates: Vec<KScore> = scores.into_iter().filter(|s| s.score >= 0.0).collect();
    match best_score(&candidates) {
        Some(best) => Ok(best.k),
        None => Err(Error::NoImprovingK {
            k_max: resolve_k_max(data.nrows(), k_max)?,
        }),
    }
}

/// Jump `D(k)^(-d/2) - D(k-1)^(-d/2)` of every k in `[2, k_max]`.
#[instrument(level = "debug", skip_all, fields(n_samples = data.nrows(), n_features = data.ncols()))]
pub fn jump_scores<C>(
    data: ArrayView2<'_, f64>,
    clusterer: &C,
    k_max: Option<usize>,
) -> Result<Vec<KScore>>
where
    C: Clusterer + ?Sized,
{
    let k_max = resolve_k_max(data.nrows(), k_max)?;
    let y = -(data.ncols() as f64) / 2.0;

    let mut previous = distortion(data, &vec![0; data.nrows()])?.powf(y);
    let mut scores = Vec::with_capacity(k_max - 1);
    for k in 2..=k_max {
        let labels = assign_checked(clusterer, data, k)?;
        let current = distortion(data, &labels)?.powf(y);
        let jump = current - previous;
        debug!(k, transformed = current, jump, "distortion jump");
        scores.push(KScore { k, score: jump });
        previous = current;
    }
    Ok(scores)
}
