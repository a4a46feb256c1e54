//! Maximum mean silhouette.
//!
//! Scores each k by [`calc_silhouettes`] on the clusterer's output and keeps
//! the best. Because the centroid silhouette gives singletons a perfect
//! score, keep `k_max` well below the number of rows.

use super::scan::{assign_checked, best_score, resolve_k_max};
use super::traits::{Clusterer, KScore, KSelector};
use crate::error::{Error, Result};
use crate::metrics::calc_silhouettes;
use ndarray::ArrayView2;
use tracing::{debug, instrument};

/// Maximum silhouette selector.
#[derive(Debug, Clone, Default)]
pub struct MaxSilhouette {
    /// Largest k scanned; `None` means `n_samples / 2`.
    k_max: Option<usize>,
}

impl MaxSilhouette {
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

impl KSelector for MaxSilhouette {
    fn scores<C: Clusterer + ?Sized>(
        &self,
        data: ArrayView2<'_, f64>,
        clusterer: &C,
    ) -> Result<Vec<KScore>> {
        silhouette_scores(data, clusterer, self.k_max)
    }

    fn select_k<C: Clusterer + ?Sized>(
        &self,
        data: ArrayView2<'_, f64>,
        clusterer: &C,
    ) -> Result<usize> {
        max_silhouette(data, clusterer, self.k_max)
    }
}

/// Choose k in `[2, k_max]` with the highest mean silhouette.
///
/// Ties go to the smallest k.
pub fn max_silhouette<C>(
    data: ArrayView2<'_, f64>,
    clusterer: &C,
    k_max: Option<usize>,
) -> Result<usize>
where
    C: Clusterer + ?Sized,
{
    let scores = silhouette_scores(data, clusterer, k_max)?;
    best_score(&scores)
        .map(|best| best.k)
        .ok_or_else(|| Error::Other("no finite silhouette score".to_string()))
}

/// Mean silhouette of every k in `[2, k_max]`.
#[instrument(level = "debug", skip_all, fields(n_samples = data.nrows()))]
pub fn silhouette_scores<C>(
    data: ArrayView2<'_, f64>,
    clusterer: &C,
    k_max: Option<usize>,
) -> Result<Vec<KScore>>
where
    C: Clusterer + ?Sized,
{
    let k_max = resolve_k_max(data.nrows(), k_max)?;

    let mut scores = Vec::with_capacity(k_max - 1);
    for k in 2..=k_max {
        let labels = assign_checked(clusterer, data, k)?;
        let score = calc_silhouettes(data, &labels)?;
        debug!(k, score, "silhouette");
        scores.push(KScore { k, score });
    }
    Ok(scores)
}
