//! Gap statistic (Tibshirani, Walther & Hastie, 2001).
//!
//! Compares the distortion of the clustered data with the distortion the
//! same clusterer reaches on structureless data of the same shape:
//!
//! ```text
//! Gap(k) = log E[D_null(k)] - log D_real(k)
//! ```
//!
//! The null model here is the standard normal distribution (centered and
//! reduced data), sampled `nb_draw` times per k. A large gap means the real
//! data clusters much better with k groups than noise does.
//!
//! # Degenerate Answer
//!
//! The running best starts at gap 0 with k = 1, so if no k in `[2, k_max]`
//! produces a strictly positive gap the selector answers 1 ("no cluster
//! structure"). This is the only heuristic in the crate that can return 1.

use super::scan::{assign_checked, check_nb_draw, resolve_k_max, seeded_rng};
use super::traits::{Clusterer, KScore, KSelector};
use crate::error::Result;
use crate::metrics::distortion;
use ndarray::{Array2, ArrayView2};
use rand::Rng;
use rand_distr::StandardNormal;
use tracing::{debug, instrument, warn};

/// Gap statistic selector.
#[derive(Debug, Clone)]
pub struct GapStatistic {
    /// Largest k scanned; `None` means `n_samples / 2`.
    k_max: Option<usize>,
    /// Null datasets drawn per k.
    nb_draw: usize,
    /// Random seed.
    seed: Option<u64>,
}

impl GapStatistic {
    /// Create a selector with 100 null draws per k.
    pub fn new() -> Self {
        Self {
            k_max: None,
            nb_draw: 100,
            seed: None,
        }
    }

    /// Set the largest k to scan.
    pub fn with_k_max(mut self, k_max: usize) -> Self {
        self.k_max = Some(k_max);
        self
    }

    /// Set the number of null datasets per k.
    pub fn with_nb_draw(mut self, nb_draw: usize) -> Self {
        self.nb_draw = nb_draw;
        self
    }

    /// Set random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

impl Default for GapStatistic {
    fn default() -> Self {
        Self::new()
    }
}

impl KSelector for GapStatistic {
    fn scores<C: Clusterer + ?Sized>(
        &self,
        data: ArrayView2<'_, f64>,
        clusterer: &C,
    ) -> Result<Vec<KScore>> {
        let mut rng = seeded_rng(self.seed);
        gap_scores(data, clusterer, self.k_max, self.nb_draw, &mut rng)
    }

    fn select_k<C: Clusterer + ?Sized>(
        &self,
        data: ArrayView2<'_, f64>,
        clusterer: &C,
    ) -> Result<usize> {
        let mut rng = seeded_rng(self.seed);
        gap_statistic(data, clusterer, self.k_max, self.nb_draw, &mut rng)
    }
}

/// Mean distortion of the clusterer on `nb_draw` standard normal datasets.
///
/// Each dataset has shape `shape = (n_samples, n_features)` and is filled
/// row-major from `rng`.
pub fn normal_distortion<C, R>(
    shape: (usize, usize),
    clusterer: &C,
    k: usize,
    nb_draw: usize,
    rng: &mut R,
) -> Result<f64>
where
    C: Clusterer + ?Sized,
    R: Rng,
{
    check_nb_draw(nb_draw)?;

    let mut total = 0.0;
    for _ in 0..nb_draw {
        let null = Array2::from_shape_simple_fn(shape, || rng.sample::<f64, _>(StandardNormal));
        let labels = assign_checked(clusterer, null.view(), k)?;
        total += distortion(null.view(), &labels)?;
    }
    Ok(total / nb_draw as f64)
}

/// Choose k by the gap statistic over `[2, k_max]`.
///
/// Returns 1 when no gap is strictly positive. Ties go to the smallest k.
pub fn gap_statistic<C, R>(
    data: ArrayView2<'_, f64>,
    clusterer: &C,
    k_max: Option<usize>,
    nb_draw: usize,
    rng: &mut R,
) -> Result<usize>
where
    C: Clusterer + ?Sized,
    R: Rng,
{
    let scores = gap_scores(data, clusterer, k_max, nb_draw, rng)?;

    let mut k_star = 1;
    let mut best_gap = 0.0;
    for s in &scores {
        if s.score > best_gap {
            k_star = s.k;
            best_gap = s.score;
        }
    }
    if k_star == 1 {
        warn!("no positive gap; data shows no cluster structure");
    }
    Ok(k_star)
}

/// Gap value of every k in `[2, k_max]`.
#[instrument(level = "debug", skip_all, fields(n_samples = data.nrows(), nb_draw = nb_draw))]
pub fn gap_scores<C, R>(
    data: ArrayView2<'_, f64>,
    clusterer: &C,
    k_max: Option<usize>,
    nb_draw: usize,
    rng: &mut R,
) -> Result<Vec<KScore>>
where
    C: Clusterer + ?Sized,
    R: Rng,
{
    let k_max = resolve_k_max(data.nrows(), k_max)?;
    check_nb_draw(nb_draw)?;

    let mut scores = Vec::with_capacity(k_max - 1);
    for k in 2..=k_max {
        let labels = assign_checked(clusterer, data, k)?;
        let real = distortion(data, &labels)?;
        let expected = normal_distortion(data.dim(), clusterer, k, nb_draw, rng)?;
        let gap = expected.ln() - real.ln();
        debug!(k, real, expected, gap, "gap statistic");
        scores.push(KScore { k, score: gap });
    }
    Ok(scores)
}
