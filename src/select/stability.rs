//! Resampling stability (Ben-Hur, Elisseeff & Guyon, 2002).
//!
//! A good k is one the clusterer reproduces when the data is perturbed.
//!
//! # One Draw
//!
//! 1. Draw two masks A and B over the rows; every row enters each mask
//!    independently with probability `prop_subset`. The subsets have random
//!    sizes and overlap.
//! 2. Cluster A and B separately with k clusters.
//! 3. Restrict both co-membership matrices to the rows present in both
//!    subsets, and compare them with the cosine similarity:
//!
//! ```text
//! s = <M_A, M_B> / (||M_A|| ||M_B||)
//! ```
//!
//! `s` is 1 when both clusterings agree on every common pair. The score of k
//! is the mean of `s` over `nb_draw` draws.
//!
//! # Failure Modes
//!
//! - **Subset too small**: with small `prop_subset` a subset may hold fewer
//!   than k rows; the clusterer's error is returned as-is.
//! - **No overlap**: a draw whose two subsets share no row fails the whole
//!   scan with [`Error::EmptySubsample`]. Per draw this happens with
//!   probability `(1 - p²)ⁿ`; over `nb_draw` draws per k it adds up fast on
//!   tiny inputs (n = 4 with the defaults fails for most seeds). Use at
//!   least a few dozen rows, or raise `prop_subset`.
//! - **Trivial stability**: k = 2 on data with no structure can still look
//!   stable; compare against [`gap_statistic`](super::gap_statistic).

use super::scan::{assign_checked, best_score, check_nb_draw, resolve_k_max, seeded_rng};
use super::traits::{Clusterer, KScore, KSelector};
use crate::error::{Error, Result};
use crate::metrics::adjacency_matrix;
use ndarray::{ArrayView2, Axis};
use rand::Rng;
use tracing::{debug, instrument, trace};

/// Resampling stability selector.
///
/// Any draw whose subsets share no row aborts the scan with
/// [`Error::EmptySubsample`]; on very small inputs (around ten rows or
/// fewer with the default 100 draws) expect this to be common.
///
/// ```rust
/// use kselect::select::{from_fn, KSelector, Stability};
/// use ndarray::array;
///
/// let data = array![[0.0], [0.1], [0.2], [0.3], [0.4], [9.0], [9.1], [9.2], [9.3], [9.4]];
/// let threshold = from_fn(|x, _k| {
///     Ok(x.rows().into_iter().map(|r| usize::from(r[0] > 5.0)).collect())
/// });
///
/// // The split ignores k, so every k is perfectly stable; ties go to 2
/// let k = Stability::new()
///     .with_k_max(3)
///     .with_nb_draw(10)
///     .with_seed(1)
///     .select_k(data.view(), &threshold)
///     .unwrap();
/// assert_eq!(k, 2);
/// ```
#[derive(Debug, Clone)]
pub struct Stability {
    /// Largest k scanned; `None` means `n_samples / 2`.
    k_max: Option<usize>,
    /// Resampling draws per k.
    nb_draw: usize,
    /// Inclusion probability of each row in each subset.
    prop_subset: f64,
    /// Random seed.
    seed: Option<u64>,
}

impl Stability {
    /// Create a selector with 100 draws and 80% subsets.
    pub fn new() -> Self {
        Self {
            k_max: None,
            nb_draw: 100,
            prop_subset: 0.8,
            seed: None,
        }
    }

    /// Set the largest k to scan.
    pub fn with_k_max(mut self, k_max: usize) -> Self {
        self.k_max = Some(k_max);
        self
    }

    /// Set the number of resampling draws per k.
    pub fn with_nb_draw(mut self, nb_draw: usize) -> Self {
        self.nb_draw = nb_draw;
        self
    }

    /// Set the inclusion probability of each row, in (0, 1).
    pub fn with_prop_subset(mut self, prop_subset: f64) -> Self {
        self.prop_subset = prop_subset;
        self
    }

    /// Set random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

impl Default for Stability {
    fn default() -> Self {
        Self::new()
    }
}

impl KSelector for Stability {
    fn scores<C: Clusterer + ?Sized>(
        &self,
        data: ArrayView2<'_, f64>,
        clusterer: &C,
    ) -> Result<Vec<KScore>> {
        let mut rng = seeded_rng(self.seed);
        stability_scores(
            data,
            clusterer,
            self.k_max,
            self.nb_draw,
            self.prop_subset,
            &mut rng,
        )
    }

    fn select_k<C: Clusterer + ?Sized>(
        &self,
        data: ArrayView2<'_, f64>,
        clusterer: &C,
    ) -> Result<usize> {
        let mut rng = seeded_rng(self.seed);
        stability(
            data,
            clusterer,
            self.k_max,
            self.nb_draw,
            self.prop_subset,
            &mut rng,
        )
    }
}

/// Choose k maximizing the mean resampling stability over `[2, k_max]`.
///
/// Ties go to the smallest k.
pub fn stability<C, R>(
    data: ArrayView2<'_, f64>,
    clusterer: &C,
    k_max: Option<usize>,
    nb_draw: usize,
    prop_subset: f64,
    rng: &mut R,
) -> Result<usize>
where
    C: Clusterer + ?Sized,
    R: Rng,
{
    let scores = stability_scores(data, clusterer, k_max, nb_draw, prop_subset, rng)?;
    best_score(&scores)
        .map(|best| best.k)
        .ok_or_else(|| Error::Other("no finite stability score".to_string()))
}

/// Mean resampling stability of every k in `[2, k_max]`.
#[instrument(level = "debug", skip_all, fields(n_samples = data.nrows(), nb_draw = nb_draw, prop_subset = prop_subset))]
pub fn stability_scores<C, R>(
    data: ArrayView2<'_, f64>,
    clusterer: &C,
    k_max: Option<usize>,
    nb_draw: usize,
    prop_subset: f64,
    rng: &mut R,
) -> Result<Vec<KScore>>
where
    C: Clusterer + ?Sized,
    R: Rng,
{
    let k_max = resolve_k_max(data.nrows(), k_max)?;
    check_nb_draw(nb_draw)?;
    if !(prop_subset > 0.0 && prop_subset < 1.0) {
        return Err(Error::InvalidParameter {
            name: "prop_subset",
            message: "must lie in (0, 1)",
        });
    }

    let mut scores = Vec::with_capacity(k_max - 1);
    for k in 2..=k_max {
        let mut total = 0.0;
        for draw in 0..nb_draw {
            let s = one_stability_measure(data, clusterer, k, prop_subset, rng)?;
            trace!(k, draw, score = s, "stability draw");
            total += s;
        }
        let score = total / nb_draw as f64;
        debug!(k, score, "stability");
        scores.push(KScore { k, score });
    }
    Ok(scores)
}

/// One draw: agreement of two overlapping subsets' clusterings, in [-1, 1].
pub(crate) fn one_stability_measure<C, R>(
    data: ArrayView2<'_, f64>,
    clusterer: &C,
    k: usize,
    prop_subset: f64,
    rng: &mut R,
) -> Result<f64>
where
    C: Clusterer + ?Sized,
    R: Rng,
{
    let n = data.nrows();
    let in_a: Vec<bool> = (0..n).map(|_| rng.random::<f64>() < prop_subset).collect();
    let in_b: Vec<bool> = (0..n).map(|_| rng.random::<f64>() < prop_subset).collect();

    // Common rows, indexed by their position inside each subset
    let mut rows_a = Vec::new();
    let mut rows_b = Vec::new();
    let mut common_a = Vec::new();
    let mut common_b = Vec::new();
    for (i, (&a, &b)) in in_a.iter().zip(&in_b).enumerate() {
        if a && b {
            common_a.push(rows_a.len());
            common_b.push(rows_b.len());
        }
        if a {
            rows_a.push(i);
        }
        if b {
            rows_b.push(i);
        }
    }
    if common_a.is_empty() {
        return Err(Error::EmptySubsample);
    }

    let subset_a = data.select(Axis(0), &rows_a);
    let subset_b = data.select(Axis(0), &rows_b);
    let labels_a = assign_checked(clusterer, subset_a.view(), k)?;
    let labels_b = assign_checked(clusterer, subset_b.view(), k)?;

    let adj_a = adjacency_matrix(&labels_a)
        .select(Axis(0), &common_a)
        .select(Axis(1), &common_a);
    let adj_b = adjacency_matrix(&labels_b)
        .select(Axis(0), &common_b)
        .select(Axis(1), &common_b);

    // Entries are 0/1, so every sum below is an exact integer and identical
    // matrices score exactly 1
    let dot: f64 = adj_a.iter().zip(adj_b.iter()).map(|(x, y)| x * y).sum();
    let sq_a: f64 = adj_a.iter().map(|x| x * x).sum();
    let sq_b: f64 = adj_b.iter().map(|x| x * x).sum();
    Ok(dot / (sq_a * sq_b).sqrt())
}
