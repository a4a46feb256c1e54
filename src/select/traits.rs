//! Selection traits.

use crate::error::Result;
use ndarray::ArrayView2;

/// A clustering procedure treated as a black box.
///
/// Given a data matrix and a number of clusters `k`, returns one label in
/// `[0, k)` per row. Any `Fn(ArrayView2<f64>, usize) -> Result<Vec<usize>>`
/// is a `Clusterer`; see [`from_fn`] for closures.
pub trait Clusterer {
    /// Assign every row of `data` to one of `k` clusters.
    fn assign(&self, data: ArrayView2<'_, f64>, k: usize) -> Result<Vec<usize>>;
}

impl<F> Clusterer for F
where
    F: Fn(ArrayView2<'_, f64>, usize) -> Result<Vec<usize>>,
{
    fn assign(&self, data: ArrayView2<'_, f64>, k: usize) -> Result<Vec<usize>> {
        self(data, k)
    }
}

/// Pin a closure to the [`Clusterer`] signature.
///
/// Closures passed straight to a generic `C: Clusterer` parameter cannot
/// infer their argument types; routing them through here fixes that.
///
/// ```rust
/// use kselect::select::{from_fn, Clusterer};
/// use ndarray::array;
///
/// let by_sign = from_fn(|data, _k| {
///     Ok(data.rows().into_iter().map(|r| usize::from(r[0] > 0.0)).collect())
/// });
/// let data = array![[-1.0], [2.0]];
/// assert_eq!(by_sign.assign(data.view(), 2).unwrap(), vec![0, 1]);
/// ```
pub fn from_fn<F>(f: F) -> F
where
    F: Fn(ArrayView2<'_, f64>, usize) -> Result<Vec<usize>>,
{
    f
}

/// Score of one candidate number of clusters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KScore {
    /// Candidate number of clusters.
    pub k: usize,
    /// Heuristic-specific score; higher is better.
    pub score: f64,
}

/// Trait for heuristics that choose the number of clusters.
pub trait KSelector {
    /// Score every candidate k.
    ///
    /// Returns one entry per scanned k, in increasing order of k.
    fn scores<C: Clusterer + ?Sized>(
        &self,
        data: ArrayView2<'_, f64>,
        clusterer: &C,
    ) -> Result<Vec<KScore>>;

    /// Choose the number of clusters.
    fn select_k<C: Clusterer + ?Sized>(
        &self,
        data: ArrayView2<'_, f64>,
        clusterer: &C,
    ) -> Result<usize>;
}
