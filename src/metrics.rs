//! Partition scores shared by the selection heuristics.
//!
//! Every function here takes a data matrix and an assignment vector produced
//! for exactly those rows, and summarizes the partition with one number (or,
//! for [`adjacency_matrix`], with the co-membership matrix itself).
//!
//! # Scores Overview
//!
//! | Function | Range | Used by |
//! |----------|-------|---------|
//! | [`adjacency_matrix`] | {0, 1}ⁿˣⁿ | stability |
//! | [`distortion`] | [0, ∞) | gap statistic, distortion jump |
//! | [`calc_silhouettes`] | [-1, 1] | max silhouette |
//!
//! # Centroid Silhouette
//!
//! [`calc_silhouettes`] is the centroid variant of the silhouette: instead of
//! average pairwise distances it compares the squared distance to the point's
//! own centroid with the squared distance to the nearest foreign centroid:
//!
//! ```text
//! s(i) = (b(i) - a(i)) / max(a(i), b(i))
//! ```
//!
//! This is O(n·k·d) instead of O(n²·d), at the price of favouring
//! singleton clusters (a singleton always scores 1).
//!
//! # Example
//!
//! ```rust
//! use kselect::metrics::{distortion, calc_silhouettes};
//! use ndarray::array;
//!
//! let data = array![[0.0, 0.0], [0.0, 1.0], [10.0, 0.0], [10.0, 1.0]];
//! let labels = [0, 0, 1, 1];
//!
//! // Each point is 0.5 away from its centroid: 4 * 0.25 / 2 features
//! assert!((distortion(data.view(), &labels).unwrap() - 0.5).abs() < 1e-12);
//! assert!(calc_silhouettes(data.view(), &labels).unwrap() > 0.99);
//! ```

use crate::error::{Error, Result};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use std::collections::BTreeMap;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Mean feature vector of each populated cluster, keyed by label.
pub type Centroids = BTreeMap<usize, Array1<f64>>;

/// Co-membership matrix of an assignment.
///
/// Entry `(i, j)` is `1.0` when `labels[i] == labels[j]` and `0.0` otherwise.
/// The result is symmetric with a unit diagonal.
///
/// O(n²) in time and memory; intended for resampled subsets.
///
/// ```rust
/// use kselect::metrics::adjacency_matrix;
///
/// let adj = adjacency_matrix(&[0, 1, 0]);
/// assert_eq!(adj[[0, 2]], 1.0);
/// assert_eq!(adj[[0, 1]], 0.0);
/// ```
pub fn adjacency_matrix(labels: &[usize]) -> Array2<f64> {
    let n = labels.len();
    let mut adj = Array2::zeros((n, n));
    for (i, &a) in labels.iter().enumerate() {
        for (j, &b) in labels.iter().enumerate().skip(i) {
            let linked = if a == b { 1.0 } else { 0.0 };
            adj[[i, j]] = linked;
            adj[[j, i]] = linked;
        }
    }
    adj
}

/// Centroid of every label that has at least one row.
///
/// Labels with no rows are simply absent from the mapping.
pub fn centroids(data: ArrayView2<'_, f64>, labels: &[usize]) -> Result<Centroids> {
    check_inputs(data, labels)?;

    let d = data.ncols();
    let mut sums: BTreeMap<usize, (Array1<f64>, usize)> = BTreeMap::new();
    for (row, &label) in data.rows().into_iter().zip(labels) {
        let (sum, count) = sums
            .entry(label)
            .or_insert_with(|| (Array1::zeros(d), 0));
        *sum += &row;
        *count += 1;
    }

    Ok(sums
        .into_iter()
        .map(|(label, (sum, count))| (label, sum / count as f64))
        .collect())
}

/// Within-cluster squared distance to the centroid, divided by the feature count.
///
/// ```text
/// D = (1/d) Σᵢ ||xᵢ - c(xᵢ)||²
/// ```
///
/// A single-label assignment (all zeros) is valid and gives the total
/// variance of the data; a partition into singletons gives exactly `0`.
pub fn distortion(data: ArrayView2<'_, f64>, labels: &[usize]) -> Result<f64> {
    let centers = centroids(data, labels)?;

    #[cfg(feature = "parallel")]
    let inertia: f64 = (0..data.nrows())
        .into_par_iter()
        .map(|i| squared_distance(data.row(i), centers[&labels[i]].view()))
        .sum();

    #[cfg(not(feature = "parallel"))]
    let inertia: f64 = data
        .rows()
        .into_iter()
        .zip(labels)
        .map(|(row, label)| squared_distance(row, centers[label].view()))
        .sum();

    Ok(inertia / data.ncols() as f64)
}

/// Mean centroid silhouette of an assignment.
///
/// For each point, `a` is the squared distance to its own centroid and `b`
/// the smallest squared distance to any other centroid. The point scores
/// `(b - a) / max(a, b)`, with the denominator replaced by `1` when both are
/// zero. Returns the mean over all points, in `[-1, 1]`.
///
/// # Errors
///
/// [`Error::InsufficientClusters`] when fewer than two labels are populated.
pub fn calc_silhouettes(data: ArrayView2<'_, f64>, labels: &[usize]) -> Result<f64> {
    let centers = centroids(data, labels)?;
    if centers.len() < 2 {
        return Err(Error::InsufficientClusters {
            required: 2,
            found: centers.len(),
        });
    }

    #[cfg(feature = "parallel")]
    let total: f64 = (0..data.nrows())
        .into_par_iter()
        .map(|i| point_silhouette(data.row(i), labels[i], &centers))
        .sum();

    #[cfg(not(feature = "parallel"))]
    let total: f64 = data
        .rows()
        .into_iter()
        .zip(labels)
        .map(|(row, &label)| point_silhouette(row, label, &centers))
        .sum();

    Ok(total / data.nrows() as f64)
}

fn point_silhouette(point: ArrayView1<'_, f64>, label: usize, centers: &Centroids) -> f64 {
    let intra = squared_distance(point, centers[&label].view());
    let extra = centers
        .iter()
        .filter(|(other, _)| **other != label)
        .map(|(_, c)| squared_distance(point, c.view()))
        .fold(f64::INFINITY, f64::min);

    let denom = intra.max(extra);
    let denom = if denom == 0.0 { 1.0 } else { denom };
    (extra - intra) / denom
}

/// Squared Euclidean distance.
pub(crate) fn squared_distance(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y).powi(2)).sum()
}

fn check_inputs(data: ArrayView2<'_, f64>, labels: &[usize]) -> Result<()> {
    if data.nrows() == 0 || data.ncols() == 0 {
        return Err(Error::EmptyInput);
    }
    if labels.len() != data.nrows() {
        return Err(Error::LabelCountMismatch {
            expected: data.nrows(),
            found: labels.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use proptest::prelude::*;

    #[test]
    fn test_adjacency_small() {
        let adj = adjacency_matrix(&[2, 0, 2, 1]);
        let expected = array![
            [1.0, 0.0, 1.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [1.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ];
        assert_eq!(adj, expected);
    }

    #[test]
    fn test_centroids_skip_empty_labels() {
        let data = array![[0.0, 0.0], [2.0, 2.0], [10.0, 0.0]];
        let centers = centroids(data.view(), &[0, 0, 3]).unwrap();

        assert_eq!(centers.len(), 2);
        assert_eq!(centers[&0], array![1.0, 1.0]);
        assert_eq!(centers[&3], array![10.0, 0.0]);
    }

    #[test]
    fn test_distortion_single_cluster_is_variance() {
        // Centroid (1, 0); squared distances 1 + 1 = 2; two features
        let data = array![[0.0, 0.0], [2.0, 0.0]];
        let d = distortion(data.view(), &[0, 0]).unwrap();
        assert!((d - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_distortion_identity_clustering_is_zero() {
        let data = array![[0.3, -1.0, 2.0], [5.0, 5.0, 5.0], [-7.5, 0.0, 1.0]];
        let d = distortion(data.view(), &[0, 1, 2]).unwrap();
        assert_eq!(d, 0.0);
    }

    #[test]
    fn test_distortion_label_count_mismatch() {
        let data = array![[0.0], [1.0]];
        let result = distortion(data.view(), &[0]);
        assert_eq!(
            result,
            Err(Error::LabelCountMismatch {
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn test_distortion_empty_input_error() {
        let data = Array2::<f64>::zeros((0, 2));
        assert_eq!(distortion(data.view(), &[]), Err(Error::EmptyInput));
    }

    #[test]
    fn test_silhouette_two_pairs() {
        // a = 0.25, b = 100.25 for every point
        let data = array![[0.0, 0.0], [0.0, 1.0], [10.0, 0.0], [10.0, 1.0]];
        let s = calc_silhouettes(data.view(), &[0, 0, 1, 1]).unwrap();
        assert!((s - 100.0 / 100.25).abs() < 1e-12);
    }

    #[test]
    fn test_silhouette_coincident_points() {
        // Both centroids coincide with every point: 0 / 1 = 0
        let data = array![[1.0, 1.0], [1.0, 1.0]];
        let s = calc_silhouettes(data.view(), &[0, 1]).unwrap();
        assert_eq!(s, 0.0);
    }

    #[test]
    fn test_silhouette_single_cluster_error() {
        let data = array![[0.0], [1.0], [2.0]];
        let result = calc_silhouettes(data.view(), &[1, 1, 1]);
        assert_eq!(
            result,
            Err(Error::InsufficientClusters {
                required: 2,
                found: 1
            })
        );
    }

    fn labelled_rows() -> impl Strategy<Value = (Vec<Vec<f64>>, Vec<usize>)> {
        (1usize..20).prop_flat_map(|n| {
            (
                proptest::collection::vec(proptest::collection::vec(-50.0..50.0f64, 3), n),
                proptest::collection::vec(0usize..4, n),
            )
        })
    }

    fn to_array(rows: &[Vec<f64>]) -> Array2<f64> {
        let flat: Vec<f64> = rows.iter().flatten().copied().collect();
        Array2::from_shape_vec((rows.len(), 3), flat).unwrap()
    }

    proptest! {
        #[test]
        fn adjacency_symmetric_with_unit_diagonal(
            labels in proptest::collection::vec(0usize..5, 1..40),
        ) {
            let adj = adjacency_matrix(&labels);
            for i in 0..labels.len() {
                prop_assert_eq!(adj[[i, i]], 1.0);
                for j in 0..labels.len() {
                    prop_assert_eq!(adj[[i, j]], adj[[j, i]]);
                }
            }
        }

        #[test]
        fn distortion_non_negative((rows, labels) in labelled_rows()) {
            let data = to_array(&rows);
            let d = distortion(data.view(), &labels).unwrap();
            prop_assert!(d >= 0.0);
        }

        #[test]
        fn distortion_zero_on_singletons(
            rows in proptest::collection::vec(proptest::collection::vec(-50.0..50.0f64, 3), 1..20),
        ) {
            let data = to_array(&rows);
            let labels: Vec<usize> = (0..rows.len()).collect();
            prop_assert_eq!(distortion(data.view(), &labels).unwrap(), 0.0);
        }

        #[test]
        fn silhouette_bounded((rows, labels) in labelled_rows()) {
            let data = to_array(&rows);
            match calc_silhouettes(data.view(), &labels) {
                Ok(s) => prop_assert!((-1.0..=1.0).contains(&s), "silhouette {}", s),
                Err(e) => {
                    let expected = matches!(e, Error::InsufficientClusters { .. });
                    prop_assert!(expected, "unexpected error {:?}", e);
                }
            }
        }
    }
}
