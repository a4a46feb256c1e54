//! Deterministic Lloyd k-means used as a test clusterer.
//!
//! Seeding is farthest-first: row 0, then repeatedly the row farthest from
//! every centroid chosen so far. No randomness, so test outcomes depend only
//! on the data.

use crate::error::{Error, Result};
use crate::metrics::squared_distance;
use crate::select::Clusterer;
use ndarray::{Array2, ArrayView2};

#[derive(Debug, Clone)]
pub(crate) struct Lloyd {
    max_iter: usize,
}

impl Lloyd {
    pub(crate) fn new() -> Self {
        Self { max_iter: 100 }
    }

    fn init_centroids(data: ArrayView2<'_, f64>, k: usize) -> Array2<f64> {
        let n = data.nrows();
        let mut centroids = Array2::zeros((k, data.ncols()));
        centroids.row_mut(0).assign(&data.row(0));

        let mut nearest: Vec<f64> = (0..n)
            .map(|j| squared_distance(data.row(j), centroids.row(0)))
            .collect();
        for c in 1..k {
            let mut selected = 0;
            for j in 1..n {
                if nearest[j] > nearest[selected] {
                    selected = j;
                }
            }
            centroids.row_mut(c).assign(&data.row(selected));
            for (j, d) in nearest.iter_mut().enumerate() {
                *d = d.min(squared_distance(data.row(j), centroids.row(c)));
            }
        }
        centroids
    }
}

impl Clusterer for Lloyd {
    fn assign(&self, data: ArrayView2<'_, f64>, k: usize) -> Result<Vec<usize>> {
        let (n, d) = data.dim();
        if n == 0 {
            return Err(Error::EmptyInput);
        }
        if k == 0 || k > n {
            return Err(Error::InvalidClusterCount {
                requested: k,
                n_items: n,
            });
        }

        let mut centroids = Self::init_centroids(data, k);
        let mut labels = vec![usize::MAX; n];

        for _iter in 0..self.max_iter {
            let mut changed = false;
            for (i, label) in labels.iter_mut().enumerate() {
                let point = data.row(i);
                let mut best_cluster = 0;
                let mut best_dist = f64::MAX;
                for c in 0..k {
                    let dist = squared_distance(point, centroids.row(c));
                    if dist < best_dist {
                        best_dist = dist;
                        best_cluster = c;
                    }
                }
                if *label != best_cluster {
                    *label = best_cluster;
                    changed = true;
                }
            }
            if !changed {
                break;
            }

            let mut sums = Array2::<f64>::zeros((k, d));
            let mut counts = vec![0usize; k];
            for (i, &c) in labels.iter().enumerate() {
                let mut row = sums.row_mut(c);
                row += &data.row(i);
                counts[c] += 1;
            }
            for c in 0..k {
                // Empty clusters keep their previous centroid
                if counts[c] > 0 {
                    let mean = &sums.row(c) / counts[c] as f64;
                    centroids.row_mut(c).assign(&mean);
                }
            }
        }

        Ok(labels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_lloyd_two_pairs() {
        let data = array![[0.0, 0.0], [0.1, 0.1], [10.0, 10.0], [10.1, 10.1]];
        let labels = Lloyd::new().assign(data.view(), 2).unwrap();

        assert_eq!(labels[0], labels[1]);
        assert_eq!(labels[2], labels[3]);
        assert_ne!(labels[0], labels[2]);
    }

    #[test]
    fn test_lloyd_k_equals_n() {
        let data = array![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]];
        let labels = Lloyd::new().assign(data.view(), 3).unwrap();

        let unique: std::collections::HashSet<_> = labels.iter().collect();
        assert_eq!(unique.len(), 3);
    }

    #[test]
    fn test_lloyd_k_larger_than_n_error() {
        let data = array![[0.0, 0.0], [1.0, 1.0]];
        assert!(Lloyd::new().assign(data.view(), 5).is_err());
    }
}
