//! # kselect
//!
//! Heuristics for choosing the number of clusters k for any clustering
//! procedure.
//!
//! The clustering procedure itself is a black box supplied by the caller
//! ([`Clusterer`]). Each heuristic runs it over a range of k (and, for the
//! randomized ones, on resampled or synthetic data), scores every partition,
//! and returns the best k.
//!
//! - [`metrics`]: partition scores (co-membership matrix, distortion, centroid silhouette)
//! - [`select`]: the four selectors (stability, gap statistic, distortion jump, max silhouette)
//!
//! ```rust
//! use kselect::{from_fn, DistortionJump, KSelector};
//! use ndarray::array;
//!
//! let data = array![[0.0], [0.2], [0.4], [10.0], [10.2], [10.4]];
//! let threshold = from_fn(|x, k| {
//!     Ok(x.rows().into_iter().map(|r| usize::from(r[0] > 5.0).min(k - 1)).collect())
//! });
//!
//! let k = DistortionJump::new().select_k(data.view(), &threshold).unwrap();
//! assert_eq!(k, 2);
//! ```

/// Error types used across `kselect`.
pub mod error;
pub mod metrics;
pub mod select;

#[cfg(test)]
mod testing;

pub use error::{Error, Result};
pub use metrics::{adjacency_matrix, calc_silhouettes, centroids, distortion, Centroids};
pub use select::{
    distortion_jump, from_fn, gap_statistic, max_silhouette, normal_distortion, stability,
    Clusterer, DistortionJump, GapStatistic, KScore, KSelector, MaxSilhouette, Stability,
};
