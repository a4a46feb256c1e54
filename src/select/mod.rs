//! Heuristics for choosing the number of clusters.
//!
//! Every heuristic treats the clustering procedure as a black box
//! ([`Clusterer`]): it runs it for each candidate k in `[2, k_max]`, scores
//! the resulting partition, and keeps the best k.
//!
//! ## Heuristics
//!
//! | Selector | Score per k | Random | Reference |
//! |----------|-------------|--------|-----------|
//! | [`Stability`] | Agreement of clusterings of two overlapping subsamples | yes | Ben-Hur et al. 2002 |
//! | [`GapStatistic`] | `log E[D_null] - log D_real` | yes | Tibshirani et al. 2001 |
//! | [`DistortionJump`] | `D(k)^(-d/2) - D(k-1)^(-d/2)` | no | Sugar & James 2003 |
//! | [`MaxSilhouette`] | Mean centroid silhouette | no | Rousseeuw 1987 |
//!
//! ## Conventions
//!
//! - `k_max` defaults to `n_samples / 2` and the scan is inclusive.
//! - Ties always go to the smallest k.
//! - Randomized selectors own a seedable generator per call; the free
//!   functions take the generator explicitly, so the same seed gives the
//!   same scores.
//! - Clusterer output is checked: one label per row, every label `< k`.
//!
//! ## Usage
//!
//! ```rust
//! use kselect::select::{from_fn, DistortionJump, KSelector, MaxSilhouette};
//! use ndarray::array;
//!
//! let data = array![[0.0, 0.0], [0.0, 1.0], [0.5, 0.5], [9.0, 9.0], [9.0, 10.0], [9.5, 9.5]];
//!
//! // Any procedure works; here: cut the first coordinate into k equal bands
//! let bands = from_fn(|x, k| {
//!     Ok(x.rows()
//!         .into_iter()
//!         .map(|r| ((r[0] / 10.0 * k as f64) as usize).min(k - 1))
//!         .collect())
//! });
//!
//! let k = MaxSilhouette::new().select_k(data.view(), &bands).unwrap();
//! assert_eq!(k, 2);
//!
//! let curve = DistortionJump::new().scores(data.view(), &bands).unwrap();
//! assert_eq!(curve.len(), 2); // k = 2, 3
//! ```

mod gap;
mod jump;
mod scan;
mod silhouette;
mod stability;
mod traits;

pub use gap::{gap_scores, gap_statistic, normal_distortion, GapStatistic};
pub use jump::{distortion_jump, jump_scores, DistortionJump};
pub use silhouette::{max_silhouette, silhouette_scores, MaxSilhouette};
pub use stability::{stability, stability_scores, Stability};
pub use traits::{from_fn, Clusterer, KScore, KSelector};
