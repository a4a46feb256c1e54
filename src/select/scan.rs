//! Plumbing shared by the heuristics: k range, checked clustering, argmax.

use super::traits::{Clusterer, KScore};
use crate::error::{Error, Result};
use ndarray::ArrayView2;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Upper end of the scanned range `[2, k_max]`; defaults to `n_samples / 2`.
pub(crate) fn resolve_k_max(n_samples: usize, k_max: Option<usize>) -> Result<usize> {
    if n_samples == 0 {
        return Err(Error::EmptyInput);
    }
    let k_max = k_max.unwrap_or(n_samples / 2);
    if k_max < 2 {
        return Err(Error::InvalidParameter {
            name: "k_max",
            message: "must be at least 2",
        });
    }
    if k_max > n_samples {
        return Err(Error::InvalidClusterCount {
            requested: k_max,
            n_items: n_samples,
        });
    }
    Ok(k_max)
}

/// Run the clusterer and check its output against the rows it was given.
pub(crate) fn assign_checked<C: Clusterer + ?Sized>(
    clusterer: &C,
    data: ArrayView2<'_, f64>,
    k: usize,
) -> Result<Vec<usize>> {
    let labels = clusterer.assign(data, k)?;
    if labels.len() != data.nrows() {
        return Err(Error::LabelCountMismatch {
            expected: data.nrows(),
            found: labels.len(),
        });
    }
    if let Some(&label) = labels.iter().find(|&&l| l >= k) {
        return Err(Error::LabelOutOfRange { label, k });
    }
    Ok(labels)
}

/// Highest score; on ties the smallest k wins. NaN scores never win.
pub(crate) fn best_score(scores: &[KScore]) -> Option<KScore> {
    scores
        .iter()
        .filter(|s| !s.score.is_nan())
        .fold(None, |best: Option<KScore>, s| match best {
            Some(b) if s.score <= b.score => Some(b),
            _ => Some(*s),
        })
}

/// Fresh generator for one top-level call.
pub(crate) fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_rng(&mut rand::rng()),
    }
}

pub(crate) fn check_nb_draw(nb_draw: usize) -> Result<()> {
    if nb_draw == 0 {
        return Err(Error::InvalidParameter {
            name: "nb_draw",
            message: "must be at least 1",
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::select::from_fn;
    use ndarray::array;

    fn ks(pairs: &[(usize, f64)]) -> Vec<KScore> {
        pairs.iter().map(|&(k, score)| KScore { k, score }).collect()
    }

    #[test]
    fn test_resolve_k_max_default_is_half() {
        assert_eq!(resolve_k_max(9, None).unwrap(), 4);
        assert_eq!(resolve_k_max(10, Some(3)).unwrap(), 3);
    }

    #[test]
    fn test_resolve_k_max_rejects_small_and_large() {
        assert!(matches!(
            resolve_k_max(3, None),
            Err(Error::InvalidParameter { name: "k_max", .. })
        ));
        assert_eq!(
            resolve_k_max(4, Some(5)),
            Err(Error::InvalidClusterCount {
                requested: 5,
                n_items: 4
            })
        );
        assert_eq!(resolve_k_max(0, Some(2)), Err(Error::EmptyInput));
    }

    #[test]
    fn test_best_score_smallest_k_wins_ties() {
        let scores = ks(&[(2, 0.5), (3, 0.9), (4, 0.9), (5, 0.1)]);
        assert_eq!(best_score(&scores).map(|s| s.k), Some(3));
    }

    #[test]
    fn test_best_score_skips_nan() {
        let scores = ks(&[(2, f64::NAN), (3, -0.5)]);
        assert_eq!(best_score(&scores).map(|s| s.k), Some(3));
        assert_eq!(best_score(&ks(&[(2, f64::NAN)])), None);
    }

    #[test]
    fn test_assign_checked_validates_output() {
        let data = array![[0.0], [1.0], [2.0]];

        let short = from_fn(|_, _| Ok(vec![0, 1]));
        assert_eq!(
            assign_checked(&short, data.view(), 2),
            Err(Error::LabelCountMismatch {
                expected: 3,
                found: 2
            })
        );

        let wide = from_fn(|_, _| Ok(vec![0, 1, 2]));
        assert_eq!(
            assign_checked(&wide, data.view(), 2),
            Err(Error::LabelOutOfRange { label: 2, k: 2 })
        );
    }

    #[test]
    fn test_seeded_rng_reproducible() {
        use rand::Rng;
        let a: u64 = seeded_rng(Some(7)).random();
        let b: u64 = seeded_rng(Some(7)).random();
        assert_eq!(a, b);
    }
}
