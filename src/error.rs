use thiserror::Error;

/// Result alias for `kselect`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by the selection heuristics and their scoring helpers.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Input was empty.
    #[error("empty input provided")]
    EmptyInput,

    /// A clusterer returned a label vector whose length differs from the row count.
    #[error("clusterer returned {found} labels for {expected} rows")]
    LabelCountMismatch {
        /// Number of rows handed to the clusterer.
        expected: usize,
        /// Number of labels returned.
        found: usize,
    },

    /// A clusterer returned a label outside `[0, k)`.
    #[error("label {label} out of range for k = {k}")]
    LabelOutOfRange {
        /// Offending label.
        label: usize,
        /// Requested number of clusters.
        k: usize,
    },

    /// Fewer populated clusters than the score needs.
    #[error("need at least {required} populated clusters, found {found}")]
    InsufficientClusters {
        /// Minimum number of populated clusters.
        required: usize,
        /// Populated clusters actually present.
        found: usize,
    },

    /// Two resampled subsets shared no rows.
    #[error("resampled subsets have no rows in common")]
    EmptySubsample,

    /// Distortion jump never found a non-negative jump.
    #[error("no k in [2, {k_max}] improved the transformed distortion")]
    NoImprovingK {
        /// Upper end of the scanned range.
        k_max: usize,
    },

    /// Invalid number of clusters requested.
    #[error("cannot create {requested} clusters from {n_items} items")]
    InvalidClusterCount {
        /// Requested count.
        requested: usize,
        /// Number of items.
        n_items: usize,
    },

    /// Invalid parameter value.
    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Error message.
        message: &'static str,
    },

    /// Error raised by a caller-supplied clusterer.
    #[error("{0}")]
    Other(String),
}
