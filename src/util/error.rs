//! Error types for roinms.

use thiserror::Error;

/// Result alias for roinms operations.
pub type Result<T> = std::result::Result<T, RoiNmsError>;

/// Errors that can occur while filtering detections.
///
/// Every variant is a deterministic input-validation failure; the whole run is
/// aborted and no partially filtered output is returned.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum RoiNmsError {
    /// The IoU denominator is zero (two zero-area boxes).
    #[error("degenerate boxes {a:?} and {b:?}: union area is zero")]
    DegenerateBox {
        /// First box as `[x_min, y_min, x_max, y_max]`.
        a: [f64; 4],
        /// Second box as `[x_min, y_min, x_max, y_max]`.
        b: [f64; 4],
    },
    /// A detection record is missing a field or carries an invalid value.
    #[error("malformed detection{}: {reason}", fmt_index(.index))]
    MalformedDetection {
        /// Position of the record in the input, when known.
        index: Option<usize>,
        /// Which field or value was rejected.
        reason: String,
    },
    /// Tile layout or suppression parameters are invalid.
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration {
        /// Which parameter was rejected and why.
        reason: String,
    },
}

impl RoiNmsError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedDetection {
            index: None,
            reason: reason.into(),
        }
    }

    pub(crate) fn config(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            reason: reason.into(),
        }
    }

    /// Attaches a record index to a `MalformedDetection` error.
    ///
    /// Other variants, and errors that already carry an index, are returned
    /// unchanged.
    pub fn at_index(self, idx: usize) -> Self {
        match self {
            Self::MalformedDetection {
                index: None,
                reason,
            } => Self::MalformedDetection {
                index: Some(idx),
                reason,
            },
            other => other,
        }
    }
}

fn fmt_index(index: &Option<usize>) -> String {
    match index {
        Some(idx) => format!(" at index {idx}"),
        None => String::new(),
    }
}
