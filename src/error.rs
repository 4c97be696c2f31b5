//! Error types for the wellpath library.
//!
//! Two kinds of failure exist: malformed survey input, rejected when a
//! [`Trajectory`](crate::Trajectory) is built, and queries that ask for a
//! depth the stations do not cover. Numerically awkward geometry (near-zero
//! doglegs, chords longer than their MD span, duplicate stations) is never
//! an error; the interpolation absorbs it.

use thiserror::Error;

/// Convenience type alias for results in this crate.
pub type Result<T> = std::result::Result<T, WellpathError>;

/// Errors that can occur while building a trajectory or querying it.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum WellpathError {
    /// Station input is malformed (empty, unsorted, non-finite, inconsistent duplicates).
    #[error("invalid survey: {message}")]
    ValidationError { message: String },

    /// A queried MD or TVD lies outside what the stations cover.
    #[error("{message}")]
    RangeError {
        message: String,
        /// The rejected query value.
        value: f64,
        /// Covered interval, if the model has one.
        bounds: Option<(f64, f64)>,
    },
}

impl WellpathError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
        }
    }

    pub(crate) fn md_out_of_range(value: f64, bounds: Option<(f64, f64)>) -> Self {
        let message = match bounds {
            Some((lo, hi)) => format!(
                "measured depth outside surveyed interval: {value} not in [{lo}, {hi}]"
            ),
            None => format!(
                "measured depth outside surveyed interval: {value} (fewer than two distinct stations)"
            ),
        };
        Self::RangeError {
            message,
            value,
            bounds,
        }
    }

    pub(crate) fn tvd_out_of_range(value: f64, bounds: Option<(f64, f64)>) -> Self {
        let message = match bounds {
            Some((lo, hi)) => format!(
                "true vertical depth outside surveyed range: {value} not in [{lo}, {hi}]"
            ),
            None => format!(
                "true vertical depth outside surveyed range: {value} (fewer than two distinct stations)"
            ),
        };
        Self::RangeError {
            message,
            value,
            bounds,
        }
    }
}
