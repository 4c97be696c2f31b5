//! # wellpath
//!
//! Borehole trajectory geometry for directional surveys.
//!
//! Given survey stations along a wellbore, answers the two depth conversions
//! every borehole record needs: true vertical depth at a measured depth, and
//! the measured depth at which a true vertical depth is reached.
//!
//! ## Architecture
//!
//! - **`station`**: Validated survey stations (MD, position, optional angles)
//! - **`survey`**: Minimum-curvature positioning of angle-only surveys
//! - **`trajectory`**: The immutable model, segment classification, arc math
//!   and TVD ↔ MD queries
//! - **`tolerance`**: Numerical thresholds that shape query results
//!
//! ## Design
//!
//! - **Newtypes for outputs, bare `f64` for inputs.** [`MeasuredDepth`] and
//!   [`VerticalDepth`] wrap return values; queries take raw `f64`.
//! - **No panics.** Every fallible operation returns [`Result`]. Library code
//!   never calls `unwrap()` or `expect()`.
//! - **Immutable models.** A [`Trajectory`] is built once from its stations
//!   and never changes; share it across threads via `Arc<Trajectory>`.
//! - **Exact at stations.** Querying a station's MD returns the station's own
//!   TVD; interpolation only happens strictly between stations.
//! - **Noise tolerant.** Near-zero doglegs and chords longer than their MD
//!   span degrade to straight segments rather than failing.

pub mod error;
mod optim;
pub mod station;
pub mod survey;
pub mod tolerance;
pub mod trajectory;
pub mod types;
mod validate;

#[doc(inline)]
pub use error::{Result, WellpathError};
#[doc(inline)]
pub use station::SurveyStation;
#[doc(inline)]
pub use trajectory::{CrossingPolicy, Trajectory};
#[doc(inline)]
pub use types::{MeasuredDepth, Position, VerticalDepth};
