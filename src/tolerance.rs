//! Floating-point tolerances used by the geometry engine.
//!
//! These values decide observable behavior (when a segment is straight, when
//! duplicate stations agree, which crossings are merged) and are part of the
//! public contract.

/// Doglegs below this angle (radians) are treated as straight segments.
pub const DOGLEG_TOLERANCE: f64 = 1e-9;

/// Maximum per-coordinate disagreement between stations sharing one MD.
pub const POSITION_TOLERANCE: f64 = 1e-9;

/// Slack applied when testing whether a TVD lies within a segment or branch extent.
pub const CROSSING_TOLERANCE: f64 = 1e-12;

/// Minimum norm for a bend direction before it is considered undefined.
pub const BEND_TOLERANCE: f64 = 1e-12;

/// Crossings closer than this in MD are reported once.
pub const CROSSING_MERGE_TOLERANCE: f64 = 1e-9;
