//! Minimum-curvature positioning of angle-only surveys.
//!
//! Directional surveys often record only MD, inclination and azimuth. The
//! minimum curvature method assumes each interval is a circular arc and
//! accumulates positions with the ratio factor
//!
//! ```text
//! ΔP = ΔMD/2 · (t₁ + t₂) · RF,   RF = tan(β/2) / (β/2)
//! ```
//!
//! where `t₁`, `t₂` are the unit tangents at the interval ends and `β` the
//! dogleg between them (`RF → 1` as `β → 0`).

use serde::{Deserialize, Serialize};

use crate::error::{self, WellpathError};
use crate::station::SurveyStation;
use crate::tolerance::{BEND_TOLERANCE, DOGLEG_TOLERANCE};
use crate::types::Position;

/// One raw survey reading: measured depth plus hole direction in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AngleRecord {
    pub md: f64,
    pub inclination: f64,
    pub azimuth: f64,
}

impl AngleRecord {
    pub fn new(md: f64, inclination: f64, azimuth: f64) -> Self {
        Self {
            md,
            inclination,
            azimuth,
        }
    }
}

/// Position every record by the minimum curvature method.
///
/// The first record sits at `origin`. The returned stations keep their
/// angles, so a [`Trajectory`](crate::Trajectory) built from them uses the
/// angle-based arc on every segment.
///
/// # Errors
/// Returns [`WellpathError::ValidationError`] if `records` is empty, MD
/// decreases, any record fails station validation, or consecutive records
/// point in exactly opposite directions.
///
/// # Examples
/// ```
/// use wellpath::survey::{minimum_curvature, AngleRecord};
/// use wellpath::types::Position;
///
/// let stations = minimum_curvature(
///     Position::default(),
///     &[AngleRecord::new(0.0, 0.0, 0.0), AngleRecord::new(100.0, 0.0, 0.0)],
/// )?;
/// assert_eq!(stations[1].tvd(), 100.0);
/// # Ok::<(), wellpath::WellpathError>(())
/// ```
pub fn minimum_curvature(
    origin: Position,
    records: &[AngleRecord],
) -> error::Result<Vec<SurveyStation>> {
    let Some(first) = records.first() else {
        return Err(WellpathError::validation("at least one survey record is required"));
    };

    let mut stations = Vec::with_capacity(records.len());
    let mut previous =
        SurveyStation::with_angles(first.md, first.inclination, first.azimuth, origin)?;
    stations.push(previous);

    for record in &records[1..] {
        // Validate angles before using them for the step.
        let reading = SurveyStation::with_angles(
            record.md,
            record.inclination,
            record.azimuth,
            previous.position(),
        )?;
        let span = record.md - previous.md();
        if span < 0.0 {
            return Err(WellpathError::validation(format!(
                "survey records must be sorted by measured depth, got {} after {}",
                record.md,
                previous.md()
            )));
        }

        let (Some(a), Some(b)) = (previous.orientation(), reading.orientation()) else {
            return Err(WellpathError::validation("survey record without angles"));
        };
        let (t0, t1) = (a.tangent(), b.tangent());
        let sum = t0 + t1;
        let dogleg = 2.0 * (t1 - t0).norm().atan2(sum.norm());
        let step = if dogleg < DOGLEG_TOLERANCE {
            sum * (0.5 * span)
        } else {
            // |t₀ + t₁| = 2cos(β/2), so the ratio-factor step is the chord
            // direction times ΔMD·sin(β/2)/(β/2).
            let Some(direction) = sum.try_normalize(BEND_TOLERANCE) else {
                return Err(WellpathError::validation(format!(
                    "hole reverses direction between md {} and {}: chord direction undefined",
                    previous.md(),
                    record.md
                )));
            };
            let half = 0.5 * dogleg;
            direction * (span * half.sin() / half)
        };
        let position = Position::from_vector(&(previous.position().to_vector() + step));

        previous = SurveyStation::with_angles(
            record.md,
            record.inclination,
            record.azimuth,
            position,
        )?;
        stations.push(previous);
    }

    Ok(stations)
}
