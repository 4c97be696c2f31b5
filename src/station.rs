//! Directional-survey stations.
//!
//! A [`SurveyStation`] is one measured point along the hole: its measured
//! depth, its Cartesian [`Position`], and optionally the hole direction
//! (inclination and azimuth) recorded there. Stations are immutable and
//! validated on construction, including when deserialized.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::error::{self, WellpathError};
use crate::types::Position;
use crate::validate::{validate_finite, validate_inclination, validate_non_negative};

/// Hole direction at a station, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orientation {
    /// Angle from vertical, `0` straight down, `90` horizontal.
    pub inclination: f64,
    /// Compass bearing clockwise from north.
    pub azimuth: f64,
}

impl Orientation {
    /// Unit tangent in the east/north/down frame.
    pub(crate) fn tangent(&self) -> Vector3<f64> {
        let inc = self.inclination.to_radians();
        let azi = self.azimuth.to_radians();
        let (sin_inc, cos_inc) = inc.sin_cos();
        let (sin_azi, cos_azi) = azi.sin_cos();
        Vector3::new(sin_inc * sin_azi, sin_inc * cos_azi, cos_inc)
    }
}

/// A single survey station.
///
/// # Examples
/// ```
/// use wellpath::station::SurveyStation;
/// use wellpath::types::Position;
///
/// let tie_in = SurveyStation::new(0.0, Position::new(0.0, 0.0, 0.0))?;
/// let deeper = SurveyStation::with_angles(30.0, 0.0, 0.0, Position::new(0.0, 0.0, 30.0))?;
/// assert!(tie_in.orientation().is_none());
/// assert_eq!(deeper.inclination(), Some(0.0));
/// # Ok::<(), wellpath::WellpathError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SurveyStationRaw", into = "SurveyStationRaw")]
pub struct SurveyStation {
    md: f64,
    orientation: Option<Orientation>,
    position: Position,
}

#[derive(Serialize, Deserialize)]
struct SurveyStationRaw {
    md: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    inclination: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    azimuth: Option<f64>,
    position: Position,
}

impl TryFrom<SurveyStationRaw> for SurveyStation {
    type Error = WellpathError;
    fn try_from(raw: SurveyStationRaw) -> Result<Self, Self::Error> {
        Self::from_parts(raw.md, raw.inclination, raw.azimuth, raw.position)
    }
}

impl From<SurveyStation> for SurveyStationRaw {
    fn from(s: SurveyStation) -> Self {
        Self {
            md: s.md,
            inclination: s.inclination(),
            azimuth: s.azimuth(),
            position: s.position,
        }
    }
}

impl SurveyStation {
    /// Station known only by its position.
    ///
    /// # Errors
    /// Returns [`WellpathError::ValidationError`] if `md` is negative or any
    /// value is not finite.
    pub fn new(md: f64, position: Position) -> error::Result<Self> {
        Self::from_parts(md, None, None, position)
    }

    /// Station carrying both a position and the hole direction.
    ///
    /// # Errors
    /// Returns [`WellpathError::ValidationError`] if `md` is negative,
    /// inclination is outside `[0, 180]`, or any value is not finite.
    pub fn with_angles(
        md: f64,
        inclination: f64,
        azimuth: f64,
        position: Position,
    ) -> error::Result<Self> {
        Self::from_parts(md, Some(inclination), Some(azimuth), position)
    }

    /// General constructor mirroring the serialized form.
    ///
    /// An inclination without an azimuth is accepted only for a vertical
    /// station (inclination `0` or `180`), where the bearing is meaningless.
    /// An azimuth without an inclination is rejected.
    ///
    /// # Errors
    /// Returns [`WellpathError::ValidationError`] for any of the above, or
    /// for negative/non-finite values.
    pub fn from_parts(
        md: f64,
        inclination: Option<f64>,
        azimuth: Option<f64>,
        position: Position,
    ) -> error::Result<Self> {
        validate_non_negative(md, "md")?;
        validate_finite(position.east, "east")?;
        validate_finite(position.north, "north")?;
        validate_finite(position.z, "z")?;

        let orientation = match (inclination, azimuth) {
            (None, None) => None,
            (Some(inc), Some(azi)) => {
                validate_inclination(inc)?;
                validate_finite(azi, "azimuth")?;
                Some(Orientation {
                    inclination: inc,
                    azimuth: azi.rem_euclid(360.0),
                })
            }
            (Some(inc), None) => {
                validate_inclination(inc)?;
                if inc != 0.0 && inc != 180.0 {
                    return Err(WellpathError::validation(format!(
                        "station at md {md} has inclination {inc} but no azimuth"
                    )));
                }
                Some(Orientation {
                    inclination: inc,
                    azimuth: 0.0,
                })
            }
            (None, Some(azi)) => {
                return Err(WellpathError::validation(format!(
                    "station at md {md} has azimuth {azi} but no inclination"
                )));
            }
        };

        Ok(Self {
            md,
            orientation,
            position,
        })
    }

    pub fn md(&self) -> f64 {
        self.md
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// True vertical depth of the station.
    pub fn tvd(&self) -> f64 {
        self.position.z
    }

    pub fn orientation(&self) -> Option<Orientation> {
        self.orientation
    }

    pub fn inclination(&self) -> Option<f64> {
        self.orientation.map(|o| o.inclination)
    }

    /// Azimuth normalized to `[0, 360)`.
    pub fn azimuth(&self) -> Option<f64> {
        self.orientation.map(|o| o.azimuth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn origin() -> Position {
        Position::new(0.0, 0.0, 0.0)
    }

    #[test]
    fn rejects_negative_md() {
        let result = SurveyStation::new(-1.0, origin());
        assert!(matches!(result, Err(WellpathError::ValidationError { .. })));
    }

    #[test]
    fn rejects_non_finite_position() {
        let result = SurveyStation::new(1.0, Position::new(0.0, f64::NAN, 1.0));
        assert!(matches!(result, Err(WellpathError::ValidationError { .. })));
    }

    #[test]
    fn rejects_inclination_out_of_range() {
        let result = SurveyStation::with_angles(10.0, 181.0, 0.0, origin());
        assert!(matches!(result, Err(WellpathError::ValidationError { .. })));
    }

    #[test]
    fn rejects_azimuth_without_inclination() {
        let result = SurveyStation::from_parts(10.0, None, Some(45.0), origin());
        assert!(matches!(result, Err(WellpathError::ValidationError { .. })));
    }

    #[test]
    fn inclination_without_azimuth_only_when_vertical() {
        let vertical = SurveyStation::from_parts(10.0, Some(0.0), None, origin()).unwrap();
        assert_eq!(vertical.azimuth(), Some(0.0));

        let deviated = SurveyStation::from_parts(10.0, Some(12.0), None, origin());
        assert!(matches!(deviated, Err(WellpathError::ValidationError { .. })));
    }

    #[test]
    fn azimuth_is_normalized() {
        let s = SurveyStation::with_angles(10.0, 30.0, -90.0, origin()).unwrap();
        assert_abs_diff_eq!(s.azimuth().unwrap(), 270.0, epsilon = 1e-12);
        let s = SurveyStation::with_angles(10.0, 30.0, 720.0, origin()).unwrap();
        assert_abs_diff_eq!(s.azimuth().unwrap(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn tangent_components() {
        let down = Orientation {
            inclination: 0.0,
            azimuth: 0.0,
        }
        .tangent();
        assert_eq!((down.x, down.y, down.z), (0.0, 0.0, 1.0));

        let east = Orientation {
            inclination: 90.0,
            azimuth: 90.0,
        }
        .tangent();
        assert_abs_diff_eq!(east.x, 1.0, epsilon = 1e-15);
        assert_abs_diff_eq!(east.y, 0.0, epsilon = 1e-15);
        assert_abs_diff_eq!(east.z, 0.0, epsilon = 1e-15);

        let t = Orientation {
            inclination: 37.0,
            azimuth: 211.0,
        }
        .tangent();
        assert_abs_diff_eq!(t.norm(), 1.0, epsilon = 1e-15);
    }

    #[test]
    fn serde_round_trip() {
        let s = SurveyStation::with_angles(250.0, 60.0, 45.0, Position::new(1.0, 2.0, 3.0)).unwrap();
        let json = serde_json::to_string(&s).unwrap();
        let s2: SurveyStation = serde_json::from_str(&json).unwrap();
        assert_eq!(s, s2);
    }

    #[test]
    fn serde_omits_missing_angles() {
        let s = SurveyStation::new(5.0, Position::new(0.0, 0.0, 5.0)).unwrap();
        let json = serde_json::to_string(&s).unwrap();
        assert!(!json.contains("inclination"));
        let s2: SurveyStation = serde_json::from_str(&json).unwrap();
        assert_eq!(s, s2);
    }

    #[test]
    fn serde_rejects_invalid() {
        let json = r#"{"md":-5.0,"position":{"east":0.0,"north":0.0,"z":0.0}}"#;
        assert!(serde_json::from_str::<SurveyStation>(json).is_err());

        let json = r#"{"md":5.0,"azimuth":10.0,"position":{"east":0.0,"north":0.0,"z":0.0}}"#;
        assert!(serde_json::from_str::<SurveyStation>(json).is_err());
    }
}
