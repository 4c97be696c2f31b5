//! Borehole trajectory model and depth conversion.
//!
//! A [`Trajectory`] is an ordered, validated list of [`SurveyStation`]s with
//! each non-degenerate pair classified into a [`Segment`]. It answers the
//! two inverse questions of directional surveying:
//!
//! - [`Trajectory::tvd_at`]: true vertical depth at a measured depth
//! - [`Trajectory::md_at_tvd`]: measured depth at which a TVD is reached
//!
//! Segments between stations are constant-curvature arcs (the minimum
//! curvature assumption) or straight chords. Every query is exact at the
//! stations and continuous in between.

pub mod arc;
pub mod policy;
pub mod segment;

pub use arc::{ArcGeometry, ArcSource};
pub use policy::CrossingPolicy;
pub use segment::{Segment, SegmentShape};

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::{self, WellpathError};
use crate::station::{Orientation, SurveyStation};
use crate::tolerance::{
    BEND_TOLERANCE, CROSSING_MERGE_TOLERANCE, CROSSING_TOLERANCE, POSITION_TOLERANCE,
};
use crate::types::{MeasuredDepth, Position, VerticalDepth};

/// Immutable trajectory built from survey stations.
///
/// Once built the model never changes; it is `Send + Sync` and can be shared
/// across threads behind an `Arc` without locking.
///
/// # Examples
///
/// ```
/// use wellpath::station::SurveyStation;
/// use wellpath::types::Position;
/// use wellpath::Trajectory;
///
/// let trajectory = Trajectory::new(vec![
///     SurveyStation::with_angles(0.0, 0.0, 0.0, Position::new(0.0, 0.0, 0.0))?,
///     SurveyStation::with_angles(100.0, 0.0, 0.0, Position::new(0.0, 0.0, 100.0))?,
/// ])?;
///
/// assert_eq!(trajectory.tvd_at(40.0)?.0, 40.0);
/// assert_eq!(trajectory.md_at_tvd(55.0)?.0, 55.0);
/// assert!(trajectory.tvd_at(120.0).is_err());
/// # Ok::<(), wellpath::WellpathError>(())
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "TrajectoryRaw", into = "TrajectoryRaw")]
pub struct Trajectory {
    stations: Vec<SurveyStation>,
    segments: Vec<Segment>,
    policy: CrossingPolicy,
}

#[derive(Serialize, Deserialize)]
struct TrajectoryRaw {
    stations: Vec<SurveyStation>,
    #[serde(default)]
    crossing_policy: CrossingPolicy,
}

impl TryFrom<TrajectoryRaw> for Trajectory {
    type Error = WellpathError;
    fn try_from(raw: TrajectoryRaw) -> Result<Self, Self::Error> {
        Ok(Self::new(raw.stations)?.with_crossing_policy(raw.crossing_policy))
    }
}

impl From<Trajectory> for TrajectoryRaw {
    fn from(t: Trajectory) -> Self {
        Self {
            stations: t.stations,
            crossing_policy: t.policy,
        }
    }
}

impl Trajectory {
    /// Validate the stations and derive the segment geometry.
    ///
    /// Stations must be sorted by non-decreasing MD. Consecutive stations may
    /// share an MD only if their positions agree within
    /// [`POSITION_TOLERANCE`]; such duplicates produce no segment.
    ///
    /// # Errors
    /// Returns [`WellpathError::ValidationError`] if `stations` is empty, MD
    /// decreases anywhere, or duplicate-MD stations disagree on position.
    pub fn new(stations: Vec<SurveyStation>) -> error::Result<Self> {
        if stations.is_empty() {
            return Err(WellpathError::validation("at least one station is required"));
        }
        for (i, w) in stations.windows(2).enumerate() {
            let (a, b) = (&w[0], &w[1]);
            if b.md() < a.md() {
                return Err(WellpathError::validation(format!(
                    "stations must be sorted by measured depth, but md[{}]={} > md[{}]={}",
                    i,
                    a.md(),
                    i + 1,
                    b.md()
                )));
            }
            if b.md() == a.md() && !same_position(&a.position(), &b.position()) {
                return Err(WellpathError::validation(format!(
                    "stations {} and {} share md {} but have different positions",
                    i,
                    i + 1,
                    a.md()
                )));
            }
        }

        let pairs: Vec<(usize, Option<Vector3<f64>>)> = stations
            .windows(2)
            .enumerate()
            .filter(|(_, w)| w[1].md() > w[0].md())
            .map(|(i, w)| {
                let chord = w[1].position().to_vector() - w[0].position().to_vector();
                (i, chord.try_normalize(BEND_TOLERANCE))
            })
            .collect();

        let segments: Vec<Segment> = pairs
            .iter()
            .enumerate()
            .map(|(k, &(i, _))| {
                let previous = k.checked_sub(1).and_then(|p| pairs[p].1);
                let next = pairs.get(k + 1).and_then(|n| n.1);
                Segment::build(stations[i], stations[i + 1], previous, next)
            })
            .collect();

        #[cfg(feature = "logging")]
        tracing::debug!(
            n_stations = stations.len(),
            n_segments = segments.len(),
            n_arcs = segments
                .iter()
                .filter(|s| matches!(s.shape(), SegmentShape::Arc(_)))
                .count(),
            "trajectory built"
        );

        Ok(Self {
            stations,
            segments,
            policy: CrossingPolicy::default(),
        })
    }

    /// Replace the rule used by [`md_at_tvd`](Self::md_at_tvd) to choose among crossings.
    pub fn with_crossing_policy(mut self, policy: CrossingPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn crossing_policy(&self) -> CrossingPolicy {
        self.policy
    }

    pub fn stations(&self) -> &[SurveyStation] {
        &self.stations
    }

    /// Non-degenerate segments in MD order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// `[first.md, last.md]`.
    pub fn bounds(&self) -> (f64, f64) {
        match (self.stations.first(), self.stations.last()) {
            (Some(first), Some(last)) => (first.md(), last.md()),
            _ => (f64::NAN, f64::NAN),
        }
    }

    /// Global TVD extent, including interior arc extrema.
    ///
    /// `None` when the stations span fewer than two distinct MDs.
    pub fn tvd_range(&self) -> Option<(f64, f64)> {
        if self.segments.is_empty() {
            return None;
        }
        Some(
            self.segments
                .iter()
                .map(Segment::tvd_extent)
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (a, b)| {
                    (lo.min(a), hi.max(b))
                }),
        )
    }

    /// True vertical depth at measured depth `md`.
    ///
    /// At a station MD (including a duplicated one) the station's own TVD is
    /// returned without interpolation.
    ///
    /// # Errors
    /// Returns [`WellpathError::RangeError`] if `md` is outside
    /// [`bounds`](Self::bounds), not finite, or the stations span fewer than
    /// two distinct MDs.
    pub fn tvd_at(&self, md: f64) -> error::Result<VerticalDepth> {
        self.check_md(md)?;
        if let Some(station) = self.station_at(md) {
            return Ok(VerticalDepth(station.tvd()));
        }
        Ok(VerticalDepth(self.segment_covering(md)?.tvd_at(md)))
    }

    /// Convert many measured depths, failing on the first out-of-range one.
    ///
    /// # Errors
    /// Same as [`tvd_at`](Self::tvd_at).
    pub fn tvd_at_many(&self, mds: &[f64]) -> error::Result<Vec<VerticalDepth>> {
        #[cfg(feature = "parallel")]
        let tvds = mds.par_iter().map(|&md| self.tvd_at(md)).collect();
        #[cfg(not(feature = "parallel"))]
        let tvds = mds.iter().map(|&md| self.tvd_at(md)).collect();
        tvds
    }

    /// Interpolated position (east, north, TVD) at measured depth `md`.
    ///
    /// # Errors
    /// Same as [`tvd_at`](Self::tvd_at).
    pub fn position_at(&self, md: f64) -> error::Result<Position> {
        self.check_md(md)?;
        if let Some(station) = self.station_at(md) {
            return Ok(station.position());
        }
        Ok(self.segment_covering(md)?.position_at(md))
    }

    /// Hole direction at measured depth `md`.
    ///
    /// A station's recorded angles are returned as-is; elsewhere the direction
    /// is the tangent of the interpolating arc or chord.
    ///
    /// # Errors
    /// Same as [`tvd_at`](Self::tvd_at).
    pub fn orientation_at(&self, md: f64) -> error::Result<Orientation> {
        self.check_md(md)?;
        if let Some(orientation) = self.station_at(md).and_then(SurveyStation::orientation) {
            return Ok(orientation);
        }
        Ok(self.segment_covering(md)?.orientation_at(md))
    }

    /// Every MD at which the path reaches `tvd`, ascending.
    ///
    /// Crossings closer than [`CROSSING_MERGE_TOLERANCE`] are reported once, so
    /// a TVD met exactly at a station shared by two segments appears once.
    ///
    /// # Errors
    /// Returns [`WellpathError::RangeError`] if `tvd` is outside
    /// [`tvd_range`](Self::tvd_range) by more than [`CROSSING_TOLERANCE`], is
    /// not finite, or the stations span fewer than two distinct MDs.
    pub fn md_crossings(&self, tvd: f64) -> error::Result<Vec<MeasuredDepth>> {
        let range = self.tvd_range();
        let Some((lo, hi)) = range else {
            return Err(WellpathError::tvd_out_of_range(tvd, None));
        };
        if !tvd.is_finite() || tvd < lo - CROSSING_TOLERANCE || tvd > hi + CROSSING_TOLERANCE {
            return Err(WellpathError::tvd_out_of_range(tvd, range));
        }

        let mut mds: Vec<f64> = self
            .segments
            .iter()
            .flat_map(|segment| segment.crossings(tvd))
            .collect();
        mds.sort_by(f64::total_cmp);
        mds.dedup_by(|later, earlier| (*later - *earlier).abs() < CROSSING_MERGE_TOLERANCE);
        Ok(mds.into_iter().map(MeasuredDepth).collect())
    }

    /// Measured depth at which the path reaches `tvd`.
    ///
    /// When the TVD is reached more than once the
    /// [`crossing_policy`](Self::crossing_policy) decides; the default,
    /// [`CrossingPolicy::First`], returns the smallest MD.
    ///
    /// # Errors
    /// Same as [`md_crossings`](Self::md_crossings).
    pub fn md_at_tvd(&self, tvd: f64) -> error::Result<MeasuredDepth> {
        let crossings = self.md_crossings(tvd)?;
        self.policy
            .select(&crossings)
            .ok_or_else(|| WellpathError::tvd_out_of_range(tvd, self.tvd_range()))
    }

    fn check_md(&self, md: f64) -> error::Result<()> {
        if self.segments.is_empty() {
            return Err(WellpathError::md_out_of_range(md, None));
        }
        let (lo, hi) = self.bounds();
        if !md.is_finite() || md < lo || md > hi {
            return Err(WellpathError::md_out_of_range(md, Some((lo, hi))));
        }
        Ok(())
    }

    /// First station with exactly this MD.
    fn station_at(&self, md: f64) -> Option<&SurveyStation> {
        let i = self.stations.partition_point(|s| s.md() < md);
        self.stations.get(i).filter(|s| s.md() == md)
    }

    /// First segment with `start.md ≤ md ≤ end.md`.
    fn segment_covering(&self, md: f64) -> error::Result<&Segment> {
        let i = self.segments.partition_point(|s| s.end().md() < md);
        self.segments
            .get(i)
            .filter(|s| s.contains(md) || s.start().md() == md || s.end().md() == md)
            .ok_or_else(|| WellpathError::md_out_of_range(md, Some(self.bounds())))
    }
}

fn same_position(a: &Position, b: &Position) -> bool {
    (a.east - b.east).abs() <= POSITION_TOLERANCE
        && (a.north - b.north).abs() <= POSITION_TOLERANCE
        && (a.z - b.z).abs() <= POSITION_TOLERANCE
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn station(md: f64, z: f64) -> SurveyStation {
        SurveyStation::new(md, Position::new(0.0, 0.0, z)).unwrap()
    }

    fn vertical(md: f64) -> SurveyStation {
        SurveyStation::with_angles(md, 0.0, 0.0, Position::new(0.0, 0.0, md)).unwrap()
    }

    // --- Construction ---

    #[test]
    fn rejects_empty() {
        let result = Trajectory::new(vec![]);
        assert!(matches!(result, Err(WellpathError::ValidationError { .. })));
    }

    #[test]
    fn rejects_decreasing_md() {
        let result = Trajectory::new(vec![vertical(0.0), vertical(20.0), vertical(10.0)]);
        assert!(matches!(result, Err(WellpathError::ValidationError { .. })));
    }

    #[test]
    fn rejects_inconsistent_duplicates() {
        let result = Trajectory::new(vec![station(0.0, 0.0), station(10.0, 10.0), station(10.0, 10.5)]);
        assert!(matches!(result, Err(WellpathError::ValidationError { .. })));
    }

    #[test]
    fn duplicates_produce_no_segment() {
        let t = Trajectory::new(vec![vertical(0.0), vertical(10.0), vertical(10.0), vertical(30.0)]).unwrap();
        assert_eq!(t.segments().len(), 2);
        assert_eq!(t.bounds(), (0.0, 30.0));
        assert_eq!(t.segments()[1].start().md(), 10.0);
    }

    #[test]
    fn single_station_builds_but_cannot_answer() {
        let t = Trajectory::new(vec![vertical(5.0)]).unwrap();
        assert_eq!(t.bounds(), (5.0, 5.0));
        assert!(t.tvd_range().is_none());
        assert!(matches!(t.tvd_at(5.0), Err(WellpathError::RangeError { bounds: None, .. })));
        assert!(matches!(t.md_at_tvd(5.0), Err(WellpathError::RangeError { .. })));
    }

    #[test]
    fn duplicate_only_model_cannot_answer() {
        let t = Trajectory::new(vec![vertical(5.0), vertical(5.0)]).unwrap();
        assert!(t.segments().is_empty());
        assert!(t.tvd_at(5.0).is_err());
    }

    // --- tvd_at ---

    #[test]
    fn tvd_exact_at_stations() {
        let t = Trajectory::new(vec![station(0.0, 0.0), station(10.0, 9.5), station(10.0, 9.5), station(20.0, 18.0)]).unwrap();
        for s in t.stations() {
            assert_eq!(t.tvd_at(s.md()).unwrap().0, s.tvd());
        }
    }

    #[test]
    fn tvd_rejects_out_of_range() {
        let t = Trajectory::new(vec![vertical(10.0), vertical(20.0)]).unwrap();
        assert!(matches!(t.tvd_at(9.999), Err(WellpathError::RangeError { .. })));
        assert!(matches!(t.tvd_at(20.001), Err(WellpathError::RangeError { .. })));
        assert!(matches!(t.tvd_at(f64::NAN), Err(WellpathError::RangeError { .. })));
    }

    #[test]
    fn tvd_at_many_matches_single() {
        let t = Trajectory::new(vec![vertical(0.0), vertical(50.0)]).unwrap();
        let tvds = t.tvd_at_many(&[0.0, 12.5, 50.0]).unwrap();
        assert_eq!(tvds, vec![VerticalDepth(0.0), VerticalDepth(12.5), VerticalDepth(50.0)]);
        assert!(t.tvd_at_many(&[10.0, 60.0]).is_err());
    }

    #[test]
    fn position_and_orientation_at_station() {
        let t = Trajectory::new(vec![vertical(0.0), vertical(50.0)]).unwrap();
        assert_eq!(t.position_at(50.0).unwrap(), Position::new(0.0, 0.0, 50.0));
        let o = t.orientation_at(25.0).unwrap();
        assert_abs_diff_eq!(o.inclination, 0.0, epsilon = 1e-12);
    }

    // --- md_at_tvd ---

    #[test]
    fn md_on_straight_vertical() {
        let t = Trajectory::new(vec![vertical(0.0), vertical(50.0)]).unwrap();
        assert_eq!(t.md_at_tvd(20.0).unwrap().0, 20.0);
        assert!(matches!(t.md_at_tvd(-0.5), Err(WellpathError::RangeError { .. })));
        assert!(matches!(t.md_at_tvd(50.5), Err(WellpathError::RangeError { .. })));
    }

    #[test]
    fn crossing_shared_by_two_segments_reported_once() {
        let t = Trajectory::new(vec![station(0.0, 0.0), station(10.0, 10.0), station(20.0, 20.0)]).unwrap();
        assert_eq!(t.md_crossings(10.0).unwrap(), vec![MeasuredDepth(10.0)]);
    }

    #[test]
    fn policy_selects_among_crossings() {
        // Straight down 0→10, then straight back up 10→20 (hole kicks back).
        let stations = vec![
            SurveyStation::new(0.0, Position::new(0.0, 0.0, 0.0)).unwrap(),
            SurveyStation::new(10.0, Position::new(0.0, 0.0, 10.0)).unwrap(),
            SurveyStation::new(20.0, Position::new(0.0, 0.0, 0.0)).unwrap(),
        ];
        let t = Trajectory::new(stations).unwrap();
        let crossings = t.md_crossings(4.0).unwrap();
        assert_eq!(crossings.len(), 2);
        assert_abs_diff_eq!(crossings[0].0, 4.0, epsilon = 1e-12);
        assert_abs_diff_eq!(crossings[1].0, 16.0, epsilon = 1e-12);

        assert_abs_diff_eq!(t.md_at_tvd(4.0).unwrap().0, 4.0, epsilon = 1e-12);
        let last = t.with_crossing_policy(CrossingPolicy::Last);
        assert_abs_diff_eq!(last.md_at_tvd(4.0).unwrap().0, 16.0, epsilon = 1e-12);
    }

    // --- Serde ---

    #[test]
    fn serde_round_trip() {
        let t = Trajectory::new(vec![vertical(0.0), vertical(10.0), vertical(10.0), vertical(30.0)])
            .unwrap()
            .with_crossing_policy(CrossingPolicy::Last);
        let json = serde_json::to_string(&t).unwrap();
        let t2: Trajectory = serde_json::from_str(&json).unwrap();
        assert_eq!(t2.stations(), t.stations());
        assert_eq!(t2.segments(), t.segments());
        assert_eq!(t2.crossing_policy(), CrossingPolicy::Last);
    }

    #[test]
    fn serde_rejects_unsorted() {
        let json = r#"{"stations":[
            {"md":10.0,"position":{"east":0.0,"north":0.0,"z":10.0}},
            {"md":5.0,"position":{"east":0.0,"north":0.0,"z":5.0}}
        ]}"#;
        assert!(serde_json::from_str::<Trajectory>(json).is_err());
    }

    #[test]
    fn trajectory_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Trajectory>();
    }
}
