//! Trajectory segments between consecutive stations.
//!
//! Each non-degenerate segment is classified once, when the trajectory is
//! built, into a [`SegmentShape`]: a straight chord or a constant-curvature
//! arc whose dogleg comes either from the recorded angles or from the chord.

use nalgebra::Vector3;

use crate::optim::solve_half_turn;
use crate::station::{Orientation, SurveyStation};
use crate::tolerance::{BEND_TOLERANCE, CROSSING_TOLERANCE, DOGLEG_TOLERANCE};
use crate::trajectory::arc::{ArcGeometry, ArcSource};
use crate::types::Position;

/// Interpolation strategy for one segment.
#[derive(Debug, Clone, PartialEq)]
pub enum SegmentShape {
    /// Every coordinate is linear in MD.
    Straight,
    /// Constant-curvature arc.
    Arc(ArcGeometry),
}

/// Pair of consecutive stations with `end.md() > start.md()`.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    start: SurveyStation,
    end: SurveyStation,
    chord: Vector3<f64>,
    shape: SegmentShape,
}

impl Segment {
    /// Classify the segment between `start` and `end`.
    ///
    /// `previous` and `next` are the unit chord directions of the neighbouring
    /// segments; they orient an implied arc when angles are missing.
    pub(crate) fn build(
        start: SurveyStation,
        end: SurveyStation,
        previous: Option<Vector3<f64>>,
        next: Option<Vector3<f64>>,
    ) -> Self {
        let chord = end.position().to_vector() - start.position().to_vector();
        let shape = classify(&start, &end, &chord, previous, next);
        Self {
            start,
            end,
            chord,
            shape,
        }
    }

    pub fn start(&self) -> &SurveyStation {
        &self.start
    }

    pub fn end(&self) -> &SurveyStation {
        &self.end
    }

    pub fn shape(&self) -> &SegmentShape {
        &self.shape
    }

    /// `ΔMD = end.md − start.md`, always positive.
    pub fn md_span(&self) -> f64 {
        self.end.md() - self.start.md()
    }

    /// Straight-line distance between the end stations.
    pub fn chord_length(&self) -> f64 {
        self.chord.norm()
    }

    /// Total turn across the segment in radians; zero for a straight segment.
    pub fn dogleg(&self) -> f64 {
        match &self.shape {
            SegmentShape::Straight => 0.0,
            SegmentShape::Arc(arc) => arc.dogleg(),
        }
    }

    pub(crate) fn unit_chord(&self) -> Option<Vector3<f64>> {
        self.chord.try_normalize(BEND_TOLERANCE)
    }

    /// Whether `md` lies strictly inside the segment.
    pub(crate) fn contains(&self, md: f64) -> bool {
        md > self.start.md() && md < self.end.md()
    }

    fn fraction(&self, md: f64) -> f64 {
        (md - self.start.md()) / self.md_span()
    }

    /// TVD at an MD inside the segment.
    pub(crate) fn tvd_at(&self, md: f64) -> f64 {
        let z0 = self.start.tvd();
        match &self.shape {
            SegmentShape::Straight => z0 + (md - self.start.md()) * self.chord.z / self.md_span(),
            SegmentShape::Arc(arc) => z0 + arc.vertical_offset(self.chord.z, self.fraction(md)),
        }
    }

    /// Full position at an MD inside the segment.
    pub(crate) fn position_at(&self, md: f64) -> Position {
        let t = self.fraction(md);
        let p0 = self.start.position().to_vector();
        let p = match &self.shape {
            SegmentShape::Straight => p0 + self.chord * t,
            SegmentShape::Arc(arc) => p0 + arc.offset(&self.chord, t),
        };
        Position::from_vector(&p)
    }

    /// Hole direction at an MD inside the segment.
    pub(crate) fn orientation_at(&self, md: f64) -> Orientation {
        let tangent = match &self.shape {
            SegmentShape::Arc(arc) => Some(arc.tangent(&self.chord, self.fraction(md))),
            SegmentShape::Straight => self.unit_chord(),
        };
        match tangent {
            Some(t) => orientation_of(&t),
            None => self.start.orientation().unwrap_or(Orientation {
                inclination: 0.0,
                azimuth: 0.0,
            }),
        }
    }

    /// Minimum and maximum TVD reached on the segment.
    pub fn tvd_extent(&self) -> (f64, f64) {
        let (z0, z1) = (self.start.tvd(), self.end.tvd());
        match &self.shape {
            SegmentShape::Straight => (z0.min(z1), z0.max(z1)),
            SegmentShape::Arc(arc) => arc.vertical_profile(z0, z1).extent(),
        }
    }

    /// MDs inside `[start.md, end.md]` where the segment reaches `tvd`, ascending.
    ///
    /// A segment lying flat at exactly `tvd` reports its start only.
    pub(crate) fn crossings(&self, tvd: f64) -> Vec<f64> {
        let (z0, z1) = (self.start.tvd(), self.end.tvd());
        let md0 = self.start.md();
        let span = self.md_span();
        match &self.shape {
            SegmentShape::Straight => {
                if tvd < z0.min(z1) - CROSSING_TOLERANCE || tvd > z0.max(z1) + CROSSING_TOLERANCE
                {
                    return Vec::new();
                }
                let dz = z1 - z0;
                if dz == 0.0 {
                    return vec![md0];
                }
                vec![(md0 + (tvd - z0) * span / dz).clamp(md0, self.end.md())]
            }
            SegmentShape::Arc(arc) => arc
                .vertical_profile(z0, z1)
                .solve(tvd)
                .into_iter()
                .map(|t| md0 + t * span)
                .collect(),
        }
    }
}

fn classify(
    start: &SurveyStation,
    end: &SurveyStation,
    chord: &Vector3<f64>,
    previous: Option<Vector3<f64>>,
    next: Option<Vector3<f64>>,
) -> SegmentShape {
    let span = end.md() - start.md();
    let chord_length = chord.norm();

    // Longer than the hole itself: no circular arc fits, fall back to the chord.
    if chord_length > span {
        #[cfg(feature = "logging")]
        tracing::debug!(
            md_start = start.md(),
            md_end = end.md(),
            chord_length,
            span,
            "chord exceeds measured depth span, segment treated as straight"
        );
        return SegmentShape::Straight;
    }
    let Some(u) = chord.try_normalize(BEND_TOLERANCE) else {
        return SegmentShape::Straight;
    };

    let (source, dogleg, bend) = match (start.orientation(), end.orientation()) {
        (Some(a), Some(b)) => {
            let (t0, t1) = (a.tangent(), b.tangent());
            let dogleg = 2.0 * (t1 - t0).norm().atan2((t1 + t0).norm());
            (ArcSource::Angles, dogleg, perpendicular(&(t1 - t0), &u))
        }
        _ => {
            let dogleg = 2.0 * solve_half_turn(chord_length / span);
            (ArcSource::Implied, dogleg, implied_bend(&u, previous, next))
        }
    };

    match bend {
        Some(bend) if dogleg >= DOGLEG_TOLERANCE => {
            SegmentShape::Arc(ArcGeometry::new(source, dogleg, chord_length, bend))
        }
        _ => SegmentShape::Straight,
    }
}

/// Unit component of `w` perpendicular to the unit vector `u`, if any.
fn perpendicular(w: &Vector3<f64>, u: &Vector3<f64>) -> Option<Vector3<f64>> {
    (w - u * w.dot(u)).try_normalize(BEND_TOLERANCE)
}

/// Bend direction for an arc known only by its chord.
///
/// Follows the turn from the previous chord into the next one; without a
/// usable turn, bends in the chord's vertical plane away from vertical
/// (build-up); a vertical chord bends east, which leaves TVD unaffected.
fn implied_bend(
    u: &Vector3<f64>,
    previous: Option<Vector3<f64>>,
    next: Option<Vector3<f64>>,
) -> Option<Vector3<f64>> {
    let incoming = previous.unwrap_or(*u);
    let outgoing = next.unwrap_or(*u);
    perpendicular(&(outgoing - incoming), u)
        .or_else(|| perpendicular(&Vector3::z(), u).map(|n| -n))
        .or_else(|| perpendicular(&Vector3::x(), u))
}

fn orientation_of(tangent: &Vector3<f64>) -> Orientation {
    let horizontal = tangent.x.hypot(tangent.y);
    let inclination = horizontal.atan2(tangent.z).to_degrees();
    let azimuth = if horizontal > BEND_TOLERANCE {
        tangent.x.atan2(tangent.y).to_degrees().rem_euclid(360.0)
    } else {
        0.0
    };
    Orientation {
        inclination,
        azimuth,
    }
}
