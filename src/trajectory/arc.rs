//! Constant-curvature arc geometry.
//!
//! An arc segment is anchored on its chord: with `β` the total turn,
//! `ψ = β·(t − ½)` the turn angle measured from the chord midpoint,
//! `S = sin(β/2)`, `C = cos(β/2)` and chord-fitted radius `ρ = c / (2S)`,
//! the point at MD fraction `t` is
//!
//! ```text
//! P(t) = P₀ + d·(sin ψ + S)/(2S) − ρ·(cos ψ − C)·n
//! ```
//!
//! where `d = P₁ − P₀` is the chord and `n` the unit bend direction
//! (perpendicular to `d`, pointing where the tangent turns). Both end points
//! are reproduced exactly, and for a survey whose positions came from the
//! minimum-curvature method this is the same circle the method assumes.
//!
//! The weights `(sin ψ + S)/(2S)` and `ρ·(cos ψ − C)` are evaluated in
//! product form, `sin(βt/2)·cos(β(t−1)/2)/S` and `−2ρ·sin(βt/2)·sin(β(t−1)/2)`,
//! so arcs whose radius dwarfs the chord keep full precision.
//!
//! The vertical component is a pure sinusoid in `ψ`: its extrema split the
//! arc into monotonic branches, and on each branch TVD → MD has a closed-form
//! estimate that is polished against the start-relative profile.

use std::f64::consts::{PI, TAU};

use nalgebra::Vector3;

use crate::optim::{RootConfig, safeguarded_newton};
use crate::tolerance::CROSSING_TOLERANCE;

/// How an arc's dogleg and bend direction were obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArcSource {
    /// From inclination/azimuth recorded at both end stations.
    Angles,
    /// Inferred from the chord alone (no angles at one or both ends).
    Implied,
}

/// Geometry of one curved segment, relative to its start station and chord.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcGeometry {
    source: ArcSource,
    dogleg: f64,
    half_sin: f64,
    half_cos: f64,
    radius: f64,
    bend: Vector3<f64>,
}

impl ArcGeometry {
    /// `bend` must be a unit vector perpendicular to the chord, `dogleg` in `(0, 2π)`.
    pub(crate) fn new(source: ArcSource, dogleg: f64, chord_length: f64, bend: Vector3<f64>) -> Self {
        let (half_sin, half_cos) = (0.5 * dogleg).sin_cos();
        Self {
            source,
            dogleg,
            half_sin,
            half_cos,
            radius: chord_length / (2.0 * half_sin),
            bend,
        }
    }

    pub fn source(&self) -> ArcSource {
        self.source
    }

    /// Total turn across the segment, radians.
    pub fn dogleg(&self) -> f64 {
        self.dogleg
    }

    /// Radius of the circle through both end stations.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    fn turn_angle(&self, fraction: f64) -> f64 {
        self.dogleg * (fraction - 0.5)
    }

    /// Share of the chord covered at fraction `t`: 0 at the start, 1 at the end.
    fn chord_weight(&self, fraction: f64) -> f64 {
        let lead = (0.5 * self.dogleg * fraction).sin();
        let trail = (0.5 * self.dogleg * (fraction - 1.0)).cos();
        lead * trail / self.half_sin
    }

    /// Distance from the chord, against the bend direction. Zero at both ends.
    fn sag(&self, fraction: f64) -> f64 {
        let lead = (0.5 * self.dogleg * fraction).sin();
        let trail = (0.5 * self.dogleg * (fraction - 1.0)).sin();
        -2.0 * self.radius * lead * trail
    }

    /// Displacement from the start station at MD fraction `t ∈ [0, 1]`.
    pub(crate) fn offset(&self, chord: &Vector3<f64>, fraction: f64) -> Vector3<f64> {
        chord * self.chord_weight(fraction) - self.bend * self.sag(fraction)
    }

    /// Vertical displacement from the start station at MD fraction `t`.
    pub(crate) fn vertical_offset(&self, chord_dz: f64, fraction: f64) -> f64 {
        chord_dz * self.chord_weight(fraction) - self.bend.z * self.sag(fraction)
    }

    /// Tangent direction at MD fraction `t`.
    pub(crate) fn tangent(&self, chord: &Vector3<f64>, fraction: f64) -> Vector3<f64> {
        let psi = self.turn_angle(fraction);
        let u = chord.normalize();
        u * psi.cos() + self.bend * psi.sin()
    }

    pub(crate) fn vertical_profile(&self, z_start: f64, z_end: f64) -> VerticalProfile<'_> {
        VerticalProfile {
            arc: self,
            dz: z_end - z_start,
            z_start,
            z_end,
        }
    }
}

/// TVD along one arc as a function of the MD fraction `t ∈ [0, 1]`.
///
/// In turn-angle form `z(ψ) = a + sin_coef·sin ψ + cos_coef·cos ψ`, with
/// `sin_coef = Δz/(2S)` and `cos_coef = −ρ·n_z`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct VerticalProfile<'a> {
    arc: &'a ArcGeometry,
    dz: f64,
    z_start: f64,
    z_end: f64,
}

impl VerticalProfile<'_> {
    fn eval(&self, fraction: f64) -> f64 {
        if fraction <= 0.0 {
            return self.z_start;
        }
        if fraction >= 1.0 {
            return self.z_end;
        }
        self.z_start + self.arc.vertical_offset(self.dz, fraction)
    }

    /// `dz/dt`.
    fn slope(&self, fraction: f64) -> f64 {
        let psi = self.arc.turn_angle(fraction);
        self.arc.dogleg * (self.sin_coef() * psi.cos() - self.cos_coef() * psi.sin())
    }

    fn sin_coef(&self) -> f64 {
        self.dz / (2.0 * self.arc.half_sin)
    }

    fn cos_coef(&self) -> f64 {
        -self.arc.radius * self.arc.bend.z
    }

    fn amplitude(&self) -> f64 {
        self.sin_coef().hypot(self.cos_coef())
    }

    /// Phase `δ` with `sin_coef·sin ψ + cos_coef·cos ψ = M·cos(ψ − δ)`.
    fn phase(&self) -> f64 {
        self.sin_coef().atan2(self.cos_coef())
    }

    fn fraction_of(&self, psi: f64) -> f64 {
        psi / self.arc.dogleg + 0.5
    }

    /// Split `[0, 1]` at interior extrema into monotonic branches.
    pub(crate) fn branches(&self) -> Vec<(f64, f64)> {
        let mut cuts = vec![0.0];
        if self.amplitude() > 0.0 {
            let delta = self.phase();
            // An extremum sitting on an end station is not a branch point.
            let edge = 1e-12;
            let mut extrema: Vec<f64> = (-3..=3)
                .map(|k| self.fraction_of(delta + f64::from(k) * PI))
                .filter(|&t| t > edge && t < 1.0 - edge)
                .collect();
            extrema.sort_by(f64::total_cmp);
            cuts.extend(extrema);
        }
        cuts.push(1.0);
        cuts.windows(2).map(|w| (w[0], w[1])).collect()
    }

    /// Minimum and maximum `z` over the whole arc.
    pub(crate) fn extent(&self) -> (f64, f64) {
        self.branches()
            .iter()
            .flat_map(|&(a, b)| [self.eval(a), self.eval(b)])
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), z| {
                (lo.min(z), hi.max(z))
            })
    }

    /// All MD fractions where the profile reaches `target`, ascending.
    ///
    /// A root on the boundary between two branches is returned by both;
    /// callers merge near-equal results.
    pub(crate) fn solve(&self, target: f64) -> Vec<f64> {
        self.branches()
            .into_iter()
            .filter_map(|(a, b)| self.solve_branch(target, a, b))
            .collect()
    }

    fn solve_branch(&self, target: f64, a: f64, b: f64) -> Option<f64> {
        let (za, zb) = (self.eval(a), self.eval(b));
        let (lo, hi) = (za.min(zb), za.max(zb));
        if target < lo - CROSSING_TOLERANCE || target > hi + CROSSING_TOLERANCE {
            return None;
        }
        if target <= lo || target >= hi {
            // Branch end (or a flat branch): pick the end that matches.
            let at_a = (target - za).abs() <= (target - zb).abs();
            return Some(if at_a { a } else { b });
        }

        let guess = self.closed_form(target, a, b).unwrap_or(0.5 * (a + b));
        Some(safeguarded_newton(
            |t| self.eval(t) - target,
            |t| self.slope(t),
            a,
            b,
            guess,
            &RootConfig::default(),
        ))
    }

    /// Closed-form root on `[a, b]` from the sinusoid. Loses accuracy when
    /// the radius is much larger than the chord; only used as a start point.
    fn closed_form(&self, target: f64, a: f64, b: f64) -> Option<f64> {
        let arc = self.arc;
        let center = self.z_start + 0.5 * self.dz + arc.radius * arc.bend.z * arc.half_cos;
        let ratio = ((target - center) / self.amplitude()).clamp(-1.0, 1.0);
        let spread = ratio.acos();
        let delta = self.phase();
        let slack = 1e-9;
        [spread, -spread]
            .into_iter()
            .flat_map(|s| (-2..=2).map(move |k| delta + s + f64::from(k) * TAU))
            .map(|psi| self.fraction_of(psi))
            .find(|&t| t >= a - slack && t <= b + slack)
            .map(|t| t.clamp(a, b))
    }
}
