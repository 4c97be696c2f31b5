//! Internal one-dimensional root finding.

/// Configuration for the safeguarded Newton solver.
pub(crate) struct RootConfig {
    /// Maximum number of iterations.
    pub max_iter: usize,
    /// Convergence threshold on bracket width.
    pub x_tol: f64,
}

impl Default for RootConfig {
    fn default() -> Self {
        Self {
            max_iter: 200,
            x_tol: 1e-15,
        }
    }
}

/// Find a root of `f` in `[lo, hi]` where `f` changes sign across the bracket.
///
/// Iteration starts at `guess` (the midpoint if it lies outside the bracket).
/// Newton steps from `derivative` are taken while they stay inside the
/// current bracket; otherwise the step falls back to bisection, so the
/// bracket always shrinks. Returns the best estimate found, which is an
/// endpoint if `f` does not change sign.
pub(crate) fn safeguarded_newton<F, D>(
    f: F,
    derivative: D,
    mut lo: f64,
    mut hi: f64,
    guess: f64,
    config: &RootConfig,
) -> f64
where
    F: Fn(f64) -> f64,
    D: Fn(f64) -> f64,
{
    let mut f_lo = f(lo);
    let f_hi = f(hi);
    if f_lo == 0.0 {
        return lo;
    }
    if f_hi == 0.0 {
        return hi;
    }
    if f_lo.signum() == f_hi.signum() {
        return if f_lo.abs() <= f_hi.abs() { lo } else { hi };
    }

    let mut x = if guess > lo && guess < hi {
        guess
    } else {
        0.5 * (lo + hi)
    };
    for _ in 0..config.max_iter {
        let fx = f(x);
        if fx == 0.0 {
            return x;
        }
        if fx.signum() == f_lo.signum() {
            lo = x;
            f_lo = fx;
        } else {
            hi = x;
        }
        if hi - lo <= config.x_tol * (1.0 + x.abs()) {
            break;
        }

        let d = derivative(x);
        let newton = if d != 0.0 && d.is_finite() {
            x - fx / d
        } else {
            f64::NAN
        };
        if newton > lo && newton < hi {
            if (newton - x).abs() <= config.x_tol * (1.0 + x.abs()) {
                return newton;
            }
            x = newton;
        } else {
            x = 0.5 * (lo + hi);
        }
    }
    x
}

/// Solve `sin(x) / x = ratio` for `x ∈ (0, π)`.
///
/// `sin(x)/x` decreases strictly from 1 to 0 on that interval, so every
/// `ratio ∈ (0, 1)` has exactly one solution. This is the half-turn of a
/// circular arc whose chord is `ratio` times its length.
///
/// The residual is taken on `1 − sin(x)/x` against `1 − ratio`, which keeps
/// full precision for chords within a hair of their arc length.
pub(crate) fn solve_half_turn(ratio: f64) -> f64 {
    let deficit = 1.0 - ratio;
    let f = |x: f64| one_minus_sinc(x) - deficit;
    let df = |x: f64| {
        if x < SERIES_LIMIT {
            x / 3.0 - x * x * x / 30.0
        } else {
            (x.sin() - x * x.cos()) / (x * x)
        }
    };
    // Small-angle estimate: 1 − sin(x)/x ≈ x²/6.
    let guess = (6.0 * deficit).max(0.0).sqrt();
    let config = RootConfig::default();
    safeguarded_newton(f, df, f64::EPSILON, std::f64::consts::PI, guess, &config)
}

const SERIES_LIMIT: f64 = 1e-2;

/// `1 − sin(x)/x`, by its Taylor series near zero.
fn one_minus_sinc(x: f64) -> f64 {
    if x < SERIES_LIMIT {
        let x2 = x * x;
        x2 / 6.0 * (1.0 - x2 / 20.0 * (1.0 - x2 / 42.0))
    } else {
        1.0 - x.sin() / x
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn finds_cubic_root() {
        let config = RootConfig::default();
        let x = safeguarded_newton(|x| x * x * x - 8.0, |x| 3.0 * x * x, 0.0, 5.0, 2.5, &config);
        assert_abs_diff_eq!(x, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn no_sign_change_returns_closest_endpoint() {
        let config = RootConfig::default();
        let x = safeguarded_newton(|x| x + 10.0, |_| 1.0, 0.0, 5.0, 2.5, &config);
        assert_eq!(x, 0.0);
    }

    #[test]
    fn half_turn_of_quarter_circle() {
        // A quarter circle (β = π/2) has chord/length = sin(π/4)/(π/4).
        let x = PI / 4.0;
        let ratio = x.sin() / x;
        assert_abs_diff_eq!(solve_half_turn(ratio), x, epsilon = 1e-12);
    }

    #[test]
    fn half_turn_of_semicircle() {
        let ratio = 2.0 / PI;
        assert_abs_diff_eq!(solve_half_turn(ratio), FRAC_PI_2, epsilon = 1e-12);
    }

    #[test]
    fn half_turn_near_straight() {
        let x: f64 = 1e-3;
        let ratio = x.sin() / x;
        assert_abs_diff_eq!(solve_half_turn(ratio), x, epsilon = 1e-9);
    }

    #[test]
    fn half_turn_for_chord_a_hair_short() {
        // Chord 100, arc 100 + 1e-12: x ≈ sqrt(6 · 1e-14).
        let ratio: f64 = 100.0 / (100.0 + 1e-12);
        let expected = (6.0 * (1.0 - ratio)).sqrt();
        let x = solve_half_turn(ratio);
        assert_abs_diff_eq!(x, expected, epsilon = 1e-12);
        assert!(x > 0.0);
    }

    #[test]
    fn series_matches_direct_form_at_switch() {
        let x = SERIES_LIMIT * 0.999_999;
        assert_abs_diff_eq!(one_minus_sinc(x), 1.0 - x.sin() / x, epsilon = 1e-12);
    }

    #[test]
    fn guess_inside_bracket_is_used() {
        let config = RootConfig::default();
        let x = safeguarded_newton(|x| x * x - 2.0, |x| 2.0 * x, 0.0, 2.0, 1.4, &config);
        assert_abs_diff_eq!(x, std::f64::consts::SQRT_2, epsilon = 1e-14);
    }
}
