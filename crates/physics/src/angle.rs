use std::f64::consts::PI;

/// Wraps `x` into the half-open interval `(low, high]`.
///
/// Non-finite inputs come back as NaN so that divergence stays visible.
#[must_use]
pub fn wrap(x: f64, low: f64, high: f64) -> f64 {
    let span = high - low;
    let wrapped = high - (high - x).rem_euclid(span);
    // rem_euclid may round up to `span` for tiny negative remainders.
    if wrapped <= low {
        wrapped + span
    } else {
        wrapped
    }
}

/// Wraps an angle into `(-pi, pi]`.
#[must_use]
pub fn wrap_angle(x: f64) -> f64 {
    wrap(x, -PI, PI)
}

/// Clamps `x` into `[low, high]`, propagating NaN.
#[must_use]
pub fn bound(x: f64, low: f64, high: f64) -> f64 {
    if x.is_nan() {
        x
    } else {
        x.max(low).min(high)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::TAU;

    #[test]
    fn wrap_angle_lands_in_half_open_interval() {
        assert_eq!(wrap_angle(0.0), 0.0);
        assert_eq!(wrap_angle(PI), PI);
        assert_eq!(wrap_angle(-PI), PI);
        assert!((wrap_angle(PI + 0.5) - (-PI + 0.5)).abs() < 1e-12);
        assert!((wrap_angle(5.0 * TAU + 1.0) - 1.0).abs() < 1e-9);
        assert!((wrap_angle(-7.0) - (-7.0 + TAU)).abs() < 1e-12);
        for i in -1000..1000 {
            let a = wrap_angle(f64::from(i) * 0.0137);
            assert!(a > -PI && a <= PI, "{a} out of range");
        }
    }

    #[test]
    fn non_finite_angles_stay_non_finite() {
        assert!(wrap_angle(f64::NAN).is_nan());
        assert!(!wrap_angle(f64::INFINITY).is_finite());
    }

    #[test]
    fn bound_clamps_but_keeps_nan() {
        assert_eq!(bound(5.0, -1.0, 1.0), 1.0);
        assert_eq!(bound(-5.0, -1.0, 1.0), -1.0);
        assert!(bound(f64::NAN, -1.0, 1.0).is_nan());
    }
}
