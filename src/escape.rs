// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The escape-time test at the heart of every Mandelbrot renderer.

use num::Complex;

/// The classic iterator function.  Starting from zero, repeatedly
/// square and add `c` until the value leaves the circle of radius two
/// around the origin, or until `limit` iterations have been performed.
///
/// Returns the number of iterations actually reached.  A return value
/// equal to `limit` means the point never escaped and is presumed to
/// be a member of the set; anything less is the escape "velocity,"
/// which is what a smooth colorizer would want.
pub fn escape_iterations(c: Complex<f64>, limit: usize) -> usize {
    let mut z: Complex<f64> = Complex { re: 0.0, im: 0.0 };
    let mut iterations = 0;
    // |z| < 2 without the square root.
    while z.norm_sqr() < 4.0 && iterations < limit {
        z = z * z + c;
        iterations += 1;
    }
    iterations
}

/// True when `c` survived all `limit` iterations.
#[inline]
pub fn is_inside(c: Complex<f64>, limit: usize) -> bool {
    escape_iterations(c, limit) == limit
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_never_escapes() {
        assert_eq!(escape_iterations(Complex::new(0.0, 0.0), 500), 500);
        assert!(is_inside(Complex::new(0.0, 0.0), 500));
    }

    #[test]
    fn far_point_escapes_after_first_step() {
        // z1 = c, which is already outside the radius.
        assert_eq!(escape_iterations(Complex::new(3.0, 0.0), 500), 1);
        assert!(!is_inside(Complex::new(3.0, 0.0), 500));
    }

    #[test]
    fn point_on_the_radius_counts_as_escaped() {
        // z1 = -2, |z1| == 2.0 stops the loop.
        assert_eq!(escape_iterations(Complex::new(-2.0, 0.0), 500), 1);
    }

    #[test]
    fn zero_limit_reports_zero() {
        assert_eq!(escape_iterations(Complex::new(0.0, 0.0), 0), 0);
    }

    #[test]
    fn period_two_bulb_is_inside() {
        assert!(is_inside(Complex::new(-1.0, 0.0), 1000));
    }

    #[test]
    fn escape_count_is_deterministic() {
        let c = Complex::new(-0.75, 0.1);
        let first = escape_iterations(c, 500);
        for _ in 0..10 {
            assert_eq!(escape_iterations(c, 500), first);
        }
        assert!(first < 500);
    }
}
