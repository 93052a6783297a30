// Copyright 2025 the Proksima Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Degree-generic Bézier curve evaluation and arc length.
//!
//! A curve is an ordered slice of control points; its degree is the
//! slice length minus one. Two independent evaluation paths are
//! provided: [`eval`], the de Casteljau recurrence, and
//! [`point_on_path`], a direct Bernstein-basis sum. The two agree to
//! floating-point tolerance and the redundancy is exploited by tests.

use smallvec::SmallVec;

use crate::common::choose;
use crate::Point;

#[cfg(not(feature = "std"))]
use crate::common::FloatFuncs;

/// Control polygon storage, inline up to the degree-5 polygons produced
/// by nearest-point queries on cubics.
pub(crate) type CurvePoly = SmallVec<[Point; 8]>;

/// Number of chords summed by [`curve_length`].
const ARCLEN_STEPS: usize = 200;

/// Evaluate the curve at parameter `t` using de Casteljau's recurrence.
///
/// `t` is typically in [0, 1] but is not clamped; values outside that
/// range extrapolate.
pub fn eval(curve: &[Point], t: f64) -> Point {
    assert!(curve.len() >= 2, "curve needs at least two control points");
    let n = curve.len() - 1;
    let mut tmp: CurvePoly = SmallVec::from_slice(curve);
    for i in 1..=n {
        for j in 0..=(n - i) {
            tmp[j] = tmp[j].lerp(tmp[j + 1], t);
        }
    }
    tmp[0]
}

/// Subdivide the curve at parameter `t`.
///
/// The left polygon is the first column of the de Casteljau triangle,
/// the right polygon its anti-diagonal. Both are valid control polygons
/// of the same degree, and together they trace the original curve over
/// [0, t] and [t, 1] exactly.
pub(crate) fn split(curve: &[Point], t: f64) -> (CurvePoly, CurvePoly) {
    let n = curve.len() - 1;
    let mut tmp: CurvePoly = SmallVec::from_slice(curve);
    let mut left: CurvePoly = SmallVec::from_slice(curve);
    let mut right: CurvePoly = SmallVec::from_slice(curve);
    for i in 1..=n {
        for j in 0..=(n - i) {
            tmp[j] = tmp[j].lerp(tmp[j + 1], t);
        }
        left[i] = tmp[0];
        right[n - i] = tmp[n - i];
    }
    (left, right)
}

// Bernstein basis function
fn basis_function(n: usize, i: usize, u: f64) -> f64 {
    choose(n, i) as f64 * (1.0 - u).powi((n - i) as i32) * u.powi(i as i32)
}

/// Evaluate the curve at `location` as an explicit Bernstein-basis sum.
///
/// This is an independent evaluation path from [`eval`]; it is the one
/// used for arc-length sampling.
pub fn point_on_path(curve: &[Point], location: f64) -> Point {
    assert!(curve.len() >= 2, "curve needs at least two control points");
    let n = curve.len() - 1;
    let mut x = 0.0;
    let mut y = 0.0;
    for (i, p) in curve.iter().enumerate() {
        let basis = basis_function(n, i, location);
        x += p.x * basis;
        y += p.y * basis;
    }
    Point::new(x, y)
}

/// Arc length of the curve, by summing chords over a fixed parameter
/// step of 0.005.
///
/// This is a non-adaptive polyline approximation: the error does not
/// shrink with curve size, but the sampling is dense enough for
/// screen-space curves.
pub fn curve_length(curve: &[Point]) -> f64 {
    assert!(curve.len() >= 2, "curve needs at least two control points");
    let dt = (ARCLEN_STEPS as f64).recip();
    let mut prev = point_on_path(curve, 0.0);
    let mut tally = 0.0;
    for i in 1..=ARCLEN_STEPS {
        let cur = point_on_path(curve, i as f64 * dt);
        tally += cur.distance(prev);
        prev = cur;
    }
    tally
}
