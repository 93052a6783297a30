// Copyright 2025 the Proksima Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Nearest-point queries on Bézier curves.
//!
//! The minimum-distance problem is converted into root finding: the
//! derivative of the squared distance between the query point and the
//! curve is itself a polynomial, and projecting it into Bézier form
//! lets its roots be isolated by recursive subdivision of the control
//! polygon. Candidate parameters are then compared by actual distance,
//! together with both curve endpoints.
//!
//! This is the classic Graphics Gems "nearest point on curve"
//! construction; it avoids the numerical fragility of closed-form
//! quintic/cubic solvers at the cost of recursion bounded by
//! [`MAX_RECURSION`].

use smallvec::SmallVec;

use crate::bezier::{self, CurvePoly};
use crate::common::choose;
use crate::{Point, Vec2};

/// Maximum subdivision depth of the root finder.
const MAX_RECURSION: usize = 64;

/// Intercept band width below which a control polygon is accepted as a
/// line segment.
const FLATNESS_TOLERANCE: f64 = 5.421010862427522e-20; // 2^-64

/// The result of a nearest-point query.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Nearest {
    /// Parameter of the nearest point, as a ratio of distance traveled
    /// along the curve, in [0, 1].
    pub location: f64,
    /// Euclidean distance from the query point to the curve.
    pub distance: f64,
}

/// Calculate the minimum distance from `point` to `curve`, and the
/// parameter at which it is attained.
///
/// Interior candidates come from the stationary points of the squared
/// distance; both curve endpoints are always considered as well, so
/// the open ends of the curve are handled even when no interior
/// stationary point exists. Ties are broken in favor of the earliest
/// candidate (endpoint `t = 0`, then interior candidates in subdivision
/// order, then `t = 1`).
///
/// # Examples
///
/// ```
/// use proksima::{distance_from_curve, Point};
///
/// let curve = [
///     Point::new(0.0, 0.0),
///     Point::new(1.0, 2.0),
///     Point::new(2.0, 3.0),
///     Point::new(4.0, 4.0),
/// ];
/// let nearest = distance_from_curve(Point::new(1.0, 3.0), &curve);
/// assert!((nearest.location - 0.5).abs() < 1e-6);
/// assert!((nearest.distance - 0.8838834764831844).abs() < 1e-9);
/// ```
pub fn distance_from_curve(point: Point, curve: &[Point]) -> Nearest {
    assert!(curve.len() >= 2, "curve needs at least two control points");
    let w = to_bezier_form(point, curve);
    let candidates = find_roots(&w, 0);

    // Seed with the start of the curve; interior candidates and the far
    // endpoint only win on strict improvement.
    let mut distance = point.distance(curve[0]);
    let mut location = 0.0;
    for &t in &candidates {
        let new_dist = point.distance(bezier::eval(curve, t));
        if new_dist < distance {
            distance = new_dist;
            location = t;
        }
    }
    let new_dist = point.distance(curve[curve.len() - 1]);
    if new_dist < distance {
        distance = new_dist;
        location = 1.0;
    }
    Nearest { location, distance }
}

/// The point on `curve` nearest to `point`, with its parameter.
pub fn nearest_point_on_curve(point: Point, curve: &[Point]) -> (Point, f64) {
    let nearest = distance_from_curve(point, curve);
    (bezier::eval(curve, nearest.location), nearest.location)
}

/// Project the derivative of the squared distance between `point` and
/// `curve` into Bézier form.
///
/// The result is a degree `2n - 1` control polygon: x coordinates are
/// the uniform parameter samples `i / (2n - 1)`, y coordinates the
/// Bernstein coefficients of `(C(t) - P) · C'(t)`. Its roots in [0, 1]
/// are the parameters where the vector from the query point to the
/// curve is perpendicular to the tangent.
fn to_bezier_form(point: Point, curve: &[Point]) -> CurvePoly {
    let n = curve.len() - 1;
    let m = n - 1;
    let higher = 2 * n - 1;

    // Vectors from the query point to each control point, and the
    // scaled derivative control points.
    let c: SmallVec<[Vec2; 8]> = curve.iter().map(|&p| p - point).collect();
    let d: SmallVec<[Vec2; 8]> = curve.windows(2).map(|w| 3.0 * (w[1] - w[0])).collect();

    let mut w: CurvePoly = (0..=higher)
        .map(|i| Point::new(i as f64 / higher as f64, 0.0))
        .collect();

    // Accumulate the Bernstein product of the two polynomials; the
    // weight for the (j, i) pair is a ratio of binomial coefficients,
    // which for cubics reduces to the classic fixed 3x4 table.
    for k in 0..=(n + m) {
        let lb = k.saturating_sub(m);
        let ub = k.min(n);
        for i in lb..=ub {
            let j = k - i;
            let z = (choose(m, j) * choose(n, i)) as f64 / choose(higher, k) as f64;
            w[k].y += d[j].dot(c[i]) * z;
        }
    }
    w
}

/// Isolate the roots of a projected polygon in left-to-right
/// subdivision order.
///
/// Within each subinterval the crossing count prunes root-free
/// polygons, flat polygons resolve to their chord's x-intercept, and
/// the depth cap resolves pathological flat-but-not-flat-enough cases
/// to the interval midpoint.
fn find_roots(w: &[Point], depth: usize) -> SmallVec<[f64; 8]> {
    let mut roots = SmallVec::new();
    match crossing_count(w) {
        0 => return roots,
        1 => {
            if depth >= MAX_RECURSION {
                let last = w.len() - 1;
                roots.push(0.5 * (w[0].x + w[last].x));
                return roots;
            }
            if is_flat_enough(w) {
                roots.push(x_intercept(w));
                return roots;
            }
        }
        _ => (),
    }
    let (left, right) = bezier::split(w, 0.5);
    roots = find_roots(&left, depth + 1);
    roots.extend(find_roots(&right, depth + 1));
    roots
}

/// Count sign changes of the control polygon's y coordinates.
///
/// By the variation-diminishing property this is an upper bound on the
/// number of roots under the polygon's x range.
fn crossing_count(w: &[Point]) -> usize {
    let mut crossings = 0;
    let mut old_sign = if w[0].y > 0.0 { 1 } else { -1 };
    for p in &w[1..] {
        let sign = if p.y >= 0.0 { 1 } else { -1 };
        if sign != old_sign {
            crossings += 1;
        }
        old_sign = sign;
    }
    crossings
}

/// Whether the polygon stays close enough to its chord that the chord's
/// x-intercept can stand in for the root.
///
/// Interior deviations from the chord are collapsed into a band, and
/// the band is intersected with the x axis; the polygon is flat enough
/// when the intercept interval is narrower than [`FLATNESS_TOLERANCE`].
/// The determinant is exactly zero for a chord with equal endpoint y
/// values; the band is then non-finite, the comparison fails, and the
/// polygon is subdivided instead.
fn is_flat_enough(w: &[Point]) -> bool {
    let last = w.len() - 1;
    // Implicit line a*x + b*y + c = 0 through the chord.
    let a = w[0].y - w[last].y;
    let b = w[last].x - w[0].x;
    let c = w[0].x * w[last].y - w[last].x * w[0].y;

    let mut max_above = 0.0;
    let mut max_below = 0.0;
    for p in &w[1..last] {
        let value = a * p.x + b * p.y + c;
        if value > max_above {
            max_above = value;
        } else if value < max_below {
            max_below = value;
        }
    }

    let det_inv = 1.0 / -a;
    let intercept_1 = (c - max_above) * det_inv;
    let intercept_2 = (c - max_below) * det_inv;
    let error = intercept_1.max(intercept_2) - intercept_1.min(intercept_2);
    error < FLATNESS_TOLERANCE
}

/// Intersection of the polygon's chord with the x axis.
///
/// Only called once the chord is known to cross the axis; a horizontal
/// chord yields a non-finite result.
fn x_intercept(w: &[Point]) -> f64 {
    let last = w.len() - 1;
    let dx = w[last].x - w[0].x;
    let dy = w[last].y - w[0].y;
    let det_inv = 1.0 / -dy;
    (dx * w[0].y - dy * w[0].x) * det_inv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_cubic() -> [Point; 4] {
        [
            Point::new(0.0, 0.0),
            Point::new(1.0, 2.0),
            Point::new(2.0, 3.0),
            Point::new(4.0, 4.0),
        ]
    }

    fn wiggle() -> [Point; 4] {
        [
            Point::new(0.0, 0.0),
            Point::new(4.0, 0.0),
            Point::new(-3.0, 1.0),
            Point::new(1.0, 1.0),
        ]
    }

    #[test]
    fn nearest_reference() {
        let nearest = distance_from_curve(Point::new(1.0, 3.0), &reference_cubic());
        assert!((nearest.location - 0.5).abs() < 1e-6);
        assert!((nearest.distance - 0.8838834764831844).abs() < 1e-9);

        let (pt, location) = nearest_point_on_curve(Point::new(1.0, 3.0), &reference_cubic());
        assert!((location - 0.5).abs() < 1e-6);
        assert!(pt.distance(Point::new(1.625, 2.375)) < 1e-9);
    }

    #[test]
    fn nearest_on_wiggle() {
        let nearest = distance_from_curve(Point::new(2.0, 0.25), &wiggle());
        assert!((nearest.location - 0.24344236213827286).abs() < 1e-6);
        assert!((nearest.distance - 0.7240939820918071).abs() < 1e-9);

        let nearest = distance_from_curve(Point::new(-1.0, 0.9), &wiggle());
        assert!((nearest.location - 0.7629521132024768).abs() < 1e-6);
        assert!((nearest.distance - 0.7179345163336563).abs() < 1e-9);
    }

    #[test]
    fn perpendicular_offset_from_line() {
        // Collinear, evenly spaced control points; the query sits
        // perpendicular above the midpoint.
        let line = [
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(2.0, 0.0),
            Point::new(3.0, 0.0),
        ];
        let nearest = distance_from_curve(Point::new(1.5, 2.0), &line);
        assert!((nearest.location - 0.5).abs() < 1e-6);
        assert!((nearest.distance - 2.0).abs() < 1e-9);
    }

    #[test]
    fn point_on_curve_is_at_zero_distance() {
        let c = reference_cubic();
        for &t0 in &[0.25, 0.5, 0.75] {
            let q = bezier::point_on_path(&c, t0);
            let nearest = distance_from_curve(q, &c);
            assert!(nearest.distance < 1e-6, "t0={t0}: {nearest:?}");
            assert!((nearest.location - t0).abs() < 1e-6, "t0={t0}: {nearest:?}");
        }
    }

    #[test]
    fn endpoints_win_beyond_curve_ends() {
        let c = reference_cubic();
        let nearest = distance_from_curve(Point::new(-1.0, -1.0), &c);
        assert_eq!(nearest.location, 0.0);
        assert!((nearest.distance - 2.0_f64.sqrt()).abs() < 1e-12);

        let nearest = distance_from_curve(Point::new(5.0, 5.0), &c);
        assert_eq!(nearest.location, 1.0);
        assert!((nearest.distance - 2.0_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn consistency_between_evaluation_paths() {
        let c = wiggle();
        for &(x, y) in &[(2.0, 0.25), (-1.0, 0.9), (0.5, 0.5), (3.0, -1.0)] {
            let (pt, location) = nearest_point_on_curve(Point::new(x, y), &c);
            assert!(pt.distance(bezier::point_on_path(&c, location)) < 1e-9);
        }
    }

    #[test]
    fn root_candidates_stay_in_range() {
        let c = wiggle();
        for &(x, y) in &[(0.5, 0.5), (2.0, 0.25), (-1.0, 0.9), (1.0, -2.0)] {
            let w = to_bezier_form(Point::new(x, y), &c);
            let roots = find_roots(&w, 0);
            // at most twice the projected polygon's degree
            assert!(roots.len() <= 10, "{roots:?}");
            for &t in &roots {
                assert!((-1e-9..=1.0 + 1e-9).contains(&t), "{roots:?}");
            }
        }
    }

    #[test]
    fn projection_of_reference_query() {
        // Hand-checked projected polygon for the reference query.
        let w = to_bezier_form(Point::new(1.0, 3.0), &reference_cubic());
        let expected = [
            (0.0, -21.0),
            (0.2, -8.4),
            (0.4, -2.4),
            (0.6, 2.4),
            (0.8, 8.4),
            (1.0, 21.0),
        ];
        assert_eq!(w.len(), expected.len());
        for (p, &(x, y)) in w.iter().zip(&expected) {
            assert!((p.x - x).abs() < 1e-12 && (p.y - y).abs() < 1e-9, "{w:?}");
        }
    }

    #[test]
    fn degenerate_horizontal_chord() {
        // A chord with equal endpoint y values zeroes the determinant;
        // the flatness test must reject the polygon rather than accept
        // a bogus intercept, and the intercept itself is non-finite.
        let w = [
            Point::new(0.0, 1.0),
            Point::new(0.5, -1.0),
            Point::new(1.0, 1.0),
        ];
        assert!(!is_flat_enough(&w));
        assert!(!x_intercept(&w).is_finite());
    }

    #[test]
    fn crossing_count_sign_convention() {
        let poly = |ys: &[f64]| -> SmallVec<[Point; 8]> {
            ys.iter()
                .enumerate()
                .map(|(i, &y)| Point::new(i as f64, y))
                .collect()
        };
        assert_eq!(crossing_count(&poly(&[1.0, 2.0, 3.0])), 0);
        assert_eq!(crossing_count(&poly(&[-1.0, 2.0, -3.0])), 2);
        assert_eq!(crossing_count(&poly(&[-1.0, -2.0, 3.0])), 1);
        // zero counts as positive past the first point, negative at it
        assert_eq!(crossing_count(&poly(&[0.0, 0.0, 0.0])), 1);
        assert_eq!(crossing_count(&poly(&[1.0, 0.0, 1.0])), 0);
    }

    #[test]
    fn repeated_queries_are_bit_identical() {
        let c = wiggle();
        let q = Point::new(2.0, 0.25);
        assert_eq!(distance_from_curve(q, &c), distance_from_curve(q, &c));
    }

    #[test]
    fn sampled_distance_agrees() {
        use rand::Rng;
        let c = reference_cubic();
        let mut rng = rand::rng();
        for _ in 0..50 {
            let q = Point::new(rng.random_range(-2.0..6.0), rng.random_range(-2.0..6.0));
            let nearest = distance_from_curve(q, &c);
            let mut sampled = f64::INFINITY;
            for i in 0..=10_000 {
                let t = i as f64 / 10_000.0;
                sampled = sampled.min(q.distance(bezier::eval(&c, t)));
            }
            assert!(
                (nearest.distance - sampled).abs() < 1e-3,
                "{q:?}: {} vs {sampled}",
                nearest.distance
            );
        }
    }
}
