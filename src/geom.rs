//! Orientation predicates on integer points.
//!
//! Everything here is exact: coordinates are widened to `i64` before any product is
//! formed, so collinearity and side tests never depend on a tolerance. Floating point
//! only shows up in `segment_intersection`, which computes a crossing location.
//!
//! The products stay inside `i64` as long as every coordinate is within
//! `±MAX_COORDINATE`; `find_path` rejects queries that go further.

use crate::vec2::{FloatPoint, Point};

/// Largest coordinate magnitude the predicates handle exactly.
pub const MAX_COORDINATE: i32 = 1 << 29;

/* signed_area:
 * Returns twice the signed area of triangle abc. Positive if c lies to the left of
 * the directed line a->b, negative if to the right, zero if the three are collinear.
 */
pub fn signed_area(a: Point, b: Point, c: Point) -> i64 {
    let (ax, ay) = (a.x as i64, a.y as i64);
    let (bx, by) = (b.x as i64, b.y as i64);
    let (cx, cy) = (c.x as i64, c.y as i64);
    (bx - ax) * (cy - ay) - (cx - ax) * (by - ay)
}

pub fn left(a: Point, b: Point, c: Point) -> bool {
    signed_area(a, b, c) > 0
}

pub fn left_on(a: Point, b: Point, c: Point) -> bool {
    signed_area(a, b, c) >= 0
}

pub fn collinear(a: Point, b: Point, c: Point) -> bool {
    signed_area(a, b, c) == 0
}

/* between:
 * Returns true if c lies on the closed segment [a,b].
 */
pub fn between(a: Point, b: Point, c: Point) -> bool {
    if !collinear(a, b, c) {
        return false;
    }
    if a == b {
        return c == a;
    }
    if a.x != b.x {
        /* not vertical */
        ((a.x <= c.x) && (c.x <= b.x)) || ((a.x >= c.x) && (c.x >= b.x))
    } else {
        ((a.y <= c.y) && (c.y <= b.y)) || ((a.y >= c.y) && (c.y >= b.y))
    }
}

/* intersect_proper:
 * Returns true iff segments ab and cd cross at a single point interior to both,
 * i.e. each segment strictly separates the endpoints of the other.
 */
pub fn intersect_proper(a: Point, b: Point, c: Point, d: Point) -> bool {
    if collinear(a, b, c) || collinear(a, b, d) || collinear(c, d, a) || collinear(c, d, b) {
        return false;
    }
    (left(a, b, c) ^ left(a, b, d)) && (left(c, d, a) ^ left(c, d, b))
}

/* intersect:
 * Like intersect_proper, but touching and overlapping segments count too.
 */
pub fn intersect(a: Point, b: Point, c: Point, d: Point) -> bool {
    intersect_proper(a, b, c, d)
        || between(a, b, c)
        || between(a, b, d)
        || between(c, d, a)
        || between(c, d, b)
}

/// Twice the signed (shoelace) area of a closed polygon. Positive when the interior
/// lies to the left of every edge.
pub fn polygon_area(points: &[Point]) -> i64 {
    if points.len() < 3 {
        return 0;
    }
    let first = points[0];
    points[1..]
        .windows(2)
        .map(|w| signed_area(first, w[0], w[1]))
        .sum()
}

/// Computes where segment ab crosses segment cd, excluding the endpoints of both.
/// Returns `None` for parallel segments and for crossings outside the open segments.
pub fn segment_intersection(a: Point, b: Point, c: Point, d: Point) -> Option<FloatPoint> {
    let a = a.to_float();
    let r = b.to_float() - a;
    let s = d.to_float() - c.to_float();
    let denom = r.x * s.y - r.y * s.x;
    if denom == 0.0 {
        return None;
    }
    let ca = c.to_float() - a;
    let t = (ca.x * s.y - ca.y * s.x) / denom;
    let u = (ca.x * r.y - ca.y * r.x) / denom;
    if 0.0 < t && t < 1.0 && 0.0 < u && u < 1.0 {
        Some(a + r * t)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(x: i32, y: i32) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn orientation() {
        assert!(signed_area(pt(0, 0), pt(10, 0), pt(5, 5)) > 0);
        assert!(signed_area(pt(0, 0), pt(10, 0), pt(5, -5)) < 0);
        assert!(left(pt(0, 0), pt(10, 0), pt(3, 1)));
        assert!(!left(pt(0, 0), pt(10, 0), pt(3, 0)));
        assert!(left_on(pt(0, 0), pt(10, 0), pt(3, 0)));
        assert!(collinear(pt(0, 0), pt(10, 10), pt(-4, -4)));
    }

    #[test]
    fn large_coordinates_do_not_overflow() {
        let a = pt(-40_000, -40_000);
        let b = pt(40_000, -40_000);
        let c = pt(0, 40_000);
        assert_eq!(signed_area(a, b, c), 80_000i64 * 80_000);
    }

    #[test]
    fn between_segment() {
        assert!(between(pt(0, 0), pt(10, 0), pt(0, 0)));
        assert!(between(pt(0, 0), pt(10, 0), pt(10, 0)));
        assert!(between(pt(10, 0), pt(0, 0), pt(4, 0)));
        assert!(!between(pt(0, 0), pt(10, 0), pt(11, 0)));
        assert!(between(pt(3, 8), pt(3, 2), pt(3, 5)));
        assert!(!between(pt(3, 8), pt(3, 2), pt(4, 5)));
        // degenerate segment
        assert!(between(pt(2, 2), pt(2, 2), pt(2, 2)));
        assert!(!between(pt(2, 2), pt(2, 2), pt(2, 7)));
    }

    #[test]
    fn proper_and_improper_intersections() {
        // plain crossing
        assert!(intersect_proper(pt(0, 0), pt(10, 10), pt(0, 10), pt(10, 0)));
        assert!(intersect(pt(0, 0), pt(10, 10), pt(0, 10), pt(10, 0)));
        // T junction: touching only
        assert!(!intersect_proper(pt(0, 0), pt(10, 0), pt(5, 0), pt(5, 5)));
        assert!(intersect(pt(0, 0), pt(10, 0), pt(5, 0), pt(5, 5)));
        // shared endpoint
        assert!(!intersect_proper(pt(0, 0), pt(10, 0), pt(10, 0), pt(10, 5)));
        assert!(intersect(pt(0, 0), pt(10, 0), pt(10, 0), pt(10, 5)));
        // collinear overlap
        assert!(!intersect_proper(pt(0, 0), pt(10, 0), pt(5, 0), pt(15, 0)));
        assert!(intersect(pt(0, 0), pt(10, 0), pt(5, 0), pt(15, 0)));
        // disjoint
        assert!(!intersect(pt(0, 0), pt(10, 0), pt(0, 5), pt(10, 5)));
    }

    #[test]
    fn shoelace() {
        let square = [pt(0, 0), pt(10, 0), pt(10, 10), pt(0, 10)];
        assert_eq!(polygon_area(&square), 200);
        let mut reversed = square;
        reversed.reverse();
        assert_eq!(polygon_area(&reversed), -200);
        assert_eq!(polygon_area(&square[..2]), 0);
    }

    #[test]
    fn crossing_point() {
        let p = segment_intersection(pt(0, 0), pt(10, 10), pt(0, 10), pt(10, 0)).unwrap();
        assert_eq!(p.round(), pt(5, 5));
        assert!(segment_intersection(pt(0, 0), pt(10, 0), pt(0, 5), pt(10, 5)).is_none());
        // touching at an endpoint does not count
        assert!(segment_intersection(pt(0, 0), pt(10, 0), pt(10, 0), pt(10, 5)).is_none());
    }
}
