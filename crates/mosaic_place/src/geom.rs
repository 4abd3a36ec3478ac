//! 2-D integer geometry for placement.
//!
//! Provides [`Point`] and the smallest-enclosing-circle center computation
//! used by the fine-tuning pass to find a good relocation target for a macro
//! from the tiles its wires touch. Self-contained; nothing here depends on
//! the placement state.

use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;

/// An immutable 2-D integer point.
///
/// Ordering is lexicographic (x, then y) to support deterministic convex
/// hull construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Point {
    /// The x coordinate.
    pub x: i32,
    /// The y coordinate.
    pub y: i32,
}

impl Point {
    /// Creates a new point.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance to another point.
    pub fn dist2(self, other: Point) -> i64 {
        let dx = (self.x - other.x) as i64;
        let dy = (self.y - other.y) as i64;
        dx * dx + dy * dy
    }
}

/// Cross product of (a - o) and (b - o).
///
/// Positive for a counter-clockwise turn, negative for clockwise, zero when
/// the three points are collinear.
fn cross(o: Point, a: Point, b: Point) -> i64 {
    let oa = ((a.x - o.x) as i64, (a.y - o.y) as i64);
    let ob = ((b.x - o.x) as i64, (b.y - o.y) as i64);
    oa.0 * ob.1 - oa.1 * ob.0
}

/// Computes the convex hull of a point set via the monotone chain.
///
/// Returns hull vertices in counter-clockwise order without repeating the
/// first vertex. Collinear points on the hull boundary are dropped. Input
/// duplicates are tolerated.
pub fn convex_hull(mut points: Vec<Point>) -> Vec<Point> {
    points.sort();
    points.dedup();
    let n = points.len();
    if n < 3 {
        return points;
    }

    let mut hull: Vec<Point> = Vec::with_capacity(2 * n);
    for &p in &points {
        while hull.len() >= 2 && cross(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0 {
            hull.pop();
        }
        hull.push(p);
    }
    let lower_len = hull.len() + 1;
    for &p in points.iter().rev().skip(1) {
        while hull.len() >= lower_len && cross(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0 {
            hull.pop();
        }
        hull.push(p);
    }
    hull.pop();
    hull
}

/// Returns the center of the smallest circle enclosing the given points,
/// rounded to the nearest integer coordinates.
///
/// Special-cases 0, 1, 2, and 3 points directly. For larger sets, reduces
/// to the convex hull and then narrows a supporting chord of the hull using
/// subtended-angle tests until either a diametral pair or a circumscribing
/// triple determines the circle.
pub fn smallest_enclosing_circle_center(points: &[Point]) -> Option<Point> {
    let mut unique = points.to_vec();
    unique.sort();
    unique.dedup();
    match unique.len() {
        0 => None,
        1 => Some(unique[0]),
        2 => Some(midpoint(unique[0], unique[1])),
        3 => Some(triangle_center(unique[0], unique[1], unique[2])),
        _ => {
            let hull = convex_hull(unique);
            match hull.len() {
                0 => None,
                1 => Some(hull[0]),
                2 => Some(midpoint(hull[0], hull[1])),
                3 => Some(triangle_center(hull[0], hull[1], hull[2])),
                _ => Some(narrow_hull(&hull)),
            }
        }
    }
}

/// Rounded midpoint of two points.
fn midpoint(a: Point, b: Point) -> Point {
    Point::new(
        ((a.x as f64 + b.x as f64) / 2.0).round() as i32,
        ((a.y as f64 + b.y as f64) / 2.0).round() as i32,
    )
}

/// Center of the smallest circle enclosing exactly three points.
///
/// When one angle is non-acute the circle's diameter is the opposite side;
/// otherwise it is the circumcircle.
fn triangle_center(a: Point, b: Point, c: Point) -> Point {
    if cross(a, b, c) == 0 {
        // Degenerate triangle: diameter is the farthest pair.
        let (p, q) = farthest_pair(a, b, c);
        return midpoint(p, q);
    }
    if dot_at(a, b, c) <= 0 {
        return midpoint(b, c);
    }
    if dot_at(b, a, c) <= 0 {
        return midpoint(a, c);
    }
    if dot_at(c, a, b) <= 0 {
        return midpoint(a, b);
    }
    match circumcenter(a, b, c) {
        Some((x, y)) => Point::new(x.round() as i32, y.round() as i32),
        None => midpoint(a, b),
    }
}

/// Dot product of the rays (a - v) and (b - v); non-positive when the angle
/// at `v` is 90 degrees or more.
fn dot_at(v: Point, a: Point, b: Point) -> i64 {
    let ax = (a.x - v.x) as i64;
    let ay = (a.y - v.y) as i64;
    let bx = (b.x - v.x) as i64;
    let by = (b.y - v.y) as i64;
    ax * bx + ay * by
}

/// The two points of {a, b, c} with the greatest mutual distance.
fn farthest_pair(a: Point, b: Point, c: Point) -> (Point, Point) {
    let ab = a.dist2(b);
    let ac = a.dist2(c);
    let bc = b.dist2(c);
    if ab >= ac && ab >= bc {
        (a, b)
    } else if ac >= bc {
        (a, c)
    } else {
        (b, c)
    }
}

/// Circumcenter of a non-degenerate triangle, or `None` when collinear.
fn circumcenter(a: Point, b: Point, c: Point) -> Option<(f64, f64)> {
    let (ax, ay) = (a.x as f64, a.y as f64);
    let (bx, by) = (b.x as f64, b.y as f64);
    let (cx, cy) = (c.x as f64, c.y as f64);
    let d = 2.0 * (ax * (by - cy) + bx * (cy - ay) + cx * (ay - by));
    if d == 0.0 {
        return None;
    }
    let a2 = ax * ax + ay * ay;
    let b2 = bx * bx + by * by;
    let c2 = cx * cx + cy * cy;
    let ux = (a2 * (by - cy) + b2 * (cy - ay) + c2 * (ay - by)) / d;
    let uy = (a2 * (cx - bx) + b2 * (ax - cx) + c2 * (bx - ax)) / d;
    Some((ux, uy))
}

/// Angle at `v` subtended by the segment (a, b), in radians.
fn angle_at(v: Point, a: Point, b: Point) -> f64 {
    let ax = (a.x - v.x) as f64;
    let ay = (a.y - v.y) as f64;
    let bx = (b.x - v.x) as f64;
    let by = (b.y - v.y) as f64;
    let na = (ax * ax + ay * ay).sqrt();
    let nb = (bx * bx + by * by).sqrt();
    if na == 0.0 || nb == 0.0 {
        return std::f64::consts::PI;
    }
    ((ax * bx + ay * by) / (na * nb)).clamp(-1.0, 1.0).acos()
}

/// Narrows a supporting chord of a convex hull (4 or more vertices) until a
/// diametral pair or an all-acute supporting triple determines the smallest
/// enclosing circle.
///
/// At each step the vertex `r` subtending the smallest angle over the chord
/// (p, q) is found. If that angle is 90 degrees or more, every vertex lies
/// inside the circle with diameter (p, q). Otherwise, an obtuse base angle
/// in triangle (p, q, r) means the chord endpoint at that angle cannot lie
/// on the final circle and is replaced by `r`; an all-acute triangle is
/// circumscribed directly.
fn narrow_hull(hull: &[Point]) -> Point {
    let mut p = hull[0];
    let mut q = hull[1];
    // Each replacement strictly widens the chord, so this bound is never hit
    // in practice.
    let bound = hull.len() * hull.len() + 4;
    for _ in 0..bound {
        let mut best: Option<(Point, f64)> = None;
        for &v in hull {
            if v == p || v == q {
                continue;
            }
            let ang = angle_at(v, p, q);
            if best.map_or(true, |(_, b)| ang < b) {
                best = Some((v, ang));
            }
        }
        let Some((r, ang_r)) = best else {
            return midpoint(p, q);
        };
        if ang_r >= FRAC_PI_2 {
            return midpoint(p, q);
        }
        if angle_at(p, q, r) > FRAC_PI_2 {
            p = r;
            continue;
        }
        if angle_at(q, p, r) > FRAC_PI_2 {
            q = r;
            continue;
        }
        return match circumcenter(p, q, r) {
            Some((x, y)) => Point::new(x.round() as i32, y.round() as i32),
            None => midpoint(p, q),
        };
    }
    midpoint(p, q)
}
