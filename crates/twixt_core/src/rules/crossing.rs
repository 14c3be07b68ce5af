//! Geometric crossing test for links.

use crate::board::{Link, Position};

type Point = (i64, i64);

fn point(pos: Position) -> Point {
    (pos.row as i64, pos.col as i64)
}

/// Sign of the cross product of `p -> q` and `p -> r`.
fn orientation(p: Point, q: Point, r: Point) -> i64 {
    ((q.0 - p.0) * (r.1 - p.1) - (q.1 - p.1) * (r.0 - p.0)).signum()
}

/// Whether `q` lies within the bounding box of segment `p`-`r`.
fn within_box(p: Point, q: Point, r: Point) -> bool {
    q.0 >= p.0.min(r.0) && q.0 <= p.0.max(r.0) && q.1 >= p.1.min(r.1) && q.1 <= p.1.max(r.1)
}

/// Returns true if segment `p1`-`p2` meets segment `q1`-`q2`.
///
/// Covers both the proper case (each segment straddles the other) and
/// the degenerate case where an endpoint is collinear with and lies on
/// the other segment.
pub fn segments_intersect(p1: Position, p2: Position, q1: Position, q2: Position) -> bool {
    let (p1, p2, q1, q2) = (point(p1), point(p2), point(q1), point(q2));

    let o1 = orientation(p1, p2, q1);
    let o2 = orientation(p1, p2, q2);
    let o3 = orientation(q1, q2, p1);
    let o4 = orientation(q1, q2, p2);

    if o1 != o2 && o3 != o4 {
        return true;
    }

    (o1 == 0 && within_box(p1, q1, p2))
        || (o2 == 0 && within_box(p1, q2, p2))
        || (o3 == 0 && within_box(q1, p1, q2))
        || (o4 == 0 && within_box(q1, p2, q2))
}

/// Returns true if two links cross on the board.
///
/// Links that share an endpoint never cross. Links touching a goal node
/// have no planar extent and never cross anything.
pub fn links_cross(a: &Link, b: &Link) -> bool {
    if a.shares_endpoint(b) {
        return false;
    }
    let (a1, a2) = a.endpoints();
    let (b1, b2) = b.endpoints();
    match (a1.position(), a2.position(), b1.position(), b2.position()) {
        (Some(p1), Some(p2), Some(q1), Some(q2)) => segments_intersect(p1, p2, q1, q2),
        _ => false,
    }
}
