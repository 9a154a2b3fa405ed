use crate::geom::intersect_proper;
use crate::polygon::{AccessType, Polygon};
use crate::vec2::Point;

pub fn init_test() {
    drop(env_logger::try_init());
}

pub fn pt(x: i32, y: i32) -> Point {
    Point::new(x, y)
}

/// Axis-aligned rectangle, listed with the interior to the left of every edge.
pub fn rect(access: AccessType, x0: i32, y0: i32, x1: i32, y1: i32) -> Polygon {
    Polygon::new(
        access,
        vec![pt(x0, y0), pt(x1, y0), pt(x1, y1), pt(x0, y1)],
    )
}

/// True if some segment of `path` properly crosses some obstacle edge.
pub fn crosses_obstacles(path: &[Point], obstacles: &[Polygon]) -> bool {
    path.windows(2).any(|seg| {
        obstacles
            .iter()
            .flat_map(|polygon| polygon.edges())
            .any(|(a, b)| intersect_proper(seg[0], seg[1], a, b))
    })
}
