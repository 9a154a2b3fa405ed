use crate::vec2::Point;
use thiserror::Error;

/// Everything that can go wrong while answering a path query.
///
/// None of these abort a query: `find_path` turns them into a degraded result and
/// hands the error back as the result's diagnostic.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Error {
    /// Two non-adjacent obstacle edges touch or cross.
    #[error("input set contains (self-)intersecting polygons: edge {first:?} meets edge {second:?}")]
    IntersectingPolygons {
        first: (Point, Point),
        second: (Point, Point),
    },

    /// A point trapped inside a polygon could not be moved to free space.
    #[error("no free point found near {point:?}")]
    NoFreePoint { point: Point },

    /// The search ran out of reachable vertices before reaching the end point.
    #[error("end point {end:?} is unreachable")]
    Unreachable { end: Point },

    /// A coordinate is beyond `geom::MAX_COORDINATE`, or equals `Point::SENTINEL`.
    #[error("point {point:?} is outside the supported coordinate range or is the path terminator")]
    InvalidCoordinate { point: Point },

    #[error("unknown polygon access type {0}")]
    UnknownAccessType(i32),

    #[error("invalid optimization level {0}")]
    InvalidOptimizationLevel(i32),

    #[error("polygon set has {count} vertices, more than the limit of {limit}")]
    TooManyVertices { count: usize, limit: usize },
}
