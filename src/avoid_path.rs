//! The query entry point: obstacles in, path out.

use crate::config::PathfinderConfig;
use crate::error::Error;
use crate::geom::MAX_COORDINATE;
use crate::normalize::PathfindingState;
use crate::path::{output_path, PathResult, PathStatus};
use crate::polygon::{Polygon, PolygonSet};
use crate::shortest_path::dijkstra;
use crate::vec2::Point;
use crate::visibility::visibility_graph;
use log::{debug, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OptimizationLevel {
    /// Keyboard movement: a start point inside a polygon leaves it along the line
    /// towards the end point.
    Keyboard = 0,
    Default = 1,
    Full = 2,
}

impl OptimizationLevel {
    pub fn from_level(level: i32) -> Result<Self, Error> {
        match level {
            0 => Ok(OptimizationLevel::Keyboard),
            1 => Ok(OptimizationLevel::Default),
            2 => Ok(OptimizationLevel::Full),
            _ => Err(Error::InvalidOptimizationLevel(level)),
        }
    }
}

impl Default for OptimizationLevel {
    fn default() -> Self {
        OptimizationLevel::Default
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Query {
    pub start: Point,
    pub end: Point,
    pub obstacles: Vec<Polygon>,
    pub optimization: OptimizationLevel,
}

impl Query {
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            start,
            end,
            obstacles: Vec::new(),
            optimization: OptimizationLevel::default(),
        }
    }

    pub fn obstacle(mut self, polygon: Polygon) -> Self {
        self.obstacles.push(polygon);
        self
    }

    pub fn optimization(mut self, level: OptimizationLevel) -> Self {
        self.optimization = level;
        self
    }
}

/// Computes a path from `query.start` to `query.end` around `query.obstacles`.
///
/// This never fails. Input that cannot be used (coordinates out of range, intersecting
/// polygons, a point that cannot be freed, too many vertices) produces the direct path with status
/// `Degenerate`. An unreachable end produces a `Partial` path to the closest
/// reachable vertex. In both cases the reason is in `PathResult::diagnostic`.
pub fn find_path(query: &Query, config: &PathfinderConfig) -> PathResult {
    if let Err(e) = check_coordinates(query) {
        return degenerate(query, e);
    }

    let set = PolygonSet::from_obstacles(&query.obstacles);
    if set.is_empty() {
        debug!("no obstacles; direct path {:?} -> {:?}", query.start, query.end);
        return PathResult::direct(query.start, query.end, PathStatus::Success, None);
    }

    match solve(set, query, config) {
        Ok(result) => result,
        Err(e) => degenerate(query, e),
    }
}

fn degenerate(query: &Query, e: Error) -> PathResult {
    warn!(
        "path {:?} -> {:?}: {}; using direct path",
        query.start, query.end, e
    );
    PathResult::direct(query.start, query.end, PathStatus::Degenerate, Some(e))
}

fn check_coordinates(query: &Query) -> Result<(), Error> {
    let in_range = |v: i32| -MAX_COORDINATE <= v && v <= MAX_COORDINATE;
    let points = [query.start, query.end];
    let all = points
        .iter()
        .chain(query.obstacles.iter().flat_map(|polygon| polygon.points.iter()));
    for &point in all {
        if point == Point::SENTINEL || !in_range(point.x) || !in_range(point.y) {
            return Err(Error::InvalidCoordinate { point });
        }
    }
    Ok(())
}

fn solve(set: PolygonSet, query: &Query, config: &PathfinderConfig) -> Result<PathResult, Error> {
    if let Some(limit) = config.max_vertices {
        // start and end may each add a vertex
        let count = set.num_vertices() + 2;
        if count > limit {
            return Err(Error::TooManyVertices { count, limit });
        }
    }

    let keyboard = query.optimization == OptimizationLevel::Keyboard;
    let state = PathfindingState::new(set, query.start, query.end, keyboard, &config.screen)?;
    let vis = visibility_graph(&state.index);
    let paths = dijkstra(&state.index, &vis, state.start, state.end, config);
    let result = output_path(&state, &paths);

    debug!(
        "path {:?} -> {:?}: {:?}, {} points, length {:.1}",
        query.start,
        query.end,
        result.status,
        result.points().len(),
        result.length()
    );
    Ok(result)
}
