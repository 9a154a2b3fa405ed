//! Turning a solved search into the point list handed back to the caller.

use crate::error::Error;
use crate::normalize::PathfindingState;
use crate::polygon::{VertexId, VertexIndex};
use crate::shortest_path::ShortestPaths;
use crate::vec2::Point;
use core::cmp::Ordering;
use log::debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PathStatus {
    /// The path ends at the requested end point.
    Success,
    /// The end point could not be reached; the path stops at the closest reachable
    /// vertex.
    Partial,
    /// The input could not be used; the path is the straight line from start to end.
    Degenerate,
}

/// A computed path. The point buffer always holds at least two points followed by
/// `Point::SENTINEL`.
#[derive(Clone, Debug, PartialEq)]
pub struct PathResult {
    pub status: PathStatus,
    pub diagnostic: Option<Error>,
    buffer: Vec<Point>,
}

impl PathResult {
    pub fn new(mut points: Vec<Point>, status: PathStatus, diagnostic: Option<Error>) -> Self {
        if points.len() == 1 {
            let only = points[0];
            points.push(only);
        }
        points.push(Point::SENTINEL);
        Self {
            status,
            diagnostic,
            buffer: points,
        }
    }

    /// The two-point path straight from `start` to `end`.
    pub fn direct(start: Point, end: Point, status: PathStatus, diagnostic: Option<Error>) -> Self {
        Self::new(vec![start, end], status, diagnostic)
    }

    /// The path, without the terminating sentinel.
    pub fn points(&self) -> &[Point] {
        &self.buffer[..self.buffer.len() - 1]
    }

    /// The path as stored, terminated by `Point::SENTINEL`.
    pub fn buffer(&self) -> &[Point] {
        &self.buffer
    }

    /// Total Euclidean length.
    pub fn length(&self) -> f64 {
        self.points().windows(2).map(|w| w[0].dist(w[1])).sum()
    }

    pub fn is_success(&self) -> bool {
        self.status == PathStatus::Success
    }
}

/* best_reached:
 * The reached vertex closest to the end point. Ties go to the cheaper path, then to
 * the lower id. The source is always reached, so there is always an answer.
 */
fn best_reached(index: &VertexIndex, paths: &ShortestPaths, end: Point) -> VertexId {
    (0..index.len())
        .filter(|&v| paths.is_reached(v))
        .min_by(|&a, &b| {
            let da = index.point(a).sqr_dist(end);
            let db = index.point(b).sqr_dist(end);
            da.cmp(&db)
                .then_with(|| {
                    paths.distance[a]
                        .partial_cmp(&paths.distance[b])
                        .unwrap_or(Ordering::Equal)
                })
                .then(a.cmp(&b))
        })
        .unwrap_or(paths.source)
}

/// Builds the output path from the search results.
///
/// The chain of predecessors is walked back from the end vertex, or from the best
/// reached vertex if the end was not reached. The original start is put in front
/// when keyboard mode moved it, and the original end is put after its near point
/// when it was inside a nearest access polygon.
pub fn output_path(state: &PathfindingState, paths: &ShortestPaths) -> PathResult {
    let index = &state.index;
    let end_point = index.point(state.end);

    let (target, status, diagnostic) = if paths.reached_target {
        (state.end, PathStatus::Success, None)
    } else {
        let best = best_reached(index, paths, end_point);
        debug!(
            "end {:?} not reached, stopping at {:?} instead",
            end_point,
            index.point(best)
        );
        (
            best,
            PathStatus::Partial,
            Some(Error::Unreachable { end: end_point }),
        )
    };

    let mut points: Vec<Point> = paths
        .chain_to(target)
        .into_iter()
        .map(|v| index.point(v))
        .collect();

    if points.len() < 2 && status == PathStatus::Partial {
        points = vec![index.point(state.start), index.point(target)];
    }

    if let Some(original) = state.prepend {
        points.insert(0, original);
    }
    if status == PathStatus::Success {
        if let Some(original) = state.append {
            points.push(original);
        }
    }

    PathResult::new(points, status, diagnostic)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PathfinderConfig;
    use crate::polygon::{AccessType, Polygon, PolygonSet};
    use crate::shortest_path::dijkstra;
    use crate::testing::*;
    use crate::visibility::visibility_graph;

    fn solve(obstacles: &[Polygon], start: Point, end: Point, keyboard: bool) -> PathResult {
        let config = PathfinderConfig::default();
        let set = PolygonSet::from_obstacles(obstacles);
        let state = PathfindingState::new(set, start, end, keyboard, &config.screen).unwrap();
        let vis = visibility_graph(&state.index);
        let paths = dijkstra(&state.index, &vis, state.start, state.end, &config);
        output_path(&state, &paths)
    }

    #[test]
    fn buffer_is_terminated() {
        let result = PathResult::direct(pt(1, 2), pt(3, 4), PathStatus::Degenerate, None);
        assert_eq!(result.points(), &[pt(1, 2), pt(3, 4)]);
        assert_eq!(result.buffer(), &[pt(1, 2), pt(3, 4), Point::SENTINEL]);
        assert!((result.length() - 8f64.sqrt()).abs() < 1e-9);
        assert!(!result.is_success());

        let single = PathResult::new(vec![pt(5, 5)], PathStatus::Success, None);
        assert_eq!(single.points(), &[pt(5, 5), pt(5, 5)]);
        assert_eq!(single.length(), 0.0);
    }

    #[test]
    fn nearest_end_is_appended() {
        init_test();
        let result = solve(
            &[rect(AccessType::Nearest, 100, 50, 200, 150)],
            pt(20, 100),
            pt(110, 100),
            false,
        );
        assert_eq!(result.status, PathStatus::Success);
        assert_eq!(result.points(), &[pt(20, 100), pt(100, 100), pt(110, 100)]);
    }

    #[test]
    fn barred_end_is_not_appended() {
        init_test();
        let result = solve(
            &[rect(AccessType::Barred, 100, 50, 200, 150)],
            pt(20, 100),
            pt(110, 100),
            false,
        );
        assert_eq!(result.status, PathStatus::Success);
        assert_eq!(result.points(), &[pt(20, 100), pt(100, 100)]);
    }

    #[test]
    fn keyboard_start_is_prepended() {
        init_test();
        let result = solve(
            &[rect(AccessType::Barred, 100, 50, 200, 150)],
            pt(150, 100),
            pt(300, 100),
            true,
        );
        assert_eq!(result.status, PathStatus::Success);
        assert_eq!(
            result.points(),
            &[pt(150, 100), pt(200, 100), pt(300, 100)]
        );
    }

    #[test]
    fn unreachable_stops_at_closest_vertex() {
        init_test();
        // an L-shaped wall closes off the top left corner of the screen, and the
        // border vertices that would lead into it are never used
        let corner = Polygon::new(
            AccessType::Barred,
            vec![
                pt(0, 30),
                pt(30, 30),
                pt(30, 0),
                pt(40, 0),
                pt(40, 40),
                pt(0, 40),
            ],
        );
        let result = solve(&[corner], pt(100, 100), pt(10, 10), false);
        assert_eq!(result.status, PathStatus::Partial);
        assert_eq!(
            result.diagnostic,
            Some(Error::Unreachable { end: pt(10, 10) })
        );
        assert_eq!(result.points(), &[pt(100, 100), pt(40, 40)]);
        assert_eq!(result.buffer().last(), Some(&Point::SENTINEL));
    }
}
