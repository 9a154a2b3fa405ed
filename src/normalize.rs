//! Turns raw obstacles and endpoints into a consistent `PathfindingState`.
//!
//! Endpoints that fall inside a polygon are pushed out of it (or the polygon is
//! dropped, for total access polygons), then both endpoints are merged into the
//! vertex structure so the visibility sweep treats them like any other vertex.

use crate::config::ScreenBounds;
use crate::error::Error;
use crate::geom::{between, intersect, intersect_proper, segment_intersection};
use crate::polygon::{AccessType, Polygon, PolygonSet, VertexId, VertexIndex};
use crate::vec2::{FloatPoint, Point};
use log::{debug, warn};

/// Result of `PolygonSet::fix_point`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedPoint {
    pub point: Point,
    /// Access type of the polygon the original point was trapped in, if it moved.
    pub moved_from: Option<AccessType>,
}

/* find_free_point:
 * Rounds f to the screen grid, making sure the result is not inside any polygon.
 * The rounded point is tried first, then the four grid points around f.
 */
pub fn find_free_point(f: FloatPoint, set: &PolygonSet) -> Result<Point, Error> {
    let rounded = f.round();
    if set.is_free(rounded) {
        return Ok(rounded);
    }

    let base = f.floor();
    let (x1, y1) = (base.x.saturating_add(1), base.y.saturating_add(1));
    let candidates = [
        base,
        Point::new(x1, base.y),
        Point::new(x1, y1),
        Point::new(base.x, y1),
    ];
    for &candidate in candidates.iter() {
        if set.is_free(candidate) {
            return Ok(candidate);
        }
    }

    Err(Error::NoFreePoint { point: rounded })
}

/* near_point:
 * Finds the point on the boundary of `polygon` closest to p. Edges on the screen
 * border are not considered, except for contained access polygons, whose border
 * edges are the only way back into the usable area.
 */
pub fn near_point(
    p: Point,
    polygon: &Polygon,
    set: &PolygonSet,
    screen: &ScreenBounds,
) -> Result<Point, Error> {
    let pf = p.to_float();
    let mut best: Option<(f64, FloatPoint)> = None;

    for (p1, p2) in polygon.edges() {
        if polygon.access != AccessType::Contained && screen.edge_on_border(p1, p2) {
            continue;
        }

        let a = p1.to_float();
        let candidate = if p1 == p2 {
            a
        } else {
            let d = p2.to_float() - a;
            let w = pf - a;
            let u = (w.x * d.x + w.y * d.y) / (d.x * d.x + d.y * d.y);
            a + d * u.max(0.0).min(1.0)
        };

        let dist = candidate.sqr_dist(pf);
        if best.map_or(true, |(best_dist, _)| dist < best_dist) {
            best = Some((dist, candidate));
        }
    }

    match best {
        Some((_, near)) => find_free_point(near, set),
        None => Err(Error::NoFreePoint { point: p }),
    }
}

/* nearest_intersection:
 * Walks the segment p->q and returns the first place where it meets the polygon
 * set (a vertex on the segment, or a proper edge crossing), other than p itself.
 */
pub fn nearest_intersection(set: &PolygonSet, p: Point, q: Point) -> Result<Option<Point>, Error> {
    let pf = p.to_float();
    let mut best: Option<(f64, FloatPoint)> = None;

    for polygon in set.polygons().iter() {
        for (v1, v2) in polygon.edges() {
            let hit = if v1 != p && between(p, q, v1) {
                Some(v1.to_float())
            } else if v1 != v2 && intersect_proper(p, q, v1, v2) {
                segment_intersection(p, q, v1, v2)
            } else {
                None
            };

            if let Some(isec) = hit {
                let dist = isec.sqr_dist(pf);
                if best.map_or(true, |(best_dist, _)| dist < best_dist) {
                    best = Some((dist, isec));
                }
            }
        }
    }

    match best {
        Some((_, isec)) => find_free_point(isec, set).map(Some),
        None => Ok(None),
    }
}

/* check_intersections:
 * Returns an error if any two edges that are not neighbours touch or cross.
 * Single-vertex polygons count as degenerate edges, so a lone point lying on an
 * edge is reported too.
 */
pub fn check_intersections(index: &VertexIndex) -> Result<(), Error> {
    let n = index.len();
    for i in 0..n {
        let a = index.point(i);
        let b = index.point(index.next(i));
        for j in (i + 1)..n {
            if index.next(i) == j || index.prev(i) == j {
                continue;
            }
            let c = index.point(j);
            let d = index.point(index.next(j));
            if intersect(a, b, c, d) {
                return Err(Error::IntersectingPolygons {
                    first: (a, b),
                    second: (c, d),
                });
            }
        }
    }
    Ok(())
}

impl PolygonSet {
    /* fix_point:
     * Total access polygons containing p are dropped. If p is then still inside
     * some polygon, it is replaced by the nearest free point on that polygon's
     * boundary.
     */
    pub fn fix_point(&mut self, p: Point, screen: &ScreenBounds) -> Result<FixedPoint, Error> {
        self.remove_total_containing(p);

        let trap = match self.trapping_polygon(p) {
            Some(polygon) => polygon,
            None => {
                return Ok(FixedPoint {
                    point: p,
                    moved_from: None,
                })
            }
        };

        let access = trap.access;
        let near = near_point(p, trap, self, screen)?;
        if access == AccessType::Barred {
            warn!("point {:?} is contained in a barred polygon, using {:?}", p, near);
        } else {
            debug!("point {:?} is inside a {:?} polygon, using {:?}", p, access, near);
        }

        Ok(FixedPoint {
            point: near,
            moved_from: Some(access),
        })
    }
}

/// Per-query state: the normalized polygon set, its vertex index, and the endpoint
/// substitutions the serializer needs.
#[derive(Clone, Debug)]
pub struct PathfindingState {
    pub set: PolygonSet,
    pub index: VertexIndex,
    pub start: VertexId,
    pub end: VertexId,
    /// Original start point, emitted before the relocated start (keyboard mode).
    pub prepend: Option<Point>,
    /// Original end point, emitted after its near point (nearest access).
    pub append: Option<Point>,
}

impl PathfindingState {
    pub fn new(
        mut set: PolygonSet,
        start: Point,
        end: Point,
        keyboard: bool,
        screen: &ScreenBounds,
    ) -> Result<Self, Error> {
        check_intersections(&VertexIndex::new(&set))?;

        let (new_start, prepend) = if keyboard {
            keyboard_start(&mut set, start, end, screen)?
        } else {
            (set.fix_point(start, screen)?.point, None)
        };

        let fixed_end = set.fix_point(end, screen)?;
        let append = if fixed_end.moved_from == Some(AccessType::Nearest) {
            Some(end)
        } else {
            None
        };

        set.merge_point(new_start);
        set.merge_point(fixed_end.point);

        let index = VertexIndex::new(&set);
        let start_v = index
            .find(new_start)
            .ok_or(Error::NoFreePoint { point: new_start })?;
        let end_v = index
            .find(fixed_end.point)
            .ok_or(Error::NoFreePoint {
                point: fixed_end.point,
            })?;

        debug!(
            "normalized: {} polygons, {} vertices, start {:?} (v{}), end {:?} (v{})",
            set.len(),
            index.len(),
            new_start,
            start_v,
            fixed_end.point,
            end_v
        );

        Ok(Self {
            set,
            index,
            start: start_v,
            end: end_v,
            prepend,
            append,
        })
    }
}

/* keyboard_start:
 * Keyboard movement lets the actor leave a polygon it is standing in along the
 * line towards the end point. The search then starts where that line leaves the
 * polygon, and the original start is kept so it can be put in front of the path.
 */
fn keyboard_start(
    set: &mut PolygonSet,
    start: Point,
    end: Point,
    screen: &ScreenBounds,
) -> Result<(Point, Option<Point>), Error> {
    set.remove_total_containing(start);
    if set.is_free(start) {
        return Ok((start, None));
    }

    match nearest_intersection(set, start, end)?.filter(|&isec| isec != start) {
        Some(isec) => {
            debug!("keyboard mode: leaving polygon at {:?}", isec);
            Ok((isec, Some(start)))
        }
        None => Ok((set.fix_point(start, screen)?.point, None)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;

    #[test]
    fn near_point_projects_onto_closest_edge() {
        init_test();
        let screen = ScreenBounds::default();
        let square = rect(AccessType::Barred, 100, 50, 200, 150);
        let set = PolygonSet::from_obstacles(&[square.clone()]);
        assert_eq!(
            near_point(pt(110, 100), &square, &set, &screen),
            Ok(pt(100, 100))
        );
        assert_eq!(
            near_point(pt(150, 140), &square, &set, &screen),
            Ok(pt(150, 150))
        );
    }

    #[test]
    fn near_point_skips_screen_border() {
        let screen = ScreenBounds::default();
        let hugging = rect(AccessType::Barred, 0, 50, 40, 150);
        let set = PolygonSet::from_obstacles(&[hugging.clone()]);
        assert_eq!(near_point(pt(5, 100), &hugging, &set, &screen), Ok(pt(40, 100)));

        // contained polygons may use their border edges
        let room = rect(AccessType::Contained, 0, 50, 40, 150);
        let set = PolygonSet::from_obstacles(&[room.clone()]);
        let near = near_point(pt(-5, 100), &room, &set, &screen).unwrap();
        assert_eq!(near, pt(0, 100));
    }

    #[test]
    fn free_point_search() {
        let set = PolygonSet::from_obstacles(&[rect(AccessType::Barred, 100, 100, 200, 200)]);
        // rounds into the square; the floor candidate is on its edge
        assert_eq!(find_free_point(FloatPoint::new(100.6, 150.0), &set), Ok(pt(100, 150)));
        // outside: the rounded point is used
        assert_eq!(find_free_point(FloatPoint::new(20.4, 30.6), &set), Ok(pt(20, 31)));
        // deep inside: no candidate works
        assert_eq!(
            find_free_point(FloatPoint::new(150.5, 150.5), &set),
            Err(Error::NoFreePoint {
                point: pt(151, 151)
            })
        );
    }

    #[test]
    fn free_point_search_at_coordinate_limit() {
        // everything outside a contained room is unusable, so every candidate fails
        let set = PolygonSet::from_obstacles(&[rect(AccessType::Contained, 0, 0, 10, 10)]);
        let edge = FloatPoint::new(i32::MAX as f64, 5.0);
        assert_eq!(
            find_free_point(edge, &set),
            Err(Error::NoFreePoint {
                point: pt(i32::MAX, 5)
            })
        );
    }

    #[test]
    fn fix_point_cases() {
        let screen = ScreenBounds::default();
        let mut set = PolygonSet::from_obstacles(&[
            rect(AccessType::Total, 0, 0, 60, 60),
            rect(AccessType::Barred, 100, 50, 200, 150),
        ]);

        // free point stays
        let fixed = set.fix_point(pt(80, 80), &screen).unwrap();
        assert_eq!(fixed, FixedPoint { point: pt(80, 80), moved_from: None });
        assert_eq!(set.len(), 2);

        // total access polygon is dropped
        let fixed = set.fix_point(pt(30, 30), &screen).unwrap();
        assert_eq!(fixed.moved_from, None);
        assert_eq!(set.len(), 1);

        // barred polygon pushes the point out
        let fixed = set.fix_point(pt(190, 100), &screen).unwrap();
        assert_eq!(fixed.point, pt(200, 100));
        assert_eq!(fixed.moved_from, Some(AccessType::Barred));
    }

    #[test]
    fn nearest_intersection_along_segment() {
        let set = PolygonSet::from_obstacles(&[rect(AccessType::Barred, 100, 50, 200, 150)]);
        assert_eq!(
            nearest_intersection(&set, pt(150, 100), pt(300, 100)),
            Ok(Some(pt(200, 100)))
        );
        // through a vertex
        assert_eq!(
            nearest_intersection(&set, pt(150, 100), pt(250, 0)),
            Ok(Some(pt(200, 50)))
        );
        // nothing in the way
        assert_eq!(nearest_intersection(&set, pt(0, 0), pt(50, 0)), Ok(None));
    }

    #[test]
    fn intersection_check() {
        init_test();

        fn case(description: &str, obstacles: &[Polygon], ok: bool) {
            let set = PolygonSet::from_obstacles(obstacles);
            let result = check_intersections(&VertexIndex::new(&set));
            assert_eq!(result.is_ok(), ok, "{}: {:?}", description, result);
        }

        case(
            "disjoint squares",
            &[rect(AccessType::Barred, 0, 0, 10, 10), rect(AccessType::Barred, 20, 0, 30, 10)],
            true,
        );
        case(
            "bow tie",
            &[Polygon::new(
                AccessType::Barred,
                vec![pt(0, 0), pt(10, 10), pt(10, 0), pt(0, 10)],
            )],
            false,
        );
        case(
            "shared corner",
            &[rect(AccessType::Barred, 0, 0, 10, 10), rect(AccessType::Barred, 10, 10, 20, 20)],
            false,
        );
        case(
            "overlapping squares",
            &[rect(AccessType::Barred, 0, 0, 10, 10), rect(AccessType::Barred, 5, 5, 20, 20)],
            false,
        );
        case(
            "lone point on an edge",
            &[
                rect(AccessType::Barred, 0, 0, 10, 10),
                Polygon::new(AccessType::Barred, vec![pt(10, 5)]),
            ],
            false,
        );
        case(
            "wall segment",
            &[Polygon::new(AccessType::Barred, vec![pt(0, 0), pt(10, 10)])],
            true,
        );
    }

    #[test]
    fn state_records_endpoint_substitutions() {
        let screen = ScreenBounds::default();

        let set = PolygonSet::from_obstacles(&[rect(AccessType::Nearest, 100, 50, 200, 150)]);
        let state = PathfindingState::new(set, pt(20, 100), pt(110, 100), false, &screen).unwrap();
        assert_eq!(state.append, Some(pt(110, 100)));
        assert_eq!(state.prepend, None);
        assert_eq!(state.index.point(state.end), pt(100, 100));
        assert_eq!(state.index.point(state.start), pt(20, 100));

        let set = PolygonSet::from_obstacles(&[rect(AccessType::Barred, 100, 50, 200, 150)]);
        let state = PathfindingState::new(set, pt(150, 100), pt(300, 100), true, &screen).unwrap();
        assert_eq!(state.prepend, Some(pt(150, 100)));
        assert_eq!(state.index.point(state.start), pt(200, 100));
        assert_eq!(state.append, None);

        let set = PolygonSet::from_obstacles(&[rect(AccessType::Barred, 100, 50, 200, 150)]);
        let state = PathfindingState::new(set, pt(190, 100), pt(300, 100), false, &screen).unwrap();
        assert_eq!(state.prepend, None);
        assert_eq!(state.index.point(state.start), pt(200, 100));
    }
}
