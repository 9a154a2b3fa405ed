//! Typed obstacle polygons and the flat vertex index built over them.

use crate::error::Error;
use crate::geom::{between, left, polygon_area};
use crate::vec2::Point;
use log::debug;

/// Controls what happens to an endpoint found inside a polygon.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AccessType {
    /// Walkable; a polygon containing an endpoint is dropped from the query.
    Total = 0,
    /// An endpoint inside is moved to the nearest boundary point. If it is the end
    /// point, the original is still reported as the last point of the path.
    Nearest = 1,
    /// Never entered or crossed.
    Barred = 2,
    /// The inside is the usable area; everything outside is barred.
    Contained = 3,
}

impl AccessType {
    pub fn from_code(code: i32) -> Result<Self, Error> {
        match code {
            0 => Ok(AccessType::Total),
            1 => Ok(AccessType::Nearest),
            2 => Ok(AccessType::Barred),
            3 => Ok(AccessType::Contained),
            _ => Err(Error::UnknownAccessType(code)),
        }
    }

    pub fn code(self) -> i32 {
        self as i32
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Containment {
    Outside,
    OnEdge,
    Inside,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Polygon {
    pub access: AccessType,
    pub points: Vec<Point>,
}

impl Polygon {
    pub fn new(access: AccessType, points: Vec<Point>) -> Self {
        Self { access, points }
    }

    /// Builds a polygon from caller data, dropping repeated consecutive points. A
    /// closing point equal to the first one is dropped as well.
    pub fn from_raw(access: AccessType, raw: &[Point]) -> Self {
        let mut points: Vec<Point> = Vec::with_capacity(raw.len());
        for &p in raw.iter() {
            if points.last() != Some(&p) {
                points.push(p);
            }
        }
        while points.len() > 1 && points.first() == points.last() {
            points.pop();
        }
        Self { access, points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn next_index(&self, i: usize) -> usize {
        (i + 1) % self.points.len()
    }

    pub fn prev_index(&self, i: usize) -> usize {
        (i + self.points.len() - 1) % self.points.len()
    }

    /// Iterates edges (p[i], p[i+1]), wrapping around. A single-vertex polygon yields
    /// one degenerate edge.
    pub fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }

    pub fn area(&self) -> i64 {
        polygon_area(&self.points)
    }

    /* fix_vertex_order:
     * Contained polygons are wound so that their (barred) exterior lies to the left
     * of each edge; all other types have their interior on the left.
     */
    pub fn fix_vertex_order(&mut self) {
        let area = self.area();
        let wrong = if self.access == AccessType::Contained {
            area > 0
        } else {
            area < 0
        };
        if wrong {
            debug!("reversing {:?} polygon with area {}", self.access, area);
            self.points.reverse();
        }
    }

    /* contained:
     * Classifies p against the polygon by casting a horizontal ray and counting
     * crossings on the left and on the right separately. A vertex hit, or an odd
     * total, means p lies on the boundary. Contained polygons report the inverted
     * result, since their inside is the usable area.
     */
    pub fn contained(&self, p: Point) -> Containment {
        let mut lcross = 0;
        let mut rcross = 0;

        for (v1, v2) in self.edges() {
            if p == v1 {
                return Containment::OnEdge;
            }

            let rstrad = (v1.y < p.y) != (v2.y < p.y);
            let lstrad = (v1.y > p.y) != (v2.y > p.y);

            if lstrad || rstrad {
                // Sign of (crossing x - p.x) is the sign of po / q.
                let po = (v1.x as i64 - p.x as i64) * (v2.y as i64 - p.y as i64)
                    - (v2.x as i64 - p.x as i64) * (v1.y as i64 - p.y as i64);
                let q = v2.y as i64 - v1.y as i64;

                if rstrad && ((q > 0 && po > 0) || (q < 0 && po < 0)) {
                    rcross += 1;
                }
                if lstrad && ((q > 0 && po < 0) || (q < 0 && po > 0)) {
                    lcross += 1;
                }
            }
        }

        if (lcross + rcross) % 2 == 1 {
            return Containment::OnEdge;
        }

        let inside = rcross % 2 == 1;
        if inside != (self.access == AccessType::Contained) {
            Containment::Inside
        } else {
            Containment::Outside
        }
    }

    /// Point-in-polygon query: true unless p is strictly outside.
    pub fn contains_point(&self, p: Point) -> bool {
        self.contained(p) != Containment::Outside
    }
}

/// The working collection of polygons for one query.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PolygonSet {
    polygons: Vec<Polygon>,
}

impl PolygonSet {
    pub fn new() -> Self {
        Self {
            polygons: Vec::new(),
        }
    }

    /// Cleans up raw obstacles: duplicate points are dropped, empty polygons are
    /// skipped and every polygon gets the winding its access type requires.
    pub fn from_obstacles(obstacles: &[Polygon]) -> Self {
        let mut polygons = Vec::with_capacity(obstacles.len());
        for obstacle in obstacles.iter() {
            let mut polygon = Polygon::from_raw(obstacle.access, &obstacle.points);
            if polygon.is_empty() {
                debug!("skipping empty {:?} polygon", polygon.access);
                continue;
            }
            polygon.fix_vertex_order();
            polygons.push(polygon);
        }
        Self { polygons }
    }

    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    pub fn push(&mut self, polygon: Polygon) {
        self.polygons.push(polygon);
    }

    pub fn num_vertices(&self) -> usize {
        self.polygons.iter().map(|p| p.len()).sum()
    }

    /// Returns the first polygon that has p strictly inside.
    pub fn trapping_polygon(&self, p: Point) -> Option<&Polygon> {
        self.polygons
            .iter()
            .find(|polygon| polygon.contained(p) == Containment::Inside)
    }

    pub fn is_free(&self, p: Point) -> bool {
        self.trapping_polygon(p).is_none()
    }

    /// Drops every total access polygon that contains p, returning how many went.
    pub fn remove_total_containing(&mut self, p: Point) -> usize {
        let before = self.polygons.len();
        let polygons = core::mem::take(&mut self.polygons);
        self.polygons = polygons
            .into_iter()
            .filter(|polygon| {
                polygon.access != AccessType::Total || polygon.contained(p) == Containment::Outside
            })
            .collect();
        let removed = before - self.polygons.len();
        if removed != 0 {
            debug!("removed {} total access polygon(s) containing {:?}", removed, p);
        }
        removed
    }

    /* merge_point:
     * Makes p a vertex of the set. An existing vertex at p is reused. Otherwise an
     * edge that p lies on is split. Otherwise p becomes a barred polygon of its own,
     * which takes part in visibility tests without adding any edges.
     */
    pub fn merge_point(&mut self, p: Point) {
        if self.polygons.iter().any(|polygon| polygon.points.contains(&p)) {
            return;
        }

        for polygon in self.polygons.iter_mut() {
            let n = polygon.points.len();
            for i in 0..n {
                let a = polygon.points[i];
                let b = polygon.points[(i + 1) % n];
                if a != b && between(a, b, p) {
                    debug!("merge_point: splitting edge {:?}-{:?} at {:?}", a, b, p);
                    polygon.points.insert(i + 1, p);
                    return;
                }
            }
        }

        debug!("merge_point: adding {:?} as a single-vertex polygon", p);
        self.polygons
            .push(Polygon::new(AccessType::Barred, vec![p]));
    }
}

// vertex id; an index into a VertexIndex
pub type VertexId = usize;

/// Flat view of every vertex in a `PolygonSet`.
///
/// Vertices are numbered polygon by polygon. `start[i]..start[i + 1]` is the id range
/// of polygon i, and `next`/`prev` give the cyclic neighbours inside that polygon. A
/// vertex of a single-vertex polygon is its own neighbour and has no edges.
#[derive(Clone, Debug, Default)]
pub struct VertexIndex {
    points: Vec<Point>,
    next: Vec<VertexId>,
    prev: Vec<VertexId>,
    polygon: Vec<usize>,
    start: Vec<usize>,
}

impl VertexIndex {
    pub fn new(set: &PolygonSet) -> Self {
        let n = set.num_vertices();
        let mut index = Self {
            points: Vec::with_capacity(n),
            next: Vec::with_capacity(n),
            prev: Vec::with_capacity(n),
            polygon: Vec::with_capacity(n),
            start: Vec::with_capacity(set.len() + 1),
        };

        for (pi, polygon) in set.polygons().iter().enumerate() {
            let base = index.points.len();
            index.start.push(base);
            for (i, &p) in polygon.points.iter().enumerate() {
                index.points.push(p);
                index.next.push(base + polygon.next_index(i));
                index.prev.push(base + polygon.prev_index(i));
                index.polygon.push(pi);
            }
        }
        index.start.push(index.points.len());
        index
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn point(&self, v: VertexId) -> Point {
        self.points[v]
    }

    pub fn next(&self, v: VertexId) -> VertexId {
        self.next[v]
    }

    pub fn prev(&self, v: VertexId) -> VertexId {
        self.prev[v]
    }

    pub fn polygon_of(&self, v: VertexId) -> usize {
        self.polygon[v]
    }

    pub fn polygon_size(&self, v: VertexId) -> usize {
        let pi = self.polygon[v];
        self.start[pi + 1] - self.start[pi]
    }

    pub fn has_edges(&self, v: VertexId) -> bool {
        self.next[v] != v
    }

    pub fn find(&self, p: Point) -> Option<VertexId> {
        self.points.iter().position(|&q| q == p)
    }

    /// Every polygon edge, as (first vertex, second vertex). The first vertex
    /// identifies the edge.
    pub fn edges(&self) -> impl Iterator<Item = (VertexId, VertexId)> + '_ {
        (0..self.len())
            .filter(move |&v| self.has_edges(v))
            .map(move |v| (v, self.next[v]))
    }

    /* enters_interior:
     * Returns true if the segment from vertex v toward p runs into the interior of
     * v's polygon right at v. At a convex vertex p has to be left of both incident
     * edges; at a reflex vertex left of either.
     */
    pub fn enters_interior(&self, v: VertexId, p: Point) -> bool {
        if self.polygon_size(v) < 3 {
            return false;
        }
        let prev = self.points[self.prev[v]];
        let cur = self.points[v];
        let next = self.points[self.next[v]];
        if left(prev, cur, next) {
            left(cur, next, p) && left(prev, cur, p)
        } else {
            left(cur, next, p) || left(prev, cur, p)
        }
    }
}
