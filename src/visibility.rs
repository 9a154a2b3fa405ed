//! Visibility graph over the vertices of a `VertexIndex`, built with one rotational
//! sweep per vertex.

use crate::aa_tree::AaTree;
use crate::geom::{between, intersect_proper, signed_area};
use crate::polygon::{VertexId, VertexIndex};
use crate::vec2::Point;
use bit_vec::BitVec;
use core::cmp::Ordering;
use core::ops::Index;
use log::{debug, warn};

/// Symmetric N×N relation. `m[(i, j)]` is true when vertices i and j see each other.
#[derive(Clone)]
pub struct VisibilityMatrix {
    n: usize,
    bits: BitVec,
}

impl VisibilityMatrix {
    pub fn new(n: usize) -> Self {
        Self {
            n,
            bits: BitVec::from_elem(n * n, false),
        }
    }

    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    pub fn get(&self, i: usize, j: usize) -> bool {
        self.bits[i * self.n + j]
    }

    /// Sets both (i, j) and (j, i).
    pub fn set(&mut self, i: usize, j: usize, value: bool) {
        self.bits.set(i * self.n + j, value);
        self.bits.set(j * self.n + i, value);
    }

    pub fn neighbors(&self, i: usize) -> impl Iterator<Item = VertexId> + '_ {
        (0..self.n).filter(move |&j| self.get(i, j))
    }

    /// Number of unordered visible pairs.
    pub fn num_pairs(&self) -> usize {
        (0..self.n)
            .map(|i| (i + 1..self.n).filter(|&j| self.get(i, j)).count())
            .sum()
    }
}

impl Index<(usize, usize)> for VisibilityMatrix {
    type Output = bool;
    fn index(&self, (i, j): (usize, usize)) -> &bool {
        &self.bits[i * self.n + j]
    }
}

impl core::fmt::Debug for VisibilityMatrix {
    fn fmt(&self, fmt: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        writeln!(fmt, "VisibilityMatrix {}x{}", self.n, self.n)?;
        for i in 0..self.n {
            for j in 0..self.n {
                fmt.write_str(if self.get(i, j) { "1" } else { "." })?;
            }
            writeln!(fmt)?;
        }
        Ok(())
    }
}

// Direction from `from` to `to`, widened so far-apart points cannot overflow.
fn delta(from: Point, to: Point) -> (i64, i64) {
    (to.x as i64 - from.x as i64, to.y as i64 - from.y as i64)
}

fn cross(u: (i64, i64), v: (i64, i64)) -> i128 {
    u.0 as i128 * v.1 as i128 - u.1 as i128 * v.0 as i128
}

fn sign(v: i64) -> i32 {
    match v.cmp(&0) {
        Ordering::Less => -1,
        Ordering::Equal => 0,
        Ordering::Greater => 1,
    }
}

/* compare_angle:
 * Orders direction vectors by angle, starting at the +x axis and increasing towards
 * +y. Exact; no trigonometry.
 */
fn compare_angle(d1: (i64, i64), d2: (i64, i64)) -> Ordering {
    fn half((x, y): (i64, i64)) -> u8 {
        if y > 0 || (y == 0 && x > 0) {
            0
        } else {
            1
        }
    }
    half(d1)
        .cmp(&half(d2))
        .then_with(|| 0.cmp(&cross(d1, d2)))
}

fn sqr_len((x, y): (i64, i64)) -> i128 {
    x as i128 * x as i128 + y as i128 * y as i128
}

/// Vertices other than the origin in sweep order: by angle, then by distance, then
/// by id.
pub fn sweep_order(index: &VertexIndex, origin: VertexId) -> Vec<VertexId> {
    let p = index.point(origin);
    let mut order: Vec<VertexId> = (0..index.len())
        .filter(|&v| index.point(v) != p)
        .collect();
    order.sort_by(|&a, &b| {
        let pa = index.point(a);
        let pb = index.point(b);
        compare_angle(delta(p, pa), delta(p, pb))
            .then_with(|| sqr_len(delta(p, pa)).cmp(&sqr_len(delta(p, pb))))
            .then(a.cmp(&b))
    });
    order
}

// Is segment c-d entirely on p's side of the line through a-b? None if that cannot
// be decided from this line alone.
fn same_side_as_origin(p: Point, a: Point, b: Point, c: Point, d: Point) -> Option<bool> {
    let sp = sign(signed_area(a, b, p));
    let sc = sign(signed_area(a, b, c));
    let sd = sign(signed_area(a, b, d));
    if sp == 0 || (sc == 0 && sd == 0) || sc * sd < 0 {
        return None;
    }
    let s = if sc != 0 { sc } else { sd };
    Some(s == sp)
}

/* compare_edges:
 * Orders two active edges by their distance from the sweep origin along any ray that
 * crosses both. Active edges never cross each other, so one of them always lies
 * entirely on one side of the other's line. Edges are named by their first vertex.
 */
fn compare_edges(index: &VertexIndex, p: Point, e1: VertexId, e2: VertexId) -> Ordering {
    if e1 == e2 {
        return Ordering::Equal;
    }
    let (a1, b1) = (index.point(e1), index.point(index.next(e1)));
    let (a2, b2) = (index.point(e2), index.point(index.next(e2)));

    if let Some(e2_closer) = same_side_as_origin(p, a1, b1, a2, b2) {
        return if e2_closer {
            Ordering::Greater
        } else {
            Ordering::Less
        };
    }
    if let Some(e1_closer) = same_side_as_origin(p, a2, b2, a1, b1) {
        return if e1_closer {
            Ordering::Less
        } else {
            Ordering::Greater
        };
    }

    let d1 = p.sqr_dist(a1).min(p.sqr_dist(b1));
    let d2 = p.sqr_dist(a2).min(p.sqr_dist(b2));
    d1.cmp(&d2).then(e1.cmp(&e2))
}

// Does edge a-b cross the ray from p towards +x, strictly between its endpoints?
fn crosses_initial_ray(p: Point, a: Point, b: Point) -> bool {
    let da = delta(p, a);
    let db = delta(p, b);
    if (da.1 > 0) == (db.1 > 0) || da.1 == 0 || db.1 == 0 {
        return false;
    }
    let num = cross(da, db);
    let den = db.1 - da.1;
    num != 0 && (num > 0) == (den > 0)
}

/// The set of edges crossed by the current sweep ray, nearest first.
struct ActiveEdges<'a> {
    index: &'a VertexIndex,
    origin: Point,
    tree: AaTree<VertexId>,
    active: BitVec,
}

impl<'a> ActiveEdges<'a> {
    fn new(index: &'a VertexIndex, origin: Point) -> Self {
        Self {
            index,
            origin,
            tree: AaTree::new(),
            active: BitVec::from_elem(index.len(), false),
        }
    }

    fn insert(&mut self, edge: VertexId) {
        if self.active[edge] {
            return;
        }
        let (index, p) = (self.index, self.origin);
        self.tree
            .insert_by(edge, |&a, &b| compare_edges(index, p, a, b));
        self.active.set(edge, true);
    }

    fn remove(&mut self, edge: VertexId) {
        if !self.active[edge] {
            return;
        }
        let (index, p) = (self.index, self.origin);
        let cmp = |a: &VertexId, b: &VertexId| compare_edges(index, p, *a, *b);
        if self.tree.remove_by(&edge, cmp).is_none() {
            warn!(
                "active edge {} from {:?} not found by ordered search; rebuilding",
                edge, p
            );
            self.tree.retain_by(|&e| e != edge, cmp);
        }
        self.active.set(edge, false);
    }

    fn nearest(&self) -> Option<VertexId> {
        self.tree.first().copied()
    }

    fn any_crosses(&self, a: Point, b: Point) -> bool {
        self.tree.iter().any(|&e| {
            intersect_proper(
                a,
                b,
                self.index.point(e),
                self.index.point(self.index.next(e)),
            )
        })
    }
}

/// Computes which vertices are visible from `origin`, by sweeping a ray around it.
///
/// A vertex w is visible when the segment from the origin to w does not run into
/// w's polygon at w, no polygon edge properly crosses the segment, and every vertex
/// lying on the segment is passed without entering its polygon. Whether the segment
/// enters the origin's own polygon at the origin is left to the sweep from the other
/// end; `visibility_graph` combines both.
pub fn visible_vertices(index: &VertexIndex, origin: VertexId) -> Vec<VertexId> {
    let p = index.point(origin);
    let order = sweep_order(index, origin);

    let mut edges = ActiveEdges::new(index, p);
    for (a, b) in index.edges() {
        let (pa, pb) = (index.point(a), index.point(b));
        if pa == p || pb == p {
            continue;
        }
        if crosses_initial_ray(p, pa, pb) {
            edges.insert(a);
        }
    }

    let mut visible = Vec::new();
    let mut prev: Option<(VertexId, bool)> = None;

    for &w in order.iter() {
        let pw = index.point(w);

        let is_visible = if index.enters_interior(w, p) {
            false
        } else {
            match prev {
                Some((u, u_visible)) if between(p, pw, index.point(u)) => {
                    let pu = index.point(u);
                    u_visible && !index.enters_interior(u, pw) && !edges.any_crosses(pu, pw)
                }
                _ => match edges.nearest() {
                    Some(e) => !intersect_proper(
                        p,
                        pw,
                        index.point(e),
                        index.point(index.next(e)),
                    ),
                    None => true,
                },
            }
        };

        if is_visible {
            visible.push(w);
        }
        prev = Some((w, is_visible));

        if index.has_edges(w) {
            // (edge key, other endpoint) for the two edges meeting at w
            let incident = [(index.prev(w), index.prev(w)), (w, index.next(w))];
            for &(edge, other) in incident.iter() {
                if signed_area(p, pw, index.point(other)) <= 0 {
                    edges.remove(edge);
                }
            }
            for &(edge, other) in incident.iter() {
                if signed_area(p, pw, index.point(other)) > 0 {
                    edges.insert(edge);
                }
            }
        }
    }

    visible
}

/// Builds the visibility relation over every vertex. A pair is recorded only when
/// the sweeps from both ends agree.
pub fn visibility_graph(index: &VertexIndex) -> VisibilityMatrix {
    let n = index.len();
    let mut directed = BitVec::from_elem(n * n, false);
    for v in 0..n {
        for w in visible_vertices(index, v) {
            directed.set(v * n + w, true);
        }
    }

    let mut matrix = VisibilityMatrix::new(n);
    let mut one_sided = 0;
    for i in 0..n {
        for j in i + 1..n {
            match (directed[i * n + j], directed[j * n + i]) {
                (true, true) => matrix.set(i, j, true),
                (false, false) => {}
                _ => one_sided += 1,
            }
        }
    }

    debug!(
        "visibility graph: {} vertices, {} visible pairs, {} one-sided pairs dropped",
        n,
        matrix.num_pairs(),
        one_sided
    );
    matrix
}
