use crate::config::PathfinderConfig;
use crate::polygon::{VertexId, VertexIndex};
use crate::visibility::VisibilityMatrix;
use bit_vec::BitVec;
use log::{debug, warn};

/// Result of a single-source search. `distance[v]` is the cost of the cheapest
/// route found to v (`INFINITY` if v was never reached), and `predecessor[v]` the
/// vertex it was reached from.
#[derive(Clone, Debug)]
pub struct ShortestPaths {
    pub distance: Vec<f64>,
    pub predecessor: Vec<Option<VertexId>>,
    pub source: VertexId,
    pub target: VertexId,
    pub reached_target: bool,
}

impl ShortestPaths {
    pub fn is_reached(&self, v: VertexId) -> bool {
        self.distance[v].is_finite()
    }

    /// The vertices from the source to `v`, in walking order. Empty if v was not
    /// reached.
    pub fn chain_to(&self, v: VertexId) -> Vec<VertexId> {
        if !self.is_reached(v) {
            return Vec::new();
        }
        let mut chain = vec![v];
        let mut cur = v;
        while let Some(u) = self.predecessor[cur] {
            chain.push(u);
            cur = u;
        }
        chain.reverse();
        chain
    }
}

/* dijkstra:
 * Dijkstra's algorithm over the dense visibility relation, with Euclidean edge
 * weights. The next vertex to settle is found by a linear scan (lowest id wins a
 * tie), which is the right trade for a dense graph. The search stops as soon as the
 * target is settled, or when no unsettled vertex has a finite distance.
 *
 * With `avoid_screen_edges` set, vertices on the screen border are never relaxed
 * unless they are the target.
 */
pub fn dijkstra(
    index: &VertexIndex,
    vis: &VisibilityMatrix,
    source: VertexId,
    target: VertexId,
    config: &PathfinderConfig,
) -> ShortestPaths {
    let n = index.len();
    let mut distance = vec![core::f64::INFINITY; n];
    let mut predecessor: Vec<Option<VertexId>> = vec![None; n];
    let mut done = BitVec::from_elem(n, false);
    distance[source] = 0.0;

    let mut reached_target = false;
    loop {
        let mut min: Option<VertexId> = None;
        for v in 0..n {
            if done[v] || !distance[v].is_finite() {
                continue;
            }
            if min.map_or(true, |m| distance[v] < distance[m]) {
                min = Some(v);
            }
        }

        let k = match min {
            Some(k) => k,
            None => {
                warn!(
                    "target {:?} is unreachable from {:?}",
                    index.point(target),
                    index.point(source)
                );
                break;
            }
        };

        done.set(k, true);
        if k == target {
            reached_target = true;
            break;
        }

        let pk = index.point(k);
        for t in vis.neighbors(k) {
            if done[t] {
                continue;
            }
            let pt = index.point(t);
            if config.avoid_screen_edges && t != target && config.screen.on_border(pt) {
                continue;
            }
            let new_distance = distance[k] + pk.dist(pt);
            if new_distance < distance[t] {
                distance[t] = new_distance;
                predecessor[t] = Some(k);
            }
        }
    }

    debug!(
        "dijkstra: {} of {} vertices settled, target {}",
        done.iter().filter(|&d| d).count(),
        n,
        if reached_target { "reached" } else { "not reached" }
    );

    ShortestPaths {
        distance,
        predecessor,
        source,
        target,
        reached_target,
    }
}
