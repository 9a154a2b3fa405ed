use crate::vec2::Point;

/// Dimensions of the screen the obstacles live on.
///
/// Points on the outermost rows and columns count as "on the border". Paths are kept
/// from skating along the border, and polygon edges that lie on it are not used as
/// targets when a trapped point is pushed out of a polygon.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScreenBounds {
    pub width: i32,
    pub height: i32,
}

impl Default for ScreenBounds {
    fn default() -> Self {
        Self {
            width: 320,
            height: 200,
        }
    }
}

impl ScreenBounds {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub fn on_border(&self, p: Point) -> bool {
        p.x == 0 || p.y == 0 || p.x == self.width - 1 || p.y == self.height - 1
    }

    /// Returns true if the segment pq runs along one of the four border lines.
    pub fn edge_on_border(&self, p: Point, q: Point) -> bool {
        if p.x == q.x && (p.x == 0 || p.x == self.width - 1) {
            return true;
        }
        p.y == q.y && (p.y == 0 || p.y == self.height - 1)
    }
}

/// Settings shared by every query.
#[derive(Clone, Debug)]
pub struct PathfinderConfig {
    pub screen: ScreenBounds,
    /// Skip border vertices during the search, unless the vertex is the destination.
    pub avoid_screen_edges: bool,
    /// Upper bound on the number of vertices a query may contain. Larger inputs are
    /// rejected and answered with the direct path.
    pub max_vertices: Option<usize>,
}

impl Default for PathfinderConfig {
    fn default() -> Self {
        Self {
            screen: ScreenBounds::default(),
            avoid_screen_edges: true,
            max_vertices: None,
        }
    }
}

impl PathfinderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_screen(mut self, width: i32, height: i32) -> Self {
        self.screen = ScreenBounds::new(width, height);
        self
    }

    pub fn with_max_vertices(mut self, limit: usize) -> Self {
        self.max_vertices = Some(limit);
        self
    }
}
