//! Polygon-avoidance pathfinding.
//!
//! Given a start point, an end point and a set of typed obstacle polygons, computes
//! a walkable route around the obstacles. The route runs over the visibility graph of
//! the polygon vertices, which is built with one rotational sweep per vertex and
//! searched with Dijkstra's algorithm.
//!
//! ```
//! use avoidpath::{find_path, AccessType, PathStatus, PathfinderConfig, Point, Polygon, Query};
//!
//! let wall = Polygon::new(
//!     AccessType::Barred,
//!     vec![Point::new(80, 60), Point::new(120, 60), Point::new(120, 140), Point::new(80, 140)],
//! );
//! let query = Query::new(Point::new(0, 100), Point::new(200, 100)).obstacle(wall);
//! let result = find_path(&query, &PathfinderConfig::default());
//! assert_eq!(result.status, PathStatus::Success);
//! assert_eq!(result.points().len(), 4);
//! ```

pub mod aa_tree;
pub mod avoid_path;
pub mod config;
pub mod error;
pub mod geom;
pub mod normalize;
pub mod path;
pub mod polygon;
pub mod shortest_path;
pub mod vec2;
pub mod visibility;

#[cfg(test)]
mod testing;

pub use avoid_path::{find_path, OptimizationLevel, Query};
pub use config::{PathfinderConfig, ScreenBounds};
pub use error::Error;
pub use path::{PathResult, PathStatus};
pub use polygon::{AccessType, Polygon};
pub use vec2::{FloatPoint, Point};
