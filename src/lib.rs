//! `flatrtree`: an in-memory 2D R-tree spatial index.
//!
//! Stores axis-aligned [`Rectangle`]s tagged with caller-supplied `i32` ids
//! and answers three query families: rectangle intersection, rectangle
//! containment, and k-nearest-neighbour search against a [`Point`]. Node
//! splitting follows Guttman's quadratic-cost algorithm; nodes are
//! array-backed (parallel coordinate arrays plus an id array) and addressed
//! by integer id through a node table rather than owned by their parent, to
//! keep the hot insert/delete/query paths allocation-free.
//!
//! ```
//! use flatrtree::{Point, RTree, Rectangle};
//!
//! let mut tree = RTree::new();
//! tree.add(Rectangle::new(0.0, 0.0, 1.0, 1.0), 1);
//! tree.add(Rectangle::new(5.0, 5.0, 6.0, 6.0), 2);
//!
//! let mut closest = None;
//! tree.nearest(Point::new(0.0, 0.0), f64::INFINITY, |id| {
//!     closest = Some(id);
//!     false
//! });
//! assert_eq!(closest, Some(1));
//! ```
//!
//! # Thread safety
//!
//! `RTree` is not `Sync`. Every operation, including queries, reads or
//! writes scratch buffers owned by the tree to avoid allocating on the hot
//! path, so concurrent access from multiple threads is undefined even when
//! every thread only reads. Share a tree across threads behind a mutex.

mod algorithm;
pub mod config;
pub mod error;
pub mod geometry;
mod logging;
pub mod node;
pub mod priority_queue;
pub mod rtree;
pub mod sorted_list;

pub use config::RTreeConfig;
pub use error::RTreeError;
pub use geometry::{Point, Rectangle};
pub use rtree::{version, RTree};
