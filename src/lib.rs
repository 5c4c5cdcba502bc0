#![deny(
    missing_docs,
    missing_debug_implementations,
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code,
    unused_import_braces,
    unused_qualifications
)]

//! Hierarchical Path-Finding (HPA*) over rectangular grid maps.
//!
//! ## Introduction
//! Running plain A* or Dijkstra directly on a grid means treating every tile
//! as a node, which gets expensive fast: a short path between two corners of
//! a large, mostly open map still has to visit a large fraction of its
//! tiles. Hierarchical Pathfinding improves on this by partitioning the grid
//! into fixed-size clusters, detecting the passable "entrances" between
//! neighbouring clusters, and pre-computing the cost of crossing each
//! cluster's interior between its entrances. A query then searches this much
//! smaller abstract graph instead of the full grid, and only refines the
//! result into concrete tiles afterwards.
//!
//! Because the abstract graph isn't an exact model of the grid, the
//! resulting paths can take a visibly suboptimal detour when they're short
//! (`length < 2 * cluster_size`) — see
//! [`HierarchicalMapConfig::a_star_fallback`], which runs a direct A* in that
//! case and is on by default.
//!
//! ## Example
//! ```
//! use hpa_grid_pathfinding::prelude::*;
//! use hpa_grid_pathfinding::TileInfo;
//!
//! // 0 = empty, 1 = swamp, 2 = wall
//! let grid = [
//!     [0, 2, 0, 0, 0],
//!     [0, 2, 2, 2, 0],
//!     [0, 1, 0, 0, 0],
//!     [0, 1, 0, 2, 0],
//!     [0, 0, 0, 2, 0],
//! ];
//! let (width, height) = (grid[0].len(), grid.len());
//!
//! let concrete = hpa_grid_pathfinding::ConcreteGraph::build(width, height, TileType::Tile, |p| {
//!     let tile = grid[p.y][p.x];
//!     TileInfo {
//!         passable: tile != 2,
//!         cost: if tile == 1 { 10 } else { 1 },
//!     }
//! });
//!
//! let mut map = HierarchicalMap::build(
//!     concrete,
//!     HierarchicalMapConfig { cluster_size: 3, ..Default::default() },
//! )
//! .unwrap();
//!
//! let path = map.find_path(Position::new(0, 0), Position::new(4, 4));
//! assert!(path.is_some());
//! assert_eq!(path.unwrap().cost(), 12);
//! ```
//!
//! Note that [`HierarchicalMap`] never stores the grid itself, only what
//! [`ConcreteGraph::build`] derived from it. The oracle closure is only ever
//! called while building or updating ([`HierarchicalMap::tiles_changed`]),
//! never while answering a query.

mod abstract_graph;
mod cluster;
mod concrete;
mod config;
mod entrance;
mod error;
mod graph;
mod ids;
mod map;
mod path;
mod point;

pub use crate::concrete::{ConcreteGraph, TileInfo};
pub use crate::config::HierarchicalMapConfig;
pub use crate::entrance::EntranceStyle;
pub use crate::error::HpaError;
pub use crate::map::{HierarchicalMap, Inspector};
pub use crate::path::ConcretePath;
pub use crate::point::{Position, TileType};

/// The prelude for this crate.
///
/// Note: [`TileInfo`] and [`ConcreteGraph`] are deliberately not included,
/// since most uses of [`HierarchicalMap::build`] only need `ConcreteGraph`
/// once at setup time — importing it unqualified invites a name clash with
/// callers' own grid types.
pub mod prelude {
    pub use crate::{HierarchicalMap, HierarchicalMapConfig, Position, TileType};
}
