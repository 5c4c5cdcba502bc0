//! The concrete graph: one node per grid tile, edges to in-bounds geometric
//! neighbours under the map's [`TileType`] (C2).

use crate::graph::{Graph, GraphId};
use crate::ids::ConcreteNodeId;
use crate::point::{Position, TileType};

/// Info stored on every concrete node.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ConcreteNode {
    /// the tile this node represents
    pub position: Position,
    /// `true` if the tile cannot be entered
    pub is_obstacle: bool,
    /// movement cost of the tile; only meaningful when `!is_obstacle`
    pub cost: u32,
}

/// Info stored on every concrete edge: the cost of stepping across it.
/// Obstacle-filtering happens at search time, not here — the graph stays
/// topology-complete.
pub(crate) type ConcreteEdge = u32;

/// The concrete grid graph, see the module docs.
#[derive(Clone, Debug)]
pub struct ConcreteGraph {
    graph: Graph<ConcreteNodeId, ConcreteNode, ConcreteEdge>,
    width: usize,
    height: usize,
    tile_type: TileType,
}

/// Passability and cost for a single tile, as reported by the caller's
/// oracle. `cost` is only meaningful when `passable` is `true`.
#[derive(Clone, Copy, Debug)]
pub struct TileInfo {
    /// whether the tile can be entered
    pub passable: bool,
    /// movement cost of the tile
    pub cost: u32,
}

impl ConcreteGraph {
    /// Builds the concrete graph for a `width x height` grid.
    ///
    /// `oracle` is queried exactly once per tile, in row-major order.
    pub fn build(
        width: usize,
        height: usize,
        tile_type: TileType,
        mut oracle: impl FnMut(Position) -> TileInfo,
    ) -> Self {
        let mut graph = Graph::with_capacity(width * height);

        for y in 0..height {
            for x in 0..width {
                let position = Position::new(x, y);
                let info = oracle(position);
                let id = graph.add_node(ConcreteNode {
                    position,
                    is_obstacle: !info.passable,
                    cost: info.cost,
                });
                debug_assert_eq!(id.index(), position.tile_index(width));
            }
        }

        let mut concrete = ConcreteGraph {
            graph,
            width,
            height,
            tile_type,
        };
        concrete.connect_all();
        concrete
    }

    fn connect_all(&mut self) {
        for y in 0..self.height {
            for x in 0..self.width {
                let src_pos = Position::new(x, y);
                let src = self.node_id(src_pos);
                for &(dx, dy, is_diagonal) in self.tile_type.neighbor_offsets(x) {
                    let Some(target_pos) = self.offset(src_pos, dx, dy) else {
                        continue;
                    };
                    let target = self.node_id(target_pos);
                    let target_cost = self.graph[target].cost;
                    let cost = self.tile_type.edge_cost(target_cost, is_diagonal);
                    self.graph.add_edge(src, target, cost);
                }
            }
        }
    }

    fn offset(&self, pos: Position, dx: isize, dy: isize) -> Option<Position> {
        let x = pos.x as isize + dx;
        let y = pos.y as isize + dy;
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            None
        } else {
            Some(Position::new(x as usize, y as usize))
        }
    }

    /// The id of the node at `position`: `id = y * width + x`. Never fails
    /// for a `Position` obtained from this graph.
    pub(crate) fn node_id(&self, position: Position) -> ConcreteNodeId {
        GraphId::from_index(position.tile_index(self.width))
    }

    /// Grid width in tiles.
    pub(crate) fn width(&self) -> usize {
        self.width
    }
    /// Grid height in tiles.
    pub(crate) fn height(&self) -> usize {
        self.height
    }
    /// The connectivity rule this graph was built with.
    pub(crate) fn tile_type(&self) -> TileType {
        self.tile_type
    }

    /// Info of the node at `id`.
    pub(crate) fn node(&self, id: ConcreteNodeId) -> &ConcreteNode {
        &self.graph[id]
    }

    /// Outgoing edges of `id`, as `(target, cost)` pairs.
    pub(crate) fn neighbors(&self, id: ConcreteNodeId) -> impl Iterator<Item = (ConcreteNodeId, u32)> + '_ {
        self.graph.edges(id).iter().map(|e| (e.target, e.info))
    }

    /// `true` if `position` is inside the grid.
    pub(crate) fn in_bounds(&self, position: Position) -> bool {
        position.x < self.width && position.y < self.height
    }

    /// A predicate usable as a search's `is_walkable` filter: `true` unless
    /// the node is an obstacle.
    pub(crate) fn is_walkable(&self, id: ConcreteNodeId) -> bool {
        !self.graph[id].is_obstacle
    }

    /// Overwrites the passability/cost of a tile in place. Does not update
    /// edge costs; callers must follow up with [`ConcreteGraph::rebuild_edges`]
    /// once every changed tile has been applied.
    pub(crate) fn set_tile(&mut self, id: ConcreteNodeId, info: TileInfo) {
        let node = self.graph.node_info_mut(id);
        node.is_obstacle = !info.passable;
        node.cost = info.cost;
    }

    /// Recomputes every edge from scratch using the current per-tile costs.
    /// Used by [`crate::HierarchicalMap::tiles_changed`] after one or more
    /// tiles have been updated via [`ConcreteGraph::set_tile`].
    pub(crate) fn rebuild_edges(&mut self) {
        for id in self.graph.ids() {
            self.graph.remove_edges_from(id);
        }
        self.connect_all();
    }
}
