//! The hierarchical pathfinder facade (C6): builds the abstraction once and
//! answers path queries by inserting temporary nodes, searching the abstract
//! graph, refining the result into concrete tiles, and rolling the temporary
//! insertions back unconditionally.

use std::collections::HashMap;

use crate::abstract_graph::{restricted_neighbors, AbstractGraph, AbstractNode, EdgeKind};
use crate::cluster::{Cluster, ClusterGrid};
use crate::concrete::{ConcreteGraph, TileInfo};
use crate::config::HierarchicalMapConfig;
use crate::entrance::detect_entrances;
use crate::error::HpaError;
use crate::graph::search::{a_star_search, dijkstra_search};
use crate::ids::{AbstractNodeId, ConcreteNodeId};
use crate::path::ConcretePath;
use crate::point::{Position, TileType};

/// The hierarchical pathfinder, see the module docs.
#[derive(Clone, Debug)]
pub struct HierarchicalMap {
    concrete: ConcreteGraph,
    clusters: ClusterGrid,
    abstract_graph: AbstractGraph,
    config: HierarchicalMapConfig,
}

impl HierarchicalMap {
    /// Builds the full abstraction (clusters, entrances, abstract graph) for
    /// a concrete grid graph.
    ///
    /// # Errors
    /// Returns [`HpaError::InvalidArgument`] if `config.cluster_size < 2`.
    pub fn build(concrete: ConcreteGraph, config: HierarchicalMapConfig) -> Result<Self, HpaError> {
        if config.cluster_size < 2 {
            return Err(HpaError::InvalidArgument(format!(
                "cluster_size must be at least 2, got {}",
                config.cluster_size
            )));
        }

        let clusters = ClusterGrid::new(concrete.width(), concrete.height(), config.cluster_size);
        let entrances = detect_entrances(&concrete, &clusters, config.entrance_style);

        #[cfg(feature = "logging")]
        log::debug!(
            "built {} clusters, {} entrances for a {}x{} grid",
            clusters.len(),
            entrances.len(),
            concrete.width(),
            concrete.height()
        );

        let abstract_graph = AbstractGraph::build(&concrete, &clusters, &entrances);
        abstract_graph.validate(&concrete)?;

        Ok(HierarchicalMap {
            concrete,
            clusters,
            abstract_graph,
            config,
        })
    }

    /// The configuration this map was built with.
    pub fn config(&self) -> HierarchicalMapConfig {
        self.config
    }

    /// Finds the shortest path from `start` to `goal`, or `None` if `goal`
    /// is unreachable, `start`/`goal` is an obstacle, or either is
    /// out of bounds.
    pub fn find_path(&mut self, start: Position, goal: Position) -> Option<ConcretePath> {
        if !self.concrete.in_bounds(start) || !self.concrete.in_bounds(goal) {
            return None;
        }
        let start_id = self.concrete.node_id(start);
        let goal_id = self.concrete.node_id(goal);
        if !self.concrete.is_walkable(start_id) || !self.concrete.is_walkable(goal_id) {
            return None;
        }
        if start == goal {
            return Some(ConcretePath::new(vec![start], 0));
        }

        let watermark = self.abstract_graph.graph().watermark();
        let start_cluster = *self.clusters.cluster_at(start);
        let goal_cluster = *self.clusters.cluster_at(goal);

        let (goal_abstract, cleanup) = self.insert_backward(goal, goal_cluster);
        let extras = if start_cluster.id == goal_cluster.id {
            vec![(goal_id, goal_abstract)]
        } else {
            Vec::new()
        };
        let start_abstract = self.insert_forward(start, start_cluster, &extras);

        let tile_type = self.concrete.tile_type();
        let abstract_graph = &self.abstract_graph;
        let abstract_path = a_star_search(
            |id| abstract_graph.neighbors(id),
            |_| true,
            start_abstract,
            goal_abstract,
            |id| tile_type.heuristic(abstract_graph.node(id).position, goal),
        );

        let result = abstract_path.map(|found| self.refine(&found.ids, tile_type));

        for (src, dst) in cleanup {
            self.abstract_graph.graph_mut().remove_edge(src, dst);
        }
        self.abstract_graph.graph_mut().truncate_to(watermark);

        result.map(|path| self.apply_a_star_fallback(path, start_id, goal_id))
    }

    /// Finds the shortest path from `start` to every reachable position in
    /// `goals`, sharing a single abstract-graph Dijkstra search.
    pub fn find_paths(&mut self, start: Position, goals: &[Position]) -> HashMap<Position, ConcretePath> {
        let mut out = HashMap::new();
        if !self.concrete.in_bounds(start) {
            return out;
        }
        let start_id = self.concrete.node_id(start);
        if !self.concrete.is_walkable(start_id) {
            return out;
        }

        let watermark = self.abstract_graph.graph().watermark();
        let start_cluster = *self.clusters.cluster_at(start);

        let mut goal_abstracts = Vec::new();
        let mut cleanup = Vec::new();
        for &goal in goals {
            if goal == start {
                out.insert(goal, ConcretePath::new(vec![start], 0));
                continue;
            }
            if !self.concrete.in_bounds(goal) {
                continue;
            }
            let goal_id = self.concrete.node_id(goal);
            if !self.concrete.is_walkable(goal_id) {
                continue;
            }
            let goal_cluster = *self.clusters.cluster_at(goal);
            let (goal_abstract, goal_cleanup) = self.insert_backward(goal, goal_cluster);
            cleanup.extend(goal_cleanup);
            goal_abstracts.push((goal, goal_id, goal_abstract));
        }

        let extras: Vec<(ConcreteNodeId, AbstractNodeId)> = goal_abstracts
            .iter()
            .filter(|(goal, _, _)| self.clusters.cluster_at(*goal).id == start_cluster.id)
            .map(|(_, goal_id, abstract_id)| (*goal_id, *abstract_id))
            .collect();
        let start_abstract = self.insert_forward(start, start_cluster, &extras);

        let tile_type = self.concrete.tile_type();
        let target_ids: Vec<AbstractNodeId> = goal_abstracts.iter().map(|(_, _, id)| *id).collect();
        let abstract_graph = &self.abstract_graph;
        let found = dijkstra_search(
            |id| abstract_graph.neighbors(id),
            |_| true,
            start_abstract,
            &target_ids,
        );

        for (goal, goal_id, goal_abstract) in &goal_abstracts {
            if let Some(path) = found.get(goal_abstract) {
                let refined = self.refine(&path.ids, tile_type);
                let refined = self.apply_a_star_fallback(refined, start_id, *goal_id);
                out.insert(*goal, refined);
            }
        }

        for (src, dst) in cleanup {
            self.abstract_graph.graph_mut().remove_edge(src, dst);
        }
        self.abstract_graph.graph_mut().truncate_to(watermark);

        out
    }

    /// Applies a tile update and re-derives the abstraction: clusters,
    /// entrances, and the abstract graph are fully rebuilt from the updated
    /// concrete graph. Simpler than patching the affected clusters in place,
    /// at the cost of redoing the whole abstraction on every call.
    pub fn tiles_changed(&mut self, positions: &[Position], mut oracle: impl FnMut(Position) -> TileInfo) {
        for &position in positions {
            if !self.concrete.in_bounds(position) {
                continue;
            }
            let id = self.concrete.node_id(position);
            let info = oracle(position);
            self.concrete.set_tile(id, info);
        }
        self.concrete.rebuild_edges();

        self.clusters = ClusterGrid::new(
            self.concrete.width(),
            self.concrete.height(),
            self.config.cluster_size,
        );
        let entrances = detect_entrances(&self.concrete, &self.clusters, self.config.entrance_style);
        self.abstract_graph = AbstractGraph::build(&self.concrete, &self.clusters, &entrances);
    }

    /// A read-only view over the abstract graph, for visualization and
    /// debugging tools kept outside this crate.
    pub fn inspect(&self) -> Inspector<'_> {
        Inspector { map: self }
    }

    fn insert_forward(
        &mut self,
        position: Position,
        cluster: Cluster,
        extras: &[(ConcreteNodeId, AbstractNodeId)],
    ) -> AbstractNodeId {
        let concrete_id = self.concrete.node_id(position);
        let new_id = self.abstract_graph.graph_mut().add_node(AbstractNode {
            cluster_id: cluster.id,
            level: 0,
            concrete_node_id: concrete_id,
            position,
        });

        let existing = self.abstract_graph.nodes_in_cluster(cluster.id);
        let mut target_concretes: Vec<ConcreteNodeId> = existing
            .iter()
            .map(|&id| self.abstract_graph.node(id).concrete_node_id)
            .collect();
        let mut target_abstracts: Vec<AbstractNodeId> = existing.to_vec();
        for &(concrete_id, abstract_id) in extras {
            target_concretes.push(concrete_id);
            target_abstracts.push(abstract_id);
        }
        if target_concretes.is_empty() {
            return new_id;
        }

        let concrete = &self.concrete;
        let found = dijkstra_search(
            |id| restricted_neighbors(concrete, cluster, id),
            |id| concrete.is_walkable(id),
            concrete_id,
            &target_concretes,
        );

        for (&target_concrete, &target_abstract) in target_concretes.iter().zip(target_abstracts.iter()) {
            if let Some(path) = found.get(&target_concrete) {
                self.abstract_graph.graph_mut().add_edge(
                    new_id,
                    target_abstract,
                    crate::abstract_graph::AbstractEdge {
                        cost: path.cost,
                        level: 0,
                        kind: EdgeKind::Intra,
                    },
                );
            }
        }

        new_id
    }

    fn insert_backward(
        &mut self,
        position: Position,
        cluster: Cluster,
    ) -> (AbstractNodeId, Vec<(AbstractNodeId, AbstractNodeId)>) {
        let concrete_id = self.concrete.node_id(position);
        let new_id = self.abstract_graph.graph_mut().add_node(AbstractNode {
            cluster_id: cluster.id,
            level: 0,
            concrete_node_id: concrete_id,
            position,
        });

        let existing = self.abstract_graph.nodes_in_cluster(cluster.id).to_vec();
        let mut cleanup = Vec::new();
        for existing_abstract in existing {
            let existing_concrete = self.abstract_graph.node(existing_abstract).concrete_node_id;
            let concrete = &self.concrete;
            let found = a_star_search(
                |id| restricted_neighbors(concrete, cluster, id),
                |id| concrete.is_walkable(id),
                existing_concrete,
                concrete_id,
                |id| concrete.tile_type().heuristic(concrete.node(id).position, position),
            );
            if let Some(found) = found {
                self.abstract_graph.graph_mut().add_edge(
                    existing_abstract,
                    new_id,
                    crate::abstract_graph::AbstractEdge {
                        cost: found.cost,
                        level: 0,
                        kind: EdgeKind::Intra,
                    },
                );
                cleanup.push((existing_abstract, new_id));
            }
        }

        (new_id, cleanup)
    }

    fn refine(&self, abstract_ids: &[AbstractNodeId], tile_type: TileType) -> ConcretePath {
        let mut tiles = vec![self.abstract_graph.node(abstract_ids[0]).position];
        let mut total_cost = 0u32;

        for pair in abstract_ids.windows(2) {
            let (u, v) = (pair[0], pair[1]);
            let u_node = self.abstract_graph.node(u);
            let v_node = self.abstract_graph.node(v);
            let kind = self
                .abstract_graph
                .edge_kind(u, v)
                .expect("consecutive nodes in a found abstract path are always joined by an edge");

            match kind {
                EdgeKind::Intra => {
                    let cluster = *self.clusters.cluster(u_node.cluster_id);
                    let v_position = v_node.position;
                    let found = a_star_search(
                        |id| restricted_neighbors(&self.concrete, cluster, id),
                        |id| self.concrete.is_walkable(id),
                        u_node.concrete_node_id,
                        v_node.concrete_node_id,
                        |id| tile_type.heuristic(self.concrete.node(id).position, v_position),
                    )
                    .expect(
                        "an abstract intra edge implies concrete connectivity within its cluster",
                    );
                    for &id in &found.ids[1..] {
                        tiles.push(self.concrete.node(id).position);
                    }
                    total_cost += found.cost;
                }
                EdgeKind::Inter => {
                    let step_cost = self
                        .concrete
                        .neighbors(u_node.concrete_node_id)
                        .find(|(t, _)| *t == v_node.concrete_node_id)
                        .map(|(_, cost)| cost)
                        .unwrap_or(0);
                    tiles.push(v_node.position);
                    total_cost += step_cost;
                }
            }
        }

        ConcretePath::new(tiles, total_cost)
    }

    fn apply_a_star_fallback(
        &self,
        path: ConcretePath,
        start_id: ConcreteNodeId,
        goal_id: ConcreteNodeId,
    ) -> ConcretePath {
        if !self.config.a_star_fallback || path.len() >= 2 * self.clusters.cluster_size() {
            return path;
        }
        let tile_type = self.concrete.tile_type();
        let goal_position = self.concrete.node(goal_id).position;
        match a_star_search(
            |id| self.concrete.neighbors(id),
            |id| self.concrete.is_walkable(id),
            start_id,
            goal_id,
            |id| tile_type.heuristic(self.concrete.node(id).position, goal_position),
        ) {
            Some(found) => ConcretePath::new(
                found.ids.iter().map(|&id| self.concrete.node(id).position).collect(),
                found.cost,
            ),
            None => path,
        }
    }
}

/// A read-only debug/visualization view over a [`HierarchicalMap`]'s
/// abstract graph.
#[derive(Clone, Copy, Debug)]
pub struct Inspector<'a> {
    map: &'a HierarchicalMap,
}

impl<'a> Inspector<'a> {
    /// Number of clusters in the decomposition.
    pub fn cluster_count(&self) -> usize {
        self.map.clusters.len()
    }

    /// Number of abstract nodes (coalesced transitions).
    pub fn node_count(&self) -> usize {
        self.map.abstract_graph.len()
    }

    /// The abstract nodes belonging to a given cluster, as
    /// `(position, cluster_id)` pairs.
    pub fn nodes_in_cluster(&self, cluster_id: usize) -> Vec<(Position, usize)> {
        self.map
            .abstract_graph
            .nodes_in_cluster(cluster_id)
            .iter()
            .map(|&id| {
                let node = self.map.abstract_graph.node(id);
                (node.position, node.cluster_id)
            })
            .collect()
    }

    /// The outgoing connections of the abstract node at `position` within
    /// `cluster_id`, as `(target_position, cost)` pairs.
    pub fn connections_at(&self, cluster_id: usize, position: Position) -> Vec<(Position, u32)> {
        let concrete_id = self.map.concrete.node_id(position);
        match self.map.abstract_graph.node_at(cluster_id, concrete_id) {
            Some(id) => self
                .map
                .abstract_graph
                .neighbors(id)
                .map(|(target, cost)| (self.map.abstract_graph.node(target).position, cost))
                .collect(),
            None => Vec::new(),
        }
    }
}
