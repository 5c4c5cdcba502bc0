//! Abstract graph builder (C5): coalesces entrance transitions into abstract
//! nodes, links them across cluster borders (inter-edges), and computes the
//! cost of crossing each cluster's interior between its transitions
//! (intra-edges) with a restricted search reusing the C7 primitive.

use std::collections::HashMap;

use crate::cluster::ClusterGrid;
use crate::concrete::ConcreteGraph;
use crate::entrance::Entrance;
use crate::error::HpaError;
use crate::graph::search::dijkstra_search;
use crate::graph::{Graph, GraphId};
use crate::ids::{AbstractNodeId, ConcreteNodeId};
use crate::point::Position;

/// Info stored on every abstract node.
#[derive(Clone, Copy, Debug)]
pub(crate) struct AbstractNode {
    /// which cluster this node lives in
    pub cluster_id: usize,
    /// abstraction level; always `0` until multi-level hierarchies exist
    pub level: u8,
    /// the concrete tile this transition node coalesces to
    pub concrete_node_id: ConcreteNodeId,
    /// the tile's position, cached for fast heuristics without a concrete
    /// graph lookup
    pub position: Position,
}

/// Whether an abstract edge crosses a cluster border or is a cached path
/// through a cluster's interior.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum EdgeKind {
    /// connects two transitions of the same entrance, across the border
    Inter,
    /// connects two transitions of the same cluster, through its interior
    Intra,
}

/// Info stored on every abstract edge.
#[derive(Clone, Copy, Debug)]
pub(crate) struct AbstractEdge {
    /// cost of traversing this edge
    pub cost: u32,
    /// abstraction level this edge belongs to
    pub level: u8,
    /// whether this is a border hop or a cached intra-cluster path
    pub kind: EdgeKind,
}

/// The abstract graph, see the module docs.
#[derive(Clone, Debug)]
pub(crate) struct AbstractGraph {
    graph: Graph<AbstractNodeId, AbstractNode, AbstractEdge>,
    by_concrete: HashMap<(usize, ConcreteNodeId), AbstractNodeId>,
    by_cluster: HashMap<usize, Vec<AbstractNodeId>>,
}

impl AbstractGraph {
    /// Builds the abstract graph from a concrete graph's entrance set.
    pub(crate) fn build(concrete: &ConcreteGraph, clusters: &ClusterGrid, entrances: &[Entrance]) -> Self {
        let mut graph = Graph::with_capacity(entrances.len() * 2);
        let mut by_concrete = HashMap::new();
        let mut by_cluster: HashMap<usize, Vec<AbstractNodeId>> = HashMap::new();

        let mut node_for = |graph: &mut Graph<AbstractNodeId, AbstractNode, AbstractEdge>,
                             by_concrete: &mut HashMap<(usize, ConcreteNodeId), AbstractNodeId>,
                             by_cluster: &mut HashMap<usize, Vec<AbstractNodeId>>,
                             cluster_id: usize,
                             concrete_id: ConcreteNodeId| {
            *by_concrete
                .entry((cluster_id, concrete_id))
                .or_insert_with(|| {
                    let id = graph.add_node(AbstractNode {
                        cluster_id,
                        level: 0,
                        concrete_node_id: concrete_id,
                        position: concrete.node(concrete_id).position,
                    });
                    by_cluster.entry(cluster_id).or_default().push(id);
                    id
                })
        };

        for entrance in entrances {
            let a = node_for(
                &mut graph,
                &mut by_concrete,
                &mut by_cluster,
                entrance.cluster_a,
                entrance.concrete_a,
            );
            let b = node_for(
                &mut graph,
                &mut by_concrete,
                &mut by_cluster,
                entrance.cluster_b,
                entrance.concrete_b,
            );

            let a_to_b = concrete
                .neighbors(entrance.concrete_a)
                .find(|(t, _)| *t == entrance.concrete_b)
                .map(|(_, cost)| cost)
                .unwrap_or(concrete.node(entrance.concrete_b).cost);
            let b_to_a = concrete
                .neighbors(entrance.concrete_b)
                .find(|(t, _)| *t == entrance.concrete_a)
                .map(|(_, cost)| cost)
                .unwrap_or(concrete.node(entrance.concrete_a).cost);

            graph.add_edge(
                a,
                b,
                AbstractEdge {
                    cost: a_to_b,
                    level: 0,
                    kind: EdgeKind::Inter,
                },
            );
            graph.add_edge(
                b,
                a,
                AbstractEdge {
                    cost: b_to_a,
                    level: 0,
                    kind: EdgeKind::Inter,
                },
            );
        }

        let mut abstract_graph = AbstractGraph {
            graph,
            by_concrete,
            by_cluster,
        };
        abstract_graph.build_intra_edges(concrete, clusters);
        abstract_graph
    }

    /// Computes every cluster's intra-edges and adds them. One cluster's
    /// interior is independent of every other's, so with the `parallel`
    /// feature this fans the per-cluster searches out across a rayon pool,
    /// mirroring how the teacher parallelizes per-chunk path building.
    fn build_intra_edges(&mut self, concrete: &ConcreteGraph, clusters: &ClusterGrid) {
        let cluster_ids: Vec<usize> = {
            let mut ids: Vec<usize> = self.by_cluster.keys().copied().collect();
            ids.sort_unstable();
            ids
        };

        #[cfg(feature = "parallel")]
        let edges: Vec<(AbstractNodeId, AbstractNodeId, AbstractEdge)> = {
            use rayon::prelude::*;
            cluster_ids
                .par_iter()
                .flat_map(|&cluster_id| self.cluster_intra_edges(cluster_id, concrete, clusters))
                .collect()
        };
        #[cfg(not(feature = "parallel"))]
        let edges: Vec<(AbstractNodeId, AbstractNodeId, AbstractEdge)> = cluster_ids
            .iter()
            .flat_map(|&cluster_id| self.cluster_intra_edges(cluster_id, concrete, clusters))
            .collect();

        for (source, target, edge) in edges {
            self.graph.add_edge(source, target, edge);
        }
    }

    fn cluster_intra_edges(
        &self,
        cluster_id: usize,
        concrete: &ConcreteGraph,
        clusters: &ClusterGrid,
    ) -> Vec<(AbstractNodeId, AbstractNodeId, AbstractEdge)> {
        let nodes = &self.by_cluster[&cluster_id];
        if nodes.len() < 2 {
            return Vec::new();
        }
        let cluster = *clusters.cluster(cluster_id);
        let mut out = Vec::new();

        for &source in nodes {
            let source_concrete = self.graph[source].concrete_node_id;
            let goal_concretes: Vec<ConcreteNodeId> = nodes
                .iter()
                .filter(|&&n| n != source)
                .map(|&n| self.graph[n].concrete_node_id)
                .collect();
            if goal_concretes.is_empty() {
                continue;
            }

            let found = dijkstra_search(
                |id| restricted_neighbors(concrete, cluster, id),
                |id| concrete.is_walkable(id),
                source_concrete,
                &goal_concretes,
            );

            for &target in nodes {
                if target == source {
                    continue;
                }
                let target_concrete = self.graph[target].concrete_node_id;
                if let Some(path) = found.get(&target_concrete) {
                    out.push((
                        source,
                        target,
                        AbstractEdge {
                            cost: path.cost,
                            level: 0,
                            kind: EdgeKind::Intra,
                        },
                    ));
                }
            }
        }

        out
    }

    /// The abstract node coalesced from `concrete_id` within `cluster_id`,
    /// if any transition was detected there.
    pub(crate) fn node_at(&self, cluster_id: usize, concrete_id: ConcreteNodeId) -> Option<AbstractNodeId> {
        self.by_concrete.get(&(cluster_id, concrete_id)).copied()
    }

    /// All abstract nodes belonging to `cluster_id`.
    pub(crate) fn nodes_in_cluster(&self, cluster_id: usize) -> &[AbstractNodeId] {
        self.by_cluster
            .get(&cluster_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Info of the node at `id`.
    pub(crate) fn node(&self, id: AbstractNodeId) -> &AbstractNode {
        &self.graph[id]
    }

    /// Outgoing edges of `id`, as `(target, cost)` pairs.
    pub(crate) fn neighbors(&self, id: AbstractNodeId) -> impl Iterator<Item = (AbstractNodeId, u32)> + '_ {
        self.graph.edges(id).iter().map(|e| (e.target, e.info.cost))
    }

    /// Number of abstract nodes.
    pub(crate) fn len(&self) -> usize {
        self.graph.len()
    }
    /// `true` if the graph has no abstract nodes.
    pub(crate) fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }

    /// Direct access to the underlying generic graph, for query-time
    /// insertion of temporary start/goal nodes.
    pub(crate) fn graph_mut(&mut self) -> &mut Graph<AbstractNodeId, AbstractNode, AbstractEdge> {
        &mut self.graph
    }

    /// Direct read access to the underlying generic graph.
    pub(crate) fn graph(&self) -> &Graph<AbstractNodeId, AbstractNode, AbstractEdge> {
        &self.graph
    }

    /// The kind of the edge from `u` to `v`, if one exists.
    pub(crate) fn edge_kind(&self, u: AbstractNodeId, v: AbstractNodeId) -> Option<EdgeKind> {
        self.graph.edges(u).iter().find(|e| e.target == v).map(|e| e.info.kind)
    }

    /// Checks that every node this graph's lookup tables claim to hold
    /// actually exists in the underlying graph storage, with matching
    /// `cluster_id`/`concrete_node_id`, and that its position is inside the
    /// concrete grid it was built from. A mismatch means `build`'s two
    /// passes (coalescing transitions, then computing intra-edges) produced
    /// inconsistent bookkeeping — a programmer error, not a user-facing one.
    pub(crate) fn validate(&self, concrete: &ConcreteGraph) -> Result<(), HpaError> {
        for (&(cluster_id, concrete_id), &abstract_id) in &self.by_concrete {
            if abstract_id.index() >= self.graph.len() {
                return Err(HpaError::InternalInvariantViolation(format!(
                    "abstract node {abstract_id:?} referenced by cluster {cluster_id} has no backing graph node"
                )));
            }
            let node = self.graph.node_info(abstract_id);
            if node.cluster_id != cluster_id || node.concrete_node_id != concrete_id {
                return Err(HpaError::InternalInvariantViolation(format!(
                    "abstract node {abstract_id:?} does not match its own lookup key (cluster {cluster_id}, concrete {concrete_id:?})"
                )));
            }
            if !concrete.in_bounds(node.position) {
                return Err(HpaError::InternalInvariantViolation(format!(
                    "abstract node {abstract_id:?} position {:?} is outside the concrete grid",
                    node.position
                )));
            }
        }
        Ok(())
    }
}

pub(crate) fn restricted_neighbors(
    concrete: &ConcreteGraph,
    cluster: crate::cluster::Cluster,
    id: ConcreteNodeId,
) -> impl Iterator<Item = (ConcreteNodeId, u32)> + '_ {
    concrete
        .neighbors(id)
        .filter(move |(target, _)| cluster.contains(concrete.node(*target).position))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::concrete::TileInfo;
    use crate::entrance::{detect_entrances, EntranceStyle};
    use crate::point::TileType;

    #[test]
    fn open_grid_links_adjacent_clusters() {
        let concrete = ConcreteGraph::build(8, 8, TileType::Tile, |_| TileInfo {
            passable: true,
            cost: 1,
        });
        let clusters = ClusterGrid::new(8, 8, 4);
        let entrances = detect_entrances(&concrete, &clusters, EntranceStyle::Middle);
        let abstract_graph = AbstractGraph::build(&concrete, &clusters, &entrances);

        // every entrance contributes two coalesced nodes, one per side
        assert_eq!(abstract_graph.len(), entrances.len() * 2);

        // each cluster's transitions should be mutually reachable through
        // its interior (intra edges), since the grid is fully open
        for cluster in clusters.clusters() {
            let nodes = abstract_graph.nodes_in_cluster(cluster.id);
            for &n in nodes {
                let reachable: Vec<_> = abstract_graph.neighbors(n).collect();
                assert!(reachable.len() >= nodes.len().saturating_sub(1));
            }
        }
    }

    #[test]
    fn walled_off_cluster_has_no_intra_edges() {
        // a 4x4 cluster split by an internal wall so its two entrances can't
        // reach each other without leaving the cluster
        let concrete = ConcreteGraph::build(8, 4, TileType::Tile, |p| TileInfo {
            passable: !(p.x == 2 && p.y != 3),
            cost: 1,
        });
        let clusters = ClusterGrid::new(8, 4, 4);
        let entrances = detect_entrances(&concrete, &clusters, EntranceStyle::Middle);
        let abstract_graph = AbstractGraph::build(&concrete, &clusters, &entrances);

        let first_cluster_nodes = abstract_graph.nodes_in_cluster(0);
        if first_cluster_nodes.len() >= 2 {
            let a = first_cluster_nodes[0];
            let b = first_cluster_nodes[1];
            assert!(!abstract_graph.neighbors(a).any(|(t, _)| t == b));
        }
    }
}
