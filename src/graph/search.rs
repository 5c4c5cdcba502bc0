//! Generic A* and Dijkstra search primitive (C7), shared by every search in
//! this crate: the concrete-grid search, the restricted per-cluster search
//! used while building intra-edges, and the abstract-graph search.
//!
//! Uses a binary-heap open set and integer costs. Ties are broken on lower
//! `f`, then lower `h`, then lower node id, so that search outcomes are
//! deterministic for a given input.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::hash::Hash;

use super::GraphId;
use crate::ids::{IdMap, IdSet};

/// The unit costs are measured in throughout this crate.
pub type Cost = u32;

/// One entry of the open set: ordered by total cost `f` ascending, then by
/// heuristic `h` ascending, then by node id ascending (`Ord` is derived in
/// declaration order, and [`BinaryHeap`] is a max-heap, so entries are
/// wrapped to reverse that into the desired min-heap tie-break).
struct OpenEntry<Id> {
    f: Cost,
    h: Cost,
    id: Id,
}

impl<Id: Eq> PartialEq for OpenEntry<Id> {
    fn eq(&self, other: &Self) -> bool {
        self.f == other.f && self.h == other.h
    }
}
impl<Id: Eq> Eq for OpenEntry<Id> {}

impl<Id: Ord> PartialOrd for OpenEntry<Id> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl<Id: Ord> Ord for OpenEntry<Id> {
    fn cmp(&self, other: &Self) -> Ordering {
        // reversed: BinaryHeap is a max-heap, we want the smallest (f, h, id) on top
        other
            .f
            .cmp(&self.f)
            .then_with(|| other.h.cmp(&self.h))
            .then_with(|| other.id.cmp(&self.id))
    }
}

/// A found path: the sequence of node ids from `start` to `goal` inclusive,
/// and its total cost.
#[derive(Clone, Debug)]
pub struct FoundPath<Id> {
    /// `ids[0] == start`, `ids[ids.len() - 1] == goal`
    pub ids: Vec<Id>,
    /// total cost of the path
    pub cost: Cost,
}

/// Searches a graph for the shortest path from `start` to `goal` using A*.
///
/// ## Arguments
/// - `neighbors` — returns, for a node, every node reachable from it in one
///   hop along with the cost of that hop.
/// - `is_walkable` — a predicate used to skip nodes that shouldn't be
///   expanded (obstacles, or nodes outside a restricted cluster).
/// - `heuristic` — an admissible estimate of the remaining cost to `goal`.
///
/// Returns `None` if `goal` is unreachable from `start`.
pub fn a_star_search<Id, NeighborIter>(
    mut neighbors: impl FnMut(Id) -> NeighborIter,
    mut is_walkable: impl FnMut(Id) -> bool,
    start: Id,
    goal: Id,
    mut heuristic: impl FnMut(Id) -> Cost,
) -> Option<FoundPath<Id>>
where
    Id: GraphId + Hash + Eq + Ord,
    NeighborIter: Iterator<Item = (Id, Cost)>,
{
    if start == goal {
        return Some(FoundPath {
            ids: vec![start],
            cost: 0,
        });
    }

    // node -> (best cost so far, predecessor)
    let mut best: IdMap<Id, (Cost, Id)> = IdMap::default();
    best.insert(start, (0, start));
    // settled nodes, so a stale heap entry (superseded by a cheaper one
    // pushed later) is skipped instead of re-expanded
    let mut closed: IdSet<Id> = IdSet::default();

    let mut open = BinaryHeap::new();
    open.push(OpenEntry {
        f: heuristic(start),
        h: heuristic(start),
        id: start,
    });

    while let Some(OpenEntry { id: current, .. }) = open.pop() {
        if !closed.insert(current) {
            continue;
        }
        if current == goal {
            break;
        }
        let current_cost = best[&current].0;

        for (next, step_cost) in neighbors(current) {
            if !is_walkable(next) && next != goal {
                continue;
            }
            let next_cost = current_cost + step_cost;

            let improved = match best.get(&next) {
                Some(&(prev_cost, _)) => next_cost < prev_cost,
                None => true,
            };
            if improved {
                best.insert(next, (next_cost, current));
                let h = heuristic(next);
                open.push(OpenEntry {
                    f: next_cost + h,
                    h,
                    id: next,
                });
            }
        }
    }

    let &(cost, _) = best.get(&goal)?;
    Some(FoundPath {
        ids: reconstruct(&best, start, goal),
        cost,
    })
}

/// Searches a graph for the shortest paths from `start` to every node in
/// `goals`, using Dijkstra's algorithm. Stops as soon as every goal has been
/// settled, or the open set is exhausted.
///
/// Returns a map from each reachable goal to its path; unreachable goals are
/// simply absent.
pub fn dijkstra_search<Id, NeighborIter>(
    mut neighbors: impl FnMut(Id) -> NeighborIter,
    mut is_walkable: impl FnMut(Id) -> bool,
    start: Id,
    goals: &[Id],
) -> IdMap<Id, FoundPath<Id>>
where
    Id: GraphId + Hash + Eq + Ord,
    NeighborIter: Iterator<Item = (Id, Cost)>,
{
    let mut best: IdMap<Id, (Cost, Id)> = IdMap::default();
    best.insert(start, (0, start));
    let mut closed: IdSet<Id> = IdSet::default();

    let mut open = BinaryHeap::new();
    open.push(OpenEntry {
        f: 0,
        h: 0,
        id: start,
    });

    let mut remaining: IdSetLike<Id> = goals.iter().copied().collect();

    let mut settled = 0usize;
    let goal_count = goals.len();

    while let Some(OpenEntry { id: current, .. }) = open.pop() {
        if !closed.insert(current) {
            continue;
        }
        let current_cost = best[&current].0;

        if remaining.remove(&current) {
            settled += 1;
            if settled == goal_count {
                break;
            }
        }

        for (next, step_cost) in neighbors(current) {
            let is_goal = goals.contains(&next);
            if !is_walkable(next) && !is_goal {
                continue;
            }
            let next_cost = current_cost + step_cost;

            let improved = match best.get(&next) {
                Some(&(prev_cost, _)) => next_cost < prev_cost,
                None => true,
            };
            if improved {
                best.insert(next, (next_cost, current));
                open.push(OpenEntry {
                    f: next_cost,
                    h: 0,
                    id: next,
                });
            }
        }
    }

    let mut out = IdMap::default();
    for &goal in goals {
        if let Some(&(cost, _)) = best.get(&goal) {
            out.insert(
                goal,
                FoundPath {
                    ids: reconstruct(&best, start, goal),
                    cost,
                },
            );
        }
    }
    out
}

fn reconstruct<Id: GraphId + Hash + Eq>(
    best: &IdMap<Id, (Cost, Id)>,
    start: Id,
    goal: Id,
) -> Vec<Id> {
    let mut steps = vec![goal];
    let mut current = goal;
    while current != start {
        current = best[&current].1;
        steps.push(current);
    }
    steps.reverse();
    steps
}

// a plain Vec-backed set is fine here: `goals` is always small (a handful of
// transition nodes or query endpoints), so linear `contains`/`remove` beats
// the overhead of a hashed set.
struct IdSetLike<Id>(Vec<Id>);
impl<Id: PartialEq> IdSetLike<Id> {
    fn remove(&mut self, id: &Id) -> bool {
        if let Some(pos) = self.0.iter().position(|x| x == id) {
            self.0.remove(pos);
            true
        } else {
            false
        }
    }
}
impl<Id> FromIterator<Id> for IdSetLike<Id> {
    fn from_iter<T: IntoIterator<Item = Id>>(iter: T) -> Self {
        IdSetLike(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::ConcreteNodeId;

    fn id(i: u32) -> ConcreteNodeId {
        GraphId::from_index(i as usize)
    }

    // a tiny line graph: 0 -1-> 1 -1-> 2 -1-> 3
    fn line_neighbors(n: ConcreteNodeId) -> std::vec::IntoIter<(ConcreteNodeId, Cost)> {
        let i = n.index() as u32;
        let mut v = vec![];
        if i > 0 {
            v.push((id(i - 1), 1));
        }
        if i < 3 {
            v.push((id(i + 1), 1));
        }
        v.into_iter()
    }

    #[test]
    fn a_star_finds_shortest_path() {
        let path = a_star_search(line_neighbors, |_| true, id(0), id(3), |n| 3 - n.index() as u32)
            .unwrap();
        assert_eq!(path.cost, 3);
        assert_eq!(path.ids, vec![id(0), id(1), id(2), id(3)]);
    }

    #[test]
    fn a_star_same_start_and_goal() {
        let path = a_star_search(line_neighbors, |_| true, id(1), id(1), |_| 0).unwrap();
        assert_eq!(path.cost, 0);
        assert_eq!(path.ids, vec![id(1)]);
    }

    #[test]
    fn a_star_respects_walkability() {
        // blocking node 2 makes 3 unreachable from 0
        let found = a_star_search(line_neighbors, |n| n != id(2), id(0), id(3), |_| 0);
        assert!(found.is_none());
    }

    #[test]
    fn dijkstra_finds_multiple_goals() {
        let found = dijkstra_search(line_neighbors, |_| true, id(0), &[id(2), id(3)]);
        assert_eq!(found[&id(2)].cost, 2);
        assert_eq!(found[&id(3)].cost, 3);
    }
}
