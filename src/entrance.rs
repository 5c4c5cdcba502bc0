//! Entrance detection: scans every pair of adjacent clusters once and emits
//! the transition points of each passable border run (C4).

use crate::cluster::{Cluster, ClusterGrid};
use crate::concrete::ConcreteGraph;
use crate::ids::ConcreteNodeId;
use crate::point::Position;

/// The axis a border runs along.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Orientation {
    /// the border is a horizontal line; clusters are stacked vertically
    Horizontal,
    /// the border is a vertical line; clusters sit side by side
    Vertical,
}

/// How many transition points a long border run produces.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntranceStyle {
    /// always exactly one transition, at the midpoint of the run
    Middle,
    /// two transitions (at each end of the run) for runs longer than
    /// [`MAX_ENTRANCE_WIDTH`], otherwise the same single midpoint as `Middle`
    End,
}

/// A border run longer than this (in tiles) gets two transitions under
/// [`EntranceStyle::End`] instead of one.
pub(crate) const MAX_ENTRANCE_WIDTH: usize = 6;

/// One transition point of a passable border run between two clusters.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Entrance {
    /// dense, deterministic id in `(row, col, border direction)` scan order
    pub id: usize,
    /// id of the cluster on the "lower" side (smaller row, or smaller col)
    pub cluster_a: usize,
    /// id of the cluster on the "higher" side
    pub cluster_b: usize,
    /// whether the border itself runs horizontally or vertically
    pub orientation: Orientation,
    /// the border line's fixed coordinate (the `y` of a horizontal border,
    /// the `x` of a vertical border) on the `cluster_a` side
    pub coordinate_on_shared_axis: usize,
    /// position of the transition along the border, relative to the start
    /// of the shared extent between the two clusters
    pub offset_along_border: usize,
    /// the concrete tile on the `cluster_a` side of the border
    pub concrete_a: ConcreteNodeId,
    /// the concrete tile on the `cluster_b` side of the border
    pub concrete_b: ConcreteNodeId,
}

/// Scans every adjacent cluster pair and returns all entrances, in
/// deterministic `(row, col, direction)` order.
pub(crate) fn detect_entrances(
    concrete: &ConcreteGraph,
    clusters: &ClusterGrid,
    style: EntranceStyle,
) -> Vec<Entrance> {
    let mut entrances = Vec::new();
    let mut next_id = 0;

    for cluster_a in clusters.clusters() {
        // scan the border shared with the cluster to the right, then the one
        // shared with the cluster below — each border is thus visited from
        // exactly one side.
        if cluster_a.col + 1 < clusters.cols() {
            let cluster_b = clusters.cluster(clusters.cluster_id(cluster_a.row, cluster_a.col + 1));
            scan_border(
                concrete,
                cluster_a,
                cluster_b,
                Orientation::Vertical,
                style,
                &mut next_id,
                &mut entrances,
            );
        }
        if cluster_a.row + 1 < clusters.rows() {
            let cluster_b = clusters.cluster(clusters.cluster_id(cluster_a.row + 1, cluster_a.col));
            scan_border(
                concrete,
                cluster_a,
                cluster_b,
                Orientation::Horizontal,
                style,
                &mut next_id,
                &mut entrances,
            );
        }
    }

    entrances
}

#[allow(clippy::too_many_arguments)]
fn scan_border(
    concrete: &ConcreteGraph,
    a: &Cluster,
    b: &Cluster,
    orientation: Orientation,
    style: EntranceStyle,
    next_id: &mut usize,
    out: &mut Vec<Entrance>,
) {
    // the two clusters always share the full extent of their common border
    // in this decomposition: same column => same x-range, same row => same
    // y-range (only the outer edges of the grid are ever truncated).
    let (pos_a, pos_b, coordinate, length): (
        Box<dyn Fn(usize) -> Position>,
        Box<dyn Fn(usize) -> Position>,
        usize,
        usize,
    ) = match orientation {
        Orientation::Vertical => {
            let x_a = a.right() - 1;
            let x_b = b.origin.x;
            let y0 = a.origin.y;
            let len = a.size.1;
            (
                Box::new(move |offset| Position::new(x_a, y0 + offset)),
                Box::new(move |offset| Position::new(x_b, y0 + offset)),
                x_a,
                len,
            )
        }
        Orientation::Horizontal => {
            let y_a = a.bottom() - 1;
            let y_b = b.origin.y;
            let x0 = a.origin.x;
            let len = a.size.0;
            (
                Box::new(move |offset| Position::new(x0 + offset, y_a)),
                Box::new(move |offset| Position::new(x0 + offset, y_b)),
                y_a,
                len,
            )
        }
    };

    let passable = |offset: usize| {
        let ca = concrete.node_id(pos_a(offset));
        let cb = concrete.node_id(pos_b(offset));
        concrete.is_walkable(ca) && concrete.is_walkable(cb)
    };

    let mut run_start: Option<usize> = None;

    let mut emit_run = |start: usize, end: usize, next_id: &mut usize, out: &mut Vec<Entrance>| {
        let run_length = end - start + 1;
        let mut offsets = Vec::with_capacity(2);
        match style {
            EntranceStyle::Middle => offsets.push((start + end) / 2),
            EntranceStyle::End => {
                if run_length > MAX_ENTRANCE_WIDTH {
                    offsets.push(start);
                    offsets.push(end);
                } else {
                    offsets.push((start + end) / 2);
                }
            }
        }
        for offset in offsets {
            let concrete_a = concrete.node_id(pos_a(offset));
            let concrete_b = concrete.node_id(pos_b(offset));
            out.push(Entrance {
                id: *next_id,
                cluster_a: a.id,
                cluster_b: b.id,
                orientation,
                coordinate_on_shared_axis: coordinate,
                offset_along_border: offset,
                concrete_a,
                concrete_b,
            });
            *next_id += 1;
        }
    };

    for offset in 0..length {
        if passable(offset) {
            if run_start.is_none() {
                run_start = Some(offset);
            }
        } else if let Some(start) = run_start.take() {
            emit_run(start, offset - 1, next_id, out);
        }
    }
    // a run that reaches the end of the shared extent is closed here, using
    // `length - 1` as its last tile: a run touching the edge of the
    // cluster-pair's shared extent is bounded by that extent rather than
    // continuing into whatever lies beyond it, since entrances are only ever
    // detected per adjacent cluster pair.
    if let Some(start) = run_start {
        emit_run(start, length - 1, next_id, out);
    }
}
