//! Grid positions and the connectivity rules ([`TileType`]) used to derive
//! neighbours and move costs from them.

use std::fmt;

/// A tile coordinate on the grid. `x` grows to the right, `y` grows downward.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Position {
    /// column, `0 <= x < width`
    pub x: usize,
    /// row, `0 <= y < height`
    pub y: usize,
}

impl Position {
    /// Creates a new [`Position`].
    pub fn new(x: usize, y: usize) -> Self {
        Position { x, y }
    }

    /// The dense row-major id of this tile in a grid of the given `width`:
    /// `id = y * width + x`. Used as the [`crate::ids::ConcreteNodeId`] of
    /// the tile's node in the concrete graph.
    pub fn tile_index(self, width: usize) -> usize {
        self.y * width + self.x
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(usize, usize)> for Position {
    fn from((x, y): (usize, usize)) -> Self {
        Position { x, y }
    }
}

impl From<Position> for (usize, usize) {
    fn from(p: Position) -> Self {
        (p.x, p.y)
    }
}

/// The connectivity and diagonal-cost rule fixed for the lifetime of a map.
///
/// `TileType` is not an injected trait because the concrete graph's edge
/// topology is closed over these four geometric rules rather than an open
/// extension point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TileType {
    /// 4-connected: N, S, E, W only.
    Tile,
    /// 8-connected, diagonal cost approximates `base_cost * sqrt(2)` using
    /// the integer ratio `34 / 24`.
    Octile,
    /// 8-connected, diagonal cost equal to the neighbour's base cost (no
    /// extra penalty for moving diagonally).
    OctileUniform,
    /// N, S, E, W always, plus two diagonals whose side depends on the
    /// parity of `x` (pointy-top, odd-q layout).
    Hex,
}

impl TileType {
    /// Offsets `(dx, dy, is_diagonal)` of the geometric neighbours of a tile
    /// at column `x` under this connectivity rule.
    pub(crate) fn neighbor_offsets(self, x: usize) -> &'static [(isize, isize, bool)] {
        const CARDINAL: [(isize, isize, bool); 4] =
            [(0, -1, false), (0, 1, false), (1, 0, false), (-1, 0, false)];
        const OCTILE: [(isize, isize, bool); 8] = [
            (0, -1, false),
            (0, 1, false),
            (1, 0, false),
            (-1, 0, false),
            (1, -1, true),
            (-1, -1, true),
            (1, 1, true),
            (-1, 1, true),
        ];
        const HEX_EVEN: [(isize, isize, bool); 6] = [
            (0, -1, false),
            (0, 1, false),
            (1, 0, false),
            (-1, 0, false),
            (1, -1, true),
            (-1, -1, true),
        ];
        const HEX_ODD: [(isize, isize, bool); 6] = [
            (0, -1, false),
            (0, 1, false),
            (1, 0, false),
            (-1, 0, false),
            (1, 1, true),
            (-1, 1, true),
        ];
        match self {
            TileType::Tile => &CARDINAL,
            TileType::Octile | TileType::OctileUniform => &OCTILE,
            TileType::Hex => {
                if x % 2 == 0 {
                    &HEX_EVEN
                } else {
                    &HEX_ODD
                }
            }
        }
    }

    /// The move cost of stepping onto a tile with base cost `target_cost`
    /// along an edge that is (`is_diagonal`) or isn't.
    pub(crate) fn edge_cost(self, target_cost: u32, is_diagonal: bool) -> u32 {
        if is_diagonal && self == TileType::Octile {
            (target_cost * 34) / 24
        } else {
            target_cost
        }
    }

    /// An admissible heuristic between two points for this tile type's
    /// metric, scaled to the same integer units as [`TileType::edge_cost`].
    /// Assumes a minimum per-tile cost of 1, same as the reference metric.
    pub fn heuristic(self, from: Position, to: Position) -> u32 {
        let dx = (from.x as isize - to.x as isize).unsigned_abs() as u32;
        let dy = (from.y as isize - to.y as isize).unsigned_abs() as u32;
        match self {
            TileType::Tile => dx + dy,
            // every hex step changes `dx` and `dy` by at most 1 each (the
            // parity-dependent diagonals move both at once), so `dx + dy`
            // overestimates — `max(dx, dy)` is the admissible bound here.
            TileType::Hex | TileType::OctileUniform => dx.max(dy),
            TileType::Octile => {
                // max(dx, dy) + (sqrt(2) - 1) * min(dx, dy), approximated with
                // the same 34/24 ratio `edge_cost` uses for diagonal steps.
                let diag = dx.min(dy);
                let straight = dx.max(dy) - diag;
                straight + (diag * 34) / 24
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tile_index_row_major() {
        let p = Position::new(2, 3);
        assert_eq!(p.tile_index(5), 3 * 5 + 2);
    }

    #[test]
    fn octile_diagonal_cost() {
        assert_eq!(TileType::Octile.edge_cost(24, true), 34);
        assert_eq!(TileType::Octile.edge_cost(24, false), 24);
        assert_eq!(TileType::OctileUniform.edge_cost(24, true), 24);
    }

    #[test]
    fn hex_parity() {
        let even = TileType::Hex.neighbor_offsets(2);
        let odd = TileType::Hex.neighbor_offsets(3);
        assert!(even.contains(&(1, -1, true)));
        assert!(odd.contains(&(1, 1, true)));
    }

    #[test]
    fn heuristic_matches_exact_diagonal() {
        let a = Position::new(0, 0);
        let b = Position::new(7, 7);
        // a pure diagonal of 7 steps costs 7 * 34/24 under Octile
        assert_eq!(TileType::Octile.heuristic(a, b), 7 * 34 / 24);
    }
}
