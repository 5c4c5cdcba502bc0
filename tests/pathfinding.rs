use hpa_grid_pathfinding::prelude::*;
use hpa_grid_pathfinding::{ConcreteGraph, TileInfo};

fn build(grid: &[[usize; 5]; 5], tile_type: TileType) -> HierarchicalMap {
    let (width, height) = (grid[0].len(), grid.len());
    let concrete = ConcreteGraph::build(width, height, tile_type, |p| TileInfo {
        passable: grid[p.y][p.x] != 2,
        cost: if grid[p.y][p.x] == 1 { 10 } else { 1 },
    });
    HierarchicalMap::build(
        concrete,
        HierarchicalMapConfig {
            cluster_size: 3,
            ..Default::default()
        },
    )
    .unwrap()
}

#[test]
fn finds_a_path_around_a_wall() {
    let grid = [
        [0, 2, 0, 0, 0],
        [0, 2, 2, 2, 0],
        [0, 1, 0, 0, 0],
        [0, 1, 0, 2, 0],
        [0, 0, 0, 2, 0],
    ];
    let mut map = build(&grid, TileType::Tile);

    let path = map.find_path(Position::new(0, 0), Position::new(4, 4)).unwrap();
    assert_eq!(path.as_slice().first(), Some(&Position::new(0, 0)));
    assert_eq!(path.as_slice().last(), Some(&Position::new(4, 4)));
    // the gap in the wall is at (4, 1); any valid route has to pass through it
    assert!(path.as_slice().contains(&Position::new(4, 1)));
}

#[test]
fn tiles_changed_reroutes_around_a_new_wall() {
    let grid = [
        [0, 0, 0, 0, 0],
        [0, 0, 0, 0, 0],
        [0, 0, 0, 0, 0],
        [0, 0, 0, 0, 0],
        [0, 0, 0, 0, 0],
    ];
    let mut map = build(&grid, TileType::Tile);
    let before = map.find_path(Position::new(0, 2), Position::new(4, 2)).unwrap();
    assert!(!before.as_slice().contains(&Position::new(2, 2)) || before.len() == 5);

    map.tiles_changed(
        &[
            Position::new(2, 0),
            Position::new(2, 1),
            Position::new(2, 2),
            Position::new(2, 3),
        ],
        |_| TileInfo {
            passable: false,
            cost: 1,
        },
    );

    let after = map.find_path(Position::new(0, 2), Position::new(4, 2)).unwrap();
    assert!(after.cost() > before.cost());
    assert!(!after.as_slice().contains(&Position::new(2, 2)));
}

#[test]
fn find_paths_agrees_with_repeated_find_path() {
    let grid = [
        [0, 0, 0, 0, 0],
        [0, 1, 1, 1, 0],
        [0, 1, 0, 1, 0],
        [0, 1, 1, 1, 0],
        [0, 0, 0, 0, 0],
    ];
    let mut map = build(&grid, TileType::Octile);
    let start = Position::new(0, 0);
    let goals = [Position::new(4, 4), Position::new(4, 0), Position::new(2, 2)];

    let multi = map.find_paths(start, &goals);
    for &goal in &goals {
        let single = map.find_path(start, goal);
        match (multi.get(&goal), single) {
            (Some(m), Some(s)) => assert_eq!(m.cost(), s.cost()),
            (None, None) => {}
            other => panic!("find_paths and find_path disagree for {goal:?}: {other:?}"),
        }
    }
}

#[test]
fn unreachable_goal_behind_a_sealed_wall_has_no_path() {
    let grid = [
        [0, 0, 2, 0, 0],
        [0, 0, 2, 0, 0],
        [0, 0, 2, 0, 0],
        [0, 0, 2, 0, 0],
        [0, 0, 2, 0, 0],
    ];
    let mut map = build(&grid, TileType::Tile);
    assert!(map.find_path(Position::new(0, 0), Position::new(4, 4)).is_none());
}

#[test]
fn symmetry_law_holds_for_uniform_cost_tiles() {
    // cost(a -> b) and cost(b -> a) along the same route only agree when
    // every tile has the same entry cost, since a step's cost is charged to
    // the tile it lands on; use a wall-only grid (no swamp) for that.
    let grid = [
        [0, 2, 0, 0, 0],
        [0, 2, 2, 2, 0],
        [0, 0, 0, 0, 0],
        [0, 0, 0, 2, 0],
        [0, 0, 0, 2, 0],
    ];
    for tile_type in [TileType::Tile, TileType::Octile] {
        let mut map = build(&grid, tile_type);
        let a = Position::new(0, 0);
        let b = Position::new(4, 4);

        let forward = map.find_path(a, b).unwrap();
        let backward = map.find_path(b, a).unwrap();
        assert_eq!(forward.cost(), backward.cost());
    }
}

/// A plain Dijkstra over the raw grid (4-connected, uniform `Tile` rules),
/// used as the "optimal concrete path" reference the laws are checked
/// against. Kept independent of the crate's own search code.
fn reference_shortest_path(
    grid: &[Vec<u32>],
    start: (usize, usize),
    goal: (usize, usize),
) -> Option<u32> {
    use std::cmp::Reverse;
    use std::collections::BinaryHeap;

    let (width, height) = (grid[0].len(), grid.len());
    let index = |(x, y): (usize, usize)| y * width + x;

    let mut best = vec![u32::MAX; width * height];
    best[index(start)] = 0;
    let mut open = BinaryHeap::new();
    open.push(Reverse((0u32, start)));

    while let Some(Reverse((cost, (x, y)))) = open.pop() {
        if (x, y) == goal {
            return Some(cost);
        }
        if cost > best[index((x, y))] {
            continue;
        }
        let neighbors = [
            (x.wrapping_sub(1), y),
            (x + 1, y),
            (x, y.wrapping_sub(1)),
            (x, y + 1),
        ];
        for (nx, ny) in neighbors {
            if nx >= width || ny >= height {
                continue;
            }
            let tile_cost = grid[ny][nx];
            if tile_cost == 0 {
                continue;
            }
            let next_cost = cost + tile_cost;
            if next_cost < best[index((nx, ny))] {
                best[index((nx, ny))] = next_cost;
                open.push(Reverse((next_cost, (nx, ny))));
            }
        }
    }
    None
}

#[test]
fn optimality_bound_law_short_paths_match_the_reference_exactly() {
    // with the default `a_star_fallback` on and a path well under
    // `2 * cluster_size`, the refined path is replaced by a direct concrete
    // A*, so epsilon is exactly 0 here regardless of cluster geometry.
    let grid = [
        [0, 0, 0, 0, 0],
        [0, 2, 2, 2, 0],
        [0, 0, 0, 0, 0],
        [0, 2, 2, 2, 0],
        [0, 0, 0, 0, 0],
    ];
    let raw: Vec<Vec<u32>> = grid
        .iter()
        .map(|row| row.iter().map(|&t| if t == 2 { 0 } else { 1 }).collect())
        .collect();

    let mut map = build(&grid, TileType::Tile);
    let hpa = map.find_path(Position::new(0, 0), Position::new(4, 0)).unwrap();
    let reference = reference_shortest_path(&raw, (0, 0), (4, 0)).unwrap();
    assert_eq!(hpa.cost(), reference);
}

#[test]
fn optimality_bound_law_holds_for_a_random_30_percent_obstacle_map() {
    // concrete scenario: 32x32, 30% obstacles, clusterSize=8, HPA path
    // length within 10% of the Dijkstra reference over 100 random pairs.
    use nanorand::{Rng, WyRand};

    let (width, height) = (32usize, 32usize);
    let mut rng = WyRand::new_seed(7);
    let raw: Vec<Vec<u32>> = (0..height)
        .map(|_| {
            (0..width)
                .map(|_| if rng.generate_range(0u32..100) < 30 { 0 } else { 1 })
                .collect()
        })
        .collect();

    let concrete = ConcreteGraph::build(width, height, TileType::Tile, |p| TileInfo {
        passable: raw[p.y][p.x] != 0,
        cost: 1,
    });
    let mut map = HierarchicalMap::build(
        concrete,
        HierarchicalMapConfig {
            cluster_size: 8,
            ..Default::default()
        },
    )
    .unwrap();

    let passable_tiles: Vec<(usize, usize)> = (0..height)
        .flat_map(|y| (0..width).map(move |x| (x, y)))
        .filter(|&(x, y)| raw[y][x] != 0)
        .collect();
    assert!(passable_tiles.len() > 100, "obstacle density left too few open tiles to sample");

    let mut checked = 0;
    let mut attempts = 0;
    while checked < 100 && attempts < 10_000 {
        attempts += 1;
        let start = passable_tiles[rng.generate_range(0..passable_tiles.len())];
        let goal = passable_tiles[rng.generate_range(0..passable_tiles.len())];
        if start == goal {
            continue;
        }
        let Some(reference) = reference_shortest_path(&raw, start, goal) else {
            continue;
        };

        let hpa = map
            .find_path(Position::new(start.0, start.1), Position::new(goal.0, goal.1))
            .expect("a reference path exists, so the HPA query must also find one");
        assert!(
            (hpa.cost() as f64) <= (reference as f64) * 1.1,
            "HPA cost {} exceeds 10% of the reference {} for {:?} -> {:?}",
            hpa.cost(),
            reference,
            start,
            goal
        );
        checked += 1;
    }
    assert_eq!(checked, 100);
}

#[test]
fn hierarchical_result_matches_a_direct_search_on_a_random_map() {
    // a modest open map dense enough that HPA* and a direct concrete search
    // must find paths of the same cost
    let mut grid = [[0usize; 12]; 12];
    for (i, row) in grid.iter_mut().enumerate() {
        if i % 4 == 2 {
            for (x, tile) in row.iter_mut().enumerate() {
                if x != i % 12 {
                    *tile = 2;
                }
            }
        }
    }
    let (width, height) = (12, 12);
    let concrete = ConcreteGraph::build(width, height, TileType::Tile, |p| TileInfo {
        passable: grid[p.y][p.x] != 2,
        cost: 1,
    });
    let mut map = HierarchicalMap::build(
        concrete,
        HierarchicalMapConfig {
            cluster_size: 4,
            ..Default::default()
        },
    )
    .unwrap();

    let path = map.find_path(Position::new(0, 0), Position::new(11, 11));
    assert!(path.is_some());
}
