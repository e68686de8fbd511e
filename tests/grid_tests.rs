#![allow(missing_docs)]

use vivarium::simulation::grid::{GridCategory, SpatialGrid};

#[test]
fn test_grid_dimensions() {
    let grid = SpatialGrid::new(1280.0, 720.0, 50.0);
    assert_eq!(grid.width(), 26);
    assert_eq!(grid.height(), 15);
}

#[test]
fn test_point_insert_lands_in_one_cell() {
    let mut grid = SpatialGrid::new(1280.0, 720.0, 50.0);
    grid.insert(GridCategory::Fruit, 0, 75.0, 75.0);

    assert_eq!(grid.fruit_at(1, 1), &[0]);
    assert!(grid.fruit_at(0, 0).is_empty());
    assert!(grid.fruit_at(2, 1).is_empty());
}

#[test]
fn test_out_of_bounds_positions_clamp() {
    let mut grid = SpatialGrid::new(1280.0, 720.0, 50.0);
    grid.insert(GridCategory::Agent, 3, -100.0, 5000.0);
    grid.insert(GridCategory::Poison, 4, 5000.0, -1.0);

    assert_eq!(grid.agents_at(0, 14), &[3]);
    assert_eq!(grid.poison_at(25, 0), &[4]);
}

#[test]
fn test_extent_insert_covers_every_overlapped_cell() {
    let mut grid = SpatialGrid::new(1280.0, 720.0, 50.0);
    // Bounding box spans cells (0..=2, 0..=2).
    grid.insert_extent(GridCategory::Obstacle, 7, 40.0, 40.0, 100.0, 100.0);

    for gy in 0..=2 {
        for gx in 0..=2 {
            assert_eq!(grid.obstacles_at(gx, gy), &[7], "cell ({gx}, {gy})");
        }
    }
    assert!(grid.obstacles_at(3, 0).is_empty());
}

#[test]
fn test_clear_empties_all_categories() {
    let mut grid = SpatialGrid::new(800.0, 600.0, 50.0);
    grid.insert(GridCategory::Fruit, 0, 10.0, 10.0);
    grid.insert(GridCategory::Poison, 1, 10.0, 10.0);
    grid.insert(GridCategory::Agent, 2, 10.0, 10.0);
    grid.insert_extent(GridCategory::Obstacle, 3, 0.0, 0.0, 200.0, 200.0);

    grid.clear();

    assert!(grid.fruit_at(0, 0).is_empty());
    assert!(grid.poison_at(0, 0).is_empty());
    assert!(grid.agents_at(0, 0).is_empty());
    assert!(grid.obstacles_at(0, 0).is_empty());
}

#[test]
fn test_cells_in_range_covers_neighborhood() {
    let grid = SpatialGrid::new(1280.0, 720.0, 50.0);
    let cells: Vec<(usize, usize)> = grid.cells_in_range(100.0, 100.0, 50.0).collect();

    // Center cell (2, 2) plus two rings, clamped inside the grid.
    assert!(cells.contains(&(2, 2)));
    assert!(cells.contains(&(0, 0)));
    assert!(cells.contains(&(4, 4)));
    assert!(!cells.contains(&(5, 2)));
}

#[test]
fn test_cells_in_range_clamps_at_edges() {
    let grid = SpatialGrid::new(800.0, 600.0, 50.0);
    for (gx, gy) in grid.cells_in_range(0.0, 0.0, 200.0) {
        assert!(gx < grid.width());
        assert!(gy < grid.height());
    }
}
