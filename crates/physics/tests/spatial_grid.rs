use physics::collision::{SpatialGrid, MAX_GRID_CELLS};
use physics::{BoundingBox, Particle, ParticleId, Vec2};

fn particle(index: u64, x: f32, y: f32) -> Particle {
    Particle {
        id: ParticleId(index),
        kind: 0,
        pos: Vec2::new(x, y),
        vel: Vec2::ZERO,
        radius: 5.0,
        mass: 1.0,
        alive: true,
        has_collided: false,
    }
}

fn grid() -> SpatialGrid {
    SpatialGrid::new(
        20.0,
        BoundingBox {
            min: Vec2::ZERO,
            max: Vec2::new(200.0, 200.0),
        },
    )
    .expect("small grid")
}

#[test]
fn test_spatial_grid_basic() {
    let mut grid = grid();
    let particles = vec![
        particle(0, 50.0, 50.0),
        particle(1, 58.0, 50.0),
        particle(2, 180.0, 180.0),
    ];
    grid.update(&particles);

    let pairs = grid.potential_pairs();
    assert!(pairs.contains(&(0, 1)), "close particles should pair up");
    assert!(
        !pairs.iter().any(|&(i, j)| i == 2 || j == 2),
        "far particle should not pair"
    );
}

#[test]
fn out_of_bounds_particles_land_in_border_cells() {
    let mut grid = grid();
    let particles = vec![particle(0, -30.0, -30.0), particle(1, -28.0, -31.0)];
    grid.update(&particles);
    assert_eq!(grid.potential_pairs(), vec![(0, 1)]);
}

#[test]
fn dead_particles_are_skipped() {
    let mut grid = grid();
    let mut particles = vec![particle(0, 50.0, 50.0), particle(1, 52.0, 50.0)];
    particles[1].alive = false;
    grid.update(&particles);
    assert!(grid.potential_pairs().is_empty());
    let stats = grid.stats();
    assert_eq!(stats.total_entries, 1);
    assert_eq!(stats.occupied_cells, 1);
}

#[test]
fn oversized_grid_is_rejected() {
    let huge = BoundingBox {
        min: Vec2::ZERO,
        max: Vec2::new(1e15, 1e15),
    };
    assert!(SpatialGrid::new(20.0, huge).is_err());

    let side = 20.0 * (MAX_GRID_CELLS as f32).sqrt();
    let limit = BoundingBox {
        min: Vec2::ZERO,
        max: Vec2::new(side, side),
    };
    assert_eq!(SpatialGrid::new(20.0, limit).map(|g| g.cells.len()).ok(), Some(MAX_GRID_CELLS));

    let nan = BoundingBox {
        min: Vec2::ZERO,
        max: Vec2::new(f32::NAN, 10.0),
    };
    assert!(SpatialGrid::new(20.0, nan).is_err());
}
