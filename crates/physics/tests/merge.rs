use physics::{Fruit, FruitTable, PhysicsSim, Vec2, World, WorldParams};

fn weightless() -> WorldParams {
    WorldParams {
        gravity: Vec2::ZERO,
        ..WorldParams::default()
    }
}

fn fruits() -> FruitTable {
    FruitTable::new(vec![
        Fruit { radius: 10.0, points: 1.0 },
        Fruit { radius: 14.0, points: 3.0 },
        Fruit { radius: 20.0, points: 6.0 },
    ])
}

#[test]
fn equal_tiers_merge_into_next_tier() -> anyhow::Result<()> {
    let mut sim = PhysicsSim::new(weightless(), fruits())?;
    let a = sim.add_particle(Vec2::new(100.0, 100.0), 0)?;
    let b = sim.add_particle(Vec2::new(115.0, 100.0), 0)?;

    let delta = sim.advance(1.0 / 60.0);
    assert_eq!(delta.merges, 1);
    assert!((delta.points - 3.0).abs() < f32::EPSILON);

    let live = sim.live_particles();
    assert_eq!(live.len(), 1);
    let merged = live[0];
    assert_eq!(merged.kind, 1);
    assert_eq!(merged.radius, 14.0);
    assert!(merged.has_collided);
    assert!(merged.id != a && merged.id != b);
    assert!((merged.position.x - 107.5).abs() < 1e-3);
    Ok(())
}

#[test]
fn different_tiers_only_bounce() -> anyhow::Result<()> {
    let mut sim = PhysicsSim::new(weightless(), fruits())?;
    sim.add_particle(Vec2::new(100.0, 100.0), 0)?;
    sim.add_particle(Vec2::new(120.0, 100.0), 1)?;

    let delta = sim.run(1.0 / 60.0, 30);
    assert_eq!(delta.merges, 0);

    let live = sim.live_particles();
    assert_eq!(live.len(), 2);
    assert!(live.iter().all(|p| p.has_collided));
    let gap = (live[1].position - live[0].position).length();
    assert!(gap > 23.0, "overlap should be corrected, gap={gap}");
    Ok(())
}

#[test]
fn top_tier_never_merges() -> anyhow::Result<()> {
    let mut sim = PhysicsSim::new(weightless(), fruits())?;
    sim.add_particle(Vec2::new(100.0, 100.0), 2)?;
    sim.add_particle(Vec2::new(130.0, 100.0), 2)?;

    let delta = sim.run(1.0 / 60.0, 10);
    assert_eq!(delta, physics::ScoreDelta::default());
    assert_eq!(sim.live_particles().len(), 2);
    Ok(())
}

#[test]
fn merges_chain_across_steps() -> anyhow::Result<()> {
    let mut sim = PhysicsSim::new(weightless(), fruits())?;
    sim.add_particle(Vec2::new(100.0, 100.0), 0)?;
    sim.add_particle(Vec2::new(115.0, 100.0), 0)?;
    // waiting tier-1 neighbour touching the merge point
    sim.add_particle(Vec2::new(107.5, 125.0), 1)?;

    let delta = sim.run(1.0 / 60.0, 5);
    assert_eq!(delta.merges, 2);
    assert!((delta.points - 9.0).abs() < 1e-5);

    let live = sim.live_particles();
    assert_eq!(live.len(), 1);
    assert_eq!(live[0].kind, 2);
    Ok(())
}
