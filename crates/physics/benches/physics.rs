use criterion::{black_box, criterion_group, criterion_main, Criterion};
use physics::{Fruit, FruitTable, PhysicsSim, Vec2, World, WorldParams};

fn pile(count: usize) -> PhysicsSim {
    let fruits = FruitTable::new(vec![
        Fruit { radius: 17.0, points: 1.0 },
        Fruit { radius: 25.0, points: 3.0 },
        Fruit { radius: 32.0, points: 6.0 },
        Fruit { radius: 38.0, points: 10.0 },
    ]);
    let mut sim = PhysicsSim::new(WorldParams::default(), fruits).expect("valid params");
    sim.add_container(
        Vec2::new(415.0, 150.0),
        Vec2::new(415.0, 700.0),
        Vec2::new(863.0, 700.0),
        Vec2::new(863.0, 150.0),
    )
    .expect("valid container");

    let mut rng_state = 1_u32;
    for i in 0..count {
        // cheap LCG so the bench has no extra dependencies
        rng_state = rng_state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        #[allow(clippy::cast_precision_loss)]
        let x = 450.0 + (rng_state % 380) as f32;
        #[allow(clippy::cast_precision_loss)]
        let y = 650.0 - (i / 8) as f32 * 40.0;
        sim.add_particle(Vec2::new(x, y), i % 4).expect("known tier");
    }
    sim
}

fn bench_pile_step(c: &mut Criterion) {
    let mut sim = pile(60);
    c.bench_function("pile_60_step", |b| {
        b.iter(|| black_box(sim.step(black_box(1.0 / 60.0))));
    });
}

criterion_group!(benches, bench_pile_step);
criterion_main!(benches);
