#![allow(dead_code)]

use std::cell::Cell;

use physics::{
    FruitTable, ParticleId, ParticleView, PhysicsError, ScoreDelta, Segment, Vec2, World,
    WorldParams,
};
use suika::{ActionSpace, GameConfig, SuikaEnv};

/// What every advance of a [`ScriptedWorld`] does.
#[derive(Clone, Copy, Debug, Default)]
pub struct Script {
    /// Teleport every particle to this height and mark it as touched.
    pub rest_y: Option<f32>,
    pub points_per_advance: f32,
}

thread_local! {
    static SCRIPT: Cell<Script> = Cell::new(Script::default());
    static ADVANCES: Cell<usize> = const { Cell::new(0) };
}

pub fn set_script(script: Script) {
    SCRIPT.with(|s| s.set(script));
}

/// Advances performed by scripted worlds on this thread.
pub fn advances() -> usize {
    ADVANCES.with(Cell::get)
}

/// Deterministic stand-in for the physics engine.
pub struct ScriptedWorld {
    fruits: FruitTable,
    particles: Vec<ParticleView>,
    boundaries: Vec<Segment>,
    script: Script,
    next_id: u64,
}

impl World for ScriptedWorld {
    fn create(_params: WorldParams, fruits: FruitTable) -> Result<Self, PhysicsError> {
        Ok(Self {
            fruits,
            particles: Vec::new(),
            boundaries: Vec::new(),
            script: SCRIPT.with(Cell::get),
            next_id: 0,
        })
    }

    fn add_static_boundary(&mut self, segment: Segment) -> Result<(), PhysicsError> {
        self.boundaries.push(segment);
        Ok(())
    }

    fn add_particle(&mut self, position: Vec2, kind: usize) -> Result<ParticleId, PhysicsError> {
        let radius = self
            .fruits
            .get(kind)
            .ok_or(PhysicsError::UnknownFruit(kind))?
            .radius;
        let id = ParticleId(self.next_id);
        self.next_id += 1;
        self.particles.push(ParticleView {
            id,
            kind,
            position,
            radius,
            alive: true,
            has_collided: false,
        });
        Ok(id)
    }

    fn advance(&mut self, _dt: f32) -> ScoreDelta {
        ADVANCES.with(|a| a.set(a.get() + 1));
        if let Some(y) = self.script.rest_y {
            for p in &mut self.particles {
                p.position.y = y;
                p.has_collided = true;
            }
        }
        ScoreDelta {
            points: self.script.points_per_advance,
            merges: 0,
        }
    }

    fn live_particles(&self) -> Vec<ParticleView> {
        self.particles.clone()
    }
}

pub fn scripted_env(script: Script, space: ActionSpace) -> SuikaEnv<ScriptedWorld> {
    set_script(script);
    SuikaEnv::<ScriptedWorld>::create(GameConfig::default(), space).expect("default config is valid")
}

pub fn view(id: u64, kind: usize, x: f32, y: f32) -> ParticleView {
    ParticleView {
        id: ParticleId(id),
        kind,
        position: Vec2::new(x, y),
        radius: 20.0,
        alive: true,
        has_collided: true,
    }
}
