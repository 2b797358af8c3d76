//! Plain data types shared by the simulation, the collision routines and
//! callers that read the world back.

use std::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub, SubAssign};

/// 2D vector in screen space. `y` grows downwards.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y
    }

    #[must_use]
    pub fn length_squared(self) -> f32 {
        self.dot(self)
    }

    #[must_use]
    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Perpendicular vector (rotated a quarter turn).
    #[must_use]
    pub const fn perp(self) -> Self {
        Self::new(-self.y, self.x)
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vec2 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Vec2 {
    fn sub_assign(&mut self, rhs: Self) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Mul<f32> for Vec2 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl MulAssign<f32> for Vec2 {
    fn mul_assign(&mut self, rhs: f32) {
        self.x *= rhs;
        self.y *= rhs;
    }
}

impl Div<f32> for Vec2 {
    type Output = Self;
    fn div(self, rhs: f32) -> Self {
        Self::new(self.x / rhs, self.y / rhs)
    }
}

impl Neg for Vec2 {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

/// Surface response coefficients.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Material {
    pub restitution: f32,
    pub friction: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            restitution: 0.1,
            friction: 0.5,
        }
    }
}

/// Stable handle to a particle. Never reused within one world.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParticleId(pub u64);

/// A dynamic circular body ("fruit").
#[derive(Copy, Clone, Debug)]
pub struct Particle {
    pub id: ParticleId,
    pub kind: usize,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub mass: f32,
    pub alive: bool,
    /// Set on the first contact with anything, never cleared.
    pub has_collided: bool,
}

impl Particle {
    #[must_use]
    pub fn view(&self) -> ParticleView {
        ParticleView {
            id: self.id,
            kind: self.kind,
            position: self.pos,
            radius: self.radius,
            alive: self.alive,
            has_collided: self.has_collided,
        }
    }
}

/// Read-only snapshot of a particle handed out to callers.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ParticleView {
    pub id: ParticleId,
    pub kind: usize,
    pub position: Vec2,
    pub radius: f32,
    pub alive: bool,
    pub has_collided: bool,
}

/// Static one-sided wall.
///
/// The free side lies to the right of `a -> b` on screen (`y` down), so a
/// container is wound top-left, bottom-left, bottom-right, top-right.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Segment {
    pub a: Vec2,
    pub b: Vec2,
    pub material: Material,
}

impl Segment {
    #[must_use]
    pub fn new(a: Vec2, b: Vec2) -> Self {
        Self {
            a,
            b,
            material: Material::default(),
        }
    }

    /// Unit normal pointing into the free side. Zero for a degenerate
    /// segment.
    #[must_use]
    pub fn inward_normal(&self) -> Vec2 {
        let ab = self.b - self.a;
        let len = ab.length();
        if len <= f32::EPSILON {
            return Vec2::ZERO;
        }
        -ab.perp() / len
    }

    /// Closest point on the segment to `p`.
    #[must_use]
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        let ab = self.b - self.a;
        let len_sq = ab.length_squared();
        if len_sq <= f32::EPSILON {
            return self.a;
        }
        let t = ((p - self.a).dot(ab) / len_sq).clamp(0.0, 1.0);
        self.a + ab * t
    }
}

/// Score and merge count produced by one [`crate::World::advance`] call.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ScoreDelta {
    pub points: f32,
    pub merges: u32,
}

impl AddAssign for ScoreDelta {
    fn add_assign(&mut self, rhs: Self) {
        self.points += rhs.points;
        self.merges += rhs.merges;
    }
}

/// Per-tier fruit description.
#[derive(Clone, Debug, PartialEq)]
pub struct Fruit {
    pub radius: f32,
    pub points: f32,
}

/// Ordered fruit tiers. Tier `k` merges with tier `k` into tier `k + 1`.
#[derive(Clone, Debug, PartialEq)]
pub struct FruitTable {
    fruits: Vec<Fruit>,
}

impl FruitTable {
    #[must_use]
    pub fn new(fruits: Vec<Fruit>) -> Self {
        Self { fruits }
    }

    #[must_use]
    pub fn get(&self, kind: usize) -> Option<&Fruit> {
        self.fruits.get(kind)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fruits.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fruits.is_empty()
    }

    /// Tier produced by merging two particles of `kind`, if any.
    #[must_use]
    pub fn merged(&self, kind: usize) -> Option<usize> {
        let next = kind + 1;
        (next < self.fruits.len()).then_some(next)
    }
}

/// World-wide simulation parameters.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct WorldParams {
    /// Downward acceleration in px/s².
    pub gravity: Vec2,
    /// Fraction of velocity kept after one second.
    pub damping: f32,
    /// Fraction of overlap left unresolved after one second.
    pub bias: f32,
    pub material: Material,
    /// Contact solver passes per advance.
    pub iterations: u32,
    /// Size of the simulated area, used to lay out the broad phase.
    pub extent: Vec2,
}

impl Default for WorldParams {
    fn default() -> Self {
        Self {
            gravity: Vec2::new(0.0, 2000.0),
            damping: 0.8,
            bias: 0.001,
            material: Material::default(),
            iterations: 4,
            extent: Vec2::new(1280.0, 720.0),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BoundingBox {
    pub min: Vec2,
    pub max: Vec2,
}
