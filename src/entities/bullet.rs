use std::collections::HashSet;

use glam::Vec2;

use super::EnemyId;
use crate::math::{from_angle, normalize_or_zero};
use crate::render::{self, RenderSink};

/// How far past the arena edge a bullet may travel before it is discarded.
pub const OUT_OF_BOUNDS_PADDING: f32 = 80.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BulletOwner {
    Player,
    Enemy,
}

/// A request to create a bullet, queued during an update pass.
#[derive(Clone, Debug, PartialEq)]
pub struct Shot {
    pub pos: Vec2,
    pub angle: f32,
    pub speed: f32,
    pub radius: f32,
    pub damage: f32,
    pub lifetime: f32,
    pub owner: BulletOwner,
    /// Extra distinct targets the bullet may pass through.
    pub pierce: u32,
}

#[derive(Clone, Debug)]
pub struct Bullet {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub damage: f32,
    pub lifetime: f32,
    pub age: f32,
    pub owner: BulletOwner,
    pub dead: bool,
    remaining_hits: u32,
    hit_targets: HashSet<EnemyId>,
}

impl Bullet {
    pub fn from_shot(shot: &Shot) -> Self {
        Self {
            pos: shot.pos,
            vel: from_angle(shot.angle, shot.speed),
            radius: shot.radius,
            damage: shot.damage,
            lifetime: shot.lifetime,
            age: 0.0,
            owner: shot.owner,
            dead: false,
            remaining_hits: 1 + shot.pierce,
            hit_targets: HashSet::new(),
        }
    }

    pub fn update(&mut self, dt: f32) {
        if self.dead {
            return;
        }
        self.age += dt;
        if self.age >= self.lifetime {
            self.dead = true;
            return;
        }
        self.pos += self.vel * dt;
    }

    /// Record a hit on `target`. Returns `false` (and changes nothing) if this
    /// bullet already hit that target; kills the bullet once its hit budget
    /// is spent.
    pub fn register_hit(&mut self, target: EnemyId) -> bool {
        if self.dead || !self.hit_targets.insert(target) {
            return false;
        }
        self.remaining_hits = self.remaining_hits.saturating_sub(1);
        if self.remaining_hits == 0 {
            self.dead = true;
        }
        true
    }

    pub fn has_hit(&self, target: EnemyId) -> bool {
        self.hit_targets.contains(&target)
    }

    pub fn remaining_hits(&self) -> u32 {
        self.remaining_hits
    }

    pub fn is_out_of_bounds(&self, arena: Vec2, padding: f32) -> bool {
        self.pos.x < -padding
            || self.pos.y < -padding
            || self.pos.x > arena.x + padding
            || self.pos.y > arena.y + padding
    }

    pub fn render(&self, sink: &mut dyn RenderSink) {
        if self.dead {
            return;
        }
        let (tail_len, color) = match self.owner {
            BulletOwner::Player => (30.0, render::PLAYER),
            BulletOwner::Enemy => (20.0, render::ENEMY_BULLET),
        };
        let tail = self.pos - normalize_or_zero(self.vel) * tail_len;
        sink.line(tail, self.pos, color.dim(0.6));
        sink.fill_circle(self.pos, self.radius, color);
    }
}
