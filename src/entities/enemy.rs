use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use super::Player;
use crate::config::{EnemyStats, EnemyTable};
use crate::math::{angle_to, clamp_to_arena, from_angle, normalize_or_zero};
use crate::render::{self, RenderSink};

/// Identity of one enemy within a run. Never reused inside a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnemyId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EnemyKind {
    Chaser,
    Fast,
    Shooter,
    Burst,
    Miniboss,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 5] = [
        EnemyKind::Chaser,
        EnemyKind::Fast,
        EnemyKind::Shooter,
        EnemyKind::Burst,
        EnemyKind::Miniboss,
    ];

    pub fn name(self) -> &'static str {
        match self {
            EnemyKind::Chaser => "chaser",
            EnemyKind::Fast => "fast",
            EnemyKind::Shooter => "shooter",
            EnemyKind::Burst => "burst",
            EnemyKind::Miniboss => "miniboss",
        }
    }

    fn sides(self) -> u32 {
        match self {
            EnemyKind::Chaser => 3,
            EnemyKind::Shooter => 4,
            EnemyKind::Fast => 5,
            EnemyKind::Burst => 6,
            EnemyKind::Miniboss => 8,
        }
    }
}

/// An enemy bullet request: fired from `origin` (an enemy of `radius`)
/// along `angle`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyShot {
    pub origin: Vec2,
    pub radius: f32,
    pub angle: f32,
    pub speed: f32,
}

/// Variant-specific state. Each arm owns exactly the timers its behaviour
/// needs.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Behavior {
    Chaser,
    Fast { phase: f32 },
    Shooter { shoot_timer: f32, orbit: f32 },
    Burst { shoot_timer: f32, shots_left: u32, delay_timer: f32 },
    Miniboss { shoot_timer: f32, orbit: f32 },
}

const STANDOFF_BAND: f32 = 40.0;
const BURST_ADVANCE_BAND: f32 = 55.0;
const BURST_RETREAT_BAND: f32 = 70.0;
const BURST_SPREAD: f32 = 0.14;
const WOBBLE_FREQUENCY: f32 = 9.0;
const WOBBLE_AMOUNT: f32 = 0.4;

/// Stagger the first attack so a freshly spawned group does not fire in sync.
fn first_shot_delay<R: Rng + ?Sized>(stats: &EnemyStats, rng: &mut R) -> f32 {
    if stats.shoot_interval > 0.0 {
        rng.gen_range(0.25..=stats.shoot_interval.max(0.25))
    } else {
        0.0
    }
}

fn orbit_direction<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    if rng.gen_bool(0.5) {
        -1.0
    } else {
        1.0
    }
}

#[derive(Clone, Debug)]
pub struct Enemy {
    pub id: EnemyId,
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub hp: f32,
    pub max_hp: f32,
    pub speed: f32,
    pub contact_damage: f32,
    pub score_value: u32,
    pub flash: f32,
    pub dead: bool,
    stats: EnemyStats,
    knockback: Vec2,
    knockback_drag: f32,
    behavior: Behavior,
}

impl Enemy {
    /// Build a `kind` enemy scaled for `wave`.
    pub fn new<R: Rng + ?Sized>(
        id: EnemyId,
        kind: EnemyKind,
        pos: Vec2,
        wave: u32,
        table: &EnemyTable,
        rng: &mut R,
    ) -> Self {
        let stats = *table.stats(kind);
        let waves_in = wave.saturating_sub(1) as f32;

        let behavior = match kind {
            EnemyKind::Chaser => Behavior::Chaser,
            EnemyKind::Fast => Behavior::Fast { phase: rng.gen_range(0.0..TAU) },
            EnemyKind::Shooter => Behavior::Shooter {
                shoot_timer: first_shot_delay(&stats, rng),
                orbit: orbit_direction(rng),
            },
            EnemyKind::Burst => Behavior::Burst {
                shoot_timer: first_shot_delay(&stats, rng),
                shots_left: 0,
                delay_timer: 0.0,
            },
            EnemyKind::Miniboss => Behavior::Miniboss {
                shoot_timer: first_shot_delay(&stats, rng),
                orbit: orbit_direction(rng),
            },
        };

        let max_hp = stats.hp * (1.0 + waves_in * table.hp_growth_per_wave);
        Self {
            id,
            kind,
            pos,
            vel: Vec2::ZERO,
            radius: stats.radius,
            hp: max_hp,
            max_hp,
            speed: stats.speed * (1.0 + waves_in * table.speed_growth_per_wave),
            contact_damage: stats.contact_damage,
            score_value: (stats.score * (1.0 + waves_in * table.score_growth_per_wave)).round() as u32,
            flash: 0.0,
            dead: false,
            stats,
            knockback: Vec2::ZERO,
            knockback_drag: table.knockback_drag,
            behavior,
        }
    }

    pub fn update<R: Rng + ?Sized>(
        &mut self,
        dt: f32,
        player: &Player,
        arena: Vec2,
        rng: &mut R,
        shots: &mut Vec<EnemyShot>,
    ) {
        if self.dead {
            return;
        }
        self.flash = (self.flash - dt * 8.0).max(0.0);

        let offset = player.pos - self.pos;
        let dist = offset.length();
        let dir = if dist > 0.0 { offset / dist } else { Vec2::ZERO };
        let perpendicular = Vec2::new(-dir.y, dir.x);
        let aim = angle_to(self.pos, player.pos);
        let stats = self.stats;
        let (origin, radius) = (self.pos, self.radius);
        let shot = |angle: f32| EnemyShot {
            origin,
            radius,
            angle,
            speed: stats.projectile_speed,
        };

        let desired = match &mut self.behavior {
            Behavior::Chaser => dir,

            Behavior::Fast { phase } => {
                *phase += dt;
                let wobble = (*phase * WOBBLE_FREQUENCY).sin() * WOBBLE_AMOUNT;
                dir + perpendicular * wobble
            }

            Behavior::Shooter { shoot_timer, orbit } => {
                *shoot_timer -= dt;
                if *shoot_timer <= 0.0 {
                    *shoot_timer = stats.shoot_interval;
                    shots.push(shot(aim));
                }
                if dist > stats.desired_range + STANDOFF_BAND {
                    dir
                } else if dist < stats.desired_range - STANDOFF_BAND {
                    -dir
                } else {
                    perpendicular * *orbit
                }
            }

            Behavior::Burst { shoot_timer, shots_left, delay_timer } => {
                if *shots_left > 0 {
                    *delay_timer -= dt;
                    if *delay_timer <= 0.0 {
                        *delay_timer = stats.burst_delay;
                        *shots_left -= 1;
                        let spread = rng.gen_range(-BURST_SPREAD..=BURST_SPREAD);
                        shots.push(shot(aim + spread));
                    }
                } else {
                    *shoot_timer -= dt;
                    if *shoot_timer <= 0.0 {
                        *shoot_timer = stats.shoot_interval;
                        *shots_left = stats.burst_count;
                        *delay_timer = 0.0;
                    }
                }
                if dist > stats.desired_range + BURST_ADVANCE_BAND {
                    dir
                } else if dist < stats.desired_range - BURST_RETREAT_BAND {
                    -dir
                } else {
                    Vec2::ZERO
                }
            }

            Behavior::Miniboss { shoot_timer, orbit } => {
                *shoot_timer -= dt;
                if *shoot_timer <= 0.0 {
                    *shoot_timer = stats.shoot_interval;
                    let count = stats.burst_count.max(1);
                    for i in 0..count {
                        let angle = aim + TAU * i as f32 / count as f32;
                        shots.push(shot(angle));
                    }
                }
                if dist > stats.desired_range {
                    dir
                } else {
                    perpendicular * *orbit
                }
            }
        };

        self.knockback *= (-self.knockback_drag * dt).exp();
        self.vel = normalize_or_zero(desired) * self.speed + self.knockback;
        self.pos += self.vel * dt;
        self.pos = clamp_to_arena(self.pos, self.radius, arena);
    }

    /// Shove the enemy in a random direction after it rams the player.
    pub fn apply_knockback<R: Rng + ?Sized>(&mut self, strength: f32, rng: &mut R) {
        self.knockback += from_angle(rng.gen_range(0.0..TAU), strength);
    }

    pub fn knockback(&self) -> Vec2 {
        self.knockback
    }

    /// Returns `true` only on the call that kills the enemy.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        if self.dead {
            return false;
        }
        self.hp -= amount;
        self.flash = 1.0;
        if self.hp <= 0.0 {
            self.dead = true;
            return true;
        }
        false
    }

    pub fn render(&self, sink: &mut dyn RenderSink) {
        if self.dead {
            return;
        }
        let heading = self.vel.y.atan2(self.vel.x);
        let color = if self.flash > 0.0 { render::ENEMY_FLASH } else { render::ENEMY };
        sink.polygon(self.pos, self.radius, self.kind.sides(), heading, color);

        if self.kind == EnemyKind::Miniboss {
            let ratio = (self.hp / self.max_hp).max(0.0);
            let width = self.radius * 2.0;
            let origin = self.pos + Vec2::new(-self.radius, -self.radius - 14.0);
            sink.stroke_rect(origin, Vec2::new(width, 5.0), render::MUTED);
            sink.fill_rect(origin, Vec2::new(width * ratio, 5.0), render::ALERT);
        }
    }
}
