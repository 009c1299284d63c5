use std::f32::consts::PI;

use glam::Vec2;

use super::{BulletOwner, Shot};
use crate::config::PlayerConfig;
use crate::input::InputState;
use crate::math::{angle_to, approach, clamp_to_arena, from_angle};
use crate::render::{self, RenderSink};

/// Ghost left behind while dashing.
#[derive(Clone, Copy, Debug)]
pub struct Afterimage {
    pub pos: Vec2,
    pub angle: f32,
    pub life: f32,
}

#[derive(Clone, Debug)]
pub struct Player {
    cfg: PlayerConfig,

    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub hp: f32,
    pub max_hp: f32,
    pub aim_angle: f32,

    pub shoot_cooldown: f32,
    pub dash_cooldown: f32,
    pub dash_remaining: f32,
    pub invulnerable_timer: f32,
    pub contact_damage_cooldown: f32,
    pub damage_flash: f32,

    pub afterimages: Vec<Afterimage>,
    afterimage_timer: f32,

    // Permanent run upgrades.
    pub double_shot: bool,
    pub piercing_bullets: bool,
    pub dash_cooldown_multiplier: f32,
    pub bullet_speed_multiplier: f32,
    pub combo_amplifier: f32,
}

impl Player {
    pub fn new(pos: Vec2, cfg: PlayerConfig) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            radius: cfg.radius,
            hp: cfg.max_hp,
            max_hp: cfg.max_hp,
            aim_angle: 0.0,
            shoot_cooldown: 0.0,
            dash_cooldown: 0.0,
            dash_remaining: 0.0,
            invulnerable_timer: 0.0,
            contact_damage_cooldown: 0.0,
            damage_flash: 0.0,
            afterimages: Vec::new(),
            afterimage_timer: 0.0,
            double_shot: false,
            piercing_bullets: false,
            dash_cooldown_multiplier: 1.0,
            bullet_speed_multiplier: 1.0,
            combo_amplifier: 1.0,
            cfg,
        }
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.cfg
    }

    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    pub fn is_dashing(&self) -> bool {
        self.dash_remaining > 0.0
    }

    pub fn can_take_damage(&self) -> bool {
        self.invulnerable_timer <= 0.0
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0.0
    }

    /// Advance one frame with undilated `dt`. Shots fired this frame are
    /// pushed onto `shots`.
    pub fn update(&mut self, dt: f32, input: &mut InputState, arena: Vec2, shots: &mut Vec<Shot>) {
        self.shoot_cooldown = (self.shoot_cooldown - dt).max(0.0);
        self.dash_cooldown = (self.dash_cooldown - dt).max(0.0);
        self.invulnerable_timer = (self.invulnerable_timer - dt).max(0.0);
        self.contact_damage_cooldown = (self.contact_damage_cooldown - dt).max(0.0);
        self.damage_flash = (self.damage_flash - dt * 8.0).max(0.0);

        self.aim_angle = angle_to(self.pos, input.mouse);

        let movement = input.move_vector();

        if self.is_dashing() {
            self.dash_remaining = (self.dash_remaining - dt).max(0.0);
        } else {
            self.vel += movement * self.cfg.acceleration * dt;

            if movement.x == 0.0 {
                self.vel.x = approach(self.vel.x, 0.0, self.cfg.friction * dt);
            }
            if movement.y == 0.0 {
                self.vel.y = approach(self.vel.y, 0.0, self.cfg.friction * dt);
            }

            self.vel = self.vel.clamp_length_max(self.cfg.max_speed);

            if input.consume_dash() && self.dash_cooldown <= 0.0 {
                self.start_dash(movement);
            }
        }

        self.update_afterimages(dt);

        self.pos += self.vel * dt;
        self.pos = clamp_to_arena(self.pos, self.radius, arena);

        if input.fire_held && self.shoot_cooldown <= 0.0 {
            self.shoot_cooldown = self.cfg.shoot_interval;
            self.fire(shots);
        }
    }

    fn start_dash(&mut self, movement: Vec2) {
        let direction = if movement == Vec2::ZERO {
            from_angle(self.aim_angle, 1.0)
        } else {
            movement
        };
        self.vel = direction * self.cfg.dash_speed;
        self.dash_remaining = self.cfg.dash_duration;
        self.dash_cooldown = self.cfg.dash_cooldown * self.dash_cooldown_multiplier;
        self.invulnerable_timer = self.cfg.dash_invulnerable_time;
        self.afterimage_timer = 0.0;
    }

    fn update_afterimages(&mut self, dt: f32) {
        if self.is_dashing() {
            self.afterimage_timer -= dt;
            if self.afterimage_timer <= 0.0 {
                self.afterimage_timer = self.cfg.trail_spawn_interval;
                self.afterimages.push(Afterimage {
                    pos: self.pos,
                    angle: self.aim_angle,
                    life: self.cfg.trail_lifetime,
                });
            }
        }
        for ghost in &mut self.afterimages {
            ghost.life -= dt;
        }
        self.afterimages.retain(|g| g.life > 0.0);
    }

    fn fire(&self, shots: &mut Vec<Shot>) {
        let speed = self.cfg.bullet_speed * self.bullet_speed_multiplier;
        let pierce = u32::from(self.piercing_bullets);
        let spread = self.cfg.double_shot_spread;

        let angles = if self.double_shot {
            vec![self.aim_angle - spread, self.aim_angle + spread]
        } else {
            vec![self.aim_angle]
        };

        for angle in angles {
            shots.push(Shot {
                pos: self.pos + from_angle(angle, self.radius + 8.0),
                angle,
                speed,
                radius: self.cfg.bullet_radius,
                damage: self.cfg.bullet_damage,
                lifetime: self.cfg.bullet_lifetime,
                owner: BulletOwner::Player,
                pierce,
            });
        }
    }

    /// Apply `amount` damage unless invulnerable. A landed hit grants a short
    /// invulnerability window so one frame cannot hit twice.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        if !self.can_take_damage() {
            return false;
        }
        self.hp = (self.hp - amount).max(0.0);
        self.damage_flash = 1.0;
        self.invulnerable_timer = self.cfg.hit_invulnerable_time;
        true
    }

    pub fn render(&self, sink: &mut dyn RenderSink) {
        for ghost in &self.afterimages {
            let alpha = ghost.life / self.cfg.trail_lifetime;
            sink.fill_circle(ghost.pos, self.radius * 0.9, render::PLAYER.dim(alpha * 0.42));
        }

        sink.fill_circle(self.pos, self.radius, render::PLAYER);
        let muzzle = self.pos + from_angle(self.aim_angle, self.radius + 10.0);
        sink.line(self.pos + from_angle(self.aim_angle, 4.0), muzzle, render::WHITE);

        if self.damage_flash > 0.0 {
            sink.fill_circle(self.pos, self.radius + 2.0, render::PLAYER_FLASH.dim(self.damage_flash));
        }

        if self.dash_cooldown <= 0.0 {
            let tip = self.pos + from_angle(self.aim_angle + PI, self.radius + 6.0);
            sink.stroke_circle(tip, 3.0, render::PLAYER.dim(0.7));
        }
    }
}
