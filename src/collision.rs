//! Per-frame collision resolution.
//!
//! Plain overlap tests on circles at their end-of-frame positions, squared
//! distances only. Resolution order is fixed:
//!
//! 1. player bullets → enemies
//! 2. enemy bullets → player
//! 3. enemy bodies → player (at most one contact hit per frame)

use glam::Vec2;
use rand::Rng;

use crate::entities::{Bullet, Enemy, EnemyId, Player};
use crate::math::circles_overlap;
use crate::render::{self, Rgb};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitPoint {
    pub pos: Vec2,
    pub color: Rgb,
}

/// Everything the game needs to react to after a resolve pass.
#[derive(Clone, Debug, Default)]
pub struct CollisionResult {
    /// Enemies killed this frame, in the order they died.
    pub kills: Vec<EnemyId>,
    pub enemy_hit: bool,
    pub player_hit: bool,
    pub damage_taken: f32,
    pub hit_points: Vec<HitPoint>,
}

/// Tuning the resolver needs from the player/enemy configs.
#[derive(Clone, Copy, Debug)]
pub struct CollisionRules {
    pub contact_damage_cooldown: f32,
    pub contact_knockback: f32,
}

pub fn resolve<R: Rng + ?Sized>(
    player: &mut Player,
    enemies: &mut [Enemy],
    player_bullets: &mut [Bullet],
    enemy_bullets: &mut [Bullet],
    rules: CollisionRules,
    rng: &mut R,
) -> CollisionResult {
    let mut result = CollisionResult::default();

    for bullet in player_bullets.iter_mut() {
        if bullet.dead {
            continue;
        }
        for enemy in enemies.iter_mut() {
            if enemy.dead || !circles_overlap(bullet.pos, bullet.radius, enemy.pos, enemy.radius) {
                continue;
            }
            if !bullet.register_hit(enemy.id) {
                continue;
            }

            result.enemy_hit = true;
            result.hit_points.push(HitPoint {
                pos: bullet.pos,
                color: render::HIT_ENEMY,
            });

            if enemy.take_damage(bullet.damage) {
                result.kills.push(enemy.id);
            }
            if bullet.dead {
                break;
            }
        }
    }

    for bullet in enemy_bullets.iter_mut() {
        if bullet.dead || !circles_overlap(bullet.pos, bullet.radius, player.pos, player.radius) {
            continue;
        }
        bullet.dead = true;
        if player.take_damage(bullet.damage) {
            result.player_hit = true;
            result.damage_taken += bullet.damage;
            result.hit_points.push(HitPoint {
                pos: player.pos,
                color: render::HIT_PLAYER,
            });
        }
    }

    if player.contact_damage_cooldown <= 0.0 {
        let rammer = enemies
            .iter_mut()
            .find(|e| !e.dead && circles_overlap(e.pos, e.radius, player.pos, player.radius));
        if let Some(enemy) = rammer {
            if player.take_damage(enemy.contact_damage) {
                result.player_hit = true;
                result.damage_taken += enemy.contact_damage;
                result.hit_points.push(HitPoint {
                    pos: player.pos,
                    color: render::HIT_CONTACT,
                });
                player.contact_damage_cooldown = rules.contact_damage_cooldown;
                enemy.apply_knockback(rules.contact_knockback, rng);
            }
        }
    }

    result
}
