//! Game tuning — one immutable tree of constants.
//!
//! `GameConfig::default()` is the shipped balance. The binary may overlay a
//! JSON file on top of it; any field left out keeps its default.

use std::path::Path;

use anyhow::Context;
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::entities::EnemyKind;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub arena: ArenaConfig,
    pub timing: TimingConfig,
    pub time_control: TimeControlConfig,
    pub player: PlayerConfig,
    pub enemies: EnemyTable,
    pub enemy_bullet: EnemyBulletConfig,
    pub waves: WaveConfig,
    pub particles: ParticleConfig,
    pub camera: CameraConfig,
    pub scoring: ScoringConfig,
    /// Upgrade keys (`"piercing"`, `"time_slow"`, ...) granted at the start of
    /// every run. Unknown keys are skipped with a warning.
    pub starting_upgrades: Vec<String>,
}

impl GameConfig {
    /// Read a JSON override file. Missing sections and fields use defaults.
    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config = serde_json::from_str(&raw)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }
}

// ── Arena & timing ────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    pub width: f32,
    pub height: f32,
}

impl ArenaConfig {
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self { width: 1280.0, height: 720.0 }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Largest real frame step the simulation will accept, in seconds.
    pub max_dt: f32,
    pub wave_clear_delay: f32,
    pub wave_intro_duration: f32,
    pub damage_flash_duration: f32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            max_dt: 0.05,
            wave_clear_delay: 1.2,
            wave_intro_duration: 1.6,
            damage_flash_duration: 0.2,
        }
    }
}

// ── Time dilation ─────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeControlConfig {
    /// Player speeds at or below this count as standing still.
    pub stationary_threshold: f32,
    pub moving_scale: f32,
    pub stationary_scale: f32,
    pub min_stationary_scale: f32,
    pub transition_speed: f32,
    /// Factor applied to the stationary multiplier per "time slow" upgrade.
    pub upgrade_multiplier_step: f32,
}

impl Default for TimeControlConfig {
    fn default() -> Self {
        Self {
            stationary_threshold: 18.0,
            moving_scale: 1.0,
            stationary_scale: 0.05,
            min_stationary_scale: 0.015,
            transition_speed: 9.0,
            upgrade_multiplier_step: 0.82,
        }
    }
}

// ── Player ────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub radius: f32,
    pub max_hp: f32,
    pub acceleration: f32,
    pub friction: f32,
    pub max_speed: f32,
    pub dash_speed: f32,
    pub dash_duration: f32,
    pub dash_cooldown: f32,
    pub dash_invulnerable_time: f32,
    /// Forced invulnerability after any applied hit.
    pub hit_invulnerable_time: f32,
    pub contact_damage_cooldown: f32,
    pub shoot_interval: f32,
    pub bullet_speed: f32,
    pub bullet_damage: f32,
    pub bullet_radius: f32,
    pub bullet_lifetime: f32,
    /// Half-angle between the two rounds of a double shot, in radians.
    pub double_shot_spread: f32,
    pub trail_lifetime: f32,
    pub trail_spawn_interval: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            radius: 16.0,
            max_hp: 120.0,
            acceleration: 2600.0,
            friction: 2200.0,
            max_speed: 380.0,
            dash_speed: 980.0,
            dash_duration: 0.16,
            dash_cooldown: 1.1,
            dash_invulnerable_time: 0.1,
            hit_invulnerable_time: 0.08,
            contact_damage_cooldown: 0.45,
            shoot_interval: 0.15,
            bullet_speed: 760.0,
            bullet_damage: 18.0,
            bullet_radius: 4.0,
            bullet_lifetime: 1.4,
            double_shot_spread: 0.08,
            trail_lifetime: 0.22,
            trail_spawn_interval: 0.018,
        }
    }
}

// ── Enemies ───────────────────────────────────────────────────────────────────

/// Base stats for one enemy kind, before per-wave scaling.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyStats {
    pub radius: f32,
    pub hp: f32,
    pub speed: f32,
    pub score: f32,
    pub contact_damage: f32,
    /// Seconds between attacks; zero for kinds that never shoot.
    pub shoot_interval: f32,
    pub projectile_speed: f32,
    pub desired_range: f32,
    pub burst_count: u32,
    pub burst_delay: f32,
}

impl Default for EnemyStats {
    fn default() -> Self {
        Self {
            radius: 16.0,
            hp: 40.0,
            speed: 120.0,
            score: 100.0,
            contact_damage: 16.0,
            shoot_interval: 0.0,
            projectile_speed: 0.0,
            desired_range: 0.0,
            burst_count: 0,
            burst_delay: 0.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyTable {
    pub chaser: EnemyStats,
    pub fast: EnemyStats,
    pub shooter: EnemyStats,
    pub burst: EnemyStats,
    pub miniboss: EnemyStats,
    /// Fractional growth per wave past the first.
    pub hp_growth_per_wave: f32,
    pub speed_growth_per_wave: f32,
    pub score_growth_per_wave: f32,
    /// Distance outside the arena at which enemies appear.
    pub spawn_padding: f32,
    pub contact_knockback: f32,
    pub knockback_drag: f32,
}

impl EnemyTable {
    pub fn stats(&self, kind: EnemyKind) -> &EnemyStats {
        match kind {
            EnemyKind::Chaser => &self.chaser,
            EnemyKind::Fast => &self.fast,
            EnemyKind::Shooter => &self.shooter,
            EnemyKind::Burst => &self.burst,
            EnemyKind::Miniboss => &self.miniboss,
        }
    }
}

impl Default for EnemyTable {
    fn default() -> Self {
        Self {
            chaser: EnemyStats::default(),
            fast: EnemyStats {
                radius: 12.0,
                hp: 24.0,
                speed: 212.0,
                score: 130.0,
                contact_damage: 14.0,
                ..EnemyStats::default()
            },
            shooter: EnemyStats {
                radius: 18.0,
                hp: 62.0,
                speed: 88.0,
                score: 160.0,
                contact_damage: 18.0,
                shoot_interval: 1.5,
                projectile_speed: 280.0,
                desired_range: 310.0,
                ..EnemyStats::default()
            },
            burst: EnemyStats {
                radius: 20.0,
                hp: 84.0,
                speed: 78.0,
                score: 220.0,
                contact_damage: 20.0,
                shoot_interval: 2.6,
                projectile_speed: 300.0,
                desired_range: 360.0,
                burst_count: 3,
                burst_delay: 0.14,
            },
            miniboss: EnemyStats {
                radius: 34.0,
                hp: 440.0,
                speed: 76.0,
                score: 1600.0,
                contact_damage: 30.0,
                shoot_interval: 1.8,
                projectile_speed: 330.0,
                desired_range: 320.0,
                burst_count: 8,
                burst_delay: 0.0,
            },
            hp_growth_per_wave: 0.06,
            speed_growth_per_wave: 0.016,
            score_growth_per_wave: 0.04,
            spawn_padding: 48.0,
            contact_knockback: 120.0,
            knockback_drag: 6.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyBulletConfig {
    pub radius: f32,
    pub damage: f32,
    pub lifetime: f32,
}

impl Default for EnemyBulletConfig {
    fn default() -> Self {
        Self { radius: 5.0, damage: 18.0, lifetime: 3.0 }
    }
}

// ── Waves ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveConfig {
    pub base_enemy_count: f32,
    pub count_growth: f32,
    pub fast_unlock_wave: u32,
    pub shooter_unlock_wave: u32,
    pub burst_unlock_wave: u32,
    pub miniboss_every: u32,
    pub spawn_interval: f32,
    pub spawn_interval_decay: f32,
    pub min_spawn_interval: f32,
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            base_enemy_count: 5.0,
            count_growth: 1.35,
            fast_unlock_wave: 2,
            shooter_unlock_wave: 3,
            burst_unlock_wave: 5,
            miniboss_every: 4,
            spawn_interval: 0.38,
            spawn_interval_decay: 0.015,
            min_spawn_interval: 0.14,
        }
    }
}

// ── Cosmetics ─────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    pub base_lifetime: f32,
    pub drag: f32,
    pub enemy_death_count: u32,
    pub player_shot_count: u32,
    pub enemy_shot_count: u32,
    pub impact_count: u32,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            base_lifetime: 0.5,
            drag: 5.0,
            enemy_death_count: 24,
            player_shot_count: 2,
            enemy_shot_count: 2,
            impact_count: 6,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub damage_shake: f32,
    pub hit_shake: f32,
    pub kill_shake: f32,
    /// Exponential decay rate of the shake intensity, per second.
    pub shake_damping: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            damage_shake: 8.0,
            hit_shake: 3.0,
            kill_shake: 3.8,
            shake_damping: 12.0,
        }
    }
}

// ── Scoring ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub combo_timeout: f32,
    pub combo_step: f32,
    pub combo_cap: f32,
    /// Reset the combo when the player takes damage.
    pub combo_damage_reset: bool,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            combo_timeout: 2.0,
            combo_step: 0.2,
            combo_cap: 12.0,
            combo_damage_reset: true,
        }
    }
}
