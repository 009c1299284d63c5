//! "Stillness slows time": maps player speed to a smoothed world time-scale.

use crate::config::TimeControlConfig;
use crate::math::{clamp, lerp};

#[derive(Clone, Debug)]
pub struct TimeController {
    cfg: TimeControlConfig,
    scale: f32,
    stationary_multiplier: f32,
}

impl TimeController {
    pub fn new(cfg: TimeControlConfig) -> Self {
        Self {
            scale: cfg.moving_scale,
            stationary_multiplier: 1.0,
            cfg,
        }
    }

    /// Scale the world runs at while the player stands still, after upgrades.
    pub fn stationary_scale(&self) -> f32 {
        clamp(
            self.cfg.stationary_scale * self.stationary_multiplier,
            self.cfg.min_stationary_scale,
            self.cfg.stationary_scale,
        )
    }

    pub fn target_scale(&self, player_speed: f32) -> f32 {
        if player_speed <= self.cfg.stationary_threshold {
            self.stationary_scale()
        } else {
            self.cfg.moving_scale
        }
    }

    /// Ease the scale toward its target with `1 - e^(-k·dt)`, which converges
    /// at the same rate regardless of frame rate.
    pub fn update(&mut self, player_speed: f32, dt: f32) {
        let target = self.target_scale(player_speed);
        let alpha = 1.0 - (-self.cfg.transition_speed * dt).exp();
        self.scale = lerp(self.scale, target, alpha);
    }

    pub fn apply_to_delta(&self, dt: f32) -> f32 {
        dt * self.scale
    }

    pub fn make_stationary_slow_stronger(&mut self) {
        self.stationary_multiplier *= self.cfg.upgrade_multiplier_step;
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn stationary_multiplier(&self) -> f32 {
        self.stationary_multiplier
    }
}
