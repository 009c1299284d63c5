//! Cosmetic particle effects: muzzle sparks, bullet trails, hits, explosions.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use crate::config::ParticleConfig;
use crate::entities::Particle;
use crate::math::from_angle;
use crate::render::{Rgb, RenderSink};

/// Shape of a radial burst.
#[derive(Clone, Copy, Debug)]
pub struct Burst {
    pub color: Rgb,
    pub count: u32,
    pub speed_min: f32,
    pub speed_max: f32,
    pub life: f32,
    pub size_min: f32,
    pub size_max: f32,
    pub drag: f32,
}

#[derive(Clone, Debug)]
pub struct ParticleSystem {
    cfg: ParticleConfig,
    particles: Vec<Particle>,
}

impl ParticleSystem {
    pub fn new(cfg: ParticleConfig) -> Self {
        Self {
            cfg,
            particles: Vec::new(),
        }
    }

    pub fn reset(&mut self) {
        self.particles.clear();
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// A burst with this system's default lifetime and drag.
    pub fn burst(&self, color: Rgb, count: u32) -> Burst {
        Burst {
            color,
            count,
            speed_min: 60.0,
            speed_max: 260.0,
            life: self.cfg.base_lifetime,
            size_min: 1.5,
            size_max: 4.0,
            drag: self.cfg.drag,
        }
    }

    pub fn spawn_burst<R: Rng + ?Sized>(&mut self, pos: Vec2, burst: Burst, rng: &mut R) {
        for _ in 0..burst.count {
            let angle = rng.gen_range(0.0..TAU);
            let speed = rng.gen_range(burst.speed_min..=burst.speed_max);
            let size = rng.gen_range(burst.size_min..=burst.size_max);
            let life = rng.gen_range(burst.life * 0.65..=burst.life * 1.25);
            self.particles.push(Particle::new(
                pos,
                from_angle(angle, speed),
                size,
                life,
                burst.drag,
                burst.color,
            ));
        }
    }

    /// One short-lived spark trailing something moving at `vel`.
    pub fn spawn_trail<R: Rng + ?Sized>(&mut self, pos: Vec2, vel: Vec2, color: Rgb, rng: &mut R) {
        let jitter = Vec2::new(rng.gen_range(-20.0..=20.0), rng.gen_range(-20.0..=20.0));
        self.particles.push(Particle::new(
            pos,
            vel * 0.05 + jitter,
            rng.gen_range(1.0..=2.2),
            rng.gen_range(0.08..=0.16),
            8.0,
            color,
        ));
    }

    pub fn spawn_impact<R: Rng + ?Sized>(&mut self, pos: Vec2, color: Rgb, rng: &mut R) {
        let burst = Burst {
            speed_min: 40.0,
            speed_max: 180.0,
            life: 0.2,
            size_min: 1.0,
            size_max: 2.6,
            drag: 9.0,
            ..self.burst(color, self.cfg.impact_count)
        };
        self.spawn_burst(pos, burst, rng);
    }

    pub fn update(&mut self, dt: f32) {
        for particle in &mut self.particles {
            particle.update(dt);
        }
        self.particles.retain(|p| !p.dead);
    }

    pub fn render(&self, sink: &mut dyn RenderSink) {
        for particle in &self.particles {
            particle.render(sink);
        }
    }
}
