use glam::Vec2;

use crate::render::{Rgb, RenderSink};

/// Purely cosmetic spark. Never takes part in collisions.
#[derive(Clone, Debug)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub life: f32,
    pub max_life: f32,
    pub drag: f32,
    pub color: Rgb,
    pub dead: bool,
}

impl Particle {
    pub fn new(pos: Vec2, vel: Vec2, size: f32, life: f32, drag: f32, color: Rgb) -> Self {
        Self {
            pos,
            vel,
            size,
            life,
            max_life: life,
            drag,
            color,
            dead: false,
        }
    }

    pub fn update(&mut self, dt: f32) {
        if self.dead {
            return;
        }
        self.life -= dt;
        if self.life <= 0.0 {
            self.dead = true;
            return;
        }
        self.vel *= (-self.drag * dt).exp();
        self.pos += self.vel * dt;
    }

    pub fn render(&self, sink: &mut dyn RenderSink) {
        if self.dead {
            return;
        }
        let alpha = (self.life / self.max_life).clamp(0.0, 1.0);
        sink.fill_circle(self.pos, self.size, self.color.dim(alpha));
    }
}
