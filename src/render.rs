//! Abstract drawing surface.
//!
//! The simulation never touches a terminal or canvas directly; everything
//! visible goes through a [`RenderSink`]. Coordinates are logical arena units.

use glam::Vec2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Blend toward black; `amount` of 1.0 keeps the colour, 0.0 is black.
    pub fn dim(self, amount: f32) -> Rgb {
        let k = amount.clamp(0.0, 1.0);
        Rgb(
            (self.0 as f32 * k) as u8,
            (self.1 as f32 * k) as u8,
            (self.2 as f32 * k) as u8,
        )
    }
}

// ── Palette ───────────────────────────────────────────────────────────────────

pub const BACKGROUND: Rgb = Rgb(15, 15, 20);
pub const GRID: Rgb = Rgb(0, 60, 70);
pub const PLAYER: Rgb = Rgb(29, 231, 255);
pub const PLAYER_FLASH: Rgb = Rgb(255, 155, 176);
pub const ENEMY: Rgb = Rgb(255, 47, 93);
pub const ENEMY_FLASH: Rgb = Rgb(255, 255, 255);
pub const ENEMY_BULLET: Rgb = Rgb(255, 42, 77);
pub const HIT_ENEMY: Rgb = Rgb(255, 72, 105);
pub const HIT_PLAYER: Rgb = Rgb(255, 122, 146);
pub const HIT_CONTACT: Rgb = Rgb(255, 138, 138);
pub const HUD: Rgb = Rgb(0, 217, 255);
pub const ALERT: Rgb = Rgb(255, 52, 86);
pub const WAVE: Rgb = Rgb(202, 88, 255);
pub const WHITE: Rgb = Rgb(240, 250, 255);
pub const MUTED: Rgb = Rgb(110, 120, 140);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

pub trait RenderSink {
    /// Start a new frame, wiping the surface.
    fn clear(&mut self, background: Rgb);

    /// Offset added to every following primitive; the camera shake lives here.
    fn set_offset(&mut self, offset: Vec2);

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgb);

    fn stroke_circle(&mut self, center: Vec2, radius: f32, color: Rgb);

    /// Regular polygon with `sides` corners, first corner at `rotation`.
    fn polygon(&mut self, center: Vec2, radius: f32, sides: u32, rotation: f32, color: Rgb);

    fn line(&mut self, from: Vec2, to: Vec2, color: Rgb);

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Rgb);

    fn stroke_rect(&mut self, origin: Vec2, size: Vec2, color: Rgb);

    fn text(&mut self, pos: Vec2, text: &str, color: Rgb, align: Align);
}
