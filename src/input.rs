//! Per-frame input snapshot.
//!
//! Held state (movement keys, fire button, mouse position) is overwritten by
//! the host every frame. Edge events are queued with [`InputState::press`],
//! handed out at most once through the `consume_*` methods, and dropped by
//! [`InputState::end_frame`].

use std::collections::HashSet;

use glam::Vec2;

use crate::math::normalize_or_zero;

/// One-shot input events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Edge {
    Dash,
    Enter,
    Restart,
    Click,
    /// Number key 1–9, stored as its digit.
    Digit(u8),
}

#[derive(Clone, Debug, Default)]
pub struct InputState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub fire_held: bool,
    /// Pointer position in logical arena coordinates.
    pub mouse: Vec2,
    pressed: HashSet<Edge>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, edge: Edge) {
        self.pressed.insert(edge);
    }

    pub fn was_pressed(&self, edge: Edge) -> bool {
        self.pressed.contains(&edge)
    }

    fn consume_any(&mut self, edges: &[Edge]) -> bool {
        let mut hit = false;
        for edge in edges {
            hit |= self.pressed.remove(edge);
        }
        hit
    }

    /// Unit movement direction from the held keys (zero when idle).
    pub fn move_vector(&self) -> Vec2 {
        let x = (self.right as i32 - self.left as i32) as f32;
        let y = (self.down as i32 - self.up as i32) as f32;
        normalize_or_zero(Vec2::new(x, y))
    }

    pub fn consume_dash(&mut self) -> bool {
        self.consume_any(&[Edge::Dash])
    }

    /// Enter or a click starts a run from the menu.
    pub fn consume_start(&mut self) -> bool {
        self.consume_any(&[Edge::Enter, Edge::Click])
    }

    /// R or Enter restarts after a game over.
    pub fn consume_restart(&mut self) -> bool {
        self.consume_any(&[Edge::Restart, Edge::Enter])
    }

    pub fn consume_digit(&mut self, digit: u8) -> bool {
        self.consume_any(&[Edge::Digit(digit)])
    }

    pub fn consume_click(&mut self) -> bool {
        self.consume_any(&[Edge::Click])
    }

    pub fn consume_enter(&mut self) -> bool {
        self.consume_any(&[Edge::Enter])
    }

    pub fn end_frame(&mut self) {
        self.pressed.clear();
    }

    /// Forget everything, e.g. when the host loses focus.
    pub fn clear(&mut self) {
        let mouse = self.mouse;
        *self = Self { mouse, ..Self::default() };
    }
}
