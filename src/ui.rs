//! HUD and overlays, plus the upgrade-choice screen.

use glam::Vec2;

use crate::game::GameState;
use crate::input::InputState;
use crate::math::lerp;
use crate::render::{self, Align, RenderSink};
use crate::upgrades::UpgradeId;

const TRANSITION_SPEED: f32 = 10.0;
const COMBO_PULSE_DECAY: f32 = 2.4;

/// Read-only snapshot of what the HUD shows.
#[derive(Clone, Copy, Debug)]
pub struct HudView {
    pub state: GameState,
    pub arena: Vec2,
    pub wave: u32,
    pub intro_ratio: f32,
    /// Current world time scale, 1.0 at full speed.
    pub time_scale: f32,
    pub hp: f32,
    pub max_hp: f32,
    pub high_score: u64,
    pub damage_flash: f32,
}

/// Smoothed score/combo readouts.
#[derive(Clone, Debug)]
pub struct Hud {
    pub display_score: f32,
    pub display_combo: f32,
    pub combo_pulse: f32,
    last_combo: f32,
}

impl Default for Hud {
    fn default() -> Self {
        Self {
            display_score: 0.0,
            display_combo: 1.0,
            combo_pulse: 0.0,
            last_combo: 1.0,
        }
    }
}

impl Hud {
    pub fn update(&mut self, dt: f32, score: f32, combo: f32) {
        let alpha = 1.0 - (-TRANSITION_SPEED * dt).exp();
        self.display_score = lerp(self.display_score, score, alpha);
        self.display_combo = lerp(self.display_combo, combo, alpha);

        if combo > self.last_combo {
            self.combo_pulse = 1.0;
        }
        self.last_combo = combo;
        self.combo_pulse = (self.combo_pulse - dt * COMBO_PULSE_DECAY).max(0.0);
    }

    pub fn render(&self, sink: &mut dyn RenderSink, view: &HudView) {
        match view.state {
            GameState::Menu => self.render_menu(sink, view),
            state => {
                self.render_status(sink, view);
                self.render_wave_banner(sink, view);
                if state == GameState::WaveClear {
                    let c = view.arena * 0.5;
                    sink.text(c, &format!("WAVE {} CLEARED", view.wave), render::WAVE, Align::Center);
                }
                if state == GameState::GameOver {
                    self.render_game_over(sink, view);
                }
            }
        }

        if view.damage_flash > 0.0 {
            sink.stroke_rect(Vec2::ZERO, view.arena, render::ALERT.dim(view.damage_flash * 5.0));
        }
    }

    fn render_status(&self, sink: &mut dyn RenderSink, view: &HudView) {
        let score = format!("SCORE: {}", self.display_score.round() as u64);
        let combo = format!("x{:.1} COMBO", self.display_combo);
        let combo_color = if self.combo_pulse > 0.0 { render::WHITE } else { render::HUD };

        sink.text(Vec2::new(28.0, 36.0), &score, render::HUD, Align::Left);
        sink.text(Vec2::new(28.0, 68.0), &combo, combo_color, Align::Left);
        sink.text(
            Vec2::new(view.arena.x - 28.0, 36.0),
            &format!("WAVE {}", view.wave),
            render::WAVE,
            Align::Right,
        );
        sink.text(
            Vec2::new(view.arena.x - 28.0, 68.0),
            &format!("BEST {}", view.high_score),
            render::MUTED,
            Align::Right,
        );

        let ratio = if view.max_hp > 0.0 { (view.hp / view.max_hp).clamp(0.0, 1.0) } else { 0.0 };
        let origin = Vec2::new(28.0, view.arena.y - 32.0);
        let size = Vec2::new(260.0, 12.0);
        let bar = if ratio < 0.3 { render::ALERT } else { render::HUD };
        sink.stroke_rect(origin, size, render::MUTED);
        sink.fill_rect(origin, Vec2::new(size.x * ratio, size.y), bar);
        sink.text(
            origin + Vec2::new(size.x + 16.0, size.y),
            &format!("HP {}", view.hp.max(0.0).ceil() as u32),
            bar,
            Align::Left,
        );

        let time_color = if view.time_scale < 0.5 { render::WAVE } else { render::MUTED };
        sink.text(
            Vec2::new(view.arena.x - 28.0, view.arena.y - 20.0),
            &format!("TIME {:.2}x", view.time_scale),
            time_color,
            Align::Right,
        );
    }

    fn render_wave_banner(&self, sink: &mut dyn RenderSink, view: &HudView) {
        if view.intro_ratio <= 0.0 {
            return;
        }
        let alpha = (view.intro_ratio * std::f32::consts::PI).sin() * 0.85;
        let pos = Vec2::new(view.arena.x * 0.5, view.arena.y * 0.3);
        sink.text(pos, &format!("WAVE {}", view.wave), render::WAVE.dim(alpha), Align::Center);
    }

    fn render_menu(&self, sink: &mut dyn RenderSink, view: &HudView) {
        let c = view.arena * 0.5;
        sink.text(c - Vec2::new(0.0, 80.0), "S T I L L P O I N T", render::HUD, Align::Center);
        sink.text(c - Vec2::new(0.0, 30.0), "Stand still and time stands still with you.", render::MUTED, Align::Center);
        if view.high_score > 0 {
            sink.text(c, &format!("Best Score: {}", view.high_score), render::WAVE, Align::Center);
        }
        sink.text(c + Vec2::new(0.0, 50.0), "ENTER or CLICK to start", render::WHITE, Align::Center);
        sink.text(
            c + Vec2::new(0.0, 90.0),
            "WASD move  MOUSE aim  CLICK/F fire  SPACE dash  Q quit",
            render::MUTED,
            Align::Center,
        );
    }

    fn render_game_over(&self, sink: &mut dyn RenderSink, view: &HudView) {
        let c = view.arena * 0.5;
        sink.text(c - Vec2::new(0.0, 40.0), "GAME OVER", render::ALERT, Align::Center);
        sink.text(
            c,
            &format!("Final Score: {}", self.display_score.round() as u64),
            render::WHITE,
            Align::Center,
        );
        sink.text(
            c + Vec2::new(0.0, 30.0),
            &format!("High Score: {}", view.high_score),
            render::WAVE,
            Align::Center,
        );
        sink.text(c + Vec2::new(0.0, 70.0), "R / ENTER to play again", render::MUTED, Align::Center);
    }
}

// ── Upgrade screen ────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CardRect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl CardRect {
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.origin.x
            && p.x <= self.origin.x + self.size.x
            && p.y >= self.origin.y
            && p.y <= self.origin.y + self.size.y
    }
}

#[derive(Clone, Debug, Default)]
pub struct UpgradeScreen {
    active: bool,
    choices: Vec<UpgradeId>,
    cards: Vec<CardRect>,
    hovered: Option<usize>,
}

impl UpgradeScreen {
    pub fn open(&mut self, choices: Vec<UpgradeId>, arena: Vec2) {
        self.cards = Self::layout(arena, choices.len());
        self.choices = choices;
        self.hovered = Some(0);
        self.active = true;
    }

    pub fn close(&mut self) {
        *self = Self::default();
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn choices(&self) -> &[UpgradeId] {
        &self.choices
    }

    pub fn cards(&self) -> &[CardRect] {
        &self.cards
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    fn layout(arena: Vec2, count: usize) -> Vec<CardRect> {
        if count == 0 {
            return Vec::new();
        }
        let n = count as f32;
        let width = 340f32.min((arena.x - 140.0) / n);
        let gap = 30.0;
        let total = n * width + (n - 1.0) * gap;
        let start_x = (arena.x - total) * 0.5;
        let y = arena.y - 205.0;
        (0..count)
            .map(|i| CardRect {
                origin: Vec2::new(start_x + i as f32 * (width + gap), y),
                size: Vec2::new(width, 138.0),
            })
            .collect()
    }

    /// Track the hovered card and return the chosen upgrade, if any: digit
    /// keys pick a card directly, a click picks the hovered card, Enter picks
    /// the hovered card or the first one.
    pub fn update(&mut self, input: &mut InputState) -> Option<UpgradeId> {
        if !self.active {
            return None;
        }

        self.hovered = self.cards.iter().position(|c| c.contains(input.mouse));

        for (i, &choice) in self.choices.iter().enumerate().take(9) {
            if input.consume_digit(i as u8 + 1) {
                return Some(choice);
            }
        }

        if input.consume_click() {
            if let Some(i) = self.hovered {
                return self.choices.get(i).copied();
            }
        }

        if input.consume_enter() {
            return self.choices.get(self.hovered.unwrap_or(0)).copied();
        }

        None
    }

    pub fn render(&self, sink: &mut dyn RenderSink, arena: Vec2) {
        if !self.active {
            return;
        }
        sink.text(
            Vec2::new(arena.x * 0.5, arena.y - 250.0),
            "CHOOSE AN UPGRADE",
            render::WAVE,
            Align::Center,
        );
        for (i, (card, id)) in self.cards.iter().zip(&self.choices).enumerate() {
            let info = id.info();
            let hovered = self.hovered == Some(i);
            let frame = if hovered { info.accent } else { info.accent.dim(0.5) };
            sink.stroke_rect(card.origin, card.size, frame);

            let x = card.origin.x + card.size.x * 0.5;
            sink.text(Vec2::new(x, card.origin.y + 30.0), &format!("[{}] {}", i + 1, info.title), info.accent, Align::Center);
            sink.text(Vec2::new(x, card.origin.y + 80.0), info.description, render::WHITE, Align::Center);
        }
    }
}
