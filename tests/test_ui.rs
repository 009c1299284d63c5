use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

use stillpoint::config::GameConfig;
use stillpoint::game::Game;
use stillpoint::input::{Edge, InputState};
use stillpoint::render::{Align, RenderSink, Rgb};
use stillpoint::score::MemoryScoreStore;
use stillpoint::ui::UpgradeScreen;
use stillpoint::upgrades::UpgradeId;

const ARENA: Vec2 = Vec2::new(1280.0, 720.0);

/// Records every primitive together with the offset it was drawn under.
#[derive(Default)]
struct Recorder {
    offset: Vec2,
    ops: Vec<(&'static str, Vec2)>,
    texts: Vec<String>,
}

impl Recorder {
    fn push(&mut self, kind: &'static str) {
        self.ops.push((kind, self.offset));
    }
}

impl RenderSink for Recorder {
    fn clear(&mut self, _background: Rgb) {
        self.ops.clear();
        self.texts.clear();
        self.offset = Vec2::ZERO;
    }

    fn set_offset(&mut self, offset: Vec2) {
        self.offset = offset;
    }

    fn fill_circle(&mut self, _center: Vec2, _radius: f32, _color: Rgb) {
        self.push("fill_circle");
    }

    fn stroke_circle(&mut self, _center: Vec2, _radius: f32, _color: Rgb) {
        self.push("stroke_circle");
    }

    fn polygon(&mut self, _center: Vec2, _radius: f32, _sides: u32, _rotation: f32, _color: Rgb) {
        self.push("polygon");
    }

    fn line(&mut self, _from: Vec2, _to: Vec2, _color: Rgb) {
        self.push("line");
    }

    fn fill_rect(&mut self, _origin: Vec2, _size: Vec2, _color: Rgb) {
        self.push("fill_rect");
    }

    fn stroke_rect(&mut self, _origin: Vec2, _size: Vec2, _color: Rgb) {
        self.push("stroke_rect");
    }

    fn text(&mut self, _pos: Vec2, text: &str, _color: Rgb, _align: Align) {
        self.push("text");
        self.texts.push(text.to_string());
    }
}

fn new_game() -> Game {
    Game::new(
        GameConfig::default(),
        Box::new(MemoryScoreStore::default()),
        StdRng::seed_from_u64(5),
    )
}

// ── Game rendering ────────────────────────────────────────────────────────────

#[test]
fn menu_shows_title_and_prompt() {
    let game = new_game();
    let mut sink = Recorder::default();
    game.render(&mut sink);
    assert!(sink.texts.iter().any(|t| t.contains("S T I L L P O I N T")));
    assert!(sink.texts.iter().any(|t| t.contains("to start")));
    assert!(!sink.ops.iter().any(|(kind, _)| *kind == "fill_circle"), "no player in menu");
}

#[test]
fn shake_moves_world_but_not_hud() {
    let mut game = new_game();
    game.start_run();
    game.add_shake(8.0);
    let mut input = InputState::new();
    game.update(1.0 / 60.0, &mut input);
    let shake = game.shake_offset();
    assert_ne!(shake, Vec2::ZERO);

    let mut sink = Recorder::default();
    game.render(&mut sink);

    // Player body is the first filled circle in the world layer.
    let world = sink.ops.iter().find(|(kind, _)| *kind == "fill_circle");
    assert_eq!(world.map(|&(_, offset)| offset), Some(shake));

    let texts: Vec<_> = sink.ops.iter().filter(|(kind, _)| *kind == "text").collect();
    assert!(!texts.is_empty());
    assert!(texts.iter().all(|(_, offset)| *offset == Vec2::ZERO));
    assert!(sink.texts.iter().any(|t| t.starts_with("SCORE")));
}

#[test]
fn game_over_screen_shows_restart_hint() {
    let mut game = new_game();
    game.start_run();
    game.player_mut().hp = 0.0;
    let mut input = InputState::new();
    game.update(1.0 / 60.0, &mut input);

    let mut sink = Recorder::default();
    game.render(&mut sink);
    assert!(sink.texts.iter().any(|t| t == "GAME OVER"));
    assert!(sink.texts.iter().any(|t| t.contains("play again")));
    assert!(sink.texts.iter().any(|t| t == "High Score: 0"));
}

#[test]
fn status_bar_shows_hp_and_time_scale() {
    let mut game = new_game();
    game.start_run();
    let mut sink = Recorder::default();
    game.render(&mut sink);
    assert!(sink.texts.iter().any(|t| t == "HP 120"));
    assert!(sink.texts.iter().any(|t| t == "TIME 1.00x"));

    let mut input = InputState::new();
    for _ in 0..150 {
        game.update(1.0 / 60.0, &mut input);
    }
    game.player_mut().hp = 57.3;
    game.render(&mut sink);
    assert!(sink.texts.iter().any(|t| t == "HP 58"));
    assert!(sink.texts.iter().any(|t| t == "TIME 0.05x"));
}

// ── Upgrade screen ────────────────────────────────────────────────────────────

fn open_screen() -> UpgradeScreen {
    let mut screen = UpgradeScreen::default();
    screen.open(
        vec![UpgradeId::DoubleShot, UpgradeId::TimeSlow, UpgradeId::BulletSpeed],
        ARENA,
    );
    screen
}

#[test]
fn cards_are_laid_out_side_by_side() {
    let screen = open_screen();
    let cards = screen.cards();
    assert_eq!(cards.len(), 3);
    assert_eq!(cards[0].size, Vec2::new(340.0, 138.0));
    assert_eq!(cards[0].origin.y, 720.0 - 205.0);
    assert_eq!(cards[1].origin.x - cards[0].origin.x, 370.0);
    let total = cards[2].origin.x + cards[2].size.x - cards[0].origin.x;
    assert!((cards[0].origin.x - (1280.0 - total) * 0.5).abs() < 1e-3);
}

#[test]
fn digit_picks_matching_card() {
    let mut screen = open_screen();
    let mut input = InputState::new();
    input.press(Edge::Digit(3));
    assert_eq!(screen.update(&mut input), Some(UpgradeId::BulletSpeed));
}

#[test]
fn out_of_range_digit_is_ignored() {
    let mut screen = open_screen();
    let mut input = InputState::new();
    input.press(Edge::Digit(7));
    assert_eq!(screen.update(&mut input), None);
}

#[test]
fn click_picks_hovered_card() {
    let mut screen = open_screen();
    let mut input = InputState::new();
    let card = screen.cards()[1];
    input.mouse = card.origin + card.size * 0.5;
    input.press(Edge::Click);
    assert_eq!(screen.update(&mut input), Some(UpgradeId::TimeSlow));
    assert_eq!(screen.hovered(), Some(1));
}

#[test]
fn click_outside_cards_does_nothing() {
    let mut screen = open_screen();
    let mut input = InputState::new();
    input.mouse = Vec2::new(5.0, 5.0);
    input.press(Edge::Click);
    assert_eq!(screen.update(&mut input), None);
    assert_eq!(screen.hovered(), None);
}

#[test]
fn enter_defaults_to_first_card() {
    let mut screen = open_screen();
    let mut input = InputState::new();
    input.press(Edge::Enter);
    assert_eq!(screen.update(&mut input), Some(UpgradeId::DoubleShot));
}

#[test]
fn closed_screen_ignores_input() {
    let mut screen = open_screen();
    screen.close();
    assert!(!screen.is_active());
    let mut input = InputState::new();
    input.press(Edge::Digit(1));
    assert_eq!(screen.update(&mut input), None);
    assert!(input.was_pressed(Edge::Digit(1)));
}
