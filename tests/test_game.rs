use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

use stillpoint::config::GameConfig;
use stillpoint::entities::{Bullet, BulletOwner, Enemy, EnemyId, EnemyKind, Shot};
use stillpoint::game::{Game, GameState, UPGRADE_CHOICES};
use stillpoint::input::{Edge, InputState};
use stillpoint::score::{FileScoreStore, HighScoreStore, MemoryScoreStore};
use stillpoint::upgrades::UpgradeId;

const DT: f32 = 1.0 / 60.0;

fn new_game() -> Game {
    Game::new(
        GameConfig::default(),
        Box::new(MemoryScoreStore::default()),
        StdRng::seed_from_u64(1),
    )
}

fn started_game() -> Game {
    let mut game = new_game();
    game.start_run();
    game
}

fn chaser() -> Enemy {
    let cfg = GameConfig::default();
    Enemy::new(
        EnemyId(999),
        EnemyKind::Chaser,
        Vec2::ZERO,
        1,
        &cfg.enemies,
        &mut StdRng::seed_from_u64(0),
    )
}

fn enemy_bullet_at(pos: Vec2) -> Bullet {
    Bullet::from_shot(&Shot {
        pos,
        angle: 0.0,
        speed: 0.0,
        radius: 5.0,
        damage: 18.0,
        lifetime: 3.0,
        owner: BulletOwner::Enemy,
        pierce: 0,
    })
}

/// Hold "right" so the world runs at full speed, and kill every enemy as
/// soon as it appears, until the wave is cleared.
fn clear_current_wave(game: &mut Game, input: &mut InputState) {
    input.right = true;
    for _ in 0..2000 {
        game.update(0.05, input);
        input.end_frame();
        for enemy in game.enemies_mut().enemies_mut() {
            enemy.take_damage(10_000.0);
        }
        if game.state() != GameState::Playing {
            break;
        }
    }
    input.right = false;
    assert_eq!(game.state(), GameState::WaveClear);
}

fn reach_upgrade_screen(game: &mut Game, input: &mut InputState) {
    clear_current_wave(game, input);
    for _ in 0..100 {
        game.update(0.05, input);
        if game.state() == GameState::Upgrade {
            return;
        }
    }
    panic!("upgrade screen never opened");
}

// ── Menu & start ──────────────────────────────────────────────────────────────

#[test]
fn starts_in_menu() {
    let game = new_game();
    assert_eq!(game.state(), GameState::Menu);
    assert_eq!(game.score(), 0.0);
    assert_eq!(game.combo(), 1.0);
}

#[test]
fn enter_starts_wave_one() {
    let mut game = new_game();
    let mut input = InputState::new();
    game.update(DT, &mut input);
    assert_eq!(game.state(), GameState::Menu);

    input.press(Edge::Enter);
    game.update(DT, &mut input);
    assert_eq!(game.state(), GameState::Playing);
    assert_eq!(game.waves().current_wave(), 1);
    assert_eq!(game.player().hp, 120.0);
}

#[test]
fn click_also_starts() {
    let mut game = new_game();
    let mut input = InputState::new();
    input.press(Edge::Click);
    game.update(DT, &mut input);
    assert_eq!(game.state(), GameState::Playing);
}

#[test]
fn high_score_is_loaded_on_creation() {
    let game = Game::new(
        GameConfig::default(),
        Box::new(MemoryScoreStore { best: 777, saves: 0 }),
        StdRng::seed_from_u64(1),
    );
    assert_eq!(game.high_score(), 777);
}

// ── Time dilation in play ─────────────────────────────────────────────────────

#[test]
fn standing_still_slows_the_world() {
    let mut game = started_game();
    let mut input = InputState::new();
    for _ in 0..150 {
        game.update(DT, &mut input);
    }
    assert!(game.time().scale() < 0.06);

    input.right = true;
    for _ in 0..60 {
        game.update(DT, &mut input);
    }
    assert!(game.time().scale() > 0.95);
}

#[test]
fn player_bullets_ignore_dilation_but_enemy_bullets_do_not() {
    let mut game = started_game();
    let mut input = InputState::new();
    for _ in 0..150 {
        game.update(DT, &mut input);
    }
    let scale = game.time().scale();
    assert!(scale < 0.06);

    input.mouse = Vec2::new(1200.0, 360.0);
    input.fire_held = true;
    game.update(DT, &mut input);
    input.fire_held = false;
    game.update(DT, &mut input);
    assert_eq!(game.player_bullets().len(), 1);

    game.enemy_bullets_mut().push(enemy_bullet_at(Vec2::new(100.0, 100.0)));
    let player_age = game.player_bullets()[0].age;
    game.update(DT, &mut input);

    let player_step = game.player_bullets()[0].age - player_age;
    assert!((player_step - DT).abs() < 1e-6, "player bullet aged {player_step}");
    let enemy_step = game.enemy_bullets()[0].age;
    assert!(enemy_step > DT * 0.04 && enemy_step < DT * 0.06, "enemy bullet aged {enemy_step}");
}

// ── Combo & score ─────────────────────────────────────────────────────────────

#[test]
fn combo_grows_per_kill() {
    let mut game = started_game();
    let enemy = chaser();

    game.register_kill(&enemy);
    assert_eq!(game.score(), 100.0);
    assert!((game.combo() - 1.2).abs() < 1e-5);
    assert_eq!(game.combo_timer(), 2.0);
    assert!(game.particle_count() >= 24, "death burst");

    game.register_kill(&enemy);
    assert!((game.score() - 220.0).abs() < 1e-3);
    assert!((game.combo() - 1.4).abs() < 1e-5);

    game.register_kill(&enemy);
    assert!((game.score() - 360.0).abs() < 1e-3);
    assert!((game.combo() - 1.6).abs() < 1e-5);
}

#[test]
fn combo_is_capped() {
    let mut game = started_game();
    let enemy = chaser();
    for _ in 0..100 {
        game.register_kill(&enemy);
    }
    assert_eq!(game.combo(), 12.0);
}

#[test]
fn combo_amplifier_speeds_growth() {
    let mut game = started_game();
    game.player_mut().combo_amplifier = 1.5;
    game.register_kill(&chaser());
    assert!((game.combo() - 1.3).abs() < 1e-5);
}

#[test]
fn combo_expires_on_real_time() {
    let mut game = started_game();
    let mut input = InputState::new();
    game.register_kill(&chaser());

    // Player stands still, so the world crawls, but the combo clock does not.
    for _ in 0..30 {
        game.update(0.05, &mut input);
    }
    assert!(game.combo() > 1.0);
    for _ in 0..12 {
        game.update(0.05, &mut input);
    }
    assert_eq!(game.combo(), 1.0);
    assert_eq!(game.combo_timer(), 0.0);
}

#[test]
fn damage_resets_combo() {
    let mut game = started_game();
    let mut input = InputState::new();
    game.register_kill(&chaser());
    game.register_kill(&chaser());

    let pos = game.player().pos;
    game.enemy_bullets_mut().push(enemy_bullet_at(pos));
    game.update(DT, &mut input);

    assert_eq!(game.player().hp, 102.0);
    assert_eq!(game.combo(), 1.0);
    assert_eq!(game.combo_timer(), 0.0);
    assert!(game.damage_flash() > 0.0);
    assert!(game.shake_intensity() > 0.0);
    assert!(game.enemy_bullets().iter().all(|b| b.dead));

    game.update(DT, &mut input);
    assert!(game.enemy_bullets().is_empty());
}

#[test]
fn advance_clamps_long_frames() {
    let mut game = started_game();
    let mut input = InputState::new();
    game.register_kill(&chaser());
    game.advance(10.0, &mut input);
    assert!((game.combo_timer() - 1.95).abs() < 1e-5);
}

#[test]
fn negative_frame_limit_freezes_instead_of_crashing() {
    let mut cfg = GameConfig::default();
    cfg.timing.max_dt = -0.01;
    let mut game = Game::new(cfg, Box::new(MemoryScoreStore::default()), StdRng::seed_from_u64(1));
    game.start_run();
    let mut input = InputState::new();
    game.register_kill(&chaser());
    game.advance(0.016, &mut input);
    game.advance(-1.0, &mut input);
    assert_eq!(game.state(), GameState::Playing);
    assert_eq!(game.combo_timer(), 2.0);
}

#[test]
fn starting_upgrades_apply_by_key_each_run() {
    let mut cfg = GameConfig::default();
    cfg.starting_upgrades = vec!["piercing".into(), "no_such_upgrade".into(), "time_slow".into()];
    let mut game = Game::new(cfg, Box::new(MemoryScoreStore::default()), StdRng::seed_from_u64(1));
    game.start_run();
    assert!(game.permanent_upgrades().contains(&UpgradeId::Piercing));
    assert_eq!(game.permanent_upgrades().len(), 1);
    assert!((game.time().stationary_scale() - 0.041).abs() < 1e-6);

    game.start_run();
    assert_eq!(game.permanent_upgrades().len(), 1);
    assert!((game.time().stationary_scale() - 0.041).abs() < 1e-6);
}

#[test]
fn shake_settles() {
    let mut game = started_game();
    let mut input = InputState::new();
    game.add_shake(8.0);
    game.add_shake(3.0);
    assert_eq!(game.shake_intensity(), 8.0);

    game.update(DT, &mut input);
    assert!(game.shake_intensity() < 8.0);
    assert!(game.shake_offset().x.abs() <= game.shake_intensity());

    for _ in 0..120 {
        game.update(DT, &mut input);
    }
    assert_eq!(game.shake_intensity(), 0.0);
    assert_eq!(game.shake_offset(), Vec2::ZERO);
}

// ── Game over ─────────────────────────────────────────────────────────────────

#[test]
fn death_saves_a_new_high_score() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("best");
    let mut game = Game::new(
        GameConfig::default(),
        Box::new(FileScoreStore::new(&path)),
        StdRng::seed_from_u64(1),
    );
    let mut input = InputState::new();
    game.start_run();
    for _ in 0..3 {
        game.register_kill(&chaser());
    }

    game.player_mut().hp = 0.0;
    game.update(DT, &mut input);
    assert_eq!(game.state(), GameState::GameOver);
    assert_eq!(game.high_score(), 360);
    assert_eq!(FileScoreStore::new(&path).load(), 360);
}

#[test]
fn lower_score_does_not_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("best");
    std::fs::write(&path, "1000").unwrap();
    let mut game = Game::new(
        GameConfig::default(),
        Box::new(FileScoreStore::new(&path)),
        StdRng::seed_from_u64(1),
    );
    let mut input = InputState::new();
    game.start_run();
    game.register_kill(&chaser());
    game.player_mut().hp = 0.0;
    game.update(DT, &mut input);

    assert_eq!(game.state(), GameState::GameOver);
    assert_eq!(game.high_score(), 1000);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "1000");
}

#[test]
fn restart_begins_a_fresh_run() {
    let mut game = started_game();
    let mut input = InputState::new();
    game.player_mut().double_shot = true;
    game.register_kill(&chaser());
    game.player_mut().hp = 0.0;
    game.update(DT, &mut input);
    assert_eq!(game.state(), GameState::GameOver);

    game.update(DT, &mut input);
    assert_eq!(game.state(), GameState::GameOver, "waits for input");

    input.press(Edge::Restart);
    game.update(DT, &mut input);
    assert_eq!(game.state(), GameState::Playing);
    assert_eq!(game.score(), 0.0);
    assert_eq!(game.combo(), 1.0);
    assert_eq!(game.player().hp, 120.0);
    assert!(!game.player().double_shot);
    assert_eq!(game.waves().current_wave(), 1);
    assert!(game.permanent_upgrades().is_empty());
}

// ── Wave flow ─────────────────────────────────────────────────────────────────

#[test]
fn cleared_wave_leads_to_upgrade_choice() {
    let mut game = started_game();
    let mut input = InputState::new();
    reach_upgrade_screen(&mut game, &mut input);

    assert!(game.score() > 0.0);
    let choices = game.upgrade_choices().to_vec();
    assert_eq!(choices.len(), UPGRADE_CHOICES);

    game.choose_upgrade(UpgradeId::DoubleShot);
    assert_eq!(game.state(), GameState::Playing);
    assert_eq!(game.waves().current_wave(), 2);
    assert!(game.player().double_shot);
    assert!(game.permanent_upgrades().contains(&UpgradeId::DoubleShot));
    assert!(game.upgrade_choices().is_empty());
}

#[test]
fn digit_key_picks_a_card() {
    let mut game = started_game();
    let mut input = InputState::new();
    reach_upgrade_screen(&mut game, &mut input);
    let before = game.player().clone();
    let picked = game.upgrade_choices()[1];

    input.press(Edge::Digit(2));
    game.update(DT, &mut input);
    assert_eq!(game.state(), GameState::Playing);
    assert_eq!(game.waves().current_wave(), 2);

    let after = game.player();
    let changed = match picked {
        UpgradeId::DoubleShot => after.double_shot && !before.double_shot,
        UpgradeId::Piercing => after.piercing_bullets && !before.piercing_bullets,
        UpgradeId::DashCooldown => after.dash_cooldown_multiplier < before.dash_cooldown_multiplier,
        UpgradeId::BulletSpeed => after.bullet_speed_multiplier > before.bullet_speed_multiplier,
        UpgradeId::ComboAmplifier => after.combo_amplifier > before.combo_amplifier,
        UpgradeId::TimeSlow => game.time().stationary_multiplier() < 1.0,
    };
    assert!(changed, "{picked:?} had no effect");
}

#[test]
fn upgrade_screen_waits_for_a_pick() {
    let mut game = started_game();
    let mut input = InputState::new();
    reach_upgrade_screen(&mut game, &mut input);
    for _ in 0..60 {
        game.update(DT, &mut input);
    }
    assert_eq!(game.state(), GameState::Upgrade);
    assert_eq!(game.waves().current_wave(), 1);
}

#[test]
fn choose_upgrade_is_ignored_outside_upgrade_screen() {
    let mut game = started_game();
    game.choose_upgrade(UpgradeId::Piercing);
    assert!(!game.player().piercing_bullets);
    assert_eq!(game.waves().current_wave(), 1);
}

#[test]
fn permanent_upgrades_survive_into_next_wave() {
    let mut game = started_game();
    let mut input = InputState::new();
    reach_upgrade_screen(&mut game, &mut input);
    game.choose_upgrade(UpgradeId::Piercing);

    reach_upgrade_screen(&mut game, &mut input);
    assert!(game.player().piercing_bullets);
    assert!(!game.upgrade_choices().contains(&UpgradeId::Piercing));
}
