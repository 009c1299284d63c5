//! Game orchestrator — the top-level state machine and the fixed per-frame
//! update order.
//!
//! ```text
//! Menu ─start─▶ Playing ─wave cleared─▶ WaveClear ─delay─▶ Upgrade ─pick─▶ Playing
//!                  │
//!                  └─hp ≤ 0─▶ GameOver ─restart─▶ Playing
//! ```
//!
//! Within `Playing` the order is: player → time dilation → waves → enemies →
//! bullets → particles → collisions → deaths/score → end-of-frame checks.

use std::collections::BTreeSet;

use glam::Vec2;
use rand::rngs::StdRng;
use rand::Rng;

use crate::collision::{self, CollisionResult, CollisionRules};
use crate::config::GameConfig;
use crate::enemies::EnemyManager;
use crate::entities::{
    Bullet, BulletOwner, Enemy, EnemyKind, EnemyShot, Player, Shot, OUT_OF_BOUNDS_PADDING,
};
use crate::input::InputState;
use crate::math::from_angle;
use crate::particles::{Burst, ParticleSystem};
use crate::render::{self, RenderSink};
use crate::score::HighScoreStore;
use crate::time_control::TimeController;
use crate::ui::{Hud, HudView, UpgradeScreen};
use crate::upgrades::{UpgradeId, UpgradeManager};
use crate::waves::WaveManager;

/// Upgrade cards offered after each wave.
pub const UPGRADE_CHOICES: usize = 3;

/// Shake below this is treated as settled.
const SHAKE_EPSILON: f32 = 0.01;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameState {
    Menu,
    Playing,
    WaveClear,
    Upgrade,
    GameOver,
}

pub struct Game {
    cfg: GameConfig,
    rng: StdRng,
    store: Box<dyn HighScoreStore>,

    state: GameState,
    player: Player,
    time: TimeController,
    waves: WaveManager,
    enemies: EnemyManager,
    upgrades: UpgradeManager,
    particles: ParticleSystem,
    hud: Hud,
    upgrade_screen: UpgradeScreen,

    player_bullets: Vec<Bullet>,
    enemy_bullets: Vec<Bullet>,
    player_shots: Vec<Shot>,
    enemy_shots: Vec<EnemyShot>,

    score: f64,
    combo: f32,
    combo_timer: f32,
    high_score: u64,
    permanent_upgrades: BTreeSet<UpgradeId>,

    wave_clear_timer: f32,
    damage_flash_timer: f32,
    shake_intensity: f32,
    shake_offset: Vec2,
    frame: u64,
}

impl Game {
    pub fn new(cfg: GameConfig, store: Box<dyn HighScoreStore>, rng: StdRng) -> Self {
        let arena = cfg.arena.size();
        let high_score = store.load();
        log::info!("loaded high score {high_score}");
        Self {
            rng,
            store,
            state: GameState::Menu,
            player: Player::new(arena * 0.5, cfg.player),
            time: TimeController::new(cfg.time_control),
            waves: WaveManager::new(cfg.waves, cfg.timing.wave_intro_duration),
            enemies: EnemyManager::new(cfg.enemies, arena),
            upgrades: UpgradeManager::new(),
            particles: ParticleSystem::new(cfg.particles),
            hud: Hud::default(),
            upgrade_screen: UpgradeScreen::default(),
            player_bullets: Vec::new(),
            enemy_bullets: Vec::new(),
            player_shots: Vec::new(),
            enemy_shots: Vec::new(),
            score: 0.0,
            combo: 1.0,
            combo_timer: 0.0,
            high_score,
            permanent_upgrades: BTreeSet::new(),
            wave_clear_timer: 0.0,
            damage_flash_timer: 0.0,
            shake_intensity: 0.0,
            shake_offset: Vec2::ZERO,
            frame: 0,
            cfg,
        }
    }

    fn arena(&self) -> Vec2 {
        self.cfg.arena.size()
    }

    /// Advance by a real elapsed time, clamped so a stalled host cannot make
    /// the simulation jump.
    pub fn advance(&mut self, real_dt: f32, input: &mut InputState) {
        // `max_dt` may come from a user file; a negative limit means no time passes.
        let max_dt = self.cfg.timing.max_dt.max(0.0);
        let dt = real_dt.max(0.0).min(max_dt);
        self.update(dt, input);
    }

    pub fn update(&mut self, dt: f32, input: &mut InputState) {
        self.frame += 1;
        log::trace!("frame {} {:?} dt={:.4}", self.frame, self.state, dt);

        match self.state {
            GameState::Menu => self.update_menu(dt, input),
            GameState::Playing => self.update_playing(dt, input),
            GameState::WaveClear => self.update_wave_clear(dt),
            GameState::Upgrade => self.update_upgrade(dt, input),
            GameState::GameOver => self.update_game_over(dt, input),
        }

        self.update_shake(dt);
        self.damage_flash_timer = (self.damage_flash_timer - dt).max(0.0);
        self.hud.update(dt, self.score as f32, self.combo);
    }

    // ── State handlers ────────────────────────────────────────────────────────

    fn update_menu(&mut self, dt: f32, input: &mut InputState) {
        self.particles.update(dt * 0.25);
        if input.consume_start() {
            self.start_run();
        }
    }

    /// Reset everything run-scoped and start wave 1.
    pub fn start_run(&mut self) {
        let arena = self.arena();
        self.player = Player::new(arena * 0.5, self.cfg.player);
        self.player_bullets.clear();
        self.enemy_bullets.clear();
        self.player_shots.clear();
        self.enemy_shots.clear();

        self.particles.reset();
        self.enemies.reset();
        self.waves.reset();
        self.time = TimeController::new(self.cfg.time_control);
        self.upgrade_screen.close();

        self.score = 0.0;
        self.combo = 1.0;
        self.combo_timer = 0.0;
        self.damage_flash_timer = 0.0;
        self.wave_clear_timer = 0.0;
        self.permanent_upgrades.clear();
        self.shake_intensity = 0.0;
        self.shake_offset = Vec2::ZERO;
        self.hud = Hud::default();

        for key in &self.cfg.starting_upgrades {
            self.upgrades.apply_key(
                key,
                &mut self.player,
                &mut self.time,
                &mut self.permanent_upgrades,
            );
        }

        log::info!("run started");
        self.waves.start_next_wave(&mut self.rng);
        self.state = GameState::Playing;
    }

    fn update_playing(&mut self, dt: f32, input: &mut InputState) {
        let arena = self.arena();

        self.player.update(dt, input, arena, &mut self.player_shots);
        self.spawn_player_bullets();

        self.time.update(self.player.speed(), dt);
        let world_dt = self.time.apply_to_delta(dt);

        self.waves.update(world_dt, &mut self.enemies, &mut self.rng);
        self.enemies
            .update(world_dt, &self.player, &mut self.rng, &mut self.enemy_shots);
        self.spawn_enemy_bullets();

        self.update_bullets(dt, world_dt);
        self.particles.update(world_dt);

        let rules = CollisionRules {
            contact_damage_cooldown: self.cfg.player.contact_damage_cooldown,
            contact_knockback: self.cfg.enemies.contact_knockback,
        };
        let result = collision::resolve(
            &mut self.player,
            self.enemies.enemies_mut(),
            &mut self.player_bullets,
            &mut self.enemy_bullets,
            rules,
            &mut self.rng,
        );
        self.handle_collision_result(&result);

        for enemy in self.enemies.collect_dead() {
            self.register_kill(&enemy);
        }

        if self.combo > 1.0 {
            self.combo_timer -= dt;
            if self.combo_timer <= 0.0 {
                self.combo = 1.0;
                self.combo_timer = 0.0;
            }
        }

        if !self.player.is_alive() {
            self.trigger_game_over();
            return;
        }

        if self.waves.is_wave_cleared(&self.enemies) {
            self.waves.mark_wave_inactive();
            self.wave_clear_timer = self.cfg.timing.wave_clear_delay;
            self.state = GameState::WaveClear;
            log::info!("wave {} cleared, score {:.0}", self.waves.current_wave(), self.score);
        }
    }

    fn update_wave_clear(&mut self, dt: f32) {
        self.particles.update(dt * 0.5);
        self.wave_clear_timer -= dt;
        if self.wave_clear_timer <= 0.0 {
            let choices = self
                .upgrades
                .choices(&self.player, UPGRADE_CHOICES, &mut self.rng);
            self.upgrade_screen.open(choices, self.arena());
            self.state = GameState::Upgrade;
        }
    }

    fn update_upgrade(&mut self, dt: f32, input: &mut InputState) {
        self.particles.update(dt * 0.35);
        if let Some(id) = self.upgrade_screen.update(input) {
            self.choose_upgrade(id);
        }
    }

    /// Apply a picked upgrade and start the next wave. Ignored outside the
    /// upgrade screen.
    pub fn choose_upgrade(&mut self, id: UpgradeId) {
        if self.state != GameState::Upgrade {
            return;
        }
        self.upgrades.apply(
            id,
            &mut self.player,
            &mut self.time,
            &mut self.permanent_upgrades,
        );
        self.upgrade_screen.close();
        self.waves.start_next_wave(&mut self.rng);
        self.state = GameState::Playing;
    }

    fn update_game_over(&mut self, dt: f32, input: &mut InputState) {
        self.particles.update(dt * 0.4);
        if input.consume_restart() {
            self.start_run();
        }
    }

    fn trigger_game_over(&mut self) {
        self.state = GameState::GameOver;
        self.upgrade_screen.close();
        log::info!(
            "game over on wave {} with score {:.0}",
            self.waves.current_wave(),
            self.score
        );

        let rounded = self.score.round().max(0.0) as u64;
        if rounded > self.high_score {
            self.high_score = rounded;
            self.store.save(rounded);
        }
    }

    // ── Bullets ───────────────────────────────────────────────────────────────

    fn spawn_player_bullets(&mut self) {
        for shot in std::mem::take(&mut self.player_shots) {
            self.player_bullets.push(Bullet::from_shot(&shot));
            let burst = Burst {
                speed_min: 30.0,
                speed_max: 120.0,
                life: 0.12,
                size_min: 0.8,
                size_max: 1.8,
                drag: 10.0,
                ..self.particles.burst(render::PLAYER, self.cfg.particles.player_shot_count)
            };
            self.particles.spawn_burst(shot.pos, burst, &mut self.rng);
        }
    }

    fn spawn_enemy_bullets(&mut self) {
        let bullet_cfg = self.cfg.enemy_bullet;
        for shot in std::mem::take(&mut self.enemy_shots) {
            self.enemy_bullets.push(Bullet::from_shot(&Shot {
                pos: shot.origin + from_angle(shot.angle, shot.radius + 8.0),
                angle: shot.angle,
                speed: shot.speed,
                radius: bullet_cfg.radius,
                damage: bullet_cfg.damage,
                lifetime: bullet_cfg.lifetime,
                owner: BulletOwner::Enemy,
                pierce: 0,
            }));
            let burst = Burst {
                speed_min: 30.0,
                speed_max: 90.0,
                life: 0.14,
                size_min: 0.8,
                size_max: 1.8,
                drag: 10.0,
                ..self.particles.burst(render::ENEMY, self.cfg.particles.enemy_shot_count)
            };
            let muzzle = shot.origin + from_angle(shot.angle, shot.radius + 6.0);
            self.particles.spawn_burst(muzzle, burst, &mut self.rng);
        }
    }

    /// Player bullets fly on frame time; enemy bullets on world time.
    fn update_bullets(&mut self, dt: f32, world_dt: f32) {
        let arena = self.arena();

        for bullet in &mut self.player_bullets {
            bullet.update(dt);
            if !bullet.dead {
                self.particles
                    .spawn_trail(bullet.pos, bullet.vel, render::PLAYER, &mut self.rng);
            }
        }
        for bullet in &mut self.enemy_bullets {
            bullet.update(world_dt);
            if !bullet.dead {
                self.particles
                    .spawn_trail(bullet.pos, bullet.vel, render::ENEMY, &mut self.rng);
            }
        }

        let keep = |b: &Bullet| !b.dead && !b.is_out_of_bounds(arena, OUT_OF_BOUNDS_PADDING);
        self.player_bullets.retain(keep);
        self.enemy_bullets.retain(keep);
    }

    // ── Scoring & feedback ────────────────────────────────────────────────────

    fn handle_collision_result(&mut self, result: &CollisionResult) {
        for point in &result.hit_points {
            self.particles.spawn_impact(point.pos, point.color, &mut self.rng);
        }
        if result.enemy_hit {
            self.add_shake(self.cfg.camera.hit_shake);
        }

        if result.player_hit {
            self.add_shake(self.cfg.camera.damage_shake);
            self.damage_flash_timer = self.cfg.timing.damage_flash_duration;
            if self.cfg.scoring.combo_damage_reset {
                self.combo = 1.0;
                self.combo_timer = 0.0;
            }
        }
    }

    /// Award score for a dead enemy at the current combo, then grow the combo.
    pub fn register_kill(&mut self, enemy: &Enemy) {
        let boss = enemy.kind == EnemyKind::Miniboss;
        let count = self.cfg.particles.enemy_death_count * if boss { 3 } else { 1 };
        let burst = Burst {
            speed_min: 90.0,
            speed_max: if boss { 360.0 } else { 270.0 },
            life: if boss { 0.8 } else { 0.5 },
            size_min: 1.2,
            size_max: if boss { 5.0 } else { 3.2 },
            ..self.particles.burst(render::ENEMY, count)
        };
        self.particles.spawn_burst(enemy.pos, burst, &mut self.rng);

        let scoring = self.cfg.scoring;
        self.score += enemy.score_value as f64 * self.combo as f64;
        self.combo = (self.combo + scoring.combo_step * self.player.combo_amplifier)
            .min(scoring.combo_cap);
        self.combo_timer = scoring.combo_timeout;

        self.add_shake(if boss {
            self.cfg.camera.damage_shake
        } else {
            self.cfg.camera.kill_shake
        });
    }

    /// Raise the shake to at least `amount`; events never lower it.
    pub fn add_shake(&mut self, amount: f32) {
        self.shake_intensity = self.shake_intensity.max(amount);
    }

    fn update_shake(&mut self, dt: f32) {
        self.shake_intensity *= (-self.cfg.camera.shake_damping * dt).exp();
        if self.shake_intensity < SHAKE_EPSILON {
            self.shake_intensity = 0.0;
            self.shake_offset = Vec2::ZERO;
            return;
        }
        let a = self.shake_intensity;
        self.shake_offset = Vec2::new(self.rng.gen_range(-a..=a), self.rng.gen_range(-a..=a));
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    /// Draw the world (shaken) and then the UI (steady).
    pub fn render(&self, sink: &mut dyn RenderSink) {
        let arena = self.arena();
        sink.clear(render::BACKGROUND);

        sink.set_offset(self.shake_offset);
        sink.stroke_rect(Vec2::ZERO, arena, render::GRID);
        self.particles.render(sink);
        for bullet in self.player_bullets.iter().chain(&self.enemy_bullets) {
            bullet.render(sink);
        }
        self.enemies.render(sink);
        if self.state != GameState::Menu {
            self.player.render(sink);
        }

        sink.set_offset(Vec2::ZERO);
        let view = HudView {
            state: self.state,
            arena,
            wave: self.waves.current_wave(),
            intro_ratio: self.waves.intro_ratio(),
            time_scale: self.time.scale(),
            hp: self.player.hp,
            max_hp: self.player.max_hp,
            high_score: self.high_score,
            damage_flash: self.damage_flash_timer,
        };
        self.hud.render(sink, &view);
        if self.state == GameState::Upgrade {
            self.upgrade_screen.render(sink, arena);
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────────

    pub fn config(&self) -> &GameConfig {
        &self.cfg
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn enemies(&self) -> &EnemyManager {
        &self.enemies
    }

    pub fn enemies_mut(&mut self) -> &mut EnemyManager {
        &mut self.enemies
    }

    pub fn waves(&self) -> &WaveManager {
        &self.waves
    }

    pub fn time(&self) -> &TimeController {
        &self.time
    }

    pub fn player_bullets(&self) -> &[Bullet] {
        &self.player_bullets
    }

    pub fn enemy_bullets(&self) -> &[Bullet] {
        &self.enemy_bullets
    }

    pub fn enemy_bullets_mut(&mut self) -> &mut Vec<Bullet> {
        &mut self.enemy_bullets
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn combo(&self) -> f32 {
        self.combo
    }

    pub fn combo_timer(&self) -> f32 {
        self.combo_timer
    }

    pub fn high_score(&self) -> u64 {
        self.high_score
    }

    pub fn permanent_upgrades(&self) -> &BTreeSet<UpgradeId> {
        &self.permanent_upgrades
    }

    pub fn upgrade_choices(&self) -> &[UpgradeId] {
        self.upgrade_screen.choices()
    }

    pub fn shake_intensity(&self) -> f32 {
        self.shake_intensity
    }

    pub fn shake_offset(&self) -> Vec2 {
        self.shake_offset
    }

    pub fn damage_flash(&self) -> f32 {
        self.damage_flash_timer
    }
}
