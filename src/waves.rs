//! Wave Manager — composes each wave and feeds spawns to the enemy manager.

use std::collections::VecDeque;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::WaveConfig;
use crate::enemies::EnemyManager;
use crate::entities::EnemyKind;

#[derive(Clone, Debug)]
pub struct WaveManager {
    cfg: WaveConfig,
    intro_duration: f32,
    current_wave: u32,
    pending: VecDeque<EnemyKind>,
    spawn_timer: f32,
    intro_timer: f32,
    active: bool,
}

impl WaveManager {
    pub fn new(cfg: WaveConfig, intro_duration: f32) -> Self {
        Self {
            cfg,
            intro_duration,
            current_wave: 0,
            pending: VecDeque::new(),
            spawn_timer: 0.0,
            intro_timer: 0.0,
            active: false,
        }
    }

    pub fn reset(&mut self) {
        self.current_wave = 0;
        self.pending.clear();
        self.spawn_timer = 0.0;
        self.intro_timer = 0.0;
        self.active = false;
    }

    pub fn start_next_wave<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.current_wave += 1;
        self.pending = self.build_composition(self.current_wave, rng).into();
        self.spawn_timer = 0.0;
        self.intro_timer = self.intro_duration;
        self.active = true;
        log::info!(
            "wave {} started with {} enemies",
            self.current_wave,
            self.pending.len()
        );
    }

    pub fn update<R: Rng + ?Sized>(&mut self, dt: f32, enemies: &mut EnemyManager, rng: &mut R) {
        if !self.active {
            return;
        }
        self.intro_timer = (self.intro_timer - dt).max(0.0);
        if self.pending.is_empty() {
            return;
        }

        // Carry the remainder so a long frame can release several spawns.
        self.spawn_timer -= dt;
        while self.spawn_timer <= 0.0 {
            let Some(kind) = self.pending.pop_front() else {
                break;
            };
            enemies.spawn(kind, self.current_wave, rng);
            self.spawn_timer += self.spawn_interval();
        }
    }

    pub fn spawn_interval(&self) -> f32 {
        (self.cfg.spawn_interval - self.current_wave as f32 * self.cfg.spawn_interval_decay)
            .max(self.cfg.min_spawn_interval)
    }

    /// Number of regular (non-miniboss) enemies in `wave`.
    pub fn enemy_count(&self, wave: u32) -> usize {
        let w = wave as f32;
        (self.cfg.base_enemy_count + w * self.cfg.count_growth + w * 0.5).round() as usize
    }

    /// Kinds available in `wave`, in unlock order.
    pub fn unlocked_kinds(&self, wave: u32) -> Vec<EnemyKind> {
        let mut kinds = vec![EnemyKind::Chaser];
        if wave >= self.cfg.fast_unlock_wave {
            kinds.push(EnemyKind::Fast);
        }
        if wave >= self.cfg.shooter_unlock_wave {
            kinds.push(EnemyKind::Shooter);
        }
        if wave >= self.cfg.burst_unlock_wave {
            kinds.push(EnemyKind::Burst);
        }
        kinds
    }

    /// Bag weight of `kind` in `wave`. Chasers thin out as waves climb.
    pub fn weight(kind: EnemyKind, wave: u32) -> f32 {
        let w = wave as f32;
        match kind {
            EnemyKind::Chaser => (4.0 - w * 0.28).max(1.0),
            EnemyKind::Fast => 1.1 + w * 0.08,
            EnemyKind::Shooter => 0.8 + w * 0.12,
            EnemyKind::Burst => 0.6 + w * 0.1,
            EnemyKind::Miniboss => 1.0,
        }
    }

    /// Weighted bag the regular enemies of `wave` are drawn from.
    pub fn weighted_bag(&self, wave: u32) -> Vec<EnemyKind> {
        let mut bag = Vec::new();
        for kind in self.unlocked_kinds(wave) {
            let copies = ((Self::weight(kind, wave) * 3.0).round() as usize).max(1);
            bag.extend(std::iter::repeat(kind).take(copies));
        }
        bag
    }

    /// Shuffled spawn list for `wave`: weighted draws, plus a miniboss on
    /// every Nth wave.
    pub fn build_composition<R: Rng + ?Sized>(&self, wave: u32, rng: &mut R) -> Vec<EnemyKind> {
        let bag = self.weighted_bag(wave);
        let mut list: Vec<EnemyKind> = (0..self.enemy_count(wave))
            .filter_map(|_| bag.choose(rng).copied())
            .collect();

        if self.cfg.miniboss_every > 0 && wave % self.cfg.miniboss_every == 0 {
            list.push(EnemyKind::Miniboss);
        }

        list.shuffle(rng);
        log::debug!("wave {} composition: {:?}", wave, list);
        list
    }

    pub fn is_spawning_complete(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn is_wave_cleared(&self, enemies: &EnemyManager) -> bool {
        self.active && self.is_spawning_complete() && enemies.alive_count() == 0
    }

    pub fn mark_wave_inactive(&mut self) {
        self.active = false;
    }

    pub fn current_wave(&self) -> u32 {
        self.current_wave
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Remaining fraction of the wave intro banner, 1.0 → 0.0.
    pub fn intro_ratio(&self) -> f32 {
        if self.intro_duration <= 0.0 {
            0.0
        } else {
            self.intro_timer / self.intro_duration
        }
    }
}
