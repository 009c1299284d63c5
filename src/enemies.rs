//! Enemy Manager — sole owner of the live enemy collection.

use glam::Vec2;
use rand::Rng;

use crate::config::EnemyTable;
use crate::entities::{Enemy, EnemyId, EnemyKind, EnemyShot, Player};
use crate::render::RenderSink;

#[derive(Clone, Debug)]
pub struct EnemyManager {
    table: EnemyTable,
    arena: Vec2,
    enemies: Vec<Enemy>,
    next_id: u32,
}

impl EnemyManager {
    pub fn new(table: EnemyTable, arena: Vec2) -> Self {
        Self {
            table,
            arena,
            enemies: Vec::new(),
            next_id: 1,
        }
    }

    /// Drop every enemy and restart id assignment for a new run.
    pub fn reset(&mut self) {
        self.enemies.clear();
        self.next_id = 1;
    }

    fn allocate_id(&mut self) -> EnemyId {
        let id = EnemyId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Spawn at an exact position. Returns the new enemy's id.
    pub fn spawn_at<R: Rng + ?Sized>(
        &mut self,
        kind: EnemyKind,
        pos: Vec2,
        wave: u32,
        rng: &mut R,
    ) -> EnemyId {
        let id = self.allocate_id();
        self.enemies
            .push(Enemy::new(id, kind, pos, wave, &self.table, rng));
        id
    }

    /// Spawn just outside a random arena edge.
    pub fn spawn<R: Rng + ?Sized>(&mut self, kind: EnemyKind, wave: u32, rng: &mut R) -> EnemyId {
        let pos = self.edge_spawn_point(rng);
        log::debug!("spawning {} at ({:.0}, {:.0})", kind.name(), pos.x, pos.y);
        self.spawn_at(kind, pos, wave, rng)
    }

    fn edge_spawn_point<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec2 {
        let pad = self.table.spawn_padding;
        let (w, h) = (self.arena.x, self.arena.y);
        let along_x = rng.gen_range(pad..=(w - pad).max(pad));
        let along_y = rng.gen_range(pad..=(h - pad).max(pad));
        match rng.gen_range(0..4) {
            0 => Vec2::new(-pad, along_y),
            1 => Vec2::new(w + pad, along_y),
            2 => Vec2::new(along_x, -pad),
            _ => Vec2::new(along_x, h + pad),
        }
    }

    pub fn update<R: Rng + ?Sized>(
        &mut self,
        dt: f32,
        player: &Player,
        rng: &mut R,
        shots: &mut Vec<EnemyShot>,
    ) {
        for enemy in &mut self.enemies {
            enemy.update(dt, player, self.arena, rng, shots);
        }
    }

    /// Remove dead enemies from the live set and hand them back.
    pub fn collect_dead(&mut self) -> Vec<Enemy> {
        let (dead, alive): (Vec<Enemy>, Vec<Enemy>) =
            std::mem::take(&mut self.enemies).into_iter().partition(|e| e.dead);
        self.enemies = alive;
        dead
    }

    pub fn alive_count(&self) -> usize {
        self.enemies.len()
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn enemies_mut(&mut self) -> &mut [Enemy] {
        &mut self.enemies
    }

    pub fn get(&self, id: EnemyId) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id == id)
    }

    pub fn render(&self, sink: &mut dyn RenderSink) {
        for enemy in &self.enemies {
            enemy.render(sink);
        }
    }
}
