use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

use stillpoint::config::{EnemyTable, WaveConfig};
use stillpoint::enemies::EnemyManager;
use stillpoint::entities::{EnemyId, EnemyKind};
use stillpoint::waves::WaveManager;

const ARENA: Vec2 = Vec2::new(1280.0, 720.0);

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(7)
}

fn waves() -> WaveManager {
    WaveManager::new(WaveConfig::default(), 1.6)
}

fn enemies() -> EnemyManager {
    EnemyManager::new(EnemyTable::default(), ARENA)
}

/// Drain the pending queue of the current wave into `enemies`.
fn spawn_all(waves: &mut WaveManager, enemies: &mut EnemyManager, rng: &mut StdRng) {
    for _ in 0..1000 {
        if waves.is_spawning_complete() {
            return;
        }
        waves.update(0.05, enemies, rng);
    }
    panic!("wave never finished spawning");
}

// ── Composition ───────────────────────────────────────────────────────────────

#[test]
fn first_wave_is_seven_chasers() {
    let w = waves();
    let list = w.build_composition(1, &mut seeded_rng());
    assert_eq!(list.len(), 7);
    assert!(list.iter().all(|&k| k == EnemyKind::Chaser));
}

#[test]
fn enemy_count_grows() {
    let w = waves();
    assert_eq!(w.enemy_count(1), 7);
    assert_eq!(w.enemy_count(2), 9);
    assert_eq!(w.enemy_count(4), 12);
    assert!(w.enemy_count(10) > w.enemy_count(9));
}

#[test]
fn kinds_unlock_by_wave() {
    let w = waves();
    assert_eq!(w.unlocked_kinds(1), vec![EnemyKind::Chaser]);
    assert_eq!(w.unlocked_kinds(2), vec![EnemyKind::Chaser, EnemyKind::Fast]);
    assert_eq!(
        w.unlocked_kinds(3),
        vec![EnemyKind::Chaser, EnemyKind::Fast, EnemyKind::Shooter]
    );
    assert_eq!(w.unlocked_kinds(5).len(), 4);
    assert!(w.unlocked_kinds(8).iter().all(|&k| k != EnemyKind::Miniboss));
}

#[test]
fn locked_kinds_never_appear() {
    let w = waves();
    let mut rng = seeded_rng();
    for _ in 0..20 {
        let list = w.build_composition(3, &mut rng);
        assert!(list.iter().all(|&k| k != EnemyKind::Burst && k != EnemyKind::Miniboss));
    }
}

#[test]
fn chaser_weight_thins_but_stays_positive() {
    assert!(WaveManager::weight(EnemyKind::Chaser, 1) > WaveManager::weight(EnemyKind::Chaser, 6));
    assert_eq!(WaveManager::weight(EnemyKind::Chaser, 50), 1.0);
    assert!(WaveManager::weight(EnemyKind::Shooter, 6) > WaveManager::weight(EnemyKind::Shooter, 3));
}

#[test]
fn miniboss_every_fourth_wave() {
    let w = waves();
    let mut rng = seeded_rng();
    for wave in 1..=12 {
        let list = w.build_composition(wave, &mut rng);
        let bosses = list.iter().filter(|&&k| k == EnemyKind::Miniboss).count();
        let expected = usize::from(wave % 4 == 0);
        assert_eq!(bosses, expected, "wave {wave}");
        assert_eq!(list.len(), w.enemy_count(wave) + expected);
    }
}

// ── Spawning ──────────────────────────────────────────────────────────────────

#[test]
fn spawn_interval_shrinks_to_floor() {
    let mut w = waves();
    let mut rng = seeded_rng();
    w.start_next_wave(&mut rng);
    assert!((w.spawn_interval() - 0.365).abs() < 1e-5);
    for _ in 0..40 {
        w.start_next_wave(&mut rng);
    }
    assert_eq!(w.spawn_interval(), 0.14);
}

#[test]
fn start_next_wave_queues_spawns() {
    let mut w = waves();
    w.start_next_wave(&mut seeded_rng());
    assert_eq!(w.current_wave(), 1);
    assert!(w.is_active());
    assert_eq!(w.pending(), 7);
    assert!((w.intro_ratio() - 1.0).abs() < 1e-6);
}

#[test]
fn first_spawn_is_immediate() {
    let mut w = waves();
    let mut e = enemies();
    let mut rng = seeded_rng();
    w.start_next_wave(&mut rng);
    w.update(0.001, &mut e, &mut rng);
    assert_eq!(e.alive_count(), 1);
    assert_eq!(w.pending(), 6);
}

#[test]
fn long_frame_releases_several_spawns() {
    let mut w = waves();
    let mut e = enemies();
    let mut rng = seeded_rng();
    w.start_next_wave(&mut rng);
    w.update(1.0, &mut e, &mut rng);
    // 0 s, 0.365 s, 0.73 s
    assert_eq!(e.alive_count(), 3);
}

#[test]
fn spawns_appear_outside_the_arena() {
    let mut w = waves();
    let mut e = enemies();
    let mut rng = seeded_rng();
    w.start_next_wave(&mut rng);
    spawn_all(&mut w, &mut e, &mut rng);
    for enemy in e.enemies() {
        let p = enemy.pos;
        let outside = p.x < 0.0 || p.y < 0.0 || p.x > ARENA.x || p.y > ARENA.y;
        assert!(outside, "spawned inside at {p:?}");
    }
}

#[test]
fn intro_banner_fades() {
    let mut w = waves();
    let mut e = enemies();
    let mut rng = seeded_rng();
    w.start_next_wave(&mut rng);
    w.update(0.8, &mut e, &mut rng);
    assert!((w.intro_ratio() - 0.5).abs() < 1e-4);
    w.update(5.0, &mut e, &mut rng);
    assert_eq!(w.intro_ratio(), 0.0);
}

// ── Clear detection ───────────────────────────────────────────────────────────

#[test]
fn wave_clears_only_when_queue_empty_and_no_live_enemies() {
    let mut w = waves();
    let mut e = enemies();
    let mut rng = seeded_rng();
    w.start_next_wave(&mut rng);
    assert!(!w.is_wave_cleared(&e), "queue still full");

    spawn_all(&mut w, &mut e, &mut rng);
    assert!(!w.is_wave_cleared(&e), "enemies still alive");

    for enemy in e.enemies_mut() {
        enemy.take_damage(10_000.0);
    }
    assert!(!w.is_wave_cleared(&e), "dead enemies not collected yet");
    assert_eq!(e.collect_dead().len(), 7);
    assert!(w.is_wave_cleared(&e));

    w.mark_wave_inactive();
    assert!(!w.is_wave_cleared(&e));
}

#[test]
fn reset_restarts_numbering() {
    let mut w = waves();
    let mut rng = seeded_rng();
    w.start_next_wave(&mut rng);
    w.start_next_wave(&mut rng);
    w.reset();
    assert_eq!(w.current_wave(), 0);
    assert_eq!(w.pending(), 0);
    assert!(!w.is_active());
}

// ── Enemy manager ─────────────────────────────────────────────────────────────

#[test]
fn ids_are_unique_and_restart_per_run() {
    let mut e = enemies();
    let mut rng = seeded_rng();
    let a = e.spawn(EnemyKind::Chaser, 1, &mut rng);
    let b = e.spawn(EnemyKind::Fast, 1, &mut rng);
    assert_ne!(a, b);
    assert_eq!(a, EnemyId(1));
    assert!(e.get(b).is_some());

    e.reset();
    assert_eq!(e.alive_count(), 0);
    assert_eq!(e.spawn(EnemyKind::Chaser, 1, &mut rng), EnemyId(1));
}

#[test]
fn collect_dead_keeps_the_living() {
    let mut e = enemies();
    let mut rng = seeded_rng();
    let a = e.spawn_at(EnemyKind::Chaser, Vec2::new(100.0, 100.0), 1, &mut rng);
    let b = e.spawn_at(EnemyKind::Chaser, Vec2::new(200.0, 100.0), 1, &mut rng);
    e.enemies_mut()[0].take_damage(1000.0);

    let dead = e.collect_dead();
    assert_eq!(dead.len(), 1);
    assert_eq!(dead[0].id, a);
    assert_eq!(e.alive_count(), 1);
    assert!(e.get(b).is_some());
    assert!(e.get(a).is_none());
}
