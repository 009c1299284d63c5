//! Game entities — per-entity state plus the behaviour that advances it.
//!
//! Entities never spawn other entities directly. Anything they fire is pushed
//! onto a caller-owned queue and turned into bullets by the game once the
//! update pass is over.

mod bullet;
mod enemy;
mod particle;
mod player;

pub use bullet::{Bullet, BulletOwner, Shot, OUT_OF_BOUNDS_PADDING};
pub use enemy::{Enemy, EnemyId, EnemyKind, EnemyShot};
pub use particle::Particle;
pub use player::{Afterimage, Player};
