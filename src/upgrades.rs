//! Upgrade catalog and the manager that offers and applies upgrades.

use std::collections::BTreeSet;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::entities::Player;
use crate::render::Rgb;
use crate::time_control::TimeController;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum UpgradeId {
    DoubleShot,
    Piercing,
    DashCooldown,
    TimeSlow,
    BulletSpeed,
    ComboAmplifier,
}

impl UpgradeId {
    pub fn key(self) -> &'static str {
        match self {
            UpgradeId::DoubleShot => "double_shot",
            UpgradeId::Piercing => "piercing",
            UpgradeId::DashCooldown => "dash_cooldown",
            UpgradeId::TimeSlow => "time_slow",
            UpgradeId::BulletSpeed => "bullet_speed",
            UpgradeId::ComboAmplifier => "combo_amp",
        }
    }

    pub fn from_key(key: &str) -> Option<UpgradeId> {
        CATALOG.iter().map(|u| u.id).find(|id| id.key() == key)
    }

    /// Upgrades that can be owned only once per run.
    pub fn is_one_time(self) -> bool {
        matches!(self, UpgradeId::DoubleShot | UpgradeId::Piercing)
    }

    pub fn info(self) -> &'static UpgradeInfo {
        &CATALOG[self as usize]
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UpgradeInfo {
    pub id: UpgradeId,
    pub title: &'static str,
    pub description: &'static str,
    pub accent: Rgb,
}

/// Ordered like [`UpgradeId`].
pub static CATALOG: [UpgradeInfo; 6] = [
    UpgradeInfo {
        id: UpgradeId::DoubleShot,
        title: "Double Shot",
        description: "Fire two rounds with a narrow spread.",
        accent: Rgb(28, 217, 255),
    },
    UpgradeInfo {
        id: UpgradeId::Piercing,
        title: "Piercing Bullets",
        description: "Bullets pass through one extra target.",
        accent: Rgb(69, 245, 255),
    },
    UpgradeInfo {
        id: UpgradeId::DashCooldown,
        title: "Fast Dash",
        description: "Reduce dash cooldown by 18%.",
        accent: Rgb(255, 79, 208),
    },
    UpgradeInfo {
        id: UpgradeId::TimeSlow,
        title: "Stillpoint Core",
        description: "Standing still slows the world even more.",
        accent: Rgb(143, 124, 255),
    },
    UpgradeInfo {
        id: UpgradeId::BulletSpeed,
        title: "Bullet Speed Up",
        description: "Increase bullet velocity by 18%.",
        accent: Rgb(90, 217, 255),
    },
    UpgradeInfo {
        id: UpgradeId::ComboAmplifier,
        title: "Combo Amplifier",
        description: "Increase combo multiplier growth.",
        accent: Rgb(255, 125, 244),
    },
];

const DASH_COOLDOWN_FACTOR: f32 = 0.82;
const DASH_COOLDOWN_FLOOR: f32 = 0.45;
const BULLET_SPEED_FACTOR: f32 = 1.18;
const COMBO_AMPLIFIER_STEP: f32 = 0.25;

#[derive(Clone, Debug, Default)]
pub struct UpgradeManager;

impl UpgradeManager {
    pub fn new() -> Self {
        Self
    }

    fn is_owned(id: UpgradeId, player: &Player) -> bool {
        match id {
            UpgradeId::DoubleShot => player.double_shot,
            UpgradeId::Piercing => player.piercing_bullets,
            _ => false,
        }
    }

    /// Draw `count` distinct upgrades, skipping one-time upgrades the player
    /// already owns. Falls back to the whole catalog when too few remain.
    pub fn choices<R: Rng + ?Sized>(
        &self,
        player: &Player,
        count: usize,
        rng: &mut R,
    ) -> Vec<UpgradeId> {
        let available: Vec<UpgradeId> = CATALOG
            .iter()
            .map(|u| u.id)
            .filter(|&id| !Self::is_owned(id, player))
            .collect();

        let source: Vec<UpgradeId> = if available.len() >= count {
            available
        } else {
            CATALOG.iter().map(|u| u.id).collect()
        };

        source.choose_multiple(rng, count).copied().collect()
    }

    pub fn apply(
        &self,
        id: UpgradeId,
        player: &mut Player,
        time: &mut TimeController,
        permanent: &mut BTreeSet<UpgradeId>,
    ) {
        match id {
            UpgradeId::DoubleShot => player.double_shot = true,
            UpgradeId::Piercing => player.piercing_bullets = true,
            UpgradeId::DashCooldown => {
                player.dash_cooldown_multiplier =
                    (player.dash_cooldown_multiplier * DASH_COOLDOWN_FACTOR).max(DASH_COOLDOWN_FLOOR);
            }
            UpgradeId::TimeSlow => time.make_stationary_slow_stronger(),
            UpgradeId::BulletSpeed => player.bullet_speed_multiplier *= BULLET_SPEED_FACTOR,
            UpgradeId::ComboAmplifier => player.combo_amplifier += COMBO_AMPLIFIER_STEP,
        }

        if id.is_one_time() {
            permanent.insert(id);
        }
        log::info!("applied upgrade {}", id.key());
    }

    /// Apply by catalog key. Unknown keys are ignored.
    pub fn apply_key(
        &self,
        key: &str,
        player: &mut Player,
        time: &mut TimeController,
        permanent: &mut BTreeSet<UpgradeId>,
    ) -> bool {
        match UpgradeId::from_key(key) {
            Some(id) => {
                self.apply(id, player, time, permanent);
                true
            }
            None => {
                log::warn!("ignoring unknown upgrade {key:?}");
                false
            }
        }
    }
}
