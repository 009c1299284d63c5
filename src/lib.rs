pub mod collision;
pub mod config;
pub mod enemies;
pub mod entities;
pub mod game;
pub mod input;
pub mod math;
pub mod particles;
pub mod render;
pub mod score;
pub mod time_control;
pub mod ui;
pub mod upgrades;
pub mod waves;
