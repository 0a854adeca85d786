//! Physics simulation module
//!
//! Kinematics персонажа: velocity integration, wall slide/jump, прыжки
//! со склонов. Collision resolution — за границей (mover::Mover).

pub mod kinematics;

// Re-export основных типов
pub use kinematics::{spawn_platformer_character, character_kinematics, KinematicsPlugin};
