//! Movement domain — события движения
//!
//! Содержит:
//! - JumpIntent (edge-triggered намерение прыгнуть)
//!
//! Сами kinematics-системы живут в physics/, компоненты в components/.

pub mod events;

pub use events::*;
