//! ECS Components для симуляции платформера
//!
//! Организация по доменам:
//! - motion: kinematics персонажа (MotionTuning/MotionConfig, CharacterMotion,
//!   CollisionReport, BodyBounds, AnimationState)
//! - camera: параметры слежения камеры (CameraTuning)
//! - player: player control marker (Player)

pub mod camera;
pub mod motion;
pub mod player;

// Re-exports для удобного импорта
pub use camera::*;
pub use motion::*;
pub use player::*;
