//! Movement events

use bevy::prelude::*;

/// Event: намерение прыгнуть (jump intent)
///
/// Генерируется:
/// - input-слоем на фронте нажатия (jump just_pressed), НЕ каждый тик
///
/// Обрабатывается:
/// - character_kinematics: резолвит в wall climb / wall off / wall leap /
///   прыжок с земли (вдоль нормали на крутом склоне), no-op в воздухе
#[derive(Event, Debug, Clone)]
pub struct JumpIntent {
    pub entity: Entity,
}
