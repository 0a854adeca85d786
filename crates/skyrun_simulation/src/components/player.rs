//! Player control marker component
//!
//! Отмечает entity которым управляет игрок через input.

use bevy::prelude::Component;

/// Marker component для player-controlled entity
///
/// Input systems используют `With<Player>` filter; акторы без маркера
/// input игрока не получают (будущие AI-акторы идут своим путём).
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Player;
