//! Input boundary
//!
//! Host (Godot node, winit loop, тестовая лента) эмитит PlayerInputEvent
//! каждый кадр; ECS-система конвертирует его в directional input на
//! CharacterMotion и edge-triggered JumpIntent. Санитизация сырых осей
//! (NaN → 0, клиппинг в [-1, 1]) происходит ЗДЕСЬ, на границе
//! симуляции — дальше по конвейеру input считается валидным.

use bevy::prelude::*;
use rand::Rng;

use crate::components::{CharacterMotion, Player};
use crate::movement::JumpIntent;
use crate::SimulationSet;

/// Player input event — сырой ввод за кадр
///
/// # Fields
/// - `move_direction`: оси направленного ввода, по [-1, 1] на ось
/// - `jump`: jump just_pressed (фронт, не удержание)
#[derive(Event, Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerInputEvent {
    pub move_direction: Vec2,
    pub jump: bool,
}

impl PlayerInputEvent {
    pub fn direction(x: f32, y: f32) -> Self {
        Self {
            move_direction: Vec2::new(x, y),
            jump: false,
        }
    }

    pub fn jump() -> Self {
        Self {
            move_direction: Vec2::ZERO,
            jump: true,
        }
    }
}

fn sanitize_axis(raw: f32) -> f32 {
    if raw.is_finite() {
        raw.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}

/// Система: применяет input к player-controlled персонажам
///
/// Последний event кадра выигрывает (как с полем "сырые оси этого
/// кадра"); jump агрегируется по ИЛИ — фронт нажатия не теряем.
pub fn apply_player_input(
    mut input_events: EventReader<PlayerInputEvent>,
    mut jump_events: EventWriter<JumpIntent>,
    mut players: Query<(Entity, &mut CharacterMotion), With<Player>>,
) {
    let mut latest: Option<Vec2> = None;
    let mut jump = false;
    for input in input_events.read() {
        latest = Some(Vec2::new(
            sanitize_axis(input.move_direction.x),
            sanitize_axis(input.move_direction.y),
        ));
        jump |= input.jump;
    }
    let Some(direction) = latest else {
        return;
    };

    for (entity, mut motion) in players.iter_mut() {
        motion.directional_input = direction;
        if jump {
            jump_events.write(JumpIntent { entity });
        }
    }
}

/// Заскриптованная лента input'а для headless прогонов
///
/// Один кадр ленты на один фиксированный тик; после конца ленты —
/// нулевой input. Для determinism-тестов лента генерируется из
/// seeded RNG и полностью воспроизводима.
#[derive(Resource, Debug, Clone)]
pub struct ScriptedInput {
    frames: Vec<PlayerInputEvent>,
    cursor: usize,
}

impl ScriptedInput {
    pub fn new(frames: Vec<PlayerInputEvent>) -> Self {
        Self { frames, cursor: 0 }
    }

    /// Лента из `ticks` кадров удержания направления
    pub fn hold(direction: Vec2, ticks: usize) -> Self {
        Self::new(vec![
            PlayerInputEvent {
                move_direction: direction,
                jump: false,
            };
            ticks
        ])
    }

    /// Случайная, но воспроизводимая лента: сегменты по 5-30 тиков
    /// с фиксированным направлением, изредка прыжок
    pub fn random(rng: &mut impl Rng, ticks: usize) -> Self {
        let mut frames = Vec::with_capacity(ticks);
        while frames.len() < ticks {
            let segment = rng.gen_range(5..30usize);
            let x = match rng.gen_range(0..3) {
                0 => -1.0,
                1 => 0.0,
                _ => 1.0,
            };
            let jump = rng.gen_bool(0.2);
            for i in 0..segment {
                if frames.len() == ticks {
                    break;
                }
                frames.push(PlayerInputEvent {
                    move_direction: Vec2::new(x, 0.0),
                    jump: jump && i == 0,
                });
            }
        }
        Self::new(frames)
    }

    fn next_frame(&mut self) -> PlayerInputEvent {
        let frame = self.frames.get(self.cursor).copied().unwrap_or_default();
        self.cursor += 1;
        frame
    }
}

/// Система: проигрывает ленту (только headless/тесты)
///
/// Добавлять в FixedUpdate до apply_player_input:
/// `drive_scripted_input.in_set(SimulationSet::Input).before(apply_player_input)`
pub fn drive_scripted_input(
    mut tape: ResMut<ScriptedInput>,
    mut events: EventWriter<PlayerInputEvent>,
) {
    events.write(tape.next_frame());
}

/// Plugin input-границы: event + система в Input set
pub struct PlayerInputPlugin;

impl Plugin for PlayerInputPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<PlayerInputEvent>()
            .add_systems(FixedUpdate, apply_player_input.in_set(SimulationSet::Input));
    }
}
