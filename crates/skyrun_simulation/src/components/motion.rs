//! Kinematics компоненты: tuning, state, collision report
//!
//! Разделение как в character-controller'ах:
//! - MotionTuning — designer-facing параметры (POD, сериализуемые)
//! - MotionConfig — валидированный config + derived величины (gravity, v0)
//! - CharacterMotion — мутабельное состояние, живёт между тиками
//! - CollisionReport — immutable отчёт внешнего resolver'а за тик

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Ошибки валидации конфигурации. Фатальны на construction:
/// лучше отказаться собрать компонент, чем получить NaN-гравитацию.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("time_to_jump_apex должен быть конечным и > 0, получили {0}")]
    InvalidJumpApex(f32),

    #[error("jump_height должен быть конечным и >= 0, получили {0}")]
    InvalidJumpHeight(f32),

    #[error("{name} должен быть конечным и >= 0, получили {value}")]
    InvalidScalar { name: &'static str, value: f32 },

    #[error("{name} должен быть конечным, получили {value}")]
    NotFinite { name: &'static str, value: f32 },

    #[error("{name} должен быть конечным вектором, получили ({x}, {y})")]
    InvalidVector { name: &'static str, x: f32, y: f32 },
}

fn check_scalar(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::InvalidScalar { name, value });
    }
    Ok(())
}

fn check_vector(name: &'static str, v: Vec2) -> Result<(), ConfigError> {
    if !v.x.is_finite() || !v.y.is_finite() {
        return Err(ConfigError::InvalidVector { name, x: v.x, y: v.y });
    }
    Ok(())
}

/// Designer-facing параметры движения
///
/// Прыжок задаётся в терминах высоты и времени до апекса — гравитация
/// и начальная скорость выводятся (стандартный projectile-motion solve).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MotionTuning {
    /// Целевая горизонтальная скорость при полном input (m/s)
    pub move_speed: f32,
    /// Высота прыжка (m)
    pub jump_height: f32,
    /// Время до апекса прыжка (s)
    pub time_to_jump_apex: f32,
    /// Время разгона velocity.x на земле (s)
    pub acceleration_time_grounded: f32,
    /// Время разгона velocity.x в воздухе (s)
    pub acceleration_time_airborne: f32,
    /// Максимальная скорость скольжения по стене (m/s, по модулю)
    pub wall_slide_speed_max: f32,
    /// Grace-период "прилипания" к стене (s)
    pub wall_stick_time: f32,
    /// Импульс прыжка вдоль стены (вверх, input в стену)
    pub wall_jump_climb: Vec2,
    /// Импульс прыжка от стены без input'а
    pub wall_jump_off: Vec2,
    /// Импульс длинного прыжка от стены (input от стены)
    pub wall_leap: Vec2,
}

impl Default for MotionTuning {
    fn default() -> Self {
        Self {
            move_speed: 6.0,
            jump_height: 4.0,
            time_to_jump_apex: 0.4,
            acceleration_time_grounded: 0.3,
            acceleration_time_airborne: 0.2,
            wall_slide_speed_max: 3.0,
            wall_stick_time: 0.25,
            wall_jump_climb: Vec2::new(7.5, 16.0),
            wall_jump_off: Vec2::new(8.5, 7.0),
            wall_leap: Vec2::new(18.0, 17.0),
        }
    }
}

impl MotionTuning {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.time_to_jump_apex.is_finite() || self.time_to_jump_apex <= 0.0 {
            return Err(ConfigError::InvalidJumpApex(self.time_to_jump_apex));
        }
        if !self.jump_height.is_finite() || self.jump_height < 0.0 {
            return Err(ConfigError::InvalidJumpHeight(self.jump_height));
        }
        check_scalar("move_speed", self.move_speed)?;
        check_scalar("acceleration_time_grounded", self.acceleration_time_grounded)?;
        check_scalar("acceleration_time_airborne", self.acceleration_time_airborne)?;
        check_scalar("wall_slide_speed_max", self.wall_slide_speed_max)?;
        check_scalar("wall_stick_time", self.wall_stick_time)?;
        check_vector("wall_jump_climb", self.wall_jump_climb)?;
        check_vector("wall_jump_off", self.wall_jump_off)?;
        check_vector("wall_leap", self.wall_leap)?;
        Ok(())
    }
}

/// Валидированная конфигурация движения + derived величины
///
/// gravity = -(2 * jump_height) / time_to_jump_apex²
/// jump_velocity = |gravity| * time_to_jump_apex
#[derive(Component, Debug, Clone, Copy)]
pub struct MotionConfig {
    pub tuning: MotionTuning,
    gravity: f32,
    jump_velocity: f32,
}

impl MotionConfig {
    pub fn new(tuning: MotionTuning) -> Result<Self, ConfigError> {
        tuning.validate()?;
        let gravity =
            -(2.0 * tuning.jump_height) / (tuning.time_to_jump_apex * tuning.time_to_jump_apex);
        let jump_velocity = gravity.abs() * tuning.time_to_jump_apex;
        Ok(Self {
            tuning,
            gravity,
            jump_velocity,
        })
    }

    /// Гравитация (m/s², отрицательная — вниз)
    pub fn gravity(&self) -> f32 {
        self.gravity
    }

    /// Начальная вертикальная скорость прыжка (m/s)
    pub fn jump_velocity(&self) -> f32 {
        self.jump_velocity
    }
}

/// Отчёт внешнего resolver'а (Mover) о контактах за один move
///
/// Immutable value: ядро читает, никогда не мутирует и не «чинит».
#[derive(Debug, Clone, Copy, Default, PartialEq, Reflect)]
pub struct CollisionReport {
    pub above: bool,
    pub below: bool,
    pub left: bool,
    pub right: bool,
    /// Стоим на склоне круче walkable max — скользим вниз
    pub sliding_down_max_slope: bool,
    /// Нормаль опорной поверхности (валидна при контакте снизу)
    pub slope_normal: Vec2,
}

/// Kinematics state персонажа
///
/// Владеет эволюцией velocity; сбрасывается только при respawn'е.
/// `velocity.z` зарезервирован (не используется 2D-ядром).
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct CharacterMotion {
    pub velocity: Vec3,
    /// Память горизонтального smooth-фильтра
    pub velocity_x_smoothing: f32,
    pub wall_sliding: bool,
    /// -1 — стена слева, +1 — справа
    pub wall_direction_x: i32,
    /// Остаток grace-периода прилипания (s), >= 0
    pub time_to_wall_unstick: f32,
    pub facing_right: bool,
    /// Направленный input последнего тика, оси в [-1, 1]
    pub directional_input: Vec2,
    /// Отчёт последнего move — вход следующего тика
    pub collisions: CollisionReport,
}

impl Default for CharacterMotion {
    fn default() -> Self {
        Self {
            velocity: Vec3::ZERO,
            velocity_x_smoothing: 0.0,
            wall_sliding: false,
            wall_direction_x: 1,
            time_to_wall_unstick: 0.0,
            facing_right: true,
            directional_input: Vec2::ZERO,
            collisions: CollisionReport::default(),
        }
    }
}

/// World-space AABB тела после последнего move (читает камера)
#[derive(Component, Debug, Clone, Copy)]
pub struct BodyBounds(pub Rect);

/// Visual sink: ядро считает, presentation-слой читает
///
/// Аналог команды для tactical-слоя: ECS пишет, host рендерит
/// (sprite flip, airborne/run анимации). Ядро НЕ рендерит.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct AnimationState {
    pub airborne: bool,
    /// |velocity.x| (m/s) — выбор idle/walk/run
    pub ground_speed: f32,
    pub facing_right: bool,
}
