//! Camera tuning
//!
//! Designer-facing параметры слежения. State камеры (CameraRig) живёт
//! в camera/follow.rs — здесь только данные конфигурации.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::motion::ConfigError;

/// Параметры camera follow
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CameraTuning {
    /// Размер dead-zone окна (world units)
    pub focus_area_size: Vec2,
    /// Вертикальный сдвиг точки фокуса над окном
    pub vertical_offset: f32,
    /// Горизонтальный look-ahead по направлению движения
    pub look_ahead_distance_x: f32,
    /// Время сходимости look-ahead фильтра (s)
    pub look_smooth_time_x: f32,
    /// Время сходимости вертикального демпфера (s)
    pub vertical_smooth_time: f32,
    /// Фиксированная глубина камеры за сценой (z)
    pub depth: f32,
}

impl Default for CameraTuning {
    fn default() -> Self {
        Self {
            focus_area_size: Vec2::new(3.0, 5.0),
            vertical_offset: 1.0,
            look_ahead_distance_x: 4.0,
            look_smooth_time_x: 0.5,
            vertical_smooth_time: 0.2,
            depth: -10.0,
        }
    }
}

impl CameraTuning {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.focus_area_size.x.is_finite()
            || !self.focus_area_size.y.is_finite()
            || self.focus_area_size.x < 0.0
            || self.focus_area_size.y < 0.0
        {
            return Err(ConfigError::InvalidVector {
                name: "focus_area_size",
                x: self.focus_area_size.x,
                y: self.focus_area_size.y,
            });
        }
        // vertical_offset и depth легально отрицательные — только конечность
        for (name, value) in [
            ("vertical_offset", self.vertical_offset),
            ("look_ahead_distance_x", self.look_ahead_distance_x),
            ("depth", self.depth),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { name, value });
            }
        }
        for (name, value) in [
            ("look_smooth_time_x", self.look_smooth_time_x),
            ("vertical_smooth_time", self.vertical_smooth_time),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidScalar { name, value });
            }
        }
        Ok(())
    }
}
