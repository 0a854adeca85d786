//! Dead-zone окно камеры

use bevy::prelude::*;

/// Окно, внутри которого цель двигается свободно
///
/// Сдвигается на минимальную величину, возвращающую bounds цели внутрь;
/// после construction только транслируется, никогда не меняет размер.
/// Инварианты: left <= right, bottom <= top.
#[derive(Debug, Clone, Copy)]
pub struct FocusArea {
    left: f32,
    right: f32,
    top: f32,
    bottom: f32,
    /// Середина окна (derived)
    pub center: Vec2,
    /// Сдвиг за последний Update; ноль если цель не выходила за края
    pub velocity: Vec2,
}

impl FocusArea {
    pub fn new(target_bounds: Rect, size: Vec2) -> Self {
        let left = target_bounds.center().x - size.x / 2.0;
        let right = left + size.x;
        let bottom = target_bounds.min.y;
        let top = bottom + size.y;

        let mut area = Self {
            left,
            right,
            top,
            bottom,
            center: Vec2::ZERO,
            velocity: Vec2::ZERO,
        };
        area.center = area.midpoint();
        area
    }

    fn midpoint(&self) -> Vec2 {
        Vec2::new(
            (self.left + self.right) / 2.0,
            (self.top + self.bottom) / 2.0,
        )
    }

    /// Один тик слежения за bounds цели
    ///
    /// По вертикали окно следит ТОЛЬКО за нижней кромкой цели
    /// (односторонняя dead zone, намеренно асимметричная).
    pub fn update(&mut self, target_bounds: Rect) {
        let mut shift_x = 0.0;
        if target_bounds.min.x < self.left {
            shift_x = target_bounds.min.x - self.left;
        } else if target_bounds.max.x > self.right {
            shift_x = target_bounds.max.x - self.right;
        }
        self.left += shift_x;
        self.right += shift_x;

        let mut shift_y = 0.0;
        if target_bounds.min.y < self.bottom {
            shift_y = target_bounds.min.y - self.bottom;
        } else if target_bounds.min.y > self.top {
            shift_y = target_bounds.min.y - self.top;
        }
        self.top += shift_y;
        self.bottom += shift_y;

        self.center = self.midpoint();
        self.velocity = Vec2::new(shift_x, shift_y);
    }

    /// Прямоугольник окна (debug overlay)
    pub fn rect(&self) -> Rect {
        Rect::new(self.left, self.bottom, self.right, self.top)
    }
}
