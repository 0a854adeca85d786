//! Camera follow: look-ahead + вертикальный демпфер
//!
//! Поверх FocusArea два независимых фильтра:
//! - горизонтальный look-ahead: окно сдвинулось → запоминаем
//!   направление; пока input совпадает с движением, целимся в полный
//!   look_ahead_distance_x; на отпускании input'а один раз доводим цель
//!   на четверть остатка (latch через look_ahead_stopped)
//! - вертикаль: демпфируем камеру к center.y + vertical_offset
//!
//! У каждой оси СВОЙ smooth-аккумулятор. Камера выполняется после
//! kinematics того же тика, иначе отстаёт на кадр.

use bevy::prelude::*;

use crate::camera::focus_area::FocusArea;
use crate::components::{BodyBounds, CameraTuning, CharacterMotion, ConfigError};
use crate::shared::smoothing::smooth_damp;
use crate::SimulationSet;

/// Camera rig: состояние слежения за одним персонажем
#[derive(Component, Debug)]
pub struct CameraRig {
    /// Кого ведём (entity с BodyBounds + CharacterMotion)
    pub target: Entity,
    tuning: CameraTuning,
    focus_area: FocusArea,
    current_look_ahead_x: f32,
    target_look_ahead_x: f32,
    look_ahead_direction_x: f32,
    look_ahead_stopped: bool,
    smooth_look_velocity_x: f32,
    /// Отдельный аккумулятор вертикали — НЕ делит состояние с X
    smooth_velocity_y: f32,
}

impl CameraRig {
    pub fn new(
        target: Entity,
        tuning: CameraTuning,
        target_bounds: Rect,
    ) -> Result<Self, ConfigError> {
        tuning.validate()?;
        Ok(Self {
            target,
            tuning,
            focus_area: FocusArea::new(target_bounds, tuning.focus_area_size),
            current_look_ahead_x: 0.0,
            target_look_ahead_x: 0.0,
            look_ahead_direction_x: 0.0,
            look_ahead_stopped: false,
            smooth_look_velocity_x: 0.0,
            smooth_velocity_y: 0.0,
        })
    }

    /// Один тик слежения; возвращает позицию камеры (x, y)
    ///
    /// `current_y` — текущая вертикаль камеры (вход демпфера).
    pub fn step(&mut self, dt: f32, target_bounds: Rect, raw_input_x: f32, current_y: f32) -> Vec2 {
        self.focus_area.update(target_bounds);

        if self.focus_area.velocity.x != 0.0 {
            self.look_ahead_direction_x = self.focus_area.velocity.x.signum();
            let input_matches = raw_input_x != 0.0
                && (raw_input_x > 0.0) == (self.focus_area.velocity.x > 0.0);

            if input_matches {
                self.look_ahead_stopped = false;
                self.target_look_ahead_x =
                    self.look_ahead_direction_x * self.tuning.look_ahead_distance_x;
            } else if !self.look_ahead_stopped {
                // Одноразовая доводка на четверть остатка
                self.look_ahead_stopped = true;
                self.target_look_ahead_x = self.current_look_ahead_x
                    + (self.look_ahead_direction_x * self.tuning.look_ahead_distance_x
                        - self.current_look_ahead_x)
                        / 4.0;
            }
        }

        self.current_look_ahead_x = smooth_damp(
            self.current_look_ahead_x,
            self.target_look_ahead_x,
            &mut self.smooth_look_velocity_x,
            self.tuning.look_smooth_time_x,
            dt,
        );

        let target_y = self.focus_area.center.y + self.tuning.vertical_offset;
        let y = smooth_damp(
            current_y,
            target_y,
            &mut self.smooth_velocity_y,
            self.tuning.vertical_smooth_time,
            dt,
        );

        Vec2::new(self.focus_area.center.x + self.current_look_ahead_x, y)
    }

    /// Текущий look-ahead сдвиг (сглаженный)
    pub fn look_ahead_x(&self) -> f32 {
        self.current_look_ahead_x
    }

    /// Фиксированная глубина камеры
    pub fn depth(&self) -> f32 {
        self.tuning.depth
    }

    /// Прямоугольник dead zone (debug overlay)
    pub fn focus_rect(&self) -> Rect {
        self.focus_area.rect()
    }
}

/// Система: слежение после kinematics того же тика
pub fn camera_follow(
    time: Res<Time<Fixed>>,
    targets: Query<(&BodyBounds, &CharacterMotion)>,
    mut rigs: Query<(&mut CameraRig, &mut Transform), Without<CharacterMotion>>,
) {
    let dt = time.delta_secs();
    if !dt.is_finite() || dt < 0.0 {
        // kinematics уже предупредил — просто не трогаем состояние
        return;
    }

    for (mut rig, mut transform) in rigs.iter_mut() {
        let Ok((bounds, motion)) = targets.get(rig.target) else {
            continue;
        };
        let position = rig.step(
            dt,
            bounds.0,
            motion.directional_input.x,
            transform.translation.y,
        );
        transform.translation = position.extend(rig.depth());
    }
}

/// Plugin camera follow: система в Camera set
pub struct CameraFollowPlugin;

impl Plugin for CameraFollowPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(FixedUpdate, camera_follow.in_set(SimulationSet::Camera));
    }
}

/// Spawn helper: rig + transform на глубине за сценой
pub fn spawn_camera_rig(
    commands: &mut Commands,
    target: Entity,
    tuning: CameraTuning,
    target_bounds: Rect,
) -> Result<Entity, ConfigError> {
    let rig = CameraRig::new(target, tuning, target_bounds)?;
    let start = rig.focus_rect().center().extend(tuning.depth);
    Ok(commands.spawn((rig, Transform::from_translation(start))).id())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn body_at(x: f32) -> Rect {
        Rect::from_center_half_size(Vec2::new(x, 0.0), Vec2::new(0.3, 0.5))
    }

    fn rig() -> CameraRig {
        CameraRig::new(Entity::PLACEHOLDER, CameraTuning::default(), body_at(0.0)).unwrap()
    }

    #[test]
    fn test_look_ahead_converges_toward_distance() {
        let mut rig = rig();
        let distance = rig.tuning.look_ahead_distance_x;

        // Цель едет вправо, input вправо: окно толкается каждый тик
        let mut x = 0.0;
        let mut previous = rig.look_ahead_x();
        for _ in 0..240 {
            x += 0.1;
            rig.step(DT, body_at(x), 1.0, 0.0);
            // Монотонно к +distance, без overshoot'а
            assert!(rig.look_ahead_x() >= previous - 1e-5);
            assert!(rig.look_ahead_x() <= distance + 1e-3);
            previous = rig.look_ahead_x();
        }

        assert!((rig.look_ahead_x() - distance).abs() < 0.3);
    }

    #[test]
    fn test_look_ahead_sign_matches_direction() {
        let mut rig = rig();

        let mut x = 0.0;
        for _ in 0..60 {
            x -= 0.1;
            rig.step(DT, body_at(x), -1.0, 0.0);
        }

        assert!(rig.look_ahead_x() < 0.0);
    }

    #[test]
    fn test_release_latches_quarter_ease_once() {
        let mut rig = rig();

        let mut x = 0.0;
        for _ in 0..30 {
            x += 0.1;
            rig.step(DT, body_at(x), 1.0, 0.0);
        }

        // Отпустили input, окно ещё движется (по инерции цели)
        x += 0.05;
        rig.step(DT, body_at(x), 0.0, 0.0);
        assert!(rig.look_ahead_stopped);
        let latched_target = rig.target_look_ahead_x;

        // Повторные тики со стоп-состоянием не перетриггеривают доводку
        x += 0.05;
        rig.step(DT, body_at(x), 0.0, 0.0);
        x += 0.05;
        rig.step(DT, body_at(x), 0.0, 0.0);
        assert_eq!(rig.target_look_ahead_x, latched_target);
    }

    #[test]
    fn test_zero_dt_freezes_smoothing() {
        let mut rig = rig();

        let mut x = 0.0;
        for _ in 0..30 {
            x += 0.1;
            rig.step(DT, body_at(x), 1.0, 0.0);
        }
        let look_ahead = rig.look_ahead_x();
        let vel_x = rig.smooth_look_velocity_x;
        let vel_y = rig.smooth_velocity_y;

        // dt = 0: непрерывное состояние замирает
        let position = rig.step(0.0, body_at(x), 1.0, 5.0);
        assert_eq!(rig.look_ahead_x(), look_ahead);
        assert_eq!(rig.smooth_look_velocity_x, vel_x);
        assert_eq!(rig.smooth_velocity_y, vel_y);
        assert_eq!(position.y, 5.0);
    }

    #[test]
    fn test_vertical_damps_toward_offset_focus() {
        let mut rig = rig();
        let offset = rig.tuning.vertical_offset;
        let focus_y = rig.focus_rect().center().y;

        let mut y = -3.0;
        for _ in 0..120 {
            y = rig.step(DT, body_at(0.0), 0.0, y).y;
        }

        assert!((y - (focus_y + offset)).abs() < 0.1);
    }

    #[test]
    fn test_axes_do_not_share_accumulators() {
        let mut rig = rig();

        // Вертикаль активно демпфирует, горизонталь в покое
        let mut y = 10.0;
        for _ in 0..30 {
            y = rig.step(DT, body_at(0.0), 0.0, y).y;
        }

        assert!(rig.smooth_velocity_y != 0.0);
        assert_eq!(rig.smooth_look_velocity_x, 0.0);
        assert_eq!(rig.look_ahead_x(), 0.0);
    }

    #[test]
    fn test_still_target_keeps_camera_x() {
        let mut rig = rig();
        let x0 = rig.step(DT, body_at(0.5), 1.0, 0.0).x;

        // Цель внутри dead zone — окно и look-ahead не трогаются
        for _ in 0..30 {
            let x = rig.step(DT, body_at(0.5), 1.0, 0.0).x;
            assert_eq!(x, x0);
        }
    }
}
