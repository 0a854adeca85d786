//! Kinematics персонажа — state machine движения
//!
//! Состояния за тик (не взаимоисключающие): Grounded, Airborne,
//! WallSliding, WallStuck. Порядок переходов фиксирован:
//! 1. целевая горизонтальная скорость (smooth damp к input.x * speed)
//! 2. разворот facing
//! 3. wall slide: детект, clamp спуска, stick-таймер
//! 4. (edge) jump intent — видит УЖЕ обновлённое wall/ground состояние
//! 5. гравитация
//! 6. move через внешний Mover
//! 7. пост-коррекция velocity.y по отчёту (включая max-slope bleed)
//!
//! Вся логика — методы на CharacterMotion (тестируются без App),
//! система — тонкая обёртка в FixedUpdate.

use bevy::prelude::*;

use crate::components::{
    AnimationState, BodyBounds, CharacterMotion, CollisionReport, MotionConfig,
};
use crate::movement::JumpIntent;
use crate::mover::{violates_contract, MoverContractViolation, MoverHandle};
use crate::shared::smoothing::smooth_damp;
use crate::SimulationSet;

impl CharacterMotion {
    /// Шаг 1: velocity.x демпфируется к input.x * move_speed.
    /// Константа разгона зависит от опоры (земля/воздух) по отчёту
    /// ПРОШЛОГО move — свежего ещё нет.
    pub fn calculate_horizontal(&mut self, config: &MotionConfig, dt: f32) {
        let target_vx = self.directional_input.x * config.tuning.move_speed;
        let smooth_time = if self.collisions.below {
            config.tuning.acceleration_time_grounded
        } else {
            config.tuning.acceleration_time_airborne
        };
        self.velocity.x = smooth_damp(
            self.velocity.x,
            target_vx,
            &mut self.velocity_x_smoothing,
            smooth_time,
            dt,
        );
    }

    /// Шаг 2: facing переключается при смене знака input.x
    pub fn update_facing(&mut self) {
        if self.directional_input.x > 0.0 {
            self.facing_right = true;
        } else if self.directional_input.x < 0.0 {
            self.facing_right = false;
        }
    }

    /// Input активно «отдирает» персонажа от стены?
    fn peeling_off_wall(&self) -> bool {
        self.directional_input.x != 0.0
            && (self.directional_input.x > 0.0) != (self.wall_direction_x > 0)
    }

    /// Шаг 3: wall slide + stick-таймер
    ///
    /// Слайдим когда есть боковой контакт, нет опоры и падаем. Пока
    /// таймер > 0, горизонталь (и память её фильтра) пригвождена к
    /// нулю; таймер тает только под противоположным input'ом. На нуле
    /// контроль возвращается; таймер взводится заново, когда input
    /// перестаёт отталкиваться или контакт со стеной кончается.
    pub fn handle_wall_sliding(&mut self, config: &MotionConfig, dt: f32) {
        self.wall_direction_x = if self.collisions.left { -1 } else { 1 };
        let touching_wall = self.collisions.left || self.collisions.right;
        self.wall_sliding = touching_wall && !self.collisions.below && self.velocity.y < 0.0;

        if self.wall_sliding {
            if self.velocity.y < -config.tuning.wall_slide_speed_max {
                self.velocity.y = -config.tuning.wall_slide_speed_max;
            }

            if self.time_to_wall_unstick > 0.0 {
                self.velocity_x_smoothing = 0.0;
                self.velocity.x = 0.0;
                if self.peeling_off_wall() {
                    self.time_to_wall_unstick = (self.time_to_wall_unstick - dt).max(0.0);
                } else {
                    self.time_to_wall_unstick = config.tuning.wall_stick_time;
                }
            } else if !self.peeling_off_wall() {
                self.time_to_wall_unstick = config.tuning.wall_stick_time;
            }
        } else {
            self.time_to_wall_unstick = config.tuning.wall_stick_time;
        }
    }

    /// Edge-triggered прыжок. Вызывается между wall slide и гравитацией.
    ///
    /// - wall slide: три ветки по знаку input.x против стены
    ///   (climb / off / leap)
    /// - на земле: обычный вертикальный прыжок; на max-склоне — вдоль
    ///   нормали, и только если не прыгаем в лицо склону
    /// - в воздухе без стены: no-op (двойного прыжка нет)
    pub fn jump(&mut self, config: &MotionConfig) {
        let tuning = &config.tuning;

        if self.wall_sliding {
            let wall_dir = self.wall_direction_x as f32;
            let input_x = self.directional_input.x;
            if input_x != 0.0 && (input_x > 0.0) == (self.wall_direction_x > 0) {
                // карабкаемся в стену
                self.velocity.x = -wall_dir * tuning.wall_jump_climb.x;
                self.velocity.y = tuning.wall_jump_climb.y;
            } else if input_x == 0.0 {
                self.velocity.x = -wall_dir * tuning.wall_jump_off.x;
                self.velocity.y = tuning.wall_jump_off.y;
            } else {
                self.velocity.x = -wall_dir * tuning.wall_leap.x;
                self.velocity.y = tuning.wall_leap.y;
            }
        } else if self.collisions.below {
            if self.collisions.sliding_down_max_slope {
                let normal = self.collisions.slope_normal;
                let input_x = self.directional_input.x;
                let into_face =
                    input_x != 0.0 && (input_x > 0.0) != (normal.x > 0.0);
                if !into_face {
                    // прыжок уходит вдоль нормали — дуга согласована со склоном
                    self.velocity.x = config.jump_velocity() * normal.x;
                    self.velocity.y = config.jump_velocity() * normal.y;
                }
            } else {
                self.velocity.y = config.jump_velocity();
            }
        }
    }

    /// Шаг 5: интеграция гравитации
    pub fn apply_gravity(&mut self, config: &MotionConfig, dt: f32) {
        self.velocity.y += config.gravity() * dt;
    }

    /// Шаг 7: пост-коррекция по свежему отчёту Mover'а
    ///
    /// Контакт сверху/снизу гасит velocity.y; на слишком крутом склоне
    /// вместо обнуления стравливаем её вдоль нормали — персонаж
    /// продолжает съезжать, не залипая.
    pub fn settle_after_move(&mut self, config: &MotionConfig, report: CollisionReport, dt: f32) {
        self.collisions = report;
        if report.above || report.below {
            if report.sliding_down_max_slope {
                self.velocity.y += report.slope_normal.y * -config.gravity() * dt;
            } else {
                self.velocity.y = 0.0;
            }
        }
    }
}

/// Система: полный тик kinematics для каждого персонажа
///
/// Некорректный dt (NaN/Inf/отрицательный) отбрасывает тик целиком —
/// состояние фильтров не трогаем. dt == 0 валиден: непрерывное
/// состояние замирает, но edge-события (прыжок) регистрируются.
pub fn character_kinematics(
    time: Res<Time<Fixed>>,
    mut jump_events: EventReader<JumpIntent>,
    mut violations: EventWriter<MoverContractViolation>,
    mut query: Query<(
        Entity,
        &MotionConfig,
        &mut CharacterMotion,
        &mut MoverHandle,
        &mut BodyBounds,
        &mut AnimationState,
        &mut Transform,
    )>,
) {
    let dt = time.delta_secs();
    if !dt.is_finite() || dt < 0.0 {
        crate::log_warning(&format!("kinematics: отброшен тик с dt = {dt}"));
        return;
    }

    let jumpers: Vec<Entity> = jump_events.read().map(|event| event.entity).collect();

    for (entity, config, mut motion, mut mover, mut bounds, mut animation, mut transform) in
        query.iter_mut()
    {
        motion.calculate_horizontal(config, dt);
        motion.update_facing();
        motion.handle_wall_sliding(config, dt);
        if jumpers.contains(&entity) {
            motion.jump(config);
        }
        motion.apply_gravity(config, dt);

        let attempted = motion.velocity.truncate() * dt;
        let result = mover.0.move_body(attempted, motion.directional_input);
        if violates_contract(attempted, result.displacement) {
            crate::log_error(&format!(
                "Mover contract: запросили {:?}, получили {:?} (entity {:?})",
                attempted, result.displacement, entity
            ));
            violations.write(MoverContractViolation {
                entity,
                attempted,
                resolved: result.displacement,
            });
        }
        motion.settle_after_move(config, result.report, dt);

        let aabb = mover.0.bounds();
        bounds.0 = aabb;
        transform.translation.x = aabb.center().x;
        transform.translation.y = aabb.center().y;

        animation.airborne = !motion.collisions.below;
        animation.ground_speed = motion.velocity.x.abs();
        animation.facing_right = motion.facing_right;
    }
}

/// Plugin kinematics: события + система в Kinematics set
pub struct KinematicsPlugin;

impl Plugin for KinematicsPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<JumpIntent>()
            .add_event::<MoverContractViolation>()
            .add_systems(
                FixedUpdate,
                character_kinematics.in_set(SimulationSet::Kinematics),
            );
    }
}

/// Spawn helper: персонаж с полным набором компонентов
///
/// Mover инжектится на construction (персонаж владеет своим resolver'ом).
pub fn spawn_platformer_character(
    commands: &mut Commands,
    config: MotionConfig,
    mover: Box<dyn crate::mover::Mover>,
) -> Entity {
    let bounds = mover.bounds();
    commands
        .spawn((
            Transform::from_translation(bounds.center().extend(0.0)),
            CharacterMotion::default(),
            config,
            MoverHandle(mover),
            BodyBounds(bounds),
            AnimationState::default(),
            crate::components::Player,
        ))
        .id()
}
