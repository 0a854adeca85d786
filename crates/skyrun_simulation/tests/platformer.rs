//! Интеграционные прогоны: персонаж + FlatWorldMover + камера
//!
//! Закрытый цикл: каждый тик решаем input по наблюдаемому состоянию,
//! шлём event как host, шагаем фиксированный тик.

use bevy::prelude::*;
use skyrun_simulation::{
    create_headless_app, step_fixed, AnimationState, BodyBounds, CameraRig, CameraTuning,
    CharacterMotion, FlatWorldMover, MotionConfig, MotionTuning, Mover, MoverContractViolation,
    MoverHandle, MoveResult, Player, PlayerInputEvent, SimulationPlugin,
};

struct TestWorld {
    app: App,
    character: Entity,
    camera: Entity,
}

impl TestWorld {
    fn new(mover: FlatWorldMover) -> Self {
        let mut app = create_headless_app(1);
        app.add_plugins(SimulationPlugin);

        let config = MotionConfig::new(MotionTuning::default()).unwrap();
        let bounds = mover.bounds();

        let character = app
            .world_mut()
            .spawn((
                Transform::from_translation(bounds.center().extend(0.0)),
                CharacterMotion::default(),
                config,
                MoverHandle(Box::new(mover)),
                BodyBounds(bounds),
                AnimationState::default(),
                Player,
            ))
            .id();

        let rig = CameraRig::new(character, CameraTuning::default(), bounds).unwrap();
        let start = rig.focus_rect().center().extend(rig.depth());
        let camera = app
            .world_mut()
            .spawn((rig, Transform::from_translation(start)))
            .id();

        Self {
            app,
            character,
            camera,
        }
    }

    fn tick(&mut self, input: PlayerInputEvent) {
        self.app.world_mut().send_event(input);
        step_fixed(&mut self.app);
    }

    fn motion(&self) -> CharacterMotion {
        self.app
            .world()
            .entity(self.character)
            .get::<CharacterMotion>()
            .unwrap()
            .clone()
    }

    fn character_pos(&self) -> Vec3 {
        self.app
            .world()
            .entity(self.character)
            .get::<Transform>()
            .unwrap()
            .translation
    }

    fn animation(&self) -> AnimationState {
        *self
            .app
            .world()
            .entity(self.character)
            .get::<AnimationState>()
            .unwrap()
    }

    fn camera_pos(&self) -> Vec3 {
        self.app
            .world()
            .entity(self.camera)
            .get::<Transform>()
            .unwrap()
            .translation
    }
}

fn floor_world(start: Vec2) -> FlatWorldMover {
    FlatWorldMover::new(start, Vec2::new(0.3, 0.5)).with_solid(Rect::new(-50.0, -1.0, 50.0, 0.0))
}

const HOLD_RIGHT: PlayerInputEvent = PlayerInputEvent {
    move_direction: Vec2::new(1.0, 0.0),
    jump: false,
};
const IDLE: PlayerInputEvent = PlayerInputEvent {
    move_direction: Vec2::new(0.0, 0.0),
    jump: false,
};

#[test]
fn test_walk_accelerates_to_move_speed() {
    let mut world = TestWorld::new(floor_world(Vec2::new(0.0, 0.5)));
    let start_x = world.character_pos().x;

    for _ in 0..120 {
        world.tick(HOLD_RIGHT);
    }

    let motion = world.motion();
    let animation = world.animation();

    assert!(motion.collisions.below, "персонаж должен стоять на полу");
    assert!(
        motion.velocity.x > 0.9 * motion.directional_input.x * 6.0,
        "velocity.x = {} не разогналась",
        motion.velocity.x
    );
    assert!(world.character_pos().x > start_x + 5.0);
    assert!(!animation.airborne);
    assert!(animation.facing_right);
    assert!((animation.ground_speed - motion.velocity.x.abs()).abs() < 1e-5);
}

#[test]
fn test_jump_arc_peaks_near_jump_height() {
    let mut world = TestWorld::new(floor_world(Vec2::new(0.0, 0.5)));

    // Осесть на пол
    for _ in 0..10 {
        world.tick(IDLE);
    }
    let ground_y = world.character_pos().y;
    assert!(world.motion().collisions.below);

    world.tick(PlayerInputEvent {
        move_direction: Vec2::ZERO,
        jump: true,
    });
    assert!(world.motion().velocity.y > 0.0, "прыжок не стартовал");

    let mut peak = ground_y;
    for _ in 0..120 {
        world.tick(IDLE);
        peak = peak.max(world.character_pos().y);
    }

    // jump_height = 4 c дискретизацией Эйлера на 60Hz
    let height = peak - ground_y;
    assert!(
        (3.4..=4.2).contains(&height),
        "высота прыжка {} вне ожидаемого диапазона",
        height
    );
    // Вернулись на пол
    assert!(world.motion().collisions.below);
    assert!((world.character_pos().y - ground_y).abs() < 0.05);
}

#[test]
fn test_airborne_flag_during_jump() {
    let mut world = TestWorld::new(floor_world(Vec2::new(0.0, 0.5)));

    for _ in 0..10 {
        world.tick(IDLE);
    }
    world.tick(PlayerInputEvent {
        move_direction: Vec2::ZERO,
        jump: true,
    });
    world.tick(IDLE);

    assert!(world.animation().airborne);
}

#[test]
fn test_wall_slide_clamps_descent_and_wall_jump_releases() {
    // Стена справа от точки спавна, персонаж в воздухе
    let mover = floor_world(Vec2::new(4.0, 8.0)).with_solid(Rect::new(5.0, 0.0, 6.0, 12.0));
    let mut world = TestWorld::new(mover);
    let config = MotionConfig::new(MotionTuning::default()).unwrap();

    // Летим вправо до стены, пока не начнём скользить
    let mut slide_ticks = 0;
    let mut clamped_descent = true;
    for _ in 0..240 {
        world.tick(HOLD_RIGHT);
        let motion = world.motion();
        if motion.wall_sliding {
            slide_ticks += 1;
            // clamp + гравитация одного тика сверху
            let limit = config.tuning.wall_slide_speed_max + config.gravity().abs() / 60.0 + 1e-3;
            if motion.velocity.y < -limit {
                clamped_descent = false;
            }
        }
        if slide_ticks >= 10 {
            break;
        }
    }

    assert!(slide_ticks >= 10, "скольжение по стене не началось");
    assert!(clamped_descent, "спуск по стене не ограничен");
    let motion = world.motion();
    assert_eq!(motion.wall_direction_x, 1);
    // Wall-stick: горизонталь пригвождена пока держим к стене
    assert_eq!(motion.velocity.x, 0.0);

    // Прыжок, продолжая давить в стену → climb: от стены и вверх
    world.tick(PlayerInputEvent {
        move_direction: Vec2::new(1.0, 0.0),
        jump: true,
    });
    let after_jump = world.motion();
    assert!(after_jump.velocity.y > 0.0);
    assert!(after_jump.velocity.x < 0.0, "climb должен оттолкнуть от стены");
}

#[test]
fn test_camera_dead_zone_then_follow() {
    let mut world = TestWorld::new(floor_world(Vec2::new(0.0, 0.5)));
    let camera_x0 = world.camera_pos().x;

    // Пара тиков: персонаж ещё глубоко в dead zone
    for _ in 0..5 {
        world.tick(HOLD_RIGHT);
    }
    assert_eq!(
        world.camera_pos().x,
        camera_x0,
        "камера дёрнулась внутри dead zone"
    );

    // Долгий разбег: окно толкается, камера едет, look-ahead растёт
    for _ in 0..115 {
        world.tick(HOLD_RIGHT);
    }
    let camera_mid = world.camera_pos().x;
    assert!(camera_mid > camera_x0);

    for _ in 0..120 {
        world.tick(HOLD_RIGHT);
    }
    let camera_late = world.camera_pos().x;
    assert!(camera_late > camera_mid);

    let rig = world
        .app
        .world()
        .entity(world.camera)
        .get::<CameraRig>()
        .unwrap();
    assert!(rig.look_ahead_x() > 0.0);
    assert!(rig.look_ahead_x() <= 4.0 + 1e-3);

    // Глубина фиксирована за сценой
    assert_eq!(world.camera_pos().z, -10.0);
}

/// Resolver-нарушитель: возвращает сдвиг больше запрошенного
struct CheatingMover {
    inner: FlatWorldMover,
}

impl Mover for CheatingMover {
    fn move_body(&mut self, attempted: Vec2, input: Vec2) -> MoveResult {
        let mut result = self.inner.move_body(attempted, input);
        result.displacement = attempted * 2.0 + Vec2::new(0.1, -0.1);
        result
    }

    fn bounds(&self) -> Rect {
        self.inner.bounds()
    }
}

#[test]
fn test_mover_contract_violation_is_surfaced() {
    let mut app = create_headless_app(1);
    app.add_plugins(SimulationPlugin);

    let inner = floor_world(Vec2::new(0.0, 5.0));
    let config = MotionConfig::new(MotionTuning::default()).unwrap();
    let bounds = inner.bounds();

    app.world_mut().spawn((
        Transform::from_translation(bounds.center().extend(0.0)),
        CharacterMotion::default(),
        config,
        MoverHandle(Box::new(CheatingMover { inner })),
        BodyBounds(bounds),
        AnimationState::default(),
        Player,
    ));

    step_fixed(&mut app);

    let events = app.world().resource::<Events<MoverContractViolation>>();
    assert!(
        !events.is_empty(),
        "нарушение контракта Mover'а не поднято событием"
    );
}
