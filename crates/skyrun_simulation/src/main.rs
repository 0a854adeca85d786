//! Headless симуляция SKYRUN
//!
//! Запускает Bevy App без рендера: плоский мир (пол + стена), персонаж
//! с заскриптованным input'ом (разбег → прыжок → к стене), камера ведёт.

use bevy::prelude::*;
use skyrun_simulation::{
    create_headless_app, log_info, step_fixed, BodyBounds, CameraRig, CameraTuning,
    CharacterMotion, FlatWorldMover, MotionConfig, MotionTuning, Mover, PlayerInputEvent,
    ScriptedInput, SimulationPlugin, SimulationSet,
};

fn demo_tape() -> ScriptedInput {
    let mut frames = Vec::new();
    // Секунда разбега вправо
    frames.extend(vec![PlayerInputEvent::direction(1.0, 0.0); 60]);
    // Прыжок, продолжая держать вправо
    frames.push(PlayerInputEvent {
        move_direction: Vec2::X,
        jump: true,
    });
    // Дальше к стене — прилипнем и сползём
    frames.extend(vec![PlayerInputEvent::direction(1.0, 0.0); 180]);
    // Wall jump от стены
    frames.push(PlayerInputEvent {
        move_direction: Vec2::new(-1.0, 0.0),
        jump: true,
    });
    frames.extend(vec![PlayerInputEvent::direction(-1.0, 0.0); 120]);
    ScriptedInput::new(frames)
}

fn main() {
    let seed = 42;
    println!("Starting SKYRUN headless simulation (seed: {})", seed);

    let mut app = create_headless_app(seed);
    app.add_plugins(SimulationPlugin);
    app.add_systems(
        FixedUpdate,
        skyrun_simulation::drive_scripted_input
            .in_set(SimulationSet::Input)
            .before(skyrun_simulation::apply_player_input),
    );
    app.insert_resource(demo_tape());

    // Мир: пол и стена справа
    let mover = FlatWorldMover::new(Vec2::new(0.0, 0.5), Vec2::new(0.3, 0.5))
        .with_solid(Rect::new(-50.0, -1.0, 50.0, 0.0))
        .with_solid(Rect::new(8.0, 0.0, 9.0, 12.0));
    let config = MotionConfig::new(MotionTuning::default()).expect("default tuning валиден");
    let bounds = mover.bounds();

    let character = app
        .world_mut()
        .spawn((
            Transform::from_translation(bounds.center().extend(0.0)),
            CharacterMotion::default(),
            config,
            skyrun_simulation::MoverHandle(Box::new(mover)),
            BodyBounds(bounds),
            skyrun_simulation::AnimationState::default(),
            skyrun_simulation::Player,
        ))
        .id();

    let rig = CameraRig::new(character, CameraTuning::default(), bounds)
        .expect("default camera tuning валиден");
    let camera_start = rig.focus_rect().center().extend(rig.depth());
    app.world_mut()
        .spawn((rig, Transform::from_translation(camera_start)));

    // 6 секунд симуляции
    for tick in 0..360 {
        step_fixed(&mut app);

        if tick % 60 == 0 {
            let mut characters = app
                .world_mut()
                .query::<(&Transform, &CharacterMotion)>();
            let mut rigs = app.world_mut().query::<(&CameraRig, &Transform)>();

            for (transform, motion) in characters.iter(app.world()) {
                log_info(&format!(
                    "tick {}: pos ({:.2}, {:.2}), vel ({:.2}, {:.2}), grounded {}, wall_sliding {}",
                    tick,
                    transform.translation.x,
                    transform.translation.y,
                    motion.velocity.x,
                    motion.velocity.y,
                    motion.collisions.below,
                    motion.wall_sliding,
                ));
            }
            for (rig, transform) in rigs.iter(app.world()) {
                log_info(&format!(
                    "tick {}: camera ({:.2}, {:.2}), look-ahead {:.2}",
                    tick,
                    transform.translation.x,
                    transform.translation.y,
                    rig.look_ahead_x(),
                ));
            }
        }
    }

    println!("Simulation complete!");
}
