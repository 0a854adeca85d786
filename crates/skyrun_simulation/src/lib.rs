//! SKYRUN Simulation Core
//!
//! ECS-ядро движения 2D-платформера на Bevy 0.16 (strategic layer):
//! kinematics персонажа (gravity, jump, wall slide/jump, склоны) и
//! camera follow (dead zone + look-ahead + вертикальный демпфер).
//!
//! HYBRID ARCHITECTURE:
//! - ECS = strategic layer (velocity evolution, state machines, camera)
//! - Mover = tactical layer (collision resolution на стороне host'а:
//!   Godot/Rapier/свой raycast-контроллер); headless-реализация
//!   FlatWorldMover прилагается для тестов и прогонов без host'а

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod camera;
pub mod components;
pub mod input;
pub mod logger;
pub mod movement;
pub mod mover;
pub mod physics;
pub mod shared;

// Re-export базовых типов для удобства
pub use camera::{camera_follow, spawn_camera_rig, CameraFollowPlugin, CameraRig, FocusArea};
pub use components::*;
pub use input::{
    apply_player_input, drive_scripted_input, PlayerInputEvent, PlayerInputPlugin, ScriptedInput,
};
pub use logger::*;
pub use mover::{
    violates_contract, FlatWorldMover, MoveResult, Mover, MoverContractViolation, MoverHandle,
};
pub use physics::{character_kinematics, spawn_platformer_character, KinematicsPlugin};
pub use shared::smoothing::smooth_damp;

// Re-export events
pub use movement::JumpIntent;

/// Порядок внутри фиксированного тика: input → kinematics → camera
///
/// Kinematics обязан полностью отработать (включая Mover) до того, как
/// камера прочитает bounds персонажа — иначе камера отстаёт на кадр.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    Input,
    Kinematics,
    Camera,
}

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app
            // Fixed timestep 60Hz для simulation tick
            .insert_resource(Time::<Fixed>::from_hz(60.0))
            .configure_sets(
                FixedUpdate,
                (
                    SimulationSet::Input,
                    SimulationSet::Kinematics,
                    SimulationSet::Camera,
                )
                    .chain(),
            )
            .add_plugins((PlayerInputPlugin, KinematicsPlugin, CameraFollowPlugin));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(60.0));

    app
}

/// Прогоняет ровно один фиксированный тик симуляции
///
/// `app.update()` завязан на wall-clock (accumulator в Time<Fixed>) —
/// для детерминизма headless-прогоны шагают FixedUpdate напрямую.
pub fn step_fixed(app: &mut App) {
    let period = app.world().resource::<Time<Fixed>>().timestep();
    app.world_mut()
        .resource_mut::<Time<Fixed>>()
        .advance_by(period);
    app.world_mut().run_schedule(FixedUpdate);
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    // Сериализуем в байты через Debug (простейший способ)
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
