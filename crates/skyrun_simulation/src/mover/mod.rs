//! Граница с внешним collision resolver'ом (Mover)
//!
//! Hybrid split: ядро считает velocity (strategic layer), Mover
//! превращает запрошенный displacement в фактический с учётом геометрии
//! (tactical layer — Godot/Rapier/свой raycast-контроллер на стороне
//! host'а). Ядро НЕ занимается narrow-phase.
//!
//! Контракт: каждый вызов `move_body` продвигает мир; возвращённый
//! отчёт обязан отражать фактический resolved displacement (после
//! clamp'а об геометрию), включая нормаль склона и max-slope флаг.
//! Resolver может только укоротить запрос — нарушение логируется и
//! поднимается событием, ядро его не «чинит».

use bevy::prelude::*;

use crate::components::CollisionReport;

/// Результат одного move: фактический сдвиг + свежий отчёт о контактах
#[derive(Debug, Clone, Copy)]
pub struct MoveResult {
    pub displacement: Vec2,
    pub report: CollisionReport,
}

/// Внешний collision resolver
pub trait Mover: Send + Sync {
    /// Продвигает тело на `attempted` (может укоротить об геометрию),
    /// возвращает фактический сдвиг и отчёт о контактах.
    /// `input` прокидывается для resolver-специфичных решений
    /// (сквозные платформы и т.п.).
    fn move_body(&mut self, attempted: Vec2, input: Vec2) -> MoveResult;

    /// Текущий world-space AABB тела (после последнего move_body)
    fn bounds(&self) -> Rect;
}

/// Component-обёртка: персонаж владеет ссылкой на СВОЙ resolver
/// (dependency injection на construction, никаких implicit lookup'ов)
#[derive(Component)]
pub struct MoverHandle(pub Box<dyn Mover>);

/// Event: Mover вернул displacement, несовместимый с запросом
#[derive(Event, Debug, Clone)]
pub struct MoverContractViolation {
    pub entity: Entity,
    pub attempted: Vec2,
    pub resolved: Vec2,
}

/// Проверка контракта: resolver может только clamp'ить запрос —
/// усиление или разворот сдвига по любой оси означает нарушение.
pub fn violates_contract(attempted: Vec2, resolved: Vec2) -> bool {
    axis_violates(attempted.x, resolved.x) || axis_violates(attempted.y, resolved.y)
}

fn axis_violates(attempted: f32, resolved: f32) -> bool {
    const EPS: f32 = 1e-4;
    if resolved.abs() > attempted.abs() + EPS {
        return true;
    }
    resolved.abs() > EPS && attempted != 0.0 && (resolved > 0.0) != (attempted > 0.0)
}

const SKIN: f32 = 0.015;

/// Headless resolver: плоский мир из статических AABB
///
/// Аналог заглушки «интегрируем без полной физики»: пол/стены/потолки
/// без склонов (склоны — забота полноценного raycast-резолвера host'а).
/// Горизонтальный probe работает и при нулевом сдвиге — иначе контакт
/// со стеной терялся бы, пока wall-stick держит velocity.x на нуле.
pub struct FlatWorldMover {
    position: Vec2,
    half_extents: Vec2,
    solids: Vec<Rect>,
    /// Последнее ненулевое направление по X (для probe при dx == 0)
    face_dir: i32,
}

impl FlatWorldMover {
    pub fn new(position: Vec2, half_extents: Vec2) -> Self {
        Self {
            position,
            half_extents,
            solids: Vec::new(),
            face_dir: 1,
        }
    }

    pub fn with_solid(mut self, solid: Rect) -> Self {
        self.solids.push(solid);
        self
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    fn aabb(&self) -> Rect {
        Rect::from_center_half_size(self.position, self.half_extents)
    }

    fn sweep_x(&mut self, dx: f32, report: &mut CollisionReport) -> f32 {
        if dx != 0.0 {
            self.face_dir = if dx > 0.0 { 1 } else { -1 };
        }
        let dir = self.face_dir as f32;

        // Минимальная длина probe-луча 2*SKIN: контакт со стеной
        // детектируется и при нулевом горизонтальном сдвиге
        let mut ray_length = dx.abs() + SKIN;
        if dx.abs() < SKIN {
            ray_length = 2.0 * SKIN;
        }

        let body = self.aabb();
        let mut moved = dx;
        for solid in &self.solids {
            if solid.max.y <= body.min.y || solid.min.y >= body.max.y {
                continue;
            }
            let dist = if dir > 0.0 {
                solid.min.x - body.max.x
            } else {
                body.min.x - solid.max.x
            };
            if dist < 0.0 {
                continue;
            }
            if dist + SKIN < ray_length {
                ray_length = dist + SKIN;
                // probe-луч длиннее сдвига: сдвиг не удлиняем
                moved = dir * dist.min(dx.abs());
                if dir > 0.0 {
                    report.right = true;
                } else {
                    report.left = true;
                }
            }
        }

        if dx == 0.0 {
            0.0
        } else {
            moved
        }
    }

    fn sweep_y(&mut self, dy: f32, report: &mut CollisionReport) -> f32 {
        if dy == 0.0 {
            return 0.0;
        }
        let dir = if dy > 0.0 { 1.0 } else { -1.0 };
        let mut ray_length = dy.abs() + SKIN;

        let body = self.aabb();
        let mut moved = dy;
        for solid in &self.solids {
            if solid.max.x <= body.min.x || solid.min.x >= body.max.x {
                continue;
            }
            let dist = if dir > 0.0 {
                solid.min.y - body.max.y
            } else {
                body.min.y - solid.max.y
            };
            if dist < 0.0 {
                continue;
            }
            if dist + SKIN < ray_length {
                ray_length = dist + SKIN;
                moved = dir * dist;
                if dir > 0.0 {
                    report.above = true;
                } else {
                    report.below = true;
                }
            }
        }

        moved
    }
}

impl Mover for FlatWorldMover {
    fn move_body(&mut self, attempted: Vec2, _input: Vec2) -> MoveResult {
        let mut report = CollisionReport::default();

        let dx = self.sweep_x(attempted.x, &mut report);
        self.position.x += dx;
        let dy = self.sweep_y(attempted.y, &mut report);
        self.position.y += dy;

        if report.below {
            // Плоский мир: нормаль опоры всегда вертикальна
            report.slope_normal = Vec2::Y;
        }

        MoveResult {
            displacement: Vec2::new(dx, dy),
            report,
        }
    }

    fn bounds(&self) -> Rect {
        self.aabb()
    }
}
