//! Критически демпфированное сглаживание
//!
//! Exponential smoothing к target через spring-damper в критическом
//! режиме: сходится без overshoot'а, скорость фильтра живёт в отдельном
//! аккумуляторе у вызывающего. Каждый сглаживаемый канал обязан иметь
//! СВОЙ аккумулятор — фильтры не делят состояние.

/// Один шаг фильтра.
///
/// `smooth_time` — характерное время сходимости (сек), `velocity` —
/// память фильтра между тиками. При `dt == 0` состояние не меняется.
pub fn smooth_damp(
    current: f32,
    target: f32,
    velocity: &mut f32,
    smooth_time: f32,
    dt: f32,
) -> f32 {
    // smooth_time == 0 трактуем как "почти мгновенно", не делим на ноль
    let smooth_time = smooth_time.max(1e-4);
    let omega = 2.0 / smooth_time;

    let x = omega * dt;
    // Паде-аппроксимация exp(-x): стабильна при больших dt
    let exp = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

    let change = current - target;
    let temp = (*velocity + omega * change) * dt;
    *velocity = (*velocity - omega * temp) * exp;
    let mut output = target + (change + temp) * exp;

    // Запрет overshoot'а: если перескочили target — прижимаем
    if (target - current > 0.0) == (output > target) && dt > 0.0 {
        output = target;
        *velocity = (output - target) / dt;
    }

    output
}
