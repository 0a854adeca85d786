//! Camera follow domain
//!
//! - focus_area: dead-zone окно (сдвигается только когда цель выходит
//!   за края, сдвиг за кадр = velocity-сигнал)
//! - follow: look-ahead + вертикальный демпфер поверх FocusArea

pub mod focus_area;
pub mod follow;

pub use focus_area::FocusArea;
pub use follow::{camera_follow, spawn_camera_rig, CameraFollowPlugin, CameraRig};
