//! Shared domain — cross-cutting утилиты
//!
//! Содержит то, что нужно нескольким доменам:
//! - smoothing: критически демпфированные фильтры (kinematics + camera)

pub mod smoothing;

pub use smoothing::*;
