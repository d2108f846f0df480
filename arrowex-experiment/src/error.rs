//! Configuration error types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("motion percent set is empty")]
    NoMotionPercents,

    #[error("motion percent {0} exceeds 100")]
    MotionPercentOutOfRange(u8),

    #[error("repetitions must be positive")]
    NoRepetitions,

    #[error("element count must be positive")]
    NoElements,

    #[error("tick rate must be positive, got {0}")]
    InvalidTickRate(f64),

    #[error("minimum separation must be non-negative, got {0}")]
    InvalidSeparation(f64),

    #[error("field bounds are inverted: x {x_min}..={x_max}, y {y_min}..={y_max}")]
    InvertedBounds {
        x_min: i32,
        x_max: i32,
        y_min: i32,
        y_max: i32,
    },
}
