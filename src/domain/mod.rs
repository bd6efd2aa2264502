// Domain layer - Data shapes and pure rules, no I/O
pub mod chart;
pub mod control;
pub mod dashboard;
pub mod error;
pub mod grid;
pub mod percent;
pub mod time_series;
