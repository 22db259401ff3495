pub mod chart;
pub mod classify;
pub mod config;
pub mod replay;
