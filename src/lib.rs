//! frontline - Front-line geometry and a tick simulation for a map-based operations board

pub mod api;
pub mod config;
pub mod domain;
pub mod geometry;
pub mod layers;
pub mod render;
pub mod simulation;
