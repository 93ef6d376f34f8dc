//! Rooftop rescue game core library crate.

pub mod app;
pub mod arcade;
pub mod config;
pub mod constants;
pub mod error;
pub mod events;
pub mod formatter;
pub mod game;
pub mod geometry;
pub mod level;
pub mod logging;
pub mod systems;
pub mod tween;
