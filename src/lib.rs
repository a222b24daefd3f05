pub mod config;
pub mod engine;
pub mod geometry;
pub mod grid;
pub mod input;
pub mod maps;
pub mod renderer;
pub mod session;
pub mod state;
pub mod tiles;
pub mod ui;
pub mod update;
