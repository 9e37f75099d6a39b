pub mod config;
pub mod controller;
pub mod game;
pub mod hero;
pub mod maze;
pub mod screen;
pub mod skin;
pub mod stage;
pub mod tool;
