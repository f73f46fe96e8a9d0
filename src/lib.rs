//! Tile-maze Pac-Man: a pixel-interpolated player, three ghosts with a
//! frightened power-up, drawn on an RGB raster and shown in the terminal.

pub mod canvas;
pub mod components;
pub mod config;
pub mod error;
pub mod game;
pub mod ghost;
pub mod level;
pub mod player;
pub mod render;
pub mod screen;

pub use config::{LogSettings, Settings, Tuning, Variant};
pub use error::{GameError, GameResult};
pub use game::{Hud, Outcome, Session};
