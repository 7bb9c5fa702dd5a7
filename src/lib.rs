pub mod board;
pub mod config;
pub mod display_format;
pub mod error;
pub mod game;
pub mod location;
pub mod piece;
pub mod protocol;
pub mod rules;
pub mod selection;
