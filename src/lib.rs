//! A Flappy Bird clone for the terminal.
//!
//! Game logic is pure (`compute`) and driven by a single-threaded
//! controller with two timers (`controller`, `timer`); `display` paints the
//! state with `crossterm` using the bundled sprites from `assets`.

pub mod assets;
pub mod compute;
pub mod config;
pub mod controller;
pub mod display;
pub mod entities;
pub mod timer;
