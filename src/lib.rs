//! Terminal falling-block puzzle game.
//!
//! The engine ([`game`], [`grid`], [`piece`]) is pure and single-threaded. [`runtime`] wires it to an
//! input listener thread and a gravity deadline, and [`ui`] draws snapshots with ratatui.

pub mod command;
pub mod config;
pub mod error;
pub mod game;
pub mod grid;
pub mod piece;
pub mod runtime;
pub mod ui;
