//! Library entry point for the imgsize CLI.

pub mod collector;
pub mod commands;
pub mod config;
pub mod error;
pub mod html;
pub mod inspect;
pub mod model;
pub mod render;
pub mod stats;
pub mod utils;
