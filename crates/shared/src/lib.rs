//! Viewport engine for a zoomable, pannable map with pins.
//!
//! Everything in this crate is pure state and math: the web frontend feeds it
//! input events and applies the [`app::FrameOutput`] it produces.

pub mod app;
pub mod controller;
pub mod error;
pub mod gallery;
pub mod geometry;
pub mod models;
pub mod pins;
pub mod scheduler;

pub use app::{FrameOutput, InputEvent, LoadState, MapSession};
pub use error::ConfigLoadError;
