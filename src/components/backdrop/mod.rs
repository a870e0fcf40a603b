//! Ambient neural backdrop: a pointer-reactive node graph with lightning arcs,
//! redrawn every animation frame onto one canvas.

pub mod arcs;
mod component;
pub mod config;
pub mod engine;
pub mod graph;
pub mod palette;
pub mod particles;
pub mod pointer;
mod render;
mod surface;

pub use component::NeuralBackdrop;
pub use config::{EngineConfig, Intensity};
pub use engine::{EngineState, Scene};
pub use palette::{StyleConfig, StyleId};
