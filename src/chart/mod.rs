//! Chart rendering.

pub mod renderer;

pub use renderer::*;
