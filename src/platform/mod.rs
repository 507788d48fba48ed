//! Platform abstraction layer
//!
//! Browser-independent pieces the shell relies on:
//! - Input event queue (press/move/release/restart/quit)
//! - Mapping between canvas pixels and world units
//! - Fixed-timestep clock

pub mod input;
pub mod time;
pub mod viewport;

pub use input::{InputEvent, InputQueue};
pub use time::FixedStep;
pub use viewport::Viewport;
