//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by boat ID)
//! - No rendering or platform dependencies

pub mod boat;
pub mod path;
pub mod rules;
pub mod state;
pub mod tick;

pub use boat::{Advance, Boat, BoatKind, Fade, Side};
pub use path::PathSmoother;
pub use rules::{circles_overlap, find_collision, pick_boat, point_in_circle};
pub use state::{GameEvent, GamePhase, GameState};
pub use tick::{PointerEvent, TickInput, handle_pointer, tick};
