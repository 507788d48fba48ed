//! Harbor Pilot - draw paths to bring boats home
//!
//! Core modules:
//! - `sim`: Deterministic simulation (boats, paths, rules, session state)
//! - `renderer`: WebGPU rendering pipeline
//! - `platform`: Input queue and canvas/world viewport mapping
//! - `settings`: Runtime configuration
//! - `pilot`: Headless autopilot used by the native runner
//! - `error`: Startup failures

pub mod error;
pub mod pilot;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::StartupError;
pub use settings::{QualityPreset, Settings};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    use glam::Vec2;

    /// Fixed simulation timestep (one tick per 60 Hz frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// World dimensions (boats and ports live in this coordinate space)
    pub const WORLD_WIDTH: f32 = 1200.0;
    pub const WORLD_HEIGHT: f32 = 800.0;
    pub const WORLD_SIZE: Vec2 = Vec2::new(WORLD_WIDTH, WORLD_HEIGHT);

    /// Boat defaults (speeds in world units per second)
    pub const BOAT_RADIUS: f32 = 20.0;
    pub const FAST_BOAT_SPEED: f32 = 180.0;
    pub const SLOW_BOAT_SPEED: f32 = 120.0;
    /// Speed on the synthetic drift-in leg
    pub const SPAWN_SPEED: f32 = 60.0;

    /// Fade-out after docking or leaving the screen (per second)
    pub const FADE_ALPHA_RATE: f32 = 480.0;
    pub const FADE_SCALE_RATE: f32 = 1.8;

    /// Ports sit either side of the island at the world center
    pub const PORT_RADIUS: f32 = 35.0;
    pub const PORT_OFFSET: f32 = 50.0;
    pub const ISLAND_RADIUS: f32 = 100.0;

    /// Spawn cadence (milliseconds)
    pub const SPAWN_INTERVAL_START_MS: f64 = 3000.0;
    pub const SPAWN_INTERVAL_STEP_MS: f64 = 100.0;
    pub const SPAWN_INTERVAL_MIN_MS: f64 = 1000.0;

    /// Drawing
    pub const PICK_RADIUS: f32 = 50.0;
    pub const PATH_MIN_SPACING: f32 = 10.0;
}

/// Angle (radians) of the vector from `from` to `to`, measured from +X toward +Y
#[inline]
pub fn heading_angle(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}

/// True when `p` lies outside the world rectangle (edges count as inside)
#[inline]
pub fn outside_world(p: Vec2) -> bool {
    p.x < 0.0 || p.x > consts::WORLD_WIDTH || p.y < 0.0 || p.y > consts::WORLD_HEIGHT
}
