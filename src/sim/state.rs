//! Session state and spawning
//!
//! Everything the controller mutates per tick lives here.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::boat::{Boat, BoatKind, Side};
use super::path::PathSmoother;
use crate::consts::*;

/// Current phase of the round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Playing,
    /// Two boats collided; waits for an explicit restart
    GameOver,
}

/// Something that happened during the last tick, for the HUD and logs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Spawned { id: u32, kind: BoatKind, side: Side },
    Selected { id: u32 },
    PathAssigned { id: u32, points: usize },
    /// Gesture ended without a usable path
    SelectionCleared { id: u32 },
    Docked { id: u32, kind: BoatKind },
    /// Left the screen
    Lost { id: u32 },
    Collision { a: u32, b: u32 },
    Restarted,
}

/// RNG state wrapper for serialization
///
/// Each spawn draws from its own PCG stream so the sequence only depends on
/// the seed and how many boats have spawned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub stream: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed, stream: 0 }
    }

    pub fn next_rng(&mut self) -> Pcg32 {
        let rng = Pcg32::new(self.seed, self.stream);
        self.stream += 1;
        rng
    }
}

/// Complete session state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng_state: RngState,
    pub phase: GamePhase,
    pub score: u64,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Simulation clock in milliseconds
    pub clock_ms: f64,
    pub last_spawn_ms: f64,
    pub spawn_interval_ms: f64,
    /// Boats in play (ordered by id)
    pub boats: Vec<Boat>,
    /// Boats playing their fade-out
    pub fading: Vec<Boat>,
    /// Id of the boat held by the current gesture
    pub selected: Option<u32>,
    /// Path being drawn for the selected boat
    pub gesture: Option<PathSmoother>,
    /// Events from the most recent tick
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a new session with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng_state: RngState::new(seed),
            phase: GamePhase::Playing,
            score: 0,
            time_ticks: 0,
            clock_ms: 0.0,
            last_spawn_ms: 0.0,
            spawn_interval_ms: SPAWN_INTERVAL_START_MS,
            boats: Vec::new(),
            fading: Vec::new(),
            selected: None,
            gesture: None,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn boat(&self, id: u32) -> Option<&Boat> {
        self.boats.iter().find(|b| b.id == id)
    }

    pub fn boat_mut(&mut self, id: u32) -> Option<&mut Boat> {
        self.boats.iter_mut().find(|b| b.id == id)
    }

    /// Spawn a boat of random kind on a random edge
    pub fn spawn_boat(&mut self) -> u32 {
        let mut rng = self.rng_state.next_rng();
        let side = Side::ALL[rng.random_range(0..Side::ALL.len())];
        let kind = BoatKind::ALL[rng.random_range(0..BoatKind::ALL.len())];
        let along = rng.random_range(0..=side.extent() as u32) as f32;
        self.spawn_boat_at(kind, side, side.spawn_point(along))
    }

    /// Spawn a boat at an explicit position
    pub fn spawn_boat_at(&mut self, kind: BoatKind, side: Side, pos: Vec2) -> u32 {
        let id = self.next_entity_id();
        self.boats.push(Boat::spawn(id, kind, side, pos));
        self.events.push(GameEvent::Spawned { id, kind, side });
        log::debug!("Spawned {:?} boat {} on {:?} edge at {}", kind, id, side, pos);
        id
    }

    /// Drop the current selection and any half-drawn path
    pub fn clear_selection(&mut self) {
        if let Some(boat) = self.selected.take().and_then(|id| self.boat_mut(id)) {
            boat.selected = false;
        }
        self.gesture = None;
    }

    /// Back to a fresh round. The clock keeps running so spawn timing stays
    /// relative to the moment of restart.
    pub fn restart(&mut self) {
        self.boats.clear();
        self.fading.clear();
        self.score = 0;
        self.phase = GamePhase::Playing;
        self.last_spawn_ms = self.clock_ms;
        self.spawn_interval_ms = SPAWN_INTERVAL_START_MS;
        self.selected = None;
        self.gesture = None;
        self.events.push(GameEvent::Restarted);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawns_on_an_edge_aimed_inward() {
        let mut state = GameState::new(7);
        for _ in 0..50 {
            state.spawn_boat();
        }
        assert_eq!(state.boats.len(), 50);
        for boat in &state.boats {
            let p = boat.pos;
            let on_edge = p.x == 0.0 || p.x == WORLD_WIDTH || p.y == 0.0 || p.y == WORLD_HEIGHT;
            assert!(on_edge, "boat {} spawned off-edge at {}", boat.id, p);
            assert_eq!(boat.path.len(), 1);
            // straight across, half the world extent, ending on screen
            let leg = boat.path[0] - p;
            assert!(leg.x == 0.0 || leg.y == 0.0);
            let len = leg.length();
            assert!(len == WORLD_WIDTH / 2.0 || len == WORLD_HEIGHT / 2.0);
            assert!(!crate::outside_world(boat.path[0]));
            assert_eq!(boat.speed, SPAWN_SPEED);
        }
    }

    #[test]
    fn test_same_seed_same_spawns() {
        let mut a = GameState::new(42);
        let mut b = GameState::new(42);
        for _ in 0..10 {
            a.spawn_boat();
            b.spawn_boat();
        }
        for (x, y) in a.boats.iter().zip(&b.boats) {
            assert_eq!(x.pos, y.pos);
            assert_eq!(x.kind, y.kind);
        }
    }

    #[test]
    fn test_ids_are_unique() {
        let mut state = GameState::new(1);
        let a = state.spawn_boat();
        let b = state.spawn_boat();
        assert_ne!(a, b);
        assert!(state.boat(a).is_some());
    }

    #[test]
    fn test_clear_selection_releases_boat() {
        let mut state = GameState::new(1);
        let id = state.spawn_boat_at(BoatKind::Fast, Side::Left, Vec2::new(0.0, 100.0));
        state.boat_mut(id).unwrap().selected = true;
        state.selected = Some(id);
        state.gesture = Some(PathSmoother::begin(Vec2::new(0.0, 100.0)));

        state.clear_selection();
        assert!(state.selected.is_none());
        assert!(state.gesture.is_none());
        assert!(!state.boat(id).unwrap().selected);
    }

    #[test]
    fn test_restart_resets_round() {
        let mut state = GameState::new(1);
        state.spawn_boat();
        state.score = 4;
        state.clock_ms = 12_000.0;
        state.spawn_interval_ms = 1500.0;
        state.phase = GamePhase::GameOver;

        state.restart();
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.boats.is_empty());
        assert_eq!(state.score, 0);
        assert_eq!(state.last_spawn_ms, 12_000.0);
        assert_eq!(state.spawn_interval_ms, SPAWN_INTERVAL_START_MS);
    }
}
