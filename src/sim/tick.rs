//! Fixed timestep simulation tick
//!
//! One call advances the session by one frame: pointer input, spawning, the
//! collision check, boat motion with the bounds/port rules, and the fade-out
//! of retired boats.

use glam::Vec2;

use super::boat::Advance;
use super::path::PathSmoother;
use super::rules::{find_collision, pick_boat};
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;

/// Pointer events in world coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Press(Vec2),
    /// Only meaningful while a gesture is in progress
    Move(Vec2),
    Release(Vec2),
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer events since the previous tick, in arrival order
    pub pointer: Vec<PointerEvent>,
    /// Restart request; ignored unless the round is over
    pub restart: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.events.clear();
    state.time_ticks += 1;
    state.clock_ms += f64::from(dt) * 1000.0;

    if input.restart && state.phase == GamePhase::GameOver {
        log::info!("Restarting (final score {})", state.score);
        state.restart();
    }

    if state.phase == GamePhase::Playing {
        for event in &input.pointer {
            handle_pointer(state, *event);
        }
        step_round(state, dt);
    }

    // Fades always finish, even after a collision
    state.fading.retain_mut(|boat| boat.advance(dt) == Advance::Continuing);
}

/// Apply one pointer event to the selection and the gesture in progress
pub fn handle_pointer(state: &mut GameState, event: PointerEvent) {
    match event {
        PointerEvent::Press(point) => {
            state.clear_selection();
            let picked = pick_boat(&state.boats, point, PICK_RADIUS);
            if let Some(boat) = picked.and_then(|id| state.boat_mut(id)) {
                let id = boat.id;
                boat.selected = true;
                state.selected = Some(id);
                state.gesture = Some(PathSmoother::begin(point));
                state.events.push(GameEvent::Selected { id });
                log::debug!("Selected boat {}", id);
            }
        }
        PointerEvent::Move(point) => {
            if let Some(gesture) = state.gesture.as_mut() {
                gesture.push(point);
            }
        }
        PointerEvent::Release(_) => {
            let gesture = state.gesture.take();
            let Some(id) = state.selected.take() else {
                return;
            };
            let Some(boat) = state.boat_mut(id) else {
                return;
            };
            boat.selected = false;

            let event = match gesture.and_then(PathSmoother::finish) {
                Some(path) => {
                    let points = path.len();
                    boat.assign_path(path);
                    log::debug!("Boat {} given a {}-point path", id, points);
                    GameEvent::PathAssigned { id, points }
                }
                None => GameEvent::SelectionCleared { id },
            };
            state.events.push(event);
        }
    }
}

/// Spawn, collide, move, and retire boats while the round is live
fn step_round(state: &mut GameState, dt: f32) {
    if state.clock_ms - state.last_spawn_ms > state.spawn_interval_ms {
        state.spawn_boat();
        state.last_spawn_ms = state.clock_ms;
        state.spawn_interval_ms =
            (state.spawn_interval_ms - SPAWN_INTERVAL_STEP_MS).max(SPAWN_INTERVAL_MIN_MS);
    }

    if let Some((a, b)) = find_collision(&state.boats) {
        log::info!("Boats {} and {} collided, game over (score {})", a, b, state.score);
        state.phase = GamePhase::GameOver;
        state.events.push(GameEvent::Collision { a, b });
        return;
    }

    // Rebuild the active list in one pass instead of removing mid-iteration
    let boats = std::mem::take(&mut state.boats);
    let mut active = Vec::with_capacity(boats.len());
    for mut boat in boats {
        boat.advance(dt);

        let event = if boat.out_of_bounds {
            GameEvent::Lost { id: boat.id }
        } else if boat.docked() {
            state.score += 1;
            log::info!("{:?} boat {} docked, score {}", boat.kind, boat.id, state.score);
            GameEvent::Docked {
                id: boat.id,
                kind: boat.kind,
            }
        } else {
            active.push(boat);
            continue;
        };

        if state.selected == Some(boat.id) {
            state.selected = None;
            state.gesture = None;
        }
        boat.start_fading();
        state.events.push(event);
        state.fading.push(boat);
    }
    state.boats = active;
}
