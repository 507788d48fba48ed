//! Boat entity: waypoint following, fading, and per-kind profiles

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::{heading_angle, outside_world};

/// Boat category. Fixed at spawn; picks speed, color and target port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoatKind {
    /// Red boat, docks at the left port
    Fast,
    /// Blue boat, docks at the right port
    Slow,
}

/// Per-kind constants
#[derive(Debug, Clone, Copy)]
pub struct KindProfile {
    pub base_speed: f32,
    pub color: [f32; 4],
    pub port: Vec2,
}

const PROFILES: [KindProfile; 2] = [
    KindProfile {
        base_speed: FAST_BOAT_SPEED,
        color: [1.0, 0.0, 0.0, 1.0],
        port: Vec2::new(WORLD_WIDTH / 2.0 - PORT_OFFSET, WORLD_HEIGHT / 2.0),
    },
    KindProfile {
        base_speed: SLOW_BOAT_SPEED,
        color: [0.0, 0.0, 1.0, 1.0],
        port: Vec2::new(WORLD_WIDTH / 2.0 + PORT_OFFSET, WORLD_HEIGHT / 2.0),
    },
];

impl BoatKind {
    pub const ALL: [BoatKind; 2] = [BoatKind::Fast, BoatKind::Slow];

    /// Stable index, also used as the shader's kind id
    #[inline]
    pub fn index(self) -> usize {
        match self {
            BoatKind::Fast => 0,
            BoatKind::Slow => 1,
        }
    }

    #[inline]
    pub fn profile(self) -> &'static KindProfile {
        &PROFILES[self.index()]
    }

    pub fn base_speed(self) -> f32 {
        self.profile().base_speed
    }

    pub fn color(self) -> [f32; 4] {
        self.profile().color
    }

    /// Center of the port this kind must reach
    pub fn port(self) -> Vec2 {
        self.profile().port
    }
}

/// Screen edge a boat enters from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
    Top,
    Bottom,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::Left, Side::Right, Side::Top, Side::Bottom];

    /// Length of this edge
    pub fn extent(self) -> f32 {
        match self {
            Side::Left | Side::Right => WORLD_HEIGHT,
            Side::Top | Side::Bottom => WORLD_WIDTH,
        }
    }

    /// Point on this edge, `along` units from its top/left end
    pub fn spawn_point(self, along: f32) -> Vec2 {
        let along = along.clamp(0.0, self.extent());
        match self {
            Side::Left => Vec2::new(0.0, along),
            Side::Right => Vec2::new(WORLD_WIDTH, along),
            Side::Top => Vec2::new(along, 0.0),
            Side::Bottom => Vec2::new(along, WORLD_HEIGHT),
        }
    }

    /// End of the drift-in leg: half the world extent straight across
    pub fn drift_target(self, from: Vec2) -> Vec2 {
        match self {
            Side::Left => from + Vec2::new(WORLD_WIDTH / 2.0, 0.0),
            Side::Right => from - Vec2::new(WORLD_WIDTH / 2.0, 0.0),
            Side::Top => from + Vec2::new(0.0, WORLD_HEIGHT / 2.0),
            Side::Bottom => from - Vec2::new(0.0, WORLD_HEIGHT / 2.0),
        }
    }
}

/// Fade-out state once a boat leaves play
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fade {
    /// 0-255
    pub alpha: f32,
    pub scale: f32,
    pub fading: bool,
}

impl Default for Fade {
    fn default() -> Self {
        Self {
            alpha: 255.0,
            scale: 1.0,
            fading: false,
        }
    }
}

/// Result of advancing a boat by one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Continuing,
    /// Fade completed; the boat must be dropped
    Finished,
}

/// A boat entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Boat {
    pub id: u32,
    pub pos: Vec2,
    pub kind: BoatKind,
    /// Current speed (world units per second)
    pub speed: f32,
    pub path: Vec<Vec2>,
    /// Index of the waypoint being steered toward; `path.len()` when idle
    pub path_index: usize,
    pub radius: f32,
    /// Held by the player mid-gesture; motion is suspended
    pub selected: bool,
    pub out_of_bounds: bool,
    pub fade: Fade,
    /// Last heading in radians; kept while idle so the hull keeps its bearing
    pub facing: f32,
}

impl Boat {
    /// Spawn a boat on `side` with a single drift-in leg
    pub fn spawn(id: u32, kind: BoatKind, side: Side, pos: Vec2) -> Self {
        let target = side.drift_target(pos);
        Self {
            id,
            pos,
            kind,
            speed: SPAWN_SPEED,
            path: vec![target],
            path_index: 0,
            radius: BOAT_RADIUS,
            selected: false,
            out_of_bounds: false,
            fade: Fade::default(),
            facing: heading_angle(pos, target),
        }
    }

    #[inline]
    pub fn base_speed(&self) -> f32 {
        self.kind.base_speed()
    }

    /// Waypoint currently steered toward
    pub fn target(&self) -> Option<Vec2> {
        self.path.get(self.path_index).copied()
    }

    /// Heading toward the current waypoint (None when idle)
    pub fn heading(&self) -> Option<f32> {
        self.target().map(|t| heading_angle(self.pos, t))
    }

    pub fn is_fading(&self) -> bool {
        self.fade.fading
    }

    /// Replace the path with a player-drawn one and resume at full speed
    pub fn assign_path(&mut self, path: Vec<Vec2>) {
        self.path = path;
        self.path_index = 0;
        self.speed = self.base_speed();
    }

    /// Leave play for good; position and path are frozen from here on
    pub fn start_fading(&mut self) {
        self.fade.fading = true;
        self.selected = false;
    }

    /// Advance one tick of `dt` seconds
    pub fn advance(&mut self, dt: f32) -> Advance {
        if self.fade.fading {
            self.fade.alpha -= FADE_ALPHA_RATE * dt;
            self.fade.scale -= FADE_SCALE_RATE * dt;
            if self.fade.alpha <= 0.0 || self.fade.scale <= 0.0 {
                return Advance::Finished;
            }
            return Advance::Continuing;
        }

        if self.selected {
            return Advance::Continuing;
        }

        if let Some(target) = self.target() {
            let to_target = target - self.pos;
            let distance = to_target.length();
            let step = self.speed * dt;

            if distance < step || distance == 0.0 {
                self.path_index += 1;
                if self.path_index >= self.path.len() {
                    self.speed = self.base_speed();
                }
            } else {
                self.facing = heading_angle(self.pos, target);
                self.pos += to_target / distance * step;
            }
        }

        if outside_world(self.pos) {
            self.out_of_bounds = true;
        }

        Advance::Continuing
    }

    /// Circle overlap test against another boat
    pub fn collides_with(&self, other: &Boat) -> bool {
        super::rules::circles_overlap(self.pos, self.radius, other.pos, other.radius)
    }

    /// Whether the boat is inside the given port
    pub fn reached_port(&self, port_center: Vec2, port_radius: f32) -> bool {
        super::rules::point_in_circle(self.pos, port_center, port_radius)
    }

    /// Whether the boat is inside its own kind's port
    pub fn docked(&self) -> bool {
        self.reached_port(self.kind.port(), PORT_RADIUS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn boat_at(id: u32, pos: Vec2) -> Boat {
        let mut boat = Boat::spawn(id, BoatKind::Fast, Side::Left, pos);
        boat.path.clear();
        boat
    }

    #[test]
    fn test_kind_profiles() {
        assert_eq!(BoatKind::Fast.base_speed(), FAST_BOAT_SPEED);
        assert_eq!(BoatKind::Slow.base_speed(), SLOW_BOAT_SPEED);
        assert!(BoatKind::Fast.port().x < BoatKind::Slow.port().x);
        assert_eq!(BoatKind::Fast.port().y, WORLD_HEIGHT / 2.0);
    }

    #[test]
    fn test_spawn_drift_targets() {
        let left = Boat::spawn(1, BoatKind::Slow, Side::Left, Vec2::new(0.0, 100.0));
        assert_eq!(left.path, vec![Vec2::new(600.0, 100.0)]);
        assert_eq!(left.speed, SPAWN_SPEED);

        let bottom = Boat::spawn(2, BoatKind::Slow, Side::Bottom, Vec2::new(300.0, 800.0));
        assert_eq!(bottom.path, vec![Vec2::new(300.0, 400.0)]);

        assert_eq!(Side::Right.spawn_point(400.0), Vec2::new(WORLD_WIDTH, 400.0));
        assert_eq!(Side::Top.spawn_point(5000.0), Vec2::new(WORLD_WIDTH, 0.0));
    }

    #[test]
    fn test_advance_moves_toward_waypoint() {
        let mut boat = Boat::spawn(1, BoatKind::Fast, Side::Left, Vec2::new(0.0, 400.0));
        assert_eq!(boat.advance(1.0), Advance::Continuing);
        assert!((boat.pos.x - SPAWN_SPEED).abs() < 1e-3);
        assert_eq!(boat.pos.y, 400.0);
        assert_eq!(boat.heading(), Some(0.0));
    }

    #[test]
    fn test_selected_boat_holds_position() {
        let mut boat = Boat::spawn(1, BoatKind::Fast, Side::Left, Vec2::new(0.0, 400.0));
        boat.selected = true;
        boat.advance(SIM_DT);
        assert_eq!(boat.pos, Vec2::new(0.0, 400.0));
    }

    #[test]
    fn test_path_end_restores_base_speed_and_idles() {
        let mut boat = boat_at(1, Vec2::new(100.0, 100.0));
        boat.path = vec![Vec2::new(100.5, 100.0)];
        boat.speed = SPAWN_SPEED;
        boat.advance(SIM_DT);
        assert_eq!(boat.path_index, 1);
        assert_eq!(boat.speed, FAST_BOAT_SPEED);
        assert_eq!(boat.heading(), None);

        let before = boat.pos;
        boat.advance(SIM_DT);
        assert_eq!(boat.pos, before);
    }

    #[test]
    fn test_assign_path_resets_index_and_speed() {
        let mut boat = Boat::spawn(1, BoatKind::Slow, Side::Top, Vec2::new(500.0, 0.0));
        for _ in 0..30 {
            boat.advance(SIM_DT);
        }
        let here = boat.pos;
        boat.assign_path(vec![here, here + Vec2::new(100.0, 0.0)]);
        assert_eq!(boat.path_index, 0);
        assert_eq!(boat.speed, SLOW_BOAT_SPEED);
        assert_eq!(boat.pos, here);
    }

    #[test]
    fn test_leaving_world_sets_out_of_bounds() {
        let mut boat = boat_at(1, Vec2::new(1.0, 300.0));
        boat.path = vec![Vec2::new(-100.0, 300.0)];
        boat.speed = FAST_BOAT_SPEED;
        boat.advance(SIM_DT);
        assert!(boat.out_of_bounds);
    }

    #[test]
    fn test_fade_is_monotonic_until_finished() {
        let mut boat = boat_at(1, Vec2::new(10.0, 10.0));
        boat.start_fading();
        let mut last = boat.fade;
        let mut ticks = 0;
        loop {
            ticks += 1;
            let result = boat.advance(SIM_DT);
            assert!(boat.fade.alpha < last.alpha);
            assert!(boat.fade.scale < last.scale);
            last = boat.fade;
            if result == Advance::Finished {
                break;
            }
            assert!(ticks < 100, "fade never finished");
        }
        // 255 / 8 per tick
        assert_eq!(ticks, 32);
    }

    #[test]
    fn test_fading_boat_does_not_move() {
        let mut boat = Boat::spawn(1, BoatKind::Fast, Side::Left, Vec2::new(0.0, 400.0));
        boat.start_fading();
        boat.advance(SIM_DT);
        assert_eq!(boat.pos, Vec2::new(0.0, 400.0));
    }

    #[test]
    fn test_collision_radius_sum() {
        let a = boat_at(1, Vec2::new(100.0, 100.0));
        let b = boat_at(2, Vec2::new(110.0, 100.0));
        let c = boat_at(3, Vec2::new(140.0, 100.0));
        assert!(a.collides_with(&b));
        // exactly touching does not count
        assert!(!a.collides_with(&c));
    }

    #[test]
    fn test_docking_uses_own_port() {
        let fast = boat_at(1, BoatKind::Fast.port());
        assert!(fast.docked());

        let mut slow = boat_at(2, BoatKind::Fast.port());
        slow.kind = BoatKind::Slow;
        assert!(!slow.docked());
        assert!(slow.reached_port(BoatKind::Fast.port(), PORT_RADIUS));
    }

    #[test]
    fn test_facing_survives_idle() {
        let mut boat = Boat::spawn(1, BoatKind::Slow, Side::Top, Vec2::new(300.0, 0.0));
        let down = std::f32::consts::FRAC_PI_2;
        assert!((boat.facing - down).abs() < 1e-6);

        boat.assign_path(vec![Vec2::new(310.0, 0.0)]);
        for _ in 0..20 {
            boat.advance(SIM_DT);
        }
        assert!(boat.target().is_none());
        assert!(boat.facing.abs() < 1e-6);
    }

    proptest! {
        #[test]
        fn prop_collision_is_symmetric(
            ax in 0.0f32..1200.0, ay in 0.0f32..800.0,
            bx in 0.0f32..1200.0, by in 0.0f32..800.0,
        ) {
            let a = boat_at(1, Vec2::new(ax, ay));
            let b = boat_at(2, Vec2::new(bx, by));
            prop_assert_eq!(a.collides_with(&b), b.collides_with(&a));
        }
    }
}
