//! Collision, port and picking rules
//!
//! All tests are strict: touching circles do not overlap, a boat exactly on
//! the port rim has not arrived.

use glam::Vec2;

use super::boat::Boat;

/// True iff the two circles overlap (center distance < sum of radii)
#[inline]
pub fn circles_overlap(a: Vec2, a_radius: f32, b: Vec2, b_radius: f32) -> bool {
    a.distance(b) < a_radius + b_radius
}

/// True iff `p` lies strictly inside the circle
#[inline]
pub fn point_in_circle(p: Vec2, center: Vec2, radius: f32) -> bool {
    p.distance(center) < radius
}

/// First colliding pair among `boats`, testing each unordered pair once
pub fn find_collision(boats: &[Boat]) -> Option<(u32, u32)> {
    for (i, a) in boats.iter().enumerate() {
        for b in &boats[i + 1..] {
            if a.collides_with(b) {
                return Some((a.id, b.id));
            }
        }
    }
    None
}

/// Nearest boat strictly within `radius` of `point`; ties keep the earlier boat
pub fn pick_boat(boats: &[Boat], point: Vec2, radius: f32) -> Option<u32> {
    let mut best: Option<(u32, f32)> = None;
    for boat in boats {
        let dist = boat.pos.distance(point);
        if dist >= radius {
            continue;
        }
        match best {
            Some((_, best_dist)) if dist >= best_dist => {}
            _ => best = Some((boat.id, dist)),
        }
    }
    best.map(|(id, _)| id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::boat::{BoatKind, Side};

    fn boat(id: u32, x: f32, y: f32) -> Boat {
        Boat::spawn(id, BoatKind::Slow, Side::Left, Vec2::new(x, y))
    }

    #[test]
    fn test_circles_overlap_strict() {
        assert!(circles_overlap(Vec2::ZERO, 20.0, Vec2::new(10.0, 0.0), 20.0));
        assert!(!circles_overlap(Vec2::ZERO, 20.0, Vec2::new(40.0, 0.0), 20.0));
    }

    #[test]
    fn test_point_in_circle_rim_is_outside() {
        assert!(point_in_circle(Vec2::new(34.9, 0.0), Vec2::ZERO, 35.0));
        assert!(!point_in_circle(Vec2::new(35.0, 0.0), Vec2::ZERO, 35.0));
    }

    #[test]
    fn test_find_collision_reports_pair() {
        let boats = vec![boat(1, 100.0, 100.0), boat(2, 500.0, 500.0), boat(3, 510.0, 500.0)];
        assert_eq!(find_collision(&boats), Some((2, 3)));
        assert_eq!(find_collision(&boats[..2]), None);
    }

    #[test]
    fn test_single_boat_never_collides() {
        let boats = vec![boat(1, 100.0, 100.0)];
        assert_eq!(find_collision(&boats), None);
    }

    #[test]
    fn test_pick_nearest_within_radius() {
        let boats = vec![boat(1, 100.0, 100.0), boat(2, 130.0, 100.0), boat(3, 400.0, 400.0)];
        assert_eq!(pick_boat(&boats, Vec2::new(120.0, 100.0), 50.0), Some(2));
        assert_eq!(pick_boat(&boats, Vec2::new(100.0, 100.0), 50.0), Some(1));
        assert_eq!(pick_boat(&boats, Vec2::new(250.0, 250.0), 50.0), None);
    }

    #[test]
    fn test_pick_tie_keeps_first() {
        let boats = vec![boat(1, 90.0, 100.0), boat(2, 110.0, 100.0)];
        assert_eq!(pick_boat(&boats, Vec2::new(100.0, 100.0), 50.0), Some(1));
    }
}
