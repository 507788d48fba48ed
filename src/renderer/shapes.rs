//! Geometry helpers for the SDF scene
//!
//! Paths are drawn as dots: the shader only sees dot centers.

use glam::Vec2;

use crate::sim::Boat;

/// Arc-length distance between dot samples
pub const DOT_SPACING: f32 = 5.0;
/// Dot radius in world units
pub const DOT_RADIUS: f32 = 3.0;

/// Sample `points` every `spacing` units of arc length and keep every other
/// sample, giving the dashed look of a hand-drawn route.
pub fn dotted_path(points: &[Vec2], spacing: f32) -> Vec<Vec2> {
    let mut dots = Vec::new();
    let Some(&first) = points.first() else {
        return dots;
    };
    if points.len() == 1 || spacing <= 0.0 {
        dots.push(first);
        return dots;
    }

    let mut sample = 0usize;
    // Distance into the current segment of the next sample
    let mut carry = 0.0_f32;
    for seg in points.windows(2) {
        let (a, b) = (seg[0], seg[1]);
        let len = a.distance(b);
        let dir = (b - a).normalize_or_zero();

        let mut d = carry;
        while d <= len {
            if sample % 2 == 0 {
                dots.push(a + dir * d);
            }
            sample += 1;
            d += spacing;
        }
        carry = d - len;
    }

    dots
}

/// Remaining route of a boat: its position followed by the waypoints still
/// ahead of it.
pub fn remaining_route(boat: &Boat) -> Vec<Vec2> {
    let ahead = boat.path.get(boat.path_index..).unwrap_or_default();
    let mut route = Vec::with_capacity(ahead.len() + 1);
    route.push(boat.pos);
    route.extend_from_slice(ahead);
    route
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{BoatKind, Side};

    #[test]
    fn test_straight_line_keeps_every_other_sample() {
        let dots = dotted_path(&[Vec2::ZERO, Vec2::new(20.0, 0.0)], DOT_SPACING);
        assert_eq!(
            dots,
            vec![Vec2::ZERO, Vec2::new(10.0, 0.0), Vec2::new(20.0, 0.0)]
        );
    }

    #[test]
    fn test_spacing_carries_across_corners() {
        // 7 along x then 8 along y: samples at arc length 0, 5, 10, 15
        let dots = dotted_path(
            &[Vec2::ZERO, Vec2::new(7.0, 0.0), Vec2::new(7.0, 8.0)],
            DOT_SPACING,
        );
        assert_eq!(dots.len(), 2);
        assert_eq!(dots[0], Vec2::ZERO);
        assert!((dots[1] - Vec2::new(7.0, 3.0)).length() < 1e-4);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert!(dotted_path(&[], DOT_SPACING).is_empty());
        let p = Vec2::new(4.0, 4.0);
        assert_eq!(dotted_path(&[p], DOT_SPACING), vec![p]);
    }

    #[test]
    fn test_remaining_route_skips_passed_waypoints() {
        let mut boat = Boat::spawn(1, BoatKind::Fast, Side::Left, Vec2::new(0.0, 100.0));
        boat.path = vec![Vec2::new(50.0, 100.0), Vec2::new(90.0, 100.0)];
        boat.path_index = 1;
        assert_eq!(
            remaining_route(&boat),
            vec![Vec2::new(0.0, 100.0), Vec2::new(90.0, 100.0)]
        );

        boat.path_index = 2;
        assert_eq!(remaining_route(&boat), vec![boat.pos]);
    }
}
